//! Variables bound by assignment lines, plus the constants they cannot shadow.

use crate::error::RunError;
use crate::value::Value;
use std::collections::BTreeMap;

/// Names that always resolve to constants and cannot be assigned.
pub const RESERVED_NAMES: &[&str] = &["pi", "PI", "π", "e", "i"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Value of a built-in constant.
pub fn constant(name: &str) -> Option<Value> {
    match name {
        "pi" | "PI" | "π" => Some(Value::Real(std::f64::consts::PI)),
        "e" => Some(Value::Real(std::f64::consts::E)),
        "i" => Some(Value::imaginary_unit()),
        _ => None,
    }
}

/// Name → value store of one document. Iterates in name order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Environment {
    vars: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Insert or overwrite a binding. Reserved names are rejected and nothing changes.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), RunError> {
        if is_reserved(name) {
            return Err(RunError::ReservedName(name.to_string()));
        }
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }
}
