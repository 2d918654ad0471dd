//! Evaluator: [Statement] → [Value] against an [Environment].

use crate::angle::AngleMode;
use crate::environment::{constant, is_reserved, Environment};
use crate::error::RunError;
use crate::functions::call_builtin;
use crate::ir::{ExprDef, Statement};
use crate::unit_registry::UnitRegistry;
use crate::value::Value;
use tracing::trace;

/// Read-only view used while evaluating one expression.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    pub env: &'a Environment,
    pub registry: &'a UnitRegistry,
    pub mode: AngleMode,
}

impl<'a> EvalContext<'a> {
    pub fn new(env: &'a Environment, registry: &'a UnitRegistry, mode: AngleMode) -> Self {
        Self {
            env,
            registry,
            mode,
        }
    }

    /// Constants, then variables, then bare unit names (`km` is 1 km).
    fn lookup(&self, name: &str) -> Result<Value, RunError> {
        if let Some(v) = constant(name) {
            return Ok(v);
        }
        if let Some(v) = self.env.get(name) {
            return Ok(*v);
        }
        if let Some(unit) = self.registry.lookup(name) {
            return Ok(Value::quantity(1.0, unit));
        }
        Err(RunError::UnknownIdentifier(name.to_string()))
    }

    pub fn eval(&self, expr: &ExprDef) -> Result<Value, RunError> {
        let v = match expr {
            ExprDef::Num(n) => Value::Real(n.0),
            ExprDef::Ident(name) => self.lookup(name)?,
            ExprDef::WithUnit(inner, unit) => match self.eval(inner)? {
                Value::Real(x) => Value::quantity(x, *unit),
                Value::Quantity(q) => {
                    return Err(RunError::unit_mismatch(format!(
                        "{q} already has a unit, cannot attach {unit}"
                    )))
                }
                Value::Complex(_) => {
                    return Err(RunError::unit_mismatch("complex numbers cannot carry units"))
                }
            },
            ExprDef::Neg(inner) => self.eval(inner)?.neg(),
            ExprDef::Add(a, b) => self.eval(a)?.add(&self.eval(b)?)?,
            ExprDef::Sub(a, b) => self.eval(a)?.sub(&self.eval(b)?)?,
            ExprDef::Mul(a, b) => self.eval(a)?.mul(&self.eval(b)?)?,
            ExprDef::Div(a, b) => self.eval(a)?.div(&self.eval(b)?)?,
            ExprDef::Pow(a, b) => self.eval(a)?.pow(&self.eval(b)?)?,
            ExprDef::Convert(inner, target) => {
                let v = self.eval(inner)?;
                let unit = self
                    .registry
                    .lookup(target)
                    .ok_or_else(|| RunError::UnknownUnit(target.clone()))?;
                v.convert(unit)?
            }
            ExprDef::Call(name, args) => {
                let args = args
                    .iter()
                    .map(|a| self.eval(a))
                    .collect::<Result<Vec<_>, _>>()?;
                call_builtin(name, &args, self.mode)?
            }
        };
        v.ensure_finite()
    }
}

/// Run one statement. An assignment commits only when its right-hand side evaluates;
/// the line's value is the assigned value.
pub fn execute(
    statement: &Statement,
    env: &mut Environment,
    registry: &UnitRegistry,
    mode: AngleMode,
) -> Result<Value, RunError> {
    match statement {
        Statement::Expr(expr) => EvalContext::new(env, registry, mode).eval(expr),
        Statement::Assign { name, value } => {
            if is_reserved(name) {
                return Err(RunError::ReservedName(name.clone()));
            }
            let v = EvalContext::new(env, registry, mode).eval(value)?;
            env.assign(name, v)?;
            trace!(name = name.as_str(), "assigned");
            Ok(v)
        }
    }
}
