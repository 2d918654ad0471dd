//! Unit registry: names and aliases → [UnitId].
//! Lookup is exact and case-sensitive (`mL` and `ml` are both registered, `C` is not).

use crate::dimension::Dimension;
use crate::unit::UnitId;
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref DEFAULT_REGISTRY: UnitRegistry = build_default_registry();
}

/// The registry every convenience entry point uses.
pub fn default_registry() -> &'static UnitRegistry {
    &DEFAULT_REGISTRY
}

/// Registry mapping unit names to units.
#[derive(Clone, Debug, Default)]
pub struct UnitRegistry {
    units: HashMap<String, UnitId>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit under its display symbol.
    pub fn add_unit(&mut self, unit: UnitId) {
        self.units.insert(unit.symbol().to_string(), unit);
    }

    /// Register an extra name for an existing unit.
    pub fn add_alias(&mut self, name: &str, unit: UnitId) {
        self.units.insert(name.to_string(), unit);
    }

    pub fn lookup(&self, name: &str) -> Option<UnitId> {
        self.units.get(name).copied()
    }

    pub fn is_unit(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    /// Whether `partial` is the start of a longer unit name without being one itself
    /// (`k` on the way to `km`).
    pub fn is_unit_prefix(&self, partial: &str) -> bool {
        !partial.is_empty()
            && !self.is_unit(partial)
            && self.units.keys().any(|name| name.starts_with(partial))
    }

    /// All names that resolve to `unit`, sorted, symbol first.
    pub fn names_for(&self, unit: UnitId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .units
            .iter()
            .filter(|(name, u)| **u == unit && name.as_str() != unit.symbol())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        if self.units.get(unit.symbol()) == Some(&unit) {
            names.insert(0, unit.symbol());
        }
        names
    }

    /// Registered units of one class, in table order.
    pub fn units_of(&self, dimension: Dimension) -> Vec<UnitId> {
        UnitId::ALL
            .into_iter()
            .filter(|u| u.dimension() == dimension && !self.names_for(*u).is_empty())
            .collect()
    }
}

fn add_aliases(reg: &mut UnitRegistry, unit: UnitId, aliases: &[&str]) {
    reg.add_unit(unit);
    for alias in aliases {
        reg.add_alias(alias, unit);
    }
}

/// Build the default registry: length, mass, temperature, angle and volume units with
/// their long-form and plural aliases.
pub fn build_default_registry() -> UnitRegistry {
    let mut reg = UnitRegistry::new();

    // Length
    add_aliases(&mut reg, UnitId::Meter, &["meter", "meters", "metre", "metres"]);
    add_aliases(&mut reg, UnitId::Kilometer, &["kilometer", "kilometers", "kilometre", "kilometres"]);
    add_aliases(&mut reg, UnitId::Centimeter, &["centimeter", "centimeters"]);
    add_aliases(&mut reg, UnitId::Millimeter, &["millimeter", "millimeters"]);
    add_aliases(&mut reg, UnitId::Inch, &["inch", "inches"]);
    add_aliases(&mut reg, UnitId::Foot, &["foot", "feet"]);
    add_aliases(&mut reg, UnitId::Yard, &["yard", "yards"]);
    add_aliases(&mut reg, UnitId::Mile, &["mile", "miles"]);

    // Mass
    add_aliases(&mut reg, UnitId::Kilogram, &["kilogram", "kilograms"]);
    add_aliases(&mut reg, UnitId::Gram, &["gram", "grams"]);
    add_aliases(&mut reg, UnitId::Milligram, &["milligram", "milligrams"]);
    add_aliases(&mut reg, UnitId::Pound, &["lb", "pound", "pounds"]);
    add_aliases(&mut reg, UnitId::Ounce, &["ounce", "ounces"]);

    // Temperature (affine)
    add_aliases(&mut reg, UnitId::Celsius, &["degC", "celsius"]);
    add_aliases(&mut reg, UnitId::Fahrenheit, &["degF", "fahrenheit"]);
    add_aliases(&mut reg, UnitId::Kelvin, &["kelvin"]);

    // Angle: "°" alone is the degree suffix (e.g. "90°")
    add_aliases(&mut reg, UnitId::Radian, &["radian", "radians"]);
    add_aliases(&mut reg, UnitId::Degree, &["°", "degree", "degrees"]);

    // Volume
    add_aliases(&mut reg, UnitId::Liter, &["l", "liter", "liters", "litre", "litres"]);
    add_aliases(&mut reg, UnitId::Milliliter, &["ml", "milliliter", "milliliters"]);
    add_aliases(&mut reg, UnitId::Gallon, &["gallon", "gallons"]);
    add_aliases(&mut reg, UnitId::CubicMeter, &["m3"]);

    reg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_unit_is_registered_under_its_symbol() {
        let reg = default_registry();
        for u in UnitId::ALL {
            assert_eq!(reg.lookup(u.symbol()), Some(u), "{}", u.symbol());
        }
    }

    #[test]
    fn aliases_resolve() {
        let reg = default_registry();
        assert_eq!(reg.lookup("miles"), Some(UnitId::Mile));
        assert_eq!(reg.lookup("feet"), Some(UnitId::Foot));
        assert_eq!(reg.lookup("degF"), Some(UnitId::Fahrenheit));
        assert_eq!(reg.lookup("°"), Some(UnitId::Degree));
        assert_eq!(reg.lookup("m3"), Some(UnitId::CubicMeter));
    }

    #[test]
    fn reserved_and_ambiguous_names_are_not_units() {
        let reg = default_registry();
        for name in ["e", "i", "pi", "C", "F", "to", "x"] {
            assert!(!reg.is_unit(name), "{name} should not be a unit");
        }
    }

    #[test]
    fn names_for_lists_symbol_first() {
        let reg = default_registry();
        let names = reg.names_for(UnitId::Mile);
        assert_eq!(names, vec!["mi", "mile", "miles"]);
    }

    #[test]
    fn units_of_class() {
        let reg = default_registry();
        assert_eq!(
            reg.units_of(Dimension::Temperature),
            vec![UnitId::Celsius, UnitId::Fahrenheit, UnitId::Kelvin]
        );
    }
}
