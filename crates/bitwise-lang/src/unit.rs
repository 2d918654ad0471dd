//! Units: one concrete unit within a dimension class.
//! Each unit maps to its class's canonical unit by `canonical = value × scale + offset`;
//! the offset is non-zero only for temperatures.

use crate::dimension::Dimension;
use serde::Serialize;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
pub enum UnitId {
    // Length (canonical: meter)
    Meter,
    Kilometer,
    Centimeter,
    Millimeter,
    Inch,
    Foot,
    Yard,
    Mile,
    // Mass (canonical: kilogram)
    Kilogram,
    Gram,
    Milligram,
    Pound,
    Ounce,
    // Temperature (canonical: degree Celsius)
    Celsius,
    Fahrenheit,
    Kelvin,
    // Angle (canonical: radian)
    Radian,
    Degree,
    // Volume (canonical: liter)
    Liter,
    Milliliter,
    Gallon,
    CubicMeter,
}

impl UnitId {
    pub const ALL: [UnitId; 22] = [
        UnitId::Meter,
        UnitId::Kilometer,
        UnitId::Centimeter,
        UnitId::Millimeter,
        UnitId::Inch,
        UnitId::Foot,
        UnitId::Yard,
        UnitId::Mile,
        UnitId::Kilogram,
        UnitId::Gram,
        UnitId::Milligram,
        UnitId::Pound,
        UnitId::Ounce,
        UnitId::Celsius,
        UnitId::Fahrenheit,
        UnitId::Kelvin,
        UnitId::Radian,
        UnitId::Degree,
        UnitId::Liter,
        UnitId::Milliliter,
        UnitId::Gallon,
        UnitId::CubicMeter,
    ];

    pub fn dimension(self) -> Dimension {
        use UnitId::*;
        match self {
            Meter | Kilometer | Centimeter | Millimeter | Inch | Foot | Yard | Mile => {
                Dimension::Length
            }
            Kilogram | Gram | Milligram | Pound | Ounce => Dimension::Mass,
            Celsius | Fahrenheit | Kelvin => Dimension::Temperature,
            Radian | Degree => Dimension::Angle,
            Liter | Milliliter | Gallon | CubicMeter => Dimension::Volume,
        }
    }

    /// Display symbol used by the formatter.
    pub fn symbol(self) -> &'static str {
        use UnitId::*;
        match self {
            Meter => "m",
            Kilometer => "km",
            Centimeter => "cm",
            Millimeter => "mm",
            Inch => "in",
            Foot => "ft",
            Yard => "yd",
            Mile => "mi",
            Kilogram => "kg",
            Gram => "g",
            Milligram => "mg",
            Pound => "lbs",
            Ounce => "oz",
            Celsius => "°C",
            Fahrenheit => "°F",
            Kelvin => "K",
            Radian => "rad",
            Degree => "deg",
            Liter => "L",
            Milliliter => "mL",
            Gallon => "gal",
            CubicMeter => "m³",
        }
    }

    /// Multiplicative factor to the canonical unit of the class.
    pub fn scale(self) -> f64 {
        use UnitId::*;
        match self {
            Meter => 1.0,
            Kilometer => 1000.0,
            Centimeter => 0.01,
            Millimeter => 0.001,
            Inch => 0.0254,
            Foot => 0.3048,
            Yard => 0.9144,
            Mile => 1609.344,
            Kilogram => 1.0,
            Gram => 0.001,
            Milligram => 1e-6,
            Pound => 0.453_592_37,
            Ounce => 0.028_349_523_125,
            Celsius => 1.0,
            Fahrenheit => 5.0 / 9.0,
            Kelvin => 1.0,
            Radian => 1.0,
            Degree => std::f64::consts::PI / 180.0,
            Liter => 1.0,
            Milliliter => 0.001,
            Gallon => 3.785_411_784,
            CubicMeter => 1000.0,
        }
    }

    /// Additive offset to the canonical unit; zero except for temperatures.
    pub fn offset(self) -> f64 {
        match self {
            // °C = (°F - 32) × 5/9
            UnitId::Fahrenheit => -32.0 * 5.0 / 9.0,
            UnitId::Kelvin => -273.15,
            _ => 0.0,
        }
    }

    pub fn to_canonical(self, value: f64) -> f64 {
        value * self.scale() + self.offset()
    }

    pub fn from_canonical(self, canonical: f64) -> f64 {
        (canonical - self.offset()) / self.scale()
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_units_are_identity() {
        for d in Dimension::ALL {
            let u = d.canonical_unit();
            assert_eq!(u.scale(), 1.0);
            assert_eq!(u.offset(), 0.0);
        }
    }

    #[test]
    fn fahrenheit_affine_formula() {
        // 212 °F = 100 °C, 32 °F = 0 °C
        assert!((UnitId::Fahrenheit.to_canonical(212.0) - 100.0).abs() < 1e-10);
        assert!(UnitId::Fahrenheit.to_canonical(32.0).abs() < 1e-10);
        // °F = °C × 9/5 + 32
        assert!((UnitId::Fahrenheit.from_canonical(37.0) - 98.6).abs() < 1e-10);
    }

    #[test]
    fn kelvin_offset() {
        assert!((UnitId::Kelvin.from_canonical(0.0) - 273.15).abs() < 1e-10);
        assert_eq!(UnitId::Kelvin.offset(), -273.15);
        assert_eq!(UnitId::Mile.offset(), 0.0);
    }

    #[test]
    fn all_lists_every_unit_once() {
        let mut seen = std::collections::HashSet::new();
        for u in UnitId::ALL {
            assert!(seen.insert(u), "{u:?} listed twice");
        }
    }
}
