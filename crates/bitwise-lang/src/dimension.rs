//! Dimension classes: the physical category a unit belongs to.
//! Conversion and addition are only defined within one class.

use serde::Serialize;

use crate::unit::UnitId;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
pub enum Dimension {
    Length,
    Mass,
    Temperature,
    Angle,
    Volume,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Length,
        Dimension::Mass,
        Dimension::Temperature,
        Dimension::Angle,
        Dimension::Volume,
    ];

    /// Unit every other unit of this class converts through.
    pub fn canonical_unit(self) -> UnitId {
        match self {
            Dimension::Length => UnitId::Meter,
            Dimension::Mass => UnitId::Kilogram,
            Dimension::Temperature => UnitId::Celsius,
            Dimension::Angle => UnitId::Radian,
            Dimension::Volume => UnitId::Liter,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Mass => "mass",
            Dimension::Temperature => "temperature",
            Dimension::Angle => "angle",
            Dimension::Volume => "volume",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_unit_belongs_to_its_class() {
        for d in Dimension::ALL {
            assert_eq!(d.canonical_unit().dimension(), d);
        }
    }
}
