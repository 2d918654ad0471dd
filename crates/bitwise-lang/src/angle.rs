//! Angle mode: how trigonometric functions read and produce plain numbers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum AngleMode {
    #[default]
    #[serde(rename = "DEG", alias = "deg")]
    Deg,
    #[serde(rename = "RAD", alias = "rad")]
    Rad,
}

impl AngleMode {
    /// Plain-number angle in this mode → radians.
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleMode::Deg => angle * (std::f64::consts::PI / 180.0),
            AngleMode::Rad => angle,
        }
    }

    /// Radians → plain-number angle in this mode.
    pub fn from_radians(self, radians: f64) -> f64 {
        match self {
            AngleMode::Deg => radians * (180.0 / std::f64::consts::PI),
            AngleMode::Rad => radians,
        }
    }

    pub fn toggled(self) -> AngleMode {
        match self {
            AngleMode::Deg => AngleMode::Rad,
            AngleMode::Rad => AngleMode::Deg,
        }
    }
}

impl FromStr for AngleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEG" => Ok(AngleMode::Deg),
            "RAD" => Ok(AngleMode::Rad),
            _ => Err(format!("unknown angle mode '{s}' (expected DEG or RAD)")),
        }
    }
}

impl std::fmt::Display for AngleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AngleMode::Deg => f.write_str("DEG"),
            AngleMode::Rad => f.write_str("RAD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("deg".parse::<AngleMode>().unwrap(), AngleMode::Deg);
        assert_eq!("RAD".parse::<AngleMode>().unwrap(), AngleMode::Rad);
        assert!("grad".parse::<AngleMode>().is_err());
    }

    #[test]
    fn degree_round_trip() {
        let r = AngleMode::Deg.to_radians(180.0);
        assert!((r - std::f64::consts::PI).abs() < 1e-15);
        assert!((AngleMode::Deg.from_radians(r) - 180.0).abs() < 1e-12);
        assert_eq!(AngleMode::Rad.to_radians(1.5), 1.5);
    }

    #[test]
    fn toggle() {
        assert_eq!(AngleMode::Deg.toggled(), AngleMode::Rad);
        assert_eq!(AngleMode::default(), AngleMode::Deg);
    }
}
