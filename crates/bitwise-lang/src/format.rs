//! Display formatting of values: fixed precision with trailing zeros trimmed, and
//! near-integers and near-zero results snapped so `cos(90)` shows `0`.

use crate::value::Value;
use num_complex::Complex64;

pub const DEFAULT_PRECISION: u8 = 5;
pub const MAX_PRECISION: u8 = 10;

/// Values this close to zero or to an integer display as that integer.
pub const SNAP_TOLERANCE: f64 = 1e-10;

/// Clamp a requested precision into `0..=MAX_PRECISION`.
pub fn clamp_precision(precision: i64) -> u8 {
    precision.clamp(0, MAX_PRECISION as i64) as u8
}

pub fn format_real(x: f64, precision: u8) -> String {
    if x.abs() < SNAP_TOLERANCE {
        return "0".to_string();
    }
    let nearest = x.round();
    if (x - nearest).abs() < SNAP_TOLERANCE {
        return format!("{nearest:.0}");
    }
    let precision = precision.min(MAX_PRECISION) as usize;
    let formatted = format!("{x:.precision$}");
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `4i`, `3 + 4i`, `3 - 4i`, `-i`; the coefficient is dropped when it shows as `1`.
pub fn format_complex(z: Complex64, precision: u8) -> String {
    let re = format_real(z.re, precision);
    let im_abs = format_real(z.im.abs(), precision);
    let im_zero = im_abs == "0";
    let negative = z.im < 0.0;
    let coefficient = if im_abs == "1" { "" } else { im_abs.as_str() };
    match (re == "0", im_zero) {
        (_, true) => re,
        (true, false) => {
            let sign = if negative { "-" } else { "" };
            format!("{sign}{coefficient}i")
        }
        (false, false) => {
            let op = if negative { '-' } else { '+' };
            format!("{re} {op} {coefficient}i")
        }
    }
}

pub fn format_value(value: &Value, precision: u8) -> String {
    match value {
        Value::Real(x) => format_real(*x, precision),
        Value::Complex(z) => format_complex(*z, precision),
        Value::Quantity(q) => {
            format!("{} {}", format_real(q.magnitude(), precision), q.unit().symbol())
        }
    }
}

/// Display form of a failed line.
pub fn format_error(message: &str) -> String {
    format!("Error: {message}")
}
