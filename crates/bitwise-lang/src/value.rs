//! Value: the tagged result type of every expression (real, complex, or quantity).
//!
//! Arithmetic dispatches on the operand tags. `Real` promotes to `Complex` next to a
//! complex operand and never promotes to `Quantity`; complex numbers never carry units.

use crate::error::RunError;
use crate::quantity::Quantity;
use crate::unit::UnitId;
use num_complex::Complex64;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Real(f64),
    Complex(Complex64),
    Quantity(Quantity),
}

impl Value {
    pub fn complex(re: f64, im: f64) -> Self {
        Value::Complex(Complex64::new(re, im))
    }

    pub fn imaginary_unit() -> Self {
        Value::complex(0.0, 1.0)
    }

    pub fn quantity(magnitude: f64, unit: UnitId) -> Self {
        Value::Quantity(Quantity::new(magnitude, unit))
    }

    /// Real or complex operand as a complex number; `None` for quantities.
    pub fn as_complex(&self) -> Option<Complex64> {
        match self {
            Value::Real(x) => Some(Complex64::new(*x, 0.0)),
            Value::Complex(z) => Some(*z),
            Value::Quantity(_) => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Value::Real(x) => *x == 0.0,
            Value::Complex(z) => z.re == 0.0 && z.im == 0.0,
            Value::Quantity(q) => q.is_zero(),
        }
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Value::Real(_) => "a plain number".to_string(),
            Value::Complex(_) => "a complex number".to_string(),
            Value::Quantity(q) => format!("a quantity in {}", q.unit()),
        }
    }

    /// Reject infinities and NaN so they never reach the display.
    pub fn ensure_finite(self) -> Result<Value, RunError> {
        let parts = match self {
            Value::Real(x) => [x, 0.0],
            Value::Complex(z) => [z.re, z.im],
            Value::Quantity(q) => [q.magnitude(), 0.0],
        };
        if parts.iter().any(|p| p.is_nan()) {
            return Err(RunError::evaluation("result is not a number"));
        }
        if parts.iter().any(|p| p.is_infinite()) {
            return Err(RunError::evaluation("result is infinite"));
        }
        Ok(self)
    }

    pub fn add(&self, rhs: &Value) -> Result<Value, RunError> {
        match (self, rhs) {
            (Value::Real(a), Value::Real(b)) => Ok(Value::Real(a + b)),
            (Value::Quantity(a), Value::Quantity(b)) => Ok(Value::Quantity(a.add(b)?)),
            (Value::Quantity(_), _) | (_, Value::Quantity(_)) => Err(mixed_error("add", self, rhs)),
            _ => Ok(Value::Complex(self.complex_operand()? + rhs.complex_operand()?)),
        }
    }

    pub fn sub(&self, rhs: &Value) -> Result<Value, RunError> {
        match (self, rhs) {
            (Value::Real(a), Value::Real(b)) => Ok(Value::Real(a - b)),
            (Value::Quantity(a), Value::Quantity(b)) => Ok(Value::Quantity(a.sub(b)?)),
            (Value::Quantity(_), _) | (_, Value::Quantity(_)) => {
                Err(mixed_error("subtract", self, rhs))
            }
            _ => Ok(Value::Complex(self.complex_operand()? - rhs.complex_operand()?)),
        }
    }

    pub fn mul(&self, rhs: &Value) -> Result<Value, RunError> {
        match (self, rhs) {
            (Value::Real(a), Value::Real(b)) => Ok(Value::Real(a * b)),
            (Value::Quantity(q), Value::Real(r)) | (Value::Real(r), Value::Quantity(q)) => {
                Ok(Value::Quantity(q.scale(*r)))
            }
            (Value::Quantity(a), Value::Quantity(b)) => Err(RunError::unit_mismatch(format!(
                "cannot multiply {} by {}: compound units are not supported",
                a.unit(),
                b.unit()
            ))),
            (Value::Quantity(_), _) | (_, Value::Quantity(_)) => {
                Err(mixed_error("multiply", self, rhs))
            }
            _ => Ok(Value::Complex(self.complex_operand()? * rhs.complex_operand()?)),
        }
    }

    pub fn div(&self, rhs: &Value) -> Result<Value, RunError> {
        match (self, rhs) {
            (Value::Real(a), Value::Real(b)) => {
                if *b == 0.0 {
                    return Err(RunError::division_by_zero());
                }
                Ok(Value::Real(a / b))
            }
            (Value::Quantity(q), Value::Real(r)) => Ok(Value::Quantity(q.div_scalar(*r)?)),
            (Value::Quantity(a), Value::Quantity(b)) => Ok(Value::Real(a.ratio(b)?)),
            (Value::Real(_), Value::Quantity(q)) => Err(RunError::unit_mismatch(format!(
                "cannot divide a plain number by {}",
                q.unit()
            ))),
            (Value::Quantity(_), _) | (_, Value::Quantity(_)) => {
                Err(mixed_error("divide", self, rhs))
            }
            _ => {
                let divisor = rhs.complex_operand()?;
                if divisor.norm_sqr() == 0.0 {
                    return Err(RunError::division_by_zero());
                }
                Ok(Value::Complex(self.complex_operand()? / divisor))
            }
        }
    }

    pub fn pow(&self, rhs: &Value) -> Result<Value, RunError> {
        match (self, rhs) {
            (Value::Real(a), Value::Real(b)) => {
                if *a < 0.0 && b.fract() != 0.0 {
                    return Err(RunError::evaluation(
                        "negative base with a fractional exponent has no real result",
                    ));
                }
                if *a == 0.0 && *b < 0.0 {
                    return Err(RunError::division_by_zero());
                }
                Ok(Value::Real(a.powf(*b)))
            }
            (Value::Quantity(_), _) | (_, Value::Quantity(_)) => Err(RunError::unit_mismatch(
                "quantities cannot be raised to a power",
            )),
            (Value::Complex(base), Value::Real(exp)) => {
                if base.norm_sqr() == 0.0 {
                    return if *exp > 0.0 {
                        Ok(Value::complex(0.0, 0.0))
                    } else {
                        Err(RunError::division_by_zero())
                    };
                }
                if exp.fract() == 0.0 && exp.abs() <= i32::MAX as f64 {
                    Ok(Value::Complex(base.powi(*exp as i32)))
                } else {
                    Ok(Value::Complex(base.powf(*exp)))
                }
            }
            _ => {
                let base = self.complex_operand()?;
                let exp = rhs.complex_operand()?;
                if base.norm_sqr() == 0.0 {
                    return Err(RunError::evaluation(
                        "zero raised to a complex power is undefined",
                    ));
                }
                Ok(Value::Complex(base.powc(exp)))
            }
        }
    }

    pub fn neg(&self) -> Value {
        match self {
            Value::Real(x) => Value::Real(-x),
            Value::Complex(z) => Value::Complex(-z),
            Value::Quantity(q) => Value::Quantity(-*q),
        }
    }

    /// Parallel combination `1 / (1/a + 1/b)`, e.g. resistors in parallel.
    pub fn parallel(&self, rhs: &Value) -> Result<Value, RunError> {
        if matches!(self, Value::Quantity(_)) || matches!(rhs, Value::Quantity(_)) {
            return Err(RunError::unit_mismatch(
                "parallel combination needs plain or complex numbers",
            ));
        }
        if self.is_zero() || rhs.is_zero() {
            return Err(RunError::evaluation("zero operand"));
        }
        let one = Value::Real(1.0);
        let sum = one.div(self)?.add(&one.div(rhs)?)?;
        one.div(&sum)
    }

    /// Compare within `tolerance`; quantities compare after converting to a common unit.
    pub fn approx_eq(&self, other: &Value, tolerance: f64) -> bool {
        match (self, other) {
            (Value::Quantity(a), Value::Quantity(b)) => match b.convert_to(a.unit()) {
                Ok(b) => (a.magnitude() - b.magnitude()).abs() <= tolerance,
                Err(_) => false,
            },
            (Value::Quantity(_), _) | (_, Value::Quantity(_)) => false,
            _ => match (self.as_complex(), other.as_complex()) {
                (Some(a), Some(b)) => {
                    (a.re - b.re).abs() <= tolerance && (a.im - b.im).abs() <= tolerance
                }
                _ => false,
            },
        }
    }

    /// Convert a quantity to another unit of its class.
    pub fn convert(&self, target: UnitId) -> Result<Value, RunError> {
        match self {
            Value::Quantity(q) => Ok(Value::Quantity(q.convert_to(target)?)),
            Value::Real(_) => Err(RunError::unit_mismatch(format!(
                "cannot convert a plain number to {target}"
            ))),
            Value::Complex(_) => Err(RunError::unit_mismatch(
                "complex numbers cannot carry units",
            )),
        }
    }

    fn complex_operand(&self) -> Result<Complex64, RunError> {
        self.as_complex()
            .ok_or_else(|| RunError::unit_mismatch("complex numbers cannot carry units"))
    }
}

fn mixed_error(verb: &str, lhs: &Value, rhs: &Value) -> RunError {
    if matches!(lhs, Value::Complex(_)) || matches!(rhs, Value::Complex(_)) {
        return RunError::unit_mismatch("complex numbers cannot carry units");
    }
    RunError::unit_mismatch(format!(
        "cannot {verb} {} and {}",
        lhs.describe(),
        rhs.describe()
    ))
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<Quantity> for Value {
    fn from(q: Quantity) -> Self {
        Value::Quantity(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn km(x: f64) -> Value {
        Value::quantity(x, UnitId::Kilometer)
    }

    #[test]
    fn real_arithmetic() {
        let a = Value::Real(6.0);
        let b = Value::Real(4.0);
        assert_eq!(a.add(&b).unwrap(), Value::Real(10.0));
        assert_eq!(a.sub(&b).unwrap(), Value::Real(2.0));
        assert_eq!(a.mul(&b).unwrap(), Value::Real(24.0));
        assert_eq!(a.div(&b).unwrap(), Value::Real(1.5));
        assert_eq!(b.pow(&Value::Real(0.5)).unwrap(), Value::Real(2.0));
        assert_eq!(a.neg(), Value::Real(-6.0));
    }

    #[test]
    fn real_division_by_zero_is_error() {
        let e = Value::Real(1.0).div(&Value::Real(0.0)).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Evaluation);
        assert_eq!(e.to_string(), "division by zero");
    }

    #[test]
    fn real_promotes_to_complex() {
        let z = Value::Real(3.0).add(&Value::imaginary_unit().mul(&Value::Real(4.0)).unwrap());
        assert_eq!(z.unwrap(), Value::complex(3.0, 4.0));
    }

    #[test]
    fn complex_arithmetic() {
        let a = Value::complex(1.0, 2.0);
        let b = Value::complex(3.0, -1.0);
        assert_eq!(a.mul(&b).unwrap(), Value::complex(5.0, 5.0));
        let q = a.div(&b).unwrap();
        assert!(q.approx_eq(&Value::complex(0.1, 0.7), 1e-12));
        let i2 = Value::imaginary_unit().pow(&Value::Real(2.0)).unwrap();
        assert_eq!(i2, Value::complex(-1.0, 0.0));
    }

    #[test]
    fn complex_division_by_zero_is_error() {
        let e = Value::complex(1.0, 1.0).div(&Value::complex(0.0, 0.0)).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Evaluation);
    }

    #[test]
    fn quantity_scaling_by_real() {
        assert_eq!(km(2.0).mul(&Value::Real(3.0)).unwrap(), km(6.0));
        assert_eq!(Value::Real(3.0).mul(&km(2.0)).unwrap(), km(6.0));
        assert_eq!(km(6.0).div(&Value::Real(3.0)).unwrap(), km(2.0));
    }

    #[test]
    fn quantity_never_mixes_with_plain_numbers() {
        let e = km(1.0).add(&Value::Real(1.0)).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::UnitMismatch);
        assert_eq!(e.to_string(), "cannot add a quantity in km and a plain number");
        assert_eq!(Value::Real(1.0).div(&km(1.0)).unwrap_err().kind(), ErrorKind::UnitMismatch);
    }

    #[test]
    fn quantity_and_complex_is_error() {
        let e = km(1.0).mul(&Value::imaginary_unit()).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::UnitMismatch);
        assert!(Value::imaginary_unit().add(&km(1.0)).is_err());
    }

    #[test]
    fn quantity_ratio_is_real() {
        let ratio = km(1.0).div(&Value::quantity(250.0, UnitId::Meter)).unwrap();
        assert!(ratio.approx_eq(&Value::Real(4.0), 1e-12));
    }

    #[test]
    fn quantity_mismatched_classes() {
        let e = km(1.0).add(&Value::quantity(1.0, UnitId::Kilogram)).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::UnitMismatch);
    }

    #[test]
    fn power_domain_errors() {
        assert!(Value::Real(-8.0).pow(&Value::Real(1.0 / 3.0)).is_err());
        assert_eq!(Value::Real(-2.0).pow(&Value::Real(3.0)).unwrap(), Value::Real(-8.0));
        assert!(Value::Real(0.0).pow(&Value::Real(-1.0)).is_err());
        assert!(km(2.0).pow(&Value::Real(2.0)).is_err());
    }

    #[test]
    fn parallel_combination() {
        let r = Value::Real(10.0).parallel(&Value::Real(20.0)).unwrap();
        assert!(r.approx_eq(&Value::Real(20.0 / 3.0), 1e-12));
        let r = Value::Real(100.0).parallel(&Value::Real(200.0)).unwrap();
        assert!(r.approx_eq(&Value::Real(200.0 / 3.0), 1e-12));
    }

    #[test]
    fn parallel_zero_operand_is_error() {
        let e = Value::Real(0.0).parallel(&Value::Real(5.0)).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Evaluation);
        assert_eq!(e.to_string(), "zero operand");
        assert!(Value::Real(5.0).parallel(&Value::complex(0.0, 0.0)).is_err());
    }

    #[test]
    fn parallel_complex_impedance() {
        // 10 ohm resistor parallel to a 10j reactance: 5 + 5j
        let r = Value::Real(10.0)
            .parallel(&Value::complex(0.0, 10.0))
            .unwrap();
        assert!(r.approx_eq(&Value::complex(5.0, 5.0), 1e-12));
    }

    #[test]
    fn parallel_opposite_operands_divide_by_zero() {
        let e = Value::Real(5.0).parallel(&Value::Real(-5.0)).unwrap_err();
        assert_eq!(e.to_string(), "division by zero");
    }

    #[test]
    fn convert_requires_quantity() {
        let mi = km(5.0).convert(UnitId::Mile).unwrap();
        let back = mi.convert(UnitId::Kilometer).unwrap();
        assert!(back.approx_eq(&km(5.0), 1e-10));
        assert_eq!(
            Value::Real(5.0).convert(UnitId::Mile).unwrap_err().kind(),
            ErrorKind::UnitMismatch
        );
    }

    #[test]
    fn approx_eq_across_units() {
        assert!(km(1.0).approx_eq(&Value::quantity(1000.0, UnitId::Meter), 1e-9));
        assert!(!km(1.0).approx_eq(&Value::Real(1.0), 1e-9));
        assert!(Value::Real(2.0).approx_eq(&Value::complex(2.0, 0.0), 0.0));
    }

    #[test]
    fn ensure_finite_rejects_overflow() {
        assert!(Value::Real(f64::INFINITY).ensure_finite().is_err());
        assert!(Value::Real(f64::NAN).ensure_finite().is_err());
        assert!(Value::Real(1.0).ensure_finite().is_ok());
    }
}
