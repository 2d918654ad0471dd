//! Quantity: magnitude + unit. Arithmetic with dimension checking and conversion.

use crate::unit::UnitId;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::ops::Neg;
use thiserror::Error;

/// Result of quantity operations that can fail (dimension mismatch, division by zero).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("cannot combine {left} ({}) with {right} ({})", .left.dimension(), .right.dimension())]
    DimensionMismatch { left: UnitId, right: UnitId },

    #[error("cannot convert {from} ({}) to {to} ({})", .from.dimension(), .to.dimension())]
    IncompatibleUnits { from: UnitId, to: UnitId },

    #[error("division by zero")]
    DivisionByZero,
}

/// A physical quantity: numeric magnitude and unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct Quantity {
    magnitude: OrderedFloat<f64>,
    unit: UnitId,
}

impl Quantity {
    pub fn new(magnitude: f64, unit: UnitId) -> Self {
        Self {
            magnitude: OrderedFloat::from(magnitude),
            unit,
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude.0
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.0 == 0.0
    }

    /// Same magnitude function applied, unit kept (abs, round, scaling).
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Quantity {
        Quantity::new(f(self.magnitude.0), self.unit)
    }

    /// Choose the unit with the smaller scale to its canonical unit.
    pub fn smaller_unit(a: UnitId, b: UnitId) -> UnitId {
        if a.scale() <= b.scale() {
            a
        } else {
            b
        }
    }

    /// Convert this quantity to the target unit. Same dimension class required.
    pub fn convert_to(&self, target: UnitId) -> Result<Quantity, QuantityError> {
        if self.unit == target {
            return Ok(*self);
        }
        if self.unit.dimension() != target.dimension() {
            return Err(QuantityError::IncompatibleUnits {
                from: self.unit,
                to: target,
            });
        }
        let canonical = self.unit.to_canonical(self.magnitude.0);
        Ok(Quantity::new(target.from_canonical(canonical), target))
    }

    /// Add two quantities of one class; the result keeps the left operand's unit.
    pub fn add(self, rhs: &Quantity) -> Result<Quantity, QuantityError> {
        let rhs = self.align(rhs)?;
        Ok(Quantity::new(self.magnitude.0 + rhs, self.unit))
    }

    /// Subtract; same class required, result in the left operand's unit.
    pub fn sub(self, rhs: &Quantity) -> Result<Quantity, QuantityError> {
        let rhs = self.align(rhs)?;
        Ok(Quantity::new(self.magnitude.0 - rhs, self.unit))
    }

    /// Dimensionless ratio of two quantities of one class.
    pub fn ratio(&self, rhs: &Quantity) -> Result<f64, QuantityError> {
        let rhs = self.align(rhs)?;
        if rhs == 0.0 {
            return Err(QuantityError::DivisionByZero);
        }
        Ok(self.magnitude.0 / rhs)
    }

    /// Scale by a dimensionless factor.
    pub fn scale(self, factor: f64) -> Quantity {
        self.map(|m| m * factor)
    }

    /// Divide by a dimensionless factor.
    pub fn div_scalar(self, divisor: f64) -> Result<Quantity, QuantityError> {
        if divisor == 0.0 {
            return Err(QuantityError::DivisionByZero);
        }
        Ok(self.map(|m| m / divisor))
    }

    /// Magnitude of `rhs` expressed in this quantity's unit.
    fn align(&self, rhs: &Quantity) -> Result<f64, QuantityError> {
        if self.unit.dimension() != rhs.unit.dimension() {
            return Err(QuantityError::DimensionMismatch {
                left: self.unit,
                right: rhs.unit,
            });
        }
        Ok(rhs
            .convert_to(self.unit)
            .map_err(|_| QuantityError::DimensionMismatch {
                left: self.unit,
                right: rhs.unit,
            })?
            .magnitude())
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Self::Output {
        self.map(|m| -m)
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.magnitude.0, self.unit)
    }
}
