//! Built-in functions. Trigonometry follows the pass's [AngleMode]; everything else is
//! mode independent.
//!
//! Real arguments stay real: `sqrt(-1)` and `ln(-1)` are domain errors, and the complex
//! branch is only taken for complex arguments (`sqrt(-1 + 0i)`).

use crate::angle::AngleMode;
use crate::dimension::Dimension;
use crate::error::RunError;
use crate::quantity::Quantity;
use crate::unit::UnitId;
use crate::value::Value;
use num_complex::Complex64;

/// `|cos x|` below this means the tangent is undefined rather than just large.
pub const TAN_POLE_TOLERANCE: f64 = 1e-12;

/// Evaluate a built-in with already evaluated arguments.
pub fn call_builtin(name: &str, args: &[Value], mode: AngleMode) -> Result<Value, RunError> {
    match name {
        "sin" => forward_trig(name, exactly_one(args, name)?, mode, f64::sin, Complex64::sin),
        "cos" => forward_trig(name, exactly_one(args, name)?, mode, f64::cos, Complex64::cos),
        "tan" => tan(exactly_one(args, name)?, mode),
        "asin" | "arcsin" => {
            let x = exactly_one(args, name)?;
            inverse_trig(name, x, mode, f64::asin, Complex64::asin, |x| x.abs() <= 1.0)
        }
        "acos" | "arccos" => {
            let x = exactly_one(args, name)?;
            inverse_trig(name, x, mode, f64::acos, Complex64::acos, |x| x.abs() <= 1.0)
        }
        "atan" | "arctan" => {
            let x = exactly_one(args, name)?;
            inverse_trig(name, x, mode, f64::atan, Complex64::atan, |_| true)
        }
        "atan2" => {
            let (y, x) = exactly_two(args, name)?;
            let (y, x) = (real_arg(name, y)?, real_arg(name, x)?);
            Ok(Value::Real(mode.from_radians(y.atan2(x))))
        }
        "sinh" => elementwise(name, exactly_one(args, name)?, f64::sinh, Complex64::sinh),
        "cosh" => elementwise(name, exactly_one(args, name)?, f64::cosh, Complex64::cosh),
        "tanh" => elementwise(name, exactly_one(args, name)?, f64::tanh, Complex64::tanh),
        "asinh" => elementwise(name, exactly_one(args, name)?, f64::asinh, Complex64::asinh),
        "acosh" => {
            let x = exactly_one(args, name)?;
            real_domain(name, x, |x| x >= 1.0, "argument must be at least 1")?;
            elementwise(name, x, f64::acosh, Complex64::acosh)
        }
        "atanh" => {
            let x = exactly_one(args, name)?;
            real_domain(name, x, |x| x.abs() < 1.0, "argument must be between -1 and 1")?;
            elementwise(name, x, f64::atanh, Complex64::atanh)
        }
        "sqrt" => {
            let x = exactly_one(args, name)?;
            real_domain(name, x, |x| x >= 0.0, "square root of a negative number")?;
            elementwise(name, x, f64::sqrt, Complex64::sqrt)
        }
        "cbrt" => elementwise(name, exactly_one(args, name)?, f64::cbrt, Complex64::cbrt),
        "exp" => elementwise(name, exactly_one(args, name)?, f64::exp, Complex64::exp),
        "ln" => logarithm(name, exactly_one(args, name)?, None),
        "log" => match args {
            [x] => logarithm(name, x, None),
            [x, base] => logarithm(name, x, Some(real_arg(name, base)?)),
            _ => Err(arity(name, "1 or 2 arguments", args.len())),
        },
        "log10" => logarithm(name, exactly_one(args, name)?, Some(10.0)),
        "log2" => logarithm(name, exactly_one(args, name)?, Some(2.0)),
        "pow" => {
            let (base, exponent) = exactly_two(args, name)?;
            base.pow(exponent)
        }
        "abs" => match exactly_one(args, name)? {
            Value::Real(x) => Ok(Value::Real(x.abs())),
            Value::Complex(z) => Ok(Value::Real(z.norm())),
            Value::Quantity(q) => Ok(Value::Quantity(q.map(f64::abs))),
        },
        "round" => match args {
            [x] => magnitude_op(name, x, f64::round),
            [x, digits] => {
                let digits = real_arg(name, digits)?;
                if digits.fract() != 0.0 || !(0.0..=15.0).contains(&digits) {
                    return Err(RunError::BadArguments(format!(
                        "{name}: digits must be a whole number from 0 to 15"
                    )));
                }
                let factor = 10f64.powi(digits as i32);
                magnitude_op(name, x, |m| (m * factor).round() / factor)
            }
            _ => Err(arity(name, "1 or 2 arguments", args.len())),
        },
        "floor" => magnitude_op(name, exactly_one(args, name)?, f64::floor),
        "ceil" => magnitude_op(name, exactly_one(args, name)?, f64::ceil),
        "min" => extremum(name, args, f64::min),
        "max" => extremum(name, args, f64::max),
        "parallel" => {
            let (a, b) = exactly_two(args, name)?;
            a.parallel(b)
        }
        _ => Err(RunError::UnknownFunction(name.to_string())),
    }
}

fn arity(name: &str, expected: &str, got: usize) -> RunError {
    RunError::BadArguments(format!("{name}: expected {expected}, got {got}"))
}

fn exactly_one<'a>(args: &'a [Value], name: &str) -> Result<&'a Value, RunError> {
    match args {
        [x] => Ok(x),
        _ => Err(arity(name, "1 argument", args.len())),
    }
}

fn exactly_two<'a>(args: &'a [Value], name: &str) -> Result<(&'a Value, &'a Value), RunError> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(arity(name, "2 arguments", args.len())),
    }
}

fn real_arg(name: &str, x: &Value) -> Result<f64, RunError> {
    match x {
        Value::Real(x) => Ok(*x),
        Value::Complex(_) => Err(RunError::evaluation(format!(
            "{name} is not defined for complex numbers"
        ))),
        Value::Quantity(q) => Err(RunError::unit_mismatch(format!(
            "{name} expects a plain number, got a quantity in {}",
            q.unit()
        ))),
    }
}

/// Domain check that only applies to real arguments.
fn real_domain(
    name: &str,
    x: &Value,
    ok: impl FnOnce(f64) -> bool,
    message: &str,
) -> Result<(), RunError> {
    match x {
        Value::Real(r) if !ok(*r) => Err(RunError::evaluation(format!("{name}: {message}"))),
        _ => Ok(()),
    }
}

/// Real or complex function; quantities are rejected.
fn elementwise(
    name: &str,
    x: &Value,
    real: impl FnOnce(f64) -> f64,
    complex: impl FnOnce(Complex64) -> Complex64,
) -> Result<Value, RunError> {
    match x {
        Value::Real(r) => Ok(Value::Real(real(*r))),
        Value::Complex(z) => Ok(Value::Complex(complex(*z))),
        Value::Quantity(q) => Err(RunError::unit_mismatch(format!(
            "{name} expects a plain number, got a quantity in {}",
            q.unit()
        ))),
    }
}

/// Function of the magnitude: plain numbers and quantities (unit kept).
fn magnitude_op(name: &str, x: &Value, f: impl Fn(f64) -> f64) -> Result<Value, RunError> {
    match x {
        Value::Real(r) => Ok(Value::Real(f(*r))),
        Value::Quantity(q) => Ok(Value::Quantity(q.map(f))),
        Value::Complex(_) => Err(RunError::evaluation(format!(
            "{name} is not defined for complex numbers"
        ))),
    }
}

/// Angle argument in radians: angle quantities bypass the mode, plain numbers follow it.
fn angle_in_radians(name: &str, x: &Value, mode: AngleMode) -> Result<Option<f64>, RunError> {
    match x {
        Value::Real(r) => Ok(Some(mode.to_radians(*r))),
        Value::Quantity(q) if q.unit().dimension() == Dimension::Angle => {
            Ok(Some(q.convert_to(UnitId::Radian)?.magnitude()))
        }
        Value::Quantity(q) => Err(RunError::unit_mismatch(format!(
            "{name} expects an angle, got a quantity in {}",
            q.unit()
        ))),
        Value::Complex(_) if mode == AngleMode::Deg => Err(complex_in_degrees(name)),
        Value::Complex(_) => Ok(None),
    }
}

fn complex_in_degrees(name: &str) -> RunError {
    RunError::evaluation(format!("{name} of a complex number requires RAD mode"))
}

fn forward_trig(
    name: &str,
    x: &Value,
    mode: AngleMode,
    real: fn(f64) -> f64,
    complex: fn(Complex64) -> Complex64,
) -> Result<Value, RunError> {
    match angle_in_radians(name, x, mode)? {
        Some(r) => Ok(Value::Real(real(r))),
        None => elementwise(name, x, real, complex),
    }
}

fn tan(x: &Value, mode: AngleMode) -> Result<Value, RunError> {
    let undefined = || RunError::evaluation("tangent undefined");
    match angle_in_radians("tan", x, mode)? {
        Some(r) => {
            if r.cos().abs() < TAN_POLE_TOLERANCE {
                return Err(undefined());
            }
            Ok(Value::Real(r.tan()))
        }
        None => match x {
            Value::Complex(z) if z.cos().norm() < TAN_POLE_TOLERANCE => Err(undefined()),
            _ => elementwise("tan", x, f64::tan, Complex64::tan),
        },
    }
}

fn inverse_trig(
    name: &str,
    x: &Value,
    mode: AngleMode,
    real: fn(f64) -> f64,
    complex: fn(Complex64) -> Complex64,
    in_domain: fn(f64) -> bool,
) -> Result<Value, RunError> {
    match x {
        Value::Real(r) => {
            if !in_domain(*r) {
                return Err(RunError::evaluation(format!(
                    "{name}: argument must be between -1 and 1"
                )));
            }
            Ok(Value::Real(mode.from_radians(real(*r))))
        }
        Value::Complex(_) if mode == AngleMode::Deg => Err(complex_in_degrees(name)),
        _ => elementwise(name, x, real, complex),
    }
}

/// Natural logarithm, or logarithm to `base`.
fn logarithm(name: &str, x: &Value, base: Option<f64>) -> Result<Value, RunError> {
    if let Some(base) = base {
        if base <= 0.0 || base == 1.0 {
            return Err(RunError::evaluation(format!(
                "{name}: base must be positive and not 1"
            )));
        }
    }
    if x.is_zero() && !matches!(x, Value::Quantity(_)) {
        return Err(RunError::evaluation(format!("{name}: logarithm of zero")));
    }
    real_domain(name, x, |r| r > 0.0, "logarithm of a negative number")?;
    match base {
        None => elementwise(name, x, f64::ln, Complex64::ln),
        Some(b) => elementwise(name, x, |r| r.ln() / b.ln(), |z| z.ln() / b.ln()),
    }
}

/// Variadic min/max over plain numbers, or over quantities of one class (result in the
/// finest unit among the arguments).
fn extremum(name: &str, args: &[Value], pick: fn(f64, f64) -> f64) -> Result<Value, RunError> {
    let Some(first) = args.first() else {
        return Err(arity(name, "at least 1 argument", 0));
    };
    match first {
        Value::Quantity(q) => {
            let quantities = args
                .iter()
                .map(|a| match a {
                    Value::Quantity(q) => Ok(*q),
                    other => Err(RunError::unit_mismatch(format!(
                        "{name}: cannot compare a quantity in {} with {}",
                        q.unit(),
                        other.describe()
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            let unit = quantities
                .iter()
                .map(Quantity::unit)
                .fold(q.unit(), Quantity::smaller_unit);
            let mut best: Option<f64> = None;
            for q in &quantities {
                let m = q.convert_to(unit)?.magnitude();
                best = Some(best.map_or(m, |b| pick(b, m)));
            }
            Ok(Value::quantity(best.unwrap_or_default(), unit))
        }
        _ => {
            let mut best = real_arg(name, first)?;
            for a in &args[1..] {
                best = pick(best, real_arg(name, a)?);
            }
            Ok(Value::Real(best))
        }
    }
}
