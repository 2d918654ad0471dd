use serde::Serialize;
use thiserror::Error;

use crate::quantity::QuantityError;

/// Errors that can occur when evaluating one line.
///
/// Every variant is local to the line that produced it; the document driver turns
/// them into [crate::EvaluationResult::Error] values and keeps going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("{0}")]
    Quantity(#[from] QuantityError),

    #[error("{0}")]
    UnitMismatch(String),

    #[error("cannot assign to reserved name '{0}'")]
    ReservedName(String),

    #[error("{0}")]
    BadArguments(String),

    #[error("{0}")]
    Evaluation(String),
}

impl RunError {
    pub fn evaluation(message: impl Into<String>) -> Self {
        RunError::Evaluation(message.into())
    }

    pub fn unit_mismatch(message: impl Into<String>) -> Self {
        RunError::UnitMismatch(message.into())
    }

    pub fn division_by_zero() -> Self {
        RunError::Evaluation("division by zero".to_string())
    }

    /// Taxonomy bucket shown to the user.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunError::Parse(_) => ErrorKind::Parse,
            RunError::UnknownIdentifier(_)
            | RunError::UnknownUnit(_)
            | RunError::UnknownFunction(_) => ErrorKind::UnknownIdentifier,
            RunError::Quantity(QuantityError::DivisionByZero) => ErrorKind::Evaluation,
            RunError::Quantity(_) | RunError::UnitMismatch(_) => ErrorKind::UnitMismatch,
            RunError::ReservedName(_) => ErrorKind::Assignment,
            RunError::BadArguments(_) | RunError::Evaluation(_) => ErrorKind::Evaluation,
        }
    }
}

/// Error classes of the line evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Parse,
    UnknownIdentifier,
    UnitMismatch,
    Assignment,
    Evaluation,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Parse => "parse error",
            ErrorKind::UnknownIdentifier => "unknown identifier",
            ErrorKind::UnitMismatch => "unit mismatch",
            ErrorKind::Assignment => "assignment error",
            ErrorKind::Evaluation => "evaluation error",
        };
        f.write_str(name)
    }
}

/// Parse error for expression strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(RunError::from(ParseError::new("x")).kind(), ErrorKind::Parse);
        assert_eq!(
            RunError::UnknownFunction("foo".into()).kind(),
            ErrorKind::UnknownIdentifier
        );
        assert_eq!(RunError::ReservedName("pi".into()).kind(), ErrorKind::Assignment);
        assert_eq!(RunError::division_by_zero().kind(), ErrorKind::Evaluation);
        assert_eq!(
            RunError::from(QuantityError::DivisionByZero).kind(),
            ErrorKind::Evaluation
        );
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            RunError::ReservedName("pi".into()).to_string(),
            "cannot assign to reserved name 'pi'"
        );
        assert_eq!(RunError::UnknownIdentifier("foo".into()).to_string(), "unknown identifier 'foo'");
    }
}
