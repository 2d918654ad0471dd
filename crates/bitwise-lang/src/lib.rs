//! bitwise: line-oriented calculator language for a scratchpad editor.
//!
//! A document is evaluated line by line: each line is normalized, parsed and evaluated
//! against the variables assigned above it. Values are real numbers, complex numbers
//! or unit quantities; trigonometry follows the selected [AngleMode].

pub mod angle;
pub mod detection;
pub mod dimension;
pub mod document;
pub mod environment;
pub mod error;
pub mod eval;
pub mod export;
pub mod format;
pub mod functions;
pub mod ir;
pub mod lexer;
pub mod normalize;
pub mod parser;
pub mod quantity;
pub mod session;
pub mod store;
pub mod unit;
pub mod unit_registry;
pub mod value;

pub use angle::AngleMode;
pub use dimension::Dimension;
pub use document::{
    evaluate_document, evaluate_document_with_registry, evaluate_line, DocumentEvaluation,
    EvaluationResult, Line,
};
pub use environment::Environment;
pub use error::{ErrorKind, ParseError, RunError};
pub use export::{export_document, DEFAULT_EXPORT_WIDTH};
pub use format::{format_value, DEFAULT_PRECISION, MAX_PRECISION};
pub use ir::{ExprDef, Statement};
pub use normalize::{normalize, Normalized};
pub use parser::parse;
pub use quantity::{Quantity, QuantityError};
pub use session::{PassToken, Session};
pub use store::{MemSessionStore, SavedSession, SessionStore};
pub use unit::UnitId;
pub use unit_registry::{default_registry, UnitRegistry};
pub use value::Value;

/// Evaluate a single line in DEG mode with no variables.
///
/// Unlike the document driver this reports every failure, including lines that look
/// unfinished. Blank input is a parse error.
pub fn run(input: &str) -> Result<Value, RunError> {
    run_with_mode(input, AngleMode::Deg)
}

/// Like [run], with an explicit angle mode.
pub fn run_with_mode(input: &str, mode: AngleMode) -> Result<Value, RunError> {
    let registry = default_registry();
    let text = match normalize::normalize_with_registry(input, registry) {
        Normalized::Text(text) => text,
        Normalized::Empty => return Err(ParseError::new("empty expression").into()),
    };
    let statement = parse(&text, registry)?;
    let mut env = Environment::new();
    eval::execute(&statement, &mut env, registry, mode)
}
