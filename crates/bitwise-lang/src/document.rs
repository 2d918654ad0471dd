//! Document driver: one evaluation pass over every line of a document.
//!
//! Each pass starts from an empty environment and threads it through the lines in
//! order, so a line sees every assignment above it and nothing below it. Errors stay
//! on their line.

use crate::angle::AngleMode;
use crate::detection::{classify, trailing_unit_prefix, LineShape};
use crate::environment::Environment;
use crate::error::{ErrorKind, RunError};
use crate::eval::execute;
use crate::format::{format_error, format_value, MAX_PRECISION};
use crate::normalize::{normalize_with_registry, strip_comment, Normalized};
use crate::parser::parse;
use crate::unit_registry::{default_registry, UnitRegistry};
use crate::value::Value;
use serde::Serialize;
use tracing::{debug, trace};

/// One line of the document snapshot being evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Line {
    pub index: usize,
    pub raw_text: String,
    /// `raw_text` without its comment.
    pub source_text: String,
}

/// Split a document into lines; blank lines keep their position.
pub fn split_lines(text: &str) -> Vec<Line> {
    text.split('\n')
        .enumerate()
        .map(|(index, raw)| {
            let raw = raw.strip_suffix('\r').unwrap_or(raw);
            Line {
                index,
                raw_text: raw.to_string(),
                source_text: strip_comment(raw).to_string(),
            }
        })
        .collect()
}

/// Outcome of one line.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationResult {
    Value(Value),
    Error { kind: ErrorKind, message: String },
    /// Blank, comment-only, or still being typed.
    Empty,
}

impl EvaluationResult {
    pub fn value(&self) -> Option<&Value> {
        match self {
            EvaluationResult::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, EvaluationResult::Empty)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, EvaluationResult::Error { .. })
    }

    /// Display string, `None` for empty lines.
    pub fn display(&self, precision: u8) -> Option<String> {
        match self {
            EvaluationResult::Value(v) => Some(format_value(v, precision)),
            EvaluationResult::Error { message, .. } => Some(format_error(message)),
            EvaluationResult::Empty => None,
        }
    }
}

impl From<RunError> for EvaluationResult {
    fn from(e: RunError) -> Self {
        EvaluationResult::Error {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

impl From<Result<Value, RunError>> for EvaluationResult {
    fn from(r: Result<Value, RunError>) -> Self {
        match r {
            Ok(v) => EvaluationResult::Value(v),
            Err(e) => e.into(),
        }
    }
}

/// Results of one pass over a document snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DocumentEvaluation {
    /// One per line, in line order.
    pub results: Vec<EvaluationResult>,
    /// Formatted results at the pass's precision.
    pub display: Vec<Option<String>>,
    pub variable_count: usize,
    #[serde(skip)]
    pub environment: Environment,
}

/// Evaluate a whole document with the default unit registry.
pub fn evaluate_document(text: &str, mode: AngleMode, precision: u8) -> DocumentEvaluation {
    evaluate_document_with_registry(text, mode, precision, default_registry())
}

/// Like [evaluate_document], but with a custom unit registry.
pub fn evaluate_document_with_registry(
    text: &str,
    mode: AngleMode,
    precision: u8,
    registry: &UnitRegistry,
) -> DocumentEvaluation {
    let precision = precision.min(MAX_PRECISION);
    let lines = split_lines(text);
    let mut env = Environment::new();
    let mut results = Vec::with_capacity(lines.len());
    for line in &lines {
        let result = evaluate_line(&line.raw_text, &mut env, registry, mode);
        trace!(line = line.index, ?result, "line evaluated");
        results.push(result);
    }
    let display = results.iter().map(|r| r.display(precision)).collect();
    debug!(
        lines = lines.len(),
        variables = env.len(),
        mode = %mode,
        "document evaluated"
    );
    DocumentEvaluation {
        results,
        display,
        variable_count: env.len(),
        environment: env,
    }
}

/// Evaluate one raw line against the running environment.
pub fn evaluate_line(
    raw: &str,
    env: &mut Environment,
    registry: &UnitRegistry,
    mode: AngleMode,
) -> EvaluationResult {
    let shape = classify(raw);
    if matches!(shape, LineShape::Blank | LineShape::Incomplete) {
        return EvaluationResult::Empty;
    }
    let text = match normalize_with_registry(raw, registry) {
        Normalized::Empty => return EvaluationResult::Empty,
        Normalized::Text(text) => text,
    };
    let outcome = parse(&text, registry)
        .map_err(RunError::from)
        .and_then(|statement| execute(&statement, env, registry, mode));
    match outcome {
        Err(_) if shape == LineShape::Trailing => EvaluationResult::Empty,
        Err(RunError::UnknownIdentifier(name))
            if trailing_unit_prefix(raw, registry).as_deref() == Some(name.as_str()) =>
        {
            EvaluationResult::Empty
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::UnitId;

    fn eval(text: &str) -> DocumentEvaluation {
        evaluate_document(text, AngleMode::Deg, 5)
    }

    #[test]
    fn splits_lines_keeping_blanks() {
        let lines = split_lines("a = 1\r\n\n// c\nb // d");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].raw_text, "a = 1");
        assert_eq!(lines[1].raw_text, "");
        assert_eq!(lines[3].source_text, "b ");
        assert_eq!(lines[3].index, 3);
    }

    #[test]
    fn assignments_flow_downward() {
        let doc = eval("x = 10\ny = 20\nx + y");
        assert_eq!(
            doc.results,
            vec![
                EvaluationResult::Value(Value::Real(10.0)),
                EvaluationResult::Value(Value::Real(20.0)),
                EvaluationResult::Value(Value::Real(30.0)),
            ]
        );
        assert_eq!(doc.variable_count, 2);
        assert_eq!(doc.display[2].as_deref(), Some("30"));
    }

    #[test]
    fn later_assignments_are_not_visible_above() {
        let doc = eval("y\ny = 1");
        assert!(doc.results[0].is_error());
        assert_eq!(doc.results[1], EvaluationResult::Value(Value::Real(1.0)));
    }

    #[test]
    fn errors_stay_on_their_line() {
        let doc = eval("a = 2\n1 / 0\nfoo + 1\na * 3");
        assert_eq!(doc.display[1].as_deref(), Some("Error: division by zero"));
        assert_eq!(
            doc.results[2],
            EvaluationResult::Error {
                kind: ErrorKind::UnknownIdentifier,
                message: "unknown identifier 'foo'".to_string(),
            }
        );
        assert_eq!(doc.results[3], EvaluationResult::Value(Value::Real(6.0)));
    }

    #[test]
    fn failed_assignment_keeps_earlier_binding() {
        let doc = eval("x = 1\nx = 1 / 0\nx");
        assert!(doc.results[1].is_error());
        assert_eq!(doc.results[2], EvaluationResult::Value(Value::Real(1.0)));
    }

    #[test]
    fn blank_and_incomplete_lines_are_empty() {
        let doc = eval("\n// comment\nsqrt(\n1 +\n5 km to\n2 * 3");
        assert!(doc.results[..5].iter().all(EvaluationResult::is_empty));
        assert_eq!(doc.display[0], None);
        assert_eq!(doc.results[5], EvaluationResult::Value(Value::Real(6.0)));
    }

    #[test]
    fn trailing_whitespace_hides_only_errors() {
        let doc = eval("5 \nfoo ");
        assert_eq!(doc.results[0], EvaluationResult::Value(Value::Real(5.0)));
        assert_eq!(doc.results[1], EvaluationResult::Empty);
    }

    #[test]
    fn partially_typed_unit_is_empty() {
        let doc = eval("5 k\nk = 2\n5 k\n5 zz");
        assert_eq!(doc.results[0], EvaluationResult::Empty);
        assert_eq!(doc.results[2], EvaluationResult::Value(Value::Real(10.0)));
        assert_eq!(doc.display[3].as_deref(), Some("Error: unknown identifier 'zz'"));
    }

    #[test]
    fn parallel_groups_implicit_products() {
        let doc = eval("x = 10\n2x || 3");
        let v = doc.results[1].value().unwrap();
        assert!(v.approx_eq(&Value::Real(60.0 / 23.0), 1e-12));
        assert_eq!(doc.display[1].as_deref(), Some("2.6087"));
    }

    #[test]
    fn excess_close_paren_is_an_error() {
        let doc = eval("(1 + 2))");
        assert!(matches!(
            doc.results[0],
            EvaluationResult::Error { kind: ErrorKind::Parse, .. }
        ));
    }

    #[test]
    fn reserved_constant_survives_assignment_attempt() {
        let doc = eval("pi = 3\npi");
        assert!(matches!(
            doc.results[0],
            EvaluationResult::Error { kind: ErrorKind::Assignment, .. }
        ));
        assert_eq!(doc.display[1].as_deref(), Some("3.14159"));
        assert_eq!(doc.variable_count, 0);
    }

    #[test]
    fn unit_lines() {
        let doc = eval("d = 5 km to mi\nd to km");
        let back = doc.results[1].value().unwrap();
        assert!(back.approx_eq(&Value::quantity(5.0, UnitId::Kilometer), 1e-9));
        assert_eq!(doc.display[0].as_deref(), Some("3.10686 mi"));
    }

    #[test]
    fn precision_changes_display_only() {
        let low = evaluate_document("10 || 20", AngleMode::Deg, 3);
        let high = evaluate_document("10 || 20", AngleMode::Deg, 10);
        assert_eq!(low.results, high.results);
        assert_eq!(low.display[0].as_deref(), Some("6.667"));
        assert_eq!(high.display[0].as_deref(), Some("6.6666666667"));
    }

    #[test]
    fn serializes_results() {
        let doc = eval("1 + 1\n\nx");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["variable_count"], 0);
        assert_eq!(json["results"][1], "empty");
        assert_eq!(json["results"][2]["error"]["kind"], "UnknownIdentifier");
        assert_eq!(json["display"][0], "2");
        assert!(json.get("environment").is_none());
    }
}
