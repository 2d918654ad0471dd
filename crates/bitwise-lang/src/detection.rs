//! Incomplete-line detection.
//!
//! Decides whether a line looks like it is still being typed, so the driver can show
//! nothing instead of an error that will disappear on the next keystroke.

use crate::lexer::{tokenize, Tok};
use crate::normalize::{clean, strip_comment};
use crate::unit_registry::UnitRegistry;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Ends in a binary operator, `=`, `,` or `||`.
    static ref TRAILING_OPERATOR: Regex = Regex::new(r"[-+*/^=,|×÷]\s*$").unwrap();

    /// Ends in the conversion keyword with no target yet.
    static ref DANGLING_TO: Regex = Regex::new(r"(?:^|\s)to\s*$").unwrap();
}

/// How a raw line should be treated by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineShape {
    /// Nothing but whitespace and comments.
    Blank,
    /// Clearly mid-keystroke: never evaluated, shown as empty.
    Incomplete,
    /// Ends in trailing whitespace: evaluated, but a failure is shown as empty.
    Trailing,
    Complete,
}

/// Classify a raw document line.
pub fn classify(raw: &str) -> LineShape {
    let text = clean(raw);
    if text.is_empty() {
        return LineShape::Blank;
    }
    if has_unclosed_paren(&text) || TRAILING_OPERATOR.is_match(&text) || DANGLING_TO.is_match(&text)
    {
        return LineShape::Incomplete;
    }
    // A comment ends the expression, so whitespace before it is not "still typing".
    let code = strip_comment(raw);
    if code.len() == raw.len() && raw.ends_with(char::is_whitespace) {
        return LineShape::Trailing;
    }
    LineShape::Complete
}

/// More `(` than `)` at the end. An excess `)` is a genuine error, not an unfinished line.
pub fn has_unclosed_paren(text: &str) -> bool {
    let mut depth: i64 = 0;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth > 0
}

/// A number followed by the start of a unit name (`5 k` while typing `5 km`).
/// Returns the partial name so the driver can hide the matching lookup error.
pub fn trailing_unit_prefix(raw: &str, registry: &UnitRegistry) -> Option<String> {
    let tokens = tokenize(&clean(raw)).ok()?;
    match tokens.as_slice() {
        [.., (_, Tok::Num(_), _), (_, Tok::Ident(name), _)] if registry.is_unit_prefix(name) => {
            Some(name.clone())
        }
        _ => None,
    }
}
