use bitwise_lang::format::clamp_precision;
use bitwise_lang::{evaluate_document, export_document, AngleMode, Normalized};
use wasm_bindgen::prelude::*;

fn parse_mode(mode: &str) -> Result<AngleMode, JsValue> {
    mode.parse::<AngleMode>().map_err(|e| JsValue::from_str(&e))
}

/// Evaluate a whole document. Returns the per-line results as JSON:
/// `{"results": [...], "display": [...], "variable_count": n}`.
#[wasm_bindgen]
pub fn evaluate(text: &str, angle_mode: &str, precision: i32) -> Result<String, JsValue> {
    let mode = parse_mode(angle_mode)?;
    let outcome = evaluate_document(text, mode, clamp_precision(precision.into()));
    serde_json::to_string(&outcome).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Normalized form of one line; empty for blank and comment-only lines.
#[wasm_bindgen]
pub fn normalize(line: &str) -> String {
    match bitwise_lang::normalize(line) {
        Normalized::Text(text) => text,
        Normalized::Empty => String::new(),
    }
}

/// Plain-text export: each line padded to `width` columns, then its result.
#[wasm_bindgen]
pub fn export(text: &str, angle_mode: &str, precision: i32, width: u32) -> Result<String, JsValue> {
    let mode = parse_mode(angle_mode)?;
    let outcome = evaluate_document(text, mode, clamp_precision(precision.into()));
    Ok(export_document(text, &outcome.display, width as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_returns_json() {
        let json = evaluate("a = 2\na * 3\n", "DEG", 5).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["display"][1], "6");
        assert_eq!(v["variable_count"], 1);
        assert_eq!(v["results"][2], "empty");
        assert_eq!(v["results"][0]["value"]["type"], "real");
    }

    #[test]
    fn precision_is_clamped() {
        let json = evaluate("1/3", "rad", 99).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["display"][0], "0.3333333333");
    }

    #[test]
    fn normalize_line() {
        assert_eq!(normalize("2pi // x"), "2 * pi");
        assert_eq!(normalize("  // only a comment"), "");
    }

    #[test]
    fn export_layout() {
        assert_eq!(export("1+1", "DEG", 5, 5).unwrap(), "1+1   2");
    }
}
