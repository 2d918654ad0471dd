//! Plain-text export: each input line padded to a fixed column, followed by its result.

use crate::document::split_lines;

/// Column the results start at.
pub const DEFAULT_EXPORT_WIDTH: usize = 50;

/// Lay out `text` next to its per-line display strings. Lines longer than `width` are
/// kept whole; missing or empty results leave the padded line alone.
pub fn export_document(text: &str, display: &[Option<String>], width: usize) -> String {
    split_lines(text)
        .iter()
        .map(|line| {
            let result = display.get(line.index).and_then(|d| d.as_deref());
            match result {
                Some(result) => format!("{:<width$} {result}", line.raw_text),
                None => format!("{:<width$}", line.raw_text),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
