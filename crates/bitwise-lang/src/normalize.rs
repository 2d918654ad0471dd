//! Line normalizer: comment stripping, whitespace cleanup and token rewrites
//! (`a || b` → `parallel(a, b)`, implicit multiplication, imaginary coefficients).
//!
//! The rewrites run on the lexer's tokens and the result is rendered back with one
//! canonical spacing, so `normalize(normalize(s)) == normalize(s)`.

use crate::lexer::{tokenize, Tok};
use crate::unit_registry::{default_registry, UnitRegistry};

/// Start of a line comment.
pub const COMMENT_MARKER: &str = "//";

/// Name of the call that `||` is rewritten into.
pub const PARALLEL_FN: &str = "parallel";

/// Name of the imaginary unit.
pub const IMAGINARY_UNIT: &str = "i";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Normalized {
    /// Nothing left after removing comments and whitespace.
    Empty,
    Text(String),
}

/// Text before the first `//`.
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKER) {
        Some(at) => &line[..at],
        None => line,
    }
}

/// Drop the comment, trim, and collapse whitespace runs (non-breaking spaces included).
pub fn clean(line: &str) -> String {
    strip_comment(line)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize(line: &str) -> Normalized {
    normalize_with_registry(line, default_registry())
}

/// Normalize with a custom unit registry (unit names suppress implicit multiplication).
pub fn normalize_with_registry(line: &str, registry: &UnitRegistry) -> Normalized {
    let cleaned = clean(line);
    if cleaned.is_empty() {
        return Normalized::Empty;
    }
    let tokens = match tokenize(&cleaned) {
        Ok(spanned) => spanned
            .into_iter()
            .map(|(start, tok, end)| Piece::from_source(tok, &cleaned[start..end]))
            .collect::<Vec<_>>(),
        // Leave it to the parser to report
        Err(_) => return Normalized::Text(cleaned),
    };
    let tokens = rewrite_parallel(tokens, registry);
    let tokens = insert_implicit_multiplication(tokens, registry);
    Normalized::Text(render(&tokens))
}

/// Token plus the text it renders as. Numbers keep their source spelling (`1e3`, `.5`).
#[derive(Clone, Debug, PartialEq)]
struct Piece {
    tok: Tok,
    text: String,
}

impl Piece {
    fn from_source(tok: Tok, source: &str) -> Self {
        let text = match tok {
            Tok::Num(_) => source.to_string(),
            _ => tok.to_string(),
        };
        Piece { tok, text }
    }

    fn synthetic(tok: Tok) -> Self {
        let text = tok.to_string();
        Piece { tok, text }
    }
}

/// Rewrite `a || b` into `parallel(a, b)` until no rewritable `||` remains.
/// Operands are primaries, so the leftmost pair folds first (left-associative).
fn rewrite_parallel(mut tokens: Vec<Piece>, registry: &UnitRegistry) -> Vec<Piece> {
    loop {
        let site = tokens
            .iter()
            .enumerate()
            .filter(|(_, p)| p.tok == Tok::Parallel)
            .find_map(|(at, _)| {
                let left = operand_start(&tokens, at, registry)?;
                let right = operand_end(&tokens, at, registry)?;
                Some((left, at, right))
            });
        let Some((left, at, right)) = site else {
            return tokens;
        };
        let mut call = Vec::with_capacity(right - left + 3);
        call.push(Piece::synthetic(Tok::FuncIdent(PARALLEL_FN.to_string())));
        call.push(Piece::synthetic(Tok::LParen));
        call.extend_from_slice(&tokens[left..at]);
        call.push(Piece::synthetic(Tok::Comma));
        call.extend_from_slice(&tokens[at + 1..right]);
        call.push(Piece::synthetic(Tok::RParen));
        tokens.splice(left..right, call);
    }
}

/// A number glued to a name by implicit multiplication (`5i`, `2x`, `2pi`) is one
/// operand. Unit names are suffixes, not factors.
fn is_coefficient_name(name: &str, registry: &UnitRegistry) -> bool {
    name == IMAGINARY_UNIT || !registry.is_unit(name)
}

/// Index of the first token of the primary that ends right before `at`.
fn operand_start(tokens: &[Piece], at: usize, registry: &UnitRegistry) -> Option<usize> {
    let last = at.checked_sub(1)?;
    match &tokens[last].tok {
        Tok::Ident(name)
            if is_coefficient_name(name, registry)
                && last > 0
                && matches!(tokens[last - 1].tok, Tok::Num(_)) =>
        {
            Some(last - 1)
        }
        Tok::Num(_) | Tok::Ident(_) => Some(last),
        Tok::RParen => {
            let mut depth = 0usize;
            for i in (0..=last).rev() {
                match tokens[i].tok {
                    Tok::RParen => depth += 1,
                    Tok::LParen => {
                        depth -= 1;
                        if depth == 0 {
                            let is_call = i > 0 && matches!(tokens[i - 1].tok, Tok::FuncIdent(_));
                            return Some(if is_call { i - 1 } else { i });
                        }
                    }
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}

/// Index one past the last token of the primary that starts right after `at`.
fn operand_end(tokens: &[Piece], at: usize, registry: &UnitRegistry) -> Option<usize> {
    let first = at + 1;
    let open = match &tokens.get(first)?.tok {
        Tok::Num(_) => {
            let coefficient = matches!(
                tokens.get(first + 1).map(|p| &p.tok),
                Some(Tok::Ident(name)) if is_coefficient_name(name, registry)
            );
            return Some(if coefficient { first + 2 } else { first + 1 });
        }
        Tok::Ident(_) => return Some(first + 1),
        Tok::LParen => first,
        Tok::FuncIdent(_) if matches!(tokens.get(first + 1)?.tok, Tok::LParen) => first + 1,
        _ => return None,
    };
    let mut depth = 0usize;
    for (i, piece) in tokens.iter().enumerate().skip(open) {
        match piece.tok {
            Tok::LParen => depth += 1,
            Tok::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Insert `*` between a number or `)` and a following name, call or `(`, and between `)`
/// and a number. Unit names (`5 km`, `90°`) and `to` are left alone; `2i` becomes `2 * i`.
fn insert_implicit_multiplication(tokens: Vec<Piece>, registry: &UnitRegistry) -> Vec<Piece> {
    let mut out: Vec<Piece> = Vec::with_capacity(tokens.len());
    for piece in tokens {
        if let Some(prev) = out.last() {
            if needs_star(&prev.tok, &piece.tok, registry) {
                out.push(Piece::synthetic(Tok::Star));
            }
        }
        out.push(piece);
    }
    out
}

fn needs_star(prev: &Tok, next: &Tok, registry: &UnitRegistry) -> bool {
    let after_value = matches!(prev, Tok::Num(_) | Tok::RParen);
    if !after_value {
        return false;
    }
    match next {
        Tok::Ident(name) if name == IMAGINARY_UNIT => true,
        Tok::Ident(name) | Tok::FuncIdent(name) => !registry.is_unit(name),
        Tok::LParen => true,
        Tok::Num(_) => matches!(prev, Tok::RParen),
        _ => false,
    }
}

/// `+`/`-` in prefix position: at the start, or after an operator, `(` or `,`.
fn is_unary(tokens: &[Piece], at: usize) -> bool {
    if !matches!(tokens[at].tok, Tok::Plus | Tok::Minus) {
        return false;
    }
    match at.checked_sub(1) {
        None => true,
        Some(prev) => tokens[prev].tok.is_operator() || tokens[prev].tok == Tok::LParen,
    }
}

fn render(tokens: &[Piece]) -> String {
    let mut out = String::new();
    for (i, piece) in tokens.iter().enumerate() {
        if i > 0 && !glued(tokens, i) {
            out.push(' ');
        }
        out.push_str(&piece.text);
    }
    out
}

/// Whether token `i` is written without a space before it.
fn glued(tokens: &[Piece], i: usize) -> bool {
    let prev = &tokens[i - 1].tok;
    let tok = &tokens[i].tok;
    match (prev, tok) {
        (Tok::LParen, _) => true,
        (_, Tok::RParen | Tok::Comma) => true,
        (Tok::FuncIdent(_), Tok::LParen) => true,
        (Tok::Num(_) | Tok::RParen, Tok::Ident(name)) if name == "°" => true,
        _ => is_unary(tokens, i - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        match normalize(s) {
            Normalized::Text(t) => t,
            Normalized::Empty => String::new(),
        }
    }

    #[test]
    fn blank_and_comment_only_lines_are_empty() {
        assert_eq!(normalize(""), Normalized::Empty);
        assert_eq!(normalize("   \t "), Normalized::Empty);
        assert_eq!(normalize("// just a note"), Normalized::Empty);
        assert_eq!(normalize("\u{a0}\u{a0}"), Normalized::Empty);
    }

    #[test]
    fn comments_and_whitespace() {
        assert_eq!(norm("  1   +\u{a0}2  // sum"), "1 + 2");
        assert_eq!(clean("a  b // c"), "a b");
        assert_eq!(strip_comment("x // y // z"), "x ");
    }

    #[test]
    fn parallel_becomes_call() {
        assert_eq!(norm("10 || 20"), "parallel(10, 20)");
        assert_eq!(norm("10||20"), "parallel(10, 20)");
        assert_eq!(norm("(1 + 2) || sqrt(4)"), "parallel((1 + 2), sqrt(4))");
        assert_eq!(norm("r1 || r2"), "parallel(r1, r2)");
        assert_eq!(norm("10 || 5i"), "parallel(10, 5 * i)");
        assert_eq!(norm("2i||3"), "parallel(2 * i, 3)");
    }

    #[test]
    fn parallel_keeps_implicit_products_together() {
        assert_eq!(norm("2x || 3"), "parallel(2 * x, 3)");
        assert_eq!(norm("3 || 2x"), "parallel(3, 2 * x)");
        assert_eq!(norm("2pi || 1"), "parallel(2 * pi, 1)");
        // a unit suffix is not a factor
        assert_eq!(norm("2 km || 3"), "2 km || 3");
    }

    #[test]
    fn parallel_chains_fold_left() {
        assert_eq!(norm("a || b || c"), "parallel(parallel(a, b), c)");
        assert_eq!(norm("2 * 10 || 20"), "2 * parallel(10, 20)");
    }

    #[test]
    fn dangling_parallel_is_left_for_the_parser() {
        assert_eq!(norm("|| 5"), "|| 5");
        assert_eq!(norm("5 ||"), "5 ||");
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(norm("2x"), "2 * x");
        assert_eq!(norm("2(3 + 1)"), "2 * (3 + 1)");
        assert_eq!(norm("(1 + 2)(3)"), "(1 + 2) * (3)");
        assert_eq!(norm("(2)3"), "(2) * 3");
        assert_eq!(norm("2 sin(30)"), "2 * sin(30)");
        assert_eq!(norm("2pi"), "2 * pi");
    }

    #[test]
    fn function_names_are_not_split() {
        assert_eq!(norm("sin(30)"), "sin(30)");
        assert_eq!(norm("sin (30)"), "sin(30)");
        assert_eq!(norm("atan2(1,1)"), "atan2(1, 1)");
        assert_eq!(norm("xy"), "xy");
    }

    #[test]
    fn imaginary_coefficients() {
        assert_eq!(norm("3+4i"), "3 + 4 * i");
        assert_eq!(norm("(1 + 1)i"), "(1 + 1) * i");
        assert_eq!(norm("i"), "i");
    }

    #[test]
    fn unit_suffixes_are_untouched() {
        assert_eq!(norm("5 km to mi"), "5 km to mi");
        assert_eq!(norm("5km to mi"), "5 km to mi");
        assert_eq!(norm("90°"), "90°");
        assert_eq!(norm("90 °"), "90°");
        assert_eq!(norm("20 °C to °F"), "20 °C to °F");
        assert_eq!(norm("(1 + 2) ft"), "(1 + 2) ft");
    }

    #[test]
    fn unary_signs_stay_attached() {
        assert_eq!(norm("-5"), "-5");
        assert_eq!(norm("2*-3"), "2 * -3");
        assert_eq!(norm("x=-3"), "x = -3");
        assert_eq!(norm("max(-1,- 2)"), "max(-1, -2)");
        assert_eq!(norm("1-2"), "1 - 2");
    }

    #[test]
    fn unicode_operators_are_canonicalized() {
        assert_eq!(norm("6 × 7 ÷ 2"), "6 * 7 / 2");
    }

    #[test]
    fn unlexable_text_passes_through_cleaned() {
        assert_eq!(norm("1  $  2"), "1 $ 2");
        assert_eq!(norm("a | b"), "a | b");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "",
            "  1+2 // c",
            "10 || 20",
            "a || b || c",
            "(a || b) || (c || d)",
            "2x + 3(4)",
            "3+4i",
            "sin (30)",
            "5km to mi",
            "90°",
            "x = -(2)(3)",
            "1e3 + .5",
            "2e",
            "--5",
            "1 | 2",
            "sqrt(",
            "(((",
            "))) 2 ((",
            "f(x)(y)",
            "5 ||",
            "1.5.3",
            "2 ° C",
            "x to (y)",
            "parallel(1, 2) || 3i",
            "2x || 3 || 4y",
            "\u{a0}pi\u{a0}= 3",
        ];
        for s in samples {
            let once = norm(s);
            assert_eq!(norm(&once), once, "not idempotent for {s:?}");
        }
    }
}
