//! Custom lexer: produces Ident or FuncIdent (identifier followed by "(") so the parser
//! and the normalizer can tell `sin(1)` from `sin` as a name.
//!
//! Shared by the normalizer (which re-renders tokens from their source spans) and the
//! parser, so both agree on what a token is.

use ordered_float::OrderedFloat;
use std::str::FromStr;
use thiserror::Error;

pub type Spanned<Tok, Loc, Error> = Result<(Loc, Tok, Loc), Error>;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(OrderedFloat<f64>),
    Ident(String),
    /// Identifier that is immediately followed by "(" (function call).
    FuncIdent(String),
    LParen,
    RParen,
    Plus,
    Minus,
    /// `*` or `×`
    Star,
    /// `/` or `÷`
    Slash,
    Caret,
    Comma,
    Eq,
    /// Parallel combination `||`.
    Parallel,
    /// "to" keyword for unit conversion (e.g. "10 km to m").
    To,
}

impl Tok {
    /// Binary operators, `=`, `,` and `||`: tokens after which a `+`/`-` is unary.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            Tok::Plus
                | Tok::Minus
                | Tok::Star
                | Tok::Slash
                | Tok::Caret
                | Tok::Comma
                | Tok::Eq
                | Tok::Parallel
                | Tok::To
        )
    }
}

impl std::fmt::Display for Tok {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tok::Num(n) => write!(f, "{}", n.0),
            Tok::Ident(s) | Tok::FuncIdent(s) => f.write_str(s),
            Tok::LParen => f.write_str("("),
            Tok::RParen => f.write_str(")"),
            Tok::Plus => f.write_str("+"),
            Tok::Minus => f.write_str("-"),
            Tok::Star => f.write_str("*"),
            Tok::Slash => f.write_str("/"),
            Tok::Caret => f.write_str("^"),
            Tok::Comma => f.write_str(","),
            Tok::Eq => f.write_str("="),
            Tok::Parallel => f.write_str("||"),
            Tok::To => f.write_str("to"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexicalError {
    #[error("invalid number '{0}'")]
    InvalidFloat(String),

    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
}

pub struct Lexer<'input> {
    input: &'input str,
    pos: usize,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        Lexer { input, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        let skipped: usize = rest
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        self.pos += skipped;
    }

    fn peek_next_non_space(&self) -> Option<char> {
        let rest = &self.input[self.pos..];
        rest.chars().find(|c| !c.is_whitespace())
    }

    fn is_ident_start(c: char) -> bool {
        c.is_alphabetic() || c == '_' || c == '°'
    }

    fn take_ident(&mut self) -> Option<String> {
        let rest = &self.input[self.pos..];
        let mut end = 0;
        for (i, c) in rest.char_indices() {
            if i == 0 {
                if Self::is_ident_start(c) {
                    end = i + c.len_utf8();
                } else {
                    return None;
                }
            } else if c.is_alphanumeric() || c == '_' {
                end = i + c.len_utf8();
            } else {
                break;
            }
        }
        if end > 0 {
            let s = rest[..end].to_string();
            self.pos += end;
            Some(s)
        } else {
            None
        }
    }

    fn take_num(&mut self) -> Option<Result<OrderedFloat<f64>, LexicalError>> {
        let rest = &self.input[self.pos..];
        let mut end = 0;
        let bytes = rest.as_bytes();
        let n = bytes.len();
        // [0-9]+\.?[0-9]* or [0-9]*\.[0-9]+
        if end < n && bytes[end].is_ascii_digit() {
            while end < n && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end < n && bytes[end] == b'.' {
                end += 1;
                while end < n && bytes[end].is_ascii_digit() {
                    end += 1;
                }
            }
        } else if end < n && bytes[end] == b'.' && end + 1 < n && bytes[end + 1].is_ascii_digit() {
            end += 1;
            while end < n && bytes[end].is_ascii_digit() {
                end += 1;
            }
        } else {
            return None;
        }
        // Optional exponent
        if end < n && (bytes[end] == b'e' || bytes[end] == b'E') {
            let exp_start = end;
            end += 1;
            if end < n && (bytes[end] == b'+' || bytes[end] == b'-') {
                end += 1;
            }
            if end < n && bytes[end].is_ascii_digit() {
                while end < n && bytes[end].is_ascii_digit() {
                    end += 1;
                }
            } else {
                end = exp_start; // "2e" is 2 followed by the constant e
            }
        }
        let s = &rest[..end];
        self.pos += end;
        match f64::from_str(s) {
            Ok(v) => Some(Ok(OrderedFloat::from(v))),
            Err(_) => Some(Err(LexicalError::InvalidFloat(s.to_string()))),
        }
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Spanned<Tok, usize, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.input[self.pos..];

        // "to" only as a whole word, so "total" and "tol" stay identifiers
        if rest.starts_with("to")
            && !rest[2..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.pos += 2;
            return Some(Ok((start, Tok::To, self.pos)));
        }
        if rest.starts_with("||") {
            self.pos += 2;
            return Some(Ok((start, Tok::Parallel, self.pos)));
        }

        let c = rest.chars().next()?;
        self.pos += c.len_utf8();

        let tok = match c {
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            '+' => Tok::Plus,
            '-' => Tok::Minus,
            '*' | '×' => Tok::Star,
            '/' | '÷' => Tok::Slash,
            '^' => Tok::Caret,
            ',' => Tok::Comma,
            '=' => Tok::Eq,
            '0'..='9' | '.' => {
                self.pos -= c.len_utf8();
                match self.take_num() {
                    Some(Ok(n)) => Tok::Num(n),
                    Some(Err(e)) => return Some(Err(e)),
                    None => return Some(Err(LexicalError::UnexpectedChar(c))),
                }
            }
            c if Self::is_ident_start(c) => {
                self.pos -= c.len_utf8(); // put back
                let s = self.take_ident()?;
                if self.peek_next_non_space() == Some('(') {
                    Tok::FuncIdent(s)
                } else {
                    Tok::Ident(s)
                }
            }
            _ => return Some(Err(LexicalError::UnexpectedChar(c))),
        };
        let end = self.pos;
        Some(Ok((start, tok, end)))
    }
}

/// Tokenize a whole line, stopping at the first lexical error.
pub fn tokenize(input: &str) -> Result<Vec<(usize, Tok, usize)>, LexicalError> {
    Lexer::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(input: &str) -> Vec<Tok> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|(_, t, _)| t)
            .collect()
    }

    fn num(x: f64) -> Tok {
        Tok::Num(OrderedFloat(x))
    }

    #[test]
    fn function_names_are_func_idents() {
        assert_eq!(
            toks("sin (30) + x"),
            vec![
                Tok::FuncIdent("sin".into()),
                Tok::LParen,
                num(30.0),
                Tok::RParen,
                Tok::Plus,
                Tok::Ident("x".into()),
            ]
        );
    }

    #[test]
    fn to_is_a_whole_word() {
        assert_eq!(
            toks("5 km to mi"),
            vec![num(5.0), Tok::Ident("km".into()), Tok::To, Tok::Ident("mi".into())]
        );
        assert_eq!(toks("total"), vec![Tok::Ident("total".into())]);
    }

    #[test]
    fn parallel_and_unicode_operators() {
        assert_eq!(
            toks("10||20 × 2 ÷ 4"),
            vec![num(10.0), Tok::Parallel, num(20.0), Tok::Star, num(2.0), Tok::Slash, num(4.0)]
        );
    }

    #[test]
    fn unicode_identifiers() {
        assert_eq!(toks("π"), vec![Tok::Ident("π".into())]);
        assert_eq!(toks("90°"), vec![num(90.0), Tok::Ident("°".into())]);
        assert_eq!(toks("20 °C"), vec![num(20.0), Tok::Ident("°C".into())]);
        assert_eq!(toks("2 m³"), vec![num(2.0), Tok::Ident("m³".into())]);
    }

    #[test]
    fn exponent_needs_digits() {
        assert_eq!(toks("1.5e3"), vec![num(1500.0)]);
        assert_eq!(toks("2e"), vec![num(2.0), Tok::Ident("e".into())]);
        assert_eq!(toks(".5"), vec![num(0.5)]);
    }

    #[test]
    fn spans_cover_source() {
        let spanned = tokenize("ab + 12").unwrap();
        assert_eq!(spanned[0].0, 0);
        assert_eq!(spanned[0].2, 2);
        assert_eq!(spanned[2], (5, num(12.0), 7));
    }

    #[test]
    fn single_bar_is_an_error() {
        assert_eq!(tokenize("1 | 2").unwrap_err(), LexicalError::UnexpectedChar('|'));
        assert_eq!(tokenize("3 $").unwrap_err().to_string(), "unexpected character '$'");
    }
}
