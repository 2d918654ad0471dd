//! Parser: normalized line → [Statement].
//! Recursive descent over the lexer's tokens; a unit name after an operand is a unit
//! suffix, so the registry is passed in.

use crate::error::ParseError;
use crate::ir::{ExprDef, Statement};
use crate::lexer::{tokenize, Tok};
use crate::unit_registry::UnitRegistry;

/// Parse one line: `name = expr` or `expr`.
pub fn parse(input: &str, registry: &UnitRegistry) -> Result<Statement, ParseError> {
    let tokens: Vec<Tok> = tokenize(input)
        .map_err(|e| ParseError::new(e.to_string()))?
        .into_iter()
        .map(|(_, tok, _)| tok)
        .collect();
    let mut parser = Parser::new(&tokens, registry);
    let statement = parser.parse_statement()?;
    if let Some(tok) = parser.peek() {
        return Err(ParseError::new(format!("unexpected '{tok}'")));
    }
    Ok(statement)
}

struct Parser<'a> {
    tokens: &'a [Tok],
    pos: usize,
    registry: &'a UnitRegistry,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Tok], registry: &'a UnitRegistry) -> Self {
        Parser {
            tokens,
            pos: 0,
            registry,
        }
    }

    fn peek(&self) -> Option<&'a Tok> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&'a Tok> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<&'a Tok> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    /// Consume the current token if it equals `expected`.
    fn eat(&mut self, expected: &Tok) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Tok) -> Result<(), ParseError> {
        if self.eat(expected) {
            return Ok(());
        }
        Err(match self.peek() {
            Some(found) => ParseError::new(format!("expected '{expected}', found '{found}'")),
            None => ParseError::new(format!("expected '{expected}'")),
        })
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(tok) => ParseError::new(format!("unexpected '{tok}'")),
            None => ParseError::new("unexpected end of expression"),
        }
    }

    /// Assignment is a single level: `name = expr`, with no `=` inside `expr`.
    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        if let (Some(Tok::Ident(name)), Some(Tok::Eq)) = (self.peek(), self.peek_at(1)) {
            self.pos += 2;
            let value = self.parse_expr()?;
            return Ok(Statement::Assign {
                name: name.clone(),
                value,
            });
        }
        Ok(Statement::Expr(self.parse_expr()?))
    }

    fn parse_expr(&mut self) -> Result<ExprDef, ParseError> {
        self.parse_add_sub()
    }

    /// `+ -`, left-associative.
    fn parse_add_sub(&mut self) -> Result<ExprDef, ParseError> {
        let mut left = self.parse_mul_div()?;
        loop {
            if self.eat(&Tok::Plus) {
                let right = self.parse_mul_div()?;
                left = ExprDef::Add(Box::new(left), Box::new(right));
            } else if self.eat(&Tok::Minus) {
                let right = self.parse_mul_div()?;
                left = ExprDef::Sub(Box::new(left), Box::new(right));
            } else {
                return Ok(left);
            }
        }
    }

    /// `* /`, left-associative.
    fn parse_mul_div(&mut self) -> Result<ExprDef, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            if self.eat(&Tok::Star) {
                let right = self.parse_unary()?;
                left = ExprDef::Mul(Box::new(left), Box::new(right));
            } else if self.eat(&Tok::Slash) {
                let right = self.parse_unary()?;
                left = ExprDef::Div(Box::new(left), Box::new(right));
            } else {
                return Ok(left);
            }
        }
    }

    fn parse_unary(&mut self) -> Result<ExprDef, ParseError> {
        if self.eat(&Tok::Minus) {
            let inner = self.parse_unary()?;
            return Ok(ExprDef::Neg(Box::new(inner)));
        }
        if self.eat(&Tok::Plus) {
            return self.parse_unary();
        }
        self.parse_power()
    }

    /// `^`, right-associative; the exponent may carry its own sign (`2^-1`).
    fn parse_power(&mut self) -> Result<ExprDef, ParseError> {
        let base = self.parse_postfix()?;
        if self.eat(&Tok::Caret) {
            let exponent = self.parse_unary()?;
            return Ok(ExprDef::Pow(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    /// Unit suffix (`5 km`, `90°`) and any number of `to <unit>` conversions.
    fn parse_postfix(&mut self) -> Result<ExprDef, ParseError> {
        let mut expr = self.parse_primary()?;
        if let Some(Tok::Ident(name)) = self.peek() {
            if let Some(unit) = self.registry.lookup(name) {
                self.pos += 1;
                expr = ExprDef::WithUnit(Box::new(expr), unit);
            }
        }
        while self.eat(&Tok::To) {
            match self.advance() {
                Some(Tok::Ident(target)) => {
                    expr = ExprDef::Convert(Box::new(expr), target.clone());
                }
                Some(tok) => {
                    return Err(ParseError::new(format!(
                        "expected a unit name after 'to', found '{tok}'"
                    )))
                }
                None => return Err(ParseError::new("expected a unit name after 'to'")),
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<ExprDef, ParseError> {
        match self.peek() {
            Some(Tok::Num(n)) => {
                self.pos += 1;
                Ok(ExprDef::Num(*n))
            }
            Some(Tok::Ident(name)) => {
                self.pos += 1;
                Ok(ExprDef::Ident(name.clone()))
            }
            Some(Tok::FuncIdent(name)) => {
                self.pos += 1;
                let args = self.parse_call_args()?;
                Ok(ExprDef::Call(name.clone(), args))
            }
            Some(Tok::LParen) => {
                self.pos += 1;
                let inner = self.parse_expr()?;
                self.expect(&Tok::RParen)?;
                Ok(inner)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `( )` or `( expr {, expr} )`.
    fn parse_call_args(&mut self) -> Result<Vec<ExprDef>, ParseError> {
        self.expect(&Tok::LParen)?;
        let mut args = Vec::new();
        if self.eat(&Tok::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.eat(&Tok::Comma) {
                continue;
            }
            self.expect(&Tok::RParen)?;
            return Ok(args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::UnitId;
    use crate::unit_registry::default_registry;
    use ordered_float::OrderedFloat;

    fn expr(s: &str) -> ExprDef {
        match parse(s, default_registry()).unwrap() {
            Statement::Expr(expr) => expr,
            other => panic!("expected an expression, got {other:?}"),
        }
    }

    fn num(x: f64) -> Box<ExprDef> {
        Box::new(ExprDef::Num(OrderedFloat(x)))
    }

    fn ident(s: &str) -> Box<ExprDef> {
        Box::new(ExprDef::Ident(s.to_string()))
    }

    #[test]
    fn precedence() {
        assert_eq!(
            expr("1 + 2 * 3"),
            ExprDef::Add(num(1.0), Box::new(ExprDef::Mul(num(2.0), num(3.0))))
        );
        assert_eq!(
            expr("8 / 4 / 2"),
            ExprDef::Div(Box::new(ExprDef::Div(num(8.0), num(4.0))), num(2.0))
        );
    }

    #[test]
    fn power_is_right_associative_and_binds_tighter_than_negation() {
        assert_eq!(
            expr("2 ^ 3 ^ 2"),
            ExprDef::Pow(num(2.0), Box::new(ExprDef::Pow(num(3.0), num(2.0))))
        );
        assert_eq!(
            expr("-2 ^ 2"),
            ExprDef::Neg(Box::new(ExprDef::Pow(num(2.0), num(2.0))))
        );
        assert_eq!(
            expr("2 ^ -1"),
            ExprDef::Pow(num(2.0), Box::new(ExprDef::Neg(num(1.0))))
        );
    }

    #[test]
    fn unary_plus_leaves_no_node() {
        assert_eq!(expr("+5"), ExprDef::Num(OrderedFloat(5.0)));
    }

    #[test]
    fn unit_suffix_and_conversion() {
        assert_eq!(
            expr("5 km to mi"),
            ExprDef::Convert(
                Box::new(ExprDef::WithUnit(num(5.0), UnitId::Kilometer)),
                "mi".to_string()
            )
        );
        assert_eq!(expr("90°"), ExprDef::WithUnit(num(90.0), UnitId::Degree));
        assert_eq!(expr("x mi"), ExprDef::WithUnit(ident("x"), UnitId::Mile));
    }

    #[test]
    fn conversion_binds_tighter_than_addition() {
        assert_eq!(
            expr("1 km + 500 m to km"),
            ExprDef::Add(
                Box::new(ExprDef::WithUnit(num(1.0), UnitId::Kilometer)),
                Box::new(ExprDef::Convert(
                    Box::new(ExprDef::WithUnit(num(500.0), UnitId::Meter)),
                    "km".to_string()
                ))
            )
        );
    }

    #[test]
    fn calls() {
        assert_eq!(
            expr("atan2(1, 2)"),
            ExprDef::Call("atan2".to_string(), vec![*num(1.0), *num(2.0)])
        );
        assert_eq!(expr("f()"), ExprDef::Call("f".to_string(), vec![]));
    }

    #[test]
    fn assignment() {
        let stmt = parse("x = 2 * y", default_registry()).unwrap();
        assert_eq!(
            stmt,
            Statement::Assign {
                name: "x".to_string(),
                value: ExprDef::Mul(num(2.0), ident("y")),
            }
        );
    }

    #[test]
    fn chained_assignment_is_rejected() {
        let e = parse("x = y = 3", default_registry()).unwrap_err();
        assert_eq!(e.message, "unexpected '='");
        assert!(parse("3 = x", default_registry()).is_err());
    }

    #[test]
    fn malformed_input() {
        let reg = default_registry();
        assert_eq!(parse("(1 + 2", reg).unwrap_err().message, "expected ')'");
        assert_eq!(parse("1 +", reg).unwrap_err().message, "unexpected end of expression");
        assert_eq!(parse("1 2", reg).unwrap_err().message, "unexpected '2'");
        assert_eq!(parse("1 | 2", reg).unwrap_err().message, "unexpected character '|'");
        assert!(parse("5 km to", reg).is_err());
        assert!(parse("5 km to 3", reg).is_err());
        assert!(parse("|| 5", reg).is_err());
    }
}
