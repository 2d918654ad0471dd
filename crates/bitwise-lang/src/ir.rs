//! IR: parsed line as plain data, evaluated by [crate::eval].

use crate::unit::UnitId;
use ordered_float::OrderedFloat;

/// Expression tree produced by the parser. Unary plus leaves no node.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum ExprDef {
    /// Numeric literal.
    Num(OrderedFloat<f64>),
    /// Name: constant, variable, or bare unit (`km` = 1 km), resolved at evaluation.
    Ident(String),
    /// Operand directly followed by a unit name (e.g. "100 m", "(2 + 3) ft", "90°").
    WithUnit(Box<ExprDef>, UnitId),
    /// Unary minus (e.g. "-1", "-(2 * 3)").
    Neg(Box<ExprDef>),
    Add(Box<ExprDef>, Box<ExprDef>),
    Sub(Box<ExprDef>, Box<ExprDef>),
    Mul(Box<ExprDef>, Box<ExprDef>),
    Div(Box<ExprDef>, Box<ExprDef>),
    Pow(Box<ExprDef>, Box<ExprDef>),
    /// `expr to unit`; the target name is resolved against the registry at evaluation.
    Convert(Box<ExprDef>, String),
    /// Function call with positional arguments.
    Call(String, Vec<ExprDef>),
}

/// One parsed line.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Statement {
    Expr(ExprDef),
    /// `name = value`
    Assign { name: String, value: ExprDef },
}
