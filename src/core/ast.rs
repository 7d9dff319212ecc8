// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! AST for one parsed source line.
//!
//! Expressions are a single tagged variant rather than a class hierarchy;
//! evaluation dispatches on the tag. A [`Statement`] is a plain aggregate of
//! label, mnemonic, and operand expressions.

use std::fmt;

use crate::core::symbol_table::{SymbolTable, SymbolTableError};
use crate::core::value::{Value, ValueError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    LowByte,
    HighByte,
}

impl UnaryOp {
    #[must_use]
    pub fn apply(self, operand: &Value) -> Value {
        match self {
            UnaryOp::LowByte => operand.low_byte(),
            UnaryOp::HighByte => operand.high_byte(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn apply(self, left: &Value, right: &Value) -> Result<Value, ValueError> {
        match self {
            BinaryOp::Add => Ok(left + right),
            BinaryOp::Subtract => Ok(left - right),
            BinaryOp::Multiply => Ok(left * right),
            BinaryOp::Divide => left.checked_div(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Numeric constant; the location-counter token `.` is captured at parse
    /// time as one of these.
    Constant(Value),
    /// String constant; legal only as the `.ascii` operand.
    StringConstant(String),
    /// Symbol reference, case-folded at parse time.
    Symbol(String),
    Unary { op: UnaryOp, expr: Box<Expr> },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Context threaded through expression evaluation: the symbol table for
/// lookups and the current line number for reference recording.
pub struct EvalContext<'a> {
    pub symbols: &'a mut SymbolTable,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    Value(ValueError),
    Symbol(SymbolTableError),
    StringOperand,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Value(err) => err.fmt(f),
            EvalError::Symbol(err) => err.fmt(f),
            EvalError::StringOperand => write!(f, "string constant in expression"),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<ValueError> for EvalError {
    fn from(err: ValueError) -> Self {
        EvalError::Value(err)
    }
}

impl From<SymbolTableError> for EvalError {
    fn from(err: SymbolTableError) -> Self {
        EvalError::Symbol(err)
    }
}

impl Expr {
    pub fn evaluate(&self, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
        match self {
            Expr::Constant(value) => Ok(value.clone()),
            Expr::StringConstant(_) => Err(EvalError::StringOperand),
            Expr::Symbol(name) => Ok(ctx.symbols.lookup(ctx.line, name)?),
            Expr::Unary { op, expr } => Ok(op.apply(&expr.evaluate(ctx)?)),
            Expr::Binary { op, left, right } => {
                let l = left.evaluate(ctx)?;
                let r = right.evaluate(ctx)?;
                Ok(op.apply(&l, &r)?)
            }
        }
    }
}

/// One parsed source line.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    pub label: Option<String>,
    pub mnemonic: Option<String>,
    pub operands: Vec<Expr>,
}

#[cfg(test)]
mod tests {
    use super::{BinaryOp, EvalContext, EvalError, Expr, UnaryOp};
    use crate::core::symbol_table::SymbolTable;
    use crate::core::value::{Value, ValueError};

    fn eval(expr: &Expr, symbols: &mut SymbolTable) -> Result<Value, EvalError> {
        let mut ctx = EvalContext { symbols, line: 1 };
        expr.evaluate(&mut ctx)
    }

    #[test]
    fn evaluates_arithmetic_with_precedence_built_in() {
        // 2 + 3 * 4, built the way the parser would build it
        let expr = Expr::Binary {
            op: BinaryOp::Add,
            left: Box::new(Expr::Constant(Value::known(2))),
            right: Box::new(Expr::Binary {
                op: BinaryOp::Multiply,
                left: Box::new(Expr::Constant(Value::known(3))),
                right: Box::new(Expr::Constant(Value::known(4))),
            }),
        };
        let mut symbols = SymbolTable::new();
        assert_eq!(eval(&expr, &mut symbols), Ok(Value::known(14)));
    }

    #[test]
    fn symbol_reference_resolves_through_table() {
        let mut symbols = SymbolTable::new();
        symbols.define(1, "base", Value::known(0x1000)).unwrap();
        let expr = Expr::Binary {
            op: BinaryOp::Add,
            left: Box::new(Expr::Symbol("base".to_string())),
            right: Box::new(Expr::Constant(Value::known(2))),
        };
        assert_eq!(eval(&expr, &mut symbols), Ok(Value::known(0x1002)));
    }

    #[test]
    fn unknown_symbol_taints_the_expression_in_pass_1() {
        let mut symbols = SymbolTable::new();
        symbols.set_lookup_undefined_ok(true);
        let expr = Expr::Binary {
            op: BinaryOp::Add,
            left: Box::new(Expr::Symbol("later".to_string())),
            right: Box::new(Expr::Constant(Value::known(1))),
        };
        let value = eval(&expr, &mut symbols).unwrap();
        assert!(!value.is_known());
        assert!(value.unknown_symbols().unwrap().contains("later"));
    }

    #[test]
    fn division_by_zero_fails() {
        let expr = Expr::Binary {
            op: BinaryOp::Divide,
            left: Box::new(Expr::Constant(Value::known(1))),
            right: Box::new(Expr::Constant(Value::known(0))),
        };
        let mut symbols = SymbolTable::new();
        assert_eq!(
            eval(&expr, &mut symbols),
            Err(EvalError::Value(ValueError::DivideByZero))
        );
    }

    #[test]
    fn byte_extraction_unaries() {
        let mut symbols = SymbolTable::new();
        symbols.define(1, "addr", Value::known(0x12fe)).unwrap();
        let low = Expr::Unary {
            op: UnaryOp::LowByte,
            expr: Box::new(Expr::Symbol("addr".to_string())),
        };
        let high = Expr::Unary {
            op: UnaryOp::HighByte,
            expr: Box::new(Expr::Symbol("addr".to_string())),
        };
        assert_eq!(eval(&low, &mut symbols), Ok(Value::known(0xfe)));
        assert_eq!(eval(&high, &mut symbols), Ok(Value::known(0x12)));
    }

    #[test]
    fn string_constant_is_not_a_value() {
        let expr = Expr::StringConstant("hi".to_string());
        let mut symbols = SymbolTable::new();
        assert_eq!(eval(&expr, &mut symbols), Err(EvalError::StringOperand));
    }
}
