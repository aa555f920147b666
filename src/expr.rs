//! Constrained expression front-end for user-typed coefficient formulas.
//!
//! Coefficients arrive as text (`"1"`, `"x"`, `"1 + 0.5*sin(x)"`). They are
//! lexed and parsed over a whitelisted grammar of arithmetic operators and a
//! fixed set of named functions, producing an [`Expr`] tree evaluable at any
//! `x`. Arbitrary code is never evaluated.
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

use std::fmt;

pub use ast::Expr;

/// Compiles an expression source string into an evaluable [`Expr`].
pub fn compile(source: &str) -> Result<Expr, ExprError> {
    let tokens = lexer::Lexer::new(source).tokenize()?;
    parser::Parser::new(tokens).parse()
}

/// Lexing/parsing errors with 1-based column locations.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    UnexpectedCharacter(char, usize),
    InvalidNumber(String, usize),
    UnexpectedToken {
        found: String,
        expected: &'static str,
        column: usize,
    },
    UnknownIdentifier(String, usize),
    UnknownFunction(String, usize),
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ExprError::*;
        match self {
            UnexpectedCharacter(ch, col) => {
                write!(f, "Unexpected character '{}' at column {}", ch, col)
            }
            InvalidNumber(text, col) => {
                write!(f, "Invalid number literal '{}' at column {}", text, col)
            }
            UnexpectedToken {
                found,
                expected,
                column,
            } => write!(f, "Expected {} but found {} at column {}", expected, found, column),
            UnknownIdentifier(name, col) => write!(
                f,
                "Unknown identifier '{}' at column {} (the free variable is 'x')",
                name, col
            ),
            UnknownFunction(name, col) => {
                write!(f, "Unknown function '{}' at column {}", name, col)
            }
        }
    }
}

impl std::error::Error for ExprError {}
