use hashbrown::HashMap;
use once_cell::sync::Lazy;

use crate::expr::ExprError;
use crate::expr::ast::{BinaryOp, Expr, UnaryOp};
use crate::expr::token::{Token, TokenKind};

/// Single-argument functions callable from coefficient expressions.
static FUNCTIONS: Lazy<HashMap<&'static str, fn(f64) -> f64>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, fn(f64) -> f64> = HashMap::new();
    table.insert("sin", f64::sin);
    table.insert("cos", f64::cos);
    table.insert("tan", f64::tan);
    table.insert("asin", f64::asin);
    table.insert("acos", f64::acos);
    table.insert("atan", f64::atan);
    table.insert("sinh", f64::sinh);
    table.insert("cosh", f64::cosh);
    table.insert("tanh", f64::tanh);
    table.insert("exp", f64::exp);
    table.insert("ln", f64::ln);
    table.insert("log10", f64::log10);
    table.insert("sqrt", f64::sqrt);
    table.insert("abs", f64::abs);
    table
});

static CONSTANTS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert("pi", std::f64::consts::PI);
    table.insert("e", std::f64::consts::E);
    table
});

/// Recursive-descent parser over the token stream.
///
/// Precedence, loosest to tightest: additive, multiplicative, unary minus,
/// power (right-associative), primary. `-2^2` therefore parses as `-(2^2)`.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// The token stream must be EOF-terminated, as produced by the lexer.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parses the whole token stream as one expression.
    pub fn parse(mut self) -> Result<Expr, ExprError> {
        let expr = self.parse_additive()?;
        match self.peek().kind {
            TokenKind::Eof => Ok(expr),
            ref other => Err(ExprError::UnexpectedToken {
                found: describe(other),
                expected: "end of expression",
                column: self.peek().column,
            }),
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_multiplicative()?;
            expr = Expr::Binary(op, Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            expr = Expr::Binary(op, Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        if matches!(self.peek().kind, TokenKind::Minus) {
            self.advance();
            let inner = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryOp::Neg, Box::new(inner)));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expr, ExprError> {
        let base = self.parse_primary()?;
        if matches!(self.peek().kind, TokenKind::Caret) {
            self.advance();
            // right-associative; going through unary admits `2^-x`
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary(
                BinaryOp::Pow,
                Box::new(base),
                Box::new(exponent),
            ));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expr::Number(value))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                self.parse_identifier(name, token.column)
            }
            TokenKind::OpenParen => {
                self.advance();
                let inner = self.parse_additive()?;
                self.consume_close_paren()?;
                Ok(inner)
            }
            ref other => Err(ExprError::UnexpectedToken {
                found: describe(other),
                expected: "a number, identifier, or '('",
                column: token.column,
            }),
        }
    }

    fn parse_identifier(&mut self, name: String, column: usize) -> Result<Expr, ExprError> {
        if matches!(self.peek().kind, TokenKind::OpenParen) {
            self.advance();
            let arg = self.parse_additive()?;
            self.consume_close_paren()?;
            let func = FUNCTIONS
                .get(name.as_str())
                .copied()
                .ok_or(ExprError::UnknownFunction(name, column))?;
            return Ok(Expr::Call(func, Box::new(arg)));
        }
        if name == "x" {
            return Ok(Expr::Variable);
        }
        CONSTANTS
            .get(name.as_str())
            .map(|&value| Expr::Number(value))
            .ok_or(ExprError::UnknownIdentifier(name, column))
    }

    fn consume_close_paren(&mut self) -> Result<(), ExprError> {
        if matches!(self.peek().kind, TokenKind::CloseParen) {
            self.advance();
            Ok(())
        } else {
            Err(ExprError::UnexpectedToken {
                found: describe(&self.peek().kind),
                expected: "')'",
                column: self.peek().column,
            })
        }
    }

    fn peek(&self) -> &Token {
        // the stream is EOF-terminated and EOF is never consumed
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(value) => format!("number '{}'", value),
        TokenKind::Identifier(name) => format!("identifier '{}'", name),
        TokenKind::Plus => "'+'".to_string(),
        TokenKind::Minus => "'-'".to_string(),
        TokenKind::Star => "'*'".to_string(),
        TokenKind::Slash => "'/'".to_string(),
        TokenKind::Caret => "'^'".to_string(),
        TokenKind::OpenParen => "'('".to_string(),
        TokenKind::CloseParen => "')'".to_string(),
        TokenKind::Eof => "end of expression".to_string(),
    }
}
