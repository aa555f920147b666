use crate::expr::ExprError;
use crate::expr::token::{Token, TokenKind};

/// Lexer for coefficient expressions. Single line, ASCII operators.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /// Consumes the source and returns the token stream, always terminated
    /// by an EOF token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ExprError> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek() {
            let column = self.pos + 1;
            match ch {
                c if c.is_whitespace() => {
                    self.advance();
                }
                c if c.is_ascii_digit() || c == '.' => tokens.push(self.lex_number(column)?),
                c if c.is_ascii_alphabetic() || c == '_' => {
                    tokens.push(self.lex_identifier(column))
                }
                '+' => tokens.push(self.lex_single(TokenKind::Plus, column)),
                '-' => tokens.push(self.lex_single(TokenKind::Minus, column)),
                '*' => tokens.push(self.lex_single(TokenKind::Star, column)),
                '/' => tokens.push(self.lex_single(TokenKind::Slash, column)),
                '^' => tokens.push(self.lex_single(TokenKind::Caret, column)),
                '(' => tokens.push(self.lex_single(TokenKind::OpenParen, column)),
                ')' => tokens.push(self.lex_single(TokenKind::CloseParen, column)),
                other => return Err(ExprError::UnexpectedCharacter(other, column)),
            }
        }
        tokens.push(Token {
            kind: TokenKind::Eof,
            column: self.pos + 1,
        });
        Ok(tokens)
    }

    fn lex_single(&mut self, kind: TokenKind, column: usize) -> Token {
        self.advance();
        Token { kind, column }
    }

    fn lex_number(&mut self, column: usize) -> Result<Token, ExprError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        // exponent suffix only when followed by (signed) digits, so that
        // "2e" lexes as a number followed by an identifier
        if matches!(self.peek(), Some('e' | 'E')) {
            let mark = self.pos;
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.advance();
                }
            } else {
                self.pos = mark;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        let value = text
            .parse::<f64>()
            .map_err(|_| ExprError::InvalidNumber(text.clone(), column))?;
        Ok(Token {
            kind: TokenKind::Number(value),
            column,
        })
    }

    fn lex_identifier(&mut self, column: usize) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        Token {
            kind: TokenKind::Identifier(name),
            column,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}
