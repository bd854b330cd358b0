//! Arithmetic evaluation and literal parsing.
//!
//! By the time an expression reaches [`evaluate_expression`] every cell
//! reference has been replaced with its numeric value, so the language is
//! just numbers, `+ - * /`, unary signs and parentheses. Evaluation is a
//! small recursive-descent parser over a typed token stream:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | '(' expr ')'
//! ```

use thiserror::Error;

use super::cell::CellValue;

/// Maximum nesting of parentheses and unary signs.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Errors raised while evaluating a substituted expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Expression contains unsafe characters")]
    UnsafeCharacters,

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Invalid expression: unexpected '{0}'")]
    UnexpectedToken(String),

    #[error("Invalid expression: unexpected end of input")]
    UnexpectedEnd,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Formula evaluation resulted in invalid number")]
    NonFinite,

    #[error("Expression is nested too deeply")]
    TooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn describe(self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Star => "*".to_string(),
            Token::Slash => "/".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

fn tokenize(expr: &str) -> Result<Vec<Token>, EvalError> {
    let safe = |c: char| {
        c.is_ascii_digit() || c.is_whitespace() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.')
    };
    if !expr.chars().all(safe) {
        return Err(EvalError::UnsafeCharacters);
    }

    let bytes = expr.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let token = match b {
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                let text = &expr[start..i];
                let n = text
                    .parse::<f64>()
                    .map_err(|_| EvalError::InvalidNumber(text.to_string()))?;
                tokens.push(Token::Number(n));
                continue;
            }
            // Only whitespace is left after the character check.
            _ => {
                i += expr[i..].chars().next().map_or(1, char::len_utf8);
                continue;
            }
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(EvalError::TooDeep);
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            acc = if op == Token::Plus { acc + rhs } else { acc - rhs };
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            acc = if op == Token::Star {
                acc * rhs
            } else {
                if rhs == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                acc / rhs
            };
        }
        Ok(acc)
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(sign @ (Token::Plus | Token::Minus)) => {
                self.pos += 1;
                self.descend()?;
                let value = self.unary()?;
                self.depth -= 1;
                Ok(if sign == Token::Minus { -value } else { value })
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    Some(other) => Err(EvalError::UnexpectedToken(other.describe())),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            Some(other) => Err(EvalError::UnexpectedToken(other.describe())),
            None => Err(EvalError::UnexpectedEnd),
        }
    }
}

/// Evaluate a pure arithmetic expression.
///
/// Non-finite results are errors, never values.
pub fn evaluate_expression(expr: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };

    let value = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(EvalError::UnexpectedToken(extra.describe()));
    }
    if !value.is_finite() {
        return Err(EvalError::NonFinite);
    }
    Ok(value)
}

/// Parse non-formula input into a value.
/// - Empty or whitespace -> empty text
/// - Finite number (decimal or exponent form) -> Number
/// - Otherwise -> the input itself as Text
pub fn evaluate_literal(text: &str) -> CellValue {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return CellValue::Text(String::new());
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(text.to_string()),
    }
}
