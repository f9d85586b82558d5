//! Tokenizer for boolean expressions.
//!
//! The expression language accepts the usual zoo of operator spellings:
//! `~`, `!` and the word `not` negate; `*`, `&`, `&&` and `and` conjoin;
//! `+`, `|`, `||` and `or` disjoin; `^`, `!=` and `xor` are exclusive-or;
//! `=`, `==` and `nxor` are equivalence; `=>` is material implication.
//! Alphanumeric runs that are not operator words become variable literals.

use std::fmt;

use thiserror::Error;

/// The kind of a lexed token.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TokenType {
    Literal,
    Not,
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Nxor,
    /// Material implication (`=>`).
    Cons,
    /// And-not (`a & !b`).
    Andn,
    ParensOpen,
    ParensClose,
}

impl TokenType {
    pub const fn label(self) -> &'static str {
        match self {
            TokenType::Literal => "LITERAL",
            TokenType::Not => "NOT",
            TokenType::And => "AND",
            TokenType::Nand => "NAND",
            TokenType::Or => "OR",
            TokenType::Nor => "NOR",
            TokenType::Xor => "XOR",
            TokenType::Nxor => "NXOR",
            TokenType::Cons => "CONS",
            TokenType::Andn => "ANDN",
            TokenType::ParensOpen => "PARENS_OPEN",
            TokenType::ParensClose => "PARENS_CLOSE",
        }
    }
}

/// A token together with the spelling it was lexed from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenType,
    pub value: String,
}

impl Token {
    fn new(kind: TokenType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?}", self.kind.label(), self.value)
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum LexError {
    #[error("unexpected character {ch:?} at index {index}")]
    UnexpectedCharacter { index: usize, ch: char },
}

impl LexError {
    /// Byte index of the offending character, for caret diagnostics.
    pub fn index(&self) -> usize {
        match *self {
            LexError::UnexpectedCharacter { index, .. } => index,
        }
    }
}

/// Maps operator words to their token kind, case-insensitively.
fn keyword(word: &str) -> Option<TokenType> {
    match word.to_ascii_lowercase().as_str() {
        "and" => Some(TokenType::And),
        "nand" | "notand" => Some(TokenType::Nand),
        "or" => Some(TokenType::Or),
        "nor" | "notor" => Some(TokenType::Nor),
        "xor" => Some(TokenType::Xor),
        "nxor" | "notxor" => Some(TokenType::Nxor),
        "andn" | "andnot" => Some(TokenType::Andn),
        "not" => Some(TokenType::Not),
        _ => None,
    }
}

/// Splits an expression into tokens.
pub fn tokenize(expr: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<(usize, char)> = expr.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    let peek = |i: usize| chars.get(i + 1).map(|&(_, c)| c);

    while i < chars.len() {
        let (index, c) = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            c if c.is_ascii_alphanumeric() => {
                let start = i;
                while i < chars.len() && chars[i].1.is_ascii_alphanumeric() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().map(|&(_, c)| c).collect();
                let kind = keyword(&word).unwrap_or(TokenType::Literal);
                tokens.push(Token {
                    kind,
                    value: word,
                });
            }
            '~' => {
                tokens.push(Token::new(TokenType::Not, "~"));
                i += 1;
            }
            '+' => {
                tokens.push(Token::new(TokenType::Or, "+"));
                i += 1;
            }
            '*' => {
                tokens.push(Token::new(TokenType::And, "*"));
                i += 1;
            }
            '^' => {
                tokens.push(Token::new(TokenType::Xor, "^"));
                i += 1;
            }
            '(' => {
                tokens.push(Token::new(TokenType::ParensOpen, "("));
                i += 1;
            }
            ')' => {
                tokens.push(Token::new(TokenType::ParensClose, ")"));
                i += 1;
            }
            '!' => {
                if peek(i) == Some('=') {
                    tokens.push(Token::new(TokenType::Xor, "!="));
                    i += 2;
                } else {
                    tokens.push(Token::new(TokenType::Not, "!"));
                    i += 1;
                }
            }
            '=' => match peek(i) {
                Some('=') => {
                    tokens.push(Token::new(TokenType::Nxor, "=="));
                    i += 2;
                }
                Some('>') => {
                    tokens.push(Token::new(TokenType::Cons, "=>"));
                    i += 2;
                }
                _ => {
                    tokens.push(Token::new(TokenType::Nxor, "="));
                    i += 1;
                }
            },
            '&' => {
                if peek(i) == Some('&') {
                    tokens.push(Token::new(TokenType::And, "&&"));
                    i += 2;
                } else {
                    tokens.push(Token::new(TokenType::And, "&"));
                    i += 1;
                }
            }
            '|' => {
                if peek(i) == Some('|') {
                    tokens.push(Token::new(TokenType::Or, "||"));
                    i += 2;
                } else {
                    tokens.push(Token::new(TokenType::Or, "|"));
                    i += 1;
                }
            }
            other => {
                return Err(LexError::UnexpectedCharacter {
                    index,
                    ch: other,
                })
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(expr: &str) -> Vec<TokenType> {
        tokenize(expr).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_words_and_literals() {
        let tokens = tokenize("a and beta").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], Token::new(TokenType::Literal, "a"));
        assert_eq!(tokens[1], Token::new(TokenType::And, "and"));
        assert_eq!(tokens[2], Token::new(TokenType::Literal, "beta"));
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(kinds("A nOr b"), vec![
            TokenType::Literal,
            TokenType::Nor,
            TokenType::Literal,
        ]);
        assert_eq!(kinds("x NOTAND y"), vec![
            TokenType::Literal,
            TokenType::Nand,
            TokenType::Literal,
        ]);
    }

    #[test]
    fn test_symbolic_operators() {
        assert_eq!(kinds("a * b + c"), vec![
            TokenType::Literal,
            TokenType::And,
            TokenType::Literal,
            TokenType::Or,
            TokenType::Literal,
        ]);
        assert_eq!(kinds("a ^ b"), vec![
            TokenType::Literal,
            TokenType::Xor,
            TokenType::Literal,
        ]);
    }

    #[test]
    fn test_doubled_operators() {
        assert_eq!(kinds("a && b || c"), vec![
            TokenType::Literal,
            TokenType::And,
            TokenType::Literal,
            TokenType::Or,
            TokenType::Literal,
        ]);
    }

    #[test]
    fn test_equality_family() {
        assert_eq!(kinds("a == b"), vec![
            TokenType::Literal,
            TokenType::Nxor,
            TokenType::Literal,
        ]);
        assert_eq!(kinds("a = b"), vec![
            TokenType::Literal,
            TokenType::Nxor,
            TokenType::Literal,
        ]);
        assert_eq!(kinds("a != b"), vec![
            TokenType::Literal,
            TokenType::Xor,
            TokenType::Literal,
        ]);
        assert_eq!(kinds("a => b"), vec![
            TokenType::Literal,
            TokenType::Cons,
            TokenType::Literal,
        ]);
    }

    #[test]
    fn test_negation_chains() {
        assert_eq!(kinds("!!a"), vec![
            TokenType::Not,
            TokenType::Not,
            TokenType::Literal,
        ]);
        assert_eq!(kinds("~(a)"), vec![
            TokenType::Not,
            TokenType::ParensOpen,
            TokenType::Literal,
            TokenType::ParensClose,
        ]);
    }

    #[test]
    fn test_tight_spacing() {
        assert_eq!(kinds("a*b+!c"), vec![
            TokenType::Literal,
            TokenType::And,
            TokenType::Literal,
            TokenType::Or,
            TokenType::Not,
            TokenType::Literal,
        ]);
    }

    #[test]
    fn test_error_carries_position() {
        let err = tokenize("a $ b").unwrap_err();
        assert_eq!(err, LexError::UnexpectedCharacter { index: 2, ch: '$' });
        assert_eq!(err.index(), 2);
    }

    #[test]
    fn test_display_form() {
        let token = Token::new(TokenType::And, "&&");
        assert_eq!(token.to_string(), "AND:\"&&\"");
    }
}
