use std::fmt::Display;

use crate::error_handling::Location;

use super::ParseError;

/// Token category produced for whitespace, skipped by token streams.
pub const SPACE: &str = "space";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub name: String,
    pub value: String
}

impl Token {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Token { name: name.into(), value: value.into() }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name == self.value {
            write!(f, "`{}`", self.name)
        } else {
            write!(f, "{} `{}`", self.name, self.value)
        }
    }
}

/// A source of tokens with one token of lookahead.
pub trait TokenStream {
    /// The lookahead token, without consuming it. `None` once the input is
    /// exhausted.
    fn current(&mut self) -> Result<Option<&Token>, ParseError>;

    /// Discards the lookahead token.
    fn next(&mut self);

    /// Where the lookahead token starts.
    fn location(&self) -> Location {
        Location::default()
    }
}

/// Tokens that were produced ahead of time.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenList {
    tokens: Vec<Token>,
    position: usize
}

impl TokenList {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenList { tokens, position: 0 }
    }

    // Tokens that have not been consumed yet
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.position..]
    }
}

impl From<Vec<Token>> for TokenList {
    fn from(tokens: Vec<Token>) -> Self {
        TokenList::new(tokens)
    }
}

impl TokenStream for TokenList {
    fn current(&mut self) -> Result<Option<&Token>, ParseError> {
        Ok(self.tokens.get(self.position))
    }

    fn next(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn location(&self) -> Location {
        Location::token(self.position)
    }
}
