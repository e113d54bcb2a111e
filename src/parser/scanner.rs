use std::fmt::Debug;

use super::stream::{Token, SPACE};

/// Fed to scanners once the source is exhausted.
pub const END_OF_INPUT: char = '\u{3}';

pub const IDENTIFIER: &str = "identifier";
pub const STRING: &str = "string";

// What a scanner makes of one character
#[derive(Debug, PartialEq, Clone)]
pub enum Scan {
    // The character is consumed, keep feeding
    More,
    // The character is consumed and completes the token
    Done(Token),
    // The token was complete before this character, which is left alone
    Emit(Token),
    // Not a token of this kind
    Reject,
}

/// The state of one attempt at recognizing a token.
pub trait Scanner {
    fn feed(&mut self, c: char) -> Scan;
}

/// Creates a fresh scanner for every token position.
pub struct ScannerFactory {
    category: String,
    start: Box<dyn Fn() -> Box<dyn Scanner> + Send + Sync>,
}

impl Debug for ScannerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScannerFactory").field("category", &self.category).finish()
    }
}

impl ScannerFactory {
    /// `category` is the token category the scanner produces.
    pub fn new<F, S>(category: impl Into<String>, start: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Scanner + 'static,
    {
        ScannerFactory {
            category: category.into(),
            start: Box::new(move || Box::new(start()) as Box<dyn Scanner>),
        }
    }

    pub fn identifier() -> Self {
        Self::new(IDENTIFIER, IdentifierScan::default)
    }

    pub fn literal(text: &str) -> Self {
        let text = text.to_string();
        Self::new(text.clone(), move || LiteralScan::new(&text))
    }

    pub fn space() -> Self {
        Self::new(SPACE, SpaceScan::default)
    }

    pub fn quoted() -> Self {
        Self::new(STRING, QuotedScan::default)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn start(&self) -> Box<dyn Scanner> {
        (self.start)()
    }
}

// A letter followed by letters and digits
#[derive(Debug, Default)]
pub struct IdentifierScan {
    text: String,
}

impl Scanner for IdentifierScan {
    fn feed(&mut self, c: char) -> Scan {
        if c.is_alphabetic() || (!self.text.is_empty() && c.is_numeric()) {
            self.text.push(c);
            Scan::More
        } else if self.text.is_empty() {
            Scan::Reject
        } else {
            Scan::Emit(Token::new(IDENTIFIER, std::mem::take(&mut self.text)))
        }
    }
}

#[derive(Debug)]
pub struct LiteralScan {
    literal: String,
    matched: usize,
}

impl LiteralScan {
    pub fn new(literal: &str) -> Self {
        LiteralScan { literal: literal.to_string(), matched: 0 }
    }
}

impl Scanner for LiteralScan {
    fn feed(&mut self, c: char) -> Scan {
        match self.literal[self.matched..].chars().next() {
            Some(expected) if expected == c => {
                self.matched += c.len_utf8();
                if self.matched == self.literal.len() {
                    Scan::Done(Token::new(self.literal.clone(), self.literal.clone()))
                } else {
                    Scan::More
                }
            }
            _ => Scan::Reject,
        }
    }
}

#[derive(Debug, Default)]
pub struct SpaceScan {
    text: String,
}

impl Scanner for SpaceScan {
    fn feed(&mut self, c: char) -> Scan {
        if c.is_whitespace() {
            self.text.push(c);
            Scan::More
        } else if self.text.is_empty() {
            Scan::Reject
        } else {
            Scan::Emit(Token::new(SPACE, std::mem::take(&mut self.text)))
        }
    }
}

// Text between matching single or double quotes
#[derive(Debug, Default)]
pub struct QuotedScan {
    quote: Option<char>,
    text: String,
}

impl Scanner for QuotedScan {
    fn feed(&mut self, c: char) -> Scan {
        match self.quote {
            None if c == '"' || c == '\'' => {
                self.quote = Some(c);
                Scan::More
            }
            None => Scan::Reject,
            Some(quote) if c == quote => Scan::Done(Token::new(STRING, std::mem::take(&mut self.text))),
            Some(_) if c == END_OF_INPUT => Scan::Reject,
            Some(_) => {
                self.text.push(c);
                Scan::More
            }
        }
    }
}
