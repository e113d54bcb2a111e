use itertools::{multipeek, MultiPeek};
use log::trace;

use crate::error_handling::Location;

use super::scanner::{Scan, ScannerFactory, END_OF_INPUT};
use super::stream::{Token, TokenStream, SPACE};
use super::{ParseError, ParseErrorType};

/// Turns characters into tokens by trying scanners in priority order.
///
/// The first scanner in the list that produces a token at the current
/// position wins. When a scanner gives up without producing, the characters
/// it looked at are offered to the next scanner in the list. Whitespace
/// tokens are skipped.
pub struct Tokenizer<'s, I: Iterator<Item = char>> {
    source: MultiPeek<I>,
    scanners: &'s [ScannerFactory],
    position: Location,
    start: Location,
    // `None` until the lookahead is primed
    lookahead: Option<Option<Token>>,
    failure: Option<ParseError>,
}

impl<'s, I: Iterator<Item = char>> Tokenizer<'s, I> {
    pub fn new(source: I, scanners: &'s [ScannerFactory]) -> Self {
        Tokenizer {
            source: multipeek(source),
            scanners,
            position: Location::start(),
            start: Location::start(),
            lookahead: None,
            failure: None,
        }
    }

    fn advance(&mut self, count: usize) {
        for _ in 0..count {
            if let Some(c) = self.source.next() {
                self.position.advance(c);
            }
        }
    }

    // Runs one scanner from the current position. Returns the token and the
    // number of characters it spans.
    fn attempt(&mut self, factory: &ScannerFactory) -> Option<(Token, usize)> {
        let mut scanner = factory.start();
        let mut consumed = 0;
        self.source.reset_peek();

        loop {
            let c = self.source.peek().copied().unwrap_or(END_OF_INPUT);
            match scanner.feed(c) {
                Scan::More if c != END_OF_INPUT => consumed += 1,
                Scan::Done(token) if c != END_OF_INPUT => return Some((token, consumed + 1)),
                Scan::Done(token) | Scan::Emit(token) if consumed > 0 => return Some((token, consumed)),
                _ => return None,
            }
        }
    }

    fn scan_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.start = self.position;
        let scanners = self.scanners;

        for factory in scanners {
            if let Some((token, length)) = self.attempt(factory) {
                self.advance(length);
                trace!("scanned {} at {}", token, self.start);
                return Ok(Some(token));
            }
        }

        self.source.reset_peek();
        match self.source.peek() {
            None => Ok(None),
            Some(&c) => Err(ParseError {
                location: self.start,
                error: ParseErrorType::UnsupportedCharacter(c)
            }),
        }
    }

    // Scans up to the next token that is not whitespace
    fn prime(&mut self) -> Result<Option<Token>, ParseError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        loop {
            match self.scan_token() {
                Ok(Some(token)) if token.name == SPACE => continue,
                Ok(token) => return Ok(token),
                Err(failure) => {
                    self.failure = Some(failure.clone());
                    return Err(failure);
                }
            }
        }
    }
}

impl<'s, I: Iterator<Item = char>> TokenStream for Tokenizer<'s, I> {
    fn current(&mut self) -> Result<Option<&Token>, ParseError> {
        if self.lookahead.is_none() {
            let token = self.prime()?;
            self.lookahead = Some(token);
        }
        Ok(self.lookahead.as_ref().and_then(Option::as_ref))
    }

    fn next(&mut self) {
        if self.lookahead.is_none() {
            // Nothing was looked at yet, so the first token is the one skipped
            let _ = self.current();
        }
        self.lookahead = None;
    }

    fn location(&self) -> Location {
        self.start
    }
}

/// Every token of `text` except whitespace.
pub fn tokenize(text: &str, scanners: &[ScannerFactory]) -> Result<Vec<Token>, ParseError> {
    let mut tokenizer = Tokenizer::new(text.chars(), scanners);
    let mut tokens = Vec::new();

    while let Some(token) = tokenizer.current()? {
        tokens.push(token.clone());
        tokenizer.next();
    }

    Ok(tokens)
}
