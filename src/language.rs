use std::str::Chars;

use log::debug;

use crate::grammar::{self, Grammar, GrammarError};
use crate::parser::scanner::ScannerFactory;
use crate::parser::stream::Token;
use crate::parser::tokenizer::{self, Tokenizer};
use crate::parser::{self, ParseError, ParseResult, Tree};

/// A grammar together with the scanners that produce its tokens.
#[derive(Debug)]
pub struct Language {
    name: String,
    grammar: Grammar,
    scanners: Vec<ScannerFactory>,
}

impl Language {
    /// Fails when a terminal reachable from the grammar's root has no
    /// scanner producing its category.
    pub fn new(name: &str, grammar: Grammar, scanners: Vec<ScannerFactory>) -> Result<Self, GrammarError> {
        let uncovered = grammar.terminals().into_iter()
            .find(|terminal| !scanners.iter().any(|scanner| scanner.category() == *terminal))
            .map(str::to_string);

        if let Some(terminal) = uncovered {
            return Err(GrammarError::UncoveredTerminal(terminal));
        }

        Ok(Language { name: name.to_string(), grammar, scanners })
    }

    pub fn predicate() -> Result<Self, GrammarError> {
        Self::new("predicate", grammar::predicate::grammar()?, grammar::predicate::scanners())
    }

    pub fn ebnf() -> Result<Self, GrammarError> {
        Self::new("ebnf", grammar::ebnf::grammar()?, grammar::ebnf::scanners())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn scanners(&self) -> &[ScannerFactory] {
        &self.scanners
    }

    pub fn tokenizer<'l>(&'l self, text: &'l str) -> Tokenizer<'l, Chars<'l>> {
        Tokenizer::new(text.chars(), &self.scanners)
    }

    pub fn tokenize(&self, text: &str) -> ParseResult<Vec<Token>> {
        tokenizer::tokenize(text, &self.scanners)
    }

    /// Parses all of `text`.
    pub fn parse(&self, text: &str) -> ParseResult<Tree> {
        debug!("parsing {} bytes as {}", text.len(), self.name);
        parser::parse_complete(&self.grammar, &mut self.tokenizer(text))
    }

    /// Parses all of `text`, keeping whatever tree was built before a
    /// failure.
    pub fn parse_partial(&self, text: &str) -> (Tree, Option<ParseError>) {
        let mut stream = self.tokenizer(text);
        match parser::parse_partial(&self.grammar, self.grammar.root(), &mut stream) {
            (tree, None) => {
                let error = parser::check_exhausted(&mut stream).err();
                (tree, error)
            }
            failed => failed,
        }
    }
}
