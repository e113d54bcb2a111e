/*
    This module walks grammar graphs against token streams
*/

pub mod scanner;
pub mod stream;
pub mod tokenizer;

use std::fmt::Display;

use log::{debug, trace};

use crate::error_handling::*;
use crate::grammar::{Grammar, Symbol, SymbolId, SymbolKind};
use stream::{Token, TokenStream};

/// What the tokenizer expected when no scanner accepted a character.
pub const SUPPORTED_TOKEN: &str = "supported token";

#[derive(Debug, PartialEq, Clone)]
pub enum ParseErrorType {
    // A token of another category was found where a terminal was required
    Expecting { expected: String, actual: Token },
    // The input ended where a terminal was required
    UnexpectedEof { expected: String },
    // The grammar was satisfied but input remained
    RemainingToken(Token),
    // No scanner accepts the character
    UnsupportedCharacter(char),
}

impl ParseErrorType {
    /// The token category that would have let parsing go on.
    pub fn expected(&self) -> Option<&str> {
        match self {
            ParseErrorType::Expecting { expected, .. } => Some(expected),
            ParseErrorType::UnexpectedEof { expected } => Some(expected),
            ParseErrorType::RemainingToken(_) => None,
            ParseErrorType::UnsupportedCharacter(_) => Some(SUPPORTED_TOKEN),
        }
    }
}

impl ErrorType for ParseErrorType {}

impl Display for ParseErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorType::Expecting { expected, actual } => write!(f, "Expected `{}`, found {}", expected, actual),
            ParseErrorType::UnexpectedEof { expected } => write!(f, "Expected `{}`, found end of input", expected),
            ParseErrorType::RemainingToken(token) => write!(f, "Unexpected {} after a complete parse", token),
            ParseErrorType::UnsupportedCharacter(c) => write!(f, "Expected {}, found `{}`", SUPPORTED_TOKEN, c.escape_debug()),
        }
    }
}

pub type ParseError = Error<ParseErrorType>;
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// A parse tree node.
///
/// `value` is the text of a consumed token when `token` is set, and the
/// label of a grammar rule otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    pub value: String,
    pub token: bool,
    pub children: Vec<Tree>,
}

impl Tree {
    pub fn new(label: &str) -> Self {
        Tree { value: label.to_string(), token: false, children: Vec::new() }
    }

    pub fn leaf(value: &str) -> Self {
        Tree { value: value.to_string(), token: true, children: Vec::new() }
    }

    /// Texts of the consumed tokens, in the order they were consumed.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens = Vec::new();
        self.collect_tokens(&mut tokens);
        tokens
    }

    fn collect_tokens<'t>(&'t self, tokens: &mut Vec<&'t str>) {
        if self.token {
            tokens.push(&self.value);
        }
        for child in &self.children {
            child.collect_tokens(tokens);
        }
    }

    fn write_indented(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        if self.token {
            writeln!(f, "{:indent$}`{}`", "", self.value, indent = depth * 2)?;
        } else {
            writeln!(f, "{:indent$}{}", "", self.value, indent = depth * 2)?;
        }
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_indented(f, 0)
    }
}

fn match_terminal<S: TokenStream + ?Sized>(
    symbol: &Symbol,
    is_root: bool,
    stream: &mut S,
    tree: &mut Tree
) -> ParseResult<()> {
    let token = stream.current()?.cloned();
    let location = stream.location();

    let token = token.ok_or_else(|| ParseError {
        location,
        error: ParseErrorType::UnexpectedEof { expected: symbol.name().to_string() }
    })?;

    if token.name != symbol.name() {
        return Err(ParseError {
            location,
            error: ParseErrorType::Expecting { expected: symbol.name().to_string(), actual: token }
        });
    }

    stream.next();
    if is_root {
        tree.value = token.value;
        tree.token = true;
    } else {
        tree.children.push(Tree::leaf(&token.value));
    }
    Ok(())
}

// Matches the symbols reachable from `root` against the stream, adding what
// they match to `tree`. Follows `next` after every success and `alt` after
// every failure; a failure with no `alt` ends the walk.
fn walk<S: TokenStream + ?Sized>(
    grammar: &Grammar,
    root: SymbolId,
    stream: &mut S,
    tree: &mut Tree
) -> ParseResult<()> {
    let mut curr = Some(root);

    while let Some(id) = curr {
        let symbol = grammar.symbol(id);
        let outcome = match symbol.kind() {
            SymbolKind::Empty => Ok(()),
            SymbolKind::Terminal => match_terminal(symbol, id == root, stream, tree),
            SymbolKind::NonTerminal(header) => {
                let mut child = Tree::new(grammar.symbol(header).name());
                let outcome = walk(grammar, header, stream, &mut child);
                // Without an alternative the failure is final, and the
                // partial subtree shows where it happened
                if outcome.is_ok() || symbol.alt().is_none() {
                    tree.children.push(child);
                }
                outcome
            }
        };

        curr = match outcome {
            Ok(()) => symbol.next(),
            Err(error) => match symbol.alt() {
                Some(alt) => {
                    trace!("`{}` failed ({}), trying `{}`", symbol.name(), error.error, grammar.symbol(alt).name());
                    Some(alt)
                }
                None => return Err(error),
            },
        };
    }

    Ok(())
}

/// Parses from `root`, returning the tree built so far along with the error
/// when parsing fails.
///
/// # Panics
///
/// When `root` does not belong to `grammar` (see [`Grammar::contains`]).
pub fn parse_partial<S: TokenStream + ?Sized>(
    grammar: &Grammar,
    root: SymbolId,
    stream: &mut S
) -> (Tree, Option<ParseError>) {
    debug!("parsing from `{}`", grammar.symbol(root).name());
    let mut tree = Tree::new(grammar.symbol(root).name());
    let outcome = walk(grammar, root, stream, &mut tree);
    if let Err(error) = &outcome {
        debug!("parse failed at {}: {}", error.location, error.error);
    }
    (tree, outcome.err())
}

/// Parses from `root`. Tokens after the parsed part are left in the stream.
/// `root` must belong to `grammar`, as for [`parse_partial`].
pub fn parse_from<S: TokenStream + ?Sized>(grammar: &Grammar, root: SymbolId, stream: &mut S) -> ParseResult<Tree> {
    match parse_partial(grammar, root, stream) {
        (tree, None) => Ok(tree),
        (_, Some(error)) => Err(error),
    }
}

/// Parses from the grammar's root. Tokens after the parsed part are left in
/// the stream.
pub fn parse<S: TokenStream + ?Sized>(grammar: &Grammar, stream: &mut S) -> ParseResult<Tree> {
    parse_from(grammar, grammar.root(), stream)
}

/// Parses from the grammar's root and requires the stream to be exhausted
/// afterwards.
pub fn parse_complete<S: TokenStream + ?Sized>(grammar: &Grammar, stream: &mut S) -> ParseResult<Tree> {
    let tree = parse(grammar, stream)?;
    check_exhausted(stream)?;
    Ok(tree)
}

pub fn check_exhausted<S: TokenStream + ?Sized>(stream: &mut S) -> ParseResult<()> {
    match stream.current()?.cloned() {
        None => Ok(()),
        Some(token) => Err(ParseError {
            location: stream.location(),
            error: ParseErrorType::RemainingToken(token)
        }),
    }
}
