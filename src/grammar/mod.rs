/*
    This module is for storing and assembling grammar graphs
*/

pub mod ebnf;
pub mod predicate;

use std::collections::BTreeSet;
use std::fmt::Display;

use crate::error_handling::ErrorType;

// Index of a symbol inside its grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(usize);

impl SymbolId {
    /// The shared empty symbol, present in every grammar.
    pub const EMPTY: SymbolId = SymbolId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

pub const EMPTY_NAME: &str = "∅";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    // Always matches, consuming nothing
    Empty,
    // Matches one token whose category is the symbol's name
    Terminal,
    // Descends into the sub-grammar starting at the header
    NonTerminal(SymbolId),
}

/// A node of the grammar graph.
///
/// `next` is followed after the symbol matched, `alt` after it failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    name: String,
    kind: SymbolKind,
    next: Option<SymbolId>,
    alt: Option<SymbolId>,
}

impl Symbol {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn header(&self) -> Option<SymbolId> {
        match self.kind {
            SymbolKind::NonTerminal(header) => Some(header),
            _ => None,
        }
    }

    pub fn next(&self) -> Option<SymbolId> {
        self.next
    }

    pub fn alt(&self) -> Option<SymbolId> {
        self.alt
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.kind, SymbolKind::NonTerminal(_))
    }

    pub fn is_empty(&self) -> bool {
        self.kind == SymbolKind::Empty
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    // A link points outside the builder's symbols
    UnknownSymbol(usize),
    // A non-terminal was never given a header
    MissingHeader(String),
    // A terminal was given a header
    TerminalWithHeader(String),
    // The shared empty symbol was linked to something
    LinkedEmpty,
    // The symbol can reach itself without any token being consumed
    CycleWithoutInput(String),
    // No scanner produces tokens of this category
    UncoveredTerminal(String),
}

impl ErrorType for GrammarError {}

impl Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::UnknownSymbol(index) => write!(f, "Symbol #{} does not belong to this grammar", index),
            GrammarError::MissingHeader(name) => write!(f, "Non-terminal `{}` has no header", name),
            GrammarError::TerminalWithHeader(name) => write!(f, "Terminal `{}` cannot have a header", name),
            GrammarError::LinkedEmpty => write!(f, "The empty symbol cannot be linked to other symbols"),
            GrammarError::CycleWithoutInput(name) => write!(f, "`{}` can reach itself without consuming input", name),
            GrammarError::UncoveredTerminal(name) => write!(f, "No scanner produces `{}` tokens", name),
        }
    }
}

impl std::error::Error for GrammarError {}

/// An immutable grammar graph, ready to be parsed with.
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    symbols: Vec<Symbol>,
    root: SymbolId,
}

impl Grammar {
    pub fn root(&self) -> SymbolId {
        self.root
    }

    /// # Panics
    ///
    /// When `id` was not handed out by the builder of this grammar. Check
    /// with [`Grammar::contains`] first.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        id.0 < self.symbols.len()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Token categories of every terminal reachable from the root.
    pub fn terminals(&self) -> BTreeSet<&str> {
        let mut seen = vec![false; self.symbols.len()];
        let mut pending = vec![self.root];
        let mut terminals = BTreeSet::new();

        while let Some(id) = pending.pop() {
            if std::mem::replace(&mut seen[id.0], true) {
                continue;
            }
            let symbol = self.symbol(id);
            match symbol.kind {
                SymbolKind::Terminal => {
                    terminals.insert(symbol.name());
                }
                SymbolKind::NonTerminal(header) => pending.push(header),
                SymbolKind::Empty => {}
            }
            pending.extend(symbol.next);
            pending.extend(symbol.alt);
        }

        terminals
    }
}

// A symbol while the graph is still being wired up
#[derive(Debug, Clone)]
struct Draft {
    name: String,
    terminal: bool,
    header: Option<SymbolId>,
    next: Option<SymbolId>,
    alt: Option<SymbolId>,
}

/// Assembles a grammar graph. Links may be set in any order, including links
/// back to symbols that are still being built, which is how repetition is
/// expressed.
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    drafts: Vec<Draft>,
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarBuilder {
    pub fn new() -> Self {
        GrammarBuilder {
            drafts: vec![Draft {
                name: EMPTY_NAME.to_string(),
                terminal: true,
                header: None,
                next: None,
                alt: None,
            }]
        }
    }

    fn push(&mut self, name: &str, terminal: bool) -> SymbolId {
        self.drafts.push(Draft {
            name: name.to_string(),
            terminal,
            header: None,
            next: None,
            alt: None,
        });
        SymbolId(self.drafts.len() - 1)
    }

    /// Adds a symbol matching one token of category `name`.
    pub fn terminal(&mut self, name: &str) -> SymbolId {
        self.push(name, true)
    }

    /// Adds a symbol descending into a sub-grammar; its header must be set
    /// before building.
    pub fn nonterminal(&mut self, name: &str) -> SymbolId {
        self.push(name, false)
    }

    pub fn set_header(&mut self, id: SymbolId, header: SymbolId) {
        if let Some(draft) = self.drafts.get_mut(id.0) {
            draft.header = Some(header);
        }
    }

    pub fn set_next(&mut self, id: SymbolId, next: SymbolId) {
        if let Some(draft) = self.drafts.get_mut(id.0) {
            draft.next = Some(next);
        }
    }

    pub fn set_alt(&mut self, id: SymbolId, alt: SymbolId) {
        if let Some(draft) = self.drafts.get_mut(id.0) {
            draft.alt = Some(alt);
        }
    }

    fn check(&self, id: SymbolId) -> Result<SymbolId, GrammarError> {
        if id.0 < self.drafts.len() {
            Ok(id)
        } else {
            Err(GrammarError::UnknownSymbol(id.0))
        }
    }

    fn check_link(&self, link: Option<SymbolId>) -> Result<Option<SymbolId>, GrammarError> {
        link.map(|id| self.check(id)).transpose()
    }

    /// Freezes the graph into a grammar starting at `root`.
    pub fn build(self, root: SymbolId) -> Result<Grammar, GrammarError> {
        let root = self.check(root)?;

        let empty = &self.drafts[SymbolId::EMPTY.0];
        if empty.header.is_some() || empty.next.is_some() || empty.alt.is_some() {
            return Err(GrammarError::LinkedEmpty);
        }

        let mut symbols = Vec::with_capacity(self.drafts.len());
        for (index, draft) in self.drafts.iter().enumerate() {
            let kind = match (index, draft.terminal, draft.header) {
                (0, _, _) => SymbolKind::Empty,
                (_, true, None) => SymbolKind::Terminal,
                (_, true, Some(_)) => return Err(GrammarError::TerminalWithHeader(draft.name.clone())),
                (_, false, Some(header)) => SymbolKind::NonTerminal(self.check(header)?),
                (_, false, None) => return Err(GrammarError::MissingHeader(draft.name.clone())),
            };
            symbols.push(Symbol {
                name: draft.name.clone(),
                kind,
                next: self.check_link(draft.next)?,
                alt: self.check_link(draft.alt)?,
            });
        }

        let grammar = Grammar { symbols, root };
        check_cycles(&grammar)?;
        Ok(grammar)
    }
}

// Marks the symbols that can succeed without consuming a token. A chain
// completes empty when its symbol does and so does the rest of the chain, or
// when its alternative chain does.
fn matches_empty(grammar: &Grammar) -> Vec<bool> {
    let mut matches = vec![false; grammar.len()];
    let mut completes = vec![false; grammar.len()];

    let mut changed = true;
    while changed {
        changed = false;
        for (index, symbol) in grammar.symbols.iter().enumerate() {
            let matched = match symbol.kind {
                SymbolKind::Empty => true,
                SymbolKind::Terminal => false,
                SymbolKind::NonTerminal(header) => completes[header.0],
            };
            let completed = (matched && symbol.next.map_or(true, |next| completes[next.0]))
                || symbol.alt.map_or(false, |alt| completes[alt.0]);

            if matched != matches[index] || completed != completes[index] {
                matches[index] = matched;
                completes[index] = completed;
                changed = true;
            }
        }
    }
    matches
}

// Symbols tried at the same input position as `symbol`. `next` counts when
// the symbol may match without consuming anything.
fn same_position(symbol: &Symbol, empty: bool) -> impl Iterator<Item = SymbolId> {
    let entered = match symbol.kind {
        SymbolKind::NonTerminal(header) => Some(header),
        SymbolKind::Empty | SymbolKind::Terminal => None,
    };
    let after = if empty { symbol.next } else { None };
    entered.into_iter().chain(symbol.alt).chain(after)
}

// Depth-first search for a cycle among symbols that are tried without any
// token being consumed in between. The interpreter would never leave one.
fn check_cycles(grammar: &Grammar) -> Result<(), GrammarError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        Active,
        Finished,
    }

    let empty = matches_empty(grammar);
    let mut marks = vec![Mark::Unvisited; grammar.len()];
    for start in 0..grammar.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::Active;
        let mut stack = vec![(SymbolId(start), same_position(&grammar.symbols[start], empty[start]))];

        while let Some((id, successors)) = stack.last_mut() {
            match successors.next() {
                Some(successor) => match marks[successor.0] {
                    Mark::Active => {
                        return Err(GrammarError::CycleWithoutInput(grammar.symbol(successor).name.clone()));
                    }
                    Mark::Unvisited => {
                        marks[successor.0] = Mark::Active;
                        stack.push((successor, same_position(grammar.symbol(successor), empty[successor.0])));
                    }
                    Mark::Finished => {}
                },
                None => {
                    marks[id.0] = Mark::Finished;
                    stack.pop();
                }
            }
        }
    }
    Ok(())
}
