/*
    The EBNF grammar, describing the notation the other grammars are
    written in

    syntax     = {production}.
    production = identifier '=' expression '.'.
    expression = term {'|' term}.
    term       = factor {factor}.
    factor     = identifier | string | '(' expression ')' | '[' expression ']' | '{' expression '}'.
*/

use super::{Grammar, GrammarBuilder, GrammarError, SymbolId};
use crate::parser::scanner::{ScannerFactory, IDENTIFIER, STRING};

pub const EQUAL: &str = "=";
pub const DOT: &str = ".";
pub const BAR: &str = "|";
pub const GROUPS: [(&str, &str); 3] = [("(", ")"), ("[", "]"), ("{", "}")];

pub const SYNTAX: &str = "syntax";
pub const PRODUCTION: &str = "production";
pub const EXPRESSION: &str = "expression";
pub const TERM: &str = "term";

// One factor followed by `then`, or by itself again when `then` is None.
// The alternatives end at `otherwise`.
fn factor(
    b: &mut GrammarBuilder,
    label: &str,
    expression: SymbolId,
    then: Option<SymbolId>,
    otherwise: Option<SymbolId>
) -> SymbolId {
    let identifier = b.terminal(IDENTIFIER);
    let head = b.nonterminal(label);
    b.set_header(head, identifier);
    let then = then.unwrap_or(head);
    b.set_next(head, then);

    let string = b.terminal(STRING);
    b.set_next(string, then);
    b.set_alt(head, string);

    let mut last = string;
    for (open, close) in GROUPS {
        let open = b.terminal(open);
        let nested = b.nonterminal(EXPRESSION);
        let close = b.terminal(close);
        b.set_header(nested, expression);
        b.set_next(open, nested);
        b.set_next(nested, close);
        b.set_next(close, then);
        b.set_alt(last, open);
        last = open;
    }

    if let Some(otherwise) = otherwise {
        b.set_alt(last, otherwise);
    }
    head
}

pub fn grammar() -> Result<Grammar, GrammarError> {
    let mut b = GrammarBuilder::new();
    let syntax = b.nonterminal(SYNTAX);
    let expression = b.nonterminal(EXPRESSION);

    // Each production is its name followed by an `=` node. Only the name is
    // optional, so a production broken after its name is an error.
    let name = b.terminal(IDENTIFIER);
    let definition = b.terminal(EQUAL);
    let production = b.nonterminal(PRODUCTION);
    let body = b.nonterminal(EXPRESSION);
    let dot = b.terminal(DOT);
    let more = b.nonterminal(PRODUCTION);
    b.set_header(syntax, name);
    b.set_next(syntax, production);
    b.set_alt(syntax, SymbolId::EMPTY);
    b.set_header(production, definition);
    b.set_next(production, more);
    b.set_next(definition, body);
    b.set_header(body, expression);
    b.set_next(body, dot);
    b.set_header(more, name);
    b.set_next(more, production);
    b.set_alt(more, SymbolId::EMPTY);

    let repeated = factor(&mut b, TERM, expression, None, Some(SymbolId::EMPTY));
    let term = factor(&mut b, TERM, expression, Some(repeated), None);

    let bar = b.terminal(BAR);
    let alternative = b.nonterminal(TERM);
    b.set_header(expression, term);
    b.set_next(expression, bar);
    b.set_next(bar, alternative);
    b.set_alt(bar, SymbolId::EMPTY);
    b.set_header(alternative, term);
    b.set_next(alternative, bar);

    b.build(syntax)
}

pub fn scanners() -> Vec<ScannerFactory> {
    let mut scanners = vec![
        ScannerFactory::identifier(),
        ScannerFactory::space(),
        ScannerFactory::quoted(),
        ScannerFactory::literal(EQUAL),
        ScannerFactory::literal(DOT),
        ScannerFactory::literal(BAR),
    ];
    for (open, close) in GROUPS {
        scanners.push(ScannerFactory::literal(open));
        scanners.push(ScannerFactory::literal(close));
    }
    scanners
}
