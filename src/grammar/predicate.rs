/*
    The predicate-logic grammar

    predicate = term {('≡'|'≢') term}.
    term      = junction ['⇒' junction {'⇒' junction} | '⇐' junction {'⇐' junction}].
    junction  = factor ['∨' factor {'∨' factor} | '∧' factor {'∧' factor}].
    factor    = ['¬'] (identifier | '(' predicate ')').
*/

use super::{Grammar, GrammarBuilder, GrammarError, SymbolId};
use crate::parser::scanner::{ScannerFactory, IDENTIFIER};

pub const NOT: &str = "¬";
pub const AND: &str = "∧";
pub const OR: &str = "∨";
pub const EQUIVALES: &str = "≡";
pub const NOT_EQUIVALES: &str = "≢";
pub const IMPLIES: &str = "⇒";
pub const FOLLOWS: &str = "⇐";
pub const OPEN: &str = "(";
pub const CLOSE: &str = ")";

pub const PREDICATE: &str = "predicate";
pub const TERM: &str = "term";
pub const JUNCTION: &str = "junction";
pub const FACTOR: &str = "factor";
pub const NEGATION: &str = "negation";

// identifier | '(' predicate ')', headed by a non-terminal labelled `label`
fn operand(b: &mut GrammarBuilder, label: &str, predicate: SymbolId) -> SymbolId {
    let identifier = b.terminal(IDENTIFIER);
    let head = b.nonterminal(label);
    b.set_header(head, identifier);

    let open = b.terminal(OPEN);
    let nested = b.nonterminal(PREDICATE);
    let close = b.terminal(CLOSE);
    b.set_header(nested, predicate);
    b.set_next(open, nested);
    b.set_next(nested, close);
    b.set_alt(head, open);

    head
}

// op operand {op operand}, trying `otherwise` when the first op is missing.
// Only the operator checks have alternatives, so a missing operand after an
// operator is an error rather than the end of the repetition.
fn repetition(b: &mut GrammarBuilder, op: &str, label: &str, operand: SymbolId, otherwise: SymbolId) -> SymbolId {
    let first = b.terminal(op);
    let again = b.terminal(op);
    let body = b.nonterminal(label);
    b.set_header(body, operand);
    b.set_next(first, body);
    b.set_alt(first, otherwise);
    b.set_next(body, again);
    b.set_next(again, body);
    b.set_alt(again, SymbolId::EMPTY);
    first
}

// [op body {op body} | other body {other body}]
fn optional_tail(b: &mut GrammarBuilder, op: &str, other: &str, label: &str, operand: SymbolId) -> SymbolId {
    let second = repetition(b, other, label, operand, SymbolId::EMPTY);
    repetition(b, op, label, operand, second)
}

pub fn grammar() -> Result<Grammar, GrammarError> {
    let mut b = GrammarBuilder::new();
    let predicate = b.nonterminal(PREDICATE);
    let term = b.nonterminal(TERM);
    let junction = b.nonterminal(JUNCTION);
    let factor = b.nonterminal(FACTOR);

    // factor: the `¬` leaf and a negation node, or a bare operand
    let not = b.terminal(NOT);
    let negation = operand(&mut b, NEGATION, predicate);
    let negated = b.nonterminal(NEGATION);
    b.set_header(negated, negation);
    let plain = operand(&mut b, FACTOR, predicate);
    b.set_header(factor, not);
    b.set_next(factor, negated);
    b.set_alt(factor, plain);

    b.set_header(junction, factor);
    let tail = optional_tail(&mut b, AND, OR, FACTOR, factor);
    b.set_next(junction, tail);

    b.set_header(term, junction);
    let tail = optional_tail(&mut b, IMPLIES, FOLLOWS, JUNCTION, junction);
    b.set_next(term, tail);

    b.set_header(predicate, term);
    let equivales = b.terminal(EQUIVALES);
    let differs = b.terminal(NOT_EQUIVALES);
    let more = b.nonterminal(TERM);
    b.set_header(more, term);
    b.set_next(predicate, equivales);
    b.set_next(equivales, more);
    b.set_alt(equivales, differs);
    b.set_next(differs, more);
    b.set_alt(differs, SymbolId::EMPTY);
    b.set_next(more, equivales);

    b.build(predicate)
}

pub fn scanners() -> Vec<ScannerFactory> {
    let mut scanners = vec![ScannerFactory::identifier(), ScannerFactory::space()];
    scanners.extend(
        [NOT, AND, OR, EQUIVALES, NOT_EQUIVALES, IMPLIES, FOLLOWS, OPEN, CLOSE]
            .into_iter()
            .map(ScannerFactory::literal)
    );
    scanners
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use rand::prelude::*;
    use rand::rngs::StdRng;

    use super::*;
    use crate::language::Language;
    use crate::parser::{ParseErrorType, Tree};
    use crate::parser::stream::Token;

    fn node(label: &str, children: Vec<Tree>) -> Tree {
        Tree { value: label.to_string(), token: false, children }
    }

    fn leaf(value: &str) -> Tree {
        Tree::leaf(value)
    }

    fn factor(identifier: &str) -> Tree {
        node(FACTOR, vec![leaf(identifier)])
    }

    fn negated(identifier: &str) -> Tree {
        node(FACTOR, vec![leaf(NOT), node(NEGATION, vec![leaf(identifier)])])
    }

    // A predicate made of a single junction
    fn junction(children: Vec<Tree>) -> Tree {
        node(PREDICATE, vec![node(TERM, vec![node(JUNCTION, children)])])
    }

    fn language() -> Language {
        Language::predicate().unwrap()
    }

    #[test]
    fn parse_predicates() {
        let inputs = vec!["true ∧ false", "¬A", "¬A ∧ (B ∨ C)", "A ∨ ¬(B ∧ C)"];
        let answers = vec![
            junction(vec![factor("true"), leaf(AND), factor("false")]),
            junction(vec![negated("A")]),
            junction(vec![
                negated("A"),
                leaf(AND),
                node(FACTOR, vec![
                    leaf(OPEN),
                    junction(vec![factor("B"), leaf(OR), factor("C")]),
                    leaf(CLOSE),
                ]),
            ]),
            junction(vec![
                factor("A"),
                leaf(OR),
                node(FACTOR, vec![
                    leaf(NOT),
                    node(NEGATION, vec![
                        leaf(OPEN),
                        junction(vec![factor("B"), leaf(AND), factor("C")]),
                        leaf(CLOSE),
                    ]),
                ]),
            ]),
        ];

        let language = language();
        for (input, answer) in zip(inputs, answers) {
            assert_eq!(language.parse(input).unwrap(), answer, "parsing {}", input);
        }
    }

    #[test]
    fn parse_equivalence_and_implication() {
        let tree = language().parse("A ≡ B ⇒ C").unwrap();
        assert_eq!(tree, node(PREDICATE, vec![
            node(TERM, vec![node(JUNCTION, vec![factor("A")])]),
            leaf(EQUIVALES),
            node(TERM, vec![
                node(JUNCTION, vec![factor("B")]),
                leaf(IMPLIES),
                node(JUNCTION, vec![factor("C")]),
            ]),
        ]));
    }

    #[test]
    fn accepted_predicates() {
        let inputs = vec![
            "A ≡ B ≢ ¬C ⇒ D",
            "A ≡ B ≡ ¬C ⇐ D",
            "A ≡ B ≡ ¬(C ⇐ D)",
            "A ∨ B ∨ C",
            "A ∨ (B ∧ C)",
            "A ⇒ (B ⇐ C)",
            "a ≡ b ≢ c ≡ ¬x ∧ (¬z ≡ y) ≢ true",
        ];
        let language = language();
        for input in inputs {
            assert!(language.parse(input).is_ok(), "parsing {}", input);
        }
    }

    #[test]
    fn rejected_predicates() {
        let inputs = vec!["", "true ∧", "A ∨ B ∧ C", "A ⇒ B ⇐ C", "¬(A B", "A # B", "¬¬A", "A ≡"];
        let answers = vec![
            ParseErrorType::UnexpectedEof { expected: OPEN.to_string() },
            ParseErrorType::UnexpectedEof { expected: OPEN.to_string() },
            ParseErrorType::RemainingToken(Token::new(AND, AND)),
            ParseErrorType::RemainingToken(Token::new(FOLLOWS, FOLLOWS)),
            ParseErrorType::Expecting {
                expected: CLOSE.to_string(),
                actual: Token::new(IDENTIFIER, "B")
            },
            ParseErrorType::UnsupportedCharacter('#'),
            ParseErrorType::Expecting {
                expected: OPEN.to_string(),
                actual: Token::new(NOT, NOT)
            },
            ParseErrorType::UnexpectedEof { expected: OPEN.to_string() },
        ];

        let language = language();
        for (input, answer) in zip(inputs, answers) {
            assert_eq!(language.parse(input).unwrap_err().error, answer, "parsing {}", input);
        }
    }

    #[test]
    fn partial_tree_on_failure() {
        let (tree, error) = language().parse_partial("true ∧");
        assert_eq!(error.map(|e| e.error), Some(ParseErrorType::UnexpectedEof { expected: OPEN.to_string() }));
        assert_eq!(tree, junction(vec![factor("true"), leaf(AND), node(FACTOR, vec![])]));
    }

    #[test]
    fn scanners_cover_grammar() {
        let grammar = grammar().unwrap();
        let scanners = scanners();
        for terminal in grammar.terminals() {
            assert!(scanners.iter().any(|s| s.category() == terminal), "no scanner for {}", terminal);
        }
    }

    type Generator = fn(&mut StdRng, usize, &mut Vec<String>);

    // operand {op operand}, with one operator throughout unless `mixed`
    fn generate_operands(rng: &mut StdRng, depth: usize, tokens: &mut Vec<String>, ops: &[&str], mixed: bool,
                         operand: Generator) {
        operand(rng, depth, tokens);
        let op = *ops.choose(rng).unwrap();
        for _ in 0..rng.gen_range(0..3) {
            let op = if mixed { *ops.choose(rng).unwrap() } else { op };
            tokens.push(op.to_string());
            operand(rng, depth, tokens);
        }
    }

    fn generate_factor(rng: &mut StdRng, depth: usize, tokens: &mut Vec<String>) {
        if rng.gen_bool(0.3) {
            tokens.push(NOT.to_string());
        }
        if depth == 0 || rng.gen_bool(0.7) {
            let names = ["p", "q", "true", "x1", "Ab9"];
            tokens.push(names.choose(rng).unwrap().to_string());
        } else {
            tokens.push(OPEN.to_string());
            generate(rng, depth - 1, tokens);
            tokens.push(CLOSE.to_string());
        }
    }

    fn generate_junction(rng: &mut StdRng, depth: usize, tokens: &mut Vec<String>) {
        generate_operands(rng, depth, tokens, &[AND, OR], false, generate_factor);
    }

    fn generate_term(rng: &mut StdRng, depth: usize, tokens: &mut Vec<String>) {
        generate_operands(rng, depth, tokens, &[IMPLIES, FOLLOWS], false, generate_junction);
    }

    // Random well-formed predicates, as token texts
    fn generate(rng: &mut StdRng, depth: usize, tokens: &mut Vec<String>) {
        generate_operands(rng, depth, tokens, &[EQUIVALES, NOT_EQUIVALES], true, generate_term);
    }

    fn spaced(rng: &mut StdRng, tokens: &[String]) -> String {
        let mut text = String::new();
        for token in tokens {
            for _ in 0..rng.gen_range(0..3) {
                text.push(*[' ', '\t', '\n'].choose(rng).unwrap());
            }
            text.push_str(token);
        }
        text
    }

    #[test]
    fn tree_reproduces_tokens() {
        let language = language();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let mut tokens = Vec::new();
            generate(&mut rng, 3, &mut tokens);
            let text = spaced(&mut rng, &tokens);

            let tree = language.parse(&text).unwrap();
            assert_eq!(tree.tokens(), tokens, "parsing {:?}", text);
        }
    }

    #[test]
    fn whitespace_is_transparent() {
        let language = language();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let mut tokens = Vec::new();
            generate(&mut rng, 2, &mut tokens);
            let first = spaced(&mut rng, &tokens);
            let second = spaced(&mut rng, &tokens);

            assert_eq!(language.tokenize(&first).unwrap(), language.tokenize(&second).unwrap());
        }
    }
}
