pub mod error_handling;
pub mod grammar;
pub mod language;
pub mod parser;

pub use grammar::{Grammar, GrammarBuilder, GrammarError, SymbolId};
pub use language::Language;
pub use parser::{ParseError, ParseErrorType, Tree};
