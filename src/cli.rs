use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GrammarChoice {
    /// Propositional predicates
    Predicate,
    /// EBNF productions
    Ebnf,
}

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File to parse (default: standard input)
    pub file: Option<PathBuf>,

    /// Text to parse instead of a file
    #[arg(short, long, value_name = "TEXT", conflicts_with = "file")]
    pub expression: Option<String>,

    /// Grammar to parse with
    #[arg(short, long, value_enum, default_value_t = GrammarChoice::Predicate)]
    pub grammar: GrammarChoice,

    /// Print the tokens instead of the tree
    #[arg(short, long)]
    pub tokens: bool,

    /// Print the partial tree when parsing fails
    #[arg(short, long)]
    pub partial: bool
}
