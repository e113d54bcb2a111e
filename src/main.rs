mod cli;

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use log::info;

use cli::{Cli, GrammarChoice};
use descent::Language;

fn read_input(cli: &Cli) -> std::io::Result<String> {
    match (&cli.expression, &cli.file) {
        (Some(expression), _) => Ok(expression.clone()),
        (None, Some(file)) => std::fs::read_to_string(file),
        (None, None) => std::io::read_to_string(std::io::stdin()),
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let language = match cli.grammar {
        GrammarChoice::Predicate => Language::predicate()?,
        GrammarChoice::Ebnf => Language::ebnf()?,
    };
    let text = read_input(cli)?;
    info!("parsing with the {} grammar", language.name());

    if cli.tokens {
        let tokens = language.tokenize(&text)?;
        println!("{}", tokens.iter().join(" "));
        return Ok(());
    }

    match language.parse_partial(&text) {
        (tree, None) => print!("{}", tree),
        (tree, Some(error)) => {
            if cli.partial {
                print!("{}", tree);
            }
            return Err(error.into());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}
