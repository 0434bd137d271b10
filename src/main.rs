mod cli;

use std::io::BufRead;
use std::process::ExitCode;

use ckychart::cky::{Cky, CkyOptions};
use ckychart::grammar::Symbol;
use ckychart::parser;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn init_logging(verbose: bool) {
    let default = if verbose { "warn,ckychart=trace" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn report(cky: &mut Cky, cli: &Cli, sentence: &str) {
    let tokens: Vec<&str> = sentence.split_whitespace().collect();

    let recognition = cky.recognise(&tokens);
    match recognition.count() {
        0 => println!("{}: no derivation", sentence),
        1 => println!("{}: 1 derivation", sentence),
        count => println!("{}: {} derivations", sentence, count),
    }

    if cli.chart {
        if let Some(chart) = cky.chart() {
            println!("{}", chart);
        }
    }

    if cli.tree && recognition.is_derivable() {
        let tree = match &cli.start {
            Some(start) => cky.build_tree_for(&Symbol::Nonterminal(start.clone())),
            None => cky.build_tree(),
        };
        match tree {
            Ok(tree) => println!("{}", tree),
            Err(error) => eprintln!("{}", error),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let grammar = match parser::parse_file(&cli.file) {
        Ok(grammar) => grammar,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(start = %grammar.start(), productions = grammar.productions.len(), "loaded grammar");

    let options = CkyOptions { build_trees: !cli.recognise_only };
    let mut cky = match Cky::with_options(&grammar, options) {
        Ok(cky) => cky,
        Err(error) => {
            eprintln!("{}", error);
            return ExitCode::FAILURE;
        }
    };

    if !cli.sentences.is_empty() {
        for sentence in &cli.sentences {
            report(&mut cky, &cli, sentence);
        }
        return ExitCode::SUCCESS;
    }

    for line in std::io::stdin().lock().lines() {
        match line {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => report(&mut cky, &cli, line.trim()),
            Err(error) => {
                eprintln!("Could not read stdin: {}", error);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
