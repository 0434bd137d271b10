use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Sentences to recognise (default: one per line from stdin)
    pub sentences: Vec<String>,

    /// Root of printed trees (default: first symbol spanning the sentence)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<String>,

    /// Print a derivation tree for each derivable sentence
    #[arg(short, long)]
    pub tree: bool,

    /// Print the chart built for each sentence
    #[arg(short, long)]
    pub chart: bool,

    /// Recognise only; trees are unavailable
    #[arg(short, long)]
    pub recognise_only: bool,

    /// Trace chart construction to stderr
    #[arg(short, long)]
    pub verbose: bool
}
