/*
    This module recognises token sequences with an extended CKY chart.

    Unlike textbook CKY the grammar does not have to be in Chomsky Normal
    Form: unary rules may chain (X -> Y, Y -> Z) and binary rules may mix
    terminals with nonterminals (VP -> V "up").
*/

mod chart;
mod index;
mod trace;
mod tree;

use thiserror::Error;

use crate::grammar::{Grammar, Production, Symbol};

pub use chart::{Cell, Chart, Label, LabelId};
pub use index::{GrammarIndex, IndexError, IndexErrorType, IndexResult};
pub use trace::{LogTrace, NoTrace, Tracer};

/// Outcome of recognising one token sequence.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Recognition {
    /// How many distinct nonterminals derive the whole input. Always at
    /// least one.
    DerivationCount(usize),
    NoDerivation,
}

impl Recognition {
    fn from_chart(chart: &Chart) -> Self {
        match chart.derivations().len() {
            0 => Recognition::NoDerivation,
            count => Recognition::DerivationCount(count),
        }
    }

    pub fn is_derivable(&self) -> bool {
        matches!(self, Recognition::DerivationCount(_))
    }

    pub fn count(&self) -> usize {
        match self {
            Recognition::DerivationCount(count) => *count,
            Recognition::NoDerivation => 0,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    // Nothing spans the input, or nothing has been parsed yet
    #[error("No derivation to build a tree from: {}", describe_top(.top))]
    EmptyChart { top: Option<(usize, usize)> },
    // The engine was asked not to keep back-pointers
    #[error("Trees are unavailable when recognising only")]
    TreesDisabled,
    // An explicit root was asked for that does not span the input
    #[error("`{0}` does not span the whole input")]
    NotInTopCell(Symbol),
}

fn describe_top(top: &Option<(usize, usize)>) -> String {
    match top {
        Some((row, column)) => format!("cell ({}, {}) is empty", row, column),
        None => "no tokens have been recognised yet".to_string(),
    }
}

pub type TreeResult<T> = std::result::Result<T, TreeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CkyOptions {
    /// Keep back-pointers so derivation trees can be read back.
    pub build_trees: bool,
}

impl Default for CkyOptions {
    fn default() -> Self {
        CkyOptions { build_trees: true }
    }
}

/// A grammar prepared for recognition, plus the chart of the most recent
/// call to [`Cky::recognise`].
#[derive(Debug)]
pub struct Cky {
    index: GrammarIndex,
    options: CkyOptions,
    chart: Option<Chart>,
}

impl Cky {
    pub fn new(grammar: &Grammar) -> IndexResult<Self> {
        Cky::with_options(grammar, CkyOptions::default())
    }

    pub fn with_options(grammar: &Grammar, options: CkyOptions) -> IndexResult<Self> {
        Cky::from_productions(&grammar.productions, options)
    }

    pub fn from_productions(productions: &[Production], options: CkyOptions) -> IndexResult<Self> {
        Ok(Cky {
            index: GrammarIndex::build(productions)?,
            options,
            chart: None,
        })
    }

    /// Builds a fresh chart without touching the engine, so one engine can
    /// serve many parses.
    pub fn parse<T: AsRef<str>>(&self, tokens: &[T]) -> Chart {
        self.parse_traced(tokens, &mut LogTrace)
    }

    pub fn parse_traced<T: AsRef<str>>(&self, tokens: &[T], tracer: &mut dyn Tracer) -> Chart {
        let tokens = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        Chart::build(&self.index, tokens, self.options.build_trees, tracer)
    }

    /// Parses `tokens` and keeps the chart for [`Cky::build_tree`].
    pub fn recognise<T: AsRef<str>>(&mut self, tokens: &[T]) -> Recognition {
        self.recognise_traced(tokens, &mut LogTrace)
    }

    pub fn recognise_traced<T: AsRef<str>>(&mut self, tokens: &[T], tracer: &mut dyn Tracer) -> Recognition {
        let chart = self.parse_traced(tokens, tracer);
        let recognition = Recognition::from_chart(&chart);
        tracing::debug!(tokens = tokens.len(), ?recognition, "recognised");

        self.chart = Some(chart);
        recognition
    }

    pub fn chart(&self) -> Option<&Chart> {
        self.chart.as_ref()
    }

    /// Tree for the first nonterminal found over the whole input.
    pub fn build_tree(&self) -> TreeResult<String> {
        let (chart, top) = self.top_labels()?;
        let first = top.first().copied().ok_or_else(|| empty_chart(chart))?;
        chart.tree(first).ok_or_else(|| empty_chart(chart))
    }

    /// Tree rooted at `symbol`, which has to span the whole input.
    pub fn build_tree_for(&self, symbol: &Symbol) -> TreeResult<String> {
        let (chart, top) = self.top_labels()?;
        let id = top
            .iter()
            .copied()
            .find(|&id| chart.label(id).is_some_and(|label| label.symbol() == symbol))
            .ok_or_else(|| TreeError::NotInTopCell(symbol.clone()))?;
        chart.tree(id).ok_or_else(|| empty_chart(chart))
    }

    fn top_labels(&self) -> TreeResult<(&Chart, Vec<LabelId>)> {
        if !self.options.build_trees {
            return Err(TreeError::TreesDisabled);
        }
        let chart = self.chart.as_ref().ok_or(TreeError::EmptyChart { top: None })?;
        match chart.derivations() {
            top if top.is_empty() => Err(empty_chart(chart)),
            top => Ok((chart, top)),
        }
    }
}

fn empty_chart(chart: &Chart) -> TreeError {
    TreeError::EmptyChart {
        top: chart.top_cell().map(|cell| (cell.row(), cell.column())),
    }
}
