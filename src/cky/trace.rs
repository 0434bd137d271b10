/*
    Diagnostic hooks called while a chart is being built
*/

use crate::grammar::Symbol;

/// Observer of chart construction. Tracers only watch: nothing they do can
/// change what ends up in the chart.
pub trait Tracer {
    /// Called before the cells `(start, mid)` and `(mid, end)` are combined.
    fn before_combination(&mut self, _start: usize, _mid: usize, _end: usize) {}

    /// Called after a label with a new symbol has been added to a cell.
    fn label_added(&mut self, _row: usize, _column: usize, _symbol: &Symbol, _depth: usize) {}

    /// Called when a unary rule `parent -> child` fires.
    fn unary_step(&mut self, _parent: &Symbol, _child: &Symbol, _depth: usize) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl Tracer for NoTrace {}

/// Forwards every event to `tracing` at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl Tracer for LogTrace {
    fn before_combination(&mut self, start: usize, mid: usize, end: usize) {
        tracing::trace!(start, mid, end, "combining");
    }

    fn label_added(&mut self, row: usize, column: usize, symbol: &Symbol, depth: usize) {
        tracing::trace!(row, column, %symbol, depth, "label added");
    }

    fn unary_step(&mut self, parent: &Symbol, child: &Symbol, depth: usize) {
        tracing::trace!(%parent, %child, depth, "unary rule");
    }
}

// Records events as plain strings, in the order they happened
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingTrace {
    pub events: Vec<String>,
}

#[cfg(test)]
impl Tracer for RecordingTrace {
    fn before_combination(&mut self, start: usize, mid: usize, end: usize) {
        self.events.push(format!("{}--{}--{}", start, mid, end));
    }

    fn label_added(&mut self, row: usize, column: usize, symbol: &Symbol, depth: usize) {
        self.events.push(format!("{}{} @ ({}, {})", "  ".repeat(depth), symbol, row, column));
    }

    fn unary_step(&mut self, parent: &Symbol, child: &Symbol, depth: usize) {
        self.events.push(format!("{}{} -> {}", "  ".repeat(depth), parent, child));
    }
}
