/*
    The triangular chart and the bottom-up procedure that fills it
*/

use std::fmt::Display;
use std::iter::once;

use itertools::Itertools;

use crate::grammar::Symbol;
use super::index::GrammarIndex;
use super::trace::Tracer;

/// Position of a label in its chart's label pool.
pub type LabelId = usize;

/// A symbol found over some span, with the labels it was built from when
/// the chart keeps back-pointers.
#[derive(Debug, Clone)]
pub struct Label {
    symbol: Symbol,
    left: Option<LabelId>,
    right: Option<LabelId>,
    derived: bool,
}

impl Label {
    fn leaf(symbol: Symbol) -> Self {
        Label { symbol, left: None, right: None, derived: false }
    }

    fn unary(symbol: Symbol, child: Option<LabelId>) -> Self {
        Label { symbol, left: child, right: None, derived: true }
    }

    fn binary(symbol: Symbol, children: Option<(LabelId, LabelId)>) -> Self {
        Label {
            symbol,
            left: children.map(|(left, _)| left),
            right: children.map(|(_, right)| right),
            derived: true,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn left(&self) -> Option<LabelId> {
        self.left
    }

    pub fn right(&self) -> Option<LabelId> {
        self.right
    }

    // True for everything produced by a rule, false for input tokens
    pub fn is_derived(&self) -> bool {
        self.derived
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

// Labels are the same when their symbols are, however they were derived
impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Label {}

/// Everything derivable over the tokens `row..column`.
#[derive(Debug, Clone)]
pub struct Cell {
    row: usize,
    column: usize,
    labels: Vec<LabelId>,
}

impl Cell {
    fn new(row: usize, column: usize) -> Self {
        Cell { row, column, labels: Vec::new() }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    // In the order they were discovered
    pub fn label_ids(&self) -> &[LabelId] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Upper-triangular matrix of cells over one token sequence.
///
/// Rows are start offsets and columns end offsets, so the token `i` sits in
/// `(i, i + 1)` and the whole input in `(0, n - 1)`:
///
/// ```text
///      1   2   3
///  0   .   .   Z
///  1       Y   .
///  2           .
/// ```
#[derive(Debug, Clone)]
pub struct Chart {
    tokens: Vec<String>,
    // token count + 1
    n: usize,
    matrix: Vec<Vec<Option<Cell>>>,
    pool: Vec<Label>,
    keep_children: bool,
}

impl Chart {
    fn new(tokens: Vec<String>, keep_children: bool) -> Self {
        let n = tokens.len() + 1;
        let matrix = (0..n - 1)
            .map(|row| {
                (0..n)
                    .map(|column| (column > row).then(|| Cell::new(row, column)))
                    .collect_vec()
            })
            .collect_vec();

        Chart { tokens, n, matrix, pool: Vec::new(), keep_children }
    }

    pub(crate) fn build(
        index: &GrammarIndex,
        tokens: Vec<String>,
        keep_children: bool,
        tracer: &mut dyn Tracer,
    ) -> Self {
        let mut builder = ChartBuilder {
            index,
            tracer,
            chart: Chart::new(tokens, keep_children),
        };
        builder.seed_diagonal();
        builder.binary_scan();
        builder.chart
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn keeps_children(&self) -> bool {
        self.keep_children
    }

    /// `None` for grid positions below the diagonal or outside the chart.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.matrix.get(row)?.get(column)?.as_ref()
    }

    /// The cell spanning the whole input. Empty input has none.
    pub fn top_cell(&self) -> Option<&Cell> {
        self.cell(0, self.n - 1)
    }

    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.pool.get(id)
    }

    pub fn labels<'a>(&'a self, cell: &'a Cell) -> impl Iterator<Item = &'a Label> + 'a {
        cell.labels.iter().filter_map(move |&id| self.pool.get(id))
    }

    pub fn symbols<'a>(&'a self, cell: &'a Cell) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.labels(cell).map(Label::symbol)
    }

    /// Labels spanning the whole input, first discovered first.
    pub fn top_labels(&self) -> &[LabelId] {
        self.top_cell().map(Cell::label_ids).unwrap_or(&[])
    }

    /// Top labels produced by some rule. A lone input token also sits in the
    /// top cell but derives nothing.
    pub fn derivations(&self) -> Vec<LabelId> {
        self.top_labels()
            .iter()
            .copied()
            .filter(|&id| self.pool.get(id).is_some_and(Label::is_derived))
            .collect_vec()
    }

    // Appends a label unless its cell already holds the symbol
    fn insert(&mut self, row: usize, column: usize, label: Label) -> Option<LabelId> {
        let cell = self.matrix.get_mut(row)?.get_mut(column)?.as_mut()?;
        if cell.labels.iter().any(|&id| self.pool[id] == label) {
            return None;
        }
        let id = self.pool.len();
        self.pool.push(label);
        cell.labels.push(id);
        Some(id)
    }
}

struct ChartBuilder<'a> {
    index: &'a GrammarIndex,
    tracer: &'a mut dyn Tracer,
    chart: Chart,
}

impl ChartBuilder<'_> {
    // Puts every token on the diagonal and closes it under unary rules
    fn seed_diagonal(&mut self) {
        for (position, token) in self.chart.tokens.clone().into_iter().enumerate() {
            self.add_label(position, position + 1, Label::leaf(Symbol::Terminal(token)), 0);
        }
    }

    // Shorter spans are finished before longer spans start
    fn binary_scan(&mut self) {
        let n = self.chart.n;
        for span in 2..n {
            for start in 0..n - span {
                let end = start + span;
                for mid in start + 1..end {
                    self.maybe_build(start, mid, end);
                }
            }
        }
    }

    fn maybe_build(&mut self, start: usize, mid: usize, end: usize) {
        self.tracer.before_combination(start, mid, end);

        let index = self.index;
        let lefts = self.chart.cell(start, mid).map(|c| c.labels.clone()).unwrap_or_default();
        let rights = self.chart.cell(mid, end).map(|c| c.labels.clone()).unwrap_or_default();

        for &left in &lefts {
            for &right in &rights {
                let parents = index.binary_parents(
                    &self.chart.pool[left].symbol,
                    &self.chart.pool[right].symbol,
                );
                for parent in parents {
                    let children = self.chart.keep_children.then_some((left, right));
                    self.add_label(start, end, Label::binary(parent.clone(), children), 1);
                }
            }
        }
    }

    // Adds a label and, if it was new, everything it reaches through unary
    // rules. Parents are visited depth first in grammar order, so labels land
    // in the cell in the same order a recursive closure would add them.
    fn add_label(&mut self, row: usize, column: usize, label: Label, depth: usize) {
        let Some(id) = self.chart.insert(row, column, label) else {
            return;
        };
        self.tracer.label_added(row, column, &self.chart.pool[id].symbol, depth);

        // (label, index of the next unary parent to try). A symbol enters
        // the cell at most once, which bounds the walk even on unary cycles.
        let index = self.index;
        let mut stack: Vec<(LabelId, usize)> = vec![(id, 0)];
        while let Some(&(child, next)) = stack.last() {
            let Some(parent) = index.unary_parents(&self.chart.pool[child].symbol).get(next) else {
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            let parent_depth = depth + stack.len();
            self.tracer.unary_step(parent, &self.chart.pool[child].symbol, parent_depth);

            let child_id = self.chart.keep_children.then_some(child);
            if let Some(added) = self.chart.insert(row, column, Label::unary(parent.clone(), child_id)) {
                self.tracer.label_added(row, column, parent, parent_depth);
                stack.push((added, 0));
            }
        }
    }
}

impl Display for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.matrix.is_empty() {
            return write!(f, "(no tokens)");
        }

        let columns = 1..self.n;
        let texts = self.matrix
            .iter()
            .map(|row| {
                columns.clone().map(|column| match &row[column] {
                    Some(cell) if cell.is_empty() => ".".to_string(),
                    Some(cell) => self.symbols(cell).join(", "),
                    None => String::new(),
                }).collect_vec()
            })
            .collect_vec();

        let widths = columns.clone()
            .map(|column| {
                texts.iter()
                    .map(|row| row[column - 1].chars().count())
                    .chain(once(column.to_string().len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect_vec();
        let margin = (self.n - 2).to_string().len();

        let line = |head: String, cells: Vec<String>| {
            once(format!("{:<margin$}", head))
                .chain(cells.into_iter().zip(&widths).map(|(text, &width)| format!("{:<width$}", text)))
                .join("  ")
                .trim_end()
                .to_string()
        };

        let header = line(String::new(), columns.clone().map(|c| c.to_string()).collect());
        let rows = texts.into_iter().enumerate().map(|(row, cells)| line(row.to_string(), cells));

        write!(f, "{}", once(header).chain(rows).join("\n"))
    }
}
