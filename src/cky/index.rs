/*
    This module splits a grammar into lookup tables keyed by right-hand sides
*/

use std::collections::HashMap;

use itertools::Itertools;
use thiserror::Error;

use crate::error_handling::*;
use crate::grammar::{Production, Symbol};

#[derive(Debug, Error, PartialEq)]
pub enum IndexErrorType {
    // Only one or two symbols may appear on a right-hand side
    #[error("`{production}` has {arity} symbols on its right-hand side, expected 1 or 2")]
    MalformedProduction { production: Production, arity: usize },
    // Unary rules rewrite back into a symbol already on the chain
    #[error("Unary rules form a cycle: {}", .cycle.iter().join(" -> "))]
    CyclicUnaryRule { cycle: Vec<Symbol> },
}

impl ErrorType for IndexErrorType {}

pub type IndexError = Error<IndexErrorType>;
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Bottom-up view of a grammar: given what has been found, which
/// nonterminals can be built from it.
#[derive(Debug, Default)]
pub struct GrammarIndex {
    // child -> parents, in grammar order
    unary: HashMap<Symbol, Vec<Symbol>>,
    // left child -> right child -> parents, in grammar order
    binary: HashMap<Symbol, HashMap<Symbol, Vec<Symbol>>>,
}

impl GrammarIndex {
    pub fn build(productions: &[Production]) -> IndexResult<Self> {
        let mut index = GrammarIndex::default();

        for production in productions {
            match &production.rhs[..] {
                [child] => index.unary
                    .entry(child.clone())
                    .or_default()
                    .push(production.lhs.clone()),
                [left, right] => index.binary
                    .entry(left.clone())
                    .or_default()
                    .entry(right.clone())
                    .or_default()
                    .push(production.lhs.clone()),
                rhs => return Err(IndexError {
                    location: production.location.clone(),
                    error: IndexErrorType::MalformedProduction {
                        production: production.clone(),
                        arity: rhs.len()
                    }
                }),
            }
        }

        if let Some((cycle, location)) = find_unary_cycle(productions) {
            return Err(IndexError {
                location,
                error: IndexErrorType::CyclicUnaryRule { cycle }
            });
        }

        tracing::debug!(
            unary = index.unary_rule_count(),
            binary = index.binary_rule_count(),
            "indexed grammar"
        );

        Ok(index)
    }

    pub fn unary_parents(&self, child: &Symbol) -> &[Symbol] {
        self.unary.get(child).map(Vec::as_slice).unwrap_or(&[])
    }

    // Order matters: `A -> B C` says nothing about `C B`
    pub fn binary_parents(&self, left: &Symbol, right: &Symbol) -> &[Symbol] {
        self.binary
            .get(left)
            .and_then(|rights| rights.get(right))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn unary_rule_count(&self) -> usize {
        self.unary.values().map(Vec::len).sum()
    }

    pub fn binary_rule_count(&self) -> usize {
        self.binary.values().flat_map(HashMap::values).map(Vec::len).sum()
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    OnPath,
    Done,
}

// Depth-first search over child -> parent edges of the unary rules. Returns
// the cycle written as a chain of rewrites (`A -> B -> A`) together with the
// location of the rule that closes it.
fn find_unary_cycle(productions: &[Production]) -> Option<(Vec<Symbol>, Location)> {
    let unary = productions.iter().filter(|p| p.rhs.len() == 1).collect_vec();

    let mut edges: HashMap<&Symbol, Vec<&Production>> = HashMap::new();
    for production in &unary {
        edges.entry(&production.rhs[0]).or_default().push(production);
    }

    let mut marks: HashMap<&Symbol, Mark> = HashMap::new();
    for root in unary.iter().map(|p| &p.rhs[0]) {
        if marks.contains_key(root) {
            continue;
        }

        // (symbol, index of the next edge to follow)
        let mut path: Vec<(&Symbol, usize)> = vec![(root, 0)];
        marks.insert(root, Mark::OnPath);

        while let Some(&(symbol, next)) = path.last() {
            let Some(production) = edges.get(symbol).and_then(|out| out.get(next)) else {
                marks.insert(symbol, Mark::Done);
                path.pop();
                continue;
            };
            if let Some(top) = path.last_mut() {
                top.1 += 1;
            }

            let parent = &production.lhs;
            match marks.get(parent) {
                Some(Mark::OnPath) => {
                    let from = path.iter().position(|(s, _)| *s == parent).unwrap_or(0);
                    let mut cycle = path[from..].iter().map(|(s, _)| (*s).clone()).collect_vec();
                    cycle.push(parent.clone());
                    cycle.reverse();
                    return Some((cycle, production.location.clone()));
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(parent, Mark::OnPath);
                    path.push((parent, 0));
                }
            }
        }
    }

    None
}
