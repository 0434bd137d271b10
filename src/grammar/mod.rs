/*
    This module is for storing grammars as flat, ordered production lists
*/

use std::fmt::Display;

use itertools::Itertools;

use crate::error_handling::Location;

// The base unit in a grammar rule. Input tokens are terminals.
#[derive(Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
pub enum Symbol {
    Terminal(String),
    Nonterminal(String),
}

impl Symbol {
    pub fn terminal(text: impl Into<String>) -> Self {
        Symbol::Terminal(text.into())
    }

    pub fn nonterminal(name: impl Into<String>) -> Self {
        Symbol::Nonterminal(name.into())
    }

    pub fn text(&self) -> &str {
        match self {
            Symbol::Terminal(t) | Symbol::Nonterminal(t) => t,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "\"{}\"", t),
            Symbol::Nonterminal(n) => write!(f, "{}", n),
        }
    }
}

// The symbols in a single alternative
pub type Alternative = Vec<Symbol>;

// The alternatives of a rewrite rule
pub type Rewrite = Vec<Alternative>;

/// One `lhs -> rhs` rule together with where it was written down.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Production {
    pub lhs: Symbol,
    pub rhs: Alternative,
    pub location: Location,
}

impl Production {
    pub fn new(lhs: Symbol, rhs: Alternative) -> Self {
        Production {
            lhs,
            rhs,
            location: Location::memory(),
        }
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.lhs, self.rhs.iter().join(" "))
    }
}

#[derive(Debug, PartialEq)]
pub struct Grammar {
    pub start_symbol: String,
    pub productions: Vec<Production>,
}

impl Grammar {
    pub fn new(start_symbol: impl Into<String>, productions: Vec<Production>) -> Self {
        Grammar {
            start_symbol: start_symbol.into(),
            productions,
        }
    }

    pub fn start(&self) -> Symbol {
        Symbol::Nonterminal(self.start_symbol.clone())
    }
}
