//! Extended CKY recognition for context-free grammars whose rules have one
//! or two symbols on the right-hand side.
//!
//! ```no_run
//! use ckychart::cky::{Cky, Recognition};
//! use ckychart::parser::parse_str;
//!
//! let grammar = parse_str("S = NP VP\nNP = 'dog'\nVP = 'barks'").unwrap();
//! let mut cky = Cky::new(&grammar).unwrap();
//! assert_eq!(cky.recognise(&["dog", "barks"]), Recognition::DerivationCount(1));
//! assert_eq!(cky.build_tree().unwrap(), "(S (NP dog) (VP barks))");
//! ```

pub mod cky;
pub mod error_handling;
pub mod grammar;
pub mod parser;
