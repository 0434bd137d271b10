/*
    This module parses BNF grammar files into ordered production lists
*/

mod lexer;
mod verifier;

use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use thiserror::Error;
use verifier::verify_rules;

#[derive(Debug, Error)]
pub enum CompileErrorType {
    // A line which should contain a rule does not
    #[error("Expected `=` or `->` after nonterminal")]
    MissingEquals,
    // A rule has multiple equals signs
    #[error("Unexpected `=` encountered")]
    UnexpectedEquals,
    // The user starts a rule line with something other than a nonterminal
    #[error("Tried to define something other than a nonterminal")]
    MissingNonterminal,
    // There is an unclosed quote
    #[error("Unmatched quotes")]
    UnmatchedQuote,
    // An undefined token was used
    #[error("Could not find definition for `{0}`")]
    UndefinedNonterminal(String),
    // Somehow a full rewrite was parsed as a base alternative
    // This is a problem with the loader, not the grammar
    #[error("Rewrite was not fully split (this is a problem with the loader, not the grammar)")]
    UnsplitRewrite,
    // A blank line got too deep into the parser
    // This is a problem with the loader, not the grammar
    #[error("Blank line encountered in rule parser (this is a problem with the loader, not the grammar)")]
    UnexpectedBlankLine,
    // There was an issue with reading a file
    #[error("File error: {0}")]
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        if let CompileErrorType::FileError(a) = self {
            if let CompileErrorType::FileError(b) = other {
                return a.kind() == b.kind();
            }
        }
        if let CompileErrorType::UndefinedNonterminal(a) = self {
            if let CompileErrorType::UndefinedNonterminal(b) = other {
                return a == b;
            }
        }
        return std::mem::discriminant(self) == std::mem::discriminant(other);
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: PathBuf) -> CompileError {
    CompileError {
        location: Location {
            file,
            line: 0
        },
        error: CompileErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: String,
    rewrite: Rewrite,
    location: Location
}

impl Rule {
    // One production per alternative, in the order they were written
    fn into_productions(self) -> impl Iterator<Item = Production> {
        let lhs = Symbol::Nonterminal(self.symbol);
        let location = self.location;
        self.rewrite.into_iter().map(move |rhs| Production {
            lhs: lhs.clone(),
            rhs,
            location: location.clone()
        })
    }
}

fn parse_alternative(tokens: &[Token]) -> Result<Alternative> {
    tokens.iter().map(|t| match t {
        Token::Equals => Err(CompileErrorType::UnexpectedEquals),
        Token::Or => Err(CompileErrorType::UnsplitRewrite),
        Token::Nonterminal(s) => Ok(Symbol::Nonterminal(s.clone())),
        Token::Terminal(s) => Ok(Symbol::Terminal(s.clone()))
    }).collect()
}

fn parse_rewrite(tokens: &[Token]) -> Result<Rewrite> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    // Try to get the token the rule is for. The match returns a result which
    // is then unwrapped with the ? operator
    let symbol = match tokens.get(0) {
        Some(Token::Nonterminal(s)) => Ok(s.clone()),
        Some(_) => Err(CompileErrorType::MissingNonterminal),
        None => Err(CompileErrorType::UnexpectedBlankLine)
    }?;

    if tokens.get(1) != Some(&Token::Equals) {
        return Err(CompileErrorType::MissingEquals)
    }

    let rewrite = parse_rewrite(&tokens[2..])?;

    return Ok(Rule {
        symbol,
        rewrite,
        location
    });
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| CompileError { location: location, error })
}

fn is_rule_line(line: &String) -> bool {
    let line = line.trim_start();
    !line.is_empty() && !line.starts_with(';') && !line.starts_with('#')
}

// Returns an iterator over the lines of a file, with the io errors wrapped
// in CompileError and enumerated
fn file_line_nums<'a>(file: File, path: &'a Path) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    number_rule_lines(
        std::io::BufReader::new(file)
            .lines()
            .map(move |line| line.map_err(|e| io_error(e, path.to_path_buf())))
    )
}

fn number_rule_lines(lines: impl Iterator<Item = LineResult<String>>) -> impl Iterator<Item = (usize, LineResult<String>)> {
    lines
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(is_rule_line) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

fn grammar_from_rules(rule_list: Vec<Rule>) -> FileResult<Grammar> {
    let start_symbol = if rule_list.len() > 0 {
        rule_list[0].symbol.clone()
    } else {
        String::new()
    };

    verify_rules(&rule_list)?;

    let productions = rule_list
        .into_iter()
        .flat_map(Rule::into_productions)
        .collect_vec();

    tracing::debug!(start = %start_symbol, productions = productions.len(), "loaded grammar");

    return Ok(Grammar {
        start_symbol,
        productions
    })
}

fn parse_lines(lines: impl Iterator<Item = (usize, LineResult<String>)>, path: &Path) -> FileResult<Grammar> {
    let parsed_lines = lines.map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location {
            file: path.to_path_buf(),
            line: num
        }))
    });

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition(LineResult::is_ok);
    if errors.len() > 0 {
        return Err(errors.into_iter().filter_map(LineResult::err).collect_vec());
    }
    let rules_unwrapped = rules.into_iter().filter_map(LineResult::ok).collect_vec();

    return grammar_from_rules(rules_unwrapped);
}

pub fn parse_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.to_path_buf())])?;
    let lines = file_line_nums(file, path);

    parse_lines(lines, path)
}

// Parses a grammar held in memory; locations point at `<memory>`
pub fn parse_str(text: &str) -> FileResult<Grammar> {
    let path = Location::memory().file;
    let lines = number_rule_lines(text.lines().map(|line| Ok(line.to_string())));

    parse_lines(lines, &path)
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    impl Location {
        pub fn new() -> Self {
            Location {
                file: PathBuf::new(),
                line: 0
            }
        }
    }

    fn s_nonterminal(text: &str) -> Symbol {
        Symbol::Nonterminal(text.to_string())
    }

    fn s_terminal(text: &str) -> Symbol {
        Symbol::Terminal(text.to_string())
    }

    #[test]
    fn parse_normal_alternative() {
        let lines = vec![
            vec![
                Token::Nonterminal("NP".to_string()),
                Token::Nonterminal("VP".to_string())
            ],
            vec![
                Token::Nonterminal("V".to_string()),
                Token::Terminal("up".to_string())
            ]
        ];
        let answers = vec![
            vec![
                s_nonterminal("NP"),
                s_nonterminal("VP")
            ],
            vec![
                s_nonterminal("V"),
                s_terminal("up")
            ]
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(parse_alternative(&line[..]).unwrap(), answer);
        }
    }

    #[test]
    fn parse_malformed_alternative() {
        assert_eq!(parse_alternative(&[Token::Equals]), Err(CompileErrorType::UnexpectedEquals));
        assert_eq!(parse_alternative(&[Token::Or]), Err(CompileErrorType::UnsplitRewrite));
    }

    #[test]
    fn parse_normal_line() {
        let text = "NP -> Det N | 'John'";
        let lexed = lexer::lex_line(text).unwrap();
        let location = Location {
            file: PathBuf::new(),
            line: 0
        };

        let answer = Rule {
            symbol: "NP".to_string(),
            rewrite: vec![
                vec![
                    s_nonterminal("Det"),
                    s_nonterminal("N")
                ],
                vec![s_terminal("John")]
            ],
            location: location.clone()
        };

        assert_eq!(parse_line(&lexed[..], location), Ok(answer));
    }

    #[test]
    fn parse_malformed_line() {
        // Blank
        assert_eq!(parse_line(&[], Location::new()), Err(CompileErrorType::UnexpectedBlankLine));

        // Missing equals
        assert_eq!(parse_line(
            &lexer::lex_line("alpha bravo charlie").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::MissingEquals));

        // Improper definition
        assert_eq!(parse_line(
            &lexer::lex_line("\"alpha\" = bravo charlie").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::MissingNonterminal));
        assert_eq!(parse_line(
            &lexer::lex_line("| = alpha bravo charlie").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::MissingNonterminal));
        assert_eq!(parse_line(
            &lexer::lex_line("-> alpha bravo charlie").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::MissingNonterminal));
    }

    #[test]
    fn empty_alternatives_reach_the_grammar() {
        // Arity is checked when the grammar is indexed, not here
        let rule = parse_line(&lexer::lex_line("A = | \"a\"").unwrap()[..], Location::new()).unwrap();
        assert_eq!(rule.rewrite, vec![vec![], vec![s_terminal("a")]]);
    }

    #[test]
    fn parse_normal_file() {
        let example_path = PathBuf::from("example_data/dog.bnf");
        let example_parsed = parse_file(&example_path).unwrap();

        let at = |line| Location { file: example_path.clone(), line };
        let productions = vec![
            Production {
                lhs: s_nonterminal("S"),
                rhs: vec![s_nonterminal("NP"), s_nonterminal("VP")],
                location: at(2)
            },
            Production {
                lhs: s_nonterminal("NP"),
                rhs: vec![s_terminal("dog")],
                location: at(3)
            },
            Production {
                lhs: s_nonterminal("VP"),
                rhs: vec![s_terminal("barks")],
                location: at(4)
            },
        ];

        assert_eq!(example_parsed, Grammar {
            start_symbol: "S".to_string(),
            productions
        });
    }

    #[test]
    fn parse_malformed_file() {
        let example_path = PathBuf::from("example_data/malformed.bnf");
        let example_parsed = parse_file(&example_path).unwrap_err();

        assert_eq!(example_parsed, vec![
            CompileError {
                location: Location {
                    file: example_path.clone(),
                    line: 3
                },
                error: CompileErrorType::MissingNonterminal
            },
            CompileError {
                location: Location {
                    file: example_path.clone(),
                    line: 5
                },
                error: CompileErrorType::UnexpectedEquals
            },
            CompileError {
                location: Location {
                    file: example_path,
                    line: 6
                },
                error: CompileErrorType::UnmatchedQuote
            }
        ]);
    }

    #[test]
    fn parse_missing_file() {
        let example_path = PathBuf::from("example_data/does_not_exist.bnf");
        let errors = parse_file(&example_path).unwrap_err();

        assert_eq!(errors, vec![io_error(
            std::io::Error::from(std::io::ErrorKind::NotFound),
            example_path
        )]);
    }

    #[test]
    fn parse_undefined_nonterminal() {
        let errors = parse_str("S = NP VP\nNP = \"dog\"\n").unwrap_err();

        assert_eq!(errors, vec![CompileError {
            location: Location {
                file: PathBuf::from("<memory>"),
                line: 1
            },
            error: CompileErrorType::UndefinedNonterminal("VP".to_string())
        }]);
    }

    #[test]
    fn parse_grammar_from_memory() {
        let grammar = parse_str("; comment\n\n# another\nS = A | B\nA = 'x'\nB = 'x'\n").unwrap();

        assert_eq!(grammar.start_symbol, "S");
        assert_eq!(grammar.productions.len(), 4);
        assert_eq!(grammar.productions[1].rhs, vec![s_nonterminal("B")]);
        assert_eq!(grammar.productions[1].location.line, 4);
        assert_eq!(grammar.productions[3].location.line, 6);
    }
}
