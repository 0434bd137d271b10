use std::path::PathBuf;
use std::fmt::Display;

pub trait ErrorType: Display + PartialEq {}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize
}

impl Location {
    // Where grammars built in code (rather than read from a file) live
    pub fn memory() -> Self {
        Location {
            file: PathBuf::from("<memory>"),
            line: 0
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}", self.file.display(), self.line)
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

impl<T: ErrorType + std::fmt::Debug> std::error::Error for Error<T> {}

pub type Errors<T> = Vec<Error<T>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_omits_unknown_line() {
        let file = Location { file: PathBuf::from("english.bnf"), line: 0 };
        let line = Location { file: PathBuf::from("english.bnf"), line: 12 };

        assert_eq!(file.to_string(), "english.bnf");
        assert_eq!(line.to_string(), "english.bnf:12");
        assert_eq!(Location::memory().to_string(), "<memory>");
    }
}
