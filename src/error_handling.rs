use std::fmt::{Debug, Display};

pub trait ErrorType: Display + PartialEq {}

// Where an error happened. Streams that do not track text positions report
// the index of the token instead, with `line` set to 0.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize
}

impl Location {
    pub fn start() -> Self {
        Location { line: 1, column: 1 }
    }

    pub fn token(index: usize) -> Self {
        Location { line: 0, column: index }
    }

    // Moves the location past `c`
    pub fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "token {}", self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

impl<T: ErrorType + Debug> std::error::Error for Error<T> {}
