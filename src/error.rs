use std::error;
use std::fmt;
use std::result;

/// A type alias for `Result<T, like_automata::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that occurred during compilation of a LIKE pattern.
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The kind of error that occurred.
#[derive(Clone, Debug)]
pub enum ErrorKind {
    /// The escape character was not followed by `%`, `_` or the escape
    /// character itself, or the pattern ended in the middle of an
    /// escape sequence.
    InvalidEscape,
}

impl Error {
    /// Return the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn invalid_escape() -> Error {
        Error { kind: ErrorKind::InvalidEscape }
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ErrorKind::InvalidEscape => write!(
                f,
                "escape character must be followed by '%', '_' or the \
                 escape character itself",
            ),
        }
    }
}
