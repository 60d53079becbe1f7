//! Support for reading Lisp tokens from text and streams.

use std::io::ErrorKind;

pub mod source;
pub mod token;

/// Error type if a read does not complete.
///
/// A tokenizer may hit a true error that no additional input can fix,
/// e.g. a source that is not valid UTF-8.
/// This is distinct from running out of input in the middle of a token, e.g. `"abc`:
/// it may be that more input will fix the issue.
///
/// If input is coming in interactively, this is a useful distinction;
/// in the first case, we'd want to indicate an error to the user,
/// while in the latter we'd like to prompt the user for more input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadErr {
    Error(String),
    Incomplete(String),
}

impl std::fmt::Display for ReadErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        match self {
            ReadErr::Error(e) => write!(f, "error in input: {e}"),
            ReadErr::Incomplete(e) => write!(f, "incomplete input: {e}"),
        }
    }
}

impl std::error::Error for ReadErr {}

impl ReadErr {
    /// Add additional context to an error.
    pub fn annotate(self, more: impl AsRef<str>) -> Self {
        match self {
            ReadErr::Error(e) => ReadErr::Error(format!("{}: {}", more.as_ref(), e)),
            ReadErr::Incomplete(e) => ReadErr::Incomplete(format!("{}: {}", more.as_ref(), e)),
        }
    }

    /// True if more input could complete the read.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ReadErr::Incomplete(_))
    }
}

/// The main result type for this module:
/// a T (token, token list, etc), or an error, or incomplete.
pub type ReadResult<T> = Result<T, ReadErr>;

impl From<ReadErr> for std::io::Error {
    fn from(value: ReadErr) -> Self {
        match value {
            ReadErr::Incomplete(s) => std::io::Error::new(ErrorKind::UnexpectedEof, s),
            ReadErr::Error(s) => std::io::Error::new(ErrorKind::InvalidInput, s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotate_keeps_kind() {
        let err = ReadErr::Incomplete("unterminated string".to_owned()).annotate("at line 2");
        assert_eq!(
            err,
            ReadErr::Incomplete("at line 2: unterminated string".to_owned())
        );
        assert!(err.is_incomplete());

        let err = ReadErr::Error("bad byte".to_owned()).annotate("in cell 1");
        assert_eq!(err.to_string(), "error in input: in cell 1: bad byte");
        assert!(!err.is_incomplete());
    }

    #[test]
    fn into_io_error() {
        let io: std::io::Error = ReadErr::Incomplete("more".to_owned()).into();
        assert_eq!(io.kind(), ErrorKind::UnexpectedEof);
        let io: std::io::Error = ReadErr::Error("bad".to_owned()).into();
        assert_eq!(io.kind(), ErrorKind::InvalidInput);
    }
}
