//! Lexical front end for a Scheme-like Lisp.
//!
//! Turns source text into `(`, `)`, `'`, string and symbol tokens for a parser.
//! Numbers are left as symbols.

pub mod reader;

pub use reader::source::{CharSource, ReaderSource, TextSource};
pub use reader::token::{is_symbol_char, Position, Token, Tokenizer};
pub use reader::{ReadErr, ReadResult};

/// Split the input into its constituent tokens.
///
/// Stops quietly at malformed input, returning the tokens before it;
/// see `tokenize_strict` to find out why.
pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::from_text(input).all_tokens()
}

/// Split the input into its constituent tokens, or report the first failure.
pub fn tokenize_strict(input: &str) -> ReadResult<Vec<Token>> {
    Tokenizer::from_text(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_quietly_stops() {
        assert_eq!(tokenize("(quote \"abc"), ["(", "quote"]);
        assert_eq!(tokenize("\"abc"), Vec::<Token>::new());
    }

    #[test]
    fn strict_reports_incomplete() {
        let err = tokenize_strict("(quote \"abc").unwrap_err();
        assert!(err.is_incomplete(), "{:?}", err);
        assert_eq!(tokenize_strict("(+ 1 2)"), Ok(tokenize("(+ 1 2)")));
    }
}
