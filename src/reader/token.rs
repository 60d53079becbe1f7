//! Module for extracting Lisp tokens from a character stream.
//!
//! The tokenizer keeps exactly one character of lookahead:
//! the first character that is not yet part of any returned token.
//! Each call classifies that character and either emits a token,
//! skips whitespace and comments, or fails.

use std::io::BufRead;
use std::iter::FusedIterator;

use crate::reader::source::{CharSource, ReaderSource, TextSource};
use crate::reader::{ReadErr, ReadResult};

/// A Lisp token.
///
/// Whitespace and comments are ignored.
/// Numbers are not distinguished from other symbols here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    LParen,
    RParen,
    Quote,
    /// A string literal, including both delimiting quotes, with escapes resolved.
    String(String),
    Symbol(String),
}

impl Token {
    /// The text of this token.
    pub fn as_str(&self) -> &str {
        match self {
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Quote => "'",
            Token::String(s) | Token::Symbol(s) => s.as_str(),
        }
    }

    /// For a string literal, the text between the delimiting quotes.
    pub fn string_contents(&self) -> Option<&str> {
        match self {
            Token::String(s) => s.strip_prefix('"').and_then(|s| s.strip_suffix('"')),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl From<Token> for String {
    fn from(value: Token) -> Self {
        match value {
            Token::String(s) | Token::Symbol(s) => s,
            other => other.as_str().to_owned(),
        }
    }
}

/// Line and column of a character in the input.
/// Both start from 1; tabs count as a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, column: 1 }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookahead {
    /// Nothing has been read yet.
    Start,
    Char(char),
    /// The source is exhausted (or failed).
    End,
}

/// Characters that may appear in a symbol: anything but whitespace and `( ) '`.
pub fn is_symbol_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '(' | ')' | '\'')
}

/// Pull-based tokenizer over a character source.
///
/// A tokenizer holds mutable scan state and is meant for a single consumer.
/// After a failed read it reports end of input.
#[derive(Debug)]
pub struct Tokenizer<S> {
    source: S,
    lookahead: Lookahead,
    /// Position of the lookahead character.
    position: Position,
    /// Position of the next character the source will produce.
    next_position: Position,
    /// Source error seen while advancing; reported once the scan reaches it.
    failure: Option<ReadErr>,
    last_token: Option<Token>,
}

impl<'a> Tokenizer<TextSource<std::str::Chars<'a>>> {
    /// Tokenizer over in-memory text.
    pub fn from_text(input: &'a str) -> Self {
        Tokenizer::new(TextSource::new(input.chars()))
    }
}

impl<R> Tokenizer<ReaderSource<R>>
where
    R: BufRead,
{
    /// Tokenizer over a buffered reader of UTF-8 text.
    pub fn from_reader(reader: R) -> Self {
        Tokenizer::new(ReaderSource::new(reader))
    }
}

impl<S> Tokenizer<S>
where
    S: CharSource,
{
    pub fn new(source: S) -> Self {
        Tokenizer {
            source,
            lookahead: Lookahead::Start,
            position: Position::default(),
            next_position: Position::default(),
            failure: None,
            last_token: None,
        }
    }

    /// Give back the source.
    ///
    /// Characters already pulled into the lookahead are not returned to it.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Position of the lookahead character, if there is one.
    pub fn position(&self) -> Option<Position> {
        match self.lookahead {
            Lookahead::Char(_) => Some(self.position),
            _ => None,
        }
    }

    /// True once the end of input (or a failure) has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.lookahead == Lookahead::End
    }

    /// The token returned by the most recent read, if that read produced one.
    pub fn last_token(&self) -> Option<&Token> {
        self.last_token.as_ref()
    }

    /// Read the next token.
    ///
    /// `None` means either the input is exhausted or it is malformed;
    /// use `read_token` to tell the two apart.
    pub fn next_token(&mut self) -> Option<Token> {
        self.read_token().ok().flatten()
    }

    /// Read the next token, distinguishing end of input from failure.
    ///
    /// Returns `Ok(None)` at a clean end of input,
    /// `ReadErr::Incomplete` if the input ends inside a string,
    /// and `ReadErr::Error` for anything that more input could not fix.
    pub fn read_token(&mut self) -> ReadResult<Option<Token>> {
        let result = self.scan_token();
        match &result {
            Ok(Some(token)) => {
                tracing::trace!("token {:?}", token);
                self.last_token = Some(token.clone());
            }
            Ok(None) => self.last_token = None,
            Err(e) => {
                tracing::debug!("tokenizing stopped: {}", e);
                self.lookahead = Lookahead::End;
                self.last_token = None;
            }
        }
        result
    }

    /// All remaining tokens.
    ///
    /// Stops silently at the first failure; the tokens before it are kept.
    pub fn all_tokens(&mut self) -> Vec<Token> {
        std::iter::from_fn(|| self.next_token()).collect()
    }

    fn advance(&mut self) {
        if self.lookahead == Lookahead::End {
            return;
        }
        match self.source.next_char() {
            Ok(Some(ch)) => {
                self.position = self.next_position;
                if ch == '\n' {
                    self.next_position.line += 1;
                    self.next_position.column = 1;
                } else {
                    self.next_position.column += 1;
                }
                self.lookahead = Lookahead::Char(ch);
            }
            Ok(None) => self.lookahead = Lookahead::End,
            Err(e) => {
                self.failure = Some(ReadErr::Error(format!(
                    "failed to read input at {}: {}",
                    self.next_position, e
                )));
                self.lookahead = Lookahead::End;
            }
        }
    }

    /// Surface a source failure that ended the input, if there was one.
    fn check_source(&mut self) -> ReadResult<()> {
        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn scan_token(&mut self) -> ReadResult<Option<Token>> {
        // Forward over whitespace and comments:
        let ch = loop {
            match self.lookahead {
                Lookahead::End => {
                    self.check_source()?;
                    return Ok(None);
                }
                Lookahead::Start => self.advance(),
                Lookahead::Char(';') => self.skip_comment(),
                Lookahead::Char(ch) if ch.is_whitespace() => self.advance(),
                Lookahead::Char(ch) => break ch,
            }
        };

        match ch {
            '"' => self.read_string().map(Some),
            '(' => {
                self.advance();
                Ok(Some(Token::LParen))
            }
            ')' => {
                self.advance();
                Ok(Some(Token::RParen))
            }
            '\'' => {
                self.advance();
                Ok(Some(Token::Quote))
            }
            ch if is_symbol_char(ch) => self.read_symbol().map(Some),
            ch => Err(ReadErr::Error(format!(
                "unexpected character {:?} at {}",
                ch, self.position
            ))),
        }
    }

    /// Skip from `;` through the end of the line, newline included.
    fn skip_comment(&mut self) {
        let start = self.position;
        while let Lookahead::Char(ch) = self.lookahead {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
        tracing::trace!("skipped comment at {}", start);
    }

    /// Read a string literal, starting at its opening quote.
    ///
    /// Only `\n` and `\t` are special escapes;
    /// a backslash before any other character keeps just that character.
    fn read_string(&mut self) -> ReadResult<Token> {
        let start = self.position;
        let mut text = String::from('"');
        self.advance();

        loop {
            match self.lookahead {
                Lookahead::Char('"') => break,
                Lookahead::Char('\\') => {
                    self.advance();
                    match self.lookahead {
                        Lookahead::Char('n') => text.push('\n'),
                        Lookahead::Char('t') => text.push('\t'),
                        Lookahead::Char(ch) => text.push(ch),
                        _ => break,
                    }
                    self.advance();
                }
                Lookahead::Char(ch) => {
                    text.push(ch);
                    self.advance();
                }
                _ => break,
            }
        }

        if self.lookahead != Lookahead::Char('"') {
            self.check_source()?;
            return Err(ReadErr::Incomplete(format!(
                "unterminated string starting at {}",
                start
            )));
        }
        text.push('"');
        self.advance();
        Ok(Token::String(text))
    }

    /// Read the maximal run of symbol characters at the lookahead.
    fn read_symbol(&mut self) -> ReadResult<Token> {
        let mut text = String::new();
        while let Lookahead::Char(ch) = self.lookahead {
            if !is_symbol_char(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        if text.is_empty() {
            self.check_source()?;
            return Err(ReadErr::Error(format!(
                "expected a symbol at {}, found end of input",
                self.next_position
            )));
        }
        Ok(Token::Symbol(text))
    }
}

impl<S> Iterator for Tokenizer<S>
where
    S: CharSource,
{
    type Item = ReadResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_token().transpose()
    }
}

impl<S> FusedIterator for Tokenizer<S> where S: CharSource {}
