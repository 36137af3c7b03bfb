//! Error types.
//!
//! Every fallible operation in this crate returns [`Error`]. Lexical
//! failures carry the offending character and the character index within
//! the document (not the byte offset); container-access failures name the
//! key or index involved.

use std::io;

use thiserror::Error;

/// The single error type produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A lexical violation: an unexpected character, an invalid number, an
    /// unterminated literal. All such failures are reported under this one
    /// kind.
    #[error("malformed JSON: {kind} at index {index} (line {line}, column {column})")]
    Syntax {
        /// What went wrong.
        kind: SyntaxErrorKind,
        /// Character index within the document.
        index: usize,
        /// 1-based line number.
        line: usize,
        /// 1-based column number.
        column: usize,
    },

    /// End-of-input was reached while an object was still streaming.
    #[error("unterminated object at end of file")]
    UnterminatedObject,

    /// End-of-input was reached while an array was still streaming.
    #[error("unterminated list at end of file")]
    UnterminatedList,

    /// A key lookup missed on a container that has not been exhausted.
    #[error("missing key: {0:?}")]
    MissingKey(String),

    /// An array index lookup went past the end of the array.
    #[error("index {0} out of range")]
    IndexOutOfRange(usize),

    /// A transient container's lookup targeted a key or index already
    /// consumed by prior iteration.
    #[error("{0}")]
    AlreadyPassed(String),

    /// A transient container's iterator (or `keys`/`values`/`items` view) was
    /// requested a second time.
    #[error("cannot restart iteration of a transient JSON stream")]
    AlreadyStarted,

    /// An attempt was made to duplicate a lazy container.
    #[error("copying a lazy JSON container is forbidden")]
    CopyForbidden,

    /// The underlying byte source failed to read.
    #[error("I/O error reading JSON source: {0}")]
    Io(#[from] io::Error),
}

/// The specific lexical condition behind [`Error::Syntax`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    /// A character appeared where no token could start, e.g. a stray `#`.
    #[error("invalid JSON character: {0:?}")]
    InvalidCharacter(char),

    /// A numeric literal violated the JSON number grammar (leading zero,
    /// missing fractional digit, missing exponent digit, etc).
    #[error("{0}")]
    InvalidNumber(&'static str),

    /// `true`/`false`/`null` deviated from their expected spelling.
    #[error("invalid literal, expected {expected:?}, found {found:?}")]
    InvalidLiteral {
        /// The literal being matched (`"true"`, `"false"`, or `"null"`).
        expected: &'static str,
        /// The character that broke the match.
        found: char,
    },

    /// A value token was directly followed by another character that was
    /// not whitespace, a structural character, or end-of-input.
    #[error("expected whitespace or an operator after token, found {0:?}")]
    ExpectedDelimiter(char),

    /// End-of-input occurred with a token still under construction.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// End-of-input occurred inside a string body.
    #[error("unterminated string at end of file")]
    UnterminatedString,

    /// An unrecognised `\x` escape.
    #[error("invalid string escape: {0:?}")]
    InvalidEscape(char),

    /// A `\u` escape was not four valid hex digits.
    #[error("invalid unicode literal: \\u{0}")]
    InvalidUnicodeLiteral(String),

    /// A high surrogate was not followed by a low-surrogate `\u` escape.
    #[error("unpaired UTF-16 surrogate")]
    UnpairedSurrogate,

    /// A high surrogate was followed by `\u` escape whose code point is not a
    /// low surrogate.
    #[error("second half of UTF-16 surrogate pair is not a surrogate")]
    NotASurrogate,

    /// An object key position held something other than a string or the
    /// closing `}`.
    #[error("expected a string key or '}}'")]
    ExpectedKey,

    /// After an array element or object entry, the next token was neither
    /// `,` nor the container's closing bracket.
    #[error("expected ',' or a closing bracket")]
    ExpectedContainerDelimiter,

    /// An object key was not followed by `:`.
    #[error("expected ':' after object key")]
    ExpectedColon,

    /// [`crate::load`] found more than one JSON value at the top level.
    #[error("unexpected trailing data after JSON value")]
    TrailingData,
}
