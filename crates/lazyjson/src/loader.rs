//! Top-level entry points.
//!
//! [`load`] reads exactly one JSON value from a byte source. [`load_many`]
//! reads a sequence of whitespace-separated values, as produced by
//! concatenated JSON or NDJSON sources, yielding each as the previous one
//! is abandoned or fully consumed.
//!
//! A scalar value can never be ambiguously concatenated with its neighbour
//! (`"12"` always lexes as the single number `12`, never `1` followed by
//! `2`): the tokenizer's number and literal states are greedy and only
//! terminate at a delimiter or end-of-input, so there is no code path here
//! that could misparse a concatenation. See `DESIGN.md`.

use crate::container::{Container, Kind, Persistence};
use crate::cursor::TokenCursor;
use crate::error::{Error, SyntaxErrorKind};
use crate::parser::TokenizerOptions;
use crate::source::ByteSource;
use crate::token::Token;
use crate::value::Value;

/// Options controlling how [`load`] and [`load_many`] tokenize the source
/// and how much of any top-level container they retain.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Forwarded to the tokenizer.
    pub tokenizer: TokenizerOptions,
    /// The persistence mode of the top-level container, if the document's
    /// root value is an object or array. Scalars are unaffected.
    pub persistence: Persistence,
}

/// One value read from the top of a document.
pub enum Loaded {
    /// A fully decoded `null`, boolean, number, or string.
    Scalar(Value),
    /// The document's root is a JSON array.
    Array(Container),
    /// The document's root is a JSON object.
    Object(Container),
}

impl Loaded {
    /// Returns the container handle, if the root value was an array or
    /// object.
    #[must_use]
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Array(c) | Self::Object(c) => Some(c),
            Self::Scalar(_) => None,
        }
    }
}

fn read_one(cursor: &TokenCursor, persistence: Persistence) -> Result<Option<Loaded>, Error> {
    match cursor.next_token()? {
        None => Ok(None),
        Some(Token::Operator(b'{')) => Ok(Some(Loaded::Object(Container::new(cursor.clone(), Kind::Object, persistence)))),
        Some(Token::Operator(b'[')) => Ok(Some(Loaded::Array(Container::new(cursor.clone(), Kind::Array, persistence)))),
        Some(Token::String(s)) => Ok(Some(Loaded::Scalar(Value::String(s)))),
        Some(Token::StringStream(mut r)) => Ok(Some(Loaded::Scalar(Value::String(r.read_to_string()?)))),
        Some(Token::Number(n)) => Ok(Some(Loaded::Scalar(Value::Number(n)))),
        Some(Token::Boolean(b)) => Ok(Some(Loaded::Scalar(Value::Boolean(b)))),
        Some(Token::Null) => Ok(Some(Loaded::Scalar(Value::Null))),
        Some(Token::Operator(c)) => {
            let (index, line, column) = cursor.position();
            Err(Error::Syntax {
                kind: SyntaxErrorKind::InvalidCharacter(c as char),
                index,
                line,
                column,
            })
        }
    }
}

/// Reads exactly one JSON value from `source`.
///
/// If the root value is a scalar, any further non-whitespace content is
/// rejected with [`SyntaxErrorKind`]'s trailing-data error. If the root
/// value is an object or array, the returned [`Container`] is responsible
/// for the rest of the document; trailing content after it is only
/// detected once the container itself is fully drained and something
/// follows it in a structural position (this function does not eagerly
/// drain a returned container to check).
///
/// # Examples
///
/// ```
/// use lazyjson::{Loaded, load, LoadOptions};
///
/// let loaded = load(&b"42"[..], LoadOptions::default()).unwrap();
/// assert!(matches!(loaded, Loaded::Scalar(_)));
/// ```
pub fn load<S: ByteSource + 'static>(source: S, options: LoadOptions) -> Result<Loaded, Error> {
    let boxed: Box<dyn ByteSource> = Box::new(source);
    let cursor = TokenCursor::new(boxed, options.tokenizer);
    let loaded = read_one(&cursor, options.persistence)?.ok_or_else(|| {
        let (index, line, column) = cursor.position();
        Error::Syntax {
            kind: SyntaxErrorKind::UnexpectedEndOfInput,
            index,
            line,
            column,
        }
    })?;
    if matches!(loaded, Loaded::Scalar(_)) {
        if cursor.next_token()?.is_some() {
            let (index, line, column) = cursor.position();
            return Err(Error::Syntax {
                kind: SyntaxErrorKind::TrailingData,
                index,
                line,
                column,
            });
        }
    }
    Ok(loaded)
}

/// Reads a sequence of whitespace-separated JSON values from `source`,
/// e.g. an NDJSON stream or simply concatenated documents.
///
/// Each [`Loaded`] must be consumed (if a container) before the next one is
/// requested; if it isn't, the iterator drains it automatically, the same
/// drain-on-abandon discipline [`Container`] applies to its own elements.
///
/// # Examples
///
/// ```
/// use lazyjson::{Loaded, load_many, LoadOptions};
///
/// let values: Vec<_> = load_many(&b"1 2 3"[..], LoadOptions::default())
///     .map(Result::unwrap)
///     .collect();
/// assert_eq!(values.len(), 3);
/// ```
pub fn load_many<S: ByteSource + 'static>(source: S, options: LoadOptions) -> LoadMany {
    let boxed: Box<dyn ByteSource> = Box::new(source);
    LoadMany {
        cursor: TokenCursor::new(boxed, options.tokenizer),
        persistence: options.persistence,
        pending: None,
    }
}

/// Iterator over the values of a multi-document source, produced by
/// [`load_many`].
pub struct LoadMany {
    cursor: TokenCursor,
    persistence: Persistence,
    pending: Option<Container>,
}

impl Iterator for LoadMany {
    type Item = Result<Loaded, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(child) = self.pending.take() {
            if let Err(e) = child.drain_remaining() {
                return Some(Err(e));
            }
        }
        if let Err(e) = self.cursor.drain_stream_string() {
            return Some(Err(e));
        }
        match read_one(&self.cursor, self.persistence) {
            Ok(None) => None,
            Ok(Some(loaded)) => {
                if let Loaded::Array(ref c) | Loaded::Object(ref c) = loaded {
                    self.pending = Some(c.share());
                }
                Some(Ok(loaded))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
