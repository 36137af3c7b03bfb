//! The shared token cursor.
//!
//! Every container in a document's lazy tree pulls from the same
//! single-pass token stream. [`TokenCursor`] is a cheap, `Clone`-able handle
//! onto that stream: cloning shares the underlying [`Scanner`] through an
//! `Rc<RefCell<_>>`, which is how this crate expresses the single
//! conceptual cursor a language with interior mutability can share across
//! a tree of otherwise-independent container handles.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, SyntaxErrorKind};
use crate::parser::StringReader;
use crate::parser::TokenizerOptions;
use crate::parser::scanner::{Scanned, Scanner};
use crate::source::ByteSource;
use crate::token::Token;

/// The result of reading an object-key position: either a key, or the
/// closing `}` that ends the object.
pub(crate) enum KeyOrEnd {
    Key(String),
    End,
}

/// A cloneable handle onto a single shared token stream.
#[derive(Clone)]
pub(crate) struct TokenCursor {
    inner: Rc<RefCell<Scanner>>,
}

impl TokenCursor {
    pub(crate) fn new(source: Box<dyn ByteSource>, options: TokenizerOptions) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Scanner::new(source, options))),
        }
    }

    /// The position of the last character consumed, for error reporting by
    /// callers that detect a grammar violation the scanner itself can't see
    /// (e.g. two values back to back with no delimiter).
    pub(crate) fn position(&self) -> (usize, usize, usize) {
        self.inner.borrow().position()
    }

    fn err_here(&self, kind: SyntaxErrorKind) -> Error {
        let (index, line, column) = self.position();
        Error::Syntax { kind, index, line, column }
    }

    /// Produces the next token, or `None` at a clean end-of-input.
    pub(crate) fn next_token(&self) -> Result<Option<Token>, Error> {
        let scanned = self.inner.borrow_mut().next_token(false)?;
        Ok(match scanned {
            None => None,
            Some(Scanned::Token(t)) => Some(t),
            Some(Scanned::StringStart) => Some(Token::StringStream(StringReader::new(self.inner.clone()))),
        })
    }

    /// Reads an object-key position: a string key or the closing `}`.
    /// Object keys are always fully materialised, independent of
    /// `strings_as_streams`.
    pub(crate) fn next_key(&self) -> Result<KeyOrEnd, Error> {
        let scanned = self.inner.borrow_mut().next_token(true)?;
        match scanned {
            Some(Scanned::Token(Token::Operator(b'}'))) => Ok(KeyOrEnd::End),
            Some(Scanned::Token(Token::String(s))) => Ok(KeyOrEnd::Key(s)),
            _ => Err(self.err_here(SyntaxErrorKind::ExpectedKey)),
        }
    }

    /// Drains an abandoned streamed string down to its closing quote,
    /// discarding the content. No-op if no string is pending.
    pub(crate) fn drain_stream_string(&self) -> Result<(), Error> {
        self.inner.borrow_mut().drain_stream_string()
    }
}
