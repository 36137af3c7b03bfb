//! The token produced by the tokenizer FSM.

use crate::Number;
use crate::parser::StringReader;

/// A single JSON token: a structural operator, a literal, a number, or a
/// string (whole or streaming, per [`crate::parser::TokenizerOptions::strings_as_streams`]).
#[derive(Debug)]
pub enum Token {
    /// One of `{ } [ ] : ,`.
    Operator(u8),
    /// A fully decoded string value.
    String(String),
    /// An incremental string value; see [`StringReader`]. Only produced when
    /// `strings_as_streams` is enabled.
    StringStream(StringReader),
    /// A number, integer or float depending on its lexical form.
    Number(Number),
    /// `true` or `false`.
    Boolean(bool),
    /// `null`.
    Null,
}
