//! The tokenizer FSM: turns a byte source into a stream of [`Token`]s, one
//! pull at a time.

use std::io;

use log::trace;

use crate::Number;
use crate::error::{Error, SyntaxErrorKind};
use crate::parser::options::{Buffering, TokenizerOptions};
use crate::parser::strings::{Step, StringDecoder};
use crate::source::ByteSource;
use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumPart {
    Sign,
    IntZero,
    Int,
    FracStart,
    Frac,
    ExpSign,
    ExpStart,
    Exp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lit {
    True,
    False,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Whitespace,
    Number(NumPart),
    Literal(Lit, u8),
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\r' | '\t')
}

fn is_delimiter(c: char) -> bool {
    is_whitespace(c) || matches!(c, '{' | '}' | '[' | ']' | ',' | ':')
}

/// What [`Scanner::next_token`] produced.
pub(crate) enum Scanned {
    /// A complete, self-contained token.
    Token(Token),
    /// An opening `"` was just consumed and the scanner is now positioned at
    /// the first character of a string body; the caller (the shared cursor)
    /// is responsible for deciding whether to decode it eagerly or hand out
    /// a [`crate::parser::StringReader`].
    StringStart,
}

/// Reads characters from a [`ByteSource`] and drives the number/literal/
/// operator FSM, decoding UTF-8 one scalar value at a time as bytes become
/// available. String bodies are only partially handled here (see
/// [`Scanned::StringStart`]); whole-value string decoding is done by
/// [`Scanner::lex_string_whole`] once a caller has committed to that path.
pub(crate) struct Scanner {
    source: Box<dyn ByteSource>,
    block_size: usize,
    bytes: Vec<u8>,
    source_eof: bool,
    lookahead: Option<char>,
    stream_eof: bool,
    index: usize,
    line: usize,
    column: usize,
    state: State,
    buf: String,
    strings_as_streams: bool,
    in_stream_string: bool,
}

impl Scanner {
    pub(crate) fn new(source: Box<dyn ByteSource>, options: TokenizerOptions) -> Self {
        Self {
            source,
            block_size: options.buffering.block_size(),
            bytes: Vec::new(),
            source_eof: false,
            lookahead: None,
            stream_eof: false,
            index: 0,
            line: 1,
            column: 1,
            state: State::Whitespace,
            buf: String::new(),
            strings_as_streams: options.strings_as_streams,
            in_stream_string: false,
        }
    }

    /// Marks whether a `strings_as_streams` value is currently mid-body
    /// (opening `"` consumed, closing `"` not yet seen). Used by the
    /// container tree to drain an abandoned streamed string without
    /// needing a second handle onto it.
    pub(crate) fn set_stream_string(&mut self, active: bool) {
        self.in_stream_string = active;
    }

    /// Reads and discards the remainder of a streamed string body that the
    /// caller never finished reading.
    pub(crate) fn drain_stream_string(&mut self) -> Result<(), Error> {
        if !self.in_stream_string {
            return Ok(());
        }
        let mut decoder = StringDecoder::new();
        loop {
            let Some(c) = self.bump_raw()? else {
                return Err(self.syntax_err(SyntaxErrorKind::UnterminatedString));
            };
            let (index, line, column) = self.position();
            if let Step::End = decoder.feed(c, index, line, column)? {
                self.finish_string_delimiter()?;
                self.in_stream_string = false;
                return Ok(());
            }
        }
    }

    /// The position of the character most recently returned by [`Self::bump_raw`]
    /// or, if none has been consumed yet, the start of the document.
    pub(crate) fn position(&self) -> (usize, usize, usize) {
        (self.index, self.line, self.column)
    }

    fn syntax_err(&self, kind: SyntaxErrorKind) -> Error {
        Error::Syntax {
            kind,
            index: self.index,
            line: self.line,
            column: self.column,
        }
    }

    fn pull_char(&mut self) -> Result<Option<char>, Error> {
        loop {
            if !self.bytes.is_empty() {
                match std::str::from_utf8(&self.bytes) {
                    Ok(s) => {
                        if let Some(c) = s.chars().next() {
                            self.bytes.drain(..c.len_utf8());
                            return Ok(Some(c));
                        }
                    }
                    Err(e) => {
                        let valid_up_to = e.valid_up_to();
                        if valid_up_to > 0 {
                            let s = std::str::from_utf8(&self.bytes[..valid_up_to])
                                .expect("valid_up_to bounds a valid prefix");
                            let c = s.chars().next().expect("non-empty valid prefix has a first char");
                            self.bytes.drain(..c.len_utf8());
                            return Ok(Some(c));
                        }
                        if e.error_len().is_some() || self.source_eof {
                            return Err(Error::Io(io::Error::new(
                                io::ErrorKind::InvalidData,
                                "invalid UTF-8 in JSON source",
                            )));
                        }
                        // Incomplete multi-byte sequence at the tail; read more.
                    }
                }
            }
            if self.source_eof {
                return Ok(None);
            }
            let mut chunk = vec![0u8; self.block_size];
            let n = self.source.read_bytes(&mut chunk)?;
            if n == 0 {
                self.source_eof = true;
                continue;
            }
            trace!("read block of {n} bytes");
            chunk.truncate(n);
            self.bytes.extend_from_slice(&chunk);
        }
    }

    fn peek(&mut self) -> Result<Option<char>, Error> {
        if self.lookahead.is_none() && !self.stream_eof {
            match self.pull_char()? {
                Some(c) => self.lookahead = Some(c),
                None => self.stream_eof = true,
            }
        }
        Ok(self.lookahead)
    }

    fn bump(&mut self) {
        if let Some(c) = self.lookahead.take() {
            self.index += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Consumes and returns one raw character, advancing position tracking.
    /// Used by [`crate::parser::StringReader`] to read string bodies
    /// directly, bypassing the top-level FSM.
    pub(crate) fn bump_raw(&mut self) -> Result<Option<char>, Error> {
        let c = self.peek()?;
        self.bump();
        Ok(c)
    }

    /// After a streaming string's closing `"` has been consumed, checks that
    /// the following character is a valid delimiter (or end-of-input)
    /// without consuming it.
    pub(crate) fn finish_string_delimiter(&mut self) -> Result<(), Error> {
        match self.peek()? {
            None => Ok(()),
            Some(c) if is_delimiter(c) => Ok(()),
            Some(c) => Err(self.syntax_err(SyntaxErrorKind::ExpectedDelimiter(c))),
        }
    }

    fn finish_number(&mut self) -> Result<Number, Error> {
        let text = std::mem::take(&mut self.buf);
        text.parse::<Number>()
            .map_err(|_| self.syntax_err(SyntaxErrorKind::InvalidNumber("invalid JSON number")))
    }

    fn lex_string_whole(&mut self) -> Result<Token, Error> {
        let mut decoder = StringDecoder::new();
        let mut out = String::new();
        loop {
            let Some(c) = self.bump_raw()? else {
                return Err(self.syntax_err(SyntaxErrorKind::UnterminatedString));
            };
            let (index, line, column) = self.position();
            match decoder.feed(c, index, line, column)? {
                Step::Char(ch) => out.push(ch),
                Step::End => {
                    self.finish_string_delimiter()?;
                    return Ok(Token::String(out));
                }
                Step::Pending => {}
            }
        }
    }

    /// Decodes a whole string value regardless of `strings_as_streams`, used
    /// for object keys, which are always fully materialised.
    pub(crate) fn lex_key(&mut self) -> Result<String, Error> {
        match self.lex_string_whole()? {
            Token::String(s) => Ok(s),
            _ => unreachable!("lex_string_whole only ever returns Token::String"),
        }
    }

    /// Produces the next token, or `None` at a clean end-of-input (no
    /// partial token pending). When `force_whole_string` is set, a `"`
    /// always decodes eagerly regardless of `strings_as_streams`; used for
    /// object keys, which are never streamed.
    pub(crate) fn next_token(&mut self, force_whole_string: bool) -> Result<Option<Scanned>, Error> {
        loop {
            match self.state {
                State::Whitespace => {
                    let Some(c) = self.peek()? else { return Ok(None) };
                    match c {
                        '{' | '}' | '[' | ']' | ',' | ':' => {
                            self.bump();
                            return Ok(Some(Scanned::Token(Token::Operator(c as u8))));
                        }
                        '"' => {
                            self.bump();
                            if self.strings_as_streams && !force_whole_string {
                                self.in_stream_string = true;
                                return Ok(Some(Scanned::StringStart));
                            }
                            let tok = self.lex_string_whole()?;
                            return Ok(Some(Scanned::Token(tok)));
                        }
                        '0' => {
                            self.bump();
                            self.buf.clear();
                            self.buf.push(c);
                            self.state = State::Number(NumPart::IntZero);
                        }
                        '1'..='9' => {
                            self.bump();
                            self.buf.clear();
                            self.buf.push(c);
                            self.state = State::Number(NumPart::Int);
                        }
                        '-' => {
                            self.bump();
                            self.buf.clear();
                            self.buf.push(c);
                            self.state = State::Number(NumPart::Sign);
                        }
                        't' => {
                            self.bump();
                            self.state = State::Literal(Lit::True, 1);
                        }
                        'f' => {
                            self.bump();
                            self.state = State::Literal(Lit::False, 1);
                        }
                        'n' => {
                            self.bump();
                            self.state = State::Literal(Lit::Null, 1);
                        }
                        c if is_whitespace(c) => self.bump(),
                        c => return Err(self.syntax_err(SyntaxErrorKind::InvalidCharacter(c))),
                    }
                }
                State::Number(part) => {
                    if let Some(tok) = self.step_number(part)? {
                        return Ok(Some(Scanned::Token(tok)));
                    }
                }
                State::Literal(lit, progress) => {
                    if let Some(tok) = self.step_literal(lit, progress)? {
                        return Ok(Some(Scanned::Token(tok)));
                    }
                }
            }
        }
    }

    fn step_number(&mut self, part: NumPart) -> Result<Option<Token>, Error> {
        let next = self.peek()?;
        let err_num = |msg: &'static str| self.syntax_err(SyntaxErrorKind::InvalidNumber(msg));
        match (part, next) {
            (NumPart::Sign, Some('0')) => {
                self.bump();
                self.buf.push('0');
                self.state = State::Number(NumPart::IntZero);
                Ok(None)
            }
            (NumPart::Sign, Some(c @ '1'..='9')) => {
                self.bump();
                self.buf.push(c);
                self.state = State::Number(NumPart::Int);
                Ok(None)
            }
            (NumPart::Sign, _) => Err(err_num("expected a digit after '-'")),

            (NumPart::IntZero, Some('.')) => {
                self.bump();
                self.buf.push('.');
                self.state = State::Number(NumPart::FracStart);
                Ok(None)
            }
            (NumPart::IntZero, Some(c @ ('e' | 'E'))) => {
                self.bump();
                self.buf.push(c);
                self.state = State::Number(NumPart::ExpSign);
                Ok(None)
            }
            (NumPart::IntZero, Some(c)) if is_delimiter(c) => {
                self.state = State::Whitespace;
                Ok(Some(self.finish_number()?))
            }
            (NumPart::IntZero, None) => {
                self.state = State::Whitespace;
                Ok(Some(self.finish_number()?))
            }
            (NumPart::IntZero, Some(c)) if c.is_ascii_digit() => {
                Err(err_num("leading zeros are not permitted"))
            }
            (NumPart::IntZero, Some(c)) => Err(self.syntax_err(SyntaxErrorKind::InvalidCharacter(c))),

            (NumPart::Int, Some(c)) if c.is_ascii_digit() => {
                self.bump();
                self.buf.push(c);
                Ok(None)
            }
            (NumPart::Int, Some('.')) => {
                self.bump();
                self.buf.push('.');
                self.state = State::Number(NumPart::FracStart);
                Ok(None)
            }
            (NumPart::Int, Some(c @ ('e' | 'E'))) => {
                self.bump();
                self.buf.push(c);
                self.state = State::Number(NumPart::ExpSign);
                Ok(None)
            }
            (NumPart::Int, Some(c)) if is_delimiter(c) => {
                self.state = State::Whitespace;
                Ok(Some(self.finish_number()?))
            }
            (NumPart::Int, None) => {
                self.state = State::Whitespace;
                Ok(Some(self.finish_number()?))
            }
            (NumPart::Int, Some(c)) => Err(self.syntax_err(SyntaxErrorKind::InvalidCharacter(c))),

            (NumPart::FracStart, Some(c)) if c.is_ascii_digit() => {
                self.bump();
                self.buf.push(c);
                self.state = State::Number(NumPart::Frac);
                Ok(None)
            }
            (NumPart::FracStart, _) => Err(err_num("expected a digit after '.'")),

            (NumPart::Frac, Some(c)) if c.is_ascii_digit() => {
                self.bump();
                self.buf.push(c);
                Ok(None)
            }
            (NumPart::Frac, Some(c @ ('e' | 'E'))) => {
                self.bump();
                self.buf.push(c);
                self.state = State::Number(NumPart::ExpSign);
                Ok(None)
            }
            (NumPart::Frac, Some(c)) if is_delimiter(c) => {
                self.state = State::Whitespace;
                Ok(Some(self.finish_number()?))
            }
            (NumPart::Frac, None) => {
                self.state = State::Whitespace;
                Ok(Some(self.finish_number()?))
            }
            (NumPart::Frac, Some(c)) => Err(self.syntax_err(SyntaxErrorKind::InvalidCharacter(c))),

            (NumPart::ExpSign, Some(c @ ('+' | '-'))) => {
                self.bump();
                self.buf.push(c);
                self.state = State::Number(NumPart::ExpStart);
                Ok(None)
            }
            (NumPart::ExpSign, Some(c)) if c.is_ascii_digit() => {
                self.bump();
                self.buf.push(c);
                self.state = State::Number(NumPart::Exp);
                Ok(None)
            }
            (NumPart::ExpSign, _) => Err(err_num("expected a sign or digit after 'e'")),

            (NumPart::ExpStart, Some(c)) if c.is_ascii_digit() => {
                self.bump();
                self.buf.push(c);
                self.state = State::Number(NumPart::Exp);
                Ok(None)
            }
            (NumPart::ExpStart, _) => Err(err_num("expected a digit in exponent")),

            (NumPart::Exp, Some(c)) if c.is_ascii_digit() => {
                self.bump();
                self.buf.push(c);
                Ok(None)
            }
            (NumPart::Exp, Some(c)) if is_delimiter(c) => {
                self.state = State::Whitespace;
                Ok(Some(self.finish_number()?))
            }
            (NumPart::Exp, None) => {
                self.state = State::Whitespace;
                Ok(Some(self.finish_number()?))
            }
            (NumPart::Exp, Some(c)) => Err(self.syntax_err(SyntaxErrorKind::InvalidCharacter(c))),
        }
    }

    fn step_literal(&mut self, lit: Lit, progress: u8) -> Result<Option<Token>, Error> {
        let (spelling, token): (&'static str, fn() -> Token) = match lit {
            Lit::True => ("true", || Token::Boolean(true)),
            Lit::False => ("false", || Token::Boolean(false)),
            Lit::Null => ("null", || Token::Null),
        };
        let expected = spelling.as_bytes()[progress as usize] as char;
        match self.peek()? {
            Some(c) if c == expected => {
                self.bump();
                let progress = progress + 1;
                if progress as usize == spelling.len() {
                    self.state = State::Whitespace;
                    Ok(Some(token()))
                } else {
                    self.state = State::Literal(lit, progress);
                    Ok(None)
                }
            }
            Some(c) => Err(self.syntax_err(SyntaxErrorKind::InvalidLiteral {
                expected: spelling,
                found: c,
            })),
            None => Err(self.syntax_err(SyntaxErrorKind::UnexpectedEndOfInput)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::options::TokenizerOptions;

    fn scan_all(input: &str) -> Result<Vec<Token>, Error> {
        let source: Box<dyn ByteSource> = Box::new(io::Cursor::new(input.as_bytes().to_vec()));
        let mut scanner = Scanner::new(source, TokenizerOptions::default());
        let mut tokens = Vec::new();
        while let Some(scanned) = scanner.next_token(false)? {
            match scanned {
                Scanned::Token(t) => tokens.push(t),
                Scanned::StringStart => unreachable!("strings_as_streams is off"),
            }
        }
        Ok(tokens)
    }

    #[test]
    fn scans_object_skeleton() {
        let tokens = scan_all(r#"{"a": 1, "b": [true, null]}"#).unwrap();
        assert!(matches!(tokens[0], Token::Operator(b'{')));
        assert!(matches!(&tokens[1], Token::String(s) if s == "a"));
        assert!(matches!(tokens[2], Token::Operator(b':')));
        assert!(matches!(&tokens[3], Token::Number(Number::Int(_))));
    }

    #[test]
    fn rejects_leading_zero() {
        let err = scan_all("01").unwrap_err();
        assert!(matches!(err, Error::Syntax { kind: SyntaxErrorKind::InvalidNumber(_), .. }));
    }

    #[test]
    fn parses_big_integer_exactly() {
        let tokens = scan_all("123456789012345678901234567890").unwrap();
        match &tokens[0] {
            Token::Number(n) => assert_eq!(n.as_bigint().unwrap().to_string(), "123456789012345678901234567890"),
            _ => panic!("expected a number token"),
        }
    }

    #[test]
    fn parses_float_in_exponent_form() {
        let tokens = scan_all("-1.5e10").unwrap();
        match &tokens[0] {
            Token::Number(Number::Float(f)) => assert!((*f - (-1.5e10)).abs() < f64::EPSILON),
            _ => panic!("expected a float token"),
        }
    }

    #[test]
    fn rejects_malformed_literal() {
        let err = scan_all("tru3").unwrap_err();
        assert!(matches!(err, Error::Syntax { kind: SyntaxErrorKind::InvalidLiteral { .. }, .. }));
    }
}
