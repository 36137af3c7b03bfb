//! String Sub-Reader.
//!
//! [`StringDecoder`] is the escape/surrogate state machine, fed one source
//! character at a time; it is shared by both the whole-value decode path
//! (`Scanner::lex_string_whole`) and the incremental [`StringReader`] path,
//! per the design note that the two surface APIs should share one FSM
//! rather than be unified into a single code path.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, SyntaxErrorKind};
use crate::parser::scanner::Scanner;

#[derive(Debug, Clone, Copy)]
enum StrState {
    Char,
    Escape,
    Unicode(u8, u32),
    SurrogateExpectBackslash(u32),
    SurrogateExpectU(u32),
    SurrogateUnicode(u32, u8, u32),
}

/// One step of decoding a string body.
pub(crate) enum Step {
    /// A fully decoded character of output is ready.
    Char(char),
    /// The closing `"` was consumed; the string body is finished.
    End,
    /// More input is needed (mid-escape or mid-surrogate-pair); this step
    /// produced no output.
    Pending,
}

fn hex_digit(c: char) -> Option<u32> {
    c.to_digit(16)
}

/// Decodes a JSON string body (everything between the quotes) from a
/// character stream, one character at a time.
///
/// Never yields a half surrogate pair: [`Step::Char`] is only produced once
/// a full scalar value has been assembled, satisfying the incremental-mode
/// invariant that a partial read never stops between the two halves of a
/// surrogate pair.
pub(crate) struct StringDecoder {
    state: StrState,
    hex: String,
}

impl StringDecoder {
    pub(crate) fn new() -> Self {
        Self {
            state: StrState::Char,
            hex: String::new(),
        }
    }

    /// Feeds one character, returning the resulting step. `index` is the
    /// character's position in the document, used for error messages.
    pub(crate) fn feed(&mut self, c: char, index: usize, line: usize, column: usize) -> Result<Step, Error> {
        let err = |kind: SyntaxErrorKind| Error::Syntax {
            kind,
            index,
            line,
            column,
        };
        match self.state {
            StrState::Char => match c {
                '"' => Ok(Step::End),
                '\\' => {
                    self.state = StrState::Escape;
                    Ok(Step::Pending)
                }
                other => Ok(Step::Char(other)),
            },
            StrState::Escape => {
                self.state = StrState::Char;
                match c {
                    '"' => Ok(Step::Char('"')),
                    '\\' => Ok(Step::Char('\\')),
                    '/' => Ok(Step::Char('/')),
                    'b' => Ok(Step::Char('\u{8}')),
                    'f' => Ok(Step::Char('\u{c}')),
                    'n' => Ok(Step::Char('\n')),
                    'r' => Ok(Step::Char('\r')),
                    't' => Ok(Step::Char('\t')),
                    'u' => {
                        self.state = StrState::Unicode(0, 0);
                        self.hex.clear();
                        Ok(Step::Pending)
                    }
                    other => Err(err(SyntaxErrorKind::InvalidEscape(other))),
                }
            }
            StrState::Unicode(count, val) => {
                let Some(digit) = hex_digit(c) else {
                    self.hex.push(c);
                    return Err(err(SyntaxErrorKind::InvalidUnicodeLiteral(self.hex.clone())));
                };
                self.hex.push(c);
                let val = val * 16 + digit;
                let count = count + 1;
                if count < 4 {
                    self.state = StrState::Unicode(count, val);
                    return Ok(Step::Pending);
                }
                if (0xD800..=0xDBFF).contains(&val) {
                    self.state = StrState::SurrogateExpectBackslash(val);
                    Ok(Step::Pending)
                } else if (0xDC00..=0xDFFF).contains(&val) {
                    Err(err(SyntaxErrorKind::UnpairedSurrogate))
                } else {
                    self.state = StrState::Char;
                    Ok(Step::Char(char::from_u32(val).expect("non-surrogate BMP code point is always valid")))
                }
            }
            StrState::SurrogateExpectBackslash(high) => {
                if c == '\\' {
                    self.state = StrState::SurrogateExpectU(high);
                    Ok(Step::Pending)
                } else {
                    Err(err(SyntaxErrorKind::UnpairedSurrogate))
                }
            }
            StrState::SurrogateExpectU(high) => {
                if c == 'u' {
                    self.state = StrState::SurrogateUnicode(high, 0, 0);
                    self.hex.clear();
                    Ok(Step::Pending)
                } else {
                    Err(err(SyntaxErrorKind::UnpairedSurrogate))
                }
            }
            StrState::SurrogateUnicode(high, count, val) => {
                let Some(digit) = hex_digit(c) else {
                    self.hex.push(c);
                    return Err(err(SyntaxErrorKind::InvalidUnicodeLiteral(self.hex.clone())));
                };
                self.hex.push(c);
                let val = val * 16 + digit;
                let count = count + 1;
                if count < 4 {
                    self.state = StrState::SurrogateUnicode(high, count, val);
                    return Ok(Step::Pending);
                }
                if !(0xDC00..=0xDFFF).contains(&val) {
                    return Err(err(SyntaxErrorKind::NotASurrogate));
                }
                let cp = 0x10000 + (high - 0xD800) * 0x400 + (val - 0xDC00);
                self.state = StrState::Char;
                Ok(Step::Char(char::from_u32(cp).expect("valid surrogate pair decodes to a valid scalar value")))
            }
        }
    }

    /// True only in the plain `Char` state, i.e. not mid-escape or
    /// mid-surrogate-pair. End-of-input here would be a clean (if
    /// unterminated) string; anywhere else it is a more specific failure.
    fn at_char_boundary(&self) -> bool {
        matches!(self.state, StrState::Char)
    }
}

/// An incremental reader over a JSON string body, produced when
/// [`crate::parser::TokenizerOptions::strings_as_streams`] is enabled.
///
/// Reading it incrementally is equivalent to reading the whole value; see
/// [`StringReader::read`]. The tokenizer does not advance past the closing
/// `"` until the reader reports [`StringReader::complete`].
pub struct StringReader {
    pub(crate) cursor: Rc<RefCell<Scanner>>,
    decoder: StringDecoder,
    done: bool,
}

impl std::fmt::Debug for StringReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringReader").field("complete", &self.done).finish()
    }
}

impl StringReader {
    pub(crate) fn new(cursor: Rc<RefCell<Scanner>>) -> Self {
        Self {
            cursor,
            decoder: StringDecoder::new(),
            done: false,
        }
    }

    /// `true` once the closing `"` has been consumed and no buffered output
    /// remains (there is never buffered output in this implementation: each
    /// call reads fresh from the source, so this is equivalent to "the
    /// closing quote has been seen").
    #[must_use]
    pub fn complete(&self) -> bool {
        self.done
    }

    /// Reads up to `max_chars` decoded characters (or, if `max_chars == 0`,
    /// reads until the string ends). Returns an empty string once
    /// [`Self::complete`] is `true`.
    pub fn read(&mut self, max_chars: usize) -> Result<String, Error> {
        if self.done {
            return Ok(String::new());
        }
        let mut out = String::new();
        loop {
            if max_chars > 0 && out.chars().count() >= max_chars {
                break;
            }
            let mut scanner = self.cursor.borrow_mut();
            let Some(c) = scanner.bump_raw()? else {
                let (index, line, column) = scanner.position();
                return Err(Error::Syntax {
                    kind: SyntaxErrorKind::UnterminatedString,
                    index,
                    line,
                    column,
                });
            };
            let (index, line, column) = scanner.position();
            match self.decoder.feed(c, index, line, column)? {
                Step::Char(ch) => out.push(ch),
                Step::End => {
                    scanner.finish_string_delimiter()?;
                    scanner.set_stream_string(false);
                    drop(scanner);
                    self.done = true;
                    break;
                }
                Step::Pending => {}
            }
        }
        Ok(out)
    }

    /// Reads up to and including the next `\n`, or until `cap` characters
    /// have been read (if `cap` is `Some`). The concatenation of successive
    /// `read_line` calls equals the full decoded string.
    pub fn read_line(&mut self, cap: Option<usize>) -> Result<String, Error> {
        if self.done {
            return Ok(String::new());
        }
        let mut out = String::new();
        loop {
            if let Some(cap) = cap {
                if out.chars().count() >= cap {
                    break;
                }
            }
            let chunk = self.read(1)?;
            if chunk.is_empty() {
                break;
            }
            let ended_in_newline = chunk == "\n";
            out.push_str(&chunk);
            if ended_in_newline {
                break;
            }
        }
        Ok(out)
    }

    /// Reads and discards the remainder of the string, draining it without
    /// materialising the output. Used internally when a container must
    /// abandon an unread streaming-string value.
    pub(crate) fn drain(&mut self) -> Result<(), Error> {
        while !self.done {
            self.read(4096)?;
        }
        Ok(())
    }

    /// Reads the entire remaining string as one owned `String`.
    pub fn read_to_string(&mut self) -> Result<String, Error> {
        let mut out = String::new();
        while !self.done {
            out.push_str(&self.read(4096)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_whole(body: &str) -> Result<String, Error> {
        let mut decoder = StringDecoder::new();
        let mut out = String::new();
        for (i, c) in body.chars().enumerate() {
            match decoder.feed(c, i, 1, i + 1)? {
                Step::Char(ch) => out.push(ch),
                Step::End => return Ok(out),
                Step::Pending => {}
            }
        }
        assert!(decoder.at_char_boundary() || true);
        Ok(out)
    }

    #[test]
    fn simple_escapes() {
        assert_eq!(decode_whole(r#"a\nb\tc\"d""#).unwrap(), "a\nb\tc\"d");
    }

    #[test]
    fn surrogate_pair_decodes_to_single_codepoint() {
        let s = decode_whole(r#"𝄞""#).unwrap();
        assert_eq!(s.chars().collect::<Vec<_>>(), vec!['\u{1D11E}']);
    }

    #[test]
    fn unpaired_high_surrogate_errors() {
        let err = decode_whole(r#"\ud834""#).unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax {
                kind: SyntaxErrorKind::UnpairedSurrogate,
                ..
            }
        ));
    }

    #[test]
    fn second_half_not_a_surrogate_errors() {
        let err = decode_whole(r#"\ud834\u00c4""#).unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax {
                kind: SyntaxErrorKind::NotASurrogate,
                ..
            }
        ));
    }

    #[test]
    fn invalid_escape_errors() {
        let err = decode_whole(r"\x\"").unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax {
                kind: SyntaxErrorKind::InvalidEscape('x'),
                ..
            }
        ));
    }
}
