//! Tokenizer configuration.

/// How the tokenizer blocks its reads from the byte source.
///
/// # Default
///
/// [`Buffering::Default`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Buffering {
    /// Use a reasonable default I/O block size.
    #[default]
    Default,
    /// Read one character at a time. Useful for tests that need precise
    /// control over how much of the document has been consumed.
    SingleCharacter,
    /// Read in blocks of exactly `N` characters.
    Blocks(usize),
}

impl Buffering {
    pub(crate) fn block_size(self) -> usize {
        match self {
            Buffering::Default => 8 * 1024,
            Buffering::SingleCharacter => 1,
            Buffering::Blocks(n) => n.max(1),
        }
    }
}

/// Configuration options for the tokenizer.
///
/// All options default to their least surprising, whole-document-buffering
/// value, an all-`Copy`, `Default`-able flags struct documented field by
/// field.
///
/// # Examples
///
/// ```
/// use lazyjson::{Buffering, TokenizerOptions};
///
/// let opts = TokenizerOptions {
///     buffering: Buffering::Blocks(64),
///     strings_as_streams: true,
/// };
/// assert!(opts.strings_as_streams);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizerOptions {
    /// Controls how many characters are pulled from the byte source per
    /// underlying read.
    ///
    /// # Default
    ///
    /// [`Buffering::Default`]
    pub buffering: Buffering,

    /// When `true`, `STRING` tokens carry an incremental
    /// [`crate::StringReader`] instead of a fully decoded `String`.
    /// The caller must fully drain each string reader before requesting the
    /// next token.
    ///
    /// # Default
    ///
    /// `false`
    pub strings_as_streams: bool,
}
