/// Errors that can occur while encoding or decoding SPS data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A write did not fit in the remaining output space.
    #[error("output buffer overflow ({needed} bytes needed, {remaining} remaining)")]
    BufferOverflow { needed: usize, remaining: usize },

    /// The input ended before a complete value was read.
    #[error("unexpected end of input ({needed} bytes needed, {remaining} remaining)")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A bool was encoded as something other than 0 or 1.
    #[error("invalid bool byte 0x{0:02x}")]
    InvalidBool(u8),

    /// String bytes were not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    /// A sequence length does not fit in the host's address space.
    #[error("sequence length {0} exceeds addressable memory")]
    LengthOverflow(u64),

    /// A sequence of zero-width elements claimed more elements than allowed.
    #[error("sequence of {0} zero-width elements exceeds {max}", max = crate::sequence::MAX_ZERO_WIDTH_ELEMENTS)]
    ZeroWidthOverflow(u64),

    /// A map contained the same key twice.
    #[error("duplicate key in map")]
    DuplicateKey,
}

pub type Result<T> = std::result::Result<T, CodecError>;
