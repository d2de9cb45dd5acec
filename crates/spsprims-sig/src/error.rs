use spsprims_codec::CodecError;

/// Errors that can occur while parsing signatures or converting values.
#[derive(Debug, thiserror::Error)]
pub enum SigError {
    /// The signature text is malformed.
    #[error("invalid signature at offset {position}: {message}")]
    Parse { position: usize, message: String },

    /// The wire data could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A JSON value does not fit the shape.
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A number does not fit the shape's integer type.
    #[error("value {value} out of range for {shape}")]
    OutOfRange { shape: String, value: String },

    /// A configured limit was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// The input is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The value was decoded but input remained.
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
}

pub type Result<T> = std::result::Result<T, SigError>;
