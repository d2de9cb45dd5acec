use spsprims_codec::{CodecError, ExecutorAddr};

/// Errors that can occur on the call path or while configuring it.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The process-wide dispatch primitive is missing a context or function.
    #[error("dispatch not configured: {0}")]
    DispatchNotConfigured(&'static str),

    /// The process-wide dispatch primitive was already installed.
    #[error("dispatch already configured")]
    DispatchAlreadyConfigured,

    /// Arguments could not be encoded.
    #[error("could not serialize arguments for wrapper function call: {0}")]
    SerializeArguments(#[source] CodecError),

    /// The call did not complete; the message is reported verbatim.
    #[error("{0}")]
    OutOfBand(String),

    /// The returned payload could not be decoded.
    #[error("could not deserialize result from wrapper function call: {0}")]
    DeserializeResult(#[source] CodecError),

    /// A registry already holds a handler for this target.
    #[error("wrapper function already registered at {0}")]
    AlreadyRegistered(ExecutorAddr),
}

pub type Result<T> = std::result::Result<T, CallError>;
