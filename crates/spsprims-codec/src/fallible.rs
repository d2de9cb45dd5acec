//! Serializable forms of fallible results.
//!
//! Native errors never cross the wire. A failure is flattened to its
//! message before encoding and rebuilt as a [`WrapperError`] on the other
//! side.

use std::fmt;

use crate::buffer::{SpsInputBuffer, SpsOutputBuffer};
use crate::error::Result;
use crate::tags::{SpsError, SpsExpected, SpsString};
use crate::traits::{SpsDeserialize, SpsSerialize};

/// An error rebuilt from a message received over the wire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct WrapperError {
    message: String,
}

impl WrapperError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Wire-facing form of a `Result<(), E>`.
///
/// Encoded under [`SpsError`] as a `bool` "has error" flag followed, on
/// failure, by the message as an [`SpsString`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SerializableError {
    #[default]
    Success,
    Failure(String),
}

impl SerializableError {
    /// Flatten a native result; a failure keeps only its `Display` text.
    pub fn from_result<E: fmt::Display>(result: std::result::Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(err) => Self::Failure(err.to_string()),
        }
    }

    /// Rebuild a native result, turning a failure into a [`WrapperError`].
    pub fn into_result(self) -> std::result::Result<(), WrapperError> {
        match self {
            Self::Success => Ok(()),
            Self::Failure(message) => Err(WrapperError::new(message)),
        }
    }

    pub fn has_error(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure(message) => Some(message),
        }
    }
}

impl<E: fmt::Display> From<std::result::Result<(), E>> for SerializableError {
    fn from(result: std::result::Result<(), E>) -> Self {
        Self::from_result(result)
    }
}

impl From<SerializableError> for std::result::Result<(), WrapperError> {
    fn from(value: SerializableError) -> Self {
        value.into_result()
    }
}

impl SpsSerialize<SpsError> for SerializableError {
    fn sps_size(&self) -> usize {
        match self {
            Self::Success => 1,
            Self::Failure(message) => 1 + <str as SpsSerialize<SpsString>>::sps_size(message),
        }
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        <bool as SpsSerialize<bool>>::sps_serialize(&self.has_error(), ob)?;
        if let Self::Failure(message) = self {
            <str as SpsSerialize<SpsString>>::sps_serialize(message, ob)?;
        }
        Ok(())
    }
}

impl<'de> SpsDeserialize<'de, SpsError> for SerializableError {
    fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
        if <bool as SpsDeserialize<bool>>::sps_deserialize(ib)? {
            let message = <String as SpsDeserialize<SpsString>>::sps_deserialize(ib)?;
            Ok(Self::Failure(message))
        } else {
            Ok(Self::Success)
        }
    }
}

/// Wire-facing form of a `Result<T, E>`.
///
/// Encoded under [`SpsExpected`] as a `bool` "has value" flag followed by
/// either the value or the error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializableExpected<T> {
    Value(T),
    Failure(String),
}

impl<T> SerializableExpected<T> {
    /// Flatten a native result; a failure keeps only its `Display` text.
    pub fn from_result<E: fmt::Display>(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(err) => Self::Failure(err.to_string()),
        }
    }

    /// Rebuild a native result, turning a failure into a [`WrapperError`].
    pub fn into_result(self) -> std::result::Result<T, WrapperError> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Failure(message) => Err(WrapperError::new(message)),
        }
    }

    pub fn has_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl<T, E: fmt::Display> From<std::result::Result<T, E>> for SerializableExpected<T> {
    fn from(result: std::result::Result<T, E>) -> Self {
        Self::from_result(result)
    }
}

impl<Tag, T: SpsSerialize<Tag>> SpsSerialize<SpsExpected<Tag>> for SerializableExpected<T> {
    fn sps_size(&self) -> usize {
        1 + match self {
            Self::Value(value) => value.sps_size(),
            Self::Failure(message) => <str as SpsSerialize<SpsString>>::sps_size(message),
        }
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        <bool as SpsSerialize<bool>>::sps_serialize(&self.has_value(), ob)?;
        match self {
            Self::Value(value) => value.sps_serialize(ob),
            Self::Failure(message) => <str as SpsSerialize<SpsString>>::sps_serialize(message, ob),
        }
    }
}

impl<'de, Tag, T: SpsDeserialize<'de, Tag>> SpsDeserialize<'de, SpsExpected<Tag>>
    for SerializableExpected<T>
{
    fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
        if <bool as SpsDeserialize<bool>>::sps_deserialize(ib)? {
            Ok(Self::Value(T::sps_deserialize(ib)?))
        } else {
            let message = <String as SpsDeserialize<SpsString>>::sps_deserialize(ib)?;
            Ok(Self::Failure(message))
        }
    }
}

/// A plain value returned where an [`SpsExpected`] is declared.
///
/// Always encoded as the success case. There is no decoding rule: the
/// receiver uses [`SerializableExpected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedSuccess<T>(pub T);

impl<Tag, T: SpsSerialize<Tag>> SpsSerialize<SpsExpected<Tag>> for ExpectedSuccess<T> {
    fn sps_size(&self) -> usize {
        1 + self.0.sps_size()
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        <bool as SpsSerialize<bool>>::sps_serialize(&true, ob)?;
        self.0.sps_serialize(ob)
    }
}
