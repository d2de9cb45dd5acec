//! Simple Packed Serialization (SPS).
//!
//! This is the core value-add layer of spsprims. Values are encoded into a
//! flat byte buffer according to a *wire tag*, a type-level label that
//! selects the encoding rule:
//! - Primitives (`bool`, [`SpsChar`], 8/16/32/64-bit integers): fixed width,
//!   little-endian, two's complement; `bool` and char are one byte
//! - [`SpsTuple`]: member encodings concatenated, no padding
//! - [`SpsSequence`]: a `u64` length followed by each element
//! - [`SpsString`] and [`SpsMap`]: sequences of chars and of key/value tuples
//! - [`SpsError`] and [`SpsExpected`]: fallible results, via adapter records
//! - [`SpsEmpty`]: a zero-byte placeholder
//!
//! Distinct native types may share one tag; each (tag, type) pair is an
//! implementation of [`SpsSerialize`] and/or [`SpsDeserialize`].

pub mod address;
pub mod arg_list;
pub mod buffer;
pub mod error;
pub mod fallible;
pub mod primitives;
pub mod sequence;
pub mod tags;
pub mod traits;
pub mod tuple;

pub use address::ExecutorAddr;
pub use arg_list::SpsArgList;
pub use buffer::{SpsInputBuffer, SpsOutputBuffer};
pub use error::{CodecError, Result};
pub use fallible::{ExpectedSuccess, SerializableError, SerializableExpected, WrapperError};
pub use sequence::{
    serialize_sequence, sequence_size, MAX_ZERO_WIDTH_ELEMENTS, SEQUENCE_LENGTH_SIZE,
};
pub use tags::{
    SpsChar, SpsEmpty, SpsError, SpsExpected, SpsMap, SpsSequence, SpsString, SpsTargetAddress,
    SpsTuple,
};
pub use traits::{SequenceBuilder, SpsDeserialize, SpsSerialize};
