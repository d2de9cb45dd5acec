//! Runtime values: a dynamically shaped tree that encodes with the same
//! rules as statically typed values.

use bytes::{Bytes, BytesMut};
use serde_json::{json, Value};
use spsprims_codec::{
    CodecError, ExecutorAddr, SerializableError, SerializableExpected, SpsChar, SpsError, SpsExpected,
    SpsOutputBuffer, SpsSequence, SpsSerialize, SpsString, SpsTargetAddress,
};

/// Wire tag under which an [`SpsValue`] encodes according to its own
/// variant.
#[derive(Debug)]
pub enum Dynamic {}

/// A decoded (or to-be-encoded) value of some [`WireShape`].
///
/// Maps are sequences of two-member tuples.
///
/// [`WireShape`]: crate::WireShape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpsValue {
    Bool(bool),
    Char(u8),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    Address(ExecutorAddr),
    String(String),
    Empty,
    Error(SerializableError),
    Sequence(Vec<SpsValue>),
    Tuple(Vec<SpsValue>),
    Expected(Box<SerializableExpected<SpsValue>>),
}

impl SpsSerialize<Dynamic> for SpsValue {
    fn sps_size(&self) -> usize {
        match self {
            Self::Bool(v) => SpsSerialize::<bool>::sps_size(v),
            Self::Char(v) => SpsSerialize::<SpsChar>::sps_size(v),
            Self::I8(v) => SpsSerialize::<i8>::sps_size(v),
            Self::U8(v) => SpsSerialize::<u8>::sps_size(v),
            Self::I16(v) => SpsSerialize::<i16>::sps_size(v),
            Self::U16(v) => SpsSerialize::<u16>::sps_size(v),
            Self::I32(v) => SpsSerialize::<i32>::sps_size(v),
            Self::U32(v) => SpsSerialize::<u32>::sps_size(v),
            Self::I64(v) => SpsSerialize::<i64>::sps_size(v),
            Self::U64(v) => SpsSerialize::<u64>::sps_size(v),
            Self::Address(v) => SpsSerialize::<SpsTargetAddress>::sps_size(v),
            Self::String(v) => SpsSerialize::<SpsString>::sps_size(v.as_str()),
            Self::Empty => 0,
            Self::Error(v) => SpsSerialize::<SpsError>::sps_size(v),
            Self::Sequence(items) => SpsSerialize::<SpsSequence<Dynamic>>::sps_size(items.as_slice()),
            Self::Tuple(items) => items
                .iter()
                .map(SpsSerialize::<Dynamic>::sps_size)
                .sum(),
            Self::Expected(v) => SpsSerialize::<SpsExpected<Dynamic>>::sps_size(&**v),
        }
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> spsprims_codec::Result<()> {
        match self {
            Self::Bool(v) => SpsSerialize::<bool>::sps_serialize(v, ob),
            Self::Char(v) => SpsSerialize::<SpsChar>::sps_serialize(v, ob),
            Self::I8(v) => SpsSerialize::<i8>::sps_serialize(v, ob),
            Self::U8(v) => SpsSerialize::<u8>::sps_serialize(v, ob),
            Self::I16(v) => SpsSerialize::<i16>::sps_serialize(v, ob),
            Self::U16(v) => SpsSerialize::<u16>::sps_serialize(v, ob),
            Self::I32(v) => SpsSerialize::<i32>::sps_serialize(v, ob),
            Self::U32(v) => SpsSerialize::<u32>::sps_serialize(v, ob),
            Self::I64(v) => SpsSerialize::<i64>::sps_serialize(v, ob),
            Self::U64(v) => SpsSerialize::<u64>::sps_serialize(v, ob),
            Self::Address(v) => SpsSerialize::<SpsTargetAddress>::sps_serialize(v, ob),
            Self::String(v) => SpsSerialize::<SpsString>::sps_serialize(v.as_str(), ob),
            Self::Empty => Ok(()),
            Self::Error(v) => SpsSerialize::<SpsError>::sps_serialize(v, ob),
            Self::Sequence(items) => {
                SpsSerialize::<SpsSequence<Dynamic>>::sps_serialize(items.as_slice(), ob)
            }
            Self::Tuple(items) => items
                .iter()
                .try_for_each(|item| SpsSerialize::<Dynamic>::sps_serialize(item, ob)),
            Self::Expected(v) => SpsSerialize::<SpsExpected<Dynamic>>::sps_serialize(&**v, ob),
        }
    }
}

impl SpsValue {
    /// Encode into a buffer of exactly the encoded size.
    pub fn to_bytes(&self) -> Result<Bytes, CodecError> {
        let mut buf = BytesMut::zeroed(SpsSerialize::<Dynamic>::sps_size(self));
        let mut ob = SpsOutputBuffer::new(&mut buf);
        SpsSerialize::<Dynamic>::sps_serialize(self, &mut ob)?;
        debug_assert_eq!(ob.remaining(), 0);
        Ok(buf.freeze())
    }

    /// The JSON form of this value.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(v) => Value::Bool(*v),
            Self::Char(v) => Value::String(char::from(*v).to_string()),
            Self::I8(v) => json!(v),
            Self::U8(v) => json!(v),
            Self::I16(v) => json!(v),
            Self::U16(v) => json!(v),
            Self::I32(v) => json!(v),
            Self::U32(v) => json!(v),
            Self::I64(v) => json!(v),
            Self::U64(v) => json!(v),
            Self::Address(v) => json!(v.value()),
            Self::String(v) => Value::String(v.clone()),
            Self::Empty => Value::Null,
            Self::Error(SerializableError::Success) => Value::Null,
            Self::Error(SerializableError::Failure(message)) => json!({ "error": message }),
            Self::Sequence(items) | Self::Tuple(items) => {
                Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Expected(expected) => match &**expected {
                SerializableExpected::Value(value) => json!({ "value": value.to_json() }),
                SerializableExpected::Failure(message) => json!({ "error": message }),
            },
        }
    }
}
