//! Mapping between native return values and their wire form.
//!
//! Most return values are encoded as they are. Fallible ones are first
//! flattened into their adapter records, and decoded back into a native
//! `Result` whose error is a [`WrapperError`].

use std::fmt;

use spsprims_codec::{
    CodecError, ExpectedSuccess, SerializableError, SerializableExpected, SpsArgList, SpsChar,
    SpsDeserialize, SpsEmpty, SpsError, SpsExpected, SpsInputBuffer, SpsSequence, SpsSerialize,
    SpsTargetAddress, SpsTuple, WrapperError,
};

/// A handler return value that can be encoded under `RetTag`.
pub trait IntoSpsReturn<RetTag> {
    type Serializable: SpsSerialize<RetTag>;

    fn into_sps_return(self) -> Self::Serializable;
}

/// A caller-side return value decoded from a payload under `RetTag`.
pub trait FromSpsReturn<RetTag>: Sized {
    fn from_sps_return(data: &[u8]) -> Result<Self, CodecError>;
}

fn decode<Tag, T>(data: &[u8]) -> Result<T, CodecError>
where
    T: for<'de> SpsDeserialize<'de, Tag>,
{
    T::sps_deserialize(&mut SpsInputBuffer::new(data))
}

macro_rules! pass_through {
    ($($tag:ty),* $(,)?) => {$(
        impl<T: SpsSerialize<$tag>> IntoSpsReturn<$tag> for T {
            type Serializable = T;

            fn into_sps_return(self) -> T {
                self
            }
        }

        impl<T: for<'de> SpsDeserialize<'de, $tag>> FromSpsReturn<$tag> for T {
            fn from_sps_return(data: &[u8]) -> Result<Self, CodecError> {
                decode::<$tag, T>(data)
            }
        }
    )*};
}

pass_through!(bool, u8, i8, u16, i16, u32, i32, u64, i64, SpsChar, SpsTargetAddress, SpsEmpty);

impl<E, T: SpsSerialize<SpsSequence<E>>> IntoSpsReturn<SpsSequence<E>> for T {
    type Serializable = T;

    fn into_sps_return(self) -> T {
        self
    }
}

impl<E, T: for<'de> SpsDeserialize<'de, SpsSequence<E>>> FromSpsReturn<SpsSequence<E>> for T {
    fn from_sps_return(data: &[u8]) -> Result<Self, CodecError> {
        decode::<SpsSequence<E>, T>(data)
    }
}

impl<Ts, T: SpsSerialize<SpsTuple<Ts>>> IntoSpsReturn<SpsTuple<Ts>> for T {
    type Serializable = T;

    fn into_sps_return(self) -> T {
        self
    }
}

impl<Ts, T: for<'de> SpsDeserialize<'de, SpsTuple<Ts>>> FromSpsReturn<SpsTuple<Ts>> for T {
    fn from_sps_return(data: &[u8]) -> Result<Self, CodecError> {
        SpsArgList::<Ts>::from_buffer(data)
    }
}

impl<E: fmt::Display> IntoSpsReturn<SpsError> for Result<(), E> {
    type Serializable = SerializableError;

    fn into_sps_return(self) -> SerializableError {
        SerializableError::from_result(self)
    }
}

impl IntoSpsReturn<SpsError> for SerializableError {
    type Serializable = SerializableError;

    fn into_sps_return(self) -> SerializableError {
        self
    }
}

impl FromSpsReturn<SpsError> for Result<(), WrapperError> {
    fn from_sps_return(data: &[u8]) -> Result<Self, CodecError> {
        <SerializableError as FromSpsReturn<SpsError>>::from_sps_return(data)
            .map(SerializableError::into_result)
    }
}

impl FromSpsReturn<SpsError> for SerializableError {
    fn from_sps_return(data: &[u8]) -> Result<Self, CodecError> {
        decode::<SpsError, SerializableError>(data)
    }
}

impl<Tag, T: SpsSerialize<Tag>, E: fmt::Display> IntoSpsReturn<SpsExpected<Tag>> for Result<T, E> {
    type Serializable = SerializableExpected<T>;

    fn into_sps_return(self) -> SerializableExpected<T> {
        SerializableExpected::from_result(self)
    }
}

impl<Tag, T: SpsSerialize<Tag>> IntoSpsReturn<SpsExpected<Tag>> for SerializableExpected<T> {
    type Serializable = Self;

    fn into_sps_return(self) -> Self {
        self
    }
}

impl<Tag, T: SpsSerialize<Tag>> IntoSpsReturn<SpsExpected<Tag>> for ExpectedSuccess<T> {
    type Serializable = Self;

    fn into_sps_return(self) -> Self {
        self
    }
}

impl<Tag, T> FromSpsReturn<SpsExpected<Tag>> for Result<T, WrapperError>
where
    T: for<'de> SpsDeserialize<'de, Tag>,
{
    fn from_sps_return(data: &[u8]) -> Result<Self, CodecError> {
        <SerializableExpected<T> as FromSpsReturn<SpsExpected<Tag>>>::from_sps_return(data)
            .map(SerializableExpected::into_result)
    }
}

impl<Tag, T> FromSpsReturn<SpsExpected<Tag>> for SerializableExpected<T>
where
    T: for<'de> SpsDeserialize<'de, Tag>,
{
    fn from_sps_return(data: &[u8]) -> Result<Self, CodecError> {
        decode::<SpsExpected<Tag>, SerializableExpected<T>>(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spsprims_codec::{SpsOutputBuffer, SpsString};

    fn encode_return<Tag, R: IntoSpsReturn<Tag>>(value: R) -> Vec<u8> {
        let value = value.into_sps_return();
        let mut out = vec![0u8; value.sps_size()];
        value.sps_serialize(&mut SpsOutputBuffer::new(&mut out)).unwrap();
        out
    }

    #[test]
    fn plain_values_pass_through() {
        assert_eq!(encode_return::<u16, _>(0x0102u16), [2, 1]);
        assert!(encode_return::<SpsEmpty, _>(()).is_empty());
        let name: String = FromSpsReturn::<SpsString>::from_sps_return(&encode_return::<SpsString, _>("n")).unwrap();
        assert_eq!(name, "n");
    }

    #[test]
    fn native_error_results_use_the_error_adapter() {
        let failed: Result<(), String> = Err("boom".into());
        let bytes = encode_return::<SpsError, _>(failed);
        assert_eq!(bytes.len(), 13);

        let decoded = <Result<(), WrapperError> as FromSpsReturn<SpsError>>::from_sps_return(&bytes).unwrap();
        assert_eq!(decoded.unwrap_err().message(), "boom");

        let ok = encode_return::<SpsError, _>(Ok::<(), String>(()));
        assert_eq!(ok, [0]);
    }

    #[test]
    fn native_value_results_use_the_expected_adapter() {
        let bytes = encode_return::<SpsExpected<u32>, _>(Ok::<u32, String>(5));
        let decoded =
            <Result<u32, WrapperError> as FromSpsReturn<SpsExpected<u32>>>::from_sps_return(&bytes).unwrap();
        assert_eq!(decoded, Ok(5));

        let bytes = encode_return::<SpsExpected<u32>, _>(Err::<u32, _>("bad input"));
        let decoded =
            <Result<u32, WrapperError> as FromSpsReturn<SpsExpected<u32>>>::from_sps_return(&bytes).unwrap();
        assert_eq!(decoded, Err(WrapperError::new("bad input")));
    }

    #[test]
    fn bare_value_always_reports_success() {
        let bytes = encode_return::<SpsExpected<SpsString>, _>(ExpectedSuccess("v"));
        let decoded =
            <SerializableExpected<String> as FromSpsReturn<SpsExpected<SpsString>>>::from_sps_return(&bytes)
                .unwrap();
        assert_eq!(decoded, SerializableExpected::Value("v".to_string()));
    }

    #[test]
    fn truncated_payload_is_a_decode_error() {
        let bytes = encode_return::<SpsExpected<u64>, _>(Ok::<u64, String>(1));
        assert!(
            <Result<u64, WrapperError> as FromSpsReturn<SpsExpected<u64>>>::from_sps_return(&bytes[..4])
                .is_err()
        );
    }
}
