//! Conversion between JSON, [`SpsValue`] and wire bytes, driven by a
//! [`WireShape`].

use std::collections::HashSet;

use bytes::Bytes;
use serde_json::Value;
use spsprims_codec::{
    CodecError, ExecutorAddr, SerializableError, SerializableExpected, SpsChar, SpsDeserialize,
    SpsError, SpsInputBuffer, SpsString, SpsTargetAddress,
};
use tracing::trace;

use crate::config::SigConfig;
use crate::error::{Result, SigError};
use crate::shape::WireShape;
use crate::value::SpsValue;

impl WireShape {
    /// Encode a JSON value with default limits.
    pub fn encode(&self, json: &Value) -> Result<Bytes> {
        self.encode_with(json, &SigConfig::default())
    }

    /// Encode a JSON value.
    pub fn encode_with(&self, json: &Value, config: &SigConfig) -> Result<Bytes> {
        let bytes = self.to_value(json, config)?.to_bytes()?;
        trace!(shape = %self, size = bytes.len(), "encoded value");
        Ok(bytes)
    }

    /// Decode bytes to JSON with default limits.
    pub fn decode(&self, data: &[u8]) -> Result<Value> {
        self.decode_with(data, &SigConfig::default())
    }

    /// Decode bytes to JSON. All of `data` must be consumed.
    pub fn decode_with(&self, data: &[u8], config: &SigConfig) -> Result<Value> {
        Ok(self.decode_value(data, config)?.to_json())
    }

    /// Check a JSON value against this shape and convert it.
    pub fn to_value(&self, json: &Value, config: &SigConfig) -> Result<SpsValue> {
        self.check_depth(config)?;
        from_json(self, json, config)
    }

    /// Decode bytes into a value. All of `data` must be consumed.
    pub fn decode_value(&self, data: &[u8], config: &SigConfig) -> Result<SpsValue> {
        self.check_depth(config)?;
        if let Some(size) = self.fixed_size() {
            if data.len() < size {
                return Err(CodecError::UnexpectedEof {
                    needed: size,
                    remaining: data.len(),
                }
                .into());
            }
            if data.len() > size {
                return Err(SigError::TrailingBytes(data.len() - size));
            }
        }
        let mut ib = SpsInputBuffer::new(data);
        let value = read(self, &mut ib, config)?;
        if !ib.is_empty() {
            return Err(SigError::TrailingBytes(ib.remaining()));
        }
        trace!(shape = %self, size = data.len(), "decoded value");
        Ok(value)
    }

    fn check_depth(&self, config: &SigConfig) -> Result<()> {
        let depth = self.depth();
        if depth > config.max_depth {
            return Err(SigError::LimitExceeded(format!(
                "shape depth {depth} exceeds {}",
                config.max_depth
            )));
        }
        Ok(())
    }
}

fn kind(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(expected: impl Into<String>, json: &Value) -> SigError {
    SigError::TypeMismatch {
        expected: expected.into(),
        found: kind(json).to_string(),
    }
}

fn integer<T>(shape: &WireShape, json: &Value) -> Result<T>
where
    T: TryFrom<u64> + TryFrom<i64>,
{
    let Value::Number(number) = json else {
        return Err(mismatch(shape.to_string(), json));
    };
    let converted = match (number.as_u64(), number.as_i64()) {
        (Some(n), _) => <T as TryFrom<u64>>::try_from(n).ok(),
        (None, Some(n)) => <T as TryFrom<i64>>::try_from(n).ok(),
        (None, None) => None,
    };
    converted.ok_or_else(|| SigError::OutOfRange {
        shape: shape.to_string(),
        value: number.to_string(),
    })
}

fn check_len(len: usize, config: &SigConfig) -> Result<()> {
    if len > config.max_sequence_len {
        return Err(SigError::LimitExceeded(format!(
            "sequence of {len} elements exceeds {}",
            config.max_sequence_len
        )));
    }
    Ok(())
}

fn message(json: &Value) -> Option<&str> {
    json.as_object()
        .filter(|object| object.len() == 1)
        .and_then(|object| object.get("error"))
        .and_then(Value::as_str)
}

fn from_json(shape: &WireShape, json: &Value, config: &SigConfig) -> Result<SpsValue> {
    Ok(match shape {
        WireShape::Bool => SpsValue::Bool(json.as_bool().ok_or_else(|| mismatch("bool", json))?),
        WireShape::Char => {
            let text = json.as_str().ok_or_else(|| mismatch("char", json))?;
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => SpsValue::Char(u8::try_from(c).map_err(|_| SigError::OutOfRange {
                    shape: "char".into(),
                    value: text.to_string(),
                })?),
                _ => return Err(mismatch("char", json)),
            }
        }
        WireShape::I8 => SpsValue::I8(integer(shape, json)?),
        WireShape::U8 => SpsValue::U8(integer(shape, json)?),
        WireShape::I16 => SpsValue::I16(integer(shape, json)?),
        WireShape::U16 => SpsValue::U16(integer(shape, json)?),
        WireShape::I32 => SpsValue::I32(integer(shape, json)?),
        WireShape::U32 => SpsValue::U32(integer(shape, json)?),
        WireShape::I64 => SpsValue::I64(integer(shape, json)?),
        WireShape::U64 => SpsValue::U64(integer(shape, json)?),
        WireShape::Address => {
            let value = match json.as_str() {
                Some(text) => text
                    .strip_prefix("0x")
                    .and_then(|hex| u64::from_str_radix(hex, 16).ok())
                    .ok_or_else(|| SigError::OutOfRange {
                        shape: "addr".into(),
                        value: text.to_string(),
                    })?,
                None => integer::<u64>(shape, json)?,
            };
            SpsValue::Address(ExecutorAddr::new(value))
        }
        WireShape::String => SpsValue::String(
            json.as_str()
                .ok_or_else(|| mismatch("string", json))?
                .to_string(),
        ),
        WireShape::Empty => match json {
            Value::Null => SpsValue::Empty,
            other => return Err(mismatch("null", other)),
        },
        WireShape::Error => match (json, message(json)) {
            (Value::Null, _) => SpsValue::Error(SerializableError::Success),
            (_, Some(message)) => SpsValue::Error(SerializableError::Failure(message.to_string())),
            _ => return Err(mismatch("null or {\"error\": message}", json)),
        },
        WireShape::Sequence(inner) => {
            let items = json.as_array().ok_or_else(|| mismatch(shape.to_string(), json))?;
            check_len(items.len(), config)?;
            SpsValue::Sequence(
                items
                    .iter()
                    .map(|item| from_json(inner, item, config))
                    .collect::<Result<_>>()?,
            )
        }
        WireShape::Map(key, value) => {
            let entries: Vec<SpsValue> = match json {
                Value::Array(pairs) => {
                    check_len(pairs.len(), config)?;
                    pairs
                        .iter()
                        .map(|pair| -> Result<SpsValue> {
                            match pair.as_array().map(Vec::as_slice) {
                                Some([k, v]) => Ok(SpsValue::Tuple(vec![
                                    from_json(key, k, config)?,
                                    from_json(value, v, config)?,
                                ])),
                                _ => Err(mismatch("[key, value] pair", pair)),
                            }
                        })
                        .collect::<Result<_>>()?
                }
                Value::Object(object) if **key == WireShape::String => {
                    check_len(object.len(), config)?;
                    object
                        .iter()
                        .map(|(k, v)| -> Result<SpsValue> {
                            Ok(SpsValue::Tuple(vec![
                                SpsValue::String(k.clone()),
                                from_json(value, v, config)?,
                            ]))
                        })
                        .collect::<Result<_>>()?
                }
                other => return Err(mismatch(shape.to_string(), other)),
            };
            SpsValue::Sequence(entries)
        }
        WireShape::Tuple(members) => match json.as_array() {
            Some(items) if items.len() == members.len() => SpsValue::Tuple(
                members
                    .iter()
                    .zip(items)
                    .map(|(member, item)| from_json(member, item, config))
                    .collect::<Result<_>>()?,
            ),
            _ => {
                return Err(mismatch(
                    format!("array of {} elements", members.len()),
                    json,
                ))
            }
        },
        WireShape::Expected(inner) => {
            let expected = match (json.get("value"), message(json)) {
                (Some(value), None) if json.as_object().is_some_and(|o| o.len() == 1) => {
                    SerializableExpected::Value(from_json(inner, value, config)?)
                }
                (None, Some(message)) => SerializableExpected::Failure(message.to_string()),
                _ => return Err(mismatch("{\"value\": v} or {\"error\": message}", json)),
            };
            SpsValue::Expected(Box::new(expected))
        }
    })
}

fn read_len(ib: &mut SpsInputBuffer<'_>, config: &SigConfig) -> Result<usize> {
    let len = <u64 as SpsDeserialize<u64>>::sps_deserialize(ib)?;
    let len = usize::try_from(len).map_err(|_| CodecError::LengthOverflow(len))?;
    check_len(len, config)?;
    Ok(len)
}

fn read(shape: &WireShape, ib: &mut SpsInputBuffer<'_>, config: &SigConfig) -> Result<SpsValue> {
    Ok(match shape {
        WireShape::Bool => SpsValue::Bool(<bool as SpsDeserialize<bool>>::sps_deserialize(ib)?),
        WireShape::Char => SpsValue::Char(<u8 as SpsDeserialize<SpsChar>>::sps_deserialize(ib)?),
        WireShape::I8 => SpsValue::I8(<i8 as SpsDeserialize<i8>>::sps_deserialize(ib)?),
        WireShape::U8 => SpsValue::U8(<u8 as SpsDeserialize<u8>>::sps_deserialize(ib)?),
        WireShape::I16 => SpsValue::I16(<i16 as SpsDeserialize<i16>>::sps_deserialize(ib)?),
        WireShape::U16 => SpsValue::U16(<u16 as SpsDeserialize<u16>>::sps_deserialize(ib)?),
        WireShape::I32 => SpsValue::I32(<i32 as SpsDeserialize<i32>>::sps_deserialize(ib)?),
        WireShape::U32 => SpsValue::U32(<u32 as SpsDeserialize<u32>>::sps_deserialize(ib)?),
        WireShape::I64 => SpsValue::I64(<i64 as SpsDeserialize<i64>>::sps_deserialize(ib)?),
        WireShape::U64 => SpsValue::U64(<u64 as SpsDeserialize<u64>>::sps_deserialize(ib)?),
        WireShape::Address => SpsValue::Address(
            <ExecutorAddr as SpsDeserialize<SpsTargetAddress>>::sps_deserialize(ib)?,
        ),
        WireShape::String => {
            check_len(peek_len(ib)?, config)?;
            SpsValue::String(<String as SpsDeserialize<SpsString>>::sps_deserialize(ib)?)
        }
        WireShape::Empty => SpsValue::Empty,
        WireShape::Error => {
            SpsValue::Error(<SerializableError as SpsDeserialize<SpsError>>::sps_deserialize(ib)?)
        }
        WireShape::Sequence(inner) => {
            let len = read_len(ib, config)?;
            let mut items = Vec::with_capacity(len.min(ib.remaining()));
            for _ in 0..len {
                items.push(read(inner, ib, config)?);
            }
            SpsValue::Sequence(items)
        }
        WireShape::Map(key, value) => {
            let len = read_len(ib, config)?;
            let mut entries = Vec::with_capacity(len.min(ib.remaining()));
            let mut seen = HashSet::new();
            for _ in 0..len {
                let before = ib.data();
                let k = read(key, ib, config)?;
                if !seen.insert(&before[..before.len() - ib.remaining()]) {
                    return Err(CodecError::DuplicateKey.into());
                }
                let v = read(value, ib, config)?;
                entries.push(SpsValue::Tuple(vec![k, v]));
            }
            SpsValue::Sequence(entries)
        }
        WireShape::Tuple(members) => SpsValue::Tuple(
            members
                .iter()
                .map(|member| read(member, ib, config))
                .collect::<Result<_>>()?,
        ),
        WireShape::Expected(inner) => {
            let expected = if <bool as SpsDeserialize<bool>>::sps_deserialize(ib)? {
                SerializableExpected::Value(read(inner, ib, config)?)
            } else {
                check_len(peek_len(ib)?, config)?;
                SerializableExpected::Failure(<String as SpsDeserialize<SpsString>>::sps_deserialize(ib)?)
            };
            SpsValue::Expected(Box::new(expected))
        }
    })
}

fn peek_len(ib: &SpsInputBuffer<'_>) -> Result<usize> {
    let mut peek = *ib;
    let len = <u64 as SpsDeserialize<u64>>::sps_deserialize(&mut peek)?;
    Ok(usize::try_from(len).map_err(|_| CodecError::LengthOverflow(len))?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn shape(text: &str) -> WireShape {
        text.parse().unwrap()
    }

    #[test]
    fn json_round_trips_through_bytes() {
        let cases = [
            ("bool", json!(true)),
            ("char", json!("A")),
            ("i8", json!(-128)),
            ("u64", json!(u64::MAX)),
            ("i64", json!(i64::MIN)),
            ("addr", json!(4096)),
            ("string", json!("héllo")),
            ("empty", json!(null)),
            ("error", json!(null)),
            ("error", json!({ "error": "boom" })),
            ("seq<u16>", json!([1, 2, 65535])),
            ("map<string,bool>", json!([["a", true], ["b", false]])),
            ("tuple<u8,string,tuple<>>", json!([7, "x", []])),
            ("expected<seq<i32>>", json!({ "value": [-1, 0, 1] })),
            ("expected<u8>", json!({ "error": "nope" })),
        ];
        for (text, json) in cases {
            let shape = shape(text);
            let bytes = shape.encode(&json).unwrap();
            assert_eq!(shape.decode(&bytes).unwrap(), json, "{text}");
        }
    }

    #[test]
    fn addresses_accept_hex_strings() {
        let bytes = shape("addr").encode(&json!("0x1000")).unwrap();
        assert_eq!(&bytes[..], &0x1000u64.to_le_bytes());
    }

    #[test]
    fn objects_are_accepted_for_string_keyed_maps() {
        let map = shape("map<string,u8>");
        let bytes = map.encode(&json!({ "k": 1 })).unwrap();
        assert_eq!(map.decode(&bytes).unwrap(), json!([["k", 1]]));
        assert!(shape("map<u8,u8>").encode(&json!({ "1": 1 })).is_err());
    }

    #[test]
    fn rejects_values_that_do_not_fit() {
        assert!(matches!(
            shape("u8").encode(&json!(256)),
            Err(SigError::OutOfRange { .. })
        ));
        assert!(matches!(
            shape("u32").encode(&json!(-1)),
            Err(SigError::OutOfRange { .. })
        ));
        assert!(matches!(
            shape("string").encode(&json!(1)),
            Err(SigError::TypeMismatch { .. })
        ));
        assert!(shape("char").encode(&json!("ab")).is_err());
        assert!(shape("char").encode(&json!("€")).is_err());
        assert!(shape("tuple<u8,u8>").encode(&json!([1])).is_err());
        assert!(shape("expected<u8>").encode(&json!({ "value": 1, "error": "x" })).is_err());
    }

    #[test]
    fn decode_requires_full_consumption() {
        assert!(matches!(
            shape("u8").decode(&[1, 2]),
            Err(SigError::TrailingBytes(1))
        ));
    }

    #[test]
    fn fixed_width_shapes_check_length_before_decoding() {
        let pair = shape("tuple<u8,u32>");
        assert!(matches!(
            pair.decode(&[0; 3]),
            Err(SigError::Codec(CodecError::UnexpectedEof {
                needed: 5,
                remaining: 3
            }))
        ));
        assert!(matches!(
            pair.decode(&[0; 7]),
            Err(SigError::TrailingBytes(2))
        ));
        assert_eq!(pair.decode(&[9, 1, 0, 0, 0]).unwrap(), json!([9, 1]));
        assert!(matches!(
            shape("bool").decode(&[2]),
            Err(SigError::Codec(CodecError::InvalidBool(2)))
        ));
    }

    #[test]
    fn decode_rejects_duplicate_map_keys() {
        let map = shape("map<u8,u8>");
        let bytes = map.encode(&json!([[1, 2], [1, 3]])).unwrap();
        assert!(matches!(
            map.decode(&bytes),
            Err(SigError::Codec(CodecError::DuplicateKey))
        ));
    }

    #[test]
    fn sequence_limit_applies_before_allocation() {
        let config = SigConfig {
            max_sequence_len: 2,
            ..SigConfig::default()
        };
        let seq = shape("seq<u8>");
        assert!(seq.encode_with(&json!([1, 2, 3]), &config).is_err());

        let mut bytes = u64::MAX.to_le_bytes().to_vec();
        bytes.push(0);
        assert!(matches!(
            seq.decode_with(&bytes, &config),
            Err(SigError::LimitExceeded(_)) | Err(SigError::Codec(CodecError::LengthOverflow(_)))
        ));
    }

    #[test]
    fn truncated_input_fails_at_every_offset() {
        let shape = shape("tuple<string,map<u8,expected<string>>>");
        let bytes = shape
            .encode(&json!(["abc", [[1, { "value": "x" }], [2, { "error": "e" }]]]))
            .unwrap();
        for cut in 0..bytes.len() {
            assert!(shape.decode(&bytes[..cut]).is_err(), "cut at {cut}");
        }
    }
}
