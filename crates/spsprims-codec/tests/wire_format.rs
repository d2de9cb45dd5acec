use std::collections::BTreeMap;

use spsprims_codec::{
    CodecError, ExecutorAddr, SerializableError, SerializableExpected, SpsArgList, SpsChar,
    SpsDeserialize, SpsEmpty, SpsError, SpsExpected, SpsInputBuffer, SpsMap, SpsOutputBuffer,
    SpsSequence, SpsSerialize, SpsString, SpsTargetAddress, SpsTuple,
};

fn encode<Tag, T: SpsSerialize<Tag> + ?Sized>(value: &T) -> Vec<u8> {
    let size = value.sps_size();
    let mut out = vec![0xAAu8; size];
    let mut ob = SpsOutputBuffer::new(&mut out);
    value.sps_serialize(&mut ob).unwrap();
    assert_eq!(ob.remaining(), 0, "sps_size() disagrees with bytes written");
    out
}

fn decode_all<'de, Tag, T: SpsDeserialize<'de, Tag>>(data: &'de [u8]) -> Result<T, CodecError> {
    let mut ib = SpsInputBuffer::new(data);
    let value = T::sps_deserialize(&mut ib)?;
    assert!(ib.is_empty(), "decode left {} bytes", ib.remaining());
    Ok(value)
}

fn assert_every_truncation_fails<Tag, T>(data: &[u8])
where
    T: for<'de> SpsDeserialize<'de, Tag>,
{
    for cut in 0..data.len() {
        let mut ib = SpsInputBuffer::new(&data[..cut]);
        assert!(
            T::sps_deserialize(&mut ib).is_err(),
            "decode of {cut}/{} bytes succeeded",
            data.len()
        );
    }
}

#[test]
fn primitive_widths_and_byte_order() {
    assert_eq!(encode::<u8, _>(&0xABu8), [0xAB]);
    assert_eq!(encode::<i16, _>(&-2i16), [0xFE, 0xFF]);
    assert_eq!(encode::<u32, _>(&0x0102_0304u32), [4, 3, 2, 1]);
    assert_eq!(encode::<i64, _>(&-1i64), [0xFF; 8]);
    assert_eq!(encode::<bool, _>(&true), [1]);
    assert_eq!(encode::<SpsChar, _>(&b'z'), [b'z']);
    assert!(encode::<SpsEmpty, _>(&SpsEmpty).is_empty());
}

#[test]
fn address_is_a_u64() {
    let addr = ExecutorAddr::new(0x1122_3344_5566_7788);
    let bytes = encode::<SpsTargetAddress, _>(&addr);
    assert_eq!(bytes, encode::<u64, _>(&0x1122_3344_5566_7788u64));
    let decoded: ExecutorAddr = decode_all::<SpsTargetAddress, _>(&bytes).unwrap();
    assert_eq!(decoded, addr);
}

#[test]
fn string_is_length_then_raw_bytes() {
    let bytes = encode::<SpsString, _>("hello");
    assert_eq!(bytes.len(), 13);
    assert_eq!(&bytes[..8], &5u64.to_le_bytes());
    assert_eq!(&bytes[8..], b"hello");
    assert_every_truncation_fails::<SpsString, String>(&bytes);
}

#[test]
fn nested_structures_round_trip() {
    type Tag = SpsTuple<(SpsSequence<SpsTuple<(u8, SpsString)>>, SpsMap<SpsString, i32>, bool)>;

    let mut map = BTreeMap::new();
    map.insert("neg".to_string(), -5i32);
    map.insert("pos".to_string(), 5i32);
    let value = (
        vec![(1u8, "one".to_string()), (2u8, "two".to_string())],
        map,
        false,
    );

    let bytes = encode::<Tag, _>(&value);
    let decoded: (Vec<(u8, String)>, BTreeMap<String, i32>, bool) =
        decode_all::<Tag, _>(&bytes).unwrap();
    assert_eq!(decoded, value);
    assert_every_truncation_fails::<Tag, (Vec<(u8, String)>, BTreeMap<String, i32>, bool)>(&bytes);
}

#[test]
fn argument_list_matches_tuple_encoding() {
    type Tags = (u16, SpsString, SpsSequence<u64>);
    let args = (9u16, "x", vec![1u64, 2, 3]);
    let buffer = SpsArgList::<Tags>::to_result_buffer(&args).unwrap();
    assert_eq!(buffer.data(), encode::<SpsTuple<Tags>, _>(&args).as_slice());
}

#[test]
fn error_and_expected_round_trip() {
    let failure = SerializableError::Failure("boom".into());
    let bytes = encode::<SpsError, _>(&failure);
    assert_eq!(bytes.len(), 13);
    let decoded: SerializableError = decode_all::<SpsError, _>(&bytes).unwrap();
    assert_eq!(decoded, failure);
    assert_every_truncation_fails::<SpsError, SerializableError>(&bytes);

    type Tag = SpsExpected<SpsSequence<u8>>;
    let value = SerializableExpected::Value(vec![1u8, 2, 3]);
    let bytes = encode::<Tag, _>(&value);
    let decoded: SerializableExpected<Vec<u8>> = decode_all::<Tag, _>(&bytes).unwrap();
    assert_eq!(decoded, value);
    assert_every_truncation_fails::<Tag, SerializableExpected<Vec<u8>>>(&bytes);
}

#[test]
fn undersized_output_fails_cleanly() {
    let value = (1u32, "abcdef");
    type Tag = SpsTuple<(u32, SpsString)>;
    let size = SpsSerialize::<Tag>::sps_size(&value);
    for short in 0..size {
        let mut out = vec![0u8; short];
        let mut ob = SpsOutputBuffer::new(&mut out);
        assert!(matches!(
            SpsSerialize::<Tag>::sps_serialize(&value, &mut ob),
            Err(CodecError::BufferOverflow { .. })
        ));
    }
}

#[test]
fn same_bytes_decode_under_multiple_shapes() {
    let bytes = encode::<SpsString, _>("abc");
    let owned: String = decode_all::<SpsString, _>(&bytes).unwrap();
    let view: &str = decode_all::<SpsString, _>(&bytes).unwrap();
    let raw: Vec<u8> = decode_all::<SpsSequence<SpsChar>, _>(&bytes).unwrap();
    assert_eq!(owned, "abc");
    assert_eq!(view, "abc");
    assert_eq!(raw, b"abc");
}

#[test]
fn truncated_fixed_width_values_fail() {
    assert_every_truncation_fails::<bool, bool>(&encode::<bool, _>(&true));
    assert_every_truncation_fails::<SpsChar, u8>(&encode::<SpsChar, _>(&b'q'));
    assert_every_truncation_fails::<i8, i8>(&encode::<i8, _>(&-7i8));
    assert_every_truncation_fails::<u16, u16>(&encode::<u16, _>(&0xBEEFu16));
    assert_every_truncation_fails::<i32, i32>(&encode::<i32, _>(&i32::MIN));
    assert_every_truncation_fails::<u64, u64>(&encode::<u64, _>(&u64::MAX));
    assert_every_truncation_fails::<i64, i64>(&encode::<i64, _>(&-2i64));

    let addr = ExecutorAddr::new(0x7f00_1234_5678);
    let bytes = encode::<SpsTargetAddress, _>(&addr);
    assert_eq!(bytes, 0x7f00_1234_5678u64.to_le_bytes());
    assert_every_truncation_fails::<SpsTargetAddress, ExecutorAddr>(&bytes);
    assert_every_truncation_fails::<SpsTargetAddress, u64>(&bytes);

    type Pair = SpsTuple<(u16, SpsTargetAddress)>;
    assert_every_truncation_fails::<Pair, (u16, u64)>(&encode::<Pair, _>(&(1u16, 2u64)));
}

#[test]
fn truncated_maps_and_sequences_fail() {
    let mut map = BTreeMap::new();
    map.insert(3u32, "three".to_string());
    map.insert(4u32, String::new());
    let bytes = encode::<SpsMap<u32, SpsString>, _>(&map);
    let decoded: BTreeMap<u32, String> = decode_all::<SpsMap<u32, SpsString>, _>(&bytes).unwrap();
    assert_eq!(decoded, map);
    assert_every_truncation_fails::<SpsMap<u32, SpsString>, BTreeMap<u32, String>>(&bytes);
    assert_every_truncation_fails::<SpsMap<u32, SpsString>, std::collections::HashMap<u32, String>>(
        &bytes,
    );

    let bytes = encode::<SpsSequence<u32>, _>(&vec![1u32, 2, 3]);
    assert_every_truncation_fails::<SpsSequence<u32>, Vec<u32>>(&bytes);

    let bytes = encode::<SpsSequence<SpsEmpty>, _>(&vec![SpsEmpty; 2]);
    assert_every_truncation_fails::<SpsSequence<SpsEmpty>, Vec<SpsEmpty>>(&bytes);
}
