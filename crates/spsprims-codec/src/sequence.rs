//! Sequence rules and the containers that use them: vectors, deques,
//! slices, strings and maps.
//!
//! Wire format: a `u64` element count, then each element with no padding.
//! Strings are sequences of one-byte chars with no terminator; maps are
//! sequences of key/value tuples.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};

use crate::buffer::{SpsInputBuffer, SpsOutputBuffer};
use crate::error::{CodecError, Result};
use crate::tags::{SpsMap, SpsSequence, SpsString, SpsTuple};
use crate::traits::{SequenceBuilder, SpsDeserialize, SpsSerialize};

/// Size of the element-count prefix.
pub const SEQUENCE_LENGTH_SIZE: usize = 8;

/// Most elements a decoded sequence may hold when its elements occupy no
/// input bytes.
pub const MAX_ZERO_WIDTH_ELEMENTS: usize = 1 << 20;

/// Encoded size of a sequence of `elements` under element tag `E`.
///
/// Together with [`serialize_sequence`] this is all a container needs to
/// implement [`SpsSerialize`] for an [`SpsSequence`] tag.
pub fn sequence_size<E, I>(elements: I) -> usize
where
    I: IntoIterator,
    I::Item: SpsSerialize<E>,
{
    SEQUENCE_LENGTH_SIZE
        + elements
            .into_iter()
            .map(|element| <I::Item as SpsSerialize<E>>::sps_size(&element))
            .sum::<usize>()
}

/// Write the element count, then each element in iteration order.
pub fn serialize_sequence<E, I>(ob: &mut SpsOutputBuffer<'_>, elements: I) -> Result<()>
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
    I::Item: SpsSerialize<E>,
{
    let elements = elements.into_iter();
    write_length(ob, elements.len())?;
    for element in elements {
        <I::Item as SpsSerialize<E>>::sps_serialize(&element, ob)?;
    }
    Ok(())
}

fn write_length(ob: &mut SpsOutputBuffer<'_>, len: usize) -> Result<()> {
    <u64 as SpsSerialize<u64>>::sps_serialize(&(len as u64), ob)
}

fn read_length(ib: &mut SpsInputBuffer<'_>) -> Result<usize> {
    let len = <u64 as SpsDeserialize<u64>>::sps_deserialize(ib)?;
    usize::try_from(len).map_err(|_| CodecError::LengthOverflow(len))
}

impl<'de, E, C> SpsDeserialize<'de, SpsSequence<E>> for C
where
    C: SequenceBuilder<'de, E>,
{
    fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
        let len = read_length(ib)?;
        let mut container = C::default();
        // Never trust the prefix for allocation.
        <C as SequenceBuilder<'de, E>>::reserve(&mut container, len.min(ib.remaining()));
        for _ in 0..len {
            let before = ib.remaining();
            let element = <C::Element as SpsDeserialize<'de, E>>::sps_deserialize(ib)?;
            // Zero-width elements leave the prefix as the only bound on the loop.
            if ib.remaining() == before && len > MAX_ZERO_WIDTH_ELEMENTS {
                return Err(CodecError::ZeroWidthOverflow(len as u64));
            }
            container.append(element)?;
        }
        Ok(container)
    }
}

impl<E, T: SpsSerialize<E>> SpsSerialize<SpsSequence<E>> for [T] {
    fn sps_size(&self) -> usize {
        sequence_size::<E, _>(self.iter())
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        serialize_sequence::<E, _>(ob, self.iter())
    }
}

impl<E, T: SpsSerialize<E>, const N: usize> SpsSerialize<SpsSequence<E>> for [T; N] {
    fn sps_size(&self) -> usize {
        sequence_size::<E, _>(self.iter())
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        serialize_sequence::<E, _>(ob, self.iter())
    }
}

impl<E, T: SpsSerialize<E>> SpsSerialize<SpsSequence<E>> for Vec<T> {
    fn sps_size(&self) -> usize {
        sequence_size::<E, _>(self.iter())
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        serialize_sequence::<E, _>(ob, self.iter())
    }
}

impl<E, T: SpsSerialize<E>> SpsSerialize<SpsSequence<E>> for VecDeque<T> {
    fn sps_size(&self) -> usize {
        sequence_size::<E, _>(self.iter())
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        serialize_sequence::<E, _>(ob, self.iter())
    }
}

impl<'de, E, T: SpsDeserialize<'de, E>> SequenceBuilder<'de, E> for Vec<T> {
    type Element = T;

    fn reserve(&mut self, capacity: usize) {
        Vec::reserve(self, capacity);
    }

    fn append(&mut self, element: T) -> Result<()> {
        self.push(element);
        Ok(())
    }
}

impl<'de, E, T: SpsDeserialize<'de, E>> SequenceBuilder<'de, E> for VecDeque<T> {
    type Element = T;

    fn reserve(&mut self, capacity: usize) {
        VecDeque::reserve(self, capacity);
    }

    fn append(&mut self, element: T) -> Result<()> {
        self.push_back(element);
        Ok(())
    }
}

impl SpsSerialize<SpsString> for str {
    fn sps_size(&self) -> usize {
        SEQUENCE_LENGTH_SIZE + self.len()
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        write_length(ob, self.len())?;
        ob.write(self.as_bytes())
    }
}

impl SpsSerialize<SpsString> for String {
    fn sps_size(&self) -> usize {
        <str as SpsSerialize<SpsString>>::sps_size(self)
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        <str as SpsSerialize<SpsString>>::sps_serialize(self, ob)
    }
}

/// Zero-copy string view: borrows from the input buffer's memory.
impl<'de> SpsDeserialize<'de, SpsString> for &'de str {
    fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
        let len = read_length(ib)?;
        let bytes = ib.take(len)?;
        std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
    }
}

impl<'de> SpsDeserialize<'de, SpsString> for String {
    fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
        <&str as SpsDeserialize<'de, SpsString>>::sps_deserialize(ib).map(str::to_owned)
    }
}

/// Zero-copy byte view over a string's raw bytes (no UTF-8 check).
impl<'de> SpsDeserialize<'de, SpsString> for &'de [u8] {
    fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
        let len = read_length(ib)?;
        ib.take(len)
    }
}

/// Zero-copy view over a byte sequence.
impl<'de> SpsDeserialize<'de, SpsSequence<u8>> for &'de [u8] {
    fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
        let len = read_length(ib)?;
        ib.take(len)
    }
}

impl<KT, VT, K, V> SpsSerialize<SpsMap<KT, VT>> for BTreeMap<K, V>
where
    K: SpsSerialize<KT>,
    V: SpsSerialize<VT>,
{
    fn sps_size(&self) -> usize {
        sequence_size::<SpsTuple<(KT, VT)>, _>(self.iter())
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        serialize_sequence::<SpsTuple<(KT, VT)>, _>(ob, self.iter())
    }
}

impl<KT, VT, K, V, S> SpsSerialize<SpsMap<KT, VT>> for HashMap<K, V, S>
where
    K: SpsSerialize<KT>,
    V: SpsSerialize<VT>,
{
    fn sps_size(&self) -> usize {
        sequence_size::<SpsTuple<(KT, VT)>, _>(self.iter())
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        serialize_sequence::<SpsTuple<(KT, VT)>, _>(ob, self.iter())
    }
}

impl<'de, KT, VT, K, V> SequenceBuilder<'de, SpsTuple<(KT, VT)>> for BTreeMap<K, V>
where
    K: SpsDeserialize<'de, KT> + Ord,
    V: SpsDeserialize<'de, VT>,
{
    type Element = (K, V);

    fn reserve(&mut self, _capacity: usize) {}

    fn append(&mut self, (key, value): (K, V)) -> Result<()> {
        match self.entry(key) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
            std::collections::btree_map::Entry::Occupied(_) => Err(CodecError::DuplicateKey),
        }
    }
}

impl<'de, KT, VT, K, V, S> SequenceBuilder<'de, SpsTuple<(KT, VT)>> for HashMap<K, V, S>
where
    K: SpsDeserialize<'de, KT> + Eq + Hash,
    V: SpsDeserialize<'de, VT>,
    S: BuildHasher + Default,
{
    type Element = (K, V);

    fn reserve(&mut self, capacity: usize) {
        HashMap::reserve(self, capacity);
    }

    fn append(&mut self, (key, value): (K, V)) -> Result<()> {
        match self.entry(key) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
            std::collections::hash_map::Entry::Occupied(_) => Err(CodecError::DuplicateKey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{SpsChar, SpsEmpty};

    fn encode<Tag, T: SpsSerialize<Tag> + ?Sized>(value: &T) -> Vec<u8> {
        let mut out = vec![0u8; value.sps_size()];
        let mut ob = SpsOutputBuffer::new(&mut out);
        value.sps_serialize(&mut ob).unwrap();
        assert_eq!(ob.remaining(), 0);
        out
    }

    fn decode<'de, Tag, T: SpsDeserialize<'de, Tag>>(data: &'de [u8]) -> Result<T> {
        T::sps_deserialize(&mut SpsInputBuffer::new(data))
    }

    #[test]
    fn empty_sequence_is_eight_zero_bytes() {
        let empty: Vec<u32> = Vec::new();
        assert_eq!(encode::<SpsSequence<u32>, _>(&empty), [0u8; 8]);
        assert_eq!(encode::<SpsString, _>(""), [0u8; 8]);
    }

    #[test]
    fn sequence_is_length_then_elements() {
        let values = vec![1u16, 2, 3];
        let bytes = encode::<SpsSequence<u16>, _>(&values);
        assert_eq!(bytes.len(), 8 + 3 * 2);
        assert_eq!(&bytes[..8], &3u64.to_le_bytes());
        assert_eq!(&bytes[8..], &[1, 0, 2, 0, 3, 0]);

        let decoded: Vec<u16> = decode::<SpsSequence<u16>, _>(&bytes).unwrap();
        assert_eq!(decoded, values);
        let deque: VecDeque<u16> = decode::<SpsSequence<u16>, _>(&bytes).unwrap();
        assert_eq!(deque, VecDeque::from(values));
    }

    #[test]
    fn slices_arrays_and_deques_share_encoding() {
        let vec = vec![9u32, 8];
        let expected = encode::<SpsSequence<u32>, _>(&vec);
        assert_eq!(encode::<SpsSequence<u32>, _>(&[9u32, 8]), expected);
        assert_eq!(encode::<SpsSequence<u32>, _>(&vec[..]), expected);
        assert_eq!(
            encode::<SpsSequence<u32>, _>(&VecDeque::from(vec.clone())),
            expected
        );
    }

    #[test]
    fn string_has_no_terminator() {
        let bytes = encode::<SpsString, _>("boom");
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[8..], b"boom");
        let owned: String = decode::<SpsString, _>(&bytes).unwrap();
        assert_eq!(owned, "boom");
    }

    #[test]
    fn char_vectors_share_string_encoding() {
        let chars: Vec<u8> = b"abc".to_vec();
        assert_eq!(
            encode::<SpsString, _>(&chars),
            encode::<SpsString, _>("abc")
        );
        let decoded: Vec<u8> = decode::<SpsSequence<SpsChar>, _>(&encode::<SpsString, _>("abc")).unwrap();
        assert_eq!(decoded, b"abc");
    }

    #[test]
    fn string_view_borrows_input() {
        let bytes = encode::<SpsString, _>("zero-copy");
        let view: &str = decode::<SpsString, _>(&bytes).unwrap();
        assert_eq!(view, "zero-copy");
        assert_eq!(view.as_ptr(), bytes[8..].as_ptr());

        let raw: &[u8] = decode::<SpsString, _>(&bytes).unwrap();
        assert_eq!(raw, b"zero-copy");
    }

    #[test]
    fn byte_sequence_view_borrows_input() {
        let bytes = encode::<SpsSequence<u8>, _>(&vec![1u8, 2, 3]);
        let view: &[u8] = decode::<SpsSequence<u8>, _>(&bytes).unwrap();
        assert_eq!(view, &[1, 2, 3]);
        assert_eq!(view.as_ptr(), bytes[8..].as_ptr());
    }

    #[test]
    fn invalid_utf8_rejected() {
        let mut bytes = 2u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0xc3, 0x28]);
        assert_eq!(
            decode::<SpsString, String>(&bytes),
            Err(CodecError::InvalidUtf8)
        );
    }

    #[test]
    fn oversized_length_prefix_fails_cleanly() {
        let bytes = u64::MAX.to_le_bytes();
        let result: Result<Vec<u32>> = decode::<SpsSequence<u32>, _>(&bytes);
        assert!(result.is_err());
        let result: Result<String> = decode::<SpsString, _>(&bytes);
        assert!(result.is_err());
    }

    #[test]
    fn zero_width_elements_are_bounded_by_count() {
        let bytes = u64::MAX.to_le_bytes();
        let result: Result<Vec<SpsEmpty>> = decode::<SpsSequence<SpsEmpty>, _>(&bytes);
        assert_eq!(result, Err(CodecError::ZeroWidthOverflow(u64::MAX)));
        let result: Result<Vec<()>> = decode::<SpsSequence<SpsTuple<()>>, _>(&bytes);
        assert!(result.is_err());

        let over = ((MAX_ZERO_WIDTH_ELEMENTS + 1) as u64).to_le_bytes();
        let result: Result<Vec<SpsEmpty>> = decode::<SpsSequence<SpsEmpty>, _>(&over);
        assert!(matches!(result, Err(CodecError::ZeroWidthOverflow(_))));

        let three = encode::<SpsSequence<SpsEmpty>, _>(&vec![SpsEmpty; 3]);
        assert_eq!(three, 3u64.to_le_bytes());
        let decoded: Vec<SpsEmpty> = decode::<SpsSequence<SpsEmpty>, _>(&three).unwrap();
        assert_eq!(decoded.len(), 3);
    }

    #[test]
    fn map_round_trip_and_layout() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1u32);
        map.insert("b".to_string(), 2u32);
        let bytes = encode::<SpsMap<SpsString, u32>, _>(&map);
        assert_eq!(bytes.len(), 8 + 2 * (8 + 1 + 4));

        let decoded: BTreeMap<String, u32> = decode::<SpsMap<SpsString, u32>, _>(&bytes).unwrap();
        assert_eq!(decoded, map);
        let hashed: HashMap<String, u32> = decode::<SpsMap<SpsString, u32>, _>(&bytes).unwrap();
        assert_eq!(hashed.len(), 2);
        assert_eq!(hashed["b"], 2);
    }

    #[test]
    fn map_equals_sequence_of_pairs() {
        let mut map = BTreeMap::new();
        map.insert(7u8, true);
        let pairs = vec![(7u8, true)];
        assert_eq!(
            encode::<SpsMap<u8, bool>, _>(&map),
            encode::<SpsSequence<SpsTuple<(u8, bool)>>, _>(&pairs)
        );
    }

    #[test]
    fn map_rejects_duplicate_keys() {
        let pairs = vec![(1u8, 10u8), (1u8, 11u8)];
        let bytes = encode::<SpsMap<u8, u8>, _>(&pairs);
        let result: Result<BTreeMap<u8, u8>> = decode::<SpsMap<u8, u8>, _>(&bytes);
        assert_eq!(result, Err(CodecError::DuplicateKey));
    }

    #[derive(Default, Debug, PartialEq)]
    struct Reversed(Vec<u16>);

    impl<'de> SequenceBuilder<'de, u16> for Reversed {
        type Element = u16;

        fn reserve(&mut self, capacity: usize) {
            self.0.reserve(capacity);
        }

        fn append(&mut self, element: u16) -> Result<()> {
            self.0.insert(0, element);
            Ok(())
        }
    }

    #[test]
    fn custom_container_opts_in_with_reserve_and_append() {
        let bytes = encode::<SpsSequence<u16>, _>(&vec![1u16, 2, 3]);
        let decoded: Reversed = decode::<SpsSequence<u16>, _>(&bytes).unwrap();
        assert_eq!(decoded, Reversed(vec![3, 2, 1]));
    }
}
