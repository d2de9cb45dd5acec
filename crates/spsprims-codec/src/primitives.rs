//! Fixed-width rules: integers, `bool`, chars, and the empty placeholder.
//!
//! Integers are written little-endian whatever the host byte order.

use crate::buffer::{SpsInputBuffer, SpsOutputBuffer};
use crate::error::{CodecError, Result};
use crate::tags::{SpsChar, SpsEmpty};
use crate::traits::{SpsDeserialize, SpsSerialize};

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SpsSerialize<$ty> for $ty {
                fn sps_size(&self) -> usize {
                    std::mem::size_of::<$ty>()
                }

                fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
                    ob.write(&self.to_le_bytes())
                }
            }

            impl<'de> SpsDeserialize<'de, $ty> for $ty {
                fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
                    Ok(<$ty>::from_le_bytes(ib.read_array()?))
                }
            }
        )*
    };
}

impl_integer!(u8, i8, u16, i16, u32, i32, u64, i64);

impl SpsSerialize<bool> for bool {
    fn sps_size(&self) -> usize {
        1
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        ob.write(&[u8::from(*self)])
    }
}

impl<'de> SpsDeserialize<'de, bool> for bool {
    fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
        let [byte] = ib.read_array()?;
        match byte {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidBool(other)),
        }
    }
}

macro_rules! impl_char {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SpsSerialize<SpsChar> for $ty {
                fn sps_size(&self) -> usize {
                    1
                }

                fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
                    ob.write(&self.to_le_bytes())
                }
            }

            impl<'de> SpsDeserialize<'de, SpsChar> for $ty {
                fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
                    Ok(<$ty>::from_le_bytes(ib.read_array()?))
                }
            }
        )*
    };
}

impl_char!(u8, i8);

impl SpsSerialize<SpsEmpty> for SpsEmpty {
    fn sps_size(&self) -> usize {
        0
    }

    fn sps_serialize(&self, _ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        Ok(())
    }
}

impl<'de> SpsDeserialize<'de, SpsEmpty> for SpsEmpty {
    fn sps_deserialize(_ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
        Ok(SpsEmpty)
    }
}

impl SpsSerialize<SpsEmpty> for () {
    fn sps_size(&self) -> usize {
        0
    }

    fn sps_serialize(&self, _ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        Ok(())
    }
}

impl<'de> SpsDeserialize<'de, SpsEmpty> for () {
    fn sps_deserialize(_ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<Tag, T: SpsSerialize<Tag>>(value: &T) -> Vec<u8> {
        let mut out = vec![0u8; value.sps_size()];
        let mut ob = SpsOutputBuffer::new(&mut out);
        value.sps_serialize(&mut ob).unwrap();
        assert_eq!(ob.remaining(), 0);
        out
    }

    #[test]
    fn integers_are_little_endian() {
        assert_eq!(encode::<u16, _>(&0x0102u16), [0x02, 0x01]);
        assert_eq!(
            encode::<u32, _>(&0x0102_0304u32),
            [0x04, 0x03, 0x02, 0x01]
        );
        assert_eq!(encode::<i32, _>(&-2i32), [0xfe, 0xff, 0xff, 0xff]);
        assert_eq!(
            encode::<u64, _>(&1u64),
            [1, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(encode::<i8, _>(&-1i8), [0xff]);
    }

    #[test]
    fn integers_decode() {
        let mut ib = SpsInputBuffer::new(&[0x04, 0x03, 0x02, 0x01, 0xff]);
        assert_eq!(
            <u32 as SpsDeserialize<u32>>::sps_deserialize(&mut ib).unwrap(),
            0x0102_0304
        );
        assert_eq!(
            <i8 as SpsDeserialize<i8>>::sps_deserialize(&mut ib).unwrap(),
            -1
        );
        assert!(<u8 as SpsDeserialize<u8>>::sps_deserialize(&mut ib).is_err());
    }

    #[test]
    fn bool_is_one_byte() {
        assert_eq!(encode::<bool, _>(&true), [1]);
        assert_eq!(encode::<bool, _>(&false), [0]);
    }

    #[test]
    fn bool_rejects_other_bytes() {
        let mut ib = SpsInputBuffer::new(&[2]);
        assert_eq!(
            <bool as SpsDeserialize<bool>>::sps_deserialize(&mut ib),
            Err(CodecError::InvalidBool(2))
        );
    }

    #[test]
    fn char_is_one_byte() {
        assert_eq!(encode::<SpsChar, _>(&b'A'), [0x41]);
        assert_eq!(encode::<SpsChar, _>(&-3i8), [0xfd]);
        let mut ib = SpsInputBuffer::new(b"Z");
        assert_eq!(
            <u8 as SpsDeserialize<SpsChar>>::sps_deserialize(&mut ib).unwrap(),
            b'Z'
        );
    }

    #[test]
    fn empty_writes_nothing() {
        assert!(encode::<SpsEmpty, _>(&SpsEmpty).is_empty());
        assert!(encode::<SpsEmpty, _>(&()).is_empty());
        let mut ib = SpsInputBuffer::new(&[]);
        assert_eq!(
            <SpsEmpty as SpsDeserialize<SpsEmpty>>::sps_deserialize(&mut ib).unwrap(),
            SpsEmpty
        );
    }
}
