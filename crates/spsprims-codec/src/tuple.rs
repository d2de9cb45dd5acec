//! Tuple rules: members encoded in declared order with no padding.
//!
//! Implemented for native tuples of arity 0 through 12 under
//! `SpsTuple<(T1, ..., Tn)>`.

use crate::buffer::{SpsInputBuffer, SpsOutputBuffer};
use crate::error::Result;
use crate::tags::SpsTuple;
use crate::traits::{SpsDeserialize, SpsSerialize};

macro_rules! impl_tuple {
    ($($tag:ident $ty:ident $idx:tt),*) => {
        impl<$($tag, $ty: SpsSerialize<$tag>),*> SpsSerialize<SpsTuple<($($tag,)*)>> for ($($ty,)*) {
            fn sps_size(&self) -> usize {
                0 $(+ <$ty as SpsSerialize<$tag>>::sps_size(&self.$idx))*
            }

            #[allow(unused_variables)]
            fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
                $(<$ty as SpsSerialize<$tag>>::sps_serialize(&self.$idx, ob)?;)*
                Ok(())
            }
        }

        impl<'de, $($tag, $ty: SpsDeserialize<'de, $tag>),*> SpsDeserialize<'de, SpsTuple<($($tag,)*)>> for ($($ty,)*) {
            #[allow(unused_variables)]
            fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
                Ok(($(<$ty as SpsDeserialize<'de, $tag>>::sps_deserialize(ib)?,)*))
            }
        }
    };
}

impl_tuple!();
impl_tuple!(T0 A0 0);
impl_tuple!(T0 A0 0, T1 A1 1);
impl_tuple!(T0 A0 0, T1 A1 1, T2 A2 2);
impl_tuple!(T0 A0 0, T1 A1 1, T2 A2 2, T3 A3 3);
impl_tuple!(T0 A0 0, T1 A1 1, T2 A2 2, T3 A3 3, T4 A4 4);
impl_tuple!(T0 A0 0, T1 A1 1, T2 A2 2, T3 A3 3, T4 A4 4, T5 A5 5);
impl_tuple!(T0 A0 0, T1 A1 1, T2 A2 2, T3 A3 3, T4 A4 4, T5 A5 5, T6 A6 6);
impl_tuple!(T0 A0 0, T1 A1 1, T2 A2 2, T3 A3 3, T4 A4 4, T5 A5 5, T6 A6 6, T7 A7 7);
impl_tuple!(T0 A0 0, T1 A1 1, T2 A2 2, T3 A3 3, T4 A4 4, T5 A5 5, T6 A6 6, T7 A7 7, T8 A8 8);
impl_tuple!(T0 A0 0, T1 A1 1, T2 A2 2, T3 A3 3, T4 A4 4, T5 A5 5, T6 A6 6, T7 A7 7, T8 A8 8, T9 A9 9);
impl_tuple!(T0 A0 0, T1 A1 1, T2 A2 2, T3 A3 3, T4 A4 4, T5 A5 5, T6 A6 6, T7 A7 7, T8 A8 8, T9 A9 9, T10 A10 10);
impl_tuple!(T0 A0 0, T1 A1 1, T2 A2 2, T3 A3 3, T4 A4 4, T5 A5 5, T6 A6 6, T7 A7 7, T8 A8 8, T9 A9 9, T10 A10 10, T11 A11 11);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::SpsString;

    #[test]
    fn members_are_concatenated() {
        let value = (1u8, 0x0203u16, "hi");
        type Tag = SpsTuple<(u8, u16, SpsString)>;
        let size = <(u8, u16, &str) as SpsSerialize<Tag>>::sps_size(&value);
        assert_eq!(size, 1 + 2 + 8 + 2);

        let mut out = vec![0u8; size];
        let mut ob = SpsOutputBuffer::new(&mut out);
        <(u8, u16, &str) as SpsSerialize<Tag>>::sps_serialize(&value, &mut ob).unwrap();
        assert_eq!(out[0], 1);
        assert_eq!(&out[1..3], &[0x03, 0x02]);
        assert_eq!(&out[11..], b"hi");

        let mut ib = SpsInputBuffer::new(&out);
        let decoded = <(u8, u16, String) as SpsDeserialize<Tag>>::sps_deserialize(&mut ib).unwrap();
        assert_eq!(decoded, (1, 0x0203, "hi".to_string()));
        assert!(ib.is_empty());
    }

    #[test]
    fn unit_tuple_is_empty() {
        assert_eq!(<() as SpsSerialize<SpsTuple<()>>>::sps_size(&()), 0);
        let mut ib = SpsInputBuffer::new(&[]);
        <() as SpsDeserialize<SpsTuple<()>>>::sps_deserialize(&mut ib).unwrap();
    }

    #[test]
    fn short_circuits_on_first_failure() {
        let mut ib = SpsInputBuffer::new(&[5, 1]);
        let result = <(u8, u32) as SpsDeserialize<SpsTuple<(u8, u32)>>>::sps_deserialize(&mut ib);
        assert!(result.is_err());
        assert_eq!(ib.remaining(), 1);
    }
}
