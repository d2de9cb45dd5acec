use std::marker::PhantomData;

use spsprims_result::WrapperFunctionResult;

use crate::buffer::{SpsInputBuffer, SpsOutputBuffer};
use crate::error::Result;
use crate::tags::SpsTuple;
use crate::traits::{SpsDeserialize, SpsSerialize};

/// Positional argument list for the tag list `Tags`, e.g. `(u32, SpsString)`.
///
/// Values are passed as a native tuple of equal arity, matched to the tags
/// by position. An argument list is encoded exactly like an
/// `SpsTuple<Tags>`. Every operation runs left to right and stops at the
/// first failing member.
pub struct SpsArgList<Tags>(PhantomData<fn() -> Tags>);

impl<Tags> SpsArgList<Tags> {
    /// Total encoded size of `args`.
    pub fn size<A>(args: &A) -> usize
    where
        A: SpsSerialize<SpsTuple<Tags>> + ?Sized,
    {
        args.sps_size()
    }

    /// Serialize `args` into `ob`.
    ///
    /// Cannot fail for a buffer sized by [`size`](Self::size) on the same
    /// values.
    pub fn serialize<A>(ob: &mut SpsOutputBuffer<'_>, args: &A) -> Result<()>
    where
        A: SpsSerialize<SpsTuple<Tags>> + ?Sized,
    {
        args.sps_serialize(ob)
    }

    /// Deserialize the argument values from `ib`.
    ///
    /// Fails on truncated or malformed input. Nothing is returned on failure,
    /// so a partially decoded list can never be observed.
    pub fn deserialize<'de, A>(ib: &mut SpsInputBuffer<'de>) -> Result<A>
    where
        A: SpsDeserialize<'de, SpsTuple<Tags>>,
    {
        A::sps_deserialize(ib)
    }

    /// Serialize `args` into a freshly allocated result of exactly the right
    /// size.
    pub fn to_result_buffer<A>(args: &A) -> Result<WrapperFunctionResult>
    where
        A: SpsSerialize<SpsTuple<Tags>> + ?Sized,
    {
        let mut result = WrapperFunctionResult::new();
        let mut ob = SpsOutputBuffer::new(result.allocate(Self::size(args)));
        Self::serialize(&mut ob, args)?;
        debug_assert_eq!(ob.remaining(), 0, "size() and serialize() disagree");
        Ok(result)
    }

    /// Deserialize the argument values from a raw byte range.
    pub fn from_buffer<'de, A>(data: &'de [u8]) -> Result<A>
    where
        A: SpsDeserialize<'de, SpsTuple<Tags>>,
    {
        Self::deserialize(&mut SpsInputBuffer::new(data))
    }
}
