use crate::buffer::{SpsInputBuffer, SpsOutputBuffer};
use crate::error::Result;

/// Encoding rule for a native value under wire tag `Tag`.
///
/// Contract: [`sps_serialize`](Self::sps_serialize) into a buffer of exactly
/// [`sps_size`](Self::sps_size) bytes always succeeds and fills it.
pub trait SpsSerialize<Tag: ?Sized> {
    /// Exact number of bytes `sps_serialize` writes.
    fn sps_size(&self) -> usize;

    /// Write the encoding of `self`.
    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()>;
}

/// Decoding rule for a native value under wire tag `Tag`.
///
/// `'de` is the lifetime of the input; borrowing views (such as `&'de str`)
/// point straight into it.
pub trait SpsDeserialize<'de, Tag: ?Sized>: Sized {
    /// Read one value, consuming exactly its encoding.
    fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self>;
}

/// Opt-in for decoding an ordered container from an [`SpsSequence`].
///
/// Implementing `reserve` and `append` is enough: the sequence rule reads the
/// length, prepares a fresh container with `Default`, reserves and appends
/// each decoded element in order.
///
/// [`SpsSequence`]: crate::SpsSequence
pub trait SequenceBuilder<'de, ElemTag>: Default {
    /// The decoded element type.
    type Element: SpsDeserialize<'de, ElemTag>;

    /// Reserve room for `capacity` elements.
    fn reserve(&mut self, capacity: usize);

    /// Append one element. Fails for containers that reject the element.
    fn append(&mut self, element: Self::Element) -> Result<()>;
}

impl<Tag: ?Sized, T: SpsSerialize<Tag> + ?Sized> SpsSerialize<Tag> for &T {
    fn sps_size(&self) -> usize {
        <T as SpsSerialize<Tag>>::sps_size(self)
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        <T as SpsSerialize<Tag>>::sps_serialize(self, ob)
    }
}

impl<Tag: ?Sized, T: SpsSerialize<Tag> + ?Sized> SpsSerialize<Tag> for Box<T> {
    fn sps_size(&self) -> usize {
        <T as SpsSerialize<Tag>>::sps_size(self)
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        <T as SpsSerialize<Tag>>::sps_serialize(self, ob)
    }
}
