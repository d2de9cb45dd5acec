use std::ffi::c_void;
use std::fmt;

use crate::buffer::{SpsInputBuffer, SpsOutputBuffer};
use crate::error::Result;
use crate::tags::SpsTargetAddress;
use crate::traits::{SpsDeserialize, SpsSerialize};

/// An address in the executor process.
///
/// Used both as the opaque target identifier of a wrapper function call and
/// as a value under the [`SpsTargetAddress`] tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExecutorAddr(u64);

impl ExecutorAddr {
    /// Wrap a raw address value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw address value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// True for the null address.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Address of a pointer in this process.
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize as u64)
    }

    /// This address as an opaque pointer in this process.
    pub fn to_ptr(self) -> *const c_void {
        self.0 as usize as *const c_void
    }
}

impl From<u64> for ExecutorAddr {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ExecutorAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl SpsSerialize<SpsTargetAddress> for ExecutorAddr {
    fn sps_size(&self) -> usize {
        <u64 as SpsSerialize<u64>>::sps_size(&self.0)
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        <u64 as SpsSerialize<u64>>::sps_serialize(&self.0, ob)
    }
}

impl<'de> SpsDeserialize<'de, SpsTargetAddress> for ExecutorAddr {
    fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
        <u64 as SpsDeserialize<u64>>::sps_deserialize(ib).map(Self)
    }
}

impl SpsSerialize<SpsTargetAddress> for u64 {
    fn sps_size(&self) -> usize {
        <u64 as SpsSerialize<u64>>::sps_size(self)
    }

    fn sps_serialize(&self, ob: &mut SpsOutputBuffer<'_>) -> Result<()> {
        <u64 as SpsSerialize<u64>>::sps_serialize(self, ob)
    }
}

impl<'de> SpsDeserialize<'de, SpsTargetAddress> for u64 {
    fn sps_deserialize(ib: &mut SpsInputBuffer<'de>) -> Result<Self> {
        <u64 as SpsDeserialize<u64>>::sps_deserialize(ib)
    }
}
