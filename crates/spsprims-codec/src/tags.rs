//! Wire tags.
//!
//! Tags carry no runtime state; they only select an encoding rule. The
//! integer types and `bool` act as their own tags. None of the marker types
//! below can be constructed except [`SpsEmpty`], which doubles as the native
//! "no value" placeholder.

use std::marker::PhantomData;

/// One-byte character. Native shapes: `u8`, `i8`.
#[derive(Debug)]
pub enum SpsChar {}

/// Executor address, encoded exactly like a `u64`.
#[derive(Debug)]
pub enum SpsTargetAddress {}

/// Fallible result with no value: a `bool` "has error" flag, then the
/// message as an [`SpsString`] if set.
#[derive(Debug)]
pub enum SpsError {}

/// Members encoded back to back in declared order, e.g.
/// `SpsTuple<(u32, SpsString)>`.
pub struct SpsTuple<T>(PhantomData<fn() -> T>);

/// A `u64` element count followed by each element.
pub struct SpsSequence<E>(PhantomData<fn() -> E>);

/// Fallible result with a value: a `bool` "has value" flag, then either the
/// value or the error message.
pub struct SpsExpected<T>(PhantomData<fn() -> T>);

/// Length-prefixed raw bytes, no terminator.
pub type SpsString = SpsSequence<SpsChar>;

/// A sequence of key/value tuples.
pub type SpsMap<K, V> = SpsSequence<SpsTuple<(K, V)>>;

/// Zero-length placeholder for "no return value".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SpsEmpty;
