//! Wrapper function result buffers.
//!
//! This is the lowest layer of spsprims. A wrapper function result is a
//! byte buffer that crosses the controller/executor boundary by ownership
//! transfer. It is in exactly one of three states:
//! - empty (a default-constructed result, or a zero-byte payload)
//! - data-bearing (owns a byte range)
//! - out-of-band error (owns a message; the call could not complete)
//!
//! [`CWrapperFunctionResult`] is the `#[repr(C)]` value that is passed
//! across the boundary. [`WrapperFunctionResult`] wraps it with move-only,
//! auto-releasing ownership.

pub mod c_api;
pub mod result;

pub use c_api::CWrapperFunctionResult;
pub use result::{ResultState, WrapperFunctionResult};
