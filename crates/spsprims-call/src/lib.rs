//! Wrapper function calls across an opaque dispatch boundary.
//!
//! The caller side ([`WrapperFunction::call`]) encodes its arguments, hands
//! the bytes to a dispatch primitive and decodes the returned payload. The
//! callee side ([`WrapperFunction::handle`]) decodes arguments, runs a
//! native handler and encodes its return value. Both sides agree on a wire
//! signature: a return tag plus a tuple of argument tags.
//!
//! Failures that prevent a call from completing travel as out-of-band
//! errors in the [`WrapperFunctionResult`]; application-level failures are
//! ordinary `SpsError` / `SpsExpected` payloads.
//!
//! [`WrapperFunctionResult`]: spsprims_result::WrapperFunctionResult

pub mod dispatch;
pub mod error;
pub mod handler;
pub mod registry;
pub mod returns;
pub mod wrapper;

pub use dispatch::{configure_dispatch, jit_dispatch, Dispatch, DispatchFn, JitDispatch};
pub use error::{CallError, Result};
pub use handler::{BoundMethod, WrapperHandler};
pub use registry::{registry_dispatch, WrapperFunctionRegistry};
pub use returns::{FromSpsReturn, IntoSpsReturn};
pub use wrapper::{
    WrapperFunction, ARGUMENT_DESERIALIZATION_FAILED, RETURN_SERIALIZATION_FAILED,
};
