//! Simple Packed Serialization and wrapper function calls.
//!
//! spsprims encodes values into flat little-endian byte buffers, selected by
//! type-level wire tags, and uses that encoding to call functions across an
//! opaque dispatch boundary such as a JIT-compiled process.
//!
//! # Crate Structure
//!
//! - [`result`]: owning result buffers with an out-of-band error channel
//! - [`codec`]: wire tags and their encoding rules
//! - [`call`]: caller and callee halves of a wrapper function call (behind `call` feature)
//! - [`sig`]: runtime signatures over JSON values (behind `sig` feature)
//!
//! ```
//! use spsprims::codec::{SpsArgList, SpsString};
//!
//! let buffer = SpsArgList::<(SpsString, u32)>::to_result_buffer(&("hi", 7u32)).unwrap();
//! assert_eq!(buffer.data(), &[2, 0, 0, 0, 0, 0, 0, 0, b'h', b'i', 7, 0, 0, 0]);
//! ```

/// Re-export result container types.
pub mod result {
    pub use spsprims_result::*;
}

/// Re-export codec types.
pub mod codec {
    pub use spsprims_codec::*;
}

/// Re-export call types (requires `call` feature).
#[cfg(feature = "call")]
pub mod call {
    pub use spsprims_call::*;
}

/// Re-export runtime signature types (requires `sig` feature).
#[cfg(feature = "sig")]
pub mod sig {
    pub use spsprims_sig::*;
}
