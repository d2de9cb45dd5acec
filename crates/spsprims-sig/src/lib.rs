//! Runtime SPS signatures.
//!
//! Where `spsprims-codec` selects encoding rules at compile time, this
//! crate selects them from a parsed [`WireShape`] such as
//! `map<string,seq<u32>>`, converting between JSON values and wire bytes.
//! The bytes are identical to those produced by the static rules.

mod codec;
pub mod config;
pub mod error;
mod parse;
pub mod shape;
pub mod signature;
pub mod value;

pub use config::SigConfig;
pub use error::{Result, SigError};
pub use shape::WireShape;
pub use signature::Signature;
pub use value::{Dynamic, SpsValue};
