use std::fmt;

use bytes::Bytes;
use serde_json::Value;

use crate::config::SigConfig;
use crate::error::Result;
use crate::shape::WireShape;

/// A wrapper function signature: return shape and argument shapes.
///
/// Arguments are encoded like a tuple of the argument shapes, so
/// `encode_args` takes a JSON array with one element per argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    ret: WireShape,
    args: Vec<WireShape>,
}

impl Signature {
    pub fn new(ret: WireShape, args: Vec<WireShape>) -> Self {
        Self { ret, args }
    }

    pub fn ret(&self) -> &WireShape {
        &self.ret
    }

    pub fn args(&self) -> &[WireShape] {
        &self.args
    }

    /// The argument list as a single tuple shape.
    pub fn args_shape(&self) -> WireShape {
        WireShape::Tuple(self.args.clone())
    }

    pub fn encode_args(&self, args: &Value) -> Result<Bytes> {
        self.encode_args_with(args, &SigConfig::default())
    }

    pub fn encode_args_with(&self, args: &Value, config: &SigConfig) -> Result<Bytes> {
        self.args_shape().encode_with(args, config)
    }

    pub fn decode_args(&self, data: &[u8]) -> Result<Value> {
        self.decode_args_with(data, &SigConfig::default())
    }

    pub fn decode_args_with(&self, data: &[u8], config: &SigConfig) -> Result<Value> {
        self.args_shape().decode_with(data, config)
    }

    pub fn encode_return(&self, value: &Value) -> Result<Bytes> {
        self.ret.encode(value)
    }

    pub fn decode_return(&self, data: &[u8]) -> Result<Value> {
        self.ret.decode(data)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.ret)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}
