use std::fmt;

/// The runtime counterpart of a wire tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireShape {
    Bool,
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    Address,
    String,
    Empty,
    Error,
    Sequence(Box<WireShape>),
    Map(Box<WireShape>, Box<WireShape>),
    Tuple(Vec<WireShape>),
    Expected(Box<WireShape>),
}

impl WireShape {
    /// Nesting depth; primitives have depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Sequence(inner) | Self::Expected(inner) => 1 + inner.depth(),
            Self::Map(key, value) => 1 + key.depth().max(value.depth()),
            Self::Tuple(members) => 1 + members.iter().map(Self::depth).max().unwrap_or(0),
            _ => 1,
        }
    }

    /// Encoded size if it does not depend on the value.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::Char | Self::I8 | Self::U8 => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 => Some(4),
            Self::I64 | Self::U64 | Self::Address => Some(8),
            Self::Empty => Some(0),
            Self::Tuple(members) => members.iter().map(Self::fixed_size).sum(),
            _ => None,
        }
    }
}

impl fmt::Display for WireShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Char => f.write_str("char"),
            Self::I8 => f.write_str("i8"),
            Self::U8 => f.write_str("u8"),
            Self::I16 => f.write_str("i16"),
            Self::U16 => f.write_str("u16"),
            Self::I32 => f.write_str("i32"),
            Self::U32 => f.write_str("u32"),
            Self::I64 => f.write_str("i64"),
            Self::U64 => f.write_str("u64"),
            Self::Address => f.write_str("addr"),
            Self::String => f.write_str("string"),
            Self::Empty => f.write_str("empty"),
            Self::Error => f.write_str("error"),
            Self::Sequence(inner) => write!(f, "seq<{inner}>"),
            Self::Map(key, value) => write!(f, "map<{key},{value}>"),
            Self::Tuple(members) => {
                f.write_str("tuple<")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str(">")
            }
            Self::Expected(inner) => write!(f, "expected<{inner}>"),
        }
    }
}
