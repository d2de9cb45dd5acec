/// Limits applied when parsing signatures and decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigConfig {
    /// Maximum nesting depth of a shape.
    pub max_depth: usize,
    /// Maximum element count of any one sequence, map or string.
    pub max_sequence_len: usize,
}

impl Default for SigConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_sequence_len: 1 << 20,
        }
    }
}
