//! Bounds-checked, forward-only cursors over borrowed byte ranges.
//!
//! Neither buffer owns its memory. A failed access leaves the cursor where
//! it was.

use bytes::{Buf, BufMut};

use crate::error::{CodecError, Result};

/// Output cursor with overflow check.
#[derive(Debug)]
pub struct SpsOutputBuffer<'a> {
    buf: &'a mut [u8],
}

impl<'a> SpsOutputBuffer<'a> {
    /// Wrap `buf`; writes start at its first byte.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf }
    }

    /// Copy `data` and advance, or fail without writing anything.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        let remaining = self.buf.remaining_mut();
        if data.len() > remaining {
            return Err(CodecError::BufferOverflow {
                needed: data.len(),
                remaining,
            });
        }
        self.buf.put_slice(data);
        Ok(())
    }

    /// Bytes still available for writing.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }
}

/// Input cursor with underflow check.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpsInputBuffer<'de> {
    buf: &'de [u8],
}

impl<'de> SpsInputBuffer<'de> {
    /// Wrap `buf`; reads start at its first byte.
    pub fn new(buf: &'de [u8]) -> Self {
        Self { buf }
    }

    /// Fill `dest` and advance, or fail without consuming anything.
    pub fn read(&mut self, dest: &mut [u8]) -> Result<()> {
        self.check(dest.len())?;
        self.buf.copy_to_slice(dest);
        Ok(())
    }

    /// Read exactly `N` bytes.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        self.read(&mut out)?;
        Ok(out)
    }

    /// The unread tail of the input.
    pub fn data(&self) -> &'de [u8] {
        self.buf
    }

    /// Advance past `n` bytes without copying them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.check(n)?;
        self.buf.advance(n);
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them.
    ///
    /// The returned slice points into the original input and lives as long
    /// as it does.
    pub fn take(&mut self, n: usize) -> Result<&'de [u8]> {
        let head = self.data().get(..n).ok_or(CodecError::UnexpectedEof {
            needed: n,
            remaining: self.buf.len(),
        })?;
        self.skip(n)?;
        Ok(head)
    }

    /// Bytes still available for reading.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// True once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn check(&self, needed: usize) -> Result<()> {
        if needed > self.buf.len() {
            return Err(CodecError::UnexpectedEof {
                needed,
                remaining: self.buf.len(),
            });
        }
        Ok(())
    }
}
