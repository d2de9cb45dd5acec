use std::borrow::Cow;
use std::ffi::CStr;
use std::fmt;

use bytes::Bytes;

use crate::c_api::CWrapperFunctionResult;

/// Owning wrapper function result.
///
/// Same as [`CWrapperFunctionResult`] but move-only and auto-releasing:
/// storage is disposed exactly once when the value is dropped. Use
/// [`release`](Self::release) to hand the raw value across the boundary.
pub struct WrapperFunctionResult {
    raw: CWrapperFunctionResult,
}

/// Borrowed view of a result's tri-state contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultState<'a> {
    /// No payload and no error.
    Empty,
    /// Payload bytes.
    Data(&'a [u8]),
    /// The call could not complete.
    OutOfBandError(Cow<'a, str>),
}

// SAFETY: the result exclusively owns its heap storage; no aliasing pointers
// are retained anywhere else once it is constructed.
unsafe impl Send for WrapperFunctionResult {}

impl WrapperFunctionResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self {
            raw: CWrapperFunctionResult::new(),
        }
    }

    /// Take ownership of a raw result. It will be disposed when the returned
    /// value is dropped.
    pub fn from_c(raw: CWrapperFunctionResult) -> Self {
        Self { raw }
    }

    /// Relinquish ownership of the raw result, leaving `self` empty.
    pub fn release(&mut self) -> CWrapperFunctionResult {
        std::mem::take(&mut self.raw)
    }

    /// Consume the wrapper and return the raw result without disposing it.
    pub fn into_c(mut self) -> CWrapperFunctionResult {
        self.release()
    }

    /// Replace the contents with `size` zeroed bytes and return them for
    /// writing.
    pub fn allocate(&mut self, size: usize) -> &mut [u8] {
        let ptr = self.raw.allocate(size);
        if ptr.is_null() {
            return &mut [];
        }
        // SAFETY: `allocate` just produced `size` bytes owned by `self.raw`;
        // the mutable borrow is tied to `self`.
        unsafe { std::slice::from_raw_parts_mut(ptr, size) }
    }

    /// Copy `source` into a new data-bearing result.
    pub fn copy_from(source: &[u8]) -> Self {
        Self::from_c(CWrapperFunctionResult::from_range(source))
    }

    /// Copy a C string, including its NUL terminator.
    pub fn copy_from_c_str(source: &CStr) -> Self {
        Self::from_c(CWrapperFunctionResult::from_string(source))
    }

    /// Create an out-of-band error result.
    pub fn create_out_of_band_error(message: impl AsRef<str>) -> Self {
        Self::from_c(CWrapperFunctionResult::from_out_of_band_error(
            message.as_ref(),
        ))
    }

    /// Payload bytes.
    pub fn data(&self) -> &[u8] {
        self.raw.data()
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.raw.size()
    }

    /// True if this result is equivalent to a default-constructed one.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The out-of-band error message, if any.
    pub fn out_of_band_error(&self) -> Option<Cow<'_, str>> {
        self.raw.out_of_band_error().map(CStr::to_string_lossy)
    }

    /// True if this result carries an out-of-band error.
    pub fn is_out_of_band_error(&self) -> bool {
        self.raw.out_of_band_error().is_some()
    }

    /// Inspect the result's state. An out-of-band error takes precedence.
    pub fn state(&self) -> ResultState<'_> {
        if let Some(message) = self.out_of_band_error() {
            return ResultState::OutOfBandError(message);
        }
        if self.raw.size() == 0 {
            return ResultState::Empty;
        }
        ResultState::Data(self.raw.data())
    }

    /// Copy the payload into a reference-counted buffer.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.data())
    }
}

impl Default for WrapperFunctionResult {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WrapperFunctionResult {
    fn drop(&mut self) {
        self.raw.dispose();
    }
}

impl From<CWrapperFunctionResult> for WrapperFunctionResult {
    fn from(raw: CWrapperFunctionResult) -> Self {
        Self::from_c(raw)
    }
}

impl fmt::Debug for WrapperFunctionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("WrapperFunctionResult");
        dbg.field("size", &self.size());
        if let Some(message) = self.out_of_band_error() {
            dbg.field("out_of_band_error", &message);
        }
        dbg.finish()
    }
}
