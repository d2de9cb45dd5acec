use std::ffi::{c_char, CStr, CString};
use std::ptr;

/// C-layout wrapper function result.
///
/// This is the value handed across the ABI boundary. It owns either a byte
/// range, an out-of-band error message, or nothing. It does not release its
/// storage on drop; ownership is managed explicitly through [`dispose`] or by
/// wrapping it in a [`WrapperFunctionResult`].
///
/// Storage must have been allocated by this library (the `spsprims_result_*`
/// C exports or the methods below). Byte storage is a `Box<[u8]>`, error
/// storage is a `CString`.
///
/// [`dispose`]: CWrapperFunctionResult::dispose
/// [`WrapperFunctionResult`]: crate::WrapperFunctionResult
#[repr(C)]
#[derive(Debug)]
pub struct CWrapperFunctionResult {
    data: *mut u8,
    size: usize,
    out_of_band_error: *mut c_char,
}

impl Default for CWrapperFunctionResult {
    fn default() -> Self {
        Self::new()
    }
}

impl CWrapperFunctionResult {
    /// An empty result.
    pub const fn new() -> Self {
        Self {
            data: ptr::null_mut(),
            size: 0,
            out_of_band_error: ptr::null_mut(),
        }
    }

    /// Reset to the empty state without releasing anything.
    ///
    /// Only call this on results that do not own storage; owned storage is
    /// leaked otherwise.
    pub fn init(&mut self) {
        *self = Self::new();
    }

    /// Release any current contents and allocate `size` zeroed bytes.
    ///
    /// Returns a pointer to the new storage, or null when `size` is zero.
    pub fn allocate(&mut self, size: usize) -> *mut u8 {
        self.dispose();
        if size == 0 {
            return ptr::null_mut();
        }
        *self = Self::from_boxed(vec![0u8; size].into_boxed_slice());
        self.data
    }

    /// Create a data-bearing result by copying `source`.
    pub fn from_range(source: &[u8]) -> Self {
        if source.is_empty() {
            return Self::new();
        }
        Self::from_boxed(Box::from(source))
    }

    /// Create a data-bearing result by copying a C string, including its NUL
    /// terminator.
    pub fn from_string(source: &CStr) -> Self {
        Self::from_range(source.to_bytes_with_nul())
    }

    /// Create an out-of-band error result carrying a copy of `message`.
    ///
    /// Interior NUL bytes are replaced with `?`.
    pub fn from_out_of_band_error(message: &str) -> Self {
        let message = CString::new(message.replace('\0', "?")).unwrap_or_default();
        Self {
            data: ptr::null_mut(),
            size: 0,
            out_of_band_error: message.into_raw(),
        }
    }

    fn from_boxed(storage: Box<[u8]>) -> Self {
        let size = storage.len();
        Self {
            data: Box::into_raw(storage) as *mut u8,
            size,
            out_of_band_error: ptr::null_mut(),
        }
    }

    /// Payload bytes. Empty for empty and out-of-band error results.
    pub fn data(&self) -> &[u8] {
        if self.data.is_null() || self.size == 0 {
            return &[];
        }
        // SAFETY: `data` and `size` describe a live `Box<[u8]>` allocated by
        // `from_boxed`, and the borrow is tied to `self`.
        unsafe { std::slice::from_raw_parts(self.data, self.size) }
    }

    /// Raw pointer to the payload (null when there is none).
    pub fn data_ptr(&self) -> *const u8 {
        self.data
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// True if this result holds neither payload bytes nor an out-of-band
    /// error.
    pub fn is_empty(&self) -> bool {
        self.size == 0 && self.out_of_band_error.is_null()
    }

    /// The out-of-band error message, if this result carries one.
    pub fn out_of_band_error(&self) -> Option<&CStr> {
        if self.out_of_band_error.is_null() {
            return None;
        }
        // SAFETY: `out_of_band_error` was produced by `CString::into_raw` and
        // stays alive until `dispose`.
        Some(unsafe { CStr::from_ptr(self.out_of_band_error) })
    }

    /// Release owned storage and reset to the empty state.
    ///
    /// Safe to call repeatedly; storage is released exactly once.
    pub fn dispose(&mut self) {
        if !self.data.is_null() {
            let slice = ptr::slice_from_raw_parts_mut(self.data, self.size);
            // SAFETY: `data`/`size` were produced by `Box::into_raw` on a
            // `Box<[u8]>` of exactly `size` bytes in `from_boxed`.
            unsafe {
                drop(Box::from_raw(slice));
            }
        }
        if !self.out_of_band_error.is_null() {
            // SAFETY: produced by `CString::into_raw` in `from_out_of_band_error`.
            unsafe {
                drop(CString::from_raw(self.out_of_band_error));
            }
        }
        self.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty() {
        let result = CWrapperFunctionResult::new();
        assert!(result.is_empty());
        assert_eq!(result.size(), 0);
        assert!(result.data().is_empty());
        assert!(result.out_of_band_error().is_none());
    }

    #[test]
    fn allocate_returns_zeroed_storage() {
        let mut result = CWrapperFunctionResult::new();
        let ptr = result.allocate(16);
        assert!(!ptr.is_null());
        assert_eq!(result.size(), 16);
        assert_eq!(result.data(), &[0u8; 16]);
        assert!(!result.is_empty());
        result.dispose();
        assert!(result.is_empty());
    }

    #[test]
    fn allocate_zero_is_empty() {
        let mut result = CWrapperFunctionResult::new();
        assert!(result.allocate(0).is_null());
        assert!(result.is_empty());
    }

    #[test]
    fn allocate_releases_previous_error() {
        let mut result = CWrapperFunctionResult::from_out_of_band_error("stale");
        result.allocate(4);
        assert!(result.out_of_band_error().is_none());
        assert_eq!(result.size(), 4);
        result.dispose();
    }

    #[test]
    fn from_range_copies_bytes() {
        let source = [1u8, 2, 3, 4, 5];
        let mut result = CWrapperFunctionResult::from_range(&source);
        assert_eq!(result.data(), &source);
        assert_ne!(result.data_ptr(), source.as_ptr());
        result.dispose();
    }

    #[test]
    fn from_string_includes_terminator() {
        let mut result = CWrapperFunctionResult::from_string(c"hi");
        assert_eq!(result.data(), b"hi\0");
        result.dispose();
    }

    #[test]
    fn out_of_band_error_sanitizes_nul() {
        let mut result = CWrapperFunctionResult::from_out_of_band_error("bad\0thing");
        assert!(!result.is_empty());
        assert_eq!(result.size(), 0);
        let message = result.out_of_band_error().unwrap().to_str().unwrap();
        assert_eq!(message, "bad?thing");
        result.dispose();
        assert!(result.out_of_band_error().is_none());
    }

    #[test]
    fn dispose_twice_is_harmless() {
        let mut result = CWrapperFunctionResult::from_range(b"abc");
        result.dispose();
        result.dispose();
        assert!(result.is_empty());
    }
}
