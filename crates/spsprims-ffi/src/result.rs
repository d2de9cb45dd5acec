//! `spsprims_result_*`: the owning-buffer API for C callers.
//!
//! Results passed by pointer are caller-owned structs; storage inside them
//! is owned by this library and released with `spsprims_result_dispose`.

use std::os::raw::c_char;
use std::ptr;

use spsprims_result::CWrapperFunctionResult;

use crate::args::{bytes_arg, required_str_arg};
use crate::error;

/// Reset `result` to the empty state. Does not release storage.
///
/// # Safety
/// `result` must be null or a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn spsprims_result_init(result: *mut CWrapperFunctionResult) {
    crate::ffi_boundary((), || {
        if result.is_null() {
            return;
        }
        // SAFETY: Pointer validity is guaranteed by the caller.
        let result = unsafe { &mut *result };
        result.init();
    });
}

/// Release any contents of `result` and allocate `size` zeroed bytes.
///
/// Returns the writable payload pointer, or null for `size == 0` or a null
/// `result`.
///
/// # Safety
/// `result` must be null or a valid pointer whose storage came from this
/// library.
#[no_mangle]
pub unsafe extern "C" fn spsprims_result_allocate(
    result: *mut CWrapperFunctionResult,
    size: usize,
) -> *mut u8 {
    crate::ffi_boundary(ptr::null_mut(), || {
        if result.is_null() {
            let _ = error::set_invalid_argument("result cannot be null");
            return ptr::null_mut();
        }
        // SAFETY: Pointer validity is guaranteed by the caller.
        let result = unsafe { &mut *result };
        result.allocate(size)
    })
}

/// Create a result holding a copy of `data[..size]`.
///
/// # Safety
/// If `size > 0`, `data` must be non-null and readable for `size` bytes.
#[no_mangle]
pub unsafe extern "C" fn spsprims_result_from_range(
    data: *const u8,
    size: usize,
) -> CWrapperFunctionResult {
    crate::ffi_boundary(CWrapperFunctionResult::new(), || {
        // SAFETY: We validate pointer/length pairing in helper.
        match unsafe { bytes_arg(data, size, "data") } {
            Some(bytes) => CWrapperFunctionResult::from_range(bytes),
            None => CWrapperFunctionResult::new(),
        }
    })
}

/// Create a result holding a copy of a C string, NUL terminator included.
///
/// # Safety
/// `source` must be null or a valid NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn spsprims_result_from_string(
    source: *const c_char,
) -> CWrapperFunctionResult {
    crate::ffi_boundary(CWrapperFunctionResult::new(), || {
        if source.is_null() {
            let _ = error::set_invalid_argument("source cannot be null");
            return CWrapperFunctionResult::new();
        }
        // SAFETY: Non-null and NUL-terminated per the caller contract.
        let source = unsafe { std::ffi::CStr::from_ptr(source) };
        CWrapperFunctionResult::from_string(source)
    })
}

/// Create an out-of-band error result carrying a copy of `message`.
///
/// # Safety
/// `message` must be null or a valid NUL-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn spsprims_result_from_out_of_band_error(
    message: *const c_char,
) -> CWrapperFunctionResult {
    crate::ffi_boundary(CWrapperFunctionResult::new(), || {
        // SAFETY: We validate null and UTF-8 in helper.
        match unsafe { required_str_arg(message, "message") } {
            Some(message) => CWrapperFunctionResult::from_out_of_band_error(message),
            None => CWrapperFunctionResult::new(),
        }
    })
}

/// Payload pointer of `result` (null when there is none).
///
/// # Safety
/// `result` must be null or a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn spsprims_result_data(result: *const CWrapperFunctionResult) -> *const u8 {
    crate::ffi_boundary(ptr::null(), || {
        if result.is_null() {
            return ptr::null();
        }
        // SAFETY: Pointer validity is guaranteed by the caller.
        let result = unsafe { &*result };
        result.data_ptr()
    })
}

/// Payload size of `result` in bytes.
///
/// # Safety
/// `result` must be null or a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn spsprims_result_size(result: *const CWrapperFunctionResult) -> usize {
    crate::ffi_boundary(0, || {
        if result.is_null() {
            return 0;
        }
        // SAFETY: Pointer validity is guaranteed by the caller.
        let result = unsafe { &*result };
        result.size()
    })
}

/// True when `result` holds neither payload nor out-of-band error.
///
/// # Safety
/// `result` must be null or a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn spsprims_result_empty(result: *const CWrapperFunctionResult) -> bool {
    crate::ffi_boundary(true, || {
        if result.is_null() {
            return true;
        }
        // SAFETY: Pointer validity is guaranteed by the caller.
        let result = unsafe { &*result };
        result.is_empty()
    })
}

/// The out-of-band error message of `result`, or null.
///
/// The string is owned by `result` and valid until it is disposed.
///
/// # Safety
/// `result` must be null or a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn spsprims_result_get_out_of_band_error(
    result: *const CWrapperFunctionResult,
) -> *const c_char {
    crate::ffi_boundary(ptr::null(), || {
        if result.is_null() {
            return ptr::null();
        }
        // SAFETY: Pointer validity is guaranteed by the caller.
        let result = unsafe { &*result };
        match result.out_of_band_error() {
            Some(message) => message.as_ptr(),
            None => ptr::null(),
        }
    })
}

/// Release storage held by `result` and reset it to empty.
///
/// # Safety
/// `result` must be null or a valid pointer whose storage came from this
/// library.
#[no_mangle]
pub unsafe extern "C" fn spsprims_result_dispose(result: *mut CWrapperFunctionResult) {
    crate::ffi_boundary((), || {
        if result.is_null() {
            return;
        }
        // SAFETY: Pointer validity is guaranteed by the caller.
        let result = unsafe { &mut *result };
        result.dispose();
    });
}
