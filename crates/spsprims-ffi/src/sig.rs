use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use spsprims_result::CWrapperFunctionResult;
use spsprims_sig::WireShape;

use crate::args::{bytes_arg, required_str_arg, result_arg};
use crate::error;
use crate::types::SpsResult;

/// Encode a JSON value under a shape such as `"seq<u32>"`.
///
/// On success `out` holds the encoded bytes. `out` is overwritten without
/// being disposed.
///
/// # Safety
/// `shape` and `json` must be valid NUL-terminated UTF-8 C strings. `out`
/// must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn spsprims_sig_encode(
    shape: *const c_char,
    json: *const c_char,
    out: *mut CWrapperFunctionResult,
) -> SpsResult {
    crate::ffi_boundary(SpsResult::Internal, || {
        error::clear_error_state();
        // SAFETY: We validate null and UTF-8 in helpers.
        let (Some(shape), Some(json), Some(out)) = (unsafe {
            (
                required_str_arg(shape, "shape"),
                required_str_arg(json, "json"),
                result_arg(out, "out"),
            )
        }) else {
            return SpsResult::InvalidArgument;
        };

        let encoded = shape.parse::<WireShape>().and_then(|shape| {
            let value: serde_json::Value = serde_json::from_str(json)?;
            shape.encode(&value)
        });
        match encoded {
            Ok(bytes) => {
                *out = CWrapperFunctionResult::from_range(&bytes);
                SpsResult::Ok
            }
            Err(err) => error::map_sig_error(&err),
        }
    })
}

/// Decode bytes under a shape into a newly allocated JSON C string.
///
/// Free the string with [`spsprims_string_free`].
///
/// # Safety
/// `shape` must be a valid NUL-terminated UTF-8 C string. If `size > 0`,
/// `data` must be readable for `size` bytes. `out_json` must be a valid
/// pointer.
#[no_mangle]
pub unsafe extern "C" fn spsprims_sig_decode(
    shape: *const c_char,
    data: *const u8,
    size: usize,
    out_json: *mut *mut c_char,
) -> SpsResult {
    crate::ffi_boundary(SpsResult::Internal, || {
        error::clear_error_state();
        if out_json.is_null() {
            return error::set_invalid_argument("out_json cannot be null");
        }
        // SAFETY: We validate null and UTF-8 / pointer-length pairing in helpers.
        let (Some(shape), Some(data)) =
            (unsafe { (required_str_arg(shape, "shape"), bytes_arg(data, size, "data")) })
        else {
            return SpsResult::InvalidArgument;
        };

        let decoded = shape
            .parse::<WireShape>()
            .and_then(|shape| shape.decode(data));
        match decoded {
            Ok(value) => {
                let text = CString::new(value.to_string()).unwrap_or_default();
                // SAFETY: `out_json` is non-null and writable per the caller contract.
                unsafe { *out_json = text.into_raw() };
                SpsResult::Ok
            }
            Err(err) => error::map_sig_error(&err),
        }
    })
}

/// Free a string returned by this library.
///
/// # Safety
/// `value` must be null or a string returned by [`spsprims_sig_decode`]
/// that has not been freed.
#[no_mangle]
pub unsafe extern "C" fn spsprims_string_free(value: *mut c_char) {
    crate::ffi_boundary((), || {
        if value.is_null() {
            return;
        }
        // SAFETY: Produced by `CString::into_raw` in `spsprims_sig_decode`.
        drop(unsafe { CString::from_raw(value) });
    });
}
