//! spsprims-ffi: C-ABI exports for the spsprims result buffer, dispatch and
//! runtime signature APIs.

mod args;
mod call;
mod error;
mod result;
mod sig;
mod types;

use std::panic::AssertUnwindSafe;

pub use call::{spsprims_call_raw, spsprims_set_dispatch};
pub use result::{
    spsprims_result_allocate, spsprims_result_data, spsprims_result_dispose,
    spsprims_result_empty, spsprims_result_from_out_of_band_error, spsprims_result_from_range,
    spsprims_result_from_string, spsprims_result_get_out_of_band_error, spsprims_result_init,
    spsprims_result_size,
};
pub use sig::{spsprims_sig_decode, spsprims_sig_encode, spsprims_string_free};
pub use spsprims_result::CWrapperFunctionResult;
pub use types::{
    SpsResult, SPS_ERR_ALREADY_CONFIGURED, SPS_ERR_CODEC, SPS_ERR_INTERNAL,
    SPS_ERR_INVALID_ARGUMENT, SPS_ERR_NOT_CONFIGURED, SPS_ERR_OUT_OF_BAND, SPS_ERR_SIGNATURE,
    SPS_OK,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

#[no_mangle]
pub extern "C" fn spsprims_init() -> SpsResult {
    ffi_boundary(SpsResult::Internal, || {
        error::clear_error_state();
        SpsResult::Ok
    })
}

#[no_mangle]
pub extern "C" fn spsprims_cleanup() {
    ffi_boundary((), || {
        error::clear_error_state();
    });
}

#[no_mangle]
pub extern "C" fn spsprims_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}
