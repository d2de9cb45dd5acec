use std::ffi::c_void;

use spsprims_call::{configure_dispatch, jit_dispatch, Dispatch, DispatchFn, JitDispatch};
use spsprims_codec::ExecutorAddr;
use spsprims_result::{CWrapperFunctionResult, WrapperFunctionResult};

use crate::args::{bytes_arg, result_arg};
use crate::error;
use crate::types::SpsResult;

/// Install the process-wide dispatch primitive.
///
/// Both `ctx` and `func` must be set for calls to succeed; this can be done
/// once per process.
///
/// # Safety
/// `func` must be safe to call with `ctx` from any thread for the rest of
/// the process lifetime, and must return results whose storage was
/// allocated by this library.
#[no_mangle]
pub unsafe extern "C" fn spsprims_set_dispatch(
    ctx: *mut c_void,
    func: Option<DispatchFn>,
) -> SpsResult {
    crate::ffi_boundary(SpsResult::Internal, || {
        error::clear_error_state();
        if ctx.is_null() || func.is_none() {
            return error::set_invalid_argument("dispatch context and function must both be set");
        }
        // SAFETY: Forwarded from this function's contract.
        let dispatch = unsafe { JitDispatch::new(ctx, func) };
        match configure_dispatch(dispatch) {
            Ok(()) => SpsResult::Ok,
            Err(err) => error::map_call_error(&err),
        }
    })
}

/// Call the wrapper function at `target` with pre-encoded argument bytes.
///
/// On `SPS_OK` the payload is stored in `out`. If the call fails out of
/// band, `out` holds the error result and `SPS_ERR_OUT_OF_BAND` is
/// returned. `out` is overwritten without being disposed.
///
/// # Safety
/// If `arg_size > 0`, `arg_data` must be readable for `arg_size` bytes.
/// `out` must be a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn spsprims_call_raw(
    target: u64,
    arg_data: *const u8,
    arg_size: usize,
    out: *mut CWrapperFunctionResult,
) -> SpsResult {
    crate::ffi_boundary(SpsResult::Internal, || {
        error::clear_error_state();
        // SAFETY: We validate pointer/length pairing in helper.
        let Some(args) = (unsafe { bytes_arg(arg_data, arg_size, "arg_data") }) else {
            return SpsResult::InvalidArgument;
        };
        // SAFETY: We validate null in helper.
        let Some(out) = (unsafe { result_arg(out, "out") }) else {
            return SpsResult::InvalidArgument;
        };

        let result = match jit_dispatch().dispatch(ExecutorAddr::new(target), args) {
            Ok(result) => result,
            Err(err) => return error::map_call_error(&err),
        };
        let status = match result.out_of_band_error() {
            Some(message) => {
                error::set_error_message(message);
                SpsResult::OutOfBand
            }
            None => SpsResult::Ok,
        };
        *out = WrapperFunctionResult::into_c(result);
        status
    })
}
