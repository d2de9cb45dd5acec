use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use spsprims_call::CallError;
use spsprims_sig::SigError;

use crate::types::SpsResult;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::default();
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let sanitized = message.into().replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(sanitized).unwrap_or_default();
    });
}

pub(crate) fn set_invalid_argument(message: impl Into<String>) -> SpsResult {
    set_error_message(message);
    SpsResult::InvalidArgument
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

pub(crate) fn map_call_error(err: &CallError) -> SpsResult {
    set_error_message(err.to_string());
    match err {
        CallError::DispatchNotConfigured(_) => SpsResult::NotConfigured,
        CallError::DispatchAlreadyConfigured | CallError::AlreadyRegistered(_) => {
            SpsResult::AlreadyConfigured
        }
        CallError::SerializeArguments(_) | CallError::DeserializeResult(_) => SpsResult::CodecError,
        CallError::OutOfBand(_) => SpsResult::OutOfBand,
    }
}

pub(crate) fn map_sig_error(err: &SigError) -> SpsResult {
    set_error_message(err.to_string());
    match err {
        SigError::Codec(_) | SigError::TrailingBytes(_) => SpsResult::CodecError,
        _ => SpsResult::SignatureError,
    }
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}
