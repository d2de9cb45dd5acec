//! The dispatch primitive: the one step of a call that crosses the
//! boundary to the executor.

use std::ffi::c_void;
use std::ptr;
use std::sync::OnceLock;

use spsprims_codec::ExecutorAddr;
use spsprims_result::{CWrapperFunctionResult, WrapperFunctionResult};
use tracing::{debug, trace};

use crate::error::{CallError, Result};

/// C signature of a dispatch primitive.
///
/// Receives the configured context, the target address and the encoded
/// argument bytes, and returns an owned result. The callee keeps no
/// reference to the argument bytes after returning.
pub type DispatchFn = unsafe extern "C" fn(
    ctx: *mut c_void,
    target: *const c_void,
    arg_data: *const u8,
    arg_size: usize,
) -> CWrapperFunctionResult;

/// Performs one blocking call to the wrapper function at `target`.
pub trait Dispatch {
    fn dispatch(&self, target: ExecutorAddr, arg_data: &[u8]) -> Result<WrapperFunctionResult>;
}

impl<D: Dispatch + ?Sized> Dispatch for &D {
    fn dispatch(&self, target: ExecutorAddr, arg_data: &[u8]) -> Result<WrapperFunctionResult> {
        (**self).dispatch(target, arg_data)
    }
}

/// A dispatch primitive given as a C function and its opaque context.
#[derive(Debug, Clone, Copy)]
pub struct JitDispatch {
    ctx: *mut c_void,
    func: Option<DispatchFn>,
}

// SAFETY: the context is opaque to this crate and only ever handed back to
// `func`. Whoever constructs a `JitDispatch` vouches that the pair may be
// used from any thread.
unsafe impl Send for JitDispatch {}
// SAFETY: see `Send`.
unsafe impl Sync for JitDispatch {}

impl Default for JitDispatch {
    fn default() -> Self {
        Self::unset()
    }
}

impl JitDispatch {
    /// A primitive with neither context nor function. Every call fails.
    pub const fn unset() -> Self {
        Self {
            ctx: ptr::null_mut(),
            func: None,
        }
    }

    /// Pair a dispatch function with its context.
    ///
    /// # Safety
    ///
    /// `func` must be safe to call with `ctx`, any target address and any
    /// argument range, from any thread, for as long as this value (or a
    /// copy of it) is used. It must return a result the caller may own.
    pub const unsafe fn new(ctx: *mut c_void, func: Option<DispatchFn>) -> Self {
        Self { ctx, func }
    }

    pub fn ctx(&self) -> *mut c_void {
        self.ctx
    }

    pub fn func(&self) -> Option<DispatchFn> {
        self.func
    }

    /// True when both the context and the function are set.
    pub fn is_configured(&self) -> bool {
        self.validate().is_ok()
    }

    fn validate(&self) -> Result<DispatchFn> {
        if self.ctx.is_null() {
            return Err(CallError::DispatchNotConfigured("dispatch context not set"));
        }
        self.func
            .ok_or(CallError::DispatchNotConfigured("dispatch function not set"))
    }
}

impl Dispatch for JitDispatch {
    fn dispatch(&self, target: ExecutorAddr, arg_data: &[u8]) -> Result<WrapperFunctionResult> {
        let func = self.validate()?;
        trace!(%target, arg_size = arg_data.len(), "dispatching wrapper function call");
        // SAFETY: `func` and `ctx` were paired under the contract of
        // `JitDispatch::new`, and `arg_data` is valid for the whole call.
        let raw = unsafe { func(self.ctx, target.to_ptr(), arg_data.as_ptr(), arg_data.len()) };
        Ok(WrapperFunctionResult::from_c(raw))
    }
}

static DISPATCH: OnceLock<JitDispatch> = OnceLock::new();

/// Install the process-wide dispatch primitive used by
/// [`WrapperFunction::call`](crate::WrapperFunction::call).
///
/// Can succeed once per process.
pub fn configure_dispatch(dispatch: JitDispatch) -> Result<()> {
    DISPATCH
        .set(dispatch)
        .map_err(|_| CallError::DispatchAlreadyConfigured)?;
    debug!(
        ctx = ?dispatch.ctx(),
        has_func = dispatch.func().is_some(),
        "configured wrapper function dispatch"
    );
    Ok(())
}

/// The process-wide dispatch primitive, or an unset one.
pub fn jit_dispatch() -> JitDispatch {
    DISPATCH.get().copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe extern "C" fn echo(
        _ctx: *mut c_void,
        _target: *const c_void,
        arg_data: *const u8,
        arg_size: usize,
    ) -> CWrapperFunctionResult {
        // SAFETY: the caller passes a valid range.
        let data = unsafe { std::slice::from_raw_parts(arg_data, arg_size) };
        CWrapperFunctionResult::from_range(data)
    }

    #[test]
    fn unset_primitive_is_not_configured() {
        let err = JitDispatch::unset()
            .dispatch(ExecutorAddr::new(1), b"x")
            .unwrap_err();
        assert!(matches!(
            err,
            CallError::DispatchNotConfigured("dispatch context not set")
        ));
    }

    #[test]
    fn context_and_function_are_both_required() {
        let mut ctx = 0u8;
        let ctx = &mut ctx as *mut u8 as *mut c_void;

        // SAFETY: no function to call.
        let no_func = unsafe { JitDispatch::new(ctx, None) };
        assert!(matches!(
            no_func.dispatch(ExecutorAddr::new(1), &[]),
            Err(CallError::DispatchNotConfigured("dispatch function not set"))
        ));

        // SAFETY: `echo` ignores its context.
        let no_ctx = unsafe { JitDispatch::new(ptr::null_mut(), Some(echo)) };
        assert!(!no_ctx.is_configured());
        assert!(no_ctx.dispatch(ExecutorAddr::new(1), &[]).is_err());
    }

    #[test]
    fn configured_primitive_round_trips_bytes() {
        let mut ctx = 0u8;
        // SAFETY: `echo` ignores its context and copies the argument range.
        let dispatch = unsafe { JitDispatch::new(&mut ctx as *mut u8 as *mut c_void, Some(echo)) };
        assert!(dispatch.is_configured());
        let result = dispatch.dispatch(ExecutorAddr::new(7), b"ping").unwrap();
        assert_eq!(result.data(), b"ping");
    }

    #[test]
    fn accessors_expose_both_parts() {
        let mut ctx = 0u8;
        let ctx = &mut ctx as *mut u8 as *mut c_void;
        // SAFETY: `echo` ignores its context.
        let dispatch = unsafe { JitDispatch::new(ctx, Some(echo)) };
        assert_eq!(dispatch.ctx(), ctx);
        assert!(dispatch.func().is_some());

        let unset = JitDispatch::default();
        assert!(unset.ctx().is_null());
        assert!(unset.func().is_none());
    }
}
