//! In-process wrapper function registry.
//!
//! Maps executor addresses to handle paths so calls can be looped back
//! inside one process, either through [`Dispatch`] directly or through
//! [`registry_dispatch`] as a C dispatch primitive.

use std::collections::HashMap;
use std::ffi::c_void;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use spsprims_codec::{ExecutorAddr, SpsDeserialize, SpsTuple};
use spsprims_result::{CWrapperFunctionResult, WrapperFunctionResult};
use tracing::{debug, trace};

use crate::dispatch::Dispatch;
use crate::error::{CallError, Result};
use crate::handler::WrapperHandler;
use crate::returns::IntoSpsReturn;
use crate::wrapper::WrapperFunction;

type ErasedHandler = Box<dyn Fn(&[u8]) -> WrapperFunctionResult + Send + Sync>;

struct Entry {
    name: String,
    handler: ErasedHandler,
}

/// Handle paths keyed by target address.
#[derive(Default)]
pub struct WrapperFunctionRegistry {
    entries: HashMap<ExecutorAddr, Entry>,
}

impl WrapperFunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw handler that maps argument bytes to a result.
    pub fn register<F>(&mut self, target: ExecutorAddr, name: impl Into<String>, handler: F) -> Result<()>
    where
        F: Fn(&[u8]) -> WrapperFunctionResult + Send + Sync + 'static,
    {
        if self.entries.contains_key(&target) {
            return Err(CallError::AlreadyRegistered(target));
        }
        let name = name.into();
        debug!(%target, %name, "registered wrapper function");
        self.entries.insert(
            target,
            Entry {
                name,
                handler: Box::new(handler),
            },
        );
        Ok(())
    }

    /// Register a native handler under the signature `Ret(Args)`.
    ///
    /// The handler is cloned for every call.
    pub fn register_function<Ret, Args, A, H>(
        &mut self,
        target: ExecutorAddr,
        name: impl Into<String>,
        handler: H,
    ) -> Result<()>
    where
        A: for<'de> SpsDeserialize<'de, SpsTuple<Args>>,
        H: WrapperHandler<A> + Clone + Send + Sync + 'static,
        H::Output: IntoSpsReturn<Ret>,
    {
        self.register(target, name, move |arg_data: &[u8]| {
            WrapperFunction::<Ret, Args>::handle::<H, A>(arg_data, handler.clone())
        })
    }

    pub fn contains(&self, target: ExecutorAddr) -> bool {
        self.entries.contains_key(&target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name given to the handler at `target`.
    pub fn name(&self, target: ExecutorAddr) -> Option<&str> {
        self.entries.get(&target).map(|entry| entry.name.as_str())
    }

    /// Run the handler at `target`, or report an out-of-band error if there
    /// is none.
    pub fn run(&self, target: ExecutorAddr, arg_data: &[u8]) -> WrapperFunctionResult {
        match self.entries.get(&target) {
            Some(entry) => {
                trace!(%target, name = %entry.name, "running registered wrapper function");
                (entry.handler)(arg_data)
            }
            None => {
                debug!(%target, "no wrapper function registered");
                WrapperFunctionResult::create_out_of_band_error(format!(
                    "no wrapper function registered at {target}"
                ))
            }
        }
    }
}

impl Dispatch for WrapperFunctionRegistry {
    fn dispatch(&self, target: ExecutorAddr, arg_data: &[u8]) -> Result<WrapperFunctionResult> {
        Ok(self.run(target, arg_data))
    }
}

impl fmt::Debug for WrapperFunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(target, entry)| (target, &entry.name)))
            .finish()
    }
}

/// A C dispatch primitive whose context is a `*const WrapperFunctionRegistry`.
///
/// Panics in handlers are caught and reported as out-of-band errors.
///
/// # Safety
///
/// `ctx` must be null or point to a live `WrapperFunctionRegistry` that is
/// not mutated during the call. `arg_data` must be null or valid for reads
/// of `arg_size` bytes.
pub unsafe extern "C" fn registry_dispatch(
    ctx: *mut c_void,
    target: *const c_void,
    arg_data: *const u8,
    arg_size: usize,
) -> CWrapperFunctionResult {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        if ctx.is_null() {
            return WrapperFunctionResult::create_out_of_band_error("registry context is null");
        }
        // SAFETY: non-null and valid per the function contract.
        let registry = unsafe { &*(ctx as *const WrapperFunctionRegistry) };
        let data: &[u8] = if arg_size == 0 {
            &[]
        } else if arg_data.is_null() {
            return WrapperFunctionResult::create_out_of_band_error("argument data is null");
        } else {
            // SAFETY: non-null and valid for `arg_size` bytes per the function contract.
            unsafe { std::slice::from_raw_parts(arg_data, arg_size) }
        };
        registry.run(ExecutorAddr::from_ptr(target), data)
    }));

    outcome
        .unwrap_or_else(|_| {
            WrapperFunctionResult::create_out_of_band_error("wrapper function panicked")
        })
        .into_c()
}
