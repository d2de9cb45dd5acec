use std::marker::PhantomData;

use spsprims_codec::{
    ExecutorAddr, SpsArgList, SpsDeserialize, SpsOutputBuffer, SpsSerialize, SpsTuple,
};
use spsprims_result::WrapperFunctionResult;
use tracing::{debug, trace};

use crate::dispatch::{jit_dispatch, Dispatch};
use crate::error::{CallError, Result};
use crate::handler::WrapperHandler;
use crate::returns::{FromSpsReturn, IntoSpsReturn};

/// Out-of-band message for argument bytes that do not match the signature.
pub const ARGUMENT_DESERIALIZATION_FAILED: &str =
    "Could not deserialize arguments for wrapper function call";

/// Out-of-band message for a return value that could not be encoded.
pub const RETURN_SERIALIZATION_FAILED: &str =
    "Could not serialize return value from wrapper function";

/// A wrapper function signature: return tag `Ret`, argument tags `Args`.
///
/// `Args` is a tuple of tags, e.g. `(u32, SpsString)`; argument values are
/// passed as a native tuple of the same arity. A function with no return
/// value uses `SpsEmpty` and `()`.
///
/// ```
/// use spsprims_call::{WrapperFunction, WrapperFunctionRegistry};
/// use spsprims_codec::{ExecutorAddr, SpsString};
///
/// type Greet = WrapperFunction<SpsString, (SpsString, u32)>;
///
/// let mut registry = WrapperFunctionRegistry::new();
/// let target = ExecutorAddr::new(0x1000);
/// registry
///     .register_function::<SpsString, (SpsString, u32), _, _>(target, "greet", |name: String, n: u32| {
///         format!("hello {name} x{n}")
///     })
///     .unwrap();
///
/// let reply: String = Greet::call_with(&registry, target, &("sps", 2u32)).unwrap();
/// assert_eq!(reply, "hello sps x2");
/// ```
pub struct WrapperFunction<Ret, Args>(PhantomData<fn() -> (Ret, Args)>);

impl<Ret, Args> WrapperFunction<Ret, Args> {
    /// Call `target` through the process-wide dispatch primitive.
    pub fn call<R, A>(target: ExecutorAddr, args: &A) -> Result<R>
    where
        R: FromSpsReturn<Ret>,
        A: SpsSerialize<SpsTuple<Args>> + ?Sized,
    {
        Self::call_with(&jit_dispatch(), target, args)
    }

    /// Call `target` through `dispatch`.
    ///
    /// Dispatches exactly once. An out-of-band error is returned as
    /// [`CallError::OutOfBand`] without looking at the payload; otherwise
    /// the payload is decoded into `R`.
    pub fn call_with<D, R, A>(dispatch: &D, target: ExecutorAddr, args: &A) -> Result<R>
    where
        D: Dispatch + ?Sized,
        R: FromSpsReturn<Ret>,
        A: SpsSerialize<SpsTuple<Args>> + ?Sized,
    {
        let result = Self::call_raw_with(dispatch, target, args)?;
        R::from_sps_return(result.data()).map_err(CallError::DeserializeResult)
    }

    /// Like [`call`](Self::call), but returns the undecoded payload.
    ///
    /// Useful for decoding borrowed views (such as `&str`) that must not
    /// outlive the result.
    pub fn call_raw<A>(target: ExecutorAddr, args: &A) -> Result<WrapperFunctionResult>
    where
        A: SpsSerialize<SpsTuple<Args>> + ?Sized,
    {
        Self::call_raw_with(&jit_dispatch(), target, args)
    }

    /// Like [`call_with`](Self::call_with), but returns the undecoded payload.
    pub fn call_raw_with<D, A>(
        dispatch: &D,
        target: ExecutorAddr,
        args: &A,
    ) -> Result<WrapperFunctionResult>
    where
        D: Dispatch + ?Sized,
        A: SpsSerialize<SpsTuple<Args>> + ?Sized,
    {
        let arg_buffer =
            SpsArgList::<Args>::to_result_buffer(args).map_err(CallError::SerializeArguments)?;
        let result = dispatch.dispatch(target, arg_buffer.data())?;
        if let Some(message) = result.out_of_band_error() {
            debug!(%target, %message, "wrapper function call failed out of band");
            return Err(CallError::OutOfBand(message.into_owned()));
        }
        Ok(result)
    }

    /// Run `handler` on encoded arguments and encode what it returns.
    ///
    /// The handler is not invoked if the arguments do not decode. The result
    /// holds either the encoded return value or an out-of-band error.
    pub fn handle<'de, H, A>(arg_data: &'de [u8], handler: H) -> WrapperFunctionResult
    where
        A: SpsDeserialize<'de, SpsTuple<Args>>,
        H: WrapperHandler<A>,
        H::Output: IntoSpsReturn<Ret>,
    {
        let args = match SpsArgList::<Args>::from_buffer::<A>(arg_data) {
            Ok(args) => args,
            Err(err) => {
                debug!(error = %err, arg_size = arg_data.len(), "rejecting wrapper function arguments");
                return WrapperFunctionResult::create_out_of_band_error(
                    ARGUMENT_DESERIALIZATION_FAILED,
                );
            }
        };

        trace!(arg_size = arg_data.len(), "invoking wrapper function handler");
        let ret = handler.invoke(args).into_sps_return();

        let mut result = WrapperFunctionResult::new();
        let mut ob = SpsOutputBuffer::new(result.allocate(ret.sps_size()));
        if let Err(err) = ret.sps_serialize(&mut ob) {
            debug!(error = %err, "failed to encode wrapper function return value");
            return WrapperFunctionResult::create_out_of_band_error(RETURN_SERIALIZATION_FAILED);
        }
        result
    }
}
