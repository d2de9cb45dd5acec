//! Handler normalization.
//!
//! Plain functions, closures and bound methods all become a
//! [`WrapperHandler`] over the native argument tuple, so the handle path
//! only ever deals with one call shape.

/// A callable taking its arguments as one native tuple.
pub trait WrapperHandler<Args> {
    type Output;

    fn invoke(self, args: Args) -> Self::Output;
}

/// A method bound to its receiver.
///
/// `method` takes the receiver as its first parameter, so both
/// `Type::method` paths and closures over a receiver work:
///
/// ```
/// use spsprims_call::{BoundMethod, WrapperHandler};
///
/// struct Counter(u32);
///
/// impl Counter {
///     fn add(&self, n: u32) -> u32 {
///         self.0 + n
///     }
/// }
///
/// let counter = Counter(40);
/// let bound = BoundMethod::new(&counter, Counter::add);
/// assert_eq!(bound.invoke((2,)), 42);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BoundMethod<Recv, F> {
    receiver: Recv,
    method: F,
}

impl<Recv, F> BoundMethod<Recv, F> {
    pub fn new(receiver: Recv, method: F) -> Self {
        Self { receiver, method }
    }
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        impl<F, R, $($arg),*> WrapperHandler<($($arg,)*)> for F
        where
            F: FnOnce($($arg),*) -> R,
        {
            type Output = R;

            #[allow(non_snake_case)]
            fn invoke(self, ($($arg,)*): ($($arg,)*)) -> R {
                self($($arg),*)
            }
        }

        impl<Recv, F, R, $($arg),*> WrapperHandler<($($arg,)*)> for BoundMethod<Recv, F>
        where
            F: FnOnce(Recv $(, $arg)*) -> R,
        {
            type Output = R;

            #[allow(non_snake_case)]
            fn invoke(self, ($($arg,)*): ($($arg,)*)) -> R {
                (self.method)(self.receiver $(, $arg)*)
            }
        }
    };
}

impl_handler!();
impl_handler!(A1);
impl_handler!(A1, A2);
impl_handler!(A1, A2, A3);
impl_handler!(A1, A2, A3, A4);
impl_handler!(A1, A2, A3, A4, A5);
impl_handler!(A1, A2, A3, A4, A5, A6);
impl_handler!(A1, A2, A3, A4, A5, A6, A7);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_handler!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);
