//! Calling a disposer with a resource tuple.
//!
//! [`Disposer<R>`] is implemented for every `FnMut` whose parameters are
//! shared references to the elements of `R`, in order. The tuple is unpacked
//! into positional arguments, so a disposer over `(i32, String)` is any
//! `FnMut(&i32, &String) -> O`. The empty tuple maps to a nullary disposer.
//!
//! ```
//! use scoped_core::dispose::Disposer;
//!
//! let mut seen = Vec::new();
//! let mut record = |fd: &i32, text: &String| seen.push(format!("{fd}:{text}"));
//! record.dispose(&(7, String::from("bye")));
//! assert_eq!(seen, ["7:bye"]);
//! ```

use variadics_please::all_tuples;

use crate::error::DisposeOutcome;

/// A cleanup callable invocable with a resource tuple `R`.
///
/// Resources are passed by reference so the same disposer can fire again
/// over the same tuple (see [`Strategy::Again`](crate::Strategy::Again)).
pub trait Disposer<R> {
    /// What the disposer returns; inspected for failures after each call.
    type Outcome: DisposeOutcome;

    /// Invokes the disposer with `resources` unpacked as arguments.
    fn dispose(&mut self, resources: &R) -> Self::Outcome;
}

// Unit type implementation
impl<F, O> Disposer<()> for F
where
    F: FnMut() -> O,
    O: DisposeOutcome,
{
    type Outcome = O;

    fn dispose(&mut self, _resources: &()) -> Self::Outcome {
        self()
    }
}

macro_rules! impl_disposer_tuple {
    ($($R:ident),*) => {
        impl<F, O, $($R),*> Disposer<($($R,)*)> for F
        where
            F: FnMut($(&$R),*) -> O,
            O: DisposeOutcome,
        {
            type Outcome = O;

            #[expect(non_snake_case, reason = "bindings reuse the tuple's type parameter names")]
            fn dispose(&mut self, resources: &($($R,)*)) -> Self::Outcome {
                let ($($R,)*) = resources;
                self($($R),*)
            }
        }
    };
}

// Generate impls for resource tuples of size 1 to 12
all_tuples!(impl_disposer_tuple, 1, 12, R);
