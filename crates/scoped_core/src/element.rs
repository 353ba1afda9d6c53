//! Compile-time indexing into resource tuples.
//!
//! [`Element<I>`] backs [`ScopedResource::get`](crate::ScopedResource::get):
//! an out-of-range index is a type error rather than a runtime failure.
//! [`ReleaseFirst`] produces the value handed back by
//! [`ScopedResource::release`](crate::ScopedResource::release).

use variadics_please::{all_tuples, all_tuples_enumerated};

/// Access to the `I`-th element of a tuple.
pub trait Element<const I: usize> {
    /// The element type at position `I`.
    type Output;

    /// Returns a reference to the element.
    fn element(&self) -> &Self::Output;

    /// Returns a mutable reference to the element.
    fn element_mut(&mut self) -> &mut Self::Output;
}

// Emits one `Element<I>` impl per position, carrying the full parameter list
// along so every impl names the whole tuple.
macro_rules! impl_element_at {
    ([$($all:ident),*]) => {};
    ([$($all:ident),*] ($index:tt, $R:ident) $($rest:tt)*) => {
        impl<$($all),*> Element<$index> for ($($all,)*) {
            type Output = $R;

            fn element(&self) -> &Self::Output {
                &self.$index
            }

            fn element_mut(&mut self) -> &mut Self::Output {
                &mut self.$index
            }
        }

        impl_element_at!([$($all),*] $($rest)*);
    };
}

macro_rules! impl_element_tuple {
    ($(($index:tt, $R:ident)),*) => {
        impl_element_at!([$($R),*] $(($index, $R))*);
    };
}

all_tuples_enumerated!(impl_element_tuple, 1, 12, R);

/// The value surrendered by [`ScopedResource::release`](crate::ScopedResource::release).
///
/// For a non-empty tuple this is a clone of the first element. The empty
/// tuple has no first element and yields `false` instead.
pub trait ReleaseFirst {
    /// The released value type.
    type Released;

    /// Produces the released value without touching the tuple.
    fn release_first(&self) -> Self::Released;
}

impl ReleaseFirst for () {
    type Released = bool;

    fn release_first(&self) -> Self::Released {
        false
    }
}

macro_rules! impl_release_first_tuple {
    ($($R:ident),*) => {
        impl<$($R),*> ReleaseFirst for ($($R,)*)
        where
            Self: Element<0>,
            <Self as Element<0>>::Output: Clone,
        {
            type Released = <Self as Element<0>>::Output;

            fn release_first(&self) -> Self::Released {
                <Self as Element<0>>::element(self).clone()
            }
        }
    };
}

all_tuples!(impl_release_first_tuple, 1, 12, R);
