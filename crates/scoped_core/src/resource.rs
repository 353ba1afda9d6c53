//! The scoped resource guard.
//!
//! A [`ScopedResource<D, R>`] owns a disposer `D` and a tuple of resources
//! `R`. When it goes out of scope while armed, the disposer runs with the
//! resources unpacked as arguments. The same type covers three shapes:
//!
//! | Resources | Shape |
//! |-----------|-------|
//! | `()` | scope-exit action |
//! | `(T,)` | single handle guard, usable as the handle via [`Deref`] |
//! | `(A, B, ...)` | bundle whose disposer takes every value in order |
//!
//! # State
//!
//! ```text
//! Armed ──fire(Again), reset──► Armed       (disposer runs)
//! Armed ──drop, fire(Once)────► Disarmed    (disposer runs)
//! Armed ──release, release_all► Disarmed
//! Disarmed ──reset, fire(Again)► Armed      (disposer does not run)
//! ```
//!
//! Only transitions out of `Armed` invoke the disposer (`drop`, `fire`,
//! `reset`). A disarmed guard never invokes it.
//!
//! # Faults
//!
//! Disposer failures and panics are swallowed; see [`crate::error`].

use core::any::type_name;
use core::fmt;
use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};
use std::panic::{self, AssertUnwindSafe};

use crate::dispose::Disposer;
use crate::element::{Element, ReleaseFirst};
use crate::error::{DisposeOutcome, DisposerFault};

/// Whether an explicit [`fire`](ScopedResource::fire) leaves the guard armed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Disarm after firing; the end of the scope does nothing more.
    #[default]
    Once,
    /// Stay armed after firing; the disposer runs again at scope end.
    Again,
}

/// A disposer bound to a tuple of resources, fired when the scope ends.
///
/// A guard over at least one resource dereferences to its first resource.
/// The guard's own methods (`get`, `value`, `release`, ...) take precedence
/// over methods of the same name on that resource.
///
/// Construct one with [`make_scoped_resource`](crate::make_scoped_resource),
/// [`make_scoped_resource_checked`](crate::make_scoped_resource_checked) or
/// [`ScopedResource::new`].
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use scoped_core::make_scoped_resource;
///
/// let closed = RefCell::new(Vec::new());
/// {
///     let fd = make_scoped_resource(|fd: &i32| closed.borrow_mut().push(*fd), (3,));
///     assert_eq!(*fd, 3);
/// }
/// assert_eq!(*closed.borrow(), [3]);
/// ```
///
/// Scoped resources cannot be copied:
///
/// ```compile_fail
/// use scoped_core::make_scoped_resource;
///
/// let guard = make_scoped_resource(|| {}, ());
/// let copy = guard.clone();
/// ```
///
/// and `reset` only accepts a tuple of the bound arity and types:
///
/// ```compile_fail
/// use scoped_core::make_scoped_resource;
///
/// let mut guard = make_scoped_resource(|_: &i32| {}, (1,));
/// guard.reset((1, 2));
/// ```
#[must_use = "a scoped resource fires immediately if it is not bound to a variable"]
pub struct ScopedResource<D, R = ()>
where
    D: Disposer<R>,
{
    disposer: D,
    resources: R,
    armed: bool,
}

impl<D, R> ScopedResource<D, R>
where
    D: Disposer<R>,
{
    /// Creates an armed scoped resource.
    pub fn new(disposer: D, resources: R) -> Self {
        Self::with_armed(disposer, resources, true)
    }

    /// Creates a scoped resource with an explicit initial armed state.
    ///
    /// A disarmed guard does nothing at scope end unless it is later
    /// [`reset`](Self::reset).
    pub fn with_armed(disposer: D, resources: R, armed: bool) -> Self {
        tracing::trace!(
            disposer = type_name::<D>(),
            armed,
            "scoped resource created"
        );
        Self {
            disposer,
            resources,
            armed,
        }
    }

    /// Returns `true` if the disposer will run at scope end.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Runs the disposer now if armed.
    ///
    /// With [`Strategy::Once`] the guard is disarmed afterwards. With
    /// [`Strategy::Again`] it stays armed and fires again later with the same
    /// resources. Calling this on a disarmed guard never invokes the
    /// disposer, but the guard's armed state is still set from `strategy`.
    pub fn fire(&mut self, strategy: Strategy) -> &mut Self {
        if self.armed {
            self.invoke();
        } else {
            tracing::trace!(
                disposer = type_name::<D>(),
                ?strategy,
                "scoped resource already disarmed, not firing"
            );
        }
        self.armed = strategy == Strategy::Again;
        self
    }

    /// Disarms the guard and returns a clone of the first resource.
    ///
    /// For the zero-resource form there is nothing to return and the result
    /// is `false`.
    pub fn release(&mut self) -> R::Released
    where
        R: ReleaseFirst,
    {
        self.disarm();
        self.resources.release_first()
    }

    /// Disarms the guard and returns a clone of every resource.
    pub fn release_all(&mut self) -> R
    where
        R: Clone,
    {
        self.disarm();
        self.resources.clone()
    }

    /// Disarms the guard and moves the resources out of it.
    pub fn into_resources(self) -> R {
        self.into_parts().1
    }

    /// Disarms the guard and moves the disposer and resources out of it.
    pub fn into_parts(self) -> (D, R) {
        tracing::trace!(disposer = type_name::<D>(), "scoped resource moved out");
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so each field is read exactly once
        // and ownership passes to the caller.
        unsafe {
            (
                core::ptr::read(&this.disposer),
                core::ptr::read(&this.resources),
            )
        }
    }

    /// Fires the disposer on the current resources and binds new ones.
    ///
    /// The current resources are disposed as if by
    /// [`fire(Strategy::Again)`](Self::fire), so the guard is armed
    /// afterwards even if it was disarmed before. The disposer itself is
    /// kept.
    pub fn reset(&mut self, resources: R) -> &mut Self {
        self.fire(Strategy::Again);
        self.resources = resources;
        self
    }

    /// Returns the `I`-th resource.
    ///
    /// ```
    /// use scoped_core::make_scoped_resource;
    ///
    /// let guard = make_scoped_resource(|_: &i32, _: &&str| {}, (7, "bye"));
    /// assert_eq!(*guard.get::<0>(), 7);
    /// assert_eq!(*guard.get::<1>(), "bye");
    /// ```
    #[must_use]
    pub fn get<const I: usize>(&self) -> &<R as Element<I>>::Output
    where
        R: Element<I>,
    {
        self.resources.element()
    }

    /// Returns the `I`-th resource mutably.
    pub fn get_mut<const I: usize>(&mut self) -> &mut <R as Element<I>>::Output
    where
        R: Element<I>,
    {
        self.resources.element_mut()
    }

    /// Returns the whole resource tuple.
    #[must_use]
    pub fn resources(&self) -> &R {
        &self.resources
    }

    /// Returns the whole resource tuple mutably.
    pub fn resources_mut(&mut self) -> &mut R {
        &mut self.resources
    }

    /// Returns a copy of the first resource.
    #[must_use]
    pub fn value(&self) -> <R as Element<0>>::Output
    where
        R: Element<0>,
        <R as Element<0>>::Output: Clone,
    {
        self.resources.element().clone()
    }

    /// Follows a pointer-like first resource to its target.
    ///
    /// ```
    /// use scoped_core::make_scoped_resource;
    ///
    /// struct Node { f: u32 }
    ///
    /// let guard = make_scoped_resource(|_: &Box<Node>| {}, (Box::new(Node { f: 9 }),));
    /// assert_eq!(guard.follow().f, 9);
    /// ```
    #[must_use]
    pub fn follow(&self) -> &<<R as Element<0>>::Output as Deref>::Target
    where
        R: Element<0>,
        <R as Element<0>>::Output: Deref,
    {
        self.resources.element()
    }

    /// Follows a pointer-like first resource to its target, mutably.
    pub fn follow_mut(&mut self) -> &mut <<R as Element<0>>::Output as Deref>::Target
    where
        R: Element<0>,
        <R as Element<0>>::Output: DerefMut,
    {
        self.resources.element_mut()
    }

    /// Returns the storage cell of the first resource.
    ///
    /// Intended for out-parameter APIs that write a fresh handle through a
    /// pointer; `&mut T` coerces to `*mut T` at such call sites.
    pub fn slot(&mut self) -> &mut <R as Element<0>>::Output
    where
        R: Element<0>,
    {
        self.resources.element_mut()
    }

    /// Returns the disposer.
    #[must_use]
    pub fn disposer(&self) -> &D {
        &self.disposer
    }

    /// Returns the disposer mutably.
    ///
    /// Mutating the disposer does not affect whether it fires.
    pub fn disposer_mut(&mut self) -> &mut D {
        &mut self.disposer
    }

    fn disarm(&mut self) {
        tracing::trace!(disposer = type_name::<D>(), "scoped resource released");
        self.armed = false;
    }

    fn invoke(&mut self) {
        let disposer = &mut self.disposer;
        let resources = &self.resources;
        let fault = panic::catch_unwind(AssertUnwindSafe(|| {
            disposer.dispose(resources).into_fault()
        }))
        .unwrap_or_else(|payload| Some(DisposerFault::from_panic(payload)));

        match fault {
            None => tracing::trace!(disposer = type_name::<D>(), "scoped resource fired"),
            Some(fault) => tracing::warn!(
                disposer = type_name::<D>(),
                error = %fault,
                "disposer fault swallowed"
            ),
        }
    }
}

impl<D, R> Drop for ScopedResource<D, R>
where
    D: Disposer<R>,
{
    fn drop(&mut self) {
        self.fire(Strategy::Once);
    }
}

impl<D, R> Deref for ScopedResource<D, R>
where
    D: Disposer<R>,
    R: Element<0>,
{
    type Target = <R as Element<0>>::Output;

    fn deref(&self) -> &Self::Target {
        self.resources.element()
    }
}

impl<D, R> DerefMut for ScopedResource<D, R>
where
    D: Disposer<R>,
    R: Element<0>,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.resources.element_mut()
    }
}

impl<D, R> fmt::Debug for ScopedResource<D, R>
where
    D: Disposer<R>,
    R: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedResource")
            .field("disposer", &type_name::<D>())
            .field("resources", &self.resources)
            .field("armed", &self.armed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};

    #[test]
    fn fires_once_on_drop() {
        let calls = Cell::new(0);
        {
            let _guard = ScopedResource::new(|| calls.set(calls.get() + 1), ());
            assert_eq!(calls.get(), 0);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn with_armed_false_never_fires() {
        let calls = Cell::new(0);
        {
            let guard =
                ScopedResource::with_armed(|_: &u8| calls.set(calls.get() + 1), (1,), false);
            assert!(!guard.is_armed());
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn fire_once_disarms() {
        let calls = Cell::new(0);
        {
            let mut guard = ScopedResource::new(|v: &i32| calls.set(calls.get() + v), (5,));
            guard.fire(Strategy::Once);
            assert!(!guard.is_armed());
            assert_eq!(calls.get(), 5);
            guard.fire(Strategy::Once);
            assert_eq!(calls.get(), 5);
        }
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn fire_again_stays_armed() {
        let calls = Cell::new(0);
        {
            let mut guard = ScopedResource::new(|| calls.set(calls.get() + 1), ());
            guard.fire(Strategy::Again).fire(Strategy::Again);
            assert!(guard.is_armed());
            assert_eq!(calls.get(), 2);
        }
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn fire_again_on_disarmed_rearms_without_invoking() {
        let calls = Cell::new(0);
        {
            let mut guard = ScopedResource::new(|| calls.set(calls.get() + 1), ());
            guard.release();
            guard.fire(Strategy::Again);
            assert_eq!(calls.get(), 0);
            assert!(guard.is_armed());
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn default_strategy_is_once() {
        assert_eq!(Strategy::default(), Strategy::Once);
    }

    #[test]
    fn release_returns_first_and_disarms() {
        let calls = Cell::new(0);
        {
            let mut guard = ScopedResource::new(
                |_: &String, _: &u8| calls.set(calls.get() + 1),
                (String::from("handle"), 2),
            );
            assert_eq!(guard.release(), "handle");
            assert!(!guard.is_armed());
            assert_eq!(guard.get::<0>(), "handle");
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn release_without_resources_yields_false() {
        let calls = Cell::new(0);
        {
            let mut guard = ScopedResource::new(|| calls.set(calls.get() + 1), ());
            assert!(!guard.release());
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn release_all_returns_tuple_and_disarms() {
        let calls = Cell::new(0);
        {
            let mut guard =
                ScopedResource::new(|_: &i32, _: &i32| calls.set(calls.get() + 1), (1, 2));
            assert_eq!(guard.release_all(), (1, 2));
            assert_eq!(*guard.resources(), (1, 2));
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn into_resources_moves_out_without_firing() {
        let calls = Cell::new(0);
        let guard = ScopedResource::new(
            |_: &Vec<u8>| calls.set(calls.get() + 1),
            (vec![1_u8, 2, 3],),
        );
        let (bytes,) = guard.into_resources();
        assert_eq!(bytes, [1, 2, 3]);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn into_parts_returns_working_disposer() {
        let seen = RefCell::new(Vec::new());
        let guard = ScopedResource::new(|v: &i32| seen.borrow_mut().push(*v), (4,));
        let (mut disposer, resources) = guard.into_parts();
        assert!(seen.borrow().is_empty());
        disposer.dispose(&resources);
        assert_eq!(*seen.borrow(), [4]);
    }

    #[test]
    fn reset_disposes_old_and_binds_new() {
        let seen = RefCell::new(Vec::new());
        {
            let mut guard =
                ScopedResource::new(|s: &&'static str| seen.borrow_mut().push(*s), ("A",));
            guard.reset(("B",));
            assert_eq!(*seen.borrow(), ["A"]);
            assert_eq!(*guard, "B");
        }
        assert_eq!(*seen.borrow(), ["A", "B"]);
    }

    #[test]
    fn reset_rearms_disarmed_guard() {
        let seen = RefCell::new(Vec::new());
        {
            let mut guard = ScopedResource::new(|v: &i32| seen.borrow_mut().push(*v), (1,));
            guard.release();
            guard.reset((2,));
            assert!(guard.is_armed());
            assert!(seen.borrow().is_empty());
        }
        assert_eq!(*seen.borrow(), [2]);
    }

    #[test]
    fn accessors_reach_first_resource() {
        let mut guard = ScopedResource::new(|_: &u32, _: &char| {}, (10_u32, 'x'));
        assert_eq!(guard.value(), 10);
        assert_eq!(*guard, 10);
        assert_eq!(*guard.get::<1>(), 'x');

        *guard.slot() = 11;
        *guard.get_mut::<1>() = 'y';
        assert_eq!(*guard.resources(), (11, 'y'));
        guard.release();
    }

    #[test]
    fn slot_coerces_to_raw_pointer() {
        fn open_into(out: *mut i32) {
            // SAFETY: callers pass a valid, exclusive pointer.
            unsafe { out.write(42) };
        }

        let mut guard = ScopedResource::with_armed(|_: &i32| {}, (-1,), false);
        open_into(guard.slot());
        assert_eq!(guard.value(), 42);
    }

    #[test]
    fn follow_mut_writes_through_pointer() {
        let mut backing = Vec::new();
        {
            let mut guard = ScopedResource::new(|_: &&mut Vec<u8>| {}, (&mut backing,));
            guard.follow_mut().push(1);
            assert_eq!(guard.follow().as_slice(), [1]);
            assert_eq!(guard.len(), 1);
        }
        assert_eq!(backing, [1]);
    }

    #[test]
    fn disposer_can_be_replaced() {
        let seen = RefCell::new(Vec::new());
        {
            let disposer: Box<dyn FnMut(&i32) + '_> =
                Box::new(|_: &i32| seen.borrow_mut().push("old"));
            let mut guard = ScopedResource::new(disposer, (1,));
            *guard.disposer_mut() = Box::new(|_: &i32| seen.borrow_mut().push("new"));
        }
        assert_eq!(*seen.borrow(), ["new"]);
    }

    #[test]
    fn disposer_fault_is_swallowed() {
        let calls = Cell::new(0);
        {
            let _failing =
                ScopedResource::new(|| -> Result<(), String> { Err("close failed".into()) }, ());
            let _counting = ScopedResource::new(|| calls.set(calls.get() + 1), ());
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn disposer_panic_is_swallowed() {
        fn explode() {
            panic!("disposer blew up");
        }

        let calls = Cell::new(0);
        {
            let _after = ScopedResource::new(|| calls.set(calls.get() + 1), ());
            let _panicking = ScopedResource::new(explode, ());
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn debug_shows_resources_and_state() {
        let guard = ScopedResource::with_armed(|_: &i32| {}, (3,), false);
        let debug = format!("{guard:?}");
        assert!(debug.contains("resources: (3,)"));
        assert!(debug.contains("armed: false"));
    }
}
