//! Construction helpers that spare callers from spelling the guard type.

use crate::dispose::Disposer;
use crate::resource::ScopedResource;

/// Binds `disposer` to `resources` and arms it.
///
/// Pass `()` for a pure scope-exit action, `(value,)` for a single
/// resource, or a larger tuple whose elements the disposer receives in
/// order.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use scoped_core::make_scoped_resource;
///
/// let log = RefCell::new(Vec::new());
/// {
///     let _done = make_scoped_resource(|| log.borrow_mut().push("done"), ());
///     log.borrow_mut().push("before");
/// }
/// assert_eq!(*log.borrow(), ["before", "done"]);
/// ```
pub fn make_scoped_resource<D, R>(disposer: D, resources: R) -> ScopedResource<D, R>
where
    D: Disposer<R>,
{
    ScopedResource::new(disposer, resources)
}

/// Binds `disposer` to a single handle, armed only if `resource != invalid`.
///
/// Covers the "close it only if it was opened" idiom: the sentinel that an
/// acquiring call returns on failure (`-1` for a file descriptor, a null
/// handle) yields a disarmed guard.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use scoped_core::make_scoped_resource_checked;
///
/// let closes = Cell::new(0);
/// {
///     let fd = make_scoped_resource_checked(|_: &i32| closes.set(closes.get() + 1), -1, -1);
///     assert!(!fd.is_armed());
/// }
/// assert_eq!(closes.get(), 0);
/// ```
pub fn make_scoped_resource_checked<D, T>(
    disposer: D,
    resource: T,
    invalid: T,
) -> ScopedResource<D, (T,)>
where
    D: Disposer<(T,)>,
    T: PartialEq,
{
    let armed = resource != invalid;
    if !armed {
        tracing::debug!(
            resource = core::any::type_name::<T>(),
            "resource matches invalid sentinel, guard created disarmed"
        );
    }
    ScopedResource::with_armed(disposer, (resource,), armed)
}

/// Runs `action` when the returned guard leaves scope.
///
/// Shorthand for `make_scoped_resource(action, ())`.
pub fn scope_exit<D>(action: D) -> ScopedResource<D, ()>
where
    D: Disposer<()>,
{
    ScopedResource::new(action, ())
}
