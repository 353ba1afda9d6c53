//! Variadic scope-bound resource cleanup.
//!
//! `scoped_core` provides one guard type, [`ScopedResource`], that replaces
//! the usual family of RAII helpers:
//!
//! - [`scope_exit`] - run a closure at scope end (no resources)
//! - [`make_scoped_resource`] - guard any tuple of resources with a disposer
//! - [`make_scoped_resource_checked`] - guard a handle unless it equals a sentinel
//!
//! # Modules
//!
//! - [`dispose`] - unpacking resource tuples into disposer calls
//! - [`element`] - compile-time tuple indexing
//! - [`error`] - disposer fault handling
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use scoped_core::{make_scoped_resource, Strategy};
//!
//! let calls = RefCell::new(Vec::new());
//! {
//!     let mut channel = make_scoped_resource(
//!         |fd: &i32, text: &&str| calls.borrow_mut().push(format!("{fd}:{text}")),
//!         (7, "bye"),
//!     );
//!     channel.fire(Strategy::Again);
//! }
//! assert_eq!(*calls.borrow(), ["7:bye", "7:bye"]);
//! ```
//!
//! # Faults
//!
//! Disposers run during unwinding-sensitive cleanup, so nothing they do
//! escapes: error outcomes and panics are logged through `tracing` and
//! discarded.

/// Unpacking resource tuples into disposer calls.
pub mod dispose;

/// Compile-time tuple indexing.
pub mod element;

/// Disposer fault handling.
pub mod error;

mod factory;
mod resource;

pub use factory::{make_scoped_resource, make_scoped_resource_checked, scope_exit};
pub use resource::{ScopedResource, Strategy};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::dispose::Disposer;
    pub use crate::error::{DisposeOutcome, DisposerFault};
    pub use crate::{
        ScopedResource, Strategy, make_scoped_resource, make_scoped_resource_checked, scope_exit,
    };
}
