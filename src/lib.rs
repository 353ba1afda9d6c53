//! One variadic scope guard for handles, bundles and scope-exit actions.
//!

pub use scoped_core::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use scoped_core::prelude::*;
}
