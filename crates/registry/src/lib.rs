//! Asset registry, permission registry, call dispatch, and output sinks.

mod allocator;
pub mod assets;
pub mod call;
pub mod permissions;
pub mod registry;
pub mod shared;
pub mod sink;

pub use call::{Call, CallOutput};
pub use registry::Registry;
pub use shared::SharedRegistry;
