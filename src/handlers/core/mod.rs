//! Core handler infrastructure: the handler context, the handler trait and
//! the two-table dispatch registry.

pub mod context;
pub mod registry;

pub use context::{Context, Handler};
pub use registry::Registry;
