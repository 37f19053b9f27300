//! phonodrill-store — progress persistence backends.
//!
//! Two implementations of the `ProgressStore` trait: an in-memory map for
//! tests and ephemeral sessions, and a JSON file store for the CLI. Both
//! enforce the same versioned compare-and-swap write contract.

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;
