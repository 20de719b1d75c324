//! Page-granular binary diff and patch codec for snapshot images.
//!
//! [`diff`] computes a sparse description of the bytes that differ
//! between a base and a target image; [`patch`] reconstructs the target
//! from a base and that description. Both are pure functions of their
//! arguments — no allocator-address-dependent behavior, no hidden state.
#![forbid(unsafe_code)]

mod chunk;
mod engine;
mod error;
mod header;
mod wire;

pub use chunk::Chunk;
pub use engine::{diff, diff_checked, diff_default, patch, DiffResult};
pub use error::DiffError;
pub use header::{Header, DEFAULT_PAGE_SIZE, WIRE_VERSION};
