//! Failure modes of the diff/patch codec.

use thiserror::Error;

/// Errors returned by [`crate::patch`] and the wire (de)serializer.
///
/// Distinct variants exist for caller debugging even though the ABI layer
/// collapses all of them to the same negative return code (per the
/// external-interface error-propagation policy: the diff engine never
/// produces diagnostics, only a pass/fail signal).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    #[error("chunk {index} page_index {page_index} * page_size {page_size} + length {length} exceeds target_length {target_length}")]
    ChunkExceedsTarget {
        index: usize,
        page_index: u64,
        page_size: u32,
        length: u64,
        target_length: u64,
    },

    #[error("chunk {index} data_offset {data_offset} + length {length} exceeds payload_length {payload_length}")]
    ChunkExceedsPayload {
        index: usize,
        data_offset: u64,
        length: u64,
        payload_length: u64,
    },

    #[error("chunk {index} length {length} exceeds page_size {page_size}")]
    ChunkExceedsPageSize {
        index: usize,
        length: u64,
        page_size: u32,
    },

    #[error("page_size must be a nonzero power of two, got {0}")]
    InvalidPageSize(u32),

    #[error("caller-supplied capacity {capacity} is smaller than chunk_count {chunk_count}")]
    CapacityTooSmall { capacity: usize, chunk_count: usize },

    #[error("buffer truncated while reading {field}: need {need} bytes, have {have}")]
    Truncated {
        field: &'static str,
        need: usize,
        have: usize,
    },

    #[error("unsupported diff wire format version {0}")]
    UnsupportedVersion(u32),
}
