//! The diff/patch algorithms themselves.

use crate::chunk::Chunk;
use crate::error::DiffError;
use crate::header::{Header, DEFAULT_PAGE_SIZE, WIRE_VERSION};

/// A page-granular diff between a base and a target image: a header, the
/// sorted list of changed-page chunks, and the concatenated payload bytes
/// of those chunks in ascending page-index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    pub header: Header,
    pub chunks: Vec<Chunk>,
    pub payload: Vec<u8>,
}

impl DiffResult {
    /// Page indices of every changed page, in the order chunks appear
    /// (ascending page index, by construction of [`diff`]).
    #[must_use]
    pub fn changed_set(&self) -> Vec<u64> {
        self.chunks.iter().map(|c| c.page_index).collect()
    }

    /// As [`Self::changed_set`], but fails instead of silently truncating
    /// when `capacity` cannot hold every page index — mirrors the ABI
    /// layer's `read_changed_set(&diff, &mut out_pages[cap], ...)`.
    pub fn changed_set_with_capacity(&self, capacity: usize) -> Result<Vec<u64>, DiffError> {
        if capacity < self.chunks.len() {
            return Err(DiffError::CapacityTooSmall {
                capacity,
                chunk_count: self.chunks.len(),
            });
        }
        Ok(self.changed_set())
    }
}

fn is_power_of_two(value: u32) -> bool {
    value != 0 && value & (value - 1) == 0
}

/// Computes the page-granular diff that reconstructs `target` from `base`.
///
/// Two traversals, as the source design mandates: the first sizes the
/// chunk array and payload buffer exactly; the second fills them. This
/// avoids any allocator-dependent growth strategy, keeping the result a
/// pure function of `(base, target, page_size)`.
///
/// # Panics
/// Never panics; an invalid `page_size` is reported through the return
/// value of callers that validate it (see [`diff_checked`]). This
/// function assumes `page_size` is already a nonzero power of two.
#[must_use]
pub fn diff(base: &[u8], target: &[u8], page_size: u32) -> DiffResult {
    diff_checked(base, target, page_size).expect("page_size must be validated by the caller")
}

/// As [`diff`], but validates `page_size` instead of assuming it.
pub fn diff_checked(base: &[u8], target: &[u8], page_size: u32) -> Result<DiffResult, DiffError> {
    if !is_power_of_two(page_size) {
        return Err(DiffError::InvalidPageSize(page_size));
    }
    let page_size_usize = page_size as usize;
    let target_length = target.len() as u64;
    let max_len = base.len().max(target.len());
    let page_count = max_len.div_ceil(page_size_usize);

    let is_changed = |p: usize| -> Option<(usize, usize)> {
        let start = p * page_size_usize;
        if start >= target.len() {
            return None;
        }
        let end = (start + page_size_usize).min(target.len());
        let changed = (start..end).any(|i| {
            let t = target[i];
            let b = base.get(i).copied().unwrap_or(0);
            t != b
        });
        changed.then_some((start, end))
    };

    let mut chunk_count = 0usize;
    let mut payload_len = 0usize;
    for p in 0..page_count {
        if let Some((start, end)) = is_changed(p) {
            chunk_count += 1;
            payload_len += end - start;
        }
    }

    let mut chunks = Vec::with_capacity(chunk_count);
    let mut payload = Vec::with_capacity(payload_len);
    for p in 0..page_count {
        if let Some((start, end)) = is_changed(p) {
            let data_offset = payload.len() as u64;
            payload.extend_from_slice(&target[start..end]);
            chunks.push(Chunk {
                page_index: p as u64,
                length: (end - start) as u64,
                data_offset,
            });
        }
    }

    tracing::debug!(
        base_len = base.len(),
        target_len = target.len(),
        page_size,
        chunk_count,
        "computed diff"
    );

    Ok(DiffResult {
        header: Header {
            version: WIRE_VERSION,
            page_size,
            flags: 0,
            chunk_count: chunks.len() as u32,
            target_length,
        },
        chunks,
        payload,
    })
}

/// Convenience wrapper over [`diff_checked`] using the default page size.
#[must_use]
pub fn diff_default(base: &[u8], target: &[u8]) -> DiffResult {
    diff_checked(base, target, DEFAULT_PAGE_SIZE).expect("DEFAULT_PAGE_SIZE is a valid power of two")
}

pub(crate) fn validate_chunks(header: &Header, chunks: &[Chunk], payload_len: usize) -> Result<(), DiffError> {
    if !is_power_of_two(header.page_size) {
        return Err(DiffError::InvalidPageSize(header.page_size));
    }
    let page_size = u64::from(header.page_size);
    for (index, chunk) in chunks.iter().enumerate() {
        if chunk.length > page_size {
            return Err(DiffError::ChunkExceedsPageSize {
                index,
                length: chunk.length,
                page_size: header.page_size,
            });
        }
        let end = chunk
            .page_index
            .checked_mul(page_size)
            .and_then(|start| start.checked_add(chunk.length));
        match end {
            Some(end) if end <= header.target_length => {}
            _ => {
                return Err(DiffError::ChunkExceedsTarget {
                    index,
                    page_index: chunk.page_index,
                    page_size: header.page_size,
                    length: chunk.length,
                    target_length: header.target_length,
                })
            }
        }
        let payload_end = chunk.data_offset.checked_add(chunk.length);
        match payload_end {
            Some(end) if end <= payload_len as u64 => {}
            _ => {
                return Err(DiffError::ChunkExceedsPayload {
                    index,
                    data_offset: chunk.data_offset,
                    length: chunk.length,
                    payload_length: payload_len as u64,
                })
            }
        }
    }
    Ok(())
}

/// Reconstructs the target image from `base` and a previously computed
/// diff. The correctness contract: for any inputs, `patch(base,
/// diff(base, target))` equals `target` byte-for-byte, truncated or
/// zero-extended to `diff.header.target_length`.
pub fn patch(base: &[u8], diff_result: &DiffResult) -> Result<Vec<u8>, DiffError> {
    validate_chunks(&diff_result.header, &diff_result.chunks, diff_result.payload.len())?;

    let target_length = diff_result.header.target_length as usize;
    let mut buffer = vec![0u8; target_length];

    let carried_over = base.len().min(target_length);
    buffer[..carried_over].copy_from_slice(&base[..carried_over]);

    for chunk in &diff_result.chunks {
        let dst_start = (chunk.page_index * u64::from(diff_result.header.page_size)) as usize;
        let length = chunk.length as usize;
        let src_start = chunk.data_offset as usize;
        buffer[dst_start..dst_start + length]
            .copy_from_slice(&diff_result.payload[src_start..src_start + length]);
    }

    Ok(buffer)
}
