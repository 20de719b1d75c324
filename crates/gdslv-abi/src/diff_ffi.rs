//! `diff()` / `patch()` / `read_changed_set()` / `destroy()` and their
//! C-ABI diff-result representation.

use std::slice;

use gdslv_diff::{Chunk, DiffResult, Header};

use crate::panic_guard::{
    guard, STATUS_CAPACITY_TOO_SMALL, STATUS_INVALID_ARGUMENT, STATUS_INVARIANT_VIOLATION,
    STATUS_NULL_POINTER, STATUS_OK,
};

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CChunk {
    pub page_index: u64,
    pub length: u64,
    pub data_offset: u64,
}

/// Owning C-ABI mirror of [`gdslv_diff::DiffResult`]. `chunks` and
/// `payload` are heap allocations owned by this value; a caller must pass
/// it to [`gdslv_destroy_diff`] exactly once (idempotently safe to call
/// again on an already-destroyed value).
#[repr(C)]
pub struct CDiffResult {
    pub version: u32,
    pub page_size: u32,
    pub flags: u32,
    pub chunk_count: u32,
    pub target_length: u64,
    pub chunks: *mut CChunk,
    pub payload: *mut u8,
    pub payload_length: u64,
}

impl CDiffResult {
    fn empty() -> Self {
        Self {
            version: 0,
            page_size: 0,
            flags: 0,
            chunk_count: 0,
            target_length: 0,
            chunks: std::ptr::null_mut(),
            payload: std::ptr::null_mut(),
            payload_length: 0,
        }
    }

    fn from_owned(result: DiffResult) -> Self {
        let chunk_count = result.chunks.len() as u32;
        let c_chunks: Vec<CChunk> = result
            .chunks
            .iter()
            .map(|c| CChunk {
                page_index: c.page_index,
                length: c.length,
                data_offset: c.data_offset,
            })
            .collect();
        let chunks_boxed = c_chunks.into_boxed_slice();
        let chunks = if chunks_boxed.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(chunks_boxed) as *mut CChunk
        };

        let payload_length = result.payload.len() as u64;
        let payload_boxed = result.payload.into_boxed_slice();
        let payload = if payload_boxed.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(payload_boxed) as *mut u8
        };

        Self {
            version: result.header.version,
            page_size: result.header.page_size,
            flags: result.header.flags,
            chunk_count,
            target_length: result.header.target_length,
            chunks,
            payload,
            payload_length,
        }
    }

    /// Builds an owned, borrow-free [`DiffResult`] copy for feeding to
    /// `gdslv_diff::patch`/`read_changed_set`. Cheap relative to the
    /// validation work those functions already do.
    unsafe fn to_owned_diff_result(&self) -> DiffResult {
        let chunks = if self.chunk_count == 0 || self.chunks.is_null() {
            Vec::new()
        } else {
            unsafe { slice::from_raw_parts(self.chunks, self.chunk_count as usize) }
                .iter()
                .map(|c| Chunk {
                    page_index: c.page_index,
                    length: c.length,
                    data_offset: c.data_offset,
                })
                .collect()
        };
        let payload = if self.payload_length == 0 || self.payload.is_null() {
            Vec::new()
        } else {
            unsafe { slice::from_raw_parts(self.payload, self.payload_length as usize) }.to_vec()
        };
        DiffResult {
            header: Header {
                version: self.version,
                page_size: self.page_size,
                flags: self.flags,
                chunk_count: self.chunk_count,
                target_length: self.target_length,
            },
            chunks,
            payload,
        }
    }
}

/// Computes the page-granular diff from `base` to `target`, writing an
/// owning [`CDiffResult`] to `*out`.
///
/// # Safety
/// `base`/`target` must be valid for reads of `base_len`/`target_len`
/// bytes respectively (or the corresponding length is `0`). `out` must be
/// a valid, non-null, properly aligned, writable pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gdslv_diff(
    base: *const u8,
    base_len: usize,
    target: *const u8,
    target_len: usize,
    page_size: u32,
    out: *mut CDiffResult,
) -> i32 {
    guard(|| {
        if out.is_null() {
            return STATUS_NULL_POINTER;
        }
        if (base.is_null() && base_len != 0) || (target.is_null() && target_len != 0) {
            return STATUS_NULL_POINTER;
        }
        let base = if base_len == 0 {
            &[][..]
        } else {
            unsafe { slice::from_raw_parts(base, base_len) }
        };
        let target = if target_len == 0 {
            &[][..]
        } else {
            unsafe { slice::from_raw_parts(target, target_len) }
        };

        match gdslv_diff::diff_checked(base, target, page_size) {
            Ok(result) => {
                unsafe { *out = CDiffResult::from_owned(result) };
                STATUS_OK
            }
            Err(_) => STATUS_INVALID_ARGUMENT,
        }
    })
}

/// Reconstructs the target image described by `*diff_result` from `base`,
/// writing a freshly allocated buffer to `*out_buffer`/`*out_length`.
/// The caller must release it with [`gdslv_release_buffer`].
///
/// # Safety
/// Same pointer-validity requirements as [`gdslv_diff`], plus
/// `diff_result` must point to a live [`CDiffResult`] (as produced by
/// [`gdslv_diff`] or parsed from the wire format) not yet destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gdslv_patch(
    base: *const u8,
    base_len: usize,
    diff_result: *const CDiffResult,
    out_buffer: *mut *mut u8,
    out_length: *mut u64,
) -> i32 {
    guard(|| {
        if diff_result.is_null() || out_buffer.is_null() || out_length.is_null() {
            return STATUS_NULL_POINTER;
        }
        if base.is_null() && base_len != 0 {
            return STATUS_NULL_POINTER;
        }
        let base = if base_len == 0 {
            &[][..]
        } else {
            unsafe { slice::from_raw_parts(base, base_len) }
        };

        let owned = unsafe { (*diff_result).to_owned_diff_result() };
        match gdslv_diff::patch(base, &owned) {
            Ok(buffer) => {
                let len = buffer.len() as u64;
                let boxed = buffer.into_boxed_slice();
                let ptr = if boxed.is_empty() {
                    std::ptr::null_mut()
                } else {
                    Box::into_raw(boxed) as *mut u8
                };
                unsafe {
                    *out_buffer = ptr;
                    *out_length = len;
                }
                STATUS_OK
            }
            Err(_) => STATUS_INVARIANT_VIOLATION,
        }
    })
}

/// Writes every changed page index from `*diff_result` into
/// `out_pages[..out_pages_capacity]`, and the count written to
/// `*out_count`. Fails with [`STATUS_CAPACITY_TOO_SMALL`] if
/// `out_pages_capacity` is smaller than the diff's `chunk_count`.
///
/// # Safety
/// `diff_result` must point to a live [`CDiffResult`]. `out_pages` must
/// be valid for writes of `out_pages_capacity` `u64`s (or the capacity is
/// `0`). `out_count` must be a valid, non-null pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gdslv_read_changed_set(
    diff_result: *const CDiffResult,
    out_pages: *mut u64,
    out_pages_capacity: u64,
    out_count: *mut u64,
) -> i32 {
    guard(|| {
        if diff_result.is_null() || out_count.is_null() {
            return STATUS_NULL_POINTER;
        }
        let diff_result = unsafe { &*diff_result };
        let chunk_count = diff_result.chunk_count as u64;
        if out_pages_capacity < chunk_count {
            return STATUS_CAPACITY_TOO_SMALL;
        }
        if chunk_count > 0 && out_pages.is_null() {
            return STATUS_NULL_POINTER;
        }

        if chunk_count > 0 {
            let dst = unsafe { slice::from_raw_parts_mut(out_pages, chunk_count as usize) };
            let src = unsafe { slice::from_raw_parts(diff_result.chunks, chunk_count as usize) };
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d = s.page_index;
            }
        }
        unsafe { *out_count = chunk_count };
        STATUS_OK
    })
}

/// Idempotently releases the heap storage owned by `*diff_result`. Safe
/// to call more than once on the same value.
///
/// # Safety
/// `diff_result` must be a valid, non-null pointer to a [`CDiffResult`]
/// not concurrently in use.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gdslv_destroy_diff(diff_result: *mut CDiffResult) -> i32 {
    guard(|| {
        if diff_result.is_null() {
            return STATUS_NULL_POINTER;
        }
        let value = unsafe { &mut *diff_result };
        if !value.chunks.is_null() {
            let boxed: Box<[CChunk]> = unsafe {
                Box::from_raw(slice::from_raw_parts_mut(value.chunks, value.chunk_count as usize))
            };
            drop(boxed);
        }
        if !value.payload.is_null() {
            let boxed: Box<[u8]> = unsafe {
                Box::from_raw(slice::from_raw_parts_mut(value.payload, value.payload_length as usize))
            };
            drop(boxed);
        }
        *value = CDiffResult::empty();
        STATUS_OK
    })
}

/// Releases a buffer previously returned by [`gdslv_patch`] in
/// `*out_buffer`/`*out_length`.
///
/// # Safety
/// `buffer` must be exactly the pointer `gdslv_patch` wrote, `length`
/// exactly the length it wrote, and the buffer must not already have
/// been released.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gdslv_release_buffer(buffer: *mut u8, length: u64) -> i32 {
    guard(|| {
        if buffer.is_null() {
            return if length == 0 { STATUS_OK } else { STATUS_NULL_POINTER };
        }
        let boxed: Box<[u8]> = unsafe { Box::from_raw(slice::from_raw_parts_mut(buffer, length as usize)) };
        drop(boxed);
        STATUS_OK
    })
}
