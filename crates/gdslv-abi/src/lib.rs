//! C-ABI boundary over [`gdslv_core`] and [`gdslv_diff`].
//!
//! ```text
//! C caller -> extern "C" entry (this crate) -> safe core/diff crates -> return
//! ```
//!
//! Every entry point here null-checks the pointers it is about to
//! dereference and never lets a panic unwind across the boundary (see
//! [`panic_guard::guard`]). This is the only crate in the workspace where
//! `unsafe` is permitted — every other crate forbids it outright.
#![allow(clippy::missing_safety_doc)]

mod diff_ffi;
mod panic_guard;
mod report;

pub use diff_ffi::{
    gdslv_destroy_diff, gdslv_diff, gdslv_patch, gdslv_read_changed_set, gdslv_release_buffer,
    CChunk, CDiffResult,
};
pub use panic_guard::{
    STATUS_CAPACITY_TOO_SMALL, STATUS_INVALID_ARGUMENT, STATUS_INVARIANT_VIOLATION,
    STATUS_NULL_POINTER, STATUS_OK, STATUS_PANIC,
};
pub use report::{gdslv_verify, CDiagnostic, CReport, CSeverity, MESSAGE_CAPACITY};

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn verify_rejects_null_report_pointer() {
        let status = unsafe { gdslv_verify(ptr::null(), 0, 2, ptr::null_mut()) };
        assert_eq!(status, STATUS_NULL_POINTER);
    }

    #[test]
    fn verify_accepts_empty_stream_and_reports_unfinished() {
        let mut report = CReport {
            success: 0,
            instruction_count: 0,
            info_count: 0,
            warning_count: 0,
            error_count: 0,
            diagnostic_count: 0,
            diagnostics: ptr::null_mut(),
            diagnostics_capacity: 0,
            diagnostics_written: 0,
        };
        let status = unsafe { gdslv_verify(ptr::null(), 0, 2, &mut report) };
        assert_eq!(status, STATUS_OK);
        assert_eq!(report.success, 0);
    }

    #[test]
    fn diff_patch_round_trip_through_the_c_abi() {
        let base = vec![0u8; 256];
        let mut target = base.clone();
        target[10..20].fill(9);

        let mut diff_result = CDiffResult {
            version: 0,
            page_size: 0,
            flags: 0,
            chunk_count: 0,
            target_length: 0,
            chunks: ptr::null_mut(),
            payload: ptr::null_mut(),
            payload_length: 0,
        };
        let status = unsafe {
            gdslv_diff(
                base.as_ptr(),
                base.len(),
                target.as_ptr(),
                target.len(),
                16,
                &mut diff_result,
            )
        };
        assert_eq!(status, STATUS_OK);

        let mut out_buffer: *mut u8 = ptr::null_mut();
        let mut out_length: u64 = 0;
        let status = unsafe {
            gdslv_patch(
                base.as_ptr(),
                base.len(),
                &diff_result,
                &mut out_buffer,
                &mut out_length,
            )
        };
        assert_eq!(status, STATUS_OK);
        let patched = unsafe { std::slice::from_raw_parts(out_buffer, out_length as usize) };
        assert_eq!(patched, target.as_slice());

        unsafe {
            gdslv_release_buffer(out_buffer, out_length);
            gdslv_destroy_diff(&mut diff_result);
        }
        assert!(diff_result.chunks.is_null());
    }

    #[test]
    fn read_changed_set_rejects_undersized_capacity() {
        let base = vec![0u8; 64];
        let mut target = base.clone();
        target[0] = 1;
        let mut diff_result = CDiffResult {
            version: 0,
            page_size: 0,
            flags: 0,
            chunk_count: 0,
            target_length: 0,
            chunks: ptr::null_mut(),
            payload: ptr::null_mut(),
            payload_length: 0,
        };
        unsafe {
            gdslv_diff(base.as_ptr(), base.len(), target.as_ptr(), target.len(), 16, &mut diff_result);
        }
        let mut out_count = 0u64;
        let status = unsafe { gdslv_read_changed_set(&diff_result, ptr::null_mut(), 0, &mut out_count) };
        assert_eq!(status, STATUS_CAPACITY_TOO_SMALL);
        unsafe { gdslv_destroy_diff(&mut diff_result) };
    }
}
