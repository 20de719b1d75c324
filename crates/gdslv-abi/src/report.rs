//! `verify()` and its C-ABI report types.

use std::slice;

use gdslv_core::{ConformanceLevel, VerifyConfig};

use crate::panic_guard::{guard, STATUS_NULL_POINTER, STATUS_OK};

/// Longest message a [`CDiagnostic`] can carry; longer messages are
/// truncated on copy. Mirrors spec §6's `message[≤M]` fixed buffer.
pub const MESSAGE_CAPACITY: usize = 256;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CSeverity {
    Info = 0,
    Warning = 1,
    Error = 2,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CDiagnostic {
    pub instruction_index: u64,
    pub severity: i32,
    pub message: [u8; MESSAGE_CAPACITY],
    pub message_len: u32,
}

impl CDiagnostic {
    fn from_core(diag: &gdslv_core::Diagnostic) -> Self {
        let mut message = [0u8; MESSAGE_CAPACITY];
        let bytes = diag.message.as_bytes();
        let len = bytes.len().min(MESSAGE_CAPACITY);
        message[..len].copy_from_slice(&bytes[..len]);
        Self {
            instruction_index: diag.instruction_index as u64,
            severity: match diag.severity {
                gdslv_core::Severity::Info => CSeverity::Info as i32,
                gdslv_core::Severity::Warning => CSeverity::Warning as i32,
                gdslv_core::Severity::Error => CSeverity::Error as i32,
            },
            message,
            message_len: len as u32,
        }
    }
}

/// Caller-owned report. `diagnostics`/`diagnostics_capacity` name a
/// caller-allocated array of `diagnostics_capacity` [`CDiagnostic`]
/// entries; `verify` writes up to that many, in instruction order, and
/// sets `diagnostics_written` to how many it actually wrote.
#[repr(C)]
pub struct CReport {
    pub success: i32,
    pub instruction_count: u64,
    pub info_count: u64,
    pub warning_count: u64,
    pub error_count: u64,
    pub diagnostic_count: u64,
    pub diagnostics: *mut CDiagnostic,
    pub diagnostics_capacity: u64,
    pub diagnostics_written: u64,
}

fn level_from_i32(level: i32) -> Option<ConformanceLevel> {
    match level {
        0 => Some(ConformanceLevel::Syntax),
        1 => Some(ConformanceLevel::Phase),
        2 => Some(ConformanceLevel::Domain),
        _ => None,
    }
}

/// Verifies the `length`-byte stream at `stream` and writes the result
/// into `*report`.
///
/// Returns `0` on completion regardless of verification outcome — inspect
/// `(*report).success`. Returns a negative status only for a catastrophic
/// invocation error: a null `report` pointer, a null `stream` pointer
/// with nonzero `length`, or an unrecognized `level`.
///
/// # Safety
/// `stream` must be valid for reads of `length` bytes (or `length == 0`).
/// `report` must be a valid, non-null, properly aligned pointer to a
/// `CReport` whose `diagnostics` field (if `diagnostics_capacity > 0`)
/// points to a caller-allocated array of at least `diagnostics_capacity`
/// `CDiagnostic` slots, valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gdslv_verify(
    stream: *const u8,
    length: usize,
    level: i32,
    report: *mut CReport,
) -> i32 {
    guard(|| {
        if report.is_null() {
            return STATUS_NULL_POINTER;
        }
        if stream.is_null() && length != 0 {
            return STATUS_NULL_POINTER;
        }
        let Some(level) = level_from_i32(level) else {
            return crate::panic_guard::STATUS_INVALID_ARGUMENT;
        };

        let bytes = if length == 0 {
            &[][..]
        } else {
            unsafe { slice::from_raw_parts(stream, length) }
        };

        let config = VerifyConfig {
            level,
            ..VerifyConfig::default()
        };
        let result = gdslv_core::verify(bytes, &config);

        let report_ref = unsafe { &mut *report };
        report_ref.success = i32::from(result.success);
        report_ref.instruction_count = result.instruction_count as u64;
        report_ref.info_count = result.info_count as u64;
        report_ref.warning_count = result.warning_count as u64;
        report_ref.error_count = result.error_count as u64;
        report_ref.diagnostic_count = result.diagnostic_count() as u64;

        let capacity = report_ref.diagnostics_capacity as usize;
        let written = if capacity == 0 || report_ref.diagnostics.is_null() {
            0
        } else {
            let out = unsafe { slice::from_raw_parts_mut(report_ref.diagnostics, capacity) };
            let mut written = 0usize;
            for (slot, diag) in out.iter_mut().zip(result.diagnostics.iter()) {
                *slot = CDiagnostic::from_core(diag);
                written += 1;
            }
            written
        };
        report_ref.diagnostics_written = written as u64;

        STATUS_OK
    })
}
