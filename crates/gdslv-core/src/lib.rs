//! Single-pass verifier over the GDSL abstract machine Γ.
//!
//! The only public entry point is [`verify`]. Everything else —
//! [`Machine`], the per-opcode judgment rules — is an implementation
//! detail exposed where it is useful for embedding ([`Machine`] fields
//! are public so a host can inspect post-verification state for
//! debugging) but not part of the stability contract.
#![forbid(unsafe_code)]

mod config;
mod diagnostics;
mod machine;
mod verify;

pub use config::{ConformanceLevel, VerifyConfig};
pub use diagnostics::{Diagnostic, Report, Severity, DEFAULT_CAPACITY};
pub use machine::{Checkpoint, FenceId, LabelId, Machine, ResourceId, ResourceRecord};
pub use verify::verify;

pub use gdslv_opcodes::{Domain, Phase};
