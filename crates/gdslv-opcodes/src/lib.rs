//! Opcode metadata for the GDSL command stream.
//!
//! This crate holds nothing but static data: the discrete [`Phase`]/
//! [`Domain`] enums of the abstract machine and the fixed opcode table
//! (name, instruction size, phase-validity). It has no notion of a
//! stream, a verifier, or a diagnostic — those live in `gdslv-core`,
//! which depends on this crate rather than the other way around.
#![forbid(unsafe_code)]

mod opcode;
mod phase;

pub use opcode::{
    display_name, is_reserved_vendor_range, lookup, OpcodeInfo, HASH_FIELD_WIDTH, OPERAND_WORD,
    SIZE_FIELD_WIDTH, STREAM_PTR_WIDTH,
    OP_ADD, OP_ALLOC_BUFFER, OP_ALLOC_IMAGE, OP_ASSERT_IDLE, OP_BARRIER, OP_BEGIN_PASS,
    OP_BEGIN_STREAM, OP_BIND_INDEX, OP_BIND_VERTEX, OP_CALL, OP_CHECKPOINT, OP_CLEAR,
    OP_CONST_LOAD, OP_COPY_BUFFER, OP_COPY_IMAGE, OP_DIV, OP_DISPATCH, OP_DOWNLOAD, OP_DRAW,
    OP_ELSE, OP_END_PASS, OP_END_PROGRAM, OP_END_STREAM, OP_ENDIF, OP_ENDLOOP, OP_EVENT_SIGNAL,
    OP_EVENT_WAIT, OP_FENCE_WAIT, OP_FREE_BUFFER, OP_FREE_IMAGE, OP_IF, OP_INCLUDE, OP_LOG,
    OP_LOOP, OP_MARKER_POP, OP_MARKER_PUSH, OP_MUL, OP_NOP, OP_PIPE_BIND, OP_PIPE_CREATE,
    OP_PUSH_CONSTANTS, OP_QUERY_BEGIN, OP_QUERY_END, OP_RET, OP_SET_SCISSOR, OP_SET_VIEWPORT,
    OP_SLEEP_MS, OP_SNAPSHOT_BEGIN, OP_SNAPSHOT_END, OP_SUB, OP_SUBMIT, OP_TIMESTAMP, OP_UPLOAD,
};
pub use phase::{Domain, Phase};
