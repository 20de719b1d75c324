//! Small helpers for constructing GDSL byte streams from named opcodes,
//! used both by the built-in conformance fixtures and by callers
//! scripting ad hoc streams for the CLI.

use gdslv_opcodes::*;

fn le32(v: u32) -> [u8; 4] {
    v.to_le_bytes()
}
fn le64(v: u64) -> [u8; 8] {
    v.to_le_bytes()
}

pub fn begin_stream() -> Vec<u8> {
    vec![OP_BEGIN_STREAM]
}

pub fn end_stream() -> Vec<u8> {
    vec![OP_END_STREAM]
}

pub fn submit() -> Vec<u8> {
    vec![OP_SUBMIT]
}

pub fn fence_wait(fence_id: u32) -> Vec<u8> {
    let mut v = vec![OP_FENCE_WAIT];
    v.extend_from_slice(&le32(fence_id));
    v
}

pub fn barrier(resource_id: u32, src: u32, dst: u32) -> Vec<u8> {
    let mut v = vec![OP_BARRIER];
    v.extend_from_slice(&le32(resource_id));
    v.extend_from_slice(&le32(src));
    v.extend_from_slice(&le32(dst));
    v
}

pub fn alloc_buffer(id: u32, heap_id: u32, size: u64, usage: u32, flags: u32) -> Vec<u8> {
    let mut v = vec![OP_ALLOC_BUFFER];
    v.extend_from_slice(&le32(id));
    v.extend_from_slice(&le32(heap_id));
    v.extend_from_slice(&le64(size));
    v.extend_from_slice(&le32(usage));
    v.extend_from_slice(&le32(flags));
    v
}

pub fn free_buffer(id: u32) -> Vec<u8> {
    let mut v = vec![OP_FREE_BUFFER];
    v.extend_from_slice(&le32(id));
    v
}

pub fn snapshot_begin(label_id: u32) -> Vec<u8> {
    let mut v = vec![OP_SNAPSHOT_BEGIN];
    v.extend_from_slice(&le32(label_id));
    v
}

pub fn snapshot_end() -> Vec<u8> {
    vec![OP_SNAPSHOT_END]
}

pub fn unknown(byte: u8) -> Vec<u8> {
    vec![byte]
}

/// Concatenates a sequence of instruction fragments into one stream.
pub fn stream(parts: &[Vec<u8>]) -> Vec<u8> {
    parts.iter().flatten().copied().collect()
}
