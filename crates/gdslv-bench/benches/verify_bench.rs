//! Verifier throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gdslv_core::{verify, VerifyConfig};
use gdslv_opcodes::*;

fn le32(v: u32) -> [u8; 4] {
    v.to_le_bytes()
}
fn le64(v: u64) -> [u8; 8] {
    v.to_le_bytes()
}

/// A long but fully valid stream: allocate `n` buffers, barrier and
/// submit/fence-wait each one back to Host, then free them all.
fn build_stream(resource_count: u32) -> Vec<u8> {
    let mut stream = vec![OP_BEGIN_STREAM];
    for id in 0..resource_count {
        stream.push(OP_ALLOC_BUFFER);
        stream.extend_from_slice(&le32(id));
        stream.extend_from_slice(&le32(0));
        stream.extend_from_slice(&le64(64));
        stream.extend_from_slice(&le32(0));
        stream.extend_from_slice(&le32(0));

        stream.push(OP_BARRIER);
        stream.extend_from_slice(&le32(id));
        stream.extend_from_slice(&le32(Domain::Device as u32));
        stream.extend_from_slice(&le32(Domain::Host as u32));
    }
    stream.push(OP_SUBMIT);
    let fence_index = resource_count as usize * 2 + 1;
    stream.push(OP_FENCE_WAIT);
    stream.extend_from_slice(&le32(fence_index as u32));
    for id in 0..resource_count {
        stream.push(OP_FREE_BUFFER);
        stream.extend_from_slice(&le32(id));
    }
    stream.push(OP_END_STREAM);
    stream
}

fn bench_verify_by_resource_count(c: &mut Criterion) {
    let counts: &[u32] = &[8, 64, 512, 4096];
    let mut group = c.benchmark_group("verify");

    for &count in counts {
        let stream = build_stream(count);
        group.throughput(Throughput::Bytes(stream.len() as u64));
        group.bench_with_input(BenchmarkId::new("domain_level", count), &stream, |b, stream| {
            b.iter(|| black_box(verify(stream, &VerifyConfig::default())));
        });
        group.bench_with_input(BenchmarkId::new("syntax_level", count), &stream, |b, stream| {
            let config = VerifyConfig {
                level: gdslv_core::ConformanceLevel::Syntax,
                ..VerifyConfig::default()
            };
            b.iter(|| black_box(verify(stream, &config)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_verify_by_resource_count);
criterion_main!(benches);
