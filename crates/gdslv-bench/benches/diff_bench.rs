//! Diff/patch throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gdslv_diff::{diff_checked, patch};

fn make_images(size: usize, changed_fraction: f64) -> (Vec<u8>, Vec<u8>) {
    let base = vec![0u8; size];
    let mut target = base.clone();
    let changed_bytes = ((size as f64) * changed_fraction) as usize;
    for b in target.iter_mut().take(changed_bytes) {
        *b = 0xFF;
    }
    (base, target)
}

fn bench_diff_by_image_size(c: &mut Criterion) {
    let sizes: &[usize] = &[64 * 1024, 1024 * 1024, 16 * 1024 * 1024];
    let mut group = c.benchmark_group("diff");

    for &size in sizes {
        let (base, target) = make_images(size, 0.1);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("diff_4kib_pages", size), &(base.clone(), target.clone()), |b, (base, target)| {
            b.iter(|| black_box(diff_checked(base, target, 4096).unwrap()));
        });
    }
    group.finish();
}

fn bench_patch_by_image_size(c: &mut Criterion) {
    let sizes: &[usize] = &[64 * 1024, 1024 * 1024, 16 * 1024 * 1024];
    let mut group = c.benchmark_group("patch");

    for &size in sizes {
        let (base, target) = make_images(size, 0.1);
        let result = diff_checked(&base, &target, 4096).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("patch_4kib_pages", size), &(base.clone(), result), |b, (base, result)| {
            b.iter(|| black_box(patch(base, result).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_diff_by_image_size, bench_patch_by_image_size);
criterion_main!(benches);
