use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use overlap_dsp::RingBuffer;

fn bench_push_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer_push");

    for len in [64, 512, 4096] {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let mut ring = RingBuffer::with_len(len, 0.0_f32);
            b.iter(|| {
                for i in 0..len {
                    ring.push(black_box(i as f32));
                }
            });
        });
    }

    group.finish();
}

fn bench_copy_to_slice(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer_copy_to_slice");

    for len in [64, 512, 4096] {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let mut ring = RingBuffer::with_len(len, 0.0_f32);
            // Leave the cursor mid-buffer so the copy spans the wrap.
            for i in 0..len / 3 {
                ring.push(i as f32);
            }
            let mut dest = vec![0.0_f32; len];
            b.iter(|| {
                ring.copy_to_slice(black_box(&mut dest));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push_throughput, bench_copy_to_slice);
criterion_main!(benches);
