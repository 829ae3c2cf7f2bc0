// benches/copy_bits.rs

use bit_span::{BitOrder, copy_bits, new_buffer};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn bench_copy(c: &mut Criterion) {
    let sizes = vec![64, 1_024, 16_384];

    let mut group = c.benchmark_group("copy_bits");
    for bits in sizes {
        let src: Vec<u8> = (0..bits / 8 + 1).map(|i| i as u8).collect();
        let mut dst = new_buffer(bits + 8);

        group.bench_with_input(BenchmarkId::new("aligned", bits), &bits, |b, &bits| {
            b.iter(|| copy_bits(BitOrder::Msb0, black_box(&src), 0, &mut dst, 0, bits))
        });
        group.bench_with_input(BenchmarkId::new("unaligned", bits), &bits, |b, &bits| {
            b.iter(|| copy_bits(BitOrder::Msb0, black_box(&src), 3, &mut dst, 5, bits))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_copy);
criterion_main!(benches);
