//! Element access and subscript normalization throughput.

use std::hint::black_box;

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use nditem::{
    copy_swap, get_item, set_item, ByteOrder, ElementType, HostValue, IndexArg, IndexNormalizer,
    MemoryArray, SliceArg, StandardConversion, Width,
};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

const ELEMENTS: usize = 4096;

fn layouts(ty: ElementType) -> Vec<(&'static str, MemoryArray)> {
    vec![
        ("behaved", MemoryArray::new(ty, vec![ELEMENTS])),
        (
            "swapped",
            MemoryArray::new(ty, vec![ELEMENTS]).with_byte_order(ByteOrder::Swapped),
        ),
        ("unaligned", MemoryArray::new(ty, vec![ELEMENTS]).unaligned()),
    ]
}

fn bench_get_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_item");
    group.throughput(Throughput::Elements(ELEMENTS as u64));

    for ty in [ElementType::Int, ElementType::Double, ElementType::CDouble] {
        for (layout, arr) in layouts(ty) {
            let itemsize = ty.itemsize();
            group.bench_with_input(BenchmarkId::new(ty.name(), layout), &arr, |b, arr| {
                b.iter(|| {
                    for i in 0..ELEMENTS {
                        black_box(get_item(arr, i * itemsize).unwrap());
                    }
                });
            });
        }
    }

    group.finish();
}

fn bench_random_get_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_get_item");
    group.throughput(Throughput::Elements(ELEMENTS as u64));

    let mut rng = StdRng::seed_from_u64(0x5eed);
    let ty = ElementType::Double;
    let offsets: Vec<usize> = (0..ELEMENTS)
        .map(|_| rng.gen_range(0..ELEMENTS) * ty.itemsize())
        .collect();

    for (layout, arr) in layouts(ty) {
        group.bench_with_input(BenchmarkId::new(ty.name(), layout), &arr, |b, arr| {
            b.iter(|| {
                for &offset in &offsets {
                    black_box(get_item(arr, offset).unwrap());
                }
            });
        });
    }

    group.finish();
}

fn bench_set_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_item");
    group.throughput(Throughput::Elements(ELEMENTS as u64));

    for (name, value) in [
        ("exact", HostValue::Item(nditem::ItemValue::I64(42))),
        ("int", HostValue::Int(42)),
        ("float", HostValue::Float(42.5)),
    ] {
        for (layout, mut arr) in layouts(ElementType::Long) {
            group.bench_function(BenchmarkId::new(name, layout), |b| {
                b.iter(|| {
                    for i in 0..ELEMENTS {
                        set_item(&mut arr, &value, i * 8, &StandardConversion).unwrap();
                    }
                });
            });
        }
    }

    group.finish();
}

fn bench_copy_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy_swap");
    let src = vec![0xA5u8; ELEMENTS * 8];
    let mut dest = vec![0u8; ELEMENTS * 8];

    for width in [Width::Two, Width::Four, Width::Eight] {
        let n = width.bytes();
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_function(BenchmarkId::new("swap", n), |b| {
            b.iter(|| {
                for (d, s) in dest.chunks_exact_mut(n).zip(src.chunks_exact(n)) {
                    copy_swap(width, d, s, true);
                }
                black_box(&dest);
            });
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let normalizer = IndexNormalizer::default();
    let mut group = c.benchmark_group("normalize");

    group.bench_function("scalar", |b| {
        let args = [IndexArg::Int(5)];
        b.iter(|| black_box(normalizer.normalize(black_box(&args)).unwrap()));
    });

    group.bench_function("tuple", |b| {
        let args = [IndexArg::Sequence(vec![
            IndexArg::NewAxis,
            SliceArg::range(0, 10).into(),
            IndexArg::Ellipsis,
            IndexArg::Int(-1),
        ])];
        b.iter(|| black_box(normalizer.normalize(black_box(&args)).unwrap()));
    });

    group.bench_function("fancy_list", |b| {
        let args = [IndexArg::from((0..256i64).collect::<Vec<_>>())];
        b.iter(|| black_box(normalizer.normalize(black_box(&args)).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_get_item,
    bench_random_get_item,
    bench_set_item,
    bench_copy_swap,
    bench_normalize
);
criterion_main!(benches);
