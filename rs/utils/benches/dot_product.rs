use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use strum::IntoEnumIterator;
use utils::distance::dot_product::DotProductCalculator;
use utils::distance::KernelImpl;
use utils::test_utils::generate_random_vector;

fn benches_dot_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot_product");

    for size in [8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096].iter() {
        let a = generate_random_vector(*size, 10);
        let b = generate_random_vector(*size, 10);

        for kernel in KernelImpl::iter() {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", kernel), size),
                &size,
                |bench, &_size| {
                    bench.iter(|| {
                        DotProductCalculator::calculate_with(kernel, black_box(&a), black_box(&b));
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, benches_dot_product);
criterion_main!(benches);
