use criterion::{black_box, Criterion, criterion_group, criterion_main};
use trialloc::{BoundaryType, OwnershipRange, PreallocPolicy, Preallocator, create_unit_square_uniform_tri_mesh};

fn bench_policies(c: &mut Criterion) {
    let grid = create_unit_square_uniform_tri_mesh(200, BoundaryType::Dirichlet).unwrap();
    let n = grid.num_nodes();
    let range = OwnershipRange::block(n, 4, 1).unwrap();

    c.bench_function("distinct neighbors", |ben| {
        ben.iter(|| PreallocPolicy::Distinct.estimate(black_box(&grid), black_box(range)).unwrap())
    });

    c.bench_function("halved pair count", |ben| {
        ben.iter(|| PreallocPolicy::Halved.estimate(black_box(&grid), black_box(range)).unwrap())
    });

    c.bench_function("boundary type (serial)", |ben| {
        ben.iter(|| PreallocPolicy::BoundaryType.estimate(black_box(&grid), OwnershipRange::full(n)).unwrap())
    });
}

criterion_group!(benches, bench_policies);
criterion_main!(benches);
