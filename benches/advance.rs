//! Benchmarks for the cell group tick.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use cellgrid::{
    engine::CellGroup,
    schema::{Adjacency, Automaton, AutomatonKind, PopulationConfig, Shape, SimulationConfig},
};

fn config(kind: AutomatonKind, shape: Shape, size: usize) -> SimulationConfig {
    let states = kind.state_count();
    let cells = size * size;
    let mut counts = vec![cells / states; states];
    counts[0] += cells % states;
    SimulationConfig {
        width: size,
        height: size,
        shape,
        adjacency: if shape == Shape::Hex {
            Adjacency::Orthogonal
        } else {
            Adjacency::All
        },
        automaton: Automaton::default_for(kind),
        population: PopulationConfig::random(counts),
        random_seed: Some(42),
        ..Default::default()
    }
}

fn bench_life_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("life_advance");

    for size in [32, 64, 128, 256] {
        let mut cells = CellGroup::build(config(AutomatonKind::Life, Shape::Square, size)).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    black_box(cells.advance()).unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules");

    for kind in AutomatonKind::ALL {
        let config = config(kind, Shape::Square, 64);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", kind)),
            &config,
            |b, config| {
                b.iter_batched(
                    || CellGroup::build(config.clone()).unwrap(),
                    |mut cells| black_box(cells.run(10)),
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for shape in [Shape::Square, Shape::Hex, Shape::Tri] {
        let config = config(AutomatonKind::Rps, shape, 128);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", shape)),
            &config,
            |b, config| {
                b.iter(|| CellGroup::build(black_box(config.clone())).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_life_advance, bench_rules, bench_shapes);
criterion_main!(benches);
