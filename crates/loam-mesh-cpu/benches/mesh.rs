use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use loam_blocks::BlockRegistry;
use loam_chunk::generate_chunk_buffer;
use loam_mesh_cpu::{ChunkNeighbors, build_chunk_mesh, compute_normals};
use loam_world::{ChunkCoord, World, WorldGenConfig};

fn bench_build_chunk_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_chunk_mesh");
    let reg = BlockRegistry::builtin();
    for biome in ["mountains", "plains", "valleys"] {
        let world = World::new(1337, WorldGenConfig::default().with_biome(biome));
        let center = generate_chunk_buffer(&world, ChunkCoord::new(0, 0), &reg).unwrap().buf;
        let east = generate_chunk_buffer(&world, ChunkCoord::new(1, 0), &reg).unwrap().buf;
        let west = generate_chunk_buffer(&world, ChunkCoord::new(-1, 0), &reg).unwrap().buf;
        group.bench_function(format!("{biome}_isolated"), |b| {
            b.iter(|| {
                let mesh = build_chunk_mesh(&center, &ChunkNeighbors::none(), &reg).unwrap();
                black_box(mesh);
            })
        });
        let neighbors = ChunkNeighbors {
            pos_x: Some(&east),
            neg_x: Some(&west),
            ..ChunkNeighbors::none()
        };
        group.bench_function(format!("{biome}_with_neighbours"), |b| {
            b.iter(|| {
                let mesh = build_chunk_mesh(&center, &neighbors, &reg).unwrap();
                black_box(mesh);
            })
        });
    }
    group.finish();
}

fn bench_generate_and_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_and_mesh");
    let reg = BlockRegistry::builtin();
    let world = World::with_defaults(42);
    group.bench_function("mountains_16x256x16", |b| {
        b.iter(|| {
            let out = generate_chunk_buffer(&world, ChunkCoord::new(3, -2), &reg).unwrap();
            let mesh = build_chunk_mesh(&out.buf, &ChunkNeighbors::none(), &reg).unwrap();
            black_box(compute_normals(&mesh));
        })
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = bench_build_chunk_mesh, bench_generate_and_mesh
}
criterion_main!(benches);
