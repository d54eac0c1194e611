use loam_world::{
    CHUNK_SIZE_X, CHUNK_SIZE_Z, ChunkCoord, ColumnLayer, NoiseField, World, WorldGenConfig,
    WorldGenError,
};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = ChunkCoord> {
    (-2_000i32..=2_000, -2_000i32..=2_000).prop_map(|(cx, cz)| ChunkCoord::new(cx, cz))
}

#[test]
fn unknown_active_biome_fails_generation() {
    let world = World::new(1, WorldGenConfig::default().with_biome("tundra"));
    let err = world.column_plan(ChunkCoord::new(0, 0)).unwrap_err();
    assert!(matches!(err, WorldGenError::UnknownBiome(ref n) if n == "tundra"));
}

#[test]
fn negative_blocks_map_to_negative_chunks() {
    let c = ChunkCoord::from_block(-1, -17);
    assert_eq!(c, ChunkCoord::new(-1, -2));
    assert_eq!(ChunkCoord::local_of(-1, -17), (15, 15));
    assert_eq!(ChunkCoord::from_block(16, 15), ChunkCoord::new(1, 0));
}

#[test]
fn distance_holds_at_saturated_coordinates() {
    let far = ChunkCoord::from_position(-4.0e10, 0.0);
    assert_eq!(far.cx, i32::MIN);
    let near = ChunkCoord::new(5, 0);
    let d = i64::from(i32::MIN) - 5;
    assert_eq!(far.distance_sq(near), d * d);
    let corner = ChunkCoord::new(i32::MIN, i32::MIN);
    let opposite = ChunkCoord::new(i32::MAX, i32::MAX);
    assert_eq!(corner.distance_sq(opposite), i64::MAX);
    assert!(corner.distance(opposite) > 1e9);
}

#[test]
fn plan_covers_every_column_once() {
    let world = World::with_defaults(42);
    let plan = world.column_plan(ChunkCoord::new(3, -4)).unwrap();
    assert_eq!(plan.columns.len(), CHUNK_SIZE_X * CHUNK_SIZE_Z);
    for lz in 0..CHUNK_SIZE_Z {
        for lx in 0..CHUNK_SIZE_X {
            let c = plan.column(lx, lz);
            assert_eq!((c.lx, c.lz), (lx, lz));
        }
    }
}

#[test]
fn every_builtin_biome_plans_within_its_bounds() {
    for name in ["mountains", "plains", "hills", "valleys"] {
        let world = World::new(9, WorldGenConfig::default().with_biome(name));
        let def = world.active_biome().unwrap().clone();
        for cz in -2..2 {
            for cx in -2..2 {
                let plan = world.column_plan(ChunkCoord::new(cx, cz)).unwrap();
                for c in &plan.columns {
                    assert!(
                        c.height >= def.min_y && c.height <= def.max_y,
                        "{name}: height {} outside {}..={}",
                        c.height,
                        def.min_y,
                        def.max_y
                    );
                    if def.rock_line.is_none() {
                        assert!(!c.rock_override);
                    }
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn noise_is_deterministic(seed in any::<u64>(), c in coord(), lx in 0usize..16, lz in 0usize..16) {
        let a = NoiseField::new(seed);
        let b = NoiseField::new(seed);
        prop_assert_eq!(a.offset(), b.offset());
        prop_assert_eq!(
            a.octave_sum(c, lx, lz, 8, 8.0, 2.0, 0.4).to_bits(),
            b.octave_sum(c, lx, lz, 8, 8.0, 2.0, 0.4).to_bits()
        );
    }

    #[test]
    fn sample_stays_within_amplitude(seed in any::<u64>(), c in coord(), lx in 0usize..16, lz in 0usize..16, amp in 0.1f32..10.0) {
        let f = NoiseField::new(seed);
        let s = f.sample(c, lx, lz, 4.0, 1.0, amp);
        prop_assert!(s >= -amp / 2.0 - 1e-5 && s <= amp / 2.0 + 1e-5);
        let p = f.plain(c, lx, lz, 6.0);
        prop_assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn octave_sum_is_normalised(seed in any::<u64>(), c in coord(), octaves in 1u32..10, persistence in 0.1f32..0.9) {
        let f = NoiseField::new(seed);
        let v = f.octave_sum(c, 7, 3, octaves, 8.0, 2.0, persistence);
        prop_assert!(v >= -1e-5 && v <= 1.0 + 1e-5, "{v}");
    }

    #[test]
    fn planned_columns_fill_from_bottom(seed in 0u64..1_000, c in coord()) {
        let world = World::with_defaults(seed);
        let plan = world.column_plan(c).unwrap();
        for col in &plan.columns {
            for y in 0..col.height {
                prop_assert_ne!(col.layer_at(y, plan.soil_depth), ColumnLayer::Air);
            }
            prop_assert_eq!(col.layer_at(col.height, plan.soil_depth), ColumnLayer::Air);
        }
    }
}
