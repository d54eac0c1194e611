use std::path::PathBuf;

use loam::EngineConfig;
use loam::blocks::BlockRegistry;
use loam::world::WorldGenConfig;

fn root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn shipped_block_catalog_matches_builtin() {
    let reg = BlockRegistry::load_from_path(root().join("assets/blocks.toml")).unwrap();
    let builtin = BlockRegistry::builtin();
    assert_eq!(reg.len(), builtin.len());
    for ty in builtin.iter() {
        assert_eq!(reg.get(ty.id), Some(ty));
    }
}

#[test]
fn shipped_worldgen_matches_builtin() {
    let cfg = WorldGenConfig::load_from_path(&root().join("assets/worldgen.toml")).unwrap();
    let builtin = WorldGenConfig::default();
    assert_eq!(cfg.biome, builtin.biome);
    assert_eq!(cfg.surface, builtin.surface);
    for (name, def) in &builtin.biomes {
        assert_eq!(cfg.biome_def(name).unwrap(), def, "{name}");
    }
}

#[test]
fn shipped_engine_config_loads() {
    let cfg = EngineConfig::load_from_path(&root().join("loam.toml")).unwrap();
    assert_eq!(cfg.world.seed, 42);
    assert_eq!(cfg.scheduler.max_in_flight, 4);
    assert_eq!(cfg.world.blocks, Some(root().join("assets/blocks.toml")));
    assert_eq!(cfg.world.worldgen, Some(root().join("assets/worldgen.toml")));
    assert_eq!(cfg.load_registry().unwrap().len(), BlockRegistry::builtin().len());
    assert_eq!(cfg.load_worldgen().unwrap().biome, "mountains");
}
