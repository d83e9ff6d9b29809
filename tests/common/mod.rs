#![allow(dead_code)]

use wildgrove_lib::model::config::{SimConfig, WorldConfig};
use wildgrove_lib::model::environment::Environment;
use wildgrove_lib::model::terrain::Tile;
use wildgrove_lib::model::world::World;

/// Builds small deterministic worlds for integration tests: fixed seed,
/// no initial populations, no journal on disk.
pub struct WorldBuilder {
    config: SimConfig,
    fill: Option<Tile>,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self {
            config: SimConfig {
                world: WorldConfig {
                    width: 512.0,
                    height: 512.0,
                    seed: Some(42),
                    initial_animals: 0,
                    initial_plants: 0,
                    initial_resources: 0,
                    log_dir: None,
                    ..Default::default()
                },
                ..Default::default()
            },
            fill: None,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn tweak(mut self, f: impl FnOnce(&mut SimConfig)) -> Self {
        f(&mut self.config);
        self
    }

    /// Overwrites every tile after generation, pinning down the biome layout.
    pub fn fill_tiles(mut self, tile: Tile) -> Self {
        self.fill = Some(tile);
        self
    }

    pub fn build(self) -> (World, Environment) {
        let mut world = World::new(self.config).expect("test config must be valid");
        if let Some(tile) = self.fill {
            let cols = (world.width / world.config.world.tile_size).ceil() as usize;
            let rows = (world.height / world.config.world.tile_size).ceil() as usize;
            for cy in 0..rows {
                for cx in 0..cols {
                    world.terrain.set_tile(cx, cy, tile);
                }
            }
        }
        let env = Environment::new(&world.config.environment);
        (world, env)
    }
}
