//! Versioned save files. The record embeds both the world and the
//! environment clock, since resource respawn timestamps are expressed in
//! environment time.

use crate::model::environment::Environment;
use crate::model::world::World;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const SAVE_VERSION: u32 = 1;

#[derive(Serialize)]
struct SaveStateRef<'a> {
    version: u32,
    world: &'a World,
    env: &'a Environment,
}

#[derive(Deserialize)]
struct SaveState {
    version: u32,
    world: World,
    env: Environment,
}

pub fn save_world(world: &mut World, env: &Environment, path: &str) -> anyhow::Result<()> {
    world.prepare_for_save();
    let state = SaveStateRef {
        version: SAVE_VERSION,
        world,
        env,
    };
    let json = serde_json::to_string(&state).context("Failed to serialize world state")?;
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, json).with_context(|| format!("Failed to write save file '{path}'"))?;
    tracing::info!(path, tick = world.tick, "world saved");
    Ok(())
}

pub fn load_world(path: &str) -> anyhow::Result<(World, Environment)> {
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read save file '{path}'"))?;
    let state: SaveState =
        serde_json::from_str(&json).context("Failed to parse save file")?;
    if state.version > SAVE_VERSION {
        bail!(
            "Save file version {} is newer than supported version {}",
            state.version,
            SAVE_VERSION
        );
    }
    let mut world = state.world;
    world.post_load()?;
    tracing::info!(path, tick = world.tick, "world loaded");
    Ok((world, state.env))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{SimConfig, WorldConfig};
    use crate::model::entity::EntityClass;

    fn test_config(seed: u64) -> SimConfig {
        SimConfig {
            world: WorldConfig {
                width: 512.0,
                height: 512.0,
                seed: Some(seed),
                initial_animals: 0,
                initial_plants: 0,
                initial_resources: 0,
                log_dir: None,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join("wildgrove_save_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("state.json");
        let path = path.to_str().unwrap();

        let mut world = World::new(test_config(11)).unwrap();
        let env = Environment::new(&world.config.environment);
        let id = world
            .spawn(EntityClass::Animal, "wolf", 100.0, 200.0)
            .unwrap();
        world.spawn(EntityClass::Plant, "tree", 50.0, 50.0).unwrap();

        save_world(&mut world, &env, path).unwrap();
        let (loaded, _env) = load_world(path).unwrap();

        assert_eq!(loaded.entities.len(), 2);
        assert_eq!(loaded.seed, world.seed);
        let wolf = loaded.entity(id).unwrap();
        assert_eq!(wolf.species, "wolf");
        assert_eq!(wolf.x, 100.0);
        // Derived size comes back from the species table, not the file.
        assert_eq!(wolf.size, loaded.config.animal_species["wolf"].size);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let dir = std::env::temp_dir().join("wildgrove_save_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("future.json");

        let mut world = World::new(test_config(12)).unwrap();
        let env = Environment::new(&world.config.environment);
        save_world(&mut world, &env, path.to_str().unwrap()).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let bumped = json.replacen("\"version\":1", "\"version\":99", 1);
        std::fs::write(&path, bumped).unwrap();

        assert!(load_world(path.to_str().unwrap()).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_world("/nonexistent/wildgrove.json").is_err());
    }
}
