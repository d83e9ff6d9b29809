mod common;

use common::WorldBuilder;
use wildgrove_lib::model::entity::EntityClass;
use wildgrove_lib::model::environment::Season;
use wildgrove_lib::model::terrain::{Biome, Tile};

fn forest_soil() -> Tile {
    Tile {
        biome: Biome::Forest,
        moisture: 0.8,
        fertility: 0.9,
    }
}

#[test]
fn plant_grows_under_good_conditions() {
    let (mut world, mut env) = WorldBuilder::new().fill_tiles(forest_soil()).build();
    env.set_hour(12.0);

    let id = world
        .spawn(EntityClass::Plant, "tree", 256.0, 256.0)
        .unwrap();
    let initial = world.entity(id).unwrap().as_plant().unwrap().growth;

    for _ in 0..50 {
        world.update(&mut env, 0.1).unwrap();
    }

    let entity = world.entity(id).unwrap();
    let plant = entity.as_plant().unwrap();
    assert!(plant.growth > initial);
    // Size always tracks growth.
    assert!((entity.size - plant.max_size * plant.growth).abs() < 1e-9);
}

#[test]
fn seasonal_plant_goes_dormant_in_winter() {
    let (mut world, mut env) = WorldBuilder::new().fill_tiles(forest_soil()).build();
    env.set_season(Season::Winter);
    env.set_hour(12.0);

    let id = world
        .spawn(EntityClass::Plant, "tree", 256.0, 256.0)
        .unwrap();

    for _ in 0..500 {
        world.update(&mut env, 0.5).unwrap();
        let plant = world.entity(id).unwrap().as_plant().unwrap();
        if plant.dormant {
            return;
        }
    }
    panic!("tree never went dormant over a simulated winter stretch");
}

#[test]
fn dormancy_never_increases_growth() {
    let (mut world, mut env) = WorldBuilder::new().fill_tiles(forest_soil()).build();
    env.set_season(Season::Winter);
    env.set_hour(12.0);

    let id = world
        .spawn(EntityClass::Plant, "tree", 256.0, 256.0)
        .unwrap();
    let mut prev = world.entity(id).unwrap().as_plant().unwrap().growth;

    for _ in 0..500 {
        world.update(&mut env, 0.5).unwrap();
        let plant = world.entity(id).unwrap().as_plant().unwrap();
        if plant.dormant {
            // The winter shrink may only lower growth, never raise it.
            assert!(plant.growth <= prev);
            return;
        }
        prev = plant.growth;
    }
}

#[test]
fn offspring_only_lands_on_valid_biomes() {
    let desert = Tile {
        biome: Biome::Desert,
        moisture: 0.4,
        fertility: 0.5,
    };
    // Trees do not tolerate desert; no placement should ever succeed.
    let (mut world, mut env) = WorldBuilder::new()
        .fill_tiles(desert)
        .tweak(|c| {
            c.plant_species.get_mut("tree").unwrap().reproduction_rate = 50.0;
        })
        .build();
    env.set_hour(12.0);

    let id = world
        .spawn(EntityClass::Plant, "tree", 256.0, 256.0)
        .unwrap();
    if let Some(plant) = world
        .entities
        .iter_mut()
        .find(|e| e.id == id)
        .and_then(|e| e.as_plant_mut())
    {
        plant.growth = 1.0;
    }

    for _ in 0..100 {
        world.update(&mut env, 0.1).unwrap();
    }
    assert_eq!(world.entities.len(), 1);
}

#[test]
fn desert_species_reproduces_in_desert() {
    let desert = Tile {
        biome: Biome::Desert,
        moisture: 0.4,
        fertility: 0.5,
    };
    let (mut world, mut env) = WorldBuilder::new()
        .fill_tiles(desert)
        .tweak(|c| {
            c.plant_species.get_mut("cactus").unwrap().reproduction_rate = 50.0;
        })
        .build();
    env.set_hour(12.0);

    let id = world
        .spawn(EntityClass::Plant, "cactus", 256.0, 256.0)
        .unwrap();
    if let Some(plant) = world
        .entities
        .iter_mut()
        .find(|e| e.id == id)
        .and_then(|e| e.as_plant_mut())
    {
        plant.growth = 1.0;
    }

    for _ in 0..100 {
        world.update(&mut env, 0.1).unwrap();
    }
    assert!(world.entities.len() > 1);

    // A successful roll always rearms the cooldown.
    let plant = world.entity(id).unwrap().as_plant().unwrap();
    assert!(plant.reproduction_cooldown > 0.0);
    assert!(plant.reproduction_cooldown <= 120.0);
}

#[test]
fn barren_ground_stresses_the_plant() {
    let barren = Tile {
        biome: Biome::Plains,
        moisture: 0.0,
        fertility: 0.9,
    };
    let (mut world, mut env) = WorldBuilder::new().fill_tiles(barren).build();
    env.set_hour(12.0);

    let id = world
        .spawn(EntityClass::Plant, "bush", 256.0, 256.0)
        .unwrap();
    let initial = world.entity(id).unwrap().health;

    for _ in 0..20 {
        world.update(&mut env, 0.1).unwrap();
    }
    assert!(world.entity(id).unwrap().health < initial);
}

#[test]
fn plant_off_the_map_takes_damage() {
    let (mut world, mut env) = WorldBuilder::new().build();
    let id = world
        .spawn(EntityClass::Plant, "grass", 10_000.0, 10_000.0)
        .unwrap();
    let initial = world.entity(id).unwrap().health;

    for _ in 0..10 {
        world.update(&mut env, 0.1).unwrap();
    }
    assert!(world.entity(id).unwrap().health < initial);
}
