//! Plant growth, dormancy, environmental stress and asexual reproduction.
//!
//! Growth is driven by three sampled factors (water, sunlight, nutrients),
//! each buffered internally so the plant responds to sustained conditions
//! rather than single-tick spikes. Offspring placement is biome-checked:
//! a seed only lands on a tile whose biome lists the species as valid.

use crate::model::config::PlantSpecies;
use crate::model::entity::{Entity, EntityClass, Kind};
use crate::model::environment::Season;
use crate::model::needs::{approach, clamp_need};
use crate::model::tick::{TickContext, TickEffects};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Plant {
    /// Growth progress in [0, 1]; size is always `max_size * growth`.
    pub growth: f64,
    pub dormant: bool,
    pub water_level: f64,
    pub sunlight: f64,
    pub nutrients: f64,
    pub reproduction_cooldown: f64,
    pub reproduction_radius: f64,
    pub growth_rate: f64,
    pub reproduction_rate: f64,
    pub max_size: f64,
    pub seasonal: bool,
    /// Set when a buffer moved enough that a renderer would want to refresh.
    #[serde(skip)]
    pub needs_visual_update: bool,
}

impl Plant {
    pub fn new(def: &PlantSpecies, growth: f64) -> Self {
        Self {
            growth: growth.clamp(0.0, 1.0),
            dormant: false,
            water_level: 50.0,
            sunlight: 50.0,
            nutrients: 50.0,
            reproduction_cooldown: 0.0,
            reproduction_radius: def.reproduction_radius,
            growth_rate: def.growth_rate,
            reproduction_rate: def.reproduction_rate,
            max_size: def.max_size,
            seasonal: def.seasonal,
            needs_visual_update: false,
        }
    }
}

pub(crate) fn update(
    entity: &mut Entity,
    dt: f64,
    ctx: &TickContext,
    fx: &mut TickEffects,
    rng: &mut ChaCha8Rng,
) {
    let Entity {
        x,
        y,
        size,
        health,
        max_health,
        species,
        kind,
        ..
    } = entity;
    let Kind::Plant(plant) = kind else { return };

    let cfg = &ctx.config.plants;

    if plant.reproduction_cooldown > 0.0 {
        plant.reproduction_cooldown = (plant.reproduction_cooldown - dt).max(0.0);
    }

    let Some(tile) = ctx.tile_at(*x, *y) else {
        // Standing off the map is a hazard in itself.
        *health = (*health - cfg.off_map_damage * dt).clamp(0.0, *max_health);
        return;
    };

    // 1. Sample the environment.
    let mut water_factor = tile.moisture;
    if ctx.env.weather().is_wet() {
        water_factor += cfg.rain_moisture_bonus;
    }
    if ctx.env.temperature() > cfg.heat_temperature {
        water_factor -= cfg.heat_moisture_penalty;
    }
    let water_factor = water_factor.clamp(0.0, 1.0);
    let sunlight_factor = ctx.env.light_level();
    let nutrient_factor = tile.fertility.clamp(0.0, 1.0);

    // 2. Pull the internal buffers toward the sampled factors.
    let before = (plant.water_level, plant.sunlight, plant.nutrients);
    plant.water_level = approach(
        plant.water_level,
        water_factor * 100.0,
        cfg.buffer_rise_rate,
        cfg.buffer_fall_rate,
        dt,
    );
    plant.sunlight = approach(
        plant.sunlight,
        sunlight_factor * 100.0,
        cfg.buffer_rise_rate,
        cfg.buffer_fall_rate,
        dt,
    );
    plant.nutrients = approach(
        plant.nutrients,
        nutrient_factor * 100.0,
        cfg.nutrient_rise_rate,
        cfg.nutrient_fall_rate,
        dt,
    );
    if (plant.water_level - before.0).abs() > cfg.visual_update_threshold
        || (plant.sunlight - before.1).abs() > cfg.visual_update_threshold
        || (plant.nutrients - before.2).abs() > cfg.visual_update_threshold
    {
        plant.needs_visual_update = true;
    }

    let season = ctx.env.season();
    let season_modifier = if plant.seasonal {
        ctx.config.seasons.growth_modifier(season)
    } else {
        1.0
    };

    // 3. Seasonal dormancy and trims apply only to season-sensitive species.
    if plant.seasonal {
        match season {
            Season::Winter => {
                if !plant.dormant && rng.gen::<f64>() < cfg.winter_dormancy_chance * dt {
                    plant.dormant = true;
                    plant.growth = (plant.growth - cfg.winter_shrink)
                        .max(cfg.winter_growth_floor)
                        .min(plant.growth);
                }
            }
            Season::Fall => {
                if rng.gen::<f64>() < cfg.fall_trim_chance * dt {
                    plant.growth = (plant.growth - cfg.fall_trim)
                        .max(cfg.fall_growth_floor)
                        .min(plant.growth);
                }
            }
            _ => plant.dormant = false,
        }
    }

    // 4. Grow.
    if plant.growth < 1.0 && !plant.dormant {
        plant.growth += plant.growth_rate
            * dt
            * (water_factor * sunlight_factor * nutrient_factor * season_modifier);
        plant.growth = plant.growth.clamp(0.0, 1.0);
    }
    *size = plant.max_size * plant.growth;

    // 5. Reproduce.
    if plant.reproduction_cooldown <= 0.0
        && plant.growth >= cfg.reproduction_growth_threshold
        && rng.gen::<f64>() < plant.reproduction_rate * dt * season_modifier
    {
        for _ in 0..cfg.reproduction_attempts {
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let radius = rng.gen_range(0.0..plant.reproduction_radius);
            let px = *x + angle.cos() * radius;
            let py = *y + angle.sin() * radius;
            if let Some(candidate) = ctx.tile_at(px, py) {
                let valid = ctx
                    .config
                    .plant_species
                    .get(species.as_str())
                    .map(|def| def.biomes.contains(&candidate.biome))
                    .unwrap_or(false);
                if valid {
                    fx.request_spawn(EntityClass::Plant, species, px, py);
                    break;
                }
            }
        }
        plant.reproduction_cooldown =
            rng.gen_range(cfg.reproduction_cooldown_min..cfg.reproduction_cooldown_max);
    }

    // 6. Environmental stress.
    let mut damage = 0.0;
    if water_factor < cfg.stress_threshold {
        damage += cfg.water_damage;
    }
    if sunlight_factor < cfg.stress_threshold {
        damage += cfg.sunlight_damage;
    }
    if nutrient_factor < cfg.stress_threshold {
        damage += cfg.nutrient_damage;
    }
    if damage > 0.0 {
        *health = (*health - damage * dt).clamp(0.0, *max_health);
    }

    plant.water_level = clamp_need(plant.water_level);
    plant.sunlight = clamp_need(plant.sunlight);
    plant.nutrients = clamp_need(plant.nutrients);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::SimConfig;

    #[test]
    fn test_new_plant_clamps_growth() {
        let config = SimConfig::default();
        let def = &config.plant_species["bush"];
        let plant = Plant::new(def, 3.0);
        assert_eq!(plant.growth, 1.0);
        let plant = Plant::new(def, -1.0);
        assert_eq!(plant.growth, 0.0);
    }

    #[test]
    fn test_plant_starts_awake() {
        let config = SimConfig::default();
        let plant = Plant::new(&config.plant_species["tree"], 0.5);
        assert!(!plant.dormant);
        assert_eq!(plant.reproduction_cooldown, 0.0);
    }
}
