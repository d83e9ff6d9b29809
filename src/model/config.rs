//! Configuration for every tunable simulation parameter.
//!
//! All rates, thresholds, probabilities and species definitions map to
//! `config.toml`; the `Default` impl is the authoritative baseline. Each
//! species appears exactly once, with its valid biomes carried inline.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 2048.0
//! height = 2048.0
//! seed = 42
//!
//! [needs]
//! hunger_rate = 1.5
//! thirst_rate = 2.0
//!
//! [animal_species.wolf]
//! speed = 150.0
//! behavior = "predator"
//! ```

use crate::model::animal::BehaviorClass;
use crate::model::terrain::Biome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub tile_size: f64,
    pub cell_size: f64,
    pub seed: Option<u64>,
    pub initial_animals: usize,
    pub initial_plants: usize,
    pub initial_resources: usize,
    /// Directory for the event journal; `None` disables it.
    pub log_dir: Option<String>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 2048.0,
            height: 2048.0,
            tile_size: 32.0,
            cell_size: 64.0,
            seed: None,
            initial_animals: 20,
            initial_plants: 60,
            initial_resources: 30,
            log_dir: Some("logs".to_string()),
        }
    }
}

/// Per-second decay and recovery rates for animal needs.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NeedsConfig {
    pub hunger_rate: f64,
    pub thirst_rate: f64,
    pub energy_drain_rate: f64,
    pub rest_recovery_rate: f64,
    pub rest_health_regen: f64,
    /// Hunger/thirst must both be below this for resting to heal.
    pub rest_need_threshold: f64,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            hunger_rate: 1.5,
            thirst_rate: 2.0,
            energy_drain_rate: 0.5,
            rest_recovery_rate: 5.0,
            rest_health_regen: 2.0,
            rest_need_threshold: 50.0,
        }
    }
}

/// State-machine thresholds and timer ranges.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BehaviorConfig {
    pub low_energy_threshold: f64,
    pub hunt_hunger_threshold: f64,
    /// Fraction of max energy at which resting ends.
    pub rest_exit_fraction: f64,
    pub flee_timer_min: f64,
    pub flee_timer_max: f64,
    pub rest_timer_min: f64,
    pub rest_timer_max: f64,
    pub hunt_timer_min: f64,
    pub hunt_timer_max: f64,
    pub wander_timer_min: f64,
    pub wander_timer_max: f64,
    pub wander_distance_min: f64,
    pub wander_distance_max: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            low_energy_threshold: 30.0,
            hunt_hunger_threshold: 70.0,
            rest_exit_fraction: 0.8,
            flee_timer_min: 5.0,
            flee_timer_max: 10.0,
            rest_timer_min: 10.0,
            rest_timer_max: 20.0,
            hunt_timer_min: 20.0,
            hunt_timer_max: 30.0,
            wander_timer_min: 5.0,
            wander_timer_max: 15.0,
            wander_distance_min: 100.0,
            wander_distance_max: 200.0,
        }
    }
}

/// Growth, stress and reproduction tuning shared by all plant species.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlantConfig {
    pub buffer_rise_rate: f64,
    pub buffer_fall_rate: f64,
    pub nutrient_rise_rate: f64,
    pub nutrient_fall_rate: f64,
    /// Buffer delta per tick that flags a visual refresh.
    pub visual_update_threshold: f64,
    /// Factors below this start hurting the plant.
    pub stress_threshold: f64,
    pub water_damage: f64,
    pub sunlight_damage: f64,
    pub nutrient_damage: f64,
    /// Flat damage per second while standing on no tile.
    pub off_map_damage: f64,
    pub rain_moisture_bonus: f64,
    pub heat_moisture_penalty: f64,
    pub heat_temperature: f64,
    /// Per-second chance of going dormant in winter.
    pub winter_dormancy_chance: f64,
    pub winter_shrink: f64,
    pub winter_growth_floor: f64,
    /// Per-second chance of a fall trim.
    pub fall_trim_chance: f64,
    pub fall_trim: f64,
    pub fall_growth_floor: f64,
    pub reproduction_growth_threshold: f64,
    pub reproduction_attempts: usize,
    pub reproduction_cooldown_min: f64,
    pub reproduction_cooldown_max: f64,
    /// Growth a freshly spawned offspring starts with.
    pub offspring_growth: f64,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            buffer_rise_rate: 10.0,
            buffer_fall_rate: 5.0,
            nutrient_rise_rate: 5.0,
            nutrient_fall_rate: 2.0,
            visual_update_threshold: 10.0,
            stress_threshold: 0.2,
            water_damage: 10.0,
            sunlight_damage: 5.0,
            nutrient_damage: 3.0,
            off_map_damage: 10.0,
            rain_moisture_bonus: 0.3,
            heat_moisture_penalty: 0.2,
            heat_temperature: 30.0,
            winter_dormancy_chance: 0.1,
            winter_shrink: 0.2,
            winter_growth_floor: 0.3,
            fall_trim_chance: 0.05,
            fall_trim: 0.1,
            fall_growth_floor: 0.5,
            reproduction_growth_threshold: 0.8,
            reproduction_attempts: 5,
            reproduction_cooldown_min: 60.0,
            reproduction_cooldown_max: 120.0,
            offspring_growth: 0.1,
        }
    }
}

/// Seasonal growth modifiers applied to season-sensitive plants.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SeasonConfig {
    pub spring_growth: f64,
    pub summer_growth: f64,
    pub fall_growth: f64,
    pub winter_growth: f64,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            spring_growth: 1.2,
            summer_growth: 1.0,
            fall_growth: 0.8,
            winter_growth: 0.4,
        }
    }
}

impl SeasonConfig {
    #[must_use]
    pub fn growth_modifier(&self, season: crate::model::environment::Season) -> f64 {
        use crate::model::environment::Season;
        match season {
            Season::Spring => self.spring_growth,
            Season::Summer => self.summer_growth,
            Season::Fall => self.fall_growth,
            Season::Winter => self.winter_growth,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EnvironmentConfig {
    /// Seconds of simulated time per day.
    pub day_length: f64,
    /// Seconds of simulated time per season.
    pub season_length: f64,
    pub weather_interval_min: f64,
    pub weather_interval_max: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            day_length: 240.0,
            season_length: 960.0,
            weather_interval_min: 30.0,
            weather_interval_max: 90.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnimalSpecies {
    pub speed: f64,
    pub size: f64,
    pub behavior: BehaviorClass,
    pub vision_range: f64,
    pub damage: f64,
    pub health: f64,
    pub max_energy: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlantSpecies {
    pub max_size: f64,
    pub growth_rate: f64,
    pub reproduction_rate: f64,
    pub reproduction_radius: f64,
    pub health: f64,
    /// Season-insensitive species ignore seasonal growth modifiers.
    pub seasonal: bool,
    pub biomes: Vec<Biome>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResourceSpecies {
    pub max_quantity: u32,
    pub respawn_time: f64,
    pub initial_min: u32,
    pub initial_max: u32,
    pub biomes: Vec<Biome>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub needs: NeedsConfig,
    pub behavior: BehaviorConfig,
    pub plants: PlantConfig,
    pub seasons: SeasonConfig,
    pub environment: EnvironmentConfig,
    pub animal_species: BTreeMap<String, AnimalSpecies>,
    pub plant_species: BTreeMap<String, PlantSpecies>,
    pub resource_species: BTreeMap<String, ResourceSpecies>,
}

impl Default for SimConfig {
    fn default() -> Self {
        let mut animal_species = BTreeMap::new();
        animal_species.insert(
            "wolf".to_string(),
            AnimalSpecies {
                speed: 150.0,
                size: 32.0,
                behavior: BehaviorClass::Predator,
                vision_range: 300.0,
                damage: 20.0,
                health: 100.0,
                max_energy: 100.0,
            },
        );
        animal_species.insert(
            "deer".to_string(),
            AnimalSpecies {
                speed: 180.0,
                size: 32.0,
                behavior: BehaviorClass::Prey,
                vision_range: 250.0,
                damage: 5.0,
                health: 80.0,
                max_energy: 120.0,
            },
        );
        animal_species.insert(
            "rabbit".to_string(),
            AnimalSpecies {
                speed: 200.0,
                size: 24.0,
                behavior: BehaviorClass::Prey,
                vision_range: 200.0,
                damage: 2.0,
                health: 50.0,
                max_energy: 80.0,
            },
        );
        animal_species.insert(
            "fox".to_string(),
            AnimalSpecies {
                speed: 170.0,
                size: 28.0,
                behavior: BehaviorClass::Predator,
                vision_range: 280.0,
                damage: 15.0,
                health: 70.0,
                max_energy: 90.0,
            },
        );
        animal_species.insert(
            "bear".to_string(),
            AnimalSpecies {
                speed: 130.0,
                size: 40.0,
                behavior: BehaviorClass::Predator,
                vision_range: 220.0,
                damage: 30.0,
                health: 150.0,
                max_energy: 120.0,
            },
        );

        let mut plant_species = BTreeMap::new();
        plant_species.insert(
            "tree".to_string(),
            PlantSpecies {
                max_size: 3.0,
                growth_rate: 0.05,
                reproduction_rate: 0.01,
                reproduction_radius: 120.0,
                health: 100.0,
                seasonal: true,
                biomes: vec![Biome::Forest, Biome::Rainforest, Biome::Plains, Biome::Savanna],
            },
        );
        plant_species.insert(
            "bush".to_string(),
            PlantSpecies {
                max_size: 1.5,
                growth_rate: 0.08,
                reproduction_rate: 0.02,
                reproduction_radius: 80.0,
                health: 60.0,
                seasonal: true,
                biomes: vec![
                    Biome::Plains,
                    Biome::Forest,
                    Biome::Rainforest,
                    Biome::Savanna,
                    Biome::Grassland,
                ],
            },
        );
        plant_species.insert(
            "flower".to_string(),
            PlantSpecies {
                max_size: 1.0,
                growth_rate: 0.15,
                reproduction_rate: 0.03,
                reproduction_radius: 60.0,
                health: 30.0,
                seasonal: true,
                biomes: vec![
                    Biome::Plains,
                    Biome::Forest,
                    Biome::Rainforest,
                    Biome::Grassland,
                ],
            },
        );
        plant_species.insert(
            "grass".to_string(),
            PlantSpecies {
                max_size: 0.6,
                growth_rate: 0.2,
                reproduction_rate: 0.04,
                reproduction_radius: 50.0,
                health: 20.0,
                seasonal: true,
                biomes: vec![
                    Biome::Plains,
                    Biome::Grassland,
                    Biome::Savanna,
                    Biome::Forest,
                    Biome::Tundra,
                ],
            },
        );
        plant_species.insert(
            "cactus".to_string(),
            PlantSpecies {
                max_size: 1.2,
                growth_rate: 0.02,
                reproduction_rate: 0.005,
                reproduction_radius: 80.0,
                health: 80.0,
                seasonal: false,
                biomes: vec![Biome::Desert],
            },
        );

        let mut resource_species = BTreeMap::new();
        resource_species.insert(
            "wood".to_string(),
            ResourceSpecies {
                max_quantity: 100,
                respawn_time: 300.0,
                initial_min: 5,
                initial_max: 20,
                biomes: vec![Biome::Forest, Biome::Rainforest, Biome::Plains],
            },
        );
        resource_species.insert(
            "stone".to_string(),
            ResourceSpecies {
                max_quantity: 50,
                respawn_time: 600.0,
                initial_min: 5,
                initial_max: 20,
                biomes: vec![Biome::Mountain, Biome::Tundra, Biome::Desert],
            },
        );
        resource_species.insert(
            "ore".to_string(),
            ResourceSpecies {
                max_quantity: 30,
                respawn_time: 900.0,
                initial_min: 5,
                initial_max: 15,
                biomes: vec![Biome::Mountain],
            },
        );
        resource_species.insert(
            "herb".to_string(),
            ResourceSpecies {
                max_quantity: 20,
                respawn_time: 120.0,
                initial_min: 5,
                initial_max: 15,
                biomes: vec![Biome::Forest, Biome::Grassland, Biome::Plains],
            },
        );
        resource_species.insert(
            "berry".to_string(),
            ResourceSpecies {
                max_quantity: 15,
                respawn_time: 180.0,
                initial_min: 5,
                initial_max: 15,
                biomes: vec![Biome::Forest, Biome::Plains, Biome::Grassland],
            },
        );

        Self {
            world: WorldConfig::default(),
            needs: NeedsConfig::default(),
            behavior: BehaviorConfig::default(),
            plants: PlantConfig::default(),
            seasons: SeasonConfig::default(),
            environment: EnvironmentConfig::default(),
            animal_species,
            plant_species,
            resource_species,
        }
    }
}

impl SimConfig {
    /// Reads configuration from `path`, writing the defaults there first if
    /// the file does not exist yet.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let config = Self::default();
            let toml = toml::to_string_pretty(&config)?;
            std::fs::write(path, toml)?;
            tracing::info!(path = %path.display(), "wrote default configuration");
            return Ok(config);
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration parameters, returning the first failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.world.width > 0.0, "World width must be positive");
        anyhow::ensure!(self.world.height > 0.0, "World height must be positive");
        anyhow::ensure!(self.world.tile_size > 0.0, "Tile size must be positive");
        anyhow::ensure!(self.world.cell_size > 0.0, "Cell size must be positive");

        anyhow::ensure!(
            self.needs.hunger_rate >= 0.0,
            "Hunger rate must be non-negative"
        );
        anyhow::ensure!(
            self.needs.thirst_rate >= 0.0,
            "Thirst rate must be non-negative"
        );
        anyhow::ensure!(
            self.needs.energy_drain_rate >= 0.0,
            "Energy drain rate must be non-negative"
        );

        anyhow::ensure!(
            self.behavior.rest_exit_fraction > 0.0 && self.behavior.rest_exit_fraction <= 1.0,
            "Rest exit fraction must be in (0.0, 1.0]"
        );
        anyhow::ensure!(
            self.behavior.flee_timer_min < self.behavior.flee_timer_max,
            "Flee timer range must be non-empty"
        );
        anyhow::ensure!(
            self.behavior.rest_timer_min < self.behavior.rest_timer_max,
            "Rest timer range must be non-empty"
        );
        anyhow::ensure!(
            self.behavior.hunt_timer_min < self.behavior.hunt_timer_max,
            "Hunt timer range must be non-empty"
        );
        anyhow::ensure!(
            self.behavior.wander_timer_min < self.behavior.wander_timer_max,
            "Wander timer range must be non-empty"
        );
        anyhow::ensure!(
            self.behavior.wander_distance_min < self.behavior.wander_distance_max,
            "Wander distance range must be non-empty"
        );

        anyhow::ensure!(
            self.plants.stress_threshold >= 0.0 && self.plants.stress_threshold <= 1.0,
            "Stress threshold must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.plants.reproduction_growth_threshold > 0.0
                && self.plants.reproduction_growth_threshold <= 1.0,
            "Reproduction growth threshold must be in (0.0, 1.0]"
        );
        anyhow::ensure!(
            self.plants.reproduction_cooldown_min < self.plants.reproduction_cooldown_max,
            "Reproduction cooldown range must be non-empty"
        );
        anyhow::ensure!(
            self.plants.reproduction_attempts > 0,
            "Reproduction attempts must be positive"
        );

        anyhow::ensure!(
            self.environment.day_length > 0.0,
            "Day length must be positive"
        );
        anyhow::ensure!(
            self.environment.season_length > 0.0,
            "Season length must be positive"
        );
        anyhow::ensure!(
            self.environment.weather_interval_min < self.environment.weather_interval_max,
            "Weather interval range must be non-empty"
        );

        for (name, species) in &self.animal_species {
            anyhow::ensure!(species.health > 0.0, "Animal '{name}' health must be positive");
            anyhow::ensure!(
                species.max_energy > 0.0,
                "Animal '{name}' max energy must be positive"
            );
            anyhow::ensure!(
                species.vision_range > 0.0,
                "Animal '{name}' vision range must be positive"
            );
        }
        for (name, species) in &self.plant_species {
            anyhow::ensure!(
                species.max_size > 0.0,
                "Plant '{name}' max size must be positive"
            );
            anyhow::ensure!(
                species.reproduction_radius > 0.0,
                "Plant '{name}' reproduction radius must be positive"
            );
            anyhow::ensure!(
                !species.biomes.is_empty(),
                "Plant '{name}' must list at least one valid biome"
            );
        }
        for (name, species) in &self.resource_species {
            anyhow::ensure!(
                species.max_quantity > 0,
                "Resource '{name}' max quantity must be positive"
            );
            anyhow::ensure!(
                species.respawn_time > 0.0,
                "Resource '{name}' respawn time must be positive"
            );
            anyhow::ensure!(
                species.initial_min <= species.initial_max,
                "Resource '{name}' initial quantity range is inverted"
            );
        }

        Ok(())
    }
}
