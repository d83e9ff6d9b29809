use crate::model::animal;
use crate::model::config::SimConfig;
use crate::model::entity::{Entity, EntityClass, Kind};
use crate::model::environment::{EnvChange, Environment};
use crate::model::error::SimError;
use crate::model::history::{self, HistoryLogger, LiveEvent};
use crate::model::plant;
use crate::model::resource;
use crate::model::spatial_hash::SpatialHash;
use crate::model::terrain::{Tile, TileGrid};
use crate::model::tick::{EntityView, TickContext, TickEffects};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

fn default_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(0)
}

/// Aggregate root: owns the entity collection, the tile map and the spatial
/// index, and steps every active entity once per tick. All mutation of the
/// collection funnels through here; entities only queue requests.
#[derive(Serialize, Deserialize)]
pub struct World {
    pub width: f64,
    pub height: f64,
    pub tick: u64,
    pub sim_time: f64,
    pub seed: u64,
    pub entities: Vec<Entity>,
    pub terrain: TileGrid,
    pub config: SimConfig,
    #[serde(skip, default = "SpatialHash::new_empty")]
    spatial_hash: SpatialHash,
    #[serde(skip, default = "default_rng")]
    rng: ChaCha8Rng,
    #[serde(skip)]
    pub logger: HistoryLogger,
    #[serde(skip)]
    pending: TickEffects,
}

impl World {
    pub fn new(config: SimConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let seed = config.world.seed.unwrap_or_else(rand::random);
        let width = config.world.width;
        let height = config.world.height;
        let cols = (width / config.world.tile_size).ceil() as usize;
        let rows = (height / config.world.tile_size).ceil() as usize;

        let logger = match &config.world.log_dir {
            Some(dir) => HistoryLogger::new_at(dir)?,
            None => HistoryLogger::new_dummy(),
        };

        let mut world = Self {
            width,
            height,
            tick: 0,
            sim_time: 0.0,
            seed,
            entities: Vec::new(),
            terrain: TileGrid::generate(cols, rows, config.world.tile_size, seed),
            spatial_hash: SpatialHash::new(config.world.cell_size, width, height),
            rng: ChaCha8Rng::seed_from_u64(seed),
            logger,
            config,
            pending: TickEffects::default(),
        };
        world.populate()?;
        tracing::info!(
            seed,
            entities = world.entities.len(),
            "world created ({width}x{height})"
        );
        Ok(world)
    }

    /// Seeds the initial populations, preferring biome-valid tiles for
    /// plants and resources.
    fn populate(&mut self) -> anyhow::Result<()> {
        let animals: Vec<String> = self.config.animal_species.keys().cloned().collect();
        let plants: Vec<String> = self.config.plant_species.keys().cloned().collect();
        let resources: Vec<String> = self.config.resource_species.keys().cloned().collect();

        for _ in 0..self.config.world.initial_animals {
            if animals.is_empty() {
                break;
            }
            let species = animals[self.rng.gen_range(0..animals.len())].clone();
            let x = self.rng.gen_range(0.0..self.width);
            let y = self.rng.gen_range(0.0..self.height);
            self.spawn(EntityClass::Animal, &species, x, y)?;
        }

        for _ in 0..self.config.world.initial_plants {
            if plants.is_empty() {
                break;
            }
            let species = plants[self.rng.gen_range(0..plants.len())].clone();
            if let Some((x, y)) = self.find_valid_site(&species, EntityClass::Plant) {
                self.spawn(EntityClass::Plant, &species, x, y)?;
            }
        }

        for _ in 0..self.config.world.initial_resources {
            if resources.is_empty() {
                break;
            }
            let species = resources[self.rng.gen_range(0..resources.len())].clone();
            if let Some((x, y)) = self.find_valid_site(&species, EntityClass::Resource) {
                self.spawn(EntityClass::Resource, &species, x, y)?;
            }
        }

        Ok(())
    }

    fn find_valid_site(&mut self, species: &str, class: EntityClass) -> Option<(f64, f64)> {
        let biomes = match class {
            EntityClass::Plant => self.config.plant_species.get(species)?.biomes.clone(),
            EntityClass::Resource => self.config.resource_species.get(species)?.biomes.clone(),
            EntityClass::Animal => return None,
        };
        for _ in 0..20 {
            let x = self.rng.gen_range(0.0..self.width);
            let y = self.rng.gen_range(0.0..self.height);
            if let Some(tile) = self.terrain.tile_at(x, y) {
                if biomes.contains(&tile.biome) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    /// Creates an entity immediately and journals its birth. In-tick
    /// reproduction goes through `TickEffects` instead and lands here
    /// after the pass.
    pub fn spawn(
        &mut self,
        class: EntityClass,
        species: &str,
        x: f64,
        y: f64,
    ) -> Result<Uuid, SimError> {
        let (id, _event) = self.spawn_logged(class, species, x, y)?;
        Ok(id)
    }

    fn spawn_logged(
        &mut self,
        class: EntityClass,
        species: &str,
        x: f64,
        y: f64,
    ) -> Result<(Uuid, LiveEvent), SimError> {
        let entity = match class {
            EntityClass::Animal => {
                let def = self.config.animal_species.get(species).ok_or_else(|| {
                    SimError::UnknownSpecies {
                        class: "animal",
                        species: species.to_string(),
                    }
                })?;
                Entity::animal(species, def, x, y)
            }
            EntityClass::Plant => {
                let def = self.config.plant_species.get(species).ok_or_else(|| {
                    SimError::UnknownSpecies {
                        class: "plant",
                        species: species.to_string(),
                    }
                })?;
                Entity::plant(species, def, x, y, self.config.plants.offspring_growth)
            }
            EntityClass::Resource => {
                let def = self.config.resource_species.get(species).ok_or_else(|| {
                    SimError::UnknownSpecies {
                        class: "resource",
                        species: species.to_string(),
                    }
                })?;
                let quantity = if def.initial_min < def.initial_max {
                    self.rng.gen_range(def.initial_min..=def.initial_max)
                } else {
                    def.initial_min
                };
                Entity::resource(
                    species,
                    def,
                    x,
                    y,
                    quantity,
                    self.sim_time,
                    self.config.world.tile_size,
                )
            }
        };

        let id = entity.id;
        let event = LiveEvent::Birth {
            id,
            species: entity.species.clone(),
            tick: self.tick,
            timestamp: history::timestamp(),
        };
        self.journal(&event);
        self.entities.push(entity);
        Ok((id, event))
    }

    /// Appends an event to the journal. A failed write is reported and
    /// dropped; journaling never interrupts the simulation.
    fn journal(&mut self, event: &LiveEvent) {
        if let Err(err) = self.logger.log_event(event) {
            tracing::warn!(%err, "dropping journal event");
        }
    }

    /// Queues an entity for removal at the end of the next update pass.
    pub fn request_remove(&mut self, id: Uuid) {
        self.pending.removals.push(id);
    }

    /// Harvests from a resource node. Unknown ids, inactive entities,
    /// non-resources and zero amounts all yield 0. Draining a node to
    /// empty queues its removal.
    pub fn harvest(&mut self, id: Uuid, amount: u32) -> u32 {
        let now = self.sim_time;
        let (taken, depleted) = {
            let Some(entity) = self.entities.iter_mut().find(|e| e.id == id && e.active) else {
                return 0;
            };
            let Some(node) = entity.as_resource_mut() else {
                return 0;
            };
            let taken = node.harvest(amount, now);
            (taken, node.is_depleted())
        };
        if taken > 0 && depleted {
            self.pending.removals.push(id);
        }
        taken
    }

    /// Active entities within `radius` of the point, in stable entity order.
    pub fn entities_in_range(&self, x: f64, y: f64, radius: f64) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.active && e.distance_to(x, y) <= radius)
            .collect()
    }

    pub fn entity(&self, id: Uuid) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id && e.active)
    }

    pub fn tile_at(&self, x: f64, y: f64) -> Option<&Tile> {
        self.terrain.tile_at(x, y)
    }

    pub fn world_bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn animal_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.active && matches!(e.kind, Kind::Animal(_)))
            .count()
    }

    /// Advances the world by one tick of `dt` seconds. Every active entity
    /// is stepped exactly once; spawns, removals and combat damage queued
    /// during the pass are applied afterwards, and entities born this tick
    /// are not stepped until the next one.
    pub fn update(&mut self, env: &mut Environment, dt: f64) -> anyhow::Result<Vec<LiveEvent>> {
        let mut events = Vec::new();
        self.tick += 1;

        for change in env.tick(dt, &mut self.rng) {
            let event = match change {
                EnvChange::Season { from, to } => LiveEvent::SeasonChanged {
                    from: format!("{from:?}"),
                    to: format!("{to:?}"),
                    tick: self.tick,
                    timestamp: history::timestamp(),
                },
                EnvChange::Weather { from, to } => LiveEvent::WeatherChanged {
                    from: format!("{from:?}"),
                    to: format!("{to:?}"),
                    tick: self.tick,
                    timestamp: history::timestamp(),
                },
            };
            self.journal(&event);
            events.push(event);
        }
        self.sim_time = env.time();

        let animals_before = self.animal_count();

        // 1. Rebuild the spatial index from active entities.
        self.spatial_hash.clear();
        for (i, e) in self.entities.iter().enumerate() {
            if e.active {
                self.spatial_hash.insert(e.x, e.y, i);
            }
        }

        // 2. Start-of-tick snapshot for all cross-entity reads.
        let views: Vec<EntityView> = self.entities.iter().map(EntityView::of).collect();
        let by_id: HashMap<Uuid, usize> =
            views.iter().enumerate().map(|(i, v)| (v.id, i)).collect();

        // 3. Step every active entity once.
        let mut fx = std::mem::take(&mut self.pending);
        let mut current = std::mem::take(&mut self.entities);
        {
            let ctx = TickContext::new(
                &self.config,
                env,
                &self.terrain,
                &self.spatial_hash,
                &views,
                &by_id,
            );
            for entity in current.iter_mut().filter(|e| e.active) {
                match entity.kind {
                    Kind::Animal(_) => animal::update(entity, dt, &ctx, &mut fx, &mut self.rng),
                    Kind::Plant(_) => plant::update(entity, dt, &ctx, &mut fx, &mut self.rng),
                    Kind::Resource(_) => resource::update(entity, &ctx),
                }
            }
        }

        // 4. Apply staged combat damage.
        for (id, amount) in fx.damage.drain(..) {
            if let Some(entity) = current.iter_mut().find(|e| e.id == id && e.active) {
                entity.apply_damage(amount);
            }
        }

        // 5. Deaths.
        for entity in current.iter_mut() {
            if entity.active && entity.is_dead() {
                entity.active = false;
                let cause = match entity.kind {
                    Kind::Animal(_) => "predation",
                    Kind::Plant(_) => "environment",
                    Kind::Resource(_) => "depleted",
                };
                let event = LiveEvent::Death {
                    id: entity.id,
                    species: entity.species.clone(),
                    cause: cause.to_string(),
                    tick: self.tick,
                    timestamp: history::timestamp(),
                };
                self.journal(&event);
                events.push(event);
            }
        }

        // 6. Queued removals (drained resources, external requests).
        for id in fx.removals.drain(..) {
            if let Some(entity) = current.iter_mut().find(|e| e.id == id && e.active) {
                entity.active = false;
                let event = match entity.kind {
                    Kind::Resource(_) => LiveEvent::Depleted {
                        id: entity.id,
                        species: entity.species.clone(),
                        tick: self.tick,
                        timestamp: history::timestamp(),
                    },
                    _ => LiveEvent::Death {
                        id: entity.id,
                        species: entity.species.clone(),
                        cause: "removed".to_string(),
                        tick: self.tick,
                        timestamp: history::timestamp(),
                    },
                };
                self.journal(&event);
                events.push(event);
            }
        }

        current.retain(|e| e.active);
        self.entities = current;

        // 7. Offspring join after the pass; they are not stepped this tick.
        for req in fx.spawns.drain(..) {
            match self.spawn_logged(req.class, &req.species, req.x, req.y) {
                Ok((_, event)) => events.push(event),
                Err(err) => tracing::warn!(%err, "dropping reproduction request"),
            }
        }

        if animals_before > 0 && self.animal_count() == 0 {
            let event = LiveEvent::Extinction {
                tick: self.tick,
                timestamp: history::timestamp(),
            };
            self.journal(&event);
            events.push(event);
        }

        Ok(events)
    }

    /// Drops deactivated entities before serialization.
    pub fn prepare_for_save(&mut self) {
        self.entities.retain(|e| e.active);
    }

    /// Rebuilds everything the save record deliberately leaves out: the
    /// spatial index, the RNG stream and per-entity derived fields.
    pub fn post_load(&mut self) -> anyhow::Result<()> {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed ^ self.tick);
        self.spatial_hash = SpatialHash::new(self.config.world.cell_size, self.width, self.height);
        if let Some(dir) = self.config.world.log_dir.clone() {
            self.logger = HistoryLogger::new_at(&dir)?;
        }

        for entity in &mut self.entities {
            match &mut entity.kind {
                Kind::Animal(_) => {
                    let def = self
                        .config
                        .animal_species
                        .get(&entity.species)
                        .ok_or_else(|| SimError::UnknownSpecies {
                            class: "animal",
                            species: entity.species.clone(),
                        })?;
                    entity.size = def.size;
                }
                Kind::Plant(plant) => {
                    entity.size = plant.max_size * plant.growth;
                }
                Kind::Resource(_) => {
                    entity.size = self.config.world.tile_size;
                }
            }
        }
        Ok(())
    }
}
