//! Per-tick read view and mutation sink handed to every entity update.
//!
//! Entities never hold a world back-reference. Each update receives a
//! read-only `TickContext` (queries over a start-of-tick snapshot) and a
//! `TickEffects` sink; the world applies the queued effects after the
//! whole pass, so iteration is never invalidated mid-tick.

use crate::model::animal::BehaviorClass;
use crate::model::config::SimConfig;
use crate::model::entity::{Entity, EntityClass};
use crate::model::environment::Environment;
use crate::model::spatial_hash::SpatialHash;
use crate::model::terrain::{Tile, TileGrid};
use std::collections::HashMap;
use uuid::Uuid;

/// Immutable per-entity snapshot taken at the start of a tick. Positions
/// and health reflect the state before any entity moved this tick.
#[derive(Debug, Clone)]
pub struct EntityView {
    pub id: Uuid,
    pub species: String,
    pub class: EntityClass,
    pub behavior: Option<BehaviorClass>,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub health: f64,
    pub active: bool,
}

impl EntityView {
    pub fn of(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            species: entity.species.clone(),
            class: entity.kind.class(),
            behavior: entity.as_animal().map(|a| a.behavior),
            x: entity.x,
            y: entity.y,
            size: entity.size,
            health: entity.health,
            active: entity.active,
        }
    }
}

pub struct TickContext<'a> {
    pub config: &'a SimConfig,
    pub env: &'a Environment,
    terrain: &'a TileGrid,
    spatial: &'a SpatialHash,
    views: &'a [EntityView],
    by_id: &'a HashMap<Uuid, usize>,
}

impl<'a> TickContext<'a> {
    pub fn new(
        config: &'a SimConfig,
        env: &'a Environment,
        terrain: &'a TileGrid,
        spatial: &'a SpatialHash,
        views: &'a [EntityView],
        by_id: &'a HashMap<Uuid, usize>,
    ) -> Self {
        Self {
            config,
            env,
            terrain,
            spatial,
            views,
            by_id,
        }
    }

    /// Active entities within `radius` of the point, in ascending entity
    /// index order so results are stable for a fixed entity set.
    pub fn entities_in_range(&self, x: f64, y: f64, radius: f64) -> Vec<&EntityView> {
        let mut indices = self.spatial.query(x, y, radius);
        indices.sort_unstable();
        indices
            .into_iter()
            .filter_map(|i| self.views.get(i))
            .filter(|v| {
                if !v.active {
                    return false;
                }
                let dx = v.x - x;
                let dy = v.y - y;
                dx * dx + dy * dy <= radius * radius
            })
            .collect()
    }

    /// Revalidates an entity id against the snapshot. Returns `None` once
    /// the target is gone or inactive; callers fall back to re-selection.
    pub fn view(&self, id: Uuid) -> Option<&EntityView> {
        self.by_id
            .get(&id)
            .map(|&i| &self.views[i])
            .filter(|v| v.active)
    }

    pub fn tile_at(&self, x: f64, y: f64) -> Option<&Tile> {
        self.terrain.tile_at(x, y)
    }

    pub fn world_bounds(&self) -> (f64, f64) {
        self.terrain.world_bounds()
    }
}

/// A reproduction request queued during a tick.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub class: EntityClass,
    pub species: String,
    pub x: f64,
    pub y: f64,
}

/// Mutations queued during an update pass, applied by the world afterwards.
#[derive(Debug, Default)]
pub struct TickEffects {
    pub spawns: Vec<SpawnRequest>,
    pub removals: Vec<Uuid>,
    pub damage: Vec<(Uuid, f64)>,
}

impl TickEffects {
    pub fn request_spawn(&mut self, class: EntityClass, species: &str, x: f64, y: f64) {
        self.spawns.push(SpawnRequest {
            class,
            species: species.to_string(),
            x,
            y,
        });
    }

    pub fn request_remove(&mut self, id: Uuid) {
        self.removals.push(id);
    }

    pub fn deal_damage(&mut self, id: Uuid, amount: f64) {
        self.damage.push((id, amount));
    }

    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty() && self.removals.is_empty() && self.damage.is_empty()
    }
}
