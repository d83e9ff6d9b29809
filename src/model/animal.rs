//! Animal behavior: needs decay and the wander/hunt/flee/rest state machine.
//!
//! A state sticks until its timer runs out, then the transition policy is
//! re-evaluated: threats first (prey), exhaustion second, hunger third
//! (predators), wandering as the default. Targets are held as entity ids
//! and revalidated through the tick snapshot on every use; a target that
//! went inactive is simply treated as absent.

use crate::model::config::AnimalSpecies;
use crate::model::entity::{Entity, Kind};
use crate::model::needs::Needs;
use crate::model::tick::{EntityView, TickContext, TickEffects};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ecological role governing which state-machine branches apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorClass {
    Predator,
    Prey,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalState {
    #[default]
    Idle,
    Wandering,
    Hunting,
    Fleeing,
    Resting,
}

/// Movement target: another entity (revalidated each use) or a fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Entity(Uuid),
    Point { x: f64, y: f64 },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Animal {
    pub behavior: BehaviorClass,
    pub state: AnimalState,
    /// Seconds until the next state re-evaluation.
    pub state_timer: f64,
    pub target: Option<Target>,
    pub speed: f64,
    pub vision_range: f64,
    pub damage: f64,
    pub energy: f64,
    pub max_energy: f64,
    pub needs: Needs,
    pub age: f64,
    pub maturity: f64,
    pub reproduction_cooldown: f64,
}

impl Animal {
    pub fn new(def: &AnimalSpecies) -> Self {
        Self {
            behavior: def.behavior,
            state: AnimalState::Idle,
            state_timer: 0.0,
            target: None,
            speed: def.speed,
            vision_range: def.vision_range,
            damage: def.damage,
            energy: def.max_energy,
            max_energy: def.max_energy,
            needs: Needs::default(),
            age: 0.0,
            maturity: 0.0,
            reproduction_cooldown: 0.0,
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
        id,
        x,
        y,
        size,
        health,
        max_health,
        kind,
        ..
    } = entity;
    let Kind::Animal(animal) = kind else { return };

    animal.needs.advance(dt, &ctx.config.needs);
    if animal.state != AnimalState::Resting {
        animal.energy = (animal.energy - ctx.config.needs.energy_drain_rate * dt).max(0.0);
    } else if animal.needs.well_fed(ctx.config.needs.rest_need_threshold) {
        *health = (*health + ctx.config.needs.rest_health_regen * dt).clamp(0.0, *max_health);
    }

    animal.age += dt;
    if animal.reproduction_cooldown > 0.0 {
        animal.reproduction_cooldown = (animal.reproduction_cooldown - dt).max(0.0);
    }

    animal.state_timer -= dt;
    if animal.state_timer <= 0.0 {
        choose_new_state(animal, *id, *x, *y, ctx, rng);
    }

    match animal.state {
        AnimalState::Hunting => handle_hunting(animal, *id, x, y, *size, dt, ctx, fx, rng),
        AnimalState::Fleeing => handle_fleeing(animal, x, y, dt, ctx),
        AnimalState::Resting => handle_resting(animal, dt, ctx),
        AnimalState::Wandering => handle_wandering(animal, x, y, *size, dt, ctx, rng),
        AnimalState::Idle => {}
    }

    let (width, height) = ctx.world_bounds();
    *x = x.clamp(0.0, width);
    *y = y.clamp(0.0, height);
}

fn choose_new_state(
    animal: &mut Animal,
    id: Uuid,
    x: f64,
    y: f64,
    ctx: &TickContext,
    rng: &mut ChaCha8Rng,
) {
    let cfg = &ctx.config.behavior;

    if animal.behavior == BehaviorClass::Prey {
        if let Some(threat) = nearest_threat(id, x, y, animal.vision_range, ctx) {
            animal.state = AnimalState::Fleeing;
            animal.target = Some(Target::Entity(threat));
            animal.state_timer = rng.gen_range(cfg.flee_timer_min..cfg.flee_timer_max);
            return;
        }
    }

    // An animal already resting keeps resting until it is actually
    // recovered; the low-energy threshold only governs entering.
    let still_tired = animal.state == AnimalState::Resting
        && animal.energy < animal.max_energy * cfg.rest_exit_fraction;
    if animal.energy < cfg.low_energy_threshold || still_tired {
        animal.state = AnimalState::Resting;
        animal.state_timer = rng.gen_range(cfg.rest_timer_min..cfg.rest_timer_max);
    } else if animal.behavior == BehaviorClass::Predator
        && animal.needs.hunger > cfg.hunt_hunger_threshold
    {
        animal.state = AnimalState::Hunting;
        animal.state_timer = rng.gen_range(cfg.hunt_timer_min..cfg.hunt_timer_max);
    } else {
        animal.state = AnimalState::Wandering;
        animal.state_timer = rng.gen_range(cfg.wander_timer_min..cfg.wander_timer_max);
    }
}

/// Closest predator within vision, if any.
fn nearest_threat(id: Uuid, x: f64, y: f64, vision: f64, ctx: &TickContext) -> Option<Uuid> {
    ctx.entities_in_range(x, y, vision)
        .into_iter()
        .filter(|v| v.id != id && v.behavior == Some(BehaviorClass::Predator))
        .min_by(|a, b| {
            let da = (a.x - x).powi(2) + (a.y - y).powi(2);
            let db = (b.x - x).powi(2) + (b.y - y).powi(2);
            da.total_cmp(&db)
        })
        .map(|v| v.id)
}

#[allow(clippy::too_many_arguments)]
fn handle_hunting(
    animal: &mut Animal,
    id: Uuid,
    x: &mut f64,
    y: &mut f64,
    size: f64,
    dt: f64,
    ctx: &TickContext,
    fx: &mut TickEffects,
    rng: &mut ChaCha8Rng,
) {
    let current = match animal.target {
        Some(Target::Entity(tid)) => ctx.view(tid),
        _ => None,
    };

    let target: &EntityView = match current {
        Some(view) => view,
        None => {
            let prey: Vec<&EntityView> = ctx
                .entities_in_range(*x, *y, animal.vision_range)
                .into_iter()
                .filter(|v| v.id != id && v.behavior == Some(BehaviorClass::Prey))
                .collect();
            if prey.is_empty() {
                animal.state = AnimalState::Wandering;
                animal.target = None;
                return;
            }
            let pick = prey[rng.gen_range(0..prey.len())];
            animal.target = Some(Target::Entity(pick.id));
            pick
        }
    };

    let dx = target.x - *x;
    let dy = target.y - *y;
    let dist = (dx * dx + dy * dy).sqrt();

    if dist < size {
        fx.deal_damage(target.id, animal.damage * dt);
        animal.state = AnimalState::Wandering;
        animal.target = None;
    } else {
        *x += dx / dist * animal.speed * dt;
        *y += dy / dist * animal.speed * dt;
    }
}

fn handle_fleeing(animal: &mut Animal, x: &mut f64, y: &mut f64, dt: f64, ctx: &TickContext) {
    let threat = match animal.target {
        Some(Target::Entity(tid)) => ctx.view(tid),
        _ => None,
    };
    let Some(threat) = threat else {
        animal.state = AnimalState::Wandering;
        animal.target = None;
        return;
    };

    let dx = *x - threat.x;
    let dy = *y - threat.y;
    let dist = (dx * dx + dy * dy).sqrt();

    if dist > animal.vision_range {
        animal.state = AnimalState::Wandering;
        animal.target = None;
    } else if dist > 0.0 {
        *x += dx / dist * animal.speed * dt;
        *y += dy / dist * animal.speed * dt;
    }
}

fn handle_resting(animal: &mut Animal, dt: f64, ctx: &TickContext) {
    animal.energy =
        (animal.energy + ctx.config.needs.rest_recovery_rate * dt).min(animal.max_energy);

    if animal.energy >= animal.max_energy * ctx.config.behavior.rest_exit_fraction {
        animal.state = AnimalState::Wandering;
    }
}

fn handle_wandering(
    animal: &mut Animal,
    x: &mut f64,
    y: &mut f64,
    size: f64,
    dt: f64,
    ctx: &TickContext,
    rng: &mut ChaCha8Rng,
) {
    let (tx, ty) = match animal.target {
        Some(Target::Point { x, y }) => (x, y),
        _ => {
            let cfg = &ctx.config.behavior;
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let distance = rng.gen_range(cfg.wander_distance_min..cfg.wander_distance_max);
            let (width, height) = ctx.world_bounds();
            let tx = (*x + angle.cos() * distance).clamp(0.0, width);
            let ty = (*y + angle.sin() * distance).clamp(0.0, height);
            animal.target = Some(Target::Point { x: tx, y: ty });
            (tx, ty)
        }
    };

    let dx = tx - *x;
    let dy = ty - *y;
    let dist = (dx * dx + dy * dy).sqrt();

    if dist < size {
        animal.target = None;
    } else {
        // Wandering moves at half speed.
        *x += dx / dist * animal.speed * 0.5 * dt;
        *y += dy / dist * animal.speed * 0.5 * dt;
    }
}
