use crate::model::animal::Animal;
use crate::model::config::{AnimalSpecies, PlantSpecies, ResourceSpecies};
use crate::model::plant::Plant;
use crate::model::resource::ResourceNode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminant for the three agent families, used wherever only the
/// family matters and not the variant payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityClass {
    Animal,
    Plant,
    Resource,
}

/// Variant payload. Serialized with an inline `kind` tag so the persisted
/// per-entity record is a single flat, kind-tagged object.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Kind {
    Animal(Animal),
    Plant(Plant),
    Resource(ResourceNode),
}

impl Kind {
    #[must_use]
    pub fn class(&self) -> EntityClass {
        match self {
            Kind::Animal(_) => EntityClass::Animal,
            Kind::Plant(_) => EntityClass::Plant,
            Kind::Resource(_) => EntityClass::Resource,
        }
    }
}

/// A simulated agent. Common identity and vitality live here; everything
/// family-specific lives in the `kind` payload.
///
/// `size` is derived state (for plants it follows growth) and is rebuilt
/// after loading rather than persisted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Entity {
    pub id: Uuid,
    pub species: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip)]
    pub size: f64,
    pub health: f64,
    pub max_health: f64,
    pub active: bool,
    #[serde(flatten)]
    pub kind: Kind,
}

impl Entity {
    pub fn animal(species: &str, def: &AnimalSpecies, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            species: species.to_string(),
            x,
            y,
            size: def.size,
            health: def.health,
            max_health: def.health,
            active: true,
            kind: Kind::Animal(Animal::new(def)),
        }
    }

    pub fn plant(species: &str, def: &PlantSpecies, x: f64, y: f64, growth: f64) -> Self {
        let growth = growth.clamp(0.0, 1.0);
        Self {
            id: Uuid::new_v4(),
            species: species.to_string(),
            x,
            y,
            size: def.max_size * growth,
            health: def.health,
            max_health: def.health,
            active: true,
            kind: Kind::Plant(Plant::new(def, growth)),
        }
    }

    pub fn resource(
        species: &str,
        def: &ResourceSpecies,
        x: f64,
        y: f64,
        quantity: u32,
        now: f64,
        tile_size: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            species: species.to_string(),
            x,
            y,
            size: tile_size,
            health: 1.0,
            max_health: 1.0,
            active: true,
            kind: Kind::Resource(ResourceNode::new(def, quantity, now)),
        }
    }

    /// Applies damage, clamping health into `[0, max_health]`.
    pub fn apply_damage(&mut self, amount: f64) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
    }

    /// Restores health, clamping to `max_health`.
    pub fn heal(&mut self, amount: f64) {
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    #[must_use]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }

    #[must_use]
    pub fn as_animal(&self) -> Option<&Animal> {
        match &self.kind {
            Kind::Animal(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_animal_mut(&mut self) -> Option<&mut Animal> {
        match &mut self.kind {
            Kind::Animal(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_plant(&self) -> Option<&Plant> {
        match &self.kind {
            Kind::Plant(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_plant_mut(&mut self) -> Option<&mut Plant> {
        match &mut self.kind {
            Kind::Plant(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_resource(&self) -> Option<&ResourceNode> {
        match &self.kind {
            Kind::Resource(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_resource_mut(&mut self) -> Option<&mut ResourceNode> {
        match &mut self.kind {
            Kind::Resource(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::SimConfig;

    #[test]
    fn test_damage_clamps_health() {
        let config = SimConfig::default();
        let def = &config.animal_species["wolf"];
        let mut wolf = Entity::animal("wolf", def, 10.0, 10.0);
        wolf.apply_damage(5000.0);
        assert_eq!(wolf.health, 0.0);
        assert!(wolf.is_dead());
        wolf.heal(5000.0);
        assert_eq!(wolf.health, wolf.max_health);
    }

    #[test]
    fn test_plant_size_follows_growth() {
        let config = SimConfig::default();
        let def = &config.plant_species["tree"];
        let plant = Entity::plant("tree", def, 0.0, 0.0, 0.5);
        assert!((plant.size - def.max_size * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_persisted_record_is_kind_tagged() {
        let config = SimConfig::default();
        let def = &config.animal_species["deer"];
        let deer = Entity::animal("deer", def, 3.0, 4.0);

        let json = serde_json::to_value(&deer).unwrap();
        assert_eq!(json["kind"], "animal");
        assert_eq!(json["species"], "deer");
        assert_eq!(json["x"], 3.0);
        // Derived fields stay out of the record.
        assert!(json.get("size").is_none());

        let back: Entity = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, deer.id);
        assert!(back.as_animal().is_some());
    }
}
