//! Harvestable resource nodes: depletion on harvest, throttled respawn.

use crate::model::config::ResourceSpecies;
use crate::model::entity::{Entity, Kind};
use crate::model::tick::TickContext;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResourceNode {
    pub quantity: u32,
    pub max_quantity: u32,
    /// Minimum seconds between automatic quantity increments.
    pub respawn_time: f64,
    /// Simulation time of the last harvest or respawn increment.
    pub last_harvest: f64,
}

impl ResourceNode {
    pub fn new(def: &ResourceSpecies, quantity: u32, now: f64) -> Self {
        Self {
            quantity: quantity.min(def.max_quantity),
            max_quantity: def.max_quantity,
            respawn_time: def.respawn_time,
            last_harvest: now,
        }
    }

    /// Removes up to `amount` units. A non-positive request is a no-op
    /// returning 0; otherwise the return value is `min(quantity, amount)`
    /// and the harvest timestamp is refreshed.
    pub fn harvest(&mut self, amount: u32, now: f64) -> u32 {
        if amount == 0 {
            return 0;
        }
        let taken = self.quantity.min(amount);
        self.quantity -= taken;
        if taken > 0 {
            self.last_harvest = now;
        }
        taken
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.quantity == 0
    }
}

/// Regrows one unit per elapsed respawn window. Refreshing the timestamp
/// on every increment throttles recovery to one unit per window.
pub(crate) fn update(entity: &mut Entity, ctx: &TickContext) {
    let Kind::Resource(node) = &mut entity.kind else {
        return;
    };
    let now = ctx.env.time();
    if node.quantity < node.max_quantity && now - node.last_harvest >= node.respawn_time {
        node.quantity += 1;
        node.last_harvest = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::SimConfig;

    fn node(quantity: u32, max: u32, respawn: f64) -> ResourceNode {
        let mut def = SimConfig::default().resource_species["wood"].clone();
        def.max_quantity = max;
        def.respawn_time = respawn;
        ResourceNode::new(&def, quantity, 0.0)
    }

    #[test]
    fn test_harvest_zero_is_noop() {
        let mut n = node(5, 20, 10.0);
        assert_eq!(n.harvest(0, 1.0), 0);
        assert_eq!(n.quantity, 5);
        assert_eq!(n.last_harvest, 0.0);
    }

    #[test]
    fn test_harvest_caps_at_quantity() {
        let mut n = node(5, 20, 10.0);
        assert_eq!(n.harvest(8, 1.0), 5);
        assert_eq!(n.quantity, 0);
        assert!(n.is_depleted());
        assert_eq!(n.last_harvest, 1.0);
    }

    #[test]
    fn test_initial_quantity_respects_maximum() {
        let n = node(50, 20, 10.0);
        assert_eq!(n.quantity, 20);
    }

    #[test]
    fn test_harvest_partial() {
        let mut n = node(5, 20, 10.0);
        assert_eq!(n.harvest(3, 2.0), 3);
        assert_eq!(n.quantity, 2);
    }
}
