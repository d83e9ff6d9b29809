//! Bounded need values and their decay/replenishment rules.
//!
//! Every need is a scalar in `[0, 100]`. Mutation helpers in this module
//! clamp on every write so callers never observe an out-of-range value,
//! no matter how large the delta-time step is.

use crate::model::config::NeedsConfig;
use serde::{Deserialize, Serialize};

pub const NEED_MIN: f64 = 0.0;
pub const NEED_MAX: f64 = 100.0;

/// Clamps a need value into its documented `[0, 100]` bound.
#[inline]
pub fn clamp_need(value: f64) -> f64 {
    value.clamp(NEED_MIN, NEED_MAX)
}

/// Moves `current` toward `target` at asymmetric rates (a faster rise than
/// fall), never overshooting the target and never leaving `[0, 100]`.
pub fn approach(current: f64, target: f64, rise: f64, fall: f64, dt: f64) -> f64 {
    let target = clamp_need(target);
    let next = if target > current {
        (current + rise * dt).min(target)
    } else {
        (current - fall * dt).max(target)
    };
    clamp_need(next)
}

/// Biological demands tracked per animal.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Needs {
    pub hunger: f64,
    pub thirst: f64,
}

impl Needs {
    /// Advances hunger and thirst by their per-second rates.
    pub fn advance(&mut self, dt: f64, cfg: &NeedsConfig) {
        self.hunger = clamp_need(self.hunger + cfg.hunger_rate * dt);
        self.thirst = clamp_need(self.thirst + cfg.thirst_rate * dt);
    }

    pub fn well_fed(&self, threshold: f64) -> bool {
        self.hunger < threshold && self.thirst < threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_cap_at_maximum() {
        let mut needs = Needs::default();
        let cfg = NeedsConfig::default();
        needs.advance(1000.0, &cfg);
        assert_eq!(needs.hunger, NEED_MAX);
        assert_eq!(needs.thirst, NEED_MAX);
    }

    #[test]
    fn test_approach_rises_faster_than_it_falls() {
        let up = approach(50.0, 100.0, 10.0, 5.0, 1.0);
        assert_eq!(up, 60.0);
        let down = approach(50.0, 0.0, 10.0, 5.0, 1.0);
        assert_eq!(down, 45.0);
    }

    #[test]
    fn test_approach_never_overshoots_target() {
        let v = approach(99.0, 100.0, 50.0, 5.0, 1.0);
        assert_eq!(v, 100.0);
        let v = approach(2.0, 0.0, 10.0, 50.0, 1.0);
        assert_eq!(v, 0.0);
    }
}
