use proptest::prelude::*;
use wildgrove_lib::model::config::{NeedsConfig, SimConfig};
use wildgrove_lib::model::needs::{approach, Needs};
use wildgrove_lib::model::plant::Plant;
use wildgrove_lib::model::resource::ResourceNode;

proptest! {
    #[test]
    fn needs_stay_in_bounds_under_any_tick_sequence(
        steps in prop::collection::vec(0.0f64..10.0, 1..200),
    ) {
        let cfg = NeedsConfig::default();
        let mut needs = Needs::default();
        for dt in steps {
            needs.advance(dt, &cfg);
            prop_assert!((0.0..=100.0).contains(&needs.hunger));
            prop_assert!((0.0..=100.0).contains(&needs.thirst));
        }
    }

    #[test]
    fn approach_never_overshoots_its_target(
        current in 0.0f64..100.0,
        target in -50.0f64..150.0,
        rise in 0.1f64..50.0,
        fall in 0.1f64..50.0,
        dt in 0.001f64..10.0,
    ) {
        let next = approach(current, target, rise, fall, dt);
        let clamped_target = target.clamp(0.0, 100.0);
        prop_assert!((0.0..=100.0).contains(&next));
        if current < clamped_target {
            prop_assert!(next >= current);
            prop_assert!(next <= clamped_target);
        } else {
            prop_assert!(next <= current);
            prop_assert!(next >= clamped_target);
        }
    }

    #[test]
    fn harvest_never_exceeds_request_or_stock(
        quantity in 0u32..500,
        amount in 0u32..500,
    ) {
        let mut def = SimConfig::default().resource_species["wood"].clone();
        def.max_quantity = 500;
        let mut node = ResourceNode::new(&def, quantity, 0.0);
        let before = node.quantity;
        let taken = node.harvest(amount, 1.0);
        prop_assert!(taken <= amount);
        prop_assert!(taken <= before);
        prop_assert_eq!(node.quantity, before - taken);
    }

    #[test]
    fn new_plant_growth_is_always_in_unit_range(
        growth in -5.0f64..5.0,
    ) {
        let config = SimConfig::default();
        let plant = Plant::new(&config.plant_species["tree"], growth);
        prop_assert!((0.0..=1.0).contains(&plant.growth));
    }
}
