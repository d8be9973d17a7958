//! Content validation tests for the shipped JSON catalogs.
//!
//! These tests load the actual `content/*.json` files and check:
//! 1. Schema validity: all files deserialize without error
//! 2. Catalog invariants: the starter modules and event kinds exist
//! 3. Balance sanity: a new colony can afford something and survive a while

use colony_core::{
    advance_tick, resolve_effects, ColonyState, GameContent, ModuleDefId, ModuleEffect,
    PopulationBasis,
};
use colony_world::load_content;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Resolve the content directory relative to the workspace root.
fn content_dir() -> String {
    let manifest = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    format!("{manifest}/../../content")
}

fn load_test_content() -> &'static GameContent {
    static CONTENT: OnceLock<GameContent> = OnceLock::new();
    CONTENT.get_or_init(|| {
        load_content(&content_dir()).expect("load_content should succeed for production content")
    })
}

// =========================================================================
// 1. Schema validation
// =========================================================================

#[test]
fn content_loads_successfully() {
    let content = load_test_content();
    assert!(!content.content_version.is_empty());
}

#[test]
fn constants_match_documented_defaults() {
    let c = &load_test_content().constants;
    assert_eq!(c.tick_interval_ms, 1000);
    assert_eq!(c.event_check_interval_ticks, 10);
    assert!((c.event_chance - 0.05).abs() < f64::EPSILON);
    assert_eq!(c.population_basis, PopulationBasis::PreTick);
    assert_eq!(c.initial_colony.credits, 200);
    assert_eq!(c.initial_colony.day, 1);
}

// =========================================================================
// 2. Catalog invariants
// =========================================================================

#[test]
fn starter_modules_present() {
    let content = load_test_content();
    for name in ["Solar Array", "Greenhouse", "Habitat Dome"] {
        assert!(
            content.module_by_name(name).is_some(),
            "missing starter module '{name}'"
        );
    }
}

#[test]
fn starter_module_effects() {
    let content = load_test_content();
    let solar = ModuleEffect::of(content.module_by_name("Solar Array").unwrap());
    assert!((solar.energy - 20.0).abs() < f64::EPSILON);
    let greenhouse = ModuleEffect::of(content.module_by_name("Greenhouse").unwrap());
    assert!((greenhouse.food - 15.0).abs() < f64::EPSILON);
    assert!((greenhouse.oxygen - 5.0).abs() < f64::EPSILON);
    let dome = ModuleEffect::of(content.module_by_name("Habitat Dome").unwrap());
    assert!((dome.morale - 5.0).abs() < f64::EPSILON);
    assert!((dome.capacity - 5.0).abs() < f64::EPSILON);
}

#[test]
fn greenhouse_costs_150() {
    let content = load_test_content();
    let greenhouse = content
        .module(&ModuleDefId("module_greenhouse".to_string()))
        .unwrap();
    assert_eq!(greenhouse.cost, 150);
}

#[test]
fn every_event_has_an_impact() {
    let content = load_test_content();
    for event in &content.events {
        let i = &event.impact;
        assert!(
            i.energy.is_some() || i.morale.is_some() || i.population.is_some() || i.repair_cost.is_some(),
            "event '{}' has an empty impact",
            event.id
        );
        assert!(!event.description.is_empty(), "event '{}' has no description", event.id);
    }
}

#[test]
fn event_kinds_cover_notification_types() {
    let content = load_test_content();
    let kinds: HashSet<&str> = content.events.iter().map(|e| e.kind.as_str()).collect();
    for kind in [
        "solar_flare",
        "meteor_shower",
        "resource_discovery",
        "colony_illness",
        "tech_breakthrough",
    ] {
        assert!(kinds.contains(kind), "no event of kind '{kind}'");
    }
}

// =========================================================================
// 3. Balance sanity
// =========================================================================

#[test]
fn starting_credits_afford_a_module() {
    let content = load_test_content();
    let credits = content.constants.initial_colony.credits;
    assert!(
        content.modules.iter().any(|m| m.cost <= credits),
        "no module affordable with starting credits"
    );
}

#[test]
fn greenhouse_colony_keeps_food_up() {
    let content = load_test_content();
    let mut colony = ColonyState::from(&content.constants.initial_colony);
    colony.modules = vec!["Greenhouse".to_string()];
    let effect = resolve_effects(&colony.modules, content);
    for _ in 0..100 {
        colony = advance_tick(&colony, &effect, &content.constants);
    }
    assert!(colony.food > 50.0, "food collapsed to {}", colony.food);
}
