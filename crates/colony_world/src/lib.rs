//! Content loading and session setup shared between colony_cli and colony_daemon.

use anyhow::{Context, Result};
use colony_core::{
    ColonyState, Constants, Counters, EventDef, GameContent, GameSession, MetaState, ModuleDef,
    Phase, PlanetDef, RESOURCE_MAX, RESOURCE_MIN,
};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Deserialize)]
struct ConstantsFile {
    content_version: String,
    #[serde(flatten)]
    constants: Constants,
}

fn assert_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) {
    let mut seen = HashSet::new();
    for id in ids {
        assert!(!id.is_empty(), "{kind} has empty id");
        assert!(seen.insert(id), "duplicate {kind} id '{id}'");
    }
}

fn assert_in_resource_range(what: &str, value: f64) {
    assert!(
        (RESOURCE_MIN..=RESOURCE_MAX).contains(&value),
        "{what} {value} is outside [{RESOURCE_MIN}, {RESOURCE_MAX}]",
    );
}

/// Validates loaded content, panicking on any authoring error.
///
/// Catches mistakes like: duplicate catalog ids, two modules sharing a name
/// (names are how built modules are resolved), negative or non-finite module
/// outputs, and constants that would stall the tick or event schedule.
pub fn validate_content(content: &GameContent) {
    assert!(!content.planets.is_empty(), "content has no planets");

    assert_unique("planet", content.planets.iter().map(|p| p.id.0.as_str()));
    assert_unique("module", content.modules.iter().map(|m| m.id.0.as_str()));
    assert_unique("module name", content.modules.iter().map(|m| m.name.as_str()));
    assert_unique("event", content.events.iter().map(|e| e.id.0.as_str()));

    for module in &content.modules {
        for (field, value) in [
            ("energy_production", module.energy_production),
            ("energy_required", module.energy_required),
            ("produces_food", module.produces_food),
            ("oxygen_output", module.oxygen_output),
            ("boosts_morale", module.boosts_morale),
            ("supports_population", module.supports_population),
        ] {
            assert!(
                value.is_finite() && value >= 0.0,
                "module '{}' field {field} must be a non-negative number, got {value}",
                module.id,
            );
        }
    }

    for event in &content.events {
        let impact = &event.impact;
        for (field, value) in [
            ("energy", impact.energy),
            ("morale", impact.morale),
            ("population", impact.population),
        ] {
            if let Some(v) = value {
                assert!(
                    v.is_finite(),
                    "event '{}' impact {field} is not finite",
                    event.id,
                );
            }
        }
    }

    let c = &content.constants;
    assert!(c.tick_interval_ms > 0, "tick_interval_ms must be positive");
    assert!(
        c.event_check_interval_ticks > 0,
        "event_check_interval_ticks must be positive"
    );
    assert!(
        (0.0..=1.0).contains(&c.event_chance),
        "event_chance {} is not a probability",
        c.event_chance,
    );
    assert!(
        c.population_step > 0.0,
        "population_step must be positive"
    );
    assert!(
        c.base_population_capacity >= 1.0,
        "base_population_capacity must be at least 1"
    );
    assert!(
        c.energy_upkeep_per_tick >= 0.0 && c.credits_per_colonist >= 0.0,
        "upkeep and income rates must be non-negative"
    );

    let initial = &c.initial_colony;
    assert_in_resource_range("initial energy", initial.energy);
    assert_in_resource_range("initial food", initial.food);
    assert_in_resource_range("initial oxygen", initial.oxygen);
    assert_in_resource_range("initial morale", initial.morale);
    assert!(
        initial.population >= 1.0,
        "initial population must be at least 1"
    );
}

fn read_json<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T> {
    let text =
        std::fs::read_to_string(dir.join(name)).with_context(|| format!("reading {name}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {name}"))
}

pub fn load_content(content_dir: &str) -> Result<GameContent> {
    let dir = Path::new(content_dir);
    let constants_file: ConstantsFile = read_json(dir, "constants.json")?;
    let planets: Vec<PlanetDef> = read_json(dir, "planets.json")?;
    let modules: Vec<ModuleDef> = read_json(dir, "modules.json")?;
    let events: Vec<EventDef> = read_json(dir, "events.json")?;
    let content = GameContent {
        content_version: constants_file.content_version,
        planets,
        modules,
        events,
        constants: constants_file.constants,
    };
    validate_content(&content);
    Ok(content)
}

/// A fresh session at planet selection with the configured starting colony.
pub fn build_initial_session(content: &GameContent, seed: u64, rng: &mut impl Rng) -> GameSession {
    GameSession {
        meta: MetaState {
            session_id: colony_core::generate_uuid(rng),
            seed,
            schema_version: 1,
            content_version: content.content_version.clone(),
        },
        phase: Phase::PlanetSelection,
        selected_planet: None,
        colony: ColonyState::from(&content.constants.initial_colony),
        current_event: None,
        counters: Counters::default(),
    }
}
