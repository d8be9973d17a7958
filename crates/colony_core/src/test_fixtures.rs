//! Shared test fixtures for colony_core and downstream crates.
//!
//! `base_content()` mirrors the shipped catalog in a compact form: two
//! planets, the four starter modules, and a handful of events.

use crate::{
    ColonyState, Constants, Counters, EventDef, EventDefId, EventImpact, GameContent, GameSession,
    MetaState, ModuleDef, ModuleDefId, Phase, PlanetDef, PlanetId,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

fn module(id: &str, name: &str, cost: u64) -> ModuleDef {
    ModuleDef {
        id: ModuleDefId(id.to_string()),
        name: name.to_string(),
        cost,
        description: String::new(),
        energy_production: 0.0,
        energy_required: 0.0,
        produces_food: 0.0,
        oxygen_output: 0.0,
        boosts_morale: 0.0,
        supports_population: 0.0,
    }
}

fn event(id: &str, kind: &str, impact: EventImpact) -> EventDef {
    EventDef {
        id: EventDefId(id.to_string()),
        kind: kind.to_string(),
        description: format!("{kind} test event"),
        impact,
    }
}

pub fn base_content() -> GameContent {
    GameContent {
        content_version: "test".to_string(),
        planets: vec![
            PlanetDef {
                id: PlanetId("planet_kepler_442b".to_string()),
                name: "Kepler-442b".to_string(),
                distance_ly: 1206.0,
                gravity: 1.3,
                temperature: -2.0,
                radiation: "Low".to_string(),
                atmosphere: "Unknown".to_string(),
                habitability: "High".to_string(),
            },
            PlanetDef {
                id: PlanetId("planet_proxima_b".to_string()),
                name: "Proxima Centauri b".to_string(),
                distance_ly: 4.2,
                gravity: 1.1,
                temperature: -39.0,
                radiation: "High".to_string(),
                atmosphere: "Thin".to_string(),
                habitability: "Medium".to_string(),
            },
        ],
        modules: vec![
            ModuleDef {
                energy_production: 20.0,
                ..module("module_solar_array", "Solar Array", 100)
            },
            ModuleDef {
                produces_food: 15.0,
                oxygen_output: 5.0,
                ..module("module_greenhouse", "Greenhouse", 150)
            },
            ModuleDef {
                boosts_morale: 5.0,
                supports_population: 5.0,
                ..module("module_habitat_dome", "Habitat Dome", 200)
            },
            ModuleDef {
                energy_required: 10.0,
                ..module("module_research_lab", "Research Lab", 250)
            },
        ],
        events: vec![
            event(
                "event_solar_flare",
                "solar_flare",
                EventImpact {
                    energy: Some(-20.0),
                    ..EventImpact::default()
                },
            ),
            event(
                "event_meteor_shower",
                "meteor_shower",
                EventImpact {
                    repair_cost: Some(50),
                    morale: Some(-5.0),
                    ..EventImpact::default()
                },
            ),
            event(
                "event_colony_illness",
                "colony_illness",
                EventImpact {
                    population: Some(-1.0),
                    morale: Some(-10.0),
                    ..EventImpact::default()
                },
            ),
            event(
                "event_new_arrivals",
                "resource_discovery",
                EventImpact {
                    population: Some(2.0),
                    morale: Some(10.0),
                    ..EventImpact::default()
                },
            ),
        ],
        constants: Constants::default(),
    }
}

/// The documented starting colony.
pub fn base_colony() -> ColonyState {
    ColonyState {
        energy: 50.0,
        food: 40.0,
        oxygen: 60.0,
        morale: 75.0,
        population: 3.0,
        credits: 200,
        modules: vec![],
        day: 1,
    }
}

pub fn base_session(content: &GameContent) -> GameSession {
    GameSession {
        meta: MetaState {
            session_id: uuid::Uuid::nil(),
            seed: 42,
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

/// A session already in the colony phase on Kepler-442b.
pub fn colonizing_session(content: &GameContent) -> GameSession {
    let mut session = base_session(content);
    session.selected_planet = Some(PlanetId("planet_kepler_442b".to_string()));
    session.phase = Phase::Colonization;
    session
}
