//! Type definitions for `colony_core`.
//!
//! Colony state, catalog records, commands, and notices.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(PlanetId);
string_id!(ModuleDefId);
string_id!(EventDefId);
string_id!(CommandId);
string_id!(NoticeId);

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Normal,
    Debug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PlanetSelection,
    Colonization,
}

/// Which morale/food/oxygen values the population rule reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationBasis {
    /// Values as they were before this tick's updates (one-tick lag).
    #[default]
    PreTick,
    /// Values after this tick's resource and morale updates.
    PostUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Energy,
    Food,
    Oxygen,
    Morale,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Energy,
        Resource::Food,
        Resource::Oxygen,
        Resource::Morale,
    ];
}

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

/// The colony's resource record. Bounded fields are kept in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyState {
    pub energy: f64,
    pub food: f64,
    pub oxygen: f64,
    pub morale: f64,
    /// Never below 1; rounded to one decimal place by each tick.
    pub population: f64,
    pub credits: u64,
    /// Module names in construction order. Duplicates stack.
    pub modules: Vec<String>,
    pub day: u64,
}

impl ColonyState {
    pub fn resource(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Energy => self.energy,
            Resource::Food => self.food,
            Resource::Oxygen => self.oxygen,
            Resource::Morale => self.morale,
        }
    }
}

impl From<&InitialColony> for ColonyState {
    fn from(initial: &InitialColony) -> Self {
        Self {
            energy: initial.energy,
            food: initial.food,
            oxygen: initial.oxygen,
            morale: initial.morale,
            population: initial.population,
            credits: initial.credits,
            modules: Vec::new(),
            day: initial.day,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub meta: MetaState,
    pub phase: Phase,
    pub selected_planet: Option<PlanetId>,
    pub colony: ColonyState,
    /// Event currently shown to the player, cleared on dismissal.
    pub current_event: Option<EventDefId>,
    pub counters: Counters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaState {
    pub session_id: uuid::Uuid,
    pub seed: u64,
    pub schema_version: u32,
    pub content_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counters {
    pub next_notice_id: u64,
}

// ---------------------------------------------------------------------------
// Command types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub id: CommandId,
    pub issued_day: u64,
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    SelectPlanet { planet_id: PlanetId },
    StartColonization,
    BuildModule { module_id: ModuleDefId },
    TriggerEvent { event_id: EventDefId },
    DismissEvent,
    AbandonColony,
}

// ---------------------------------------------------------------------------
// Notice types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeEnvelope {
    pub id: NoticeId,
    pub day: u64,
    pub notice: Notice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Notice {
    PlanetSelected {
        planet_id: PlanetId,
    },
    ColonizationStarted {
        planet_id: PlanetId,
    },
    ModuleBuilt {
        module_id: ModuleDefId,
        name: String,
        cost: u64,
    },
    BuildRejected {
        module_id: ModuleDefId,
        reason: crate::BuildRejected,
    },
    EventTriggered {
        event_id: EventDefId,
        kind: String,
        description: String,
    },
    EventDismissed {
        event_id: EventDefId,
    },
    ColonyAbandoned {
        day: u64,
    },
    ResourceStatusChanged {
        resource: Resource,
        from: crate::ResourceStatus,
        to: crate::ResourceStatus,
    },
    CommandIgnored {
        command_id: CommandId,
        reason: String,
    },
    /// Only emitted at `NoticeLevel::Debug`.
    Ticked {
        day: u64,
        population: f64,
        credits: u64,
    },
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContent {
    pub content_version: String,
    pub planets: Vec<PlanetDef>,
    pub modules: Vec<ModuleDef>,
    pub events: Vec<EventDef>,
    pub constants: Constants,
}

impl GameContent {
    pub fn planet(&self, id: &PlanetId) -> Option<&PlanetDef> {
        self.planets.iter().find(|p| &p.id == id)
    }

    pub fn module(&self, id: &ModuleDefId) -> Option<&ModuleDef> {
        self.modules.iter().find(|m| &m.id == id)
    }

    pub fn module_by_name(&self, name: &str) -> Option<&ModuleDef> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn event(&self, id: &EventDefId) -> Option<&EventDef> {
        self.events.iter().find(|e| &e.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetDef {
    pub id: PlanetId,
    pub name: String,
    pub distance_ly: f64,
    /// Surface gravity in g.
    pub gravity: f64,
    /// Mean surface temperature in °C.
    pub temperature: f64,
    pub radiation: String,
    pub atmosphere: String,
    pub habitability: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDef {
    pub id: ModuleDefId,
    pub name: String,
    pub cost: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub energy_production: f64,
    #[serde(default)]
    pub energy_required: f64,
    #[serde(default)]
    pub produces_food: f64,
    #[serde(default)]
    pub oxygen_output: f64,
    #[serde(default)]
    pub boosts_morale: f64,
    #[serde(default)]
    pub supports_population: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDef {
    pub id: EventDefId,
    /// e.g. `solar_flare`, `meteor_shower`.
    pub kind: String,
    pub description: String,
    pub impact: EventImpact,
}

/// One-shot deltas. `None` is a no-op; `Some(0)` counts as present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventImpact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_cost: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialColony {
    pub energy: f64,
    pub food: f64,
    pub oxygen: f64,
    pub morale: f64,
    pub population: f64,
    pub credits: u64,
    pub day: u64,
}

impl Default for InitialColony {
    fn default() -> Self {
        Self {
            energy: 50.0,
            food: 40.0,
            oxygen: 60.0,
            morale: 75.0,
            population: 3.0,
            credits: 200,
            day: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constants {
    #[serde(default)]
    pub initial_colony: InitialColony,
    pub energy_upkeep_per_tick: f64,
    pub base_population_capacity: f64,
    /// Population change per tick when growing or declining.
    pub population_step: f64,
    pub credits_per_colonist: f64,
    /// Real-time length of one tick in the daemon.
    pub tick_interval_ms: u64,
    pub event_check_interval_ticks: u64,
    /// Probability that an event check fires an event.
    pub event_chance: f64,
    #[serde(default)]
    pub population_basis: PopulationBasis,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            initial_colony: InitialColony::default(),
            energy_upkeep_per_tick: 2.0,
            base_population_capacity: 3.0,
            population_step: 0.1,
            credits_per_colonist: 2.0,
            tick_interval_ms: 1000,
            event_check_interval_ticks: 10,
            event_chance: 0.05,
            population_basis: PopulationBasis::PreTick,
        }
    }
}
