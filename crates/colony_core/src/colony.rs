//! The colony update rules: per-tick advance, one-shot events, construction.
//!
//! All three are pure: they read a `ColonyState` and return a new one.

use serde::{Deserialize, Serialize};

use crate::effects::{population_capacity, ModuleEffect};
use crate::{ColonyState, Constants, EventImpact, ModuleDef, PopulationBasis};

pub const RESOURCE_MIN: f64 = 0.0;
pub const RESOURCE_MAX: f64 = 100.0;
pub const POPULATION_FLOOR: f64 = 1.0;

/// Below this, energy/food/oxygen cost morale every tick.
const SHORTAGE_THRESHOLD: f64 = 30.0;
/// Above this on all three resources, morale recovers by one per tick.
const ABUNDANCE_THRESHOLD: f64 = 70.0;

const ENERGY_SHORTAGE_MORALE: f64 = -2.0;
const FOOD_SHORTAGE_MORALE: f64 = -3.0;
const OXYGEN_SHORTAGE_MORALE: f64 = -5.0;
const ABUNDANCE_MORALE: f64 = 1.0;

const GROWTH_MORALE: f64 = 80.0;
const GROWTH_SUPPLY: f64 = 50.0;
const DECLINE_MORALE: f64 = 20.0;
const DECLINE_SUPPLY: f64 = 10.0;

/// A declined construction. Not a fault: the colony is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum BuildRejected {
    #[error("insufficient credits: need {cost}, have {available}")]
    InsufficientCredits { cost: u64, available: u64 },
    #[error("unknown module")]
    UnknownModule,
}

pub fn clamp_resource(value: f64) -> f64 {
    value.clamp(RESOURCE_MIN, RESOURCE_MAX)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sum of the four independent morale terms for this tick.
fn morale_change(energy: f64, food: f64, oxygen: f64) -> f64 {
    let mut change = 0.0;
    if energy < SHORTAGE_THRESHOLD {
        change += ENERGY_SHORTAGE_MORALE;
    }
    if food < SHORTAGE_THRESHOLD {
        change += FOOD_SHORTAGE_MORALE;
    }
    if oxygen < SHORTAGE_THRESHOLD {
        change += OXYGEN_SHORTAGE_MORALE;
    }
    if energy > ABUNDANCE_THRESHOLD && food > ABUNDANCE_THRESHOLD && oxygen > ABUNDANCE_THRESHOLD
    {
        change += ABUNDANCE_MORALE;
    }
    change
}

fn next_population(
    population: f64,
    (morale, food, oxygen): (f64, f64, f64),
    capacity: f64,
    step: f64,
) -> f64 {
    let next = if morale > GROWTH_MORALE && food > GROWTH_SUPPLY && oxygen > GROWTH_SUPPLY {
        capacity.min(population + step)
    } else if morale < DECLINE_MORALE || food < DECLINE_SUPPLY || oxygen < DECLINE_SUPPLY {
        POPULATION_FLOOR.max(population - step)
    } else {
        population
    };
    round_to_tenth(next)
}

/// Advance the colony by one tick.
///
/// Order of operations:
/// 1. Energy pays upkeep, food and oxygen pay one unit per colonist; module
///    production is added and each is clamped to `[0, 100]`.
/// 2. Morale moves by the shortage/abundance terms (read from the values of
///    step 1) plus module bonuses, then is clamped.
/// 3. Population grows toward capacity or declines toward 1, reading the
///    basis selected by `constants.population_basis`, and is rounded to 0.1.
/// 4. Credits accrue `floor(population * credits_per_colonist)`.
/// 5. Day increments.
pub fn advance_tick(
    colony: &ColonyState,
    effect: &ModuleEffect,
    constants: &Constants,
) -> ColonyState {
    let energy = clamp_resource(colony.energy - constants.energy_upkeep_per_tick + effect.energy);
    let food = clamp_resource(colony.food - colony.population + effect.food);
    let oxygen = clamp_resource(colony.oxygen - colony.population + effect.oxygen);
    let morale =
        clamp_resource(colony.morale + morale_change(energy, food, oxygen) + effect.morale);

    let basis = match constants.population_basis {
        PopulationBasis::PreTick => (colony.morale, colony.food, colony.oxygen),
        PopulationBasis::PostUpdate => (morale, food, oxygen),
    };
    let population = next_population(
        colony.population,
        basis,
        population_capacity(effect, constants),
        constants.population_step,
    );

    let income = (population * constants.credits_per_colonist).floor().max(0.0) as u64;

    ColonyState {
        energy,
        food,
        oxygen,
        morale,
        population,
        credits: colony.credits.saturating_add(income),
        modules: colony.modules.clone(),
        day: colony.day + 1,
    }
}

/// Apply a one-shot event impact. Fields the impact leaves unset are untouched.
///
/// Population only has a lower clamp here; growth past capacity through an
/// event is allowed.
pub fn apply_event(colony: &ColonyState, impact: &EventImpact) -> ColonyState {
    let mut next = colony.clone();
    if let Some(delta) = impact.energy {
        next.energy = clamp_resource(next.energy + delta);
    }
    if let Some(delta) = impact.morale {
        next.morale = clamp_resource(next.morale + delta);
    }
    if let Some(delta) = impact.population {
        next.population = POPULATION_FLOOR.max(next.population + delta);
    }
    if let Some(cost) = impact.repair_cost {
        next.credits = next.credits.saturating_sub(cost);
    }
    next
}

/// Pay for and append a module. Rejected without any change when the colony
/// cannot afford it.
pub fn build_module(colony: &ColonyState, def: &ModuleDef) -> Result<ColonyState, BuildRejected> {
    if colony.credits < def.cost {
        return Err(BuildRejected::InsufficientCredits {
            cost: def.cost,
            available: colony.credits,
        });
    }
    let mut next = colony.clone();
    next.credits -= def.cost;
    next.modules.push(def.name.clone());
    Ok(next)
}
