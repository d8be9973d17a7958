use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::{GameContent, ModuleDef};

/// Per-tick deltas contributed by one module, or by a whole colony when summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleEffect {
    /// Production minus consumption.
    pub energy: f64,
    pub food: f64,
    pub oxygen: f64,
    pub morale: f64,
    pub capacity: f64,
}

impl ModuleEffect {
    pub fn of(def: &ModuleDef) -> Self {
        Self {
            energy: def.energy_production - def.energy_required,
            food: def.produces_food,
            oxygen: def.oxygen_output,
            morale: def.boosts_morale,
            capacity: def.supports_population,
        }
    }

    fn scaled(self, count: usize) -> Self {
        let n = count as f64;
        Self {
            energy: self.energy * n,
            food: self.food * n,
            oxygen: self.oxygen * n,
            morale: self.morale * n,
            capacity: self.capacity * n,
        }
    }
}

impl std::ops::Add for ModuleEffect {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            energy: self.energy + rhs.energy,
            food: self.food + rhs.food,
            oxygen: self.oxygen + rhs.oxygen,
            morale: self.morale + rhs.morale,
            capacity: self.capacity + rhs.capacity,
        }
    }
}

impl std::iter::Sum for ModuleEffect {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, e| acc + e)
    }
}

/// Resolve a colony's built module names into one summed effect.
///
/// Each occurrence of a name stacks. Names missing from the catalog
/// contribute nothing. Summation follows catalog order so the result does
/// not depend on hash iteration order.
pub fn resolve_effects(modules: &[String], content: &GameContent) -> ModuleEffect {
    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for name in modules {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }
    content
        .modules
        .iter()
        .filter_map(|def| {
            counts
                .get(def.name.as_str())
                .map(|&count| ModuleEffect::of(def).scaled(count))
        })
        .sum()
}

/// Population ceiling reachable through tick growth.
pub fn population_capacity(effect: &ModuleEffect, constants: &crate::Constants) -> f64 {
    constants.base_population_capacity + effect.capacity
}
