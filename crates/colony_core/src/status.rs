use serde::{Deserialize, Serialize};

use crate::{ColonyState, Resource};

const NOMINAL_ABOVE: f64 = 70.0;
const CAUTION_ABOVE: f64 = 30.0;

/// Coarse band of a bounded resource, as shown on the colony panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    Nominal,
    Caution,
    Critical,
}

impl ResourceStatus {
    pub fn classify(value: f64) -> Self {
        if value > NOMINAL_ABOVE {
            Self::Nominal
        } else if value > CAUTION_ABOVE {
            Self::Caution
        } else {
            Self::Critical
        }
    }
}

/// Resources whose band differs between `before` and `after`.
pub fn status_changes(
    before: &ColonyState,
    after: &ColonyState,
) -> Vec<(Resource, ResourceStatus, ResourceStatus)> {
    Resource::ALL
        .iter()
        .filter_map(|&resource| {
            let from = ResourceStatus::classify(before.resource(resource));
            let to = ResourceStatus::classify(after.resource(resource));
            (from != to).then_some((resource, from, to))
        })
        .collect()
}

pub fn critical_count(colony: &ColonyState) -> u32 {
    Resource::ALL
        .iter()
        .filter(|&&r| ResourceStatus::classify(colony.resource(r)) == ResourceStatus::Critical)
        .count() as u32
}
