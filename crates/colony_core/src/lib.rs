//! `colony_core`: deterministic colony simulation.
//!
//! No IO, no network, no clocks. Callers own the session and schedule ticks.

mod colony;
mod commands;
mod context;
mod effects;
mod engine;
mod id;
pub mod metrics;
mod status;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use colony::{
    advance_tick, apply_event, build_module, clamp_resource, BuildRejected, POPULATION_FLOOR,
    RESOURCE_MAX, RESOURCE_MIN,
};
pub use context::assistant_context;
pub use effects::{population_capacity, resolve_effects, ModuleEffect};
pub use engine::{apply, tick};
pub use id::generate_uuid;
pub use metrics::{compute_metrics, MetricsFileWriter, MetricsSnapshot};
pub use status::{critical_count, status_changes, ResourceStatus};
pub use types::*;

pub(crate) fn emit(session: &mut GameSession, notice: Notice) -> NoticeEnvelope {
    let id = NoticeId(format!("ntc_{:06}", session.counters.next_notice_id));
    session.counters.next_notice_id += 1;
    NoticeEnvelope {
        id,
        day: session.colony.day,
        notice,
    }
}

/// Allocate a command id and wrap `command` in an envelope.
pub fn make_command(next_id: &mut u64, issued_day: u64, command: Command) -> CommandEnvelope {
    let id = CommandId(format!("cmd_{:06}", *next_id));
    *next_id += 1;
    CommandEnvelope {
        id,
        issued_day,
        command,
    }
}

#[cfg(test)]
mod tests;
