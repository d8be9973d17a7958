use super::*;
use crate::test_fixtures::{base_colony, base_content, base_session, colonizing_session};

mod session;

// --- Shared test helpers ------------------------------------------------

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{what}: expected {expected}, got {actual}"
    );
}

fn effects_for(names: &[&str], content: &GameContent) -> ModuleEffect {
    let modules: Vec<String> = names.iter().map(|n| (*n).to_string()).collect();
    resolve_effects(&modules, content)
}

fn command(session: &GameSession, command: Command) -> CommandEnvelope {
    make_command(&mut 0, session.colony.day, command)
}

fn module_id(id: &str) -> ModuleDefId {
    ModuleDefId(id.to_string())
}

fn event_id(id: &str) -> EventDefId {
    EventDefId(id.to_string())
}

fn planet_id(id: &str) -> PlanetId {
    PlanetId(id.to_string())
}

fn ignored_count(notices: &[NoticeEnvelope]) -> usize {
    notices
        .iter()
        .filter(|n| matches!(n.notice, Notice::CommandIgnored { .. }))
        .count()
}
