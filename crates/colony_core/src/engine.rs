use crate::colony::advance_tick;
use crate::commands::{apply_command, status_notices};
use crate::effects::resolve_effects;
use crate::{Command, CommandEnvelope, GameContent, GameSession, Notice, NoticeEnvelope, NoticeLevel, Phase};

/// Advance the session by one tick.
///
/// Order of operations:
/// 1. Apply queued player commands in order.
/// 2. If the colony phase is active, resolve module effects from the catalog
///    and advance the colony.
/// 3. Apply queued `TriggerEvent` commands, so event deltas land after this
///    tick's production, morale and population updates.
///
/// Returns all notices produced this tick.
pub fn tick(
    session: &mut GameSession,
    commands: &[CommandEnvelope],
    content: &GameContent,
    level: NoticeLevel,
) -> Vec<NoticeEnvelope> {
    let mut notices = Vec::new();
    let (events, player): (Vec<&CommandEnvelope>, Vec<&CommandEnvelope>) = commands
        .iter()
        .partition(|envelope| matches!(envelope.command, Command::TriggerEvent { .. }));

    for envelope in player {
        apply_command(session, envelope, content, &mut notices);
    }

    if session.phase == Phase::Colonization {
        advance_colony(session, content, level, &mut notices);
    }

    for envelope in events {
        apply_command(session, envelope, content, &mut notices);
    }

    notices
}

/// Apply a single command outside the tick schedule, e.g. a player action.
pub fn apply(
    session: &mut GameSession,
    envelope: &CommandEnvelope,
    content: &GameContent,
) -> Vec<NoticeEnvelope> {
    let mut notices = Vec::new();
    apply_command(session, envelope, content, &mut notices);
    notices
}

fn advance_colony(
    session: &mut GameSession,
    content: &GameContent,
    level: NoticeLevel,
    notices: &mut Vec<NoticeEnvelope>,
) {
    let effect = resolve_effects(&session.colony.modules, content);
    let next = advance_tick(&session.colony, &effect, &content.constants);
    let changes = status_notices(&session.colony, &next);
    session.colony = next;

    for notice in changes {
        notices.push(crate::emit(session, notice));
    }
    if level == NoticeLevel::Debug {
        let notice = Notice::Ticked {
            day: session.colony.day,
            population: session.colony.population,
            credits: session.colony.credits,
        };
        notices.push(crate::emit(session, notice));
    }
}
