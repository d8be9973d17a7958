use crate::colony::{apply_event, build_module, BuildRejected};
use crate::status::status_changes;
use crate::{
    ColonyState, Command, CommandEnvelope, CommandId, EventDefId, GameContent, GameSession,
    ModuleDefId, Notice, NoticeEnvelope, Phase, PlanetId,
};

/// Apply one command to the session. Commands that do not fit the current
/// phase, or that reference unknown catalog ids, are ignored with a
/// `CommandIgnored` notice.
pub(crate) fn apply_command(
    session: &mut GameSession,
    envelope: &CommandEnvelope,
    content: &GameContent,
    notices: &mut Vec<NoticeEnvelope>,
) {
    let outcome = match &envelope.command {
        Command::SelectPlanet { planet_id } => handle_select_planet(session, planet_id, content),
        Command::StartColonization => handle_start(session),
        Command::BuildModule { module_id } => handle_build(session, module_id, content),
        Command::TriggerEvent { event_id } => handle_trigger_event(session, event_id, content),
        Command::DismissEvent => handle_dismiss_event(session),
        Command::AbandonColony => handle_abandon(session, content),
    };
    match outcome {
        Ok(produced) => {
            for notice in produced {
                notices.push(crate::emit(session, notice));
            }
        }
        Err(reason) => notices.push(ignored(session, &envelope.id, reason)),
    }
}

fn ignored(session: &mut GameSession, command_id: &CommandId, reason: String) -> NoticeEnvelope {
    crate::emit(
        session,
        Notice::CommandIgnored {
            command_id: command_id.clone(),
            reason,
        },
    )
}

fn require_phase(session: &GameSession, phase: Phase) -> Result<(), String> {
    if session.phase == phase {
        Ok(())
    } else {
        Err(format!("not allowed during {:?}", session.phase))
    }
}

fn handle_select_planet(
    session: &mut GameSession,
    planet_id: &PlanetId,
    content: &GameContent,
) -> Result<Vec<Notice>, String> {
    require_phase(session, Phase::PlanetSelection)?;
    if content.planet(planet_id).is_none() {
        return Err(format!("unknown planet '{planet_id}'"));
    }
    session.selected_planet = Some(planet_id.clone());
    Ok(vec![Notice::PlanetSelected {
        planet_id: planet_id.clone(),
    }])
}

fn handle_start(session: &mut GameSession) -> Result<Vec<Notice>, String> {
    require_phase(session, Phase::PlanetSelection)?;
    let Some(planet_id) = session.selected_planet.clone() else {
        return Err("no planet selected".to_string());
    };
    session.phase = Phase::Colonization;
    Ok(vec![Notice::ColonizationStarted { planet_id }])
}

fn handle_build(
    session: &mut GameSession,
    module_id: &ModuleDefId,
    content: &GameContent,
) -> Result<Vec<Notice>, String> {
    require_phase(session, Phase::Colonization)?;
    let Some(def) = content.module(module_id) else {
        return Ok(vec![Notice::BuildRejected {
            module_id: module_id.clone(),
            reason: BuildRejected::UnknownModule,
        }]);
    };
    match build_module(&session.colony, def) {
        Ok(colony) => {
            session.colony = colony;
            Ok(vec![Notice::ModuleBuilt {
                module_id: def.id.clone(),
                name: def.name.clone(),
                cost: def.cost,
            }])
        }
        Err(reason) => Ok(vec![Notice::BuildRejected {
            module_id: module_id.clone(),
            reason,
        }]),
    }
}

fn handle_trigger_event(
    session: &mut GameSession,
    event_id: &EventDefId,
    content: &GameContent,
) -> Result<Vec<Notice>, String> {
    require_phase(session, Phase::Colonization)?;
    let Some(def) = content.event(event_id) else {
        return Err(format!("unknown event '{event_id}'"));
    };
    let after = apply_event(&session.colony, &def.impact);
    let mut produced = vec![Notice::EventTriggered {
        event_id: def.id.clone(),
        kind: def.kind.clone(),
        description: def.description.clone(),
    }];
    produced.extend(status_notices(&session.colony, &after));
    session.colony = after;
    session.current_event = Some(def.id.clone());
    Ok(produced)
}

fn handle_dismiss_event(session: &mut GameSession) -> Result<Vec<Notice>, String> {
    let Some(event_id) = session.current_event.take() else {
        return Err("no pending event".to_string());
    };
    Ok(vec![Notice::EventDismissed { event_id }])
}

fn handle_abandon(session: &mut GameSession, content: &GameContent) -> Result<Vec<Notice>, String> {
    require_phase(session, Phase::Colonization)?;
    let day = session.colony.day;
    session.phase = Phase::PlanetSelection;
    session.selected_planet = None;
    session.current_event = None;
    session.colony = ColonyState::from(&content.constants.initial_colony);
    Ok(vec![Notice::ColonyAbandoned { day }])
}

pub(crate) fn status_notices(before: &ColonyState, after: &ColonyState) -> Vec<Notice> {
    status_changes(before, after)
        .into_iter()
        .map(|(resource, from, to)| Notice::ResourceStatusChanged { resource, from, to })
        .collect()
}
