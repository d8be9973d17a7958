use super::*;

#[test]
fn select_then_start() {
    let content = base_content();
    let mut session = base_session(&content);

    let select = command(
        &mut session,
        Command::SelectPlanet {
            planet_id: planet_id("planet_proxima_b"),
        },
    );
    let notices = apply(&mut session, &select, &content);
    assert!(matches!(notices[0].notice, Notice::PlanetSelected { .. }));
    assert_eq!(session.phase, Phase::PlanetSelection);

    let start = command(&mut session, Command::StartColonization);
    let notices = apply(&mut session, &start, &content);
    assert!(matches!(
        &notices[0].notice,
        Notice::ColonizationStarted { planet_id } if planet_id.0 == "planet_proxima_b"
    ));
    assert_eq!(session.phase, Phase::Colonization);
}

#[test]
fn selection_has_no_colony_effect() {
    let content = base_content();
    let mut session = base_session(&content);
    let before = session.colony.clone();
    let select = command(
        &mut session,
        Command::SelectPlanet {
            planet_id: planet_id("planet_kepler_442b"),
        },
    );
    apply(&mut session, &select, &content);
    assert_eq!(session.colony, before);
}

#[test]
fn unknown_planet_is_ignored() {
    let content = base_content();
    let mut session = base_session(&content);
    let select = command(
        &mut session,
        Command::SelectPlanet {
            planet_id: planet_id("planet_nowhere"),
        },
    );
    let notices = apply(&mut session, &select, &content);
    assert_eq!(ignored_count(&notices), 1);
    assert!(session.selected_planet.is_none());
}

#[test]
fn start_requires_a_selection() {
    let content = base_content();
    let mut session = base_session(&content);
    let start = command(&mut session, Command::StartColonization);
    let notices = apply(&mut session, &start, &content);
    assert_eq!(ignored_count(&notices), 1);
    assert_eq!(session.phase, Phase::PlanetSelection);
}

#[test]
fn tick_does_nothing_before_colonization() {
    let content = base_content();
    let mut session = base_session(&content);
    let notices = tick(&mut session, &[], &content, NoticeLevel::Debug);
    assert!(notices.is_empty());
    assert_eq!(session.colony.day, 1);
}

#[test]
fn tick_advances_colony() {
    let content = base_content();
    let mut session = colonizing_session(&content);
    tick(&mut session, &[], &content, NoticeLevel::Normal);
    assert_eq!(session.colony.day, 2);
    assert_eq!(session.colony.credits, 206);
}

#[test]
fn commands_apply_before_the_advance() {
    let content = base_content();
    let mut session = colonizing_session(&content);
    let build = command(
        &mut session,
        Command::BuildModule {
            module_id: module_id("module_solar_array"),
        },
    );
    let notices = tick(&mut session, &[build], &content, NoticeLevel::Normal);
    assert!(matches!(notices[0].notice, Notice::ModuleBuilt { cost: 100, .. }));
    // 100 left after the build, then +6 income; the array already produced.
    assert_eq!(session.colony.credits, 106);
    assert_close(session.colony.energy, 68.0, "energy");
}

#[test]
fn events_apply_after_the_advance() {
    let content = base_content();
    let mut session = colonizing_session(&content);
    let before = session.colony.clone();
    let flare = &content
        .event(&event_id("event_solar_flare"))
        .expect("fixture has a solar flare")
        .impact;
    let expected = apply_event(
        &advance_tick(&before, &effects_for(&[], &content), &content.constants),
        flare,
    );

    let trigger = command(
        &session,
        Command::TriggerEvent {
            event_id: event_id("event_solar_flare"),
        },
    );
    let notices = tick(&mut session, &[trigger], &content, NoticeLevel::Normal);

    // Upkeep runs on 50 energy (48, no shortage); the flare then takes 20.
    assert_close(session.colony.energy, 28.0, "energy");
    assert_close(session.colony.morale, 75.0, "morale");
    assert_eq!(session.colony, expected);
    assert_eq!(session.current_event, Some(event_id("event_solar_flare")));
    assert!(notices
        .iter()
        .any(|n| matches!(n.notice, Notice::EventTriggered { .. })));
}

#[test]
fn player_commands_still_precede_queued_events() {
    let content = base_content();
    let mut session = colonizing_session(&content);
    let trigger = command(
        &session,
        Command::TriggerEvent {
            event_id: event_id("event_meteor_shower"),
        },
    );
    let build = command(
        &session,
        Command::BuildModule {
            module_id: module_id("module_solar_array"),
        },
    );
    let notices = tick(&mut session, &[trigger, build], &content, NoticeLevel::Normal);
    assert!(matches!(notices[0].notice, Notice::ModuleBuilt { .. }));
    // 200 - 100 build + 6 income - 50 repair.
    assert_eq!(session.colony.credits, 56);
}

#[test]
fn build_rejected_is_a_notice_not_an_ignore() {
    let content = base_content();
    let mut session = colonizing_session(&content);
    session.colony.credits = 10;
    let build = command(
        &mut session,
        Command::BuildModule {
            module_id: module_id("module_greenhouse"),
        },
    );
    let before = session.colony.clone();
    let notices = apply(&mut session, &build, &content);
    assert!(matches!(
        notices[0].notice,
        Notice::BuildRejected {
            reason: BuildRejected::InsufficientCredits { cost: 150, available: 10 },
            ..
        }
    ));
    assert_eq!(session.colony, before);
}

#[test]
fn unknown_module_is_rejected() {
    let content = base_content();
    let mut session = colonizing_session(&content);
    let build = command(
        &mut session,
        Command::BuildModule {
            module_id: module_id("module_warp_gate"),
        },
    );
    let notices = apply(&mut session, &build, &content);
    assert!(matches!(
        notices[0].notice,
        Notice::BuildRejected {
            reason: BuildRejected::UnknownModule,
            ..
        }
    ));
}

#[test]
fn build_before_colonization_is_ignored() {
    let content = base_content();
    let mut session = base_session(&content);
    let build = command(
        &mut session,
        Command::BuildModule {
            module_id: module_id("module_solar_array"),
        },
    );
    let notices = apply(&mut session, &build, &content);
    assert_eq!(ignored_count(&notices), 1);
    assert_eq!(session.colony.credits, 200);
}

#[test]
fn triggered_event_is_pending_until_dismissed() {
    let content = base_content();
    let mut session = colonizing_session(&content);
    let trigger = command(
        &mut session,
        Command::TriggerEvent {
            event_id: event_id("event_meteor_shower"),
        },
    );
    let notices = apply(&mut session, &trigger, &content);
    assert!(matches!(notices[0].notice, Notice::EventTriggered { .. }));
    assert_eq!(session.current_event, Some(event_id("event_meteor_shower")));
    assert_eq!(session.colony.credits, 150);
    assert_close(session.colony.morale, 70.0, "morale");

    let colony_before = session.colony.clone();
    let dismiss = command(&mut session, Command::DismissEvent);
    let notices = apply(&mut session, &dismiss, &content);
    assert!(matches!(notices[0].notice, Notice::EventDismissed { .. }));
    assert!(session.current_event.is_none());
    assert_eq!(session.colony, colony_before);
}

#[test]
fn dismiss_without_event_is_ignored() {
    let content = base_content();
    let mut session = colonizing_session(&content);
    let dismiss = command(&mut session, Command::DismissEvent);
    assert_eq!(ignored_count(&apply(&mut session, &dismiss, &content)), 1);
}

#[test]
fn event_crossing_a_band_reports_status() {
    let content = base_content();
    let mut session = colonizing_session(&content);
    let trigger = command(
        &mut session,
        Command::TriggerEvent {
            event_id: event_id("event_solar_flare"),
        },
    );
    let notices = apply(&mut session, &trigger, &content);
    // Energy 50 -> 30: caution -> critical.
    assert!(notices.iter().any(|n| matches!(
        n.notice,
        Notice::ResourceStatusChanged {
            resource: Resource::Energy,
            from: ResourceStatus::Caution,
            to: ResourceStatus::Critical,
        }
    )));
}

#[test]
fn abandon_resets_to_selection() {
    let content = base_content();
    let mut session = colonizing_session(&content);
    for _ in 0..5 {
        tick(&mut session, &[], &content, NoticeLevel::Normal);
    }
    session.current_event = Some(event_id("event_solar_flare"));
    let abandon = command(&mut session, Command::AbandonColony);
    let notices = apply(&mut session, &abandon, &content);
    assert!(matches!(notices[0].notice, Notice::ColonyAbandoned { day: 6 }));
    assert_eq!(session.phase, Phase::PlanetSelection);
    assert!(session.selected_planet.is_none());
    assert!(session.current_event.is_none());
    assert_eq!(session.colony, base_colony());
}

#[test]
fn debug_level_reports_each_tick() {
    let content = base_content();
    let mut session = colonizing_session(&content);
    let notices = tick(&mut session, &[], &content, NoticeLevel::Debug);
    assert!(notices
        .iter()
        .any(|n| matches!(n.notice, Notice::Ticked { day: 2, .. })));
}

#[test]
fn notice_ids_are_sequential() {
    let content = base_content();
    let mut session = colonizing_session(&content);
    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.extend(
            tick(&mut session, &[], &content, NoticeLevel::Debug)
                .into_iter()
                .map(|n| n.id.0),
        );
    }
    assert_eq!(ids, vec!["ntc_000000", "ntc_000001", "ntc_000002"]);
}

#[test]
fn session_round_trips_through_json() {
    let content = base_content();
    let session = colonizing_session(&content);
    let json = serde_json::to_string(&session).unwrap();
    let back: GameSession = serde_json::from_str(&json).unwrap();
    assert_eq!(back.colony, session.colony);
    assert_eq!(back.phase, Phase::Colonization);
}
