use crate::state::{AppState, ColonyTimers, SimState};
use colony_core::{make_command, Command, Constants, NoticeLevel, Phase};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Spawn the tick task and the event-check task for a freshly started colony.
pub fn spawn_timers(app: &AppState, constants: &Constants) -> ColonyTimers {
    let tick_period = Duration::from_millis(constants.tick_interval_ms.max(1));
    let event_period = tick_period * constants.event_check_interval_ticks.max(1) as u32;
    let stopped = Arc::new(AtomicBool::new(false));
    ColonyTimers {
        tick: tokio::spawn(run_tick_loop(app.clone(), stopped.clone(), tick_period)),
        events: tokio::spawn(run_event_loop(app.clone(), stopped.clone(), event_period)),
        stopped,
    }
}

fn interval_after(period: Duration) -> tokio::time::Interval {
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Stop both timers if the colony phase has ended. Called with the sim lock
/// held so a concurrent start cannot install timers in between.
fn stop_if_ended(app: &AppState, stopped: &AtomicBool, sim: &SimState) -> bool {
    if stopped.load(Ordering::Relaxed) {
        return true;
    }
    if sim.session.phase == Phase::Colonization {
        return false;
    }
    tracing::info!("colony phase ended, stopping timers");
    drop(app.timers.lock().take());
    true
}

pub async fn run_tick_loop(app: AppState, stopped: Arc<AtomicBool>, period: Duration) {
    let mut interval = interval_after(period);
    loop {
        interval.tick().await;
        if app.paused.load(Ordering::Relaxed) {
            continue;
        }

        let notices = {
            let mut guard = app.sim.lock();
            if stop_if_ended(&app, &stopped, &guard) {
                return;
            }
            let SimState {
                ref mut session,
                ref content,
                ..
            } = *guard;
            let notices = colony_core::tick(session, &[], content, NoticeLevel::Normal);
            let snapshot = colony_core::compute_metrics(&guard.session, &guard.content);
            guard.push_metrics(snapshot);
            notices
        };

        if !notices.is_empty() {
            let _ = app.event_tx.send(notices);
        }
    }
}

pub async fn run_event_loop(app: AppState, stopped: Arc<AtomicBool>, period: Duration) {
    let mut interval = interval_after(period);
    loop {
        interval.tick().await;
        if app.paused.load(Ordering::Relaxed) {
            continue;
        }

        let notices = {
            let mut guard = app.sim.lock();
            if stop_if_ended(&app, &stopped, &guard) {
                return;
            }
            let SimState {
                ref mut session,
                ref content,
                ref mut events,
                ref mut next_command_id,
                ..
            } = *guard;
            let Some(event_id) = events.check(content) else {
                continue;
            };
            tracing::info!(event = %event_id, day = session.colony.day, "random event");
            let envelope = make_command(
                next_command_id,
                session.colony.day,
                Command::TriggerEvent { event_id },
            );
            colony_core::apply(session, &envelope, content)
        };

        let _ = app.event_tx.send(notices);
    }
}
