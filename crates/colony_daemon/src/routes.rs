use crate::state::{AppState, SimState};
use crate::tick_loop::spawn_timers;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{
        sse::{Event, Sse},
        Json,
    },
    routing::{get, post},
    Router,
};
use colony_core::{make_command, Command, ModuleDefId, Notice, NoticeEnvelope, PlanetId};
use serde::Deserialize;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

type ApiError = (StatusCode, Json<serde_json::Value>);

#[cfg(test)]
pub fn make_router(state: AppState) -> Router {
    make_router_with_cors(state, "http://localhost:5173")
}

pub fn make_router_with_cors(state: AppState, cors_origin: &str) -> Router {
    let origin = cors_origin
        .parse::<axum::http::HeaderValue>()
        .unwrap_or_else(|_| axum::http::HeaderValue::from_static("http://localhost:5173"));
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/meta", get(meta_handler))
        .route("/api/v1/snapshot", get(snapshot_handler))
        .route("/api/v1/planets", get(planets_handler))
        .route("/api/v1/modules", get(modules_handler))
        .route("/api/v1/events", get(events_handler))
        .route("/api/v1/metrics", get(metrics_handler))
        .route("/api/v1/context", get(context_handler))
        .route("/api/v1/stream", get(stream_handler))
        .route("/api/v1/select_planet", post(select_planet_handler))
        .route("/api/v1/start", post(start_handler))
        .route("/api/v1/build", post(build_handler))
        .route("/api/v1/dismiss_event", post(dismiss_event_handler))
        .route("/api/v1/abandon", post(abandon_handler))
        .route("/api/v1/pause", post(pause_handler))
        .route("/api/v1/resume", post(resume_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

// ---------------------------------------------------------------------------
// Read-only views
// ---------------------------------------------------------------------------

pub async fn meta_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let sim = app_state.sim.lock();
    let paused = app_state.paused.load(Ordering::Relaxed);
    let timers_running = app_state
        .timers
        .lock()
        .as_ref()
        .is_some_and(|timers| !timers.is_finished());
    Json(serde_json::json!({
        "session_id": sim.session.meta.session_id,
        "seed": sim.session.meta.seed,
        "content_version": sim.session.meta.content_version,
        "phase": sim.session.phase,
        "day": sim.session.colony.day,
        "tick_interval_ms": sim.content.constants.tick_interval_ms,
        "paused": paused,
        "timers_running": timers_running,
    }))
}

pub async fn snapshot_handler(
    State(app_state): State<AppState>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let sim = app_state.sim.lock();
    match serde_json::to_string(&sim.session) {
        Ok(json) => {
            drop(sim);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                json,
            )
        }
        Err(err) => {
            tracing::error!("snapshot serialization failed: {err}");
            drop(sim);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"error":"serialization failed"}"#.to_string(),
            )
        }
    }
}

pub async fn planets_handler(
    State(app_state): State<AppState>,
) -> Json<Vec<colony_core::PlanetDef>> {
    Json(app_state.sim.lock().content.planets.clone())
}

pub async fn modules_handler(
    State(app_state): State<AppState>,
) -> Json<Vec<colony_core::ModuleDef>> {
    Json(app_state.sim.lock().content.modules.clone())
}

pub async fn events_handler(State(app_state): State<AppState>) -> Json<Vec<colony_core::EventDef>> {
    Json(app_state.sim.lock().content.events.clone())
}

pub async fn metrics_handler(
    State(app_state): State<AppState>,
) -> Json<VecDeque<colony_core::MetricsSnapshot>> {
    let sim = app_state.sim.lock();
    Json(sim.metrics_history.clone())
}

/// Plain-text colony summary for an assistant prompt.
pub async fn context_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    let sim = app_state.sim.lock();
    let context = colony_core::assistant_context(&sim.session, &sim.content);
    Json(serde_json::json!({ "context": context }))
}

// ---------------------------------------------------------------------------
// Player commands
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SelectPlanetRequest {
    planet_id: PlanetId,
}

#[derive(Deserialize)]
pub struct BuildRequest {
    module_id: ModuleDefId,
}

/// Map a notice that reports a declined command to an HTTP error.
fn rejection(notice: &Notice) -> Option<ApiError> {
    match notice {
        Notice::CommandIgnored { reason, .. } => Some(api_error(StatusCode::BAD_REQUEST, reason)),
        Notice::BuildRejected { reason, .. } => {
            Some(api_error(StatusCode::CONFLICT, reason.to_string()))
        }
        _ => None,
    }
}

/// Apply one player command under the sim lock, start or stop the colony
/// timers on phase changes, and publish the resulting notices.
fn submit(app_state: &AppState, command: Command) -> Result<Json<Vec<NoticeEnvelope>>, ApiError> {
    let notices = {
        let mut guard = app_state.sim.lock();
        let SimState {
            ref mut session,
            ref content,
            ref mut next_command_id,
            ..
        } = *guard;
        let envelope = make_command(next_command_id, session.colony.day, command);
        let notices = colony_core::apply(session, &envelope, content);

        for envelope in &notices {
            match envelope.notice {
                Notice::ColonizationStarted { ref planet_id } => {
                    tracing::info!(planet = %planet_id, "colonization started");
                    let timers = spawn_timers(app_state, &content.constants);
                    *app_state.timers.lock() = Some(timers);
                }
                Notice::ColonyAbandoned { day } => {
                    tracing::info!(day, "colony abandoned");
                    drop(app_state.timers.lock().take());
                }
                _ => {}
            }
        }
        notices
    };

    let failure = notices.iter().find_map(|n| rejection(&n.notice));
    if !notices.is_empty() {
        let _ = app_state.event_tx.send(notices.clone());
    }
    match failure {
        Some(err) => {
            tracing::warn!(status = %err.0, body = %err.1 .0, "command declined");
            Err(err)
        }
        None => Ok(Json(notices)),
    }
}

pub async fn select_planet_handler(
    State(app_state): State<AppState>,
    Json(request): Json<SelectPlanetRequest>,
) -> Result<Json<Vec<NoticeEnvelope>>, ApiError> {
    if app_state.sim.lock().content.planet(&request.planet_id).is_none() {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("unknown planet '{}'", request.planet_id),
        ));
    }
    submit(
        &app_state,
        Command::SelectPlanet {
            planet_id: request.planet_id,
        },
    )
}

pub async fn start_handler(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<NoticeEnvelope>>, ApiError> {
    submit(&app_state, Command::StartColonization)
}

pub async fn build_handler(
    State(app_state): State<AppState>,
    Json(request): Json<BuildRequest>,
) -> Result<Json<Vec<NoticeEnvelope>>, ApiError> {
    if app_state.sim.lock().content.module(&request.module_id).is_none() {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("unknown module '{}'", request.module_id),
        ));
    }
    submit(
        &app_state,
        Command::BuildModule {
            module_id: request.module_id,
        },
    )
}

pub async fn dismiss_event_handler(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<NoticeEnvelope>>, ApiError> {
    submit(&app_state, Command::DismissEvent)
}

pub async fn abandon_handler(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<NoticeEnvelope>>, ApiError> {
    submit(&app_state, Command::AbandonColony)
}

pub async fn pause_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    app_state.paused.store(true, Ordering::Relaxed);
    Json(serde_json::json!({"paused": true}))
}

pub async fn resume_handler(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    app_state.paused.store(false, Ordering::Relaxed);
    Json(serde_json::json!({"paused": false}))
}

// ---------------------------------------------------------------------------
// Notice stream
// ---------------------------------------------------------------------------

pub async fn stream_handler(
    State(app_state): State<AppState>,
) -> Sse<impl futures_core::Stream<Item = Result<Event, Infallible>>> {
    let mut rx = app_state.event_tx.subscribe();
    let sim = app_state.sim.clone();

    let stream = async_stream::stream! {
        let mut heartbeat = tokio::time::interval(Duration::from_secs(5));
        heartbeat.tick().await; // discard the immediate first tick
        loop {
            tokio::select! {
                result = rx.recv() => {
                    match result {
                        Ok(notices) => {
                            let data = serde_json::to_string(&notices).unwrap_or_default();
                            yield Ok(Event::default().event("notices").data(data));
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "notice stream lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                _ = heartbeat.tick() => {
                    let (day, phase) = {
                        let guard = sim.lock();
                        (guard.session.colony.day, guard.session.phase)
                    };
                    let hb = serde_json::json!({"heartbeat": true, "day": day, "phase": phase});
                    yield Ok(Event::default().data(hb.to_string()));
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}
