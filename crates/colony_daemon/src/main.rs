mod routes;
mod state;
mod tick_loop;

use anyhow::{Context, Result};
use clap::Parser;
use colony_control::EventScheduler;
use colony_world::{build_initial_session, load_content};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use state::{AppState, SimState};
use std::collections::VecDeque;

#[derive(Parser)]
#[command(name = "colony_daemon", about = "Colony simulator HTTP daemon")]
struct Args {
    #[arg(long, default_value = "./content")]
    content_dir: String,
    #[arg(long, default_value_t = 3001)]
    port: u16,
    /// RNG seed for the session id and random events. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "http://localhost:5173")]
    cors_origin: String,
}

fn build_sim(content_dir: &str, seed: u64) -> Result<SimState> {
    let content = load_content(content_dir)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let session = build_initial_session(&content, seed, &mut rng);
    let events = EventScheduler::new(rng, &content.constants);
    Ok(SimState {
        session,
        content,
        events,
        next_command_id: 0,
        metrics_history: VecDeque::new(),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let sim = build_sim(&args.content_dir, seed)?;
    tracing::info!(
        seed,
        session_id = %sim.session.meta.session_id,
        content_version = %sim.session.meta.content_version,
        planets = sim.content.planets.len(),
        modules = sim.content.modules.len(),
        "session ready"
    );

    let (event_tx, _) = tokio::sync::broadcast::channel(256);
    let app_state = AppState::new(sim, event_tx);
    let app = routes::make_router_with_cors(app_state, &args.cors_origin);

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on http://{addr}");
    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}
