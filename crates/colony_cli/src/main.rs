use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colony_control::{BuildAutopilot, CommandSource, EventScheduler};
use colony_core::{GameContent, GameSession, Notice, NoticeLevel, PlanetId};
use colony_world::{build_initial_session, load_content};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "colony_cli", about = "Exoplanet colony simulator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless colony for a fixed number of ticks.
    Run {
        #[arg(long)]
        ticks: u64,
        /// RNG seed for the session id and random events. Random if omitted.
        #[arg(long)]
        seed: Option<u64>,
        /// Planet to colonize. Defaults to the first planet in the catalog.
        #[arg(long)]
        planet: Option<String>,
        #[arg(long, default_value = "./content")]
        content_dir: String,
        #[arg(long, default_value_t = 10)]
        print_every: u64,
        #[arg(long, default_value = "normal", value_parser = ["normal", "debug"])]
        event_level: String,
        /// Sample metrics every N ticks.
        #[arg(long, default_value_t = 1)]
        metrics_every: u64,
        /// Disable metrics collection to the runs/ directory.
        #[arg(long)]
        no_metrics: bool,
        /// Only select the planet and start; build nothing.
        #[arg(long)]
        no_autopilot: bool,
    },
}

struct RunOptions {
    ticks: u64,
    seed: Option<u64>,
    planet: Option<String>,
    content_dir: String,
    print_every: u64,
    level: NoticeLevel,
    metrics_every: u64,
    no_metrics: bool,
    no_autopilot: bool,
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

fn generate_run_id(seed: u64) -> String {
    let now = chrono::Utc::now();
    format!("{}_seed{seed}", now.format("%Y%m%d_%H%M%S"))
}

fn create_run_dir(run_id: &str) -> Result<std::path::PathBuf> {
    let dir = std::path::PathBuf::from("runs").join(run_id);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating run directory: {}", dir.display()))?;
    Ok(dir)
}

fn write_run_info(
    dir: &std::path::Path,
    run_id: &str,
    session: &GameSession,
    options: &RunOptions,
) -> Result<()> {
    let info = serde_json::json!({
        "run_id": run_id,
        "session_id": session.meta.session_id,
        "seed": session.meta.seed,
        "content_version": session.meta.content_version,
        "metrics_every": options.metrics_every,
        "runner": "colony_cli",
        "args": {
            "ticks": options.ticks,
            "planet": options.planet,
            "print_every": options.print_every,
            "autopilot": !options.no_autopilot,
        }
    });
    let path = dir.join("run_info.json");
    let file =
        std::fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, &info)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Drives the colony phase only: selects and starts, never builds.
struct StartOnly(BuildAutopilot);

impl CommandSource for StartOnly {
    fn generate_commands(
        &mut self,
        session: &GameSession,
        content: &GameContent,
        next_command_id: &mut u64,
    ) -> Vec<colony_core::CommandEnvelope> {
        if session.phase == colony_core::Phase::PlanetSelection {
            self.0.generate_commands(session, content, next_command_id)
        } else {
            Vec::new()
        }
    }
}

fn run(options: &RunOptions) -> Result<()> {
    let content = load_content(&options.content_dir)?;
    let planet = options.planet.clone().map(PlanetId);
    if let Some(id) = &planet {
        anyhow::ensure!(content.planet(id).is_some(), "unknown planet '{id}'");
    }

    let seed = options.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut session = build_initial_session(&content, seed, &mut rng);

    let mut metrics_writer: Option<colony_core::MetricsFileWriter> = None;
    if !options.no_metrics {
        let run_id = generate_run_id(seed);
        let run_dir = create_run_dir(&run_id)?;
        write_run_info(&run_dir, &run_id, &session, options)?;
        let writer = colony_core::MetricsFileWriter::new(run_dir.clone())
            .with_context(|| format!("opening metrics CSV in {}", run_dir.display()))?;
        metrics_writer = Some(writer);
        println!("Run directory: {}", run_dir.display());
    }

    let autopilot = BuildAutopilot::new(planet);
    let mut driver: Box<dyn CommandSource> = if options.no_autopilot {
        Box::new(StartOnly(autopilot))
    } else {
        Box::new(autopilot)
    };
    let mut scheduler = EventScheduler::new(rng, &content.constants);
    let mut next_command_id = 0u64;

    println!(
        "Starting colony: ticks={} seed={seed} planets={} modules={} events={} content_version={}",
        options.ticks,
        content.planets.len(),
        content.modules.len(),
        content.events.len(),
        content.content_version,
    );
    println!("{}", "-".repeat(80));

    for step in 0..options.ticks {
        let mut commands = driver.generate_commands(&session, &content, &mut next_command_id);
        commands.extend(scheduler.generate_commands(&session, &content, &mut next_command_id));

        let notices = colony_core::tick(&mut session, &commands, &content, options.level);

        // Print notable notices regardless of print_every.
        for envelope in &notices {
            print_notice(&envelope.notice, envelope.day);
        }

        if options.print_every > 0 && (step + 1) % options.print_every == 0 {
            print_status(&session);
        }

        if let Some(ref mut writer) = metrics_writer {
            if options.metrics_every > 0 && (step + 1) % options.metrics_every == 0 {
                let snapshot = colony_core::compute_metrics(&session, &content);
                writer.write_row(&snapshot).context("writing metrics row")?;
            }
        }
    }

    println!("{}", "-".repeat(80));
    println!("Done. Final colony on day {}:", session.colony.day);
    print_status(&session);
    println!("{}", colony_core::assistant_context(&session, &content));

    if let Some(ref mut writer) = metrics_writer {
        writer.flush().context("final metrics flush")?;
        println!("Metrics written to runs/ directory.");
    }

    Ok(())
}

fn print_notice(notice: &Notice, day: u64) {
    match notice {
        Notice::ColonizationStarted { planet_id } => {
            println!("*** COLONIZATION OF {planet_id} HAS BEGUN (day {day}) ***");
        }
        Notice::ModuleBuilt { name, cost, .. } => {
            println!("[day={day:04}]  built {name} for {cost} credits");
        }
        Notice::BuildRejected { module_id, reason } => {
            println!("[day={day:04}]  cannot build {module_id}: {reason}");
        }
        Notice::EventTriggered { description, .. } => {
            println!("[day={day:04}]  EVENT: {description}");
        }
        Notice::ResourceStatusChanged { resource, to, .. } => {
            println!("[day={day:04}]  {resource:?} is now {to:?}");
        }
        Notice::Ticked {
            population,
            credits,
            ..
        } => {
            println!("[day={day:04}]  tick  population={population:.1}  credits={credits}");
        }
        _ => {}
    }
}

fn print_status(session: &GameSession) {
    let c = &session.colony;
    println!(
        "[day={day:04}]  energy={energy:5.1}  food={food:5.1}  oxygen={oxygen:5.1}  \
         morale={morale:5.1}  population={population:4.1}  credits={credits:5}  modules={modules}",
        day = c.day,
        energy = c.energy,
        food = c.food,
        oxygen = c.oxygen,
        morale = c.morale,
        population = c.population,
        credits = c.credits,
        modules = c.modules.len(),
    );
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            ticks,
            seed,
            planet,
            content_dir,
            print_every,
            event_level,
            metrics_every,
            no_metrics,
            no_autopilot,
        } => {
            let level = match event_level.as_str() {
                "debug" => NoticeLevel::Debug,
                _ => NoticeLevel::Normal,
            };
            run(&RunOptions {
                ticks,
                seed,
                planet,
                content_dir,
                print_every,
                level,
                metrics_every,
                no_metrics,
                no_autopilot,
            })?;
        }
    }
    Ok(())
}
