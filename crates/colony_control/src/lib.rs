use colony_core::{
    make_command, population_capacity, resolve_effects, Command, CommandEnvelope, Constants,
    EventDefId, GameContent, GameSession, ModuleDef, ModuleEffect, Phase, PlanetId,
};
use rand::Rng;

pub trait CommandSource {
    fn generate_commands(
        &mut self,
        session: &GameSession,
        content: &GameContent,
        next_command_id: &mut u64,
    ) -> Vec<CommandEnvelope>;
}

// ---------------------------------------------------------------------------
// Random events
// ---------------------------------------------------------------------------

/// Low-frequency random event check.
///
/// Every `interval_ticks` colony ticks, fires with probability `chance`; a
/// firing picks one catalog event uniformly. The scheduler owns its RNG so a
/// seeded run replays the same events.
pub struct EventScheduler<R: Rng> {
    rng: R,
    interval_ticks: u64,
    chance: f64,
    ticks_since_check: u64,
}

impl<R: Rng> EventScheduler<R> {
    pub fn new(rng: R, constants: &Constants) -> Self {
        Self {
            rng,
            interval_ticks: constants.event_check_interval_ticks.max(1),
            chance: constants.event_chance,
            ticks_since_check: 0,
        }
    }

    /// One event check, independent of the tick counter.
    pub fn check(&mut self, content: &GameContent) -> Option<EventDefId> {
        if content.events.is_empty() || !self.rng.gen_bool(self.chance.clamp(0.0, 1.0)) {
            return None;
        }
        let index = self.rng.gen_range(0..content.events.len());
        Some(content.events[index].id.clone())
    }

    /// Forget partial progress toward the next check, e.g. after the colony
    /// phase ends.
    pub fn reset(&mut self) {
        self.ticks_since_check = 0;
    }
}

impl<R: Rng> CommandSource for EventScheduler<R> {
    fn generate_commands(
        &mut self,
        session: &GameSession,
        content: &GameContent,
        next_command_id: &mut u64,
    ) -> Vec<CommandEnvelope> {
        if session.phase != Phase::Colonization {
            self.reset();
            return Vec::new();
        }
        self.ticks_since_check += 1;
        if self.ticks_since_check < self.interval_ticks {
            return Vec::new();
        }
        self.ticks_since_check = 0;
        self.check(content)
            .map(|event_id| {
                vec![make_command(
                    next_command_id,
                    session.colony.day,
                    Command::TriggerEvent { event_id },
                )]
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Autopilot
// ---------------------------------------------------------------------------

/// Plays the colony without a player:
/// 1. Select a planet (the configured one, else the first in the catalog) and
///    start colonizing.
/// 2. Acknowledge any pending event.
/// 3. Build at most one module per tick, addressing the most urgent need:
///    oxygen, food, energy, housing, then morale.
pub struct BuildAutopilot {
    planet: Option<PlanetId>,
}

/// A resource under this level is treated as a need.
const NEED_THRESHOLD: f64 = 40.0;
/// Morale under this level asks for a morale module.
const MORALE_NEED_THRESHOLD: f64 = 50.0;
/// Build housing once population is this close to capacity.
const HOUSING_MARGIN: f64 = 0.05;

type Score = fn(&ModuleEffect) -> f64;

impl BuildAutopilot {
    pub fn new(planet: Option<PlanetId>) -> Self {
        Self { planet }
    }

    fn target_planet(&self, content: &GameContent) -> Option<PlanetId> {
        self.planet
            .clone()
            .or_else(|| content.planets.first().map(|p| p.id.clone()))
    }
}

/// Highest-scoring module with a positive score. Ties go to the cheaper
/// module, then to catalog order.
fn best_module(content: &GameContent, score: Score) -> Option<&ModuleDef> {
    let mut best: Option<(&ModuleDef, f64)> = None;
    for def in &content.modules {
        let value = score(&ModuleEffect::of(def));
        if value <= 0.0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((current, current_value)) => {
                value > current_value || (value >= current_value && def.cost < current.cost)
            }
        };
        if better {
            best = Some((def, value));
        }
    }
    best.map(|(def, _)| def)
}

/// Needs in priority order, each paired with the effect that satisfies it.
fn colony_needs(session: &GameSession, content: &GameContent) -> Vec<Score> {
    let colony = &session.colony;
    let effect = resolve_effects(&colony.modules, content);
    let capacity = population_capacity(&effect, &content.constants);

    let mut needs: Vec<Score> = Vec::new();
    if colony.oxygen < NEED_THRESHOLD {
        needs.push(|e| e.oxygen);
    }
    if colony.food < NEED_THRESHOLD {
        needs.push(|e| e.food);
    }
    if colony.energy < NEED_THRESHOLD {
        needs.push(|e| e.energy);
    }
    if colony.population >= capacity - HOUSING_MARGIN {
        needs.push(|e| e.capacity);
    }
    if colony.morale < MORALE_NEED_THRESHOLD {
        needs.push(|e| e.morale);
    }
    needs
}

impl CommandSource for BuildAutopilot {
    fn generate_commands(
        &mut self,
        session: &GameSession,
        content: &GameContent,
        next_command_id: &mut u64,
    ) -> Vec<CommandEnvelope> {
        let day = session.colony.day;
        let mut commands = Vec::new();

        if session.phase == Phase::PlanetSelection {
            if session.selected_planet.is_none() {
                let Some(planet_id) = self.target_planet(content) else {
                    return commands;
                };
                commands.push(make_command(
                    next_command_id,
                    day,
                    Command::SelectPlanet { planet_id },
                ));
            }
            commands.push(make_command(next_command_id, day, Command::StartColonization));
            return commands;
        }

        if session.current_event.is_some() {
            commands.push(make_command(next_command_id, day, Command::DismissEvent));
        }

        for score in colony_needs(session, content) {
            let Some(def) = best_module(content, score) else {
                continue;
            };
            if def.cost <= session.colony.credits {
                commands.push(make_command(
                    next_command_id,
                    day,
                    Command::BuildModule {
                        module_id: def.id.clone(),
                    },
                ));
            }
            // Most urgent need only; save up if it is not yet affordable.
            break;
        }

        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colony_core::test_fixtures::{base_content, base_session, colonizing_session};
    use colony_core::EventDefId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn built_module(commands: &[CommandEnvelope]) -> Option<String> {
        commands.iter().find_map(|c| match &c.command {
            Command::BuildModule { module_id } => Some(module_id.0.clone()),
            _ => None,
        })
    }

    #[test]
    fn autopilot_selects_and_starts() {
        let content = base_content();
        let session = base_session(&content);
        let mut autopilot = BuildAutopilot::new(None);
        let mut next_id = 0;
        let commands = autopilot.generate_commands(&session, &content, &mut next_id);
        assert_eq!(commands.len(), 2);
        assert!(matches!(
            &commands[0].command,
            Command::SelectPlanet { planet_id } if planet_id.0 == "planet_kepler_442b"
        ));
        assert!(matches!(commands[1].command, Command::StartColonization));
        assert_eq!(next_id, 2);
    }

    #[test]
    fn autopilot_honours_configured_planet() {
        let content = base_content();
        let session = base_session(&content);
        let mut autopilot =
            BuildAutopilot::new(Some(PlanetId("planet_proxima_b".to_string())));
        let commands = autopilot.generate_commands(&session, &content, &mut 0);
        assert!(matches!(
            &commands[0].command,
            Command::SelectPlanet { planet_id } if planet_id.0 == "planet_proxima_b"
        ));
    }

    #[test]
    fn autopilot_builds_for_most_urgent_need() {
        let content = base_content();
        let mut session = colonizing_session(&content);
        session.colony.oxygen = 20.0;
        session.colony.food = 20.0;
        let commands = BuildAutopilot::new(None).generate_commands(&session, &content, &mut 0);
        // Greenhouse is the only oxygen source in the fixture catalog.
        assert_eq!(built_module(&commands).as_deref(), Some("module_greenhouse"));
    }

    #[test]
    fn autopilot_saves_up_for_unaffordable_need() {
        let content = base_content();
        let mut session = colonizing_session(&content);
        session.colony.food = 20.0;
        session.colony.energy = 20.0;
        session.colony.credits = 120;
        let commands = BuildAutopilot::new(None).generate_commands(&session, &content, &mut 0);
        // Food comes first and the greenhouse costs 150: no cheaper solar array.
        assert_eq!(built_module(&commands), None);
    }

    #[test]
    fn autopilot_builds_housing_at_capacity() {
        let content = base_content();
        let mut session = colonizing_session(&content);
        session.colony.population = 3.0;
        let commands = BuildAutopilot::new(None).generate_commands(&session, &content, &mut 0);
        assert_eq!(built_module(&commands).as_deref(), Some("module_habitat_dome"));
    }

    #[test]
    fn autopilot_dismisses_pending_event() {
        let content = base_content();
        let mut session = colonizing_session(&content);
        session.current_event = Some(EventDefId("event_solar_flare".to_string()));
        let commands = BuildAutopilot::new(None).generate_commands(&session, &content, &mut 0);
        assert!(matches!(commands[0].command, Command::DismissEvent));
    }

    #[test]
    fn scheduler_checks_on_interval_only() {
        let mut content = base_content();
        content.constants.event_chance = 1.0;
        content.constants.event_check_interval_ticks = 10;
        let session = colonizing_session(&content);
        let mut scheduler = EventScheduler::new(ChaCha8Rng::seed_from_u64(1), &content.constants);
        let mut fired_at = Vec::new();
        for tick in 1..=30 {
            if !scheduler
                .generate_commands(&session, &content, &mut 0)
                .is_empty()
            {
                fired_at.push(tick);
            }
        }
        assert_eq!(fired_at, vec![10, 20, 30]);
    }

    #[test]
    fn scheduler_never_fires_at_zero_chance() {
        let mut content = base_content();
        content.constants.event_chance = 0.0;
        let mut scheduler = EventScheduler::new(ChaCha8Rng::seed_from_u64(1), &content.constants);
        assert!((0..1000).all(|_| scheduler.check(&content).is_none()));
    }

    #[test]
    fn scheduler_idle_outside_colonization() {
        let mut content = base_content();
        content.constants.event_chance = 1.0;
        content.constants.event_check_interval_ticks = 1;
        let session = base_session(&content);
        let mut scheduler = EventScheduler::new(ChaCha8Rng::seed_from_u64(1), &content.constants);
        assert!(scheduler
            .generate_commands(&session, &content, &mut 0)
            .is_empty());
    }

    #[test]
    fn scheduler_fire_rate_near_chance() {
        let content = base_content();
        let mut scheduler = EventScheduler::new(ChaCha8Rng::seed_from_u64(5), &content.constants);
        let fired = (0..20_000).filter(|_| scheduler.check(&content).is_some()).count();
        // 5% of 20 000 = 1000; allow a generous band.
        assert!((800..1200).contains(&fired), "fired {fired} times");
    }

    #[test]
    fn scheduler_picks_every_event_eventually() {
        let mut content = base_content();
        content.constants.event_chance = 1.0;
        let mut scheduler = EventScheduler::new(ChaCha8Rng::seed_from_u64(11), &content.constants);
        let picked: std::collections::HashSet<String> = (0..500)
            .filter_map(|_| scheduler.check(&content))
            .map(|id| id.0)
            .collect();
        assert_eq!(picked.len(), content.events.len());
    }
}
