use crate::{GameContent, GameSession, Phase};

/// One-sentence description of what the player is doing, handed to the
/// assistant alongside their question.
pub fn assistant_context(session: &GameSession, content: &GameContent) -> String {
    let planet_name = session
        .selected_planet
        .as_ref()
        .and_then(|id| content.planet(id))
        .map(|planet| planet.name.as_str());

    match (session.phase, planet_name) {
        (Phase::PlanetSelection, Some(name)) => format!("selecting planet {name}"),
        (Phase::PlanetSelection, None) => "choosing a planet for colonization".to_string(),
        (Phase::Colonization, name) => format!(
            "managing a colony on {} with {} colonists",
            name.unwrap_or("an unknown world"),
            session.colony.population,
        ),
    }
}
