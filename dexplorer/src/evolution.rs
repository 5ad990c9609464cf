//! Flattening of evolution-chain trees into displayable stages.
//!
//! The walk follows the linear spine. The first node with more than one
//! child ends the walk: every child is emitted as a stage of its own and
//! none of them is visited further.

use serde::{Deserialize, Serialize};

use crate::api::{id_from_url, NamedResource};

const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub name: String,
    pub sprite_url: String,
    pub triggers: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EvolutionChainResponse {
    pub chain: ChainLink,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
}

/// How a chain node is reached from its parent.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct EvolutionDetail {
    pub trigger: Option<NamedResource>,
    pub min_level: Option<u32>,
    pub item: Option<NamedResource>,
    pub held_item: Option<NamedResource>,
    pub min_happiness: Option<u32>,
    pub min_beauty: Option<u32>,
    pub min_affection: Option<u32>,
    pub time_of_day: Option<String>,
    pub location: Option<NamedResource>,
    pub gender: Option<u8>,
    pub known_move: Option<NamedResource>,
    pub needs_overworld_rain: bool,
    pub turn_upside_down: bool,
    pub trade_species: Option<NamedResource>,
    pub party_species: Option<NamedResource>,
    pub relative_physical_stats: Option<i8>,
}

pub fn parse_chain(root: &ChainLink) -> Vec<EvolutionStage> {
    let mut stages = Vec::new();
    let mut current = Some(root);
    while let Some(link) = current {
        stages.push(stage_for(link));
        if link.evolves_to.len() > 1 {
            stages.extend(link.evolves_to.iter().map(stage_for));
            break;
        }
        current = link.evolves_to.first();
    }
    stages
}

fn stage_for(link: &ChainLink) -> EvolutionStage {
    let triggers = link
        .evolution_details
        .first()
        .map(|detail| vec![trigger_text(detail)])
        .unwrap_or_default();
    EvolutionStage {
        name: link.species.name.clone(),
        sprite_url: artwork_url(&link.species.url),
        triggers,
    }
}

fn artwork_url(species_url: &str) -> String {
    format!("{ARTWORK_BASE}/{}.png", id_from_url(species_url))
}

/// Human-readable condition for one evolution step. Clauses are appended in a
/// fixed order; zero levels and empty strings count as absent.
pub fn trigger_text(detail: &EvolutionDetail) -> String {
    let Some(trigger) = detail.trigger.as_ref() else {
        return "Special".to_string();
    };

    let mut text = spaced(&trigger.name);
    if let Some(level) = detail.min_level.filter(|level| *level > 0) {
        text.push_str(&format!(" at level {level}"));
    }
    if let Some(item) = &detail.item {
        text.push_str(&format!(" using {}", spaced(&item.name)));
    }
    if let Some(item) = &detail.held_item {
        text.push_str(&format!(" while holding {}", spaced(&item.name)));
    }
    if detail.min_happiness.is_some_and(|value| value > 0) {
        text.push_str(" with high happiness");
    }
    if detail.min_beauty.is_some_and(|value| value > 0) {
        text.push_str(" with high beauty");
    }
    if detail.min_affection.is_some_and(|value| value > 0) {
        text.push_str(" with high affection");
    }
    if let Some(time) = detail.time_of_day.as_deref().filter(|time| !time.is_empty()) {
        text.push_str(&format!(" during the {time}"));
    }
    if let Some(location) = &detail.location {
        text.push_str(&format!(" at {}", spaced(&location.name)));
    }
    match detail.gender {
        Some(1) => text.push_str(" (female)"),
        Some(2) => text.push_str(" (male)"),
        _ => {}
    }
    if let Some(known) = &detail.known_move {
        text.push_str(&format!(" while knowing {}", spaced(&known.name)));
    }
    if detail.needs_overworld_rain {
        text.push_str(" in the rain");
    }
    if detail.turn_upside_down {
        text.push_str(" by turning console upside down");
    }
    if let Some(species) = &detail.trade_species {
        text.push_str(&format!(" by trading for a {}", spaced(&species.name)));
    }
    if let Some(species) = &detail.party_species {
        text.push_str(&format!(" with {} in party", spaced(&species.name)));
    }
    match detail.relative_physical_stats {
        Some(1) => text.push_str(" (Attack > Defense)"),
        Some(-1) => text.push_str(" (Attack < Defense)"),
        Some(0) => text.push_str(" (Attack = Defense)"),
        _ => {}
    }
    text
}

fn spaced(name: &str) -> String {
    name.replace('-', " ")
}
