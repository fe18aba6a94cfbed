//! NPC domain plugin for Lumina Bay.
//!
//! Owns schedule-driven presence, the dialogue engine, and load-time graph
//! validation. Communicates exclusively through shared resources and events.

use bevy::prelude::*;

use crate::shared::*;

pub mod dialogue;
pub mod presence;
pub mod validation;

use dialogue::{handle_dialogue_choice, handle_dialogue_start};
use presence::npcs_at_location;

/// NPC ids present at the player's current location, in registry order.
/// Recomputed every frame while inside a location; cheap, and it keeps the
/// list honest against clock and weather changes without event plumbing.
#[derive(Resource, Debug, Clone, Default)]
pub struct PresentNpcs {
    pub ids: Vec<String>,
}

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PresentNpcs>();

        app.add_systems(
            Update,
            (handle_travel, handle_back_to_map).run_if(not(in_state(GameState::Loading))),
        );
        app.add_systems(
            Update,
            refresh_present_npcs.run_if(in_state(GameState::LocationInside)),
        );
        app.add_systems(
            Update,
            (handle_dialogue_start, handle_dialogue_choice)
                .chain()
                .run_if(not(in_state(GameState::Loading))),
        );
    }
}

/// System: enter a location from the map.
fn handle_travel(
    mut travel_events: EventReader<TravelEvent>,
    locations: Res<LocationCatalog>,
    mut current: ResMut<CurrentLocation>,
    mut next_state: ResMut<NextState<GameState>>,
    mut status_writer: EventWriter<StatusEvent>,
) {
    for ev in travel_events.read() {
        let Some(location) = locations.get(&ev.location_id) else {
            warn!("[Npcs] Travel to unknown location '{}'", ev.location_id);
            continue;
        };
        current.id = Some(location.id.clone());
        next_state.set(GameState::LocationInside);
        status_writer.send(StatusEvent::new(format!("Arrived at {}.", location.name)));
        info!("[Npcs] Entered '{}'", location.id);
    }
}

/// System: leave the current location for the map overview.
fn handle_back_to_map(
    mut back_events: EventReader<BackToMapEvent>,
    dialogue: Res<ActiveDialogue>,
    mut current: ResMut<CurrentLocation>,
    mut present: ResMut<PresentNpcs>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for _ in back_events.read() {
        if dialogue.is_active() {
            warn!("[Npcs] Cannot leave mid-conversation");
            continue;
        }
        current.id = None;
        present.ids.clear();
        next_state.set(GameState::Map);
    }
}

/// System: keep the present-NPC list in sync with clock, weather, and place.
fn refresh_present_npcs(
    registry: Res<NpcRegistry>,
    current: Res<CurrentLocation>,
    clock: Res<Clock>,
    weather: Res<WeatherState>,
    mut present: ResMut<PresentNpcs>,
) {
    let Some(location_id) = current.id.as_deref() else {
        if !present.ids.is_empty() {
            present.ids.clear();
        }
        return;
    };
    let ids: Vec<String> = npcs_at_location(
        &registry,
        location_id,
        &weather.current,
        clock.current_day,
        clock.phase,
        clock.day_of_week,
    )
    .into_iter()
    .map(|npc| npc.id.clone())
    .collect();
    if present.ids != ids {
        present.ids = ids;
    }
}
