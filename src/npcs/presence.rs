//! Schedule resolution: where is an NPC right now?

use crate::shared::*;

/// Weekly-schedule lookup order once special events and rain are ruled out:
/// today's key, then the catch-all, then the start-of-week key the oldest
/// data files were written against.
pub fn fallback_chain(today: Weekday) -> [DayKey; 3] {
    [DayKey::from(today), DayKey::Default, DayKey::Monday]
}

/// Resolves an NPC's current location id.
///
/// Precedence:
///   1. a special event scheduled for this absolute day,
///   2. the rainy schedule when the weather mentions rain,
///   3. the weekly schedule, probed through [`fallback_chain`].
///
/// `None` means the NPC is nowhere to be found this phase. Pure and
/// deterministic: same inputs, same answer.
pub fn resolve_location(
    npc: &NpcRecord,
    weather: &str,
    day: u32,
    phase: DayPhase,
    today: Weekday,
) -> Option<String> {
    if let Some(event) = npc.special_event_for(day) {
        if let Some(location) = event.slot(phase) {
            return Some(location.to_string());
        }
    }

    if weather_is_rainy(weather) {
        if let Some(rainy) = npc.schedule.get(&DayKey::Rainy) {
            if let Some(location) = rainy.slot(phase) {
                return Some(location.to_string());
            }
        }
    }

    for key in fallback_chain(today) {
        if let Some(schedule) = npc.schedule.get(&key) {
            return schedule.slot(phase).map(str::to_string);
        }
    }

    None
}

/// All NPCs currently at `location_id`, in registry order.
/// Location ids compare case-insensitively.
pub fn npcs_at_location<'a>(
    registry: &'a NpcRegistry,
    location_id: &str,
    weather: &str,
    day: u32,
    phase: DayPhase,
    today: Weekday,
) -> Vec<&'a NpcRecord> {
    registry
        .npcs
        .iter()
        .filter(|npc| {
            resolve_location(npc, weather, day, phase, today)
                .is_some_and(|loc| loc.eq_ignore_ascii_case(location_id))
        })
        .collect()
}
