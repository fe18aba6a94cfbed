//! Save/load: whole-object JSON persistence of player state and clock.

use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::*;

/// Where the save file lives. Tests point this at a temp directory.
#[derive(Resource, Debug, Clone)]
pub struct SaveSlot {
    pub path: PathBuf,
}

impl Default for SaveSlot {
    fn default() -> Self {
        Self {
            path: PathBuf::from("savegame.json"),
        }
    }
}

/// Result of reading the save file from disk.
#[derive(Debug)]
pub enum ReadResult {
    Loaded(SaveData),
    /// No file on disk. A normal negative result, not an error.
    NotFound,
    Corrupt(String),
}

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SaveSlot>();
        app.add_systems(
            Update,
            (handle_save_requests, handle_load_requests)
                .run_if(not(in_state(GameState::Loading))),
        );
    }
}

/// Snapshot of everything that persists: the full player record plus the
/// clock, day-of-week included.
pub fn collect_save(player: &PlayerState, clock: &Clock) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        money: player.money,
        energy: player.energy(),
        stress: player.stress(),
        intelligence: player.intelligence,
        inventory_item_ids: player.inventory.clone(),
        story_flags: player.story_flags.clone(),
        current_day: clock.current_day,
        phase: clock.phase,
        day_of_week: clock.day_of_week,
    }
}

/// Overwrites player and clock from a snapshot. Restored stats are clamped
/// and inventory ids unknown to the catalog are dropped silently.
pub fn apply_save(
    data: &SaveData,
    player: &mut PlayerState,
    clock: &mut Clock,
    catalog: &ItemCatalog,
) {
    player.money = data.money;
    player.set_energy(data.energy);
    player.set_stress(data.stress);
    player.intelligence = data.intelligence.max(0);
    player.inventory = data
        .inventory_item_ids
        .iter()
        .filter(|id| catalog.get(id).is_some())
        .cloned()
        .collect();
    player.story_flags = data.story_flags.clone();

    clock.current_day = data.current_day.max(1);
    clock.phase = data.phase;
    clock.day_of_week = data.day_of_week;
}

/// Serializes and writes atomically: temp file in the same directory, then
/// rename over the target.
pub fn write_save(path: &Path, data: &SaveData) -> Result<(), String> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| format!("Failed to serialize save data: {e}"))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create save directory: {e}"))?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json).map_err(|e| format!("Failed to write save file: {e}"))?;
    fs::rename(&tmp_path, path).map_err(|e| format!("Failed to finalize save file: {e}"))?;
    Ok(())
}

pub fn read_save(path: &Path) -> ReadResult {
    if !path.exists() {
        return ReadResult::NotFound;
    }
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => return ReadResult::Corrupt(format!("Failed to read save file: {e}")),
    };
    match serde_json::from_str::<SaveData>(&contents) {
        Ok(data) => ReadResult::Loaded(data),
        Err(e) => ReadResult::Corrupt(format!("Failed to parse save file: {e}")),
    }
}

/// System: write the current session to disk on request.
fn handle_save_requests(
    mut save_events: EventReader<SaveRequestEvent>,
    player: Res<PlayerState>,
    clock: Res<Clock>,
    slot: Res<SaveSlot>,
    mut complete_writer: EventWriter<SaveCompleteEvent>,
    mut status_writer: EventWriter<StatusEvent>,
) {
    for _ in save_events.read() {
        let data = collect_save(&player, &clock);
        match write_save(&slot.path, &data) {
            Ok(()) => {
                info!("[Save] Game saved to {:?}", slot.path);
                status_writer.send(StatusEvent::new("Game saved."));
                complete_writer.send(SaveCompleteEvent {
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("[Save] Save failed: {e}");
                status_writer.send(StatusEvent::new("Save failed."));
                complete_writer.send(SaveCompleteEvent {
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

/// System: restore a session from disk on request.
///
/// A missing file and a corrupt file both leave every resource untouched;
/// they differ only in the reported outcome.
fn handle_load_requests(
    mut load_events: EventReader<LoadRequestEvent>,
    mut player: ResMut<PlayerState>,
    mut clock: ResMut<Clock>,
    catalog: Res<ItemCatalog>,
    slot: Res<SaveSlot>,
    mut complete_writer: EventWriter<LoadCompleteEvent>,
    mut changed_writer: EventWriter<ClockChangedEvent>,
    mut status_writer: EventWriter<StatusEvent>,
) {
    for _ in load_events.read() {
        match read_save(&slot.path) {
            ReadResult::Loaded(data) => {
                apply_save(&data, &mut player, &mut clock, &catalog);
                changed_writer.send(ClockChangedEvent);
                info!("[Save] Loaded: {}", clock.date_string());
                status_writer.send(StatusEvent::new("Game loaded."));
                complete_writer.send(LoadCompleteEvent {
                    outcome: LoadOutcome::Loaded,
                });
            }
            ReadResult::NotFound => {
                info!("[Save] No save file at {:?}", slot.path);
                status_writer.send(StatusEvent::new("No saved game found."));
                complete_writer.send(LoadCompleteEvent {
                    outcome: LoadOutcome::NotFound,
                });
            }
            ReadResult::Corrupt(e) => {
                warn!("[Save] Corrupt save file: {e}");
                status_writer.send(StatusEvent::new("Save file is corrupt."));
                complete_writer.send(LoadCompleteEvent {
                    outcome: LoadOutcome::Corrupt,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn catalog_with(ids: &[&str]) -> ItemCatalog {
        ItemCatalog {
            items: ids
                .iter()
                .map(|id| ItemDef {
                    id: id.to_string(),
                    name: id.to_string(),
                    description: String::new(),
                    cost: 10,
                    icon_path: None,
                })
                .collect(),
        }
    }

    #[test]
    fn round_trip_preserves_player_and_clock() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("savegame.json");

        let mut player = PlayerState::default();
        player.money = 120;
        player.set_energy(60);
        player.set_stress(35);
        player.intelligence = 8;
        player.add_item("caffe");
        player.set_flag("conosce_sofia", true);
        let clock = Clock {
            current_day: 9,
            phase: DayPhase::Evening,
            day_of_week: Weekday::Tuesday,
        };

        write_save(&path, &collect_save(&player, &clock)).unwrap();

        let mut restored_player = PlayerState::default();
        let mut restored_clock = Clock::default();
        let ReadResult::Loaded(data) = read_save(&path) else {
            panic!("expected a loadable save");
        };
        apply_save(
            &data,
            &mut restored_player,
            &mut restored_clock,
            &catalog_with(&["caffe"]),
        );

        assert_eq!(restored_player.money, 120);
        assert_eq!(restored_player.energy(), 60);
        assert_eq!(restored_player.stress(), 35);
        assert_eq!(restored_player.intelligence, 8);
        assert_eq!(restored_player.inventory, vec!["caffe".to_string()]);
        assert!(restored_player.check_flag("conosce_sofia"));
        assert_eq!(restored_clock.current_day, 9);
        assert_eq!(restored_clock.phase, DayPhase::Evening);
        // The weekday comes back as saved, not as current_day % 7 would say.
        assert_eq!(restored_clock.day_of_week, Weekday::Tuesday);
    }

    #[test]
    fn unknown_inventory_ids_are_dropped_on_load() {
        let mut player = PlayerState::default();
        player.add_item("caffe");
        player.add_item("oggetto_rimosso");
        let data = collect_save(&player, &Clock::default());

        let mut restored = PlayerState::default();
        let mut clock = Clock::default();
        apply_save(&data, &mut restored, &mut clock, &catalog_with(&["caffe"]));
        assert_eq!(restored.inventory, vec!["caffe".to_string()]);
    }

    #[test]
    fn out_of_range_saved_stats_are_clamped() {
        let data = SaveData {
            version: SAVE_VERSION,
            money: 10,
            energy: 500,
            stress: -40,
            intelligence: -3,
            inventory_item_ids: Vec::new(),
            story_flags: Default::default(),
            current_day: 0,
            phase: DayPhase::Morning,
            day_of_week: Weekday::Monday,
        };
        let mut player = PlayerState::default();
        let mut clock = Clock::default();
        apply_save(&data, &mut player, &mut clock, &ItemCatalog::default());
        assert_eq!(player.energy(), MAX_ENERGY);
        assert_eq!(player.stress(), 0);
        assert_eq!(player.intelligence, 0);
        assert_eq!(clock.current_day, 1);
    }

    #[test]
    fn missing_file_reads_as_not_found() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_save(&dir.path().join("nessuno.json")),
            ReadResult::NotFound
        ));
    }

    #[test]
    fn garbage_file_reads_as_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("savegame.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_save(&path), ReadResult::Corrupt(_)));
    }

    #[test]
    fn no_stray_temp_file_after_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("savegame.json");
        write_save(
            &path,
            &collect_save(&PlayerState::default(), &Clock::default()),
        )
        .unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }
}
