//! Data layer — populates catalogs and the NPC registry at startup.
//!
//! This plugin runs in OnEnter(GameState::Loading): it builds the location
//! catalog, reads `shop_data.json` and every `char_*.json` under the data
//! root, runs the dialogue validation pass, then transitions to
//! GameState::Map. No other domain seeds these resources.

use bevy::prelude::*;
use std::fs;
use std::path::PathBuf;

use crate::npcs::validation::validate_registry;
use crate::shared::*;

/// Root directory of the JSON data files. Tests point this elsewhere.
#[derive(Resource, Debug, Clone)]
pub struct DataPaths {
    pub root: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
        }
    }
}

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DataPaths>();
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Parses a single NPC record document.
pub fn parse_npc(json: &str) -> Result<NpcRecord, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid NPC record: {e}"))
}

/// Parses the shop item array.
pub fn parse_items(json: &str) -> Result<Vec<ItemDef>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid item list: {e}"))
}

/// The town map. Fixed data, not worth a JSON file of its own.
pub fn build_locations() -> Vec<LocationDef> {
    vec![
        LocationDef {
            id: "liceo_newton_classe_2B".to_string(),
            name: "Liceo Newton - Classe 2B".to_string(),
            description: "La tua classe. Banchi, lavagna, e il solito brusio.".to_string(),
            image_path: "images/locations/liceo.png".to_string(),
        },
        LocationDef {
            id: "centro_commerciale".to_string(),
            name: "Centro Commerciale".to_string(),
            description: "Negozi, musica di sottofondo e profumo di patatine.".to_string(),
            image_path: "images/locations/centro.png".to_string(),
        },
        LocationDef {
            id: "parco".to_string(),
            name: "Parco".to_string(),
            description: "Un parco tranquillo con panchine all'ombra.".to_string(),
            image_path: "images/locations/parco.png".to_string(),
        },
        LocationDef {
            id: "casa".to_string(),
            name: "Casa".to_string(),
            description: "Casa tua. Il posto dove ricaricare le batterie.".to_string(),
            image_path: "images/locations/casa.png".to_string(),
        },
    ]
}

/// Single system that populates everything and then transitions to Map.
fn load_all_data(
    paths: Res<DataPaths>,
    mut locations: ResMut<LocationCatalog>,
    mut items: ResMut<ItemCatalog>,
    mut registry: ResMut<NpcRegistry>,
    mut report: ResMut<DataIntegrityReport>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("[Data] Populating catalogs from {:?}", paths.root);

    locations.locations = build_locations();
    info!("[Data] Locations: {}", locations.locations.len());

    items.items = load_shop_items(&paths);
    info!("[Data] Shop items: {}", items.items.len());

    for record in load_npc_records(&paths) {
        registry.insert(record);
    }
    info!("[Data] NPCs: {}", registry.npcs.len());

    report.errors = validate_registry(&registry);
    for finding in &report.errors {
        warn!("[Data] Dialogue integrity: {finding}");
    }
    if report.count() > 0 {
        warn!("[Data] {} dialogue integrity issue(s) found", report.count());
    }

    next_state.set(GameState::Map);
}

/// The shop file is optional: a missing or unreadable file just means an
/// empty shop.
fn load_shop_items(paths: &DataPaths) -> Vec<ItemDef> {
    let path = paths.root.join("shop_data.json");
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(_) => {
            warn!("[Data] No shop data at {path:?}");
            return Vec::new();
        }
    };
    match parse_items(&contents) {
        Ok(items) => items,
        Err(e) => {
            warn!("[Data] {e}");
            Vec::new()
        }
    }
}

/// Reads every `char_*.json` in the data root, sorted by file name so the
/// registry order is stable across platforms. A file that fails to parse is
/// skipped with a warning; the rest still load.
fn load_npc_records(paths: &DataPaths) -> Vec<NpcRecord> {
    let entries = match fs::read_dir(&paths.root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("[Data] Cannot read data root {:?}: {e}", paths.root);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("char_") && name.ends_with(".json"))
        })
        .collect();
    files.sort();

    let mut records = Vec::new();
    for path in files {
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("[Data] Cannot read {path:?}: {e}");
                continue;
            }
        };
        match parse_npc(&contents) {
            Ok(record) => records.push(record),
            Err(e) => warn!("[Data] Skipping {path:?}: {e}"),
        }
    }
    records
}
