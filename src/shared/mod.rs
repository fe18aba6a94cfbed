//! Shared resources, events, and states for Lumina Bay.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Map,
    LocationInside,
    Dialogue,
}

// ═══════════════════════════════════════════════════════════════════════
// CLOCK
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPhase {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPhase {
    pub fn next(self) -> Self {
        match self {
            DayPhase::Morning => DayPhase::Afternoon,
            DayPhase::Afternoon => DayPhase::Evening,
            DayPhase::Evening => DayPhase::Night,
            DayPhase::Night => DayPhase::Morning,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayPhase::Morning => "Morning",
            DayPhase::Afternoon => "Afternoon",
            DayPhase::Evening => "Evening",
            DayPhase::Night => "Night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn next(self) -> Self {
        match self {
            Weekday::Monday => Weekday::Tuesday,
            Weekday::Tuesday => Weekday::Wednesday,
            Weekday::Wednesday => Weekday::Thursday,
            Weekday::Thursday => Weekday::Friday,
            Weekday::Friday => Weekday::Saturday,
            Weekday::Saturday => Weekday::Sunday,
            Weekday::Sunday => Weekday::Monday,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

/// Day/phase progression state machine.
///
/// Day-of-week is clock state in its own right and is persisted as-is; it is
/// never reconstructed from `current_day % 7` after a load.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    pub current_day: u32,
    pub phase: DayPhase,
    pub day_of_week: Weekday,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            current_day: 1,
            phase: DayPhase::Morning,
            day_of_week: Weekday::Monday,
        }
    }
}

impl Clock {
    /// Advances one phase. Returns true when the Night→Morning edge was
    /// crossed, i.e. a new day started.
    pub fn advance(&mut self) -> bool {
        match self.phase {
            DayPhase::Night => {
                self.phase = DayPhase::Morning;
                self.current_day += 1;
                self.day_of_week = self.day_of_week.next();
                true
            }
            other => {
                self.phase = other.next();
                false
            }
        }
    }

    /// Display string, computed on demand ("Day 3 - Wednesday, Evening").
    pub fn date_string(&self) -> String {
        format!(
            "Day {} - {}, {}",
            self.current_day,
            self.day_of_week.name(),
            self.phase.label()
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WEATHER
// ═══════════════════════════════════════════════════════════════════════

/// Current-weather string. Free-form: external callers may overwrite it at
/// any time; the only token the simulation inspects is "rain".
#[derive(Resource, Debug, Clone)]
pub struct WeatherState {
    pub current: String,
}

impl Default for WeatherState {
    fn default() -> Self {
        Self {
            current: "Sunny".to_string(),
        }
    }
}

impl WeatherState {
    pub fn is_rainy(&self) -> bool {
        weather_is_rainy(&self.current)
    }
}

/// Case-insensitive substring match on the "rain" token.
pub fn weather_is_rainy(weather: &str) -> bool {
    weather.to_lowercase().contains("rain")
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

pub const MAX_ENERGY: i32 = 100;
pub const MAX_STRESS: i32 = 100;

pub type ItemId = String;
pub type LocationId = String;

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub money: i32,
    pub intelligence: i32,
    energy: i32,
    stress: i32,
    /// Ordered item ids; duplicates allowed. The catalog owns the item defs.
    pub inventory: Vec<ItemId>,
    pub story_flags: HashMap<String, bool>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            money: 50,
            intelligence: 0,
            energy: MAX_ENERGY,
            stress: 0,
            inventory: Vec::new(),
            story_flags: HashMap::new(),
        }
    }
}

impl PlayerState {
    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn stress(&self) -> i32 {
        self.stress
    }

    /// Out-of-range values are silently clamped, never rejected.
    pub fn set_energy(&mut self, value: i32) {
        self.energy = value.clamp(0, MAX_ENERGY);
    }

    pub fn set_stress(&mut self, value: i32) {
        self.stress = value.clamp(0, MAX_STRESS);
    }

    pub fn add_energy(&mut self, delta: i32) {
        self.set_energy(self.energy + delta);
    }

    pub fn add_stress(&mut self, delta: i32) {
        self.set_stress(self.stress + delta);
    }

    pub fn has_energy(&self, amount: i32) -> bool {
        self.energy >= amount
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|id| id == item_id)
    }

    pub fn add_item(&mut self, item_id: impl Into<ItemId>) {
        self.inventory.push(item_id.into());
    }

    /// Upserts a story flag.
    pub fn set_flag(&mut self, key: impl Into<String>, value: bool) {
        self.story_flags.insert(key.into(), value);
    }

    /// Absent flags read as false.
    pub fn check_flag(&self, key: &str) -> bool {
        self.story_flags.get(key).copied().unwrap_or(false)
    }

    /// Clamps energy/stress back into range after the fields were overwritten
    /// wholesale, e.g. from a save file.
    pub fn clamp_stats(&mut self) {
        self.energy = self.energy.clamp(0, MAX_ENERGY);
        self.stress = self.stress.clamp(0, MAX_STRESS);
        self.intelligence = self.intelligence.max(0);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CATALOGS — static reference data, loaded once
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: u32,
    #[serde(default)]
    pub icon_path: Option<String>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ItemCatalog {
    pub items: Vec<ItemDef>,
}

impl ItemCatalog {
    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.iter().find(|item| item.id == id)
    }
}

#[derive(Debug, Clone)]
pub struct LocationDef {
    pub id: LocationId,
    pub name: String,
    pub description: String,
    pub image_path: String,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct LocationCatalog {
    pub locations: Vec<LocationDef>,
}

impl LocationCatalog {
    pub fn get(&self, id: &str) -> Option<&LocationDef> {
        self.locations.iter().find(|loc| loc.id == id)
    }

    /// Display name for a raw location id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|loc| loc.name.as_str()).unwrap_or(id)
    }
}

/// Where the player currently is (None = map overview).
#[derive(Resource, Debug, Clone, Default)]
pub struct CurrentLocation {
    pub id: Option<LocationId>,
}

// ═══════════════════════════════════════════════════════════════════════
// NPC RECORDS
// ═══════════════════════════════════════════════════════════════════════

/// Schedule key: the seven weekdays plus the two sentinel entries. A tagged
/// enum rather than raw string probing, so the fallback order is an explicit
/// data structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKey {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Default,
    Rainy,
}

impl From<Weekday> for DayKey {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Monday => DayKey::Monday,
            Weekday::Tuesday => DayKey::Tuesday,
            Weekday::Wednesday => DayKey::Wednesday,
            Weekday::Thursday => DayKey::Thursday,
            Weekday::Friday => DayKey::Friday,
            Weekday::Saturday => DayKey::Saturday,
            Weekday::Sunday => DayKey::Sunday,
        }
    }
}

/// One day of an NPC's schedule: a location id per phase slot.
/// Empty or missing slots mean "nowhere to be found".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySchedule {
    #[serde(default)]
    pub morning: Option<LocationId>,
    #[serde(default)]
    pub afternoon: Option<LocationId>,
    #[serde(default)]
    pub evening: Option<LocationId>,
    #[serde(default)]
    pub night: Option<LocationId>,
}

impl DaySchedule {
    /// The non-empty location id for a phase, if any.
    pub fn slot(&self, phase: DayPhase) -> Option<&str> {
        let raw = match phase {
            DayPhase::Morning => &self.morning,
            DayPhase::Afternoon => &self.afternoon,
            DayPhase::Evening => &self.evening,
            DayPhase::Night => &self.night,
        };
        raw.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcStats {
    pub base_patience: i32,
    /// Runtime-only: initialized from `base_patience` once, when the id first
    /// enters the registry. Never serialized with the record.
    #[serde(skip)]
    pub current_patience: i32,
    #[serde(rename = "affection_max")]
    pub max_affection: i32,
    #[serde(rename = "affection_current", default)]
    pub current_affection: i32,
    #[serde(default)]
    pub jealousy_factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueNode {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub choices: Vec<DialogueChoice>,
}

fn default_next_node_id() -> String {
    END_NODE_ID.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueChoice {
    pub text: String,
    #[serde(default = "default_next_node_id")]
    pub next_node_id: String,
    #[serde(default)]
    pub impact: Option<DialogueImpact>,
    #[serde(default)]
    pub requirements: Option<DialogueRequirements>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueImpact {
    #[serde(default)]
    pub affection: i32,
    #[serde(default)]
    pub patience: i32,
    #[serde(default)]
    pub set_story_flags: Option<HashMap<String, bool>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueRequirements {
    #[serde(default)]
    pub money: Option<i32>,
    #[serde(default)]
    pub intelligence: Option<i32>,
    #[serde(default)]
    pub energy: Option<i32>,
    #[serde(default)]
    pub item_id: Option<ItemId>,
    /// Exact-equality conditions; an absent player flag reads as false.
    #[serde(rename = "story_flags", default)]
    pub story_flags_condition: Option<HashMap<String, bool>>,
}

/// The dialogue graph's mandatory entry node.
pub const ROOT_NODE_ID: &str = "root";
/// Sentinel terminating a conversation; matched case-insensitively.
pub const END_NODE_ID: &str = "END";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcRecord {
    #[serde(rename = "npc_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "hex_color", default)]
    pub color_tag: Option<String>,
    #[serde(default)]
    pub sprite_path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    pub stats: NpcStats,
    #[serde(default)]
    pub schedule: HashMap<DayKey, DaySchedule>,
    /// Per-absolute-day schedule overrides, keyed by the day number
    /// (JSON object keys, hence strings).
    #[serde(default)]
    pub special_events: HashMap<String, DaySchedule>,
    #[serde(default)]
    pub dialogues: HashMap<String, DialogueNode>,
}

impl NpcRecord {
    pub fn special_event_for(&self, day: u32) -> Option<&DaySchedule> {
        self.special_events.get(&day.to_string())
    }

    pub fn has_dialogue(&self) -> bool {
        self.dialogues.contains_key(ROOT_NODE_ID)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct NpcRegistry {
    /// Load order is preserved; presence queries report NPCs in this order.
    pub npcs: Vec<NpcRecord>,
}

impl NpcRegistry {
    pub fn get(&self, id: &str) -> Option<&NpcRecord> {
        self.npcs.iter().find(|npc| npc.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut NpcRecord> {
        self.npcs.iter_mut().find(|npc| npc.id == id)
    }

    /// Inserts or replaces a record.
    ///
    /// `current_patience` initializes from `base_patience` exactly once, when
    /// the id first enters the registry. Re-inserting a known id carries the
    /// accrued patience and affection over to the new record, so a data
    /// reload never resets them.
    pub fn insert(&mut self, mut record: NpcRecord) {
        if let Some(existing) = self.get_mut(&record.id) {
            record.stats.current_patience = existing.stats.current_patience;
            record.stats.current_affection = existing.stats.current_affection;
            *existing = record;
        } else {
            record.stats.current_patience = record.stats.base_patience;
            self.npcs.push(record);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DIALOGUE ENGINE STATE
// ═══════════════════════════════════════════════════════════════════════

/// The one conversation of the session. Starting a new one requires being
/// back at Inactive first.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub enum ActiveDialogue {
    #[default]
    Inactive,
    AtNode { npc_id: String, node_id: String },
}

impl ActiveDialogue {
    pub fn is_active(&self) -> bool {
        !matches!(self, ActiveDialogue::Inactive)
    }
}

/// Load-time dialogue graph findings. Non-fatal: the session continues with
/// the broken links surfaced here and in the log.
#[derive(Resource, Debug, Clone, Default)]
pub struct DataIntegrityReport {
    pub errors: Vec<String>,
}

impl DataIntegrityReport {
    pub fn count(&self) -> usize {
        self.errors.len()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// Request: advance the clock one phase.
#[derive(Event, Debug, Clone)]
pub struct AdvanceTimeEvent;

/// A new day started (fired exactly once per Night→Morning transition).
#[derive(Event, Debug, Clone)]
pub struct NewDayEvent {
    pub day: u32,
}

/// The clock was overwritten out-of-band (e.g. by a load); observers should
/// recompute anything derived from it.
#[derive(Event, Debug, Clone)]
pub struct ClockChangedEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    GoToSchool,
    Study,
    Relax,
    Sleep,
}

#[derive(Event, Debug, Clone)]
pub struct PlayerActionEvent {
    pub action: PlayerAction,
}

#[derive(Event, Debug, Clone)]
pub struct TravelEvent {
    pub location_id: LocationId,
}

#[derive(Event, Debug, Clone)]
pub struct BackToMapEvent;

/// Request: open an NPC's dialogue (enters at the "root" node).
#[derive(Event, Debug, Clone)]
pub struct DialogueStartEvent {
    pub npc_id: String,
}

/// Request: select a choice of the current dialogue node, by index.
#[derive(Event, Debug, Clone)]
pub struct DialogueChoiceEvent {
    pub choice_index: usize,
}

#[derive(Event, Debug, Clone)]
pub struct DialogueEndedEvent {
    pub npc_id: String,
}

/// A dialogue link pointed at a node that does not exist; the conversation
/// was terminated instead of crashing.
#[derive(Event, Debug, Clone)]
pub struct DialogueIntegrityEvent {
    pub npc_id: String,
    pub node_id: String,
    pub next_node_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct BuyRequestEvent {
    pub item_id: ItemId,
}

/// Change descriptor for player money (positive = gain, negative = spend).
/// Informational: the deduction itself already happened.
#[derive(Event, Debug, Clone)]
pub struct MoneyChangeEvent {
    pub amount: i32,
    pub reason: String,
}

/// Transient status line for the presentation layer. Fire-and-forget.
#[derive(Event, Debug, Clone)]
pub struct StatusEvent {
    pub message: String,
    pub seconds: f32,
}

impl StatusEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            seconds: 4.0,
        }
    }
}

#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct LoadRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub success: bool,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// State was overwritten from the save file.
    Loaded,
    /// No save file exists. A normal negative result, not an error.
    NotFound,
    /// The file exists but could not be parsed; state is unchanged.
    Corrupt,
}

#[derive(Event, Debug, Clone)]
pub struct LoadCompleteEvent {
    pub outcome: LoadOutcome,
}

// ═══════════════════════════════════════════════════════════════════════
// SAVE DATA
// ═══════════════════════════════════════════════════════════════════════

pub const SAVE_VERSION: u32 = 1;

/// The persisted state: the full player record plus the clock, including
/// day-of-week (deriving it from `current_day % 7` after a load can
/// desynchronize from the weekday that was active at save time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub money: i32,
    pub energy: i32,
    pub stress: i32,
    pub intelligence: i32,
    pub inventory_item_ids: Vec<ItemId>,
    pub story_flags: HashMap<String, bool>,
    pub current_day: u32,
    pub phase: DayPhase,
    pub day_of_week: Weekday,
}
