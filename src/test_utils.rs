//! In-memory host and presentation surface for unit and integration tests

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;

use crate::host::{
    InputProvider, ItemDefinition, MultiplayerItemType, ObjectIndex, ObjectProvider,
    PlayerDataProvider, PlayerProperties, PlayerStats, PresentationSurface, SelectTicks, Session,
    SessionProvider, END_OF_PLAYERS, TEAM_SCORE_SLOTS,
};

// ============================================================================
// Test Host
// ============================================================================

/// A player occupying a membership slot
#[derive(Debug, Clone)]
pub struct TestPlayer {
    pub properties: PlayerProperties,
    pub stats: PlayerStats,
    pub alive: bool,
    pub host: bool,
}

impl TestPlayer {
    pub fn named(name: &str) -> Self {
        Self {
            properties: PlayerProperties {
                display_name: name.to_string(),
                team_index: 0,
                primary_color: 0x00FF00,
                uid: 0,
            },
            stats: PlayerStats::default(),
            alive: true,
            host: false,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    established: bool,
    has_teams: bool,
    players: BTreeMap<i32, TestPlayer>,
    mode_writes: Vec<i32>,
}

/// Session backed by an ordered slot table
#[derive(Debug, Default)]
pub struct TestSession {
    state: Mutex<SessionState>,
}

impl Session for TestSession {
    fn is_established(&self) -> bool {
        self.state.lock().established
    }

    fn has_teams(&self) -> bool {
        self.state.lock().has_teams
    }

    fn set_session_mode(&self, mode: i32) {
        self.state.lock().mode_writes.push(mode);
    }

    fn find_first_player(&self) -> i32 {
        self.state
            .lock()
            .players
            .keys()
            .next()
            .copied()
            .unwrap_or(END_OF_PLAYERS)
    }

    fn find_next_player(&self, index: i32) -> i32 {
        self.state
            .lock()
            .players
            .range(index + 1..)
            .next()
            .map(|(slot, _)| *slot)
            .unwrap_or(END_OF_PLAYERS)
    }

    fn is_host(&self, index: i32) -> bool {
        self.state
            .lock()
            .players
            .get(&index)
            .map(|p| p.host)
            .unwrap_or(false)
    }

    fn player_properties(&self, index: i32) -> Option<PlayerProperties> {
        self.state
            .lock()
            .players
            .get(&index)
            .map(|p| p.properties.clone())
    }
}

#[derive(Debug, Default)]
struct ObjectTable {
    units: HashMap<i32, ObjectIndex>,
    equipped: HashMap<ObjectIndex, i8>,
    held: HashMap<(ObjectIndex, i8), ObjectIndex>,
    definitions: HashMap<ObjectIndex, ItemDefinition>,
    next_index: u32,
}

impl ObjectTable {
    fn allocate(&mut self) -> ObjectIndex {
        self.next_index += 1;
        ObjectIndex(self.next_index)
    }
}

#[derive(Debug, Default)]
struct InputState {
    ticks: SelectTicks,
    modifier: bool,
    screen: Option<String>,
}

/// Fake host implementing every provider trait
#[derive(Debug)]
pub struct TestHost {
    session_present: Mutex<bool>,
    session: TestSession,
    team_scores: Mutex<Option<[i16; TEAM_SCORE_SLOTS]>>,
    game_type: Mutex<i32>,
    players_info: Mutex<Option<String>>,
    objects: Mutex<ObjectTable>,
    input: Mutex<InputState>,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHost {
    /// Established session with no players, all team scores zero, slayer
    pub fn new() -> Self {
        let host = Self {
            session_present: Mutex::new(true),
            session: TestSession::default(),
            team_scores: Mutex::new(Some([0; TEAM_SCORE_SLOTS])),
            game_type: Mutex::new(2),
            players_info: Mutex::new(None),
            objects: Mutex::new(ObjectTable::default()),
            input: Mutex::new(InputState {
                screen: Some("ingame".to_string()),
                ..Default::default()
            }),
        };
        host.session.state.lock().established = true;
        host
    }

    /// Host with no active session at all
    pub fn without_session() -> Self {
        let host = Self::new();
        host.set_session_present(false);
        host
    }

    pub fn set_session_present(&self, present: bool) {
        *self.session_present.lock() = present;
    }

    pub fn set_established(&self, established: bool) {
        self.session.state.lock().established = established;
    }

    pub fn set_has_teams(&self, has_teams: bool) {
        self.session.state.lock().has_teams = has_teams;
    }

    pub fn add_player(&self, slot: i32, player: TestPlayer) {
        self.session.state.lock().players.insert(slot, player);
    }

    pub fn remove_player(&self, slot: i32) {
        self.session.state.lock().players.remove(&slot);
    }

    /// Mutate a player's stats in place
    pub fn update_stats(&self, slot: i32, update: impl FnOnce(&mut PlayerStats)) {
        if let Some(player) = self.session.state.lock().players.get_mut(&slot) {
            update(&mut player.stats);
        }
    }

    pub fn set_team_scores(&self, scores: Option<[i16; TEAM_SCORE_SLOTS]>) {
        *self.team_scores.lock() = scores;
    }

    pub fn set_game_type(&self, index: i32) {
        *self.game_type.lock() = index;
    }

    pub fn set_players_info(&self, info: Option<&str>) {
        *self.players_info.lock() = info.map(str::to_string);
    }

    /// Session mode values written by the overlay, in order
    pub fn session_modes(&self) -> Vec<i32> {
        self.session.state.lock().mode_writes.clone()
    }

    /// Give a player a unit; returns the unit handle
    pub fn spawn_unit(&self, slot: i32) -> ObjectIndex {
        let mut objects = self.objects.lock();
        let unit = objects.allocate();
        objects.units.insert(slot, unit);
        unit
    }

    /// Set the equipped slot of a unit without creating the held object
    pub fn set_equipped_slot(&self, unit: ObjectIndex, slot: i8) {
        self.objects.lock().equipped.insert(unit, slot);
    }

    /// Equip the player's unit with an item of the given classification
    pub fn equip(&self, slot: i32, item_type: MultiplayerItemType) {
        let existing = self.objects.lock().units.get(&slot).copied();
        let unit = match existing {
            Some(unit) => unit,
            None => self.spawn_unit(slot),
        };

        let mut objects = self.objects.lock();
        let item = objects.allocate();
        objects.equipped.insert(unit, 0);
        objects.held.insert((unit, 0), item);
        objects.definitions.insert(
            item,
            ItemDefinition {
                multiplayer_type: item_type,
            },
        );
    }

    pub fn set_select_ticks(&self, ticks: SelectTicks) {
        self.input.lock().ticks = ticks;
    }

    pub fn set_modifier_held(&self, held: bool) {
        self.input.lock().modifier = held;
    }

    pub fn set_active_screen(&self, screen: Option<&str>) {
        self.input.lock().screen = screen.map(str::to_string);
    }
}

impl SessionProvider for TestHost {
    fn active_session(&self) -> Option<&dyn Session> {
        if *self.session_present.lock() {
            Some(&self.session)
        } else {
            None
        }
    }
}

impl PlayerDataProvider for TestHost {
    fn player_stats(&self, index: i32) -> PlayerStats {
        self.session
            .state
            .lock()
            .players
            .get(&index)
            .map(|p| p.stats)
            .unwrap_or_default()
    }

    fn is_alive(&self, index: i32) -> bool {
        self.session
            .state
            .lock()
            .players
            .get(&index)
            .map(|p| p.alive)
            .unwrap_or(false)
    }

    fn team_scores(&self) -> Option<[i16; TEAM_SCORE_SLOTS]> {
        *self.team_scores.lock()
    }

    fn game_type_index(&self) -> i32 {
        *self.game_type.lock()
    }

    fn players_info(&self) -> Option<String> {
        self.players_info.lock().clone()
    }
}

impl ObjectProvider for TestHost {
    fn player_unit(&self, player_index: i32) -> Option<ObjectIndex> {
        self.objects.lock().units.get(&player_index).copied()
    }

    fn equipped_item_slot(&self, unit: ObjectIndex) -> Option<i8> {
        self.objects.lock().equipped.get(&unit).copied()
    }

    fn unit_item(&self, unit: ObjectIndex, slot: i8) -> Option<ObjectIndex> {
        self.objects.lock().held.get(&(unit, slot)).copied()
    }

    fn item_definition(&self, item: ObjectIndex) -> Option<ItemDefinition> {
        self.objects.lock().definitions.get(&item).copied()
    }
}

impl InputProvider for TestHost {
    fn select_ticks(&self) -> SelectTicks {
        self.input.lock().ticks
    }

    fn modifier_held(&self) -> bool {
        self.input.lock().modifier
    }

    fn active_screen(&self) -> Option<String> {
        self.input.lock().screen.clone()
    }
}

// ============================================================================
// Recording Surface
// ============================================================================

/// One call made against the presentation surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Show { channel: String, payload: String },
    Hide { channel: String },
    Send { channel: String, payload: String },
}

/// Presentation surface that records every call
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn show_count(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Show { .. }))
    }

    pub fn hide_count(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Hide { .. }))
    }

    pub fn send_count(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Send { .. }))
    }

    /// Payloads passed to `send`, oldest first
    pub fn sent_payloads(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Send { payload, .. } => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }
}

impl PresentationSurface for RecordingSurface {
    fn show(&self, channel: &str, payload: &str) {
        self.calls.lock().push(SurfaceCall::Show {
            channel: channel.to_string(),
            payload: payload.to_string(),
        });
    }

    fn hide(&self, channel: &str) {
        self.calls.lock().push(SurfaceCall::Hide {
            channel: channel.to_string(),
        });
    }

    fn send(&self, channel: &str, payload: &str) {
        self.calls.lock().push(SurfaceCall::Send {
            channel: channel.to_string(),
            payload: payload.to_string(),
        });
    }
}
