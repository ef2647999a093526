/// Interfaces to the running match host
///
/// Everything the overlay reads or drives in the host goes through these
/// traits. Implementations belong to the engine introspection layer; this
/// crate never touches host memory itself. All methods take `&self` because
/// the host owns the underlying state and may change it between calls.
use std::sync::Arc;

/// Number of team score slots the host keeps
pub const TEAM_SCORE_SLOTS: usize = 10;

/// Player cursor value returned when the membership table is exhausted
pub const END_OF_PLAYERS: i32 = -1;

/// Screen identifier of the host's main menu
pub const MAIN_MENU_SCREEN: &str = "mainmenu";

/// Session mode the host is returned to after the postgame display
pub const SESSION_MODE_RESET: i32 = 1;

/// Identity of a player as published by the session membership table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProperties {
    pub display_name: String,
    pub team_index: i32,
    /// Primary armor color, 0xRRGGBB
    pub primary_color: u32,
    pub uid: u64,
}

/// Per-player counters, in the host's native 16-bit width
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub score: i16,
    pub kills: i16,
    pub assists: i16,
    pub deaths: i16,
    pub time_spent_alive: i16,
    pub best_streak: i16,
    pub flag_kills: i16,
    pub ball_kills: i16,
    pub kings_killed: i16,
    pub time_in_hill: i16,
    pub time_controlling_hill: i16,
    pub humans_infected: i16,
    pub zombies_killed: i16,
}

/// An active network session
pub trait Session {
    fn is_established(&self) -> bool;

    fn has_teams(&self) -> bool;

    /// Write the session mode parameter
    fn set_session_mode(&self, mode: i32);

    /// First occupied membership slot, or [`END_OF_PLAYERS`]
    fn find_first_player(&self) -> i32;

    /// Next occupied slot after `index`, or [`END_OF_PLAYERS`]
    fn find_next_player(&self, index: i32) -> i32;

    /// Whether the player in this slot is the session host
    fn is_host(&self, index: i32) -> bool;

    /// Membership properties; `None` if the slot was vacated mid-read
    fn player_properties(&self, index: i32) -> Option<PlayerProperties>;
}

/// Source of the current session
pub trait SessionProvider: Send + Sync {
    fn active_session(&self) -> Option<&dyn Session>;
}

/// Match-wide and per-player statistics
pub trait PlayerDataProvider: Send + Sync {
    fn player_stats(&self, index: i32) -> PlayerStats;

    fn is_alive(&self, index: i32) -> bool;

    /// Team score slots, `None` when the engine globals are not available
    fn team_scores(&self) -> Option<[i16; TEAM_SCORE_SLOTS]>;

    /// Raw index of the running game variant type
    fn game_type_index(&self) -> i32;

    /// Extra player info string published by the server, if any
    fn players_info(&self) -> Option<String> {
        None
    }
}

/// Handle to a live object in the host's object table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectIndex(pub u32);

/// Multiplayer classification declared by an item definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplayerItemType {
    None,
    Flag,
    Ball,
    Bomb,
}

/// The parts of an item definition the overlay cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemDefinition {
    pub multiplayer_type: MultiplayerItemType,
}

/// Object table lookups used to resolve what a player is holding
pub trait ObjectProvider: Send + Sync {
    /// Unit the player currently controls
    fn player_unit(&self, player_index: i32) -> Option<ObjectIndex>;

    /// Equipped item slot of a unit, `-1` when nothing is equipped
    fn equipped_item_slot(&self, unit: ObjectIndex) -> Option<i8>;

    /// Object held by the unit in the given slot
    fn unit_item(&self, unit: ObjectIndex, slot: i8) -> Option<ObjectIndex>;

    fn item_definition(&self, item: ObjectIndex) -> Option<ItemDefinition>;
}

/// Ticks since the last state change of each binding of the select action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectTicks {
    pub primary: u32,
    pub secondary: u32,
    pub action: u32,
}

impl SelectTicks {
    /// Pressed on this frame through any binding
    pub fn pressed(&self) -> bool {
        self.primary == 1 || self.secondary == 1 || self.action == 1
    }

    /// Not held on any binding
    pub fn released(&self) -> bool {
        self.primary == 0 && self.secondary == 0 && self.action == 0
    }
}

/// Per-frame input state
pub trait InputProvider: Send + Sync {
    fn select_ticks(&self) -> SelectTicks;

    /// Whether the lock modifier (shift) is held
    fn modifier_held(&self) -> bool;

    /// Identifier of the screen the UI is showing, if known
    fn active_screen(&self) -> Option<String>;
}

/// Named channels on the overlay UI
///
/// Calls are fire-and-forget; implementations must not block.
pub trait PresentationSurface: Send + Sync {
    fn show(&self, channel: &str, payload: &str);

    fn hide(&self, channel: &str);

    /// Replace the channel's data without changing visibility
    fn send(&self, channel: &str, payload: &str);
}

/// The host-side collaborators the scoreboard reads from
#[derive(Clone)]
pub struct HostProviders {
    pub sessions: Arc<dyn SessionProvider>,
    pub players: Arc<dyn PlayerDataProvider>,
    pub objects: Arc<dyn ObjectProvider>,
    pub input: Arc<dyn InputProvider>,
}

impl HostProviders {
    /// Use one object for every provider role
    pub fn from_host<H>(host: Arc<H>) -> Self
    where
        H: SessionProvider + PlayerDataProvider + ObjectProvider + InputProvider + 'static,
    {
        Self {
            sessions: host.clone(),
            players: host.clone(),
            objects: host.clone(),
            input: host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_ticks_edges() {
        let idle = SelectTicks::default();
        assert!(idle.released());
        assert!(!idle.pressed());

        let pressed = SelectTicks {
            secondary: 1,
            ..Default::default()
        };
        assert!(pressed.pressed());
        assert!(!pressed.released());

        let held = SelectTicks {
            primary: 12,
            ..Default::default()
        };
        assert!(!held.pressed());
        assert!(!held.released());
    }
}
