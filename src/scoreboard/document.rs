/// Scoreboard document published to the overlay
///
/// Field order is the serialization order; the overlay reads these keys by
/// name, so renames here are breaking changes.
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Game variant type names, indexed by the host's variant type
pub const GAME_TYPE_NAMES: [&str; 11] = [
    "none",
    "ctf",
    "slayer",
    "oddball",
    "koth",
    "forge",
    "vip",
    "juggernaut",
    "territories",
    "assault",
    "infection",
];

/// Name for a raw variant type, `None` outside the known range
pub fn game_type_name(index: i32) -> Option<&'static str> {
    usize::try_from(index)
        .ok()
        .and_then(|i| GAME_TYPE_NAMES.get(i))
        .copied()
}

/// `#rrggbb` from a 0xRRGGBB color
pub fn format_color(color: u32) -> String {
    format!("#{:06x}", color & 0x00FF_FFFF)
}

/// Hex string of the uid bytes in memory order
pub fn format_uid(uid: u64) -> String {
    uid.to_le_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// One row of the scoreboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub name: String,
    pub team: i32,
    pub color: String,
    #[serde(rename = "UID")]
    pub uid: String,
    pub is_host: bool,
    pub is_alive: bool,
    pub kills: i16,
    pub assists: i16,
    pub deaths: i16,
    pub score: i16,
    pub player_index: i32,
    pub time_spent_alive: i16,
    pub best_streak: i16,
    pub has_objective: bool,
    pub flag_kills: i16,
    pub ball_kills: i16,
    pub kings_killed: i16,
    pub time_in_hill: i16,
    pub time_controlling_hill: i16,
    pub humans_infected: i16,
    pub zombies_killed: i16,
}

/// Document body while a session is established
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players_info: Option<String>,
    pub has_teams: bool,
    pub team_scores: Vec<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_type: Option<&'static str>,
    pub players: Vec<PlayerRecord>,
}

/// A fresh snapshot of match state
///
/// `NoSession` serializes as `{}` so the overlay always receives a
/// well-formed object, never a partial player list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStateDocument {
    NoSession,
    Live(LiveMatch),
}

impl MatchStateDocument {
    pub fn is_live(&self) -> bool {
        matches!(self, MatchStateDocument::Live(_))
    }

    pub fn players(&self) -> &[PlayerRecord] {
        match self {
            MatchStateDocument::Live(live) => &live.players,
            MatchStateDocument::NoSession => &[],
        }
    }

    /// Compact JSON for the presentation surface
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for MatchStateDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MatchStateDocument::NoSession => serializer.serialize_map(Some(0))?.end(),
            MatchStateDocument::Live(live) => live.serialize(serializer),
        }
    }
}
