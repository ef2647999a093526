/// Scoreboard snapshot aggregation
///
/// Pulls session, team and player state from the host providers into one
/// [`MatchStateDocument`]. Each call builds a new document; nothing is
/// carried between calls.
use std::sync::Arc;

use super::document::{
    format_color, format_uid, game_type_name, LiveMatch, MatchStateDocument, PlayerRecord,
};
use super::objective::has_objective;
use crate::host::{ObjectProvider, PlayerDataProvider, Session, SessionProvider, END_OF_PLAYERS};

/// Upper bound on cursor steps, larger than any membership table
const MAX_PLAYER_SLOTS: usize = 16;

/// Builds scoreboard snapshots from host providers
#[derive(Clone)]
pub struct StateAggregator {
    sessions: Arc<dyn SessionProvider>,
    players: Arc<dyn PlayerDataProvider>,
    objects: Arc<dyn ObjectProvider>,
}

impl StateAggregator {
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        players: Arc<dyn PlayerDataProvider>,
        objects: Arc<dyn ObjectProvider>,
    ) -> Self {
        Self {
            sessions,
            players,
            objects,
        }
    }

    /// Read the current match state
    pub fn snapshot(&self) -> MatchStateDocument {
        let session = match self.sessions.active_session() {
            Some(session) if session.is_established() => session,
            _ => return MatchStateDocument::NoSession,
        };

        let has_teams = session.has_teams();

        let team_scores = self
            .players
            .team_scores()
            .map(|scores| scores.to_vec())
            .unwrap_or_default();

        let game_type = game_type_name(self.players.game_type_index());

        let players = self.collect_players(session);

        MatchStateDocument::Live(LiveMatch {
            players_info: self.players.players_info(),
            has_teams,
            team_scores,
            game_type,
            players,
        })
    }

    /// Walk the membership cursor until the end sentinel
    ///
    /// Steps are counted rather than records, so a cursor stuck on vacated
    /// slots still stops.
    fn collect_players(&self, session: &dyn Session) -> Vec<PlayerRecord> {
        let mut records = Vec::new();
        let mut index = session.find_first_player();
        let mut steps = 0;

        while index != END_OF_PLAYERS {
            if steps >= MAX_PLAYER_SLOTS {
                tracing::warn!("Player cursor did not terminate, truncating roster");
                break;
            }
            steps += 1;

            match self.player_record(session, index) {
                Some(record) => records.push(record),
                None => tracing::debug!("Player slot {} vacated during snapshot", index),
            }
            index = session.find_next_player(index);
        }

        records
    }

    fn player_record(&self, session: &dyn Session, index: i32) -> Option<PlayerRecord> {
        let properties = session.player_properties(index)?;
        let stats = self.players.player_stats(index);

        Some(PlayerRecord {
            name: properties.display_name,
            team: properties.team_index,
            color: format_color(properties.primary_color),
            uid: format_uid(properties.uid),
            is_host: session.is_host(index),
            is_alive: self.players.is_alive(index),
            kills: stats.kills,
            assists: stats.assists,
            deaths: stats.deaths,
            score: stats.score,
            player_index: index,
            time_spent_alive: stats.time_spent_alive,
            best_streak: stats.best_streak,
            has_objective: has_objective(self.objects.as_ref(), index),
            flag_kills: stats.flag_kills,
            ball_kills: stats.ball_kills,
            kings_killed: stats.kings_killed,
            time_in_hill: stats.time_in_hill,
            time_controlling_hill: stats.time_controlling_hill,
            humans_infected: stats.humans_infected,
            zombies_killed: stats.zombies_killed,
        })
    }
}
