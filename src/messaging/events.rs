/// Events raised by host-side hooks
///
/// Hooks run wherever the host calls them; they only describe what happened
/// and leave the reaction to the scoreboard controller's frame pump.

/// String id of `general_event_game_over`
pub const MATCH_ENDED_EVENT: u32 = 0x4004D;

/// A named game event from the host's event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameEvent {
    /// String id of the event's name
    pub name_id: u32,
}

impl GameEvent {
    pub fn new(name_id: u32) -> Self {
        Self { name_id }
    }

    pub fn match_ended() -> Self {
        Self::new(MATCH_ENDED_EVENT)
    }

    pub fn is_match_end(&self) -> bool {
        self.name_id == MATCH_ENDED_EVENT
    }
}

/// Host notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Any game event
    Game(GameEvent),

    /// Team or player scores changed
    ScoreUpdated,

    /// Input state was sampled for this frame
    InputUpdated,
}

impl HostEvent {
    /// Short label for logs
    pub fn description(&self) -> String {
        match self {
            HostEvent::Game(event) if event.is_match_end() => "Match ended".to_string(),
            HostEvent::Game(event) => format!("Game event {:#x}", event.name_id),
            HostEvent::ScoreUpdated => "Score updated".to_string(),
            HostEvent::InputUpdated => "Input updated".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_end_id() {
        assert!(GameEvent::match_ended().is_match_end());
        assert!(GameEvent::new(0x4004D).is_match_end());
        assert!(!GameEvent::new(0x40001).is_match_end());
    }

    #[test]
    fn test_event_description() {
        assert_eq!(
            HostEvent::Game(GameEvent::match_ended()).description(),
            "Match ended"
        );
        assert_eq!(
            HostEvent::Game(GameEvent::new(0x10)).description(),
            "Game event 0x10"
        );
        assert_eq!(HostEvent::ScoreUpdated.description(), "Score updated");
    }
}
