/// Postgame scoreboard sequencing
///
/// Tracks when the scoreboard is locked open and when the postgame view is
/// revealed and dismissed.
///
/// ```text
///            match ended              reveal delay elapsed
///   Live ─────────────────> Waiting ─────────────────────> Revealed
///    ▲                         │                               │
///    └─────────────────────────┴───────────────────────────────┘
///              reveal delay + display duration elapsed
/// ```
///
/// The sequencer owns no host references. It is fed the current time and
/// input and answers with [`SequencerAction`]s for the controller to apply.
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::host::SelectTicks;

/// Default delay between match end and the postgame reveal
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(4700);

/// Default time the postgame scoreboard stays up after the reveal
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Postgame timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerTiming {
    pub reveal_delay: Duration,
    pub display_duration: Duration,
}

impl Default for SequencerTiming {
    fn default() -> Self {
        Self {
            reveal_delay: DEFAULT_REVEAL_DELAY,
            display_duration: DEFAULT_DISPLAY_DURATION,
        }
    }
}

impl SequencerTiming {
    /// Elapsed time after which the session is reset
    pub fn reset_after(&self) -> Duration {
        self.reveal_delay + self.display_duration
    }
}

/// Where the match is in the postgame flow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostgamePhase {
    /// Match in progress or between matches
    #[default]
    Live,
    /// Match ended, waiting out the reveal delay
    Waiting { started_at: Instant },
    /// Postgame scoreboard shown
    Revealed { started_at: Instant },
}

/// Lock and postgame flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequencerState {
    /// Scoreboard is held open and ignores select release
    pub locked: bool,
    pub phase: PostgamePhase,
}

impl SequencerState {
    pub fn postgame(&self) -> bool {
        !matches!(self.phase, PostgamePhase::Live)
    }

    pub fn score_revealed(&self) -> bool {
        matches!(self.phase, PostgamePhase::Revealed { .. })
    }

    pub fn postgame_started_at(&self) -> Option<Instant> {
        match self.phase {
            PostgamePhase::Live => None,
            PostgamePhase::Waiting { started_at } | PostgamePhase::Revealed { started_at } => {
                Some(started_at)
            }
        }
    }

    /// Payload sent with `show`
    pub fn payload(&self) -> ShowPayload {
        ShowPayload {
            locked: self.locked,
            postgame: self.postgame(),
        }
    }
}

/// Body of a scoreboard `show` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShowPayload {
    pub locked: bool,
    pub postgame: bool,
}

/// What the controller should do in response to a sequencer step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerAction {
    Show(ShowPayload),
    Hide,
    /// Return the host session to its post-match mode
    ResetSession,
}

/// Timed postgame state machine
#[derive(Debug, Default)]
pub struct PostgameSequencer {
    state: SequencerState,
    timing: SequencerTiming,
}

impl PostgameSequencer {
    pub fn new(timing: SequencerTiming) -> Self {
        Self {
            state: SequencerState::default(),
            timing,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn timing(&self) -> SequencerTiming {
        self.timing
    }

    /// Match ended: start the postgame episode and lock the scoreboard
    ///
    /// Returns false if a postgame episode is already running; its start
    /// time is kept.
    pub fn on_match_ended(&mut self, now: Instant) -> bool {
        if self.state.postgame() {
            tracing::debug!("Match end while already in postgame, ignoring");
            return false;
        }

        self.state.phase = PostgamePhase::Waiting { started_at: now };
        self.state.locked = true;
        tracing::info!("Match ended, postgame scoreboard in {:?}", self.timing.reveal_delay);
        true
    }

    /// Advance timed transitions
    ///
    /// A late tick can both reveal and reset; the actions come back in that
    /// order.
    pub fn tick(&mut self, now: Instant) -> Vec<SequencerAction> {
        let mut actions = Vec::new();

        let Some(started_at) = self.state.postgame_started_at() else {
            return actions;
        };
        let elapsed = now.saturating_duration_since(started_at);

        if matches!(self.state.phase, PostgamePhase::Waiting { .. })
            && elapsed >= self.timing.reveal_delay
        {
            self.state.phase = PostgamePhase::Revealed { started_at };
            actions.push(SequencerAction::Show(self.state.payload()));
            tracing::info!("Postgame scoreboard revealed");
        }

        if elapsed >= self.timing.reset_after() {
            self.state.phase = PostgamePhase::Live;
            actions.push(SequencerAction::ResetSession);
            tracing::info!("Postgame display finished, resetting session mode");
        }

        actions
    }

    /// Apply one frame of select input
    ///
    /// A press shows the scoreboard and locks it when the modifier is held;
    /// pressing again without the modifier unlocks it. Releasing hides an
    /// unlocked scoreboard outside the postgame. Presses are ignored on the
    /// main menu.
    pub fn on_input(
        &mut self,
        ticks: SelectTicks,
        modifier_held: bool,
        on_main_menu: bool,
    ) -> Option<SequencerAction> {
        if ticks.pressed() && !on_main_menu {
            self.state.locked = modifier_held;
            return Some(SequencerAction::Show(self.state.payload()));
        }

        if !self.state.locked && !self.state.postgame() && ticks.released() {
            self.state.locked = false;
            return Some(SequencerAction::Hide);
        }

        None
    }

    /// Set the lock flag directly
    pub fn set_locked(&mut self, locked: bool) {
        self.state.locked = locked;
    }
}
