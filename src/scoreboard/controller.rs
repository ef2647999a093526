/// Scoreboard controller
///
/// Glues the aggregator, the postgame sequencer and the notification bridge
/// to the host's event stream. Every entry point runs synchronously on the
/// caller's frame.
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Receiver;

use super::aggregator::StateAggregator;
use super::document::MatchStateDocument;
use super::notify::NotificationBridge;
use super::sequencer::{PostgameSequencer, SequencerAction, SequencerState, SequencerTiming};
use crate::config::Config;
use crate::host::{
    HostProviders, InputProvider, PresentationSurface, SessionProvider, MAIN_MENU_SCREEN,
    SESSION_MODE_RESET,
};
use crate::messaging::{GameEvent, HostEvent};

/// Channel name and postgame timing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardSettings {
    pub channel: String,
    pub timing: SequencerTiming,
}

impl Default for ScoreboardSettings {
    fn default() -> Self {
        Self {
            channel: "scoreboard".to_string(),
            timing: SequencerTiming::default(),
        }
    }
}

impl ScoreboardSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            channel: config.scoreboard_channel.clone(),
            timing: SequencerTiming {
                reveal_delay: config.reveal_delay(),
                display_duration: config.display_duration(),
            },
        }
    }
}

/// Drives the scoreboard channel from host events
pub struct ScoreboardController {
    channel: String,
    aggregator: StateAggregator,
    sequencer: PostgameSequencer,
    bridge: NotificationBridge,
    sessions: Arc<dyn SessionProvider>,
    input: Arc<dyn InputProvider>,
}

impl ScoreboardController {
    pub fn new(
        settings: ScoreboardSettings,
        providers: HostProviders,
        surface: Arc<dyn PresentationSurface>,
    ) -> Self {
        tracing::info!("Scoreboard controller on channel {}", settings.channel);
        Self {
            channel: settings.channel,
            aggregator: StateAggregator::new(
                providers.sessions.clone(),
                providers.players,
                providers.objects,
            ),
            sequencer: PostgameSequencer::new(settings.timing),
            bridge: NotificationBridge::new(surface),
            sessions: providers.sessions,
            input: providers.input,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn state(&self) -> SequencerState {
        self.sequencer.state()
    }

    pub fn snapshot(&self) -> MatchStateDocument {
        self.aggregator.snapshot()
    }

    /// Any game event republishes the scoreboard; match end starts the postgame
    pub fn on_game_event(&mut self, event: &GameEvent, now: Instant) {
        self.publish_snapshot();

        if event.is_match_end() {
            self.sequencer.on_match_ended(now);
        }
    }

    pub fn on_score_update(&mut self) {
        self.publish_snapshot();
    }

    /// Sample select input for this frame
    pub fn on_input_updated(&mut self) {
        let on_main_menu = self.input.active_screen().as_deref() == Some(MAIN_MENU_SCREEN);
        let action = self.sequencer.on_input(
            self.input.select_ticks(),
            self.input.modifier_held(),
            on_main_menu,
        );

        if let Some(action) = action {
            self.apply(action);
        }
    }

    /// Advance the postgame timers
    pub fn tick(&mut self, now: Instant) {
        for action in self.sequencer.tick(now) {
            self.apply(action);
        }
    }

    pub fn handle(&mut self, event: HostEvent, now: Instant) {
        tracing::debug!("{}", event.description());
        match event {
            HostEvent::Game(game) => self.on_game_event(&game, now),
            HostEvent::ScoreUpdated => self.on_score_update(),
            HostEvent::InputUpdated => self.on_input_updated(),
        }
    }

    /// Drain queued events, then tick once; returns how many events were handled
    pub fn pump(&mut self, events: &Receiver<HostEvent>, now: Instant) -> usize {
        let mut handled = 0;
        for event in events.try_iter() {
            self.handle(event, now);
            handled += 1;
        }
        self.tick(now);
        handled
    }

    /// Show the channel with the current lock and postgame flags
    pub fn show(&mut self) {
        self.publish_snapshot();
        self.apply(SequencerAction::Show(self.sequencer.state().payload()));
    }

    pub fn hide(&mut self) {
        self.apply(SequencerAction::Hide);
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.sequencer.set_locked(locked);
    }

    pub fn is_visible(&self) -> bool {
        self.bridge.is_visible(&self.channel)
    }

    fn publish_snapshot(&mut self) {
        let document = self.aggregator.snapshot();
        self.bridge.notify_value(&self.channel, &document, false);
    }

    fn apply(&mut self, action: SequencerAction) {
        match action {
            SequencerAction::Show(payload) => self.bridge.show_value(&self.channel, &payload),
            SequencerAction::Hide => self.bridge.hide(&self.channel),
            SequencerAction::ResetSession => match self.sessions.active_session() {
                Some(session) => session.set_session_mode(SESSION_MODE_RESET),
                None => tracing::warn!("No session to reset after postgame"),
            },
        }
    }
}
