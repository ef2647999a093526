/// Live scoreboard for the overlay
///
/// ## Architecture
///
/// ```text
///  HostEvent ──> ScoreboardController ──┬──> StateAggregator ──> MatchStateDocument
///                      │                │                              │
///                      │                └──> PostgameSequencer         │ notify
///                      │                          │ show/hide/reset    ▼
///                      └──────────────────────────┴──────────> NotificationBridge
///                                                                       │
///                                                                       ▼
///                                                              PresentationSurface
/// ```

pub mod aggregator;
pub mod commands;
pub mod controller;
pub mod document;
pub mod notify;
pub mod objective;
pub mod sequencer;

pub use aggregator::StateAggregator;
pub use controller::{ScoreboardController, ScoreboardSettings};
pub use document::{LiveMatch, MatchStateDocument, PlayerRecord};
pub use notify::NotificationBridge;
pub use objective::has_objective;
pub use sequencer::{
    PostgamePhase, PostgameSequencer, SequencerAction, SequencerState, SequencerTiming,
    ShowPayload,
};
