/// Host event delivery
///
/// ```text
/// ┌────────────┐   HostEvent   ┌───────────┐   Receiver   ┌──────────────────────┐
/// │ Host hooks │ ────────────> │ Event Bus │ ───────────> │ ScoreboardController │
/// │ (any thrd) │               │           │              │  pump() once/frame   │
/// └────────────┘               └───────────┘              └──────────────────────┘
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let bus = EventBus::new();
/// let (rx, _id) = bus.subscribe();
///
/// // From a host hook
/// bus.publish(HostEvent::Game(GameEvent::new(name_id)));
///
/// // On the frame thread
/// controller.pump(&rx, Instant::now());
/// ```

pub mod bus;
pub mod events;

pub use bus::{EventBus, SubscriberId};
pub use events::{GameEvent, HostEvent, MATCH_ENDED_EVENT};
