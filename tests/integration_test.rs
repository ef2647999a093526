// Integration tests for the match overlay
// These drive the public API end to end with the in-memory host
// Run with: cargo test --features test-utils

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tempfile::TempDir;

use match_overlay::config::Config;
use match_overlay::console::{CommandFlags, CommandOutcome, Console, VarValue};
use match_overlay::host::{HostProviders, MultiplayerItemType, SelectTicks, SESSION_MODE_RESET};
use match_overlay::messaging::{EventBus, GameEvent, HostEvent};
use match_overlay::scoreboard::{self, ScoreboardController, ScoreboardSettings};
use match_overlay::test_utils::{RecordingSurface, SurfaceCall, TestHost, TestPlayer};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn scoreboard() -> (Arc<TestHost>, Arc<RecordingSurface>, ScoreboardController) {
    let host = Arc::new(TestHost::new());
    let surface = Arc::new(RecordingSurface::new());
    let controller = ScoreboardController::new(
        ScoreboardSettings::default(),
        HostProviders::from_host(host.clone()),
        surface.clone(),
    );
    (host, surface, controller)
}

#[test]
fn test_postgame_reveal_and_reset_through_event_bus() {
    let (host, surface, mut controller) = scoreboard();
    host.add_player(0, TestPlayer::named("Alpha"));

    let bus = EventBus::new();
    let (rx, _id) = bus.subscribe();
    let t0 = Instant::now();

    bus.publish(HostEvent::Game(GameEvent::match_ended()));
    controller.pump(&rx, t0);
    assert!(controller.state().postgame());
    assert!(controller.state().locked);

    // Frames before the reveal delay never show the channel
    for step in [16, 1000, 3000, 4699] {
        controller.pump(&rx, t0 + ms(step));
    }
    assert_eq!(surface.show_count(), 0);

    for step in [4700, 4716, 6000, 9699] {
        controller.pump(&rx, t0 + ms(step));
    }
    assert_eq!(surface.show_count(), 1);
    assert!(host.session_modes().is_empty());

    for step in [9700, 9716, 15000] {
        controller.pump(&rx, t0 + ms(step));
    }
    assert_eq!(host.session_modes(), vec![SESSION_MODE_RESET]);
    assert_eq!(surface.show_count(), 1);
    assert!(!controller.state().postgame());
    assert!(!controller.state().score_revealed());
}

#[test]
fn test_reveal_payload_is_postgame_locked() {
    let (_host, surface, mut controller) = scoreboard();
    let t0 = Instant::now();

    controller.on_game_event(&GameEvent::match_ended(), t0);
    controller.tick(t0 + ms(4700));

    let shows: Vec<SurfaceCall> = surface
        .calls()
        .into_iter()
        .filter(|c| matches!(c, SurfaceCall::Show { .. }))
        .collect();
    assert_eq!(
        shows,
        vec![SurfaceCall::Show {
            channel: "scoreboard".to_string(),
            payload: r#"{"locked":true,"postgame":true}"#.to_string(),
        }]
    );
}

#[test]
fn test_every_notification_carries_a_fresh_snapshot() {
    let (host, surface, mut controller) = scoreboard();
    host.add_player(1, TestPlayer::named("Bravo"));
    host.equip(1, MultiplayerItemType::Flag);

    controller.on_score_update();
    host.update_stats(1, |s| {
        s.kills = 4;
        s.score = 4;
    });
    controller.on_game_event(&GameEvent::new(0x40010), Instant::now());
    host.remove_player(1);
    controller.on_score_update();

    let docs: Vec<serde_json::Value> = surface
        .sent_payloads()
        .iter()
        .map(|p| serde_json::from_str(p).unwrap())
        .collect();
    assert_eq!(docs.len(), 3);

    assert_eq!(docs[0]["players"][0]["kills"], 0);
    assert_eq!(docs[0]["players"][0]["hasObjective"], true);
    assert_eq!(docs[1]["players"][0]["kills"], 4);
    assert_eq!(docs[2]["players"], serde_json::json!([]));
}

#[test]
fn test_session_loss_publishes_empty_document() {
    let (host, surface, mut controller) = scoreboard();
    host.add_player(0, TestPlayer::named("Alpha"));

    host.set_session_present(false);
    controller.on_score_update();
    assert_eq!(surface.sent_payloads(), vec!["{}".to_string()]);
}

#[test]
fn test_manual_toggle_outside_postgame() {
    let (host, surface, mut controller) = scoreboard();
    let bus = EventBus::new();
    let (rx, _id) = bus.subscribe();
    let now = Instant::now();

    // Shift + select locks the scoreboard open
    host.set_modifier_held(true);
    host.set_select_ticks(SelectTicks {
        action: 1,
        ..Default::default()
    });
    bus.publish(HostEvent::InputUpdated);
    controller.pump(&rx, now);
    assert!(controller.is_visible());
    assert!(controller.state().locked);

    host.set_modifier_held(false);
    host.set_select_ticks(SelectTicks::default());
    bus.publish(HostEvent::InputUpdated);
    controller.pump(&rx, now);
    assert!(controller.is_visible());

    // Plain press unlocks, release hides
    host.set_select_ticks(SelectTicks {
        primary: 1,
        ..Default::default()
    });
    bus.publish(HostEvent::InputUpdated);
    controller.pump(&rx, now);
    assert!(!controller.state().locked);

    host.set_select_ticks(SelectTicks::default());
    bus.publish(HostEvent::InputUpdated);
    controller.pump(&rx, now);

    assert!(!controller.is_visible());
    assert_eq!(surface.hide_count(), 1);
}

#[test]
fn test_console_registry_properties() {
    let mut console = Console::new();
    console
        .add_command("Echo", "echo", "Echo arguments", CommandFlags::NONE, |args: &[String]| {
            CommandOutcome::ok(args.join(" "))
        })
        .unwrap();
    console
        .add_command("Boom", "boom", "", CommandFlags::HIDDEN, |_: &[String]| {
            panic!("handler fault")
        })
        .unwrap();
    console
        .add_command("Kick", "kick", "", CommandFlags::HOST_ONLY, |_: &[String]| {
            CommandOutcome::done()
        })
        .unwrap();

    assert!(console
        .add_variable("E", "echo", "", CommandFlags::NONE, VarValue::Int(0))
        .is_err());

    assert_eq!(
        console.execute_line("echo 'a b' c", false),
        CommandOutcome::ok("a b c")
    );

    let fault = console.execute_line("boom", true);
    assert!(!fault.success);

    assert!(!console.execute_line("kick", false).success);
    assert!(console.execute_line("kick", true).success);
    assert!(!console.execute_line("nope", true).success);
}

#[test]
fn test_archived_variables_survive_restart() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");

    let register = |console: &mut Console| {
        console
            .add_variable(
                "Sensitivity",
                "look_sensitivity",
                "",
                CommandFlags::ARCHIVED,
                VarValue::Float(1.0),
            )
            .unwrap();
        console
            .add_variable("Scratch", "scratch", "", CommandFlags::NONE, VarValue::Int(0))
            .unwrap();
    };

    let mut first = Console::new();
    register(&mut first);
    assert!(first.execute_line("look_sensitivity 2.5", false).success);
    assert!(first.execute_line("scratch 9", false).success);

    let mut config = Config::default();
    assert!(config.absorb_archived(first.variables.take_archived()));
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    let mut second = Console::new();
    register(&mut second);
    assert_eq!(second.restore_archived(&loaded), 1);
    assert_eq!(
        second.execute_line("look_sensitivity", false).message,
        "look_sensitivity = 2.5"
    );
    assert_eq!(second.execute_line("scratch", false).message, "scratch = 0");
}

#[test]
fn test_scoreboard_commands_share_controller() {
    let (host, surface, controller) = scoreboard();
    host.add_player(2, TestPlayer::named("Charlie"));
    let controller = Arc::new(Mutex::new(controller));

    let mut console = Console::new();
    scoreboard::commands::register(&mut console, controller.clone()).unwrap();

    assert!(console.execute_line("scoreboard_lock 1", false).success);
    assert!(console.execute_line("scoreboard_show", false).success);
    assert_eq!(
        surface.calls().last(),
        Some(&SurfaceCall::Show {
            channel: "scoreboard".to_string(),
            payload: r#"{"locked":true,"postgame":false}"#.to_string(),
        })
    );

    let dump = console.execute_line("scoreboard_dump", false);
    let doc: serde_json::Value = serde_json::from_str(&dump.message).unwrap();
    assert_eq!(doc["players"][0]["name"], "Charlie");

    assert!(console.execute_line("scoreboard_hide", false).success);
    assert!(!controller.lock().is_visible());
}
