/// Console commands for driving the scoreboard by hand
use std::sync::Arc;

use parking_lot::Mutex;

use super::controller::ScoreboardController;
use crate::console::{required_arg, CommandFlags, CommandOutcome, Console, VarType, VarValue};
use crate::error::RegistryError;

/// Register `scoreboard_*` commands against a shared controller
pub fn register(
    console: &mut Console,
    controller: Arc<Mutex<ScoreboardController>>,
) -> Result<(), RegistryError> {
    let shown = controller.clone();
    console.add_command(
        "Scoreboard.Show",
        "scoreboard_show",
        "Show the scoreboard with the current lock state",
        CommandFlags::NONE,
        move |_: &[String]| {
            shown.lock().show();
            CommandOutcome::done()
        },
    )?;

    let hidden = controller.clone();
    console.add_command(
        "Scoreboard.Hide",
        "scoreboard_hide",
        "Hide the scoreboard",
        CommandFlags::NONE,
        move |_: &[String]| {
            hidden.lock().hide();
            CommandOutcome::done()
        },
    )?;

    let locked = controller.clone();
    console.add_command(
        "Scoreboard.Lock",
        "scoreboard_lock",
        "Keep the scoreboard open on select release <0|1>",
        CommandFlags::NONE,
        move |args: &[String]| {
            let raw = match required_arg(args, "lock state") {
                Ok(raw) => raw,
                Err(e) => return e.into(),
            };
            match VarValue::parse(VarType::Bool, raw).and_then(|v| v.as_bool()) {
                Some(lock) => {
                    locked.lock().set_locked(lock);
                    CommandOutcome::done()
                }
                None => RegistryError::MissingArgument("lock state").into(),
            }
        },
    )?;

    let dumped = controller;
    console.add_command(
        "Scoreboard.Dump",
        "scoreboard_dump",
        "Print the current scoreboard document",
        CommandFlags::NONE,
        move |_: &[String]| CommandOutcome::from_result(dumped.lock().snapshot().to_json()),
    )?;

    tracing::info!("Scoreboard commands registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostProviders;
    use crate::scoreboard::ScoreboardSettings;
    use crate::test_utils::{RecordingSurface, TestHost, TestPlayer};

    fn setup() -> (
        Arc<TestHost>,
        Arc<RecordingSurface>,
        Arc<Mutex<ScoreboardController>>,
        Console,
    ) {
        let host = Arc::new(TestHost::new());
        let surface = Arc::new(RecordingSurface::new());
        let controller = Arc::new(Mutex::new(ScoreboardController::new(
            ScoreboardSettings::default(),
            HostProviders::from_host(host.clone()),
            surface.clone(),
        )));
        let mut console = Console::new();
        register(&mut console, controller.clone()).unwrap();
        (host, surface, controller, console)
    }

    #[test]
    fn test_show_and_hide() {
        let (_host, surface, controller, mut console) = setup();

        assert!(console.execute_line("scoreboard_show", false).success);
        assert!(controller.lock().is_visible());
        assert_eq!(surface.show_count(), 1);

        assert!(console.execute_line("scoreboard_hide", false).success);
        assert!(!controller.lock().is_visible());
    }

    #[test]
    fn test_lock_argument() {
        let (_host, _surface, controller, mut console) = setup();

        let missing = console.execute_line("scoreboard_lock", false);
        assert!(!missing.success);
        assert_eq!(missing.message, "expected lock state");

        assert!(!console.execute_line("scoreboard_lock maybe", false).success);

        assert!(console.execute_line("scoreboard_lock 1", false).success);
        assert!(controller.lock().state().locked);
        assert!(console.execute_line("scoreboard_lock 0", false).success);
        assert!(!controller.lock().state().locked);
    }

    #[test]
    fn test_dump_returns_document() {
        let (host, _surface, _controller, mut console) = setup();
        host.add_player(3, TestPlayer::named("Zed"));

        let outcome = console.execute_line("scoreboard_dump", false);
        assert!(outcome.success);
        let json: serde_json::Value = serde_json::from_str(&outcome.message).unwrap();
        assert_eq!(json["players"][0]["name"], "Zed");
        assert_eq!(json["players"][0]["playerIndex"], 3);
    }
}
