use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;

use match_overlay::config::Config;
use match_overlay::console::Console;
use match_overlay::error::AppResult;
use match_overlay::forge::{self, ForgeEditor, PrefabLibrary};
use match_overlay::host::{
    HostProviders, InputProvider, ItemDefinition, ObjectIndex, ObjectProvider,
    PlayerDataProvider, PlayerStats, PresentationSurface, SelectTicks, Session, SessionProvider,
    TEAM_SCORE_SLOTS,
};
use match_overlay::logging::{self, LogSettings};
use match_overlay::scoreboard::{self, ScoreboardController, ScoreboardSettings};

/// Host stand-in when no game is attached: no session, no input
struct DetachedHost;

impl SessionProvider for DetachedHost {
    fn active_session(&self) -> Option<&dyn Session> {
        None
    }
}

impl PlayerDataProvider for DetachedHost {
    fn player_stats(&self, _index: i32) -> PlayerStats {
        PlayerStats::default()
    }

    fn is_alive(&self, _index: i32) -> bool {
        false
    }

    fn team_scores(&self) -> Option<[i16; TEAM_SCORE_SLOTS]> {
        None
    }

    fn game_type_index(&self) -> i32 {
        0
    }
}

impl ObjectProvider for DetachedHost {
    fn player_unit(&self, _player_index: i32) -> Option<ObjectIndex> {
        None
    }

    fn equipped_item_slot(&self, _unit: ObjectIndex) -> Option<i8> {
        None
    }

    fn unit_item(&self, _unit: ObjectIndex, _slot: i8) -> Option<ObjectIndex> {
        None
    }

    fn item_definition(&self, _item: ObjectIndex) -> Option<ItemDefinition> {
        None
    }
}

impl InputProvider for DetachedHost {
    fn select_ticks(&self) -> SelectTicks {
        SelectTicks::default()
    }

    fn modifier_held(&self) -> bool {
        false
    }

    fn active_screen(&self) -> Option<String> {
        None
    }
}

/// Editor stand-in; object edits are logged, prefab I/O fails
struct DetachedEditor;

impl ForgeEditor for DetachedEditor {
    fn delete_all(&self) {
        tracing::warn!("forge_delete_all: no forge session attached");
    }

    fn canvas_map(&self) {
        tracing::warn!("forge_canvas: no forge session attached");
    }

    fn select_all(&self) {
        tracing::warn!("forge_select_all: no forge session attached");
    }

    fn deselect_all(&self) {
        tracing::warn!("forge_deselect_all: no forge session attached");
    }

    fn save_prefab(&self, _name: &str, _path: &Path) -> bool {
        false
    }

    fn load_prefab(&self, _path: &Path) -> bool {
        false
    }
}

/// Prints surface traffic so overlay wiring can be checked by eye
struct StdoutSurface;

impl PresentationSurface for StdoutSurface {
    fn show(&self, channel: &str, payload: &str) {
        println!("[{}] show {}", channel, payload);
    }

    fn hide(&self, channel: &str) {
        println!("[{}] hide", channel);
    }

    fn send(&self, channel: &str, payload: &str) {
        println!("[{}] data {}", channel, payload);
    }
}

fn build_console(config: &Config) -> AppResult<Console> {
    let mut console = Console::new();

    forge::register(
        &mut console,
        Arc::new(DetachedEditor),
        Arc::new(PrefabLibrary::new(&config.prefab_dir)),
    )
    .context("Failed to register forge commands")?;

    let controller = ScoreboardController::new(
        ScoreboardSettings::from_config(config),
        HostProviders::from_host(Arc::new(DetachedHost)),
        Arc::new(StdoutSurface),
    );
    scoreboard::commands::register(&mut console, Arc::new(Mutex::new(controller)))
        .context("Failed to register scoreboard commands")?;

    Ok(console)
}

/// Load the config at `path`, falling back to defaults on failure
///
/// Also returns where archived changes are saved. That is `None` after a
/// failed load, so the unreadable file is left for the user to fix.
fn load_config(path: &Path) -> (Config, Option<PathBuf>) {
    match Config::load_or_create(path) {
        Ok(cfg) => {
            println!("✓ Configuration loaded");
            println!("  {}", path.display());
            (cfg, Some(path.to_path_buf()))
        }
        Err(e) => {
            eprintln!("✗ Failed to load config: {}", e);
            eprintln!("  Continuing with defaults, settings will not be saved\n");
            (Config::default(), None)
        }
    }
}

/// Write archived variable changes back to the config file
fn persist_archived(console: &mut Console, config: &mut Config, save_path: Option<&Path>) {
    let changed = console.variables.take_archived();
    if !config.absorb_archived(changed) {
        return;
    }

    match save_path {
        Some(path) => match config.save_to(path) {
            Ok(()) => tracing::debug!("Archived variables saved"),
            Err(e) => tracing::warn!("Failed to save archived variables: {}", e),
        },
        None => tracing::debug!("Archived variables kept for this session only"),
    }
}

fn main() -> AppResult<()> {
    println!("===========================================");
    println!("  Match Overlay - Console");
    println!("===========================================\n");

    let (mut config, save_path) = match Config::config_path() {
        Ok(path) => load_config(&path),
        Err(e) => {
            eprintln!("✗ Failed to locate config: {}", e);
            eprintln!("  Continuing with defaults, settings will not be saved\n");
            (Config::default(), None)
        }
    };

    let _guard = logging::init_tracing(&LogSettings::from_config(&config));
    tracing::info!(
        "Starting match-overlay console v{}",
        env!("CARGO_PKG_VERSION")
    );
    if save_path.is_none() {
        tracing::warn!("Config not loaded, archived variables will not be saved");
    }

    let mut console = build_console(&config)?;
    let restored = console.restore_archived(&config);
    println!(
        "✓ {} commands, {} variables ({} restored)",
        console.commands.len(),
        console.variables.len(),
        restored
    );
    println!("  Type 'help' for a list, 'quit' to exit\n");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        line.clear();
        if input
            .read_line(&mut line)
            .context("Failed to read console input")?
            == 0
        {
            break;
        }

        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if matches!(command, "quit" | "exit") {
            break;
        }

        let outcome = console.execute_line(command, true);
        if outcome.success {
            if !outcome.message.is_empty() {
                println!("{}", outcome.message);
            }
        } else {
            println!("✗ {}", outcome.message);
        }

        persist_archived(&mut console, &mut config, save_path.as_deref());
    }

    tracing::info!("Console closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_overlay::console::{CommandFlags, VarValue};
    use std::fs;
    use tempfile::TempDir;

    fn console_with_archived() -> Console {
        let mut console = Console::new();
        console
            .add_variable(
                "Forge.MonitorSpeed",
                "forge_monitor_speed",
                "",
                CommandFlags::ARCHIVED,
                VarValue::Float(1.0),
            )
            .unwrap();
        console
    }

    #[test]
    fn test_unreadable_config_is_never_overwritten() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        let broken = r#"{"prefab_dir": "my/prefabs", "#;
        fs::write(&path, broken).unwrap();

        let (mut config, save_path) = load_config(&path);
        assert!(save_path.is_none());
        assert_eq!(config.prefab_dir, Config::default().prefab_dir);

        let mut console = console_with_archived();
        assert!(console.execute_line("forge_monitor_speed 3", true).success);
        persist_archived(&mut console, &mut config, save_path.as_deref());

        assert_eq!(fs::read_to_string(&path).unwrap(), broken);
        assert_eq!(
            config.archived_variables.get("forge_monitor_speed"),
            Some(&"3".to_string())
        );
    }

    #[test]
    fn test_loaded_config_saves_archived_changes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");

        let (mut config, save_path) = load_config(&path);
        assert_eq!(save_path.as_deref(), Some(path.as_path()));

        let mut console = console_with_archived();
        assert!(console.execute_line("forge_monitor_speed 3", true).success);
        persist_archived(&mut console, &mut config, save_path.as_deref());

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(
            saved.archived_variables.get("forge_monitor_speed"),
            Some(&"3".to_string())
        );
    }
}
