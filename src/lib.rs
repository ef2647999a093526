//! Match overlay extension
//!
//! Console variables and commands for the host, plus a live scoreboard
//! published to the overlay's presentation surface.
//!
//! ## Modules
//!
//! - [`console`]: typed variables, named commands, line execution
//! - [`forge`]: forge editing commands and prefab files
//! - [`scoreboard`]: match snapshots, postgame sequencing, notifications
//! - [`messaging`]: host event fan-out
//! - [`host`]: traits the host implements

pub mod config;
pub mod console;
pub mod error;
pub mod forge;
pub mod host;
pub mod logging;
pub mod messaging;
pub mod scoreboard;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use console::{CommandFlags, CommandOutcome, Console};
pub use error::{AppResult, ConfigError, PrefabError, RegistryError};
