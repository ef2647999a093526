use thiserror::Error;

/// Structured errors for the overlay layer.
///
/// Registry errors never escape [`crate::console::CommandRegistry::invoke`];
/// they are flattened into a failed outcome carrying the rendered message.

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("alias already registered: {0}")]
    DuplicateAlias(String),

    #[error("name already registered: {0}")]
    DuplicateName(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("access denied: {0} can only be used by the host")]
    AccessDenied(String),

    #[error("invalid value for {alias}: expected {expected}, got \"{raw}\"")]
    TypeMismatch {
        alias: String,
        expected: &'static str,
        raw: String,
    },

    #[error("expected {0}")]
    MissingArgument(&'static str),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Could not determine user config directory")]
    DirectoryUnavailable,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum PrefabError {
    #[error("invalid prefab name: {0}")]
    InvalidName(String),

    #[error("prefab with that name already exists")]
    AlreadyExists,

    #[error("prefab with that name does not exist")]
    NotFound,

    #[error("failed to save prefab")]
    SaveFailed,

    #[error("failed to load prefab")]
    LoadFailed,

    #[error("prefab directory error: {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = RegistryError::MissingArgument("prefab name");
        assert_eq!(err.to_string(), "expected prefab name");

        let err = RegistryError::UnknownCommand("foo".to_string());
        assert_eq!(err.to_string(), "unknown command: foo");

        assert_eq!(
            PrefabError::AlreadyExists.to_string(),
            "prefab with that name already exists"
        );
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let config_err = ConfigError::LoadFailed {
            path: "/test/config.json".to_string(),
            source: Box::new(io_err),
        };

        assert!(config_err.source().is_some());
        assert_eq!(
            config_err.to_string(),
            "Failed to load configuration from /test/config.json"
        );
    }
}
