/// Named console commands
///
/// Every invocation resolves to a [`CommandOutcome`]. Lookup failures,
/// access checks and handler faults are all reported through the outcome so
/// nothing propagates into the host.
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use super::flags::CommandFlags;
use crate::error::RegistryError;

/// Result of a command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub message: String,
}

impl CommandOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Successful outcome with no message
    pub fn done() -> Self {
        Self::ok(String::new())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Flatten a handler-level result
    pub fn from_result<T: Into<String>, E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(message) => Self::ok(message),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}

impl From<RegistryError> for CommandOutcome {
    fn from(err: RegistryError) -> Self {
        Self::fail(err.to_string())
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Uniform handler signature: arguments in, outcome out
pub type CommandHandler = Box<dyn Fn(&[String]) -> CommandOutcome + Send + Sync>;

/// Fetch a required positional argument
///
/// Handlers use this to produce the `expected <argument>` message when the
/// argument is missing.
pub fn required_arg<'a>(args: &'a [String], what: &'static str) -> Result<&'a str, RegistryError> {
    args.first()
        .map(String::as_str)
        .ok_or(RegistryError::MissingArgument(what))
}

/// A registered command
pub struct Command {
    pub name: String,
    pub alias: String,
    pub description: String,
    pub flags: CommandFlags,
    handler: CommandHandler,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Registry of commands keyed by alias
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    by_alias: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Aliases must be unique.
    pub fn add_command<F>(
        &mut self,
        name: &str,
        alias: &str,
        description: &str,
        flags: CommandFlags,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&[String]) -> CommandOutcome + Send + Sync + 'static,
    {
        if self.by_alias.contains_key(alias) {
            return Err(RegistryError::DuplicateAlias(alias.to_string()));
        }

        self.by_alias.insert(alias.to_string(), self.commands.len());
        self.commands.push(Command {
            name: name.to_string(),
            alias: alias.to_string(),
            description: description.to_string(),
            flags,
            handler: Box::new(handler),
        });

        tracing::debug!("Registered command {} ({})", alias, name);
        Ok(())
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.by_alias.contains_key(alias)
    }

    pub fn get(&self, alias: &str) -> Option<&Command> {
        self.by_alias.get(alias).map(|&idx| &self.commands[idx])
    }

    /// Invoke a command by alias
    ///
    /// Host-only commands are refused before the handler runs when the
    /// caller is not the host. Handler output is returned verbatim.
    pub fn invoke(&self, alias: &str, args: &[String], caller_is_host: bool) -> CommandOutcome {
        let Some(command) = self.get(alias) else {
            return RegistryError::UnknownCommand(alias.to_string()).into();
        };

        if !command.flags.permits(caller_is_host) {
            tracing::debug!("Refused host-only command {} from non-host caller", alias);
            return RegistryError::AccessDenied(alias.to_string()).into();
        }

        match panic::catch_unwind(AssertUnwindSafe(|| (command.handler)(args))) {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!("Command {} panicked", alias);
                CommandOutcome::fail(format!("{} failed", alias))
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_handler(counter: Arc<AtomicUsize>) -> impl Fn(&[String]) -> CommandOutcome {
        move |_args: &[String]| {
            counter.fetch_add(1, Ordering::SeqCst);
            CommandOutcome::ok("ran")
        }
    }

    #[test]
    fn test_distinct_aliases_independently_invocable() {
        let mut registry = CommandRegistry::new();
        registry
            .add_command("A", "cmd_a", "", CommandFlags::NONE, |_: &[String]| {
                CommandOutcome::ok("a")
            })
            .unwrap();
        registry
            .add_command("B", "cmd_b", "", CommandFlags::NONE, |_: &[String]| {
                CommandOutcome::ok("b")
            })
            .unwrap();

        assert_eq!(registry.invoke("cmd_a", &[], false).message, "a");
        assert_eq!(registry.invoke("cmd_b", &[], false).message, "b");
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let mut registry = CommandRegistry::new();
        registry
            .add_command("A", "cmd_a", "", CommandFlags::NONE, |_: &[String]| {
                CommandOutcome::done()
            })
            .unwrap();

        let err = registry
            .add_command("Other", "cmd_a", "", CommandFlags::NONE, |_: &[String]| {
                CommandOutcome::done()
            })
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateAlias("cmd_a".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_alias_fails() {
        let registry = CommandRegistry::new();
        let outcome = registry.invoke("nope", &[], true);
        assert!(!outcome.success);
        assert_eq!(outcome.message, "unknown command: nope");
    }

    #[test]
    fn test_host_only_never_calls_handler_for_guest() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut registry = CommandRegistry::new();
        registry
            .add_command(
                "Canvas",
                "host_cmd",
                "",
                CommandFlags::HOST_ONLY,
                counting_handler(Arc::clone(&counter)),
            )
            .unwrap();

        let outcome = registry.invoke("host_cmd", &[], false);
        assert!(!outcome.success);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        let outcome = registry.invoke("host_cmd", &[], true);
        assert!(outcome.success);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_result_returned_verbatim() {
        let mut registry = CommandRegistry::new();
        registry
            .add_command("Echo", "echo", "", CommandFlags::NONE, |args: &[String]| {
                match required_arg(args, "text") {
                    Ok(text) => CommandOutcome::ok(text),
                    Err(e) => e.into(),
                }
            })
            .unwrap();

        assert_eq!(
            registry.invoke("echo", &["hi".to_string()], false),
            CommandOutcome::ok("hi")
        );
        assert_eq!(
            registry.invoke("echo", &[], false),
            CommandOutcome::fail("expected text")
        );
    }

    #[test]
    fn test_panicking_handler_becomes_failure() {
        let mut registry = CommandRegistry::new();
        registry
            .add_command("Boom", "boom", "", CommandFlags::NONE, |_: &[String]| {
                panic!("handler fault")
            })
            .unwrap();

        let outcome = registry.invoke("boom", &[], true);
        assert!(!outcome.success);
        assert_eq!(outcome.message, "boom failed");
    }
}
