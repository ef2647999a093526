/// Unified console: commands and variables share one alias namespace
use super::command::{CommandOutcome, CommandRegistry};
use super::flags::CommandFlags;
use super::variable::{VarValue, VariableHandle, VariableStore};
use crate::config::Config;
use crate::error::RegistryError;

/// Console combining the command registry and the variable store
#[derive(Debug, Default)]
pub struct Console {
    pub commands: CommandRegistry,
    pub variables: VariableStore,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, rejecting aliases already used by a variable
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
        if self.variables.contains(alias) {
            return Err(RegistryError::DuplicateAlias(alias.to_string()));
        }
        self.commands
            .add_command(name, alias, description, flags, handler)
    }

    /// Register a variable, rejecting aliases already used by a command
    pub fn add_variable(
        &mut self,
        name: &str,
        alias: &str,
        description: &str,
        flags: CommandFlags,
        default: VarValue,
    ) -> Result<VariableHandle, RegistryError> {
        if self.commands.contains(alias) {
            return Err(RegistryError::DuplicateAlias(alias.to_string()));
        }
        self.variables
            .add_variable(name, alias, description, flags, default)
    }

    /// Invoke a command by alias
    pub fn invoke(&self, alias: &str, args: &[String], caller_is_host: bool) -> CommandOutcome {
        self.commands.invoke(alias, args, caller_is_host)
    }

    /// Set a variable by alias through the validated setter
    pub fn set_variable(
        &mut self,
        alias: &str,
        raw: &str,
        caller_is_host: bool,
    ) -> Result<(), RegistryError> {
        let handle = self
            .variables
            .find(alias)
            .ok_or_else(|| RegistryError::UnknownCommand(alias.to_string()))?;

        if !self.variables.variable(handle).flags.permits(caller_is_host) {
            return Err(RegistryError::AccessDenied(alias.to_string()));
        }
        self.variables.set(handle, raw)
    }

    /// Execute one console line
    ///
    /// The first token selects a command or variable. A bare variable alias
    /// reports its value; a variable alias followed by a value sets it.
    pub fn execute_line(&mut self, line: &str, caller_is_host: bool) -> CommandOutcome {
        let Some(mut tokens) = shlex::split(line) else {
            return CommandOutcome::fail("invalid quoting");
        };
        if tokens.is_empty() {
            return CommandOutcome::fail("empty command");
        }
        let alias = tokens.remove(0);

        if alias == "help" {
            return CommandOutcome::ok(self.help());
        }

        if self.commands.contains(&alias) {
            return self.invoke(&alias, &tokens, caller_is_host);
        }

        match (self.variables.find(&alias), tokens.first()) {
            (Some(handle), None) => {
                CommandOutcome::ok(format!("{} = {}", alias, self.variables.get(handle)))
            }
            (Some(_), Some(raw)) => match self.set_variable(&alias, raw, caller_is_host) {
                Ok(()) => CommandOutcome::ok(format!("{} = {}", alias, raw)),
                Err(e) => e.into(),
            },
            (None, _) => RegistryError::UnknownCommand(alias).into(),
        }
    }

    /// List visible commands and variables
    pub fn help(&self) -> String {
        let mut lines = Vec::new();

        for command in self.commands.iter() {
            if command.flags.contains(CommandFlags::HIDDEN) {
                continue;
            }
            lines.push(format!("{} - {}", command.alias, command.description));
        }

        for var in self.variables.iter() {
            if var.flags.contains(CommandFlags::HIDDEN) {
                continue;
            }
            lines.push(format!(
                "{} <{}> - {} (current: {})",
                var.alias,
                var.var_type().type_name(),
                var.description,
                var.value()
            ));
        }

        lines.join("\n")
    }

    /// Apply values persisted in the configuration
    ///
    /// Values that no longer parse are skipped with a warning so a stale
    /// config never blocks startup.
    pub fn restore_archived(&mut self, config: &Config) -> usize {
        let mut restored = 0;

        for (alias, raw) in &config.archived_variables {
            let Some(handle) = self.variables.find(alias) else {
                tracing::warn!("Ignoring archived value for unknown variable {}", alias);
                continue;
            };
            if !self
                .variables
                .variable(handle)
                .flags
                .contains(CommandFlags::ARCHIVED)
            {
                continue;
            }
            match self.variables.set(handle, raw) {
                Ok(()) => restored += 1,
                Err(e) => tracing::warn!("Skipping archived value: {}", e),
            }
        }

        // Restoring is not a change worth persisting again
        self.variables.take_archived();
        tracing::info!("Restored {} archived variables", restored);
        restored
    }
}
