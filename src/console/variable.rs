/// Typed console variables
///
/// Variables are registered once at startup and only change through
/// [`VariableStore::set`], which parses the raw string against the declared
/// type and leaves the previous value untouched on failure.
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::flags::CommandFlags;
use crate::error::RegistryError;

/// Declared type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Float,
    Int,
    Bool,
    String,
}

impl VarType {
    /// Get a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            VarType::Float => "float",
            VarType::Int => "int",
            VarType::Bool => "bool",
            VarType::String => "string",
        }
    }
}

/// Runtime value of a variable
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    String(String),
}

impl VarValue {
    /// Get the declared type for this value
    pub fn var_type(&self) -> VarType {
        match self {
            VarValue::Float(_) => VarType::Float,
            VarValue::Int(_) => VarType::Int,
            VarValue::Bool(_) => VarType::Bool,
            VarValue::String(_) => VarType::String,
        }
    }

    /// Parse a raw console string into a value of the given type
    pub fn parse(var_type: VarType, raw: &str) -> Option<VarValue> {
        let trimmed = raw.trim();
        match var_type {
            VarType::Float => trimmed
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(VarValue::Float),
            VarType::Int => trimmed.parse::<i32>().ok().map(VarValue::Int),
            VarType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => Some(VarValue::Bool(true)),
                "0" | "false" | "off" | "no" => Some(VarValue::Bool(false)),
                _ => None,
            },
            VarType::String => Some(VarValue::String(raw.to_string())),
        }
    }

    /// Numeric view used for range checks
    fn as_f64(&self) -> Option<f64> {
        match self {
            VarValue::Float(v) => Some(*v as f64),
            VarValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            VarValue::Float(v) => Some(*v),
            VarValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            VarValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            VarValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            VarValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::Float(v) => write!(f, "{}", v),
            VarValue::Int(v) => write!(f, "{}", v),
            VarValue::Bool(v) => write!(f, "{}", if *v { 1 } else { 0 }),
            VarValue::String(v) => write!(f, "{}", v),
        }
    }
}

/// Stable handle returned by [`VariableStore::add_variable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableHandle(usize);

/// A registered variable
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub alias: String,
    pub description: String,
    pub flags: CommandFlags,
    value: VarValue,
    default: VarValue,
    range: Option<(f64, f64)>,
}

impl Variable {
    pub fn value(&self) -> &VarValue {
        &self.value
    }

    pub fn default_value(&self) -> &VarValue {
        &self.default
    }

    pub fn var_type(&self) -> VarType {
        self.default.var_type()
    }
}

/// Registry of typed variables keyed by alias
#[derive(Debug, Default)]
pub struct VariableStore {
    variables: Vec<Variable>,
    by_alias: HashMap<String, VariableHandle>,
    /// Archived values waiting to be written to the persisted configuration
    pending_archive: BTreeMap<String, String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variable whose type is taken from its default value
    pub fn add_variable(
        &mut self,
        name: &str,
        alias: &str,
        description: &str,
        flags: CommandFlags,
        default: VarValue,
    ) -> Result<VariableHandle, RegistryError> {
        if self.by_alias.contains_key(alias) {
            return Err(RegistryError::DuplicateAlias(alias.to_string()));
        }
        if self.variables.iter().any(|v| v.name == name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }

        let handle = VariableHandle(self.variables.len());
        self.variables.push(Variable {
            name: name.to_string(),
            alias: alias.to_string(),
            description: description.to_string(),
            flags,
            value: default.clone(),
            default,
            range: None,
        });
        self.by_alias.insert(alias.to_string(), handle);

        tracing::debug!("Registered variable {} ({})", alias, name);
        Ok(handle)
    }

    /// Restrict a numeric variable to an inclusive range
    pub fn limit(&mut self, handle: VariableHandle, min: f64, max: f64) {
        if let Some(var) = self.variables.get_mut(handle.0) {
            var.range = Some((min, max));
        }
    }

    /// Look up a handle by alias
    pub fn find(&self, alias: &str) -> Option<VariableHandle> {
        self.by_alias.get(alias).copied()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.by_alias.contains_key(alias)
    }

    pub fn variable(&self, handle: VariableHandle) -> &Variable {
        &self.variables[handle.0]
    }

    /// Current value of a variable
    pub fn get(&self, handle: VariableHandle) -> &VarValue {
        &self.variables[handle.0].value
    }

    /// Parse and store a raw value
    ///
    /// On failure the previous value is kept. On success an archived variable
    /// is queued for the next [`VariableStore::take_archived`].
    pub fn set(&mut self, handle: VariableHandle, raw: &str) -> Result<(), RegistryError> {
        let var = &mut self.variables[handle.0];
        let var_type = var.var_type();

        let mismatch = || RegistryError::TypeMismatch {
            alias: var.alias.clone(),
            expected: var_type.type_name(),
            raw: raw.to_string(),
        };

        let parsed = VarValue::parse(var_type, raw).ok_or_else(mismatch)?;
        if let (Some((min, max)), Some(n)) = (var.range, parsed.as_f64()) {
            if n < min || n > max {
                return Err(mismatch());
            }
        }

        tracing::debug!("{} = {}", var.alias, parsed);
        var.value = parsed;

        if var.flags.contains(CommandFlags::ARCHIVED) {
            self.pending_archive
                .insert(var.alias.clone(), var.value.to_string());
        }
        Ok(())
    }

    /// Restore a variable to its registered default
    pub fn reset(&mut self, handle: VariableHandle) {
        let var = &mut self.variables[handle.0];
        var.value = var.default.clone();
    }

    /// Drain archived values changed since the last call
    pub fn take_archived(&mut self) -> BTreeMap<String, String> {
        std::mem::take(&mut self.pending_archive)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
