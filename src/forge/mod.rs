/// Forge editing commands and settings
///
/// Registers the `forge_*` variables and commands. Object manipulation is
/// delegated to a [`ForgeEditor`]; prefab files go through
/// [`PrefabLibrary`].
use std::path::Path;
use std::sync::Arc;

use crate::console::{
    required_arg, CommandFlags, CommandOutcome, Console, VarValue, VariableHandle,
};
use crate::error::RegistryError;

pub mod prefab;

pub use prefab::{PrefabLibrary, PREFAB_EXT};

/// Editor operations provided by the host's forge mode
pub trait ForgeEditor: Send + Sync {
    /// Delete every object matching the one under the crosshair
    fn delete_all(&self);

    /// Delete every object on the map
    fn canvas_map(&self);

    /// Select every object matching the one under the crosshair
    fn select_all(&self);

    fn deselect_all(&self);

    /// Write the current selection to `path`
    fn save_prefab(&self, name: &str, path: &Path) -> bool;

    /// Spawn the prefab stored at `path`
    fn load_prefab(&self, path: &Path) -> bool;
}

/// Handles of the forge variables
#[derive(Debug, Clone, Copy)]
pub struct ForgeVariables {
    pub clone_depth: VariableHandle,
    pub clone_multiplier: VariableHandle,
    pub rotation_snap: VariableHandle,
    pub rotation_sensitivity: VariableHandle,
    pub monitor_speed: VariableHandle,
}

/// Register forge variables and commands
pub fn register(
    console: &mut Console,
    editor: Arc<dyn ForgeEditor>,
    prefabs: Arc<PrefabLibrary>,
) -> Result<ForgeVariables, RegistryError> {
    let variables = ForgeVariables {
        clone_depth: console.add_variable(
            "Forge.CloneDepth",
            "forge_clone_depth",
            "Depth at which the object will be cloned",
            CommandFlags::NONE,
            VarValue::Float(1.0),
        )?,
        clone_multiplier: console.add_variable(
            "Forge.CloneMultiplier",
            "forge_clone_multiplier",
            "Number of consecutive times the object will be cloned",
            CommandFlags::NONE,
            VarValue::Int(1),
        )?,
        rotation_snap: console.add_variable(
            "Forge.RotationSnap",
            "forge_rotation_snap",
            "Angle in degrees at which object rotation will be snapped",
            CommandFlags::NONE,
            VarValue::Float(0.0),
        )?,
        rotation_sensitivity: console.add_variable(
            "Forge.RotationSensitivity",
            "forge_rotation_sensitivity",
            "Controls the sensitivity of object rotation",
            CommandFlags::ARCHIVED,
            VarValue::Float(1.0),
        )?,
        monitor_speed: console.add_variable(
            "Forge.MonitorSpeed",
            "forge_monitor_speed",
            "Controls the movement speed of the monitor",
            CommandFlags::ARCHIVED,
            VarValue::Float(1.0),
        )?,
    };

    let ed = editor.clone();
    console.add_command(
        "Forge.DeleteAll",
        "forge_delete_all",
        "Delete all objects that are the same as the object under the crosshair",
        CommandFlags::HOST_ONLY,
        move |_: &[String]| {
            ed.delete_all();
            CommandOutcome::done()
        },
    )?;

    let ed = editor.clone();
    console.add_command(
        "Forge.Canvas",
        "forge_canvas",
        "Delete all objects on the map",
        CommandFlags::HOST_ONLY,
        move |_: &[String]| {
            ed.canvas_map();
            CommandOutcome::done()
        },
    )?;

    let ed = editor.clone();
    console.add_command(
        "Forge.SelectAll",
        "forge_select_all",
        "Select all objects that are the same as the object under the crosshair",
        CommandFlags::NONE,
        move |_: &[String]| {
            ed.select_all();
            CommandOutcome::done()
        },
    )?;

    let ed = editor.clone();
    console.add_command(
        "Forge.DeselectAll",
        "forge_deselect_all",
        "Deselect all selected objects",
        CommandFlags::NONE,
        move |_: &[String]| {
            ed.deselect_all();
            CommandOutcome::done()
        },
    )?;

    let (ed, lib) = (editor.clone(), prefabs.clone());
    console.add_command(
        "Forge.SavePrefab",
        "forge_prefab_save",
        "Save prefab to a file",
        CommandFlags::NONE,
        move |args: &[String]| {
            let name = match required_arg(args, "prefab name") {
                Ok(name) => name,
                Err(e) => return e.into(),
            };
            CommandOutcome::from_result(lib.save(name, ed.as_ref()).map(|_| "prefab saved"))
        },
    )?;

    let (ed, lib) = (editor, prefabs.clone());
    console.add_command(
        "Forge.LoadPrefab",
        "forge_prefab_load",
        "Load prefab from a file",
        CommandFlags::NONE,
        move |args: &[String]| {
            let name = match required_arg(args, "prefab name") {
                Ok(name) => name,
                Err(e) => return e.into(),
            };
            CommandOutcome::from_result(lib.load(name, ed.as_ref()).map(|_| "prefab loaded"))
        },
    )?;

    let lib = prefabs;
    console.add_command(
        "Forge.DumpPrefabs",
        "forge_prefab_dump",
        "Dump a list of saved prefabs in json",
        CommandFlags::NONE,
        move |_: &[String]| CommandOutcome::from_result(lib.dump_json()),
    )?;

    tracing::info!("Forge commands registered");
    Ok(variables)
}
