/// Console registry for operator commands and settings
///
/// ## Architecture
///
/// ```text
/// "forge_prefab_save base"
///        │ shlex
///        ▼
/// ┌─────────────┐  alias   ┌─────────────────┐
/// │   Console   │ ───────> │ CommandRegistry │ ──> handler(args) ──> CommandOutcome
/// │             │          └─────────────────┘
/// │             │  alias   ┌─────────────────┐
/// │             │ ───────> │  VariableStore  │ ──> typed set / get
/// └─────────────┘          └─────────────────┘
/// ```
///
/// Aliases are unique across both namespaces. Nothing in here throws past
/// [`Console::execute_line`] or [`CommandRegistry::invoke`]; every failure is
/// a `CommandOutcome { success: false, .. }`.

pub mod command;
pub mod flags;
pub mod registry;
pub mod variable;

pub use command::{required_arg, Command, CommandHandler, CommandOutcome, CommandRegistry};
pub use flags::CommandFlags;
pub use registry::Console;
pub use variable::{VarType, VarValue, Variable, VariableHandle, VariableStore};
