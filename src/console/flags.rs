/// Registration-time flags for console entries.

bitflags::bitflags! {
    /// Access and persistence flags shared by commands and variables
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CommandFlags: u8 {
        /// Value is written to the persisted configuration when set
        const ARCHIVED = 0b0000_0001;
        /// Only the session host may invoke the command or set the variable
        const HOST_ONLY = 0b0000_0010;
        /// Omitted from `help` listings, still invocable by alias
        const HIDDEN = 0b0000_0100;
    }
}

impl CommandFlags {
    /// No restrictions, not persisted
    pub const NONE: CommandFlags = CommandFlags::empty();

    /// Check whether the caller is allowed past the host-only gate
    pub fn permits(&self, caller_is_host: bool) -> bool {
        caller_is_host || !self.contains(CommandFlags::HOST_ONLY)
    }
}
