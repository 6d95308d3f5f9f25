//! Command table
//!
//! A flat, dense array of handlers indexed directly by command id. Every id
//! in `0..len()` maps to a real handler; there are no gaps and no lookups
//! beyond a bounds check.

use serialcmd_hal::ByteChannel;

use crate::handler::Handler;

/// Number of distinct single-byte command ids
pub const MAX_COMMANDS: usize = 256;

/// Errors that can occur while building a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// More handlers than single-byte ids
    TooManyCommands { count: usize },
}

impl core::fmt::Display for TableError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TableError::TooManyCommands { count } => {
                write!(f, "{} commands exceed the {} available ids", count, MAX_COMMANDS)
            }
        }
    }
}

/// A command id with no handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownCommand {
    pub id: u8,
}

impl core::fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown command id {:#04x}", self.id)
    }
}

/// Description of a table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandInfo {
    pub id: u8,
    pub name: &'static str,
    pub args_size: usize,
    pub response_size: usize,
}

/// Immutable id → handler mapping
pub struct CommandTable<'t, C: ByteChannel, D> {
    entries: &'t [&'t dyn Handler<C, D>],
}

impl<C: ByteChannel, D> Clone for CommandTable<'_, C, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ByteChannel, D> Copy for CommandTable<'_, C, D> {}

impl<'t, C: ByteChannel, D> CommandTable<'t, C, D> {
    /// Build a table; the handler at index `i` serves command id `i`
    pub fn new(entries: &'t [&'t dyn Handler<C, D>]) -> Result<Self, TableError> {
        if entries.len() > MAX_COMMANDS {
            return Err(TableError::TooManyCommands {
                count: entries.len(),
            });
        }
        Ok(Self { entries })
    }

    /// Look up the handler for a command id
    pub fn dispatch(&self, id: u8) -> Result<&'t dyn Handler<C, D>, UnknownCommand> {
        self.entries
            .get(usize::from(id))
            .copied()
            .ok_or(UnknownCommand { id })
    }

    /// Number of commands
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no commands
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Describe the command with the given id
    pub fn describe(&self, id: u8) -> Result<CommandInfo, UnknownCommand> {
        self.dispatch(id).map(|handler| Self::info(id, handler))
    }

    /// Describe every command in id order
    pub fn iter(&self) -> Commands<'t, C, D> {
        Commands {
            entries: self.entries,
            next: 0,
        }
    }

    fn info(id: u8, handler: &dyn Handler<C, D>) -> CommandInfo {
        CommandInfo {
            id,
            name: handler.name(),
            args_size: handler.args_size(),
            response_size: handler.response_size(),
        }
    }
}

/// Iterator over a table's entries, see [`CommandTable::iter`]
pub struct Commands<'t, C: ByteChannel, D> {
    entries: &'t [&'t dyn Handler<C, D>],
    next: usize,
}

impl<C: ByteChannel, D> Iterator for Commands<'_, C, D> {
    type Item = CommandInfo;

    fn next(&mut self) -> Option<CommandInfo> {
        let handler = *self.entries.get(self.next)?;
        // Construction guarantees every index fits in a u8
        let info = CommandTable::info(self.next as u8, handler);
        self.next += 1;
        Some(info)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl<C: ByteChannel, D> core::fmt::Debug for CommandTable<'_, C, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
