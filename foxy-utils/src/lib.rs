/// Generic embed builders shared across commands.
pub mod embed;
/// Shared formatting helpers (mentions, names, sanitising).
pub mod formatting;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Pure parser helpers.
pub mod parse;
/// Permission helper utilities.
pub mod permissions;
/// Shared time helpers (unix clock, Kyiv calendar).
pub mod time;
