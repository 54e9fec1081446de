//! CLI subcommand implementations.

pub mod list;
pub mod new;
pub mod open;
pub mod pin;
pub mod repair;
pub mod tags;
