//! Subcommand implementations. Each takes an already-built aggregator.

pub mod add;
pub mod keys;
pub mod ping;
pub mod top;
