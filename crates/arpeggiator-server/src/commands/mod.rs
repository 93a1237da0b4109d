//! Command implementations for the CLI.

pub mod generate;
pub mod inspect;
