//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod inspect;
mod utils;
mod validate;

pub use completions::handle_completions;
pub use inspect::handle_inspect;
pub use validate::handle_validate;
