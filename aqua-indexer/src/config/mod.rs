//! Configuration for the aqua indexer binary.
//!
//! Values come from command-line flags, falling back to environment
//! variables (a `.env` file is loaded first) and then to defaults.

mod cli;
mod credential;
mod dependencies;
mod settings;

pub use cli::Cli;
pub use credential::{resolve_api_key, DEFAULT_API_KEY_FILE};
pub use dependencies::Dependencies;
pub use settings::Settings;
