//! CLI command implementations

mod config;
mod inspect;
mod learn;
mod predict;
mod train;

pub use config::{cmd_config_init, cmd_config_show};
pub use inspect::{cmd_inspect, cmd_models};
pub use learn::cmd_learn;
pub use predict::cmd_predict;
pub use train::cmd_train;

use std::io::{BufReader, Stdin, Stdout};
use stylo_core::{Config, ModelStore};

use crate::console::Console;

/// Prompt shown while reading texts interactively
const TEXT_QUESTION: &str = "Enter a text (or 'exit' to finish): ";

/// Prompt shown when a model needs a name before saving
const SAVE_QUESTION: &str = "Enter a name to save the model under: ";

/// Model store rooted where the config says
fn model_store(config: &Config) -> ModelStore {
  ModelStore::new(config.storage.models_dir())
}

fn stdio_console() -> Console<BufReader<Stdin>, Stdout> {
  Console::new(BufReader::new(std::io::stdin()), std::io::stdout())
}
