//! Configuration commands

use anyhow::{Result, bail};
use stylo_core::Config;

use crate::logging::log_file_path;

/// Show the effective configuration and where it came from
pub fn cmd_config_show(config: &Config) -> Result<()> {
  match Config::config_path() {
    Some(path) => println!("Using config: {}", path.display()),
    None => println!("Using default configuration (no config file found)"),
  }
  println!("Models:       {}", config.storage.models_dir().display());
  println!("Log file:     {}", log_file_path().display());
  println!();

  println!("{}", toml::to_string_pretty(config)?);
  Ok(())
}

/// Write the commented default config to the user config path
pub fn cmd_config_init(force: bool) -> Result<()> {
  let path = Config::user_config_path();
  if path.exists() && !force {
    bail!("Config file already exists: {} (use --force to overwrite)", path.display());
  }

  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(&path, Config::generate_template())?;

  println!("Created config: {}", path.display());
  println!("Edit the file to customize settings.");
  Ok(())
}
