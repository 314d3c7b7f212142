//! Stylo CLI - attribute short texts to their authors

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stylo_core::Config;

mod commands;
mod console;
mod logging;

use commands::{cmd_config_init, cmd_config_show, cmd_inspect, cmd_learn, cmd_models, cmd_predict, cmd_train};
use logging::init_logging;

#[derive(Parser)]
#[command(name = "stylo")]
#[command(about = "Attribute short texts to their authors with n-gram profiles")]
#[command(after_help = "\
QUICK START:
  stylo train data/alice.txt data/bob.txt --name demo   # One author per file
  stylo predict --model demo                            # Attribute texts interactively
  stylo learn                                           # Build a model by hand

COMMON WORKFLOWS:
  stylo predict --model demo \"some text\"   # One-shot attribution
  stylo inspect --model demo               # What each author looks like
  stylo models                             # List saved models")]
struct Cli {
  /// Log to stderr instead of the log file
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

/// Subcommands for `stylo config`
#[derive(Subcommand)]
pub enum ConfigCommand {
  /// Show current effective configuration
  Show,
  /// Write a commented default config file (~/.config/stylo/config.toml)
  Init {
    /// Overwrite an existing config file
    #[arg(long)]
    force: bool,
  },
}

#[derive(Subcommand)]
enum Commands {
  /// Train a model from text files, one author per file (file name = author)
  #[command(after_help = "\
Each non-blank line of a file is one text by the author the file is named after.
Lines are always filed under their file's author, even when no cluster is close enough.")]
  Train {
    /// Training files
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Distance threshold (default: clustering.threshold from config)
    #[arg(short, long)]
    threshold: Option<f64>,
    /// Name to save the model under (asked interactively if omitted)
    #[arg(short, long)]
    name: Option<String>,
    /// Print the training report as JSON
    #[arg(long)]
    json: bool,
  },
  /// Attribute texts with a saved model
  Predict {
    /// Model name
    #[arg(short, long)]
    model: String,
    /// Override the model's distance threshold
    #[arg(short, long)]
    threshold: Option<f64>,
    /// Texts to attribute (reads interactively if none are given)
    texts: Vec<String>,
    /// Output as JSON (only with texts given on the command line)
    #[arg(long)]
    json: bool,
  },
  /// Cluster texts typed at the terminal, naming new authors as they appear
  Learn {
    /// Distance threshold for a new model (default: clustering.threshold from config)
    #[arg(short, long)]
    threshold: Option<f64>,
    /// Name to save the model under (asked on exit if omitted)
    #[arg(short, long)]
    model: Option<String>,
    /// Continue the saved model named by --model instead of starting empty
    #[arg(long)]
    resume: bool,
  },
  /// Show a saved model's authors and their most frequent n-grams
  Inspect {
    /// Model name
    #[arg(short, long)]
    model: String,
    /// Number of n-grams to show per author
    #[arg(long, default_value = "5")]
    top: usize,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// List saved models
  Models,
  /// Manage configuration
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  let config = Config::load();

  let _guard = init_logging(&config.logging, cli.verbose);

  match cli.command {
    Commands::Train {
      files,
      threshold,
      name,
      json,
    } => cmd_train(&config, &files, threshold, name.as_deref(), json),
    Commands::Predict {
      model,
      threshold,
      texts,
      json,
    } => cmd_predict(&config, &model, threshold, &texts, json),
    Commands::Learn {
      threshold,
      model,
      resume,
    } => cmd_learn(&config, threshold, model.as_deref(), resume),
    Commands::Inspect { model, top, json } => cmd_inspect(&config, &model, top, json),
    Commands::Models => cmd_models(&config),
    Commands::Config { command } => match command {
      ConfigCommand::Show => cmd_config_show(&config),
      ConfigCommand::Init { force } => cmd_config_init(force),
    },
  }
}
