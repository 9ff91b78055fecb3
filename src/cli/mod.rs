//! CLI command definitions and parsing
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "subjectivity",
    version,
    author = "neur0map",
    about = "Classify sentences as subjective (Öznel) or objective (Nesnel)",
    long_about = "Embeds a labeled corpus, retrieves the most similar examples for each sentence \
                  and asks a language model to classify it by analogy with those examples."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/subjectivity/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `chat` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by commands that build the classifier
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Labeled corpus CSV (sentence,label)
    #[arg(long, value_name = "PATH")]
    pub corpus: Option<PathBuf>,

    /// Number of examples retrieved per sentence
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Configuration profile to apply
    #[arg(short, long)]
    pub profile: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive loop: type sentences, get labels
    Chat {
        #[command(flatten)]
        run: RunArgs,

        /// Print the retrieved examples after each answer
        #[arg(long)]
        show_sources: bool,
    },

    /// Classify a single sentence and exit
    Classify {
        /// Sentence to classify
        sentence: String,

        #[command(flatten)]
        run: RunArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration file
    Validate {
        /// Configuration file to validate (defaults to current config)
        file: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
