use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use subjectivity::chain::Classifier;
use subjectivity::cli::{Cli, Commands, ConfigAction, RunArgs};
use subjectivity::config::{Config, ConfigValidator};
use subjectivity::context::Context;
use subjectivity::error::{AppError, Result};
use subjectivity::session::{write_sources, Session};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // .env is optional; real environment variables take precedence
    let dotenv = dotenvy::dotenv();

    init_logging(cli.verbose);

    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!("Failed to read .env file: {}", e);
        }
    }

    let result = match cli.command {
        None => cmd_chat(cli.config, RunArgs::default(), false),
        Some(Commands::Chat { run, show_sources }) => cmd_chat(cli.config, run, show_sources),
        Some(Commands::Classify {
            sentence,
            run,
            json,
        }) => cmd_classify(cli.config, run, &sentence, json),
        Some(Commands::Config { action }) => {
            cmd_config(cli.config, action).map(|_| ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("HATA: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("subjectivity=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("subjectivity=warn"))
    };

    // stdout carries the conversation; logs go to stderr
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn cmd_chat(config_path: Option<PathBuf>, run: RunArgs, show_sources: bool) -> Result<ExitCode> {
    println!("Chatbot başlatılıyor...");

    let config = load_config(config_path, &run)?;
    let ctx = Context::bootstrap(config)?;

    println!("{} adet doküman başarıyla yüklendi.", ctx.corpus_size());

    let session = Session::new(ctx.chain()).with_sources(show_sources);
    let stdin = io::stdin();
    let stdout = io::stdout();
    session
        .run(stdin.lock(), stdout.lock())
        .map_err(|e| AppError::Io {
            source: e,
            context: "Console read/write failed".to_string(),
        })?;

    Ok(ExitCode::SUCCESS)
}

fn cmd_classify(
    config_path: Option<PathBuf>,
    run: RunArgs,
    sentence: &str,
    json: bool,
) -> Result<ExitCode> {
    if sentence.trim().is_empty() {
        return Err(AppError::Config("Lütfen bir cümle girin.".to_string()));
    }

    let config = load_config(config_path, &run)?;
    let ctx = Context::bootstrap(config)?;

    let classification = match ctx.chain().classify(sentence) {
        Ok(classification) => classification,
        Err(e) => {
            eprintln!("HATA: Cevap alınırken bir sorun oluştu: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if json {
        let out = serde_json::to_string_pretty(&classification).map_err(|e| AppError::Json {
            source: e,
            context: "Failed to serialize classification".to_string(),
        })?;
        println!("{}", out);
    } else {
        println!("{}", classification.answer.display_text());
        let mut stdout = io::stdout().lock();
        write_sources(&mut stdout, &classification).map_err(|e| AppError::Io {
            source: e,
            context: "Failed to write sources".to_string(),
        })?;
    }

    // Unrecognized answers are not failures, but scripts need to tell them apart
    if classification.answer.is_recognized() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!("Model answer outside label vocabulary");
        Ok(ExitCode::from(2))
    }
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, &RunArgs::default())?;
            let json = serde_json::to_string_pretty(&config).map_err(|e| AppError::Json {
                source: e,
                context: "Failed to serialize config".to_string(),
            })?;
            println!("{}", json);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| AppError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }

            Config::default().save(&path)?;
            println!("✓ Configuration initialized at: {}", path.display());
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
    }

    Ok(())
}

/// Config file (or defaults), then profile, then command-line overrides
fn load_config(config_path: Option<PathBuf>, run: &RunArgs) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    let mut config = if path.exists() {
        match &run.profile {
            Some(profile) => Config::load_with_profile(&path, profile)?,
            None => Config::load(&path)?,
        }
    } else if let Some(profile) = &run.profile {
        return Err(AppError::Config(format!(
            "Profile '{}' requested but no config file exists at {}",
            profile,
            path.display()
        )));
    } else {
        tracing::warn!(
            "Config file not found at {}, using defaults. Run 'subjectivity config init' to create one.",
            path.display()
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    };

    if let Some(corpus) = &run.corpus {
        config.corpus.path = corpus.clone();
    }
    if let Some(top_k) = run.top_k {
        config.retrieval.top_k = top_k;
    }

    ConfigValidator::validate(&config)?;
    Ok(config)
}
