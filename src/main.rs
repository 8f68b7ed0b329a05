//! Resume scorer: resume analysis and scoring CLI

mod analysis;
mod cli;
mod config;
mod engine;
mod error;
mod input;
mod output;
mod parser;
mod scoring;
mod storage;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction};
use config::Config;
use engine::{ScoreRequest, ScoringEngine};
use error::{Result, ResumeScorerError};
use input::manager::InputManager;
use log::{error, info};
use output::formatter::ReportGenerator;
use scoring::adaptive::ModeSelection;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        if let Some(hint) = e.user_hint() {
            eprintln!("{}", hint);
        }
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Score {
            resume,
            job,
            role,
            level,
            mode,
            output,
            detailed,
            save,
        } => {
            cli::validate_file_extension(&resume, &["pdf", "txt", "md", "markdown"])
                .map_err(|e| ResumeScorerError::InvalidInput(format!("Resume file: {}", e)))?;
            if let Some(job_path) = &job {
                cli::validate_file_extension(job_path, &["txt", "md", "markdown"])
                    .map_err(|e| {
                        ResumeScorerError::InvalidInput(format!("Job description file: {}", e))
                    })?;
            }

            let output_format =
                cli::parse_output_format(&output).map_err(ResumeScorerError::InvalidInput)?;
            let level = level.parse()?;
            let mode: ModeSelection = mode.parse()?;

            info!("Scoring {} as {} ({})", resume.display(), role, level);

            let mut input = InputManager::new();
            let (bytes, format) = input.load(&resume).await?;

            let mut request = ScoreRequest::new(role, level).with_mode(mode);
            if let Some(job_path) = &job {
                let (job_bytes, _) = input.load(job_path).await?;
                request = request.with_job_description(String::from_utf8_lossy(&job_bytes));
            }

            let engine = ScoringEngine::new(config.clone())?;
            let (_facts, result) = engine.parse_and_score(&bytes, format, &request)?;

            let generator =
                ReportGenerator::new(config.output.color_output, detailed || config.output.detailed);
            println!("{}", generator.format(&result, &output_format)?);

            if let Some(path) = save {
                generator.save(&result, &output_format, &path)?;
                println!("Report saved to {}", path.display());
            }

            Ok(())
        }

        Commands::Roles => {
            let engine = ScoringEngine::new(config)?;
            println!("Known roles:");
            for role in engine.roles().role_ids() {
                println!("  {}", role);
            }
            println!("\nLevels: entry, mid, senior, lead");
            Ok(())
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let rendered = toml::to_string_pretty(&config).map_err(|e| {
                    ResumeScorerError::Configuration(format!("Failed to render config: {}", e))
                })?;
                println!("{}", rendered);
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", Config::config_path().display());
                Ok(())
            }
            ConfigAction::Reset => {
                let fresh = Config::default();
                fresh.save()?;
                println!("Configuration reset to defaults");
                Ok(())
            }
        },
    }
}
