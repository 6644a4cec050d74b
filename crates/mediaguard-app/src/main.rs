#![warn(missing_docs)]
//! # mediaguard binary
//!
//! Command-line entry point: submits one media file or video URL for
//! deepfake analysis and prints the rendered result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mediaguard_app::{
    APP_VERSION, AnalysisController, AppConfig, AppError, init_tracing, load_media_file,
    probe_client,
};
use mediaguard_lifecycle::LifecycleState;
use mediaguard_ui::render_text;

#[derive(Parser, Debug)]
#[command(name = "mediaguard", version = APP_VERSION, about = "Deepfake analysis client")]
struct Cli {
    /// Print machine-readable JSON instead of the text report.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a local image or video for analysis.
    AnalyzeFile {
        /// Path to the media file.
        path: PathBuf,
    },
    /// Submit a YouTube URL for analysis.
    AnalyzeUrl {
        /// Video URL.
        url: String,
    },
    /// Check backend health.
    Health,
    /// Show backend service information.
    Info,
}

/// CLI entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    tracing::debug!(version = APP_VERSION, "mediaguard starting");

    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(%error, "mediaguard failed");
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let config = AppConfig::from_env()?;

    match cli.command {
        Command::AnalyzeFile { path } => {
            config.require_input_mode()?;
            let mut controller = AnalysisController::with_http(&config)?;
            let blob = load_media_file(&path)?;
            controller.select_file(blob)?;
            controller.analyze()?;
            report(&controller, cli.json)
        }
        Command::AnalyzeUrl { url } => {
            config.require_input_mode()?;
            let mut controller = AnalysisController::with_http(&config)?;
            controller.select_url(url)?;
            controller.analyze()?;
            report(&controller, cli.json)
        }
        Command::Health => {
            let health = probe_client(&config)?.health()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!(
                    "{} ({})",
                    health.status,
                    health.service.as_deref().unwrap_or("unknown service")
                );
            }
            Ok(if health.is_healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Info => {
            let info = probe_client(&config)?.service_info()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "{} {}",
                    info.service,
                    info.version.as_deref().unwrap_or("(unversioned)")
                );
                println!("status: {}", info.status.as_deref().unwrap_or("N/A"));
                println!(
                    "ai enabled: {}",
                    info.ai_enabled
                        .map(|enabled| enabled.to_string())
                        .unwrap_or_else(|| "N/A".to_string())
                );
                if !info.detection_methods.is_empty() {
                    println!("methods: {}", info.detection_methods.join(", "));
                }
                if let Some(accuracy) = &info.accuracy {
                    println!("accuracy: {accuracy}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(controller: &AnalysisController, json: bool) -> Result<ExitCode, AppError> {
    if json {
        match controller.state() {
            LifecycleState::Succeeded(result) => {
                println!("{}", serde_json::to_string_pretty(result)?);
            }
            LifecycleState::Failed(message) => {
                println!("{}", serde_json::json!({ "error": message }));
            }
            LifecycleState::Idle | LifecycleState::Loading => {}
        }
    } else {
        println!("{}", render_text(&controller.view()));
    }

    Ok(match controller.state() {
        LifecycleState::Succeeded(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
