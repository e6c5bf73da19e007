mod check_cmd;
mod config;
mod greeting_cmd;
mod plan_cmd;
mod quiz_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use syllabus_core::generate::ResponseShape;
use syllabus_core::greeting::OpenMeteoClient;
use syllabus_core::{Difficulty, DocumentExtractor, GeminiClient, Generator};

use config::SyllabusConfig;

#[derive(Parser)]
#[command(name = "syllabus", about = "Turn exam syllabi into AI study plans and quizzes")]
struct Cli {
    /// Gemini model name (overrides SYLLABUS_MODEL env var)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a syllabus config file
    Init {
        /// Gemini API key to store (otherwise set GEMINI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate a study plan from a syllabus PDF or .xlsx spreadsheet
    Plan {
        /// Path to the syllabus document
        file: PathBuf,
        /// Free-text study preferences (e.g. "2 hours on weekdays")
        #[arg(long)]
        preferences: Option<String>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
        /// Write the plan JSON to this file instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate a multiple-choice quiz from study text
    Quiz {
        /// Text file with the study content (`-` for stdin)
        file: String,
        /// easy, medium or hard
        #[arg(long, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
        /// Print the quiz as JSON
        #[arg(long)]
        json: bool,
        /// Answer the questions interactively and get a score
        #[arg(long, conflicts_with = "json")]
        take: bool,
    },
    /// Validate a saved raw model reply (no model call)
    Check {
        /// File holding the raw reply text
        file: String,
        /// Expected shape: plan or quiz
        #[arg(long)]
        shape: ResponseShape,
        /// Print the parsed object as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the motivational quote and local weather
    Greeting {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the HTTP API
    Serve {
        /// Address to bind (default from config, else 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (default from config, else 3000)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Execute the `syllabus init` command: write config file.
fn cmd_init(api_key: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        model: config::ModelSection {
            api_key: api_key.map(str::to_string),
            name: Some(syllabus_core::model::gemini::DEFAULT_MODEL.to_string()),
            ..Default::default()
        },
        server: config::ServerSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  model.name = {}", syllabus_core::model::gemini::DEFAULT_MODEL);
    match api_key {
        Some(key) => match (key.get(..4), key.get(key.len().saturating_sub(4)..)) {
            (Some(head), Some(tail)) if key.len() > 8 => {
                println!("  model.api_key = {head}...{tail}")
            }
            _ => println!("  model.api_key = (set)"),
        },
        None => {
            println!();
            println!("No API key stored. Set {} before generating.", config::API_KEY_ENV);
        }
    }

    Ok(())
}

fn build_generator(resolved: &SyllabusConfig) -> Generator {
    Generator::new(
        Arc::new(GeminiClient::new(resolved.gemini.clone())),
        Arc::new(DocumentExtractor),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { api_key, force } => {
            cmd_init(api_key.as_deref(), force)?;
        }
        Commands::Plan {
            file,
            preferences,
            json,
            output,
        } => {
            let resolved = SyllabusConfig::resolve(cli.model.as_deref())?;
            let generator = build_generator(&resolved);
            plan_cmd::run_plan(
                &generator,
                &file,
                preferences.as_deref(),
                json,
                output.as_deref(),
            )
            .await?;
        }
        Commands::Quiz {
            file,
            difficulty,
            json,
            take,
        } => {
            let resolved = SyllabusConfig::resolve(cli.model.as_deref())?;
            let generator = build_generator(&resolved);
            quiz_cmd::run_quiz(&generator, &file, difficulty, json, take).await?;
        }
        Commands::Check { file, shape, json } => {
            check_cmd::run_check(&file, shape, json).await?;
        }
        Commands::Greeting { lat, lon, json } => {
            let resolved = SyllabusConfig::resolve_keyless(cli.model.as_deref());
            let model = GeminiClient::new(resolved.gemini);
            let weather = OpenMeteoClient::new();
            greeting_cmd::run_greeting(&model, &weather, lat, lon, json).await?;
        }
        Commands::Serve { bind, port } => {
            let resolved = SyllabusConfig::resolve(cli.model.as_deref())?;
            let state = serve_cmd::AppState {
                generator: build_generator(&resolved),
                weather: Arc::new(OpenMeteoClient::new()),
            };
            let bind = bind.unwrap_or(resolved.server.bind);
            let port = port.unwrap_or(resolved.server.port);
            serve_cmd::run_serve(state, &bind, port).await?;
        }
    }

    Ok(())
}
