use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clima_core::config::Settings;
use clima_core::model::Models;
use clima_core::request::{handle_predict, PredictRequest};

#[derive(Debug, Parser)]
#[command(name = "clima_cli")]
struct Args {
    /// Classifier artifact (overrides MODEL_PATH).
    #[arg(long, global = true)]
    model_path: Option<PathBuf>,

    /// Label encoder artifact (overrides LABEL_ENCODER_PATH).
    #[arg(long, global = true)]
    label_encoder_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Predict every day in a range and print the same JSON the API returns.
    Predict {
        /// First day (YYYY-MM-DD).
        #[arg(long)]
        fecha_inicio: String,

        /// Last day, inclusive (YYYY-MM-DD). Defaults to the first day.
        #[arg(long)]
        fecha_fin: Option<String>,

        #[arg(long)]
        pretty: bool,
    },
    /// Load both artifacts and report their shape.
    Check,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if let Some(path) = args.model_path {
        settings.model_path = path;
    }
    if let Some(path) = args.label_encoder_path {
        settings.label_encoder_path = path;
    }

    let models = Models::load(&settings).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        e
    })?;

    match args.command {
        Command::Check => {
            tracing::info!(classes = ?models.encoder().classes(), "artifacts ok");
        }
        Command::Predict {
            fecha_inicio,
            fecha_fin,
            pretty,
        } => {
            let request = PredictRequest {
                fecha_fin: Some(fecha_fin.unwrap_or_else(|| fecha_inicio.clone())),
                fecha_inicio: Some(fecha_inicio),
            };
            let forecast = handle_predict(Some(&models), &request)?;

            let out = if pretty {
                serde_json::to_string_pretty(&forecast)
            } else {
                serde_json::to_string(&forecast)
            }
            .context("serialize forecast failed")?;
            println!("{out}");
        }
    }

    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
