use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use btc_metrics::cli::{Cli, Rendered, run_command};
use btc_metrics::config::{self, DashboardConfig};
use btc_metrics::errors::{Error, MetricsError};
use btc_metrics::io::{OutputFormat, write_frame};
use btc_metrics::loader::load_series;
use btc_metrics::source::open_source;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if shared_utils::env::load_env_file(&cli.env_file)? {
        tracing::debug!(path = %cli.env_file.display(), "loaded env file");
    }
    let cfg = load_config(cli.config.as_deref())?;

    let mut source = open_source(&cfg.source).context("Failed to open the data source")?;
    let series = load_series(source.as_mut())
        .with_context(|| format!("Failed to load daily records from {}", source.description()))?;

    let rendered = match run_command(&series, &cli.command, &cfg) {
        Ok(rendered) => rendered,
        // Shown to the user as a message, like an empty chart would be.
        Err(Error::Metrics(err @ (MetricsError::InvalidRange { .. } | MetricsError::EmptySeries))) => {
            eprintln!("{}", user_message(&err));
            return Ok(ExitCode::from(2));
        }
        Err(err) => return Err(err).context("Failed to derive the requested view"),
    };

    match rendered {
        Rendered::Frame(derived) => {
            let title = derived.kind().title();
            let mut frame = derived.into_frame();
            match cli.command.output().and_then(|o| o.out.as_deref()) {
                Some(path) => {
                    let format = OutputFormat::from_path(path).unwrap_or_default();
                    write_frame(&mut frame, path, format)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!(view = title, path = %path.display(), "wrote view");
                    println!("{}", path.display());
                }
                None => println!("{title}\n{frame}"),
            }
        }
        Rendered::Snapshot(snapshot) => print!("{snapshot}"),
        Rendered::Columns(columns) => {
            for column in columns {
                println!("{column}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    let mut cfg = match path {
        Some(path) => config::load_config_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    config::apply_env(&mut cfg)?;
    Ok(cfg)
}

fn user_message(err: &MetricsError) -> &'static str {
    match err {
        MetricsError::InvalidRange { .. } => "End date must fall after start date.",
        _ => "No data in the selected range.",
    }
}
