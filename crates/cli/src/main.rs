use crate::error::CliError;
use clap::Parser;
use commands::Commands;
use engine_config::settings::MaskingSettings;
use engine_core::context::env::EnvContext;
use engine_runtime::{execution::preview, run_masking_job};
use model::pagination::cursor::Cursor;
use planner::query::{
    dialect::Postgres,
    renderer::{Render, Renderer},
};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "sandbox-mask",
    version = "0.1.0",
    about = "Masks personal contact data in sandbox copies"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            initiator,
            test_invocation,
            output,
        } => {
            let settings = load_settings(&config)?;
            info!(config = %config.display(), environment = %settings.environment, "Starting masking run");

            let outcome = run_masking_job(settings, initiator, test_invocation).await?;
            match output {
                Some(path) => output::write_report(&outcome.report, &path).await?,
                None => output::print_report(&outcome.report)?,
            }
        }
        Commands::Catalog { config } => {
            let settings = load_settings(&config)?;
            let fields = preview::resolve_catalog(&settings).await?;
            output::print_json(&fields)?;
        }
        Commands::Plan { config } => {
            let settings = load_settings(&config)?;
            let query = preview::plan_query(&settings).await?;

            let select = query.page(&Cursor::None, settings.chunk_size);
            let mut renderer = Renderer::new(&Postgres).with_text_projection();
            select.render(&mut renderer);
            let (sql, _) = renderer.finish();

            output::print_json(&serde_json::json!({
                "dataset": settings.dataset,
                "chunk_size": settings.chunk_size,
                "columns": query.columns(),
                "fields": query.fields,
                "read_only": query.read_only,
                "first_chunk_sql": sql,
            }))?;
        }
    }

    Ok(())
}

fn load_settings(path: &Path) -> Result<MaskingSettings, CliError> {
    Ok(MaskingSettings::load(path, &EnvContext::from_process())?)
}
