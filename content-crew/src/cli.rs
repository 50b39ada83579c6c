//! Command-line surface for content-crew.
//!
//! Parsing and wiring only: settings, provider clients and the object store are built here and
//! handed to the session or to the core pipeline. All pipeline logic lives in
//! `content-crew-core`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use content_crew_core::contract::{ObjectStore, WebSearch};
use content_crew_core::pipeline::CrewModels;
use content_crew_core::search::TavilySearch;
use content_crew_core::settings::Settings;
use content_crew_core::storage::MinioStore;
use tracing::{error, info, warn};

use crate::display::Display;
use crate::load_config::{load_brief, load_crew_config};
use crate::prompt::TerminalPrompter;
use crate::session::{Services, Session};

/// Validate product ideas and turn them into marketing content stored in MinIO.
#[derive(Parser, Debug)]
#[clap(
    name = "content-crew",
    version,
    about = "Validate a product idea with an AI crew and generate its marketing content"
)]
pub struct Cli {
    /// YAML file overriding the built-in agent and task definitions
    #[clap(long, global = true)]
    pub crew_config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect briefs interactively and run both crews (the default)
    Run,
    /// Run only the validation crew on a brief file
    Validate {
        /// Path to the YAML brief
        #[clap(long)]
        brief: PathBuf,
    },
    /// Validate a brief file and, if it passes, generate and upload its content
    Generate {
        /// Path to the YAML brief
        #[clap(long)]
        brief: PathBuf,
        /// Generate even when the viability score is below the threshold
        #[clap(long)]
        force: bool,
    },
}

/// Async entrypoint shared by `main` and the integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let command = cli.command.unwrap_or(Commands::Run);
    // File inputs are checked before anything touches the environment or the network.
    let brief = match &command {
        Commands::Run => None,
        Commands::Validate { brief } | Commands::Generate { brief, .. } => Some(load_brief(brief)?),
    };
    let definition = load_crew_config(cli.crew_config.as_deref())?;
    let settings = Settings::from_env()?;
    let services = build_services(definition, &settings)?;
    let display = Display::new();

    match (command, brief) {
        (Commands::Validate { .. }, Some(brief)) => {
            info!(command = "validate", product_name = %brief.product_name, "Running validation");
            let report = display
                .with_spinner(
                    "Validating your idea...",
                    "Validation complete",
                    "Validation failed",
                    services.validate(&brief),
                )
                .await?;
            display.print_validation_report(&report, services.threshold);
            Ok(())
        }
        (Commands::Generate { force, .. }, Some(brief)) => {
            info!(command = "generate", product_name = %brief.product_name, force, "Running both crews");
            let validation = display
                .with_spinner(
                    "Validating your idea...",
                    "Validation complete",
                    "Validation failed",
                    services.validate(&brief),
                )
                .await?;
            display.print_validation_report(&validation, services.threshold);
            if !validation.passes(services.threshold) {
                if !force {
                    error!(
                        viability_score = validation.viability_score,
                        threshold = services.threshold,
                        "Idea scored below the validation threshold"
                    );
                    bail!(
                        "viability score {} is below the threshold of {}; pass --force to generate anyway",
                        validation.viability_score,
                        services.threshold
                    );
                }
                warn!(
                    viability_score = validation.viability_score,
                    "Generating despite a score below the threshold"
                );
            }
            let report = display
                .with_spinner(
                    "Generating marketing content...",
                    "Content generated and uploaded",
                    "Content generation failed",
                    services.generate(&brief, &validation),
                )
                .await?;
            display.print_separator();
            display.print_final_result(&report);
            Ok(())
        }
        _ => {
            info!(command = "run", "Starting interactive session");
            display.print_header("Content Crew: idea validation and marketing content");
            let mut session = Session::new(TerminalPrompter::new(), &services);
            session.run().await?;
            Ok(())
        }
    }
}

fn build_services(
    definition: content_crew_core::crew_config::CrewDefinition,
    settings: &Settings,
) -> Result<Services> {
    let models = CrewModels::from_settings(settings).context("Failed to set up model clients")?;
    let http = reqwest::Client::new();

    let search: Option<Arc<dyn WebSearch>> = match &settings.tavily_api_key {
        Some(key) => Some(Arc::new(TavilySearch::new(http.clone(), key.clone(), None))),
        None => {
            info!("TAVILY_API_KEY not set, researcher runs without web search");
            None
        }
    };
    let store: Arc<dyn ObjectStore> = Arc::new(
        MinioStore::new(http, &settings.storage).context("Failed to set up the object store")?,
    );

    Ok(Services {
        definition,
        models,
        search,
        store,
        bucket: settings.storage.bucket.clone(),
        threshold: settings.validation_threshold,
    })
}
