//! File inputs for the non-interactive commands: a YAML brief and optional crew overrides.
//!
//! Errors surface as `anyhow::Error` with the path in the message; the caller decides how to
//! report them.

use anyhow::Result;
use content_crew_core::brief::MarketingBrief;
use content_crew_core::crew_config::CrewDefinition;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Loads and validates a marketing brief from a YAML file.
pub fn load_brief<P: AsRef<Path>>(path: P) -> Result<MarketingBrief> {
    let path_ref = path.as_ref();
    info!(brief_path = ?path_ref, "Loading brief from file");

    let content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, brief_path = ?path_ref, "Failed to read brief file");
            return Err(anyhow::anyhow!(
                "Failed to read brief file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let brief: MarketingBrief = match serde_yaml::from_str(&content) {
        Ok(brief) => brief,
        Err(e) => {
            error!(error = ?e, brief_path = ?path_ref, "Failed to parse brief YAML");
            return Err(anyhow::anyhow!("Failed to parse brief YAML: {e}"));
        }
    };

    if let Err(e) = brief.validate() {
        error!(error = %e, brief_path = ?path_ref, "Brief is incomplete");
        return Err(anyhow::anyhow!("Invalid brief in {:?}: {e}", path_ref));
    }

    info!(product_name = %brief.product_name, "Brief loaded");
    Ok(brief)
}

/// The built-in crew, or the built-in crew with the given file's overrides applied.
pub fn load_crew_config(path: Option<&Path>) -> Result<CrewDefinition> {
    let definition = match path {
        Some(path) => CrewDefinition::load_with_overrides(path)?,
        None => CrewDefinition::builtin()?,
    };
    Ok(definition)
}
