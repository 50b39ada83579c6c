//! The interactive loop: collect a brief, validate it, confirm, generate, repeat.

use std::sync::Arc;

use anyhow::Result;
use content_crew_core::artifacts::new_run_id;
use content_crew_core::brief::MarketingBrief;
use content_crew_core::contract::{ObjectStore, WebSearch};
use content_crew_core::crew_config::CrewDefinition;
use content_crew_core::pipeline::{
    run_content_generation, run_validation, ContentRequest, ContentRunReport, CrewModels,
};
use content_crew_core::reports::ValidationReport;
use tracing::{error, info, warn};

use crate::brief_collector::collect_brief;
use crate::display::Display;
use crate::prompt::{PromptError, Prompter};

/// Collaborators shared by every run in a session.
#[derive(Clone)]
pub struct Services {
    pub definition: CrewDefinition,
    pub models: CrewModels,
    pub search: Option<Arc<dyn WebSearch>>,
    pub store: Arc<dyn ObjectStore>,
    pub bucket: String,
    pub threshold: u8,
}

impl Services {
    pub async fn validate(&self, brief: &MarketingBrief) -> Result<ValidationReport> {
        Ok(run_validation(brief, &self.definition, &self.models).await?)
    }

    pub async fn generate(
        &self,
        brief: &MarketingBrief,
        validation: &ValidationReport,
    ) -> Result<ContentRunReport> {
        let report = run_content_generation(ContentRequest {
            brief,
            validation,
            definition: &self.definition,
            models: &self.models,
            search: self.search.as_deref(),
            store: self.store.as_ref(),
            bucket: &self.bucket,
            run_id: new_run_id(),
        })
        .await?;
        Ok(report)
    }
}

/// How one pass through the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Content was generated and uploaded.
    Completed,
    /// The user declined to generate content for this idea.
    Rejected,
    /// Validation failed; the brief is collected again straight away.
    ValidationFailed,
    /// Content generation or upload failed after the user confirmed; the error was reported.
    GenerationFailed,
}

/// Summary of a whole session, mostly for tests and the exit log.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub completed: usize,
    pub rejected: usize,
    pub failed: usize,
    pub cancelled: bool,
}

pub struct Session<'a, P: Prompter> {
    prompter: P,
    services: &'a Services,
    display: Display,
}

impl<'a, P: Prompter> Session<'a, P> {
    pub fn new(prompter: P, services: &'a Services) -> Self {
        Self {
            prompter,
            services,
            display: Display::new(),
        }
    }

    /// Runs briefs until the user stops or cancels input.
    pub async fn run(&mut self) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        loop {
            match self.run_once().await {
                Ok(Outcome::Completed) => summary.completed += 1,
                Ok(Outcome::Rejected) => {
                    summary.rejected += 1;
                    self.display.print_info("Restarting with a new brief.");
                    continue;
                }
                Ok(Outcome::ValidationFailed) => {
                    summary.failed += 1;
                    self.display.print_info("Restarting with a new brief.");
                    continue;
                }
                Ok(Outcome::GenerationFailed) => summary.failed += 1,
                Err(PromptError::Cancelled) => {
                    summary.cancelled = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            }

            match self.prompter.confirm("Run a new idea brief?", false) {
                Ok(true) => continue,
                Ok(false) => break,
                Err(PromptError::Cancelled) => {
                    summary.cancelled = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        if summary.cancelled {
            self.display.print_info("Input cancelled. Exiting.");
        } else {
            self.display.print_info("Exiting Content Crew. Goodbye!");
        }
        info!(
            completed = summary.completed,
            rejected = summary.rejected,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "Session finished"
        );
        Ok(summary)
    }

    async fn run_once(&mut self) -> Result<Outcome, PromptError> {
        let brief = collect_brief(&mut self.prompter)?;
        let services = self.services;

        let validation = match self
            .display
            .with_spinner(
                "Validating your idea...",
                "Validation complete",
                "Validation failed",
                services.validate(&brief),
            )
            .await
        {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "Validation crew failed");
                self.display
                    .print_error("The validation step failed. Please try again.");
                return Ok(Outcome::ValidationFailed);
            }
        };
        self.display
            .print_validation_report(&validation, services.threshold);

        if !self.confirm_generation(&validation)? {
            info!(product_name = %brief.product_name, "Content generation declined");
            return Ok(Outcome::Rejected);
        }

        match self
            .display
            .with_spinner(
                "Generating marketing content...",
                "Content generated and uploaded",
                "Content generation failed",
                services.generate(&brief, &validation),
            )
            .await
        {
            Ok(report) => {
                self.display.print_separator();
                self.display.print_final_result(&report);
                Ok(Outcome::Completed)
            }
            Err(e) => {
                error!(error = %e, "Content crew failed");
                self.display
                    .print_error(&format!("Content generation failed: {e}"));
                Ok(Outcome::GenerationFailed)
            }
        }
    }

    fn confirm_generation(&mut self, validation: &ValidationReport) -> Result<bool, PromptError> {
        let threshold = self.services.threshold;
        if !validation.passes(threshold) {
            warn!(
                viability_score = validation.viability_score,
                threshold, "Idea scored below the validation threshold"
            );
            self.display.print_warning(&format!(
                "The viability score ({}) is below the threshold of {threshold}.",
                validation.viability_score
            ));
            return self.prompter.confirm("Proceed with content generation anyway?", false);
        }
        self.prompter
            .confirm("Proceed with content generation for this idea?", true)
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }
}
