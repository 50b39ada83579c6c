//! High-level pipeline: validation crew, then content crew, then upload.
//!
//! This module is the only place that strings the crews together. It follows a strict
//! fail-fast order:
//!   - [`run_validation`]: one validator task producing a [`ValidationReport`]
//!   - [`run_content_generation`]: research (optionally backed by web search) → copywriting →
//!     editing, then every artifact is uploaded to the configured bucket
//!
//! Each step either succeeds or ends the run with a [`PipelineError`]. The only tolerated failure
//! is the web search feeding the researcher: if it errors the research task runs without it.
//!
//! Callers supply the collaborators ([`CrewModels`], [`WebSearch`], [`ObjectStore`]) so the CLI
//! can pass real clients and tests can pass mocks.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

use crate::artifacts::{build_artifacts, object_key, CONTENT_TYPE};
use crate::brief::MarketingBrief;
use crate::contract::{BucketStatus, LanguageModel, ObjectStore, PutObject, StoredObject, WebSearch};
use crate::crew::Crew;
use crate::crew_config::{
    CrewDefinition, COPYWRITER, COPYWRITING_TASK, EDITING_TASK, EDITOR, RESEARCHER, RESEARCH_TASK,
    VALIDATION_TASK, VALIDATOR,
};
use crate::error::{LlmError, PipelineError};
use crate::llm::build_model;
use crate::reports::{MarketingContent, ResearchReport, ValidationReport};
use crate::search::render_hits;
use crate::settings::Settings;

/// One model per agent role.
#[derive(Clone)]
pub struct CrewModels {
    pub validator: Arc<dyn LanguageModel>,
    pub researcher: Arc<dyn LanguageModel>,
    pub copywriter: Arc<dyn LanguageModel>,
    pub editor: Arc<dyn LanguageModel>,
}

impl CrewModels {
    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        Ok(Self {
            validator: build_model(&settings.models.validator, settings)?,
            researcher: build_model(&settings.models.researcher, settings)?,
            copywriter: build_model(&settings.models.copywriter, settings)?,
            editor: build_model(&settings.models.editor, settings)?,
        })
    }

    /// The same model for every role.
    pub fn uniform(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            validator: model.clone(),
            researcher: model.clone(),
            copywriter: model.clone(),
            editor: model,
        }
    }
}

/// Runs the validation crew for a brief.
pub async fn run_validation(
    brief: &MarketingBrief,
    definition: &CrewDefinition,
    models: &CrewModels,
) -> Result<ValidationReport, PipelineError> {
    brief.validate()?;
    let span = info_span!("validation", product = %brief.product_name);
    async {
        info!(model = %models.validator.describe(), "Starting validation crew");
        let mut crew = Crew::new(definition, brief.to_inputs())
            .with_model(VALIDATOR, models.validator.clone());
        let mut report: ValidationReport = crew.run_task(VALIDATION_TASK, None).await?;
        if report.product_name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            report.product_name = Some(brief.product_name.clone());
        }
        info!(
            viability_score = report.viability_score,
            competitor_density = %report.competitor_density,
            "Validation crew finished"
        );
        Ok::<_, PipelineError>(report)
    }
    .instrument(span)
    .await
}

/// Everything a content run needs.
pub struct ContentRequest<'a> {
    pub brief: &'a MarketingBrief,
    pub validation: &'a ValidationReport,
    pub definition: &'a CrewDefinition,
    pub models: &'a CrewModels,
    pub search: Option<&'a dyn WebSearch>,
    pub store: &'a dyn ObjectStore,
    pub bucket: &'a str,
    pub run_id: String,
}

#[derive(Debug, Clone)]
pub struct ContentRunReport {
    pub run_id: String,
    pub research: ResearchReport,
    pub content: MarketingContent,
    pub bucket: String,
    pub bucket_status: BucketStatus,
    pub uploaded: Vec<StoredObject>,
}

impl fmt::Display for ContentRunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = &self.content.landing_page;
        writeln!(f, "Headline:     {}", page.headline)?;
        writeln!(f, "Sub-headline: {}", page.sub_headline)?;
        for blurb in &page.feature_blurbs {
            writeln!(f, "  * {blurb}")?;
        }
        writeln!(f, "SEO keywords: {}", self.research.seo_keywords.join(", "))?;
        writeln!(f)?;
        writeln!(f, "{}", self.content.blog_post_markdown.trim_end())?;
        writeln!(f)?;
        writeln!(f, "Uploaded to bucket '{}':", self.bucket)?;
        for object in &self.uploaded {
            writeln!(f, "  {} ({} bytes)", object.key, object.size)?;
        }
        Ok(())
    }
}

fn search_query(brief: &MarketingBrief) -> String {
    format!(
        "{} {} market trends, target audience and competitors",
        brief.product_name, brief.category
    )
}

/// Runs the content crew and uploads its results.
pub async fn run_content_generation(
    req: ContentRequest<'_>,
) -> Result<ContentRunReport, PipelineError> {
    req.brief.validate()?;
    let span = info_span!("content", product = %req.brief.product_name, run_id = %req.run_id);
    async {
        let mut inputs = req.brief.to_inputs();
        let validation = serde_json::to_value(req.validation).map_err(|source| {
            PipelineError::Serialise {
                what: "validation report",
                source,
            }
        })?;
        inputs.insert("validation_report".into(), validation);
        inputs.insert("bucket_name".into(), Value::String(req.bucket.to_string()));

        let mut crew = Crew::new(req.definition, inputs)
            .with_model(RESEARCHER, req.models.researcher.clone())
            .with_model(COPYWRITER, req.models.copywriter.clone())
            .with_model(EDITOR, req.models.editor.clone());

        let references = match req.search {
            Some(search) => match search.search(&search_query(req.brief)).await {
                Ok(hits) if !hits.is_empty() => Some(render_hits(&hits)),
                Ok(_) => None,
                Err(e) => {
                    warn!(error = %e, "Web search failed, researching without it");
                    None
                }
            },
            None => None,
        };

        let research: ResearchReport = crew.run_task(RESEARCH_TASK, references.as_deref()).await?;
        let _draft: MarketingContent = crew.run_task(COPYWRITING_TASK, None).await?;
        let content: MarketingContent = crew.run_task(EDITING_TASK, None).await?;

        let bucket_status = req.store.ensure_bucket(req.bucket).await?;
        let slug = req.brief.slug();
        let mut uploaded = Vec::new();
        for artifact in build_artifacts(req.brief, req.validation, &research, &content) {
            let stored = req
                .store
                .put_object(PutObject {
                    bucket: req.bucket.to_string(),
                    key: object_key(&slug, &req.run_id, artifact.file_name),
                    content: artifact.content.into_bytes(),
                    content_type: CONTENT_TYPE.to_string(),
                })
                .await?;
            uploaded.push(stored);
        }
        info!(objects = uploaded.len(), bucket = %req.bucket, "Content crew finished");

        Ok::<_, PipelineError>(ContentRunReport {
            run_id: req.run_id.clone(),
            research,
            content,
            bucket: req.bucket.to_string(),
            bucket_status,
            uploaded,
        })
    }
    .instrument(span)
    .await
}
