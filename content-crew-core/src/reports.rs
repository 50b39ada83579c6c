//! Structured outputs returned by the crews.
//!
//! Every type here is produced by a language model, so each one derives [`JsonSchema`] (the
//! schema is embedded in the task prompt) and implements [`Validate`] for the constraints JSON
//! Schema deserialisation alone does not enforce.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Post-deserialisation checks for model output.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}

fn require_len(field: &str, items: &[String], min: usize, max: usize) -> Result<(), String> {
    if items.len() < min || items.len() > max {
        return Err(if min == max {
            format!("{field} must contain exactly {min} items, got {}", items.len())
        } else {
            format!(
                "{field} must contain between {min} and {max} items, got {}",
                items.len()
            )
        });
    }
    for item in items {
        require_text(field, item)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CompetitorDensity {
    Low,
    Medium,
    High,
}

impl fmt::Display for CompetitorDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CompetitorDensity::Low => "Low",
            CompetitorDensity::Medium => "Medium",
            CompetitorDensity::High => "High",
        };
        f.write_str(label)
    }
}

/// A structured market validation report with a final viability score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    /// Name of the product that was validated.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Analysis of search volume, trends, and user interest.
    pub market_demand: String,
    /// The number and strength of existing competitors.
    pub competitor_density: CompetitorDensity,
    /// Analysis of how similar products make money and the idea's potential.
    pub monetization_potential: String,
    /// The final market viability score from 0 (No-Go) to 100 (High Potential).
    pub viability_score: u8,
    /// A final recommendation, e.g. 'Proceed with caution' or 'High potential, proceed.'
    pub recommendation: String,
}

impl ValidationReport {
    pub fn passes(&self, threshold: u8) -> bool {
        self.viability_score >= threshold
    }
}

impl Validate for ValidationReport {
    fn validate(&self) -> Result<(), String> {
        require_text("market_demand", &self.market_demand)?;
        require_text("monetization_potential", &self.monetization_potential)?;
        require_text("recommendation", &self.recommendation)?;
        if self.viability_score > 100 {
            return Err(format!(
                "viability_score must be between 0 and 100, got {}",
                self.viability_score
            ));
        }
        Ok(())
    }
}

/// A structured research report containing validated market insights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchReport {
    /// A 2-3 sentence summary of the target audience's demographics and psychographics.
    pub audience_insights: String,
    /// 2-3 key market trends for the product's category.
    pub market_trends: Vec<String>,
    /// The top 3-5 pain points the product addresses.
    pub key_pain_points: Vec<String>,
    /// A 3-5 sentence paragraph analysing 3-5 competitors and their strengths/weaknesses.
    pub competitor_analysis: String,
    /// Exactly 10 primary SEO keywords.
    pub seo_keywords: Vec<String>,
}

impl Validate for ResearchReport {
    fn validate(&self) -> Result<(), String> {
        require_text("audience_insights", &self.audience_insights)?;
        require_len("market_trends", &self.market_trends, 2, 3)?;
        require_len("key_pain_points", &self.key_pain_points, 3, 5)?;
        require_text("competitor_analysis", &self.competitor_analysis)?;
        require_len("seo_keywords", &self.seo_keywords, 10, 10)
    }
}

/// Structured content for a product landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandingPageContent {
    /// The main headline for the landing page (max 10 words).
    pub headline: String,
    /// A brief sub-headline (max 20 words).
    pub sub_headline: String,
    /// Exactly 3 short feature blurbs, each under 25 words.
    pub feature_blurbs: Vec<String>,
}

impl Validate for LandingPageContent {
    fn validate(&self) -> Result<(), String> {
        require_text("headline", &self.headline)?;
        require_text("sub_headline", &self.sub_headline)?;
        require_len("feature_blurbs", &self.feature_blurbs, 3, 3)
    }
}

/// The complete, structured marketing content output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarketingContent {
    /// The full, 500-word SEO-friendly blog post, formatted in markdown.
    pub blog_post_markdown: String,
    /// Structured content for the landing page.
    pub landing_page: LandingPageContent,
}

impl Validate for MarketingContent {
    fn validate(&self) -> Result<(), String> {
        require_text("blog_post_markdown", &self.blog_post_markdown)?;
        self.landing_page.validate()
    }
}

#[cfg(test)]
pub(crate) fn sample_research() -> ResearchReport {
    ResearchReport {
        audience_insights: "Hikers aged 25-45 who value safety.".into(),
        market_trends: vec!["Offline navigation".into(), "Lightweight gear".into()],
        key_pain_points: vec![
            "Losing signal".into(),
            "Battery drain".into(),
            "Bulky devices".into(),
        ],
        competitor_analysis: "Garmin leads on features but is expensive.".into(),
        seo_keywords: (1..=10).map(|i| format!("keyword {i}")).collect(),
    }
}

#[cfg(test)]
pub(crate) fn sample_content() -> MarketingContent {
    MarketingContent {
        blog_post_markdown: "# Never get lost again\n\nBody.".into(),
        landing_page: LandingPageContent {
            headline: "Hike without fear".into(),
            sub_headline: "Offline maps that fit in your pocket".into(),
            feature_blurbs: vec!["Offline".into(), "Light".into(), "Durable".into()],
        },
    }
}
