//! The marketing brief collected from the user.
//!
//! A brief is the single input to both crews. It is deserialisable from YAML/JSON (so a brief can
//! be supplied as a file) and serialises into the flat input map used for prompt interpolation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::{debug, error};

use crate::error::BriefError;

/// A comprehensive marketing brief detailing the product and campaign goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingBrief {
    // Basic information
    /// A short working title for the idea.
    pub product_name: String,
    /// Broad category for classification.
    pub category: String,
    /// Short description, max 20 words.
    pub one_line_summary: Option<String>,
    /// Paragraph describing the idea, features and use case.
    pub detailed_description: String,

    // Problem & solution
    pub problem_statement: String,
    pub target_pain_points: Option<Vec<String>>,

    // Audience
    pub primary_audience: String,
    pub demographics: Option<String>,
    pub psychographics: Option<String>,
    pub geographic_market: Option<String>,

    // Features & benefits
    pub key_features: Option<Vec<String>>,
    pub main_benefits: Option<Vec<String>>,
    /// What makes the product stand out.
    #[serde(alias = "unique_selling_proposition")]
    pub usp: String,

    // Business & market details
    #[serde(alias = "estimated_price_point")]
    pub price_point: Option<String>,
    pub known_competitors: Option<Vec<String>>,
    pub distribution_channels: Option<Vec<String>>,

    // Branding
    pub brand_name_ideas: Option<Vec<String>>,
    /// Brand voice, e.g. "Professional and helpful".
    #[serde(default = "default_tone")]
    pub tone_and_personality: String,
    pub color_preferences: Option<Vec<String>>,
    pub logo_tagline_ideas: Option<Vec<String>>,

    // Goals & success criteria
    pub main_goal: Option<String>,
    pub target_launch_date: Option<String>,
    /// For ads or initial marketing spend.
    pub budget_range: String,
    pub preferred_channels: Option<Vec<String>>,
}

/// Default brand voice offered when collecting a brief.
pub const DEFAULT_TONE: &str = "Professional and helpful";

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

impl MarketingBrief {
    /// Checks that every required field carries non-blank text.
    pub fn validate(&self) -> Result<(), BriefError> {
        let required: [(&'static str, &str); 8] = [
            ("product_name", &self.product_name),
            ("category", &self.category),
            ("detailed_description", &self.detailed_description),
            ("problem_statement", &self.problem_statement),
            ("primary_audience", &self.primary_audience),
            ("usp", &self.usp),
            ("tone_and_personality", &self.tone_and_personality),
            ("budget_range", &self.budget_range),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                error!(field = name, "Brief is missing a required field");
                return Err(BriefError::MissingField(name));
            }
        }
        debug!(product_name = %self.product_name, "Brief validated");
        Ok(())
    }

    /// Flattens the brief into the key/value map used for prompt interpolation.
    pub fn to_inputs(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // A struct of strings and string lists always serialises to an object.
            _ => Map::new(),
        }
    }

    /// URL and object-key friendly form of the product name.
    pub fn slug(&self) -> String {
        static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
        let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));
        let lowered = self.product_name.to_lowercase();
        let slug = re.replace_all(&lowered, "-");
        let slug = slug.trim_matches('-');
        if slug.is_empty() {
            "brief".to_string()
        } else {
            slug.to_string()
        }
    }
}

/// Parses a comma-separated answer into a list, dropping blank entries.
///
/// Returns `None` when nothing is left, so skipped questions stay distinguishable from empty
/// lists in the serialised brief.
pub fn parse_list(answer: &str) -> Option<Vec<String>> {
    let items: Vec<String> = answer
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[cfg(test)]
pub(crate) fn sample_brief() -> MarketingBrief {
    MarketingBrief {
        product_name: "Trail Buddy".into(),
        category: "Outdoor gear".into(),
        one_line_summary: Some("A smart hiking companion".into()),
        detailed_description: "A clip-on device that tracks routes offline.".into(),
        problem_statement: "Hikers lose signal and get lost.".into(),
        target_pain_points: Some(vec!["No signal".into(), "Heavy devices".into()]),
        primary_audience: "Weekend hikers".into(),
        demographics: None,
        psychographics: None,
        geographic_market: Some("Europe".into()),
        key_features: Some(vec!["Offline maps".into()]),
        main_benefits: None,
        usp: "Works without any signal".into(),
        price_point: None,
        known_competitors: Some(vec!["Garmin".into(), "Suunto".into()]),
        distribution_channels: None,
        brand_name_ideas: None,
        tone_and_personality: DEFAULT_TONE.into(),
        color_preferences: None,
        logo_tagline_ideas: None,
        main_goal: Some("Get signups".into()),
        target_launch_date: None,
        budget_range: "$1,000".into(),
        preferred_channels: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_trims_and_drops_blanks() {
        assert_eq!(
            parse_list(" a, b ,, c ,"),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(parse_list(" , ,"), None);
        assert_eq!(parse_list(""), None);
    }

    #[test]
    fn validate_names_the_first_blank_required_field() {
        let mut brief = sample_brief();
        assert!(brief.validate().is_ok());
        brief.problem_statement = "   ".into();
        let err = brief.validate().unwrap_err();
        assert_eq!(err.to_string(), "problem_statement is required");
    }

    #[test]
    fn accepts_long_form_aliases() {
        let yaml = r#"
product_name: Trail Buddy
category: Outdoor gear
detailed_description: A device
problem_statement: Getting lost
primary_audience: Hikers
unique_selling_proposition: Offline
estimated_price_point: "$99"
tone_and_personality: Friendly
budget_range: "$500"
"#;
        let brief: MarketingBrief = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(brief.usp, "Offline");
        assert_eq!(brief.price_point.as_deref(), Some("$99"));
        assert!(brief.key_features.is_none());
    }

    #[test]
    fn inputs_keep_skipped_fields_as_null() {
        let inputs = sample_brief().to_inputs();
        assert_eq!(inputs["product_name"], Value::String("Trail Buddy".into()));
        assert_eq!(inputs["demographics"], Value::Null);
        assert!(inputs.contains_key("usp"));
    }

    #[test]
    fn slug_collapses_punctuation() {
        let mut brief = sample_brief();
        brief.product_name = "  Trail Buddy 2.0!  ".into();
        assert_eq!(brief.slug(), "trail-buddy-2-0");
        brief.product_name = "???".into();
        assert_eq!(brief.slug(), "brief");
    }
}
