//! Interactive collection of a marketing brief, section by section.

use content_crew_core::brief::{MarketingBrief, DEFAULT_TONE};
use tracing::info;

use crate::prompt::{PromptError, Prompter};

/// Walks the user through the seven sections of a brief.
///
/// Required questions repeat until answered, so the returned brief always passes
/// [`MarketingBrief::validate`].
pub fn collect_brief<P: Prompter + ?Sized>(p: &mut P) -> Result<MarketingBrief, PromptError> {
    p.notice("--- Starting New Marketing Brief ---");
    p.notice("Please provide the following information. Optional fields can be skipped.");

    p.section("1. Basic Information");
    let product_name = p.ask_required("Product Idea/Name")?;
    let category = p.ask_required("Category/Industry")?;
    let one_line_summary = p.ask_optional("One-line Summary")?;
    let detailed_description = p.ask_required_multiline("Detailed Description")?;

    p.section("2. Problem & Solution Definition");
    let problem_statement = p.ask_required_multiline("Problem Statement")?;
    let target_pain_points = p.ask_optional_list("Target Pain Points")?;

    p.section("3. Target Audience");
    let primary_audience = p.ask_required("Primary Audience")?;
    let demographics = p.ask_optional("Demographics (e.g., Age, Gender)")?;
    let psychographics = p.ask_optional("Psychographics (e.g., Lifestyle, Values)")?;
    let geographic_market = p.ask_optional("Geographic Market")?;

    p.section("4. Product Features & Benefits");
    let key_features = p.ask_optional_list("Key Features")?;
    let main_benefits = p.ask_optional_list("Main Benefits")?;
    let usp = p.ask_required("Unique Selling Proposition (USP)")?;

    p.section("5. Business & Market Details (Optional)");
    let price_point = p.ask_optional("Estimated Price Point")?;
    let known_competitors = p.ask_optional_list("Known Competitors")?;
    let distribution_channels = p.ask_optional_list("Distribution Channels")?;

    p.section("6. Branding Preferences (Optional)");
    let brand_name_ideas = p.ask_optional_list("Preferred Brand Name Ideas")?;
    let tone_and_personality = p.ask_with_default("Tone & Personality", DEFAULT_TONE)?;
    let color_preferences = p.ask_optional_list("Color Preferences")?;
    let logo_tagline_ideas = p.ask_optional_list("Logo/Tagline Ideas")?;

    p.section("7. Goals & Success Criteria");
    let main_goal = p.ask_optional("Main Goal (e.g., 'Get signups')")?;
    let target_launch_date = p.ask_optional("Target Launch Date")?;
    let budget_range = p.ask_required("Budget Range (e.g., '$1,000')")?;
    let preferred_channels = p.ask_optional_list("Preferred Channels")?;

    p.notice("");
    p.notice("--- Brief Collection Complete! ---");

    let brief = MarketingBrief {
        product_name,
        category,
        one_line_summary,
        detailed_description,
        problem_statement,
        target_pain_points,
        primary_audience,
        demographics,
        psychographics,
        geographic_market,
        key_features,
        main_benefits,
        usp,
        price_point,
        known_competitors,
        distribution_channels,
        brand_name_ideas,
        tone_and_personality,
        color_preferences,
        logo_tagline_ideas,
        main_goal,
        target_launch_date,
        budget_range,
        preferred_channels,
    };
    info!(product_name = %brief.product_name, "Brief collected");
    Ok(brief)
}
