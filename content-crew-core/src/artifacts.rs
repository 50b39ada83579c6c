//! Markdown artifacts uploaded at the end of a content run.

use chrono::Utc;
use std::fmt::Write as _;

use crate::brief::MarketingBrief;
use crate::reports::{LandingPageContent, MarketingContent, ResearchReport, ValidationReport};

pub const CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

pub const BLOG_POST: &str = "blog_post.md";
pub const LANDING_PAGE: &str = "landing_page.md";
pub const RESEARCH_REPORT: &str = "research_report.md";
pub const VALIDATION_REPORT: &str = "validation_report.md";

#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub content: String,
}

/// Identifier grouping the objects of one run: a UTC timestamp plus a short random suffix.
pub fn new_run_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().format("%Y%m%dT%H%M%SZ"), &suffix[..8])
}

pub fn object_key(slug: &str, run_id: &str, file_name: &str) -> String {
    format!("{slug}/{run_id}/{file_name}")
}

fn bullet_list(out: &mut String, items: &[String]) {
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}

pub fn render_landing_page(product_name: &str, page: &LandingPageContent) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<!-- Landing page for {product_name} -->");
    let _ = writeln!(out, "# {}\n", page.headline);
    let _ = writeln!(out, "## {}\n", page.sub_headline);
    bullet_list(&mut out, &page.feature_blurbs);
    out
}

pub fn render_research_report(product_name: &str, report: &ResearchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Market research: {product_name}\n");
    let _ = writeln!(out, "## Audience insights\n\n{}\n", report.audience_insights);
    let _ = writeln!(out, "## Market trends\n");
    bullet_list(&mut out, &report.market_trends);
    let _ = writeln!(out, "\n## Key pain points\n");
    bullet_list(&mut out, &report.key_pain_points);
    let _ = writeln!(out, "\n## Competitor analysis\n\n{}\n", report.competitor_analysis);
    let _ = writeln!(out, "## SEO keywords\n");
    bullet_list(&mut out, &report.seo_keywords);
    out
}

pub fn render_validation_report(product_name: &str, report: &ValidationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Market validation: {product_name}\n");
    let _ = writeln!(out, "**Viability score:** {} / 100\n", report.viability_score);
    let _ = writeln!(out, "**Recommendation:** {}\n", report.recommendation);
    let _ = writeln!(out, "## Market demand\n\n{}\n", report.market_demand);
    let _ = writeln!(out, "## Competitor density\n\n{}\n", report.competitor_density);
    let _ = writeln!(out, "## Monetization potential\n\n{}", report.monetization_potential);
    out
}

/// Every artifact of a finished run, in upload order.
pub fn build_artifacts(
    brief: &MarketingBrief,
    validation: &ValidationReport,
    research: &ResearchReport,
    content: &MarketingContent,
) -> Vec<Artifact> {
    let name = brief.product_name.as_str();
    vec![
        Artifact {
            file_name: BLOG_POST,
            content: content.blog_post_markdown.clone(),
        },
        Artifact {
            file_name: LANDING_PAGE,
            content: render_landing_page(name, &content.landing_page),
        },
        Artifact {
            file_name: RESEARCH_REPORT,
            content: render_research_report(name, research),
        },
        Artifact {
            file_name: VALIDATION_REPORT,
            content: render_validation_report(name, validation),
        },
    ]
}
