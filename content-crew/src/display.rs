use std::fmt;
use std::future::Future;
use std::time::Duration;

use console::{style, Style};
use content_crew_core::pipeline::ContentRunReport;
use content_crew_core::reports::{CompetitorDensity, ValidationReport};
use indicatif::{ProgressBar, ProgressStyle};

/// Styled terminal output for the session.
#[derive(Debug, Default)]
pub struct Display;

impl Display {
    pub fn new() -> Self {
        Self
    }

    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", style(text).bold().cyan());
        println!("{}", style("═".repeat(50)).dim());
    }

    pub fn print_separator(&self) {
        println!();
        println!("{}", style("=".repeat(50)).dim());
        println!();
    }

    pub fn print_success(&self, message: &str) {
        println!("{} {}", style("✔").green().bold(), message);
    }

    pub fn print_warning(&self, message: &str) {
        println!("{} {}", style("!").yellow().bold(), message);
    }

    pub fn print_error(&self, message: &str) {
        println!("{} {}", style("✖").red().bold(), message);
    }

    pub fn print_info(&self, message: &str) {
        println!("{} {}", style("→").cyan(), message);
    }

    pub fn print_validation_report(&self, report: &ValidationReport, threshold: u8) {
        let product = report.product_name.as_deref().unwrap_or("your idea");
        self.print_header(&format!("Validation Report for: {product}"));
        println!("  Market Demand:          {}", report.market_demand);
        println!(
            "  Competitor Density:     {}",
            density_style(report.competitor_density).apply_to(report.competitor_density)
        );
        println!("  Monetization Potential: {}", report.monetization_potential);
        println!("  RECOMMENDATION:         {}", style(&report.recommendation).bold());
        let score_style = if report.passes(threshold) {
            Style::new().green().bold()
        } else {
            Style::new().red().bold()
        };
        println!(
            "  FINAL SCORE:            {} / 100 (threshold {threshold})",
            score_style.apply_to(report.viability_score)
        );
        println!("{}", style("─".repeat(50)).dim());
    }

    /// The final result is printed raw so it can be copied or piped as is.
    pub fn print_final_result(&self, report: &ContentRunReport) {
        self.print_header("Content Crew Finished");
        println!("Final Result:\n{report}");
        self.print_success(&format!(
            "Uploaded {} objects to bucket '{}' (run {})",
            report.uploaded.len(),
            report.bucket,
            report.run_id
        ));
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("static template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    /// Runs `fut` under a spinner that ends with the success or failure text.
    pub async fn with_spinner<T, E, F>(
        &self,
        start: &str,
        success: &str,
        failure: &str,
        fut: F,
    ) -> Result<T, E>
    where
        E: fmt::Display,
        F: Future<Output = Result<T, E>>,
    {
        let spinner = self.create_spinner(start);
        let result = fut.await;
        match &result {
            Ok(_) => spinner.finish_with_message(format!("{} {success}", style("✔").green())),
            Err(e) => {
                spinner.abandon_with_message(format!("{} {failure}: {e}", style("✖").red()))
            }
        }
        result
    }
}

fn density_style(density: CompetitorDensity) -> Style {
    match density {
        CompetitorDensity::Low => Style::new().green(),
        CompetitorDensity::Medium => Style::new().yellow(),
        CompetitorDensity::High => Style::new().red(),
    }
}
