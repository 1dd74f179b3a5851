//! Plain-text report rendering and JSON export.

use anyhow::Context;
use crossterm::style::{style, Color, Stylize};
use handlehunt_platforms::{PlatformCategory, PlatformRegistry};
use handlehunt_scanner::{ProbeOutcome, ResultExport, ScanReport};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Not-found platforms listed before the remainder is summarized.
pub const NOT_FOUND_DISPLAY_LIMIT: usize = 10;

/// Uncertain cases listed before the remainder is summarized.
pub const UNCERTAIN_DISPLAY_LIMIT: usize = 8;

const HEAVY_RULE: usize = 80;
const LIGHT_RULE: usize = 60;

/// Colors for the bracketed status tags, off when the stream is not a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colored: bool,
}

impl Palette {
    /// Palette that never emits escape codes.
    pub const PLAIN: Self = Self { colored: false };

    /// Create a palette, colored or plain.
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn paint(self, tag: &str, color: Color) -> String {
        if self.colored {
            style(tag).with(color).bold().to_string()
        } else {
            tag.to_string()
        }
    }

    /// `[✓]` for a found profile.
    pub fn found(self) -> String {
        self.paint("[✓]", Color::Green)
    }

    /// `[INFO]` status tag.
    pub fn info(self) -> String {
        self.paint("[INFO]", Color::Cyan)
    }

    /// `[ERROR]` status tag.
    pub fn error(self) -> String {
        self.paint("[ERROR]", Color::Red)
    }

    /// `[RECOMMENDATION]` status tag.
    pub fn recommendation(self) -> String {
        self.paint("[RECOMMENDATION]", Color::Yellow)
    }
}

/// Line printed as soon as a profile is found.
pub fn found_line(outcome: &ProbeOutcome, palette: Palette) -> String {
    format!(
        "{} {}: {} - {} ({})",
        palette.found(),
        outcome.platform,
        outcome.username,
        outcome.url,
        outcome.reason()
    )
}

/// Write the end-of-scan report.
pub fn write_report<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    let results = &report.results;

    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(HEAVY_RULE))?;
    writeln!(out, "SEARCH RESULTS FOR: {}", report.username)?;
    writeln!(out, "{}", "=".repeat(HEAVY_RULE))?;

    if !results.found.is_empty() {
        writeln!(out)?;
        writeln!(out, "[FOUND PROFILES] ({} found):", results.found.len())?;
        writeln!(out, "{}", "-".repeat(LIGHT_RULE))?;
        for outcome in &results.found {
            writeln!(
                out,
                "• {:15} | {:20} | {}",
                outcome.platform, outcome.username, outcome.url
            )?;
            writeln!(out, "  └─ Reason: {}", outcome.reason())?;
        }
    }

    let not_found = results.not_found_platforms();
    if !not_found.is_empty() {
        writeln!(out)?;
        writeln!(out, "[NOT FOUND] ({} platforms):", not_found.len())?;
        writeln!(out, "{}", "-".repeat(LIGHT_RULE))?;
        for platform in not_found.iter().take(NOT_FOUND_DISPLAY_LIMIT) {
            writeln!(out, "• {platform}")?;
        }
        if not_found.len() > NOT_FOUND_DISPLAY_LIMIT {
            writeln!(
                out,
                "• ... and {} more platforms",
                not_found.len() - NOT_FOUND_DISPLAY_LIMIT
            )?;
        }
    }

    if !results.uncertain.is_empty() {
        writeln!(out)?;
        writeln!(out, "[ERRORS/UNCERTAIN] ({} cases):", results.uncertain.len())?;
        writeln!(out, "{}", "-".repeat(LIGHT_RULE))?;
        for outcome in results.uncertain.iter().take(UNCERTAIN_DISPLAY_LIMIT) {
            writeln!(
                out,
                "• {} ({}): {}",
                outcome.platform,
                outcome.username,
                outcome.reason()
            )?;
        }
        if results.uncertain.len() > UNCERTAIN_DISPLAY_LIMIT {
            writeln!(
                out,
                "• ... and {} more errors",
                results.uncertain.len() - UNCERTAIN_DISPLAY_LIMIT
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "[SUMMARY]")?;
    writeln!(out, "Total profiles found: {}", results.found.len())?;
    writeln!(out, "Platforms checked: {}", report.platforms_checked)?;
    writeln!(
        out,
        "Not found/Errors: {}",
        results.not_found.len() + results.uncertain.len()
    )?;
    if report.interrupted {
        writeln!(
            out,
            "Interrupted: {}/{} checks completed",
            results.total(),
            report.total_tasks
        )?;
    }

    Ok(())
}

/// Write the elapsed time and the follow-up recommendation.
pub fn write_footer<W: Write>(
    out: &mut W,
    report: &ScanReport,
    palette: Palette,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{} Search completed in {:.2} seconds",
        palette.info(),
        report.elapsed.as_secs_f64()
    )?;

    let advice = if report.results.found.is_empty() {
        "Try different username variations or check spelling"
    } else {
        "Manual verification recommended for found profiles"
    };
    writeln!(out, "{} {advice}", palette.recommendation())
}

/// Write the catalog grouped by category.
pub fn write_platform_list<W: Write>(out: &mut W, registry: &PlatformRegistry) -> io::Result<()> {
    writeln!(out, "{} platforms available", registry.len())?;

    for category in PlatformCategory::ALL {
        let platforms = registry.get_by_category(category);
        if platforms.is_empty() {
            continue;
        }

        writeln!(out)?;
        writeln!(out, "{} ({})", category.display_name(), platforms.len())?;
        for platform in platforms {
            writeln!(
                out,
                "  {:15} {}",
                platform.name(),
                platform.platform.url_template
            )?;
        }
    }

    Ok(())
}

/// Write the export as pretty-printed JSON.
pub fn save_export(path: &Path, export: &ResultExport) -> anyhow::Result<()> {
    let contents =
        serde_json::to_string_pretty(export).context("failed to serialize scan results")?;
    fs::write(path, contents)
        .with_context(|| format!("failed to write results to {}", path.display()))?;
    Ok(())
}
