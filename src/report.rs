//! Human-readable rendering of merge and validation results for the CLI.
//!
//! Each report is a `Display` wrapper; `format_*` returns the text so it can
//! be tested and the `print_*` wrappers write it to stdout.

use std::fmt;

use crate::adequacy::{ContentOverlap, Severity, ValidationResult};
use crate::merge::MergeResult;
use crate::thresholds::{FLOOR_REQUIREMENT, REQUIREMENT_CHECKPOINTS};

pub struct MergeReport<'a>(pub &'a MergeResult);

impl fmt::Display for MergeReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let s = &result.stats;

        writeln!(f, "merge")?;
        writeln!(
            f,
            "  input: {} web, {} documents",
            s.input.web_sources, s.input.user_documents
        )?;
        writeln!(
            f,
            "  duplicates: {} found ({} exact, {} high, {} web), {} removed",
            s.duplicates.total_found,
            s.duplicates.exact,
            s.duplicates.high,
            s.duplicates.web_duplicates,
            s.duplicates.removed
        )?;
        writeln!(
            f,
            "  output: {} sources ({} documents, {} synthesis, {} web), {} starred, {} verified",
            s.output.total_sources,
            s.output.documents,
            s.output.synthesis,
            s.output.web,
            s.output.starred,
            s.output.verified
        )?;
        writeln!(
            f,
            "  words: {} total, {:.0} per source; average quality {:.2}",
            s.output.total_words, s.output.average_words_per_source, s.output.average_quality
        )?;

        if result.sources.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(
            f,
            "  {:<4} {:<10} {:>7} {:>7}  {}",
            "#", "ORIGIN", "QUALITY", "WORDS", "TITLE"
        )?;
        writeln!(f, "  {}", "-".repeat(60))?;
        for (i, src) in result.sources.iter().enumerate() {
            let star = if src.is_starred { "*" } else { "" };
            writeln!(
                f,
                "  {:<4} {:<10} {:>7.2} {:>7}  {}{}",
                i + 1,
                src.origin().as_str(),
                src.quality_score,
                src.word_count,
                src.title,
                star
            )?;
        }
        Ok(())
    }
}

pub struct ValidationReport<'a> {
    pub result: &'a ValidationResult,
    pub percentage: u8,
}

impl fmt::Display for ValidationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        let req = &result.requirement;
        let cur = &result.current;

        let verdict = if result.is_adequate {
            "adequate"
        } else {
            "inadequate"
        };
        writeln!(
            f,
            "validate {} min: {} ({}%)",
            result.duration_minutes, verdict, self.percentage
        )?;
        writeln!(f, "  words:   {:>7} / {}", cur.total_words, req.min_words)?;
        writeln!(f, "  sources: {:>7} / {}", cur.source_count, req.min_sources)?;
        writeln!(
            f,
            "  score:   {:>7.2} / {:.2}  (average quality {:.2})",
            result.score, req.min_quality, cur.average_quality
        )?;

        if !result.gaps.is_empty() {
            writeln!(f)?;
            writeln!(f, "  gaps:")?;
            for gap in &result.gaps {
                let tag = match gap.severity {
                    Severity::Critical => "CRITICAL",
                    Severity::Warning => "warning",
                };
                writeln!(f, "    [{}] {}", tag, gap.message)?;
            }
        }

        if !result.recommendations.is_empty() {
            writeln!(f)?;
            writeln!(f, "  recommendations:")?;
            for rec in &result.recommendations {
                writeln!(f, "    ({:?}) {}", rec.priority, rec.message)?;
            }
        }
        Ok(())
    }
}

pub struct OverlapReport<'a>(pub &'a [ContentOverlap]);

impl fmt::Display for OverlapReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "no overlapping sources");
        }
        writeln!(f, "{} overlapping pair(s)", self.0.len())?;
        for o in self.0 {
            writeln!(
                f,
                "  {} ~ {}  {:.0}%  {:?}",
                o.first_id,
                o.second_id,
                o.similarity * 100.0,
                o.recommendation
            )?;
        }
        Ok(())
    }
}

pub struct RequirementsReport;

impl fmt::Display for RequirementsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {:<10} {:>9} {:>8} {:>8}",
            "DURATION", "MIN WORDS", "SOURCES", "QUALITY"
        )?;
        let first = REQUIREMENT_CHECKPOINTS[0].0;
        writeln!(
            f,
            "  {:<10} {:>9} {:>8} {:>8.2}",
            format!("< {}", first),
            FLOOR_REQUIREMENT.min_words,
            FLOOR_REQUIREMENT.min_sources,
            FLOOR_REQUIREMENT.min_quality
        )?;
        for (minutes, req) in REQUIREMENT_CHECKPOINTS {
            writeln!(
                f,
                "  {:<10} {:>9} {:>8} {:>8.2}",
                format!("<= {}", minutes),
                req.min_words,
                req.min_sources,
                req.min_quality
            )?;
        }
        Ok(())
    }
}

pub fn format_merge(result: &MergeResult) -> String {
    MergeReport(result).to_string()
}

pub fn format_validation(result: &ValidationResult, percentage: u8) -> String {
    ValidationReport { result, percentage }.to_string()
}

pub fn format_overlaps(overlaps: &[ContentOverlap]) -> String {
    OverlapReport(overlaps).to_string()
}

pub fn format_requirements() -> String {
    RequirementsReport.to_string()
}

pub fn print_merge(result: &MergeResult) {
    print!("{}", MergeReport(result));
}

pub fn print_validation(result: &ValidationResult, percentage: u8) {
    print!("{}", ValidationReport { result, percentage });
}

pub fn print_overlaps(overlaps: &[ContentOverlap]) {
    print!("{}", OverlapReport(overlaps));
}

pub fn print_requirements() {
    print!("{}", RequirementsReport);
}
