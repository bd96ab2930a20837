//! Markdown report.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use super::{checklist, sections, summary_conclusion, Bullet, ReportInput, StepSection};

/// Writes `suspend_diagnosis_report.md` into the case directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownBuilder;

impl MarkdownBuilder {
    /// Render and write the report, returning its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn build(&self, input: &ReportInput<'_>) -> anyhow::Result<PathBuf> {
        let path = input.output_path("md");
        std::fs::write(&path, self.render(input))
            .with_context(|| format!("failed to write markdown report {}", path.display()))?;
        info!(path = %path.display(), "markdown report written");
        Ok(path)
    }

    /// Render the report text.
    pub fn render(&self, input: &ReportInput<'_>) -> String {
        let result = input.result;
        let mut md = String::new();

        md.push_str("# Suspend Diagnosis Report\n\n");
        let _ = writeln!(md, "**Collection Directory**: `{}`  ", input.case_dir.display());
        let _ = writeln!(md, "**Time**: {}\n", input.generated_at);
        md.push_str("---\n\n");

        if result.failed {
            md.push_str("## \u{1f534} CONCLUSION: Suspend Failure Detected\n\n");
        } else {
            md.push_str("## \u{1f7e2} CONCLUSION: Suspend Working Normally\n\n");
        }
        if let Some(conclusion) = &result.conclusion {
            let _ = writeln!(md, "**Root Cause**: {conclusion}\n");
        }
        md.push_str("---\n\n");

        for section in sections(input) {
            render_section(&mut md, &section);
            md.push_str("---\n\n");
        }

        md.push_str("## \u{1f4cb} Summary\n");
        let _ = writeln!(md, "**Conclusion**: {}\n", summary_conclusion(result));
        md.push_str("---\n\n");

        if let Some(narrative) = input.narrative {
            md.push_str("## \u{1f916} AI Comprehensive Analysis\n\n");
            md.push_str(narrative);
            md.push_str("\n\n---\n\n");
        }

        md.push_str("## \u{1f4c1} Evidence Files\n\n");
        for artifact in input.artifacts.iter() {
            let _ = writeln!(md, "- **{}**: `{}`", artifact.name, artifact.path.display());
        }

        md.push_str("\n---\n\n");
        md.push_str("## \u{2705} Verification Checklist\n\n");
        let (lead, items) = checklist(result.failed);
        let _ = writeln!(md, "{lead}\n");
        for (idx, item) in items.iter().enumerate() {
            let _ = writeln!(md, "{}. {item}", idx.saturating_add(1));
        }

        md
    }
}

fn render_section(md: &mut String, section: &StepSection) {
    let _ = writeln!(md, "## {}", section.title);
    let _ = writeln!(md, "**Purpose**: {}  ", section.purpose);
    let _ = writeln!(md, "**File**: {}\n", section.source);
    let _ = writeln!(
        md,
        "{} **Result**: {}",
        section.status.badge(),
        section.headline
    );
    for bullet in &section.bullets {
        match bullet {
            Bullet::Text(text) => {
                let _ = writeln!(md, "- {text}");
            }
            Bullet::Code(code) => {
                let _ = writeln!(md, "- `{code}`");
            }
        }
    }
    md.push('\n');

    if let Some(excerpt) = &section.excerpt {
        let _ = writeln!(md, "### {}", excerpt.title);
        md.push_str("```text\n");
        md.push_str(&excerpt.lines.join("\n"));
        if excerpt.truncated {
            md.push_str("\n... (truncated)");
        }
        md.push_str("\n```\n\n");
    }
}
