//! Human-readable reports built from a [`DiagnosisResult`].
//!
//! [`sections`] turns the verdict into a format-neutral list of step
//! sections; [`markdown`] and [`html`] render that list to files in the case
//! directory.

use std::path::{Path, PathBuf};

use crate::analyzer::{
    split_lines, DiagnosisResult, DmesgStep, StatsStep, WakelockStep, MAX_REPORTED_FAILURES,
};
use crate::collector::{ArtifactMap, DMESG_FILE, DUMPSYS_SUSPEND_FILE, SUSPEND_STATS_FILE};

pub mod html;
pub mod markdown;

pub use html::HtmlRenderer;
pub use markdown::MarkdownBuilder;

/// Report file name without extension.
pub const REPORT_BASENAME: &str = "suspend_diagnosis_report";

const STATS_KEYWORDS: &[&str] = &["fail", "error", "suspend", "warning", "critical"];
const WAKELOCK_KEYWORDS: &[&str] = &["wakelock", "active", "error", "fail", "warning", "blocked"];
const DMESG_KEYWORDS: &[&str] = &["suspend", "error", "fail", "warning", "critical", "blocked"];

/// Everything a renderer needs.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    /// Case directory; reports are written here.
    pub case_dir: &'a Path,
    /// Verdict from the decision engine.
    pub result: &'a DiagnosisResult,
    /// Optional LLM narrative.
    pub narrative: Option<&'a str>,
    /// Artifact files of the case.
    pub artifacts: &'a ArtifactMap,
    /// Report timestamp as displayed.
    pub generated_at: String,
    /// Maximum raw lines per excerpt.
    pub excerpt_lines: usize,
}

impl<'a> ReportInput<'a> {
    /// Build an input stamped with the current local time.
    pub fn new(
        case_dir: &'a Path,
        result: &'a DiagnosisResult,
        narrative: Option<&'a str>,
        artifacts: &'a ArtifactMap,
        excerpt_lines: usize,
    ) -> Self {
        Self {
            case_dir,
            result,
            narrative,
            artifacts,
            generated_at: chrono::Local::now().to_rfc3339(),
            excerpt_lines,
        }
    }

    /// Path of the report with the given extension.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        self.case_dir.join(format!("{REPORT_BASENAME}.{extension}"))
    }
}

/// How a step came out, for badge rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// The step found nothing wrong.
    Pass,
    /// The step found a problem.
    Fail,
    /// The step could not be evaluated.
    Warn,
    /// The step was never reached.
    NotRun,
}

impl StepStatus {
    /// Emoji badge used in Markdown.
    pub fn badge(self) -> &'static str {
        match self {
            Self::Pass => "\u{2705}",
            Self::Fail => "\u{274c}",
            Self::Warn => "\u{26a0}\u{fe0f}",
            Self::NotRun => "\u{23ed}\u{fe0f}",
        }
    }

    /// CSS class used in HTML.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Warn => "warn",
            Self::NotRun => "skipped",
        }
    }
}

/// One bullet under a step result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bullet {
    /// Prose.
    Text(String),
    /// Verbatim identifier or log line.
    Code(String),
}

/// Keyword-filtered raw lines from an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excerpt {
    /// Heading for the excerpt block.
    pub title: &'static str,
    /// Selected lines.
    pub lines: Vec<String>,
    /// Whether lines were left out.
    pub truncated: bool,
}

/// Format-neutral content of one diagnosis step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSection {
    /// Section heading.
    pub title: &'static str,
    /// What the step checks.
    pub purpose: &'static str,
    /// Device source and artifact file.
    pub source: &'static str,
    /// Outcome badge.
    pub status: StepStatus,
    /// One-line outcome.
    pub headline: String,
    /// Supporting details.
    pub bullets: Vec<Bullet>,
    /// Raw log excerpt, when the step is implicated.
    pub excerpt: Option<Excerpt>,
}

/// Build the three step sections for a report.
pub fn sections(input: &ReportInput<'_>) -> Vec<StepSection> {
    vec![
        stats_section(input),
        wakelock_section(input),
        dmesg_section(input),
    ]
}

fn stats_section(input: &ReportInput<'_>) -> StepSection {
    let mut section = StepSection {
        title: "Step 1: Suspend Statistics Check",
        purpose: "Check if suspend succeeded or failed",
        source: "`/d/suspend_stats` \u{2192} `suspend_stats.txt`",
        status: StepStatus::NotRun,
        headline: "Step not performed".to_owned(),
        bullets: Vec::new(),
        excerpt: None,
    };

    match &input.result.step_results.stats {
        Some(StatsStep::Parsed { stats, message }) if stats.is_healthy() => {
            section.status = StepStatus::Pass;
            section.headline = "Suspend is working normally".to_owned();
            section.bullets = vec![
                Bullet::Text(message.clone()),
                Bullet::Text("Analysis stops here - no further investigation needed".to_owned()),
            ];
        }
        Some(StatsStep::Parsed { message, .. }) => {
            section.status = StepStatus::Fail;
            section.headline = "Suspend has failures".to_owned();
            section.bullets = vec![
                Bullet::Text(message.clone()),
                Bullet::Text("Continue to Step 2 - check for wakelocks".to_owned()),
            ];
            section.excerpt = excerpt(
                input,
                SUSPEND_STATS_FILE,
                "Raw Suspend Stats (key excerpt)",
                STATS_KEYWORDS,
            );
        }
        Some(StatsStep::Unavailable) => {
            section.status = StepStatus::Warn;
            section.headline = "Unable to determine suspend status".to_owned();
            section.bullets = vec![Bullet::Text(
                "suspend_stats not available - suspend is assumed to be failing".to_owned(),
            )];
        }
        None => {}
    }

    section
}

fn wakelock_section(input: &ReportInput<'_>) -> StepSection {
    let mut section = StepSection {
        title: "Step 2: Wakelock Analysis",
        purpose: "Check for active wakelocks preventing suspend",
        source: "`dumpsys suspend_control_internal` \u{2192} `dumpsys_suspend.txt`",
        status: StepStatus::NotRun,
        headline: "Not performed - analysis concluded at an earlier step".to_owned(),
        bullets: Vec::new(),
        excerpt: None,
    };

    match &input.result.step_results.wakelocks {
        Some(WakelockStep::Unavailable) => {
            section.status = StepStatus::Warn;
            section.headline = "Wakelock dump not available".to_owned();
            section.bullets = vec![Bullet::Text("Wakelock analysis skipped".to_owned())];
        }
        Some(WakelockStep::Parsed { active }) if !active.is_empty() => {
            section.status = StepStatus::Fail;
            section.headline = "Active wakelocks found (ROOT CAUSE)".to_owned();
            section.bullets = active
                .iter()
                .map(|record| Bullet::Code(record.name.clone()))
                .collect();
            section.bullets.push(Bullet::Text(
                "Analysis stops here - root cause identified".to_owned(),
            ));
            section.excerpt = excerpt(
                input,
                DUMPSYS_SUSPEND_FILE,
                "Raw Wakelock Dump (key excerpt)",
                WAKELOCK_KEYWORDS,
            );
        }
        Some(WakelockStep::Parsed { .. }) => {
            section.status = StepStatus::Pass;
            section.headline = "No active wakelocks found".to_owned();
            section.bullets = vec![
                Bullet::Text("All wakelocks are inactive".to_owned()),
                Bullet::Text("Continue to Step 3 - check kernel logs".to_owned()),
            ];
        }
        None => {}
    }

    section
}

fn dmesg_section(input: &ReportInput<'_>) -> StepSection {
    let mut section = StepSection {
        title: "Step 3: Kernel Log Analysis",
        purpose: "Check for suspend entry and failure details",
        source: "`dmesg -T` \u{2192} `dmesg.txt`",
        status: StepStatus::NotRun,
        headline: "Not performed - analysis concluded at an earlier step".to_owned(),
        bullets: Vec::new(),
        excerpt: None,
    };

    match &input.result.step_results.dmesg {
        Some(DmesgStep::Unavailable) => {
            section.status = StepStatus::Warn;
            section.headline = "Kernel log not available".to_owned();
            section.bullets = vec![Bullet::Text("Kernel log analysis skipped".to_owned())];
        }
        Some(DmesgStep::Analyzed(finding)) if !finding.has_suspend_entry => {
            section.status = StepStatus::Fail;
            section.headline = "No suspend entry found".to_owned();
            section.bullets = vec![
                Bullet::Text("System did not attempt to enter suspend".to_owned()),
                Bullet::Text("Check if suspend is triggered properly".to_owned()),
            ];
            section.excerpt = excerpt(input, DMESG_FILE, "Raw dmesg (key excerpt)", DMESG_KEYWORDS);
        }
        Some(DmesgStep::Analyzed(finding)) if finding.has_suspend_failure => {
            section.status = StepStatus::Fail;
            section.headline = "Suspend entry failed in kernel".to_owned();
            section.bullets = finding
                .failure_messages
                .iter()
                .take(MAX_REPORTED_FAILURES)
                .map(|message| Bullet::Code(message.clone()))
                .collect();
            section.excerpt = excerpt(input, DMESG_FILE, "Raw dmesg (key excerpt)", DMESG_KEYWORDS);
        }
        Some(DmesgStep::Analyzed(_)) => {
            section.status = StepStatus::Pass;
            section.headline = "Suspend entry found, no clear failures".to_owned();
            section.bullets = vec![
                Bullet::Text("Suspend process appears normal in kernel logs".to_owned()),
                Bullet::Text("Root cause may be elsewhere".to_owned()),
            ];
        }
        None => {}
    }

    section
}

/// Follow-up steps for the reader.
pub fn checklist(failed: bool) -> (&'static str, &'static [&'static str]) {
    if failed {
        (
            "After fixing the identified issue:",
            &[
                "**Re-run diagnosis**: Collect new evidence and verify the issue is resolved",
                "**Check suspend_stats**: Verify success count increases and fail count remains 0",
                "**Check wakelocks**: Ensure no active wakelocks in dumpsys output",
                "**Measure power**: Compare power consumption before/after fix (expect \u{2265}3% reduction)",
            ],
        )
    } else {
        (
            "Suspend appears to be working normally:",
            &[
                "**Monitor**: Continue monitoring suspend_stats for any new failures",
                "**Power measurement**: Verify actual power consumption meets expectations",
                "**Stress test**: Test under various conditions (charging, apps running, etc.)",
            ],
        )
    }
}

/// Summary line shown under the step sections.
pub fn summary_conclusion(result: &DiagnosisResult) -> &str {
    result
        .conclusion
        .as_deref()
        .unwrap_or("No definitive root cause detected; see the analysis above.")
}

fn excerpt(
    input: &ReportInput<'_>,
    artifact: &str,
    title: &'static str,
    keywords: &[&str],
) -> Option<Excerpt> {
    let path = input.artifacts.get(artifact)?;
    let bytes = std::fs::read(path).ok()?;
    let raw = String::from_utf8_lossy(&bytes);
    let (lines, truncated) = select_lines(&raw, keywords, input.excerpt_lines);
    if lines.is_empty() {
        return None;
    }
    Some(Excerpt {
        title,
        lines,
        truncated,
    })
}

/// Pick up to `max_lines` lines mentioning any keyword (case-insensitive),
/// falling back to the first `max_lines` lines when none match.
///
/// The flag is set when fewer lines were selected than the text contains.
pub fn select_lines(raw: &str, keywords: &[&str], max_lines: usize) -> (Vec<String>, bool) {
    let all: Vec<&str> = split_lines(raw).collect();
    let matching: Vec<&str> = all
        .iter()
        .copied()
        .filter(|line| {
            let lowered = line.to_lowercase();
            keywords.iter().any(|k| lowered.contains(k))
        })
        .collect();

    let source = if matching.is_empty() { &all } else { &matching };
    let selected: Vec<String> = source
        .iter()
        .take(max_lines)
        .map(|line| (*line).to_owned())
        .collect();
    let truncated = selected.len() < all.len();
    (selected, truncated)
}
