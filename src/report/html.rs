//! Standalone HTML report.
//!
//! Rendered from the same sections as the Markdown report. All evidence and
//! narrative text is escaped; the narrative is shown preformatted.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use super::{checklist, sections, summary_conclusion, Bullet, ReportInput, StepSection};

const STYLE: &str = "\
body {font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif; line-height: 1.6; color: #333; background: #f5f7fa; padding: 2rem;}
.container {max-width: 1200px; margin: 0 auto; background: white; padding: 2rem; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1);}
h1 {color: #1a202c; border-bottom: 3px solid #3182ce; padding-bottom: 0.5rem;}
h2, h3 {color: #2c3e50;}
pre {background: #f8f8f8; padding: 1rem; overflow: auto;}
code {background: #edf2f7; padding: 0 0.25rem; border-radius: 3px;}
.verdict {padding: 1rem; border-radius: 6px; font-weight: bold;}
.verdict.failed {background: #fed7d7; color: #9b2c2c;}
.verdict.ok {background: #c6f6d5; color: #22543d;}
.badge {display: inline-block; padding: 0 0.5rem; border-radius: 4px; font-size: 0.85rem; text-transform: uppercase;}
.badge.pass {background: #c6f6d5;}
.badge.fail {background: #fed7d7;}
.badge.warn {background: #fefcbf;}
.badge.skipped {background: #e2e8f0;}
";

/// Writes `suspend_diagnosis_report.html` into the case directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Render and write the report, returning its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn render(&self, input: &ReportInput<'_>) -> anyhow::Result<PathBuf> {
        let path = input.output_path("html");
        std::fs::write(&path, self.document(input))
            .with_context(|| format!("failed to write html report {}", path.display()))?;
        info!(path = %path.display(), "html report written");
        Ok(path)
    }

    /// Render the full HTML document.
    pub fn document(&self, input: &ReportInput<'_>) -> String {
        let result = input.result;
        let mut body = String::new();

        body.push_str("<h1>Suspend Diagnosis Report</h1>\n");
        let _ = writeln!(
            body,
            "<p><strong>Collection Directory</strong>: <code>{}</code><br>\n<strong>Time</strong>: {}</p>",
            escape(&input.case_dir.display().to_string()),
            escape(&input.generated_at)
        );

        let (class, verdict) = if result.failed {
            ("failed", "Suspend Failure Detected")
        } else {
            ("ok", "Suspend Working Normally")
        };
        let _ = writeln!(body, "<div class=\"verdict {class}\">CONCLUSION: {verdict}</div>");
        if let Some(conclusion) = &result.conclusion {
            let _ = writeln!(body, "<p><strong>Root Cause</strong>: {}</p>", escape(conclusion));
        }

        for section in sections(input) {
            render_section(&mut body, &section);
        }

        body.push_str("<h2>Summary</h2>\n");
        let _ = writeln!(
            body,
            "<p><strong>Conclusion</strong>: {}</p>",
            escape(summary_conclusion(result))
        );

        if let Some(narrative) = input.narrative {
            body.push_str("<h2>AI Comprehensive Analysis</h2>\n");
            let _ = writeln!(body, "<pre class=\"narrative\">{}</pre>", escape(narrative));
        }

        body.push_str("<h2>Evidence Files</h2>\n<ul>\n");
        for artifact in input.artifacts.iter() {
            let _ = writeln!(
                body,
                "<li><strong>{}</strong>: <code>{}</code></li>",
                escape(&artifact.name),
                escape(&artifact.path.display().to_string())
            );
        }
        body.push_str("</ul>\n");

        body.push_str("<h2>Verification Checklist</h2>\n");
        let (lead, items) = checklist(result.failed);
        let _ = writeln!(body, "<p>{}</p>\n<ol>", escape(lead));
        for item in items {
            let _ = writeln!(body, "<li>{}</li>", bold_markup(item));
        }
        body.push_str("</ol>\n");

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             <title>Suspend Diagnosis Report</title>\n<style>\n{STYLE}</style>\n</head>\n\
             <body>\n<div class=\"container\">\n{body}</div>\n</body>\n</html>\n"
        )
    }
}

fn render_section(body: &mut String, section: &StepSection) {
    let _ = writeln!(body, "<h2>{}</h2>", escape(section.title));
    let _ = writeln!(
        body,
        "<p><strong>Purpose</strong>: {}<br>\n<strong>File</strong>: {}</p>",
        escape(section.purpose),
        code_markup(section.source)
    );
    let _ = writeln!(
        body,
        "<p><span class=\"badge {}\">{}</span> <strong>Result</strong>: {}</p>",
        section.status.css_class(),
        section.status.css_class(),
        escape(&section.headline)
    );

    if !section.bullets.is_empty() {
        body.push_str("<ul>\n");
        for bullet in &section.bullets {
            match bullet {
                Bullet::Text(text) => {
                    let _ = writeln!(body, "<li>{}</li>", escape(text));
                }
                Bullet::Code(code) => {
                    let _ = writeln!(body, "<li><code>{}</code></li>", escape(code));
                }
            }
        }
        body.push_str("</ul>\n");
    }

    if let Some(excerpt) = &section.excerpt {
        let _ = writeln!(body, "<h3>{}</h3>", escape(excerpt.title));
        let mut text = excerpt.lines.join("\n");
        if excerpt.truncated {
            text.push_str("\n... (truncated)");
        }
        let _ = writeln!(body, "<pre>{}</pre>", escape(&text));
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape, then turn `` `x` `` spans into `<code>` elements.
fn code_markup(text: &str) -> String {
    toggle_markup(&escape(text), "`", "code")
}

/// Escape, then turn `**x**` spans into `<strong>` elements.
fn bold_markup(text: &str) -> String {
    toggle_markup(&escape(text), "**", "strong")
}

fn toggle_markup(text: &str, delimiter: &str, tag: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut inside = false;
    for part in text.split(delimiter) {
        if inside {
            let _ = write!(out, "<{tag}>{part}</{tag}>");
        } else {
            out.push_str(part);
        }
        inside = !inside;
    }
    out
}
