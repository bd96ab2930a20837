//! Suspend Doctor CLI entry point.
//!
//! Provides `collect` and `analyze` subcommands: capture fresh evidence from
//! a device over adb, or re-run the diagnosis over an existing case
//! directory. Both write Markdown and HTML reports into the case directory.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use suspend_doctor::analyzer::{diagnose, DiagnosisResult};
use suspend_doctor::collector::{load_existing, read_evidence, AdbCollector, Case};
use suspend_doctor::config::{load_or_default, Config};
use suspend_doctor::logging;
use suspend_doctor::narrative::NarrativeReporter;
use suspend_doctor::report::{HtmlRenderer, MarkdownBuilder, ReportInput};

/// Suspend Doctor: find out why an Android device does not suspend.
#[derive(Parser)]
#[command(name = "suspend-doctor", version, about)]
struct Cli {
    /// Config file (default: ~/.suspend-doctor/config.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Capture evidence from a device over adb and diagnose it.
    Collect {
        /// adb executable.
        #[arg(long)]
        adb: Option<String>,
        /// Device serial passed to `adb -s`.
        #[arg(long)]
        device: Option<String>,
        /// Parent directory for the new case directory.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Skip the LLM narrative.
        #[arg(long)]
        no_ai: bool,
        /// Print the verdict as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
    /// Diagnose an existing case directory.
    Analyze {
        /// Case directory holding the captured artifacts.
        dir: PathBuf,
        /// Skip the LLM narrative.
        #[arg(long)]
        no_ai: bool,
        /// Print the verdict as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
}

/// Output switches shared by both subcommands.
struct RunOptions {
    no_ai: bool,
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_or_default(cli.config.as_deref()).context("failed to load config")?;

    match cli.command {
        Command::Collect {
            adb,
            device,
            out,
            no_ai,
            json,
        } => {
            if let Some(adb) = adb {
                config.adb.path = adb;
            }
            if let Some(device) = device {
                config.adb.device = device;
            }
            if let Some(out) = out {
                config.output.dir = out;
            }
            config.validate()?;
            handle_collect(&config, RunOptions { no_ai, json }).await
        }
        Command::Analyze { dir, no_ai, json } => {
            handle_analyze(&config, &dir, RunOptions { no_ai, json }).await
        }
    }
}

/// Capture a new case from the device, then diagnose it.
async fn handle_collect(config: &Config, opts: RunOptions) -> anyhow::Result<()> {
    let collector = AdbCollector::new(&config.adb, config.output.dir.clone());
    let case_dir = collector
        .create_case_dir()
        .context("failed to create case directory")?;
    let _logging_guard = logging::init_with_case_log(&case_dir)?;

    let case = collector
        .collect_into(case_dir)
        .await
        .context("evidence collection failed")?;
    run_pipeline(config, &case, &opts).await
}

/// Diagnose a previously captured case directory.
async fn handle_analyze(config: &Config, dir: &Path, opts: RunOptions) -> anyhow::Result<()> {
    let case = match load_existing(dir) {
        Ok(case) => case,
        Err(e) => {
            logging::init_cli();
            return Err(e).with_context(|| format!("cannot analyze {}", dir.display()));
        }
    };
    let _logging_guard = logging::init_with_case_log(&case.dir)?;

    if case.artifacts.is_empty() {
        warn!(case_dir = %case.dir.display(), "no artifact files found in case directory");
    }
    run_pipeline(config, &case, &opts).await
}

/// Diagnose, narrate and report on a loaded case.
async fn run_pipeline(config: &Config, case: &Case, opts: &RunOptions) -> anyhow::Result<()> {
    let evidence = read_evidence(&case.artifacts);
    let result = diagnose(&evidence);
    info!(
        failed = result.failed,
        conclusion = result.conclusion.as_deref().unwrap_or("none"),
        "diagnosis complete"
    );

    let narrative = if config.narrative.enabled && !opts.no_ai {
        match NarrativeReporter::from_config(&config.narrative) {
            Ok(reporter) => reporter.generate(&evidence).await,
            Err(e) => {
                warn!(error = %e, "narrative provider unavailable");
                None
            }
        }
    } else {
        None
    };

    let input = ReportInput::new(
        &case.dir,
        &result,
        narrative.as_deref(),
        &case.artifacts,
        config.report.excerpt_lines,
    );
    let markdown = MarkdownBuilder.build(&input)?;
    let html = HtmlRenderer.render(&input)?;

    print_outcome(&result, &markdown, &html, opts.json)
}

fn print_outcome(
    result: &DiagnosisResult,
    markdown: &Path,
    html: &Path,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let text =
            serde_json::to_string_pretty(result).context("failed to serialize diagnosis")?;
        println!("{text}");
        return Ok(());
    }

    if result.failed {
        println!("Suspend failure detected");
    } else {
        println!("Suspend working normally");
    }
    for reason in &result.reasons {
        println!("{reason}");
    }
    if let Some(conclusion) = &result.conclusion {
        println!("\n{conclusion}");
    }
    println!("\nMarkdown report: {}", markdown.display());
    println!("HTML report:     {}", html.display());
    Ok(())
}
