//! Markdown report tests.

use std::fs;

use suspend_doctor::analyzer::{diagnose, DiagnosisResult};
use suspend_doctor::collector::{load_existing, read_evidence, Case};
use suspend_doctor::report::{MarkdownBuilder, ReportInput};

const FAILING_DMESG: &str = "\
[ 1.0] PM: suspend entry (deep)
[ 1.1] PM: suspend entry failed -16
[ 2.1] PM: suspend entry failed -16
[ 3.1] PM: Some devices failed to suspend
[ 4.1] PM: suspend entry failed -11
";

fn case_with(files: &[(&str, &str)]) -> (tempfile::TempDir, Case, DiagnosisResult) {
    let dir = tempfile::tempdir().expect("should create temp dir");
    for (name, body) in files {
        fs::write(dir.path().join(name), body).expect("should write artifact");
    }
    let case = load_existing(dir.path()).expect("case should load");
    let result = diagnose(&read_evidence(&case.artifacts));
    (dir, case, result)
}

fn render(case: &Case, result: &DiagnosisResult, narrative: Option<&str>) -> String {
    let input = ReportInput::new(&case.dir, result, narrative, &case.artifacts, 20);
    MarkdownBuilder.render(&input)
}

#[test]
fn kernel_failure_report_names_root_cause_and_caps_messages() {
    let (_dir, case, result) = case_with(&[
        ("suspend_stats.txt", "success: 0\nfail: 4\n"),
        ("dumpsys_suspend.txt", "| NAME | PID | TYPE | STATUS |\n"),
        ("dmesg.txt", FAILING_DMESG),
    ]);
    let md = render(&case, &result, None);

    assert!(md.starts_with("# Suspend Diagnosis Report"));
    assert!(md.contains("CONCLUSION: Suspend Failure Detected"));
    assert!(md.contains("**Root Cause**: Root cause: Suspend entry failed in kernel"));
    assert!(md.contains("Suspend entry failed in kernel"));

    let quoted = md
        .lines()
        .filter(|line| line.starts_with("- `[") && line.contains("failed"))
        .count();
    assert_eq!(quoted, 3);
    assert!(!md.contains("- `[ 4.1] PM: suspend entry failed -11`"));

    assert!(md.contains("### Raw dmesg (key excerpt)"));
    assert!(md.contains("```text"));
    assert!(!md.contains("AI Comprehensive Analysis"));
}

#[test]
fn healthy_report_skips_later_steps() {
    let (_dir, case, result) = case_with(&[("suspend_stats.txt", "success: 8\nfail: 0\n")]);
    let md = render(&case, &result, None);

    assert!(md.contains("CONCLUSION: Suspend Working Normally"));
    assert!(md.contains("Suspend is working normally. No further analysis needed."));
    assert!(md.contains("Not performed - analysis concluded at an earlier step"));
    assert!(md.contains("Suspend appears to be working normally:"));
    assert!(!md.contains("```text"));
}

#[test]
fn wakelock_report_lists_lock_names() {
    let (_dir, case, result) = case_with(&[
        ("suspend_stats.txt", "success: 0\nfail: 1\n"),
        (
            "dumpsys_suspend.txt",
            "| NAME | PID | TYPE | STATUS | N |\n| PowerManagerService | 1 | Kernel | Active | 2 |\n",
        ),
    ]);
    let md = render(&case, &result, None);
    assert!(md.contains("Active wakelocks found (ROOT CAUSE)"));
    assert!(md.contains("- `PowerManagerService`"));
    assert!(md.contains("### Raw Wakelock Dump (key excerpt)"));
}

#[test]
fn narrative_and_evidence_files_are_listed() {
    let (_dir, case, result) = case_with(&[
        ("suspend_stats.txt", "success: 0\nfail: 1\n"),
        ("dmesg.txt", "PM: suspend entry\n"),
    ]);
    let md = render(&case, &result, Some("## Suspend Status\nFailing."));

    assert!(md.contains("AI Comprehensive Analysis"));
    assert!(md.contains("## Suspend Status\nFailing."));
    assert!(md.contains("- **suspend_stats.txt**:"));
    assert!(md.contains("- **dmesg.txt**:"));
    assert!(!md.contains("- **dumpsys_suspend.txt**:"));
    assert!(md.contains("Wakelock dump not available"));
}

#[test]
fn missing_everything_has_fallback_summary() {
    let (_dir, case, result) = case_with(&[]);
    let md = render(&case, &result, None);
    assert!(md.contains("No definitive root cause detected"));
    assert!(!md.contains("**Root Cause**"));
    assert!(md.contains("Unable to determine suspend status"));
}

#[test]
fn build_writes_report_into_case_dir() {
    let (_dir, case, result) = case_with(&[("suspend_stats.txt", "success: 1\nfail: 0\n")]);
    let input = ReportInput::new(&case.dir, &result, None, &case.artifacts, 20);
    let path = match MarkdownBuilder.build(&input) {
        Ok(path) => path,
        Err(err) => panic!("report should be written: {err:#}"),
    };
    assert_eq!(path, case.dir.join("suspend_diagnosis_report.md"));

    let written = fs::read_to_string(&path).expect("report should be readable");
    assert!(written.contains("Suspend Working Normally"));
}
