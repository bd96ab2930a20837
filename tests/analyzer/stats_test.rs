//! `suspend_stats` parsing tests.

use suspend_doctor::analyzer::{parse_stats, SuspendStats};

#[test]
fn parses_success_and_fail_counters() {
    let stats = parse_stats("success: 42\nfail: 3\nfailed_freeze: 1\n");
    assert_eq!(
        stats,
        SuspendStats {
            success_count: 42,
            fail_count: 3,
        }
    );
    assert!(!stats.is_healthy());
}

#[test]
fn non_numeric_value_counts_as_zero() {
    let stats = parse_stats("success:abc\nfail:0");
    assert_eq!(stats.success_count, 0);
    assert_eq!(stats.fail_count, 0);
}

#[test]
fn missing_keys_default_to_zero() {
    let stats = parse_stats("failed_suspend: 7\nlast_failed_dev: mmc0\n");
    assert_eq!(stats, SuspendStats::default());
}

#[test]
fn keys_are_case_sensitive() {
    let stats = parse_stats("Success: 5\nFAIL: 2");
    assert_eq!(stats, SuspendStats::default());
}

#[test]
fn repeated_key_keeps_last_value() {
    let stats = parse_stats("success: 1\nsuccess: 9\n");
    assert_eq!(stats.success_count, 9);
}

#[test]
fn lines_without_colon_are_ignored() {
    let stats = parse_stats("garbage line\nsuccess 4\nsuccess: 2\n");
    assert_eq!(stats.success_count, 2);
}

#[test]
fn zero_successes_is_not_healthy() {
    let stats = parse_stats("success: 0\nfail: 0");
    assert!(!stats.is_healthy());
}

#[test]
fn summary_reports_counts() {
    let healthy = parse_stats("success: 3\nfail: 0");
    assert_eq!(
        healthy.summary(),
        "Suspend is working normally (success: 3, fail: 0)"
    );

    let failing = parse_stats("success: 0\nfail: 2");
    assert_eq!(failing.summary(), "Suspend has failures (success: 0, fail: 2)");
}

#[test]
fn negative_fail_counter_is_not_healthy() {
    let stats = parse_stats("success: 5\nfail: -1\n");
    assert_eq!(stats.fail_count, -1);
    assert!(!stats.is_healthy());
    assert_eq!(stats.summary(), "Suspend has failures (success: 5, fail: -1)");
}

#[test]
fn oversized_counters_saturate() {
    let stats = parse_stats("success: 18446744073709551616\nfail: 18446744073709551616\n");
    assert_eq!(stats.success_count, i64::MAX);
    assert_eq!(stats.fail_count, i64::MAX);
    assert!(!stats.is_healthy());

    let stats = parse_stats("success: 18446744073709551616\nfail: 0\n");
    assert!(stats.is_healthy());
}

#[test]
fn negative_success_counter_is_not_healthy() {
    assert!(!parse_stats("success: -3\nfail: 0").is_healthy());
}

#[test]
fn carriage_return_line_endings_are_split() {
    let stats = parse_stats("success: 4\rfail: 2\r");
    assert_eq!(
        stats,
        SuspendStats {
            success_count: 4,
            fail_count: 2,
        }
    );
}
