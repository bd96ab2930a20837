//! Wakelock table parsing tests.

use suspend_doctor::analyzer::parse_active_wakelocks;

const TABLE: &str = "\
WAKELOCK STATS:
|----------------------|------|--------|----------|-------|
| NAME                 | PID  | TYPE   | STATUS   | COUNT |
|----------------------|------|--------|----------|-------|
| PowerManagerService  | 1234 | Kernel | Active   | 12    |
| audio_hal            | 99   | Native | Inactive | 3     |
| NETLINK              | 0    | Kernel | Active   | 1     |
";

fn names(text: &str) -> Vec<String> {
    parse_active_wakelocks(text)
        .into_iter()
        .map(|record| record.name)
        .collect()
}

#[test]
fn extracts_active_rows_in_table_order() {
    assert_eq!(names(TABLE), vec!["PowerManagerService", "NETLINK"]);
}

#[test]
fn records_are_marked_active() {
    let records = parse_active_wakelocks(TABLE);
    assert!(records.iter().all(|record| record.is_active));
}

#[test]
fn inactive_only_table_yields_nothing() {
    let table = "| NAME | PID | TYPE | STATUS |\n| foo | 1 | Kernel | Inactive |\n";
    assert!(names(table).is_empty());
}

#[test]
fn active_outside_status_column_is_ignored() {
    let table = "| ActiveThing | 1 | Kernel | Inactive | x |\n";
    assert!(names(table).is_empty());
}

#[test]
fn rows_with_too_few_columns_are_ignored() {
    assert!(names("| foo | Active |\n").is_empty());
}

#[test]
fn header_and_section_names_are_rejected() {
    let table = "\
| name | PID | TYPE | Active | 0 |
| Wakelock Stats | - | - | Active | - |
| ---- | - | - | Active | - |
|  | 1 | Kernel | Active | 1 |
";
    assert!(names(table).is_empty());
}

#[test]
fn names_are_trimmed() {
    let table = "   |   wlan_rx_wake   | 7 | Kernel |  Active  | 2 |   \n";
    assert_eq!(names(table), vec!["wlan_rx_wake"]);
}

#[test]
fn empty_text_yields_nothing() {
    assert!(parse_active_wakelocks("").is_empty());
}
