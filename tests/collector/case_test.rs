//! Case directory loading and evidence reading tests.

use std::fs;

use suspend_doctor::collector::{
    load_existing, read_evidence, ArtifactMap, CollectError, ARTIFACT_FILES, DMESG_FILE,
    DUMPSYS_SUSPEND_FILE, SUSPEND_STATS_FILE,
};

fn temp_dir() -> tempfile::TempDir {
    match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(err) => panic!("tempdir should be created: {err}"),
    }
}

#[test]
fn load_existing_lists_only_present_files_in_step_order() {
    let dir = temp_dir();
    fs::write(dir.path().join(DMESG_FILE), "PM: suspend entry\n").expect("write dmesg");
    fs::write(dir.path().join(SUSPEND_STATS_FILE), "success: 1\n").expect("write stats");
    fs::write(dir.path().join("notes.txt"), "unrelated").expect("write notes");

    let case = match load_existing(dir.path()) {
        Ok(case) => case,
        Err(err) => panic!("case should load: {err}"),
    };

    let names: Vec<&str> = case.artifacts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec![SUSPEND_STATS_FILE, DMESG_FILE]);
    assert!(case.artifacts.get(DUMPSYS_SUSPEND_FILE).is_none());
    assert!(case.dir.is_absolute());
    assert!(case.artifacts.iter().all(|a| a.path.is_absolute()));
}

#[test]
fn load_existing_rejects_missing_directory() {
    let dir = temp_dir();
    let missing = dir.path().join("does-not-exist");
    let result = load_existing(&missing);
    assert!(matches!(result, Err(CollectError::MissingCase(_))));
}

#[test]
fn empty_case_directory_has_no_artifacts() {
    let dir = temp_dir();
    let case = load_existing(dir.path()).expect("case should load");
    assert!(case.artifacts.is_empty());

    let evidence = read_evidence(&case.artifacts);
    assert!(evidence.stats.is_empty());
    assert!(evidence.wakelocks.is_empty());
    assert!(evidence.dmesg.is_empty());
}

#[test]
fn read_evidence_maps_files_to_fields() {
    let dir = temp_dir();
    for (name, body) in ARTIFACT_FILES.iter().zip(["stats", "wakelocks", "dmesg"]) {
        fs::write(dir.path().join(name), body).expect("write artifact");
    }

    let case = load_existing(dir.path()).expect("case should load");
    assert_eq!(case.artifacts.len(), 3);

    let evidence = read_evidence(&case.artifacts);
    assert_eq!(evidence.stats, "stats");
    assert_eq!(evidence.wakelocks, "wakelocks");
    assert_eq!(evidence.dmesg, "dmesg");
}

#[test]
fn read_evidence_replaces_invalid_utf8() {
    let dir = temp_dir();
    let path = dir.path().join(DMESG_FILE);
    fs::write(&path, [b'o', b'k', 0xff, b'!']).expect("write dmesg");

    let mut artifacts = ArtifactMap::default();
    artifacts.insert(DMESG_FILE, path);
    let evidence = read_evidence(&artifacts);
    assert_eq!(evidence.dmesg, "ok\u{fffd}!");
}

#[test]
fn unreadable_artifact_reads_as_empty() {
    let dir = temp_dir();
    let mut artifacts = ArtifactMap::default();
    artifacts.insert(SUSPEND_STATS_FILE, dir.path().join("gone.txt"));
    assert!(read_evidence(&artifacts).stats.is_empty());
}

#[test]
fn artifact_map_insert_replaces_same_name() {
    let dir = temp_dir();
    let mut artifacts = ArtifactMap::default();
    artifacts.insert(DMESG_FILE, dir.path().join("a"));
    artifacts.insert(DMESG_FILE, dir.path().join("b"));
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts.get(DMESG_FILE), Some(dir.path().join("b").as_path()));
}
