//! CLI tests for namegen

use assert_cmd::Command;

#[test]
fn test_help_runs() {
    Command::cargo_bin("namegen")
        .unwrap()
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn test_version_runs() {
    Command::cargo_bin("namegen")
        .unwrap()
        .arg("--version")
        .assert()
        .success();
}

#[test]
fn test_tree_is_materialized() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("namegen")
        .unwrap()
        .arg(dir.path())
        .assert()
        .success();

    let tree = dir.path().join("challenging-names");
    let entries = std::fs::read_dir(&tree).unwrap().count();
    assert_eq!(entries, namegen::name_permutations().count());
}

#[test]
fn test_filesize_is_respected() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("namegen")
        .unwrap()
        .args(["--filesize", "4"])
        .arg(dir.path())
        .assert()
        .success();

    let tree = dir.path().join("challenging-names");
    let first = namegen::name_permutations().next().unwrap();
    let metadata = std::fs::metadata(tree.join(first)).unwrap();
    assert_eq!(metadata.len(), 4);
}
