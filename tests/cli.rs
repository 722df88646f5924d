mod common;

use std::ffi::OsStr;

use common::{grammar_file, run_cli};

#[test]
fn test_index_prints_definitions_and_references() {
    let file = grammar_file("rule1 = \"a\" rule2\r\nrule2 = \"b\" DIGIT\r\n");
    let output = run_cli(&[OsStr::new("index"), file.path().as_os_str()]);

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Definitions (2):"), "{stdout}");
    assert!(stdout.contains("  rule1 at 1:1\n"), "{stdout}");
    assert!(stdout.contains("  rule2 at 2:1\n"), "{stdout}");
    assert!(stdout.contains("References (2 names):"), "{stdout}");
    assert!(stdout.contains("  digit: 2:13\n"), "{stdout}");
    assert!(stdout.contains("  rule2: 1:13\n"), "{stdout}");
    assert!(!stdout.contains("Syntax Tree"), "{stdout}");
}

#[test]
fn test_index_prints_tree_on_request() {
    let file = grammar_file("a = b\n");
    let output = run_cli(&[
        OsStr::new("index"),
        file.path().as_os_str(),
        OsStr::new("--tree"),
    ]);

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(
        "=== Syntax Tree ===\n(source_file (rule (rulename (identifier)) (defined_as) (elements (rulename (identifier)))))\n"
    ));
}

#[test]
fn test_index_missing_file_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("missing.abnf");
    let output = run_cli(&[OsStr::new("index"), missing.as_os_str()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.abnf"), "{stderr}");
}
