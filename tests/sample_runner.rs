// End-to-end runs of the sample-check binary against scratch fixtures.
// Requires: assert_cmd, predicates, tempfile in [dev-dependencies]

mod common;

use common::Fixture;
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn matching_sample_prints_nothing() {
    let fx = Fixture::new();
    fx.file("input1.csv", "a,b\n1,2\n").file("output1.csv", "a,b\n1,2\n");

    fx.check()
        .args(["--", "cat"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(contains("1 samples: 1 matched, 0 differed, 0 errors"));

    assert_eq!(fx.read("myoutput1.csv"), "a,b\n1,2\n");
}

#[test]
fn line_order_does_not_matter() {
    let fx = Fixture::new();
    fx.file("input1.csv", "client,available\n2,1.0\n1,3.5\n")
        .file("output1.csv", "client,available\n1,3.5\n2,1.0\n");

    fx.check()
        .args(["--", "cat"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn differing_lines_are_printed() {
    let fx = Fixture::new();
    fx.file("input1.csv", "a,b\n1,2\n").file("output1.csv", "a,b\n1,3\n");

    fx.check()
        .args(["--color", "never", "--", "cat"])
        .assert()
        .success()
        .stdout("1c1\n< 1,3\n---\n> 1,2\n")
        .stderr(contains("1 differed"));
}

#[test]
fn no_sort_compares_in_file_order() {
    let fx = Fixture::new();
    fx.file("input1.csv", "h\n2\n1\n").file("output1.csv", "h\n1\n2\n");

    fx.check()
        .args(["--no-sort", "--color", "never", "--", "cat"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn strict_mode_fails_on_mismatch() {
    let fx = Fixture::new();
    fx.file("input1.csv", "a\n").file("output1.csv", "b\n");

    fx.check().args(["--strict", "--", "cat"]).assert().code(1);
}

#[test]
fn strict_mode_fails_on_program_failure() {
    let fx = Fixture::new();
    fx.file("input1.csv", "a\n").file("output1.csv", "a\n");

    fx.check()
        .args(["--strict", "--", "sh", "-c", "cat \"$1\"; exit 4", "sh"])
        .assert()
        .code(1)
        .stderr(contains("input1.csv: program exited with status 4"));
}

#[test]
fn lenient_mode_ignores_failures() {
    let fx = Fixture::new();
    fx.file("input1.csv", "a\n");

    fx.check()
        .args(["--", "./no-such-program"])
        .assert()
        .success()
        .stderr(contains("failed to start './no-such-program'"))
        .stderr(contains("cannot read"));

    assert!(fx.exists("myoutput1.csv"));
}

#[test]
fn non_input_files_are_never_run() {
    let fx = Fixture::new();
    fx.file("output1.csv", "a\n").file("notes.csv", "x\n");

    fx.check()
        .args(["--", "cat"])
        .assert()
        .success()
        .stderr(contains("0 samples"));

    assert!(!fx.exists("myoutput1.csv"));
    assert!(!fx.exists("mynotes.csv"));
}

#[test]
fn each_input_gets_one_candidate() {
    let fx = Fixture::new();
    fx.file("input1.csv", "one\n")
        .file("output1.csv", "one\n")
        .file("input2.csv", "two\n")
        .file("output2.csv", "two\n")
        .file("myoutput2.csv", "stale\n");

    fx.check()
        .args(["--", "cat"])
        .assert()
        .success()
        .stderr(contains("2 samples: 2 matched"));

    assert_eq!(fx.read("myoutput1.csv"), "one\n");
    assert_eq!(fx.read("myoutput2.csv"), "two\n");
}

#[test]
fn char_set_strip_over_strips_index() {
    let fx = Fixture::new();
    fx.file("inputs.csv", "a\n").file("output.csv", "a\n");

    fx.check()
        .args(["--strip", "char-set", "--", "cat"])
        .assert()
        .success()
        .stderr(contains("1 matched"));

    assert!(fx.exists("myoutput.csv"));
    assert!(!fx.exists("myoutputs.csv"));
}

#[test]
fn missing_sample_dir_is_fatal() {
    let fx = Fixture::new();

    fx.check()
        .args(["--dir", "nope", "--", "cat"])
        .assert()
        .failure()
        .stderr(contains("failed to list sample directory"));
}

#[test]
fn list_shows_samples_without_running() {
    let fx = Fixture::new();
    fx.file("input7.csv", "a\n");

    fx.check()
        .args(["--list", "--", "cat"])
        .assert()
        .success()
        .stdout(contains("7\tsample/input7.csv\tsample/output7.csv\tsample/myoutput7.csv"));

    assert!(!fx.exists("myoutput7.csv"));
}

#[test]
fn json_report_describes_samples() {
    let fx = Fixture::new();
    fx.file("input1.csv", "a\n").file("output1.csv", "b\n");

    let output = fx.check().args(["--json", "--", "cat"]).output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["differed"], 1);
    assert_eq!(report["samples"][0]["verdict"], "mismatch");
    assert_eq!(report["samples"][0]["diff"]["hunks"][0]["kind"], "change");
}

#[test]
fn config_file_in_working_directory_is_used() {
    let fx = Fixture::new();
    std::fs::create_dir(fx.root().join("fixtures")).unwrap();
    std::fs::write(fx.root().join("fixtures/input1.csv"), "a\n").unwrap();
    std::fs::write(fx.root().join("fixtures/output1.csv"), "b\n").unwrap();
    std::fs::write(
        fx.root().join("sample-check.yaml"),
        "sample_dir: fixtures\ncommand: [cat]\nstrict: true\n",
    )
    .unwrap();

    fx.check().assert().code(1).stderr(contains("1 differed"));
    assert!(fx.root().join("fixtures/myoutput1.csv").exists());
}

#[test]
fn invalid_config_is_reported() {
    let fx = Fixture::new();
    std::fs::write(fx.root().join("bad.yaml"), "sample_dir: [\n").unwrap();

    fx.check()
        .args(["--config", "bad.yaml"])
        .assert()
        .failure()
        .stderr(contains("invalid config file"));
}
