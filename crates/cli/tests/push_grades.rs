// Integration tests for `marksync push`.
// Run with: cargo test -p marksync-cli --test push_grades

use std::path::Path;
use std::process::Command;

use httpmock::prelude::*;

fn marksync(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_marksync"));
    cmd.current_dir(dir);
    // Isolate from any real login on this machine
    cmd.env("HOME", dir);
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd.env_remove("MARKSYNC_TOKEN");
    cmd
}

#[test]
fn push_mixed_outcomes_exits_14_and_writes_full_report() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();

    // s1: valid grade, accepted. s2: non-numeric, must never be sent.
    // Row 4: blank SIS key, skipped. s3: blank grade = clear-sentinel,
    // sent but rejected remotely.
    std::fs::write(
        dir.path().join("grades.csv"),
        "SIS ID,Name,HW1\n\
         s1,Ada,95.5\n\
         s2,Bob,abc\n\
         ,Ghost,50\n\
         s3,Eve,\n",
    )
    .unwrap();

    let put_s1 = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/v1/courses/1/assignments/10/submissions/sis_user_id:s1")
            .json_body(serde_json::json!({ "submission": { "posted_grade": 95.5 } }));
        then.status(200).json_body(serde_json::json!({ "id": 1 }));
    });
    let put_s2 = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/v1/courses/1/assignments/10/submissions/sis_user_id:s2");
        then.status(200).json_body(serde_json::json!({ "id": 2 }));
    });
    let put_s3 = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/v1/courses/1/assignments/10/submissions/sis_user_id:s3")
            .json_body(serde_json::json!({ "submission": { "posted_grade": "" } }));
        then.status(404)
            .json_body(serde_json::json!({ "errors": [{ "message": "resource missing" }] }));
    });

    let output = marksync(dir.path())
        .args([
            "push",
            "--course", "1",
            "--assignment", "10",
            "--sheet", "grades.csv",
            "--yes",
            "--report", "report.json",
            "--domain", server.base_url().as_str(),
            "--token", "test-token",
            "--quiet",
        ])
        .output()
        .expect("failed to run marksync");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        output.status.code(),
        Some(14),
        "expected exit 14, got {:?}\nstdout: {stdout}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr),
    );

    put_s1.assert_calls(1);
    put_s2.assert_calls(0); // invalid grade text never reaches the wire
    put_s3.assert_calls(1);

    // Summary always prints, counts partitioned by kind
    assert!(stdout.contains("1 posted, 1 failed, 1 invalid, 1 blank-key"), "stdout: {stdout}");
    assert!(stdout.contains("not found"), "stdout: {stdout}");

    // The durable report carries every outcome
    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["posted"], 1);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["invalid"], 1);
    assert_eq!(report["skipped_blank_keys"], 1);
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 3);
}

#[test]
fn push_without_confirmation_is_cancelled() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();

    std::fs::write(
        dir.path().join("grades.csv"),
        "SIS ID,Name,HW1\ns1,Ada,95\n",
    )
    .unwrap();

    let put = server.mock(|when, then| {
        when.method(PUT).path_includes("/submissions/");
        then.status(200).json_body(serde_json::json!({}));
    });

    // stdin is closed, so the [y/N] prompt reads EOF and declines
    let output = marksync(dir.path())
        .args([
            "push",
            "--course", "1",
            "--assignment", "10",
            "--sheet", "grades.csv",
            "--domain", server.base_url().as_str(),
            "--token", "test-token",
            "--quiet",
        ])
        .stdin(std::process::Stdio::null())
        .output()
        .expect("failed to run marksync");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("push cancelled"));
    put.assert_calls(0);
}

#[test]
fn push_all_accepted_exits_zero() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();

    std::fs::write(
        dir.path().join("grades.csv"),
        "SIS ID,Name,HW1\ns1,Ada,90\ns2,Bob,80\n",
    )
    .unwrap();

    server.mock(|when, then| {
        when.method(PUT).path_includes("/submissions/sis_user_id:");
        then.status(200).json_body(serde_json::json!({}));
    });

    let output = marksync(dir.path())
        .args([
            "push",
            "--course", "1",
            "--assignment", "10",
            "--sheet", "grades.csv",
            "--yes",
            "--report", "report.json",
            "--domain", server.base_url().as_str(),
            "--token", "test-token",
            "--quiet",
        ])
        .output()
        .expect("failed to run marksync");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("2 posted, 0 failed"));
}

#[test]
fn not_logged_in_exits_10() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("grades.csv"), "SIS ID\ns1\n").unwrap();

    let output = marksync(dir.path())
        .args([
            "push",
            "--course", "1",
            "--assignment", "10",
            "--sheet", "grades.csv",
            "--yes",
        ])
        .output()
        .expect("failed to run marksync");

    assert_eq!(output.status.code(), Some(10));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not logged in"), "stderr: {stderr}");
}

#[test]
fn missing_sheet_exits_13() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();

    let output = marksync(dir.path())
        .args([
            "push",
            "--course", "1",
            "--assignment", "10",
            "--sheet", "nope.csv",
            "--yes",
            "--domain", server.base_url().as_str(),
            "--token", "test-token",
        ])
        .output()
        .expect("failed to run marksync");

    assert_eq!(output.status.code(), Some(13));
}
