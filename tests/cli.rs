use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn rejects_missing_input_files() {
    let mut cmd = Command::cargo_bin("rehearsalyzer").unwrap();
    cmd.args([
        "--slides",
        "/no/such/slides.json",
        "--transcript",
        "/no/such/transcript.json",
        "--timing",
        "/no/such/timing.json",
        "--audio",
        "/no/such/audio.wav",
        "--output",
        "/tmp/report.json",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn requires_all_input_arguments() {
    let mut cmd = Command::cargo_bin("rehearsalyzer").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--slides"));
}
