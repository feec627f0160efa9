use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use tempfile::{tempdir, NamedTempFile};

fn create_config(
    workflows_dir: &std::path::Path,
    docs_dir: &std::path::Path,
    endpoint: &str,
) -> NamedTempFile {
    let config = NamedTempFile::new().expect("Creating temp config file failed");
    let yaml = format!(
        "workflows_dir: {}\ndocs_dir: {}\ngeneration:\n  endpoint: \"{endpoint}\"\n  model: \"ai/smollm2\"\n  system_instructions: \"You document workflows.\"\n  user_prompt: \"Document this workflow.\"\n",
        workflows_dir.display(),
        docs_dir.display()
    );
    write(config.path(), yaml).expect("Writing temp config failed");
    config
}

#[test]
fn generate_cli_with_no_workflows_reports_nothing_to_do() {
    // Empty workflows directory, so the CLI completes without touching the
    // network.
    let workflows = tempdir().unwrap();
    let docs = tempdir().unwrap();
    let config = create_config(
        workflows.path(),
        &docs.path().join("workflows"),
        "http://localhost:12434/engines/v1",
    );

    let mut cmd = Command::cargo_bin("workflow-documenter").expect("Binary exists");
    cmd.arg("generate").arg("--config").arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("nothing to document"));
}

#[test]
fn generate_cli_prints_progress_per_file_and_survives_failures() {
    // Port 9 (discard) refuses connections, so generation fails per-file
    // while the batch itself still completes cleanly.
    let workflows = tempdir().unwrap();
    let docs = tempdir().unwrap();
    std::fs::write(workflows.path().join("build.yml"), "name: build\n").unwrap();
    let config = create_config(
        workflows.path(),
        &docs.path().join("workflows"),
        "http://127.0.0.1:9/v1",
    );

    let mut cmd = Command::cargo_bin("workflow-documenter").expect("Binary exists");
    cmd.arg("generate").arg("--config").arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Found 1 workflow(s) to document"))
        .stdout(predicate::str::contains("Processing: build.yml"))
        .stdout(predicate::str::contains("Failed [generate]"))
        .stdout(predicate::str::contains("Documented 0 of 1 workflow(s)"));
}

#[test]
fn generate_cli_fails_for_missing_config_file() {
    let mut cmd = Command::cargo_bin("workflow-documenter").expect("Binary exists");
    cmd.arg("generate")
        .arg("--config")
        .arg("definitely/not/a/config.yaml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("config file"));
}

#[test]
fn help_mentions_workflow_documentation() {
    let mut cmd = Command::cargo_bin("workflow-documenter").expect("Binary exists");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("workflow"));
}
