//! End-to-end tests of the `genexium` binary.
//!
//! Every test runs the binary with `XDG_CONFIG_HOME` pointed at a fresh temp
//! dir so the user's real config and stored plan are never touched.

use std::path::Path;
use std::process::Output;

use genexium_test_utils::{MockBackend, Reply};
use tokio::process::Command;

async fn genexium(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_genexium"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("GENEXIUM_SERVER_URL")
        .env_remove("GENEXIUM_USERNAME")
        .env_remove("GENEXIUM_PASSWORD")
        .env_remove("GENEXIUM_EXPORT_DIR")
        .env("RUST_LOG", "warn")
        .output()
        .await
        .expect("failed to run genexium")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[tokio::test]
async fn export_to_stdout() {
    let tmp = tempfile::TempDir::new().unwrap();
    let input = tmp.path().join("plan.md");
    std::fs::write(&input, "## Week 1\n\n- Run\n- Rest\n").unwrap();

    let output = genexium(
        tmp.path(),
        &["export", input.to_str().unwrap(), "--gene", "brca1", "--stdout"],
    )
    .await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "# BRCA1 Training Plan\n\n## Week 1\n\n- Run\n- Rest\n\n");
}

#[tokio::test]
async fn export_rejects_unknown_tab() {
    let tmp = tempfile::TempDir::new().unwrap();
    let output = genexium(
        tmp.path(),
        &["export", "x.md", "--gene", "nos3", "--tab", "summary"],
    )
    .await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown content type"));
}

#[tokio::test]
async fn init_writes_config_once() {
    let tmp = tempfile::TempDir::new().unwrap();

    let first = genexium(tmp.path(), &["init", "--url", "http://example.test", "--password", "pw"]).await;
    assert!(first.status.success(), "stderr: {}", stderr(&first));
    let written = std::fs::read_to_string(tmp.path().join("genexium").join("config.toml")).unwrap();
    assert!(written.contains("http://example.test"));
    assert!(!stdout(&first).contains("pw\n"), "password must not be echoed");

    let second = genexium(tmp.path(), &["init"]).await;
    assert!(!second.status.success());
    assert!(stderr(&second).contains("--force"));
}

#[tokio::test]
async fn plan_then_workout_uses_stored_plan() {
    let backend = MockBackend::start().await;
    backend.enqueue_plan(Reply::plan("ppargc1a", "# Base block\n\n- Zone 2", "# Report"));
    backend.enqueue_workout(Reply::workout("## Tempo\n\n- 20 min threshold"));
    let tmp = tempfile::TempDir::new().unwrap();
    let url = backend.base_url();

    let plan = genexium(
        tmp.path(),
        &["--server-url", &url, "plan", "--gene", "ppargc1a", "--goal", "ride a century"],
    )
    .await;
    assert!(plan.status.success(), "stderr: {}", stderr(&plan));
    assert!(stdout(&plan).contains("Gene: PPARGC1A"));
    assert!(tmp.path().join("genexium").join("last_plan.json").exists());

    let export_dir = tmp.path().join("exports");
    let workout = genexium(
        tmp.path(),
        &[
            "--server-url",
            &url,
            "--export-dir",
            export_dir.to_str().unwrap(),
            "workout",
            "--week",
            "5",
            "--day",
            "Saturday",
            "--hrv",
            "61",
            "--save",
        ],
    )
    .await;
    assert!(workout.status.success(), "stderr: {}", stderr(&workout));
    assert!(stdout(&workout).contains("Daily workout generated for Week 5, Saturday!"));

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].body["training_plan"], "# Base block\n\n- Zone 2");
    assert_eq!(requests[1].body["hrv"], "61");
    assert!(requests[1].body["hours_of_sleep"].is_null());

    assert_eq!(
        std::fs::read_to_string(export_dir.join("ppargc1a_daily_workout.md")).unwrap(),
        "# PPARGC1A Daily Workout\n\n## Tempo\n\n- 20 min threshold\n\n"
    );
}

#[tokio::test]
async fn plan_file_and_gene_go_together() {
    let tmp = tempfile::TempDir::new().unwrap();
    let plan = tmp.path().join("plan.md");
    std::fs::write(&plan, "# Plan").unwrap();

    let without_gene = genexium(
        tmp.path(),
        &["workout", "--week", "1", "--day", "Monday", "--plan-file", plan.to_str().unwrap()],
    )
    .await;
    assert!(!without_gene.status.success());
    assert!(stderr(&without_gene).contains("--gene"), "stderr: {}", stderr(&without_gene));

    let without_file = genexium(
        tmp.path(),
        &["workout", "--week", "1", "--day", "Monday", "--gene", "nos3"],
    )
    .await;
    assert!(!without_file.status.success());
    assert!(stderr(&without_file).contains("--plan-file"), "stderr: {}", stderr(&without_file));
}

#[tokio::test]
async fn unreachable_server_exits_with_network_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let url = genexium_test_utils::unreachable_url().await;

    let output = genexium(
        tmp.path(),
        &["--server-url", &url, "plan", "--gene", "nos3", "--goal", "row"],
    )
    .await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Network error. Please check your connection and try again."));
}

#[tokio::test]
async fn completions_are_generated() {
    let tmp = tempfile::TempDir::new().unwrap();
    let output = genexium(tmp.path(), &["completions", "bash"]).await;
    assert!(output.status.success());
    assert!(stdout(&output).contains("genexium"));
}
