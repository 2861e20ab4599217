//! Integration tests for headless mode.

use super::common::{data_path, run_events, run_headless, run_headless_in};
use compras_report::config::Config;
use compras_report::db::{ColumnInfo, FailingDatabaseClient, MockDatabaseClient, QueryResult};
use compras_report::tui::headless::{HeadlessConfig, HeadlessRunner};
use compras_report::tui::ui::DISABLED_NOTICE;
use compras_report::tui::widgets::table::EMPTY_NOTICE;
use compras_report::tui::{App, LoadStatus};

fn loaded_app() -> App {
    App::new(LoadStatus::Loaded(Vec::new()), &Config::default())
}

#[test]
fn test_headless_basic_execution() {
    let (code, stdout, _) = run_events("key:esc", "text");

    assert_eq!(code, 0, "Expected exit code 0");
    assert!(
        stdout.contains("Events: 1 executed"),
        "Should show events executed"
    );
}

#[test]
fn test_headless_initial_screen() {
    let (code, stdout, _) = run_events("assert:state:state=Idle", "text");

    assert_eq!(code, 0);
    assert!(stdout.contains("Contratos.gov.br Contratos"));
    assert!(stdout.contains("Query 1:"));
    assert!(stdout.contains("Query 10:"));
    assert!(stdout.contains("Select a query and press Enter."));
}

#[test]
fn test_headless_select_runs_query() {
    let (code, stdout, _) = run_events(
        "select:10,assert:state:state=ResultsShown,assert:state:result_rows=20",
        "json",
    );

    assert_eq!(code, 0, "stdout: {stdout}");
    assert!(stdout.contains(r#""passed": 2"#));
    assert!(stdout.contains("TECNO ENGENHARIA S.A."));
}

#[test]
fn test_headless_chart_slider() {
    let (code, stdout, _) = run_events(
        "key:c,select:10,assert:state:chart_bars=2,key:right,key:right,key:plus,\
         assert:state:chart_bars=5,key:left,assert:state:chart_rows=4",
        "json",
    );

    assert_eq!(code, 0, "stdout: {stdout}");
    assert!(stdout.contains(r#""passed": 3"#));
    assert!(stdout.contains(r#""failed": 0"#));
}

#[test]
fn test_headless_full_slider_draws_every_bar() {
    let events = format!(
        "key:c,select:10,{}assert:state:chart_bars=20,assert:contains:rows 20/20",
        "key:right,".repeat(18)
    );
    let (code, stdout, _) = run_events(&events, "text");

    assert_eq!(code, 0, "stdout: {stdout}");
    let bars = stdout.lines().filter(|line| line.contains(" │ █")).count();
    assert_eq!(bars, 20, "stdout: {stdout}");
    assert!(stdout.contains("20 rows returned"), "stdout: {stdout}");
}

#[test]
fn test_headless_intro_lists_tables() {
    let (code, stdout, _) = run_events(
        "assert:contains:Tabelas,assert:contains:contrato 160",
        "text",
    );

    assert_eq!(code, 0, "stdout: {stdout}");
    assert!(stdout.contains("Assertions: 2 passed, 0 failed"));
}

#[test]
fn test_headless_snapshots_are_reported() {
    let (code, stdout, _) = run_events(
        "select:7,snapshot:table-only,key:c,snapshot:with-chart",
        "json",
    );

    assert_eq!(code, 0, "stdout: {stdout}");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let snapshots = json["snapshots"].as_array().unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0]["name"], "table-only");
    assert_eq!(snapshots[1]["name"], "with-chart");

    let has_bars = |snapshot: &serde_json::Value| {
        snapshot["screen_lines"]
            .as_array()
            .unwrap()
            .iter()
            .any(|line| line.as_str().unwrap_or("").contains(" │ █"))
    };
    assert!(!has_bars(&snapshots[0]));
    assert!(has_bars(&snapshots[1]));
}

#[test]
fn test_headless_runs_from_any_directory() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_headless_in(
        dir.path(),
        &[
            "--headless",
            "--events",
            "assert:state:queries_enabled=true,select:10,assert:state:result_rows=20",
        ],
    );

    assert_eq!(code, 0, "stdout: {stdout}\nstderr: {stderr}");
    assert!(!stdout.contains(DISABLED_NOTICE));
    assert!(stdout.contains("Assertions: 2 passed, 0 failed"));
}

#[test]
fn test_headless_chart_never_shown_for_ineligible_entry() {
    let (code, stdout, _) = run_events(
        "key:c,select:8,key:right,assert:state:show_chart=true,assert:state:chart_bars=0",
        "json",
    );

    assert_eq!(code, 0, "stdout: {stdout}");
    assert!(stdout.contains(r#""passed": 2"#));
}

#[test]
fn test_headless_keyboard_navigation() {
    let (code, stdout, _) = run_events(
        "key:end,assert:state:selected=10,key:up,key:up,assert:state:selected=8,key:enter,\
         assert:state:state=ResultsShown",
        "json",
    );

    assert_eq!(code, 0, "stdout: {stdout}");
    assert!(stdout.contains(r#""passed": 3"#));
}

#[test]
fn test_headless_missing_script_disables_queries() {
    let (code, stdout, stderr) = run_headless(&[
        "--headless",
        "--data",
        "data/does-not-exist.sql",
        "--events",
        "select:1,key:enter,assert:state:queries_enabled=false,assert:state:state=Idle",
    ]);

    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains(DISABLED_NOTICE));
    assert!(stdout.contains("Assertions: 2 passed, 0 failed"));
}

#[test]
fn test_headless_assertion_fail() {
    let (code, stdout, _) = run_events("select:3,assert:contains:goodbye", "json");

    assert_eq!(code, 1, "Should exit with code 1 on assertion failure");
    assert!(stdout.contains(r#""passed": 0"#));
    assert!(stdout.contains(r#""failed": 1"#));
}

#[test]
fn test_headless_fail_fast_stops_early() {
    let data = data_path();
    let (code, stdout, _) = run_headless(&[
        "--headless",
        "--data",
        &data,
        "--events",
        "assert:contains:goodbye,select:10",
        "--fail-fast",
    ]);

    assert_eq!(code, 1);
    assert!(stdout.contains("Events: 0 executed"));
}

#[test]
fn test_headless_frames_output() {
    let (code, stdout, _) = run_events("select:1,key:c", "frames");

    assert_eq!(code, 0);
    assert!(stdout.contains("=== FRAME 0 (initial) ==="));
    assert!(stdout.contains("=== FRAME 1 (select:1) ==="));
    assert!(stdout.contains("=== FRAME 2 (key:c) ==="));
}

#[test]
fn test_headless_requires_events_or_script() {
    let data = data_path();
    let (code, stdout, stderr) = run_headless(&["--headless", "--data", &data]);

    assert_eq!(code, 1, "Should fail without events or script");
    let combined = format!("{}{}", stdout, stderr);
    assert!(
        combined.contains("requires --events or --script"),
        "Should show error message. Got: {}",
        combined
    );
}

#[test]
fn test_headless_unknown_entry_is_error() {
    let (code, _, stderr) = run_events("select:11", "text");

    assert_eq!(code, 1);
    assert!(stderr.contains("No catalog entry numbered 11"), "{stderr}");
}

#[tokio::test]
async fn test_runner_with_mock_database() {
    let db = MockDatabaseClient::new();
    let mut runner = HeadlessRunner::new(HeadlessConfig::default(), loaded_app())
        .unwrap()
        .with_database(Box::new(db));
    runner
        .load_events("select:2,assert:contains:mock,assert:state:result_rows=1")
        .unwrap();

    let result = runner.run().await.unwrap();

    assert_eq!(result.assertions_failed, 0);
    assert_eq!(result.assertions_passed, 2);
    assert_eq!(result.state.state, "ResultsShown");
}

#[tokio::test]
async fn test_runner_shows_empty_notice() {
    let empty = QueryResult::with_data(vec![ColumnInfo::new("orgao_nome", "TEXT")], Vec::new());
    let mut runner = HeadlessRunner::new(HeadlessConfig::default(), loaded_app())
        .unwrap()
        .with_database(Box::new(MockDatabaseClient::with_result(empty)));
    runner.load_events("select:3").unwrap();

    let result = runner.run().await.unwrap();

    assert!(result.screen.contains(EMPTY_NOTICE));
    assert_eq!(result.state.result_rows, 0);
}

#[tokio::test]
async fn test_runner_hides_chart_for_empty_result() {
    let empty = QueryResult::with_data(
        vec![
            ColumnInfo::new("fornecedor_nome", "TEXT"),
            ColumnInfo::new("numero_contratos", "INTEGER"),
        ],
        Vec::new(),
    );
    let mut runner = HeadlessRunner::new(HeadlessConfig::default(), loaded_app())
        .unwrap()
        .with_database(Box::new(MockDatabaseClient::with_result(empty)));
    runner
        .load_events("key:c,select:10,assert:state:show_chart=true,assert:state:chart_bars=0")
        .unwrap();

    let result = runner.run().await.unwrap();

    assert_eq!(result.assertions_failed, 0);
    assert!(result.screen.contains(EMPTY_NOTICE));
    assert!(!result.screen.contains("rows 0/0"));
}

#[tokio::test]
async fn test_runner_records_snapshots_in_order() {
    let mut runner = HeadlessRunner::new(HeadlessConfig::default(), loaded_app())
        .unwrap()
        .with_database(Box::new(MockDatabaseClient::new()));
    runner
        .load_events("snapshot:start,select:2,snapshot:after-query")
        .unwrap();

    let result = runner.run().await.unwrap();

    let names: Vec<&str> = result.snapshots.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["start", "after-query"]);
    assert!(result.snapshots[0].screen.contains("Select a query and press Enter."));
    assert!(!result.snapshots[0].screen.contains("mock"));
    assert!(result.snapshots[1].screen.contains("mock"));
    assert_eq!(result.events_executed, 3);
}

#[tokio::test]
async fn test_runner_shows_query_error_banner() {
    let db = FailingDatabaseClient::new("no such column: valor");
    let mut runner = HeadlessRunner::new(HeadlessConfig::default(), loaded_app())
        .unwrap()
        .with_database(Box::new(db));
    runner.load_events("select:4").unwrap();

    let result = runner.run().await.unwrap();

    assert_eq!(result.state.state, "ErrorShown");
    assert!(result.screen.contains("no such column: valor"));
    assert!(result.state.error.unwrap().starts_with("Query error:"));
}
