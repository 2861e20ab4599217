//! Report state machine against the bundled store.

use super::bundled_client;
use compras_report::config::Config;
use compras_report::db::{DatabaseClient, FailingDatabaseClient};
use compras_report::tui::app::ViewState;
use compras_report::tui::{App, LoadStatus};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

async fn loaded_app(client: &compras_report::db::SqliteClient) -> App {
    let summary = client.summary().await.unwrap();
    App::new(LoadStatus::Loaded(summary), &Config::default())
}

#[tokio::test]
async fn test_select_runs_and_shows_results() {
    let client = bundled_client().await;
    let mut app = loaded_app(&client).await;
    assert_eq!(app.view.name(), "Idle");

    assert!(app.select(10));
    app.run_selected(&client).await;

    assert_eq!(app.view.name(), "ResultsShown");
    let view = app.result().unwrap();
    assert_eq!(view.entry.number, 10);
    assert_eq!(view.outcome.result.row_count, 20);
}

#[tokio::test]
async fn test_ineligible_entry_never_charts() {
    let client = bundled_client().await;
    let mut app = loaded_app(&client).await;
    app.show_chart = true;

    for number in [2, 6, 8] {
        assert!(app.select(number));
        app.run_selected(&client).await;
        assert!(app.chart().is_none(), "Query {number} produced a chart");
        assert_eq!(app.chart_bars(), 0);

        app.handle_key(key(KeyCode::Right));
        assert!(app.chart().is_none());
    }
}

#[tokio::test]
async fn test_slider_bounds_bar_count() {
    let client = bundled_client().await;
    let mut app = loaded_app(&client).await;
    app.show_chart = true;

    app.select(10);
    app.run_selected(&client).await;
    assert_eq!(app.chart_bars(), 2);

    for _ in 0..30 {
        app.handle_key(key(KeyCode::Right));
    }
    assert_eq!(app.chart_bars(), 20);

    for _ in 0..30 {
        app.handle_key(key(KeyCode::Left));
    }
    assert_eq!(app.chart_bars(), 2);
}

#[tokio::test]
async fn test_slider_limited_by_result_rows() {
    let client = bundled_client().await;
    let mut app = loaded_app(&client).await;
    app.show_chart = true;

    app.select(7);
    app.run_selected(&client).await;

    for _ in 0..10 {
        app.handle_key(key(KeyCode::Char('+')));
    }
    let view = app.result().unwrap();
    assert_eq!(view.rows.max(), 3);
    assert_eq!(view.rows.value(), 3);
    assert_eq!(app.chart_bars(), 3);
}

#[tokio::test]
async fn test_reselect_replaces_result() {
    let client = bundled_client().await;
    let mut app = loaded_app(&client).await;

    app.select(3);
    app.run_selected(&client).await;
    assert_eq!(app.result().unwrap().entry.number, 3);

    app.select(9);
    app.run_selected(&client).await;
    assert_eq!(app.result().unwrap().entry.number, 9);
    assert_eq!(app.result().unwrap().outcome.result.row_count, 13);

    app.select(9);
    app.run_selected(&client).await;
    assert_eq!(app.view.name(), "ResultsShown");
    assert_eq!(app.result().unwrap().entry.number, 9);
}

#[tokio::test]
async fn test_failure_keeps_previous_result() {
    let client = bundled_client().await;
    let failing = FailingDatabaseClient::new("no such table: contrato");
    let mut app = loaded_app(&client).await;

    app.select(1);
    app.run_selected(&client).await;
    app.select(2);
    app.run_selected(&failing).await;

    match &app.view {
        ViewState::ErrorShown { message, previous } => {
            assert!(message.contains("no such table"));
            assert_eq!(previous.as_ref().unwrap().entry.number, 1);
        }
        other => panic!("expected ErrorShown, got {}", other.name()),
    }

    app.run_selected(&client).await;
    assert_eq!(app.view.name(), "ResultsShown");
    assert_eq!(app.result().unwrap().entry.number, 2);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_failed_load_disables_queries() {
    let client = bundled_client().await;
    let mut app = App::new(
        LoadStatus::Failed("Script error: missing".to_string()),
        &Config::default(),
    );

    app.run_selected(&client).await;
    assert_eq!(app.view.name(), "Idle");

    app.handle_key(key(KeyCode::Char('q')));
    assert!(!app.running);
}
