//! Runs every catalog query against the bundled data set.

use super::{bundled_client, repo_path};
use compras_report::catalog::{self, CatalogEntry};
use compras_report::chart::{BarChart, RowCap};
use compras_report::db::{DatabaseClient, QueryResult, SqliteClient, Value};
use compras_report::query::QueryExecutor;

async fn run(client: &SqliteClient, number: usize) -> QueryResult {
    let entry = catalog::get(number).unwrap();
    QueryExecutor::new(client).run(entry).await.unwrap().result
}

fn text(value: &Value) -> String {
    value.to_display_string()
}

fn number(value: &Value) -> f64 {
    value.as_f64().expect("numeric cell")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn test_every_entry_executes() {
    let client = bundled_client().await;

    for entry in catalog::entries() {
        let result = client.execute_query(entry.sql).await;
        assert!(result.is_ok(), "{} failed: {:?}", entry.label, result.err());
    }
}

#[tokio::test]
async fn test_query_1_suppliers_above_average() {
    let client = bundled_client().await;
    let result = run(&client, 1).await;

    assert_eq!(result.row_count, 6);
    assert_eq!(text(&result.rows[0][0]), "DINAMICA ENGENHARIA S.A.");
    assert_close(number(&result.rows[0][1]), 636634.6);
    let values: Vec<f64> = result.rows.iter().map(|r| number(&r[1])).collect();
    assert!(values.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_query_2_units_without_short_contracts() {
    let client = bundled_client().await;
    let result = run(&client, 2).await;

    assert_eq!(result.row_count, 2);
    assert_eq!(result.columns[0].name, "unidade_nome");
}

#[tokio::test]
async fn test_query_3_top_five_agencies() {
    let client = bundled_client().await;
    let result = run(&client, 3).await;

    assert_eq!(result.row_count, 5);
    assert_eq!(
        text(&result.rows[0][0]),
        "MINISTERIO DA AGRICULTURA E PECUARIA"
    );
    assert_close(number(&result.rows[0][1]), 83.2);
}

#[tokio::test]
async fn test_query_4_one_supplier_per_type() {
    let client = bundled_client().await;
    let result = run(&client, 4).await;

    assert_eq!(result.row_count, 6);
    assert_eq!(text(&result.rows[0][0]), "VERTICE CONSTRUCOES LTDA");

    let tipo = result.column_index("tipo_descricao").unwrap();
    let mut tipos: Vec<String> = result.rows.iter().map(|r| text(&r[tipo])).collect();
    tipos.sort();
    tipos.dedup();
    assert_eq!(tipos.len(), 6);
}

#[tokio::test]
async fn test_query_5_type_shares() {
    let client = bundled_client().await;
    let result = run(&client, 5).await;

    assert_eq!(result.row_count, 6);
    assert_eq!(text(&result.rows[0][0]), "Contrato");

    let share = result.column_index("percentual_contratos_tipo").unwrap();
    let total: f64 = result.rows.iter().map(|r| number(&r[share])).sum();
    assert!((total - 100.0).abs() < 0.01, "shares sum to {total}");
}

#[tokio::test]
async fn test_query_6_ufmg_contracts() {
    let client = bundled_client().await;
    let result = run(&client, 6).await;

    assert_eq!(result.row_count, 48);
    assert_eq!(result.columns.len(), 5);
    assert!(result
        .rows
        .iter()
        .all(|r| text(&r[1]).contains("MINAS GERAIS") || text(&r[1]).contains("UFMG")));
}

#[tokio::test]
async fn test_query_7_agencies_with_many_contracts() {
    let client = bundled_client().await;
    let result = run(&client, 7).await;

    assert_eq!(result.row_count, 3);
    assert_eq!(text(&result.rows[0][0]), "MINISTERIO DA EDUCACAO");
    assert_eq!(result.rows[0][1], Value::Integer(41));
    assert!(result.rows.iter().all(|r| number(&r[1]) > 5.0));
}

#[tokio::test]
async fn test_query_8_type_totals() {
    let client = bundled_client().await;
    let result = run(&client, 8).await;

    assert_eq!(result.row_count, 6);
    assert!(catalog::get(8).unwrap().chart.is_none());
}

#[tokio::test]
async fn test_query_9_unit_costs() {
    let client = bundled_client().await;
    let result = run(&client, 9).await;

    assert_eq!(result.row_count, 13);
    assert_eq!(
        text(&result.rows[0][0]),
        "UNIVERSIDADE FEDERAL DE MINAS GERAIS"
    );
    assert_close(number(&result.rows[0][1]), 2997038.7);
}

#[tokio::test]
async fn test_query_10_top_twenty_suppliers() {
    let client = bundled_client().await;
    let result = run(&client, 10).await;

    assert!(result.row_count <= 20);
    assert_eq!(result.row_count, 20);

    let counts: Vec<f64> = result.rows.iter().map(|r| number(&r[1])).collect();
    assert!(counts.iter().all(|&c| c > 0.0));
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    assert_close(counts[0], 10.0);
    assert_close(counts[19], 3.0);
}

#[tokio::test]
async fn test_chart_columns_exist_in_results() {
    let client = bundled_client().await;

    for entry in catalog::entries().iter().filter(|e| e.has_chart()) {
        let result = run(&client, entry.number).await;
        let spec = entry.chart.unwrap();
        let rows = RowCap::new(result.row_count).max();
        let chart = BarChart::build(&result, &spec, rows)
            .unwrap_or_else(|e| panic!("{}: {e}", entry.label));
        assert_eq!(chart.len(), rows.min(result.row_count));
    }
}

#[tokio::test]
async fn test_chart_keeps_result_order() {
    let client = bundled_client().await;
    let entry: &CatalogEntry = catalog::get(9).unwrap();
    let result = run(&client, 9).await;

    let chart = BarChart::build(&result, &entry.chart.unwrap(), 5).unwrap();
    let keys: Vec<String> = chart.bars.iter().map(|b| b.key.clone()).collect();
    let expected: Vec<String> = result.rows[..5].iter().map(|r| text(&r[0])).collect();
    assert_eq!(keys, expected);
}

#[tokio::test]
async fn test_empty_store_keeps_columns() {
    let client = SqliteClient::load_script(&repo_path("tests/fixtures/empty_schema.sql"))
        .await
        .unwrap();

    for entry in catalog::entries() {
        let result = client.execute_query(entry.sql).await.unwrap();
        assert!(result.is_empty(), "{} returned rows", entry.label);
        assert!(!result.columns.is_empty(), "{} lost its columns", entry.label);
    }
}
