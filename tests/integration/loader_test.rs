//! Data loader integration tests.

use super::{bundled_client, repo_path};
use compras_report::config::DataSource;
use compras_report::db::{DatabaseClient, SqliteClient};
use compras_report::error::ReportError;
use std::io::Write;

#[tokio::test]
async fn test_bundled_script_creates_all_tables() {
    let client = bundled_client().await;

    let tables = client.tables().await.unwrap();
    assert_eq!(
        tables,
        vec![
            "contrato",
            "fornecedor",
            "item",
            "itemContrato",
            "orgao",
            "tipo",
            "unidade"
        ]
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_bundled_script_summary() {
    let client = bundled_client().await;

    let summary = client.summary().await.unwrap();
    let counts: Vec<(&str, i64)> = summary.iter().map(|t| (t.name.as_str(), t.rows)).collect();
    assert_eq!(
        counts,
        vec![
            ("contrato", 160),
            ("fornecedor", 30),
            ("item", 25),
            ("itemContrato", 380),
            ("orgao", 8),
            ("tipo", 6),
            ("unidade", 14),
        ]
    );
}

#[tokio::test]
async fn test_loaded_client_remembers_source() {
    let client = bundled_client().await;
    assert!(client.source().unwrap().ends_with("data/contratos.sql"));
}

#[tokio::test]
async fn test_compiled_in_script_matches_file() {
    let from_file = bundled_client().await;
    let compiled = SqliteClient::load(&DataSource::Bundled).await.unwrap();

    assert!(compiled.source().is_none());
    assert_eq!(
        compiled.summary().await.unwrap(),
        from_file.summary().await.unwrap()
    );
}

#[tokio::test]
async fn test_missing_script_is_script_error() {
    let err = SqliteClient::load_script(&repo_path("data/does-not-exist.sql"))
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::Script(_)));
    assert_eq!(err.category(), "Script Error");
}

#[tokio::test]
async fn test_malformed_script_is_script_error() {
    let err = SqliteClient::load_script(&repo_path("tests/fixtures/malformed.sql"))
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::Script(_)));
}

#[tokio::test]
async fn test_empty_schema_loads_without_rows() {
    let client = SqliteClient::load_script(&repo_path("tests/fixtures/empty_schema.sql"))
        .await
        .unwrap();

    let summary = client.summary().await.unwrap();
    assert_eq!(summary.len(), 7);
    assert!(summary.iter().all(|t| t.rows == 0));
}

#[tokio::test]
async fn test_script_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "CREATE TABLE orgao (orgao_codigo INTEGER PRIMARY KEY, orgao_nome TEXT);\n\
         INSERT INTO orgao VALUES (26000, 'MINISTERIO DA EDUCACAO');"
    )
    .unwrap();

    let client = SqliteClient::load_script(file.path()).await.unwrap();
    let result = client
        .execute_query("SELECT orgao_nome FROM orgao")
        .await
        .unwrap();

    assert_eq!(result.row_count, 1);
    assert_eq!(result.rows[0][0].to_string(), "MINISTERIO DA EDUCACAO");
}
