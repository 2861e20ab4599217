//! Store and catalog integration tests against the bundled data script.

use compras_report::db::SqliteClient;
use std::path::{Path, PathBuf};

pub mod catalog_test;
pub mod loader_test;
pub mod report_test;

/// Path of a file relative to the crate root.
pub fn repo_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

/// Loads the bundled data set.
pub async fn bundled_client() -> SqliteClient {
    SqliteClient::load_script(&repo_path("data/contratos.sql"))
        .await
        .expect("bundled data script should load")
}
