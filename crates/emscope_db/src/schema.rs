//! Schema creation for the catalog cache.

use crate::{CatalogDb, Result};

const CREATE_TARGETS: &str = r#"
CREATE TABLE IF NOT EXISTS em_targets (
    endpoint_name TEXT NOT NULL,
    target_id     TEXT NOT NULL,
    name          TEXT NOT NULL,
    type_name     TEXT NOT NULL,
    display_name  TEXT,
    PRIMARY KEY (endpoint_name, target_id)
)
"#;

const CREATE_REFRESH_META: &str = r#"
CREATE TABLE IF NOT EXISTS em_refresh_meta (
    endpoint_name TEXT PRIMARY KEY,
    last_refresh  TEXT
)
"#;

impl CatalogDb {
    pub(crate) async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TARGETS).execute(self.pool()).await?;
        sqlx::query(CREATE_REFRESH_META).execute(self.pool()).await?;
        Ok(())
    }
}
