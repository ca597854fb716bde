//! Catalog row operations.

use crate::{CatalogDb, Result};
use chrono::Utc;
use emscope_protocol::{Target, TargetType};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

fn row_to_target(row: &SqliteRow) -> Target {
    Target {
        id: row.get("target_id"),
        name: row.get("name"),
        type_name: TargetType::from(row.get::<String, _>("type_name")),
        display_name: row.get("display_name"),
    }
}

impl CatalogDb {
    /// Replace an endpoint's cached catalog wholesale and stamp the refresh
    /// time. Runs in one transaction so readers never observe a half-loaded
    /// catalog.
    pub async fn replace_targets(&self, endpoint_name: &str, targets: &[Target]) -> Result<usize> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM em_targets WHERE endpoint_name = ?")
            .bind(endpoint_name)
            .execute(&mut *tx)
            .await?;

        for target in targets {
            sqlx::query(
                r#"
                INSERT INTO em_targets (endpoint_name, target_id, name, type_name, display_name)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(endpoint_name, target_id) DO UPDATE SET
                    name = excluded.name,
                    type_name = excluded.type_name,
                    display_name = excluded.display_name
                "#,
            )
            .bind(endpoint_name)
            .bind(&target.id)
            .bind(&target.name)
            .bind(target.type_name.as_str())
            .bind(&target.display_name)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "INSERT OR REPLACE INTO em_refresh_meta (endpoint_name, last_refresh) VALUES (?, ?)",
        )
        .bind(endpoint_name)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(endpoint_name, count = targets.len(), "catalog replaced");
        Ok(targets.len())
    }

    /// Full cached catalog for an endpoint, unordered.
    pub async fn all_targets(&self, endpoint_name: &str) -> Result<Vec<Target>> {
        let rows = sqlx::query(
            "SELECT target_id, name, type_name, display_name FROM em_targets WHERE endpoint_name = ?",
        )
        .bind(endpoint_name)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.iter().map(row_to_target).collect())
    }

    /// Look up a single cached target by id.
    pub async fn target_by_id(&self, endpoint_name: &str, target_id: &str) -> Result<Option<Target>> {
        let row = sqlx::query(
            "SELECT target_id, name, type_name, display_name FROM em_targets \
             WHERE endpoint_name = ? AND target_id = ?",
        )
        .bind(endpoint_name)
        .bind(target_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.as_ref().map(row_to_target))
    }

    /// Number of cached rows for an endpoint.
    pub async fn count_targets(&self, endpoint_name: &str) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM em_targets WHERE endpoint_name = ?")
            .bind(endpoint_name)
            .fetch_one(self.pool())
            .await?;

        Ok(row.get("total"))
    }

    /// RFC 3339 timestamp of the last refresh, if the endpoint was ever
    /// refreshed.
    pub async fn last_refresh(&self, endpoint_name: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT last_refresh FROM em_refresh_meta WHERE endpoint_name = ?")
            .bind(endpoint_name)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.and_then(|r| r.get("last_refresh")))
    }

    /// Case-insensitive substring search over target names, optionally
    /// restricted to a set of type names, ordered by name.
    pub async fn search_targets(
        &self,
        endpoint_name: &str,
        query: &str,
        type_filters: Option<&[String]>,
        limit: i64,
    ) -> Result<Vec<Target>> {
        let mut sql = String::from(
            "SELECT target_id, name, type_name, display_name FROM em_targets \
             WHERE endpoint_name = ?",
        );
        if !query.is_empty() {
            sql.push_str(" AND LOWER(name) LIKE ?");
        }
        if let Some(filters) = type_filters {
            if !filters.is_empty() {
                let placeholders = vec!["?"; filters.len()].join(",");
                sql.push_str(&format!(" AND type_name IN ({})", placeholders));
            }
        }
        sql.push_str(" ORDER BY name ASC LIMIT ?");

        let mut q = sqlx::query(&sql).bind(endpoint_name);
        if !query.is_empty() {
            q = q.bind(format!("%{}%", query.to_lowercase()));
        }
        if let Some(filters) = type_filters {
            for filter in filters {
                q = q.bind(filter);
            }
        }
        q = q.bind(limit);

        let rows = q.fetch_all(self.pool()).await?;
        Ok(rows.iter().map(row_to_target).collect())
    }
}
