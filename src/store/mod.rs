//! Model persistence
//!
//! This module stores parsed schema documents in SQLite, keyed by model name.
//! Structured members (parent, actions, fields, display props) are kept as
//! JSON text columns; the schema itself is treated as an opaque document once
//! parsed.

use crate::error::{ModelForgeError, Result};
use crate::parser::{Action, BaseProps, Parent, Schema};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use tracing::debug;

/// A schema row as stored, with its database identity and timestamps
#[derive(Debug, Clone)]
pub struct StoredModel {
    /// Row id
    pub id: i64,
    /// The schema document
    pub schema: Schema,
    /// Creation timestamp (UTC, `YYYY-MM-DD HH:MM:SS`)
    pub created_at: String,
    /// Last update timestamp (UTC)
    pub updated_at: String,
}

/// SQLite-backed model store
pub struct ModelStore {
    pool: SqlitePool,
}

impl ModelStore {
    /// Open (creating if missing) the database at `url` and ensure the
    /// `models` table exists.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // An in-memory database exists per connection; keep exactly one alive
        // or every query would see a different empty database.
        let is_memory = url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new();
        pool_options = if is_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create the backing table
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS models (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                label TEXT NOT NULL,
                primary_key TEXT DEFAULT 'id',
                entry TEXT DEFAULT 'list',
                parent TEXT,
                action TEXT NOT NULL,
                fields TEXT NOT NULL,
                base_props TEXT,
                custom_actions TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert or update a schema, keyed by `name`. Returns the row id.
    pub async fn upsert(&self, schema: &Schema) -> Result<i64> {
        let parent = serde_json::to_string(&schema.parent)?;
        let action = serde_json::to_string(&schema.action)?;
        let fields = serde_json::to_string(&schema.fields)?;
        let base_props = serde_json::to_string(&schema.base_props)?;
        let custom_actions = serde_json::to_string(&schema.custom_actions)?;
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM models WHERE name = ?")
            .bind(&schema.name)
            .fetch_optional(&self.pool)
            .await?;

        if let Some((id,)) = existing {
            sqlx::query(
                r#"
                UPDATE models SET
                    label = ?, primary_key = ?, entry = ?, parent = ?,
                    action = ?, fields = ?, base_props = ?, custom_actions = ?,
                    updated_at = ?
                WHERE name = ?
                "#,
            )
            .bind(&schema.label)
            .bind(&schema.primary_key)
            .bind(&schema.entry)
            .bind(&parent)
            .bind(&action)
            .bind(&fields)
            .bind(&base_props)
            .bind(&custom_actions)
            .bind(&now)
            .bind(&schema.name)
            .execute(&self.pool)
            .await?;
            debug!(name = %schema.name, id, "updated existing model");
            Ok(id)
        } else {
            let result = sqlx::query(
                r#"
                INSERT INTO models
                    (name, label, primary_key, entry, parent, action, fields,
                     base_props, custom_actions, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&schema.name)
            .bind(&schema.label)
            .bind(&schema.primary_key)
            .bind(&schema.entry)
            .bind(&parent)
            .bind(&action)
            .bind(&fields)
            .bind(&base_props)
            .bind(&custom_actions)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await?;
            let id = result.last_insert_rowid();
            debug!(name = %schema.name, id, "inserted new model");
            Ok(id)
        }
    }

    /// List all stored models, newest first
    pub async fn list(&self) -> Result<Vec<StoredModel>> {
        let rows = sqlx::query("SELECT * FROM models ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_model).collect()
    }

    /// Fetch one model by name
    pub async fn get(&self, name: &str) -> Result<Option<StoredModel>> {
        let row = sqlx::query("SELECT * FROM models WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_model).transpose()
    }

    /// Delete a model by row id
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM models WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ModelForgeError::NotFound(format!("model id {}", id)));
        }
        Ok(())
    }
}

/// Rebuild a schema document from its stored row.
fn row_to_model(row: &sqlx::sqlite::SqliteRow) -> Result<StoredModel> {
    let parent: Option<String> = row.get("parent");
    let action: String = row.get("action");
    let fields: String = row.get("fields");
    let base_props: Option<String> = row.get("base_props");
    let custom_actions: Option<String> = row.get("custom_actions");

    let schema = Schema {
        name: row.get("name"),
        label: row.get("label"),
        primary_key: row.get("primary_key"),
        entry: row.get("entry"),
        parent: match parent {
            Some(text) if !text.is_empty() => serde_json::from_str(&text)?,
            _ => Parent::default(),
        },
        action: serde_json::from_str::<Vec<Action>>(&action)?,
        fields: serde_json::from_str(&fields)?,
        base_props: match base_props {
            Some(text) if !text.is_empty() => serde_json::from_str(&text)?,
            _ => BaseProps::default(),
        },
        custom_actions: match custom_actions {
            Some(text) if !text.is_empty() => serde_json::from_str(&text)?,
            _ => Vec::new(),
        },
    };

    Ok(StoredModel {
        id: row.get("id"),
        schema,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
