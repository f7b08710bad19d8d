//! SQLite export
//!
//! Upserts the dataset into a `products` table. Repeated runs against the
//! same database refresh existing rows and keep products from other
//! keywords.

use crate::dataset::Dataset;
use crate::output::traits::{DatasetExporter, OutputResult};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id              TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    price           TEXT NOT NULL,
    rating          REAL NOT NULL DEFAULT 0,
    link            TEXT NOT NULL,
    search_term     TEXT NOT NULL,
    description     TEXT,
    harvested_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_search_term ON products(search_term);
"#;

const UPSERT: &str = r#"
INSERT INTO products (id, name, price, rating, link, search_term, description, harvested_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
ON CONFLICT(id) DO UPDATE SET
    name = excluded.name,
    price = excluded.price,
    rating = excluded.rating,
    link = excluded.link,
    search_term = excluded.search_term,
    description = COALESCE(excluded.description, products.description),
    harvested_at = excluded.harvested_at
"#;

/// Exports the dataset into a SQLite database file
pub struct SqliteExporter {
    path: PathBuf,
}

impl SqliteExporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DatasetExporter for SqliteExporter {
    fn export(&self, dataset: &Dataset) -> OutputResult<()> {
        let mut conn = Connection::open(&self.path)?;
        conn.execute_batch(SCHEMA)?;

        let harvested_at = chrono::Utc::now().to_rfc3339();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(UPSERT)?;
            for (id, record) in dataset.iter() {
                stmt.execute(params![
                    id,
                    record.name,
                    record.price,
                    record.rating,
                    record.link,
                    record.search_term,
                    record.description,
                    harvested_at,
                ])?;
            }
        }
        tx.commit()?;

        tracing::info!(
            "Upserted {} products into {}",
            dataset.len(),
            self.path.display()
        );
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}
