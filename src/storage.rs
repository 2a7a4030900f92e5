//! Append-only index history. The scrape flow never writes here; the
//! schema is initialised at startup for collaborators that do.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection};

use crate::market::IndexStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
    pub date: NaiveDate,
    pub value: f64,
    pub status: String,
}

pub struct IndexStore {
    conn: Connection,
}

impl IndexStore {
    pub fn new(path: &str) -> Result<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    pub fn init(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "BEGIN;
            CREATE TABLE IF NOT EXISTS index_history (
                id INTEGER PRIMARY KEY,
                date TEXT NOT NULL,
                value REAL NOT NULL,
                status TEXT NOT NULL
            );
            COMMIT;",
        )?;
        Ok(())
    }

    /// Append one observation stamped with today's date. Rows are never
    /// updated or deleted.
    pub fn insert(&mut self, value: f64, status: IndexStatus) -> Result<()> {
        let date = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        self.conn.execute(
            "INSERT INTO index_history (date, value, status) VALUES (?1, ?2, ?3)",
            params![date, value, status.as_str()],
        )?;
        Ok(())
    }

    pub fn recent(&self, limit: u32) -> Result<Vec<IndexRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, value, status FROM index_history ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (date, value, status) = row?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|e| anyhow::anyhow!("bad date in index_history: {}", e))?;
            out.push(IndexRecord {
                date,
                value,
                status,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> (tempfile::TempDir, IndexStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.sqlite");
        let mut store = IndexStore::new(path.to_str().unwrap()).unwrap();
        store.init().unwrap();
        (dir, store)
    }

    #[test]
    fn init_is_idempotent() {
        let (_dir, mut store) = open_store();
        store.init().unwrap();
    }

    #[test]
    fn insert_and_read_back() {
        let (_dir, mut store) = open_store();
        store.insert(6750.25, IndexStatus::Neutral).unwrap();
        store.insert(6800.00, IndexStatus::Neutral).unwrap();

        let records = store.recent(10).unwrap();
        assert_eq!(records.len(), 2);
        // Newest first.
        assert_eq!(records[0].value, 6800.00);
        assert_eq!(records[1].value, 6750.25);
        assert_eq!(records[0].status, "NEUTRAL");
        assert_eq!(records[0].date, Utc::now().date_naive());
    }

    #[test]
    fn recent_respects_limit() {
        let (_dir, mut store) = open_store();
        for i in 0..5 {
            store.insert(6500.0 + i as f64, IndexStatus::Neutral).unwrap();
        }
        assert_eq!(store.recent(3).unwrap().len(), 3);
    }
}
