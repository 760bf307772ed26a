use std::path::Path;

use rusqlite::{Connection, params};

use tt_core::TermRecord;

use crate::error::Result;
use crate::schema;

/// Metadata key recording which label the most recent review session
/// targeted. The key lives next to the terms it describes, so the
/// data-set identity is the database itself.
pub const LAST_REVIEW_KEY: &str = "last_review";

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let result = stmt.query_row([key], |row| row.get(0)).ok();
        Ok(result)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn delete_metadata(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM metadata WHERE key = ?1", [key])?;
        Ok(())
    }

    pub fn last_review(&self) -> Result<Option<String>> {
        self.get_metadata(LAST_REVIEW_KEY)
    }

    pub fn set_last_review(&self, label_name: &str) -> Result<()> {
        self.set_metadata(LAST_REVIEW_KEY, label_name)
    }

    pub fn clear_last_review(&self) -> Result<()> {
        self.delete_metadata(LAST_REVIEW_KEY)
    }

    // --- Terms ---

    /// Replace the whole vocabulary in one transaction, preserving record
    /// order. All-or-nothing: a failure leaves the previous contents intact.
    pub fn save_terms(&self, records: &[TermRecord]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM terms", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO terms (string, label, ord, related) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for rec in records {
                stmt.execute(params![rec.string, rec.label, rec.order, rec.related])?;
            }
        }
        tx.commit()?;
        tracing::debug!("saved {} terms", records.len());
        Ok(())
    }

    /// Load the vocabulary in its original order. A NULL `ord` column maps
    /// to an absent order (unclassified).
    pub fn load_terms(&self) -> Result<Vec<TermRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT string, label, ord, related FROM terms ORDER BY rowid")?;
        let records = stmt
            .query_map([], |row| {
                Ok(TermRecord {
                    string: row.get(0)?,
                    label: row.get(1)?,
                    order: row.get(2)?,
                    related: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn count_terms(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT count(*) FROM terms", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<TermRecord> {
        let mut a = TermRecord::new("neural networks");
        a.label = "keyword".to_string();
        a.order = Some(0);
        a.related = "neural networks".to_string();
        let b = TermRecord::new("deep learning");
        vec![a, b]
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let original = records();

        store.save_terms(&original).unwrap();
        let loaded = store.load_terms().unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_absent_order_roundtrips_as_null() {
        let store = Store::open_in_memory().unwrap();
        store.save_terms(&records()).unwrap();

        let null_count: i64 = store
            .conn()
            .query_row("SELECT count(*) FROM terms WHERE ord IS NULL", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(null_count, 1);

        let loaded = store.load_terms().unwrap();
        assert_eq!(loaded[1].order, None);
    }

    #[test]
    fn test_save_overwrites_previous() {
        let store = Store::open_in_memory().unwrap();
        store.save_terms(&records()).unwrap();
        store.save_terms(&records()[..1]).unwrap();
        assert_eq!(store.count_terms().unwrap(), 1);
    }

    #[test]
    fn test_load_order_is_insertion_order() {
        let store = Store::open_in_memory().unwrap();
        let recs: Vec<TermRecord> = ["c", "a", "b"].iter().map(|s| TermRecord::new(s)).collect();
        store.save_terms(&recs).unwrap();
        let loaded = store.load_terms().unwrap();
        let order: Vec<&str> = loaded.iter().map(|r| r.string.as_str()).collect();
        assert_eq!(order, ["c", "a", "b"]);
    }

    #[test]
    fn test_duplicate_save_is_all_or_nothing() {
        let store = Store::open_in_memory().unwrap();
        store.save_terms(&records()).unwrap();

        let dup = vec![TermRecord::new("x"), TermRecord::new("x")];
        assert!(store.save_terms(&dup).is_err());

        // failed save leaves the previous vocabulary intact
        assert_eq!(store.load_terms().unwrap(), records());
    }

    #[test]
    fn test_last_review_bookkeeping() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.last_review().unwrap(), None);

        store.set_last_review("postponed").unwrap();
        assert_eq!(store.last_review().unwrap(), Some("postponed".to_string()));

        store.clear_last_review().unwrap();
        assert_eq!(store.last_review().unwrap(), None);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("terms.db");

        {
            let store = Store::open(&path).unwrap();
            store.save_terms(&records()).unwrap();
            store.set_last_review("noise").unwrap();
        }

        let store = Store::open(&path).unwrap();
        assert_eq!(store.load_terms().unwrap(), records());
        assert_eq!(store.last_review().unwrap(), Some("noise".to_string()));
    }
}
