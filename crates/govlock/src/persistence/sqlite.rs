//! SQLite implementation of WatchDb.

use eyre::{eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::{path::Path, sync::Mutex};

use super::{ScanCheckpoint, TrackedRecord, WatchDb};

/// SQLite-backed persistence for watch state.
pub struct SqliteDb {
    conn: Mutex<Connection>,
}

impl SqliteDb {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn: Mutex::new(conn) };
        db.init_schema()?;
        Ok(db)
    }

    /// Create an in-memory database (useful for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn: Mutex::new(conn) };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(|e| eyre!("lock poisoned: {e}"))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS checkpoint (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                block_number INTEGER NOT NULL,
                block_hash BLOB NOT NULL,
                operations_tracked INTEGER NOT NULL,
                timestamp INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tracked_operations (
                tx_hash BLOB PRIMARY KEY,
                operation_id BLOB NOT NULL,
                block_number INTEGER NOT NULL,
                state TEXT NOT NULL,
                payload TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tracked_operation_id
                ON tracked_operations(operation_id);
            "#,
        )?;

        Ok(())
    }
}

impl WatchDb for SqliteDb {
    fn load_checkpoint(&self) -> Result<Option<ScanCheckpoint>> {
        let conn = self.conn.lock().map_err(|e| eyre!("lock poisoned: {e}"))?;

        let result: Option<(i64, Vec<u8>, i64, i64)> = conn
            .query_row(
                "SELECT block_number, block_hash, operations_tracked, timestamp
                 FROM checkpoint WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        match result {
            Some((block_number, hash_bytes, tracked, ts)) => {
                let mut block_hash = [0u8; 32];
                if hash_bytes.len() == 32 {
                    block_hash.copy_from_slice(&hash_bytes);
                }

                Ok(Some(ScanCheckpoint {
                    block_number: block_number as u64,
                    block_hash,
                    operations_tracked: tracked as u64,
                    timestamp: ts as u64,
                }))
            }
            None => Ok(None),
        }
    }

    fn save_checkpoint(&self, checkpoint: &ScanCheckpoint) -> Result<()> {
        let conn = self.conn.lock().map_err(|e| eyre!("lock poisoned: {e}"))?;

        conn.execute(
            "INSERT OR REPLACE INTO checkpoint
             (id, block_number, block_hash, operations_tracked, timestamp)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![
                checkpoint.block_number as i64,
                checkpoint.block_hash.as_slice(),
                checkpoint.operations_tracked as i64,
                checkpoint.timestamp as i64,
            ],
        )?;

        Ok(())
    }

    fn upsert_tracked(&self, record: &TrackedRecord) -> Result<()> {
        let conn = self.conn.lock().map_err(|e| eyre!("lock poisoned: {e}"))?;

        conn.execute(
            "INSERT OR REPLACE INTO tracked_operations
             (tx_hash, operation_id, block_number, state, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.tx_hash.as_slice(),
                record.id.as_slice(),
                record.block_number as i64,
                record.state,
                record.payload,
            ],
        )?;

        Ok(())
    }

    fn load_tracked(&self) -> Result<Vec<TrackedRecord>> {
        let conn = self.conn.lock().map_err(|e| eyre!("lock poisoned: {e}"))?;

        let mut stmt = conn.prepare(
            "SELECT tx_hash, operation_id, block_number, state, payload
             FROM tracked_operations ORDER BY block_number ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let tx_hash: Vec<u8> = row.get(0)?;
            let id: Vec<u8> = row.get(1)?;
            let block_number: i64 = row.get(2)?;
            let state: String = row.get(3)?;
            let payload: String = row.get(4)?;
            Ok((tx_hash, id, block_number, state, payload))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (tx_hash_bytes, id_bytes, block_number, state, payload) = row?;

            let mut tx_hash = [0u8; 32];
            if tx_hash_bytes.len() == 32 {
                tx_hash.copy_from_slice(&tx_hash_bytes);
            }
            let mut id = [0u8; 32];
            if id_bytes.len() == 32 {
                id.copy_from_slice(&id_bytes);
            }

            records.push(TrackedRecord {
                id,
                tx_hash,
                block_number: block_number as u64,
                state,
                payload,
            });
        }

        Ok(records)
    }

    fn set_state(&self, id: &[u8; 32], state: &str) -> Result<usize> {
        let conn = self.conn.lock().map_err(|e| eyre!("lock poisoned: {e}"))?;

        let touched = conn.execute(
            "UPDATE tracked_operations SET state = ?2 WHERE operation_id = ?1",
            params![id.as_slice(), state],
        )?;

        Ok(touched)
    }
}
