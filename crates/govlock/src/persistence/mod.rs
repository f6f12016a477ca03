//! Trait for abstracting the persistence API so different database
//! backends can be used.
//!
//! We start with SQLite because it's easy and good.

mod sqlite;

pub use govlock_types::{ScanCheckpoint, TrackedRecord};
pub use sqlite::SqliteDb;

/// Trait for persisting watch progress and tracked operations.
pub trait WatchDb: Send + Sync {
    /// Load the last checkpoint, or None if no checkpoint exists.
    fn load_checkpoint(&self) -> eyre::Result<Option<ScanCheckpoint>>;

    /// Save a checkpoint atomically.
    fn save_checkpoint(&self, checkpoint: &ScanCheckpoint) -> eyre::Result<()>;

    /// Insert or update a tracked operation record (keyed by tx hash).
    fn upsert_tracked(&self, record: &TrackedRecord) -> eyre::Result<()>;

    /// Load every tracked operation, oldest block first.
    fn load_tracked(&self) -> eyre::Result<Vec<TrackedRecord>>;

    /// Update the stored lifecycle state of an operation id.
    /// Returns the number of records touched.
    fn set_state(&self, id: &[u8; 32], state: &str) -> eyre::Result<usize>;
}
