// # Memory Record Store
//
// In-memory implementation of RecordStore.
//
// ## Purpose
//
// Holds the backing lines in a vector instead of a file. Useful for tests,
// for directories seeded from configuration, and anywhere durability across
// restarts is not wanted.
//
// Clones share the same buffer, so a test can keep a handle and inspect
// what the directory appended.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::codec;
use crate::Error;
use crate::model::Record;
use crate::traits::RecordStore;

/// In-memory record store
///
/// # Example
///
/// ```rust
/// use hostdir_core::store::MemoryRecordStore;
/// use hostdir_core::traits::RecordStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryRecordStore::from_lines(["www.uvsq.fr 193.51.31.90"]);
///
///     let lines = store.read_lines().await?;
///     assert_eq!(lines, vec!["www.uvsq.fr 193.51.31.90"]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    lines: Arc<RwLock<Vec<String>>>,
}

impl MemoryRecordStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with raw lines
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Arc::new(RwLock::new(
                lines.into_iter().map(Into::into).collect::<Vec<String>>(),
            )),
        }
    }

    /// Snapshot of the current lines
    pub async fn lines(&self) -> Vec<String> {
        self.lines.read().await.clone()
    }

    /// Number of lines in the store
    pub async fn len(&self) -> usize {
        self.lines.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.lines.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn read_lines(&self) -> Result<Vec<String>, Error> {
        Ok(self.lines().await)
    }

    async fn append_record(&self, record: &Record) -> Result<(), Error> {
        let mut guard = self.lines.write().await;
        guard.push(codec::format_record(record));
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
