// # Record Store Trait
//
// Defines the interface to the backing store of the directory.
//
// ## Purpose
//
// The record store is a durability log. The directory reads it once at
// load time and appends one line per successful `add`; it is never used as
// the read path afterwards.
//
// ## Implementations
//
// - File-based: the line-oriented text file (`FileRecordStore`)
// - In-memory: a vector of lines, for tests and ephemeral directories
//   (`MemoryRecordStore`)
//
// ## Usage
//
// ```rust,ignore
// use hostdir_core::RecordStore;
//
// let lines = store.read_lines().await?;
// store.append_record(&record).await?;
// ```

use async_trait::async_trait;

use crate::Error;
use crate::model::Record;

/// Trait for backing store implementations
///
/// Implementations own the resource (file, buffer) and the line codec
/// applied when writing. Reading returns raw lines so the caller can
/// report line numbers on parse failures.
///
/// # Resource discipline
///
/// - The underlying handle is acquired for the duration of a single call
///   and released before it returns, on success and on failure.
/// - `append_record` must either write the whole line or return
///   [`Error::PersistenceFailure`]; the directory relies on this to keep
///   memory and storage in step.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read every line currently in the store, in order
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<String>)`: The lines, without terminators (empty if the
    ///   store does not exist yet)
    /// - `Err(Error)`: Storage error
    async fn read_lines(&self) -> Result<Vec<String>, Error>;

    /// Append one record as a newline-terminated line
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The line is written and flushed
    /// - `Err(Error::PersistenceFailure)`: Nothing usable was written
    async fn append_record(&self, record: &Record) -> Result<(), Error>;

    /// Human-readable description of the store, used in logs
    fn describe(&self) -> String;
}
