//! Bidirectional host directory
//!
//! The [`Directory`] indexes records by name and by address and keeps them
//! in insertion order for domain listings. It is loaded once from a
//! [`RecordStore`] and then owns the authoritative copy; the store only
//! receives appends.
//!
//! ## Invariants
//!
//! - Every record is reachable by its name and by its address, and appears
//!   exactly once in insertion order
//! - No two records share a name; no two records share an address
//! - Memory and store never diverge: `add` persists before it publishes,
//!   and publishes nothing if persisting fails
//!
//! ## Concurrency
//!
//! State lives behind a `tokio::sync::RwLock`. Lookups share the read lock.
//! `add` holds the write lock from the duplicate check through the append
//! to the index, so concurrent adds are serialised and readers only ever
//! see a fully published record.

use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{AddressValue, NameValue, Record};
use crate::store::codec;
use crate::traits::RecordStore;

/// In-memory index over records
#[derive(Debug, Default)]
struct Index {
    /// Records in insertion order
    records: Vec<Record>,

    /// Name → position in `records`
    by_name: HashMap<NameValue, usize>,

    /// Address → position in `records`
    by_address: HashMap<AddressValue, usize>,
}

impl Index {
    /// Reject `record` if its name or address is already taken
    fn check_unique(&self, record: &Record) -> Result<()> {
        if self.by_name.contains_key(record.name()) {
            return Err(Error::DuplicateName(record.name().to_string()));
        }
        if self.by_address.contains_key(record.address()) {
            return Err(Error::DuplicateAddress(record.address().to_string()));
        }
        Ok(())
    }

    /// Insert a record already known to be unique
    fn insert_unchecked(&mut self, record: Record) {
        let position = self.records.len();
        self.by_name.insert(record.name().clone(), position);
        self.by_address.insert(*record.address(), position);
        self.records.push(record);
    }

    fn by_name(&self, name: &NameValue) -> Option<&Record> {
        self.by_name.get(name).map(|&i| &self.records[i])
    }

    fn by_address(&self, address: &AddressValue) -> Option<&Record> {
        self.by_address.get(address).map(|&i| &self.records[i])
    }
}

/// Name ↔ IPv4 directory backed by a record store
///
/// # Example
///
/// ```rust
/// use hostdir_core::store::MemoryRecordStore;
/// use hostdir_core::{AddressValue, Directory, NameValue};
///
/// #[tokio::main]
/// async fn main() -> hostdir_core::Result<()> {
///     let store = MemoryRecordStore::from_lines(["www.uvsq.fr 193.51.31.90"]);
///     let directory = Directory::load(Box::new(store)).await?;
///
///     let www = directory.lookup_by_name(&"www.uvsq.fr".parse::<NameValue>()?).await;
///     assert_eq!(www.unwrap().address().to_string(), "193.51.31.90");
///
///     directory
///         .add(AddressValue::parse("193.51.25.24")?, NameValue::parse("etudiante.uvsq.fr")?)
///         .await?;
///     assert_eq!(directory.lookup_by_domain("uvsq.fr").await.len(), 2);
///
///     Ok(())
/// }
/// ```
pub struct Directory {
    /// Durability log for added records
    store: Box<dyn RecordStore>,

    /// Authoritative in-memory state
    index: RwLock<Index>,
}

impl Directory {
    /// Build a directory from every line of `store`
    ///
    /// Blank lines are skipped. Any other line that is not exactly
    /// `<name> <address>` with valid tokens aborts the load with
    /// [`Error::MalformedLine`]. A store that repeats a name or an address
    /// is rejected as a whole with [`Error::DuplicateName`] or
    /// [`Error::DuplicateAddress`].
    pub async fn load(store: Box<dyn RecordStore>) -> Result<Self> {
        let lines = store.read_lines().await?;
        let mut index = Index::default();

        for (i, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let record = codec::parse_line(line).map_err(|e| match e {
                Error::MalformedLine { reason, .. } => Error::malformed_line(i + 1, reason),
                other => Error::malformed_line(i + 1, other.to_string()),
            })?;

            if let Err(e) = index.check_unique(&record) {
                warn!(
                    "Rejecting {}: line {} repeats an existing entry ({})",
                    store.describe(),
                    i + 1,
                    e
                );
                return Err(e);
            }
            index.insert_unchecked(record);
        }

        debug!(
            "Loaded {} record(s) from {}",
            index.records.len(),
            store.describe()
        );

        Ok(Self {
            store,
            index: RwLock::new(index),
        })
    }

    /// Exact lookup by qualified name
    pub async fn lookup_by_name(&self, name: &NameValue) -> Option<Record> {
        self.index.read().await.by_name(name).cloned()
    }

    /// Exact lookup by address
    pub async fn lookup_by_address(&self, address: &AddressValue) -> Option<Record> {
        self.index.read().await.by_address(address).cloned()
    }

    /// All records whose name belongs to `domain`, in insertion order
    pub async fn lookup_by_domain(&self, domain: &str) -> Vec<Record> {
        self.index
            .read()
            .await
            .records
            .iter()
            .filter(|record| record.name().belongs_to_domain(domain))
            .cloned()
            .collect()
    }

    /// Add a new record and persist it
    ///
    /// Fails with [`Error::DuplicateName`] or [`Error::DuplicateAddress`]
    /// (name is checked first) without touching memory or store. If the
    /// store append fails the error is returned and the directory is left
    /// exactly as it was.
    pub async fn add(&self, address: AddressValue, name: NameValue) -> Result<Record> {
        let record = Record::new(name, address);
        let mut index = self.index.write().await;

        if let Err(e) = index.check_unique(&record) {
            warn!("Rejected add of '{}': {}", record, e);
            return Err(e);
        }

        // Persist first: the index is only touched once the line is durable.
        if let Err(e) = self.store.append_record(&record).await {
            warn!("Failed to persist '{}': {}", record, e);
            return Err(match e {
                Error::PersistenceFailure(_) => e,
                other => Error::persistence(other.to_string()),
            });
        }

        index.insert_unchecked(record.clone());
        info!("Added {} -> {}", record.name(), record.address());

        Ok(record)
    }

    /// Number of records
    pub async fn len(&self) -> usize {
        self.index.read().await.records.len()
    }

    /// Check if the directory holds no records
    pub async fn is_empty(&self) -> bool {
        self.index.read().await.records.is_empty()
    }

    /// Snapshot of all records in insertion order
    pub async fn records(&self) -> Vec<Record> {
        self.index.read().await.records.clone()
    }

    /// Description of the backing store
    pub fn store_description(&self) -> String {
        self.store.describe()
    }
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field("store", &self.store.describe())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;

    fn example_store() -> MemoryRecordStore {
        MemoryRecordStore::from_lines([
            "www.uvsq.fr 193.51.31.90",
            "poste.uvsq.fr 193.51.31.154",
            "ecampus.uvsq.fr 193.51.25.12",
        ])
    }

    fn name(s: &str) -> NameValue {
        NameValue::parse(s).unwrap()
    }

    fn address(s: &str) -> AddressValue {
        AddressValue::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_load_indexes_both_ways() {
        let directory = Directory::load(Box::new(example_store())).await.unwrap();
        assert_eq!(directory.len().await, 3);

        let poste = directory.lookup_by_name(&name("poste.uvsq.fr")).await.unwrap();
        assert_eq!(poste.address().to_string(), "193.51.31.154");

        let ecampus = directory
            .lookup_by_address(&address("193.51.25.12"))
            .await
            .unwrap();
        assert_eq!(ecampus.name().as_str(), "ecampus.uvsq.fr");
    }

    #[tokio::test]
    async fn test_load_skips_blank_lines() {
        let store = MemoryRecordStore::from_lines(["", "www.uvsq.fr 193.51.31.90", "   "]);
        let directory = Directory::load(Box::new(store)).await.unwrap();
        assert_eq!(directory.len().await, 1);
    }

    #[tokio::test]
    async fn test_load_reports_line_number() {
        let store = MemoryRecordStore::from_lines([
            "www.uvsq.fr 193.51.31.90",
            "poste.uvsq.fr",
            "ecampus.uvsq.fr 193.51.25.12",
        ]);
        let err = Directory::load(Box::new(store)).await.unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line_number: 2, .. }));
    }

    #[tokio::test]
    async fn test_load_wraps_token_errors() {
        let store = MemoryRecordStore::from_lines(["www.uvsq.fr 193.51.31.900"]);
        let err = Directory::load(Box::new(store)).await.unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line_number: 1, .. }));
    }

    #[tokio::test]
    async fn test_add_checks_name_before_address() {
        let directory = Directory::load(Box::new(example_store())).await.unwrap();

        // Both name and address collide: name wins
        let err = directory
            .add(address("193.51.31.90"), name("www.uvsq.fr"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_add_is_case_insensitive_on_names() {
        let directory = Directory::load(Box::new(example_store())).await.unwrap();
        let err = directory
            .add(address("10.0.0.1"), name("WWW.UVSQ.FR"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_add_appends_to_store() {
        let store = example_store();
        let directory = Directory::load(Box::new(store.clone())).await.unwrap();

        let record = directory
            .add(address("193.51.25.24"), name("etudiante.uvsq.fr"))
            .await
            .unwrap();

        assert_eq!(record.to_string(), "etudiante.uvsq.fr 193.51.25.24");
        assert_eq!(store.len().await, 4);
        assert_eq!(store.lines().await[3], "etudiante.uvsq.fr 193.51.25.24");
        assert_eq!(directory.records().await.last(), Some(&record));
    }

    #[tokio::test]
    async fn test_lookup_by_domain_is_fresh_per_call() {
        let directory = Directory::load(Box::new(example_store())).await.unwrap();

        let before = directory.lookup_by_domain("uvsq.fr").await;
        directory
            .add(address("192.168.0.1"), name("mail.uvsq.fr"))
            .await
            .unwrap();
        let after = directory.lookup_by_domain("uvsq.fr").await;

        assert_eq!(before.len(), 3);
        assert_eq!(after.len(), 4);
        assert_eq!(after[3].name().as_str(), "mail.uvsq.fr");
    }
}
