//! Test doubles and common utilities for directory contract tests

#![allow(dead_code)]

use hostdir_core::error::{Error, Result};
use hostdir_core::traits::RecordStore;
use hostdir_core::{AddressValue, MemoryRecordStore, NameValue, Record};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// The three-record store used throughout the tests
pub const EXAMPLE_LINES: [&str; 3] = [
    "www.uvsq.fr 193.51.31.90",
    "poste.uvsq.fr 193.51.31.154",
    "ecampus.uvsq.fr 193.51.25.12",
];

/// Memory store seeded with [`EXAMPLE_LINES`]
pub fn example_store() -> MemoryRecordStore {
    MemoryRecordStore::from_lines(EXAMPLE_LINES)
}

pub fn name(s: &str) -> NameValue {
    NameValue::parse(s).expect("valid test name")
}

pub fn address(s: &str) -> AddressValue {
    AddressValue::parse(s).expect("valid test address")
}

/// A store whose appends can be switched to fail
///
/// Wraps a [`MemoryRecordStore`] and counts append attempts.
#[derive(Clone)]
pub struct FlakyStore {
    inner: MemoryRecordStore,
    fail_appends: Arc<AtomicBool>,
    append_attempts: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub fn new(inner: MemoryRecordStore) -> Self {
        Self {
            inner,
            fail_appends: Arc::new(AtomicBool::new(false)),
            append_attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every following append fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.fail_appends.store(failing, Ordering::SeqCst);
    }

    /// Number of times append_record() was called
    pub fn append_attempts(&self) -> usize {
        self.append_attempts.load(Ordering::SeqCst)
    }

    /// Lines actually persisted
    pub async fn lines(&self) -> Vec<String> {
        self.inner.lines().await
    }
}

#[async_trait::async_trait]
impl RecordStore for FlakyStore {
    async fn read_lines(&self) -> Result<Vec<String>> {
        self.inner.read_lines().await
    }

    async fn append_record(&self, record: &Record) -> Result<()> {
        self.append_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(Error::persistence("simulated disk failure"));
        }
        self.inner.append_record(record).await
    }

    fn describe(&self) -> String {
        "flaky".to_string()
    }
}
