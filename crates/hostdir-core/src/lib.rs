// # hostdir-core
//
// Core library for the host directory: a bidirectional, uniqueness-enforcing
// mapping between fully-qualified machine names and IPv4 addresses, backed by
// a line-oriented text file.
//
// ## Architecture Overview
//
// - **AddressValue / NameValue / Record**: validated value types
// - **RecordStore**: Trait for the backing store (file or memory)
// - **codec**: `<name> <address>` line format
// - **Directory**: In-memory index over records, loaded from and appended
//   to a RecordStore
// - **Command**: Text command interpreter used by hosts
//
// ## Design Principles
//
// 1. **Memory is authoritative**: the store is read once, then only appended to
// 2. **No drift**: an `add` that cannot be persisted changes nothing
// 3. **Uniqueness both ways**: a name or an address is never reused
// 4. **Library-First**: hosts are thin callers of this contract

pub mod command;
pub mod config;
pub mod directory;
pub mod error;
pub mod model;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use command::{Command, ListOrder, Reply};
pub use config::{HostdirConfig, ServerConfig, StoreConfig};
pub use directory::Directory;
pub use error::{Error, Result};
pub use model::{AddressValue, NameValue, Record};
pub use store::{FileRecordStore, MemoryRecordStore};
pub use traits::RecordStore;
