// # Record Store Implementations
//
// This module provides the line codec and the implementations of the
// RecordStore trait for different persistence strategies.

pub mod codec;
pub mod file;
pub mod memory;

pub use codec::{format_record, parse_line};
pub use file::FileRecordStore;
pub use memory::MemoryRecordStore;
