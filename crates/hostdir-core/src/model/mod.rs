//! Value types held by the directory
//!
//! - [`AddressValue`]: validated IPv4 address
//! - [`NameValue`]: validated, lowercase qualified name
//! - [`Record`]: one name/address pairing

pub mod address;
pub mod name;
pub mod record;

pub use address::AddressValue;
pub use name::NameValue;
pub use record::Record;
