//! Name/address pairing

use std::fmt;

use super::{AddressValue, NameValue};

/// One name ↔ address pairing
///
/// Records are immutable: the directory hands out clones, and identity is
/// the pair itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    name: NameValue,
    address: AddressValue,
}

impl Record {
    /// Pair a name with an address
    pub fn new(name: NameValue, address: AddressValue) -> Self {
        Self { name, address }
    }

    /// The qualified machine name
    pub fn name(&self) -> &NameValue {
        &self.name
    }

    /// The IPv4 address
    pub fn address(&self) -> &AddressValue {
        &self.address
    }
}

/// Renders the backing-store form, `<name> <address>`
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.address)
    }
}
