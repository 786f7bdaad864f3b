//! Validated IPv4 address value

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Maximum digits accepted for a single octet (leading zeros included)
const MAX_OCTET_DIGITS: usize = 3;

/// An IPv4 address in dotted-quad form
///
/// Parsing accepts exactly four dot-separated decimal octets in `0..=255`.
/// Leading zeros are tolerated and dropped from the canonical form, so
/// `"010.000.1.1"` and `"10.0.1.1"` are the same value.
///
/// # Example
///
/// ```rust
/// use hostdir_core::AddressValue;
///
/// let address: AddressValue = "193.51.031.90".parse().unwrap();
/// assert_eq!(address.to_string(), "193.51.31.90");
/// assert!("193.51.31".parse::<AddressValue>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressValue(Ipv4Addr);

impl AddressValue {
    /// Parse a dotted-quad string
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() != 4 {
            return Err(Error::invalid_address(
                input,
                format!("expected 4 octets, found {}", parts.len()),
            ));
        }

        let mut octets = [0u8; 4];
        for (slot, part) in octets.iter_mut().zip(&parts) {
            *slot = parse_octet(input, part)?;
        }

        Ok(Self(Ipv4Addr::from(octets)))
    }

    /// The four octets, most significant first
    pub fn octets(&self) -> [u8; 4] {
        self.0.octets()
    }

    /// The address as a standard library value
    pub fn as_ipv4(&self) -> Ipv4Addr {
        self.0
    }
}

fn parse_octet(input: &str, part: &str) -> Result<u8> {
    if part.is_empty() {
        return Err(Error::invalid_address(input, "empty octet"));
    }
    if part.len() > MAX_OCTET_DIGITS || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_address(
            input,
            format!("octet '{part}' is not a number in 0..=255"),
        ));
    }
    part.parse::<u8>().map_err(|_| {
        Error::invalid_address(input, format!("octet '{part}' is out of range 0..=255"))
    })
}

impl FromStr for AddressValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for AddressValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Ipv4Addr> for AddressValue {
    fn from(addr: Ipv4Addr) -> Self {
        Self(addr)
    }
}

impl From<AddressValue> for Ipv4Addr {
    fn from(value: AddressValue) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        let address = AddressValue::parse("193.51.31.90").unwrap();
        assert_eq!(address.to_string(), "193.51.31.90");
        assert_eq!(address.octets(), [193, 51, 31, 90]);
    }

    #[test]
    fn test_leading_zeros_are_canonicalised() {
        let padded = AddressValue::parse("010.000.001.255").unwrap();
        assert_eq!(padded.to_string(), "10.0.1.255");
        assert_eq!(padded, AddressValue::parse("10.0.1.255").unwrap());
    }

    #[test]
    fn test_round_trip_over_octet_grid() {
        const OCTETS: [u8; 12] = [0, 1, 7, 9, 10, 42, 99, 100, 199, 200, 250, 255];

        for a in OCTETS {
            for b in OCTETS {
                for c in OCTETS {
                    for d in OCTETS {
                        let canonical = Ipv4Addr::new(a, b, c, d).to_string();
                        let plain = format!("{a}.{b}.{c}.{d}");
                        let padded = format!("{a:03}.{b:03}.{c:03}.{d:03}");

                        assert_eq!(AddressValue::parse(&plain).unwrap().to_string(), canonical);
                        assert_eq!(AddressValue::parse(&padded).unwrap().to_string(), canonical);
                    }
                }
            }
        }
    }

    #[test]
    fn test_boundaries() {
        assert!(AddressValue::parse("0.0.0.0").is_ok());
        assert!(AddressValue::parse("255.255.255.255").is_ok());
        assert!(AddressValue::parse("256.0.0.1").is_err());
        assert!(AddressValue::parse("1.2.3.300").is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        for input in [
            "",
            "1.2.3",
            "1.2.3.4.5",
            "1..3.4",
            "1.2.3.",
            "a.b.c.d",
            "+1.2.3.4",
            " 1.2.3.4",
            "1.2.3.0004",
            "::1",
        ] {
            let err = AddressValue::parse(input).unwrap_err();
            assert!(
                matches!(err, Error::InvalidAddressFormat { .. }),
                "expected InvalidAddressFormat for {input:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_std_conversion() {
        let std_addr = Ipv4Addr::new(192, 168, 1, 1);
        let value = AddressValue::from(std_addr);
        assert_eq!(Ipv4Addr::from(value), std_addr);
        assert_eq!(value.as_ipv4(), std_addr);
    }
}
