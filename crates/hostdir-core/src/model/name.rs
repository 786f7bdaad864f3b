//! Validated fully-qualified machine name
//!
//! Names follow the usual hostname rules (RFC 1035 lengths, letters,
//! digits and hyphens) and are stored lowercase, so lookups are
//! case-insensitive.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Maximum total length of a qualified name
const MAX_NAME_LEN: usize = 253;

/// Maximum length of a single label
const MAX_LABEL_LEN: usize = 63;

/// A fully-qualified machine name such as `www.uvsq.fr`
///
/// A qualified name has at least two labels: the machine itself and the
/// domain it lives in.
///
/// # Example
///
/// ```rust
/// use hostdir_core::NameValue;
///
/// let name: NameValue = "WWW.Uvsq.FR".parse().unwrap();
/// assert_eq!(name.to_string(), "www.uvsq.fr");
/// assert!(name.belongs_to_domain("uvsq.fr"));
/// assert!(!name.belongs_to_domain("vsq.fr"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameValue(String);

impl NameValue {
    /// Parse and canonicalise a qualified name
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::invalid_name(input, "name cannot be empty"));
        }

        if input.len() > MAX_NAME_LEN {
            return Err(Error::invalid_name(
                input,
                format!("{} chars exceeds the {MAX_NAME_LEN} limit", input.len()),
            ));
        }

        let mut labels = 0;
        let mut last = "";
        for label in input.split('.') {
            validate_label(input, label)?;
            labels += 1;
            last = label;
        }

        if labels < 2 {
            return Err(Error::invalid_name(
                input,
                "a qualified name needs a machine and a domain",
            ));
        }

        // Keeps names and dotted addresses apart
        if last.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid_name(
                input,
                format!("top-level label '{last}' cannot be all digits"),
            ));
        }

        Ok(Self(input.to_ascii_lowercase()))
    }

    /// The canonical lowercase name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The machine label (everything before the first dot)
    pub fn host(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(host, _)| host)
    }

    /// The domain part (everything after the first dot)
    pub fn domain(&self) -> &str {
        self.0.split_once('.').map_or("", |(_, domain)| domain)
    }

    /// Whether this name equals `domain` or sits underneath it
    ///
    /// The match is on whole labels: `www.uvsq.fr` belongs to `uvsq.fr` and
    /// `fr`, but not to `vsq.fr`. A trailing dot on `domain` is ignored.
    pub fn belongs_to_domain(&self, domain: &str) -> bool {
        let domain = domain.trim_end_matches('.');
        if domain.is_empty() {
            return false;
        }

        let name = self.0.as_str();
        if name.len() == domain.len() {
            return name.eq_ignore_ascii_case(domain);
        }

        name.len() > domain.len()
            && name.as_bytes()[name.len() - domain.len() - 1] == b'.'
            && name[name.len() - domain.len()..].eq_ignore_ascii_case(domain)
    }
}

fn validate_label(input: &str, label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(Error::invalid_name(input, "name has an empty label"));
    }

    if label.len() > MAX_LABEL_LEN {
        return Err(Error::invalid_name(
            input,
            format!("label '{label}' exceeds {MAX_LABEL_LEN} chars"),
        ));
    }

    if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        return Err(Error::invalid_name(
            input,
            format!("label '{label}' may only contain letters, digits and hyphens"),
        ));
    }

    if label.starts_with('-') || label.ends_with('-') {
        return Err(Error::invalid_name(
            input,
            format!("label '{label}' cannot start or end with a hyphen"),
        ));
    }

    Ok(())
}

impl FromStr for NameValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for NameValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NameValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
