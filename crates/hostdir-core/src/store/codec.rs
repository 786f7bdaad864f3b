//! Line codec for the backing store
//!
//! One record per line, `<qualified name> <dotted quad>`:
//!
//! ```text
//! www.uvsq.fr 193.51.31.90
//! poste.uvsq.fr 193.51.31.154
//! ```

use crate::error::{Error, Result};
use crate::model::{AddressValue, NameValue, Record};

/// Parse one backing-store line into a record
///
/// The line is split on whitespace and must hold exactly two tokens. Token
/// validation errors are returned unchanged; a wrong token count yields
/// [`Error::MalformedLine`] with line number 0.
pub fn parse_line(line: &str) -> Result<Record> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [name, address] = tokens.as_slice() else {
        return Err(Error::malformed_line(
            0,
            format!("expected '<name> <address>', found {} token(s)", tokens.len()),
        ));
    };

    Ok(Record::new(NameValue::parse(name)?, AddressValue::parse(address)?))
}

/// Render a record as a backing-store line (without terminator)
pub fn format_record(record: &Record) -> String {
    format!("{} {}", record.name(), record.address())
}
