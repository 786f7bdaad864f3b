//! Text command interpreter
//!
//! Hosts (interactive shell, line-protocol server) read one command per
//! line, hand it to [`Command::parse`], run it with [`Command::execute`] and
//! write the [`Reply`] back. The grammar:
//!
//! ```text
//! www.uvsq.fr                 -> 193.51.31.90
//! 193.51.31.90                -> www.uvsq.fr
//! ls [-a] uvsq.fr             -> one "<ip> <name>" line per record
//! add 193.51.25.24 etu.uvsq.fr
//! quit | exit
//! ```

use std::fmt;
use std::str::FromStr;

use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::model::{AddressValue, NameValue, Record};

/// Ordering applied to `ls` output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Sort by qualified name (default)
    ByName,
    /// Sort by address (`ls -a`)
    ByAddress,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve a name to its address
    LookupName(NameValue),

    /// Resolve an address to its name
    LookupAddress(AddressValue),

    /// List every record of a domain
    List {
        /// Domain suffix to match
        domain: String,
        /// Output ordering
        order: ListOrder,
    },

    /// Add a new record
    Add {
        /// Address of the new record
        address: AddressValue,
        /// Name of the new record
        name: NameValue,
    },

    /// End the session
    Quit,
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            [] => Err(Error::invalid_command("empty command")),
            ["quit" | "exit"] => Ok(Command::Quit),
            ["ls", "-a", domain] => Ok(Command::List {
                domain: domain.to_ascii_lowercase(),
                order: ListOrder::ByAddress,
            }),
            ["ls", domain] if !domain.starts_with('-') => Ok(Command::List {
                domain: domain.to_ascii_lowercase(),
                order: ListOrder::ByName,
            }),
            ["ls", ..] => Err(Error::invalid_command("usage: ls [-a] <domain>")),
            ["add", address, name] => Ok(Command::Add {
                address: AddressValue::parse(address)?,
                name: NameValue::parse(name)?,
            }),
            ["add", ..] => Err(Error::invalid_command("usage: add <address> <name>")),
            [single] if looks_like_address(single) => {
                Ok(Command::LookupAddress(AddressValue::parse(single)?))
            }
            [single] => Ok(Command::LookupName(NameValue::parse(single)?)),
            _ => Err(Error::invalid_command(format!("unrecognised command: {line}"))),
        }
    }

    /// Whether this command ends the session
    pub fn is_quit(&self) -> bool {
        matches!(self, Command::Quit)
    }

    /// Run the command against `directory`
    pub async fn execute(&self, directory: &Directory) -> Result<Reply> {
        match self {
            Command::LookupName(name) => Ok(directory
                .lookup_by_name(name)
                .await
                .map_or(Reply::NotFound, |record| Reply::Address(*record.address()))),
            Command::LookupAddress(address) => Ok(directory
                .lookup_by_address(address)
                .await
                .map_or(Reply::NotFound, |record| {
                    Reply::Name(record.name().clone())
                })),
            Command::List { domain, order } => {
                let mut records = directory.lookup_by_domain(domain).await;
                match order {
                    ListOrder::ByName => records.sort_by(|a, b| a.name().cmp(b.name())),
                    ListOrder::ByAddress => records.sort_by_key(|r| *r.address()),
                }
                Ok(Reply::Records(records))
            }
            Command::Add { address, name } => {
                let record = directory.add(*address, name.clone()).await?;
                Ok(Reply::Added(record))
            }
            Command::Quit => Ok(Reply::Bye),
        }
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Digits and dots only: treat as an address even if it fails validation,
/// so `1.2.3` reports an address error rather than a name error. No valid
/// name looks like this, its top-level label would be all digits.
fn looks_like_address(token: &str) -> bool {
    token.contains('.') && token.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}

/// Result of a command, rendered with `Display`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Address of a looked-up name
    Address(AddressValue),
    /// Name of a looked-up address
    Name(NameValue),
    /// Lookup had no match
    NotFound,
    /// Records of a domain listing
    Records(Vec<Record>),
    /// Record successfully added
    Added(Record),
    /// Session ended
    Bye,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Address(address) => write!(f, "{address}"),
            Reply::Name(name) => write!(f, "{name}"),
            Reply::NotFound => f.write_str("not found"),
            Reply::Records(records) => {
                for (i, record) in records.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{} {}", record.address(), record.name())?;
                }
                Ok(())
            }
            Reply::Added(record) => write!(f, "added {} {}", record.name(), record.address()),
            Reply::Bye => f.write_str("bye"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookups() {
        assert_eq!(
            Command::parse("www.uvsq.fr").unwrap(),
            Command::LookupName(NameValue::parse("www.uvsq.fr").unwrap())
        );
        assert_eq!(
            Command::parse(" 193.51.31.90 ").unwrap(),
            Command::LookupAddress(AddressValue::parse("193.51.31.90").unwrap())
        );
    }

    #[test]
    fn test_numeric_host_labels_are_names() {
        assert_eq!(
            Command::parse("10.lab").unwrap(),
            Command::LookupName(NameValue::parse("10.lab").unwrap())
        );
        assert_eq!(
            Command::parse("123.uvsq.fr").unwrap(),
            Command::LookupName(NameValue::parse("123.uvsq.fr").unwrap())
        );
    }

    #[test]
    fn test_parse_ls() {
        assert_eq!(
            Command::parse("ls UVSQ.fr").unwrap(),
            Command::List {
                domain: "uvsq.fr".to_string(),
                order: ListOrder::ByName
            }
        );
        assert_eq!(
            Command::parse("ls -a uvsq.fr").unwrap(),
            Command::List {
                domain: "uvsq.fr".to_string(),
                order: ListOrder::ByAddress
            }
        );
        assert!(matches!(
            Command::parse("ls"),
            Err(Error::InvalidCommand(_))
        ));
        assert!(matches!(
            Command::parse("ls -a"),
            Err(Error::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_parse_add() {
        let command: Command = "add 193.51.25.24 etudiante.uvsq.fr".parse().unwrap();
        assert_eq!(
            command,
            Command::Add {
                address: AddressValue::parse("193.51.25.24").unwrap(),
                name: NameValue::parse("etudiante.uvsq.fr").unwrap(),
            }
        );
        assert!(matches!(
            Command::parse("add 193.51.25.24"),
            Err(Error::InvalidCommand(_))
        ));
        assert!(matches!(
            Command::parse("add etudiante.uvsq.fr 193.51.25.24"),
            Err(Error::InvalidAddressFormat { .. })
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Command::parse("   "), Err(Error::InvalidCommand(_))));
        assert!(matches!(
            Command::parse("193.51.31"),
            Err(Error::InvalidAddressFormat { .. })
        ));
        assert!(matches!(
            Command::parse("localhost"),
            Err(Error::InvalidNameFormat { .. })
        ));
        assert!(matches!(
            Command::parse("who is www.uvsq.fr"),
            Err(Error::InvalidCommand(_))
        ));
        assert!(matches!(
            Command::parse("add 10.0.0.1 1.2"),
            Err(Error::InvalidNameFormat { .. })
        ));
        assert!(Command::parse("quit").unwrap().is_quit());
        assert!(Command::parse("exit").unwrap().is_quit());
    }

    #[test]
    fn test_reply_rendering() {
        let record = Record::new(
            NameValue::parse("www.uvsq.fr").unwrap(),
            AddressValue::parse("193.51.31.90").unwrap(),
        );
        assert_eq!(Reply::NotFound.to_string(), "not found");
        assert_eq!(
            Reply::Added(record.clone()).to_string(),
            "added www.uvsq.fr 193.51.31.90"
        );
        assert_eq!(
            Reply::Records(vec![record.clone(), record]).to_string(),
            "193.51.31.90 www.uvsq.fr\n193.51.31.90 www.uvsq.fr"
        );
        assert_eq!(Reply::Records(Vec::new()).to_string(), "");
    }
}
