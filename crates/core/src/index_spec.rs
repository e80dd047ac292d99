// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Table index specifications.
//!
//! A specification is an ordered, comma-separated list of field names. The
//! first entry names the primary key of every record in the table; the rest
//! are fields eligible for indexed lookup.
//!
//! ```text
//! ++id, name, &sku, *tags
//! ^^            ^     ^
//! |             |     multi-entry: array values are indexed per element
//! |             unique: no two records share a value
//! auto-increment primary key
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing an index specification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexSpecError {
    #[error("index specification is empty")]
    Empty,
    #[error("empty field name at position {0}")]
    EmptyField(usize),
    #[error("invalid field name '{0}'")]
    InvalidField(String),
    #[error("duplicate field '{0}'")]
    Duplicate(String),
    #[error("primary key '{0}' cannot be unique or multi-entry")]
    InvalidPrimaryKey(String),
    #[error("'++' is only allowed on the primary key, found on '{0}'")]
    MisplacedAutoIncrement(String),
}

/// Primary key of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    pub field: String,
    /// Inserts without a key get the next integer (`++`)
    pub auto_increment: bool,
}

/// A secondary indexed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexField {
    pub field: String,
    /// `&`
    pub unique: bool,
    /// `*`
    pub multi_entry: bool,
}

/// Parsed index specification for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndexSpec {
    primary: PrimaryKey,
    indexes: Vec<IndexField>,
}

impl IndexSpec {
    pub fn parse(spec: &str) -> Result<Self, IndexSpecError> {
        spec.parse()
    }

    pub fn primary_key(&self) -> &PrimaryKey {
        &self.primary
    }

    pub fn indexes(&self) -> &[IndexField] {
        &self.indexes
    }

    /// Look up a secondary index by field name.
    pub fn index(&self, field: &str) -> Option<&IndexField> {
        self.indexes.iter().find(|i| i.field == field)
    }

    /// True if `field` is the primary key or a secondary index.
    pub fn is_indexed(&self, field: &str) -> bool {
        self.primary.field == field || self.index(field).is_some()
    }

    /// Field names in declaration order, primary key first.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.field.as_str())
            .chain(self.indexes.iter().map(|i| i.field.as_str()))
    }
}

fn valid_field_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$')
}

impl FromStr for IndexSpec {
    type Err = IndexSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(IndexSpecError::Empty);
        }

        let mut primary = None;
        let mut indexes: Vec<IndexField> = Vec::new();

        for (pos, raw) in s.split(',').enumerate() {
            let entry = raw.trim();
            if entry.is_empty() {
                return Err(IndexSpecError::EmptyField(pos));
            }

            let (auto_increment, rest) = match entry.strip_prefix("++") {
                Some(rest) => (true, rest),
                None => (false, entry),
            };
            let (unique, rest) = match rest.strip_prefix('&') {
                Some(rest) => (true, rest),
                None => (false, rest),
            };
            let (multi_entry, name) = match rest.strip_prefix('*') {
                Some(rest) => (true, rest),
                None => (false, rest),
            };

            if name.is_empty() {
                return Err(IndexSpecError::EmptyField(pos));
            }
            if !valid_field_name(name) {
                return Err(IndexSpecError::InvalidField(entry.to_string()));
            }

            if pos == 0 {
                if unique || multi_entry {
                    return Err(IndexSpecError::InvalidPrimaryKey(name.to_string()));
                }
                primary = Some(PrimaryKey {
                    field: name.to_string(),
                    auto_increment,
                });
                continue;
            }

            if auto_increment {
                return Err(IndexSpecError::MisplacedAutoIncrement(name.to_string()));
            }
            let primary_field = primary.as_ref().map(|p| p.field.as_str());
            if primary_field == Some(name) || indexes.iter().any(|i| i.field == name) {
                return Err(IndexSpecError::Duplicate(name.to_string()));
            }
            indexes.push(IndexField {
                field: name.to_string(),
                unique,
                multi_entry,
            });
        }

        let primary = primary.ok_or(IndexSpecError::Empty)?;
        Ok(Self { primary, indexes })
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.primary.auto_increment {
            write!(f, "++")?;
        }
        write!(f, "{}", self.primary.field)?;
        for index in &self.indexes {
            write!(f, ", ")?;
            if index.unique {
                write!(f, "&")?;
            }
            if index.multi_entry {
                write!(f, "*")?;
            }
            write!(f, "{}", index.field)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for IndexSpec {
    type Error = IndexSpecError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IndexSpec> for String {
    fn from(spec: IndexSpec) -> Self {
        spec.to_string()
    }
}

#[cfg(test)]
#[path = "index_spec_tests.rs"]
mod tests;
