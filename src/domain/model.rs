use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// File name of the consolidated index inside the output directory.
pub const INDEX_FILE_NAME: &str = "valueset-db.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    pub code: String,
    pub system: String,
    pub version: String,
}

/// OID -> value set version -> codes.
///
/// Serialized as a plain JSON object so a written `valueset-db.json` can be
/// loaded back with [`ValueSetIndex::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueSetIndex {
    entries: BTreeMap<String, BTreeMap<String, Vec<Code>>>,
}

impl ValueSetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn contains(&self, oid: &str) -> bool {
        self.entries.contains_key(oid)
    }

    pub fn get(&self, oid: &str) -> Option<&BTreeMap<String, Vec<Code>>> {
        self.entries.get(oid)
    }

    /// Replaces the codes stored for `oid` at `version`.
    pub fn insert(&mut self, oid: &str, version: &str, codes: Vec<Code>) {
        self.entries
            .entry(oid.to_string())
            .or_default()
            .insert(version.to_string(), codes);
    }

    pub fn oids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A value set reference as it appears in a library: a display name plus a
/// composite identifier (`urn:oid:...`, a FHIR ValueSet URL or a bare OID,
/// optionally versioned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSetDescriptor {
    pub name: String,
    pub id: String,
}

impl ValueSetDescriptor {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantingTicket(String);

impl GrantingTicket {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Single use; consumed by the fetch it was minted for.
#[derive(Debug, PartialEq, Eq)]
pub struct ServiceTicket(String);

impl ServiceTicket {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every requested value set was already known; no request was made.
    NothingToFetch,
    Completed {
        /// `None` when caching is disabled.
        index_path: Option<PathBuf>,
        downloaded: Vec<String>,
    },
}
