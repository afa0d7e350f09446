//! URL table.
//!
//! A flat, string-keyed table of download locations, normally loaded
//! once from a TOML file at startup. Code looks entries up through the
//! fixed [`UrlKey`] set; unknown keys in the file are kept but ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Known URL table keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlKey {
    /// Hacking guide landing page.
    Guide,
    /// Soundhax audio file.
    Soundhax,
    /// Homebrew Launcher payload (`otherapp.bin`).
    Otherapp,
    Boot9strap,
    SafeB9sInstaller,
    Luma3ds,
    GodMode9,
    Fbi,
    /// Browser exploit payload.
    Browserhax,
    /// 2xrsa ARM11 payload.
    TwoXrsa,
    /// MSET exploit payload.
    Msethax,
}

impl UrlKey {
    pub const ALL: [UrlKey; 11] = [
        UrlKey::Guide,
        UrlKey::Soundhax,
        UrlKey::Otherapp,
        UrlKey::Boot9strap,
        UrlKey::SafeB9sInstaller,
        UrlKey::Luma3ds,
        UrlKey::GodMode9,
        UrlKey::Fbi,
        UrlKey::Browserhax,
        UrlKey::TwoXrsa,
        UrlKey::Msethax,
    ];

    /// Key as written in the URL file.
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlKey::Guide => "guide",
            UrlKey::Soundhax => "soundhax",
            UrlKey::Otherapp => "otherapp",
            UrlKey::Boot9strap => "boot9strap",
            UrlKey::SafeB9sInstaller => "safeb9sinstaller",
            UrlKey::Luma3ds => "luma3ds",
            UrlKey::GodMode9 => "godmode9",
            UrlKey::Fbi => "fbi",
            UrlKey::Browserhax => "browserhax",
            UrlKey::TwoXrsa => "2xrsa",
            UrlKey::Msethax => "msethax",
        }
    }
}

impl fmt::Display for UrlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlTable {
    entries: BTreeMap<String, String>,
}

impl UrlTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: UrlKey) -> Option<&str> {
        self.entries.get(key.as_str()).map(String::as_str)
    }

    pub fn insert(&mut self, key: UrlKey, url: impl Into<String>) {
        self.entries.insert(key.as_str().to_string(), url.into());
    }

    pub fn with(mut self, key: UrlKey, url: impl Into<String>) -> Self {
        self.insert(key, url);
        self
    }

    /// Add every entry of `other`, replacing existing ones.
    pub fn merge(&mut self, other: UrlTable) {
        self.entries.extend(other.entries);
    }

    /// Known keys with no entry.
    pub fn missing(&self) -> Vec<UrlKey> {
        UrlKey::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_none())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a URL table from a TOML file of `key = "url"` pairs.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
