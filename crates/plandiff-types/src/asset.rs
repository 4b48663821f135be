//! Content-addressed blobs referenced by property values.
//!
//! An [`Asset`] holds literal text, a file path, or a URI. An [`Archive`]
//! holds a file path, a URI, or a named set of nested assets and archives.
//! Both carry a content hash; equal hashes mean equal content.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder printed instead of serialized program code.
pub const ELIDED_PROGRAM_CODE: &str = "<contents elided>";

/// Serialized closures are emitted as `function __fN(...)` declarations.
static FUNCTION_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"function (__[0-9A-Za-z_]+)\s*\(").expect("function declaration pattern is valid")
});

/// A content-addressed blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub hash: String,
    #[serde(flatten)]
    pub source: AssetSource,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSource {
    Text(String),
    Path(String),
    Uri(String),
}

impl Asset {
    /// A text asset whose hash is derived from its content.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            hash: content_hash(text.as_bytes()),
            source: AssetSource::Text(text),
        }
    }

    pub fn from_path(path: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            source: AssetSource::Path(path.into()),
        }
    }

    pub fn from_uri(uri: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            source: AssetSource::Uri(uri.into()),
        }
    }

    /// The kind label used in rendered headers: `text`, `file`, or `uri`.
    pub fn kind(&self) -> &'static str {
        match self.source {
            AssetSource::Text(_) => "text",
            AssetSource::Path(_) => "file",
            AssetSource::Uri(_) => "uri",
        }
    }

    /// Returns `true` if the asset holds serialized program code.
    ///
    /// Such payloads contain one or more function declarations, all named
    /// with the `__f` prefix the closure serializer assigns.
    pub fn is_program_code(&self) -> bool {
        let AssetSource::Text(text) = &self.source else {
            return false;
        };
        let mut found = false;
        for caps in FUNCTION_DECL.captures_iter(text) {
            if !caps[1].starts_with("__f") {
                return false;
            }
            found = true;
        }
        found
    }

    /// The text to display for a text asset.
    ///
    /// Program code is replaced by [`ELIDED_PROGRAM_CODE`] unless `debug` is set.
    /// Returns `None` for file and URI assets.
    pub fn display_text(&self, debug: bool) -> Option<&str> {
        match &self.source {
            AssetSource::Text(_) if !debug && self.is_program_code() => Some(ELIDED_PROGRAM_CODE),
            AssetSource::Text(text) => Some(text),
            AssetSource::Path(_) | AssetSource::Uri(_) => None,
        }
    }
}

/// A content-addressed container of blobs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    pub hash: String,
    #[serde(flatten)]
    pub source: ArchiveSource,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveSource {
    Path(String),
    Uri(String),
    Assets(BTreeMap<String, ArchiveEntry>),
}

/// A named member of an archive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveEntry {
    Asset(Asset),
    Archive(Archive),
}

impl ArchiveEntry {
    pub fn hash(&self) -> &str {
        match self {
            ArchiveEntry::Asset(a) => &a.hash,
            ArchiveEntry::Archive(a) => &a.hash,
        }
    }
}

impl From<Asset> for ArchiveEntry {
    fn from(asset: Asset) -> Self {
        ArchiveEntry::Asset(asset)
    }
}

impl From<Archive> for ArchiveEntry {
    fn from(archive: Archive) -> Self {
        ArchiveEntry::Archive(archive)
    }
}

impl Archive {
    /// An archive of named entries whose hash covers every name and entry hash.
    pub fn from_assets<N, E>(entries: impl IntoIterator<Item = (N, E)>) -> Self
    where
        N: Into<String>,
        E: Into<ArchiveEntry>,
    {
        let entries: BTreeMap<String, ArchiveEntry> = entries
            .into_iter()
            .map(|(n, e)| (n.into(), e.into()))
            .collect();

        let mut hasher = blake3::Hasher::new();
        for (name, entry) in &entries {
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
            hasher.update(entry.hash().as_bytes());
            hasher.update(&[0]);
        }

        Self {
            hash: hex::encode(hasher.finalize().as_bytes()),
            source: ArchiveSource::Assets(entries),
        }
    }

    pub fn from_path(path: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            source: ArchiveSource::Path(path.into()),
        }
    }

    pub fn from_uri(uri: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            source: ArchiveSource::Uri(uri.into()),
        }
    }

    /// The kind label used in rendered headers: `assets`, `file`, or `uri`.
    pub fn kind(&self) -> &'static str {
        match self.source {
            ArchiveSource::Assets(_) => "assets",
            ArchiveSource::Path(_) => "file",
            ArchiveSource::Uri(_) => "uri",
        }
    }
}

fn content_hash(data: &[u8]) -> String {
    hex::encode(blake3::hash(data).as_bytes())
}
