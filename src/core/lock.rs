//! Lockfile handling
//!
//! The lockfile (flake.lock) records every node of the input graph together
//! with the exact source each one was locked to. Decoding is lenient: a field
//! carrying an unexpected JSON type reads as empty instead of failing the
//! whole document, because partially filled nodes are common. A node that is
//! not an object is dropped, and a `locked`/`original`/`inputs` entry of the
//! wrong shape reads as absent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::config::defaults;
use crate::error::LockError;

/// Lockfile structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FlakeLock {
    /// All nodes, keyed by node name
    #[serde(default, deserialize_with = "lenient_nodes")]
    pub nodes: BTreeMap<String, Node>,

    /// Name of the root node
    #[serde(default = "default_root", deserialize_with = "lenient_root")]
    pub root: String,

    /// Lockfile format version
    #[serde(default, deserialize_with = "lenient_int")]
    pub version: i64,
}

/// A node in the input graph
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Node {
    /// Resolved source, absent for pure aggregator nodes
    #[serde(default, deserialize_with = "lenient_struct")]
    pub locked: Option<Locked>,

    /// Source as written by the user
    #[serde(default, deserialize_with = "lenient_struct")]
    pub original: Option<Original>,

    /// Local input name -> referenced node(s)
    #[serde(default, deserialize_with = "lenient_inputs")]
    pub inputs: BTreeMap<String, InputRef>,
}

/// Target of a node input
#[derive(Debug, Clone, PartialEq)]
pub enum InputRef {
    /// Direct reference to another node
    Node(String),
    /// Follows path, flattened to node names by graph consumers.
    /// Non-string path elements are dropped.
    Follows(Vec<String>),
    /// Any other shape; ignored
    Unknown(Value),
}

impl From<Value> for InputRef {
    fn from(value: Value) -> Self {
        match value {
            Value::String(name) => Self::Node(name),
            Value::Array(path) => Self::Follows(
                path.into_iter()
                    .filter_map(|v| match v {
                        Value::String(name) => Some(name),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Self::Unknown(other),
        }
    }
}

impl<'de> Deserialize<'de> for InputRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl InputRef {
    /// Node names referenced by this input
    pub fn targets(&self) -> Vec<&str> {
        match self {
            Self::Node(name) => vec![name.as_str()],
            Self::Follows(path) => path.iter().map(String::as_str).collect(),
            Self::Unknown(_) => Vec::new(),
        }
    }
}

/// Pinned source of a node
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Locked {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub owner: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub repo: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub host: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub path: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rev: String,
    #[serde(rename = "ref", default, deserialize_with = "lenient_string")]
    pub git_ref: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nar_hash: String,
    #[serde(default, deserialize_with = "lenient_opt_int")]
    pub last_modified: Option<i64>,
}

impl Locked {
    /// Parsed source type
    pub fn source_type(&self) -> SourceType {
        SourceType::from(self.kind.as_str())
    }
}

/// Source of a node as originally specified
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Original {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub owner: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub repo: String,
    #[serde(rename = "ref", default, deserialize_with = "lenient_string")]
    pub git_ref: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub host: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
}

impl Original {
    /// Parsed source type
    pub fn source_type(&self) -> SourceType {
        SourceType::from(self.kind.as_str())
    }
}

/// Kind of source a node is fetched from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceType {
    Github,
    Gitlab,
    Sourcehut,
    Git,
    Hg,
    Tarball,
    Path,
    /// Unrecognized (or empty) type string
    Other(String),
}

impl SourceType {
    /// The lockfile spelling of this type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Sourcehut => "sourcehut",
            Self::Git => "git",
            Self::Hg => "hg",
            Self::Tarball => "tarball",
            Self::Path => "path",
            Self::Other(s) => s,
        }
    }

    /// Whether the source is addressed as `owner/repo` on a forge
    pub fn is_forge(&self) -> bool {
        matches!(self, Self::Github | Self::Gitlab | Self::Sourcehut)
    }
}

impl From<&str> for SourceType {
    fn from(s: &str) -> Self {
        match s {
            "github" => Self::Github,
            "gitlab" => Self::Gitlab,
            "sourcehut" => Self::Sourcehut,
            "git" => Self::Git,
            "hg" => Self::Hg,
            "tarball" => Self::Tarball,
            "path" => Self::Path,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FlakeLock {
    /// Parse from a JSON string
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Read and parse a lockfile from disk
    pub fn load(path: &Path) -> Result<Self, LockError> {
        let content = std::fs::read_to_string(path).map_err(|e| LockError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_json(&content).map_err(|e| LockError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// The root node, if present
    pub fn root_node(&self) -> Option<&Node> {
        self.nodes.get(&self.root)
    }

    /// Look up a node by name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }
}

fn default_root() -> String {
    defaults::DEFAULT_ROOT_NODE.to_string()
}

fn lenient_root<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map_or_else(default_root, str::to_string))
}

fn lenient_nodes<'de, D>(deserializer: D) -> Result<BTreeMap<String, Node>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(nodes) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(nodes
        .into_iter()
        .filter_map(|(name, node)| match serde_json::from_value(node) {
            Ok(node) => Some((name, node)),
            Err(e) => {
                tracing::debug!("Skipping malformed node {name}: {e}");
                None
            }
        })
        .collect())
}

fn lenient_struct<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_inputs<'de, D>(deserializer: D) -> Result<BTreeMap<String, InputRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(inputs) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(inputs
        .into_iter()
        .map(|(name, target)| (name, InputRef::from(target)))
        .collect())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string).unwrap_or_default())
}

fn lenient_opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64())
}

fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_int(deserializer)?.unwrap_or_default())
}
