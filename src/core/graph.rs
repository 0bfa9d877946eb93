//! Input graph analysis
//!
//! Maps every locked node to its version-qualified URL, then walks every
//! node's inputs to record who references what. Two passes are required:
//! the identity map must be complete before references are resolved, so that
//! nodes carrying both `locked` and `inputs` are keyed by their own pin.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::core::identity;
use crate::core::lock::FlakeLock;

/// Reference maps derived from a lockfile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Relations {
    /// Version-qualified URL -> names of nodes referencing that pin
    #[serde(rename = "dependencies")]
    pub deps: BTreeMap<String, Vec<String>>,

    /// Node name -> names of nodes referencing it
    #[serde(rename = "reverse_dependencies")]
    pub reverse_deps: BTreeMap<String, Vec<String>>,
}

impl Relations {
    /// Aliases recorded for a version-qualified URL
    pub fn aliases(&self, url: &str) -> &[String] {
        self.deps.get(url).map(Vec::as_slice).unwrap_or_default()
    }

    /// Nodes referencing `node`
    pub fn dependants(&self, node: &str) -> &[String] {
        self.reverse_deps.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether no locked node is referenced at all
    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }
}

/// Build forward and reverse reference maps for a lockfile
///
/// Nodes without a recognizable locked source, and references to such nodes
/// or to missing nodes, are skipped.
pub fn analyze(lock: &FlakeLock) -> Relations {
    let node_urls: HashMap<&str, String> = lock
        .nodes
        .iter()
        .filter_map(|(name, node)| {
            let url = identity::locked_url(node.locked.as_ref()?);
            (!url.is_empty()).then(|| (name.as_str(), url))
        })
        .collect();

    let mut relations = Relations::default();
    for (name, node) in &lock.nodes {
        for input in node.inputs.values() {
            for target in input.targets() {
                let Some(url) = node_urls.get(target) else {
                    continue;
                };
                relations.deps.entry(url.clone()).or_default().push(name.clone());
                relations
                    .reverse_deps
                    .entry(target.to_string())
                    .or_default()
                    .push(name.clone());
            }
        }
    }

    tracing::debug!(
        "Analyzed {} nodes: {} locked, {} referenced pins",
        lock.nodes.len(),
        node_urls.len(),
        relations.deps.len()
    );

    relations
}
