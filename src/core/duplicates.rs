//! Duplicate input detection
//!
//! Groups the pins found by [`crate::core::graph::analyze`] by repository
//! identity. A repository pinned at more than one version is a duplicate.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::graph::Relations;
use crate::core::identity::extract_repo_identity;

/// One pinned version of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinnedVersion {
    /// Version-qualified URL
    pub url: String,
    /// Nodes referencing this pin
    pub aliases: Vec<String>,
}

/// A repository locked at several versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Repository identity shared by every version
    pub repository: String,
    /// Distinct pins, sorted by URL
    pub versions: Vec<PinnedVersion>,
}

impl DuplicateGroup {
    /// Every alias across all versions
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.versions
            .iter()
            .flat_map(|v| v.aliases.iter().map(String::as_str))
    }

    /// Shortest alias, used as the group's display name
    pub fn display_name(&self) -> &str {
        self.aliases()
            .min_by_key(|alias| alias.len())
            .unwrap_or(self.repository.as_str())
    }

    /// Deduplicated, sorted dependants of every alias in the group
    pub fn merged_dependants(&self, relations: &Relations) -> Vec<String> {
        let merged: BTreeSet<&String> = self
            .aliases()
            .flat_map(|alias| relations.dependants(alias))
            .collect();
        merged.into_iter().cloned().collect()
    }

    /// Number of extra versions beyond the first
    pub fn extra_versions(&self) -> usize {
        self.versions.len().saturating_sub(1)
    }
}

/// Group version-qualified URLs by repository identity
pub fn group_by_repository(relations: &Relations) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for url in relations.deps.keys() {
        groups
            .entry(extract_repo_identity(url))
            .or_default()
            .push(url.clone());
    }
    groups
}

/// Repositories pinned at more than one version
pub fn find_duplicates(relations: &Relations) -> Vec<DuplicateGroup> {
    group_by_repository(relations)
        .into_iter()
        .filter(|(_, urls)| urls.len() > 1)
        .map(|(repository, urls)| DuplicateGroup {
            repository,
            versions: urls
                .into_iter()
                .map(|url| PinnedVersion {
                    aliases: relations.aliases(&url).to_vec(),
                    url,
                })
                .collect(),
        })
        .collect()
}
