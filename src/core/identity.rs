//! Identity URLs for locked sources
//!
//! An identity URL names a repository regardless of which revision is pinned
//! (`github:NixOS/nixpkgs`). A version-qualified URL adds the pinned revision
//! and content hash (`github:NixOS/nixpkgs?rev=abc&narHash=sha256-...`).
//! Grouping version-qualified URLs by [`extract_repo_identity`] is how
//! multiple versions of one repository are found.
//!
//! When a forge source carries an explicit host, the identity already holds a
//! `?host=` query and the version suffix is appended with a second `?`
//! (`gitlab:o/r?host=h?rev=x`). That shape is kept as is; the extractor
//! treats the first `?host=` segment as part of the identity.

use crate::config::urls;
use crate::core::lock::{Locked, SourceType};

const HOST_QUERY: &str = "?host=";

/// Canonical identity URL for a locked source
///
/// Returns an empty string for types without an identity.
pub fn identity_url(locked: &Locked) -> String {
    let kind = locked.source_type();
    match kind {
        SourceType::Github | SourceType::Gitlab | SourceType::Sourcehut => {
            let mut url = format!("{}:{}/{}", kind, locked.owner, locked.repo);
            if !locked.host.is_empty() {
                url.push_str(HOST_QUERY);
                url.push_str(&locked.host);
            }
            url
        }
        SourceType::Git | SourceType::Hg | SourceType::Tarball => format!("{}:{}", kind, locked.url),
        SourceType::Path => format!("{}:{}", kind, locked.path),
        SourceType::Other(_) => String::new(),
    }
}

/// Append `rev` and `narHash` qualifiers to an identity URL
pub fn version_qualified_url(identity: &str, rev: &str, nar_hash: &str) -> String {
    let mut url = identity.to_string();
    if rev.is_empty() && nar_hash.is_empty() {
        return url;
    }

    url.push('?');
    if !rev.is_empty() {
        url.push_str("rev=");
        url.push_str(rev);
    }
    if !nar_hash.is_empty() {
        if !rev.is_empty() {
            url.push('&');
        }
        url.push_str("narHash=");
        url.push_str(nar_hash);
    }
    url
}

/// Version-qualified URL for a locked source, or empty if it has no identity
pub fn locked_url(locked: &Locked) -> String {
    let identity = identity_url(locked);
    if identity.is_empty() {
        return identity;
    }
    version_qualified_url(&identity, &locked.rev, &locked.nar_hash)
}

/// Strip version qualifiers from a version-qualified URL
pub fn extract_repo_identity(url: &str) -> String {
    if let Some(host_idx) = url.find(HOST_QUERY) {
        let after_host = host_idx + HOST_QUERY.len();
        return match url[after_host..].find('?') {
            Some(version_idx) => url[..after_host + version_idx].to_string(),
            None => url.to_string(),
        };
    }

    match url.find('?') {
        Some(idx) => url[..idx].to_string(),
        None => url.to_string(),
    }
}

/// Human-facing flake reference for a locked source
///
/// Unlike [`identity_url`], the public default hosts are left implicit and
/// git/tarball/path sources show their bare location.
pub fn flake_ref(locked: &Locked) -> String {
    let kind = locked.source_type();
    match kind {
        SourceType::Github | SourceType::Gitlab | SourceType::Sourcehut => {
            let mut url = format!("{}:{}/{}", kind, locked.owner, locked.repo);
            if !locked.host.is_empty()
                && locked.host != urls::GITHUB_HOST
                && locked.host != urls::GITLAB_HOST
            {
                url.push_str(HOST_QUERY);
                url.push_str(&locked.host);
            }
            url
        }
        SourceType::Git | SourceType::Tarball => locked.url.clone(),
        SourceType::Path => locked.path.clone(),
        SourceType::Hg | SourceType::Other(_) => String::new(),
    }
}

/// Whether `s` is a full lowercase commit hash
pub fn is_commit_hash(s: &str) -> bool {
    s.len() == 40 && s.bytes().all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f'))
}
