//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    use crate::core::lock::Locked;

    /// Generate an owner or repository name segment
    pub fn repo_segment() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9._-]{0,20}"
    }

    /// Generate a valid hostname
    pub fn hostname() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,15}\\.[a-z]{2,5}"
    }

    /// Generate a full commit hash (40 lowercase hex characters)
    pub fn commit_hash() -> impl Strategy<Value = String> {
        "[0-9a-f]{40}"
    }

    /// Generate an SRI-style narHash
    pub fn nar_hash() -> impl Strategy<Value = String> {
        "[A-Za-z0-9+/]{43}=".prop_map(|h| format!("sha256-{h}"))
    }

    /// Generate a query-free https URL
    pub fn url() -> impl Strategy<Value = String> {
        (hostname(), repo_segment(), repo_segment())
            .prop_map(|(host, owner, repo)| format!("https://{host}/{owner}/{repo}.git"))
    }

    /// Generate a query-free absolute path
    pub fn store_path() -> impl Strategy<Value = String> {
        "/[a-z0-9/_-]{1,30}"
    }

    /// Generate a locked descriptor of any supported type
    ///
    /// `rev` and `narHash` are each independently present or empty.
    pub fn locked_descriptor() -> impl Strategy<Value = Locked> {
        let forge = (
            prop_oneof![Just("github"), Just("gitlab"), Just("sourcehut")],
            repo_segment(),
            repo_segment(),
            proptest::option::of(hostname()),
        )
            .prop_map(|(kind, owner, repo, host)| Locked {
                kind: kind.to_string(),
                owner,
                repo,
                host: host.unwrap_or_default(),
                ..Locked::default()
            });
        let remote = (prop_oneof![Just("git"), Just("hg"), Just("tarball")], url()).prop_map(
            |(kind, url)| Locked {
                kind: kind.to_string(),
                url,
                ..Locked::default()
            },
        );
        let local = store_path().prop_map(|path| Locked {
            kind: "path".to_string(),
            path,
            ..Locked::default()
        });

        (
            prop_oneof![forge, remote, local],
            proptest::option::of(commit_hash()),
            proptest::option::of(nar_hash()),
        )
            .prop_map(|(mut locked, rev, nar_hash)| {
                locked.rev = rev.unwrap_or_default();
                locked.nar_hash = nar_hash.unwrap_or_default();
                locked
            })
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_commit_hash_generator(hash in commit_hash()) {
            prop_assert!(crate::core::identity::is_commit_hash(&hash));
        }

        #[test]
        fn test_url_generator_has_no_query(url in url()) {
            prop_assert!(!url.contains('?'));
            prop_assert!(url.starts_with("https://"));
        }

        #[test]
        fn test_locked_descriptor_has_type(locked in locked_descriptor()) {
            prop_assert!(!locked.kind.is_empty());
        }
    }
}
