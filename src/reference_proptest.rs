//! Property-based tests for reference normalization and survey bounds.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::reference::{parse_reference, remote_matches, Forge};
    use crate::survey::walk;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    // ============================================================================
    // parse_reference property tests
    // ============================================================================

    fn segment() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9_-]{0,15}"
    }

    proptest! {
        /// Property: HTTPS and SSH spellings of a repository resolve to the same identity
        #[test]
        fn https_and_ssh_forms_agree(owner in segment(), name in segment(), git_suffix in any::<bool>()) {
            let forge = Forge::github();
            let suffix = if git_suffix { ".git" } else { "" };
            let https = parse_reference(&format!("https://github.com/{}/{}{}", owner, name, suffix), &forge).unwrap();
            let ssh = parse_reference(&format!("git@github.com:{}/{}{}", owner, name, suffix), &forge).unwrap();
            prop_assert_eq!(&https, &ssh);
            prop_assert_eq!(https.canonical_url(), ssh.canonical_url());
        }

        /// Property: re-parsing a canonical URL is a fixed point
        #[test]
        fn canonical_url_is_idempotent(owner in segment(), name in segment()) {
            let forge = Forge::github();
            let first = parse_reference(&format!("http://www.github.com/{}/{}.git?tab=readme#top", owner, name), &forge).unwrap();
            let second = parse_reference(first.canonical_url(), &forge).unwrap();
            prop_assert_eq!(first.canonical_url(), second.canonical_url());
            prop_assert!(!first.canonical_url().ends_with(".git"));
            prop_assert!(!first.canonical_url().contains('?'));
        }

        /// Property: identity ignores case
        #[test]
        fn identity_ignores_case(owner in segment(), name in segment()) {
            let forge = Forge::github();
            let lower = parse_reference(&format!("https://github.com/{}/{}", owner.to_lowercase(), name.to_lowercase()), &forge).unwrap();
            let upper = parse_reference(&format!("https://GITHUB.com/{}/{}", owner.to_uppercase(), name.to_uppercase()), &forge).unwrap();
            prop_assert_eq!(lower, upper);
        }

        /// Property: references on other hosts are always rejected
        #[test]
        fn other_hosts_are_rejected(host in "[a-z]{3,10}\\.(org|io|net)", owner in segment(), name in segment()) {
            let forge = Forge::github();
            let https_rejected = parse_reference(&format!("https://{}/{}/{}", host, owner, name), &forge).is_err();
            let ssh_rejected = parse_reference(&format!("git@{}:{}/{}.git", host, owner, name), &forge).is_err();
            prop_assert!(https_rejected);
            prop_assert!(ssh_rejected);
        }

        /// Property: a remote written in any accepted form matches its own identity
        #[test]
        fn remote_matches_own_identity(owner in segment(), name in segment()) {
            let forge = Forge::github();
            let identity = parse_reference(&format!("https://github.com/{}/{}", owner, name), &forge).unwrap();
            let ssh_remote = format!("git@github.com:{}/{}.git", owner, name);
            prop_assert!(remote_matches(&ssh_remote, &identity, &forge));
            prop_assert!(remote_matches(identity.canonical_url(), &identity, &forge));
        }
    }

    // ============================================================================
    // walk property tests
    // ============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: walk never exceeds its item or depth bounds
        #[test]
        fn walk_respects_bounds(
            files in prop::collection::btree_set("[a-z]{1,4}(/[a-z]{1,4}){0,3}", 0..20),
            max_depth in 0usize..4,
            max_items in 0usize..25,
        ) {
            let temp = TempDir::new().unwrap();
            for file in &files {
                let path = temp.path().join(file);
                // A generated path may collide with a file created earlier
                if let Some(parent) = path.parent() {
                    if fs::create_dir_all(parent).is_err() {
                        continue;
                    }
                }
                let _ = fs::write(&path, "");
            }

            let listing = walk(temp.path(), max_depth, max_items);
            prop_assert!(listing.len() <= max_items);
            for entry in &listing {
                let segments = entry.trim_end_matches('/').split('/').count();
                prop_assert!(segments <= max_depth);
            }

            // Breadth-first: depth never decreases along the listing
            let depths: Vec<usize> = listing
                .iter()
                .map(|e| e.trim_end_matches('/').split('/').count())
                .collect();
            prop_assert!(depths.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
