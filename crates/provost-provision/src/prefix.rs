//! Unique account-prefix generation and ledger reconciliation.
//!
//! A prefix is the local-part token shared by an account's sign-in name and
//! its external mail address. Uniqueness is global: a candidate collides if
//! it is already live in the directory, already recorded in the ledger, or
//! already minted earlier in the same batch.

use std::collections::{BTreeSet, HashSet};

use crate::error::MapError;

/// Lowercases every prefix in a set.
#[must_use]
pub fn normalized(prefixes: &HashSet<String>) -> HashSet<String> {
    prefixes.iter().map(|p| p.to_lowercase()).collect()
}

/// Merges ledger-recorded and directory-observed prefixes into the reserved
/// set consulted during generation. Case-insensitive: both sides are
/// lowercased before the union.
#[must_use]
pub fn reconcile(ledger: &HashSet<String>, live: &HashSet<String>) -> HashSet<String> {
    let mut reserved = normalized(ledger);
    reserved.extend(live.iter().map(|p| p.to_lowercase()));
    reserved
}

/// Prefixes reserved during a run that the ledger has not recorded yet.
///
/// Set difference, not concatenation: prefixes the ledger already held at
/// the start of the run must not be appended a second time. The ordered
/// result gives the ledger append a stable insertion order.
#[must_use]
pub fn compute_delta(start: &HashSet<String>, end: &HashSet<String>) -> BTreeSet<String> {
    end.difference(start).cloned().collect()
}

/// Derives a prefix for the given name pair that is not in `reserved`.
///
/// Three naming conventions are tried in strict priority order:
/// first-initial + last name, then first name + last-initial, then
/// first name + last name, all lowercased. If every convention collides, a
/// numeric suffix is appended and the conventions are retried in the same
/// order, incrementing the suffix until a free candidate appears.
///
/// The reserved set is not mutated here. The caller commits the returned
/// prefix to the set once the account is actually created, which keeps the
/// set consistent for the next row.
///
/// # Errors
///
/// Fails only when both name parts are empty; otherwise the unbounded
/// suffix space guarantees termination.
pub fn generate(
    first_name: &str,
    last_name: &str,
    reserved: &HashSet<String>,
) -> Result<String, MapError> {
    let first = first_name.trim().to_lowercase();
    let last = last_name.trim().to_lowercase();

    if first.is_empty() && last.is_empty() {
        return Err(MapError::UnusableName);
    }

    let first_initial: String = first.chars().take(1).collect();
    let last_initial: String = last.chars().take(1).collect();

    let mut suffix = 0u64;
    loop {
        let tag = if suffix == 0 {
            String::new()
        } else {
            suffix.to_string()
        };

        let candidates = [
            format!("{first_initial}{last}{tag}"),
            format!("{first}{last_initial}{tag}"),
            format!("{first}{last}{tag}"),
        ];

        for candidate in candidates {
            if !reserved.contains(&candidate) {
                return Ok(candidate);
            }
        }

        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_first_convention_wins_when_free() {
        let reserved = HashSet::new();
        assert_eq!(generate("John", "Doe", &reserved).unwrap(), "jdoe");
    }

    #[test]
    fn test_conventions_tried_in_priority_order() {
        // jdoe taken: fall through to firstname + last-initial.
        let reserved = set(&["jdoe"]);
        assert_eq!(generate("John", "Doe", &reserved).unwrap(), "johnd");

        // jdoe and johnd taken: full name.
        let reserved = set(&["jdoe", "johnd"]);
        assert_eq!(generate("John", "Doe", &reserved).unwrap(), "johndoe");
    }

    #[test]
    fn test_suffix_level_retries_all_conventions_first() {
        // Every unsuffixed convention collides, so suffix "1" restarts at
        // the highest-priority convention rather than continuing with "2".
        let reserved = set(&["jdoe", "johnd", "johndoe"]);
        assert_eq!(generate("John", "Doe", &reserved).unwrap(), "jdoe1");

        let reserved = set(&["jdoe", "johnd", "johndoe", "jdoe1"]);
        assert_eq!(generate("John", "Doe", &reserved).unwrap(), "johnd1");
    }

    #[test]
    fn test_suffix_escalates_indefinitely() {
        let mut reserved = set(&["jdoe", "johnd", "johndoe"]);
        for n in 1..=4 {
            reserved.insert(format!("jdoe{n}"));
            reserved.insert(format!("johnd{n}"));
            reserved.insert(format!("johndoe{n}"));
        }
        assert_eq!(generate("John", "Doe", &reserved).unwrap(), "jdoe5");
    }

    #[test]
    fn test_case_insensitive_inputs() {
        let reserved = HashSet::new();
        assert_eq!(generate("JOHN", "DOE", &reserved).unwrap(), "jdoe");
    }

    #[test]
    fn test_repeated_generation_never_collides() {
        let names = [
            ("John", "Doe"),
            ("Jane", "Doe"),
            ("John", "Doe"),
            ("John", "Doe"),
            ("Jan", "Edoe"),
        ];
        let mut reserved = HashSet::new();
        let mut issued = HashSet::new();
        for (first, last) in names {
            let prefix = generate(first, last, &reserved).unwrap();
            assert!(issued.insert(prefix.clone()), "duplicate prefix {prefix}");
            reserved.insert(prefix);
        }
    }

    #[test]
    fn test_unusable_when_both_names_empty() {
        let reserved = HashSet::new();
        assert!(matches!(
            generate("", "  ", &reserved),
            Err(MapError::UnusableName)
        ));
    }

    #[test]
    fn test_single_sided_name_still_generates() {
        let reserved = HashSet::new();
        assert_eq!(generate("", "Doe", &reserved).unwrap(), "doe");
        assert_eq!(generate("John", "", &reserved).unwrap(), "john");
    }

    #[test]
    fn test_reconcile_is_case_normalized_union() {
        let ledger = set(&["JDoe", "asmith"]);
        let live = set(&["jdoe", "BJones"]);
        let reserved = reconcile(&ledger, &live);
        assert_eq!(reserved, set(&["jdoe", "asmith", "bjones"]));
    }

    #[test]
    fn test_reconcile_idempotent() {
        let x = set(&["Alpha", "beta"]);
        assert_eq!(reconcile(&x, &x), set(&["alpha", "beta"]));
    }

    #[test]
    fn test_delta_is_set_difference() {
        let start = set(&["ab"]);
        let end = set(&["ab", "cd", "ef"]);
        let delta: Vec<String> = compute_delta(&start, &end).into_iter().collect();
        assert_eq!(delta, vec!["cd".to_string(), "ef".to_string()]);
    }

    #[test]
    fn test_delta_empty_when_nothing_new() {
        let start = set(&["ab", "cd"]);
        assert!(compute_delta(&start, &start).is_empty());
    }
}
