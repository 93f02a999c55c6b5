//! # Matcher
//!
//! Search predicates used by the store's `find` scan.
//!
//! A search is a list of criteria, one per schema column. A `None` or empty
//! criterion is a wildcard; any other criterion must be a prefix of the
//! stored (space padded) value. Matching is byte-wise and case-sensitive.
//! Because padding is always trailing, no trimming is needed for a prefix
//! test.
//!
//! ## Example
//!
//! ```rust
//! use matcher::{record_matches, field_matches};
//!
//! assert!(field_matches(Some("ann     "), Some("a")));
//! assert!(field_matches(Some("ann     "), None));
//! assert!(!field_matches(None, Some("a")));
//!
//! let row = vec!["ann     ".to_string(), "nyc     ".to_string()];
//! assert!(record_matches(&row, &[Some("a".to_string()), None]));
//! ```

/// Returns `true` if `value` satisfies `criterion`.
///
/// - `criterion` is `None` or empty: always `true`.
/// - `value` is `None`: `false`.
/// - otherwise: `value` starts with `criterion`.
pub fn field_matches(value: Option<&str>, criterion: Option<&str>) -> bool {
    match (value, criterion) {
        (_, None) => true,
        (_, Some("")) => true,
        (None, Some(_)) => false,
        (Some(v), Some(c)) => v.starts_with(c),
    }
}

/// Returns `true` if every field of `record` satisfies the criterion at the
/// same position. Column counts must agree.
pub fn record_matches<S: AsRef<str>>(record: &[S], criteria: &[Option<String>]) -> bool {
    record.len() == criteria.len()
        && record
            .iter()
            .zip(criteria)
            .all(|(v, c)| field_matches(Some(v.as_ref()), c.as_deref()))
}

/// A record-level search predicate.
///
/// The store scans through this trait so that callers can swap in a
/// different matching rule without touching the scan itself.
pub trait RecordMatcher: Send + Sync {
    fn matches(&self, record: &[String], criteria: &[Option<String>]) -> bool;
}

/// The default matcher: per-field prefix match, see [`record_matches`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixMatcher;

impl RecordMatcher for PrefixMatcher {
    fn matches(&self, record: &[String], criteria: &[Option<String>]) -> bool {
        record_matches(record, criteria)
    }
}

/// Whole-value matcher: a non-empty criterion must equal the stored value,
/// both sides trimmed.
///
/// Wildcards behave as in [`PrefixMatcher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl RecordMatcher for ExactMatcher {
    fn matches(&self, record: &[String], criteria: &[Option<String>]) -> bool {
        record.len() == criteria.len()
            && record.iter().zip(criteria).all(|(v, c)| match c.as_deref() {
                None | Some("") => true,
                Some(c) => v.trim() == c.trim(),
            })
    }
}
