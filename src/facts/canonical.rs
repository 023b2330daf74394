//! Canonical names: the dedup key for terms and relationships.

/// Delimiter every scope separator is rewritten to.
pub const NAMESPACE_DELIMITER: char = '.';

/// Canonicalize an identifier: `:` becomes `.`, then ASCII lowercase.
///
/// `Sample::Widget` and `sample::widget` both map to `sample..widget`.
pub fn canonicalize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c == ':' {
                NAMESPACE_DELIMITER
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

/// Check whether `canonical_name` lives inside `namespace`.
///
/// Both arguments are canonicalized first. A match must end on a delimiter
/// boundary: `foo` matches `foo` and `foo..bar`, never `foobar`.
pub fn has_namespace_prefix(canonical_name: &str, namespace: &str) -> bool {
    let name = canonicalize(canonical_name);
    let prefix = canonicalize(namespace);
    let prefix = prefix.trim_end_matches(NAMESPACE_DELIMITER);
    if prefix.is_empty() {
        return false;
    }

    match name.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(NAMESPACE_DELIMITER),
        None => false,
    }
}
