//! Helpers for `/`-separated keys.
//!
//! Keys are plain strings. Leading and trailing separators carry no meaning,
//! so every store trims them before use.

/// The hierarchy separator used in keys.
pub const SEPARATOR: char = '/';

/// Trim leading and trailing separators.
///
/// ```rust
/// use pathkv_core::key;
///
/// assert_eq!(key::trim("/foo/bar/"), "foo/bar");
/// assert_eq!(key::trim("///"), "");
/// ```
pub fn trim(key: &str) -> &str {
    key.trim_matches(SEPARATOR)
}

/// Non-empty segments of a key, in order.
///
/// Redundant separators are skipped, so `"a//b"` yields `["a", "b"]`.
pub fn segments(key: &str) -> impl Iterator<Item = &str> {
    key.split(SEPARATOR).filter(|s| !s.is_empty())
}

/// Canonical form of a key: its segments joined by single separators.
///
/// Unlike [`join`], `.` and `..` are kept as ordinary segments.
///
/// ```rust
/// use pathkv_core::key;
///
/// assert_eq!(key::normalize("/a//b/"), "a/b");
/// assert_eq!(key::normalize("a/../b"), "a/../b");
/// ```
pub fn normalize(key: &str) -> String {
    segments(key).collect::<Vec<_>>().join("/")
}

/// Join `key` onto `prefix` with path-join semantics.
///
/// Redundant separators collapse, `.` segments are dropped and `..` removes
/// the preceding segment. A `..` with nothing left to remove is kept. The
/// result never has leading or trailing separators.
///
/// ```rust
/// use pathkv_core::key;
///
/// assert_eq!(key::join("ns", "k"), "ns/k");
/// assert_eq!(key::join("ns/", "/a//b/"), "ns/a/b");
/// assert_eq!(key::join("ns", ""), "ns");
/// assert_eq!(key::join("ns/sub", "../k"), "ns/k");
/// ```
pub fn join(prefix: &str, key: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in segments(prefix).chain(segments(key)) {
        match segment {
            "." => {}
            ".." => match out.last() {
                Some(&last) if last != ".." => {
                    out.pop();
                }
                _ => out.push(".."),
            },
            _ => out.push(segment),
        }
    }
    out.join("/")
}
