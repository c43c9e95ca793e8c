//! Longest common path prefix across project locations, and the prefix
//! substitution that drives a batch retarget.

/// Longest shared leading sequence of path segments.
///
/// A single path is its own prefix. For more, the inputs are sorted
/// lexicographically and only the first and last elements are compared:
/// any middle element shares at least as many leading segments with each
/// extreme as the extremes share with each other, so the extremes bound
/// the whole set. Comparison is per segment, not per character: `/a/bc`
/// and `/a/bd` share `/a`, not `/a/b`.
///
/// Returns an empty string when there is no common leading segment, e.g.
/// paths under different roots or drives.
pub fn common_prefix(paths: &[String]) -> String {
    match paths {
        [] => String::new(),
        [only] => only.clone(),
        _ => {
            let mut sorted: Vec<&str> = paths.iter().map(String::as_str).collect();
            sorted.sort_unstable();
            common_segment_prefix(sorted[0], sorted[sorted.len() - 1])
        }
    }
}

fn common_segment_prefix(first: &str, last: &str) -> String {
    let a: Vec<&str> = first.split('/').collect();
    let b: Vec<&str> = last.split('/').collect();

    let mut matching = 0;
    while matching < a.len() && matching < b.len() && a[matching] == b[matching] {
        matching += 1;
    }

    // Absolute inputs split into a leading empty segment, so joining the
    // shared segments keeps the leading slash; no overlap yields "".
    a[..matching].join("/")
}

/// Replace `old_prefix` with `new_prefix` inside `original`.
///
/// Both prefixes are normalized to forward slashes first. If `old_prefix`
/// ends with a separator and `new_prefix` does not, one is appended so the
/// replacement cannot fuse the following segment onto the new prefix.
///
/// The replacement is a plain first-occurrence substring replace, not
/// anchored to the start of `original`. A prefix string that also occurs
/// later in the path (say `/ws` inside `/srv/ws-backup`) would be matched
/// there when it is absent at the front. Known limitation, kept for
/// compatibility with the behavior users already rely on.
pub fn apply_prefix_substitution(original: &str, old_prefix: &str, new_prefix: &str) -> String {
    let old = old_prefix.replace('\\', "/");
    let mut new = new_prefix.replace('\\', "/");
    if old.ends_with('/') && !new.ends_with('/') {
        new.push('/');
    }
    original.replacen(&old, &new, 1)
}
