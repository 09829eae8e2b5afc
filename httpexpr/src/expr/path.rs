use itertools::Itertools;

/// Names of the wildcards that appear in `path`, in order of appearance.
///
/// A wildcard marker takes the form `/{name}` or `/{*name}` where `name` is
/// one or more ASCII alphanumerics or underscores. Duplicate names are
/// preserved. The marker flavor (single segment vs catch-all) is not
/// reported; callers that need the distinction must inspect the raw marker
/// text.
pub fn extract_wildcards(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut wildcards = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] != b'/' || bytes[i + 1] != b'{' {
            i += 1;
            continue;
        }
        let mut j = i + 2;
        if j < bytes.len() && bytes[j] == b'*' {
            j += 1;
        }
        let start = j;
        while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_') {
            j += 1;
        }
        if j > start && j < bytes.len() && bytes[j] == b'}' {
            wildcards.push(&path[start..j]);
            i = j + 1;
        } else {
            i += 1;
        }
    }
    wildcards
}

/// True when `path` contains at least one wildcard marker.
pub fn has_wildcard(path: &str) -> bool {
    !extract_wildcards(path).is_empty()
}

/// Join path segments into an absolute request path: segments are split on
/// `/`, empty parts collapse away, and the result carries exactly one leading
/// slash. No other syntax validation is performed.
pub fn join_paths<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let parts = segments
        .into_iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|part| !part.is_empty())
        .collect_vec();
    format!("/{}", parts.iter().join("/"))
}
