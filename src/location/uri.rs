use crate::location::PathStyle;

/// Marker identifying the stored string as a URI-form location.
pub const URI_PREFIX: &str = "URI//";

/// Marker plus file scheme: the location is a local filesystem path.
pub const FILE_URI_PREFIX: &str = "URI//file:";

/// Decode a stored location URI into a human-editable filesystem path.
///
/// Strips the `URI//` marker and, for `file:` locations, the scheme and
/// any percent-escapes. Under `PathStyle::Windows` a leading `/` before a
/// drive letter (`/C:...`) is dropped, since Windows absolute paths carry
/// no slash before the drive in this encoding.
///
/// Non-`file:` locations come back marker-stripped but otherwise untouched.
/// The projects this tool operates on are always local, but a remote
/// location must not break the decode path.
pub fn extract_filesystem_path(location_uri: &str, style: PathStyle) -> String {
    if let Some(rest) = location_uri.strip_prefix(FILE_URI_PREFIX) {
        let decoded = match urlencoding::decode(rest) {
            Ok(cow) => cow.into_owned(),
            Err(_) => rest.to_string(),
        };
        if style == PathStyle::Windows && has_slashed_drive_prefix(&decoded) {
            return decoded[1..].to_string();
        }
        decoded
    } else {
        location_uri
            .strip_prefix(URI_PREFIX)
            .unwrap_or(location_uri)
            .to_string()
    }
}

/// Encode a filesystem path as a marker-prefixed `file:` URI.
///
/// Exact inverse of [`extract_filesystem_path`] for absolute local paths:
/// separators are normalized to `/`, each segment is percent-encoded, and
/// a leading `/` is ensured (including before a Windows drive letter).
pub fn build_location_uri(path: &str, style: PathStyle) -> String {
    let normalized = match style {
        PathStyle::Windows => path.replace('\\', "/"),
        PathStyle::Posix => path.to_string(),
    };

    let encoded = normalized
        .split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/");

    let mut uri = String::with_capacity(FILE_URI_PREFIX.len() + encoded.len() + 1);
    uri.push_str(FILE_URI_PREFIX);
    if !encoded.starts_with('/') {
        uri.push('/');
    }
    uri.push_str(&encoded);
    uri
}

fn encode_segment(segment: &str) -> String {
    // Keep `:` readable, it shows up in every drive-letter path.
    urlencoding::encode(segment).replace("%3A", ":")
}

/// `/C:` style prefix left over from URI-encoding a Windows absolute path.
fn has_slashed_drive_prefix(path: &str) -> bool {
    let b = path.as_bytes();
    b.len() >= 3 && b[0] == b'/' && b[1].is_ascii_alphabetic() && b[2] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_posix_file_uri() {
        assert_eq!(
            extract_filesystem_path("URI//file:/home/dev/ws/p1", PathStyle::Posix),
            "/home/dev/ws/p1"
        );
    }

    #[test]
    fn test_extract_windows_drive_fixup() {
        assert_eq!(
            extract_filesystem_path("URI//file:/C:/work/proj", PathStyle::Windows),
            "C:/work/proj"
        );
        // Same input on a posix target keeps the leading slash.
        assert_eq!(
            extract_filesystem_path("URI//file:/C:/work/proj", PathStyle::Posix),
            "/C:/work/proj"
        );
    }

    #[test]
    fn test_extract_decodes_percent_escapes() {
        assert_eq!(
            extract_filesystem_path("URI//file:/home/dev/my%20ws/p1", PathStyle::Posix),
            "/home/dev/my ws/p1"
        );
    }

    #[test]
    fn test_extract_non_file_uri_passthrough() {
        assert_eq!(
            extract_filesystem_path("URI//svn://host/repo/p1", PathStyle::Posix),
            "svn://host/repo/p1"
        );
    }

    #[test]
    fn test_build_posix() {
        assert_eq!(
            build_location_uri("/home/dev/ws/p1", PathStyle::Posix),
            "URI//file:/home/dev/ws/p1"
        );
    }

    #[test]
    fn test_build_encodes_spaces() {
        assert_eq!(
            build_location_uri("/home/dev/my ws/p1", PathStyle::Posix),
            "URI//file:/home/dev/my%20ws/p1"
        );
    }

    #[test]
    fn test_build_windows_backslashes_and_drive() {
        assert_eq!(
            build_location_uri("C:\\work\\proj", PathStyle::Windows),
            "URI//file:/C:/work/proj"
        );
    }

    #[test]
    fn test_path_round_trip_posix() {
        for p in ["/ws/p1", "/home/dev/my ws/p1", "/tmp/ünïcode/p"] {
            let uri = build_location_uri(p, PathStyle::Posix);
            assert_eq!(extract_filesystem_path(&uri, PathStyle::Posix), p);
        }
    }

    #[test]
    fn test_path_round_trip_windows() {
        let uri = build_location_uri("C:/work/proj", PathStyle::Windows);
        assert_eq!(uri, "URI//file:/C:/work/proj");
        assert_eq!(extract_filesystem_path(&uri, PathStyle::Windows), "C:/work/proj");
    }
}
