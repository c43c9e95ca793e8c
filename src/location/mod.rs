pub mod codec;
pub mod uri;

pub use codec::{ChunkMarkers, LocationRecord, RecordCodec};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Path convention the codec maps URIs against.
///
/// Replaces the original tool's process-global OS sniff: the style is an
/// explicit parameter, so a workspace written on one OS can be edited from
/// another and both behaviors are testable from the same binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    Posix,
    Windows,
}

impl PathStyle {
    /// Style of the machine this binary runs on.
    pub fn host() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }
}

impl FromStr for PathStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "posix" => Ok(PathStyle::Posix),
            "windows" => Ok(PathStyle::Windows),
            other => Err(format!("unknown path style: {other} (expected posix or windows)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_style_from_str() {
        assert_eq!("posix".parse::<PathStyle>().unwrap(), PathStyle::Posix);
        assert_eq!("Windows".parse::<PathStyle>().unwrap(), PathStyle::Windows);
        assert!("mac".parse::<PathStyle>().is_err());
    }
}
