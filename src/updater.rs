use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::attrib::{self, AttributeClearer};
use crate::error::{LocationError, Result};
use crate::location::{LocationRecord, PathStyle, RecordCodec};
use crate::prefix;

/// Read/modify/write operations over a single `.location` record file.
///
/// Each operation is one scoped read-then-rewrite cycle: the file is read
/// and decoded in full (capturing the reference names), the location URI
/// is replaced, and the new record is persisted by writing a temp file in
/// the same directory and renaming it over the original. An interrupted
/// rewrite therefore leaves either the old file or the new one, never a
/// truncated record.
///
/// Precondition, not enforced here: the project owning the record must be
/// closed/inactive in the host IDE for the duration of the rewrite. There
/// is no locking against a concurrent writer.
pub struct LocationUpdater {
    codec: RecordCodec,
    attrib: Box<dyn AttributeClearer>,
}

impl LocationUpdater {
    pub fn new(style: PathStyle) -> Self {
        LocationUpdater {
            codec: RecordCodec::new(style),
            attrib: attrib::host_clearer(),
        }
    }

    pub fn with_codec(codec: RecordCodec) -> Self {
        LocationUpdater {
            codec,
            attrib: attrib::host_clearer(),
        }
    }

    pub fn attribute_clearer(mut self, clearer: Box<dyn AttributeClearer>) -> Self {
        self.attrib = clearer;
        self
    }

    pub fn codec(&self) -> &RecordCodec {
        &self.codec
    }

    /// Decode the full record at `file`.
    pub fn read_record(&self, file: &Path) -> Result<LocationRecord> {
        let bytes = fs::read(file).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                LocationError::RecordNotFound {
                    path: file.to_path_buf(),
                }
            } else {
                LocationError::Io(e)
            }
        })?;
        self.codec.decode(&bytes[..])
    }

    /// Decoded filesystem path of the project's storage location.
    pub fn read_location(&self, file: &Path) -> Result<String> {
        let record = self.read_record(file)?;
        Ok(self.codec.extract_filesystem_path(&record))
    }

    /// Point the record at `new_path`, keeping its reference names.
    pub fn write_location(&self, file: &Path, new_path: &str) -> Result<()> {
        let mut record = self.read_record(file)?;
        record.location_uri = self.codec.build_location_uri(new_path);
        let bytes = self.codec.encode(&record)?;
        self.persist(file, &bytes)
    }

    /// Replace `old_prefix` with `new_prefix` in the current location and
    /// rewrite the record. See [`prefix::apply_prefix_substitution`] for
    /// the exact (unanchored) substitution semantics.
    pub fn update_location_substring(
        &self,
        file: &Path,
        old_prefix: &str,
        new_prefix: &str,
    ) -> Result<()> {
        let current = self.read_location(file)?;
        let updated = prefix::apply_prefix_substitution(&current, old_prefix, new_prefix);
        tracing::debug!(
            from = %current,
            to = %updated,
            file = %file.display(),
            "rewriting project location"
        );
        self.write_location(file, &updated)
    }

    fn persist(&self, file: &Path, bytes: &[u8]) -> Result<()> {
        if let Err(e) = self.attrib.clear_hidden(file) {
            tracing::warn!(
                file = %file.display(),
                error = %e,
                "could not clear hidden attribute, writing anyway"
            );
        }

        let dir = file.parent().ok_or_else(|| {
            LocationError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("record file has no parent directory: {}", file.display()),
            ))
        })?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.persist(file).map_err(|e| LocationError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::ChunkMarkers;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn updater() -> LocationUpdater {
        LocationUpdater::new(PathStyle::Posix)
            .attribute_clearer(Box::new(crate::attrib::NoopAttributeClearer))
    }

    fn write_record(dir: &Path, uri: &str, refs: &[&str]) -> std::path::PathBuf {
        let codec = RecordCodec::new(PathStyle::Posix);
        let record = LocationRecord {
            location_uri: uri.to_string(),
            reference_names: refs.iter().map(|s| s.to_string()).collect(),
        };
        let file = dir.join(".location");
        fs::write(&file, codec.encode(&record).unwrap()).unwrap();
        file
    }

    #[test]
    fn test_read_location() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_record(dir.path(), "URI//file:/home/dev/ws/p1", &[]);
        assert_eq!(updater().read_location(&file).unwrap(), "/home/dev/ws/p1");
    }

    #[test]
    fn test_missing_file_is_record_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = updater()
            .read_location(&dir.path().join(".location"))
            .unwrap_err();
        assert!(matches!(err, LocationError::RecordNotFound { .. }));
    }

    #[test]
    fn test_update_location_substring_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_record(dir.path(), "URI//file:/home/dev/ws/p1", &["refA"]);

        let u = updater();
        u.update_location_substring(&file, "/home/dev/ws", "/srv/ws")
            .unwrap();

        let record = u.read_record(&file).unwrap();
        assert_eq!(record.location_uri, "URI//file:/srv/ws/p1");
        assert_eq!(record.reference_names, vec!["refA".to_string()]);
    }

    #[test]
    fn test_references_survive_repeated_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let refs = ["libA", "libB", "libC"];
        let file = write_record(dir.path(), "URI//file:/ws/p", &refs);

        let u = updater();
        u.write_location(&file, "/first/move/p").unwrap();
        u.write_location(&file, "/second/move/p").unwrap();

        let record = u.read_record(&file).unwrap();
        assert_eq!(record.location_uri, "URI//file:/second/move/p");
        assert_eq!(record.reference_names, refs);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_record(dir.path(), "URI//file:/ws/p", &[]);

        updater().write_location(&file, "/moved/p").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from(".location")]);
    }

    #[test]
    fn test_write_preserves_custom_markers() {
        let markers = ChunkMarkers {
            begin: vec![9, 9, 9, 9],
            end: vec![7, 7, 7, 7],
        };
        let codec = RecordCodec::with_markers(markers.clone(), PathStyle::Posix);
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(".location");
        let record = LocationRecord {
            location_uri: "URI//file:/ws/p".to_string(),
            reference_names: vec![],
        };
        fs::write(&file, codec.encode(&record).unwrap()).unwrap();

        let u = LocationUpdater::with_codec(RecordCodec::with_markers(
            markers.clone(),
            PathStyle::Posix,
        ))
        .attribute_clearer(Box::new(crate::attrib::NoopAttributeClearer));
        u.write_location(&file, "/moved/p").unwrap();

        let bytes = fs::read(&file).unwrap();
        assert!(bytes.starts_with(&markers.begin));
        assert!(bytes.ends_with(&markers.end));
    }

    struct RecordingClearer(Arc<AtomicBool>);

    impl AttributeClearer for RecordingClearer {
        fn clear_hidden(&self, _path: &Path) -> io::Result<()> {
            self.0.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingClearer;

    impl AttributeClearer for FailingClearer {
        fn clear_hidden(&self, _path: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_attribute_clearer_runs_before_write() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_record(dir.path(), "URI//file:/ws/p", &[]);

        let called = Arc::new(AtomicBool::new(false));
        let u = LocationUpdater::new(PathStyle::Posix)
            .attribute_clearer(Box::new(RecordingClearer(called.clone())));
        u.write_location(&file, "/moved/p").unwrap();
        assert!(called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_attribute_clear_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_record(dir.path(), "URI//file:/ws/p", &[]);

        let u = LocationUpdater::new(PathStyle::Posix)
            .attribute_clearer(Box::new(FailingClearer));
        u.write_location(&file, "/moved/p").unwrap();
        assert_eq!(u.read_location(&file).unwrap(), "/moved/p");
    }

    #[test]
    fn test_truncated_record_never_partially_applied() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_record(dir.path(), "URI//file:/ws/p", &["refA"]);

        // Corrupt the record on disk, then attempt a rewrite.
        let mut bytes = fs::read(&file).unwrap();
        bytes.truncate(bytes.len() / 2);
        fs::write(&file, &bytes).unwrap();

        let err = updater()
            .update_location_substring(&file, "/ws", "/new")
            .unwrap_err();
        assert!(matches!(err, LocationError::MalformedRecord { .. }));
        // The corrupt original is untouched.
        assert_eq!(fs::read(&file).unwrap(), bytes);
    }
}
