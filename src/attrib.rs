use std::io;
use std::path::Path;
use std::process::Command;

/// Port for clearing a "hidden" filesystem attribute before a rewrite.
///
/// Some hosts mark the `.location` file hidden, which blocks the write on
/// Windows. Clearing it is best-effort by contract: the updater logs a
/// failure and proceeds, it never fails the whole operation over this.
pub trait AttributeClearer {
    fn clear_hidden(&self, path: &Path) -> io::Result<()>;
}

/// Default on non-Windows hosts, and for tests.
pub struct NoopAttributeClearer;

impl AttributeClearer for NoopAttributeClearer {
    fn clear_hidden(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Shells out to `attrib -H <path>`.
pub struct AttribCommandClearer;

impl AttributeClearer for AttribCommandClearer {
    fn clear_hidden(&self, path: &Path) -> io::Result<()> {
        let status = Command::new("attrib").arg("-H").arg(path).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("attrib -H exited with {status}"),
            ))
        }
    }
}

/// Clearer matching the host platform.
pub fn host_clearer() -> Box<dyn AttributeClearer> {
    if cfg!(windows) {
        Box::new(AttribCommandClearer)
    } else {
        Box::new(NoopAttributeClearer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_always_succeeds() {
        assert!(NoopAttributeClearer
            .clear_hidden(Path::new("/nonexistent/.location"))
            .is_ok());
    }
}
