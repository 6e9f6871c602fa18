use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::errors::{FeederError, FeederResult};

/// Locks older than this are left over from a crashed run.
pub const STALE_LOCK_AGE: Duration = Duration::from_secs(6 * 60 * 60);

/// Exclusive marker for one pipeline run, removed on drop. Prevents two
/// overlapping runs from sending the same digest twice.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(path: &Path) -> FeederResult<Self> {
        Self::acquire_with_stale_age(path, STALE_LOCK_AGE)
    }

    pub fn acquire_with_stale_age(path: &Path, stale_after: Duration) -> FeederResult<Self> {
        match Self::create(path) {
            Ok(lock) => Ok(lock),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if !Self::is_stale(path, stale_after) {
                    return Err(FeederError::RunInProgress(path.display().to_string()));
                }

                tracing::warn!(path = %path.display(), "Replacing stale run lock");
                fs::remove_file(path)?;
                Self::create(path).map_err(|e| match e.kind() {
                    ErrorKind::AlreadyExists => FeederError::RunInProgress(path.display().to_string()),
                    _ => FeederError::Io(e),
                })
            }
            Err(e) => Err(FeederError::Io(e)),
        }
    }

    fn create(path: &Path) -> std::io::Result<Self> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        writeln!(file, "{}", std::process::id())?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    fn is_stale(path: &Path, stale_after: Duration) -> bool {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())
            .is_some_and(|age| age >= stale_after)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove run lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobwatch.lock");

        let _lock = RunLock::acquire(&path).unwrap();

        assert!(matches!(
            RunLock::acquire(&path),
            Err(FeederError::RunInProgress(_))
        ));
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobwatch.lock");

        {
            let lock = RunLock::acquire(&path).unwrap();
            assert!(lock.path().exists());
        }

        assert!(!path.exists());
        assert!(RunLock::acquire(&path).is_ok());
    }

    #[test]
    fn test_stale_lock_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobwatch.lock");
        fs::write(&path, "12345\n").unwrap();

        let lock = RunLock::acquire_with_stale_age(&path, Duration::ZERO).unwrap();

        let contents = fs::read_to_string(lock.path()).unwrap();
        assert_eq!(contents.trim(), std::process::id().to_string());
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("jobwatch.lock");

        assert!(matches!(RunLock::acquire(&path), Err(FeederError::Io(_))));
    }
}
