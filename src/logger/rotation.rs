//! Size-based log file rotation

use std::fs;
use std::path::{Path, PathBuf};

use jiff::Zoned;

use crate::logger::config::RotationConfig;
use crate::logger::error::LoggerError;

/// Renames the active file once it grows past `max_size` and keeps at most
/// `max_files` rotated siblings.
pub struct RotationManager {
    config: RotationConfig,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    pub fn should_rotate(&self, current_file_size: u64) -> bool {
        current_file_size >= self.config.max_size
    }

    pub fn rotate(&self, current_path: &Path) -> Result<(), LoggerError> {
        if current_path.exists() {
            let rotated_path = self.rotated_path(current_path);
            fs::rename(current_path, &rotated_path).map_err(|e| {
                LoggerError::rotation(format!(
                    "Failed to rename {} to {}: {}",
                    current_path.display(),
                    rotated_path.display(),
                    e
                ))
            })?;
        }

        self.cleanup(current_path, self.config.max_files)
    }

    /// Drops rotated files down to half the limit to free disk space.
    pub fn force_cleanup(&self, base_path: &Path) -> Result<(), LoggerError> {
        self.cleanup(base_path, (self.config.max_files / 2).max(1))
    }

    // workforce.log -> workforce.20250101_120000.log
    fn rotated_path(&self, base_path: &Path) -> PathBuf {
        let timestamp = Zoned::now().strftime("%Y%m%d_%H%M%S");
        let stem = base_path.file_stem().unwrap_or_default().to_string_lossy();
        let ext = base_path.extension().unwrap_or_default().to_string_lossy();

        let new_name = if ext.is_empty() {
            format!("{}.{}", stem, timestamp)
        } else {
            format!("{}.{}.{}", stem, timestamp, ext)
        };

        base_path.with_file_name(new_name)
    }

    fn rotated_files(base_path: &Path) -> Result<Vec<PathBuf>, LoggerError> {
        let parent = match base_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let prefix = format!(
            "{}.",
            base_path.file_stem().unwrap_or_default().to_string_lossy()
        );
        let active = base_path.file_name();

        let mut files: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name() != active
                    && path
                        .file_name()
                        .is_some_and(|name| name.to_string_lossy().starts_with(&prefix))
            })
            .collect();

        // Timestamped names sort oldest first
        files.sort();
        Ok(files)
    }

    fn cleanup(&self, base_path: &Path, keep: usize) -> Result<(), LoggerError> {
        let files = Self::rotated_files(base_path)?;
        let excess = files.len().saturating_sub(keep);

        for oldest in files.into_iter().take(excess) {
            fs::remove_file(&oldest)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn manager(max_size: u64, max_files: usize) -> RotationManager {
        RotationManager::new(RotationConfig {
            max_size,
            max_files,
        })
    }

    #[test]
    fn test_should_rotate_by_size() {
        let manager = manager(1024, 5);
        assert!(!manager.should_rotate(1023));
        assert!(manager.should_rotate(1024));
        assert!(manager.should_rotate(4096));
    }

    #[test]
    fn test_rotate_renames_active_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workforce.log");
        fs::write(&path, "line\n").unwrap();

        manager(1, 5).rotate(&path).unwrap();

        assert!(!path.exists());
        let rotated = RotationManager::rotated_files(&path).unwrap();
        assert_eq!(rotated.len(), 1);
        assert_eq!(fs::read_to_string(&rotated[0]).unwrap(), "line\n");
    }

    #[test]
    fn test_cleanup_keeps_newest_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("workforce.log");
        for stamp in ["20250101_000000", "20250102_000000", "20250103_000000"] {
            fs::write(dir.path().join(format!("workforce.{stamp}.log")), "x").unwrap();
        }
        fs::write(dir.path().join("unrelated.log"), "x").unwrap();
        fs::write(&path, "active").unwrap();

        manager(1, 2).cleanup(&path, 2).unwrap();

        let remaining = RotationManager::rotated_files(&path).unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(!dir.path().join("workforce.20250101_000000.log").exists());
        assert!(path.exists());
        assert!(dir.path().join("unrelated.log").exists());
    }

    #[test]
    fn test_force_cleanup_halves_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        for day in 1..=4 {
            fs::write(dir.path().join(format!("app.2025010{day}_000000.log")), "x").unwrap();
        }

        manager(1, 4).force_cleanup(&path).unwrap();

        assert_eq!(RotationManager::rotated_files(&path).unwrap().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_rotation_triggers_at_max_size(
            current_size in 0u64..10_000_000u64,
            max_size in 1u64..10_000_000u64,
        ) {
            prop_assert_eq!(
                manager(max_size, 5).should_rotate(current_size),
                current_size >= max_size
            );
        }
    }
}
