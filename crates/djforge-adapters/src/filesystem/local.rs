//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use djforge_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::Permissions,
    error::{ForgeError, ForgeResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> ForgeResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = if executable {
                Permissions::executable().unix_mode()
            } else {
                Permissions::read_write().unix_mode()
            };
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        #[cfg(not(unix))]
        {
            let _ = (path, executable);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ForgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_nested_files() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let path = dir.path().join("config/settings/base.py");

        fs.create_dir_all(path.parent().unwrap()).unwrap();
        fs.write_file(&path, "DEBUG = False\n").unwrap();

        assert!(fs.exists(&path));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "DEBUG = False\n");
    }

    #[cfg(unix)]
    #[test]
    fn marks_scripts_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let path = dir.path().join("manage.py");
        fs.write_file(&path, "#!/usr/bin/env python\n").unwrap();
        fs.set_permissions(&path, true).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn remove_reports_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .remove_dir_all(&dir.path().join("nope"))
            .unwrap_err();
        assert!(err.to_string().contains("remove directory"));
    }
}
