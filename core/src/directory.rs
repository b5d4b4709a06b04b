use std::fs::DirBuilder;
use std::path::Path;

use crate::errors::ToolkitError;
use crate::types::Tools;

/// Creates `path` and any missing ancestors. An existing directory is not an error.
pub fn create_dir_if_not_exist(path: impl AsRef<Path>) -> Result<(), ToolkitError> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(());
    }

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder.create(path).map_err(|source| {
        log::warn!("failed to create directory {}: {}", path.display(), source);
        ToolkitError::DirectoryCreateFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}

impl Tools {
    pub fn create_dir_if_not_exist(&self, path: impl AsRef<Path>) -> Result<(), ToolkitError> {
        create_dir_if_not_exist(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_nested_directory() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("a").join("b").join("c");

        create_dir_if_not_exist(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_create_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("uploads");
        let tools = Tools::default();

        tools.create_dir_if_not_exist(&target).unwrap();
        tools.create_dir_if_not_exist(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_create_under_file_fails() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain.txt");
        std::fs::write(&file, b"not a directory").unwrap();

        let result = create_dir_if_not_exist(file.join("child"));
        assert!(matches!(result, Err(ToolkitError::DirectoryCreateFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_created_directory_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("perm");
        create_dir_if_not_exist(&target).unwrap();

        let mode = std::fs::metadata(&target).unwrap().permissions().mode();
        // umask can only clear bits
        assert_eq!(mode & 0o777 & !0o755, 0);
        assert_eq!(mode & 0o700, 0o700);
    }
}
