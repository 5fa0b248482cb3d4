use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::SecurityConfig;

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlink '{path}' points outside allowed root directory")]
    SymlinkOutsideRoot { path: PathBuf },

    #[error("Path does not exist: '{path}'")]
    PathNotFound { path: PathBuf },

    #[error("Path has no file name: '{path}'")]
    MissingFileName { path: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

/// Validates an existing path against the configured sandbox.
///
/// The path is canonicalized (resolving `.`, `..` and symlinks). When a root
/// directory is configured the canonical path must lie inside it, and a
/// symlink whose target escapes the root is rejected when symlinks are
/// disallowed.
///
/// ```rust,ignore
/// let safe = validate_path("notes/old.txt", &config.security)?;
/// ```
pub fn validate_path(input_path: &str, security: &SecurityConfig) -> Result<PathBuf, PathSecurityError> {
    let path = Path::new(input_path);
    let canonical = canonicalize(path)?;

    let Some(root) = canonical_root(security)? else {
        return Ok(canonical);
    };

    if path.is_symlink() && !security.allow_symlinks && !canonical.starts_with(&root) {
        return Err(PathSecurityError::SymlinkOutsideRoot {
            path: path.to_path_buf(),
        });
    }

    ensure_within_root(canonical, &root)
}

/// Validates a path that is about to be written.
///
/// The file itself may not exist yet; its parent directory must exist and
/// satisfy the same sandbox rules as [`validate_path`]. Returns the canonical
/// parent joined with the file name.
pub fn validate_output_path(
    input_path: &str,
    security: &SecurityConfig,
) -> Result<PathBuf, PathSecurityError> {
    let path = Path::new(input_path);
    let file_name = path
        .file_name()
        .ok_or_else(|| PathSecurityError::MissingFileName {
            path: path.to_path_buf(),
        })?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let parent = canonicalize(parent)?;
    let target = parent.join(file_name);

    // An existing file is overwritten; a symlink there must not lead outside.
    if target.is_symlink() {
        return validate_path(&target.to_string_lossy(), security);
    }

    match canonical_root(security)? {
        Some(root) => {
            ensure_within_root(parent, &root)?;
            Ok(target)
        }
        None => Ok(target),
    }
}

fn canonical_root(security: &SecurityConfig) -> Result<Option<PathBuf>, PathSecurityError> {
    security
        .root_path
        .as_ref()
        .map(|root| {
            root.canonicalize().map_err(|error| PathSecurityError::IoError {
                path: root.clone(),
                error,
            })
        })
        .transpose()
}

fn ensure_within_root(path: PathBuf, root: &Path) -> Result<PathBuf, PathSecurityError> {
    if path.starts_with(root) {
        Ok(path)
    } else {
        Err(PathSecurityError::OutsideRootDirectory {
            path,
            root: root.to_path_buf(),
        })
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, PathSecurityError> {
    path.canonicalize().map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => PathSecurityError::PathNotFound {
            path: path.to_path_buf(),
        },
        _ => PathSecurityError::IoError {
            path: path.to_path_buf(),
            error,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn security(root: Option<PathBuf>, allow_symlinks: bool) -> SecurityConfig {
        SecurityConfig {
            root_path: root,
            allow_symlinks,
        }
    }

    #[test]
    fn test_no_root_allows_existing_paths() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        assert!(validate_path(file.to_str().unwrap(), &security(None, true)).is_ok());
    }

    #[test]
    fn test_nonexistent_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.txt");

        let result = validate_path(missing.to_str().unwrap(), &security(None, true));
        assert!(matches!(result, Err(PathSecurityError::PathNotFound { .. })));
    }

    #[test]
    fn test_path_outside_root() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let file = outside.path().join("outside.txt");
        fs::write(&file, "x").unwrap();

        let config = security(Some(root.path().to_path_buf()), true);
        assert!(matches!(
            validate_path(file.to_str().unwrap(), &config),
            Err(PathSecurityError::OutsideRootDirectory { .. })
        ));
    }

    #[test]
    fn test_path_traversal_blocked() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("sub");
        fs::create_dir(&subdir).unwrap();
        fs::write(temp_dir.path().join("secret.txt"), "x").unwrap();

        let config = security(Some(subdir.clone()), true);
        let traversal = subdir.join("../secret.txt");
        assert!(matches!(
            validate_path(traversal.to_str().unwrap(), &config),
            Err(PathSecurityError::OutsideRootDirectory { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_outside_root_blocked() {
        use std::os::unix::fs::symlink;

        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("target.txt");
        let link = root.path().join("link.txt");
        fs::write(&target, "x").unwrap();
        symlink(&target, &link).unwrap();

        let config = security(Some(root.path().to_path_buf()), false);
        assert!(matches!(
            validate_path(link.to_str().unwrap(), &config),
            Err(PathSecurityError::SymlinkOutsideRoot { .. })
        ));
    }

    #[test]
    fn test_output_path_may_not_exist() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out.diff");

        let config = security(Some(temp_dir.path().to_path_buf()), true);
        let resolved = validate_output_path(out.to_str().unwrap(), &config).unwrap();
        assert_eq!(resolved.file_name().unwrap(), "out.diff");
    }

    #[test]
    fn test_output_parent_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("no_such_dir").join("out.diff");

        let result = validate_output_path(out.to_str().unwrap(), &security(None, true));
        assert!(matches!(result, Err(PathSecurityError::PathNotFound { .. })));
    }

    #[test]
    fn test_output_outside_root() {
        let root = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let out = outside.path().join("out.diff");

        let config = security(Some(root.path().to_path_buf()), true);
        assert!(matches!(
            validate_output_path(out.to_str().unwrap(), &config),
            Err(PathSecurityError::OutsideRootDirectory { .. })
        ));
    }
}
