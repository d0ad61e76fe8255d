//! Loads fonts and images from a directory on disk.
//!
//! Paths are resolved against a base directory and may not escape it:
//! absolute paths and `..` components that lead outside the base are
//! reported as `OutsideBase`.

use crate::resource::{ResourceError, ResourceProvider, ResourceBytes};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    /// Canonicalized base path for containment checks.
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        // May fail if the directory doesn't exist yet.
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    fn resolve_path_safe(&self, path: &str) -> Option<PathBuf> {
        if Path::new(path).is_absolute() {
            return None;
        }

        let full_path = self.base_path.join(path);

        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            return canonical.starts_with(base).then_some(canonical);
        }

        // Not on disk (yet): fall back to a lexical check.
        if Path::new(path)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }

        Some(full_path)
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<ResourceBytes, ResourceError> {
        let full_path = self
            .resolve_path_safe(path)
            .ok_or_else(|| ResourceError::OutsideBase(path.to_string()))?;

        log::debug!("Loading resource from {}", full_path.display());
        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(path.to_string())
            } else {
                ResourceError::Unreadable {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_existing_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("font.ttf"), b"OTTO").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        assert_eq!(&*provider.load("font.ttf").unwrap(), b"OTTO");
    }

    #[test]
    fn test_load_from_subdirectory() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("img").join("logo.png"), b"png").unwrap();

        let provider = FilesystemResourceProvider::new(dir.path());
        assert_eq!(&*provider.load("img/logo.png").unwrap(), b"png");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let provider = FilesystemResourceProvider::new(dir.path());

        assert!(matches!(
            provider.load("nope.png"),
            Err(ResourceError::NotFound(_))
        ));
    }

    #[test]
    fn test_paths_outside_base_are_rejected() {
        let outer = tempdir().unwrap();
        let base = outer.path().join("base");
        fs::create_dir(&base).unwrap();
        fs::write(outer.path().join("secret.txt"), b"secret").unwrap();

        let provider = FilesystemResourceProvider::new(&base);
        assert!(matches!(
            provider.load("../secret.txt"),
            Err(ResourceError::OutsideBase(_))
        ));

        let absolute = outer.path().join("secret.txt");
        assert!(matches!(
            provider.load(absolute.to_str().unwrap()),
            Err(ResourceError::OutsideBase(_))
        ));
    }
}
