//! Loading font and image files named on the command line.
//!
//! Each file is read through a [`FilesystemResourceProvider`] rooted at the
//! file's own directory.

use crate::error::LeafTextError;
use leaftext_layout::{FontLibrary, ImageHandle, ImageLibrary};
use leaftext_traits::{FilesystemResourceProvider, FontHandle};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A `key=path` pair. Without `key=`, the file stem is the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSpec {
    pub key: String,
    pub path: PathBuf,
}

impl FromStr for AssetSpec {
    type Err = LeafTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, path) = match s.split_once('=') {
            Some((key, path)) => (key.to_string(), PathBuf::from(path)),
            None => {
                let path = PathBuf::from(s);
                let stem = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .ok_or_else(|| LeafTextError::Usage(format!("no file name in '{}'", s)))?
                    .to_string();
                (stem, path)
            }
        };
        if key.is_empty() || path.as_os_str().is_empty() {
            return Err(LeafTextError::Usage(format!(
                "expected key=path, got '{}'",
                s
            )));
        }
        Ok(Self { key, path })
    }
}

impl AssetSpec {
    /// The provider for the file's directory and the file's name inside it.
    fn provider(&self) -> Result<(FilesystemResourceProvider, String), LeafTextError> {
        let name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                LeafTextError::Usage(format!("no file name in '{}'", self.path.display()))
            })?
            .to_string();
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Ok((FilesystemResourceProvider::new(dir), name))
    }
}

pub fn load_font(fonts: &FontLibrary, spec: &AssetSpec) -> Result<FontHandle, LeafTextError> {
    let (provider, name) = spec.provider()?;
    fonts.load_fonts(&provider, &[(spec.key.as_str(), name.as_str())])?;
    fonts.get(&spec.key).ok_or_else(|| {
        LeafTextError::Usage(format!("font '{}' was not registered", spec.key))
    })
}

/// Registers the image under its file name and under `spec.key`.
pub fn load_image(images: &ImageLibrary, spec: &AssetSpec) -> Result<ImageHandle, LeafTextError> {
    let (provider, name) = spec.provider()?;
    Ok(images.load(&name, Some(spec.key.as_str()), &provider)?)
}
