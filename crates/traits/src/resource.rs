//! Where font files and images come from.
//!
//! The font and image libraries read raw bytes through a [`ResourceProvider`]
//! and never touch the filesystem themselves.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("No font or image at '{0}'")]
    NotFound(String),

    #[error("'{0}' is outside the asset directory")]
    OutsideBase(String),

    #[error("Could not read '{path}': {message}")]
    Unreadable { path: String, message: String },
}

/// Raw file bytes, shared with the fonts parsed from them.
pub type ResourceBytes = Arc<Vec<u8>>;

/// A source of font files and images, looked up by path or url.
///
/// Loading is synchronous. Late assets are registered when they arrive and
/// the caller lays out again.
pub trait ResourceProvider: Send + Sync + Debug {
    fn load(&self, path: &str) -> Result<ResourceBytes, ResourceError>;
}

/// Assets bundled with the program or prepared by a test.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    assets: RwLock<HashMap<String, ResourceBytes>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `path`, replacing any earlier asset there.
    pub fn add(&self, path: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let path = path.into();
        let mut assets = self.assets.write().map_err(|_| ResourceError::Unreadable {
            path: path.clone(),
            message: "asset store lock poisoned".to_string(),
        })?;
        assets.insert(path, Arc::new(data));
        Ok(())
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<ResourceBytes, ResourceError> {
        let assets = self.assets.read().map_err(|_| ResourceError::Unreadable {
            path: path.to_string(),
            message: "asset store lock poisoned".to_string(),
        })?;
        assets
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }
}
