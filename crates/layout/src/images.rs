//! Intrinsic image sizes, keyed by url and by optional id.
//!
//! Only the dimensions are decoded; pixels are the renderer's business.

use crate::LayoutError;
use leaftext_traits::ResourceProvider;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageHandle {
    pub width: f32,
    pub height: f32,
}

/// Registered images, shareable between a loader thread and the formatter.
#[derive(Debug, Clone, Default)]
pub struct ImageLibrary {
    images: Arc<RwLock<HashMap<String, ImageHandle>>>,
}

impl ImageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an image under its url and, if given, its id.
    pub fn register(&self, url: &str, id: Option<&str>, width: f32, height: f32) -> ImageHandle {
        let handle = ImageHandle { width, height };
        match self.images.write() {
            Ok(mut images) => {
                images.insert(url.to_string(), handle);
                if let Some(id) = id {
                    images.insert(id.to_string(), handle);
                }
            }
            Err(_) => log::warn!("Image library lock poisoned; '{}' not registered", url),
        }
        handle
    }

    /// Reads `url` through `provider`, decodes its dimensions and registers it.
    pub fn load(
        &self,
        url: &str,
        id: Option<&str>,
        provider: &dyn ResourceProvider,
    ) -> Result<ImageHandle, LayoutError> {
        let bytes = provider.load(url)?;
        let (width, height) = image::ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| LayoutError::ImageDecode {
                url: url.to_string(),
                message: e.to_string(),
            })?
            .into_dimensions()
            .map_err(|e| LayoutError::ImageDecode {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        log::debug!("Loaded image '{}' ({}x{})", url, width, height);
        Ok(self.register(url, id, width as f32, height as f32))
    }

    /// Loads several `(url, id)` pairs, stopping at the first failure.
    pub fn load_images(
        &self,
        provider: &dyn ResourceProvider,
        images: &[(&str, Option<&str>)],
    ) -> Result<(), LayoutError> {
        for (url, id) in images {
            self.load(url, *id, provider)?;
        }
        Ok(())
    }

    pub fn get_by_id_or_url(&self, key: &str) -> Option<ImageHandle> {
        self.images.read().ok()?.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.images.read().map(|i| i.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaftext_traits::{InMemoryResourceProvider, ResourceError};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::new(width, height);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_register_by_url_and_id() {
        let library = ImageLibrary::new();
        library.register("img/logo.png", Some("logo"), 120.0, 40.0);

        let by_url = library.get_by_id_or_url("img/logo.png").unwrap();
        let by_id = library.get_by_id_or_url("logo").unwrap();
        assert_eq!(by_url, by_id);
        assert_eq!(by_id.width, 120.0);
        assert!(library.get_by_id_or_url("other").is_none());
    }

    #[test]
    fn test_load_decodes_dimensions() {
        let provider = InMemoryResourceProvider::new();
        provider.add("pixel.png", png_bytes(3, 2)).unwrap();

        let library = ImageLibrary::new();
        let handle = library.load("pixel.png", Some("px"), &provider).unwrap();
        assert_eq!((handle.width, handle.height), (3.0, 2.0));
        assert_eq!(library.get_by_id_or_url("px"), Some(handle));
    }

    #[test]
    fn test_load_errors() {
        let provider = InMemoryResourceProvider::new();
        provider.add("text.png", b"definitely not an image".to_vec()).unwrap();
        let library = ImageLibrary::new();

        assert!(matches!(
            library.load("missing.png", None, &provider),
            Err(LayoutError::Resource(ResourceError::NotFound(_)))
        ));
        assert!(matches!(
            library.load("text.png", None, &provider),
            Err(LayoutError::ImageDecode { .. })
        ));
        assert!(library.is_empty());
    }
}
