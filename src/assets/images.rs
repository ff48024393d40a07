use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    assets::decode::{PreparedImage, decode_image},
    assets::script::ImageKey,
    foundation::error::{SlidecastError, SlidecastResult},
};

/// Directory of slide images: `<index>.png` per line plus `<terminal>.png`.
#[derive(Clone, Debug)]
pub struct ImageLibrary {
    dir: PathBuf,
    terminal_name: String,
    available: usize,
}

impl ImageLibrary {
    /// Scan `dir` and count the usable images.
    ///
    /// Every `.png` counts except the reserved inspector artwork.
    pub fn scan(dir: impl Into<PathBuf>, terminal_name: impl Into<String>) -> SlidecastResult<Self> {
        let dir = dir.into();
        let rd = std::fs::read_dir(&dir)
            .with_context(|| format!("list image directory '{}'", dir.display()))?;

        let mut available = 0usize;
        for entry in rd {
            let entry = entry.with_context(|| format!("list '{}'", dir.display()))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.ends_with(".png") && !name.contains("inspector") {
                available += 1;
            }
        }

        tracing::debug!(dir = %dir.display(), available, "scanned image library");
        Ok(Self {
            dir,
            terminal_name: terminal_name.into(),
            available,
        })
    }

    /// Number of usable images, closing image included.
    pub fn available(&self) -> usize {
        self.available
    }

    /// Directory the library was scanned from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: ImageKey) -> PathBuf {
        match key {
            ImageKey::Slide(i) => self.dir.join(format!("{i}.png")),
            ImageKey::Terminal => self.dir.join(format!("{}.png", self.terminal_name)),
        }
    }

    /// Decode every image referenced by `keys` up front.
    pub fn prepare(&self, keys: impl IntoIterator<Item = ImageKey>) -> SlidecastResult<ImageStore> {
        let mut images = HashMap::new();
        for key in keys {
            if images.contains_key(&key) {
                continue;
            }
            let path = self.path_for(key);
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read image '{}'", path.display()))?;
            let image = decode_image(&bytes)
                .map_err(|e| SlidecastError::render(format!("'{}': {e}", path.display())))?;
            images.insert(key, image);
        }
        Ok(ImageStore { images })
    }
}

/// Decoded images keyed by [`ImageKey`].
#[derive(Clone, Debug, Default)]
pub struct ImageStore {
    images: HashMap<ImageKey, PreparedImage>,
}

impl ImageStore {
    /// Build a store from already decoded images.
    pub fn from_images(images: impl IntoIterator<Item = (ImageKey, PreparedImage)>) -> Self {
        Self {
            images: images.into_iter().collect(),
        }
    }

    /// Lookup a decoded image.
    pub fn get(&self, key: ImageKey) -> SlidecastResult<&PreparedImage> {
        self.images
            .get(&key)
            .ok_or_else(|| SlidecastError::render(format!("image {key:?} was not prepared")))
    }

    /// Number of decoded images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Return `true` when nothing was decoded.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/images.rs"]
mod tests;
