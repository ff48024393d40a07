use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::timeline::cue::CueKind;

/// One candidate sound file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SoundAsset {
    /// Path of the sound, relative to the assets root unless absolute.
    pub filename: String,
}

/// Candidate sounds per cue kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SoundCatalog {
    /// Background tracks; only the first one is played.
    #[serde(default)]
    pub music: Vec<SoundAsset>,
    /// Letter sounds, one picked at random per letter cue.
    #[serde(default)]
    pub letter: Vec<SoundAsset>,
    /// Slide-change sounds, one picked at random per next cue.
    #[serde(default)]
    pub next: Vec<SoundAsset>,
}

// Catalog files wrap the object in a one-element array; bare objects are accepted as well.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped(Vec<SoundCatalog>),
    Bare(SoundCatalog),
}

impl SoundCatalog {
    /// Load and validate a catalog file.
    pub fn load(path: &Path) -> SlidecastResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read sound catalog '{}'", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate a catalog from JSON.
    pub fn from_json_str(raw: &str) -> SlidecastResult<Self> {
        let file: CatalogFile = serde_json::from_str(raw)
            .map_err(|e| SlidecastError::serde(format!("invalid sound catalog JSON: {e}")))?;
        let catalog = match file {
            CatalogFile::Bare(c) => c,
            CatalogFile::Wrapped(list) => list.into_iter().next().ok_or_else(|| {
                SlidecastError::config("sound catalog array must contain one object")
            })?,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Every kind needs at least one candidate.
    pub fn validate(&self) -> SlidecastResult<()> {
        for kind in [CueKind::Music, CueKind::Letter, CueKind::Next] {
            let list = self.candidates(kind);
            if list.is_empty() {
                return Err(SlidecastError::config(format!(
                    "sound catalog has no '{kind}' sounds"
                )));
            }
            if list.iter().any(|s| s.filename.trim().is_empty()) {
                return Err(SlidecastError::config(format!(
                    "sound catalog '{kind}' entry has an empty filename"
                )));
            }
        }
        Ok(())
    }

    /// Candidates for `kind`, in file order.
    pub fn candidates(&self, kind: CueKind) -> &[SoundAsset] {
        match kind {
            CueKind::Music => &self.music,
            CueKind::Letter => &self.letter,
            CueKind::Next => &self.next,
        }
    }

    /// The designated background track.
    pub fn background(&self) -> SlidecastResult<&SoundAsset> {
        self.music
            .first()
            .ok_or_else(|| SlidecastError::config("sound catalog has no 'music' sounds"))
    }
}

impl SoundAsset {
    /// Resolve against `root` unless the filename is absolute.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let p = Path::new(&self.filename);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            root.join(p)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/catalog.rs"]
mod tests;
