use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::encode::ffmpeg::{ensure_parent_dir, is_ffmpeg_on_path};
use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Build the ffmpeg invocation that muxes `video` and `audio` into `out` (H.264 + AAC).
pub fn mux_command(video: &Path, audio: &Path, out: &Path) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-hide_banner", "-loglevel", "error", "-stats", "-y", "-i"])
        .arg(video)
        .arg("-i")
        .arg(audio)
        .args([
            "-c:v", "libx264", "-c:a", "aac", "-map", "0:v:0", "-map", "1:a:0",
        ])
        .arg(out);
    cmd
}

/// Mux the silent video and the compressed soundtrack into the final file.
#[tracing::instrument(skip_all, fields(out = %out.display()))]
pub fn mux_av(video: &Path, audio: &Path, out: &Path) -> SlidecastResult<()> {
    if !is_ffmpeg_on_path() {
        return Err(SlidecastError::encode(
            "ffmpeg is required for muxing, but was not found on PATH",
        ));
    }
    ensure_parent_dir(out)?;

    let output = mux_command(video, audio, out)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| SlidecastError::encode(format!("failed to run ffmpeg mux: {e}")))?;

    if !output.status.success() {
        return Err(SlidecastError::encode(format!(
            "ffmpeg mux exited with status {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    tracing::info!("muxed final video");
    Ok(())
}

/// Intermediate files deleted when the guard drops, on success and error paths alike.
#[derive(Debug)]
pub struct TempArtifacts {
    paths: Vec<PathBuf>,
    keep: bool,
}

impl TempArtifacts {
    /// Guard `paths`. With `keep`, nothing is deleted.
    pub fn new(paths: impl IntoIterator<Item = PathBuf>, keep: bool) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            keep,
        }
    }

    /// Guarded paths.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        for path in &self.paths {
            if !path.exists() {
                continue;
            }
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary file");
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mux.rs"]
mod tests;
