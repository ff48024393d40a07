use std::io::{Read, Write as _};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::audio::mix::AudioBuffer;
use crate::encode::ffmpeg::{ensure_parent_dir, is_ffmpeg_on_path, join_stderr};
use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Serialize interleaved samples as little-endian `f32`.
pub fn f32le_bytes(samples: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * 4);
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

/// Compress `buffer` with `ffmpeg`; the container/codec follows the extension of `out_path`.
#[tracing::instrument(skip(buffer), fields(out = %out_path.display()))]
pub fn export_compressed(buffer: &AudioBuffer, out_path: &Path) -> SlidecastResult<()> {
    if !is_ffmpeg_on_path() {
        return Err(SlidecastError::audio(
            "ffmpeg is required for audio export, but was not found on PATH",
        ));
    }
    ensure_parent_dir(out_path)?;

    let mut child = Command::new("ffmpeg")
        .args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "f32le",
            "-ar",
            &buffer.sample_rate().to_string(),
            "-ac",
            &buffer.channels().to_string(),
            "-i",
            "pipe:0",
        ])
        .arg(out_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| SlidecastError::audio(format!("failed to spawn ffmpeg for audio export: {e}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| SlidecastError::audio("failed to open ffmpeg stdin"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| SlidecastError::audio("failed to open ffmpeg stderr"))?;
    let stderr_drain = std::thread::spawn(move || {
        let mut stderr_bytes = Vec::new();
        stderr.read_to_end(&mut stderr_bytes)?;
        Ok(stderr_bytes)
    });

    let write_res = stdin.write_all(&f32le_bytes(buffer.samples()));
    drop(stdin);

    let status = child
        .wait()
        .map_err(|e| SlidecastError::audio(format!("failed to wait for ffmpeg: {e}")))?;
    let stderr_bytes = join_stderr(Some(stderr_drain))?;

    if !status.success() {
        return Err(SlidecastError::audio(format!(
            "ffmpeg audio export exited with status {}: {}",
            status,
            String::from_utf8_lossy(&stderr_bytes).trim()
        )));
    }
    write_res
        .map_err(|e| SlidecastError::audio(format!("failed to stream samples to ffmpeg: {e}")))?;

    tracing::info!(ms = buffer.duration_ms(), "soundtrack exported");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/audio/export.rs"]
mod tests;
