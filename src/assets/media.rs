use std::path::Path;

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Internal audio mixing sample rate used across decode/mix/export.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Channel count of the mix.
pub const MIX_CHANNELS: u16 = 2;

#[derive(Clone, Debug, PartialEq)]
/// Decoded interleaved floating-point PCM.
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.interleaved_f32.len() / usize::from(self.channels)
    }
}

/// Decode any ffmpeg-readable sound file to stereo interleaved `f32` PCM at `sample_rate`.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> SlidecastResult<AudioPcm> {
    if !path.is_file() {
        return Err(SlidecastError::audio(format!(
            "sound file '{}' does not exist",
            path.display()
        )));
    }

    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &MIX_CHANNELS.to_string(),
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| SlidecastError::audio(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(SlidecastError::audio(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(SlidecastError::audio(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: MIX_CHANNELS,
        interleaved_f32: pcm,
    })
}

// No unit tests here: decoding shells out to `ffmpeg` and is covered by the media integration test,
// which skips itself when the tool is unavailable.
