use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::render::frame::Frame;

/// Options for [`FfmpegVideoSink`].
#[derive(Clone, Debug)]
pub struct FfmpegVideoOpts {
    /// Silent intermediate video path.
    pub out_path: PathBuf,
    /// Video codec passed to `-c:v`.
    pub codec: String,
}

impl FfmpegVideoOpts {
    /// Write an `mpeg4` stream to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            codec: "mpeg4".to_string(),
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw `rgb24` frames to its stdin.
pub struct FfmpegVideoSink {
    opts: FfmpegVideoOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegVideoSink {
    /// Create a sink; nothing is spawned until `begin`.
    pub fn new(opts: FfmpegVideoOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    /// Output path of the silent video.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }
}

impl FrameSink for FfmpegVideoSink {
    fn begin(&mut self, cfg: SinkConfig) -> SlidecastResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(SlidecastError::config("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(SlidecastError::config(
                "ffmpeg sink width/height must be non-zero",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !is_ffmpeg_on_path() {
            return Err(SlidecastError::encode(
                "ffmpeg is required for video encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0", "-an", "-c:v", &self.opts.codec, "-q:v", "2"])
            .arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            SlidecastError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SlidecastError::encode("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| SlidecastError::encode("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "spawned ffmpeg video encoder"
        );

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> SlidecastResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| SlidecastError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(SlidecastError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(SlidecastError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SlidecastError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            SlidecastError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> SlidecastResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| SlidecastError::encode("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            SlidecastError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = join_stderr(self.stderr_drain.take())?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(SlidecastError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }
}

// An unfinished encode is abandoned: stop ffmpeg before its output file is cleaned up.
impl Drop for FfmpegVideoSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return;
        };
        if let Err(e) = child.kill() {
            tracing::debug!(error = %e, "ffmpeg already exited");
        }
        if let Err(e) = child.wait() {
            tracing::warn!(error = %e, "failed to reap abandoned ffmpeg");
        }
        if let Err(e) = join_stderr(self.stderr_drain.take()) {
            tracing::warn!(error = %e, "failed to drain abandoned ffmpeg stderr");
        }
        tracing::debug!(out = %self.opts.out_path.display(), "abandoned ffmpeg encode");
    }
}

pub(crate) fn join_stderr(
    handle: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
) -> SlidecastResult<Vec<u8>> {
    match handle {
        Some(handle) => Ok(handle
            .join()
            .map_err(|_| SlidecastError::encode("ffmpeg stderr drain thread panicked"))?
            .map_err(|e| SlidecastError::encode(format!("ffmpeg stderr read failed: {e}")))?),
        None => Ok(Vec::new()),
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // `-r` before `-i` sets the rawvideo input rate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> SlidecastResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
