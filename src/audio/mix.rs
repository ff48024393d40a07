use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    assets::catalog::SoundCatalog,
    assets::media::{AudioPcm, MIX_CHANNELS, MIX_SAMPLE_RATE, decode_audio_f32_stereo},
    foundation::core::{Fps, FrameIndex},
    foundation::error::{SlidecastError, SlidecastResult},
    foundation::math::db_to_gain,
    settings::RenderSettings,
    timeline::cue::{Cue, CueKind},
};

/// Interleaved `f32` PCM buffer used as the mixing surface.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: u16,
    samples: Vec<f32>,
}

impl AudioBuffer {
    /// Wrap interleaved samples. `channels` must be non-zero.
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> SlidecastResult<Self> {
        if sample_rate == 0 || channels == 0 {
            return Err(SlidecastError::audio(
                "audio buffer needs a non-zero sample rate and channel count",
            ));
        }
        if !samples.len().is_multiple_of(usize::from(channels)) {
            return Err(SlidecastError::audio(
                "interleaved sample count is not a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            samples,
        })
    }

    /// Take ownership of decoded PCM.
    pub fn from_pcm(pcm: AudioPcm) -> SlidecastResult<Self> {
        Self::new(pcm.sample_rate, pcm.channels, pcm.interleaved_f32)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of sample frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    /// Length in whole milliseconds.
    pub fn duration_ms(&self) -> u64 {
        (self.frames() as u128 * 1000 / u128::from(self.sample_rate)) as u64
    }

    /// Sample frame at `ms`, rounded down.
    pub fn ms_to_frames(&self, ms: u64) -> usize {
        (u128::from(ms) * u128::from(self.sample_rate) / 1000) as usize
    }

    /// Extend with silence up to `ms`. Longer buffers are left as is.
    pub fn pad_to_ms(&mut self, ms: u64) {
        let want = self.ms_to_frames(ms) * usize::from(self.channels);
        if self.samples.len() < want {
            self.samples.resize(want, 0.0);
        }
    }

    /// Cut everything after `ms`.
    pub fn truncate_ms(&mut self, ms: u64) {
        let keep = self.ms_to_frames(ms) * usize::from(self.channels);
        self.samples.truncate(keep);
    }

    /// Add `clip × gain` starting at `at_ms`. Samples past the end of `self` are dropped.
    pub fn overlay(&mut self, clip: &AudioBuffer, at_ms: u64, gain: f32) -> SlidecastResult<()> {
        if clip.sample_rate != self.sample_rate || clip.channels != self.channels {
            return Err(SlidecastError::audio(format!(
                "cannot overlay {} Hz/{} ch clip onto {} Hz/{} ch buffer",
                clip.sample_rate, clip.channels, self.sample_rate, self.channels
            )));
        }

        let start = self.ms_to_frames(at_ms) * usize::from(self.channels);
        if start >= self.samples.len() {
            return Ok(());
        }
        for (dst, src) in self.samples[start..].iter_mut().zip(&clip.samples) {
            *dst += src * gain;
        }
        Ok(())
    }

    /// Linear fade to silence over the last `ms`; shorter buffers fade over their whole length.
    pub fn fade_out_ms(&mut self, ms: u64) {
        let total = self.frames();
        let n = self.ms_to_frames(ms).min(total);
        if n == 0 {
            return;
        }
        let ch = usize::from(self.channels);
        let first = total - n;
        for j in 0..n {
            let gain = (n - 1 - j) as f32 / n as f32;
            let base = (first + j) * ch;
            for s in &mut self.samples[base..base + ch] {
                *s *= gain;
            }
        }
    }

    /// Clamp every sample to `[-1, 1]`.
    pub fn clamp(&mut self) {
        for s in &mut self.samples {
            *s = s.clamp(-1.0, 1.0);
        }
    }
}

/// Source of decoded sound files.
pub trait PcmSource {
    /// Decode the file at `path` into the mix format.
    fn load(&mut self, path: &Path) -> SlidecastResult<Arc<AudioBuffer>>;
}

/// Decodes through `ffmpeg`; every path is decoded at most once.
#[derive(Debug)]
pub struct FfmpegPcmSource {
    sample_rate: u32,
    cache: HashMap<PathBuf, Arc<AudioBuffer>>,
}

impl FfmpegPcmSource {
    /// Decode to stereo at `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            cache: HashMap::new(),
        }
    }
}

impl Default for FfmpegPcmSource {
    fn default() -> Self {
        Self::new(MIX_SAMPLE_RATE)
    }
}

impl PcmSource for FfmpegPcmSource {
    fn load(&mut self, path: &Path) -> SlidecastResult<Arc<AudioBuffer>> {
        if let Some(buf) = self.cache.get(path) {
            return Ok(buf.clone());
        }
        let pcm = decode_audio_f32_stereo(path, self.sample_rate)?;
        let buf = Arc::new(AudioBuffer::from_pcm(pcm)?);
        tracing::debug!(path = %path.display(), ms = buf.duration_ms(), "decoded sound");
        self.cache.insert(path.to_path_buf(), buf.clone());
        Ok(buf)
    }
}

/// Chooses one of `count` candidate sounds for a cue.
pub trait AssetPicker {
    /// Return an index in `0..count`. `count` is never zero.
    fn pick(&mut self, kind: CueKind, count: usize) -> usize;
}

/// Uniform random choice.
#[derive(Debug)]
pub struct RandomPicker<R> {
    rng: R,
}

impl<R: rand::Rng> RandomPicker<R> {
    /// Pick with `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: rand::Rng> AssetPicker for RandomPicker<R> {
    fn pick(&mut self, _kind: CueKind, count: usize) -> usize {
        self.rng.random_range(0..count)
    }
}

/// Unseeded picker over the thread-local generator.
pub fn random_picker() -> RandomPicker<rand::rngs::ThreadRng> {
    RandomPicker::new(rand::rng())
}

/// Soundtrack mixing parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixOptions {
    /// Video frame rate, used to place cues.
    pub fps: Fps,
    /// Gain applied to letter sounds, in dB.
    pub letter_gain_db: f32,
    /// Fade-out length in milliseconds.
    pub fade_out_ms: u64,
    /// Expected sample rate of every decoded sound.
    pub sample_rate: u32,
    /// Expected channel count of every decoded sound.
    pub channels: u16,
}

impl MixOptions {
    /// Options matching `settings`, in the default mix format.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            fps: settings.fps,
            letter_gain_db: settings.letter_gain_db,
            fade_out_ms: settings.fade_out_ms,
            sample_rate: MIX_SAMPLE_RATE,
            channels: MIX_CHANNELS,
        }
    }
}

/// Timeline position of a cue in whole milliseconds.
pub fn cue_position_ms(frame: FrameIndex, fps: Fps) -> u64 {
    fps.frames_to_millis_floor(frame.0)
}

/// Turns a cue list into the final soundtrack.
pub struct CueMixer<'a, P, K> {
    catalog: &'a SoundCatalog,
    root: &'a Path,
    source: P,
    picker: K,
    opts: MixOptions,
}

impl<'a, P: PcmSource, K: AssetPicker> CueMixer<'a, P, K> {
    /// Mixer resolving catalog filenames against `root`.
    pub fn new(
        catalog: &'a SoundCatalog,
        root: &'a Path,
        source: P,
        picker: K,
        opts: MixOptions,
    ) -> Self {
        Self {
            catalog,
            root,
            source,
            picker,
            opts,
        }
    }

    /// Mix `cues` (in emission order) for a video of `total_frames` frames.
    ///
    /// The result lasts exactly as long as the video and ends with the configured fade-out.
    /// Samples are clamped before fading so that overdriven tails still decay.
    #[tracing::instrument(skip_all, fields(cues = cues.len(), total_frames = total_frames))]
    pub fn mix(&mut self, cues: &[Cue], total_frames: u64) -> SlidecastResult<AudioBuffer> {
        let video_ms = self.opts.fps.frames_to_millis_floor(total_frames);
        let letter_gain = db_to_gain(self.opts.letter_gain_db);
        let mut base: Option<AudioBuffer> = None;

        for cue in cues {
            match cue.kind {
                CueKind::Music => {
                    if base.is_some() {
                        return Err(SlidecastError::audio("more than one music cue"));
                    }
                    if cue.frame != FrameIndex(0) {
                        return Err(SlidecastError::audio(format!(
                            "music cue must start at frame 0, got {}",
                            cue.frame.0
                        )));
                    }
                    let path = self.catalog.background()?.resolve(self.root);
                    let mut track = self.load_checked(&path)?.as_ref().clone();
                    track.pad_to_ms(video_ms);
                    base = Some(track);
                }
                kind => {
                    let Some(track) = base.as_mut() else {
                        return Err(SlidecastError::audio(format!(
                            "{kind} cue at frame {} precedes the music cue",
                            cue.frame.0
                        )));
                    };
                    let candidates = self.catalog.candidates(kind);
                    if candidates.is_empty() {
                        return Err(SlidecastError::config(format!(
                            "sound catalog has no '{kind}' sounds"
                        )));
                    }
                    let idx = self.picker.pick(kind, candidates.len()).min(candidates.len() - 1);
                    let path = candidates[idx].resolve(self.root);
                    let clip = self.load_checked(&path)?;
                    let gain = if kind == CueKind::Letter {
                        letter_gain
                    } else {
                        1.0
                    };
                    track.overlay(&clip, cue_position_ms(cue.frame, self.opts.fps), gain)?;
                }
            }
        }

        let mut track = base.ok_or_else(|| SlidecastError::audio("no music cue to start the mix"))?;
        track.truncate_ms(video_ms);
        track.clamp();
        track.fade_out_ms(self.opts.fade_out_ms);

        tracing::info!(ms = track.duration_ms(), "soundtrack mixed");
        Ok(track)
    }

    fn load_checked(&mut self, path: &Path) -> SlidecastResult<Arc<AudioBuffer>> {
        let buf = self.source.load(path)?;
        if buf.sample_rate() != self.opts.sample_rate || buf.channels() != self.opts.channels {
            return Err(SlidecastError::audio(format!(
                "'{}' decoded as {} Hz/{} ch, expected {} Hz/{} ch",
                path.display(),
                buf.sample_rate(),
                buf.channels(),
                self.opts.sample_rate,
                self.opts.channels
            )));
        }
        Ok(buf)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
