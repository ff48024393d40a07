use super::*;

const RATE: u32 = 1000;

fn buf(frames: usize, value: f32) -> AudioBuffer {
    AudioBuffer::new(RATE, 2, vec![value; frames * 2]).unwrap()
}

#[derive(Default)]
struct FakeSource {
    clips: HashMap<PathBuf, Arc<AudioBuffer>>,
}

impl FakeSource {
    fn with(mut self, path: &str, clip: AudioBuffer) -> Self {
        self.clips.insert(PathBuf::from("/root").join(path), Arc::new(clip));
        self
    }
}

impl PcmSource for FakeSource {
    fn load(&mut self, path: &Path) -> SlidecastResult<Arc<AudioBuffer>> {
        self.clips
            .get(path)
            .cloned()
            .ok_or_else(|| SlidecastError::audio(format!("no clip {}", path.display())))
    }
}

/// Always picks the last candidate.
struct LastPicker;

impl AssetPicker for LastPicker {
    fn pick(&mut self, _kind: CueKind, count: usize) -> usize {
        count - 1
    }
}

fn catalog() -> SoundCatalog {
    SoundCatalog::from_json_str(
        r#"{
            "music": [{ "filename": "music.wav" }],
            "letter": [{ "filename": "l0.wav" }, { "filename": "l1.wav" }],
            "next": [{ "filename": "next.wav" }]
        }"#,
    )
    .unwrap()
}

fn opts(fade_out_ms: u64) -> MixOptions {
    MixOptions {
        fps: Fps::new(10, 1).unwrap(),
        letter_gain_db: -7.0,
        fade_out_ms,
        sample_rate: RATE,
        channels: 2,
    }
}

fn cue(kind: CueKind, frame: u64) -> Cue {
    Cue {
        kind,
        frame: FrameIndex(frame),
    }
}

#[test]
fn overlay_adds_and_drops_the_overhang() {
    let mut base = buf(10, 0.0);
    base.overlay(&buf(4, 0.5), 8, 1.0).unwrap();
    let s = base.samples();
    assert_eq!(s.len(), 20);
    assert_eq!(s[15], 0.0);
    assert_eq!(s[16], 0.5);
    assert_eq!(s[19], 0.5);

    // Starting past the end is a no-op.
    base.overlay(&buf(4, 0.5), 50, 1.0).unwrap();
    assert_eq!(base.frames(), 10);
}

#[test]
fn overlay_rejects_format_mismatch() {
    let mut base = buf(10, 0.0);
    let mono = AudioBuffer::new(RATE, 1, vec![0.0; 4]).unwrap();
    assert!(base.overlay(&mono, 0, 1.0).is_err());
}

#[test]
fn pad_and_truncate_work_in_milliseconds() {
    let mut b = buf(5, 0.25);
    b.pad_to_ms(8);
    assert_eq!(b.frames(), 8);
    assert_eq!(b.samples()[15], 0.0);
    b.truncate_ms(3);
    assert_eq!(b.duration_ms(), 3);
    b.pad_to_ms(1);
    assert_eq!(b.frames(), 3);
}

#[test]
fn fade_out_strictly_decreases_to_silence() {
    let mut b = buf(20, 1.0);
    b.fade_out_ms(10);
    let left: Vec<f32> = b.samples().iter().step_by(2).copied().collect();
    assert!(left[..10].iter().all(|&v| v == 1.0));
    assert!(left[10..].windows(2).all(|w| w[1] < w[0]));
    assert_eq!(left[19], 0.0);
}

#[test]
fn fade_longer_than_buffer_covers_everything() {
    let mut b = buf(4, 1.0);
    b.fade_out_ms(1000);
    let left: Vec<f32> = b.samples().iter().step_by(2).copied().collect();
    assert_eq!(left, vec![0.75, 0.5, 0.25, 0.0]);
}

#[test]
fn cue_positions_round_down_to_milliseconds() {
    let fps = Fps::default();
    assert_eq!(cue_position_ms(FrameIndex(0), fps), 0);
    assert_eq!(cue_position_ms(FrameIndex(1), fps), 33);
    assert_eq!(cue_position_ms(FrameIndex(45), fps), 1500);
}

#[test]
fn mix_places_cues_and_matches_video_length() {
    let source = FakeSource::default()
        .with("music.wav", buf(2000, 0.0))
        .with("l1.wav", buf(10, 1.0))
        .with("next.wav", buf(10, 0.5));
    let catalog = catalog();
    let root = Path::new("/root");
    let mut mixer = CueMixer::new(&catalog, root, source, LastPicker, opts(0));

    let cues = [
        cue(CueKind::Music, 0),
        cue(CueKind::Letter, 1),
        cue(CueKind::Next, 5),
    ];
    // 10 frames at 10 fps: one second.
    let out = mixer.mix(&cues, 10).unwrap();
    assert_eq!(out.duration_ms(), 1000);

    let left: Vec<f32> = out.samples().iter().step_by(2).copied().collect();
    assert_eq!(left[99], 0.0);
    assert!((left[100] - db_to_gain(-7.0)).abs() < 1e-6);
    assert_eq!(left[110], 0.0);
    assert_eq!(left[500], 0.5);
}

#[test]
fn short_music_is_padded_to_the_video() {
    let source = FakeSource::default()
        .with("music.wav", buf(100, 0.1))
        .with("next.wav", buf(10, 0.5));
    let catalog = catalog();
    let mut mixer = CueMixer::new(&catalog, Path::new("/root"), source, LastPicker, opts(0));

    let out = mixer
        .mix(&[cue(CueKind::Music, 0), cue(CueKind::Next, 8)], 10)
        .unwrap();
    assert_eq!(out.frames(), 1000);
    let left: Vec<f32> = out.samples().iter().step_by(2).copied().collect();
    assert_eq!(left[800], 0.5);
    assert_eq!(left[999], 0.0);
}

#[test]
fn mix_clamps_and_fades() {
    let source = FakeSource::default()
        .with("music.wav", buf(1000, 0.9))
        .with("next.wav", buf(1000, 0.9));
    let catalog = catalog();
    let mut mixer = CueMixer::new(&catalog, Path::new("/root"), source, LastPicker, opts(500));

    let out = mixer
        .mix(&[cue(CueKind::Music, 0), cue(CueKind::Next, 0)], 10)
        .unwrap();
    assert!(out.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
    assert_eq!(out.samples()[0], 1.0);
    assert_eq!(*out.samples().last().unwrap(), 0.0);
}

#[test]
fn overdriven_tail_still_fades_strictly() {
    let source = FakeSource::default()
        .with("music.wav", buf(1000, 0.9))
        .with("next.wav", buf(1000, 0.9));
    let catalog = catalog();
    let mut mixer = CueMixer::new(&catalog, Path::new("/root"), source, LastPicker, opts(500));

    let out = mixer
        .mix(&[cue(CueKind::Music, 0), cue(CueKind::Next, 0)], 10)
        .unwrap();
    let left: Vec<f32> = out.samples().iter().step_by(2).copied().collect();
    let fade_start = left.len() - out.ms_to_frames(500);
    assert_eq!(left[fade_start - 1], 1.0);
    assert!(left[fade_start..].windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn music_must_come_first_and_only_once() {
    let catalog = catalog();
    let source = FakeSource::default()
        .with("music.wav", buf(10, 0.0))
        .with("next.wav", buf(1, 0.0));

    let mut mixer = CueMixer::new(&catalog, Path::new("/root"), source, LastPicker, opts(0));
    assert!(mixer.mix(&[cue(CueKind::Next, 0)], 1).is_err());
    assert!(
        mixer
            .mix(&[cue(CueKind::Music, 0), cue(CueKind::Music, 0)], 1)
            .is_err()
    );
    assert!(mixer.mix(&[], 1).is_err());
}

#[test]
fn random_picker_stays_in_range() {
    use rand::SeedableRng as _;
    let mut picker = RandomPicker::new(rand::rngs::StdRng::seed_from_u64(7));
    for _ in 0..100 {
        assert!(picker.pick(CueKind::Letter, 3) < 3);
    }
    assert_eq!(random_picker().pick(CueKind::Next, 1), 0);
}
