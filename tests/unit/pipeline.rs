use super::*;

struct Fixture {
    _dir: tempfile::TempDir,
    inputs: Inputs,
}

fn fixture(script: &str, slides: usize) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let imgs = dir.path().join("imgs");
    std::fs::create_dir_all(&imgs).unwrap();
    for i in 0..slides {
        std::fs::write(imgs.join(format!("{i}.png")), b"").unwrap();
    }
    std::fs::write(imgs.join("arstotzka.png"), b"").unwrap();
    std::fs::write(imgs.join("inspector.png"), b"").unwrap();

    let sounds = dir.path().join("sounds.json");
    std::fs::write(
        &sounds,
        r#"[{ "music": [{ "filename": "m.wav" }], "letter": [{ "filename": "l.wav" }], "next": [{ "filename": "n.wav" }] }]"#,
    )
    .unwrap();

    let script_path = dir.path().join("report.txt");
    std::fs::write(&script_path, script).unwrap();

    let inputs = Inputs {
        script: script_path,
        sounds,
        images: imgs,
        font: dir.path().join("font.ttf"),
        assets_root: dir.path().to_path_buf(),
    };
    Fixture { _dir: dir, inputs }
}

#[test]
fn defaults_point_at_the_reference_layout() {
    let inputs = Inputs::default();
    assert_eq!(inputs.script, PathBuf::from("report.txt"));
    assert_eq!(inputs.sounds, PathBuf::from("sounds/sounds.json"));
    let outputs = OutputPaths::default();
    assert_eq!(outputs.video, PathBuf::from("jail.mp4"));
    assert_eq!(outputs.temp_audio, PathBuf::from("temp.mp3"));
    assert!(!outputs.keep_temp);
}

#[test]
fn plan_runs_without_decoding_images() {
    let fx = fixture("Hello\n", 1);
    let report = plan_slideshow(&fx.inputs, &RenderSettings::default()).unwrap();
    assert_eq!(report.total_frames, 317);
    assert_eq!(report.lines.len(), 2);
    assert_eq!(report.lines[1].text, "Glory to Arstotzka.");
}

#[test]
fn too_many_lines_fail_before_rendering() {
    // Two slides plus the closing image: three available, so three lines are too many.
    let fx = fixture("a\nb\nc", 2);
    let err = plan_slideshow(&fx.inputs, &RenderSettings::default()).unwrap_err();
    assert!(err.is_config());

    let dir = tempfile::tempdir().unwrap();
    let outputs = OutputPaths {
        video: dir.path().join("out.mp4"),
        temp_video: dir.path().join("temp.mp4"),
        temp_audio: dir.path().join("temp.mp3"),
        keep_temp: false,
    };
    let err = render_slideshow(&fx.inputs, &outputs, &RenderSettings::default()).unwrap_err();
    assert!(err.is_config());
    assert!(!outputs.temp_video.exists());
}

#[test]
fn blank_first_line_fails() {
    let fx = fixture("   \nsecond", 3);
    let err = plan_slideshow(&fx.inputs, &RenderSettings::default()).unwrap_err();
    assert!(err.is_config());
}
