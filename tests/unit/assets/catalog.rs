use super::*;

const WRAPPED: &str = r#"[{
    "music": [{ "filename": "sounds/music.wav" }, { "filename": "sounds/alt.wav" }],
    "letter": [{ "filename": "sounds/l1.wav" }, { "filename": "sounds/l2.wav" }],
    "next": [{ "filename": "sounds/next.wav" }]
}]"#;

#[test]
fn wrapped_array_form_parses() {
    let catalog = SoundCatalog::from_json_str(WRAPPED).unwrap();
    assert_eq!(catalog.candidates(CueKind::Letter).len(), 2);
    assert_eq!(catalog.background().unwrap().filename, "sounds/music.wav");
}

#[test]
fn bare_object_form_parses() {
    let raw = r#"{
        "music": [{ "filename": "m.wav" }],
        "letter": [{ "filename": "l.wav" }],
        "next": [{ "filename": "n.wav" }]
    }"#;
    let catalog = SoundCatalog::from_json_str(raw).unwrap();
    assert_eq!(catalog.candidates(CueKind::Next)[0].filename, "n.wav");
}

#[test]
fn missing_kind_is_a_config_error() {
    let raw = r#"[{ "music": [{ "filename": "m.wav" }], "letter": [{ "filename": "l.wav" }] }]"#;
    let err = SoundCatalog::from_json_str(raw).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("'next'"));
}

#[test]
fn empty_array_is_rejected() {
    assert!(SoundCatalog::from_json_str("[]").unwrap_err().is_config());
    assert!(matches!(
        SoundCatalog::from_json_str("not json").unwrap_err(),
        SlidecastError::Serde(_)
    ));
}

#[test]
fn filenames_resolve_against_root() {
    let asset = SoundAsset {
        filename: "sounds/a.wav".to_string(),
    };
    assert_eq!(
        asset.resolve(Path::new("/data")),
        PathBuf::from("/data/sounds/a.wav")
    );

    let abs = SoundAsset {
        filename: "/abs/a.wav".to_string(),
    };
    assert_eq!(abs.resolve(Path::new("/data")), PathBuf::from("/abs/a.wav"));
}
