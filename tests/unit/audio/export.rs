use super::*;

#[test]
fn f32le_bytes_are_little_endian() {
    let bytes = f32le_bytes(&[1.0, -0.5]);
    assert_eq!(bytes.len(), 8);
    assert_eq!(&bytes[0..4], &1.0f32.to_le_bytes());
    assert_eq!(&bytes[4..8], &(-0.5f32).to_le_bytes());
}

#[test]
fn exports_wav_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tone.wav");
    let buffer = AudioBuffer::new(48_000, 2, vec![0.1; 48_000 * 2 / 10]).unwrap();
    export_compressed(&buffer, &out).unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 44);
}
