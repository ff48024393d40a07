use super::*;
use std::sync::Arc;

fn solid(width: u32, height: u32, rgb: [u8; 3]) -> PreparedImage {
    PreparedImage {
        width,
        height,
        rgb8: Arc::new(rgb.repeat((width * height) as usize)),
    }
}

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

#[test]
fn origin_centers_on_half_width_and_third_height() {
    assert_eq!(image_origin(canvas(1280, 720), 400, 300), (440, 90));
    assert_eq!(image_origin(canvas(10, 9), 3, 2), (3, 2));
    // Wider than the canvas: negative origin, clipped on draw.
    assert_eq!(image_origin(canvas(10, 6), 13, 2), (-2, 1));
}

#[test]
fn hidden_columns_floor_and_clamp() {
    assert_eq!(hidden_columns(1.0, 100), 100);
    assert_eq!(hidden_columns(0.555, 100), 55);
    assert_eq!(hidden_columns(0.0, 100), 0);
    assert_eq!(hidden_columns(-3.0, 100), 0);
}

#[test]
fn blit_skips_hidden_columns() {
    let mut frame = Frame::black(canvas(6, 2));
    let img = solid(4, 1, [9, 8, 7]);
    blit_rgb(&mut frame, &img, 1, 1, 2);

    assert_eq!(frame.pixel(1, 1), Some([0, 0, 0]));
    assert_eq!(frame.pixel(2, 1), Some([0, 0, 0]));
    assert_eq!(frame.pixel(3, 1), Some([9, 8, 7]));
    assert_eq!(frame.pixel(4, 1), Some([9, 8, 7]));
    assert_eq!(frame.pixel(5, 1), Some([0, 0, 0]));
    assert_eq!(frame.pixel(3, 0), Some([0, 0, 0]));
}

#[test]
fn blit_clips_every_edge() {
    let mut frame = Frame::black(canvas(4, 4));
    let img = solid(6, 6, [200, 100, 50]);
    blit_rgb(&mut frame, &img, -1, -1, 0);
    assert!(frame.data.chunks_exact(3).all(|p| p == [200, 100, 50]));

    let mut frame = Frame::black(canvas(4, 4));
    blit_rgb(&mut frame, &img, 10, 10, 0);
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn fully_hidden_image_draws_nothing() {
    let mut frame = Frame::black(canvas(4, 4));
    let img = solid(2, 2, [1, 1, 1]);
    blit_rgb(&mut frame, &img, 1, 1, hidden_columns(1.0, 2));
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn premul_over_blends_and_keeps_transparent_pixels() {
    let mut frame = Frame::black(canvas(2, 1));
    frame.data.copy_from_slice(&[100, 100, 100, 40, 50, 60]);

    // Pixel 0: half-transparent white (premultiplied). Pixel 1: fully transparent.
    let layer = [128u8, 128, 128, 128, 0, 0, 0, 0];
    over_premul_onto_rgb(&mut frame, &layer).unwrap();

    assert_eq!(frame.pixel(0, 0), Some([178, 178, 178]));
    assert_eq!(frame.pixel(1, 0), Some([40, 50, 60]));
}

#[test]
fn premul_over_rejects_size_mismatch() {
    let mut frame = Frame::black(canvas(2, 1));
    assert!(over_premul_onto_rgb(&mut frame, &[0u8; 4]).is_err());
}

#[test]
fn null_compositor_leaves_frames_alone() {
    let mut frame = Frame::black(canvas(2, 2));
    let mut c = NullCompositor;
    c.draw_image(&mut frame, ImageKey::Terminal, 0.0).unwrap();
    c.draw_caption(&mut frame, "hi").unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
}
