use super::*;
use crate::foundation::error::SlidecastError;

#[derive(Default)]
struct Recorder {
    hidden: Vec<f64>,
}

impl Compositor for Recorder {
    fn draw_image(&mut self, _: &mut Frame, _: ImageKey, hidden: f64) -> SlidecastResult<()> {
        self.hidden.push(hidden);
        Ok(())
    }

    fn draw_caption(&mut self, _: &mut Frame, _: &str) -> SlidecastResult<()> {
        Err(SlidecastError::render("no captions during a wipe"))
    }
}

#[test]
fn hidden_fraction_decreases_linearly_and_clamps() {
    let wipe = ImageTransition::new(FrameIndex(100), 5.0);
    assert_eq!(wipe.hidden_fraction(FrameIndex(100)), 1.0);
    assert!((wipe.hidden_fraction(FrameIndex(110)) - 0.5).abs() < 1e-12);
    assert_eq!(wipe.hidden_fraction(FrameIndex(120)), 0.0);
    assert_eq!(wipe.hidden_fraction(FrameIndex(150)), 0.0);
}

#[test]
fn default_rate_finishes_on_the_twenty_first_frame() {
    let mut rec = Recorder::default();
    let mut frame = Frame::black(crate::foundation::core::Canvas {
        width: 4,
        height: 2,
    });
    let wipe = ImageTransition::new(FrameIndex(7), 5.0);

    let mut current = FrameIndex(7);
    let mut calls = 0;
    loop {
        calls += 1;
        if wipe.render(&mut rec, &mut frame, ImageKey::Slide(0), current).unwrap() {
            break;
        }
        current = current.next();
    }

    assert_eq!(calls, 21);
    assert_eq!(ImageTransition::frame_count(5.0), 21);
    assert_eq!(rec.hidden.first(), Some(&1.0));
    assert_eq!(rec.hidden.last(), Some(&0.0));
    assert!(rec.hidden.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn frame_count_handles_non_dividing_rates() {
    // 1 - 30e/100 <= 0 first at e = 4.
    assert_eq!(ImageTransition::frame_count(30.0), 5);
    assert_eq!(ImageTransition::frame_count(100.0), 2);
    assert_eq!(ImageTransition::frame_count(250.0), 2);
}
