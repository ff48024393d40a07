use super::*;

/// Every character is 10px wide; lines containing 'y' are taller.
struct Mono {
    calls: Vec<String>,
}

impl TextMetrics for Mono {
    fn measure(&mut self, text: &str) -> SlidecastResult<TextSize> {
        self.calls.push(text.to_string());
        Ok(TextSize {
            width: text.chars().count() as f32 * 10.0,
            height: if text.contains('y') { 14.0 } else { 12.0 },
        })
    }
}

fn mono() -> Mono {
    Mono { calls: Vec::new() }
}

#[test]
fn short_text_stays_on_one_line() {
    let wrapped = wrap_words("hello world", 800.0, &mut mono()).unwrap();
    assert_eq!(wrapped.lines, vec!["hello world".to_string()]);
    assert_eq!(wrapped.line_height, 12.0);
}

#[test]
fn crossing_word_stays_on_the_closed_line() {
    // "aaaa bbbb" is 90px >= 80px, so the line closes after "bbbb".
    let wrapped = wrap_words("aaaa bbbb cc", 80.0, &mut mono()).unwrap();
    assert_eq!(
        wrapped.lines,
        vec!["aaaa bbbb".to_string(), "cc".to_string()]
    );
}

#[test]
fn exact_threshold_closes_the_line() {
    let wrapped = wrap_words("abcd efg hi", 80.0, &mut mono()).unwrap();
    assert_eq!(wrapped.lines, vec!["abcd efg".to_string(), "hi".to_string()]);
}

#[test]
fn closing_on_last_word_leaves_an_empty_tail_line() {
    let wrapped = wrap_words("abcdefghij", 50.0, &mut mono()).unwrap();
    assert_eq!(wrapped.lines, vec!["abcdefghij".to_string(), String::new()]);
}

#[test]
fn line_height_is_the_tallest_measurement() {
    let mut metrics = mono();
    let wrapped = wrap_words("ab yy cd", 1000.0, &mut metrics).unwrap();
    assert_eq!(wrapped.line_height, 14.0);
    assert_eq!(metrics.calls, vec!["ab", "ab yy", "ab yy cd"]);
}

#[test]
fn empty_text_wraps_to_one_empty_line() {
    let wrapped = wrap_words("", 800.0, &mut mono()).unwrap();
    assert_eq!(wrapped.lines, vec![String::new()]);
}

#[test]
fn engine_rejects_bad_size_and_bad_font() {
    assert!(TextLayoutEngine::new(Vec::new(), 0.0, TextBrushRgba8::default()).is_err());
    assert!(TextLayoutEngine::new(b"not a font".to_vec(), 40.0, TextBrushRgba8::default()).is_err());
}
