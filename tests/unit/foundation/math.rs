use super::*;

#[test]
fn mul_div255_endpoints() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(200, 0), 0);
}

#[test]
fn db_to_gain_matches_amplitude_ratio() {
    assert!((db_to_gain(0.0) - 1.0).abs() < 1e-6);
    assert!((db_to_gain(-6.0) - 0.501_187).abs() < 1e-4);
    assert!((db_to_gain(-7.0) - 0.446_684).abs() < 1e-4);
}
