mod common;

use common::{sprite_frame, uniform_frame, GREEN, RED};
use spritemend_core::frame::RawPixelBuffer;
use spritemend_core::verify::verify_frames;

#[test]
fn test_uniform_similar_sequence_passes() {
    let frames = vec![
        sprite_frame(20, 20, (4, 4, 10, 10), RED),
        sprite_frame(20, 20, (4, 4, 10, 10), RED),
        sprite_frame(20, 20, (4, 5, 10, 10), RED),
    ];
    let verification = verify_frames(&frames, 0.1).unwrap();
    assert!(verification.passed);
    assert!(verification.issues.is_empty());
}

#[test]
fn test_mismatched_dimensions_reported() {
    let frames = vec![RawPixelBuffer::blank(20, 20), RawPixelBuffer::blank(22, 20)];
    let verification = verify_frames(&frames, 0.1).unwrap();
    assert!(!verification.passed);
    assert!(verification.issues[0].contains("not uniform"));
}

#[test]
fn test_large_sampled_variance_reported() {
    // First and last frames match; the middle sample is a different color,
    // so both sampled pairs differ on every content pixel.
    let frames = vec![
        uniform_frame(10, 10, 200),
        uniform_frame(10, 10, 200),
        sprite_frame(10, 10, (0, 0, 10, 10), GREEN),
        uniform_frame(10, 10, 200),
        uniform_frame(10, 10, 200),
    ];
    let verification = verify_frames(&frames, 0.1).unwrap();
    assert!(!verification.passed);
    assert_eq!(verification.issues.len(), 2);
    assert!(verification.issues[0].contains("large variance"));
}

#[test]
fn test_two_frame_sequences_skip_sampling() {
    // Wildly different but only two frames: nothing is sampled.
    let frames = vec![uniform_frame(10, 10, 0), uniform_frame(10, 10, 255)];
    let verification = verify_frames(&frames, 0.1).unwrap();
    assert!(verification.passed);
}
