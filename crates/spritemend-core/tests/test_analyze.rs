mod common;

use approx::assert_relative_eq;

use common::{fill_rect, red_buckets, sprite_frame, RED};
use spritemend_core::analyze::{analyze_frame, BucketConfig, BucketPredicate, BucketRule};
use spritemend_core::frame::RawPixelBuffer;

#[test]
fn test_bucket_counts_and_alpha_ratios() {
    // 4x4 canvas, 8 red opaque pixels, 8 transparent.
    let frame = sprite_frame(4, 4, (0, 0, 4, 2), RED);
    let analysis = analyze_frame(0, &frame, &red_buckets(false));

    assert_eq!(analysis.bucket_counts["body"], 8);
    assert_eq!(analysis.bucket_counts["other"], 0);
    assert_relative_eq!(analysis.alpha_ratios.opaque, 0.5);
    assert_relative_eq!(analysis.alpha_ratios.semi_transparent, 0.0);
    assert_relative_eq!(analysis.alpha_ratios.transparent, 0.5);
}

#[test]
fn test_first_matching_rule_wins() {
    let buckets = BucketConfig {
        rules: vec![
            BucketRule {
                label: "warm".into(),
                predicate: BucketPredicate::RgbRange {
                    r: [100, 255],
                    g: [0, 255],
                    b: [0, 255],
                },
            },
            BucketRule {
                label: "red".into(),
                predicate: BucketPredicate::RgbRange {
                    r: [180, 255],
                    g: [0, 80],
                    b: [0, 80],
                },
            },
        ],
        primary: None,
    };

    // Every red pixel also matches "warm", which is listed first.
    let frame = sprite_frame(4, 4, (0, 0, 4, 4), RED);
    let analysis = analyze_frame(0, &frame, &buckets);
    assert_eq!(analysis.bucket_counts["warm"], 16);
    assert_eq!(analysis.bucket_counts["red"], 0);
}

#[test]
fn test_unmatched_pixels_fall_into_other() {
    let frame = sprite_frame(4, 4, (0, 0, 4, 4), [10, 10, 200, 255]);
    let analysis = analyze_frame(0, &frame, &red_buckets(false));
    assert_eq!(analysis.bucket_counts["body"], 0);
    assert_eq!(analysis.bucket_counts["other"], 16);
}

#[test]
fn test_semi_transparent_pixels_skip_classification() {
    // Alpha 100 is below the classification gate but counts as
    // semi-transparent; alpha 200 is classified and semi-transparent.
    let mut frame = RawPixelBuffer::blank(2, 1);
    fill_rect(&mut frame, 0, 0, 1, 1, [220, 30, 30, 100]);
    fill_rect(&mut frame, 1, 0, 1, 1, [220, 30, 30, 200]);

    let analysis = analyze_frame(0, &frame, &red_buckets(false));
    assert_eq!(analysis.bucket_counts["body"], 1);
    assert_relative_eq!(analysis.alpha_ratios.semi_transparent, 1.0);
    assert_relative_eq!(analysis.alpha_ratios.opaque, 0.0);
}

#[test]
fn test_bucket_config_validation() {
    let dup = BucketConfig {
        rules: vec![
            BucketRule {
                label: "body".into(),
                predicate: BucketPredicate::NearGray { max_spread: 10 },
            },
            BucketRule {
                label: "body".into(),
                predicate: BucketPredicate::NearGray { max_spread: 20 },
            },
        ],
        primary: None,
    };
    assert!(dup.validate().is_err());

    let reserved = BucketConfig {
        rules: vec![BucketRule {
            label: "other".into(),
            predicate: BucketPredicate::NearGray { max_spread: 10 },
        }],
        primary: None,
    };
    assert!(reserved.validate().is_err());

    let dangling_primary = BucketConfig {
        rules: vec![],
        primary: Some("body".into()),
    };
    assert!(dangling_primary.validate().is_err());

    assert!(red_buckets(true).validate().is_ok());
}
