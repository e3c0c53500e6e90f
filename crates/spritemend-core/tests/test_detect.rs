mod common;

use std::collections::{BTreeMap, BTreeSet};

use common::{red_buckets, run_frame, sprite_frame, uniform_frame, RED};
use spritemend_core::analyze::{analyze_frames, AlphaRatios, FrameAnalysis};
use spritemend_core::detect::{
    alpha, histogram, merge_anomalies, pixel_diff, run_detection, ssim, Anomaly, AnomalyKind,
    AnomalyMap, DetectionConfig, Severity,
};
use spritemend_core::frame::RawPixelBuffer;
use spritemend_core::stats::aggregate;

fn alpha_analysis(index: usize, opaque: f64, semi: f64) -> FrameAnalysis {
    FrameAnalysis {
        index,
        bucket_counts: BTreeMap::new(),
        alpha_ratios: AlphaRatios {
            opaque,
            semi_transparent: semi,
            transparent: 1.0 - opaque - semi,
        },
    }
}

#[test]
fn test_histogram_flags_collapsed_bucket_as_severe() {
    // Five frames, primary block 12x12 = 144 px; frame 2 keeps only 14 px.
    let mut frames: Vec<RawPixelBuffer> = (0..5)
        .map(|_| sprite_frame(20, 20, (4, 4, 12, 12), RED))
        .collect();
    frames[2] = sprite_frame(20, 20, (4, 4, 14, 1), RED);

    let buckets = red_buckets(false);
    let analyses = analyze_frames(&frames, &buckets);
    let stats = aggregate(&analyses);
    let map = histogram::detect(&analyses, &stats, None, &DetectionConfig::default());

    assert_eq!(map.len(), 1);
    let reasons = &map[&2];
    assert_eq!(reasons.len(), 1);
    assert_eq!(reasons[0].severity, Severity::Severe);
    match &reasons[0].kind {
        AnomalyKind::ColorLoss { bucket, ratio } => {
            assert_eq!(bucket, "body");
            assert!(*ratio < 0.2, "ratio {ratio} should be deep loss");
        }
        other => panic!("expected color_loss, got {other:?}"),
    }
}

#[test]
fn test_histogram_primary_bucket_gets_specific_type() {
    let mut frames: Vec<RawPixelBuffer> = (0..5)
        .map(|_| sprite_frame(20, 20, (4, 4, 12, 12), RED))
        .collect();
    frames[2] = sprite_frame(20, 20, (4, 4, 14, 1), RED);

    let buckets = red_buckets(true);
    let analyses = analyze_frames(&frames, &buckets);
    let stats = aggregate(&analyses);
    let map = histogram::detect(
        &analyses,
        &stats,
        buckets.primary.as_deref(),
        &DetectionConfig::default(),
    );

    let reasons = &map[&2];
    // The specific type replaces the generic one; no duplicate per bucket.
    assert_eq!(reasons.len(), 1);
    assert!(matches!(
        reasons[0].kind,
        AnomalyKind::PrimaryColorLoss { .. }
    ));
}

#[test]
fn test_histogram_skips_sparse_buckets() {
    // Median presence 16 px is below the floor of 50: never checked.
    let mut frames: Vec<RawPixelBuffer> = (0..5)
        .map(|_| sprite_frame(20, 20, (0, 0, 4, 4), RED))
        .collect();
    frames[2] = RawPixelBuffer::blank(20, 20);

    let buckets = red_buckets(false);
    let analyses = analyze_frames(&frames, &buckets);
    let stats = aggregate(&analyses);
    let map = histogram::detect(&analyses, &stats, None, &DetectionConfig::default());
    assert!(map.is_empty());
}

#[test]
fn test_alpha_transparency_hole_severe() {
    let mut analyses: Vec<FrameAnalysis> =
        (0..8).map(|i| alpha_analysis(i, 0.8, 0.02)).collect();
    analyses[4] = alpha_analysis(4, 0.1, 0.02);

    let stats = aggregate(&analyses);
    let map = alpha::detect(&analyses, &stats, &DetectionConfig::default());

    assert_eq!(map.len(), 1);
    let reasons = &map[&4];
    assert_eq!(reasons[0].severity, Severity::Severe);
    assert!(matches!(
        reasons[0].kind,
        AnomalyKind::TransparencyHole { .. }
    ));
}

#[test]
fn test_alpha_extra_opacity() {
    let mut analyses: Vec<FrameAnalysis> =
        (0..8).map(|i| alpha_analysis(i, 0.5, 0.02)).collect();
    analyses[3] = alpha_analysis(3, 0.9, 0.02);

    let stats = aggregate(&analyses);
    let map = alpha::detect(&analyses, &stats, &DetectionConfig::default());

    let reasons = &map[&3];
    assert!(matches!(reasons[0].kind, AnomalyKind::ExtraOpacity { .. }));
}

#[test]
fn test_alpha_halo_margins() {
    // With 12 frames and two outliers, Q3 of the semi ratios stays at the
    // 0.05 baseline. 0.2 exceeds it by the severe margin exactly (still
    // moderate), 0.3 goes beyond it.
    let mut analyses: Vec<FrameAnalysis> =
        (0..12).map(|i| alpha_analysis(i, 0.5, 0.05)).collect();
    analyses[2] = alpha_analysis(2, 0.5, 0.2);
    analyses[6] = alpha_analysis(6, 0.5, 0.3);

    let stats = aggregate(&analyses);
    let map = alpha::detect(&analyses, &stats, &DetectionConfig::default());

    assert_eq!(map[&2][0].severity, Severity::Moderate);
    assert!(matches!(map[&2][0].kind, AnomalyKind::HaloEffect { .. }));
    assert_eq!(map[&6][0].severity, Severity::Severe);
}

#[test]
fn test_ssim_double_confirmation_flags_damaged_frame() {
    // Ten uniform light frames; frame 3 is uniform dark, so both of its
    // adjacent scores collapse while every other pair scores 1.0.
    let mut frames: Vec<RawPixelBuffer> = (0..10).map(|_| uniform_frame(16, 16, 200)).collect();
    frames[3] = uniform_frame(16, 16, 30);

    let map = ssim::detect(&frames, &DetectionConfig::default());
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3]);
    assert_eq!(map[&3][0].severity, Severity::Severe);
    assert!(matches!(
        map[&3][0].kind,
        AnomalyKind::StructuralDamage { .. }
    ));
}

#[test]
fn test_ssim_single_low_score_is_not_flagged() {
    // A hard scene change: one adjacent pair scores low, but no frame has
    // BOTH adjacent scores below the floor. Double confirmation holds.
    let mut frames: Vec<RawPixelBuffer> = (0..10).map(|_| uniform_frame(16, 16, 200)).collect();
    for frame in frames.iter_mut().skip(5) {
        *frame = uniform_frame(16, 16, 30);
    }

    let map = ssim::detect(&frames, &DetectionConfig::default());
    assert!(map.is_empty(), "scene cut must not be structural damage");
}

#[test]
fn test_ssim_relative_outlier_above_absolute_floor_not_flagged() {
    // Frame 5 dips both adjacent scores below the strict relative floor,
    // but the dip stays above the absolute SSIM threshold.
    let mut frames: Vec<RawPixelBuffer> = (0..10).map(|_| uniform_frame(16, 16, 200)).collect();
    frames[5] = uniform_frame(16, 16, 160);

    let map = ssim::detect(&frames, &DetectionConfig::default());
    assert!(map.is_empty());
}

#[test]
fn test_ssim_identical_frames_score_one() {
    let a = uniform_frame(8, 8, 120);
    let lum = a.luminance();
    let score = ssim::ssim_score(&a, &a, &lum, &lum);
    assert!((score - 1.0).abs() < 1e-12);
}

#[test]
fn test_ssim_blank_frames_score_one() {
    let a = RawPixelBuffer::blank(8, 8);
    let lum = a.luminance();
    assert_eq!(ssim::ssim_score(&a, &a, &lum, &lum), 1.0);
}

#[test]
fn test_pixel_diff_outlier_double_confirmation() {
    // Run lengths tuned so normal adjacent diffs are 10 px (ratio 0.1) and
    // frame 4's two diffs are 35 px (0.35). Bound = 2.5 * 0.1 = 0.25.
    let lens = [50usize, 40, 50, 40, 75, 40, 50, 40];
    let frames: Vec<RawPixelBuffer> = lens
        .iter()
        .map(|&len| run_frame(10, 10, len, RED))
        .collect();

    let map = pixel_diff::detect(&frames, &BTreeSet::new(), &DetectionConfig::default()).unwrap();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![4]);
    assert_eq!(map[&4][0].severity, Severity::Moderate);
    match map[&4][0].kind {
        AnomalyKind::PixelOutlier {
            mean_adjacent_diff, ..
        } => assert!(mean_adjacent_diff > 0.3),
        ref other => panic!("expected pixel_outlier, got {other:?}"),
    }
}

#[test]
fn test_pixel_diff_outlier_defers_to_structural_pass() {
    let lens = [50usize, 40, 50, 40, 75, 40, 50, 40];
    let frames: Vec<RawPixelBuffer> = lens
        .iter()
        .map(|&len| run_frame(10, 10, len, RED))
        .collect();

    let structural: BTreeSet<usize> = [4].into_iter().collect();
    let map = pixel_diff::detect(&frames, &structural, &DetectionConfig::default()).unwrap();
    assert!(map.is_empty());
}

#[test]
fn test_merge_is_additive() {
    let mut a = AnomalyMap::new();
    a.entry(2).or_default().push(Anomaly {
        severity: Severity::Moderate,
        kind: AnomalyKind::ColorLoss {
            bucket: "body".into(),
            ratio: 0.3,
        },
    });
    let mut b = AnomalyMap::new();
    b.entry(2).or_default().push(Anomaly {
        severity: Severity::Severe,
        kind: AnomalyKind::TransparencyHole {
            opaque_ratio: 0.1,
            lower_bound: 0.5,
        },
    });
    b.entry(5).or_default().push(Anomaly {
        severity: Severity::Moderate,
        kind: AnomalyKind::HaloEffect {
            semi_transparent_ratio: 0.2,
            q3: 0.05,
        },
    });

    let merged = merge_anomalies([a, b]);
    assert_eq!(merged[&2].len(), 2);
    assert_eq!(merged[&5].len(), 1);
}

#[test]
fn test_detection_skips_short_sequences() {
    let frames = vec![
        sprite_frame(10, 10, (0, 0, 5, 5), RED),
        RawPixelBuffer::blank(10, 10),
    ];
    let buckets = red_buckets(false);
    let analyses = analyze_frames(&frames, &buckets);
    let stats = aggregate(&analyses);
    let map = run_detection(&frames, &analyses, &stats, None, &DetectionConfig::default()).unwrap();
    assert!(map.is_empty());
}

#[test]
fn test_detection_normalizes_mixed_dimensions() {
    // Frames of different sizes must not abort the adjacent-pair passes.
    let mut frames: Vec<RawPixelBuffer> = (0..6)
        .map(|_| sprite_frame(20, 20, (4, 4, 12, 12), RED))
        .collect();
    frames[1] = sprite_frame(24, 18, (4, 4, 12, 12), RED);

    let buckets = red_buckets(false);
    let analyses = analyze_frames(&frames, &buckets);
    let stats = aggregate(&analyses);
    assert!(run_detection(&frames, &analyses, &stats, None, &DetectionConfig::default()).is_ok());
}
