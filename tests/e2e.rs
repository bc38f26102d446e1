mod common;

use common::synthetic_image::{gradient_grid, tamper_block, Block};
use tamper_detector::{detect_tampering, AnalyzerParams, DetectOptions, TamperAnalyzer};

#[test]
fn tampered_block_is_localized_exactly() {
    let original = gradient_grid(64, 48, 1);
    let block = Block {
        x: 10,
        y: 12,
        w: 16,
        h: 8,
    };
    let tampered = tamper_block(&original, block);

    let detection =
        detect_tampering(&original, &tampered, &DetectOptions::default()).expect("same shape");

    let expected = 100.0 * block.area() as f32 / (64.0 * 48.0);
    assert!(
        (detection.percentage - expected).abs() < 1e-4,
        "percentage {} expected {expected}",
        detection.percentage
    );
    for y in 0..48 {
        for x in 0..64 {
            assert_eq!(
                detection.mask.get(x, y),
                block.contains(x, y),
                "mask mismatch at ({x},{y})"
            );
        }
    }
}

#[test]
fn detection_percentage_is_symmetric_end_to_end() {
    let original = gradient_grid(40, 40, 3);
    let tampered = tamper_block(
        &original,
        Block {
            x: 6,
            y: 20,
            w: 9,
            h: 7,
        },
    );
    let opts = DetectOptions::default();
    let forward = detect_tampering(&original, &tampered, &opts).expect("same shape");
    let backward = detect_tampering(&tampered, &original, &opts).expect("same shape");
    assert_eq!(forward.percentage, backward.percentage);
}

#[test]
fn full_analysis_of_a_tampered_pair() {
    let original = gradient_grid(64, 48, 1);
    let block = Block {
        x: 18,
        y: 10,
        w: 12,
        h: 12,
    };
    let tampered = tamper_block(&original, block);

    let analyzer = TamperAnalyzer::new(AnalyzerParams::default());
    let report = analyzer.analyze(&original, &tampered).expect("same shape");

    assert!(report.percentage > 0.0);
    let distance = report.lbp_distance.expect("lbp stage enabled by default");
    assert!(
        distance > 0.0,
        "a flat splat must disturb the texture histogram"
    );

    // Pixels the detector did not flag pass through bit-identical.
    for y in 0..48 {
        for x in 0..64 {
            if !report.mask.get(x, y) {
                assert_eq!(
                    report.recovered.sample(x, y, 0).to_bits(),
                    tampered.sample(x, y, 0).to_bits(),
                    "unflagged pixel ({x},{y}) was altered"
                );
            }
        }
    }

    // The reconstruction moves flagged pixels back toward the original.
    let mut err_sum = 0.0f32;
    for y in block.y..block.y + block.h {
        for x in block.x..block.x + block.w {
            err_sum += (report.recovered.sample(x, y, 0) - original.sample(x, y, 0)).abs();
        }
    }
    let mean_err = err_sum / block.area() as f32;
    assert!(
        mean_err < 0.1,
        "mean reconstruction error {mean_err} too large"
    );

    use tamper_detector::recover::AppliedMethod;
    assert!(report
        .patches
        .iter()
        .any(|p| p.method == AppliedMethod::Untouched));
    assert!(report
        .patches
        .iter()
        .any(|p| p.method != AppliedMethod::Untouched));
}

#[test]
fn color_pairs_are_supported() {
    let original = gradient_grid(32, 32, 3);
    let block = Block {
        x: 4,
        y: 4,
        w: 8,
        h: 8,
    };
    let tampered = tamper_block(&original, block);
    let detection =
        detect_tampering(&original, &tampered, &DetectOptions::default()).expect("same shape");
    let expected = 100.0 * block.area() as f32 / (32.0 * 32.0);
    assert!((detection.percentage - expected).abs() < 1e-4);
}
