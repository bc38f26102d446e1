mod common;

use common::synthetic_image::{gradient_grid, tamper_block, Block};
use tamper_detector::image::PixelGrid;
use tamper_detector::recover::{AppliedMethod, Confidence};
use tamper_detector::{recover_ground_truth, RecoverOptions, RecoveryMethod};

#[test]
fn low_rank_projection_recovers_smooth_content() {
    let original = gradient_grid(32, 32, 1);
    let block = Block {
        x: 9,
        y: 9,
        w: 6,
        h: 6,
    };
    let tampered = tamper_block(&original, block);

    let options = RecoverOptions {
        // A diagonal gradient patch has rank 2; rank 3 reconstructs it.
        method: RecoveryMethod::LowRankProjection { rank: 3 },
        ..Default::default()
    };
    let recovery = recover_ground_truth(&original, &tampered, &options).expect("recoverable");

    for y in block.y..block.y + block.h {
        for x in block.x..block.x + block.w {
            let got = recovery.grid.sample(x, y, 0);
            let want = original.sample(x, y, 0);
            assert!(
                (got - want).abs() < 1e-2,
                "({x},{y}): projected {got}, original {want}"
            );
        }
    }
    assert!(recovery
        .patches
        .iter()
        .filter(|p| p.method != AppliedMethod::Untouched)
        .all(|p| p.method == AppliedMethod::LowRank && p.confidence == Confidence::Normal));
}

#[test]
fn fully_masked_image_degrades_gracefully() {
    let original = PixelGrid::from_samples(8, 8, 1, vec![0.2; 64]).expect("valid grid");
    let tampered = PixelGrid::from_samples(8, 8, 1, vec![0.9; 64]).expect("valid grid");

    let recovery = recover_ground_truth(&original, &tampered, &RecoverOptions::default())
        .expect("degrades instead of failing");

    assert_eq!(recovery.mask.count_true(), 64);
    assert_eq!(recovery.patches.len(), 1);
    assert_eq!(recovery.patches[0].method, AppliedMethod::MeanFill);
    assert_eq!(recovery.patches[0].confidence, Confidence::Low);
}

#[test]
fn recovery_shares_the_detector_view_of_the_pair() {
    // Differences below the detection threshold produce no mask, so the
    // "recovered" grid is the tampered grid untouched.
    let original = gradient_grid(16, 16, 1);
    let mut nudged = original.clone();
    for v in nudged.data.iter_mut() {
        *v = (*v + 0.02).min(1.0);
    }
    let recovery =
        recover_ground_truth(&original, &nudged, &RecoverOptions::default()).expect("same shape");
    assert_eq!(recovery.mask.count_true(), 0);
    assert_eq!(recovery.grid, nudged);
}
