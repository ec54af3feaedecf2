//! End-to-end localisation on a procedural atlas.

mod common;

use std::sync::Arc;

use atlas_locate_core::{PixelRect, RgbImage};
use atlas_locate_match::{LocateError, Locator, LocatorParams, MatchOutcome, ReferenceAtlas};
use common::*;

fn locator_with(params: LocatorParams) -> Locator {
    let atlas = Arc::new(ReferenceAtlas::new(atlas_image()));
    Locator::new(atlas, params).expect("valid locator")
}

fn locator() -> Locator {
    locator_with(params())
}

const POSITIVES: [(usize, usize); 5] = [(10, 5), (100, 60), (57, 33), (120, 10), (70, 78)];

#[test]
fn indicator_windows_are_found_at_their_centre() {
    let locator = locator();
    let atlas = atlas_image();
    for tl in POSITIVES {
        let frame = positive_frame(&atlas, tl);
        let res = locator.find_position(&frame.view()).expect("locate");
        assert_eq!(res.outcome, MatchOutcome::Successful, "{tl:?}: {res:?}");
        let pos = res.position.expect("successful match has a position");
        let (ex, ey) = (tl.0 + REGION.width / 2, tl.1 + REGION.height / 2);
        assert!(pos.x.abs_diff(ex) <= 2 && pos.y.abs_diff(ey) <= 2, "{tl:?} -> {pos:?}");
        assert!(res.score >= 0.75, "{tl:?}: score {}", res.score);
        assert!(res.distinctiveness > 150.0, "{tl:?}: {}", res.distinctiveness);
    }
}

#[test]
fn atlas_copy_without_indicator_is_ambiguous() {
    let locator = locator();
    let atlas = atlas_image();
    for tl in POSITIVES {
        let region = atlas
            .view()
            .crop(&PixelRect::new(tl.0, tl.1, REGION.width, REGION.height))
            .expect("crop");
        let res = locator.find_position(&frame_with(&region).view()).expect("locate");
        assert_eq!(res.outcome, MatchOutcome::Ambiguous, "{tl:?}: {res:?}");
        assert_eq!((res.top_left.x, res.top_left.y), tl);
        assert!(res.position.is_none());
    }
}

#[test]
fn unrelated_content_fails() {
    let locator = locator();
    for seed in [1, 2, 3, 99] {
        let mut region = textured(REGION.width, REGION.height, seed);
        draw_indicator(&mut region);
        let res = locator.find_position(&frame_with(&region).view()).expect("locate");
        assert_eq!(res.outcome, MatchOutcome::Failed, "seed {seed}: {res:?}");
        assert!(res.position.is_none());
    }
}

#[test]
fn indicator_over_open_water_fails() {
    let locator = locator();
    let mut region = atlas_image()
        .view()
        .crop(&PixelRect::new(4, 80, REGION.width, REGION.height))
        .expect("crop");
    draw_indicator(&mut region);
    let res = locator.find_position(&frame_with(&region).view()).expect("locate");
    assert_eq!(res.outcome, MatchOutcome::Failed, "{res:?}");
}

#[test]
fn blank_capture_fails_with_zero_score() {
    let locator = locator();
    let frame = RgbImage::filled(FRAME_W, FRAME_H, [12, 12, 12]);
    let res = locator.find_position(&frame.view()).expect("locate");
    assert_eq!(res.outcome, MatchOutcome::Failed);
    assert_eq!(res.score, 0.0);
    assert_eq!(res.distinctiveness, 0.0);
}

#[test]
fn batch_preserves_input_order() {
    let locator = locator();
    let atlas = atlas_image();
    let frames: Vec<RgbImage> = POSITIVES
        .iter()
        .map(|&tl| positive_frame(&atlas, tl))
        .chain(std::iter::once(RgbImage::filled(FRAME_W, FRAME_H, [0, 0, 0])))
        .chain(std::iter::once(RgbImage::filled(10, 10, [0, 0, 0])))
        .collect();
    let views: Vec<_> = frames.iter().map(|f| f.view()).collect();

    let batch = locator.find_positions(&views);
    assert_eq!(batch.len(), views.len());
    for (view, got) in views.iter().zip(&batch) {
        assert_eq!(got, &locator.find_position(view));
    }
    assert!(matches!(
        batch.last(),
        Some(Err(LocateError::FrameTooSmall { .. }))
    ));
}

#[test]
fn one_locator_serves_many_threads() {
    let locator = locator();
    let atlas = atlas_image();
    let frames: Vec<RgbImage> = POSITIVES.iter().map(|&tl| positive_frame(&atlas, tl)).collect();

    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = frames
            .iter()
            .map(|f| {
                let locator = &locator;
                s.spawn(move || locator.find_position(&f.view()))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect()
    });

    for (tl, res) in POSITIVES.iter().zip(results) {
        let res = res.expect("locate");
        assert!(res.is_successful());
        assert_eq!((res.top_left.x, res.top_left.y), *tl);
    }
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_and_sequential_search_agree() {
    use atlas_locate_match::SearchParams;

    let atlas = atlas_image();
    let sequential = locator();
    let parallel = locator_with(LocatorParams {
        search: SearchParams {
            parallel: true,
            ..SearchParams::default()
        },
        ..params()
    });
    for tl in POSITIVES {
        let frame = positive_frame(&atlas, tl);
        assert_eq!(
            sequential.find_position(&frame.view()),
            parallel.find_position(&frame.view())
        );
    }
}

#[test]
fn region_larger_than_atlas_is_rejected() {
    let atlas = Arc::new(ReferenceAtlas::new(RgbImage::filled(30, 30, [1, 2, 3])));
    let err = Locator::new(atlas, params()).unwrap_err();
    assert!(matches!(err, LocateError::OutOfBounds { .. }), "{err:?}");
}

#[test]
fn frame_smaller_than_region_rect_is_rejected() {
    let locator = locator();
    let frame = RgbImage::filled(REGION.x + REGION.width - 1, FRAME_H, [0, 0, 0]);
    let err = locator.find_position(&frame.view()).unwrap_err();
    assert!(matches!(err, LocateError::FrameTooSmall { .. }), "{err:?}");
}
