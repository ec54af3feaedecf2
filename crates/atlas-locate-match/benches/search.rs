use std::sync::Arc;

use atlas_locate_core::{PixelRect, RgbImage};
use atlas_locate_match::{
    Locator, LocatorParams, MatchSearcher, ReferenceAtlas, SearchParams,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn make_atlas(width: usize, height: usize, seed: u32) -> RgbImage {
    let mut state = seed;
    let mut img = RgbImage::filled(width, height, [0, 0, 0]);
    for y in 0..height {
        for x in 0..width {
            let mut rgb = [0u8; 3];
            for c in &mut rgb {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                *c = (state >> 24) as u8;
            }
            img.put_pixel(x, y, rgb);
        }
    }
    img
}

fn bench_search(c: &mut Criterion) {
    let atlas = ReferenceAtlas::new(make_atlas(512, 512, 11));
    let region = atlas.sub_region(200, 150, 64, 64).expect("window");
    let gray = region.view().to_gray();

    for parallel in [false, true] {
        let searcher = MatchSearcher::new(SearchParams {
            parallel,
            ..SearchParams::default()
        });
        let name = format!("ncc_512x512_region64_parallel_{parallel}");
        c.bench_function(&name, |b| {
            b.iter(|| {
                let m = searcher
                    .search(black_box(&gray.view()), black_box(&atlas))
                    .expect("search");
                black_box(m.score)
            })
        });
    }
}

fn bench_locate(c: &mut Criterion) {
    let atlas = Arc::new(ReferenceAtlas::new(make_atlas(384, 384, 5)));
    let rect = PixelRect::new(40, 20, 48, 48);
    let locator = Locator::new(atlas.clone(), LocatorParams::for_region(rect)).expect("locator");

    let mut frame = make_atlas(160, 120, 3);
    let window = atlas.sub_region(100, 90, 48, 48).expect("window");
    frame.blit(&window.view(), rect.x, rect.y);

    c.bench_function("locate_384x384_region48", |b| {
        b.iter(|| {
            let res = locator.find_position(black_box(&frame.view())).expect("locate");
            black_box(res.outcome)
        })
    });
}

criterion_group!(search, bench_search, bench_locate);
criterion_main!(search);
