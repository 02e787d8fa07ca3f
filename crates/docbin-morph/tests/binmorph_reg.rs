//! Binary morphology regression test
//!
//! Checks the ordering and idempotence laws of brick dilation, erosion,
//! opening and closing on the ink mask of a synthetic text page.
//!
//! Run with:
//! ```
//! cargo test -p docbin-morph --test binmorph_reg
//! ```

use docbin_core::BinaryImage;
use docbin_morph::{close_brick, dilate_brick, erode_brick, open_brick};
use docbin_test::{RegParams, synthetic};

/// 1.0 if every foreground pixel of `a` is foreground in `b`
fn subset(a: &BinaryImage, b: &BinaryImage) -> f64 {
    a.data()
        .iter()
        .zip(b.data())
        .all(|(&pa, &pb)| pa != 0 || pb == 0) as u8 as f64
}

#[test]
fn binmorph_reg() {
    let mut rp = RegParams::new("binmorph");

    let (_, mask) = synthetic::degraded_page_with_truth(160, 100);
    let orig_count = mask.foreground_count();
    eprintln!("Original foreground pixels: {}", orig_count);

    for size in [3, 5, 9] {
        eprintln!("=== brick {} ===", size);
        let dilated = dilate_brick(&mask, size).expect("dilate");
        let eroded = erode_brick(&mask, size).expect("erode");
        let opened = open_brick(&mask, size).expect("open");
        let closed = close_brick(&mask, size).expect("close");
        eprintln!(
            "  dilated {} eroded {} opened {} closed {}",
            dilated.foreground_count(),
            eroded.foreground_count(),
            opened.foreground_count(),
            closed.foreground_count()
        );

        // erode <= open <= orig <= close <= dilate
        rp.compare_values(1.0, subset(&eroded, &opened), 0.0);
        rp.compare_values(1.0, subset(&opened, &mask), 0.0);
        rp.compare_values(1.0, subset(&mask, &closed), 0.0);
        rp.compare_values(1.0, subset(&closed, &dilated), 0.0);

        // Opening and closing are idempotent
        let reopened = open_brick(&opened, size).expect("reopen");
        let reclosed = close_brick(&closed, size).expect("reclose");
        rp.compare_binary(&opened, &reopened);
        rp.compare_binary(&closed, &reclosed);
    }

    // Isolated specks vanish under a 3x3 opening, holes fill under closing
    let specks = BinaryImage::from_fn(30, 30, |x, y| {
        (x % 10 == 5 && y % 10 == 5) || ((10..20).contains(&x) && (10..20).contains(&y))
    })
    .expect("specks");
    let opened = open_brick(&specks, 3).expect("open specks");
    rp.compare_values(100.0, opened.foreground_count() as f64, 0.0);

    let holed = BinaryImage::from_fn(30, 30, |x, y| {
        (5..25).contains(&x) && (5..25).contains(&y) && !(x == 15 && y == 15)
    })
    .expect("holed");
    let closed = close_brick(&holed, 3).expect("close hole");
    rp.compare_values(400.0, closed.foreground_count() as f64, 0.0);

    // Degenerate sizes
    rp.compare_binary(&mask, &open_brick(&mask, 1).expect("size 1"));
    rp.compare_values(1.0, dilate_brick(&mask, 4).is_err() as u8 as f64, 0.0);
    rp.compare_values(1.0, erode_brick(&mask, 0).is_err() as u8 as f64, 0.0);

    assert!(rp.cleanup(), "binmorph regression test failed");
}
