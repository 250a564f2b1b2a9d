use stay_awake::cursor::{jitter, GlyphStack};

#[test]
fn jitter_stays_within_bounds() {
    for _ in 0..200 {
        let (dx, dy) = jitter();
        assert!(dx.abs() <= 2.5);
        assert!(dy.abs() <= 2.5);
    }
}

#[test]
fn jitter_axes_vary_independently() {
    // With 100 draws the odds of every pair matching are nil; a failure here
    // means both axes share one sample.
    let all_equal = (0..100).all(|_| {
        let (dx, dy) = jitter();
        dx == dy
    });
    assert!(!all_equal);
}

#[test]
fn glyph_activate_is_idempotent() {
    let mut glyph = GlyphStack::new();
    assert!(!glyph.is_active());
    glyph.activate();
    glyph.activate();
    assert!(glyph.is_active());
    glyph.deactivate();
    assert!(!glyph.is_active(), "one pop must undo any number of activates");
}

#[test]
fn glyph_deactivate_without_activate_is_a_no_op() {
    let mut glyph = GlyphStack::new();
    glyph.deactivate();
    glyph.deactivate();
    assert!(!glyph.is_active());
}
