use crate::{report, ConvertError, Mode};
use strum::{EnumCount, IntoEnumIterator};

#[test]
fn names() {
    let want = [
        (Mode::None, "none"),
        (Mode::Snes, "snes"),
        (Mode::SnesMode7, "snes_mode7"),
        (Mode::Gb, "gb"),
        (Mode::Gbc, "gbc"),
        (Mode::Gba, "gba"),
        (Mode::GbaAffine, "gba_affine"),
        (Mode::Md, "md"),
        (Mode::Pce, "pce"),
        (Mode::PceSprite, "pce_sprite"),
    ];
    assert!(want.len() == Mode::COUNT, "not all modes covered");
    for (mode, name) in want {
        assert!(mode.to_string() == name, "{mode:?} prints as {mode}");
        assert!(Mode::from_name(name) == mode, "{name} doesn't parse to {mode:?}");
    }
    assert!(Mode::from_name("nes") == Mode::None, "unknown name parsed");
    assert!(Mode::from_name("SNES") == Mode::None, "names are case sensitive");
    assert!(Mode::default() == Mode::None, "default isn't none");
}

#[test]
fn real_modes() {
    assert!(Mode::real().count() == 9, "expected 9 real modes");
    assert!(
        Mode::real().all(|m| m != Mode::None),
        "none showed up as a real mode"
    );
}

#[test]
fn default_bpp_is_allowed() {
    for mode in Mode::real() {
        assert!(
            mode.allowed_bpp(mode.default_bpp()),
            "{mode}: default bpp {} not allowed",
            mode.default_bpp()
        );
    }
}

#[test]
fn default_tile_size_is_allowed() {
    for mode in Mode::real() {
        let size = mode.default_tile_size();
        assert!(
            mode.tile_width_allowed(size) && mode.tile_height_allowed(size),
            "{mode}: default tile size {size} not allowed"
        );
    }
}

#[test]
fn allowed_bpp() {
    let want: [(Mode, &[u32]); 9] = [
        (Mode::Snes, &[2, 4, 8]),
        (Mode::SnesMode7, &[8]),
        (Mode::Gb, &[2]),
        (Mode::Gbc, &[2]),
        (Mode::Gba, &[4, 8]),
        (Mode::GbaAffine, &[8]),
        (Mode::Md, &[4]),
        (Mode::Pce, &[4]),
        (Mode::PceSprite, &[4]),
    ];
    for (mode, bpps) in want {
        for bpp in 0..=16 {
            let got = mode.allowed_bpp(bpp);
            assert!(
                got == bpps.contains(&bpp),
                "{mode}: allowed_bpp({bpp}) = {got}"
            );
        }
    }
}

#[test]
fn tile_geometry() {
    for mode in Mode::real() {
        let sizes: &[u32] = match mode {
            Mode::Snes => &[8, 16],
            Mode::PceSprite => &[16],
            _ => &[8],
        };
        for size in [0, 4, 8, 12, 16, 32] {
            assert!(
                mode.tile_width_allowed(size) == sizes.contains(&size),
                "{mode}: width {size}"
            );
            assert!(
                mode.tile_height_allowed(size) == sizes.contains(&size),
                "{mode}: height {size}"
            );
        }
    }
    assert!(Mode::PceSprite.default_tile_size() == 16, "pce_sprite tile size");
    assert!(
        Mode::real()
            .filter(|m| *m != Mode::PceSprite)
            .all(|m| m.default_tile_size() == 8),
        "8x8 tiles expected"
    );
}

#[test]
fn table_values() {
    // mode, max tiles, map size, palettes, flip, col0 shared, col0 shared for sprites
    let want = [
        (Mode::Snes, 1024, 32, 8, true, true, true),
        (Mode::SnesMode7, 256, 128, 1, false, true, true),
        (Mode::Gb, 256, 32, 1, false, false, true),
        (Mode::Gbc, 512, 32, 8, true, false, true),
        (Mode::Gba, 1024, 32, 16, true, true, true),
        (Mode::GbaAffine, 256, 32, 1, false, true, true),
        (Mode::Md, 2048, 32, 4, true, true, true),
        (Mode::Pce, 2048, 32, 16, false, true, true),
        (Mode::PceSprite, 0, 0, 16, false, true, true),
    ];
    for (mode, tiles, map, palettes, flip, col0, col0_sprite) in want {
        assert!(mode.max_tile_count() == tiles, "{mode}: max_tile_count");
        assert!(mode.default_map_size() == map, "{mode}: default_map_size");
        assert!(
            mode.default_palette_count() == palettes,
            "{mode}: default_palette_count"
        );
        assert!(mode.tile_flipping_allowed() == flip, "{mode}: flipping");
        assert!(mode.col0_is_shared() == col0, "{mode}: col0_is_shared");
        assert!(
            mode.col0_is_shared_for_sprite() == col0_sprite,
            "{mode}: col0_is_shared_for_sprite"
        );
    }
}

#[test]
fn none_is_empty() {
    let m = Mode::None;
    assert!(m.default_bpp() == 0, "default_bpp");
    assert!((0..=16).all(|b| !m.allowed_bpp(b)), "allowed_bpp");
    assert!(m.default_tile_size() == 0, "default_tile_size");
    assert!(!m.tile_width_allowed(8) && !m.tile_height_allowed(8), "geometry");
    assert!(m.max_tile_count() == 0, "max_tile_count");
    assert!(m.default_map_size() == 0, "default_map_size");
    assert!(m.default_palette_count() == 0, "default_palette_count");
    assert!(!m.tile_flipping_allowed(), "flipping");
    assert!(!m.col0_is_shared() && !m.col0_is_shared_for_sprite(), "col0");
}

#[test]
fn capabilities_are_distinct() {
    // Every mode differs from every other in at least one property.
    for a in Mode::iter() {
        for b in Mode::iter().filter(|b| *b != a) {
            assert!(
                a.capabilities() != b.capabilities(),
                "{a} and {b} have identical capabilities"
            );
        }
    }
}

#[test]
fn error_categories() {
    let e = report(ConvertError::Unsupported {
        op: "tile unpacking",
        mode: Mode::PceSprite,
    });
    assert!(
        e.to_string() == "tile unpacking is not supported for mode \"pce_sprite\"",
        "bad message: {e}"
    );
    assert!(
        matches!(ConvertError::of(&e), Some(ConvertError::Unsupported { .. })),
        "lost category: {e:?}"
    );

    let e = report(ConvertError::Invariant(String::from("odd length")));
    assert!(
        e.to_string() == "programmer error (odd length)",
        "bad message: {e}"
    );
    assert!(
        matches!(ConvertError::of(&e), Some(ConvertError::Invariant(_))),
        "lost category: {e:?}"
    );
}
