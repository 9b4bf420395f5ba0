//! `mode` defines the target hardware graphics profiles supported for
//! native color and tile conversion along with the static capability
//! table (bit depths, tile geometry, palette layout) for each of them.
//!
//! It also holds `ConvertError` which every conversion crate uses to report
//! why a conversion was refused.

use color_eyre::eyre::ErrReport;
use log::debug;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter, EnumString};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// `Mode` is a target hardware graphics profile.
#[derive(
    Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash, EnumCount, EnumIter, EnumString,
)]
pub enum Mode {
    /// `None` is the unset mode. It never produces valid output and every
    /// conversion refuses it.
    #[default]
    #[strum(to_string = "none")]
    None,

    /// Super Nintendo (background and sprite tiles).
    #[strum(to_string = "snes")]
    Snes,

    /// Super Nintendo Mode 7 (8bpp linear tiles, 128x128 map).
    #[strum(to_string = "snes_mode7")]
    SnesMode7,

    /// Game Boy (monochrome).
    #[strum(to_string = "gb")]
    Gb,

    /// Game Boy Color.
    #[strum(to_string = "gbc")]
    Gbc,

    /// Game Boy Advance text backgrounds.
    #[strum(to_string = "gba")]
    Gba,

    /// Game Boy Advance affine backgrounds.
    #[strum(to_string = "gba_affine")]
    GbaAffine,

    /// Sega Mega Drive / Genesis.
    #[strum(to_string = "md")]
    Md,

    /// PC-Engine / TurboGrafx-16 backgrounds.
    #[strum(to_string = "pce")]
    Pce,

    /// PC-Engine / TurboGrafx-16 sprites (16x16 planar).
    #[strum(to_string = "pce_sprite")]
    PceSprite,
}

/// `Capabilities` is the static description of a `Mode`.
#[derive(Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Bit depth used when none is requested.
    pub default_bpp: u32,

    /// Every bit depth the hardware can display.
    pub bpp: &'static [u32],

    /// Tile edge length used when none is requested.
    pub default_tile_size: u32,

    /// Legal tile widths in pixels.
    pub tile_widths: &'static [u32],

    /// Legal tile heights in pixels.
    pub tile_heights: &'static [u32],

    /// Number of tiles addressable by a map entry. 0 if maps don't apply.
    pub max_tile_count: u32,

    /// Edge length of the tile map grid. 0 if maps don't apply.
    pub default_map_size: u32,

    /// Number of selectable palettes.
    pub default_palette_count: u32,

    /// Map entries carry horizontal/vertical flip bits.
    pub tile_flipping: bool,

    /// Color 0 of every background palette is the shared backdrop/transparent slot.
    pub col0_shared: bool,

    /// Color 0 of every sprite palette is transparent.
    pub col0_shared_for_sprite: bool,
}

const NONE: Capabilities = Capabilities {
    default_bpp: 0,
    bpp: &[],
    default_tile_size: 0,
    tile_widths: &[],
    tile_heights: &[],
    max_tile_count: 0,
    default_map_size: 0,
    default_palette_count: 0,
    tile_flipping: false,
    col0_shared: false,
    col0_shared_for_sprite: false,
};

const SNES: Capabilities = Capabilities {
    default_bpp: 4,
    bpp: &[2, 4, 8],
    default_tile_size: 8,
    tile_widths: &[8, 16],
    tile_heights: &[8, 16],
    max_tile_count: 1024,
    default_map_size: 32,
    default_palette_count: 8,
    tile_flipping: true,
    col0_shared: true,
    col0_shared_for_sprite: true,
};

const SNES_MODE7: Capabilities = Capabilities {
    default_bpp: 8,
    bpp: &[8],
    default_tile_size: 8,
    tile_widths: &[8],
    tile_heights: &[8],
    max_tile_count: 256,
    default_map_size: 128,
    default_palette_count: 1,
    tile_flipping: false,
    col0_shared: true,
    col0_shared_for_sprite: true,
};

const GB: Capabilities = Capabilities {
    default_bpp: 2,
    bpp: &[2],
    default_tile_size: 8,
    tile_widths: &[8],
    tile_heights: &[8],
    max_tile_count: 256,
    default_map_size: 32,
    default_palette_count: 1,
    tile_flipping: false,
    col0_shared: false,
    col0_shared_for_sprite: true,
};

const GBC: Capabilities = Capabilities {
    max_tile_count: 512,
    default_palette_count: 8,
    tile_flipping: true,
    ..GB
};

const GBA: Capabilities = Capabilities {
    default_bpp: 4,
    bpp: &[4, 8],
    default_tile_size: 8,
    tile_widths: &[8],
    tile_heights: &[8],
    max_tile_count: 1024,
    default_map_size: 32,
    default_palette_count: 16,
    tile_flipping: true,
    col0_shared: true,
    col0_shared_for_sprite: true,
};

const GBA_AFFINE: Capabilities = Capabilities {
    default_bpp: 8,
    bpp: &[8],
    max_tile_count: 256,
    default_palette_count: 1,
    tile_flipping: false,
    ..GBA
};

const MD: Capabilities = Capabilities {
    default_bpp: 4,
    bpp: &[4],
    default_tile_size: 8,
    tile_widths: &[8],
    tile_heights: &[8],
    max_tile_count: 2048,
    default_map_size: 32,
    default_palette_count: 4,
    tile_flipping: true,
    col0_shared: true,
    col0_shared_for_sprite: true,
};

const PCE: Capabilities = Capabilities {
    default_palette_count: 16,
    tile_flipping: false,
    ..MD
};

const PCE_SPRITE: Capabilities = Capabilities {
    default_tile_size: 16,
    tile_widths: &[16],
    tile_heights: &[16],
    max_tile_count: 0,
    default_map_size: 0,
    ..PCE
};

impl Mode {
    /// `from_name` maps a mode name to its `Mode`. Unknown names map to `Mode::None`
    /// so the caller can reject them with the rest of the unsupported cases.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Self::None)
    }

    /// `real` iterates every mode except `Mode::None`.
    pub fn real() -> impl Iterator<Item = Self> {
        Self::iter().filter(|m| *m != Self::None)
    }

    /// `capabilities` returns the static capability record for the mode.
    /// `Mode::None` has an empty record (no bit depths, no geometry, zero counts).
    #[must_use]
    pub const fn capabilities(self) -> &'static Capabilities {
        match self {
            Self::None => &NONE,
            Self::Snes => &SNES,
            Self::SnesMode7 => &SNES_MODE7,
            Self::Gb => &GB,
            Self::Gbc => &GBC,
            Self::Gba => &GBA,
            Self::GbaAffine => &GBA_AFFINE,
            Self::Md => &MD,
            Self::Pce => &PCE,
            Self::PceSprite => &PCE_SPRITE,
        }
    }

    /// Bit depth used when the caller doesn't request one.
    #[must_use]
    pub const fn default_bpp(self) -> u32 {
        self.capabilities().default_bpp
    }

    /// `allowed_bpp` reports whether tiles of `bpp` bits per pixel can be
    /// displayed in this mode.
    #[must_use]
    pub fn allowed_bpp(self, bpp: u32) -> bool {
        self.capabilities().bpp.contains(&bpp)
    }

    /// Tile edge length used when the caller doesn't request one.
    #[must_use]
    pub const fn default_tile_size(self) -> u32 {
        self.capabilities().default_tile_size
    }

    /// Number of distinct tiles a map can reference.
    #[must_use]
    pub const fn max_tile_count(self) -> u32 {
        self.capabilities().max_tile_count
    }

    /// `tile_width_allowed` reports whether `width` is a legal tile width.
    #[must_use]
    pub fn tile_width_allowed(self, width: u32) -> bool {
        self.capabilities().tile_widths.contains(&width)
    }

    /// `tile_height_allowed` reports whether `height` is a legal tile height.
    #[must_use]
    pub fn tile_height_allowed(self, height: u32) -> bool {
        self.capabilities().tile_heights.contains(&height)
    }

    /// Map entries can flip tiles in hardware.
    #[must_use]
    pub const fn tile_flipping_allowed(self) -> bool {
        self.capabilities().tile_flipping
    }

    /// Edge length of the tile map grid.
    #[must_use]
    pub const fn default_map_size(self) -> u32 {
        self.capabilities().default_map_size
    }

    /// Number of selectable palettes.
    #[must_use]
    pub const fn default_palette_count(self) -> u32 {
        self.capabilities().default_palette_count
    }

    /// Color 0 is shared across all background palettes.
    #[must_use]
    pub const fn col0_is_shared(self) -> bool {
        self.capabilities().col0_shared
    }

    /// Color 0 is shared (transparent) across all sprite palettes.
    #[must_use]
    pub const fn col0_is_shared_for_sprite(self) -> bool {
        self.capabilities().col0_shared_for_sprite
    }
}

/// `ConvertError` defines the reasons a color or tile conversion is refused.
/// Conversions return it wrapped in an `ErrReport` so use `ConvertError::of`
/// (or `downcast_ref`) to branch on the category.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConvertError {
    /// `Structural` indicates the input is malformed for the mode
    /// (wrong length, out of range values, geometry the mode can't display).
    #[error("{0}")]
    Structural(String),

    /// `Unsupported` indicates the mode can't perform this conversion at all.
    #[error("{op} is not supported for mode \"{mode}\"")]
    Unsupported {
        /// op names the refused conversion.
        op: &'static str,
        /// mode is the mode it was requested for.
        mode: Mode,
    },

    /// `Invariant` indicates an internal block size check failed. Only reachable
    /// if geometry validation was bypassed.
    #[error("programmer error ({0})")]
    Invariant(String),
}

impl ConvertError {
    /// `of` returns the `ConvertError` carried by a report, if any.
    #[must_use]
    pub fn of(report: &ErrReport) -> Option<&Self> {
        report.downcast_ref::<Self>()
    }
}

/// `report` logs a refused conversion and wraps it for return.
#[must_use]
pub fn report(err: ConvertError) -> ErrReport {
    debug!("conversion refused: {err}");
    ErrReport::new(err)
}
