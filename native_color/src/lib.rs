//! `native_color` converts colors between neutral 8 bit per channel RGBA and
//! the palette formats of the supported modes.
//!
//! A conversion to hardware is two steps: `reduce_color` quantizes a neutral
//! color into the mode's channel range and `pack_native_colors` lays the
//! quantized channels out the way the palette RAM expects them. Reading goes
//! the other way with `unpack_native_colors` and `normalize_color`.

use std::collections::BTreeSet;

use color_eyre::eyre::Result;
use log::trace;
use mode::{report, ConvertError, Mode};


/// `Rgba` is a color with separate channels. Depending on where it came from it
/// either holds a neutral color (every channel 0-255) or a quantized one with
/// R, G and B already reduced to the mode's channel width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba {
    /// Build a color from all 4 channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a fully opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }
}

// Packed words are 0xAABBGGRR (red in the low byte).
impl From<u32> for Rgba {
    fn from(v: u32) -> Self {
        let [r, g, b, a] = v.to_le_bytes();
        Self { r, g, b, a }
    }
}

impl From<Rgba> for u32 {
    fn from(c: Rgba) -> Self {
        u32::from_le_bytes([c.r, c.g, c.b, c.a])
    }
}

/// `TRANSPARENT` is what every mode reduces a transparent color to.
pub const TRANSPARENT: Rgba = Rgba::new(0x00, 0x00, 0x00, 0x00);

/// Alpha values below this reduce to `TRANSPARENT`.
pub const ALPHA_THRESHOLD: u8 = 0x80;

// The palette formats. Several modes share one.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Format {
    // 15 bit BGR, 5 bits per channel, little endian word.
    Bgr555,
    // 4 shades of gray in 2 bits, 4 colors to a byte.
    Gray2,
    // Mega Drive CRAM: 0000BBB0GGG0RRR0
    Md333,
    // PC-Engine VCE: 0000000GGGRRRBBB
    Pce333,
}

impl Format {
    fn of(mode: Mode, op: &'static str) -> Result<Self> {
        match mode {
            Mode::Snes | Mode::SnesMode7 | Mode::Gbc | Mode::Gba | Mode::GbaAffine => {
                Ok(Self::Bgr555)
            }
            Mode::Gb => Ok(Self::Gray2),
            Mode::Md => Ok(Self::Md333),
            Mode::Pce | Mode::PceSprite => Ok(Self::Pce333),
            Mode::None => Err(report(ConvertError::Unsupported { op, mode })),
        }
    }

    // Bits dropped going from 8 bits per channel to the native width.
    const fn shift(self) -> u32 {
        match self {
            Self::Bgr555 => 3,
            Self::Gray2 => 6,
            Self::Md333 | Self::Pce333 => 5,
        }
    }

    // Largest channel value for the native width.
    const fn max(self) -> u8 {
        0xFF >> self.shift()
    }

    // Bit positions of R, G and B inside the 16 bit palette word. The Game Boy
    // has no palette word.
    const fn fields(self) -> Option<[u16; 3]> {
        match self {
            Self::Bgr555 => Some([0, 5, 10]),
            Self::Md333 => Some([1, 5, 9]),
            Self::Pce333 => Some([3, 6, 0]),
            Self::Gray2 => None,
        }
    }
}

/// `reduce_color` quantizes a neutral color into the channel range of `mode`.
///
/// Any color with alpha below `ALPHA_THRESHOLD` becomes `TRANSPARENT`, every
/// other color comes back fully opaque. The Game Boy reduces to one of 4 gray
/// levels (0 darkest) replicated into R, G and B.
///
/// # Errors
/// `Mode::None` is unsupported.
pub fn reduce_color(color: Rgba, mode: Mode) -> Result<Rgba> {
    let format = Format::of(mode, "color reduction")?;
    if color.a < ALPHA_THRESHOLD {
        return Ok(TRANSPARENT);
    }
    if format == Format::Gray2 {
        let level = gray_level(color);
        return Ok(Rgba::opaque(level, level, level));
    }
    let shift = format.shift();
    Ok(Rgba::opaque(
        color.r >> shift,
        color.g >> shift,
        color.b >> shift,
    ))
}

// Luma quantized to 4 levels. The thresholds are inclusive.
fn gray_level(color: Rgba) -> u8 {
    let luma = f64::from(color.r) * 0.299 + f64::from(color.g) * 0.587 + f64::from(color.b) * 0.114;
    // Truncation to 0-255 is intended.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let luma = luma as u8;
    match luma {
        0x00..=0x40 => 0,
        0x41..=0x80 => 1,
        0x81..=0xC0 => 2,
        _ => 3,
    }
}

/// `reduce_colors` runs `reduce_color` over each entry keeping the order.
///
/// # Errors
/// `Mode::None` is unsupported.
pub fn reduce_colors(colors: &[Rgba], mode: Mode) -> Result<Vec<Rgba>> {
    colors.iter().map(|c| reduce_color(*c, mode)).collect()
}

/// `reduce_color_set` reduces a set of colors. Colors which quantize to the
/// same value collapse into one entry.
///
/// # Errors
/// `Mode::None` is unsupported.
pub fn reduce_color_set(colors: &BTreeSet<Rgba>, mode: Mode) -> Result<BTreeSet<Rgba>> {
    colors.iter().map(|c| reduce_color(*c, mode)).collect()
}

/// `normalize_color` expands a quantized color back to 8 bits per channel by
/// shifting each of R, G and B up by the bits reduction dropped. Alpha is
/// left as is.
///
/// # Errors
/// `Mode::None` is unsupported and a channel wider than the mode allows is
/// a structural error.
pub fn normalize_color(color: Rgba, mode: Mode) -> Result<Rgba> {
    let format = Format::of(mode, "color normalization")?;
    check_range(color, format, mode)?;
    let shift = format.shift();
    Ok(Rgba::new(
        color.r << shift,
        color.g << shift,
        color.b << shift,
        color.a,
    ))
}

/// `normalize_colors` runs `normalize_color` over each entry keeping the order.
///
/// # Errors
/// See `normalize_color`.
pub fn normalize_colors(colors: &[Rgba], mode: Mode) -> Result<Vec<Rgba>> {
    colors.iter().map(|c| normalize_color(*c, mode)).collect()
}

fn check_range(color: Rgba, format: Format, mode: Mode) -> Result<()> {
    let max = format.max();
    if color.r > max || color.g > max || color.b > max {
        return Err(report(ConvertError::Structural(format!(
            "color {:08X} exceeds the {max:#04X} channel range of mode \"{mode}\"",
            u32::from(color)
        ))));
    }
    Ok(())
}

/// `pack_native_color` packs a single quantized color into its palette RAM
/// bytes (2 bytes, little endian).
///
/// For the Game Boy the result is 1 byte holding the 2 bit code for the color
/// in its low bits. Use `pack_native_colors` to build a full Game Boy palette byte.
///
/// # Errors
/// `Mode::None` is unsupported and channels wider than the mode allows are a
/// structural error.
pub fn pack_native_color(color: Rgba, mode: Mode) -> Result<Vec<u8>> {
    let format = Format::of(mode, "color packing")?;
    check_range(color, format, mode)?;
    let Some([rs, gs, bs]) = format.fields() else {
        // The hardware codes run from lightest (0) to darkest (3).
        return Ok(vec![(0xFF - color.r) & 0x03]);
    };
    let word = u16::from(color.r) << rs | u16::from(color.g) << gs | u16::from(color.b) << bs;
    Ok(word.to_le_bytes().to_vec())
}

/// Number of colors packed into one Game Boy palette byte.
pub const GB_PALETTE_SIZE: usize = 4;

/// `pack_native_colors` packs quantized colors into palette RAM bytes, 2
/// bytes per color in order.
///
/// A Game Boy palette is always exactly 4 colors packed into 1 byte with
/// color N in bits 2N and 2N+1.
///
/// # Errors
/// `Mode::None` is unsupported. A Game Boy palette that isn't 4 colors or any
/// color with channels wider than the mode allows is a structural error.
pub fn pack_native_colors(colors: &[Rgba], mode: Mode) -> Result<Vec<u8>> {
    if Format::of(mode, "color packing")? == Format::Gray2 {
        if colors.len() != GB_PALETTE_SIZE {
            return Err(report(ConvertError::Structural(format!(
                "gb palette size {} not equal to {GB_PALETTE_SIZE}",
                colors.len()
            ))));
        }
        let mut packed = 0;
        for (i, c) in colors.iter().enumerate() {
            packed |= pack_native_color(*c, mode)?[0] << (i * 2);
        }
        trace!("packed gb palette {packed:02X}");
        return Ok(vec![packed]);
    }

    let mut out = Vec::with_capacity(colors.len() * 2);
    for c in colors {
        out.extend(pack_native_color(*c, mode)?);
    }
    trace!("packed {} colors into {} bytes for {mode}", colors.len(), out.len());
    Ok(out)
}

/// `unpack_native_colors` reads palette RAM bytes back into quantized colors
/// (always opaque).
///
/// # Errors
/// `Mode::None` is unsupported. Input that isn't a multiple of 2 bytes (or
/// exactly 1 byte for the Game Boy) is a structural error.
pub fn unpack_native_colors(data: &[u8], mode: Mode) -> Result<Vec<Rgba>> {
    let format = Format::of(mode, "color unpacking")?;

    if format == Format::Gray2 {
        if data.len() != 1 {
            return Err(report(ConvertError::Structural(format!(
                "native gb palette size {} not one byte",
                data.len()
            ))));
        }
        return Ok((0..GB_PALETTE_SIZE)
            .map(|i| {
                let level = 0x03 - ((data[0] >> (i * 2)) & 0x03);
                Rgba::opaque(level, level, level)
            })
            .collect());
    }

    if data.len() % 2 != 0 {
        return Err(report(ConvertError::Structural(format!(
            "native palette size {} not a multiple of 2",
            data.len()
        ))));
    }

    let Some([rs, gs, bs]) = format.fields() else {
        return Err(report(ConvertError::Invariant(format!(
            "no palette word layout for mode \"{mode}\""
        ))));
    };
    let mask = u16::from(format.max());
    Ok(data
        .chunks_exact(2)
        .map(|c| {
            let w = u16::from_le_bytes([c[0], c[1]]);
            // Every channel is masked to at most 5 bits so the casts can't truncate.
            #[allow(clippy::cast_possible_truncation)]
            let ch = |shift: u16| ((w >> shift) & mask) as u8;
            Rgba::opaque(ch(rs), ch(gs), ch(bs))
        })
        .collect())
}
