//! `native_tile` converts tiles between arrays of palette indices (one byte
//! per pixel, row major) and the tile formats of the supported modes.

use color_eyre::eyre::Result;
use log::trace;
use mode::{report, ConvertError, Mode};


// The tile formats. Several modes share one.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Layout {
    // 8x8 tiles in pairs of bit planes. Each pair is 16 bytes with the low
    // and high plane bytes for a row next to each other (SNES/GB style).
    Planar2,
    // One byte per pixel.
    Linear,
    // 2 pixels per byte at 4bpp (low nibble first), one byte per pixel at 8bpp.
    Nibble,
    // 4 separate planes, each a plain 1 bit per pixel bitmap.
    Planar1,
}

impl Layout {
    fn of(mode: Mode) -> Option<Self> {
        match mode {
            Mode::Snes | Mode::Gb | Mode::Gbc | Mode::Pce => Some(Self::Planar2),
            Mode::SnesMode7 => Some(Self::Linear),
            Mode::Gba | Mode::GbaAffine | Mode::Md => Some(Self::Nibble),
            Mode::PceSprite => Some(Self::Planar1),
            Mode::None => None,
        }
    }
}

// Validate the requested geometry against the mode. Returns the layout to use.
fn layout(mode: Mode, bpp: u32, width: u32, height: u32, op: &'static str) -> Result<Layout> {
    let Some(layout) = Layout::of(mode) else {
        return Err(report(ConvertError::Unsupported { op, mode }));
    };
    if !mode.allowed_bpp(bpp) {
        return Err(report(ConvertError::Structural(format!(
            "{bpp}bpp not allowed for mode \"{mode}\""
        ))));
    }
    if !mode.tile_width_allowed(width) || !mode.tile_height_allowed(height) {
        return Err(report(ConvertError::Structural(format!(
            "tile size {width}x{height} not allowed for mode \"{mode}\""
        ))));
    }
    if layout == Layout::Planar2 && (width != 8 || height != 8) {
        return Err(report(ConvertError::Structural(format!(
            "tile size not 8x8 for mode \"{mode}\""
        ))));
    }
    Ok(layout)
}

/// `native_tile_size` returns the number of bytes one tile of the given
/// geometry occupies in the mode's native format.
///
/// # Errors
/// `Mode::None` is unsupported and any geometry or bit depth the mode can't
/// display is a structural error.
pub fn native_tile_size(mode: Mode, bpp: u32, width: u32, height: u32) -> Result<usize> {
    layout(mode, bpp, width, height, "tile sizing")?;
    Ok(pixels(width, height) * bpp as usize / 8)
}

fn pixels(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// `pack_native_tile` converts a tile of palette indices (`width * height`
/// entries, row major) into the native tile bytes for `mode`.
///
/// # Errors
/// `Mode::None` is unsupported. A bit depth or tile size the mode can't display,
/// input of the wrong length or an index which doesn't fit in `bpp` bits is a
/// structural error.
pub fn pack_native_tile(
    data: &[u8],
    mode: Mode,
    bpp: u32,
    width: u32,
    height: u32,
) -> Result<Vec<u8>> {
    let layout = layout(mode, bpp, width, height, "tile packing")?;
    if data.len() != pixels(width, height) {
        return Err(report(ConvertError::Structural(format!(
            "tile data has {} pixels, {width}x{height} needs {}",
            data.len(),
            pixels(width, height)
        ))));
    }
    if let Some((i, v)) = data
        .iter()
        .enumerate()
        .find(|(_, v)| u32::from(**v) >> bpp != 0)
    {
        return Err(report(ConvertError::Structural(format!(
            "pixel {i} index {v} doesn't fit in {bpp}bpp"
        ))));
    }

    let out = match layout {
        Layout::Planar2 => {
            let mut out = Vec::with_capacity(bpp as usize * 8);
            for pair in 0..bpp / 2 {
                out.extend_from_slice(&make_2bit_planes(data, pair * 2));
            }
            out
        }
        Layout::Linear => data.to_vec(),
        Layout::Nibble if bpp == 8 => data.to_vec(),
        Layout::Nibble => make_4bpp_bitpack(data)?,
        Layout::Planar1 => {
            let mut out = Vec::with_capacity(data.len() / 2);
            for plane in 0..4 {
                out.extend(make_1bit_plane(data, plane)?);
            }
            out
        }
    };
    trace!("packed {width}x{height} {bpp}bpp {mode} tile into {} bytes", out.len());
    Ok(out)
}

// Planes `plane` and `plane + 1` of an 8x8 tile. Row y lands in bytes 2y and 2y+1
// with the leftmost pixel in bit 7.
fn make_2bit_planes(data: &[u8], plane: u32) -> [u8; 16] {
    let mut p = [0; 16];
    for y in 0..8 {
        for x in 0..8 {
            let px = data[y * 8 + x];
            p[y * 2] |= ((px >> plane) & 1) << (7 - x);
            p[y * 2 + 1] |= ((px >> (plane + 1)) & 1) << (7 - x);
        }
    }
    p
}

// A flat bitmap of one plane, 8 pixels per byte with the first pixel in bit 0.
fn make_1bit_plane(data: &[u8], plane: u32) -> Result<Vec<u8>> {
    if data.len() % 8 != 0 {
        return Err(report(ConvertError::Invariant(format!(
            "{} pixels not a multiple of 8 for 1 bit planes",
            data.len()
        ))));
    }
    Ok(data
        .chunks_exact(8)
        .map(|c| {
            c.iter()
                .enumerate()
                .fold(0, |b, (i, px)| b | ((px >> plane) & 1) << i)
        })
        .collect())
}

fn make_4bpp_bitpack(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() % 2 != 0 {
        return Err(report(ConvertError::Invariant(format!(
            "{} pixels not a multiple of 2 for 4bpp packing",
            data.len()
        ))));
    }
    Ok(data
        .chunks_exact(2)
        .map(|p| (p[0] & 0x0F) | (p[1] << 4))
        .collect())
}

/// `unpack_native_tile` converts native tile bytes for `mode` back into palette
/// indices (`width * height` entries, row major).
///
/// # Errors
/// `Mode::None` and `Mode::PceSprite` are unsupported. A bit depth or tile size
/// the mode can't display or input which isn't exactly one tile is a structural
/// error.
pub fn unpack_native_tile(
    data: &[u8],
    mode: Mode,
    bpp: u32,
    width: u32,
    height: u32,
) -> Result<Vec<u8>> {
    let op = "tile unpacking";
    if Layout::of(mode) == Some(Layout::Planar1) {
        // TODO: read 1 bit planar sprite data (inverse of make_1bit_plane).
        return Err(report(ConvertError::Unsupported { op, mode }));
    }
    let layout = layout(mode, bpp, width, height, op)?;
    let want = pixels(width, height) * bpp as usize / 8;
    if data.len() != want {
        return Err(report(ConvertError::Structural(format!(
            "native tile data is {} bytes, {width}x{height} {bpp}bpp needs {want}",
            data.len()
        ))));
    }

    let out = match layout {
        Layout::Planar2 => {
            let mut out = vec![0; 64];
            for plane in 0..bpp {
                // Planes come in pairs of 16 bytes, odd planes one byte after even ones.
                let offset = (plane as usize >> 1) * 16 + (plane as usize & 1);
                for y in 0..8 {
                    for x in 0..8 {
                        out[y * 8 + x] |= ((data[offset + y * 2] >> (7 - x)) & 1) << plane;
                    }
                }
            }
            out
        }
        Layout::Nibble if bpp == 4 => data.iter().flat_map(|b| [b & 0x0F, b >> 4]).collect(),
        Layout::Linear | Layout::Nibble => data.to_vec(),
        Layout::Planar1 => {
            return Err(report(ConvertError::Invariant(format!(
                "1 bit planar layout reached unpacking for mode \"{mode}\""
            ))))
        }
    };
    trace!("unpacked {} bytes into {width}x{height} {bpp}bpp {mode} tile", data.len());
    Ok(out)
}

/// Given a tile of palette indices return a set of strings describing it
/// where . == index 0 and every other index is printed in hex.
#[must_use]
pub fn tile_print(data: &[u8], width: usize) -> Vec<String> {
    data.chunks(width.max(1))
        .map(|row| {
            let mut line = String::new();
            for e in row {
                if *e == 0x00 {
                    line.push('.');
                } else {
                    line.push_str(&format!("{e:X}"));
                }
            }
            line
        })
        .collect()
}
