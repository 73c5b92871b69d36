// Conversion of sprites, tilesets and maps into C byte-array source text (GameBoy 2bpp).
use anyhow::{ensure, Result};
use itertools::Itertools;

use crate::grid::Grid;

/// Low and high bit-planes of a sprite, one byte per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitPlanes {
    pub low: Vec<u8>,
    pub high: Vec<u8>,
}

/// Splits a sprite into its two bit-planes. The first column lands in the most
/// significant bit of each byte, and both planes are rotated by one row (row 0
/// is emitted last), which downstream tooling expects.
pub fn encode_sprite(sprite: &Grid) -> Result<BitPlanes> {
    ensure!(
        sprite.width() <= 8,
        "sprite is {} cells wide, at most 8 fit in a byte",
        sprite.width()
    );
    let mut low = Vec::with_capacity(sprite.height());
    let mut high = Vec::with_capacity(sprite.height());
    for (y, row) in sprite.rows().enumerate() {
        let mut planes = [0u8; 2];
        for (x, &value) in row.iter().enumerate() {
            ensure!(
                value <= 3,
                "color index {} at ({}, {}) does not fit in 2 bits",
                value,
                y,
                x
            );
            let shift = sprite.width() - 1 - x;
            planes[0] |= (value & 1) << shift;
            planes[1] |= (value >> 1 & 1) << shift;
        }
        low.push(planes[0]);
        high.push(planes[1]);
    }
    if !low.is_empty() {
        low.rotate_left(1);
        high.rotate_left(1);
    }
    Ok(BitPlanes { low, high })
}

/// Inverse of `encode_sprite`, for planes produced from a sprite `width` cells wide.
pub fn decode_sprite(planes: &BitPlanes, width: usize) -> Result<Grid> {
    ensure!(
        planes.low.len() == planes.high.len(),
        "bit-planes differ in length"
    );
    ensure!((1..=8).contains(&width), "invalid sprite width {}", width);
    let mut low = planes.low.clone();
    let mut high = planes.high.clone();
    if !low.is_empty() {
        low.rotate_right(1);
        high.rotate_right(1);
    }
    let mut sprite = Grid::new(width, low.len());
    for (y, (l, h)) in low.iter().zip(high.iter()).enumerate() {
        for x in 0..width {
            let shift = width - 1 - x;
            let value = (l >> shift & 1) | (h >> shift & 1) << 1;
            sprite.set(y, x, value)?;
        }
    }
    Ok(sprite)
}

fn hex_byte(b: u8) -> String {
    format!("0x{:02X}", b)
}

fn push_line(out: &mut String, bytes: impl Iterator<Item = u8>) {
    out.push_str("    ");
    out.push_str(&bytes.map(hex_byte).join(", "));
    out.push_str(",\n");
}

fn push_sprite_lines(out: &mut String, sprite: &Grid) -> Result<()> {
    let planes = encode_sprite(sprite)?;
    for (&l, &h) in planes.low.iter().zip(planes.high.iter()) {
        push_line(out, [l, h].into_iter());
    }
    Ok(())
}

pub fn sprite_source(sprite: &Grid) -> Result<String> {
    let mut out = String::from("const unsigned char sprite[] = {\n");
    push_sprite_lines(&mut out, sprite)?;
    out.push_str("};\n");
    Ok(out)
}

/// Emits every tile of `tiles` (row-major slot order) as one `tileset` array.
pub fn tileset_source(tiles: &[Grid]) -> Result<String> {
    let mut out = format!("#define NB_TILES {}\n\n", tiles.len());
    out.push_str("const unsigned char tileset[] = {\n");
    for tile in tiles {
        push_sprite_lines(&mut out, tile)?;
    }
    out.push_str("};\n");
    Ok(out)
}

pub fn map_source(tiles: &[Grid], map: &Grid) -> Result<String> {
    let mut out = tileset_source(tiles)?;
    out.push_str(&format!(
        "\n#define MAP_W {}\n#define MAP_H {}\n\n",
        map.width(),
        map.height()
    ));
    out.push_str("const unsigned char map[] = {\n");
    for row in map.rows() {
        push_line(&mut out, row.iter().copied());
    }
    out.push_str("};\n");
    Ok(out)
}
