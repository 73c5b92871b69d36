use iced::Point;

pub type ColorValue = u8; // Color channel value (0-255)
pub type ColorIdx = u8; // Index into the 2bpp color table (0-3)
pub type TileIdx = u8; // Row-major index into the tileset
pub type TileCoord = usize; // Tile slot coordinate within the tileset
pub type PixelCoord = i32; // Canvas pixel coordinate, may be negative

pub type ColorRGB = [ColorValue; 3];

pub const SPRITE_WIDTH: usize = 8;
pub const SPRITE_HEIGHT: usize = 8;
pub const TILES_WIDE: usize = 14;
pub const TILES_HIGH: usize = 4;
pub const MAP_WIDTH: usize = 20;
pub const MAP_HEIGHT: usize = 18;

pub const CANVAS_WIDTH: f32 = 820.0;
pub const CANVAS_HEIGHT: f32 = 920.0;

pub const DEFAULT_COLORS: [ColorRGB; 4] = [
    [155, 188, 15],
    [139, 172, 15],
    [48, 98, 48],
    [15, 56, 15],
];

// Sample sprite placed in tile slot 0 of the built-in tileset.
pub const DEFAULT_SPRITE: [[ColorIdx; SPRITE_WIDTH]; SPRITE_HEIGHT] = [
    [0, 3, 3, 3, 3, 3, 3, 0],
    [3, 0, 0, 0, 0, 0, 0, 3],
    [3, 0, 3, 0, 0, 3, 0, 3],
    [3, 0, 0, 0, 0, 0, 0, 3],
    [3, 0, 0, 0, 0, 0, 0, 3],
    [3, 0, 3, 3, 3, 3, 0, 3],
    [3, 0, 0, 0, 0, 0, 0, 3],
    [0, 3, 3, 3, 3, 3, 3, 0],
];

/// Placement of the editors on the canvas, in canvas pixels.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub color_origin: Point<PixelCoord>,
    pub color_cell: PixelCoord,
    pub sprite_origin: Point<PixelCoord>,
    pub sprite_cell: PixelCoord,
    pub palette_origin: Point<PixelCoord>,
    pub palette_cell: PixelCoord,
    pub map_origin: Point<PixelCoord>,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            color_origin: Point::new(10, 10),
            color_cell: 40,
            sprite_origin: Point::new(70, 10),
            sprite_cell: 20,
            palette_origin: Point::new(250, 10),
            palette_cell: 5,
            map_origin: Point::new(10, 190),
        }
    }
}

/// Maps a canvas pixel to a (column, row) cell of a grid drawn at `origin` with
/// cells of `cell_w`×`cell_h` pixels. Returns `None` outside the grid.
pub fn cell_at(
    p: Point<PixelCoord>,
    origin: Point<PixelCoord>,
    cell_w: PixelCoord,
    cell_h: PixelCoord,
    cols: usize,
    rows: usize,
) -> Option<(usize, usize)> {
    let x = (p.x - origin.x).div_euclid(cell_w);
    let y = (p.y - origin.y).div_euclid(cell_h);
    if x < 0 || y < 0 || x as usize >= cols || y as usize >= rows {
        return None;
    }
    Some((x as usize, y as usize))
}
