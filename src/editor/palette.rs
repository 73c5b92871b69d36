// Tileset bitmap partitioned into sprite-sized slots, plus the selected slot.
use anyhow::{ensure, Result};
use iced::Point;

use crate::{
    common::{cell_at, PixelCoord, TileCoord, TileIdx},
    grid::Grid,
};

#[derive(Debug, Clone)]
pub struct SpritePalette {
    pub origin: Point<PixelCoord>,
    pub cell_size: PixelCoord,
    pub tiles_wide: usize,
    pub tiles_high: usize,
    pub sprite_width: usize,
    pub sprite_height: usize,
    bitmap: Grid,
    selected: (TileCoord, TileCoord),
}

impl SpritePalette {
    pub fn new(
        origin: Point<PixelCoord>,
        cell_size: PixelCoord,
        tiles_wide: usize,
        tiles_high: usize,
        sprite_width: usize,
        sprite_height: usize,
    ) -> Self {
        SpritePalette {
            origin,
            cell_size,
            tiles_wide,
            tiles_high,
            sprite_width,
            sprite_height,
            bitmap: Grid::new(tiles_wide * sprite_width, tiles_high * sprite_height),
            selected: (0, 0),
        }
    }

    pub fn tile_count(&self) -> usize {
        self.tiles_wide * self.tiles_high
    }

    /// Tile slot under `p`, if any.
    pub fn tile_at(&self, p: Point<PixelCoord>) -> Option<(TileCoord, TileCoord)> {
        cell_at(
            p,
            self.origin,
            self.cell_size * self.sprite_width as PixelCoord,
            self.cell_size * self.sprite_height as PixelCoord,
            self.tiles_wide,
            self.tiles_high,
        )
    }

    pub fn extract_tile(&self, x: TileCoord, y: TileCoord) -> Result<Grid> {
        self.check_slot(x, y)?;
        self.bitmap.extract_block(
            y * self.sprite_height,
            x * self.sprite_width,
            self.sprite_height,
            self.sprite_width,
        )
    }

    pub fn select_tile(&mut self, x: TileCoord, y: TileCoord) -> Result<()> {
        self.check_slot(x, y)?;
        self.selected = (x, y);
        Ok(())
    }

    /// Writes `sprite` into the currently selected slot.
    pub fn write_tile(&mut self, sprite: &Grid) -> Result<()> {
        ensure!(
            sprite.width() == self.sprite_width && sprite.height() == self.sprite_height,
            "sprite is {}x{}, tiles are {}x{}",
            sprite.width(),
            sprite.height(),
            self.sprite_width,
            self.sprite_height
        );
        let (x, y) = self.selected;
        self.bitmap
            .write_block(y * self.sprite_height, x * self.sprite_width, sprite)
    }

    pub fn selected(&self) -> (TileCoord, TileCoord) {
        self.selected
    }

    pub fn selected_index(&self) -> TileIdx {
        (self.selected.0 + self.selected.1 * self.tiles_wide) as TileIdx
    }

    /// All tiles in row-major slot order.
    pub fn tiles(&self) -> Result<Vec<Grid>> {
        let mut tiles = Vec::with_capacity(self.tile_count());
        for y in 0..self.tiles_high {
            for x in 0..self.tiles_wide {
                tiles.push(self.extract_tile(x, y)?);
            }
        }
        Ok(tiles)
    }

    pub fn bitmap(&self) -> &Grid {
        &self.bitmap
    }

    /// Replaces the whole tileset; the bitmap must have the palette's dimensions.
    pub fn load_bitmap(&mut self, bitmap: Grid) -> Result<()> {
        ensure!(
            bitmap.width() == self.bitmap.width() && bitmap.height() == self.bitmap.height(),
            "tileset is {}x{}, expected {}x{}",
            bitmap.width(),
            bitmap.height(),
            self.bitmap.width(),
            self.bitmap.height()
        );
        self.bitmap = bitmap;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.bitmap.fill(0);
        self.selected = (0, 0);
    }

    fn check_slot(&self, x: TileCoord, y: TileCoord) -> Result<()> {
        ensure!(
            x < self.tiles_wide && y < self.tiles_high,
            "tile ({}, {}) outside {}x{} tileset",
            x,
            y,
            self.tiles_wide,
            self.tiles_high
        );
        Ok(())
    }
}
