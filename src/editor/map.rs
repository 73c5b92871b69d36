// Map of tile indices, painted with the palette's selected tile.
use anyhow::{ensure, Result};
use iced::Point;

use crate::{
    common::{cell_at, PixelCoord, TileIdx},
    grid::Grid,
};

#[derive(Debug, Clone)]
pub struct MapEditor {
    pub origin: Point<PixelCoord>,
    // Size of one map cell on the canvas, i.e. one tile as drawn in the palette.
    pub tile_width: PixelCoord,
    pub tile_height: PixelCoord,
    map: Grid,
}

impl MapEditor {
    pub fn new(
        origin: Point<PixelCoord>,
        tile_width: PixelCoord,
        tile_height: PixelCoord,
        width: usize,
        height: usize,
    ) -> Self {
        MapEditor {
            origin,
            tile_width,
            tile_height,
            map: Grid::new(width, height),
        }
    }

    pub fn place_at(&mut self, p: Point<PixelCoord>, tile: TileIdx) -> Result<bool> {
        let Some((x, y)) = cell_at(
            p,
            self.origin,
            self.tile_width,
            self.tile_height,
            self.map.width(),
            self.map.height(),
        ) else {
            return Ok(false);
        };
        self.map.set(y, x, tile)?;
        Ok(true)
    }

    pub fn map(&self) -> &Grid {
        &self.map
    }

    pub fn load_map(&mut self, map: Grid) -> Result<()> {
        ensure!(
            map.width() == self.map.width() && map.height() == self.map.height(),
            "map is {}x{}, expected {}x{}",
            map.width(),
            map.height(),
            self.map.width(),
            self.map.height()
        );
        self.map = map;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.map.fill(0);
    }
}
