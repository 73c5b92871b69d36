// Pixel-by-pixel editing of the sprite lent out by the palette.
use anyhow::{ensure, Result};
use iced::Point;
use log::info;

use crate::{
    common::{cell_at, ColorIdx, PixelCoord},
    grid::Grid,
};

#[derive(Debug, Clone)]
pub struct SpriteEditor {
    pub origin: Point<PixelCoord>,
    pub cell_size: PixelCoord,
    sprite: Grid,
}

impl SpriteEditor {
    pub fn new(
        origin: Point<PixelCoord>,
        cell_size: PixelCoord,
        width: usize,
        height: usize,
    ) -> Self {
        SpriteEditor {
            origin,
            cell_size,
            sprite: Grid::new(width, height),
        }
    }

    /// Paints the cell under `p` with `color`. Returns false (and leaves the
    /// sprite untouched) when `p` is outside the sprite.
    pub fn paint_at(&mut self, p: Point<PixelCoord>, color: ColorIdx) -> Result<bool> {
        let Some((x, y)) = cell_at(
            p,
            self.origin,
            self.cell_size,
            self.cell_size,
            self.sprite.width(),
            self.sprite.height(),
        ) else {
            return Ok(false);
        };
        self.sprite.set(y, x, color)?;
        Ok(true)
    }

    pub fn load(&mut self, sprite: &Grid) -> Result<()> {
        ensure!(
            sprite.width() == self.sprite.width() && sprite.height() == self.sprite.height(),
            "sprite is {}x{}, editor holds {}x{}",
            sprite.width(),
            sprite.height(),
            self.sprite.width(),
            self.sprite.height()
        );
        self.sprite = sprite.clone();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.sprite.fill(0);
    }

    pub fn sprite(&self) -> &Grid {
        &self.sprite
    }

    pub fn dump(&self) -> Result<()> {
        info!("{}", serde_json::to_string(&self.sprite)?);
        Ok(())
    }
}
