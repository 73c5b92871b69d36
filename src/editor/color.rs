// Single column of color swatches; the selected swatch is what the sprite editor paints with.
use anyhow::{Context, Result};
use iced::Point;

use crate::common::{cell_at, ColorIdx, ColorRGB, PixelCoord};

#[derive(Debug, Clone)]
pub struct ColorSelector {
    pub origin: Point<PixelCoord>,
    pub cell_size: PixelCoord,
    colors: Vec<ColorRGB>,
    selected: ColorIdx,
}

impl ColorSelector {
    pub fn new(origin: Point<PixelCoord>, cell_size: PixelCoord, colors: Vec<ColorRGB>) -> Self {
        ColorSelector {
            origin,
            cell_size,
            colors,
            selected: 0,
        }
    }

    /// Selects the swatch under `p`. Clicks outside the column are ignored.
    pub fn select_at(&mut self, p: Point<PixelCoord>) -> bool {
        match cell_at(p, self.origin, self.cell_size, self.cell_size, 1, self.colors.len()) {
            Some((_, y)) => {
                self.selected = y as ColorIdx;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }

    pub fn selected(&self) -> ColorIdx {
        self.selected
    }

    pub fn color_at(&self, idx: ColorIdx) -> Result<ColorRGB> {
        self.colors
            .get(idx as usize)
            .copied()
            .with_context(|| {
                format!("color index {} outside palette of {}", idx, self.colors.len())
            })
    }

    pub fn colors(&self) -> &[ColorRGB] {
        &self.colors
    }
}
