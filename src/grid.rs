// Fixed-size 2D array of small integers: the storage for sprites, the tileset and the map.
use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Serialize};

/// Grids persist as an array of rows, e.g. `[[0,3],[3,0]]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        ensure!(!rows.is_empty(), "grid has no rows");
        let width = rows[0].len();
        ensure!(width > 0, "grid has no columns");
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for (i, row) in rows.into_iter().enumerate() {
            ensure!(
                row.len() == width,
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                width
            );
            cells.extend(row);
        }
        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<()> {
        if row >= self.height || col >= self.width {
            bail!(
                "cell ({}, {}) out of range for {}x{} grid",
                row,
                col,
                self.width,
                self.height
            );
        }
        self.cells[row * self.width + col] = value;
        Ok(())
    }

    pub fn fill(&mut self, value: u8) {
        self.cells.fill(value);
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn max_value(&self) -> u8 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn extract_block(
        &self,
        row_offset: usize,
        col_offset: usize,
        height: usize,
        width: usize,
    ) -> Result<Grid> {
        self.check_block(row_offset, col_offset, height, width)?;
        let mut block = Grid::new(width, height);
        for y in 0..height {
            let src = (row_offset + y) * self.width + col_offset;
            block.cells[y * width..(y + 1) * width]
                .copy_from_slice(&self.cells[src..src + width]);
        }
        Ok(block)
    }

    pub fn write_block(
        &mut self,
        row_offset: usize,
        col_offset: usize,
        block: &Grid,
    ) -> Result<()> {
        self.check_block(row_offset, col_offset, block.height, block.width)?;
        for (y, line) in block.rows().enumerate() {
            let dst = (row_offset + y) * self.width + col_offset;
            self.cells[dst..dst + block.width].copy_from_slice(line);
        }
        Ok(())
    }

    fn check_block(
        &self,
        row_offset: usize,
        col_offset: usize,
        height: usize,
        width: usize,
    ) -> Result<()> {
        ensure!(
            row_offset + height <= self.height && col_offset + width <= self.width,
            "block {}x{} at ({}, {}) exceeds {}x{} grid",
            width,
            height,
            row_offset,
            col_offset,
            self.width,
            self.height
        );
        Ok(())
    }
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = anyhow::Error;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.rows().map(|r| r.to_vec()).collect()
    }
}
