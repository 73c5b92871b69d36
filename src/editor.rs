// The editors and the propagation rules between them. Each editor owns its grid;
// the workspace copies sprites between the palette and the sprite editor.
mod color;
mod map;
mod palette;
mod sprite;

pub use color::ColorSelector;
pub use map::MapEditor;
pub use palette::SpritePalette;
pub use sprite::SpriteEditor;

use anyhow::{ensure, Result};
use iced::Point;

use crate::{
    common::{
        ColorIdx, Layout, PixelCoord, TileCoord, DEFAULT_COLORS, DEFAULT_SPRITE, MAP_HEIGHT,
        MAP_WIDTH, SPRITE_HEIGHT, SPRITE_WIDTH, TILES_HIGH, TILES_WIDE,
    },
    encode,
    grid::Grid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    Tileset,
    Map,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Tileset => "data",
            StoreKey::Map => "map",
        }
    }
}

/// Side effects requested by an edit, performed by the caller.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Effects {
    pub persist: Vec<StoreKey>,
    pub clipboard: Option<String>,
}

impl Effects {
    fn persist(&mut self, key: StoreKey) {
        if !self.persist.contains(&key) {
            self.persist.push(key);
        }
    }

    fn merge(&mut self, other: Effects) {
        for key in other.persist {
            self.persist(key);
        }
        if other.clipboard.is_some() {
            self.clipboard = other.clipboard;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.persist.is_empty() && self.clipboard.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Workspace {
    pub colors: ColorSelector,
    pub sprite: SpriteEditor,
    pub palette: SpritePalette,
    pub map: MapEditor,
}

impl Workspace {
    /// Empty editors placed according to `layout`.
    pub fn new(layout: &Layout) -> Self {
        let palette = SpritePalette::new(
            layout.palette_origin,
            layout.palette_cell,
            TILES_WIDE,
            TILES_HIGH,
            SPRITE_WIDTH,
            SPRITE_HEIGHT,
        );
        let map = MapEditor::new(
            layout.map_origin,
            layout.palette_cell * SPRITE_WIDTH as PixelCoord,
            layout.palette_cell * SPRITE_HEIGHT as PixelCoord,
            MAP_WIDTH,
            MAP_HEIGHT,
        );
        Workspace {
            colors: ColorSelector::new(
                layout.color_origin,
                layout.color_cell,
                DEFAULT_COLORS.to_vec(),
            ),
            sprite: SpriteEditor::new(
                layout.sprite_origin,
                layout.sprite_cell,
                SPRITE_WIDTH,
                SPRITE_HEIGHT,
            ),
            palette,
            map,
        }
    }

    /// The built-in dataset: the sample sprite in slot 0, everything else blank.
    pub fn with_defaults(layout: &Layout) -> Result<Self> {
        let mut ws = Workspace::new(layout);
        ws.palette.write_tile(&default_sprite()?)?;
        ws.select_tile(0, 0, true)?;
        Ok(ws)
    }

    pub fn select_tile(&mut self, x: TileCoord, y: TileCoord, update_editor: bool) -> Result<()> {
        self.palette.select_tile(x, y)?;
        if update_editor {
            let tile = self.palette.extract_tile(x, y)?;
            self.sprite.load(&tile)?;
        }
        Ok(())
    }

    /// Selects a tile by its row-major slot index.
    pub fn select_slot(&mut self, index: usize) -> Result<()> {
        let tiles_wide = self.palette.tiles_wide;
        self.select_tile(index % tiles_wide, index / tiles_wide, true)
    }

    /// Moves the tile selection by one slot, staying inside the tileset.
    pub fn move_selection(&mut self, dx: isize, dy: isize) -> Result<bool> {
        let (x, y) = self.palette.selected();
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx < 0
            || ny < 0
            || nx as usize >= self.palette.tiles_wide
            || ny as usize >= self.palette.tiles_high
        {
            return Ok(false);
        }
        self.select_tile(nx as usize, ny as usize, true)?;
        Ok(true)
    }

    pub fn select_color_at(&mut self, p: Point<PixelCoord>) -> bool {
        self.colors.select_at(p)
    }

    pub fn paint_sprite_at(&mut self, p: Point<PixelCoord>) -> Result<Effects> {
        let mut effects = Effects::default();
        let color: ColorIdx = self.colors.selected();
        if self.sprite.paint_at(p, color)? {
            self.palette.write_tile(self.sprite.sprite())?;
            effects.persist(StoreKey::Tileset);
            effects.clipboard = Some(self.sprite_source()?);
        }
        Ok(effects)
    }

    pub fn click_palette_at(&mut self, p: Point<PixelCoord>) -> Result<Effects> {
        let mut effects = Effects::default();
        if let Some((x, y)) = self.palette.tile_at(p) {
            self.select_tile(x, y, true)?;
            effects.persist(StoreKey::Tileset);
            effects.clipboard = Some(self.tileset_source()?);
        }
        Ok(effects)
    }

    pub fn place_map_at(&mut self, p: Point<PixelCoord>) -> Result<Effects> {
        let mut effects = Effects::default();
        let tile = self.palette.selected_index();
        if self.map.place_at(p, tile)? {
            effects.persist(StoreKey::Map);
            effects.clipboard = Some(self.map_source()?);
        }
        Ok(effects)
    }

    pub fn click(&mut self, p: Point<PixelCoord>) -> Result<Effects> {
        self.select_color_at(p);
        let mut effects = self.paint_sprite_at(p)?;
        effects.merge(self.click_palette_at(p)?);
        effects.merge(self.place_map_at(p)?);
        Ok(effects)
    }

    // Dragging never changes the tile selection.
    pub fn drag(&mut self, p: Point<PixelCoord>) -> Result<Effects> {
        self.select_color_at(p);
        let mut effects = self.paint_sprite_at(p)?;
        effects.merge(self.place_map_at(p)?);
        Ok(effects)
    }

    /// Clears the map, the tileset, the sprite and the color selection.
    pub fn reset(&mut self) -> Effects {
        self.map.reset();
        self.palette.reset();
        self.sprite.reset();
        self.colors.reset();
        Effects {
            persist: vec![StoreKey::Tileset, StoreKey::Map],
            clipboard: None,
        }
    }

    pub fn sprite_source(&self) -> Result<String> {
        encode::sprite_source(self.sprite.sprite())
    }

    pub fn tileset_source(&self) -> Result<String> {
        encode::tileset_source(&self.palette.tiles()?)
    }

    pub fn map_source(&self) -> Result<String> {
        encode::map_source(&self.palette.tiles()?, self.map.map())
    }

    /// Checks that a stored tileset fits this workspace's palette.
    pub fn validate_tileset(&self, bitmap: &Grid) -> Result<()> {
        ensure!(
            bitmap.width() == self.palette.bitmap().width()
                && bitmap.height() == self.palette.bitmap().height(),
            "tileset is {}x{}, expected {}x{}",
            bitmap.width(),
            bitmap.height(),
            self.palette.bitmap().width(),
            self.palette.bitmap().height()
        );
        ensure!(
            (bitmap.max_value() as usize) < self.colors.colors().len(),
            "tileset uses color {} but the palette has {} colors",
            bitmap.max_value(),
            self.colors.colors().len()
        );
        Ok(())
    }

    /// Checks that a stored map fits this workspace's map and tileset.
    pub fn validate_map(&self, map: &Grid) -> Result<()> {
        ensure!(
            map.width() == self.map.map().width() && map.height() == self.map.map().height(),
            "map is {}x{}, expected {}x{}",
            map.width(),
            map.height(),
            self.map.map().width(),
            self.map.map().height()
        );
        ensure!(
            (map.max_value() as usize) < self.palette.tile_count(),
            "map uses tile {} but the tileset has {} tiles",
            map.max_value(),
            self.palette.tile_count()
        );
        Ok(())
    }
}

pub fn default_sprite() -> Result<Grid> {
    Grid::from_rows(DEFAULT_SPRITE.iter().map(|row| row.to_vec()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> Workspace {
        Workspace::with_defaults(&Layout::default()).unwrap()
    }

    #[test]
    fn defaults_load_the_sample_sprite() {
        let ws = workspace();
        assert_eq!(ws.sprite.sprite(), &default_sprite().unwrap());
        assert_eq!(ws.palette.extract_tile(0, 0).unwrap(), default_sprite().unwrap());
        assert_eq!(ws.palette.bitmap().width(), 112);
        assert_eq!(ws.palette.bitmap().height(), 32);
        assert_eq!(ws.map.map().width(), 20);
        assert_eq!(ws.map.map().height(), 18);
    }

    #[test]
    fn painting_writes_back_into_the_selected_tile() {
        let mut ws = workspace();
        ws.select_tile(3, 1, true).unwrap();
        ws.click(Point::new(15, 10 + 2 * 40)).unwrap();
        assert_eq!(ws.colors.selected(), 2);

        let effects = ws.click(Point::new(75, 15)).unwrap();
        assert_eq!(ws.sprite.sprite().get(0, 0), Some(2));
        assert_eq!(ws.palette.extract_tile(3, 1).unwrap().get(0, 0), Some(2));
        assert_eq!(ws.palette.extract_tile(0, 0).unwrap(), default_sprite().unwrap());
        assert_eq!(effects.persist, vec![StoreKey::Tileset]);
        let text = effects.clipboard.unwrap();
        assert!(text.starts_with("const unsigned char sprite[] = {"));
        assert!(text.contains("    0x00, 0x80,\n};"));
    }

    #[test]
    fn palette_click_loads_tile_into_sprite_editor() {
        let mut ws = workspace();
        ws.select_tile(5, 2, true).unwrap();
        assert_eq!(ws.sprite.sprite(), &Grid::new(8, 8));
        let effects = ws.click(Point::new(250, 10)).unwrap();
        assert_eq!(ws.palette.selected(), (0, 0));
        assert_eq!(ws.sprite.sprite(), &default_sprite().unwrap());
        assert_eq!(effects.persist, vec![StoreKey::Tileset]);
        assert!(effects.clipboard.unwrap().starts_with("#define NB_TILES 56\n"));
    }

    #[test]
    fn map_uses_selected_tile_index() {
        let mut ws = workspace();
        ws.select_tile(4, 2, false).unwrap();
        let effects = ws.drag(Point::new(10 + 40, 190 + 80)).unwrap();
        assert_eq!(ws.map.map().get(2, 1), Some(4 + 2 * 14));
        assert_eq!(effects.persist, vec![StoreKey::Map]);
        assert!(effects.clipboard.unwrap().contains("#define MAP_W 20\n#define MAP_H 18\n"));
    }

    #[test]
    fn drag_does_not_change_tile_selection() {
        let mut ws = workspace();
        let effects = ws.drag(Point::new(300, 20)).unwrap();
        assert!(effects.is_empty());
        assert_eq!(ws.palette.selected(), (0, 0));
    }

    #[test]
    fn clicks_outside_every_editor_are_no_ops() {
        let mut ws = workspace();
        let before = ws.clone();
        let effects = ws.click(Point::new(-1, -1)).unwrap();
        assert!(effects.is_empty());
        assert_eq!(ws.palette.bitmap(), before.palette.bitmap());
        assert_eq!(ws.map.map(), before.map.map());
        assert_eq!(ws.sprite.sprite(), before.sprite.sprite());
        assert_eq!(ws.colors.selected(), before.colors.selected());
    }

    #[test]
    fn reset_cascades() {
        let mut ws = workspace();
        ws.click(Point::new(15, 10 + 3 * 40)).unwrap();
        ws.select_tile(2, 2, true).unwrap();
        ws.click(Point::new(10, 190)).unwrap();
        let effects = ws.reset();
        assert_eq!(effects.persist, vec![StoreKey::Tileset, StoreKey::Map]);
        assert_eq!(ws.map.map().max_value(), 0);
        assert_eq!(ws.palette.bitmap().max_value(), 0);
        assert_eq!(ws.sprite.sprite().max_value(), 0);
        assert_eq!(ws.palette.selected(), (0, 0));
        assert_eq!(ws.colors.selected(), 0);
    }

    #[test]
    fn move_selection_stays_in_bounds() {
        let mut ws = workspace();
        assert!(!ws.move_selection(-1, 0).unwrap());
        assert!(ws.move_selection(1, 0).unwrap());
        assert_eq!(ws.palette.selected(), (1, 0));
        assert!(ws.move_selection(0, 3).unwrap());
        assert!(!ws.move_selection(0, 1).unwrap());
        assert!(ws.move_selection(-1, -3).unwrap());
        assert_eq!(ws.sprite.sprite(), &default_sprite().unwrap());
    }

    #[test]
    fn slot_index_is_row_major() {
        let mut ws = workspace();
        ws.select_slot(15).unwrap();
        assert_eq!(ws.palette.selected(), (1, 1));
        assert_eq!(ws.palette.selected_index(), 15);
        ws.select_slot(55).unwrap();
        assert_eq!(ws.palette.selected(), (13, 3));
        assert!(ws.select_slot(56).is_err());
        assert_eq!(ws.palette.selected(), (13, 3));
    }

    #[test]
    fn validation_rejects_foreign_grids() {
        let ws = workspace();
        assert!(ws.validate_tileset(ws.palette.bitmap()).is_ok());
        assert!(ws.validate_tileset(&Grid::new(8, 8)).is_err());
        let mut bad = Grid::new(112, 32);
        bad.set(0, 0, 4).unwrap();
        assert!(ws.validate_tileset(&bad).is_err());
        let mut map = Grid::new(20, 18);
        map.set(0, 0, 55).unwrap();
        assert!(ws.validate_map(&map).is_ok());
        map.set(0, 0, 56).unwrap();
        assert!(ws.validate_map(&map).is_err());
    }
}
