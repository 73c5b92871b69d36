use gb_tile_editor::{
    common::{Layout, DEFAULT_COLORS},
    editor::{StoreKey, Workspace},
    encode::{decode_sprite, encode_sprite},
    grid::Grid,
    persist::{self, FileStore, Store},
    state::load_initial_workspace,
};
use iced::Point;

fn layout() -> Layout {
    Layout::default()
}

// Canvas pixel at the center of sprite cell (row, col).
fn sprite_cell(row: i32, col: i32) -> Point<i32> {
    let l = layout();
    Point::new(
        l.sprite_origin.x + col * l.sprite_cell + l.sprite_cell / 2,
        l.sprite_origin.y + row * l.sprite_cell + l.sprite_cell / 2,
    )
}

fn color_swatch(idx: i32) -> Point<i32> {
    let l = layout();
    Point::new(l.color_origin.x + 1, l.color_origin.y + idx * l.color_cell + 1)
}

fn palette_tile(x: i32, y: i32) -> Point<i32> {
    let l = layout();
    let tile = l.palette_cell * 8;
    Point::new(l.palette_origin.x + x * tile + 1, l.palette_origin.y + y * tile + 1)
}

fn map_cell(x: i32, y: i32) -> Point<i32> {
    let l = layout();
    let tile = l.palette_cell * 8;
    Point::new(l.map_origin.x + x * tile + 1, l.map_origin.y + y * tile + 1)
}

#[test]
fn painting_color_two_encodes_into_the_high_plane() {
    assert_eq!(DEFAULT_COLORS[2], [48, 98, 48]);
    let mut ws = Workspace::new(&layout());
    ws.click(color_swatch(2)).unwrap();
    let effects = ws.click(sprite_cell(0, 0)).unwrap();

    let planes = encode_sprite(ws.sprite.sprite()).unwrap();
    assert_eq!(planes.low.len(), 8);
    assert_eq!(planes.high.len(), 8);
    assert!(planes.low.iter().all(|&b| b == 0));
    assert_eq!(planes.high[7], 0b1000_0000);
    assert!(planes.high[..7].iter().all(|&b| b == 0));
    assert!(effects.clipboard.unwrap().ends_with("    0x00, 0x80,\n};\n"));
}

#[test]
fn sprites_survive_encoding() {
    let mut ws = Workspace::new(&layout());
    for (i, (row, col)) in [(0, 0), (1, 7), (3, 4), (7, 7), (7, 0), (5, 2)].iter().enumerate() {
        ws.click(color_swatch(i as i32 % 4)).unwrap();
        ws.drag(sprite_cell(*row, *col)).unwrap();
    }
    let sprite = ws.sprite.sprite().clone();
    let planes = encode_sprite(&sprite).unwrap();
    assert_eq!(decode_sprite(&planes, 8).unwrap(), sprite);
}

#[test]
fn full_editing_session_persists_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    let mut ws = load_initial_workspace(&store).unwrap();

    // Pick tile (2, 1), paint its corner, then stamp it on the map.
    let effects = ws.click(palette_tile(2, 1)).unwrap();
    assert_eq!(effects.persist, vec![StoreKey::Tileset]);
    ws.click(color_swatch(3)).unwrap();
    ws.click(sprite_cell(7, 7)).unwrap();
    let effects = ws.click(map_cell(19, 17)).unwrap();
    assert_eq!(effects.persist, vec![StoreKey::Map]);
    let text = effects.clipboard.unwrap();
    assert!(text.contains("#define NB_TILES 56"));
    assert!(text.contains("#define MAP_W 20"));
    assert!(text.contains("#define MAP_H 18"));
    assert!(text.trim_end().ends_with("0x00, 0x10,\n};"));

    persist::save_key(&mut store, &ws, StoreKey::Tileset).unwrap();
    persist::save_key(&mut store, &ws, StoreKey::Map).unwrap();

    let reloaded = load_initial_workspace(&store).unwrap();
    assert_eq!(reloaded.palette.bitmap(), ws.palette.bitmap());
    assert_eq!(reloaded.map.map(), ws.map.map());
    assert_eq!(reloaded.palette.extract_tile(2, 1).unwrap().get(7, 7), Some(3));
    assert_eq!(reloaded.palette.selected(), (0, 0));
}

#[test]
fn garbage_in_the_store_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    store.set("data", "{oops").unwrap();
    store.set("map", "[[99]]").unwrap();
    let ws = load_initial_workspace(&store).unwrap();
    assert_eq!(ws.palette.bitmap().width(), 14 * 8);
    assert_eq!(ws.palette.bitmap().height(), 4 * 8);
    assert_eq!(ws.map.map(), &Grid::new(20, 18));
    assert_eq!(ws.sprite.sprite().get(0, 1), Some(3));
}

#[test]
fn clicks_outside_the_palette_change_nothing() {
    let mut ws = Workspace::with_defaults(&layout()).unwrap();
    let before = ws.palette.bitmap().clone();
    ws.select_tile(3, 3, true).unwrap();
    let effects = ws.click(Point::new(-1, -1)).unwrap();
    assert!(effects.is_empty());
    assert_eq!(ws.palette.bitmap(), &before);
    assert_eq!(ws.palette.selected(), (3, 3));
}
