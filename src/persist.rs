use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use hashbrown::HashMap;
use json_pretty_compact::PrettyCompactFormatter;
use log::{info, warn};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Serializer;

use crate::{
    editor::{StoreKey, Workspace},
    grid::Grid,
    state::GlobalConfig,
};

/// Durable string key/value storage.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        info!("Loading {}", path.display());
        let value =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key);
        info!("Saving {}", path.display());
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, value).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn to_json<T: Serialize>(data: &T) -> Result<String> {
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)?;
    Ok(String::from_utf8(data_bytes)?)
}

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let data_str = to_json(data)?;
    fs::create_dir_all(path.parent().context("invalid parent directory")?)?;
    fs::write(path, data_str)?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)?;
    Ok(data)
}

pub fn load_global_config(path: &Path) -> Result<GlobalConfig> {
    if !path.exists() {
        return Ok(GlobalConfig::default());
    }
    load_json(path)
}

pub fn save_global_config(path: &Path, config: &mut GlobalConfig) -> Result<()> {
    if config.modified {
        save_json(path, config)?;
        config.modified = false;
    }
    Ok(())
}

pub fn save_key(store: &mut dyn Store, workspace: &Workspace, key: StoreKey) -> Result<()> {
    let grid = match key {
        StoreKey::Tileset => workspace.palette.bitmap(),
        StoreKey::Map => workspace.map.map(),
    };
    store.set(key.as_str(), &to_json(grid)?)
}

fn load_grid(store: &dyn Store, key: StoreKey) -> Result<Option<Grid>> {
    let Some(value) = store.get(key.as_str())? else {
        return Ok(None);
    };
    let grid: Grid = serde_json::from_str(&value)
        .with_context(|| format!("parsing stored \"{}\"", key.as_str()))?;
    Ok(Some(grid))
}

fn stored_tileset(store: &dyn Store, workspace: &Workspace) -> Result<Option<Grid>> {
    let Some(bitmap) = load_grid(store, StoreKey::Tileset)? else {
        return Ok(None);
    };
    workspace.validate_tileset(&bitmap)?;
    Ok(Some(bitmap))
}

fn stored_map(store: &dyn Store, workspace: &Workspace) -> Result<Option<Grid>> {
    let Some(map) = load_grid(store, StoreKey::Map)? else {
        return Ok(None);
    };
    workspace.validate_map(&map)?;
    Ok(Some(map))
}

/// Replaces the workspace's tileset and map with the stored ones. A missing or
/// unusable entry keeps what the workspace already holds.
pub fn load_workspace(store: &dyn Store, workspace: &mut Workspace) {
    match stored_tileset(store, workspace).and_then(|g| match g {
        Some(bitmap) => workspace.palette.load_bitmap(bitmap).map(|_| true),
        None => Ok(false),
    }) {
        Ok(true) => {}
        Ok(false) => info!("No stored tileset, using the default."),
        Err(e) => warn!("Ignoring stored tileset: {:#}", e),
    }
    match stored_map(store, workspace).and_then(|g| match g {
        Some(map) => workspace.map.load_map(map).map(|_| true),
        None => Ok(false),
    }) {
        Ok(true) => {}
        Ok(false) => info!("No stored map, using the default."),
        Err(e) => warn!("Ignoring stored map: {:#}", e),
    }
}

/// Writes the tileset as an indexed PNG, one pixel per cell.
pub fn save_tileset_png(workspace: &Workspace, path: &Path) -> Result<()> {
    info!("Saving {}", path.display());
    let bitmap = workspace.palette.bitmap();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        bitmap.width() as u32,
        bitmap.height() as u32,
    );
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    let palette: Vec<u8> = workspace.colors.colors().iter().flatten().copied().collect();
    encoder.set_palette(palette);
    let data: Vec<u8> = bitmap.rows().flatten().copied().collect();
    encoder.write_header()?.write_image_data(&data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::{Layout, DEFAULT_COLORS},
        editor::default_sprite,
    };

    fn defaults() -> Workspace {
        Workspace::with_defaults(&Layout::default()).unwrap()
    }

    #[test]
    fn unparsable_values_fall_back_to_defaults() {
        let mut store = MemoryStore::default();
        store.set("data", "not json").unwrap();
        store.set("map", "[[1,2],[3]]").unwrap();
        let mut ws = defaults();
        load_workspace(&store, &mut ws);
        assert_eq!(ws.palette.bitmap().width(), 14 * 8);
        assert_eq!(ws.palette.bitmap().height(), 4 * 8);
        assert_eq!(ws.palette.extract_tile(0, 0).unwrap(), default_sprite().unwrap());
        assert_eq!(ws.map.map().width(), 20);
        assert_eq!(ws.map.map().height(), 18);
        assert_eq!(ws.map.map().max_value(), 0);
    }

    #[test]
    fn wrongly_sized_values_fall_back_to_defaults() {
        let mut store = MemoryStore::default();
        store.set("data", "[[0,1],[1,0]]").unwrap();
        store.set("map", &to_json(&Grid::new(20, 17)).unwrap()).unwrap();
        let mut ws = defaults();
        load_workspace(&store, &mut ws);
        assert_eq!(ws.palette.bitmap().width(), 112);
        assert_eq!(ws.map.map().height(), 18);
    }

    #[test]
    fn saved_grids_load_back() {
        let mut store = MemoryStore::default();
        let mut ws = defaults();
        ws.select_tile(1, 1, true).unwrap();
        ws.palette.write_tile(&default_sprite().unwrap()).unwrap();
        ws.map.load_map({
            let mut m = Grid::new(20, 18);
            m.set(17, 19, 15).unwrap();
            m
        })
        .unwrap();
        save_key(&mut store, &ws, StoreKey::Tileset).unwrap();
        save_key(&mut store, &ws, StoreKey::Map).unwrap();

        let mut fresh = Workspace::new(&Layout::default());
        load_workspace(&store, &mut fresh);
        assert_eq!(fresh.palette.bitmap(), ws.palette.bitmap());
        assert_eq!(fresh.map.map().get(17, 19), Some(15));
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get("map").unwrap(), None);
        store.set("map", "[[0]]").unwrap();
        assert_eq!(store.get("map").unwrap().as_deref(), Some("[[0]]"));
        assert!(dir.path().join("nested").join("map.json").exists());
    }

    #[test]
    fn global_config_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = load_global_config(&path).unwrap();
        assert!(config.storage_dir.is_none());

        let mut config = GlobalConfig {
            modified: true,
            storage_dir: Some(dir.path().join("store")),
        };
        save_global_config(&path, &mut config).unwrap();
        assert!(!config.modified);
        let loaded = load_global_config(&path).unwrap();
        assert_eq!(loaded.storage_dir, Some(dir.path().join("store")));
    }

    #[test]
    fn tileset_png_is_indexed_with_the_color_palette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tileset.png");
        let mut ws = defaults();
        ws.select_slot(55).unwrap();
        let mut corner = Grid::new(8, 8);
        corner.set(7, 7, 3).unwrap();
        ws.palette.write_tile(&corner).unwrap();
        save_tileset_png(&ws, &path).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let mut reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (112, 32));
        assert_eq!(info.color_type, png::ColorType::Indexed);
        assert_eq!(info.bit_depth, png::BitDepth::Eight);
        let expected_palette: Vec<u8> = DEFAULT_COLORS.iter().flatten().copied().collect();
        assert_eq!(info.palette.as_deref(), Some(expected_palette.as_slice()));

        let mut buf = vec![0; reader.output_buffer_size()];
        let frame = reader.next_frame(&mut buf).unwrap();
        let expected: Vec<u8> = ws.palette.bitmap().rows().flatten().copied().collect();
        assert_eq!(&buf[..frame.buffer_size()], expected.as_slice());
        assert_eq!(expected[31 * 112 + 111], 3);
    }
}
