use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    common::Layout,
    editor::Workspace,
    persist::{self, FileStore, Store},
};

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct GlobalConfig {
    #[serde(skip_serializing, skip_deserializing)]
    pub modified: bool,
    pub storage_dir: Option<PathBuf>,
}

pub enum Dialogue {
    Help,
    ConfirmReset,
}

pub struct EditorState {
    pub store: Box<dyn Store>,

    // Project data:
    pub workspace: Workspace,

    // Temporary editor state:
    pub dialogue: Option<Dialogue>,
    pub identify_tile: bool,
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "GBTileEditor")
        .context("Unable to open config directory.")
}

fn get_global_config_path() -> Result<PathBuf> {
    let project_dirs = project_dirs()?;
    Ok(project_dirs.config_dir().join("config.json"))
}

/// Storage directory: command line, then global config, then the platform data directory.
pub fn get_storage_dir(override_dir: Option<PathBuf>, config: &GlobalConfig) -> Result<PathBuf> {
    if let Some(dir) = override_dir.or_else(|| config.storage_dir.clone()) {
        return Ok(dir);
    }
    Ok(project_dirs()?.data_dir().to_owned())
}

/// Opens the durable store. With `remember`, a directory given on the command
/// line becomes the default for later runs.
pub fn open_store(storage_dir: Option<PathBuf>, remember: bool) -> Result<FileStore> {
    let global_config_path = get_global_config_path()?;
    let mut global_config = persist::load_global_config(&global_config_path).unwrap_or_else(|e| {
        warn!("Ignoring global config: {:#}", e);
        GlobalConfig::default()
    });

    if let Some(dir) = storage_dir.as_ref().filter(|_| remember) {
        if global_config.storage_dir.as_ref() != Some(dir) {
            global_config.storage_dir = Some(dir.clone());
            global_config.modified = true;
        }
    }
    if let Err(e) = persist::save_global_config(&global_config_path, &mut global_config) {
        error!("Error saving global config: {}\n{}", e, e.backtrace());
    }

    let store = FileStore::new(get_storage_dir(storage_dir, &global_config)?);
    info!("Using storage directory {}", store.dir().display());
    Ok(store)
}

/// The built-in dataset overlaid with whatever the store holds, with tile (0, 0)
/// loaded into the sprite editor.
pub fn load_initial_workspace(store: &dyn Store) -> Result<Workspace> {
    let mut workspace = Workspace::with_defaults(&Layout::default())?;
    persist::load_workspace(store, &mut workspace);
    workspace.select_tile(0, 0, true)?;
    Ok(workspace)
}

pub fn get_initial_state(storage_dir: Option<PathBuf>) -> Result<EditorState> {
    let store = open_store(storage_dir, true)?;
    let workspace = load_initial_workspace(&store)?;
    Ok(EditorState {
        store: Box::new(store),
        workspace,
        dialogue: None,
        identify_tile: false,
    })
}
