use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use gb_tile_editor::{persist, state};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Target {
    Sprite,
    Tileset,
    Map,
}

/// Print the stored tileset or map as C source
#[derive(Parser, Debug)]
struct Args {
    #[arg(value_enum, default_value = "map")]
    target: Target,
    /// Directory holding the stored tileset and map
    #[arg(long)]
    storage_dir: Option<PathBuf>,
    /// Tile slot to print with the `sprite` target, as a row-major index
    #[arg(long, default_value_t = 0)]
    tile: usize,
    /// Also write the tileset as an indexed PNG, one pixel per cell
    #[arg(long)]
    png: Option<PathBuf>,
}

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let store = state::open_store(args.storage_dir, false)?;
    let mut workspace = state::load_initial_workspace(&store)?;

    let source = match args.target {
        Target::Sprite => {
            workspace.select_slot(args.tile)?;
            workspace.sprite_source()?
        }
        Target::Tileset => workspace.tileset_source()?,
        Target::Map => workspace.map_source()?,
    };
    print!("{}", source);

    if let Some(path) = &args.png {
        persist::save_tileset_png(&workspace, path)?;
    }
    Ok(())
}
