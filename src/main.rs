use std::path::PathBuf;

use clap::Parser;
use gb_tile_editor::{
    common::{CANVAS_HEIGHT, CANVAS_WIDTH},
    message::Message,
    state::{get_initial_state, EditorState},
    update, view,
};
use iced::{Size, Subscription, Task, Theme};
use log::error;

#[derive(Parser, Debug)]
struct Args {
    /// Directory holding the stored tileset and map (remembered for later runs)
    #[arg(long)]
    storage_dir: Option<PathBuf>,
}

fn theme(_state: &EditorState) -> Theme {
    match dark_light::detect().unwrap_or(dark_light::Mode::Unspecified) {
        dark_light::Mode::Light => Theme::Light,
        dark_light::Mode::Dark | dark_light::Mode::Unspecified => Theme::Dark,
    }
}

fn subscription(_state: &EditorState) -> Subscription<Message> {
    iced::event::listen().map(Message::Event)
}

pub fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let state = match get_initial_state(args.storage_dir) {
        Ok(state) => state,
        Err(e) => {
            error!("Error loading initial state: {}\n{}", e, e.backtrace());
            std::process::exit(1);
        }
    };

    iced::application("GB Tile Editor", update::update, view::view)
        .font(iced_fonts::REQUIRED_FONT_BYTES)
        .font(iced_fonts::BOOTSTRAP_FONT_BYTES)
        .theme(theme)
        .subscription(subscription)
        .window_size(Size::new(CANVAS_WIDTH + 170.0, CANVAS_HEIGHT))
        .run_with(move || (state, Task::none()))
}
