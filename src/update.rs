use iced::{
    keyboard::{self, key},
    Event, Point, Task,
};
use log::{error, info};

use crate::{
    editor::Effects,
    message::Message,
    persist,
    state::{Dialogue, EditorState},
};

/// Persists what `effects` asks for and hands any text to the clipboard.
/// Failures are logged; the edit itself has already happened.
fn apply_effects(state: &mut EditorState, effects: Effects) -> Task<Message> {
    for key in effects.persist {
        if let Err(e) = persist::save_key(state.store.as_mut(), &state.workspace, key) {
            error!("Error saving \"{}\": {}\n{}", key.as_str(), e, e.backtrace());
        }
    }
    match effects.clipboard {
        Some(text) => iced::clipboard::write(text),
        None => Task::none(),
    }
}

fn copy_source(source: anyhow::Result<String>) -> Task<Message> {
    match source {
        Ok(text) => iced::clipboard::write(text),
        Err(e) => {
            error!("Error encoding: {}\n{}", e, e.backtrace());
            Task::none()
        }
    }
}

fn move_selection(state: &mut EditorState, dx: isize, dy: isize) {
    if state.dialogue.is_some() {
        return;
    }
    if let Err(e) = state.workspace.move_selection(dx, dy) {
        error!("Error selecting tile: {}\n{}", e, e.backtrace());
    }
}

pub fn update(state: &mut EditorState, message: Message) -> Task<Message> {
    match message {
        Message::Event(event) => match event {
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::Escape),
                ..
            }) => {
                state.dialogue = None;
            }
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::ArrowRight),
                ..
            }) => move_selection(state, 1, 0),
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::ArrowLeft),
                ..
            }) => move_selection(state, -1, 0),
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::ArrowDown),
                ..
            }) => move_selection(state, 0, 1),
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(key::Named::ArrowUp),
                ..
            }) => move_selection(state, 0, -1),
            Event::Keyboard(keyboard::Event::KeyPressed { modified_key, .. }) => {
                if modified_key == keyboard::Key::Character("d".into()) {
                    if let Err(e) = state.workspace.sprite.dump() {
                        error!("Error dumping sprite: {}\n{}", e, e.backtrace());
                    }
                } else if modified_key == keyboard::Key::Character("r".into()) {
                    state.dialogue = Some(Dialogue::ConfirmReset);
                } else if modified_key == keyboard::Key::Character("i".into()) {
                    state.identify_tile = !state.identify_tile;
                } else if modified_key == keyboard::Key::Character("h".into()) {
                    state.dialogue = Some(Dialogue::Help);
                }
            }
            _ => {}
        },
        Message::Click(x, y) => {
            if state.dialogue.is_some() {
                return Task::none();
            }
            match state.workspace.click(Point::new(x, y)) {
                Ok(effects) => return apply_effects(state, effects),
                Err(e) => error!("Error handling click: {}\n{}", e, e.backtrace()),
            }
        }
        Message::Drag(x, y) => {
            if state.dialogue.is_some() {
                return Task::none();
            }
            match state.workspace.drag(Point::new(x, y)) {
                Ok(effects) => return apply_effects(state, effects),
                Err(e) => error!("Error handling drag: {}\n{}", e, e.backtrace()),
            }
        }
        Message::CopySprite => return copy_source(state.workspace.sprite_source()),
        Message::CopyTileset => return copy_source(state.workspace.tileset_source()),
        Message::CopyMap => return copy_source(state.workspace.map_source()),
        Message::ToggleIdentify => {
            state.identify_tile = !state.identify_tile;
        }
        Message::ResetDialogue => {
            state.dialogue = Some(Dialogue::ConfirmReset);
        }
        Message::Reset => {
            info!("Resetting tileset and map");
            state.dialogue = None;
            let effects = state.workspace.reset();
            return apply_effects(state, effects);
        }
        Message::HelpDialogue => {
            state.dialogue = Some(Dialogue::Help);
        }
        Message::HideModal => {
            state.dialogue = None;
        }
    }
    Task::none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::Layout,
        editor::Workspace,
        persist::{MemoryStore, Store},
        state::load_initial_workspace,
    };
    use anyhow::{bail, Result};

    struct FailingStore;

    impl Store for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            bail!("cannot read \"{}\"", key)
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<()> {
            bail!("cannot write \"{}\"", key)
        }
    }

    fn state() -> EditorState {
        EditorState {
            store: Box::new(MemoryStore::default()),
            workspace: Workspace::with_defaults(&Layout::default()).unwrap(),
            dialogue: None,
            identify_tile: false,
        }
    }

    #[test]
    fn map_click_persists_the_map() {
        let mut state = state();
        let _ = update(&mut state, Message::Click(10, 190));
        assert!(state.store.get("map").unwrap().is_some());
        assert!(state.store.get("data").unwrap().is_none());
    }

    #[test]
    fn clicks_are_ignored_while_a_dialogue_is_open() {
        let mut state = state();
        let _ = update(&mut state, Message::ResetDialogue);
        let _ = update(&mut state, Message::Click(75, 15));
        assert!(state.store.get("data").unwrap().is_none());
        let _ = update(&mut state, Message::Reset);
        assert!(state.dialogue.is_none());
        assert!(state.store.get("data").unwrap().is_some());
        assert_eq!(state.workspace.palette.bitmap().max_value(), 0);
    }

    #[test]
    fn storage_failures_keep_the_edit() {
        let mut state = state();
        state.store = Box::new(FailingStore);
        // Color 2, then sprite cell (0, 1).
        let _ = update(&mut state, Message::Click(15, 90));
        let _ = update(&mut state, Message::Click(95, 15));
        assert_eq!(state.workspace.colors.selected(), 2);
        assert_eq!(state.workspace.sprite.sprite().get(0, 1), Some(2));
        assert_eq!(state.workspace.palette.extract_tile(0, 0).unwrap().get(0, 1), Some(2));

        let ws = load_initial_workspace(&FailingStore).unwrap();
        assert_eq!(ws.palette.bitmap().width(), 112);
        let face = crate::editor::default_sprite().unwrap();
        assert_eq!(ws.palette.extract_tile(0, 0).unwrap(), face);
    }

    #[test]
    fn arrows_are_ignored_while_a_dialogue_is_open() {
        let mut state = state();
        let right = Message::Event(Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(key::Named::ArrowRight),
            modified_key: keyboard::Key::Named(key::Named::ArrowRight),
            physical_key: keyboard::key::Physical::Code(keyboard::key::Code::ArrowRight),
            location: keyboard::Location::Standard,
            modifiers: keyboard::Modifiers::empty(),
            text: None,
        }));
        let _ = update(&mut state, Message::HelpDialogue);
        let _ = update(&mut state, right.clone());
        assert_eq!(state.workspace.palette.selected(), (0, 0));
        let _ = update(&mut state, Message::HideModal);
        let _ = update(&mut state, right);
        assert_eq!(state.workspace.palette.selected(), (1, 0));
    }
}
