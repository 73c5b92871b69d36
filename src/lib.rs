pub mod common;
pub mod editor;
pub mod encode;
pub mod grid;
pub mod helpers;
pub mod message;
pub mod persist;
pub mod state;
pub mod update;
pub mod view;
