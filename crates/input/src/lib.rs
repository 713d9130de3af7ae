//! Terminal input (session-facing).
//!
//! Independent of any renderer. Maps `crossterm` key and mouse events into
//! [`InputEvent`]s and runs the pause menu, which turns navigation events into
//! [`MenuAction`]s for the host to apply to the session.

pub mod map;
pub mod pause_menu;

pub use typing_toucan_types as types;

pub use map::{map_event, map_key_event, map_mouse_event, should_quit, InputEvent};
pub use pause_menu::{MenuAction, MenuPage, MenuResponse, MenuStatus, PauseMenu};
