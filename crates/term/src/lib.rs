//! Terminal rendering for the typing game.
//!
//! The view paints a [`SessionSnapshot`](typing_toucan_core::SessionSnapshot) into a
//! plain framebuffer, and [`Screen`] flushes only the cells that changed since
//! the previous frame. No widget or layout library sits in between.

pub mod fb;
pub mod game_view;
pub mod screen;

pub use typing_toucan_core as core;
pub use typing_toucan_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{bird_column, GameView, MenuOverlay, Viewport};
pub use screen::{encode_diff_into, encode_full_into, Screen};
