//! Mapping from terminal events to input events.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// What the host loop cares about.
///
/// Printable keys, space included, arrive as [`InputEvent::Char`]; the pause menu
/// treats a space as a confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Char(char),
    Escape,
    Up,
    Down,
    Confirm,
    /// Mouse click, the terminal's stand-in for a tap.
    Touch,
    Quit,
}

/// Map one key press. Releases and repeats-as-release are dropped.
pub fn map_key_event(key: KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if should_quit(key) {
        return Some(InputEvent::Quit);
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match key.code {
        KeyCode::Esc => Some(InputEvent::Escape),
        KeyCode::Up => Some(InputEvent::Up),
        KeyCode::Down => Some(InputEvent::Down),
        KeyCode::Enter => Some(InputEvent::Confirm),
        KeyCode::Char(c) => Some(InputEvent::Char(c)),
        _ => None,
    }
}

pub fn map_mouse_event(mouse: MouseEvent) -> Option<InputEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Touch),
        _ => None,
    }
}

pub fn map_event(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => map_key_event(*key),
        Event::Mouse(mouse) => map_mouse_event(*mouse),
        _ => None,
    }
}

/// Ctrl-C always quits. Every printable key is typeable, so no letter does.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
