//! Pause menu state machine.
//!
//! Three pages: the main page, the audio page and the exit confirmation. The
//! menu owns only navigation state; every effect on the session or the
//! preferences comes back to the host as a [`MenuAction`].

use arrayvec::ArrayVec;

use crate::map::InputEvent;
use crate::types::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPage {
    Main,
    Audio,
    ExitConfirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Resume,
    Difficulty,
    Capitals,
    Audio,
    MainMenu,
    Sound,
    Music,
    Back,
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Escape during play opened the menu.
    Pause,
    Resume,
    CycleDifficulty,
    ToggleCapitals,
    ToggleSound,
    ToggleMusic,
    /// Exit confirmed: leave the session.
    ExitToMainMenu,
}

/// Outcome of one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuResponse {
    pub action: Option<MenuAction>,
    /// Play the menu-select cue.
    pub select_cue: bool,
    /// The menu handled the event; it must not reach the session.
    pub consumed: bool,
}

impl MenuResponse {
    fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::default()
        }
    }

    fn action(action: MenuAction) -> Self {
        Self {
            action: Some(action),
            consumed: true,
            select_cue: false,
        }
    }

    fn selected(action: Option<MenuAction>) -> Self {
        Self {
            action,
            consumed: true,
            select_cue: true,
        }
    }
}

/// Current values shown next to the toggle items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuStatus {
    pub difficulty: Difficulty,
    pub capitals: bool,
    pub sound: bool,
    pub music: bool,
}

const MAIN_ITEMS: [Item; 5] = [
    Item::Resume,
    Item::Difficulty,
    Item::Capitals,
    Item::Audio,
    Item::MainMenu,
];
const AUDIO_ITEMS: [Item; 3] = [Item::Sound, Item::Music, Item::Back];
const EXIT_ITEMS: [Item; 2] = [Item::Yes, Item::No];

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauseMenu {
    page: Option<MenuPage>,
    selected: usize,
    /// Only normal mode offers the capitals toggle.
    show_capitals: bool,
}

impl PauseMenu {
    pub fn new(show_capitals: bool) -> Self {
        Self {
            page: None,
            selected: 0,
            show_capitals,
        }
    }

    pub fn is_open(&self) -> bool {
        self.page.is_some()
    }

    pub fn page(&self) -> Option<MenuPage> {
        self.page
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn items(&self) -> ArrayVec<Item, 5> {
        match self.page {
            None => ArrayVec::new(),
            Some(MenuPage::Main) => MAIN_ITEMS
                .iter()
                .copied()
                .filter(|item| *item != Item::Capitals || self.show_capitals)
                .collect(),
            Some(MenuPage::Audio) => AUDIO_ITEMS.iter().copied().collect(),
            Some(MenuPage::ExitConfirm) => EXIT_ITEMS.iter().copied().collect(),
        }
    }

    fn index_of(&self, item: Item) -> usize {
        self.items().iter().position(|i| *i == item).unwrap_or(0)
    }

    fn goto(&mut self, page: Option<MenuPage>, selected: usize) {
        self.page = page;
        self.selected = selected;
    }

    /// Open on the main page, e.g. when the terminal loses focus.
    pub fn open(&mut self) {
        self.goto(Some(MenuPage::Main), 0);
    }

    pub fn close(&mut self) {
        self.goto(None, 0);
    }

    pub fn title(&self) -> &'static str {
        match self.page {
            Some(MenuPage::ExitConfirm) => "Exit to main menu. Are you sure?",
            Some(MenuPage::Audio) => "AUDIO",
            _ => "PAUSED",
        }
    }

    /// Labels for the current page, with live values filled in.
    pub fn labels(&self, status: &MenuStatus) -> ArrayVec<String, 5> {
        self.items()
            .iter()
            .map(|item| match item {
                Item::Resume => "Resume".to_string(),
                Item::Difficulty => format!("Difficulty: {}", status.difficulty.as_str()),
                Item::Capitals => format!("Capitals: {}", on_off(status.capitals)),
                Item::Audio => "Audio".to_string(),
                Item::MainMenu => "Main Menu".to_string(),
                Item::Sound => format!("Sound: {}", on_off(status.sound)),
                Item::Music => format!("Music: {}", on_off(status.music)),
                Item::Back => "Back".to_string(),
                Item::Yes => "Yes".to_string(),
                Item::No => "No".to_string(),
            })
            .collect()
    }

    /// Feed one input event.
    ///
    /// While closed only Escape is consumed (it opens the menu). While open
    /// every event is consumed so nothing leaks into the session.
    pub fn handle(&mut self, event: InputEvent) -> MenuResponse {
        let Some(page) = self.page else {
            if event == InputEvent::Escape {
                self.open();
                return MenuResponse::action(MenuAction::Pause);
            }
            return MenuResponse::default();
        };

        let len = self.items().len();
        match event {
            InputEvent::Escape => match page {
                MenuPage::Audio | MenuPage::ExitConfirm => {
                    self.goto(Some(MenuPage::Main), 0);
                    MenuResponse::consumed()
                }
                MenuPage::Main => {
                    self.close();
                    MenuResponse::action(MenuAction::Resume)
                }
            },
            InputEvent::Up => {
                self.selected = if self.selected == 0 {
                    len.saturating_sub(1)
                } else {
                    self.selected - 1
                };
                MenuResponse::consumed()
            }
            InputEvent::Down => {
                self.selected = if self.selected + 1 >= len {
                    0
                } else {
                    self.selected + 1
                };
                MenuResponse::consumed()
            }
            InputEvent::Confirm | InputEvent::Char(' ') | InputEvent::Touch => self.select(),
            InputEvent::Char(_) | InputEvent::Quit => MenuResponse::consumed(),
        }
    }

    fn select(&mut self) -> MenuResponse {
        let Some(item) = self.items().get(self.selected).copied() else {
            return MenuResponse::consumed();
        };

        let action = match item {
            Item::Resume => {
                self.close();
                Some(MenuAction::Resume)
            }
            Item::Difficulty => Some(MenuAction::CycleDifficulty),
            Item::Capitals => Some(MenuAction::ToggleCapitals),
            Item::Audio => {
                self.goto(Some(MenuPage::Audio), 0);
                None
            }
            Item::MainMenu => {
                // Default to "No".
                self.goto(Some(MenuPage::ExitConfirm), 1);
                None
            }
            Item::Sound => Some(MenuAction::ToggleSound),
            Item::Music => Some(MenuAction::ToggleMusic),
            Item::Back => {
                self.goto(Some(MenuPage::Main), 0);
                self.selected = self.index_of(Item::Audio);
                None
            }
            Item::Yes => {
                self.close();
                Some(MenuAction::ExitToMainMenu)
            }
            Item::No => {
                self.goto(Some(MenuPage::Main), 0);
                self.selected = self.index_of(Item::MainMenu);
                None
            }
        };
        MenuResponse::selected(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> MenuStatus {
        MenuStatus {
            difficulty: Difficulty::Hard,
            capitals: true,
            sound: true,
            music: false,
        }
    }

    #[test]
    fn test_escape_opens_and_closes() {
        let mut menu = PauseMenu::new(true);
        assert!(!menu.is_open());
        assert_eq!(menu.handle(InputEvent::Char('a')), MenuResponse::default());

        let r = menu.handle(InputEvent::Escape);
        assert_eq!(r.action, Some(MenuAction::Pause));
        assert_eq!(menu.page(), Some(MenuPage::Main));

        let r = menu.handle(InputEvent::Escape);
        assert_eq!(r.action, Some(MenuAction::Resume));
        assert!(!menu.is_open());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut menu = PauseMenu::new(true);
        menu.open();
        menu.handle(InputEvent::Up);
        assert_eq!(menu.selected(), 4);
        menu.handle(InputEvent::Down);
        assert_eq!(menu.selected(), 0);
    }

    #[test]
    fn test_capitals_only_when_offered() {
        let mut menu = PauseMenu::new(false);
        menu.open();
        let labels = menu.labels(&status());
        assert_eq!(labels.len(), 4);
        assert!(labels.iter().all(|l| !l.starts_with("Capitals")));

        let mut menu = PauseMenu::new(true);
        menu.open();
        let labels = menu.labels(&status());
        assert_eq!(labels[1], "Difficulty: HARD");
        assert_eq!(labels[2], "Capitals: ON");
    }

    #[test]
    fn test_audio_page_and_back() {
        let mut menu = PauseMenu::new(true);
        menu.open();
        menu.handle(InputEvent::Down);
        menu.handle(InputEvent::Down);
        menu.handle(InputEvent::Down);
        let r = menu.handle(InputEvent::Confirm);
        assert!(r.select_cue);
        assert_eq!(r.action, None);
        assert_eq!(menu.page(), Some(MenuPage::Audio));
        assert_eq!(menu.labels(&status())[1], "Music: OFF");

        let r = menu.handle(InputEvent::Char(' '));
        assert_eq!(r.action, Some(MenuAction::ToggleSound));

        menu.handle(InputEvent::Up);
        menu.handle(InputEvent::Confirm);
        assert_eq!(menu.page(), Some(MenuPage::Main));
        assert_eq!(menu.selected(), 3);
    }

    #[test]
    fn test_exit_confirm_defaults_to_no() {
        let mut menu = PauseMenu::new(false);
        menu.open();
        menu.handle(InputEvent::Up);
        let r = menu.handle(InputEvent::Confirm);
        assert_eq!(r.action, None);
        assert_eq!(menu.page(), Some(MenuPage::ExitConfirm));
        assert_eq!(menu.selected(), 1);
        assert_eq!(menu.title(), "Exit to main menu. Are you sure?");

        menu.handle(InputEvent::Confirm);
        assert_eq!(menu.page(), Some(MenuPage::Main));
        assert_eq!(menu.selected(), 3);

        menu.handle(InputEvent::Confirm);
        menu.handle(InputEvent::Up);
        let r = menu.handle(InputEvent::Confirm);
        assert_eq!(r.action, Some(MenuAction::ExitToMainMenu));
        assert!(!menu.is_open());
    }

    #[test]
    fn test_open_menu_swallows_typing() {
        let mut menu = PauseMenu::new(true);
        menu.open();
        let r = menu.handle(InputEvent::Char('x'));
        assert!(r.consumed);
        assert_eq!(r.action, None);
        assert!(!r.select_cue);
    }

    #[test]
    fn test_resume_item() {
        let mut menu = PauseMenu::new(true);
        menu.open();
        let r = menu.handle(InputEvent::Confirm);
        assert_eq!(r.action, Some(MenuAction::Resume));
        assert!(r.select_cue);
        assert!(!menu.is_open());
    }
}
