use std::sync::Arc;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};

use typing_toucan::core::{
    FixedPoolSource, MemoryStore, ProgressiveSource, ScoreStore, Session, SessionConfig,
};
use typing_toucan::input::{map_event, InputEvent, MenuPage};
use typing_toucan::types::{Difficulty, GameMode, Phase, Preference};
use typing_toucan::{App, Flow};

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    })
}

fn click() -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 3,
        row: 4,
        modifiers: KeyModifiers::NONE,
    })
}

fn feed(app: &mut App, event: Event) -> Flow {
    match map_event(&event) {
        Some(input) => app.handle(input),
        None => Flow::Continue,
    }
}

fn normal_app(store: Arc<MemoryStore>) -> App {
    let session = Session::new(
        SessionConfig::default(),
        Box::new(ProgressiveSource::new(2)),
        store.clone(),
    )
    .unwrap();
    App::new(session, store)
}

#[test]
fn keys_drive_a_whole_run() {
    let store = Arc::new(MemoryStore::new());
    let mut app = normal_app(store);
    assert_eq!(feed(&mut app, key(KeyCode::Char('a'))), Flow::Continue);
    assert_eq!(app.session().phase(), Phase::Playing);

    feed(&mut app, key(KeyCode::Esc));
    assert_eq!(app.menu().page(), Some(MenuPage::Main));
    assert_eq!(app.session().phase(), Phase::Paused);

    // Space selects the highlighted item, here "Resume".
    feed(&mut app, key(KeyCode::Char(' ')));
    assert!(!app.menu().is_open());
    assert_eq!(app.session().phase(), Phase::Playing);

    let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(feed(&mut app, ctrl_c), Flow::Exit);
}

#[test]
fn click_starts_the_run() {
    let mut app = normal_app(Arc::new(MemoryStore::new()));
    feed(&mut app, click());
    assert_eq!(app.session().phase(), Phase::Playing);
}

#[test]
fn releases_and_modified_keys_are_ignored() {
    let mut app = normal_app(Arc::new(MemoryStore::new()));
    let release = Event::Key(KeyEvent {
        code: KeyCode::Char('a'),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    });
    feed(&mut app, release);
    let alt = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::ALT));
    feed(&mut app, alt);
    assert_eq!(app.session().phase(), Phase::NotStarted);
    assert_eq!(map_event(&Event::FocusGained), None);
}

#[test]
fn capitals_toggle_is_saved() {
    let store = Arc::new(MemoryStore::new());
    let mut app = normal_app(store.clone());
    feed(&mut app, key(KeyCode::Esc));
    feed(&mut app, key(KeyCode::Down));
    feed(&mut app, key(KeyCode::Down));
    feed(&mut app, key(KeyCode::Enter));
    assert!(app.session().capitals_enabled());
    assert!(store.preference(Preference::CapitalsEnabled));
}

#[test]
fn music_toggle_reaches_the_store() {
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(
        SessionConfig::new(GameMode::CustomPractice, Difficulty::Easy),
        Box::new(FixedPoolSource::new(['x'], 1).unwrap()),
        store.clone(),
    )
    .unwrap();
    let mut app = App::new(session, store.clone());

    feed(&mut app, key(KeyCode::Esc));
    // Resume, Difficulty, Audio, Main Menu: no capitals item outside normal mode.
    feed(&mut app, key(KeyCode::Down));
    feed(&mut app, key(KeyCode::Down));
    feed(&mut app, key(KeyCode::Enter));
    assert_eq!(app.menu().page(), Some(MenuPage::Audio));
    feed(&mut app, key(KeyCode::Down));
    feed(&mut app, key(KeyCode::Enter));
    assert!(!store.preference(Preference::MusicEnabled));

    // Escape backs out to the main page, then resumes.
    feed(&mut app, key(KeyCode::Esc));
    assert_eq!(app.menu().page(), Some(MenuPage::Main));
    feed(&mut app, key(KeyCode::Esc));
    assert!(!app.menu().is_open());
}

#[test]
fn focus_loss_pauses_a_running_game() {
    let mut app = normal_app(Arc::new(MemoryStore::new()));
    app.focus_lost();
    assert!(!app.menu().is_open());

    app.handle(InputEvent::Char('a'));
    app.focus_lost();
    assert!(app.menu().is_open());
    assert_eq!(app.session().phase(), Phase::Paused);
}

#[test]
fn victory_waits_for_enter() {
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(
        SessionConfig::default().with_victory_level(Some(2)),
        Box::new(ProgressiveSource::new(2)),
        store.clone(),
    )
    .unwrap();
    let mut app = App::new(session, store);
    app.handle(InputEvent::Char('a'));
    for _ in 0..5 {
        let session = app.session_mut();
        let x = session.bird().left() + 1.0;
        let y = session.bird().y;
        session.obstacles_mut().spawn(x, y, false, 0);
        app.tick(1.0 / 60.0);
    }
    assert_eq!(app.session().phase(), Phase::Victory);

    assert_eq!(feed(&mut app, key(KeyCode::Char('s'))), Flow::Continue);
    assert_eq!(feed(&mut app, key(KeyCode::Esc)), Flow::Continue);
    assert!(!app.menu().is_open());
    assert_eq!(feed(&mut app, key(KeyCode::Enter)), Flow::Exit);
}
