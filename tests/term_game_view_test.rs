use std::sync::Arc;

use typing_toucan::core::{
    FixedPoolSource, MemoryStore, Passage, PassageOrder, PassageSource, ProgressiveSource,
    Session, SessionConfig, SessionSnapshot,
};
use typing_toucan::term::{bird_column, FrameBuffer, GameView, MenuOverlay, Viewport};
use typing_toucan::types::{Difficulty, GameMode, Phase};

fn screen_text(fb: &FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        all.push_str(&fb.row_text(y));
        all.push('\n');
    }
    all
}

fn normal_snapshot() -> SessionSnapshot {
    let session = Session::new(
        SessionConfig::default(),
        Box::new(ProgressiveSource::new(1)),
        Arc::new(MemoryStore::new()),
    )
    .unwrap();
    session.snapshot()
}

#[test]
fn ready_screen_prompts_for_the_first_key() {
    let snap = normal_snapshot();
    let mut fb = FrameBuffer::new(0, 0);
    // The prompt blinks; at time zero it is shown.
    GameView::new().render_into(&snap, None, Viewport::new(80, 30), &mut fb);
    let text = screen_text(&fb);
    assert!(text.contains("TYPE 'a' TO START"));
    assert!(text.contains("ESC: MENU"));
    assert!(text.contains("HIGH 1"));
    assert!(text.contains("SCORE 0"));
    assert!(text.contains("LEVEL 1"));
}

#[test]
fn queue_is_centered_with_the_head_highlighted() {
    let snap = normal_snapshot();
    let fb = GameView::new().render(&snap, None, Viewport::new(80, 30));
    let row = fb.row_text(30 / 4);
    assert!(row.contains("a   a   a"));

    let head_x = row.find('a').unwrap() as u16;
    let head = fb.get(head_x, 30 / 4).unwrap();
    let next = fb.get(head_x + 4, 30 / 4).unwrap();
    assert!(head.style.bold);
    assert_ne!(head.style.fg, next.style.fg);
}

#[test]
fn ground_fills_the_bottom_rows() {
    let snap = normal_snapshot();
    let fb = GameView::new().render(&snap, None, Viewport::new(80, 30));
    // 60 of 600 world units is the bottom three rows.
    let cell = fb.get(79, 28).unwrap();
    let sky = fb.get(79, 10).unwrap();
    assert_ne!(cell.style.bg, sky.style.bg);
    assert_eq!(fb.get(79, 27).unwrap().ch, '▀');
}

#[test]
fn obstacles_scroll_into_view() {
    let mut session = Session::new(
        SessionConfig::new(GameMode::Normal { start_level: 1 }, Difficulty::Normal),
        Box::new(ProgressiveSource::new(1)),
        Arc::new(MemoryStore::new()),
    )
    .unwrap();
    session.type_char('a');
    session.obstacles_mut().spawn(600.0, 300.0, false, 0);
    let snap = session.snapshot();
    assert_eq!(snap.obstacles.len(), 1);

    let fb = GameView::new().render(&snap, None, Viewport::new(80, 30));
    // Column 62 is inside the obstacle; row 3 is above the gap, row 24 below it.
    let top = fb.get(62, 3).unwrap();
    let bottom = fb.get(62, 24).unwrap();
    let gap = fb.get(62, 15).unwrap();
    assert_eq!(top.style.bg, bottom.style.bg);
    assert_ne!(gap.style.bg, top.style.bg);
}

#[test]
fn bird_sits_at_its_column() {
    let snap = normal_snapshot();
    let fb = GameView::new().render(&snap, None, Viewport::new(120, 40));
    let col = bird_column(120);
    let found = (0..fb.height()).any(|y| fb.get(col + 1, y).map(|c| c.ch) == Some('▶'));
    assert!(found);
}

#[test]
fn pause_menu_overlay_marks_selection() {
    let mut snap = normal_snapshot();
    snap.phase = Phase::Paused;
    let items = vec!["Resume".to_string(), "Difficulty: NORMAL".to_string()];
    let overlay = MenuOverlay {
        title: "PAUSED",
        items: &items,
        selected: 1,
    };
    let fb = GameView::new().render(&snap, Some(&overlay), Viewport::new(80, 30));
    let text = screen_text(&fb);
    assert!(text.contains("PAUSED"));
    assert!(text.contains("Resume"));
    assert!(text.contains("> Difficulty: NORMAL <"));
    assert!(!text.contains("> Resume <"));
}

#[test]
fn passage_lines_replace_the_queue() {
    let source = PassageSource::new(
        vec![Passage::new("one two three four five").with_attribution("someone")],
        PassageOrder::Sequential,
        1,
    )
    .unwrap();
    let mut session = Session::new(
        SessionConfig::new(GameMode::TextPractice, Difficulty::Easy),
        Box::new(source),
        Arc::new(MemoryStore::new()),
    )
    .unwrap();
    session.type_char('o');

    let fb = GameView::new().render(&session.snapshot(), None, Viewport::new(80, 30));
    let text = screen_text(&fb);
    assert!(text.contains("one two three"));
    assert!(text.contains("four five"));
    assert!(text.contains("- someone"));
    assert!(text.contains("STREAK 1"));
    assert!(!text.contains("o   n   e"));
}

#[test]
fn victory_overlay() {
    let mut snap = normal_snapshot();
    snap.phase = Phase::Victory;
    snap.level = 12;
    let fb = GameView::new().render(&snap, None, Viewport::new(80, 30));
    let text = screen_text(&fb);
    assert!(text.contains("VICTORY!"));
    assert!(text.contains("LEVEL 12 REACHED"));
    assert!(text.contains("PRESS ENTER"));
}

#[test]
fn level_up_banner_names_the_new_key() {
    let mut snap = normal_snapshot();
    snap.flash_timer = 0.5;
    snap.unlock_label = "s".to_string();
    let fb = GameView::new().render(&snap, None, Viewport::new(80, 30));
    assert!(screen_text(&fb).contains("NEW KEY s"));

    snap.unlock_label = "MAX".to_string();
    let fb = GameView::new().render(&snap, None, Viewport::new(80, 30));
    assert!(screen_text(&fb).contains("ALL KEYS UNLOCKED"));
}

#[test]
fn arcade_hud_shows_level_and_streak() {
    let mut session = Session::new(
        SessionConfig::new(GameMode::Arcade, Difficulty::Normal),
        Box::new(FixedPoolSource::new(['q'], 1).unwrap()),
        Arc::new(MemoryStore::new()),
    )
    .unwrap();
    session.type_char('q');
    session.type_char('q');
    let fb = GameView::new().render(&session.snapshot(), None, Viewport::new(80, 30));
    assert!(screen_text(&fb).contains("LEVEL 1  STREAK 2"));
}

#[test]
fn resizing_reuses_the_buffer() {
    let snap = normal_snapshot();
    let view = GameView::new();
    let mut fb = FrameBuffer::new(0, 0);
    view.render_into(&snap, None, Viewport::new(100, 40), &mut fb);
    view.render_into(&snap, None, Viewport::new(60, 20), &mut fb);
    assert_eq!((fb.width(), fb.height()), (60, 20));
}
