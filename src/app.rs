//! The running game: one session, its pause menu and the audio sink.
//!
//! `App` owns no terminal. The binary feeds it [`InputEvent`]s and frame
//! deltas, renders it into a framebuffer and rings the bell when asked, so
//! everything here runs headless in tests.

use std::sync::Arc;

use tracing::{debug, info};

use crate::core::{ScoreStore, Session, SessionSnapshot};
use crate::input::{InputEvent, MenuAction, MenuStatus, PauseMenu};
use crate::term::{FrameBuffer, GameView, MenuOverlay, Viewport};
use crate::types::{GameMode, MusicCommand, Phase, Preference, SessionEvent, SoundCue};

/// Whether the host loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Terminal audio: the bell stands in for the cues that matter, music is
/// tracked but has nowhere to play.
#[derive(Debug, Default)]
pub struct BellSink {
    pending: bool,
    rung: u32,
    music: Option<MusicCommand>,
}

impl BellSink {
    fn rings(cue: SoundCue) -> bool {
        matches!(cue, SoundCue::Crash | SoundCue::LevelUp | SoundCue::Error)
    }

    pub fn play(&mut self, cue: SoundCue, sound_enabled: bool) {
        if sound_enabled && Self::rings(cue) {
            self.pending = true;
            self.rung += 1;
        }
    }

    pub fn music(&mut self, command: MusicCommand, music_enabled: bool) {
        if music_enabled {
            debug!(?command, "music");
        }
        self.music = Some(command);
    }

    /// At most one bell per frame, however many cues fired.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Bell-worthy cues heard so far.
    pub fn rung(&self) -> u32 {
        self.rung
    }

    pub fn last_music(&self) -> Option<MusicCommand> {
        self.music
    }
}

pub struct App {
    session: Session,
    menu: PauseMenu,
    store: Arc<dyn ScoreStore>,
    sink: BellSink,
    view: GameView,
    snapshot: SessionSnapshot,
}

impl App {
    pub fn new(session: Session, store: Arc<dyn ScoreStore>) -> Self {
        let show_capitals = matches!(session.mode(), GameMode::Normal { .. });
        Self {
            session,
            menu: PauseMenu::new(show_capitals),
            store,
            sink: BellSink::default(),
            view: GameView::new(),
            snapshot: SessionSnapshot::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn menu(&self) -> &PauseMenu {
        &self.menu
    }

    pub fn sink(&self) -> &BellSink {
        &self.sink
    }

    pub fn take_bell(&mut self) -> bool {
        self.sink.take_bell()
    }

    fn menu_status(&self) -> MenuStatus {
        MenuStatus {
            difficulty: self.session.difficulty(),
            capitals: self.session.capitals_enabled(),
            sound: self.store.preference(Preference::SoundEnabled),
            music: self.store.preference(Preference::MusicEnabled),
        }
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: InputEvent) -> Flow {
        if event == InputEvent::Quit {
            return Flow::Exit;
        }

        if self.session.phase() == Phase::Victory {
            if event == InputEvent::Confirm && self.session.confirm_victory() {
                self.drain();
                return Flow::Exit;
            }
            return Flow::Continue;
        }

        let response = self.menu.handle(event);
        if response.select_cue {
            let sound = self.store.preference(Preference::SoundEnabled);
            self.sink.play(SoundCue::MenuSelect, sound);
        }
        if let Some(action) = response.action {
            if self.apply(action) == Flow::Exit {
                return Flow::Exit;
            }
        }
        if response.consumed {
            return Flow::Continue;
        }

        match event {
            InputEvent::Char(ch) => {
                self.session.type_char(ch);
            }
            InputEvent::Touch => self.session.touch(),
            _ => {}
        }
        Flow::Continue
    }

    fn apply(&mut self, action: MenuAction) -> Flow {
        match action {
            MenuAction::Pause => self.session.pause(),
            MenuAction::Resume => self.session.resume(),
            MenuAction::CycleDifficulty => {
                let next = self.session.difficulty().next();
                self.session.set_difficulty(next);
            }
            MenuAction::ToggleCapitals => {
                let enabled = !self.session.capitals_enabled();
                self.session.set_capitals(enabled);
            }
            MenuAction::ToggleSound => {
                let enabled = !self.store.preference(Preference::SoundEnabled);
                self.store.set_preference(Preference::SoundEnabled, enabled);
            }
            MenuAction::ToggleMusic => {
                let enabled = !self.store.preference(Preference::MusicEnabled);
                self.store.set_preference(Preference::MusicEnabled, enabled);
                let command = if enabled {
                    MusicCommand::Resume
                } else {
                    MusicCommand::Pause
                };
                self.sink.music(command, true);
            }
            MenuAction::ExitToMainMenu => {
                info!(score = self.session.score(), "left the run from the menu");
                let music = self.store.preference(Preference::MusicEnabled);
                self.sink.music(MusicCommand::Stop, music);
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    /// The terminal lost focus: pause a running game.
    pub fn focus_lost(&mut self) {
        if self.session.phase() == Phase::Playing && !self.menu.is_open() {
            self.menu.open();
            self.session.pause();
        }
    }

    /// Advance the session by `delta` seconds and route its events.
    pub fn tick(&mut self, delta: f32) {
        self.session.update(delta);
        self.drain();
    }

    fn drain(&mut self) {
        let sound = self.store.preference(Preference::SoundEnabled);
        let music = self.store.preference(Preference::MusicEnabled);
        for event in self.session.drain_events() {
            match event {
                SessionEvent::Sound(cue) => self.sink.play(cue, sound),
                SessionEvent::Music(command) => self.sink.music(command, music),
            }
        }
    }

    /// Render the current frame into `fb`.
    pub fn render_into(&mut self, viewport: Viewport, fb: &mut FrameBuffer) {
        self.session.snapshot_into(&mut self.snapshot);
        if self.menu.is_open() {
            let labels = self.menu.labels(&self.menu_status());
            let overlay = MenuOverlay {
                title: self.menu.title(),
                items: &labels,
                selected: self.menu.selected(),
            };
            self.view
                .render_into(&self.snapshot, Some(&overlay), viewport, fb);
        } else {
            self.view.render_into(&self.snapshot, None, viewport, fb);
        }
    }
}
