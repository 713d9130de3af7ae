//! Plain-data view of a session, filled in place each frame for the renderer.

use arrayvec::ArrayVec;

use crate::obstacle::Obstacle;
use crate::source::PassageDisplay;
use crate::types::{Difficulty, GameMode, Phase, QUEUE_CAPACITY};

/// Obstacles carried in a snapshot. More than a handful never fit on screen.
pub const MAX_SNAPSHOT_OBSTACLES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BirdSnapshot {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
}

/// Owned copy of a [`PassageDisplay`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PassageSnapshot {
    pub previous_line: String,
    pub current_line: String,
    pub next_line: String,
    pub local_progress: usize,
    pub line_index: usize,
    pub attribution: String,
}

impl PassageSnapshot {
    /// Copy `display` in, reusing the existing string buffers.
    pub fn fill_from(&mut self, display: &PassageDisplay<'_>) {
        self.previous_line.clear();
        self.previous_line.push_str(display.previous_line);
        self.current_line.clear();
        self.current_line.push_str(display.current_line);
        self.next_line.clear();
        self.next_line.push_str(display.next_line);
        self.attribution.clear();
        self.attribution.push_str(display.attribution);
        self.local_progress = display.local_progress;
        self.line_index = display.line_index;
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub bird: BirdSnapshot,
    pub obstacles: ArrayVec<Obstacle, MAX_SNAPSHOT_OBSTACLES>,
    pub queue: ArrayVec<char, QUEUE_CAPACITY>,
    pub score: u32,
    pub level: u32,
    pub streak: u32,
    pub max_streak: u32,
    /// Best stored result for the mode: level in normal mode, streak otherwise.
    pub high_score: u32,
    pub progression: u32,
    /// Eased progression for the progress bar.
    pub display_progression: f32,
    pub hurt_timer: f32,
    pub flash_timer: f32,
    pub milestone_timer: f32,
    /// Fades from 1 to 0 after each match.
    pub reward_flash: f32,
    pub last_reward: u32,
    /// What the last level-up unlocked ("k", "a-A" or "MAX").
    pub unlock_label: String,
    pub progress_label: String,
    pub passage: Option<PassageSnapshot>,
    pub capitals_enabled: bool,
    pub obstacles_enabled: bool,
    pub monkey_x: f32,
    /// Seconds of animated time, for pulses and bobbing.
    pub state_time: f32,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::NotStarted,
            mode: GameMode::Normal { start_level: 1 },
            difficulty: Difficulty::Normal,
            bird: BirdSnapshot::default(),
            obstacles: ArrayVec::new(),
            queue: ArrayVec::new(),
            score: 0,
            level: 1,
            streak: 0,
            max_streak: 0,
            high_score: 0,
            progression: 0,
            display_progression: 0.0,
            hurt_timer: 0.0,
            flash_timer: 0.0,
            milestone_timer: 0.0,
            reward_flash: 0.0,
            last_reward: 0,
            unlock_label: String::new(),
            progress_label: String::new(),
            passage: None,
            capitals_enabled: false,
            obstacles_enabled: true,
            monkey_x: 0.0,
            state_time: 0.0,
        }
    }
}

impl SessionSnapshot {
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Queue rendered head first with `sep` between characters.
    pub fn queue_string(&self, sep: &str) -> String {
        let mut out = String::new();
        for (i, ch) in self.queue.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push(*ch);
        }
        out
    }
}
