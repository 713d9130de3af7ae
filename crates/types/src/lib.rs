//! Shared types and constants for Typing Toucan.
//!
//! Everything in here is plain data with no dependencies, so it can be used by the
//! simulation core, the terminal front-end and the persistence worker alike.
//!
//! # World
//!
//! The playfield is a fixed logical world with the y axis pointing up:
//!
//! - **Width**: 800 units
//! - **Height**: 600 units
//! - **Ground**: the bottom 60 units
//!
//! The bird's position is the centre of its body. Its collision box (40x30) is
//! centred on that point, its sprite is 140x206.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `PHYSICS_STEP` | 1/60 s | Fixed physics timestep |
//! | `MAX_FRAME_DELTA` | 0.25 s | Frame delta cap fed to the accumulator |
//! | `HURT_OBSTACLE_SECS` | 0.5 s | Hurt flash after hitting an obstacle |
//! | `HURT_WRONG_KEY_SECS` | 0.3 s | Hurt flash after a wrong key |
//! | `LEVEL_FLASH_SECS` | 1.0 s | Level-up flash |
//! | `MILESTONE_SECS` | 2.0 s | Milestone pulse |
//! | `AUTOPLAY_TYPE_SECS` | 0.11 s | Autoplay typing cadence |
//!
//! # Difficulty
//!
//! | Tier | Scroll | Interval | Gravity | Flap |
//! |------|--------|----------|---------|------|
//! | Easy | 150 | 2.5 s | -0.08 | 3.25 |
//! | Normal | 200 | 2.0 s | -0.5 | 10.0 |
//! | Hard | 300 | 1.5 s | -0.7 | 10.0 |
//! | Insane | 400 | 1.0 s | -0.9 | 12.0 |
//!
//! Gravity and flap are per-frame values at 60 FPS; the bird scales them by `dt * 60`.
//!
//! # Examples
//!
//! ```
//! use typing_toucan_types::{Difficulty, GameMode, WORLD_WIDTH};
//!
//! let profile = Difficulty::from_str("hard").unwrap().profile();
//! assert_eq!(profile.scroll_speed, 300.0);
//!
//! assert!(GameMode::Arcade.is_streak_mode());
//! assert!(!GameMode::CustomPractice.obstacles_enabled());
//! assert_eq!(WORLD_WIDTH, 800.0);
//! ```

/// Logical world width.
pub const WORLD_WIDTH: f32 = 800.0;

/// Logical world height.
pub const WORLD_HEIGHT: f32 = 600.0;

/// Height of the ground strip at the bottom of the world.
pub const GROUND_HEIGHT: f32 = 60.0;

/// Fixed physics timestep in seconds.
pub const PHYSICS_STEP: f32 = 1.0 / 60.0;

/// Largest frame delta the accumulator accepts in one frame.
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Tolerance on the accumulator loop condition.
pub const STEP_EPSILON: f32 = 0.0001;

/// Bird sprite width.
pub const BIRD_WIDTH: f32 = 140.0;

/// Bird sprite height.
pub const BIRD_HEIGHT: f32 = 206.0;

/// Bird collision box width.
pub const BIRD_HITBOX_WIDTH: f32 = 40.0;

/// Bird collision box height.
pub const BIRD_HITBOX_HEIGHT: f32 = 30.0;

/// Horizontal position of the bird's centre. The bird never moves sideways.
pub const BIRD_X: f32 = 170.0;

/// Highest centre position: the sprite's top edge touches the top of the world.
pub const BIRD_CEILING: f32 = WORLD_HEIGHT - BIRD_HEIGHT / 2.0;

/// The bird touches the ground once its centre is at or below this height.
pub const GROUND_THRESHOLD: f32 = GROUND_HEIGHT + BIRD_HITBOX_HEIGHT / 2.0;

/// Centre height of the hovering bird before a run starts.
pub const READY_Y: f32 = 300.0 + BIRD_HEIGHT / 2.0;

/// Amplitude of the ready-state hover.
pub const READY_BOB: f32 = 10.0;

/// Centre height after a ground bounce.
pub const BOUNCE_Y: f32 = 80.0 + BIRD_HEIGHT / 2.0;

/// Upward velocity after a ground bounce.
pub const BOUNCE_VELOCITY: f32 = 5.0;

/// Velocity applied when the bird hits the top barrier of an obstacle.
pub const PUSH_FROM_TOP: f32 = -5.0;

/// Velocity applied when the bird hits the bottom barrier of an obstacle.
pub const PUSH_FROM_BOTTOM: f32 = 7.0;

/// Obstacle width.
pub const OBSTACLE_WIDTH: f32 = 80.0;

/// Vertical gap between an obstacle's barriers.
pub const OBSTACLE_GAP: f32 = 220.0;

/// Height of the top barrier rectangle. Reaches well past the top of the world.
pub const OBSTACLE_TOP_HEIGHT: f32 = 2000.0;

/// Obstacles spawn this far past the right edge.
pub const SPAWN_OFFSET: f32 = 50.0;

/// Gap centres stay at least this far from the top and bottom of the world.
pub const GAP_MARGIN: f32 = 150.0;

/// One obstacle in this many uses the alternate skin.
pub const VARIANT_ODDS: u32 = 8;

/// Number of head sprites for the regular skin.
pub const HEAD_VARIANTS: u32 = 5;

/// Number of head sprites for the alternate skin.
pub const ALT_HEAD_VARIANTS: u32 = 2;

/// Spawn interval jitter lower bound as a fraction of the base interval.
pub const INTERVAL_JITTER_MIN: f32 = 0.7;

/// Width of the jitter range (upper bound is `INTERVAL_JITTER_MIN + INTERVAL_JITTER_SPAN`).
pub const INTERVAL_JITTER_SPAN: f32 = 0.6;

/// Storage capacity of the typing queue ring buffer.
pub const QUEUE_CAPACITY: usize = 16;

/// Number of upcoming characters the typing queue keeps filled.
pub const QUEUE_DEPTH: usize = 3;

/// Points awarded by the queue for a matched character.
pub const MATCH_REWARD: u32 = 5;

/// Scored obstacles needed for a level up.
pub const LEVEL_UP_POINTS: u32 = 5;

/// Every this many streak points triggers a milestone.
pub const STREAK_MILESTONE: u32 = 10;

/// Levels that are multiples of this pulse a milestone when they unlock a character.
pub const LEVEL_MILESTONE: u32 = 5;

/// Hurt flash after hitting an obstacle, in seconds.
pub const HURT_OBSTACLE_SECS: f32 = 0.5;

/// Hurt flash after a wrong key, in seconds.
pub const HURT_WRONG_KEY_SECS: f32 = 0.3;

/// Level-up flash, in seconds.
pub const LEVEL_FLASH_SECS: f32 = 1.0;

/// Milestone pulse, in seconds.
pub const MILESTONE_SECS: f32 = 2.0;

/// Rate at which the progression bar eases toward its target.
pub const PROGRESSION_EASE_RATE: f32 = 5.0;

/// Autoplay typing cadence in seconds (about 9 characters per second).
pub const AUTOPLAY_TYPE_SECS: f32 = 0.11;

/// Autoplay aims this far below the next gap centre to leave room for the flap arc.
pub const AUTOPLAY_AIM_BELOW_GAP: f32 = 140.0 - BIRD_HEIGHT / 2.0;

/// Autoplay flaps early when further than this below its target.
pub const AUTOPLAY_LOW_MARGIN: f32 = 60.0;

/// Autoplay only flaps early while rising slower than this.
pub const AUTOPLAY_MAX_RISE: f32 = 3.0;

/// Width of the monkey decoration.
pub const MONKEY_WIDTH: f32 = 120.0;

/// Distance kept between the first obstacle and the monkey decoration.
pub const MONKEY_LEAD: f32 = 90.0;

/// Word-wrap width for passage lines.
pub const WRAP_WIDTH: usize = 15;

/// Baseline (and crash) weight for a progressive character.
pub const BASE_WEIGHT: u32 = 10;

/// Weight floor for vowels.
pub const VOWEL_FLOOR: u32 = 5;

/// Weight floor for every other character.
pub const CONSONANT_FLOOR: u32 = 1;

/// Debounce window for touch keyboards, in milliseconds.
pub const TOUCH_DEBOUNCE_MS: u64 = 200;

/// Difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Insane,
}

/// Physics and spawn parameters for one difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// World units per second.
    pub scroll_speed: f32,
    /// Base seconds between obstacle spawns.
    pub obstacle_interval: f32,
    /// Per-frame velocity change.
    pub gravity: f32,
    /// Velocity set by a flap.
    pub flap_impulse: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    /// Parameter table for this tier.
    pub fn profile(self) -> DifficultyProfile {
        let (scroll_speed, obstacle_interval, gravity, flap_impulse) = match self {
            Difficulty::Easy => (150.0, 2.5, -0.08, 3.25),
            Difficulty::Normal => (200.0, 2.0, -0.5, 10.0),
            Difficulty::Hard => (300.0, 1.5, -0.7, 10.0),
            Difficulty::Insane => (400.0, 1.0, -0.9, 12.0),
        };
        DifficultyProfile {
            scroll_speed,
            obstacle_interval,
            gravity,
            flap_impulse,
        }
    }

    /// Next tier, wrapping from Insane back to Easy (pause menu cycling).
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Insane,
            Difficulty::Insane => Difficulty::Easy,
        }
    }

    /// Parse from a case-insensitive name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "insane" => Some(Difficulty::Insane),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
            Difficulty::Insane => "INSANE",
        }
    }
}

/// How a session is played.
///
/// - **Normal**: progressive unlocks, levels, ground contact ends the run
/// - **CustomPractice**: fixed character pool, no obstacles, streak scoring
/// - **TextPractice**: typing passages, streak scoring
/// - **Arcade**: every key at once, with obstacles and streak scoring
/// - **Credits**: passage roll played by the autopilot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Normal { start_level: u32 },
    CustomPractice,
    TextPractice,
    Arcade,
    Credits,
}

impl GameMode {
    /// Streak modes track and persist a consecutive-correct counter instead of levels.
    pub fn is_streak_mode(&self) -> bool {
        matches!(
            self,
            GameMode::CustomPractice | GameMode::TextPractice | GameMode::Arcade | GameMode::Credits
        )
    }

    /// Practice modes never persist level progress.
    pub fn is_practice(&self) -> bool {
        matches!(
            self,
            GameMode::CustomPractice | GameMode::TextPractice | GameMode::Credits
        )
    }

    pub fn obstacles_enabled(&self) -> bool {
        !matches!(self, GameMode::CustomPractice)
    }

    pub fn is_autoplay(&self) -> bool {
        matches!(self, GameMode::Credits)
    }

    pub fn start_level(&self) -> u32 {
        match self {
            GameMode::Normal { start_level } => *start_level,
            _ => 1,
        }
    }

    /// Key under which this mode's best result is stored.
    pub fn score_key(&self) -> Option<ScoreKey> {
        match self {
            GameMode::Normal { .. } => Some(ScoreKey::NormalLevel),
            GameMode::CustomPractice => Some(ScoreKey::CustomStreak),
            GameMode::TextPractice => Some(ScoreKey::TextStreak),
            GameMode::Arcade => Some(ScoreKey::ArcadeStreak),
            GameMode::Credits => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal { .. } => "normal",
            GameMode::CustomPractice => "practice",
            GameMode::TextPractice => "text",
            GameMode::Arcade => "arcade",
            GameMode::Credits => "credits",
        }
    }
}

/// Observable session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    Playing,
    Paused,
    Victory,
}

/// Fire-and-forget sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Flap,
    Score,
    Crash,
    LevelUp,
    LevelUpPractice,
    Error,
    Monkey,
    MenuSelect,
}

/// Music transport commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicCommand {
    Play,
    Pause,
    Resume,
    Stop,
}

/// Side effects emitted by the session, drained by the host each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    Sound(SoundCue),
    Music(MusicCommand),
}

/// Persisted high-score slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreKey {
    NormalLevel,
    CustomStreak,
    TextStreak,
    ArcadeStreak,
}

impl ScoreKey {
    pub const ALL: [ScoreKey; 4] = [
        ScoreKey::NormalLevel,
        ScoreKey::CustomStreak,
        ScoreKey::TextStreak,
        ScoreKey::ArcadeStreak,
    ];

    /// Value reported before anything has been saved.
    pub fn default_value(self) -> u32 {
        match self {
            ScoreKey::NormalLevel => 1,
            _ => 0,
        }
    }
}

/// Persisted boolean preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preference {
    CapitalsEnabled,
    SoundEnabled,
    MusicEnabled,
}

impl Preference {
    pub fn default_value(self) -> bool {
        match self {
            Preference::CapitalsEnabled => false,
            Preference::SoundEnabled | Preference::MusicEnabled => true,
        }
    }
}
