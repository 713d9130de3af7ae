//! Game session: one run of one mode, from the ready screen to the crash.
//!
//! The session owns the bird, the obstacles, the typing queue and every timer.
//! It is driven by the host through [`Session::update`] (once per rendered frame)
//! and the input entry points [`Session::type_char`], [`Session::touch`],
//! [`Session::pause`] and [`Session::resume`]. Sound and music side effects are
//! buffered as [`SessionEvent`]s and drained by the host.
//!
//! Physics runs on a fixed 1/60 s step fed by an accumulator; per-frame timers
//! (hurt flash, reward flash, autoplay typing) run on the raw frame delta.

use std::sync::Arc;

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::bird::Bird;
use crate::debounce::InputFilter;
use crate::error::ConfigError;
use crate::obstacle::ObstaclePool;
use crate::queue::TypingQueue;
use crate::rng::SimpleRng;
use crate::snapshot::{BirdSnapshot, PassageSnapshot, SessionSnapshot};
use crate::source::{CharacterSource, SourceKind, Unlocked};
use crate::spawner::ObstacleSpawner;
use crate::store::ScoreStore;
use crate::types::*;

/// Events buffered between two drains. Overflow is dropped.
pub const MAX_PENDING_EVENTS: usize = 64;

/// Static parameters of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub seed: u32,
    /// Same-character repeat window; 0 on desktops.
    pub debounce_ms: u64,
    /// Level that ends the run in victory. `None` plays forever.
    pub victory_level: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Normal { start_level: 1 },
            difficulty: Difficulty::Normal,
            seed: 1,
            debounce_ms: 0,
            victory_level: None,
        }
    }
}

impl SessionConfig {
    pub fn new(mode: GameMode, difficulty: Difficulty) -> Self {
        Self {
            mode,
            difficulty,
            ..Self::default()
        }
    }

    /// The credits roll always plays at the fastest tier.
    pub fn credits(seed: u32) -> Self {
        Self {
            mode: GameMode::Credits,
            difficulty: Difficulty::Insane,
            seed,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_victory_level(mut self, level: Option<u32>) -> Self {
        self.victory_level = level;
        self
    }
}

/// Result of feeding one character to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Filtered out, or the session is paused or won.
    Ignored,
    /// Matched the head of the queue; carries the reward.
    Correct(u32),
    Wrong,
}

fn required_source(mode: GameMode) -> SourceKind {
    match mode {
        GameMode::Normal { .. } => SourceKind::Progressive,
        GameMode::CustomPractice | GameMode::Arcade => SourceKind::FixedPool,
        GameMode::TextPractice | GameMode::Credits => SourceKind::Passage,
    }
}

fn unlock_label(added: &Unlocked) -> String {
    match added.as_slice() {
        [one] => one.to_string(),
        [base, upper, ..] => format!("{base}-{upper}"),
        [] => String::new(),
    }
}

/// Starting x of the monkey decoration: just ahead of the first obstacle.
fn monkey_start(profile: &DifficultyProfile, spawner: &ObstacleSpawner) -> f32 {
    WORLD_WIDTH + profile.scroll_speed * spawner.next_interval() - MONKEY_LEAD - MONKEY_WIDTH
}

pub struct Session {
    mode: GameMode,
    difficulty: Difficulty,
    profile: DifficultyProfile,
    victory_level: Option<u32>,
    store: Arc<dyn ScoreStore>,

    queue: TypingQueue,
    bird: Bird,
    obstacles: ObstaclePool,
    spawner: ObstacleSpawner,
    rng: SimpleRng,
    filter: InputFilter,
    events: ArrayVec<SessionEvent, MAX_PENDING_EVENTS>,

    started: bool,
    paused: bool,
    victory: bool,
    capitals: bool,

    score: u32,
    level: u32,
    progression: u32,
    streak: u32,
    max_streak: u32,
    /// Best stored level (normal mode) or streak (streak modes).
    top_score: u32,
    last_reward: u32,
    unlock_label: String,

    display_progression: f32,
    hurt_timer: f32,
    flash_timer: f32,
    milestone_timer: f32,
    reward_flash: f32,
    autoplay_timer: f32,
    accumulator: f32,
    state_time: f32,
    /// Seconds since construction, for input debouncing.
    clock: f64,

    monkey_x: f32,
    monkey_passed: bool,
}

impl Session {
    /// Build a session for `config.mode` fed by `source`.
    ///
    /// Fails when the start level is 0 or the source kind does not suit the mode.
    /// The capitals preference is read from `store` and applied to the source
    /// before the queue is filled; normal mode pre-unlocks `start_level - 1`
    /// characters.
    pub fn new(
        config: SessionConfig,
        mut source: Box<dyn CharacterSource>,
        store: Arc<dyn ScoreStore>,
    ) -> Result<Self, ConfigError> {
        let mode = config.mode;
        if let GameMode::Normal { start_level } = mode {
            if start_level < 1 {
                return Err(ConfigError::InvalidStartLevel(start_level));
            }
        }
        if source.kind() != required_source(mode) {
            return Err(ConfigError::SourceMismatch {
                mode,
                source_kind: source.kind().as_str(),
            });
        }

        let capitals = store.preference(Preference::CapitalsEnabled);
        source.set_capitals_enabled(capitals);
        for _ in 1..mode.start_level() {
            source.expand_pool();
        }

        let top_score = mode
            .score_key()
            .map(|key| store.score(key))
            .unwrap_or_default();
        let max_streak = if mode.is_streak_mode() { top_score } else { 0 };

        let profile = config.difficulty.profile();
        let spawner = ObstacleSpawner::new(profile.obstacle_interval);
        let monkey_x = monkey_start(&profile, &spawner);

        info!(
            mode = mode.as_str(),
            difficulty = config.difficulty.as_str(),
            seed = config.seed,
            "session created"
        );

        Ok(Self {
            mode,
            difficulty: config.difficulty,
            profile,
            victory_level: config.victory_level,
            store,
            queue: TypingQueue::new(source),
            bird: Bird::new(&profile),
            obstacles: ObstaclePool::new(),
            spawner,
            rng: SimpleRng::new(config.seed),
            filter: InputFilter::new(config.debounce_ms),
            events: ArrayVec::new(),
            started: false,
            paused: false,
            victory: false,
            capitals,
            score: 0,
            level: mode.start_level(),
            progression: 0,
            streak: 0,
            max_streak,
            top_score,
            last_reward: 0,
            unlock_label: String::new(),
            display_progression: 0.0,
            hurt_timer: 0.0,
            flash_timer: 0.0,
            milestone_timer: 0.0,
            reward_flash: 0.0,
            autoplay_timer: 0.0,
            accumulator: 0.0,
            state_time: 0.0,
            clock: 0.0,
            monkey_x,
            monkey_passed: false,
        })
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> Phase {
        if self.victory {
            Phase::Victory
        } else if self.paused {
            Phase::Paused
        } else if self.started {
            Phase::Playing
        } else {
            Phase::NotStarted
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn progression(&self) -> u32 {
        self.progression
    }

    pub fn display_progression(&self) -> f32 {
        self.display_progression
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    pub fn top_score(&self) -> u32 {
        self.top_score
    }

    pub fn unlock_label(&self) -> &str {
        &self.unlock_label
    }

    pub fn capitals_enabled(&self) -> bool {
        self.capitals
    }

    pub fn hurt_timer(&self) -> f32 {
        self.hurt_timer
    }

    pub fn flash_timer(&self) -> f32 {
        self.flash_timer
    }

    pub fn milestone_timer(&self) -> f32 {
        self.milestone_timer
    }

    pub fn monkey_x(&self) -> f32 {
        self.monkey_x
    }

    pub fn queue(&self) -> &TypingQueue {
        &self.queue
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    /// Direct bird access for hosts that script a scene.
    pub fn bird_mut(&mut self) -> &mut Bird {
        &mut self.bird
    }

    pub fn obstacles(&self) -> &ObstaclePool {
        &self.obstacles
    }

    /// Direct obstacle access for hosts that script a scene.
    pub fn obstacles_mut(&mut self) -> &mut ObstaclePool {
        &mut self.obstacles
    }

    pub fn spawner(&self) -> &ObstacleSpawner {
        &self.spawner
    }

    /// Take every event emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    fn emit(&mut self, event: SessionEvent) {
        if self.events.try_push(event).is_err() {
            debug!(?event, "event buffer full, dropping");
        }
    }

    fn sound(&mut self, cue: SoundCue) {
        self.emit(SessionEvent::Sound(cue));
    }

    fn music(&mut self, cmd: MusicCommand) {
        self.emit(SessionEvent::Music(cmd));
    }

    /// Advance the session by one rendered frame of `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        let delta = delta.max(0.0);
        self.clock += f64::from(delta);
        if self.victory || self.paused {
            return;
        }
        self.state_time += delta;

        if !self.started {
            if self.mode.is_autoplay() {
                if let Some(head) = self.queue.first() {
                    self.apply_char(head);
                }
            }
            if !self.started {
                self.bird.y = READY_Y + (self.state_time * 5.0).sin() * READY_BOB;
                self.bird.velocity = 0.0;
                return;
            }
        }

        if self.mode.is_autoplay() {
            self.autoplay_timer -= delta;
            if self.autoplay_timer <= 0.0 {
                self.autoplay_timer = AUTOPLAY_TYPE_SECS;
                if let Some(head) = self.queue.first() {
                    self.apply_char(head);
                }
            }
        }

        self.hurt_timer = (self.hurt_timer - delta).max(0.0);
        self.reward_flash = (self.reward_flash - delta * 3.0).max(0.0);

        self.accumulator += delta.min(MAX_FRAME_DELTA);
        while self.accumulator >= PHYSICS_STEP - STEP_EPSILON {
            self.step(PHYSICS_STEP);
            self.accumulator -= PHYSICS_STEP;
            if !self.started || self.victory {
                self.accumulator = 0.0;
                break;
            }
        }
        if self.accumulator < 0.0 {
            self.accumulator = 0.0;
        }
    }

    /// One fixed physics step.
    fn step(&mut self, dt: f32) {
        if self.mode.is_autoplay() {
            self.autopilot();
        }
        self.bird.update(dt);

        self.flash_timer = (self.flash_timer - dt).max(0.0);
        self.milestone_timer = (self.milestone_timer - dt).max(0.0);

        let target = if self.flash_timer > 0.0 {
            LEVEL_UP_POINTS as f32
        } else {
            self.progression as f32
        };
        self.display_progression +=
            (target - self.display_progression) * PROGRESSION_EASE_RATE * dt;

        let speed = self.profile.scroll_speed;
        self.monkey_x -= speed * dt;
        if !self.monkey_passed && self.monkey_x < self.bird.x {
            self.monkey_passed = true;
            self.sound(SoundCue::Monkey);
        }

        if let Some(plan) = self.spawner.update(dt, &mut self.rng) {
            self.obstacles
                .spawn(plan.x, plan.gap_center, plan.variant, plan.head_index);
            debug!(
                gap = plan.gap_center,
                active = self.obstacles.active_count(),
                "obstacle spawned"
            );
        }

        let hitbox = self.bird.hitbox();
        let check_hits = self.mode.obstacles_enabled();
        let mut i = 0;
        while i < self.obstacles.active_count() {
            let id = self.obstacles.active()[i];
            let Some(obstacle) = self.obstacles.get_mut(id) else {
                i += 1;
                continue;
            };
            obstacle.update(dt, speed);
            if obstacle.is_offscreen() {
                self.obstacles.release_at(i);
                continue;
            }

            let passed = !obstacle.scored && obstacle.x < self.bird.left();
            if passed {
                obstacle.scored = true;
            }

            let mut hit = None;
            if check_hits && !obstacle.collided {
                let hits_top = hitbox.overlaps(&obstacle.top_rect());
                if hits_top || hitbox.overlaps(&obstacle.bottom_rect()) {
                    obstacle.collided = true;
                    hit = Some(hits_top);
                }
            }

            if passed {
                self.obstacle_passed();
            }
            if let Some(hits_top) = hit {
                self.obstacle_hit(hits_top);
            }
            i += 1;
        }

        if self.bird.y <= GROUND_THRESHOLD {
            self.ground_contact();
        }
    }

    /// Credits pilot: aim a little below the next gap centre.
    fn autopilot(&mut self) {
        let bird_x = self.bird.x;
        let target = self
            .obstacles
            .iter()
            .find(|o| o.x + OBSTACLE_WIDTH > bird_x)
            .map(|o| o.gap_center - AUTOPLAY_AIM_BELOW_GAP)
            .unwrap_or(READY_Y);

        let bird = &mut self.bird;
        if bird.y < target
            && (bird.velocity < 0.0
                || (bird.y < target - AUTOPLAY_LOW_MARGIN && bird.velocity < AUTOPLAY_MAX_RISE))
        {
            bird.flap();
        }
    }

    fn obstacle_passed(&mut self) {
        self.score += 1;
        self.sound(SoundCue::Score);
        self.progression += 1;
        if self.progression < LEVEL_UP_POINTS {
            return;
        }

        if self.queue.is_fully_unlocked() {
            self.unlock_label = "MAX".to_string();
            self.level_up();
        } else {
            let added = self.queue.expand_pool();
            if !added.is_empty() {
                self.unlock_label = unlock_label(&added);
                if self.level % LEVEL_MILESTONE == 0 {
                    self.milestone_timer = MILESTONE_SECS;
                }
                self.level_up();
            }
        }
        self.progression = 0;
    }

    fn level_up(&mut self) {
        self.level += 1;
        if let GameMode::Normal { start_level } = self.mode {
            let effective = self.level.saturating_sub(start_level - 1);
            if effective > self.top_score {
                self.top_score = effective;
                self.store.save_score(ScoreKey::NormalLevel, effective);
            }
        }
        self.flash_timer = LEVEL_FLASH_SECS;
        self.sound(SoundCue::LevelUp);
        debug!(level = self.level, unlocked = %self.unlock_label, "level up");

        if let Some(goal) = self.victory_level {
            if self.level >= goal {
                self.victory = true;
                info!(level = self.level, "victory");
            }
        }
    }

    fn obstacle_hit(&mut self, hits_top: bool) {
        self.sound(SoundCue::Crash);
        self.hurt_timer = HURT_OBSTACLE_SECS;
        self.bird.velocity = if hits_top {
            PUSH_FROM_TOP
        } else {
            PUSH_FROM_BOTTOM
        };
        if self.mode.is_streak_mode() {
            self.streak = 0;
        } else {
            self.progression = 0;
        }
    }

    fn ground_contact(&mut self) {
        self.sound(SoundCue::Crash);
        match self.mode {
            GameMode::Normal { .. } => self.end_run(),
            GameMode::TextPractice | GameMode::Credits => self.soft_reset(),
            GameMode::CustomPractice | GameMode::Arcade => {
                self.streak = 0;
                self.bird.y = BOUNCE_Y;
                self.bird.velocity = BOUNCE_VELOCITY;
            }
        }
    }

    /// Normal-mode crash: penalise the head character, persist the level, reset.
    fn end_run(&mut self) {
        if let Some(head) = self.queue.first() {
            self.queue.on_crash(head);
        }
        let effective = self.level.saturating_sub(self.mode.start_level() - 1);
        if effective > 0 && self.store.save_score(ScoreKey::NormalLevel, effective) {
            self.top_score = self.top_score.max(effective);
        }
        info!(level = self.level, score = self.score, "run ended");
        self.soft_reset();
    }

    /// Back to the ready screen. Level, unlocks and passage position are kept.
    pub fn soft_reset(&mut self) {
        self.started = false;
        self.progression = 0;
        self.score = 0;
        if self.mode.is_streak_mode() {
            self.streak = 0;
        }
        self.bird.reset();
        self.obstacles.release_all();
        self.hurt_timer = 0.0;
        self.flash_timer = 0.0;
        self.accumulator = 0.0;
        self.autoplay_timer = 0.0;
        self.spawner.reset();
        self.monkey_x = monkey_start(&self.profile, &self.spawner);
        self.monkey_passed = false;
    }

    /// Feed one typed character.
    pub fn type_char(&mut self, ch: char) -> KeyOutcome {
        if !self.filter.accept(ch, self.clock) {
            return KeyOutcome::Ignored;
        }
        if self.paused || self.victory {
            return KeyOutcome::Ignored;
        }
        self.apply_char(ch)
    }

    fn apply_char(&mut self, ch: char) -> KeyOutcome {
        let update_weights =
            !self.mode.is_practice() || self.queue.source().kind() == SourceKind::Passage;

        let Some(reward) = self.queue.handle_input(ch, update_weights) else {
            if self.started && !self.queue.is_empty() {
                self.hurt_timer = HURT_WRONG_KEY_SECS;
                self.sound(SoundCue::Error);
                self.progression = self.progression.saturating_sub(1);
                if self.mode.is_streak_mode() {
                    self.streak = 0;
                }
            }
            return KeyOutcome::Wrong;
        };

        if !self.started {
            self.started = true;
            self.music(MusicCommand::Play);
        }
        self.last_reward = reward;
        self.reward_flash = 1.0;

        let autoplay = self.mode.is_autoplay();
        if !autoplay {
            self.bird.flap();
            self.sound(SoundCue::Flap);
        }

        if self.mode.is_streak_mode() {
            self.streak += 1;
            if !autoplay && self.streak > self.top_score {
                self.top_score = self.streak;
                if let Some(key) = self.mode.score_key() {
                    self.store.save_score(key, self.streak);
                }
            }
            self.max_streak = self.max_streak.max(self.streak);
            if !autoplay && self.streak % STREAK_MILESTONE == 0 {
                self.sound(SoundCue::LevelUpPractice);
                self.milestone_timer = MILESTONE_SECS;
            }
        }
        KeyOutcome::Correct(reward)
    }

    /// Tap or click. Starts the run from the ready screen; otherwise ignored.
    ///
    /// Confirming the victory screen goes through [`Session::confirm_victory`] and
    /// pause-menu navigation is the host's business.
    pub fn touch(&mut self) {
        if self.victory || self.paused || self.started {
            return;
        }
        self.started = true;
        self.music(MusicCommand::Play);
        if !self.mode.is_autoplay() {
            self.bird.flap();
            self.sound(SoundCue::Flap);
        }
    }

    /// Acknowledge the victory screen. Returns whether the host should leave
    /// the session.
    pub fn confirm_victory(&mut self) -> bool {
        if !self.victory {
            return false;
        }
        self.music(MusicCommand::Stop);
        true
    }

    pub fn pause(&mut self) {
        if self.paused || self.victory {
            return;
        }
        self.paused = true;
        self.music(MusicCommand::Pause);
    }

    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.music(MusicCommand::Resume);
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.profile = difficulty.profile();
        self.bird.apply_profile(&self.profile);
        self.spawner.set_base_interval(self.profile.obstacle_interval);
        info!(difficulty = difficulty.as_str(), "difficulty changed");
    }

    /// Toggle capitals for the source and remember the choice.
    pub fn set_capitals(&mut self, enabled: bool) {
        self.capitals = enabled;
        self.queue.set_capitals_enabled(enabled);
        self.store
            .set_preference(Preference::CapitalsEnabled, enabled);
    }

    /// Wipe every stored high score and reload this mode's best.
    pub fn reset_high_scores(&mut self) {
        self.store.reset_scores();
        self.top_score = self
            .mode
            .score_key()
            .map(|key| self.store.score(key))
            .unwrap_or_default();
        self.max_streak = if self.mode.is_streak_mode() {
            self.top_score
        } else {
            0
        };
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.phase = self.phase();
        out.mode = self.mode;
        out.difficulty = self.difficulty;
        out.bird = BirdSnapshot {
            x: self.bird.x,
            y: self.bird.y,
            velocity: self.bird.velocity,
        };

        out.obstacles.clear();
        for obstacle in self.obstacles.iter() {
            if out.obstacles.try_push(*obstacle).is_err() {
                break;
            }
        }
        out.queue.clear();
        for ch in self.queue.iter() {
            if out.queue.try_push(ch).is_err() {
                break;
            }
        }

        out.score = self.score;
        out.level = self.level;
        out.streak = self.streak;
        out.max_streak = self.max_streak;
        out.high_score = self.top_score;
        out.progression = self.progression;
        out.display_progression = self.display_progression;
        out.hurt_timer = self.hurt_timer;
        out.flash_timer = self.flash_timer;
        out.milestone_timer = self.milestone_timer;
        out.reward_flash = self.reward_flash;
        out.last_reward = self.last_reward;

        out.unlock_label.clear();
        out.unlock_label.push_str(&self.unlock_label);
        out.progress_label.clear();
        out.progress_label
            .push_str(&self.queue.source().progress_label());

        match self.queue.source().passage_display() {
            Some(display) => out
                .passage
                .get_or_insert_with(PassageSnapshot::default)
                .fill_from(&display),
            None => out.passage = None,
        }

        out.capitals_enabled = self.capitals;
        out.obstacles_enabled = self.mode.obstacles_enabled();
        out.monkey_x = self.monkey_x;
        out.state_time = self.state_time;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("difficulty", &self.difficulty)
            .field("phase", &self.phase())
            .field("score", &self.score)
            .field("level", &self.level)
            .field("streak", &self.streak)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}
