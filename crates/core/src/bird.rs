//! The bird: vertical physics only.

use crate::types::{
    DifficultyProfile, BIRD_CEILING, BIRD_HITBOX_HEIGHT, BIRD_HITBOX_WIDTH, BIRD_WIDTH, BIRD_X,
    READY_Y,
};

/// Axis-aligned rectangle, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap; touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    /// Centre of the body.
    pub x: f32,
    pub y: f32,
    /// Units per frame at 60 FPS, positive is up.
    pub velocity: f32,
    pub gravity: f32,
    pub flap_impulse: f32,
}

impl Bird {
    pub fn new(profile: &DifficultyProfile) -> Self {
        Self {
            x: BIRD_X,
            y: READY_Y,
            velocity: 0.0,
            gravity: profile.gravity,
            flap_impulse: profile.flap_impulse,
        }
    }

    pub fn apply_profile(&mut self, profile: &DifficultyProfile) {
        self.gravity = profile.gravity;
        self.flap_impulse = profile.flap_impulse;
    }

    /// Integrate one step of `dt` seconds.
    ///
    /// Uses the average of old and new velocity (trapezoidal), scaled to 60 FPS
    /// frames. The centre is clamped to `[0, BIRD_CEILING]`; hitting the ceiling
    /// kills upward velocity.
    pub fn update(&mut self, dt: f32) {
        let frames = dt * 60.0;
        let old_velocity = self.velocity;
        self.velocity += self.gravity * frames;
        self.y += (old_velocity + self.velocity) * 0.5 * frames;

        if self.y > BIRD_CEILING {
            self.y = BIRD_CEILING;
            self.velocity = 0.0;
        } else if self.y < 0.0 {
            self.y = 0.0;
        }
    }

    pub fn flap(&mut self) {
        self.velocity = self.flap_impulse;
    }

    /// Put the bird back at the start height, at rest.
    pub fn reset(&mut self) {
        self.x = BIRD_X;
        self.y = READY_Y;
        self.velocity = 0.0;
    }

    /// Left edge of the sprite; obstacles score once they pass it.
    pub fn left(&self) -> f32 {
        self.x - BIRD_WIDTH / 2.0
    }

    /// Collision box, always centred on the body.
    pub fn hitbox(&self) -> Rect {
        Rect::new(
            self.x - BIRD_HITBOX_WIDTH / 2.0,
            self.y - BIRD_HITBOX_HEIGHT / 2.0,
            BIRD_HITBOX_WIDTH,
            BIRD_HITBOX_HEIGHT,
        )
    }
}
