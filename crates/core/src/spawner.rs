//! Obstacle spawn timing and placement.

use crate::rng::SimpleRng;
use crate::types::{
    ALT_HEAD_VARIANTS, GAP_MARGIN, HEAD_VARIANTS, INTERVAL_JITTER_MIN, INTERVAL_JITTER_SPAN,
    SPAWN_OFFSET, VARIANT_ODDS, WORLD_HEIGHT, WORLD_WIDTH,
};

/// Where and how the next obstacle appears.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub x: f32,
    pub gap_center: f32,
    pub variant: bool,
    pub head_index: u8,
}

/// Accumulates time and decides when the next obstacle spawns.
///
/// The first obstacle after a reset waits exactly the base interval; later ones
/// wait `base * uniform(0.7, 1.3)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleSpawner {
    timer: f32,
    next_interval: f32,
    base_interval: f32,
}

impl ObstacleSpawner {
    pub fn new(base_interval: f32) -> Self {
        Self {
            timer: 0.0,
            next_interval: base_interval,
            base_interval,
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn next_interval(&self) -> f32 {
        self.next_interval
    }

    pub fn base_interval(&self) -> f32 {
        self.base_interval
    }

    /// Adopt a new base interval; the pending wait restarts from it.
    pub fn set_base_interval(&mut self, base_interval: f32) {
        self.base_interval = base_interval;
        self.next_interval = base_interval;
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.next_interval = self.base_interval;
    }

    /// Advance by `dt`; returns a plan when an obstacle is due.
    pub fn update(&mut self, dt: f32, rng: &mut SimpleRng) -> Option<SpawnPlan> {
        self.timer += dt;
        if self.timer < self.next_interval {
            return None;
        }

        self.timer = 0.0;
        self.next_interval =
            self.base_interval * (INTERVAL_JITTER_MIN + rng.next_f32() * INTERVAL_JITTER_SPAN);

        let min_gap = GAP_MARGIN;
        let max_gap = WORLD_HEIGHT - GAP_MARGIN;
        let gap_center = min_gap + rng.next_f32() * (max_gap - min_gap);

        let variant = rng.next_range(VARIANT_ODDS) == 0;
        let heads = if variant {
            ALT_HEAD_VARIANTS
        } else {
            HEAD_VARIANTS
        };
        let head_index = rng.next_range(heads) as u8;

        Some(SpawnPlan {
            x: WORLD_WIDTH + SPAWN_OFFSET,
            gap_center,
            variant,
            head_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PHYSICS_STEP;

    #[test]
    fn first_spawn_waits_the_base_interval() {
        let mut spawner = ObstacleSpawner::new(2.0);
        let mut rng = SimpleRng::new(1);
        assert!(spawner.update(1.9, &mut rng).is_none());
        let plan = spawner.update(0.2, &mut rng).unwrap();
        assert_eq!(plan.x, WORLD_WIDTH + SPAWN_OFFSET);
        assert_eq!(spawner.timer(), 0.0);
    }

    #[test]
    fn intervals_stay_within_jitter_bounds() {
        let mut spawner = ObstacleSpawner::new(2.0);
        let mut rng = SimpleRng::new(2024);
        let mut spawns = 0;
        for _ in 0..(60 * 600) {
            if spawner.update(PHYSICS_STEP, &mut rng).is_some() {
                spawns += 1;
                let next = spawner.next_interval();
                assert!((1.4..=2.6).contains(&next), "interval {next}");
            }
        }
        assert!(spawns > 200);
    }

    #[test]
    fn gap_and_heads_stay_in_range() {
        let mut spawner = ObstacleSpawner::new(0.1);
        let mut rng = SimpleRng::new(77);
        let mut variants = 0;
        for _ in 0..2000 {
            if let Some(plan) = spawner.update(1.0, &mut rng) {
                assert!(plan.gap_center >= GAP_MARGIN);
                assert!(plan.gap_center <= WORLD_HEIGHT - GAP_MARGIN);
                if plan.variant {
                    variants += 1;
                    assert!((plan.head_index as u32) < ALT_HEAD_VARIANTS);
                } else {
                    assert!((plan.head_index as u32) < HEAD_VARIANTS);
                }
            }
        }
        // 1 in 8 of 2000.
        assert!((150..350).contains(&variants), "variants {variants}");
    }

    #[test]
    fn changing_base_restarts_wait() {
        let mut spawner = ObstacleSpawner::new(2.0);
        let mut rng = SimpleRng::new(1);
        spawner.update(2.0, &mut rng);
        spawner.set_base_interval(1.0);
        assert_eq!(spawner.next_interval(), 1.0);
        spawner.reset();
        assert_eq!(spawner.timer(), 0.0);
    }
}
