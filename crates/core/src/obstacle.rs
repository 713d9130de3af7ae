//! Obstacles and the pool they live in.
//!
//! An obstacle is a pair of barriers with a gap between them. The bottom barrier
//! rises from the ground to the gap, the top barrier starts above the gap and
//! runs well past the top of the world.

use crate::bird::Rect;
use crate::types::{OBSTACLE_GAP, OBSTACLE_TOP_HEIGHT, OBSTACLE_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Obstacle {
    /// Left edge.
    pub x: f32,
    pub gap_center: f32,
    /// Alternate skin.
    pub variant: bool,
    /// Which head sprite the skin uses.
    pub head_index: u8,
    /// Latched once the obstacle passes the bird.
    pub scored: bool,
    /// Latched on the first collision.
    pub collided: bool,
}

impl Obstacle {
    pub fn init(&mut self, x: f32, gap_center: f32, variant: bool, head_index: u8) {
        *self = Self {
            x,
            gap_center,
            variant,
            head_index,
            scored: false,
            collided: false,
        };
    }

    pub fn update(&mut self, dt: f32, speed: f32) {
        self.x -= speed * dt;
    }

    pub fn bottom_rect(&self) -> Rect {
        Rect::new(
            self.x,
            0.0,
            OBSTACLE_WIDTH,
            self.gap_center - OBSTACLE_GAP / 2.0,
        )
    }

    pub fn top_rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.gap_center + OBSTACLE_GAP / 2.0,
            OBSTACLE_WIDTH,
            OBSTACLE_TOP_HEIGHT,
        )
    }

    /// Entirely past the left edge of the world.
    pub fn is_offscreen(&self) -> bool {
        self.x + OBSTACLE_WIDTH < 0.0
    }
}

/// Identifier of a pooled obstacle. Stable while the obstacle is active.
pub type ObstacleId = usize;

/// Arena of obstacles with a free list.
///
/// Released slots are cleared and reused; `active` keeps spawn order, which is
/// also left-to-right order since everything scrolls at the same speed.
#[derive(Debug, Clone, Default)]
pub struct ObstaclePool {
    slots: Vec<Obstacle>,
    free: Vec<ObstacleId>,
    active: Vec<ObstacleId>,
}

impl ObstaclePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, x: f32, gap_center: f32, variant: bool, head_index: u8) -> ObstacleId {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.slots.push(Obstacle::default());
                self.slots.len() - 1
            }
        };
        self.slots[id].init(x, gap_center, variant, head_index);
        self.active.push(id);
        id
    }

    /// Active obstacle ids, oldest first.
    pub fn active(&self) -> &[ObstacleId] {
        &self.active
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: ObstacleId) -> Option<&mut Obstacle> {
        self.slots.get_mut(id)
    }

    /// Active obstacles, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.active.iter().filter_map(|&id| self.slots.get(id))
    }

    /// Release the obstacle at position `index` of [`ObstaclePool::active`].
    pub fn release_at(&mut self, index: usize) {
        if index >= self.active.len() {
            return;
        }
        let id = self.active.remove(index);
        self.slots[id] = Obstacle::default();
        self.free.push(id);
    }

    pub fn release_all(&mut self) {
        for id in self.active.drain(..) {
            self.slots[id] = Obstacle::default();
            self.free.push(id);
        }
    }

    /// Slots ever allocated (active plus free).
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rects_leave_the_gap_open() {
        let mut o = Obstacle::default();
        o.init(100.0, 300.0, false, 0);
        let bottom = o.bottom_rect();
        let top = o.top_rect();
        assert_eq!(bottom.h, 190.0);
        assert_eq!(top.y, 410.0);
        assert_eq!(top.y - (bottom.y + bottom.h), OBSTACLE_GAP);
        assert!(!bottom.overlaps(&top));
    }

    #[test]
    fn moves_left_and_leaves_screen() {
        let mut o = Obstacle::default();
        o.init(10.0, 300.0, false, 0);
        o.update(0.5, 100.0);
        assert_eq!(o.x, -40.0);
        assert!(!o.is_offscreen());
        o.update(0.5, 100.0);
        assert!(o.is_offscreen());
    }

    #[test]
    fn recycled_slots_come_back_clean() {
        let mut pool = ObstaclePool::new();
        let a = pool.spawn(850.0, 300.0, true, 1);
        pool.get_mut(a).unwrap().scored = true;
        pool.get_mut(a).unwrap().collided = true;
        pool.release_at(0);

        let b = pool.spawn(850.0, 200.0, false, 3);
        assert_eq!(a, b);
        let o = pool.get(b).unwrap();
        assert!(!o.scored);
        assert!(!o.collided);
        assert!(!o.variant);
        assert_eq!(pool.allocated(), 1);
    }

    #[test]
    fn active_order_is_spawn_order() {
        let mut pool = ObstaclePool::new();
        let a = pool.spawn(1.0, 300.0, false, 0);
        let b = pool.spawn(2.0, 300.0, false, 0);
        let c = pool.spawn(3.0, 300.0, false, 0);
        pool.release_at(1);
        assert_eq!(pool.active(), &[a, c]);
        let d = pool.spawn(4.0, 300.0, false, 0);
        assert_eq!(d, b);
        assert_eq!(pool.active(), &[a, c, d]);

        pool.release_all();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.iter().count(), 0);
    }
}
