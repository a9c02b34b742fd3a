//! Dynamic entities: the player, coins and moving lava
//!
//! Positions are the top-left corner of the actor's box, in tile units, with
//! y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::Grid;
use super::tick::KeyState;
use super::tile::{LavaMotion, Tile};
use crate::settings::Physics;

/// Variant-specific actor state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    /// Bobs around `base_pos` following `sin(wobble)`
    Coin { base_pos: Vec2, wobble: f32 },
    Lava { motion: LavaMotion, spawn: Vec2 },
}

/// A moving game entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub kind: ActorKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: Vec2,
}

/// Outcome of the player's vertical move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalMove {
    pub obstacle: Option<Tile>,
    pub jumped: bool,
}

impl Actor {
    /// Player standing on the cell where `@` appeared
    ///
    /// The player is 1.5 tiles tall, so it starts half a tile up to keep its
    /// feet on the bottom of the cell.
    pub fn player(cell: Vec2) -> Self {
        Self {
            kind: ActorKind::Player,
            pos: cell + Vec2::new(0.0, -0.5),
            size: Vec2::new(0.8, 1.5),
            speed: Vec2::ZERO,
        }
    }

    pub fn coin(cell: Vec2, wobble: f32) -> Self {
        let base_pos = cell + Vec2::new(0.2, 0.1);
        Self {
            kind: ActorKind::Coin { base_pos, wobble },
            pos: base_pos,
            size: Vec2::new(0.6, 0.6),
            speed: Vec2::ZERO,
        }
    }

    pub fn lava(cell: Vec2, motion: LavaMotion) -> Self {
        let speed = match motion {
            LavaMotion::Horizontal => Vec2::new(2.0, 0.0),
            LavaMotion::Vertical => Vec2::new(0.0, 2.0),
            LavaMotion::Dripping => Vec2::new(0.0, 3.0),
        };
        Self {
            kind: ActorKind::Lava {
                motion,
                spawn: cell,
            },
            pos: cell,
            size: Vec2::ONE,
            speed,
        }
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        matches!(self.kind, ActorKind::Player)
    }

    #[inline]
    pub fn is_coin(&self) -> bool {
        matches!(self.kind, ActorKind::Coin { .. })
    }

    #[inline]
    pub fn is_lava(&self) -> bool {
        matches!(self.kind, ActorKind::Lava { .. })
    }

    /// Character used in level plans and the text renderer
    pub fn glyph(&self) -> char {
        match self.kind {
            ActorKind::Player => '@',
            ActorKind::Coin { .. } => 'o',
            ActorKind::Lava { motion, .. } => motion.plan_char(),
        }
    }

    /// Center of the actor's box
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict box overlap; touching edges do not count
    pub fn overlaps(&self, other: &Actor) -> bool {
        self.pos.x + self.size.x > other.pos.x
            && self.pos.x < other.pos.x + other.size.x
            && self.pos.y + self.size.y > other.pos.y
            && self.pos.y < other.pos.y + other.size.y
    }

    /// Lava: move, then bounce or restart from the spawn point on impact
    pub fn act_lava(&mut self, step: f32, grid: &Grid) {
        let ActorKind::Lava { motion, spawn } = self.kind else {
            return;
        };
        let new_pos = self.pos + self.speed * step;
        if grid.obstacle_at(new_pos, self.size).is_none() {
            self.pos = new_pos;
        } else if motion == LavaMotion::Dripping {
            self.pos = spawn;
        } else {
            self.speed = self.speed * -1.0;
        }
    }

    /// Coin: wobble in place
    pub fn act_coin(&mut self, step: f32, physics: &Physics) {
        if let ActorKind::Coin {
            base_pos,
            ref mut wobble,
        } = self.kind
        {
            *wobble += step * physics.wobble_speed;
            let offset = wobble.sin() * physics.wobble_dist;
            self.pos = base_pos + Vec2::new(0.0, offset);
        }
    }

    /// Player horizontal motion
    ///
    /// Returns the obstacle that blocked the move, if any. A blocked move is
    /// not applied.
    pub fn move_x(
        &mut self,
        step: f32,
        grid: &Grid,
        keys: &KeyState,
        physics: &Physics,
    ) -> Option<Tile> {
        self.speed.x = 0.0;
        if keys.left {
            self.speed.x -= physics.player_x_speed;
        }
        if keys.right {
            self.speed.x += physics.player_x_speed;
        }

        let new_pos = self.pos + Vec2::new(self.speed.x * step, 0.0);
        let obstacle = grid.obstacle_at(new_pos, self.size);
        if obstacle.is_none() {
            self.pos = new_pos;
        }
        obstacle
    }

    /// Player vertical motion: gravity, landing and jumping
    pub fn move_y(
        &mut self,
        step: f32,
        grid: &Grid,
        keys: &KeyState,
        physics: &Physics,
    ) -> VerticalMove {
        self.speed.y += step * physics.gravity;
        let new_pos = self.pos + Vec2::new(0.0, self.speed.y * step);
        let obstacle = grid.obstacle_at(new_pos, self.size);
        let mut jumped = false;

        if obstacle.is_some() {
            // Only a downward collision (landing) allows a jump
            if keys.up && self.speed.y > 0.0 {
                self.speed.y = -physics.jump_speed;
                jumped = true;
            } else {
                self.speed.y = 0.0;
            }
        } else {
            self.pos = new_pos;
        }

        VerticalMove { obstacle, jumped }
    }

    /// Sink into the floor after losing
    pub fn sink(&mut self, step: f32) {
        self.pos.y += step;
        self.size.y = (self.size.y - step).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(pos: Vec2, size: Vec2) -> Actor {
        Actor {
            kind: ActorKind::Player,
            pos,
            size,
            speed: Vec2::ZERO,
        }
    }

    #[test]
    fn test_player_spawn_offset() {
        let player = Actor::player(Vec2::new(4.0, 4.0));
        assert_eq!(player.pos, Vec2::new(4.0, 3.5));
        assert_eq!(player.size, Vec2::new(0.8, 1.5));
        // Feet rest on the bottom of the spawn cell
        assert_eq!(player.pos.y + player.size.y, 5.0);
    }

    #[test]
    fn test_coin_spawn_offset() {
        let coin = Actor::coin(Vec2::new(2.0, 3.0), 0.0);
        assert!((coin.pos - Vec2::new(2.2, 3.1)).length() < 1e-6);
        assert!(coin.is_coin());
        assert_eq!(coin.glyph(), 'o');
    }

    #[test]
    fn test_lava_speeds() {
        let lava = Actor::lava(Vec2::ZERO, LavaMotion::Horizontal);
        assert_eq!(lava.speed, Vec2::new(2.0, 0.0));
        let lava = Actor::lava(Vec2::ZERO, LavaMotion::Vertical);
        assert_eq!(lava.speed, Vec2::new(0.0, 2.0));
        let lava = Actor::lava(Vec2::ZERO, LavaMotion::Dripping);
        assert_eq!(lava.speed, Vec2::new(0.0, 3.0));
        assert_eq!(lava.glyph(), 'v');
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = boxed(Vec2::ZERO, Vec2::ONE);
        let touching = boxed(Vec2::new(1.0, 0.0), Vec2::ONE);
        let inside = boxed(Vec2::new(0.5, 0.5), Vec2::ONE);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_coin_wobble_stays_near_base() {
        let physics = Physics::default();
        let mut coin = Actor::coin(Vec2::new(1.0, 1.0), 0.0);
        let ActorKind::Coin { base_pos, .. } = coin.kind else {
            unreachable!()
        };
        for _ in 0..100 {
            coin.act_coin(0.05, &physics);
            assert_eq!(coin.pos.x, base_pos.x);
            assert!((coin.pos.y - base_pos.y).abs() <= physics.wobble_dist + 1e-6);
        }
    }

    #[test]
    fn test_sink_never_goes_negative() {
        let mut player = Actor::player(Vec2::ZERO);
        for _ in 0..40 {
            player.sink(0.05);
        }
        assert_eq!(player.size.y, 0.0);
        assert!((player.pos.y - 1.5).abs() < 1e-4);
    }
}
