//! Fixed-step simulation
//!
//! A frame's elapsed time is cut into slices no longer than
//! `Physics::max_step` so fast actors cannot skip through thin walls.

use serde::{Deserialize, Serialize};

use super::actor::ActorKind;
use super::level::{Contact, Level};
use super::state::{GameEvent, LevelStatus};
use crate::consts::MIN_STEP;

/// Movement keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

impl KeyState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.up
    }
}

impl Level {
    /// Advance the level by `step` seconds
    pub fn animate(&mut self, step: f32, keys: &KeyState) {
        if !step.is_finite() {
            log::warn!("Ignoring non-finite step {step}");
            return;
        }
        self.tick_finish_delay(step);

        // Physics fields are public, so bound the slice even if unvalidated
        let max_step = self.physics.max_step.max(MIN_STEP);
        let mut remaining = step;
        while remaining > 0.0 {
            let this_step = remaining.min(max_step);
            self.substep(this_step, keys);
            let left = remaining - this_step;
            if left >= remaining {
                break;
            }
            remaining = left;
        }
    }

    /// Run every actor once, in list order
    fn substep(&mut self, step: f32, keys: &KeyState) {
        let mut i = 0;
        while i < self.actors.len() {
            match self.act(i, step, keys) {
                // An earlier actor left the list; index `i` now holds the next one
                Some(removed) if removed < i => {}
                _ => i += 1,
            }
        }
    }

    /// Update one actor, returning the index of any actor removed as a result
    fn act(&mut self, index: usize, step: f32, keys: &KeyState) -> Option<usize> {
        match self.actors[index].kind {
            ActorKind::Lava { .. } => {
                self.actors[index].act_lava(step, &self.grid);
                None
            }
            ActorKind::Coin { .. } => {
                let physics = self.physics;
                self.actors[index].act_coin(step, &physics);
                None
            }
            ActorKind::Player => self.act_player(index, step, keys),
        }
    }

    fn act_player(&mut self, index: usize, step: f32, keys: &KeyState) -> Option<usize> {
        let physics = self.physics;

        let player = &mut self.actors[index];
        let blocked_x = player.move_x(step, &self.grid, keys, &physics);
        if let Some(tile) = blocked_x {
            self.player_touched(Contact::Tile(tile));
        }

        let player = &mut self.actors[index];
        let vertical = player.move_y(step, &self.grid, keys, &physics);
        if let Some(tile) = vertical.obstacle {
            self.player_touched(Contact::Tile(tile));
        }
        if vertical.jumped {
            self.push_event(GameEvent::Jumped);
        }

        let removed = self
            .actor_at(index)
            .and_then(|other| self.player_touched(Contact::Actor(other)));

        if self.status() == LevelStatus::Lost {
            self.player_mut().sink(step);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::Tile;

    const FLOOR: [&str; 3] = [
        "x    x",
        "x @  x",
        "xxxxxx",
    ];

    fn hold(left: bool, right: bool, up: bool) -> KeyState {
        KeyState { left, right, up }
    }

    #[test]
    fn test_player_rests_on_floor() {
        let mut level = Level::new(&FLOOR, 0, 0).unwrap();
        let start = level.player().pos;
        for _ in 0..20 {
            level.animate(0.05, &KeyState::default());
        }
        assert_eq!(level.player().pos, start);
        assert_eq!(level.player().speed.y, 0.0);
    }

    #[test]
    fn test_player_blocked_by_wall() {
        let mut level = Level::new(&FLOOR, 0, 0).unwrap();
        // Walk left until the wall stops us
        for _ in 0..40 {
            level.animate(0.05, &hold(true, false, false));
        }
        let x = level.player().pos.x;
        assert!(x >= 1.0, "player entered the wall: x = {x}");
        level.animate(0.05, &hold(true, false, false));
        assert_eq!(level.player().pos.x, x);
        assert_eq!(level.status(), LevelStatus::Playing);
    }

    #[test]
    fn test_walk_right_moves_player() {
        let mut level = Level::new(&FLOOR, 0, 0).unwrap();
        level.animate(0.05, &hold(false, true, false));
        assert!((level.player().pos.x - 2.35).abs() < 1e-5);
        // Opposite keys cancel out
        let x = level.player().pos.x;
        level.animate(0.05, &hold(true, true, false));
        assert_eq!(level.player().pos.x, x);
    }

    #[test]
    fn test_jump_from_floor() {
        let plan = ["x    x", "x    x", "x    x", "x    x", "x @  x", "xxxxxx"];
        let mut level = Level::new(&plan, 0, 0).unwrap();
        level.animate(0.05, &hold(false, false, true));
        assert_eq!(level.player().speed.y, -17.0);
        assert!(level.drain_events().contains(&GameEvent::Jumped));

        level.animate(0.05, &KeyState::default());
        assert!(level.player().pos.y < 3.5);
    }

    #[test]
    fn test_no_jump_in_mid_air() {
        let mut level = Level::new(&["x  x", "x@ x", "x  x", "xxxx"], 0, 0).unwrap();
        // Falling without ground below: holding up does nothing
        level.animate(0.05, &hold(false, false, true));
        assert!(level.player().speed.y > 0.0);
        assert!(level.drain_events().is_empty());
    }

    #[test]
    fn test_large_step_is_subdivided() {
        let mut a = Level::new(&FLOOR, 0, 0).unwrap();
        let mut b = Level::new(&FLOOR, 0, 0).unwrap();
        let keys = hold(false, true, false);
        a.animate(0.1, &keys);
        b.animate(0.05, &keys);
        b.animate(0.05, &keys);
        assert!((a.player().pos - b.player().pos).length() < 1e-5);
    }

    #[test]
    fn test_non_finite_step_ignored() {
        let mut level = Level::new(&FLOOR, 0, 0).unwrap();
        let before = level.player().pos;
        level.animate(f32::INFINITY, &hold(false, true, false));
        level.animate(f32::NAN, &hold(false, true, false));
        assert_eq!(level.player().pos, before);
    }

    #[test]
    fn test_horizontal_lava_bounces() {
        let mut level = Level::new(&["x= x", "x  x", "x @x", "xxxx"], 0, 0).unwrap();
        assert!(level.actors[0].is_lava());
        // Moves right at 2 tiles/s until it hits the right wall
        level.animate(0.25, &KeyState::default());
        assert!((level.actors[0].pos.x - 1.5).abs() < 1e-5);
        level.animate(0.25, &KeyState::default());
        level.animate(0.05, &KeyState::default());
        assert!(level.actors[0].speed.x < 0.0);
        assert!(level.actors[0].pos.x <= 2.0);
    }

    #[test]
    fn test_vertical_lava_bounces() {
        let mut level = Level::new(&["x| x", "x  x", "x @x", "xxxx"], 0, 0).unwrap();
        assert!(level.actors[0].is_lava());
        assert_eq!(level.actors[0].speed, Vec2::new(0.0, 2.0));

        // Two tiles down to the floor, then back up
        for _ in 0..24 {
            level.animate(0.05, &KeyState::default());
        }
        let lava = &level.actors[0];
        assert!(lava.speed.y < 0.0);
        assert!(lava.pos.y + lava.size.y <= 3.0 + 1e-4);

        // The top edge of the level bounces it down again
        for _ in 0..24 {
            level.animate(0.05, &KeyState::default());
        }
        let lava = &level.actors[0];
        assert!(lava.speed.y > 0.0);
        assert!(lava.pos.y >= 0.0);
        assert_eq!(level.status(), LevelStatus::Playing);
    }

    #[test]
    fn test_unvalidated_zero_step_still_advances() {
        let mut level = Level::new(&FLOOR, 0, 0).unwrap();
        level.physics.max_step = 0.0;
        let start = level.player().pos;
        level.animate(0.05, &hold(false, true, false));
        assert!((level.player().pos.x - start.x - 0.35).abs() < 1e-3);
    }

    #[test]
    fn test_dripping_lava_restarts() {
        let mut level = Level::new(&["xv x", "x  x", "x @x", "xxxx"], 0, 0).unwrap();
        let spawn = level.actors[0].pos;
        level.animate(0.2, &KeyState::default());
        assert!(level.actors[0].pos.y > spawn.y);
        // Reaches the floor after two tiles and jumps back to its spawn
        for _ in 0..20 {
            level.animate(0.05, &KeyState::default());
        }
        let drop = &level.actors[0];
        assert!(drop.pos.y >= spawn.y && drop.pos.y <= 2.0);
        assert_eq!(drop.speed, Vec2::new(0.0, 3.0));
    }

    #[test]
    fn test_falling_into_lava_loses() {
        let mut level = Level::new(&["x  x", "x@ x", "x  x", "x!!x", "xxxx"], 0, 0).unwrap();
        for _ in 0..20 {
            level.animate(0.05, &KeyState::default());
        }
        assert_eq!(level.status(), LevelStatus::Lost);
        assert!(level.drain_events().contains(&GameEvent::Burned));
        // Finish delay counts down once lost
        assert!(level.finish_delay() < 1.0);
    }

    #[test]
    fn test_lava_actor_contact_loses() {
        let mut level = Level::new(&["x  x", "x@|x", "xxxx"], 0, 0).unwrap();
        let lava_pos = level.actors[1].pos;
        level.player_mut().pos = lava_pos - Vec2::new(0.5, 0.5);
        level.animate(0.01, &KeyState::default());
        assert_eq!(level.status(), LevelStatus::Lost);
    }

    #[test]
    fn test_walk_into_coin_wins() {
        let mut level = Level::new(&["x    x", "x@ o x", "xxxxxx"], 0, 0).unwrap();
        for _ in 0..10 {
            level.animate(0.05, &hold(false, true, false));
        }
        assert_eq!(level.coins_remaining(), 0);
        assert_eq!(level.status(), LevelStatus::Won);
        assert!(!level.is_finished());

        for _ in 0..25 {
            level.animate(0.05, &KeyState::default());
        }
        assert!(level.is_finished());
    }

    #[test]
    fn test_coin_before_player_keeps_everyone_acting() {
        // Coin listed before the player is removed mid-pass
        let mut level = Level::new(&["x o   x", "x @ = x", "xxxxxxx"], 0, 0).unwrap();
        assert_eq!(level.player_index(), 1);
        let coin_pos = level.actors[0].pos;
        level.player_mut().pos = coin_pos;
        let lava_before = level.actors[2].pos;
        level.animate(0.01, &KeyState::default());
        assert_eq!(level.coins_remaining(), 0);
        assert_eq!(level.player_index(), 0);
        // The lava after the player still moved this step
        assert_ne!(level.actors[1].pos, lava_before);
    }

    #[test]
    fn test_lost_player_sinks() {
        let mut level = Level::new(&FLOOR, 0, 0).unwrap();
        level.player_touched(Contact::Tile(Tile::Lava));
        let height = level.player().size.y;
        level.animate(0.05, &KeyState::default());
        assert!(level.player().size.y < height);
    }
}
