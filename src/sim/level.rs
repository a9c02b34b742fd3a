//! Level: static tile grid plus the actors moving over it

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::actor::Actor;
use super::state::{GameEvent, LevelStatus};
use super::tile::{PlanCell, Tile};
use crate::error::LevelError;
use crate::settings::Physics;

/// Row-major grid of static tiles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl Grid {
    pub fn new(width: usize, height: usize, cells: Vec<Tile>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at a cell, `Empty` outside the grid
    pub fn get(&self, x: usize, y: usize) -> Tile {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Tile::Empty
        }
    }

    /// First obstacle covered by the box at `pos` with `size`
    ///
    /// The sides and top of the level act as walls, the space below it as
    /// lava.
    pub fn obstacle_at(&self, pos: Vec2, size: Vec2) -> Option<Tile> {
        let x_start = pos.x.floor() as i64;
        let x_end = (pos.x + size.x).ceil() as i64;
        let y_start = pos.y.floor() as i64;
        let y_end = (pos.y + size.y).ceil() as i64;

        if x_start < 0 || x_end > self.width as i64 || y_start < 0 {
            return Some(Tile::Wall);
        }
        if y_end > self.height as i64 {
            return Some(Tile::Lava);
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                let tile = self.get(x as usize, y as usize);
                if tile.is_obstacle() {
                    return Some(tile);
                }
            }
        }
        None
    }
}

/// What the player ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Tile(Tile),
    /// Index into [`Level::actors`]
    Actor(usize),
}

/// A playable level
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    /// 0-based position in the level pack
    pub number: usize,
    pub grid: Grid,
    /// In plan scan order (row-major); collision tie-breaks follow this order
    pub actors: Vec<Actor>,
    pub physics: Physics,
    status: LevelStatus,
    /// Seconds left before a won or lost level counts as finished
    finish_delay: f32,
    total_coins: usize,
    player_index: usize,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl Level {
    /// Build a level from a fixed-width plan
    ///
    /// `seed` drives the coins' wobble phases.
    pub fn new<S: AsRef<str>>(plan: &[S], number: usize, seed: u64) -> Result<Self, LevelError> {
        let width = plan
            .first()
            .map(|row| row.as_ref().chars().count())
            .unwrap_or(0);
        if width == 0 {
            return Err(LevelError::EmptyPlan);
        }
        let height = plan.len();

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut cells = Vec::with_capacity(width * height);
        let mut actors = Vec::new();

        for (y, row) in plan.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(LevelError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, ch) in row.chars().enumerate() {
                let cell = PlanCell::from_char(ch).ok_or(LevelError::UnknownTile {
                    ch,
                    row: y,
                    column: x,
                })?;
                let at = Vec2::new(x as f32, y as f32);
                let tile = match cell {
                    PlanCell::Tile(tile) => tile,
                    PlanCell::Player => {
                        actors.push(Actor::player(at));
                        Tile::Empty
                    }
                    PlanCell::Coin => {
                        actors.push(Actor::coin(at, rng.random_range(0.0..TAU)));
                        Tile::Empty
                    }
                    PlanCell::Lava(motion) => {
                        actors.push(Actor::lava(at, motion));
                        Tile::Empty
                    }
                };
                cells.push(tile);
            }
        }

        let players = actors.iter().filter(|a| a.is_player()).count();
        let player_index = match players {
            0 => return Err(LevelError::MissingPlayer),
            1 => actors
                .iter()
                .position(Actor::is_player)
                .ok_or(LevelError::MissingPlayer)?,
            count => return Err(LevelError::MultiplePlayers { count }),
        };
        let total_coins = actors.iter().filter(|a| a.is_coin()).count();

        log::debug!(
            "Level {}: {}x{}, {} actors, {} coins",
            number + 1,
            width,
            height,
            actors.len(),
            total_coins
        );

        Ok(Self {
            number,
            grid: Grid::new(width, height, cells),
            actors,
            physics: Physics::default(),
            status: LevelStatus::Playing,
            finish_delay: 0.0,
            total_coins,
            player_index,
            events: Vec::new(),
        })
    }

    /// Replace the default physics tuning
    pub fn with_physics(mut self, physics: Physics) -> Result<Self, LevelError> {
        physics.validate()?;
        self.physics = physics;
        Ok(self)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    #[inline]
    pub fn status(&self) -> LevelStatus {
        self.status
    }

    #[inline]
    pub fn finish_delay(&self) -> f32 {
        self.finish_delay
    }

    pub fn player(&self) -> &Actor {
        &self.actors[self.player_index]
    }

    pub fn player_mut(&mut self) -> &mut Actor {
        &mut self.actors[self.player_index]
    }

    #[inline]
    pub fn player_index(&self) -> usize {
        self.player_index
    }

    pub fn total_coins(&self) -> usize {
        self.total_coins
    }

    pub fn coins_remaining(&self) -> usize {
        self.actors.iter().filter(|a| a.is_coin()).count()
    }

    pub fn coins_collected(&self) -> usize {
        self.total_coins - self.coins_remaining()
    }

    /// Level has ended and its finish delay has run out
    pub fn is_finished(&self) -> bool {
        self.status != LevelStatus::Playing && self.finish_delay < 0.0
    }

    /// See [`Grid::obstacle_at`]
    #[inline]
    pub fn obstacle_at(&self, pos: Vec2, size: Vec2) -> Option<Tile> {
        self.grid.obstacle_at(pos, size)
    }

    /// First actor, in list order, overlapping the actor at `index`
    pub fn actor_at(&self, index: usize) -> Option<usize> {
        let actor = self.actors.get(index)?;
        self.actors
            .iter()
            .enumerate()
            .find(|&(i, other)| i != index && actor.overlaps(other))
            .map(|(i, _)| i)
    }

    /// React to the player touching a tile or another actor
    ///
    /// Returns the index of an actor removed from the list, if any.
    pub fn player_touched(&mut self, contact: Contact) -> Option<usize> {
        let lava = match contact {
            Contact::Tile(tile) => tile == Tile::Lava,
            Contact::Actor(i) => self.actors.get(i).is_some_and(Actor::is_lava),
        };
        if lava {
            self.burn();
            return None;
        }

        match contact {
            Contact::Actor(i) if self.actors.get(i).is_some_and(Actor::is_coin) => {
                self.collect_coin(i);
                Some(i)
            }
            _ => None,
        }
    }

    fn burn(&mut self) {
        if self.status == LevelStatus::Playing {
            log::info!("Level {} lost", self.number + 1);
            self.status = LevelStatus::Lost;
            self.finish_delay = self.physics.finish_delay;
            self.events.push(GameEvent::Burned);
        }
    }

    fn collect_coin(&mut self, index: usize) {
        self.actors.remove(index);
        if index < self.player_index {
            self.player_index -= 1;
        }

        let remaining = self.coins_remaining();
        self.events.push(GameEvent::CoinCollected { remaining });
        if remaining == 0 && self.status == LevelStatus::Playing {
            log::info!("Level {} won", self.number + 1);
            self.status = LevelStatus::Won;
            self.finish_delay = self.physics.finish_delay;
            self.events.push(GameEvent::LevelWon);
        }
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn tick_finish_delay(&mut self, step: f32) {
        if self.status != LevelStatus::Playing {
            self.finish_delay -= step;
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: [&str; 9] = [
        "                      ",
        "                      ",
        "  x              = x  ",
        "  x         o o    x  ",
        "  x @      xxxxx   x  ",
        "  xxxxx            x  ",
        "      x!!!!!!!!!!!!x  ",
        "      xxxxxxxxxxxxxx  ",
        "                      ",
    ];

    #[test]
    fn test_parse_simple_level() {
        let level = Level::new(&SIMPLE, 0, 1).unwrap();
        assert_eq!(level.width(), 22);
        assert_eq!(level.height(), 9);
        assert_eq!(level.actors.len(), 4);
        assert_eq!(level.total_coins(), 2);
        assert_eq!(level.status(), LevelStatus::Playing);
        assert_eq!(level.grid.get(2, 2), Tile::Wall);
        assert_eq!(level.grid.get(7, 6), Tile::Lava);
        assert_eq!(level.grid.get(4, 4), Tile::Empty);
        assert_eq!(level.player().pos, Vec2::new(4.0, 3.5));
        // Scan order: lava on row 2, coins on row 3, player on row 4
        assert!(level.actors[0].is_lava());
        assert!(level.actors[1].is_coin());
        assert_eq!(level.player_index(), 3);
    }

    #[test]
    fn test_same_seed_same_wobble() {
        let a = Level::new(&SIMPLE, 0, 42).unwrap();
        let b = Level::new(&SIMPLE, 0, 42).unwrap();
        assert_eq!(a.actors, b.actors);
    }

    #[test]
    fn test_empty_plan() {
        let plan: [&str; 0] = [];
        assert!(matches!(Level::new(&plan, 0, 0), Err(LevelError::EmptyPlan)));
        assert!(matches!(Level::new(&[""], 0, 0), Err(LevelError::EmptyPlan)));
    }

    #[test]
    fn test_ragged_row() {
        let err = Level::new(&["x@x", "xx"], 0, 0).unwrap_err();
        assert!(matches!(
            err,
            LevelError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_unknown_tile() {
        let err = Level::new(&[" @ ", "x#x"], 0, 0).unwrap_err();
        assert!(matches!(
            err,
            LevelError::UnknownTile {
                ch: '#',
                row: 1,
                column: 1
            }
        ));
    }

    #[test]
    fn test_player_count() {
        assert!(matches!(
            Level::new(&["   ", "xxx"], 0, 0),
            Err(LevelError::MissingPlayer)
        ));
        assert!(matches!(
            Level::new(&["@ @", "xxx"], 0, 0),
            Err(LevelError::MultiplePlayers { count: 2 })
        ));
    }

    #[test]
    fn test_obstacle_at_borders() {
        let level = Level::new(&SIMPLE, 0, 0).unwrap();
        let size = Vec2::new(0.8, 1.5);
        assert_eq!(level.obstacle_at(Vec2::new(-0.1, 1.0), size), Some(Tile::Wall));
        assert_eq!(level.obstacle_at(Vec2::new(21.5, 1.0), size), Some(Tile::Wall));
        assert_eq!(level.obstacle_at(Vec2::new(1.0, -0.1), size), Some(Tile::Wall));
        assert_eq!(level.obstacle_at(Vec2::new(0.0, 8.0), size), Some(Tile::Lava));
        assert_eq!(level.obstacle_at(Vec2::new(0.0, 0.0), size), None);
    }

    #[test]
    fn test_obstacle_at_tiles() {
        let level = Level::new(&SIMPLE, 0, 0).unwrap();
        // Overlapping the lava pool
        assert_eq!(
            level.obstacle_at(Vec2::new(8.0, 5.5), Vec2::new(0.8, 1.0)),
            Some(Tile::Lava)
        );
        // Standing exactly on the floor is not a collision
        assert_eq!(
            level.obstacle_at(Vec2::new(4.0, 3.5), Vec2::new(0.8, 1.5)),
            None
        );
        // Edge of the box lies on the wall cell boundary
        assert_eq!(
            level.obstacle_at(Vec2::new(3.0, 3.5), Vec2::new(0.8, 1.5)),
            None
        );
        assert_eq!(
            level.obstacle_at(Vec2::new(2.9, 3.5), Vec2::new(0.8, 1.5)),
            Some(Tile::Wall)
        );
    }

    #[test]
    fn test_actor_at_first_in_list_order() {
        let mut level = Level::new(&["@oo", "xxx"], 0, 0).unwrap();
        let player = level.player_index();
        assert_eq!(level.actor_at(player), None);

        // Stack both coins on top of the player
        let pos = level.player().pos;
        level.actors[1].pos = pos;
        level.actors[2].pos = pos;
        assert_eq!(level.actor_at(player), Some(1));
    }

    #[test]
    fn test_collect_coins_then_win() {
        let mut level = Level::new(&["o@o", "xxx"], 0, 0).unwrap();
        assert_eq!(level.player_index(), 1);

        assert_eq!(level.player_touched(Contact::Actor(0)), Some(0));
        assert_eq!(level.player_index(), 0);
        assert!(level.player().is_player());
        assert_eq!(level.coins_remaining(), 1);
        assert_eq!(level.coins_collected(), 1);
        assert_eq!(level.status(), LevelStatus::Playing);

        assert_eq!(level.player_touched(Contact::Actor(1)), Some(1));
        assert_eq!(level.status(), LevelStatus::Won);
        assert_eq!(level.finish_delay(), 1.0);
        assert_eq!(
            level.drain_events(),
            vec![
                GameEvent::CoinCollected { remaining: 1 },
                GameEvent::CoinCollected { remaining: 0 },
                GameEvent::LevelWon,
            ]
        );
        assert!(level.drain_events().is_empty());
    }

    #[test]
    fn test_lava_loses_once() {
        let mut level = Level::new(&["@ o", "xxx"], 0, 0).unwrap();
        level.player_touched(Contact::Tile(Tile::Lava));
        assert_eq!(level.status(), LevelStatus::Lost);
        level.player_touched(Contact::Tile(Tile::Lava));
        assert_eq!(level.drain_events(), vec![GameEvent::Burned]);
    }

    #[test]
    fn test_status_never_leaves_lost() {
        let mut level = Level::new(&["@ o", "xxx"], 0, 0).unwrap();
        level.player_touched(Contact::Tile(Tile::Lava));
        // The last coin is still removed but does not win the level
        assert_eq!(level.player_touched(Contact::Actor(1)), Some(1));
        assert_eq!(level.coins_remaining(), 0);
        assert_eq!(level.status(), LevelStatus::Lost);
    }

    #[test]
    fn test_wall_contact_is_harmless() {
        let mut level = Level::new(&["@ o", "xxx"], 0, 0).unwrap();
        assert_eq!(level.player_touched(Contact::Tile(Tile::Wall)), None);
        assert_eq!(level.status(), LevelStatus::Playing);
    }

    #[test]
    fn test_with_physics_validates() {
        let level = Level::new(&SIMPLE, 0, 0).unwrap();
        let bad = Physics {
            max_step: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            level.clone().with_physics(bad),
            Err(LevelError::Physics(_))
        ));

        let slow = Physics {
            gravity: 10.0,
            ..Default::default()
        };
        assert_eq!(level.with_physics(slow).unwrap().physics.gravity, 10.0);
    }

    #[test]
    fn test_snapshot_json() {
        let mut level = Level::new(&SIMPLE, 0, 0).unwrap();
        level.player_touched(Contact::Tile(Tile::Lava));
        let json = serde_json::to_value(&level).unwrap();
        assert_eq!(json["status"], "Lost");
        assert_eq!(json["grid"]["width"], 22);
        // Pending events are not part of a snapshot
        assert!(json.get("events").is_none());
    }
}
