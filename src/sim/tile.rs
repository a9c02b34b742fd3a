//! Static grid cells and the level plan vocabulary

use serde::{Deserialize, Serialize};

/// A static grid cell kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Lava,
}

impl Tile {
    /// Whether actors are stopped by this tile
    #[inline]
    pub fn is_obstacle(self) -> bool {
        self != Tile::Empty
    }

    /// Character used by the text renderer
    pub fn glyph(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => '#',
            Tile::Lava => '!',
        }
    }
}

/// Motion pattern of a lava actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LavaMotion {
    /// `=`: patrols left and right
    Horizontal,
    /// `|`: patrols up and down
    Vertical,
    /// `v`: falls and restarts from its spawn point
    Dripping,
}

impl LavaMotion {
    pub fn plan_char(self) -> char {
        match self {
            LavaMotion::Horizontal => '=',
            LavaMotion::Vertical => '|',
            LavaMotion::Dripping => 'v',
        }
    }
}

/// What a single plan character places into the level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanCell {
    Tile(Tile),
    Player,
    Coin,
    Lava(LavaMotion),
}

impl PlanCell {
    /// Decode a plan character, `None` for characters outside the vocabulary
    pub fn from_char(ch: char) -> Option<Self> {
        let cell = match ch {
            ' ' => PlanCell::Tile(Tile::Empty),
            'x' => PlanCell::Tile(Tile::Wall),
            '!' => PlanCell::Tile(Tile::Lava),
            '@' => PlanCell::Player,
            'o' => PlanCell::Coin,
            '=' => PlanCell::Lava(LavaMotion::Horizontal),
            '|' => PlanCell::Lava(LavaMotion::Vertical),
            'v' => PlanCell::Lava(LavaMotion::Dripping),
            _ => return None,
        };
        Some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary() {
        assert_eq!(PlanCell::from_char('x'), Some(PlanCell::Tile(Tile::Wall)));
        assert_eq!(PlanCell::from_char('!'), Some(PlanCell::Tile(Tile::Lava)));
        assert_eq!(PlanCell::from_char(' '), Some(PlanCell::Tile(Tile::Empty)));
        assert_eq!(PlanCell::from_char('@'), Some(PlanCell::Player));
        assert_eq!(PlanCell::from_char('o'), Some(PlanCell::Coin));
        assert_eq!(
            PlanCell::from_char('v'),
            Some(PlanCell::Lava(LavaMotion::Dripping))
        );
        assert_eq!(PlanCell::from_char('?'), None);
    }

    #[test]
    fn test_lava_chars_round_trip() {
        for motion in [
            LavaMotion::Horizontal,
            LavaMotion::Vertical,
            LavaMotion::Dripping,
        ] {
            assert_eq!(
                PlanCell::from_char(motion.plan_char()),
                Some(PlanCell::Lava(motion))
            );
        }
    }
}
