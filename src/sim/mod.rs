//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Time is sliced into steps no longer than `Physics::max_step`
//! - Seeded RNG only
//! - Stable iteration order (actor list order)
//! - No rendering or platform dependencies

pub mod actor;
pub mod level;
pub mod state;
pub mod tick;
pub mod tile;

pub use actor::{Actor, ActorKind};
pub use level::{Contact, Grid, Level};
pub use state::{GameEvent, LevelStatus};
pub use tick::KeyState;
pub use tile::{LavaMotion, PlanCell, Tile};
