//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Fixed-order tick sequence, one step per frame callback
//! - Seeded RNG only (the level generator owns a Pcg32)
//! - No rendering or platform dependencies

pub mod level;
pub mod rope;
pub mod state;
pub mod tick;

pub use level::{LevelGen, Scroll, Segment, Spike};
pub use rope::{Hook, RopePhysics, RopeStep};
pub use state::{RunPhase, RunState};
pub use tick::{Game, Player, TickInput, tick, START_X};
