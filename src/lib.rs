//! Grapple Run - simulation core for a grapple-swing endless runner
//!
//! A single forward-moving actor gains speed over time, attaches a
//! rope to procedurally spawned anchor points to swing across gaps,
//! and dies on hazards or falls. Rendering, camera, HUD and input
//! devices are host concerns; the host samples pointer state once per
//! frame and feeds [`sim::tick`].
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rope physics, level streaming,
//!   run state machine, per-tick orchestration)
//! - `config`: Injected tunable parameter bundle
//! - `persistence`: Best-score load/save port

pub mod config;
pub mod persistence;
pub mod sim;

pub use config::Config;
pub use persistence::{MemoryStore, ScoreStore};
pub use sim::{Game, RunPhase, TickInput, tick};
