//! Deterministic timing module
//!
//! Everything time-driven lives here. This module must be pure and deterministic:
//! - Time only enters as an explicit `now` (ms) from the caller
//! - Seeded RNG only
//! - Timers fire in due order, ties in scheduling order
//! - No rendering, audio or storage dependencies

pub mod phase;
pub mod scheduler;
pub mod spawner;

pub use phase::{PhaseEvent, PhaseSample, PhaseSpan, PhaseTimer, sample};
pub use scheduler::{Scheduler, TimerId};
pub use spawner::{
    CategoryRule, EntityId, EphemeralEntity, Rarity, SpawnEvent, Spawner, SpawnerConfig,
};
