//! Calm Corner - small calming activities with local persistence
//!
//! Core modules:
//! - `persistence`: Key-value store adapters and the typed state mirror
//! - `platform`: Clock sources (simulated, system, browser) and the web host
//! - `sim`: Deterministic timing engines (scheduler, phase timer, spawner)
//! - `audio`: Fire-and-forget sound trigger with persisted mute/volume
//! - `activities`: The activities built on top of the core

pub mod activities;
pub mod audio;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use activities::{ActivityKind, Context, RunState};
pub use audio::{AudioManager, PlayOptions, Sound};
pub use persistence::{KeyValueStore, MemoryStore, PersistedState, StorageError};
pub use platform::{Clock, SimClock};
pub use settings::AudioSettings;

/// Timing and tuning constants
pub mod consts {
    /// Phase timer tick granularity (ms)
    pub const TICK_MS: u64 = 100;

    /// 4-7-8 breathing pattern (ms)
    pub const INHALE_MS: u64 = 4000;
    pub const HOLD_MS: u64 = 7000;
    pub const EXHALE_MS: u64 = 8000;

    /// Bubble scale bounds for the breathing guide
    pub const BUBBLE_MIN_SCALE: f32 = 1.0;
    pub const BUBBLE_MAX_SCALE: f32 = 1.8;

    /// Default background music volume while breathing
    pub const BREATHE_MUSIC_VOLUME: f32 = 0.3;

    /// Fireflies round length (seconds)
    pub const FIREFLIES_ROUND_SECS: u32 = 60;
    /// Countdown step (ms)
    pub const COUNTDOWN_STEP_MS: u64 = 1000;
    /// Firefly spawn interval (ms)
    pub const FIREFLY_SPAWN_MS: u64 = 1500;
    /// Firefly lifetime before auto-removal (ms)
    pub const FIREFLY_LIFETIME_MS: u64 = 3000;
    /// Every Nth firefly is golden
    pub const GOLDEN_EVERY: u32 = 3;
    /// Spawn area in percent: [min, min + span)
    pub const SPAWN_MIN_PCT: f32 = 5.0;
    pub const SPAWN_SPAN_PCT: f32 = 85.0;

    /// How long the hand stays held (ms)
    pub const HAND_HOLD_MS: u64 = 4000;

    /// Delay before the safe zone is marked sorted (ms)
    pub const SAFE_ZONE_SETTLE_MS: u64 = 500;

    /// Worry box release animation (ms) and particle count
    pub const WORRY_RELEASE_MS: u64 = 2000;
    pub const WORRY_PARTICLES: usize = 8;
    /// Chance a worry particle is a bright sparkle
    pub const SPARKLE_CHANCE: f64 = 0.25;
}

/// Clamp a volume to [0, 1], mapping NaN to silence
#[inline]
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_volume() {
        assert_eq!(clamp_volume(-0.5), 0.0);
        assert_eq!(clamp_volume(0.4), 0.4);
        assert_eq!(clamp_volume(3.0), 1.0);
        assert_eq!(clamp_volume(f32::NAN), 0.0);
    }

    #[test]
    fn test_breathing_cycle_is_19_seconds() {
        use consts::*;
        assert_eq!(INHALE_MS + HOLD_MS + EXHALE_MS, 19_000);
        assert_eq!(INHALE_MS % TICK_MS, 0);
    }
}
