//! Global audio preferences
//!
//! Persisted as two plain strings rather than a JSON blob:
//! `audio-muted` = "true" | "false", `audio-volume` = stringified float in [0, 1].

use crate::clamp_volume;
use crate::persistence::KeyValueStore;

/// Mute flag and master volume shared by every activity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioSettings {
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            muted: false,
            volume: 1.0,
        }
    }
}

impl AudioSettings {
    /// Storage keys
    pub const MUTED_KEY: &'static str = "audio-muted";
    pub const VOLUME_KEY: &'static str = "audio-volume";

    /// Set master volume, clamped to [0, 1]
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
    }

    /// Volume actually applied to a clip requested at `volume`
    pub fn effective_volume(&self, volume: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            clamp_volume(volume) * self.volume
        }
    }

    /// Load from the store. Missing or unparsable entries keep their defaults.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let mut settings = Self::default();

        match store.get_item(Self::MUTED_KEY) {
            Ok(Some(raw)) => settings.muted = raw == "true",
            Ok(None) => {}
            Err(e) => log::warn!("{}; audio stays unmuted", e),
        }

        match store.get_item(Self::VOLUME_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<f32>() {
                Ok(v) if v.is_finite() => settings.set_volume(v),
                _ => log::warn!("Ignoring bad audio volume {:?}", raw),
            },
            Ok(None) => {}
            Err(e) => log::warn!("{}; using full volume", e),
        }

        log::info!(
            "Audio settings: muted={}, volume={:.2}",
            settings.muted,
            settings.volume
        );
        settings
    }

    /// Persist both keys. Failures are logged, never returned.
    pub fn save(&self, store: &dyn KeyValueStore) {
        self.save_muted(store);
        self.save_volume(store);
    }

    pub fn save_muted(&self, store: &dyn KeyValueStore) {
        if let Err(e) = store.set_item(Self::MUTED_KEY, if self.muted { "true" } else { "false" }) {
            log::error!("Not persisted: {}", e);
        }
    }

    pub fn save_volume(&self, store: &dyn KeyValueStore) {
        if let Err(e) = store.set_item(Self::VOLUME_KEY, &self.volume.to_string()) {
            log::error!("Not persisted: {}", e);
        }
    }
}
