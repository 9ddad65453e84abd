//! The calming activities
//!
//! Each activity owns one storage key, its own timers, and talks to the shared
//! audio manager. Hosts call `tick()` from their timer loop; all time comes
//! from the injected clock.

pub mod breathe;
pub mod clouds;
pub mod fireflies;
pub mod garden;
pub mod hand;
pub mod journal;
pub mod love_notes;
pub mod mood;
pub mod safe_zone;
pub mod worry_box;

use std::collections::HashSet;
use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::audio::{AudioBackend, AudioManager, SharedAudio};
use crate::persistence::SharedStore;
use crate::platform::SharedClock;

pub use breathe::Breathe;
pub use clouds::Clouds;
pub use fireflies::Fireflies;
pub use garden::Garden;
pub use hand::Hand;
pub use journal::Journal;
pub use love_notes::LoveNotes;
pub use mood::MoodTracker;
pub use safe_zone::SafeZone;
pub use worry_box::WorryBox;

/// Shared collaborators handed to every activity
#[derive(Clone)]
pub struct Context {
    pub store: SharedStore,
    pub audio: SharedAudio,
    pub clock: SharedClock,
    /// Base seed for per-activity RNGs
    pub seed: u64,
}

impl Context {
    pub fn new(
        store: SharedStore,
        backend: Box<dyn AudioBackend>,
        clock: SharedClock,
        seed: u64,
    ) -> Self {
        let audio = Rc::new(AudioManager::load(store.clone(), backend));
        Self {
            store,
            audio,
            clock,
            seed,
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Independent RNG stream for one activity
    pub fn rng_for(&self, kind: ActivityKind) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed ^ (kind as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

/// Lifecycle shared by the timed activities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    /// Terminal display state of a timed round; `start` plays again
    Ended,
}

/// Catalog of activities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Breathe,
    Garden,
    Clouds,
    LoveNotes,
    Fireflies,
    Journal,
    SafeZone,
    Hand,
    Mood,
    WorryBox,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 10] = [
        ActivityKind::Breathe,
        ActivityKind::Garden,
        ActivityKind::Clouds,
        ActivityKind::LoveNotes,
        ActivityKind::Fireflies,
        ActivityKind::Journal,
        ActivityKind::SafeZone,
        ActivityKind::Hand,
        ActivityKind::Mood,
        ActivityKind::WorryBox,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ActivityKind::Breathe => "breathe",
            ActivityKind::Garden => "garden",
            ActivityKind::Clouds => "clouds",
            ActivityKind::LoveNotes => "love-notes",
            ActivityKind::Fireflies => "fireflies",
            ActivityKind::Journal => "journal",
            ActivityKind::SafeZone => "safe-zone",
            ActivityKind::Hand => "hand",
            ActivityKind::Mood => "mood",
            ActivityKind::WorryBox => "worry-box",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ActivityKind::Breathe => "Breathe With Me",
            ActivityKind::Garden => "Mind Garden",
            ActivityKind::Clouds => "Cloud Thoughts",
            ActivityKind::LoveNotes => "Love Notes",
            ActivityKind::Fireflies => "Focus Fireflies",
            ActivityKind::Journal => "Journal Carousel",
            ActivityKind::SafeZone => "Safe Zone",
            ActivityKind::Hand => "Hold My Hand",
            ActivityKind::Mood => "Color My Mood",
            ActivityKind::WorryBox => "Worry Box",
        }
    }

    /// The one storage key this activity may touch
    pub fn storage_key(&self) -> &'static str {
        match self {
            ActivityKind::Breathe => breathe::STORAGE_KEY,
            ActivityKind::Garden => garden::STORAGE_KEY,
            ActivityKind::Clouds => clouds::STORAGE_KEY,
            ActivityKind::LoveNotes => love_notes::STORAGE_KEY,
            ActivityKind::Fireflies => fireflies::STORAGE_KEY,
            ActivityKind::Journal => journal::STORAGE_KEY,
            ActivityKind::SafeZone => safe_zone::STORAGE_KEY,
            ActivityKind::Hand => hand::STORAGE_KEY,
            ActivityKind::Mood => mood::STORAGE_KEY,
            ActivityKind::WorryBox => worry_box::STORAGE_KEY,
        }
    }
}

/// True when the input has nothing but whitespace
pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Timestamp id, suffixed with `-n` if it collides with an existing id
pub(crate) fn unique_id<'a>(now: u64, existing: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = existing.into_iter().collect();
    let base = now.to_string();
    if !taken.contains(base.as_str()) {
        return base;
    }
    let mut n = 1u32;
    loop {
        let id = format!("{base}-{n}");
        if !taken.contains(id.as_str()) {
            return id;
        }
        n += 1;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for activity tests

    use std::rc::Rc;

    use super::Context;
    use crate::audio::testing::RecordingBackend;
    use crate::persistence::MemoryStore;
    use crate::platform::{Clock, SimClock};

    pub struct Harness {
        pub ctx: Context,
        pub store: Rc<MemoryStore>,
        pub clock: Rc<SimClock>,
        pub sounds: RecordingBackend,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_store(Rc::new(MemoryStore::new()))
        }

        /// Fresh context over an existing store (simulates a page reload)
        pub fn with_store(store: Rc<MemoryStore>) -> Self {
            let clock = Rc::new(SimClock::new(1_700_000_000_000));
            let sounds = RecordingBackend::default();
            let ctx = Context::new(store.clone(), Box::new(sounds.clone()), clock.clone(), 42);
            Self {
                ctx,
                store,
                clock,
                sounds,
            }
        }

        pub fn reload(&self) -> Self {
            let next = Self::with_store(self.store.clone());
            next.clock.set(self.clock.now_ms());
            next
        }

        pub fn advance(&self, ms: u64) {
            self.clock.advance(ms);
        }
    }
}
