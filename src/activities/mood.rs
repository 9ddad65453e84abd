//! Color My Mood - log a mood as a color and tint the screen to match

use serde::{Deserialize, Serialize};

use super::{Context, unique_id};
use crate::audio::Sound;
use crate::persistence::PersistedState;

pub const STORAGE_KEY: &str = "mood-state";

/// Background shown before any mood is picked
pub const NEUTRAL_BACKGROUND: &str = "from-calm-50 to-calm-100";

/// Moods, stored by their color token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    #[serde(rename = "bg-red-500")]
    Stressed,
    #[serde(rename = "bg-orange-500")]
    Anxious,
    #[serde(rename = "bg-yellow-500")]
    Neutral,
    #[serde(rename = "bg-lime-500")]
    Content,
    #[serde(rename = "bg-green-500")]
    Happy,
    #[serde(rename = "bg-cyan-500")]
    Calm,
    #[serde(rename = "bg-blue-500")]
    Focused,
    #[serde(rename = "bg-purple-500")]
    Creative,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Stressed,
        Mood::Anxious,
        Mood::Neutral,
        Mood::Content,
        Mood::Happy,
        Mood::Calm,
        Mood::Focused,
        Mood::Creative,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Mood::Stressed => "Stressed",
            Mood::Anxious => "Anxious",
            Mood::Neutral => "Neutral",
            Mood::Content => "Content",
            Mood::Happy => "Happy",
            Mood::Calm => "Calm",
            Mood::Focused => "Focused",
            Mood::Creative => "Creative",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Mood::Stressed => "bg-red-500",
            Mood::Anxious => "bg-orange-500",
            Mood::Neutral => "bg-yellow-500",
            Mood::Content => "bg-lime-500",
            Mood::Happy => "bg-green-500",
            Mood::Calm => "bg-cyan-500",
            Mood::Focused => "bg-blue-500",
            Mood::Creative => "bg-purple-500",
        }
    }

    /// Screen gradient: each mood blends toward the next color on the wheel
    pub fn background(&self) -> &'static str {
        match self {
            Mood::Stressed => "from-red-100 to-orange-100",
            Mood::Anxious => "from-orange-100 to-yellow-100",
            Mood::Neutral => "from-yellow-100 to-lime-100",
            Mood::Content => "from-lime-100 to-green-100",
            Mood::Happy => "from-green-100 to-cyan-100",
            Mood::Calm => "from-cyan-100 to-blue-100",
            Mood::Focused => "from-blue-100 to-purple-100",
            Mood::Creative => "from-purple-100 to-pink-100",
        }
    }

    pub fn from_color(color: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.color() == color)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    #[serde(rename = "color")]
    pub mood: Mood,
    pub date: u64,
}

/// History, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodState {
    pub entries: Vec<MoodEntry>,
}

pub struct MoodTracker {
    ctx: Context,
    state: PersistedState<MoodState>,
    selected: Option<Mood>,
}

impl MoodTracker {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            state: PersistedState::load(ctx.store.clone(), STORAGE_KEY, MoodState::default()),
            selected: None,
        }
    }

    /// Record a mood and make it the current one
    pub fn select(&mut self, mood: Mood) -> String {
        self.selected = Some(mood);
        self.ctx.audio.chirp(Sound::Chime, 0.3);

        let now = self.ctx.now();
        let id = unique_id(now, self.state.get().entries.iter().map(|e| e.id.as_str()));
        let entry = MoodEntry {
            id: id.clone(),
            mood,
            date: now,
        };
        self.state.update(|s| s.entries.insert(0, entry));
        id
    }

    pub fn selected(&self) -> Option<Mood> {
        self.selected
    }

    pub fn background(&self) -> &'static str {
        self.selected
            .map(|m| m.background())
            .unwrap_or(NEUTRAL_BACKGROUND)
    }

    pub fn history(&self) -> &[MoodEntry] {
        &self.state.get().entries
    }

    /// How often each mood was logged, in `Mood::ALL` order
    pub fn tally(&self) -> [(Mood, usize); 8] {
        Mood::ALL.map(|m| (m, self.history().iter().filter(|e| e.mood == m).count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::testing::Harness;

    #[test]
    fn test_color_mapping_round_trips() {
        for mood in Mood::ALL {
            assert_eq!(Mood::from_color(mood.color()), Some(mood));
            let json = serde_json::to_string(&mood).unwrap();
            assert_eq!(json, format!("\"{}\"", mood.color()));
        }
        assert_eq!(Mood::from_color("bg-pink-500"), None);
    }

    #[test]
    fn test_select_sets_background_and_history() {
        let h = Harness::new();
        let mut tracker = MoodTracker::new(&h.ctx);
        assert_eq!(tracker.background(), NEUTRAL_BACKGROUND);

        tracker.select(Mood::Anxious);
        h.advance(60_000);
        tracker.select(Mood::Calm);

        assert_eq!(tracker.selected(), Some(Mood::Calm));
        assert_eq!(tracker.background(), "from-cyan-100 to-blue-100");
        let moods: Vec<Mood> = tracker.history().iter().map(|e| e.mood).collect();
        assert_eq!(moods, vec![Mood::Calm, Mood::Anxious]);
        assert_eq!(h.sounds.paths(), vec!["/sounds/chime.mp3"; 2]);

        let raw = h.store.raw(STORAGE_KEY).unwrap();
        assert!(raw.contains(r#""color":"bg-cyan-500""#));
    }

    #[test]
    fn test_tally() {
        let h = Harness::new();
        let mut tracker = MoodTracker::new(&h.ctx);
        tracker.select(Mood::Happy);
        tracker.select(Mood::Happy);
        tracker.select(Mood::Stressed);
        let tally = tracker.tally();
        assert_eq!(tally[0], (Mood::Stressed, 1));
        assert_eq!(tally[4], (Mood::Happy, 2));
        assert_eq!(tally[7], (Mood::Creative, 0));
    }

    #[test]
    fn test_history_survives_reload_but_selection_does_not() {
        let h = Harness::new();
        let mut tracker = MoodTracker::new(&h.ctx);
        tracker.select(Mood::Focused);
        let reloaded = MoodTracker::new(&h.reload().ctx);
        assert_eq!(reloaded.history().len(), 1);
        assert_eq!(reloaded.selected(), None);
    }
}
