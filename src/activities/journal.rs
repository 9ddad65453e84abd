//! Journal Carousel - one-line answers to gentle prompts

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{ActivityKind, Context, is_blank, unique_id};
use crate::audio::Sound;
use crate::persistence::PersistedState;

pub const STORAGE_KEY: &str = "journal-state";

pub const PROMPTS: [&str; 8] = [
    "What made you smile today?",
    "What are you grateful for?",
    "A small win today was...",
    "Someone who made me feel good...",
    "Something I learned today...",
    "A moment of peace I found...",
    "Something I am proud of...",
    "Someone I appreciate...",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub prompt: String,
    pub response: String,
    pub date: u64,
}

/// Entries, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalState {
    pub entries: Vec<JournalEntry>,
}

pub struct Journal {
    ctx: Context,
    state: PersistedState<JournalState>,
    rng: Pcg32,
    prompt: &'static str,
}

impl Journal {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            state: PersistedState::load(ctx.store.clone(), STORAGE_KEY, JournalState::default()),
            rng: ctx.rng_for(ActivityKind::Journal),
            prompt: PROMPTS[0],
        }
    }

    pub fn prompt(&self) -> &'static str {
        self.prompt
    }

    /// Pick a random prompt (may repeat the current one)
    pub fn shuffle_prompt(&mut self) -> &'static str {
        self.prompt = PROMPTS[self.rng.random_range(0..PROMPTS.len())];
        self.prompt
    }

    /// Save an answer to the current prompt, then move to a new prompt
    pub fn save_entry(&mut self, response: &str) -> Option<String> {
        if is_blank(response) {
            return None;
        }
        let now = self.ctx.now();
        let id = unique_id(now, self.state.get().entries.iter().map(|e| e.id.as_str()));
        let entry = JournalEntry {
            id: id.clone(),
            prompt: self.prompt.to_string(),
            response: response.to_string(),
            date: now,
        };
        self.state.update(|s| s.entries.insert(0, entry));
        self.shuffle_prompt();
        self.ctx.audio.chirp(Sound::Success, 0.4);
        Some(id)
    }

    pub fn delete(&mut self, id: &str) {
        self.state.update(|s| s.entries.retain(|e| e.id != id));
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.state.get().entries
    }
}
