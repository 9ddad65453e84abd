//! Love Notes - sealed notes of reassurance to open later

use serde::{Deserialize, Serialize};

use super::{Context, is_blank, unique_id};
use crate::audio::Sound;
use crate::persistence::PersistedState;

pub const STORAGE_KEY: &str = "love-notes-state";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoveNote {
    pub id: String,
    pub message: String,
    pub created_at: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesState {
    pub notes: Vec<LoveNote>,
}

pub struct LoveNotes {
    ctx: Context,
    state: PersistedState<NotesState>,
    /// Currently opened note (not persisted)
    opened: Option<String>,
}

impl LoveNotes {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            state: PersistedState::load(ctx.store.clone(), STORAGE_KEY, NotesState::default()),
            opened: None,
        }
    }

    pub fn add(&mut self, message: &str) -> Option<String> {
        if is_blank(message) {
            return None;
        }
        let now = self.ctx.now();
        let id = unique_id(now, self.state.get().notes.iter().map(|n| n.id.as_str()));
        let note = LoveNote {
            id: id.clone(),
            message: message.to_string(),
            created_at: now,
        };
        self.state.update(|s| s.notes.push(note));
        self.ctx.audio.chirp(Sound::Chime, 0.3);
        Some(id)
    }

    /// Open a note, or close it if it is already open
    pub fn toggle_open(&mut self, id: &str) {
        if self.opened.as_deref() == Some(id) {
            self.opened = None;
        } else {
            self.opened = Some(id.to_string());
            self.ctx.audio.chirp(Sound::Success, 0.4);
        }
    }

    pub fn delete(&mut self, id: &str) {
        self.state.update(|s| s.notes.retain(|n| n.id != id));
        if self.opened.as_deref() == Some(id) {
            self.opened = None;
        }
    }

    pub fn opened(&self) -> Option<&LoveNote> {
        let id = self.opened.as_deref()?;
        self.notes().iter().find(|n| n.id == id)
    }

    pub fn notes(&self) -> &[LoveNote] {
        &self.state.get().notes
    }
}
