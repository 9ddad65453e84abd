//! Cloud Thoughts - write thoughts on clouds, then keep them or let them go

use serde::{Deserialize, Serialize};

use super::{Context, is_blank, unique_id};
use crate::audio::Sound;
use crate::persistence::PersistedState;

pub const STORAGE_KEY: &str = "clouds-state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudCategory {
    #[default]
    Keep,
    #[serde(rename = "letgo")]
    LetGo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub id: String,
    pub thought: String,
    pub category: CloudCategory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudsState {
    pub clouds: Vec<Cloud>,
}

pub struct Clouds {
    ctx: Context,
    state: PersistedState<CloudsState>,
}

impl Clouds {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            state: PersistedState::load(ctx.store.clone(), STORAGE_KEY, CloudsState::default()),
        }
    }

    /// Add a thought (starts in "keep"). Blank input is ignored.
    pub fn add_thought(&mut self, thought: &str) -> Option<String> {
        if is_blank(thought) {
            return None;
        }
        let id = unique_id(
            self.ctx.now(),
            self.state.get().clouds.iter().map(|c| c.id.as_str()),
        );
        let cloud = Cloud {
            id: id.clone(),
            thought: thought.to_string(),
            category: CloudCategory::Keep,
        };
        self.state.update(|s| s.clouds.push(cloud));
        self.ctx.audio.chirp(Sound::Chime, 0.3);
        Some(id)
    }

    /// Move a cloud to a category. Returns false for unknown ids.
    pub fn categorize(&mut self, id: &str, category: CloudCategory) -> bool {
        if !self.state.get().clouds.iter().any(|c| c.id == id) {
            return false;
        }
        self.state.update(|s| {
            for cloud in s.clouds.iter_mut().filter(|c| c.id == id) {
                cloud.category = category;
            }
        });
        let sound = match category {
            CloudCategory::LetGo => Sound::Exhale,
            CloudCategory::Keep => Sound::Inhale,
        };
        self.ctx.audio.chirp(sound, 0.3);
        true
    }

    pub fn delete(&mut self, id: &str) {
        self.state.update(|s| s.clouds.retain(|c| c.id != id));
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.state.get().clouds
    }

    pub fn in_category(&self, category: CloudCategory) -> impl Iterator<Item = &Cloud> {
        self.clouds().iter().filter(move |c| c.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::testing::Harness;

    #[test]
    fn test_add_and_categorize() {
        let h = Harness::new();
        let mut clouds = Clouds::new(&h.ctx);
        let id = clouds.add_thought("I said the wrong thing").unwrap();
        assert_eq!(h.sounds.last().unwrap().path, "/sounds/chime.mp3");
        assert_eq!(clouds.in_category(CloudCategory::Keep).count(), 1);

        assert!(clouds.categorize(&id, CloudCategory::LetGo));
        assert_eq!(h.sounds.last().unwrap().path, "/sounds/exhale.mp3");
        assert_eq!(clouds.in_category(CloudCategory::LetGo).count(), 1);
        assert_eq!(clouds.in_category(CloudCategory::Keep).count(), 0);

        assert!(clouds.categorize(&id, CloudCategory::Keep));
        assert_eq!(h.sounds.last().unwrap().path, "/sounds/inhale.mp3");
    }

    #[test]
    fn test_blank_thought_rejected() {
        let h = Harness::new();
        let mut clouds = Clouds::new(&h.ctx);
        assert!(clouds.add_thought("   ").is_none());
        assert!(clouds.clouds().is_empty());
        assert!(h.sounds.log.borrow().is_empty());
    }

    #[test]
    fn test_same_millisecond_ids_are_unique() {
        let h = Harness::new();
        let mut clouds = Clouds::new(&h.ctx);
        let a = clouds.add_thought("one").unwrap();
        let b = clouds.add_thought("two").unwrap();
        assert_ne!(a, b);
        clouds.delete(&a);
        assert_eq!(clouds.clouds().len(), 1);
        assert_eq!(clouds.clouds()[0].id, b);
    }

    #[test]
    fn test_wire_format() {
        let h = Harness::new();
        let mut clouds = Clouds::new(&h.ctx);
        let id = clouds.add_thought("rain").unwrap();
        clouds.categorize(&id, CloudCategory::LetGo);
        assert_eq!(
            h.store.raw(STORAGE_KEY).unwrap(),
            format!(r#"{{"clouds":[{{"id":"{id}","thought":"rain","category":"letgo"}}]}}"#)
        );

        let reloaded = Clouds::new(&h.reload().ctx);
        assert_eq!(reloaded.clouds(), clouds.clouds());
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let h = Harness::new();
        let mut clouds = Clouds::new(&h.ctx);
        assert!(!clouds.categorize("missing", CloudCategory::LetGo));
        assert!(h.store.raw(STORAGE_KEY).is_none());
    }
}
