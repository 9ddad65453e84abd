//! Mind Garden - plant worries as weeds and grow them into flowers

use serde::{Deserialize, Serialize};

use super::{Context, is_blank, unique_id};
use crate::audio::Sound;
use crate::persistence::PersistedState;

pub const STORAGE_KEY: &str = "garden-state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantKind {
    Weed,
    Flower,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    pub worry: String,
    #[serde(rename = "type")]
    pub kind: PlantKind,
    pub created_at: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenState {
    pub plants: Vec<Plant>,
}

pub struct Garden {
    ctx: Context,
    state: PersistedState<GardenState>,
}

impl Garden {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            state: PersistedState::load(ctx.store.clone(), STORAGE_KEY, GardenState::default()),
        }
    }

    /// Plant a worry as a weed. Blank input is ignored.
    pub fn plant_worry(&mut self, worry: &str) -> Option<String> {
        if is_blank(worry) {
            return None;
        }
        let now = self.ctx.now();
        let id = unique_id(now, self.state.get().plants.iter().map(|p| p.id.as_str()));
        let plant = Plant {
            id: id.clone(),
            worry: worry.to_string(),
            kind: PlantKind::Weed,
            created_at: now,
        };
        self.state.update(|s| s.plants.push(plant));
        self.ctx.audio.chirp(Sound::Chime, 0.3);
        Some(id)
    }

    /// Turn a weed into a flower
    pub fn transform(&mut self, id: &str) -> bool {
        if !self.state.get().plants.iter().any(|p| p.id == id) {
            return false;
        }
        self.state.update(|s| {
            for plant in s.plants.iter_mut().filter(|p| p.id == id) {
                plant.kind = PlantKind::Flower;
            }
        });
        self.ctx.audio.chirp(Sound::Success, 0.4);
        true
    }

    pub fn delete(&mut self, id: &str) {
        self.state.update(|s| s.plants.retain(|p| p.id != id));
    }

    pub fn plants(&self) -> &[Plant] {
        &self.state.get().plants
    }

    pub fn count(&self, kind: PlantKind) -> usize {
        self.plants().iter().filter(|p| p.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::testing::Harness;

    #[test]
    fn test_weed_becomes_flower() {
        let h = Harness::new();
        let mut garden = Garden::new(&h.ctx);
        let id = garden.plant_worry("exam tomorrow").unwrap();
        assert_eq!(garden.count(PlantKind::Weed), 1);
        assert_eq!(garden.plants()[0].created_at, h.ctx.now());

        assert!(garden.transform(&id));
        assert_eq!(garden.count(PlantKind::Weed), 0);
        assert_eq!(garden.count(PlantKind::Flower), 1);
        let rec = h.sounds.last().unwrap();
        assert_eq!(rec.path, "/sounds/success.mp3");
        assert!((rec.volume - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_persisted_field_names() {
        let h = Harness::new();
        let mut garden = Garden::new(&h.ctx);
        garden.plant_worry("bills").unwrap();
        let raw = h.store.raw(STORAGE_KEY).unwrap();
        assert!(raw.contains(r#""type":"weed""#));
        assert!(raw.contains(r#""createdAt":"#));
    }

    #[test]
    fn test_delete_and_reload() {
        let h = Harness::new();
        let mut garden = Garden::new(&h.ctx);
        let a = garden.plant_worry("a").unwrap();
        h.advance(1);
        garden.plant_worry("b").unwrap();
        garden.delete(&a);

        let reloaded = Garden::new(&h.reload().ctx);
        assert_eq!(reloaded.plants().len(), 1);
        assert_eq!(reloaded.plants()[0].worry, "b");
    }

    #[test]
    fn test_unknown_kind_falls_back_to_empty() {
        let h = Harness::new();
        h.store.insert_raw(
            STORAGE_KEY,
            r#"{"plants":[{"id":"1","worry":"x","type":"cactus","createdAt":1}]}"#,
        );
        let garden = Garden::new(&h.ctx);
        assert!(garden.plants().is_empty());
    }
}
