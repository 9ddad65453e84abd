//! Safe Zone - sort the room's objects into two zones

use serde::{Deserialize, Serialize};

use super::Context;
use crate::audio::Sound;
use crate::consts::SAFE_ZONE_SETTLE_MS;
use crate::persistence::PersistedState;
use crate::sim::{Scheduler, TimerId};

pub const STORAGE_KEY: &str = "safe-zone-state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Square,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomObject {
    pub id: String,
    pub color: String,
    pub shape: Shape,
    pub x: f32,
    pub y: f32,
}

impl RoomObject {
    fn new(id: &str, color: &str, shape: Shape, x: f32, y: f32) -> Self {
        Self {
            id: id.to_string(),
            color: color.to_string(),
            shape,
            x,
            y,
        }
    }
}

/// Objects still in the room, and whether the room has been sorted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeZoneState {
    pub objects: Vec<RoomObject>,
    pub sorted: bool,
}

impl Default for SafeZoneState {
    fn default() -> Self {
        Self {
            objects: vec![
                RoomObject::new("1", "bg-red-500", Shape::Square, 20.0, 20.0),
                RoomObject::new("2", "bg-blue-500", Shape::Circle, 60.0, 30.0),
                RoomObject::new("3", "bg-yellow-500", Shape::Square, 40.0, 60.0),
                RoomObject::new("4", "bg-green-500", Shape::Circle, 70.0, 70.0),
            ],
            sorted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Red,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoneTimer {
    Settled,
}

pub struct SafeZone {
    ctx: Context,
    state: PersistedState<SafeZoneState>,
    dragged: Option<String>,
    red: Vec<RoomObject>,
    blue: Vec<RoomObject>,
    timers: Scheduler<ZoneTimer>,
    settle: Option<TimerId>,
}

impl SafeZone {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            state: PersistedState::load(ctx.store.clone(), STORAGE_KEY, SafeZoneState::default()),
            dragged: None,
            red: Vec::new(),
            blue: Vec::new(),
            timers: Scheduler::new(ctx.now()),
            settle: None,
        }
    }

    pub fn drag_start(&mut self, id: &str) {
        self.dragged = Some(id.to_string());
    }

    /// Drop the dragged object into a zone. Returns false with nothing dragged.
    pub fn drop_in_zone(&mut self, zone: Zone) -> bool {
        let Some(id) = self.dragged.take() else {
            return false;
        };
        let Some(idx) = self.state.get().objects.iter().position(|o| o.id == id) else {
            return false;
        };

        let mut obj = None;
        self.state.update(|s| obj = Some(s.objects.remove(idx)));
        let Some(obj) = obj else {
            return false;
        };
        match zone {
            Zone::Red => self.red.push(obj),
            Zone::Blue => self.blue.push(obj),
        }
        self.ctx.audio.chirp(Sound::Chime, 0.3);

        if self.state.get().objects.is_empty() && self.settle.is_none() {
            self.tick();
            self.settle = Some(self.timers.set_timeout(SAFE_ZONE_SETTLE_MS, ZoneTimer::Settled));
        }
        true
    }

    pub fn tick(&mut self) {
        let now = self.ctx.now();
        while let Some(ZoneTimer::Settled) = self.timers.pop_due(now) {
            self.settle = None;
            self.state.update(|s| s.sorted = true);
            self.ctx.audio.chirp(Sound::Success, 0.4);
            log::debug!("Safe zone sorted");
        }
    }

    /// Put every object back in the room
    pub fn reset(&mut self) {
        if let Some(id) = self.settle.take() {
            self.timers.clear(id);
        }
        self.dragged = None;
        self.red.clear();
        self.blue.clear();
        self.state.set(SafeZoneState::default());
    }

    pub fn objects(&self) -> &[RoomObject] {
        &self.state.get().objects
    }

    pub fn zone(&self, zone: Zone) -> &[RoomObject] {
        match zone {
            Zone::Red => &self.red,
            Zone::Blue => &self.blue,
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.state.get().sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::testing::Harness;

    fn sort_all(zone: &mut SafeZone) {
        let moves = [
            ("1", Zone::Red),
            ("2", Zone::Blue),
            ("3", Zone::Red),
            ("4", Zone::Blue),
        ];
        for (id, target) in moves {
            zone.drag_start(id);
            assert!(zone.drop_in_zone(target));
        }
    }

    #[test]
    fn test_default_room() {
        let h = Harness::new();
        let zone = SafeZone::new(&h.ctx);
        assert_eq!(zone.objects().len(), 4);
        assert_eq!(zone.objects()[1].shape, Shape::Circle);
        assert!(!zone.is_sorted());
    }

    #[test]
    fn test_sorted_half_second_after_last_drop() {
        let h = Harness::new();
        let mut zone = SafeZone::new(&h.ctx);
        sort_all(&mut zone);
        assert!(zone.objects().is_empty());
        assert_eq!(zone.zone(Zone::Red).len(), 2);
        assert_eq!(zone.zone(Zone::Blue).len(), 2);
        assert_eq!(h.sounds.paths(), vec!["/sounds/chime.mp3"; 4]);

        h.advance(499);
        zone.tick();
        assert!(!zone.is_sorted());
        h.advance(1);
        zone.tick();
        assert!(zone.is_sorted());
        assert_eq!(h.sounds.last().unwrap().path, "/sounds/success.mp3");

        let raw = h.store.raw(STORAGE_KEY).unwrap();
        assert_eq!(raw, r#"{"objects":[],"sorted":true}"#);
    }

    #[test]
    fn test_drop_without_drag_is_ignored() {
        let h = Harness::new();
        let mut zone = SafeZone::new(&h.ctx);
        assert!(!zone.drop_in_zone(Zone::Red));
        zone.drag_start("99");
        assert!(!zone.drop_in_zone(Zone::Red));
        assert_eq!(zone.objects().len(), 4);
        assert!(h.sounds.log.borrow().is_empty());
    }

    #[test]
    fn test_reset_cancels_pending_sort() {
        let h = Harness::new();
        let mut zone = SafeZone::new(&h.ctx);
        sort_all(&mut zone);
        zone.reset();
        h.advance(1_000);
        zone.tick();
        assert!(!zone.is_sorted());
        assert_eq!(zone.objects().len(), 4);
        assert!(zone.zone(Zone::Red).is_empty());
        assert_eq!(h.sounds.paths().len(), 4);
    }

    #[test]
    fn test_zones_are_not_persisted() {
        let h = Harness::new();
        let mut zone = SafeZone::new(&h.ctx);
        zone.drag_start("2");
        zone.drop_in_zone(Zone::Blue);

        let reloaded = SafeZone::new(&h.reload().ctx);
        assert_eq!(reloaded.objects().len(), 3);
        assert!(reloaded.zone(Zone::Blue).is_empty());
    }
}
