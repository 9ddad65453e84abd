//! Worry Box - write worries down, lock the box, watch them go

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{ActivityKind, Context, is_blank, unique_id};
use crate::audio::Sound;
use crate::consts::{SPARKLE_CHANCE, WORRY_PARTICLES, WORRY_RELEASE_MS};
use crate::persistence::PersistedState;
use crate::sim::{CategoryRule, EphemeralEntity, Scheduler, Spawner, SpawnerConfig, TimerId};

pub const STORAGE_KEY: &str = "worry-box-state";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worry {
    pub id: String,
    pub text: String,
    pub created_at: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorryBoxState {
    pub worries: Vec<Worry>,
    pub box_locked: bool,
}

/// Particles scatter over the whole box and live as long as the release
pub fn particle_config() -> SpawnerConfig {
    SpawnerConfig {
        interval_ms: WORRY_RELEASE_MS,
        lifetime_ms: WORRY_RELEASE_MS,
        rule: CategoryRule::Random {
            rare_chance: SPARKLE_CHANCE,
        },
        area_min: 0.0,
        area_span: 100.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoxTimer {
    Release,
}

pub struct WorryBox {
    ctx: Context,
    state: PersistedState<WorryBoxState>,
    particles: Spawner,
    timers: Scheduler<BoxTimer>,
    release: Option<TimerId>,
}

impl WorryBox {
    pub fn new(ctx: &Context) -> Self {
        let seed: u64 = ctx.rng_for(ActivityKind::WorryBox).random();
        Self {
            ctx: ctx.clone(),
            state: PersistedState::load(ctx.store.clone(), STORAGE_KEY, WorryBoxState::default()),
            particles: Spawner::new(particle_config(), seed),
            timers: Scheduler::new(ctx.now()),
            release: None,
        }
    }

    /// Put a worry in the box. Adding always unlocks it.
    pub fn add(&mut self, text: &str) -> Option<String> {
        if is_blank(text) {
            return None;
        }
        let now = self.ctx.now();
        let id = unique_id(now, self.state.get().worries.iter().map(|w| w.id.as_str()));
        let worry = Worry {
            id: id.clone(),
            text: text.to_string(),
            created_at: now,
        };
        self.state.update(|s| {
            s.worries.push(worry);
            s.box_locked = false;
        });
        self.ctx.audio.chirp(Sound::Chime, 0.3);
        Some(id)
    }

    /// Lock the box and release its worries. No-op on an empty box.
    pub fn lock(&mut self) -> bool {
        if self.state.get().worries.is_empty() {
            return false;
        }
        let now = self.ctx.now();
        self.state.update(|s| s.box_locked = true);
        self.ctx.audio.chirp(Sound::Success, 0.5);
        self.particles.burst(now, WORRY_PARTICLES);

        if let Some(id) = self.release.take() {
            self.timers.clear(id);
        }
        self.tick();
        self.release = Some(self.timers.set_timeout(WORRY_RELEASE_MS, BoxTimer::Release));
        log::info!("Worry box locked with {} worries", self.state.get().worries.len());
        true
    }

    pub fn tick(&mut self) {
        let now = self.ctx.now();
        self.particles.advance_to(now);
        while let Some(BoxTimer::Release) = self.timers.pop_due(now) {
            self.release = None;
            self.state.set(WorryBoxState::default());
            self.particles.stop();
        }
    }

    pub fn worries(&self) -> &[Worry] {
        &self.state.get().worries
    }

    pub fn is_locked(&self) -> bool {
        self.state.get().box_locked
    }

    pub fn particles(&self) -> &[EphemeralEntity] {
        self.particles.entities()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::testing::Harness;

    #[test]
    fn test_lock_releases_after_two_seconds() {
        let h = Harness::new();
        let mut wb = WorryBox::new(&h.ctx);
        wb.add("deadline").unwrap();
        h.advance(5);
        wb.add("rent").unwrap();

        assert!(wb.lock());
        assert!(wb.is_locked());
        assert_eq!(wb.particles().len(), WORRY_PARTICLES);
        let rec = h.sounds.last().unwrap();
        assert_eq!(rec.path, "/sounds/success.mp3");
        assert!((rec.volume - 0.5).abs() < 1e-6);

        h.advance(1_999);
        wb.tick();
        assert_eq!(wb.worries().len(), 2);
        assert_eq!(wb.particles().len(), WORRY_PARTICLES);

        h.advance(1);
        wb.tick();
        assert!(wb.worries().is_empty());
        assert!(!wb.is_locked());
        assert!(wb.particles().is_empty());
        assert_eq!(
            h.store.raw(STORAGE_KEY).unwrap(),
            r#"{"worries":[],"boxLocked":false}"#
        );
    }

    #[test]
    fn test_lock_empty_box_is_noop() {
        let h = Harness::new();
        let mut wb = WorryBox::new(&h.ctx);
        assert!(!wb.lock());
        assert!(!wb.is_locked());
        assert!(wb.particles().is_empty());
        assert!(h.sounds.log.borrow().is_empty());
    }

    #[test]
    fn test_add_unlocks() {
        let h = Harness::new();
        let mut wb = WorryBox::new(&h.ctx);
        wb.add("a").unwrap();
        wb.lock();
        wb.add("b").unwrap();
        assert!(!wb.is_locked());
        assert_eq!(h.sounds.last().unwrap().path, "/sounds/chime.mp3");
    }

    #[test]
    fn test_particles_inside_box() {
        let h = Harness::new();
        let mut wb = WorryBox::new(&h.ctx);
        wb.add("a").unwrap();
        wb.lock();
        for p in wb.particles() {
            assert!((0.0..100.0).contains(&p.x));
            assert!((0.0..100.0).contains(&p.y));
        }
    }

    #[test]
    fn test_locked_state_survives_reload() {
        let h = Harness::new();
        let mut wb = WorryBox::new(&h.ctx);
        wb.add("a").unwrap();
        wb.lock();

        let reloaded = WorryBox::new(&h.reload().ctx);
        assert!(reloaded.is_locked());
        assert_eq!(reloaded.worries().len(), 1);
        assert!(reloaded.particles().is_empty());
    }
}
