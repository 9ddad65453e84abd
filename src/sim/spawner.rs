//! Ephemeral entity spawner
//!
//! Creates short-lived entities on a fixed interval, each with its own expiry
//! timer. Entities can be removed early by a tap, which cancels the expiry so
//! nothing is removed twice.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::scheduler::{Scheduler, TimerId};

/// Spawned entity identifier (unique per spawner)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Largest integer a JS number holds exactly (2^53 - 1)
    const MAX_JS_SAFE: f64 = 9_007_199_254_740_991.0;

    /// Id from a JS number as it appears in the serialized entity
    pub fn from_js_number(n: f64) -> Option<Self> {
        let whole = n.is_finite() && n.fract() == 0.0;
        (whole && (0.0..=Self::MAX_JS_SAFE).contains(&n)).then(|| EntityId(n as u64))
    }
}

/// Category tag of a spawned entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rarity {
    Common,
    Rare,
}

/// How categories are assigned
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CategoryRule {
    /// Every `n`th spawn is rare: a fixed pattern players can learn
    EveryNth { n: u32 },
    /// Each spawn is rare with probability `rare_chance`
    Random { rare_chance: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnerConfig {
    pub interval_ms: u64,
    pub lifetime_ms: u64,
    pub rule: CategoryRule,
    /// Coordinates are drawn from [area_min, area_min + area_span) percent
    pub area_min: f32,
    pub area_span: f32,
}

/// A live entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EphemeralEntity {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub rarity: Rarity,
    pub spawned_at: u64,
    #[serde(skip)]
    expiry: TimerId,
}

impl EphemeralEntity {
    pub fn is_rare(&self) -> bool {
        self.rarity == Rarity::Rare
    }

    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.spawned_at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpawnTimer {
    Spawn,
    Expire(EntityId),
}

/// What happened while advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEvent {
    Spawned { id: EntityId, rarity: Rarity },
    Expired { id: EntityId },
}

#[derive(Debug, Clone)]
pub struct Spawner {
    config: SpawnerConfig,
    rng: Pcg32,
    scheduler: Scheduler<SpawnTimer>,
    spawn_timer: Option<TimerId>,
    entities: Vec<EphemeralEntity>,
    spawn_count: u32,
    next_id: u64,
}

impl Spawner {
    pub fn new(config: SpawnerConfig, seed: u64) -> Self {
        Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
            scheduler: Scheduler::new(0),
            spawn_timer: None,
            entities: Vec::new(),
            spawn_count: 0,
            next_id: 1,
        }
    }

    /// Begin spawning every interval from `now`. Clears any previous run.
    pub fn start(&mut self, now: u64) {
        self.scheduler.reset(now);
        self.entities.clear();
        self.spawn_count = 0;
        self.spawn_timer = Some(
            self.scheduler
                .set_interval(self.config.interval_ms, SpawnTimer::Spawn),
        );
    }

    /// Cancel the spawn interval and every expiry timer, dropping all entities
    pub fn stop(&mut self) {
        self.scheduler.clear_all();
        self.spawn_timer = None;
        self.entities.clear();
    }

    pub fn is_active(&self) -> bool {
        self.spawn_timer.is_some()
    }

    /// Spawn one entity at the current scheduler time
    pub fn spawn(&mut self) -> EntityId {
        self.spawn_count += 1;
        let rarity = self.next_rarity();
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let min = self.config.area_min;
        let max = min + self.config.area_span.max(f32::EPSILON);
        let x = self.rng.random_range(min..max);
        let y = self.rng.random_range(min..max);

        let expiry = self
            .scheduler
            .set_timeout(self.config.lifetime_ms, SpawnTimer::Expire(id));
        self.entities.push(EphemeralEntity {
            id,
            x,
            y,
            rarity,
            spawned_at: self.scheduler.now(),
            expiry,
        });
        id
    }

    /// One-off shower of `count` entities at time `now`, independent of the interval
    pub fn burst(&mut self, now: u64, count: usize) -> Vec<EntityId> {
        if self.scheduler.pending() == 0 {
            self.scheduler.reset(now);
        } else {
            // Entities already live: bring their timers up to date first
            self.advance_to(now);
        }
        (0..count).map(|_| self.spawn()).collect()
    }

    /// Remove an entity before it expires
    pub fn tap(&mut self, id: EntityId) -> Option<EphemeralEntity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        let entity = self.entities.remove(idx);
        self.scheduler.clear(entity.expiry);
        Some(entity)
    }

    /// Fire every spawn and expiry due up to `now`
    pub fn advance_to(&mut self, now: u64) -> Vec<SpawnEvent> {
        let mut events = Vec::new();
        while let Some(timer) = self.scheduler.pop_due(now) {
            match timer {
                SpawnTimer::Spawn => {
                    let id = self.spawn();
                    if let Some(e) = self.get(id) {
                        events.push(SpawnEvent::Spawned {
                            id,
                            rarity: e.rarity,
                        });
                    }
                }
                SpawnTimer::Expire(id) => {
                    if let Some(idx) = self.entities.iter().position(|e| e.id == id) {
                        self.entities.remove(idx);
                        events.push(SpawnEvent::Expired { id });
                    }
                }
            }
        }
        events
    }

    pub fn get(&self, id: EntityId) -> Option<&EphemeralEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entities(&self) -> &[EphemeralEntity] {
        &self.entities
    }

    /// Spawns since the last `start`
    pub fn spawn_count(&self) -> u32 {
        self.spawn_count
    }

    /// Timers still outstanding (spawn interval + expiries)
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    fn next_rarity(&mut self) -> Rarity {
        let rare = match self.config.rule {
            CategoryRule::EveryNth { n } => n > 0 && self.spawn_count % n == 0,
            CategoryRule::Random { rare_chance } => {
                let p = if rare_chance.is_finite() {
                    rare_chance.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                self.rng.random_bool(p)
            }
        };
        if rare { Rarity::Rare } else { Rarity::Common }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fireflies() -> SpawnerConfig {
        SpawnerConfig {
            interval_ms: 1500,
            lifetime_ms: 3000,
            rule: CategoryRule::EveryNth { n: 3 },
            area_min: 5.0,
            area_span: 85.0,
        }
    }

    #[test]
    fn test_every_third_is_rare() {
        let mut spawner = Spawner::new(fireflies(), 7);
        spawner.start(0);
        let flags: Vec<bool> = (0..6)
            .map(|_| {
                let id = spawner.spawn();
                spawner.get(id).unwrap().is_rare()
            })
            .collect();
        assert_eq!(flags, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn test_interval_spawns_and_lifetime_expires() {
        let mut spawner = Spawner::new(fireflies(), 7);
        spawner.start(0);

        let events = spawner.advance_to(1500);
        assert!(matches!(events.as_slice(), [SpawnEvent::Spawned { .. }]));
        let first = spawner.entities()[0].clone();
        assert_eq!(first.spawned_at, 1500);

        // Second spawn at 3000, first expires at 4500 alongside the third spawn
        spawner.advance_to(4499);
        assert_eq!(spawner.entities().len(), 2);
        let events = spawner.advance_to(4500);
        assert!(events.contains(&SpawnEvent::Expired { id: first.id }));
        assert!(spawner.get(first.id).is_none());
        assert_eq!(spawner.spawn_count(), 3);
    }

    #[test]
    fn test_coordinates_within_area() {
        let mut spawner = Spawner::new(fireflies(), 99);
        spawner.start(0);
        for _ in 0..200 {
            spawner.spawn();
        }
        for e in spawner.entities() {
            assert!((5.0..90.0).contains(&e.x), "x out of range: {}", e.x);
            assert!((5.0..90.0).contains(&e.y), "y out of range: {}", e.y);
        }
    }

    #[test]
    fn test_tap_cancels_expiry() {
        let mut spawner = Spawner::new(fireflies(), 7);
        spawner.start(0);
        spawner.advance_to(1500);
        let id = spawner.entities()[0].id;

        let tapped = spawner.tap(id).unwrap();
        assert_eq!(tapped.id, id);
        assert!(spawner.tap(id).is_none());

        // Only the spawn interval remains for this entity's slot
        let events = spawner.advance_to(4500);
        assert!(!events.contains(&SpawnEvent::Expired { id }));
    }

    #[test]
    fn test_stop_clears_everything() {
        let mut spawner = Spawner::new(fireflies(), 7);
        spawner.start(0);
        spawner.advance_to(3000);
        assert_eq!(spawner.entities().len(), 2);

        spawner.stop();
        assert!(!spawner.is_active());
        assert_eq!(spawner.pending_timers(), 0);
        assert!(spawner.entities().is_empty());

        assert!(spawner.advance_to(1_000_000).is_empty());
        assert!(spawner.entities().is_empty());
        assert_eq!(spawner.spawn_count(), 2);
    }

    #[test]
    fn test_restart_resets_pattern() {
        let mut spawner = Spawner::new(fireflies(), 7);
        spawner.start(0);
        spawner.spawn();
        spawner.spawn();
        spawner.start(10_000);
        let id = spawner.spawn();
        assert!(!spawner.get(id).unwrap().is_rare());
        assert_eq!(spawner.spawn_count(), 1);
    }

    #[test]
    fn test_random_rule_is_seeded() {
        let config = SpawnerConfig {
            rule: CategoryRule::Random { rare_chance: 0.5 },
            ..fireflies()
        };
        let run = |seed| {
            let mut s = Spawner::new(config, seed);
            s.burst(0, 32)
                .into_iter()
                .map(|id| s.get(id).unwrap().rarity)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));

        let never = SpawnerConfig {
            rule: CategoryRule::Random { rare_chance: 0.0 },
            ..fireflies()
        };
        let mut s = Spawner::new(never, 1);
        s.burst(0, 16);
        assert!(s.entities().iter().all(|e| !e.is_rare()));
    }

    #[test]
    fn test_burst_expires_without_interval() {
        let mut spawner = Spawner::new(fireflies(), 3);
        let ids = spawner.burst(2_000, 4);
        assert_eq!(ids.len(), 4);
        assert!(!spawner.is_active());

        let events = spawner.advance_to(5_000);
        assert_eq!(events.len(), 4);
        assert!(spawner.entities().is_empty());
    }

    #[test]
    fn test_entity_id_matches_js_number() {
        let mut spawner = Spawner::new(fireflies(), 1);
        spawner.start(0);
        spawner.advance_to(1_500);
        let entity = &spawner.entities()[0];

        let json = serde_json::to_value(entity).unwrap();
        let n = json["id"].as_f64().unwrap();
        assert_eq!(EntityId::from_js_number(n), Some(entity.id));

        assert_eq!(EntityId::from_js_number(1.5), None);
        assert_eq!(EntityId::from_js_number(-1.0), None);
        assert_eq!(EntityId::from_js_number(f64::NAN), None);
    }
}
