//! Focus Fireflies - a one-minute attention game
//!
//! Fireflies appear every 1.5s and fade after 3s. Every third one is golden:
//! tapping golden ones scores, tapping ordinary ones costs a point and the
//! streak. The pattern is fixed so the game rewards attention, not luck.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{ActivityKind, Context, RunState};
use crate::audio::Sound;
use crate::consts::*;
use crate::persistence::PersistedState;
use crate::sim::{
    CategoryRule, EntityId, EphemeralEntity, Scheduler, SpawnEvent, Spawner, SpawnerConfig,
    TimerId,
};

pub const STORAGE_KEY: &str = "fireflies-state";

/// Persisted scores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirefliesScore {
    pub score: u32,
    pub best_score: u32,
    pub streak: u32,
}

/// Outcome of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Golden,
    Missed,
    /// Not on screen (already expired or tapped)
    Gone,
}

pub fn spawner_config() -> SpawnerConfig {
    SpawnerConfig {
        interval_ms: FIREFLY_SPAWN_MS,
        lifetime_ms: FIREFLY_LIFETIME_MS,
        rule: CategoryRule::EveryNth { n: GOLDEN_EVERY },
        area_min: SPAWN_MIN_PCT,
        area_span: SPAWN_SPAN_PCT,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundTimer {
    Countdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirefliesView {
    pub state: RunState,
    pub seconds_left: u32,
    pub score: u32,
    pub best_score: u32,
    pub streak: u32,
    pub fireflies: Vec<EphemeralEntity>,
}

pub struct Fireflies {
    ctx: Context,
    scores: PersistedState<FirefliesScore>,
    spawner: Spawner,
    round: Scheduler<RoundTimer>,
    countdown_timer: Option<TimerId>,
    seconds_left: u32,
    state: RunState,
}

impl Fireflies {
    pub fn new(ctx: &Context) -> Self {
        Self::with_config(ctx, spawner_config())
    }

    pub fn with_config(ctx: &Context, config: SpawnerConfig) -> Self {
        let seed: u64 = ctx.rng_for(ActivityKind::Fireflies).random();
        Self {
            ctx: ctx.clone(),
            scores: PersistedState::load(ctx.store.clone(), STORAGE_KEY, FirefliesScore::default()),
            spawner: Spawner::new(config, seed),
            round: Scheduler::new(ctx.now()),
            countdown_timer: None,
            seconds_left: 0,
            state: RunState::Idle,
        }
    }

    /// Start (or replay) a round: score and streak reset, best kept
    pub fn start(&mut self) {
        if self.state == RunState::Running {
            return;
        }
        let now = self.ctx.now();
        self.state = RunState::Running;
        self.scores.update(|s| {
            s.score = 0;
            s.streak = 0;
        });
        self.seconds_left = FIREFLIES_ROUND_SECS;
        self.round.reset(now);
        self.countdown_timer = Some(
            self.round
                .set_interval(COUNTDOWN_STEP_MS, RoundTimer::Countdown),
        );
        self.spawner.start(now);
        log::info!("Fireflies round started ({}s)", FIREFLIES_ROUND_SECS);
    }

    /// Run the countdown, then the spawner, up to the clock's current time
    pub fn tick(&mut self) -> Vec<SpawnEvent> {
        if self.state != RunState::Running {
            return Vec::new();
        }
        let now = self.ctx.now();
        while let Some(RoundTimer::Countdown) = self.round.pop_due(now) {
            self.seconds_left = self.seconds_left.saturating_sub(1);
            if self.seconds_left == 0 {
                // Fireflies due after the final second never appear
                let end = self.round.now();
                let events = self.spawner.advance_to(end.saturating_sub(1));
                self.end();
                return events;
            }
        }
        self.spawner.advance_to(now)
    }

    /// Tap a firefly. Due expiries and the countdown are applied first.
    pub fn tap(&mut self, id: EntityId) -> TapOutcome {
        self.tick();
        if self.state != RunState::Running {
            return TapOutcome::Gone;
        }
        let Some(firefly) = self.spawner.tap(id) else {
            return TapOutcome::Gone;
        };

        if firefly.is_rare() {
            self.scores.update(|s| {
                s.score += 1;
                s.streak += 1;
                s.best_score = s.best_score.max(s.score);
            });
            self.ctx.audio.chirp(Sound::Success, 0.4);
            TapOutcome::Golden
        } else {
            self.scores.update(|s| {
                s.score = s.score.saturating_sub(1);
                s.streak = 0;
            });
            self.ctx.audio.chirp(Sound::Exhale, 0.2);
            TapOutcome::Missed
        }
    }

    /// Abandon the round without reaching the end screen
    pub fn stop(&mut self) {
        self.clear_timers();
        self.state = RunState::Idle;
    }

    fn end(&mut self) {
        self.clear_timers();
        self.state = RunState::Ended;
        let s = self.scores.get();
        log::info!("Fireflies round over: score {} (best {})", s.score, s.best_score);
    }

    fn clear_timers(&mut self) {
        if let Some(id) = self.countdown_timer.take() {
            self.round.clear(id);
        }
        self.spawner.stop();
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn scores(&self) -> &FirefliesScore {
        self.scores.get()
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn fireflies(&self) -> &[EphemeralEntity] {
        self.spawner.entities()
    }

    pub fn view(&self) -> FirefliesView {
        let s = self.scores.get();
        FirefliesView {
            state: self.state,
            seconds_left: self.seconds_left,
            score: s.score,
            best_score: s.best_score,
            streak: s.streak,
            fireflies: self.spawner.entities().to_vec(),
        }
    }
}
