//! Breathe With Me - guided 4-7-8 breathing
//!
//! A bubble grows on the inhale, holds, and shrinks on the exhale while a
//! looping background track plays. Completed sessions are counted.

use serde::{Deserialize, Serialize};

use super::{Context, RunState};
use crate::audio::{PlayOptions, Sound, SoundHandle};
use crate::consts::*;
use crate::persistence::PersistedState;
use crate::sim::{PhaseEvent, PhaseSpan, PhaseTimer};

pub const STORAGE_KEY: &str = "breathing-prefs";

/// Persisted breathing preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BreathingPrefs {
    pub sessions_completed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
}

impl BreathPhase {
    pub fn prompt(&self) -> &'static str {
        match self {
            BreathPhase::Inhale => "Inhale slowly...",
            BreathPhase::Hold => "Hold gently...",
            BreathPhase::Exhale => "Exhale completely...",
        }
    }
}

/// The 4-7-8 cycle
pub fn breathing_pattern() -> Vec<PhaseSpan<BreathPhase>> {
    vec![
        PhaseSpan::new(BreathPhase::Inhale, INHALE_MS),
        PhaseSpan::new(BreathPhase::Hold, HOLD_MS),
        PhaseSpan::new(BreathPhase::Exhale, EXHALE_MS),
    ]
}

/// Bubble scale for a phase at `progress`: grows on inhale, shrinks on exhale
pub fn bubble_scale(phase: BreathPhase, progress: f32) -> f32 {
    let range = BUBBLE_MAX_SCALE - BUBBLE_MIN_SCALE;
    match phase {
        BreathPhase::Inhale => BUBBLE_MIN_SCALE + progress * range,
        BreathPhase::Hold => BUBBLE_MAX_SCALE,
        BreathPhase::Exhale => BUBBLE_MAX_SCALE - progress * range,
    }
}

/// What the breathing screen shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreatheView {
    pub state: RunState,
    pub phase: BreathPhase,
    pub prompt: &'static str,
    pub bubble_scale: f32,
    /// Whole seconds left in the current phase
    pub seconds_left: u64,
    pub cycle_count: u64,
    pub sessions_completed: u32,
}

pub struct Breathe {
    ctx: Context,
    prefs: PersistedState<BreathingPrefs>,
    timer: PhaseTimer<BreathPhase>,
    music: Option<Box<dyn SoundHandle>>,
    music_volume: f32,
    state: RunState,
    cycle_count: u64,
}

impl Breathe {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            prefs: PersistedState::load(ctx.store.clone(), STORAGE_KEY, BreathingPrefs::default()),
            timer: PhaseTimer::new(TICK_MS),
            music: None,
            music_volume: BREATHE_MUSIC_VOLUME,
            state: RunState::Idle,
            cycle_count: 0,
        }
    }

    pub fn start(&mut self) {
        if self.state == RunState::Running {
            return;
        }
        self.state = RunState::Running;
        self.cycle_count = 0;
        self.timer.start(self.ctx.now(), breathing_pattern());

        if self.music.is_none() {
            self.music = self.ctx.audio.play(
                Sound::CalmBackground,
                PlayOptions::at(self.music_volume).looped(),
            );
        }
        log::info!("Breathing session started");
    }

    /// End the session and count it
    pub fn stop(&mut self) {
        if self.state != RunState::Running {
            return;
        }
        self.state = RunState::Idle;
        self.timer.stop();
        if let Some(music) = self.music.take() {
            music.stop();
        }
        self.prefs.update(|p| p.sessions_completed += 1);
        log::info!(
            "Breathing session ended after {} cycles ({} total sessions)",
            self.cycle_count,
            self.prefs.get().sessions_completed
        );
    }

    /// Advance the phase timer to the clock's current time
    pub fn tick(&mut self) -> Vec<PhaseEvent<BreathPhase>> {
        if self.state != RunState::Running {
            return Vec::new();
        }
        let events = self.timer.advance_to(self.ctx.now());
        for event in &events {
            if let PhaseEvent::CycleCompleted { cycles } = event {
                self.cycle_count = *cycles;
            }
        }
        events
    }

    /// Change the background volume, applying it to the live track
    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = crate::clamp_volume(volume);
        if self.state == RunState::Running {
            if let Some(music) = &self.music {
                let settings = self.ctx.audio.settings();
                music.set_volume(settings.effective_volume(self.music_volume));
            }
        }
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn prefs(&self) -> &BreathingPrefs {
        self.prefs.get()
    }

    pub fn view(&self) -> BreatheView {
        let sessions_completed = self.prefs.get().sessions_completed;
        match self.timer.current() {
            Some(sample) if self.state == RunState::Running => BreatheView {
                state: self.state,
                phase: sample.phase,
                prompt: sample.phase.prompt(),
                bubble_scale: bubble_scale(sample.phase, sample.progress),
                seconds_left: sample.remaining_ms.div_ceil(1000),
                cycle_count: self.cycle_count,
                sessions_completed,
            },
            _ => BreatheView {
                state: self.state,
                phase: BreathPhase::Inhale,
                prompt: "Ready to breathe?",
                bubble_scale: BUBBLE_MIN_SCALE,
                seconds_left: 0,
                cycle_count: self.cycle_count,
                sessions_completed,
            },
        }
    }
}

impl Drop for Breathe {
    fn drop(&mut self) {
        if let Some(music) = self.music.take() {
            music.stop();
        }
    }
}
