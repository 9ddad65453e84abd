//! Cyclic phase timer
//!
//! Maps elapsed time onto a repeating sequence of named phases
//! (inhale/hold/exhale and friends). Elapsed time only moves in whole ticks,
//! so a phase boundary can be observed up to one tick late.

use super::scheduler::{Scheduler, TimerId};

/// One segment of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSpan<P> {
    pub phase: P,
    pub duration_ms: u64,
}

impl<P> PhaseSpan<P> {
    pub fn new(phase: P, duration_ms: u64) -> Self {
        Self { phase, duration_ms }
    }
}

/// Where in the cycle a given elapsed time falls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSample<P> {
    pub phase: P,
    /// Index into the span list
    pub index: usize,
    /// Fraction of the phase completed, in [0, 1)
    pub progress: f32,
    pub remaining_ms: u64,
    /// Full cycles completed so far
    pub cycle: u64,
}

/// Sample the cycle at `elapsed_ms`. `None` if the spans have no duration.
pub fn sample<P: Copy>(spans: &[PhaseSpan<P>], elapsed_ms: u64) -> Option<PhaseSample<P>> {
    let total: u64 = spans.iter().map(|s| s.duration_ms).sum();
    if total == 0 {
        return None;
    }

    let position = elapsed_ms % total;
    let mut start = 0;
    for (index, span) in spans.iter().enumerate() {
        let end = start + span.duration_ms;
        if position < end {
            let into = position - start;
            return Some(PhaseSample {
                phase: span.phase,
                index,
                progress: into as f32 / span.duration_ms as f32,
                remaining_ms: span.duration_ms - into,
                cycle: elapsed_ms / total,
            });
        }
        start = end;
    }
    // position < total guarantees a match above
    None
}

/// Transitions reported while advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent<P> {
    /// A new phase became active
    Entered { phase: P, cycle: u64 },
    /// The cycle counter moved to `cycles`
    CycleCompleted { cycles: u64 },
}

/// Repeating-tick driver over a list of phases
#[derive(Debug, Clone)]
pub struct PhaseTimer<P> {
    tick_ms: u64,
    spans: Vec<PhaseSpan<P>>,
    scheduler: Scheduler<()>,
    tick_timer: Option<TimerId>,
    elapsed_ms: u64,
    cycles: u64,
    current: Option<PhaseSample<P>>,
}

impl<P: Copy + PartialEq> PhaseTimer<P> {
    pub fn new(tick_ms: u64) -> Self {
        Self {
            tick_ms: tick_ms.max(1),
            spans: Vec::new(),
            scheduler: Scheduler::new(0),
            tick_timer: None,
            elapsed_ms: 0,
            cycles: 0,
            current: None,
        }
    }

    /// Reset elapsed time and begin ticking from `now`.
    ///
    /// Returns false (and stays stopped) if the spans have zero total length.
    pub fn start(&mut self, now: u64, spans: Vec<PhaseSpan<P>>) -> bool {
        self.stop();
        let Some(first) = sample(&spans, 0) else {
            log::warn!("Phase timer needs at least one non-empty phase");
            return false;
        };
        self.spans = spans;
        self.current = Some(first);
        self.scheduler.reset(now);
        self.tick_timer = Some(self.scheduler.set_interval(self.tick_ms, ()));
        true
    }

    /// Cancel the tick and return to the idle baseline
    pub fn stop(&mut self) {
        if let Some(id) = self.tick_timer.take() {
            self.scheduler.clear(id);
        }
        self.elapsed_ms = 0;
        self.cycles = 0;
        self.current = None;
    }

    pub fn is_running(&self) -> bool {
        self.tick_timer.is_some()
    }

    /// Run every tick due up to `now`
    pub fn advance_to(&mut self, now: u64) -> Vec<PhaseEvent<P>> {
        let mut events = Vec::new();
        while self.scheduler.pop_due(now).is_some() {
            self.on_tick(&mut events);
        }
        events
    }

    fn on_tick(&mut self, events: &mut Vec<PhaseEvent<P>>) {
        self.elapsed_ms += self.tick_ms;
        let Some(next) = sample(&self.spans, self.elapsed_ms) else {
            return;
        };

        if next.cycle > self.cycles {
            self.cycles = next.cycle;
            events.push(PhaseEvent::CycleCompleted {
                cycles: self.cycles,
            });
        }

        let changed = self
            .current
            .is_none_or(|cur| cur.index != next.index || cur.cycle != next.cycle);
        if changed {
            events.push(PhaseEvent::Entered {
                phase: next.phase,
                cycle: next.cycle,
            });
        }
        self.current = Some(next);
    }

    /// Current phase sample, `None` while idle
    pub fn current(&self) -> Option<&PhaseSample<P>> {
        self.current.as_ref()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn spans(&self) -> &[PhaseSpan<P>] {
        &self.spans
    }
}
