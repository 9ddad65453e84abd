//! Deterministic timer facility
//!
//! Stand-in for `setInterval`/`setTimeout`: the host advances the scheduler to
//! the current instant and the owner drains due timers one at a time, so a
//! handler can cancel timers that would otherwise fire in the same step.

/// Handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<E> {
    id: TimerId,
    due: u64,
    /// `Some(period)` for repeating timers
    period: Option<u64>,
    event: E,
}

/// Repeating and one-shot timers over a monotonic millisecond timeline
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now: u64,
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E: Clone> Scheduler<E> {
    pub fn new(now: u64) -> Self {
        Self {
            now,
            next_id: 1,
            timers: Vec::new(),
        }
    }

    /// Current scheduler time (last drained instant)
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Drop every timer and restart the timeline at `now`
    pub fn reset(&mut self, now: u64) {
        self.timers.clear();
        self.now = now;
    }

    /// Fire `event` every `period_ms` (minimum 1ms), first after one period
    pub fn set_interval(&mut self, period_ms: u64, event: E) -> TimerId {
        let period = period_ms.max(1);
        self.push(period, Some(period), event)
    }

    /// Fire `event` once after `delay_ms`
    pub fn set_timeout(&mut self, delay_ms: u64, event: E) -> TimerId {
        self.push(delay_ms, None, event)
    }

    /// Cancel a timer. Returns false if it already fired or was cleared.
    pub fn clear(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Pop the earliest timer due at or before `until`.
    ///
    /// Ties fire in scheduling order. Repeating timers are re-armed one period
    /// after their due time. When nothing is left the scheduler moves to
    /// `until`; time never goes backwards.
    pub fn pop_due(&mut self, until: u64) -> Option<E> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i);

        let Some(idx) = idx else {
            self.now = self.now.max(until);
            return None;
        };

        let due = self.timers[idx].due;
        self.now = self.now.max(due);
        match self.timers[idx].period {
            Some(period) => {
                self.timers[idx].due = due + period;
                Some(self.timers[idx].event.clone())
            }
            None => Some(self.timers.swap_remove(idx).event),
        }
    }

    /// Drain every due timer without interleaving handlers
    pub fn drain_until(&mut self, until: u64) -> Vec<E> {
        let mut fired = Vec::new();
        while let Some(event) = self.pop_due(until) {
            fired.push(event);
        }
        fired
    }

    fn push(&mut self, delay: u64, period: Option<u64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            period,
            event,
        });
        id
    }
}

impl<E: Clone> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new(0)
    }
}
