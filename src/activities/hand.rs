//! Hold My Hand - a press for reassurance

use chrono::{DateTime, Utc};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{ActivityKind, Context};
use crate::audio::Sound;
use crate::consts::HAND_HOLD_MS;
use crate::persistence::PersistedState;
use crate::sim::{Scheduler, TimerId};

pub const STORAGE_KEY: &str = "hand-sessions";

pub const GESTURES: [&str; 6] = ["🤝", "🫂", "💜", "🤲", "👐", "✨"];

pub const MESSAGES: [&str; 16] = [
    "I am here for you.",
    "You are not alone.",
    "This will pass.",
    "You are safe.",
    "I believe in you.",
    "You are stronger than you think.",
    "Breathe. You can do this.",
    "You matter.",
    "Your pain is valid.",
    "You deserve kindness.",
    "Take it one moment at a time.",
    "You have survived 100% of your worst days.",
    "You are worthy of love.",
    "This is temporary.",
    "You are brave.",
    "It is okay to not be okay.",
];

pub const VALIDATIONS: [&str; 12] = [
    "Your feelings are completely valid.",
    "It is okay to feel overwhelmed.",
    "Your struggles matter.",
    "You are allowed to take breaks.",
    "Being vulnerable takes strength.",
    "Your pain is real and acknowledged.",
    "You deserve to be heard.",
    "It is okay to ask for help.",
    "You are doing better than you think.",
    "Progress is not always linear, and that is okay.",
    "Your mental health matters.",
    "You are enough, just as you are.",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupportSession {
    pub count: u32,
    /// Stored as an ISO-8601 string (`2025-01-01T10:00:00.000Z`)
    #[serde(with = "iso_millis")]
    pub last_visit: Option<DateTime<Utc>>,
}

/// ISO-8601 with millisecond precision. Reads ms numbers too; anything
/// unreadable becomes `None` instead of failing the whole record.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stamp {
        Text(String),
        Millis(i64),
        Other(IgnoredAny),
    }

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(match Stamp::deserialize(deserializer)? {
            Stamp::Text(s) => DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            Stamp::Millis(ms) => DateTime::from_timestamp_millis(ms),
            Stamp::Other(_) => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandTimer {
    Release,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandView {
    pub holding: bool,
    pub gesture: &'static str,
    pub message: &'static str,
    /// Shown only while holding
    pub validation: Option<&'static str>,
    pub count: u32,
}

pub struct Hand {
    ctx: Context,
    sessions: PersistedState<SupportSession>,
    rng: Pcg32,
    timers: Scheduler<HandTimer>,
    release: Option<TimerId>,
    gesture: &'static str,
    message: &'static str,
    validation: &'static str,
}

impl Hand {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            sessions: PersistedState::load(
                ctx.store.clone(),
                STORAGE_KEY,
                SupportSession::default(),
            ),
            rng: ctx.rng_for(ActivityKind::Hand),
            timers: Scheduler::new(ctx.now()),
            release: None,
            gesture: GESTURES[0],
            message: MESSAGES[0],
            validation: VALIDATIONS[0],
        }
    }

    /// Reach out. Holding again while held restarts the release timer.
    pub fn hold(&mut self) {
        let now = self.ctx.now();
        self.ctx.audio.chirp(Sound::Success, 0.5);

        self.gesture = pick(&mut self.rng, &GESTURES);
        self.message = pick(&mut self.rng, &MESSAGES);
        self.validation = pick(&mut self.rng, &VALIDATIONS);

        let visit = i64::try_from(now).ok().and_then(DateTime::from_timestamp_millis);
        self.sessions.update(|s| {
            s.count += 1;
            s.last_visit = visit;
        });

        if let Some(id) = self.release.take() {
            self.timers.clear(id);
        }
        // Catch the scheduler up so the delay counts from now
        self.tick();
        self.release = Some(self.timers.set_timeout(HAND_HOLD_MS, HandTimer::Release));
    }

    pub fn tick(&mut self) {
        let now = self.ctx.now();
        while let Some(HandTimer::Release) = self.timers.pop_due(now) {
            self.release = None;
        }
    }

    pub fn is_holding(&self) -> bool {
        self.release.is_some()
    }

    pub fn sessions(&self) -> &SupportSession {
        self.sessions.get()
    }

    pub fn view(&self) -> HandView {
        HandView {
            holding: self.is_holding(),
            gesture: self.gesture,
            message: self.message,
            validation: self.is_holding().then_some(self.validation),
            count: self.sessions.get().count,
        }
    }
}

fn pick<const N: usize>(rng: &mut Pcg32, items: &[&'static str; N]) -> &'static str {
    items[rng.random_range(0..N)]
}
