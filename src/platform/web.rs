//! wasm-bindgen host surface
//!
//! The page owns the UI and the timer loop; it calls `tick()` on its
//! interval and reads each activity back as JSON.

use std::rc::Rc;

use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;

use super::BrowserClock;
use crate::activities::clouds::CloudCategory;
use crate::activities::fireflies::TapOutcome;
use crate::activities::mood::Mood;
use crate::activities::safe_zone::Zone;
use crate::activities::{
    ActivityKind, Breathe, Clouds, Context, Fireflies, Garden, Hand, Journal, LoveNotes,
    MoodTracker, SafeZone, WorryBox,
};
use crate::audio::web::HtmlAudioBackend;
use crate::persistence::local::LocalStore;
use crate::persistence::{MemoryStore, SharedStore};
use crate::sim::EntityId;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Open LocalStorage, or keep state in memory for this tab if it is blocked
fn open_store() -> SharedStore {
    match LocalStore::open() {
        Ok(store) => Rc::new(store),
        Err(e) => {
            log::warn!("{}; progress will not be saved", e);
            Rc::new(MemoryStore::new())
        }
    }
}

#[wasm_bindgen]
pub struct WebApp {
    ctx: Context,
    breathe: Breathe,
    fireflies: Fireflies,
    clouds: Clouds,
    garden: Garden,
    hand: Hand,
    journal: Journal,
    love_notes: LoveNotes,
    mood: MoodTracker,
    safe_zone: SafeZone,
    worry_box: WorryBox,
}

#[wasm_bindgen]
impl WebApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebApp {
        let seed = js_sys::Date::now() as u64;
        let ctx = Context::new(
            open_store(),
            Box::new(HtmlAudioBackend),
            Rc::new(BrowserClock),
            seed,
        );
        log::info!("Calm Corner ready (seed {})", seed);
        WebApp {
            breathe: Breathe::new(&ctx),
            fireflies: Fireflies::new(&ctx),
            clouds: Clouds::new(&ctx),
            garden: Garden::new(&ctx),
            hand: Hand::new(&ctx),
            journal: Journal::new(&ctx),
            love_notes: LoveNotes::new(&ctx),
            mood: MoodTracker::new(&ctx),
            safe_zone: SafeZone::new(&ctx),
            worry_box: WorryBox::new(&ctx),
            ctx,
        }
    }

    /// Drive every timed activity up to `Date.now()`
    pub fn tick(&mut self) {
        self.breathe.tick();
        self.fireflies.tick();
        self.hand.tick();
        self.safe_zone.tick();
        self.worry_box.tick();
    }

    pub fn catalog(&self) -> Result<String, JsValue> {
        let items: Vec<_> = ActivityKind::ALL
            .iter()
            .map(|k| json!({ "slug": k.slug(), "title": k.title() }))
            .collect();
        to_json(&items)
    }

    // Audio

    pub fn toggle_mute(&self) -> bool {
        self.ctx.audio.toggle_mute()
    }

    pub fn is_muted(&self) -> bool {
        self.ctx.audio.is_muted()
    }

    pub fn set_volume(&self, volume: f32) {
        self.ctx.audio.set_volume(volume);
    }

    // Breathe

    pub fn breathe_start(&mut self) {
        self.breathe.start();
    }

    pub fn breathe_stop(&mut self) {
        self.breathe.stop();
    }

    pub fn breathe_set_music_volume(&mut self, volume: f32) {
        self.breathe.set_music_volume(volume);
    }

    pub fn breathe_view(&self) -> Result<String, JsValue> {
        to_json(&self.breathe.view())
    }

    // Fireflies

    pub fn fireflies_start(&mut self) {
        self.fireflies.start();
    }

    pub fn fireflies_stop(&mut self) {
        self.fireflies.stop();
    }

    /// `id` is the plain number from `fireflies_view`. Returns "golden",
    /// "missed" or "gone".
    pub fn fireflies_tap(&mut self, id: f64) -> String {
        let Some(id) = EntityId::from_js_number(id) else {
            return "gone".to_string();
        };
        match self.fireflies.tap(id) {
            TapOutcome::Golden => "golden",
            TapOutcome::Missed => "missed",
            TapOutcome::Gone => "gone",
        }
        .to_string()
    }

    pub fn fireflies_view(&self) -> Result<String, JsValue> {
        to_json(&self.fireflies.view())
    }

    // Clouds

    pub fn clouds_add(&mut self, thought: &str) -> Option<String> {
        self.clouds.add_thought(thought)
    }

    /// `category` is "keep" or "letgo"
    pub fn clouds_categorize(&mut self, id: &str, category: &str) -> bool {
        let category = match category {
            "keep" => CloudCategory::Keep,
            "letgo" => CloudCategory::LetGo,
            _ => return false,
        };
        self.clouds.categorize(id, category)
    }

    pub fn clouds_delete(&mut self, id: &str) {
        self.clouds.delete(id);
    }

    pub fn clouds_view(&self) -> Result<String, JsValue> {
        to_json(self.clouds.clouds())
    }

    // Garden

    pub fn garden_plant(&mut self, worry: &str) -> Option<String> {
        self.garden.plant_worry(worry)
    }

    pub fn garden_transform(&mut self, id: &str) -> bool {
        self.garden.transform(id)
    }

    pub fn garden_delete(&mut self, id: &str) {
        self.garden.delete(id);
    }

    pub fn garden_view(&self) -> Result<String, JsValue> {
        to_json(self.garden.plants())
    }

    // Hand

    pub fn hand_hold(&mut self) {
        self.hand.hold();
    }

    pub fn hand_view(&self) -> Result<String, JsValue> {
        to_json(&self.hand.view())
    }

    // Journal

    pub fn journal_shuffle(&mut self) -> String {
        self.journal.shuffle_prompt().to_string()
    }

    pub fn journal_save(&mut self, response: &str) -> Option<String> {
        self.journal.save_entry(response)
    }

    pub fn journal_delete(&mut self, id: &str) {
        self.journal.delete(id);
    }

    pub fn journal_view(&self) -> Result<String, JsValue> {
        to_json(&json!({
            "prompt": self.journal.prompt(),
            "entries": self.journal.entries(),
        }))
    }

    // Love notes

    pub fn notes_add(&mut self, message: &str) -> Option<String> {
        self.love_notes.add(message)
    }

    pub fn notes_toggle(&mut self, id: &str) {
        self.love_notes.toggle_open(id);
    }

    pub fn notes_delete(&mut self, id: &str) {
        self.love_notes.delete(id);
    }

    pub fn notes_view(&self) -> Result<String, JsValue> {
        to_json(&json!({
            "notes": self.love_notes.notes(),
            "opened": self.love_notes.opened().map(|n| n.id.as_str()),
        }))
    }

    // Mood

    /// `color` is a mood color token such as "bg-cyan-500"
    pub fn mood_select(&mut self, color: &str) -> bool {
        match Mood::from_color(color) {
            Some(mood) => {
                self.mood.select(mood);
                true
            }
            None => false,
        }
    }

    pub fn mood_view(&self) -> Result<String, JsValue> {
        to_json(&json!({
            "selected": self.mood.selected(),
            "background": self.mood.background(),
            "history": self.mood.history(),
        }))
    }

    // Safe zone

    pub fn safe_zone_drag_start(&mut self, id: &str) {
        self.safe_zone.drag_start(id);
    }

    /// `zone` is "red" or "blue"
    pub fn safe_zone_drop(&mut self, zone: &str) -> bool {
        let zone = match zone {
            "red" => Zone::Red,
            "blue" => Zone::Blue,
            _ => return false,
        };
        self.safe_zone.drop_in_zone(zone)
    }

    pub fn safe_zone_reset(&mut self) {
        self.safe_zone.reset();
    }

    pub fn safe_zone_view(&self) -> Result<String, JsValue> {
        to_json(&json!({
            "objects": self.safe_zone.objects(),
            "red": self.safe_zone.zone(Zone::Red),
            "blue": self.safe_zone.zone(Zone::Blue),
            "sorted": self.safe_zone.is_sorted(),
        }))
    }

    // Worry box

    pub fn worry_add(&mut self, text: &str) -> Option<String> {
        self.worry_box.add(text)
    }

    pub fn worry_lock(&mut self) -> bool {
        self.worry_box.lock()
    }

    pub fn worry_view(&self) -> Result<String, JsValue> {
        to_json(&json!({
            "worries": self.worry_box.worries(),
            "boxLocked": self.worry_box.is_locked(),
            "particles": self.worry_box.particles(),
        }))
    }
}

impl Default for WebApp {
    fn default() -> Self {
        Self::new()
    }
}
