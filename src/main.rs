//! Calm Corner entry point
//!
//! On the web this installs logging and hands control to the page, which
//! drives `WebApp`. Natively it replays a short scripted session against a
//! simulated clock and an in-memory store.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
    }
    log::info!("Calm Corner starting...");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Calm Corner (native) starting...");
    log::info!("The activities are meant for the browser - replaying a simulated session");

    native::replay_session();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::rc::Rc;

    use calm_corner::activities::fireflies::TapOutcome;
    use calm_corner::activities::{Breathe, Fireflies, WorryBox};
    use calm_corner::audio::SilentBackend;
    use calm_corner::consts::TICK_MS;
    use calm_corner::{ActivityKind, Context, MemoryStore, RunState, SimClock};

    pub fn replay_session() {
        let store = Rc::new(MemoryStore::new());
        let clock = Rc::new(SimClock::new(0));
        let ctx = Context::new(store.clone(), Box::new(SilentBackend), clock.clone(), 7);

        for kind in ActivityKind::ALL {
            log::debug!("{:<18} /{}", kind.title(), kind.slug());
        }

        // One full 4-7-8 cycle
        let mut breathe = Breathe::new(&ctx);
        breathe.start();
        for _ in 0..(19_000 / TICK_MS) {
            clock.advance(TICK_MS);
            breathe.tick();
        }
        breathe.stop();
        log::info!(
            "Breathe: {} cycle(s), {} session(s) total",
            breathe.cycle_count(),
            breathe.prefs().sessions_completed
        );

        // A perfect fireflies round: tap every golden one
        let mut fireflies = Fireflies::new(&ctx);
        fireflies.start();
        while fireflies.state() == RunState::Running {
            clock.advance(TICK_MS);
            fireflies.tick();
            let golden: Vec<_> = fireflies
                .fireflies()
                .iter()
                .filter(|f| f.is_rare())
                .map(|f| f.id)
                .collect();
            for id in golden {
                if fireflies.tap(id) != TapOutcome::Golden {
                    log::warn!("Golden firefly {:?} was not scored", id);
                }
            }
        }
        let scores = fireflies.scores();
        log::info!(
            "Fireflies: score {}, best {}, streak {}",
            scores.score,
            scores.best_score,
            scores.streak
        );

        let mut worry_box = WorryBox::new(&ctx);
        for worry in ["the deadline", "that email"] {
            worry_box.add(worry);
        }
        worry_box.lock();
        log::info!("Worry box: {} particle(s) rising", worry_box.particles().len());
        clock.advance(2_000);
        worry_box.tick();
        log::info!("Worry box: {} worries left", worry_box.worries().len());

        for key in store.keys() {
            log::info!("stored {} = {}", key, store.raw(&key).unwrap_or_default());
        }
    }
}
