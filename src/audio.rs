//! Sound trigger
//!
//! Fire-and-forget playback of short clips. Nothing in the core waits on a
//! clip or observes a playback failure: backends swallow their own errors.

use std::cell::Cell;
use std::rc::Rc;

use crate::clamp_volume;
use crate::persistence::SharedStore;
use crate::settings::AudioSettings;

/// Sound assets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// Something added
    Chime,
    /// Something achieved
    Success,
    Inhale,
    Exhale,
    /// Looping background bed for the breathing guide
    CalmBackground,
}

impl Sound {
    pub fn path(&self) -> &'static str {
        match self {
            Sound::Chime => "/sounds/chime.mp3",
            Sound::Success => "/sounds/success.mp3",
            Sound::Inhale => "/sounds/inhale.mp3",
            Sound::Exhale => "/sounds/exhale.mp3",
            Sound::CalmBackground => "/sounds/calm-background.mp3",
        }
    }
}

/// Per-clip playback options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    /// Clip volume before the master volume is applied (0.0 - 1.0)
    pub volume: f32,
    pub looping: bool,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            looping: false,
        }
    }
}

impl PlayOptions {
    pub fn at(volume: f32) -> Self {
        Self {
            volume,
            ..Default::default()
        }
    }

    pub fn looped(mut self) -> Self {
        self.looping = true;
        self
    }
}

/// Control over an in-flight clip
pub trait SoundHandle {
    fn stop(&self);
    fn set_volume(&self, volume: f32);
}

/// Something that can start a clip by asset path
pub trait AudioBackend {
    /// Start playback immediately. `None` if the clip could not be started.
    fn play(&self, path: &str, volume: f32, looping: bool) -> Option<Box<dyn SoundHandle>>;
}

/// Backend that plays nothing (native builds, muted hosts)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn play(&self, path: &str, volume: f32, looping: bool) -> Option<Box<dyn SoundHandle>> {
        log::debug!("(silent) {} vol={:.2} loop={}", path, volume, looping);
        None
    }
}

/// `HTMLAudioElement` playback (WASM only)
#[cfg(target_arch = "wasm32")]
pub mod web {
    use web_sys::HtmlAudioElement;

    use super::{AudioBackend, SoundHandle};

    #[derive(Debug, Default, Clone, Copy)]
    pub struct HtmlAudioBackend;

    struct HtmlAudioHandle {
        element: HtmlAudioElement,
    }

    impl SoundHandle for HtmlAudioHandle {
        fn stop(&self) {
            if let Err(e) = self.element.pause() {
                log::warn!("Failed to stop clip: {:?}", e);
            }
            self.element.set_current_time(0.0);
        }

        fn set_volume(&self, volume: f32) {
            self.element.set_volume(volume as f64);
        }
    }

    impl AudioBackend for HtmlAudioBackend {
        fn play(&self, path: &str, volume: f32, looping: bool) -> Option<Box<dyn SoundHandle>> {
            let element = match HtmlAudioElement::new_with_src(path) {
                Ok(el) => el,
                Err(e) => {
                    log::warn!("Audio unavailable for {}: {:?}", path, e);
                    return None;
                }
            };
            element.set_volume(volume as f64);
            element.set_loop(looping);
            // Rejected promise (autoplay policy, missing file) is ignored
            if let Err(e) = element.play() {
                log::warn!("Failed to play {}: {:?}", path, e);
                return None;
            }
            Some(Box::new(HtmlAudioHandle { element }))
        }
    }
}

/// Audio manager shared by all activities
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    store: SharedStore,
    muted: Cell<bool>,
    master_volume: Cell<f32>,
}

pub type SharedAudio = Rc<AudioManager>;

impl AudioManager {
    /// Create a manager, loading mute/volume from the store
    pub fn load(store: SharedStore, backend: Box<dyn AudioBackend>) -> Self {
        let settings = AudioSettings::load(store.as_ref());
        Self {
            backend,
            store,
            muted: Cell::new(settings.muted),
            master_volume: Cell::new(settings.volume),
        }
    }

    pub fn settings(&self) -> AudioSettings {
        AudioSettings {
            muted: self.muted.get(),
            volume: self.master_volume.get(),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted.get()
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume.get()
    }

    /// Flip mute and persist it. Returns the new state.
    pub fn toggle_mute(&self) -> bool {
        let muted = !self.muted.get();
        self.muted.set(muted);
        self.settings().save_muted(self.store.as_ref());
        muted
    }

    /// Set master volume (clamped) and persist it
    pub fn set_volume(&self, volume: f32) {
        self.master_volume.set(clamp_volume(volume));
        self.settings().save_volume(self.store.as_ref());
    }

    /// Play a clip. Muted managers play nothing and return `None`.
    pub fn play(&self, sound: Sound, opts: PlayOptions) -> Option<Box<dyn SoundHandle>> {
        if self.muted.get() {
            return None;
        }
        let volume = self.settings().effective_volume(opts.volume);
        self.backend.play(sound.path(), volume, opts.looping)
    }

    /// Play at a volume, discarding the handle
    pub fn chirp(&self, sound: Sound, volume: f32) {
        let _ = self.play(sound, PlayOptions::at(volume));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Backend that records what would have played

    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{AudioBackend, SoundHandle};

    #[derive(Debug, Clone, PartialEq)]
    pub struct PlayRecord {
        pub path: String,
        pub volume: f32,
        pub looping: bool,
        pub stopped: bool,
    }

    #[derive(Debug, Default, Clone)]
    pub struct RecordingBackend {
        pub log: Rc<RefCell<Vec<PlayRecord>>>,
    }

    impl RecordingBackend {
        pub fn paths(&self) -> Vec<String> {
            self.log.borrow().iter().map(|r| r.path.clone()).collect()
        }

        pub fn last(&self) -> Option<PlayRecord> {
            self.log.borrow().last().cloned()
        }
    }

    struct RecordingHandle {
        log: Rc<RefCell<Vec<PlayRecord>>>,
        index: usize,
    }

    impl SoundHandle for RecordingHandle {
        fn stop(&self) {
            self.log.borrow_mut()[self.index].stopped = true;
        }

        fn set_volume(&self, volume: f32) {
            self.log.borrow_mut()[self.index].volume = volume;
        }
    }

    impl AudioBackend for RecordingBackend {
        fn play(&self, path: &str, volume: f32, looping: bool) -> Option<Box<dyn SoundHandle>> {
            let mut log = self.log.borrow_mut();
            log.push(PlayRecord {
                path: path.to_string(),
                volume,
                looping,
                stopped: false,
            });
            Some(Box::new(RecordingHandle {
                log: self.log.clone(),
                index: log.len() - 1,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingBackend;
    use super::*;
    use crate::persistence::MemoryStore;

    fn manager(store: &Rc<MemoryStore>) -> (AudioManager, RecordingBackend) {
        let backend = RecordingBackend::default();
        let audio = AudioManager::load(store.clone(), Box::new(backend.clone()));
        (audio, backend)
    }

    #[test]
    fn test_play_scales_by_master_volume() {
        let store = Rc::new(MemoryStore::new());
        store.insert_raw("audio-volume", "0.5");
        let (audio, backend) = manager(&store);

        assert!(audio.play(Sound::Chime, PlayOptions::at(0.4)).is_some());
        let rec = backend.last().unwrap();
        assert_eq!(rec.path, "/sounds/chime.mp3");
        assert_eq!(rec.volume, 0.2);
        assert!(!rec.looping);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let store = Rc::new(MemoryStore::new());
        let (audio, backend) = manager(&store);
        assert!(audio.toggle_mute());
        assert_eq!(store.raw("audio-muted").as_deref(), Some("true"));

        assert!(audio.play(Sound::Success, PlayOptions::default()).is_none());
        assert!(backend.log.borrow().is_empty());

        assert!(!audio.toggle_mute());
        audio.chirp(Sound::Success, 1.0);
        assert_eq!(backend.paths(), vec!["/sounds/success.mp3".to_string()]);
    }

    #[test]
    fn test_mute_survives_reload() {
        let store = Rc::new(MemoryStore::new());
        {
            let (audio, _) = manager(&store);
            audio.toggle_mute();
            audio.set_volume(4.0);
        }
        let (audio, _) = manager(&store);
        assert!(audio.is_muted());
        assert_eq!(audio.master_volume(), 1.0);
        assert_eq!(store.raw("audio-volume").as_deref(), Some("1"));
    }

    #[test]
    fn test_handle_controls_loop() {
        let store = Rc::new(MemoryStore::new());
        let (audio, backend) = manager(&store);
        let handle = audio
            .play(Sound::CalmBackground, PlayOptions::at(0.3).looped())
            .unwrap();
        handle.set_volume(0.6);
        handle.stop();
        let rec = backend.last().unwrap();
        assert!(rec.looping);
        assert!(rec.stopped);
        assert_eq!(rec.volume, 0.6);
    }

    #[test]
    fn test_silent_backend_never_fails() {
        let store: SharedStore = Rc::new(MemoryStore::new());
        let audio = AudioManager::load(store, Box::new(SilentBackend));
        assert!(audio.play(Sound::Exhale, PlayOptions::at(0.2)).is_none());
    }
}
