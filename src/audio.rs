//! Sound effects
//!
//! Short synthesized cues played fire-and-forget. Without the `audio`
//! feature, or without an output device, every call is a no-op.

use crate::sim::GameEvent;

/// A sound the game can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Flap,
    Score,
    Crash,
}

impl Cue {
    /// `(frequency Hz, duration ms)` pairs played back to back.
    pub fn notes(&self) -> &'static [(f32, u64)] {
        match self {
            Cue::Flap => &[(520.0, 40), (660.0, 40)],
            Cue::Score => &[(880.0, 60), (1175.0, 90)],
            // Falling sweep, 400 Hz down to 80 Hz
            Cue::Crash => &[
                (400.0, 70),
                (320.0, 70),
                (250.0, 70),
                (190.0, 80),
                (140.0, 90),
                (100.0, 100),
                (80.0, 120),
            ],
        }
    }

    pub fn gain(&self) -> f32 {
        match self {
            Cue::Flap => 0.08,
            Cue::Score => 0.1,
            Cue::Crash => 0.15,
        }
    }

    /// The cue an event should trigger, if any.
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Flapped => Some(Cue::Flap),
            GameEvent::Scored { .. } => Some(Cue::Score),
            GameEvent::Crashed { .. } => Some(Cue::Crash),
            GameEvent::TierChanged(_) | GameEvent::Paused | GameEvent::Resumed => None,
        }
    }
}

#[cfg(feature = "audio")]
mod backend {
    use std::time::Duration;

    use rodio::source::{SineWave, Source};
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    pub struct Output {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl Output {
        pub fn open() -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(Self {
                    _stream: stream,
                    handle,
                }),
                Err(e) => {
                    log::warn!("No audio output device, playing silently: {e}");
                    None
                }
            }
        }

        pub fn play(&self, notes: &[(f32, u64)], gain: f32) {
            let Ok(sink) = Sink::try_new(&self.handle) else {
                return;
            };
            for &(freq, ms) in notes {
                sink.append(
                    SineWave::new(freq)
                        .take_duration(Duration::from_millis(ms))
                        .amplify(gain),
                );
            }
            sink.detach();
        }
    }
}

pub struct Sfx {
    #[cfg(feature = "audio")]
    out: Option<backend::Output>,
}

impl Sfx {
    #[cfg(feature = "audio")]
    pub fn open(enabled: bool) -> Self {
        let out = if enabled { backend::Output::open() } else { None };
        Self { out }
    }

    #[cfg(not(feature = "audio"))]
    pub fn open(enabled: bool) -> Self {
        if enabled {
            log::debug!("Built without the `audio` feature, sound is off");
        }
        Self::silent()
    }

    pub fn silent() -> Self {
        Self {
            #[cfg(feature = "audio")]
            out: None,
        }
    }

    /// Whether cues actually reach a device.
    #[cfg(feature = "audio")]
    pub fn is_active(&self) -> bool {
        self.out.is_some()
    }

    #[cfg(not(feature = "audio"))]
    pub fn is_active(&self) -> bool {
        false
    }

    #[cfg(feature = "audio")]
    pub fn play(&self, cue: Cue) {
        if let Some(out) = &self.out {
            out.play(cue.notes(), cue.gain());
        }
    }

    #[cfg(not(feature = "audio"))]
    pub fn play(&self, _cue: Cue) {}

    pub fn on_event(&self, event: &GameEvent) {
        if let Some(cue) = Cue::for_event(event) {
            self.play(cue);
        }
    }
}

impl std::fmt::Debug for Sfx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sfx").field("active", &self.is_active()).finish()
    }
}
