//! Playback engine boundary
//!
//! The session controller only ever talks to this trait. Commands are
//! fire-and-forget; `ended` and `error` arrive asynchronously and are
//! collected with `poll_event`.

use super::PlaybackError;

/// Asynchronous signal from the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Playback reached the end of the source
    Ended,
    /// Decode, network or process failure
    Error(String),
}

/// Video decode/render engine
pub trait PlaybackEngine {
    /// Open a source URL
    fn load(&mut self, url: &str) -> Result<(), PlaybackError>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Seek to an absolute position in seconds
    fn seek(&mut self, seconds: f64);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Total duration in seconds, 0 until known
    fn duration(&self) -> f64;

    fn is_paused(&self) -> bool;

    /// Whether the source is loaded far enough to accept a seek
    fn is_ready(&self) -> bool {
        self.duration() > 0.0
    }

    /// Next pending signal, if any
    fn poll_event(&mut self) -> Option<EngineEvent>;

    /// Release the source and any player process
    fn stop(&mut self) {}
}

/// Engine for platforms without a player backend; every load fails
#[derive(Debug, Default)]
pub struct UnavailableEngine;

impl PlaybackEngine for UnavailableEngine {
    fn load(&mut self, _url: &str) -> Result<(), PlaybackError> {
        Err(PlaybackError::Unsupported)
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn seek(&mut self, _seconds: f64) {}

    fn current_time(&self) -> f64 {
        0.0
    }

    fn duration(&self) -> f64 {
        0.0
    }

    fn is_paused(&self) -> bool {
        true
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        None
    }
}

impl<E: PlaybackEngine + ?Sized> PlaybackEngine for Box<E> {
    fn load(&mut self, url: &str) -> Result<(), PlaybackError> {
        (**self).load(url)
    }

    fn play(&mut self) {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn seek(&mut self, seconds: f64) {
        (**self).seek(seconds)
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn duration(&self) -> f64 {
        (**self).duration()
    }

    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        (**self).poll_event()
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_engine_refuses_load() {
        let mut engine: Box<dyn PlaybackEngine> = Box::new(UnavailableEngine);
        assert!(matches!(engine.load("http://x/1.mp4"), Err(PlaybackError::Unsupported)));
        assert!(!engine.is_ready());
    }
}
