//! Shared test doubles
//!
//! Each integration test file is its own crate; include with `mod common;`.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use couchtv::playback::{EngineEvent, PlaybackEngine, PlaybackError};

/// Observable state of a `FakeEngine`
#[derive(Debug, Default)]
pub struct FakeState {
    pub loaded: Option<String>,
    pub position: f64,
    pub duration: f64,
    pub paused: bool,
    pub ready: bool,
    pub seeks: Vec<f64>,
    pub stopped: bool,
    pub events: Vec<EngineEvent>,
}

/// Engine whose state the test can read and drive through a shared handle
#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    pub state: Arc<Mutex<FakeState>>,
    /// Duration reported once loaded
    pub load_duration: f64,
}

impl FakeEngine {
    pub fn new(load_duration: f64) -> Self {
        Self {
            state: Arc::default(),
            load_duration,
        }
    }

    pub fn handle(&self) -> Arc<Mutex<FakeState>> {
        self.state.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }
}

impl PlaybackEngine for FakeEngine {
    fn load(&mut self, url: &str) -> Result<(), PlaybackError> {
        let duration = self.load_duration;
        let mut s = self.lock();
        s.loaded = Some(url.to_string());
        s.duration = duration;
        s.ready = duration > 0.0;
        s.position = 0.0;
        s.stopped = false;
        Ok(())
    }

    fn play(&mut self) {
        self.lock().paused = false;
    }

    fn pause(&mut self) {
        self.lock().paused = true;
    }

    fn seek(&mut self, seconds: f64) {
        let mut s = self.lock();
        s.position = seconds;
        s.seeks.push(seconds);
    }

    fn current_time(&self) -> f64 {
        self.lock().position
    }

    fn duration(&self) -> f64 {
        self.lock().duration
    }

    fn is_paused(&self) -> bool {
        self.lock().paused
    }

    fn is_ready(&self) -> bool {
        self.lock().ready
    }

    fn poll_event(&mut self) -> Option<EngineEvent> {
        let mut s = self.lock();
        if s.events.is_empty() {
            None
        } else {
            Some(s.events.remove(0))
        }
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}
