//! Playback session controller
//!
//! Owns one playback session from start to teardown:
//!
//! ```text
//!   Idle ──start──▶ Playing ◀──toggle──▶ Paused
//!                      │  ▲
//!               scrub  │  │ commit (2s after the last scrub, or Enter)
//!                      ▼  │
//!                   Scrubbing (engine paused, pending target only)
//! ```
//!
//! Scrub inputs never seek the engine directly; they move a pending target
//! that is committed once input settles. Timers are polled from `tick`, so
//! the host's event loop is the only driver.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::engine::{EngineEvent, PlaybackEngine};
use super::timer::{Clock, SingleShotTimer};
use super::PlaybackError;
use crate::models::{ContentKind, WatchProgressRecord};
use crate::storage::WatchProgressStore;

/// Tunables, normally taken from `Config`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Quiet period after the last scrub before the seek is committed
    pub scrub_commit: Duration,
    /// Delay before the single retry of a resume seek
    pub resume_retry: Duration,
    /// Positions at or below this are not worth remembering
    pub min_persist_secs: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scrub_commit: Duration::from_millis(2000),
            resume_retry: Duration::from_millis(1000),
            min_persist_secs: 180.0,
        }
    }
}

/// Everything needed to start playing one title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRequest {
    pub content_id: String,
    pub display_name: String,
    pub stream_url: String,
    pub thumbnail_url: Option<String>,
    pub container_format: Option<String>,
    pub content_kind: ContentKind,
    pub series_id: Option<String>,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    /// Position to seek to once the engine is ready, 0 for the beginning
    pub start_offset: f64,
}

impl PlaybackRequest {
    /// Progress record for this title at `position`
    pub fn to_record(&self, position: f64, duration: f64) -> WatchProgressRecord {
        WatchProgressRecord {
            content_id: self.content_id.clone(),
            display_name: self.display_name.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            container_format: self.container_format.clone(),
            last_position_secs: position,
            duration_secs: duration,
            saved_at: Utc::now().timestamp_millis(),
            content_kind: self.content_kind,
            series_id: self.series_id.clone(),
            season_number: self.season_number,
            episode_number: self.episode_number,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekState {
    Idle,
    Scrubbing {
        pending_target: f64,
        commit_deadline: Instant,
    },
}

/// Something that happened during `tick`
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ScrubCommitted(f64),
    ResumeApplied(f64),
    /// Playback finished; the host should tear the session down
    Ended,
    EngineError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownReason {
    /// Back pressed in the player
    UserExit,
    /// Engine reported the end of the source
    Ended,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TeardownOutcome {
    Saved(WatchProgressRecord),
    Removed { content_id: String },
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ResumeProgress {
    None,
    Waiting(f64),
    Applied(f64),
}

/// Drives one playback session against a `PlaybackEngine`
pub struct PlaybackSessionController {
    engine: Box<dyn PlaybackEngine>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    request: Option<PlaybackRequest>,
    state: SessionState,
    seek: SeekState,
    commit_timer: SingleShotTimer,
    resume_timer: SingleShotTimer,
    resume: ResumeProgress,
}

impl PlaybackSessionController {
    pub fn new(engine: Box<dyn PlaybackEngine>, clock: Arc<dyn Clock>, config: SessionConfig) -> Self {
        Self {
            engine,
            clock,
            config,
            request: None,
            state: SessionState::Idle,
            seek: SeekState::Idle,
            commit_timer: SingleShotTimer::new(),
            resume_timer: SingleShotTimer::new(),
            resume: ResumeProgress::None,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Load the request's stream and start playing
    pub fn start(&mut self, request: PlaybackRequest) -> Result<(), PlaybackError> {
        info!(
            content_id = %request.content_id,
            start_offset = request.start_offset,
            "starting playback"
        );
        self.engine.load(&request.stream_url)?;
        self.engine.play();
        self.state = SessionState::Playing;
        self.seek = SeekState::Idle;
        self.resume = ResumeProgress::None;

        let offset = request.start_offset;
        self.request = Some(request);
        if offset > 0.0 {
            self.apply_resume(offset);
        }
        Ok(())
    }

    /// Stop the session and persist (or clear) its progress
    ///
    /// A user exit saves the engine position when it is past the
    /// persistence threshold; reaching the end removes the record so the
    /// title is not offered for resume again.
    pub fn teardown(&mut self, reason: TeardownReason, progress: &WatchProgressStore) -> TeardownOutcome {
        self.commit_timer.cancel();
        self.resume_timer.cancel();
        self.seek = SeekState::Idle;

        let Some(request) = self.request.take() else {
            return TeardownOutcome::Skipped;
        };
        let position = self.engine.current_time();
        let duration = self.engine.duration();
        self.engine.stop();
        self.state = SessionState::Idle;
        self.resume = ResumeProgress::None;

        match reason {
            TeardownReason::UserExit if position > self.config.min_persist_secs => {
                let record = request.to_record(position, duration);
                progress.save(record.clone());
                TeardownOutcome::Saved(record)
            }
            TeardownReason::UserExit => {
                debug!(position, "position below persistence threshold");
                TeardownOutcome::Skipped
            }
            TeardownReason::Ended => {
                progress.remove(&request.content_id);
                info!(content_id = %request.content_id, "playback ended, progress cleared");
                TeardownOutcome::Removed {
                    content_id: request.content_id,
                }
            }
        }
    }

    // =========================================================================
    // Scrubbing
    // =========================================================================

    /// Start adjusting a pending seek target by `delta` seconds
    ///
    /// Pauses the engine. While already scrubbing this behaves like
    /// `continue_scrub`. Returns the pending target.
    pub fn begin_scrub(&mut self, delta: f64) -> Option<f64> {
        if self.state == SessionState::Idle {
            return None;
        }
        if let SeekState::Scrubbing { .. } = self.seek {
            return self.continue_scrub(delta);
        }

        self.engine.pause();
        self.state = SessionState::Paused;
        let target = self.clamp(self.engine.current_time() + delta);
        self.arm_commit(target);
        debug!(position = target, "scrub started");
        Some(target)
    }

    /// Move the pending target by `delta` and restart the commit delay
    pub fn continue_scrub(&mut self, delta: f64) -> Option<f64> {
        let SeekState::Scrubbing { pending_target, .. } = self.seek else {
            return None;
        };
        let target = self.clamp(pending_target + delta);
        self.arm_commit(target);
        Some(target)
    }

    /// Seek to the pending target and resume playback
    pub fn commit_scrub(&mut self) -> Option<f64> {
        let SeekState::Scrubbing { pending_target, .. } = self.seek else {
            return None;
        };
        self.commit_timer.cancel();
        self.seek = SeekState::Idle;
        self.engine.seek(pending_target);
        self.engine.play();
        self.state = SessionState::Playing;
        debug!(position = pending_target, "scrub committed");
        Some(pending_target)
    }

    fn arm_commit(&mut self, target: f64) {
        let deadline = self
            .commit_timer
            .arm(self.clock.now(), self.config.scrub_commit);
        self.seek = SeekState::Scrubbing {
            pending_target: target,
            commit_deadline: deadline,
        };
    }

    fn clamp(&self, seconds: f64) -> f64 {
        let duration = self.engine.duration();
        let upper = if duration > 0.0 { duration } else { f64::MAX };
        seconds.clamp(0.0, upper)
    }

    // =========================================================================
    // Play / pause / resume
    // =========================================================================

    /// Confirm a pending scrub, otherwise flip between playing and paused
    pub fn toggle_pause(&mut self) -> SessionState {
        if self.commit_scrub().is_some() {
            return self.state;
        }
        match self.state {
            SessionState::Playing => {
                self.engine.pause();
                self.state = SessionState::Paused;
            }
            SessionState::Paused => {
                self.engine.play();
                self.state = SessionState::Playing;
            }
            SessionState::Idle => {}
        }
        self.state
    }

    /// Seek to a saved position once the engine can take it
    ///
    /// If the engine is not ready yet the seek is retried once after
    /// `resume_retry`.
    pub fn apply_resume(&mut self, target: f64) {
        if self.engine.is_ready() {
            self.engine.seek(target);
            self.resume = ResumeProgress::Applied(target);
            info!(position = target, "resume position applied");
        } else {
            debug!(position = target, "engine not ready, deferring resume");
            self.resume = ResumeProgress::Waiting(target);
            self.resume_timer
                .arm(self.clock.now(), self.config.resume_retry);
        }
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Fire due timers and collect engine signals
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.state == SessionState::Idle {
            return events;
        }
        let now = self.clock.now();

        if self.commit_timer.fire_if_due(now) {
            if let Some(target) = self.commit_scrub() {
                events.push(SessionEvent::ScrubCommitted(target));
            }
        }

        if self.resume_timer.fire_if_due(now) {
            if let ResumeProgress::Waiting(target) = self.resume {
                if !self.engine.is_ready() {
                    warn!(position = target, "engine still not ready, seeking anyway");
                }
                self.engine.seek(target);
                self.resume = ResumeProgress::Applied(target);
                events.push(SessionEvent::ResumeApplied(target));
            }
        }

        while let Some(event) = self.engine.poll_event() {
            match event {
                EngineEvent::Ended => events.push(SessionEvent::Ended),
                EngineEvent::Error(detail) => {
                    warn!(error = %detail, "playback engine error");
                    events.push(SessionEvent::EngineError(detail));
                }
            }
        }
        events
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn seek_state(&self) -> SeekState {
        self.seek
    }

    pub fn pending_target(&self) -> Option<f64> {
        match self.seek {
            SeekState::Scrubbing { pending_target, .. } => Some(pending_target),
            SeekState::Idle => None,
        }
    }

    /// Position to show: the pending target while scrubbing
    pub fn display_position(&self) -> f64 {
        self.pending_target()
            .unwrap_or_else(|| self.engine.current_time())
    }

    pub fn duration(&self) -> f64 {
        self.engine.duration()
    }

    pub fn request(&self) -> Option<&PlaybackRequest> {
        self.request.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.state != SessionState::Idle
    }

    /// Resume target applied so far, if any
    pub fn applied_resume(&self) -> Option<f64> {
        match self.resume {
            ResumeProgress::Applied(t) => Some(t),
            _ => None,
        }
    }

    pub fn engine(&self) -> &dyn PlaybackEngine {
        self.engine.as_ref()
    }
}

impl std::fmt::Debug for PlaybackSessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSessionController")
            .field("state", &self.state)
            .field("seek", &self.seek)
            .field("request", &self.request)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::timer::ManualClock;
    use crate::storage::MemoryStore;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct FakeState {
        time: f64,
        duration: f64,
        paused: bool,
        seeks: Vec<f64>,
        events: VecDeque<EngineEvent>,
        stopped: bool,
    }

    #[derive(Clone, Default)]
    struct FakeEngine(Arc<Mutex<FakeState>>);

    impl FakeEngine {
        fn with(time: f64, duration: f64) -> Self {
            let engine = Self::default();
            {
                let mut s = engine.0.lock().unwrap();
                s.time = time;
                s.duration = duration;
            }
            engine
        }
    }

    impl PlaybackEngine for FakeEngine {
        fn load(&mut self, _url: &str) -> Result<(), PlaybackError> {
            Ok(())
        }
        fn play(&mut self) {
            self.0.lock().unwrap().paused = false;
        }
        fn pause(&mut self) {
            self.0.lock().unwrap().paused = true;
        }
        fn seek(&mut self, seconds: f64) {
            let mut s = self.0.lock().unwrap();
            s.time = seconds;
            s.seeks.push(seconds);
        }
        fn current_time(&self) -> f64 {
            self.0.lock().unwrap().time
        }
        fn duration(&self) -> f64 {
            self.0.lock().unwrap().duration
        }
        fn is_paused(&self) -> bool {
            self.0.lock().unwrap().paused
        }
        fn poll_event(&mut self) -> Option<EngineEvent> {
            self.0.lock().unwrap().events.pop_front()
        }
        fn stop(&mut self) {
            self.0.lock().unwrap().stopped = true;
        }
    }

    fn request(offset: f64) -> PlaybackRequest {
        PlaybackRequest {
            content_id: "42".into(),
            display_name: "Heat".into(),
            stream_url: "http://tv.example.com/movie/u/p/42.mkv".into(),
            thumbnail_url: None,
            container_format: Some("mkv".into()),
            content_kind: ContentKind::Movie,
            series_id: None,
            season_number: None,
            episode_number: None,
            start_offset: offset,
        }
    }

    fn session(engine: &FakeEngine, clock: &ManualClock) -> PlaybackSessionController {
        let mut s = PlaybackSessionController::new(
            Box::new(engine.clone()),
            Arc::new(clock.clone()),
            SessionConfig::default(),
        );
        s.start(request(0.0)).unwrap();
        s
    }

    #[test]
    fn test_scrub_debounces_commit() {
        let engine = FakeEngine::with(100.0, 300.0);
        let clock = ManualClock::new();
        let mut s = session(&engine, &clock);

        assert_eq!(s.begin_scrub(10.0), Some(110.0));
        assert!(engine.is_paused());
        clock.advance(Duration::from_millis(1500));
        assert_eq!(s.continue_scrub(10.0), Some(120.0));
        clock.advance(Duration::from_millis(1999));
        assert!(s.tick().is_empty());
        assert!(engine.0.lock().unwrap().seeks.is_empty());

        clock.advance(Duration::from_millis(1));
        assert_eq!(s.tick(), vec![SessionEvent::ScrubCommitted(120.0)]);
        assert_eq!(engine.0.lock().unwrap().seeks, vec![120.0]);
        assert!(!engine.is_paused());
        assert_eq!(s.state(), SessionState::Playing);
        assert_eq!(s.seek_state(), SeekState::Idle);
    }

    #[test]
    fn test_scrub_clamps_to_duration() {
        let engine = FakeEngine::with(290.0, 300.0);
        let clock = ManualClock::new();
        let mut s = session(&engine, &clock);
        assert_eq!(s.begin_scrub(30.0), Some(300.0));
        assert_eq!(s.continue_scrub(-400.0), Some(0.0));
    }

    #[test]
    fn test_continue_without_scrub_is_ignored() {
        let engine = FakeEngine::with(10.0, 300.0);
        let clock = ManualClock::new();
        let mut s = session(&engine, &clock);
        assert_eq!(s.continue_scrub(10.0), None);
        assert_eq!(s.commit_scrub(), None);
    }

    #[test]
    fn test_toggle_commits_pending_scrub() {
        let engine = FakeEngine::with(50.0, 300.0);
        let clock = ManualClock::new();
        let mut s = session(&engine, &clock);
        s.begin_scrub(-10.0);
        assert_eq!(s.toggle_pause(), SessionState::Playing);
        assert_eq!(engine.0.lock().unwrap().seeks, vec![40.0]);
        assert_eq!(s.toggle_pause(), SessionState::Paused);
        assert_eq!(s.toggle_pause(), SessionState::Playing);
    }

    #[test]
    fn test_resume_retries_once_when_not_ready() {
        let engine = FakeEngine::with(0.0, 0.0);
        let clock = ManualClock::new();
        let mut s = PlaybackSessionController::new(
            Box::new(engine.clone()),
            Arc::new(clock.clone()),
            SessionConfig::default(),
        );
        s.start(request(754.0)).unwrap();
        assert!(engine.0.lock().unwrap().seeks.is_empty());

        engine.0.lock().unwrap().duration = 5400.0;
        clock.advance(Duration::from_millis(1000));
        assert_eq!(s.tick(), vec![SessionEvent::ResumeApplied(754.0)]);
        clock.advance(Duration::from_millis(1000));
        assert!(s.tick().is_empty());
        assert_eq!(engine.0.lock().unwrap().seeks, vec![754.0]);
        assert_eq!(s.applied_resume(), Some(754.0));
    }

    #[test]
    fn test_resume_applies_immediately_when_ready() {
        let engine = FakeEngine::with(0.0, 5400.0);
        let clock = ManualClock::new();
        let mut s = PlaybackSessionController::new(
            Box::new(engine.clone()),
            Arc::new(clock.clone()),
            SessionConfig::default(),
        );
        s.start(request(300.0)).unwrap();
        assert_eq!(engine.0.lock().unwrap().seeks, vec![300.0]);
    }

    #[test]
    fn test_teardown_persists_past_threshold() {
        let engine = FakeEngine::with(200.0, 5400.0);
        let clock = ManualClock::new();
        let progress = WatchProgressStore::new(Arc::new(MemoryStore::new()));
        let mut s = session(&engine, &clock);

        match s.teardown(TeardownReason::UserExit, &progress) {
            TeardownOutcome::Saved(record) => assert_eq!(record.last_position_secs, 200.0),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(progress.get("42").map(|r| r.last_position_secs), Some(200.0));
        assert!(engine.0.lock().unwrap().stopped);
        assert!(!s.is_active());
    }

    #[test]
    fn test_teardown_below_threshold_skips() {
        let engine = FakeEngine::with(60.0, 5400.0);
        let clock = ManualClock::new();
        let progress = WatchProgressStore::new(Arc::new(MemoryStore::new()));
        let mut s = session(&engine, &clock);
        assert_eq!(s.teardown(TeardownReason::UserExit, &progress), TeardownOutcome::Skipped);
        assert!(progress.list().is_empty());
    }

    #[test]
    fn test_ended_clears_progress() {
        let engine = FakeEngine::with(5400.0, 5400.0);
        let clock = ManualClock::new();
        let progress = WatchProgressStore::new(Arc::new(MemoryStore::new()));
        progress.save(request(0.0).to_record(1000.0, 5400.0));
        let mut s = session(&engine, &clock);

        engine.0.lock().unwrap().events.push_back(EngineEvent::Ended);
        assert_eq!(s.tick(), vec![SessionEvent::Ended]);
        assert_eq!(
            s.teardown(TeardownReason::Ended, &progress),
            TeardownOutcome::Removed {
                content_id: "42".into()
            }
        );
        assert!(progress.get("42").is_none());
    }

    #[test]
    fn test_scrub_before_start_is_ignored() {
        let engine = FakeEngine::with(10.0, 100.0);
        let clock = ManualClock::new();
        let mut s = PlaybackSessionController::new(
            Box::new(engine),
            Arc::new(clock),
            SessionConfig::default(),
        );
        assert_eq!(s.begin_scrub(10.0), None);
    }
}
