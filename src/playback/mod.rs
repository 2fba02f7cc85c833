//! Playback session control
//!
//! - `timer`: clock abstraction and single-shot deadlines
//! - `engine`: the decode/render engine boundary
//! - `mpv`: engine backed by an external mpv process
//! - `resume`: resume-or-restart decisions
//! - `session`: scrubbing, debounced seek commits and progress persistence

pub mod engine;
#[cfg(unix)]
pub mod mpv;
pub mod resume;
pub mod session;
pub mod timer;

use thiserror::Error;

pub use engine::{EngineEvent, PlaybackEngine, UnavailableEngine};
#[cfg(unix)]
pub use mpv::MpvEngine;
pub use resume::{ResumeAction, ResumeChoice, ResumeDecision};
pub use session::{
    PlaybackRequest, PlaybackSessionController, SeekState, SessionConfig, SessionEvent,
    SessionState, TeardownOutcome, TeardownReason,
};
pub use timer::{Clock, ManualClock, SingleShotTimer, SystemClock};

/// Errors from starting or talking to a playback engine
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),

    #[error("Failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),

    #[error("Player IPC error: {0}")]
    Ipc(String),

    #[error("No playback engine available on this platform")]
    Unsupported,
}
