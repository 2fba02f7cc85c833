//! couchtv - lean-back IPTV browser for the terminal
//!
//! Browse an Xtream-compatible catalog with six inputs (four arrows,
//! Enter, Back) and play through mpv with resume support.
//!
//! # Modules
//!
//! - `focus` - spatial focus graph over zones and items
//! - `back` - escape levels and modal handling for the Back key
//! - `scene` - screens built on the focus graph
//! - `api` - catalog client and in-flight request tracking
//! - `playback` - engine boundary, mpv driver, resume and scrubbing
//! - `storage` - watch progress, favorites and profiles
//! - `app` - application state and navigation
//! - `ui` - ratatui rendering
//! - `cli` / `commands` - scriptable subcommands

pub mod api;
pub mod app;
pub mod back;
pub mod cli;
pub mod commands;
pub mod config;
pub mod focus;
pub mod input;
pub mod models;
pub mod playback;
pub mod scene;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use models::{
    AuthResult, CatalogKind, Category, ContentKind, DetailRecord, Episode, FavoriteMovie,
    FavoriteSeries, MovieDetail, Profile, Season, SeriesDetail, StreamSummary,
    WatchProgressRecord,
};

pub use api::{ApiError, XtreamClient};
pub use app::App;
pub use back::{BackNavigationRouter, BackOutcome};
pub use config::Config;
pub use focus::{Direction, FocusEvent, FocusGraph};
pub use input::InputSignal;
pub use playback::{PlaybackEngine, PlaybackRequest, PlaybackSessionController};
pub use scene::{Scene, SceneKind};
