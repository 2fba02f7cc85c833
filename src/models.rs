//! Data structures and types for couchtv
//!
//! Shared models organized by domain:
//! - **Catalog**: categories, stream listings and detail records
//! - **Account**: login result and saved profiles
//! - **Library**: watch progress and favorites

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Catalog Models
// =============================================================================

/// Catalog section a listing comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Movies,
    Series,
    Live,
}

impl CatalogKind {
    /// Action listing the categories of this kind
    pub fn categories_action(&self) -> &'static str {
        match self {
            CatalogKind::Movies => "get_vod_categories",
            CatalogKind::Series => "get_series_categories",
            CatalogKind::Live => "get_live_categories",
        }
    }

    /// Action listing the streams of this kind
    pub fn streams_action(&self) -> &'static str {
        match self {
            CatalogKind::Movies => "get_vod_streams",
            CatalogKind::Series => "get_series",
            CatalogKind::Live => "get_live_streams",
        }
    }

    /// Kind of playable content a stream of this section produces
    pub fn content_kind(&self) -> ContentKind {
        match self {
            CatalogKind::Movies => ContentKind::Movie,
            CatalogKind::Series => ContentKind::SeriesEpisode,
            CatalogKind::Live => ContentKind::Live,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Movies => write!(f, "Movies"),
            CatalogKind::Series => write!(f, "Series"),
            CatalogKind::Live => write!(f, "Live TV"),
        }
    }
}

/// Catalog category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// One entry in a stream listing (movie, series or live channel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSummary {
    pub id: String,
    pub kind: CatalogKind,
    pub name: String,
    pub icon: Option<String>,
    pub category_id: Option<String>,
    pub container_extension: Option<String>,
    pub rating: Option<f32>,
}

impl fmt::Display for StreamSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rating {
            Some(r) if r > 0.0 => write!(f, "{} ★ {:.1}", self.name, r),
            _ => write!(f, "{}", self.name),
        }
    }
}

/// Movie detail from `get_vod_info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: String,
    pub name: String,
    pub plot: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub release_date: Option<String>,
    pub duration_secs: Option<u64>,
    pub rating: Option<f32>,
    pub poster: Option<String>,
    pub container_extension: Option<String>,
}

/// Season summary within a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub season_number: u32,
    pub name: String,
    pub episode_count: u32,
}

/// Playable episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub episode_num: u32,
    pub title: String,
    pub container_extension: Option<String>,
    pub plot: Option<String>,
    pub duration_secs: Option<u64>,
    pub image: Option<String>,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:02} {}", self.episode_num, self.title)
    }
}

/// Series detail from `get_series_info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDetail {
    pub id: String,
    pub name: String,
    pub plot: Option<String>,
    pub genre: Option<String>,
    pub cast: Option<String>,
    pub release_date: Option<String>,
    pub cover: Option<String>,
    pub seasons: Vec<Season>,
    /// Episodes keyed by season number
    pub episodes: BTreeMap<u32, Vec<Episode>>,
}

impl SeriesDetail {
    /// Season numbers that have episodes, ascending
    pub fn season_numbers(&self) -> Vec<u32> {
        self.episodes.keys().copied().collect()
    }

    pub fn episodes_of(&self, season: u32) -> &[Episode] {
        self.episodes
            .get(&season)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Detail for one catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DetailRecord {
    Movie(MovieDetail),
    Series(SeriesDetail),
}

impl DetailRecord {
    pub fn name(&self) -> &str {
        match self {
            DetailRecord::Movie(m) => &m.name,
            DetailRecord::Series(s) => &s.name,
        }
    }

    pub fn plot(&self) -> Option<&str> {
        match self {
            DetailRecord::Movie(m) => m.plot.as_deref(),
            DetailRecord::Series(s) => s.plot.as_deref(),
        }
    }
}

// =============================================================================
// Account Models
// =============================================================================

/// Account summary returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    pub username: String,
    pub status: String,
    pub expires: Option<String>,
    pub max_connections: Option<String>,
    pub active_connections: Option<String>,
    pub server_timezone: Option<String>,
}

/// Saved login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub profile_name: String,
    pub user_name: String,
    pub password: String,
    pub url: String,
}

// =============================================================================
// Library Models
// =============================================================================

/// Kind of playable content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    #[default]
    Movie,
    SeriesEpisode,
    Live,
}

impl ContentKind {
    /// Path segment of the stream URL
    pub fn path_segment(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::SeriesEpisode => "series",
            ContentKind::Live => "live",
        }
    }

    /// Container used when the catalog does not name one
    pub fn default_extension(&self) -> &'static str {
        match self {
            ContentKind::Live => "ts",
            _ => "mp4",
        }
    }
}

/// Persisted resume point for one title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchProgressRecord {
    pub content_id: String,
    pub display_name: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub container_format: Option<String>,
    pub last_position_secs: f64,
    #[serde(default)]
    pub duration_secs: f64,
    /// Unix milliseconds
    #[serde(default)]
    pub saved_at: i64,
    #[serde(default)]
    pub content_kind: ContentKind,
    #[serde(default)]
    pub series_id: Option<String>,
    #[serde(default)]
    pub season_number: Option<u32>,
    #[serde(default)]
    pub episode_number: Option<u32>,
}

impl WatchProgressRecord {
    /// Watched fraction in `[0, 1]`, zero when the duration is unknown
    pub fn progress(&self) -> f64 {
        if self.duration_secs > 0.0 {
            (self.last_position_secs / self.duration_secs).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl fmt::Display for WatchProgressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.season_number, self.episode_number) {
            (Some(s), Some(e)) => write!(f, "{} S{:02}E{:02}", self.display_name, s, e),
            _ => write!(f, "{}", self.display_name),
        }?;
        write!(f, " ({:.0}%)", self.progress() * 100.0)
    }
}

/// Favorite movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteMovie {
    pub content_id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub container_format: Option<String>,
}

/// Favorite series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteSeries {
    pub series_id: String,
    pub name: String,
    #[serde(default)]
    pub cover: Option<String>,
}
