//! Scenes: one focus graph and back router per screen
//!
//! A scene is a set of panels (top-level focus zones) laid out on a
//! virtual grid so spatial navigation works across them. Each registered
//! item carries a label for rendering and an `ItemAction` run when it is
//! activated.

use std::collections::HashMap;
use tracing::warn;

use crate::app::LoadingState;
use crate::back::{BackNavigationRouter, BackOutcome, EscapeLevel};
use crate::focus::{Direction, FocusGraph, FocusZone, FocusableItem, Rect};
use crate::models::{
    CatalogKind, Category, DetailRecord, Episode, FavoriteMovie, FavoriteSeries, Profile,
    StreamSummary, WatchProgressRecord,
};
use crate::playback::resume::{resume_label, ResumeChoice};

// =============================================================================
// Keys and layout
// =============================================================================

pub const ROOT: &str = "root";
pub const PROFILES: &str = "profiles";
pub const MANAGE: &str = "manage";
pub const TILES: &str = "tiles";
pub const SIDEBAR: &str = "sidebar";
pub const GRID: &str = "grid";
pub const DETAIL: &str = "detail";
pub const SEARCH_BAR: &str = "search-bar";
pub const RESUME: &str = "resume";

pub const PLAY_KEY: &str = "play";
pub const FAVORITE_KEY: &str = "favorite";
pub const CLEAR_PROGRESS_KEY: &str = "clear-progress";
pub const DELETE_PROFILE_KEY: &str = "delete-profile";
pub const SEARCH_INPUT_KEY: &str = "search-input";

/// Grid items shown before paging
pub const PAGE_SIZE: usize = 50;
/// Focusing one of the last this-many visible items loads the next page
pub const PAGE_THRESHOLD: usize = 10;

pub const GRID_COLUMNS: usize = 4;
const SIDEBAR_X: i32 = 0;
const MANAGE_X: i32 = 40;
const GRID_X: i32 = 30;
const DETAIL_X: i32 = 130;
const CELL_W: i32 = 22;
const CELL_H: i32 = 3;

fn column_rect(x: i32, top: i32, index: usize) -> Rect {
    Rect::new(x, top + 2 * index as i32, 24, 1)
}

fn grid_rect(top: i32, index: usize) -> Rect {
    let col = (index % GRID_COLUMNS) as i32;
    let row = (index / GRID_COLUMNS) as i32;
    Rect::new(GRID_X + col * CELL_W, top + row * CELL_H, CELL_W - 2, CELL_H - 1)
}

// =============================================================================
// Scene model
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Login,
    Landing,
    Browse(CatalogKind),
    Favorites,
    ContinueWatching,
    Search,
    Player,
}

impl SceneKind {
    pub fn title(&self) -> String {
        match self {
            SceneKind::Login => "Who's watching?".to_string(),
            SceneKind::Landing => "Home".to_string(),
            SceneKind::Browse(kind) => kind.to_string(),
            SceneKind::Favorites => "Favorites".to_string(),
            SceneKind::ContinueWatching => "Continue Watching".to_string(),
            SceneKind::Search => "Search".to_string(),
            SceneKind::Player => "Now Playing".to_string(),
        }
    }
}

/// What activating an item does
#[derive(Debug, Clone, PartialEq)]
pub enum ItemAction {
    Login(String),
    Open(SceneKind),
    SelectCategory(Category),
    SelectStream(StreamSummary),
    SelectSeason(u32),
    PlayMovie,
    PlayEpisode(Episode),
    PlayChannel(StreamSummary),
    ToggleFavorite,
    SelectHistory(WatchProgressRecord),
    ContinueWatching(WatchProgressRecord),
    ClearProgress(String),
    DeleteProfile,
    EditQuery,
    SearchKind(CatalogKind),
    Resume(ResumeChoice),
}

/// A top-level zone and its items in display order
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub zone: String,
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug)]
pub struct Scene {
    pub kind: SceneKind,
    pub graph: FocusGraph,
    pub router: BackNavigationRouter,
    panels: Vec<Panel>,
    labels: HashMap<String, String>,
    actions: HashMap<String, ItemAction>,

    pub selected_category: Option<Category>,
    pub streams: Vec<StreamSummary>,
    pub visible: usize,
    pub selected_stream: Option<StreamSummary>,
    pub detail: Option<DetailRecord>,
    pub season: Option<u32>,
    pub selected_history: Option<WatchProgressRecord>,
    pub is_favorite: bool,
    pub search_kind: CatalogKind,
    pub loading: LoadingState,
}

impl Scene {
    fn new(kind: SceneKind, levels: Vec<EscapeLevel>) -> Self {
        let mut graph = FocusGraph::new();
        if let Err(e) = graph.register_node(FocusZone::new(ROOT), None) {
            warn!(error = %e, "failed to register scene root");
        }
        Self {
            kind,
            graph,
            router: BackNavigationRouter::new(levels),
            panels: Vec::new(),
            labels: HashMap::new(),
            actions: HashMap::new(),
            selected_category: None,
            streams: Vec::new(),
            visible: PAGE_SIZE,
            selected_stream: None,
            detail: None,
            season: None,
            selected_history: None,
            is_favorite: false,
            search_kind: CatalogKind::Movies,
            loading: LoadingState::Idle,
        }
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    /// Saved profiles to pick from, with a delete action beside the list
    pub fn login(profiles: &[Profile]) -> Self {
        let mut scene = Self::new(
            SceneKind::Login,
            vec![
                EscapeLevel::new("manage", MANAGE),
                EscapeLevel::new("profiles", PROFILES),
            ],
        );
        scene.add_panel(FocusZone::new(PROFILES), "Profiles");
        for (i, p) in profiles.iter().enumerate() {
            scene.add_item(
                PROFILES,
                format!("profile-{}", p.profile_name),
                format!("{} ({})", p.profile_name, p.user_name),
                ItemAction::Login(p.profile_name.clone()),
                column_rect(SIDEBAR_X, 0, i),
            );
        }
        if !profiles.is_empty() {
            scene.add_panel(FocusZone::new(MANAGE), "Manage");
            scene.add_item(
                MANAGE,
                DELETE_PROFILE_KEY.to_string(),
                "✕ Delete profile".to_string(),
                ItemAction::DeleteProfile,
                column_rect(MANAGE_X, 0, 0),
            );
        }
        scene.focus_panel(PROFILES);
        scene
    }

    /// Home tiles
    pub fn landing() -> Self {
        let mut scene = Self::new(SceneKind::Landing, vec![EscapeLevel::new("tiles", TILES)]);
        scene.add_panel(FocusZone::new(TILES), "Home");
        let tiles = [
            ("search", "Search", SceneKind::Search),
            ("movies", "Movies", SceneKind::Browse(CatalogKind::Movies)),
            ("series", "Series", SceneKind::Browse(CatalogKind::Series)),
            ("livetv", "Live TV", SceneKind::Browse(CatalogKind::Live)),
            ("history", "Continue Watching", SceneKind::ContinueWatching),
            ("favorites", "Favorites", SceneKind::Favorites),
        ];
        for (i, (key, label, target)) in tiles.into_iter().enumerate() {
            scene.add_item(
                TILES,
                format!("tile-{}", key),
                label.to_string(),
                ItemAction::Open(target),
                Rect::new(i as i32 * 20, 0, 18, 5),
            );
        }
        scene.focus_panel(TILES);
        scene
    }

    /// Category sidebar, stream grid and detail pane
    pub fn browse(kind: CatalogKind) -> Self {
        let mut scene = Self::new(SceneKind::Browse(kind), three_pane_levels(SIDEBAR, "sidebar"));
        scene.add_panel(FocusZone::new(SIDEBAR), "Categories");
        scene.add_panel(FocusZone::new(GRID), &kind.to_string());
        scene.add_panel(FocusZone::new(DETAIL), "Details");
        scene
    }

    pub fn favorites(movies: &[FavoriteMovie], series: &[FavoriteSeries]) -> Self {
        let mut scene = Self::new(
            SceneKind::Favorites,
            vec![
                EscapeLevel::new("detail", DETAIL),
                EscapeLevel::new("grid", GRID),
            ],
        );
        scene.add_panel(FocusZone::new(GRID), "Favorites");
        scene.add_panel(FocusZone::new(DETAIL), "Details");
        scene.fill_favorites(movies, series);
        scene
    }

    /// Rebuild the favorites grid from the stored lists
    pub fn fill_favorites(&mut self, movies: &[FavoriteMovie], series: &[FavoriteSeries]) {
        let streams: Vec<StreamSummary> = movies
            .iter()
            .map(|m| StreamSummary {
                id: m.content_id.clone(),
                kind: CatalogKind::Movies,
                name: m.name.clone(),
                icon: m.icon.clone(),
                category_id: None,
                container_extension: m.container_format.clone(),
                rating: None,
            })
            .chain(series.iter().map(|s| StreamSummary {
                id: s.series_id.clone(),
                kind: CatalogKind::Series,
                name: s.name.clone(),
                icon: s.cover.clone(),
                category_id: None,
                container_extension: None,
                rating: None,
            }))
            .collect();
        self.set_streams(streams);
        self.focus_key(GRID);
    }

    /// History grid with a Play / Clear Progress pane for the selected record
    pub fn continue_watching(records: &[WatchProgressRecord]) -> Self {
        let mut scene = Self::new(
            SceneKind::ContinueWatching,
            vec![
                EscapeLevel::new("detail", DETAIL),
                EscapeLevel::new("grid", GRID),
            ],
        );
        scene.add_panel(FocusZone::new(GRID), "Continue Watching");
        scene.add_panel(FocusZone::new(DETAIL), "Details");
        scene.fill_history(records);
        scene
    }

    /// Rebuild the history grid, keeping focus on the same record if present
    ///
    /// The detail pane follows the selected record: refreshed when it is
    /// still saved, cleared when it is gone.
    pub fn fill_history(&mut self, records: &[WatchProgressRecord]) {
        let previous = self.graph.focused().map(str::to_string);
        self.clear_panel(GRID);
        for (i, record) in records.iter().enumerate() {
            self.add_item(
                GRID,
                history_key(record),
                record.to_string(),
                ItemAction::SelectHistory(record.clone()),
                grid_rect(0, i),
            );
        }

        let selected = self.selected_history.as_ref().and_then(|current| {
            records
                .iter()
                .find(|r| r.content_id == current.content_id)
                .cloned()
        });
        match selected {
            Some(record) => {
                self.selected_history = Some(record);
                self.rebuild_history_detail();
            }
            None => {
                self.selected_history = None;
                self.clear_panel(DETAIL);
            }
        }

        // An empty grid takes focus on its zone
        match previous.filter(|k| self.graph.contains(k) && k != ROOT) {
            Some(key) => self.focus_key(&key),
            None => self.focus_key(GRID),
        }
    }

    /// Show Play / Clear Progress for `record` and focus Play
    pub fn select_history(&mut self, record: WatchProgressRecord) {
        self.selected_history = Some(record);
        self.rebuild_history_detail();
        self.focus_panel(DETAIL);
    }

    fn rebuild_history_detail(&mut self) {
        self.clear_panel(DETAIL);
        let Some(record) = self.selected_history.clone() else {
            return;
        };
        self.add_item(
            DETAIL,
            PLAY_KEY.into(),
            "▶ Play / Continue".into(),
            ItemAction::ContinueWatching(record.clone()),
            column_rect(DETAIL_X, 0, 0),
        );
        self.add_item(
            DETAIL,
            CLEAR_PROGRESS_KEY.into(),
            "✕ Clear Progress".into(),
            ItemAction::ClearProgress(record.content_id),
            column_rect(DETAIL_X, 0, 1),
        );
    }

    pub fn search() -> Self {
        let mut scene = Self::new(SceneKind::Search, three_pane_levels(SEARCH_BAR, "search"));
        scene.add_panel(FocusZone::new(SEARCH_BAR), "Search");
        scene.add_panel(FocusZone::new(GRID), "Results");
        scene.add_panel(FocusZone::new(DETAIL), "Details");
        scene.add_item(
            SEARCH_BAR,
            SEARCH_INPUT_KEY.to_string(),
            "Type to search".to_string(),
            ItemAction::EditQuery,
            Rect::new(0, 0, 40, 1),
        );
        for (i, kind) in [CatalogKind::Movies, CatalogKind::Series, CatalogKind::Live]
            .into_iter()
            .enumerate()
        {
            scene.add_item(
                SEARCH_BAR,
                search_kind_key(kind),
                kind.to_string(),
                ItemAction::SearchKind(kind),
                Rect::new(50 + i as i32 * 16, 0, 14, 1),
            );
        }
        scene.focus_panel(SEARCH_BAR);
        scene
    }

    pub fn player() -> Self {
        Self::new(SceneKind::Player, Vec::new())
    }

    // -------------------------------------------------------------------------
    // Content
    // -------------------------------------------------------------------------

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.clear_panel(SIDEBAR);
        for (i, cat) in categories.into_iter().enumerate() {
            self.add_item(
                SIDEBAR,
                format!("cat-{}", cat.id),
                cat.name.clone(),
                ItemAction::SelectCategory(cat),
                column_rect(SIDEBAR_X, 0, i),
            );
        }
        if !self.graph.focus_within(ROOT) || self.graph.focused() == Some(ROOT) {
            self.focus_panel(SIDEBAR);
        }
    }

    /// Replace the grid contents and reset paging
    pub fn set_streams(&mut self, streams: Vec<StreamSummary>) {
        self.streams = streams;
        self.visible = PAGE_SIZE.min(self.streams.len());
        self.clear_panel(GRID);
        self.register_grid_items(0..self.visible);
    }

    /// Show the next page if `key` is near the end of the visible grid
    pub fn maybe_extend_page(&mut self, key: &str) -> bool {
        let Some(index) = self.panel(GRID).and_then(|p| p.items.iter().position(|k| k == key)) else {
            return false;
        };
        if index + PAGE_THRESHOLD < self.visible || self.visible >= self.streams.len() {
            return false;
        }
        let start = self.visible;
        self.visible = (self.visible + PAGE_SIZE).min(self.streams.len());
        self.register_grid_items(start..self.visible);
        true
    }

    fn register_grid_items(&mut self, range: std::ops::Range<usize>) {
        let top = if self.kind == SceneKind::Search { 4 } else { 0 };
        for i in range {
            let Some(stream) = self.streams.get(i).cloned() else {
                continue;
            };
            let action = match stream.kind {
                CatalogKind::Live if self.kind == SceneKind::Search => ItemAction::PlayChannel(stream.clone()),
                _ => ItemAction::SelectStream(stream.clone()),
            };
            self.add_item(
                GRID,
                stream_key(&stream),
                stream.to_string(),
                action,
                grid_rect(top, i),
            );
        }
    }

    /// Show a loading placeholder for `stream` in the detail pane
    pub fn select_stream(&mut self, stream: StreamSummary) {
        self.selected_stream = Some(stream);
        self.detail = None;
        self.season = None;
        self.clear_panel(DETAIL);
    }

    pub fn clear_detail(&mut self) {
        self.selected_stream = None;
        self.detail = None;
        self.season = None;
        self.selected_history = None;
        self.clear_panel(DETAIL);
    }

    /// Fill the detail pane;`Some(detail)` for movies and series, `None` for live
    pub fn set_detail(&mut self, detail: Option<DetailRecord>, is_favorite: bool) {
        self.season = match &detail {
            Some(DetailRecord::Series(s)) => s.season_numbers().first().copied(),
            _ => None,
        };
        self.detail = detail;
        self.is_favorite = is_favorite;
        self.rebuild_detail();
        self.focus_panel(DETAIL);
    }

    pub fn select_season(&mut self, season: u32) {
        self.season = Some(season);
        self.rebuild_detail();
        self.focus_key(&format!("season-{}", season));
    }

    pub fn set_favorite(&mut self, is_favorite: bool) {
        self.is_favorite = is_favorite;
        if let Some(label) = self.labels.get_mut(FAVORITE_KEY) {
            *label = favorite_label(is_favorite).to_string();
        }
    }

    fn rebuild_detail(&mut self) {
        self.clear_panel(DETAIL);
        let mut row = 0;
        let mut next = || {
            let r = column_rect(DETAIL_X, 0, row);
            row += 1;
            r
        };

        let is_live = self
            .selected_stream
            .as_ref()
            .is_some_and(|s| s.kind == CatalogKind::Live);
        if is_live {
            self.add_item(DETAIL, PLAY_KEY.into(), "▶ Watch Live".into(), ItemAction::PlayMovie, next());
            return;
        }

        match self.detail.clone() {
            Some(DetailRecord::Movie(_)) => {
                self.add_item(DETAIL, PLAY_KEY.into(), "▶ Play".into(), ItemAction::PlayMovie, next());
                self.add_item(
                    DETAIL,
                    FAVORITE_KEY.into(),
                    favorite_label(self.is_favorite).into(),
                    ItemAction::ToggleFavorite,
                    next(),
                );
            }
            Some(DetailRecord::Series(series)) => {
                self.add_item(
                    DETAIL,
                    FAVORITE_KEY.into(),
                    favorite_label(self.is_favorite).into(),
                    ItemAction::ToggleFavorite,
                    next(),
                );
                for season in &series.seasons {
                    if series.episodes_of(season.season_number).is_empty() {
                        continue;
                    }
                    let marker = if Some(season.season_number) == self.season { "▸ " } else { "  " };
                    self.add_item(
                        DETAIL,
                        format!("season-{}", season.season_number),
                        format!("{}{}", marker, season.name),
                        ItemAction::SelectSeason(season.season_number),
                        next(),
                    );
                }
                if let Some(season) = self.season {
                    for ep in series.episodes_of(season).to_vec() {
                        self.add_item(
                            DETAIL,
                            format!("episode-{}", ep.id),
                            ep.to_string(),
                            ItemAction::PlayEpisode(ep),
                            next(),
                        );
                    }
                }
            }
            None => {}
        }
    }

    // -------------------------------------------------------------------------
    // Resume prompt
    // -------------------------------------------------------------------------

    /// Register the resume modal and move focus into it
    pub fn open_resume_prompt(&mut self, position_secs: f64) {
        if self.graph.contains(RESUME) {
            self.close_modal();
        }
        self.add_panel(FocusZone::new(RESUME).boundary(), "Resume playback?");
        for (i, choice) in ResumeChoice::ALL.into_iter().enumerate() {
            let label = match choice {
                ResumeChoice::Resume => resume_label(position_secs),
                ResumeChoice::StartOver => "Start from Beginning".to_string(),
                ResumeChoice::Cancel => "Cancel".to_string(),
            };
            self.add_item(
                RESUME,
                choice.key().to_string(),
                label,
                ItemAction::Resume(choice),
                Rect::new(40, 10 + 2 * i as i32, 30, 1),
            );
        }
        if let Err(e) = self.router.present_modal(&mut self.graph, RESUME) {
            warn!(error = %e, "failed to present resume prompt");
        }
    }

    /// Close the topmost modal, restoring focus to its opener
    pub fn close_modal(&mut self) -> Option<BackOutcome> {
        if let Some(zone) = self.router.top_modal().map(str::to_string) {
            self.forget_panel(&zone);
        }
        self.router.close_modal(&mut self.graph)
    }

    /// One back signal: close a modal or escape one level
    pub fn handle_back(&mut self) -> BackOutcome {
        if let Some(outcome) = self.close_modal() {
            return outcome;
        }
        self.router.handle_back(&mut self.graph)
    }

    pub fn is_modal_open(&self) -> bool {
        self.router.is_modal_open()
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Move focus; entering another panel lands on its remembered item
    pub fn move_focus(&mut self, dir: Direction) -> Option<String> {
        let before = self.graph.focused().and_then(|k| self.panel_of(k));
        let memory: Vec<(String, Option<String>)> = self
            .panels
            .iter()
            .map(|p| {
                (
                    p.zone.clone(),
                    self.graph.last_focused_child(&p.zone).map(str::to_string),
                )
            })
            .collect();

        let moved = self.graph.move_focus(dir)?;
        let after = self.panel_of(&moved);
        if after.is_some() && after != before {
            let remembered = memory
                .iter()
                .find(|(zone, _)| Some(zone) == after.as_ref())
                .and_then(|(_, k)| k.clone())
                .filter(|k| *k != moved && self.graph.contains(k));
            if let Some(key) = remembered {
                self.focus_key(&key);
                return Some(key);
            }
        }
        Some(moved)
    }

    pub fn focus_panel(&mut self, zone: &str) {
        if let Err(e) = self.graph.focus_default(zone) {
            warn!(zone, error = %e, "cannot focus panel");
        }
    }

    pub fn focus_key(&mut self, key: &str) {
        if let Err(e) = self.graph.set_focus(key) {
            warn!(key, error = %e, "cannot focus item");
        }
    }

    /// Top-level panel containing `key`
    pub fn panel_of(&self, key: &str) -> Option<String> {
        let mut cursor = key;
        loop {
            let parent = self.graph.parent(cursor)?;
            if parent == ROOT {
                return Some(cursor.to_string());
            }
            cursor = parent;
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, zone: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.zone == zone)
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn action(&self, key: &str) -> Option<&ItemAction> {
        self.actions.get(key)
    }

    pub fn set_label(&mut self, key: &str, label: impl Into<String>) {
        if let Some(l) = self.labels.get_mut(key) {
            *l = label.into();
        }
    }

    // -------------------------------------------------------------------------
    // Registration helpers
    // -------------------------------------------------------------------------

    fn add_panel(&mut self, zone: FocusZone, title: &str) {
        let key = zone.key.clone();
        if let Err(e) = self.graph.register_node(zone, Some(ROOT)) {
            warn!(zone = %key, error = %e, "failed to register panel");
            return;
        }
        self.panels.push(Panel {
            zone: key,
            title: title.to_string(),
            items: Vec::new(),
        });
    }

    fn add_item(&mut self, zone: &str, key: String, label: String, action: ItemAction, bounds: Rect) {
        let item = FocusableItem::new(key.clone()).scroll_into_view().bounds(bounds);
        if let Err(e) = self.graph.register_node(item, Some(zone)) {
            warn!(key = %key, error = %e, "failed to register item");
            return;
        }
        if let Some(panel) = self.panels.iter_mut().find(|p| p.zone == zone) {
            panel.items.push(key.clone());
        }
        self.labels.insert(key.clone(), label);
        self.actions.insert(key, action);
    }

    /// Unregister every item of a panel, keeping the panel zone
    fn clear_panel(&mut self, zone: &str) {
        let Some(panel) = self.panels.iter_mut().find(|p| p.zone == zone) else {
            return;
        };
        let items = std::mem::take(&mut panel.items);
        if let Err(e) = self.graph.unregister_children(zone) {
            warn!(zone, error = %e, "failed to clear panel");
        }
        for key in items {
            self.labels.remove(&key);
            self.actions.remove(&key);
        }
    }

    /// Drop a panel's bookkeeping; the graph side is handled by the caller
    fn forget_panel(&mut self, zone: &str) {
        if let Some(index) = self.panels.iter().position(|p| p.zone == zone) {
            let panel = self.panels.remove(index);
            for key in panel.items {
                self.labels.remove(&key);
                self.actions.remove(&key);
            }
        }
    }
}

fn three_pane_levels(outer_zone: &str, outer_name: &str) -> Vec<EscapeLevel> {
    vec![
        EscapeLevel::new("detail", DETAIL),
        EscapeLevel::new("grid", GRID),
        EscapeLevel::new(outer_name, outer_zone),
    ]
}

fn favorite_label(is_favorite: bool) -> &'static str {
    if is_favorite {
        "★ Remove from Favorites"
    } else {
        "☆ Add to Favorites"
    }
}

/// Focus key of a grid entry
pub fn stream_key(stream: &StreamSummary) -> String {
    match stream.kind {
        CatalogKind::Movies => format!("movie-{}", stream.id),
        CatalogKind::Series => format!("series-{}", stream.id),
        CatalogKind::Live => format!("channel-{}", stream.id),
    }
}

/// Focus key of a Continue Watching entry
pub fn history_key(record: &WatchProgressRecord) -> String {
    format!("history-{}", record.content_id)
}

pub fn search_kind_key(kind: CatalogKind) -> String {
    format!("search-kind-{}", kind.content_kind().path_segment())
}
