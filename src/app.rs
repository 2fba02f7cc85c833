//! App state and core application logic
//!
//! Owns the scene stack and routes logical input signals into the current
//! scene's focus graph. Catalog calls are not made here: the app queues
//! `Fetch`es that the host runs, and hands the responses back through
//! `apply_response`. Playback runs through a `PlaybackSessionController`
//! driven by `tick`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::api::{
    stream_url, CatalogPayload, CatalogRequest, CatalogResponse, RequestTicket, RequestTracker,
    MIN_SEARCH_LENGTH,
};
use crate::back::BackOutcome;
use crate::config::Config;
use crate::focus::FocusEvent;
use crate::input::InputSignal;
use crate::models::*;
use crate::playback::resume::{self, format_position};
use crate::playback::{
    Clock, PlaybackEngine, PlaybackRequest, PlaybackSessionController, ResumeAction,
    ResumeChoice, ResumeDecision, SessionConfig, SessionEvent, TeardownOutcome, TeardownReason,
};
use crate::scene::{self, ItemAction, Scene, SceneKind};
use crate::storage::{FavoritesStore, KeyValueStore, ProfileStore, WatchProgressStore};

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Search Query
// =============================================================================

/// Search box contents
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    /// Cursor position in query (chars)
    pub cursor: usize,
}

impl SearchState {
    fn byte_index(&self) -> usize {
        self.query
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.query.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.query.remove(at);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index();
            self.query.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }
}

// =============================================================================
// Host Interface
// =============================================================================

/// A catalog call for the host to run
#[derive(Debug, Clone, PartialEq)]
pub struct Fetch {
    pub ticket: RequestTicket,
    pub request: CatalogRequest,
}

/// Builds a fresh engine for each playback session
pub type EngineFactory = Box<dyn Fn() -> Box<dyn PlaybackEngine>>;

// =============================================================================
// Main Application State
// =============================================================================

pub struct App {
    /// Whether the app is running
    pub running: bool,
    pub input_mode: InputMode,
    /// Error shown until the next key press
    pub error: Option<String>,
    /// Transient status line
    pub status: Option<String>,
    pub search: SearchState,

    /// Scene on screen
    pub scene: Scene,
    /// Scenes underneath, restored on exit
    scene_stack: Vec<Scene>,

    pub profile: Option<Profile>,
    pub account: Option<AuthResult>,

    player: Option<PlaybackSessionController>,
    /// Request waiting on the resume prompt, with the saved position
    pending_play: Option<(PlaybackRequest, f64)>,

    tracker: RequestTracker,
    fetches: Vec<Fetch>,

    progress: WatchProgressStore,
    favorites: FavoritesStore,
    profiles: ProfileStore,

    engine_factory: EngineFactory,
    clock: Arc<dyn Clock>,
    session_config: SessionConfig,
    scrub_step: f64,
}

impl App {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        config: &Config,
        engine_factory: EngineFactory,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let profiles = ProfileStore::new(store.clone());
        let scene = Scene::login(&profiles.all());
        Self {
            running: true,
            input_mode: InputMode::Normal,
            error: None,
            status: None,
            search: SearchState::default(),
            scene,
            scene_stack: Vec::new(),
            profile: None,
            account: None,
            player: None,
            pending_play: None,
            tracker: RequestTracker::new(),
            fetches: Vec::new(),
            progress: WatchProgressStore::with_limit(store.clone(), config.history_limit),
            favorites: FavoritesStore::new(store),
            profiles,
            engine_factory,
            clock,
            session_config: config.session(),
            scrub_step: config.scrub_step_secs,
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        if self.player.is_some() {
            self.stop_playback(TeardownReason::UserExit);
        }
        self.tracker.cancel_all();
        self.running = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Scenes below the current one, bottom first
    pub fn scene_stack(&self) -> &[Scene] {
        &self.scene_stack
    }

    pub fn player(&self) -> Option<&PlaybackSessionController> {
        self.player.as_ref()
    }

    /// Seconds moved per seek input in the player
    pub fn scrub_step(&self) -> f64 {
        self.scrub_step
    }

    pub fn progress(&self) -> &WatchProgressStore {
        &self.progress
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    /// Catalog calls queued since the last call
    pub fn take_fetches(&mut self) -> Vec<Fetch> {
        std::mem::take(&mut self.fetches)
    }

    /// Whether the host should still deliver the response for `ticket`
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.tracker.is_current(ticket)
    }

    /// Remember the task serving `ticket` so a newer request can abort it
    pub fn attach_task(&mut self, ticket: &RequestTicket, handle: tokio::task::AbortHandle) {
        self.tracker.attach(ticket, handle);
    }

    fn fetch(&mut self, scope: &str, selection: impl Into<String>, request: CatalogRequest) {
        let ticket = self.tracker.begin(scope, selection);
        debug!(scope, selection = %ticket.selection, "queued catalog request");
        self.fetches.push(Fetch { ticket, request });
    }

    // -------------------------------------------------------------------------
    // Scenes
    // -------------------------------------------------------------------------

    fn push_scene(&mut self, next: Scene) {
        self.tracker.cancel_all();
        self.input_mode = InputMode::Normal;
        self.scene.loading = LoadingState::Idle;
        let previous = std::mem::replace(&mut self.scene, next);
        debug!(from = ?previous.kind, to = ?self.scene.kind, "entered scene");
        self.scene_stack.push(previous);
    }

    /// Leave the current scene; leaving the bottom scene quits
    fn leave_scene(&mut self) {
        self.tracker.cancel_all();
        self.input_mode = InputMode::Normal;
        let Some(previous) = self.scene_stack.pop() else {
            info!("left last scene, quitting");
            self.running = false;
            return;
        };
        debug!(from = ?self.scene.kind, to = ?previous.kind, "left scene");
        self.scene = previous;

        match self.scene.kind {
            SceneKind::Login => {
                info!("signed out");
                self.account = None;
                self.profile = None;
            }
            SceneKind::ContinueWatching => {
                let records = self.progress.list();
                self.scene.fill_history(&records);
            }
            _ => {}
        }
    }

    fn open_scene(&mut self, kind: SceneKind) {
        let next = match kind {
            SceneKind::Browse(catalog) => {
                let mut scene = Scene::browse(catalog);
                scene.loading = LoadingState::Loading(Some(format!("Loading {}...", catalog)));
                scene
            }
            SceneKind::Search => {
                self.search.clear();
                Scene::search()
            }
            SceneKind::Favorites => Scene::favorites(&self.favorites.movies(), &self.favorites.series()),
            SceneKind::ContinueWatching => Scene::continue_watching(&self.progress.list()),
            SceneKind::Login | SceneKind::Landing | SceneKind::Player => {
                warn!(?kind, "scene cannot be opened directly");
                return;
            }
        };
        self.push_scene(next);
        if let SceneKind::Browse(catalog) = kind {
            self.fetch("categories", catalog.to_string(), CatalogRequest::Categories(catalog));
        }
    }

    /// Sign in with a saved profile
    pub fn login(&mut self, name: &str) -> bool {
        let Some(profile) = self.profiles.get(name) else {
            self.set_error(format!("Unknown profile: {}", name));
            return false;
        };
        info!(profile = %profile.profile_name, "signing in");
        self.scene.loading = LoadingState::Loading(Some(format!("Signing in as {}...", profile.user_name)));
        self.fetch("login", profile.profile_name.clone(), CatalogRequest::Login(profile.clone()));
        self.profile = Some(profile);
        true
    }

    // -------------------------------------------------------------------------
    // Responses
    // -------------------------------------------------------------------------

    /// Apply a finished catalog call; stale responses are ignored
    pub fn apply_response(&mut self, response: CatalogResponse) {
        if !self.tracker.complete(&response.ticket) {
            return;
        }
        self.scene.loading = LoadingState::Idle;

        match response.payload {
            CatalogPayload::Auth(Ok(account)) => {
                info!(user = %account.username, status = %account.status, "signed in");
                self.account = Some(account);
                self.push_scene(Scene::landing());
            }
            CatalogPayload::Categories(Ok(categories)) => {
                debug!(count = categories.len(), "categories loaded");
                self.scene.set_categories(categories);
            }
            CatalogPayload::Streams(Ok(streams)) => {
                debug!(count = streams.len(), "streams loaded");
                if streams.is_empty() && self.scene.kind == SceneKind::Search {
                    self.status = Some("No results".to_string());
                }
                self.scene.set_streams(streams);
            }
            CatalogPayload::Detail(Ok(detail)) => {
                let is_favorite = match &detail {
                    DetailRecord::Movie(m) => self.favorites.is_favorite_movie(&m.id),
                    DetailRecord::Series(s) => self.favorites.is_favorite_series(&s.id),
                };
                self.scene.set_detail(Some(detail), is_favorite);
            }
            CatalogPayload::Auth(Err(e))
            | CatalogPayload::Categories(Err(e))
            | CatalogPayload::Streams(Err(e))
            | CatalogPayload::Detail(Err(e)) => {
                warn!(scope = %response.ticket.scope, error = %e, "catalog request failed");
                if response.ticket.scope == "login" {
                    self.profile = None;
                }
                self.scene.loading = LoadingState::Error(e.to_string());
                self.set_error(e.to_string());
            }
        }
        self.process_focus_events();
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Clear error on any keypress
        self.error = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        if self.input_mode == InputMode::Editing {
            return self.handle_editing_key(key);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                true
            }
            KeyCode::Char('/') if self.scene.kind == SceneKind::Search => {
                self.scene.focus_key(scene::SEARCH_INPUT_KEY);
                self.input_mode = InputMode::Editing;
                true
            }
            _ => match InputSignal::from_key(&key) {
                Some(signal) => self.handle_signal(signal),
                None => false,
            },
        }
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.submit_search();
            }
            KeyCode::Char(c) => self.search.insert(c),
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Delete => self.search.delete(),
            KeyCode::Left => self.search.cursor_left(),
            KeyCode::Right => self.search.cursor_right(),
            KeyCode::Home => self.search.cursor_home(),
            KeyCode::End => self.search.cursor_end(),
            _ => return false,
        }
        let label = if self.search.query.is_empty() {
            "Type to search".to_string()
        } else {
            self.search.query.clone()
        };
        self.scene.set_label(scene::SEARCH_INPUT_KEY, label);
        true
    }

    /// Route one logical signal to the player or the scene's focus graph
    pub fn handle_signal(&mut self, signal: InputSignal) -> bool {
        if self.player.is_some() {
            return self.handle_player_signal(signal);
        }

        let consumed = match signal {
            InputSignal::Enter => self.scene.graph.activate().is_some(),
            InputSignal::Back => {
                match self.scene.handle_back() {
                    BackOutcome::ModalClosed { .. } => {
                        self.pending_play = None;
                    }
                    BackOutcome::Escaped { .. } | BackOutcome::Ignored => {}
                    BackOutcome::Exit => self.leave_scene(),
                }
                true
            }
            _ => match signal.direction() {
                Some(dir) => self.scene.move_focus(dir).is_some(),
                None => false,
            },
        };
        self.process_focus_events();
        consumed
    }

    fn process_focus_events(&mut self) {
        loop {
            let events = self.scene.graph.drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                match event {
                    FocusEvent::Activate(key) => {
                        if let Some(action) = self.scene.action(&key).cloned() {
                            self.run_action(action);
                        }
                    }
                    FocusEvent::Focus(key) => {
                        if self.scene.panel_of(&key).as_deref() == Some(scene::GRID) {
                            self.scene.maybe_extend_page(&key);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Item actions
    // -------------------------------------------------------------------------

    fn run_action(&mut self, action: ItemAction) {
        debug!(?action, "activated");
        match action {
            ItemAction::Login(name) => {
                self.login(&name);
            }
            ItemAction::Open(kind) => self.open_scene(kind),
            ItemAction::SelectCategory(category) => self.select_category(category),
            ItemAction::SelectStream(stream) => self.select_stream(stream),
            ItemAction::SelectSeason(season) => self.scene.select_season(season),
            ItemAction::PlayMovie => self.play_selected(),
            ItemAction::PlayEpisode(episode) => self.play_episode(episode),
            ItemAction::PlayChannel(stream) => self.play_channel(&stream),
            ItemAction::ToggleFavorite => self.toggle_favorite(),
            ItemAction::SelectHistory(record) => self.scene.select_history(record),
            ItemAction::ContinueWatching(record) => self.continue_watching(record),
            ItemAction::ClearProgress(content_id) => self.clear_progress(&content_id),
            ItemAction::DeleteProfile => self.delete_profile(),
            ItemAction::EditQuery => self.input_mode = InputMode::Editing,
            ItemAction::SearchKind(kind) => {
                self.scene.search_kind = kind;
                self.submit_search();
            }
            ItemAction::Resume(choice) => self.choose_resume(choice),
        }
    }

    fn select_category(&mut self, category: Category) {
        let SceneKind::Browse(kind) = self.scene.kind else {
            return;
        };
        self.scene.clear_detail();
        self.scene.set_streams(Vec::new());
        self.scene.loading = LoadingState::Loading(Some(format!("Loading {}...", category.name)));
        self.fetch(
            "streams",
            category.id.clone(),
            CatalogRequest::Streams {
                kind,
                category: Some(category.id.clone()),
            },
        );
        self.scene.selected_category = Some(category);
    }

    fn select_stream(&mut self, stream: StreamSummary) {
        self.scene.select_stream(stream.clone());
        if stream.kind == CatalogKind::Live {
            self.scene.set_detail(None, false);
            return;
        }
        self.scene.loading = LoadingState::Loading(Some(format!("Loading {}...", stream.name)));
        self.fetch(
            "detail",
            stream.id.clone(),
            CatalogRequest::Detail {
                kind: stream.kind,
                id: stream.id,
            },
        );
    }

    fn submit_search(&mut self) {
        let query = self.search.query.trim().to_string();
        self.scene.clear_detail();
        if query.chars().count() < MIN_SEARCH_LENGTH {
            self.scene.set_streams(Vec::new());
            self.status = Some(format!("Type at least {} characters", MIN_SEARCH_LENGTH));
            return;
        }
        let kind = self.scene.search_kind;
        self.status = None;
        self.scene.loading = LoadingState::Loading(Some(format!("Searching {}...", kind)));
        self.fetch("search", query.clone(), CatalogRequest::Search { kind, query });
    }

    fn toggle_favorite(&mut self) {
        let Some(detail) = self.scene.detail.clone() else {
            return;
        };
        let now = match detail {
            DetailRecord::Movie(m) => self.favorites.toggle_movie(FavoriteMovie {
                content_id: m.id,
                name: m.name,
                icon: m.poster.or_else(|| self.scene.selected_stream.as_ref().and_then(|s| s.icon.clone())),
                container_format: m.container_extension,
            }),
            DetailRecord::Series(s) => self.favorites.toggle_series(FavoriteSeries {
                series_id: s.id,
                name: s.name,
                cover: s.cover,
            }),
        };
        self.status = Some(if now { "Added to favorites" } else { "Removed from favorites" }.to_string());
        self.scene.set_favorite(now);

        // The removed title must not linger in the favorites grid
        if !now && self.scene.kind == SceneKind::Favorites {
            self.scene.clear_detail();
            self.scene
                .fill_favorites(&self.favorites.movies(), &self.favorites.series());
        }
    }

    fn clear_progress(&mut self, content_id: &str) {
        if !self.progress.remove(content_id) {
            warn!(content_id, "no saved progress to clear");
        }
        self.scene.clear_detail();
        let records = self.progress.list();
        self.scene.fill_history(&records);
        // The emptied pane kept focus on its zone
        self.scene.focus_key(scene::GRID);
        self.status = Some("Progress cleared".to_string());
    }

    /// Delete the profile last focused in the login list
    fn delete_profile(&mut self) {
        let target = self
            .scene
            .graph
            .last_focused_child(scene::PROFILES)
            .and_then(|key| self.scene.action(key))
            .and_then(|action| match action {
                ItemAction::Login(name) => Some(name.clone()),
                _ => None,
            });
        let Some(name) = target else {
            warn!("no profile selected to delete");
            return;
        };
        if !self.profiles.delete(&name) {
            self.set_error(format!("Could not delete profile '{}'", name));
            return;
        }
        info!(profile = %name, "profile deleted");
        self.scene = Scene::login(&self.profiles.all());
        self.status = Some(format!("Deleted profile '{}'", name));
    }

    // -------------------------------------------------------------------------
    // Play flow
    // -------------------------------------------------------------------------

    fn url_for(&mut self, kind: ContentKind, id: &str, extension: Option<&str>) -> Option<String> {
        match &self.profile {
            Some(p) => Some(stream_url(&p.url, &p.user_name, &p.password, kind, id, extension)),
            None => {
                self.set_error("Not signed in");
                None
            }
        }
    }

    /// Play button in the detail pane
    fn play_selected(&mut self) {
        let stream = self.scene.selected_stream.clone();
        if let Some(channel) = stream.as_ref().filter(|s| s.kind == CatalogKind::Live) {
            self.play_channel(channel);
            return;
        }
        let Some(DetailRecord::Movie(movie)) = self.scene.detail.clone() else {
            return;
        };
        let extension = movie
            .container_extension
            .clone()
            .or_else(|| stream.as_ref().and_then(|s| s.container_extension.clone()));
        let Some(url) = self.url_for(ContentKind::Movie, &movie.id, extension.as_deref()) else {
            return;
        };
        self.request_play(PlaybackRequest {
            content_id: movie.id,
            display_name: movie.name,
            stream_url: url,
            thumbnail_url: movie.poster.or_else(|| stream.and_then(|s| s.icon)),
            container_format: extension,
            content_kind: ContentKind::Movie,
            series_id: None,
            season_number: None,
            episode_number: None,
            start_offset: 0.0,
        });
    }

    fn play_episode(&mut self, episode: Episode) {
        let Some(DetailRecord::Series(series)) = self.scene.detail.clone() else {
            return;
        };
        let Some(url) = self.url_for(
            ContentKind::SeriesEpisode,
            &episode.id,
            episode.container_extension.as_deref(),
        ) else {
            return;
        };
        self.request_play(PlaybackRequest {
            content_id: episode.id,
            display_name: series.name,
            stream_url: url,
            thumbnail_url: episode.image.or(series.cover),
            container_format: episode.container_extension,
            content_kind: ContentKind::SeriesEpisode,
            series_id: Some(series.id),
            season_number: self.scene.season,
            episode_number: Some(episode.episode_num),
            start_offset: 0.0,
        });
    }

    fn play_channel(&mut self, channel: &StreamSummary) {
        let Some(url) = self.url_for(ContentKind::Live, &channel.id, None) else {
            return;
        };
        self.request_play(PlaybackRequest {
            content_id: channel.id.clone(),
            display_name: channel.name.clone(),
            stream_url: url,
            thumbnail_url: channel.icon.clone(),
            container_format: Some(ContentKind::Live.default_extension().to_string()),
            content_kind: ContentKind::Live,
            series_id: None,
            season_number: None,
            episode_number: None,
            start_offset: 0.0,
        });
    }

    fn continue_watching(&mut self, record: WatchProgressRecord) {
        let Some(url) = self.url_for(
            record.content_kind,
            &record.content_id,
            record.container_format.as_deref(),
        ) else {
            return;
        };
        self.request_play(PlaybackRequest {
            content_id: record.content_id,
            display_name: record.display_name,
            stream_url: url,
            thumbnail_url: record.thumbnail_url,
            container_format: record.container_format,
            content_kind: record.content_kind,
            series_id: record.series_id,
            season_number: record.season_number,
            episode_number: record.episode_number,
            start_offset: 0.0,
        });
    }

    /// Start playing, asking first when there is a saved position
    pub fn request_play(&mut self, request: PlaybackRequest) {
        // Live streams have no position to come back to
        if request.content_kind == ContentKind::Live {
            self.start_playback(request);
            return;
        }
        let saved = self.progress.get(&request.content_id);
        match resume::negotiate(saved.as_ref()) {
            ResumeDecision::PlayFromStart => self.start_playback(request),
            ResumeDecision::PromptResume { position_secs } => {
                debug!(content_id = %request.content_id, position = position_secs, "asking to resume");
                self.pending_play = Some((request, position_secs));
                self.scene.open_resume_prompt(position_secs);
            }
        }
    }

    fn choose_resume(&mut self, choice: ResumeChoice) {
        let Some((mut request, position)) = self.pending_play.take() else {
            warn!(?choice, "resume choice without a pending request");
            return;
        };
        self.scene.close_modal();
        match resume::resolve(choice, position) {
            ResumeAction::Play { start_offset } => {
                request.start_offset = start_offset;
                self.start_playback(request);
            }
            ResumeAction::ReturnFocus => debug!("resume prompt cancelled"),
        }
    }

    fn start_playback(&mut self, request: PlaybackRequest) {
        let mut session = PlaybackSessionController::new(
            (self.engine_factory)(),
            self.clock.clone(),
            self.session_config,
        );
        let name = request.display_name.clone();
        match session.start(request) {
            Ok(()) => {
                self.status = Some(format!("Playing {}", name));
                self.player = Some(session);
                self.push_scene(Scene::player());
            }
            Err(e) => {
                error!(error = %e, "failed to start playback");
                self.set_error(e.to_string());
            }
        }
    }

    fn handle_player_signal(&mut self, signal: InputSignal) -> bool {
        let step = self.scrub_step;
        let Some(player) = self.player.as_mut() else {
            return false;
        };
        match signal {
            InputSignal::Left => player.begin_scrub(-step).is_some(),
            InputSignal::Right => player.begin_scrub(step).is_some(),
            InputSignal::Enter => {
                player.toggle_pause();
                true
            }
            InputSignal::Back => {
                self.stop_playback(TeardownReason::UserExit);
                true
            }
            InputSignal::Up | InputSignal::Down => false,
        }
    }

    fn stop_playback(&mut self, reason: TeardownReason) {
        let Some(mut player) = self.player.take() else {
            return;
        };
        match player.teardown(reason, &self.progress) {
            TeardownOutcome::Saved(record) => {
                self.status = Some(format!(
                    "Saved {} at {}",
                    record.display_name,
                    format_position(record.last_position_secs)
                ));
            }
            TeardownOutcome::Removed { .. } => {
                self.status = Some("Finished".to_string());
            }
            TeardownOutcome::Skipped => self.status = None,
        }
        if self.scene.kind == SceneKind::Player {
            self.leave_scene();
        }
    }

    /// Drive timers and engine signals; call on every loop iteration
    pub fn tick(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        for event in player.tick() {
            match event {
                SessionEvent::Ended => {
                    self.stop_playback(TeardownReason::Ended);
                    return;
                }
                SessionEvent::EngineError(detail) => {
                    self.set_error(format!("Playback error: {}", detail));
                    self.stop_playback(TeardownReason::UserExit);
                    return;
                }
                SessionEvent::ScrubCommitted(_) | SessionEvent::ResumeApplied(_) => {}
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
