//! CLI Command Handlers
//!
//! Each handler takes its CLI args, the shared `Context` and `Output`, and
//! returns an `ExitCode`.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::{normalize_host, ApiError, XtreamClient, MIN_SEARCH_LENGTH};
use crate::cli::{
    CategoriesCmd, Cli, ExitCode, FavoritesCmd, HistoryCmd, InfoCmd, LoginCmd, Output,
    ProfilesCmd, SearchCmd, StreamsCmd,
};
use crate::config::Config;
use crate::models::{AuthResult, CatalogKind, DetailRecord, FavoriteMovie, FavoriteSeries, Profile, WatchProgressRecord};
use crate::storage::{FavoritesStore, FileStore, KeyValueStore, MemoryStore, ProfileStore, WatchProgressStore};

// =============================================================================
// Context
// =============================================================================

/// Config, storage and profile selection shared by every command
pub struct Context {
    pub config: Config,
    config_path: Option<PathBuf>,
    persist_config: bool,
    profile: Option<String>,
    store: Arc<dyn KeyValueStore>,
}

impl Context {
    pub fn new(cli: &Cli, config: Config) -> Self {
        let store = open_store(&config);
        Self {
            config,
            config_path: cli.config.clone(),
            persist_config: true,
            profile: cli.profile.clone(),
            store,
        }
    }

    /// Context over an explicit store, without touching the config file
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            config,
            config_path: None,
            persist_config: false,
            profile: None,
            store,
        }
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    fn profiles(&self) -> ProfileStore {
        ProfileStore::new(self.store.clone())
    }

    fn progress(&self) -> WatchProgressStore {
        WatchProgressStore::with_limit(self.store.clone(), self.config.history_limit)
    }

    fn favorites(&self) -> FavoritesStore {
        FavoritesStore::new(self.store.clone())
    }

    /// The `--profile` flag, else the configured active profile
    pub fn profile_name(&self) -> Option<String> {
        self.profile.clone().or_else(|| self.config.active_profile())
    }

    /// Client for the selected profile
    fn client(&self, output: &Output) -> Result<XtreamClient, ExitCode> {
        let Some(name) = self.profile_name() else {
            return Err(output.error(
                "No profile selected. Use --profile or `couchtv login` first.",
                ExitCode::InvalidArgs,
            ));
        };
        match self.profiles().get(&name) {
            Some(profile) => Ok(XtreamClient::from_profile(&profile)),
            None => Err(output.error(format!("Unknown profile: {}", name), ExitCode::InvalidArgs)),
        }
    }

    fn save_config(&self) -> anyhow::Result<()> {
        if !self.persist_config {
            return Ok(());
        }
        match &self.config_path {
            Some(path) => self.config.save_to(path),
            None => self.config.save(),
        }
    }
}

/// File store in the data directory, or memory when it cannot be created
pub fn open_store(config: &Config) -> Arc<dyn KeyValueStore> {
    match FileStore::open(config.data_dir()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "data directory unavailable, nothing will be saved");
            Arc::new(MemoryStore::new())
        }
    }
}

fn api_error(output: &Output, context: &str, e: &ApiError) -> ExitCode {
    output.error(format!("{}: {}", context, e), ExitCode::from(e))
}

fn print_or_fail<T: Serialize>(output: &Output, data: &T, text: impl FnOnce() -> String) -> ExitCode {
    match output.print(data, text) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Login / Profiles
// =============================================================================

/// Profile as shown to the user (password omitted)
#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub url: String,
    pub username: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub profile: ProfileSummary,
    /// `None` when saved with `--no-verify`
    pub account: Option<AuthResult>,
}

pub async fn login_cmd(cmd: LoginCmd, ctx: &mut Context, output: &Output) -> ExitCode {
    if cmd.name.trim().is_empty() {
        return output.error("Profile name must not be empty", ExitCode::InvalidArgs);
    }
    let profile = Profile {
        profile_name: cmd.name.trim().to_string(),
        user_name: cmd.username,
        password: cmd.password,
        url: normalize_host(&cmd.url),
    };

    let account = if cmd.no_verify {
        None
    } else {
        output.info(format!("Verifying login at {}...", profile.url));
        match XtreamClient::from_profile(&profile).login().await {
            Ok(account) => Some(account),
            Err(e) => return api_error(output, "Login failed", &e),
        }
    };

    ctx.profiles().save(profile.clone());
    if ctx.config.active_profile.is_none() {
        ctx.config.active_profile = Some(profile.profile_name.clone());
        if let Err(e) = ctx.save_config() {
            warn!(error = %e, "could not save config");
        }
    }
    debug!(profile = %profile.profile_name, "profile saved");

    let result = LoginResult {
        profile: ProfileSummary {
            active: ctx.profile_name().as_deref() == Some(profile.profile_name.as_str()),
            name: profile.profile_name,
            url: profile.url,
            username: profile.user_name,
        },
        account,
    };
    print_or_fail(output, &result, || match &result.account {
        Some(a) => format!(
            "Saved profile '{}' ({}, status {})",
            result.profile.name, a.username, a.status
        ),
        None => format!("Saved profile '{}' (not verified)", result.profile.name),
    })
}

pub async fn profiles_cmd(cmd: ProfilesCmd, ctx: &Context, output: &Output) -> ExitCode {
    let store = ctx.profiles();
    if let Some(name) = cmd.delete {
        if !store.delete(&name) {
            return output.error(format!("Unknown profile: {}", name), ExitCode::InvalidArgs);
        }
        output.info(format!("Deleted profile '{}'", name));
    }

    let active = ctx.profile_name();
    let profiles: Vec<ProfileSummary> = store
        .all()
        .into_iter()
        .map(|p| ProfileSummary {
            active: active.as_deref() == Some(p.profile_name.as_str()),
            name: p.profile_name,
            url: p.url,
            username: p.user_name,
        })
        .collect();

    print_or_fail(output, &profiles, || {
        if profiles.is_empty() {
            return "No saved profiles".to_string();
        }
        profiles
            .iter()
            .map(|p| {
                let mark = if p.active { "*" } else { " " };
                format!("{} {:<16} {}@{}", mark, p.name, p.username, p.url)
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

// =============================================================================
// Catalog
// =============================================================================

pub async fn categories_cmd(cmd: CategoriesCmd, ctx: &Context, output: &Output) -> ExitCode {
    let client = match ctx.client(output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let kind = CatalogKind::from(cmd.kind);
    output.info(format!("Fetching {} categories...", kind));

    match client.list_categories(kind).await {
        Ok(categories) => print_or_fail(output, &categories, || {
            categories
                .iter()
                .map(|c| format!("{:>8}  {}", c.id, c.name))
                .collect::<Vec<_>>()
                .join("\n")
        }),
        Err(e) => api_error(output, "Categories failed", &e),
    }
}

pub async fn streams_cmd(cmd: StreamsCmd, ctx: &Context, output: &Output) -> ExitCode {
    let client = match ctx.client(output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let kind = CatalogKind::from(cmd.kind);

    match client.list_streams(kind, cmd.category.as_deref()).await {
        Ok(mut streams) => {
            streams.truncate(cmd.limit);
            print_or_fail(output, &streams, || {
                streams
                    .iter()
                    .map(|s| format!("{:>8}  {}", s.id, s))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Err(e) => api_error(output, "Streams failed", &e),
    }
}

pub async fn info_cmd(cmd: InfoCmd, ctx: &Context, output: &Output) -> ExitCode {
    let kind = CatalogKind::from(cmd.kind);
    if kind == CatalogKind::Live {
        return output.error("Live channels have no detail", ExitCode::InvalidArgs);
    }
    let client = match ctx.client(output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match client.get_detail(kind, &cmd.id).await {
        Ok(detail) => print_or_fail(output, &detail, || describe(&detail)),
        Err(e) => api_error(output, "Info failed", &e),
    }
}

fn describe(detail: &DetailRecord) -> String {
    let mut lines = vec![detail.name().to_string()];
    match detail {
        DetailRecord::Movie(m) => {
            let mut meta = Vec::new();
            if let Some(year) = &m.release_date {
                meta.push(year.clone());
            }
            if let Some(genre) = &m.genre {
                meta.push(genre.clone());
            }
            if let Some(secs) = m.duration_secs {
                meta.push(format!("{} min", secs / 60));
            }
            if !meta.is_empty() {
                lines.push(meta.join(" · "));
            }
        }
        DetailRecord::Series(s) => {
            for season in s.season_numbers() {
                lines.push(format!("  Season {}: {} episodes", season, s.episodes_of(season).len()));
            }
        }
    }
    if let Some(plot) = detail.plot() {
        lines.push(String::new());
        lines.push(plot.to_string());
    }
    lines.join("\n")
}

pub async fn search_cmd(cmd: SearchCmd, ctx: &Context, output: &Output) -> ExitCode {
    if cmd.query.trim().chars().count() < MIN_SEARCH_LENGTH {
        return output.error(
            format!("Search needs at least {} characters", MIN_SEARCH_LENGTH),
            ExitCode::InvalidArgs,
        );
    }
    let client = match ctx.client(output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let kind = CatalogKind::from(cmd.kind);
    output.info(format!("Searching {} for: {}", kind, cmd.query));

    match client.search(kind, &cmd.query).await {
        Ok(mut results) => {
            results.truncate(cmd.limit);
            print_or_fail(output, &results, || {
                if results.is_empty() {
                    return "No results".to_string();
                }
                results
                    .iter()
                    .map(|s| format!("{:>8}  {}", s.id, s))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Err(e) => api_error(output, "Search failed", &e),
    }
}

// =============================================================================
// Library
// =============================================================================

pub async fn history_cmd(cmd: HistoryCmd, ctx: &Context, output: &Output) -> ExitCode {
    let progress = ctx.progress();
    if cmd.clear {
        progress.clear();
        output.info("History cleared");
    } else if let Some(id) = cmd.remove {
        if !progress.remove(&id) {
            return output.error(format!("No history entry for {}", id), ExitCode::InvalidArgs);
        }
        output.info(format!("Removed {}", id));
    }

    let records: Vec<WatchProgressRecord> = progress.list();
    print_or_fail(output, &records, || {
        if records.is_empty() {
            return "Nothing to continue".to_string();
        }
        records
            .iter()
            .map(|r| format!("{:>8}  {}", r.content_id, r))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

#[derive(Debug, Serialize)]
pub struct FavoritesList {
    pub movies: Vec<FavoriteMovie>,
    pub series: Vec<FavoriteSeries>,
}

pub async fn favorites_cmd(_cmd: FavoritesCmd, ctx: &Context, output: &Output) -> ExitCode {
    let favorites = ctx.favorites();
    let list = FavoritesList {
        movies: favorites.movies(),
        series: favorites.series(),
    };
    print_or_fail(output, &list, || {
        let mut lines = vec![format!("Movies ({})", list.movies.len())];
        lines.extend(list.movies.iter().map(|m| format!("  {:>8}  {}", m.content_id, m.name)));
        lines.push(format!("Series ({})", list.series.len()));
        lines.extend(list.series.iter().map(|s| format!("  {:>8}  {}", s.series_id, s.name)));
        lines.join("\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentKind, WatchProgressRecord};

    fn quiet() -> Output {
        Output { json: true, quiet: true }
    }

    fn context() -> Context {
        Context::with_store(Config::default(), Arc::new(MemoryStore::new()))
    }

    fn record(id: &str) -> WatchProgressRecord {
        WatchProgressRecord {
            content_id: id.to_string(),
            display_name: format!("Title {}", id),
            thumbnail_url: None,
            container_format: None,
            last_position_secs: 600.0,
            duration_secs: 3600.0,
            saved_at: 0,
            content_kind: ContentKind::Movie,
            series_id: None,
            season_number: None,
            episode_number: None,
        }
    }

    #[tokio::test]
    async fn test_catalog_command_without_profile_is_invalid_args() {
        let ctx = context();
        let code = categories_cmd(
            CategoriesCmd { kind: crate::cli::KindArg::Movies },
            &ctx,
            &quiet(),
        )
        .await;
        assert_eq!(code, ExitCode::InvalidArgs);
    }

    #[tokio::test]
    async fn test_short_search_rejected_before_network() {
        let ctx = context();
        let code = search_cmd(
            SearchCmd {
                kind: crate::cli::KindArg::Movies,
                query: "ab".to_string(),
                limit: 5,
            },
            &ctx,
            &quiet(),
        )
        .await;
        assert_eq!(code, ExitCode::InvalidArgs);
    }

    #[tokio::test]
    async fn test_login_without_verify_saves_profile() {
        let mut ctx = context();
        let code = login_cmd(
            LoginCmd {
                name: "home".to_string(),
                url: "tv.example".to_string(),
                username: "alice".to_string(),
                password: "secret".to_string(),
                no_verify: true,
            },
            &mut ctx,
            &quiet(),
        )
        .await;
        assert_eq!(code, ExitCode::Success);
        let saved = ctx.profiles().get("home").expect("profile saved");
        assert_eq!(saved.url, "http://tv.example");
        assert_eq!(ctx.profile_name().as_deref(), Some("home"));
    }

    #[tokio::test]
    async fn test_history_remove() {
        let ctx = context();
        ctx.progress().save(record("7"));

        let missing = history_cmd(
            HistoryCmd { remove: Some("8".into()), clear: false },
            &ctx,
            &quiet(),
        )
        .await;
        assert_eq!(missing, ExitCode::InvalidArgs);

        let removed = history_cmd(
            HistoryCmd { remove: Some("7".into()), clear: false },
            &ctx,
            &quiet(),
        )
        .await;
        assert_eq!(removed, ExitCode::Success);
        assert!(ctx.progress().list().is_empty());
    }

    #[test]
    fn test_describe_series_lists_seasons() {
        use crate::models::{Episode, SeriesDetail};
        use std::collections::BTreeMap;

        let episode = Episode {
            id: "1".into(),
            episode_num: 1,
            title: "Pilot".into(),
            container_extension: None,
            plot: None,
            duration_secs: None,
            image: None,
        };
        let mut episodes = BTreeMap::new();
        episodes.insert(1, vec![episode.clone(), episode]);
        let detail = DetailRecord::Series(SeriesDetail {
            id: "9".into(),
            name: "Show".into(),
            plot: Some("Things happen".into()),
            genre: None,
            cast: None,
            release_date: None,
            cover: None,
            seasons: Vec::new(),
            episodes,
        });
        let text = describe(&detail);
        assert!(text.contains("Season 1: 2 episodes"));
        assert!(text.ends_with("Things happen"));
    }
}
