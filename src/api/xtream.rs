//! Xtream catalog API client
//!
//! Every call is a GET on `{host}/player_api.php` with the account's
//! username and password plus an `action`. Servers are loose about types
//! (ids and numbers arrive as either JSON numbers or strings), so the raw
//! response structs below accept both.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use super::ApiError;
use crate::models::{
    AuthResult, CatalogKind, Category, ContentKind, DetailRecord, Episode, MovieDetail, Profile,
    Season, SeriesDetail, StreamSummary,
};

/// Queries shorter than this return no results
pub const MIN_SEARCH_LENGTH: usize = 3;

/// Trim, default to `http://` and drop one trailing slash
pub fn normalize_host(input: &str) -> String {
    let mut url = input.trim().to_string();
    let has_scheme = ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });
    if !has_scheme {
        url = format!("http://{}", url);
    }
    if url.ends_with('/') {
        url.pop();
    }
    url
}

/// Direct stream URL for a playable item
pub fn stream_url(
    host: &str,
    username: &str,
    password: &str,
    kind: ContentKind,
    id: &str,
    extension: Option<&str>,
) -> String {
    let ext = extension
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| kind.default_extension());
    format!(
        "{}/{}/{}/{}/{}.{}",
        normalize_host(host),
        kind.path_segment(),
        urlencoding::encode(username),
        urlencoding::encode(password),
        id,
        ext
    )
}

/// Xtream API client bound to one account
#[derive(Debug, Clone)]
pub struct XtreamClient {
    base_url: String,
    username: String,
    password: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl XtreamClient {
    /// Create a client; `host` is normalized first
    pub fn new(host: &str, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url: normalize_host(host),
            username: username.into(),
            password: password.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries: 1,
        }
    }

    pub fn from_profile(profile: &Profile) -> Self {
        Self::new(&profile.url, &profile.user_name, &profile.password)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stream URL for `id` using this client's account
    pub fn stream_url(&self, kind: ContentKind, id: &str, extension: Option<&str>) -> String {
        stream_url(&self.base_url, &self.username, &self.password, kind, id, extension)
    }

    fn endpoint(&self, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}/player_api.php?username={}&password={}",
            self.base_url,
            urlencoding::encode(&self.username),
            urlencoding::encode(&self.password)
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// GET with one retry on transport failures and server errors
    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, ApiError> {
        let url = self.endpoint(params);
        let action = params
            .iter()
            .find(|(k, _)| *k == "action")
            .map(|(_, v)| *v)
            .unwrap_or("login");
        let mut attempt = 0;

        loop {
            let result = self
                .client
                .get(&url)
                .header("Accept", "application/json")
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text().await?;
                        return serde_json::from_str(&body).map_err(|e| {
                            ApiError::InvalidResponse(format!("JSON parse error: {}", e))
                        });
                    }
                    if status.as_u16() == 401 || status.as_u16() == 403 {
                        return Err(ApiError::Auth("Authentication Failed".into()));
                    }
                    if status.is_server_error() && attempt < self.max_retries {
                        attempt += 1;
                        warn!(action, status = status.as_u16(), "server error, retrying");
                        continue;
                    }
                    return Err(ApiError::Status(status.as_u16()));
                }
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(action, error = %e, "request failed, retrying");
                    tokio::time::sleep(Duration::from_millis(250)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Verify the account
    pub async fn login(&self) -> Result<AuthResult, ApiError> {
        let response: LoginResponse = self.get(&[]).await?;
        response.into_result()
    }

    pub async fn list_categories(&self, kind: CatalogKind) -> Result<Vec<Category>, ApiError> {
        let raw: Vec<CategoryRaw> = self
            .get(&[("action", kind.categories_action())])
            .await?;
        Ok(raw.into_iter().filter_map(CategoryRaw::into_category).collect())
    }

    /// Streams of one category, or every stream of the kind when `category` is `None`
    pub async fn list_streams(
        &self,
        kind: CatalogKind,
        category: Option<&str>,
    ) -> Result<Vec<StreamSummary>, ApiError> {
        let mut params = vec![("action", kind.streams_action())];
        if let Some(id) = category {
            params.push(("category_id", id));
        }
        let raw: Vec<StreamRaw> = self.get(&params).await?;
        let streams: Vec<_> = raw
            .into_iter()
            .filter_map(|s| s.into_summary(kind))
            .collect();
        debug!(%kind, count = streams.len(), "streams loaded");
        Ok(streams)
    }

    pub async fn get_detail(&self, kind: CatalogKind, id: &str) -> Result<DetailRecord, ApiError> {
        match kind {
            CatalogKind::Movies => {
                let raw: VodInfoResponse = self
                    .get(&[("action", "get_vod_info"), ("vod_id", id)])
                    .await?;
                Ok(DetailRecord::Movie(raw.into_detail(id)?))
            }
            CatalogKind::Series => {
                let raw: SeriesInfoResponse = self
                    .get(&[("action", "get_series_info"), ("series_id", id)])
                    .await?;
                Ok(DetailRecord::Series(raw.into_detail(id)))
            }
            CatalogKind::Live => Err(ApiError::UnsupportedKind(kind)),
        }
    }

    /// Case-insensitive name search over every stream of `kind`
    pub async fn search(&self, kind: CatalogKind, query: &str) -> Result<Vec<StreamSummary>, ApiError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LENGTH {
            return Ok(Vec::new());
        }
        let needle = query.to_lowercase();
        let all = self.list_streams(kind, None).await?;
        Ok(all
            .into_iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect())
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

/// String from a JSON string or number; empty and null become `None`
fn flex_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn flex_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn value_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_u64(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user_info: UserInfoRaw,
    #[serde(default)]
    server_info: Option<ServerInfoRaw>,
}

#[derive(Debug, Deserialize)]
struct UserInfoRaw {
    #[serde(default, deserialize_with = "flex_string")]
    auth: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    message: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    username: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    exp_date: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    max_connections: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    active_cons: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerInfoRaw {
    #[serde(default, deserialize_with = "flex_string")]
    timezone: Option<String>,
}

impl LoginResponse {
    fn into_result(self) -> Result<AuthResult, ApiError> {
        let info = self.user_info;
        if info.auth.as_deref() != Some("1") {
            return Err(ApiError::Auth(
                info.message
                    .unwrap_or_else(|| "Authentication Failed".to_string()),
            ));
        }
        Ok(AuthResult {
            username: info.username.unwrap_or_default(),
            status: info.status.unwrap_or_default(),
            expires: info.exp_date,
            max_connections: info.max_connections,
            active_connections: info.active_cons,
            server_timezone: self.server_info.and_then(|s| s.timezone),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CategoryRaw {
    #[serde(default, deserialize_with = "flex_string")]
    category_id: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    category_name: Option<String>,
}

impl CategoryRaw {
    fn into_category(self) -> Option<Category> {
        Some(Category {
            id: self.category_id?,
            name: self.category_name.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct StreamRaw {
    // Movies and live channels use stream_id, series use series_id
    #[serde(default, deserialize_with = "flex_string")]
    stream_id: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    series_id: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    name: Option<String>,
    // Series use cover instead of stream_icon
    #[serde(default, deserialize_with = "flex_string")]
    stream_icon: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    cover: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    category_id: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    container_extension: Option<String>,
    #[serde(default, deserialize_with = "flex_f64")]
    rating: Option<f64>,
}

impl StreamRaw {
    fn into_summary(self, kind: CatalogKind) -> Option<StreamSummary> {
        let id = match kind {
            CatalogKind::Series => self.series_id.or(self.stream_id),
            _ => self.stream_id,
        }?;
        Some(StreamSummary {
            id,
            kind,
            name: self.name.unwrap_or_default(),
            icon: self.stream_icon.or(self.cover),
            category_id: self.category_id,
            container_extension: self.container_extension,
            rating: self.rating.map(|r| r as f32),
        })
    }
}

#[derive(Debug, Deserialize)]
struct VodInfoResponse {
    // Some servers send [] instead of an object when info is missing
    #[serde(default)]
    info: Value,
    movie_data: Option<MovieDataRaw>,
}

#[derive(Debug, Deserialize)]
struct MovieDataRaw {
    #[serde(default, deserialize_with = "flex_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "flex_string")]
    container_extension: Option<String>,
}

impl VodInfoResponse {
    fn into_detail(self, id: &str) -> Result<MovieDetail, ApiError> {
        let data = self
            .movie_data
            .ok_or_else(|| ApiError::InvalidResponse(format!("no movie_data for vod {}", id)))?;
        let info = &self.info;
        let field = |key: &str| info.get(key).and_then(value_string);

        Ok(MovieDetail {
            id: id.to_string(),
            name: data
                .name
                .or_else(|| field("name"))
                .unwrap_or_default(),
            plot: field("plot").or_else(|| field("description")),
            genre: field("genre"),
            director: field("director"),
            cast: field("cast").or_else(|| field("actors")),
            release_date: field("releasedate").or_else(|| field("release_date")),
            duration_secs: info.get("duration_secs").and_then(value_u64),
            rating: info
                .get("rating")
                .and_then(value_string)
                .and_then(|r| r.parse::<f32>().ok()),
            poster: field("movie_image").or_else(|| field("cover_big")),
            container_extension: data.container_extension,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SeriesInfoResponse {
    #[serde(default)]
    info: Value,
    #[serde(default)]
    seasons: Value,
    #[serde(default)]
    episodes: Value,
}

impl SeriesInfoResponse {
    fn into_detail(self, id: &str) -> SeriesDetail {
        let info = &self.info;
        let field = |key: &str| info.get(key).and_then(value_string);

        let mut episodes: BTreeMap<u32, Vec<Episode>> = BTreeMap::new();
        if let Value::Object(map) = &self.episodes {
            for (season_key, list) in map {
                let Ok(season) = season_key.trim().parse::<u32>() else {
                    continue;
                };
                let Value::Array(items) = list else {
                    continue;
                };
                let mut parsed: Vec<Episode> = items.iter().filter_map(parse_episode).collect();
                parsed.sort_by_key(|e| e.episode_num);
                episodes.insert(season, parsed);
            }
        }

        let mut seasons: Vec<Season> = match &self.seasons {
            Value::Array(items) => items
                .iter()
                .filter_map(|s| {
                    let number = s.get("season_number").and_then(value_u64)? as u32;
                    Some(Season {
                        season_number: number,
                        name: s
                            .get("name")
                            .and_then(value_string)
                            .unwrap_or_else(|| format!("Season {}", number)),
                        episode_count: s
                            .get("episode_count")
                            .and_then(value_u64)
                            .map(|c| c as u32)
                            .unwrap_or_else(|| {
                                episodes.get(&number).map(|e| e.len() as u32).unwrap_or(0)
                            }),
                    })
                })
                .collect(),
            _ => Vec::new(),
        };
        // Many servers only send episodes
        for (number, list) in &episodes {
            if !seasons.iter().any(|s| s.season_number == *number) {
                seasons.push(Season {
                    season_number: *number,
                    name: format!("Season {}", number),
                    episode_count: list.len() as u32,
                });
            }
        }
        seasons.sort_by_key(|s| s.season_number);

        SeriesDetail {
            id: id.to_string(),
            name: field("name").unwrap_or_default(),
            plot: field("plot"),
            genre: field("genre"),
            cast: field("cast"),
            release_date: field("releaseDate").or_else(|| field("release_date")),
            cover: field("cover"),
            seasons,
            episodes,
        }
    }
}

fn parse_episode(v: &Value) -> Option<Episode> {
    let id = v.get("id").and_then(value_string)?;
    let info = v.get("info");
    let info_field = |key: &str| info.and_then(|i| i.get(key)).and_then(value_string);
    Some(Episode {
        id,
        episode_num: v
            .get("episode_num")
            .and_then(value_u64)
            .map(|n| n as u32)
            .unwrap_or(0),
        title: v.get("title").and_then(value_string).unwrap_or_default(),
        container_extension: v.get("container_extension").and_then(value_string),
        plot: info_field("plot"),
        duration_secs: info
            .and_then(|i| i.get("duration_secs"))
            .and_then(value_u64),
        image: info_field("movie_image"),
    })
}
