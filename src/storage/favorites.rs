//! Favorite movies and series

use std::sync::Arc;
use tracing::debug;

use super::{load_or_default, save_logged, KeyValueStore};
use crate::models::{FavoriteMovie, FavoriteSeries};

pub const MOVIES_KEY: &str = "favorites_vod";
pub const SERIES_KEY: &str = "favorites_series";

/// Favorites lists, kept in the order they were added
#[derive(Clone)]
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // -------------------------------------------------------------------------
    // Movies
    // -------------------------------------------------------------------------

    pub fn movies(&self) -> Vec<FavoriteMovie> {
        load_or_default(self.store.as_ref(), MOVIES_KEY)
    }

    pub fn is_favorite_movie(&self, content_id: &str) -> bool {
        self.movies().iter().any(|m| m.content_id == content_id)
    }

    /// Append unless already present
    pub fn add_movie(&self, movie: FavoriteMovie) {
        let mut movies = self.movies();
        if movies.iter().any(|m| m.content_id == movie.content_id) {
            return;
        }
        movies.push(movie);
        save_logged(self.store.as_ref(), MOVIES_KEY, &movies);
    }

    pub fn remove_movie(&self, content_id: &str) {
        let mut movies = self.movies();
        movies.retain(|m| m.content_id != content_id);
        save_logged(self.store.as_ref(), MOVIES_KEY, &movies);
    }

    /// Add or remove; returns true when the movie is now a favorite
    pub fn toggle_movie(&self, movie: FavoriteMovie) -> bool {
        if self.is_favorite_movie(&movie.content_id) {
            debug!(content_id = %movie.content_id, "removing favorite movie");
            self.remove_movie(&movie.content_id);
            false
        } else {
            debug!(content_id = %movie.content_id, "adding favorite movie");
            self.add_movie(movie);
            true
        }
    }

    // -------------------------------------------------------------------------
    // Series
    // -------------------------------------------------------------------------

    pub fn series(&self) -> Vec<FavoriteSeries> {
        load_or_default(self.store.as_ref(), SERIES_KEY)
    }

    pub fn is_favorite_series(&self, series_id: &str) -> bool {
        self.series().iter().any(|s| s.series_id == series_id)
    }

    pub fn add_series(&self, series: FavoriteSeries) {
        let mut all = self.series();
        if all.iter().any(|s| s.series_id == series.series_id) {
            return;
        }
        all.push(series);
        save_logged(self.store.as_ref(), SERIES_KEY, &all);
    }

    pub fn remove_series(&self, series_id: &str) {
        let mut all = self.series();
        all.retain(|s| s.series_id != series_id);
        save_logged(self.store.as_ref(), SERIES_KEY, &all);
    }

    pub fn toggle_series(&self, series: FavoriteSeries) -> bool {
        if self.is_favorite_series(&series.series_id) {
            self.remove_series(&series.series_id);
            false
        } else {
            self.add_series(series);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn movie(id: &str) -> FavoriteMovie {
        FavoriteMovie {
            content_id: id.into(),
            name: format!("Movie {}", id),
            icon: None,
            container_format: Some("mkv".into()),
        }
    }

    fn store() -> FavoritesStore {
        FavoritesStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_add_keeps_order_without_duplicates() {
        let s = store();
        s.add_movie(movie("1"));
        s.add_movie(movie("2"));
        s.add_movie(movie("1"));
        let ids: Vec<_> = s.movies().into_iter().map(|m| m.content_id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_toggle_movie() {
        let s = store();
        assert!(s.toggle_movie(movie("7")));
        assert!(s.is_favorite_movie("7"));
        assert!(!s.toggle_movie(movie("7")));
        assert!(!s.is_favorite_movie("7"));
    }

    #[test]
    fn test_series_favorites_are_separate() {
        let s = store();
        s.add_movie(movie("5"));
        assert!(s.toggle_series(FavoriteSeries {
            series_id: "5".into(),
            name: "Show".into(),
            cover: None,
        }));
        assert_eq!(s.movies().len(), 1);
        assert_eq!(s.series().len(), 1);
        s.remove_series("5");
        assert!(s.series().is_empty());
        assert!(s.is_favorite_movie("5"));
    }
}
