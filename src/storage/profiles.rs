//! Saved login profiles

use std::sync::Arc;

use super::{load_or_default, save_logged, KeyValueStore};
use crate::models::Profile;

pub const PROFILES_KEY: &str = "profiles";

#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn all(&self) -> Vec<Profile> {
        load_or_default(self.store.as_ref(), PROFILES_KEY)
    }

    pub fn get(&self, name: &str) -> Option<Profile> {
        self.all().into_iter().find(|p| p.profile_name == name)
    }

    /// Replace the profile with the same name in place, else append
    pub fn save(&self, profile: Profile) {
        let mut profiles = self.all();
        match profiles
            .iter_mut()
            .find(|p| p.profile_name == profile.profile_name)
        {
            Some(existing) => *existing = profile,
            None => profiles.push(profile),
        }
        save_logged(self.store.as_ref(), PROFILES_KEY, &profiles);
    }

    /// Returns whether a profile was deleted
    pub fn delete(&self, name: &str) -> bool {
        let mut profiles = self.all();
        let before = profiles.len();
        profiles.retain(|p| p.profile_name != name);
        if profiles.len() == before {
            return false;
        }
        save_logged(self.store.as_ref(), PROFILES_KEY, &profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn profile(name: &str, user: &str) -> Profile {
        Profile {
            profile_name: name.into(),
            user_name: user.into(),
            password: "secret".into(),
            url: "http://tv.example.com".into(),
        }
    }

    #[test]
    fn test_save_replaces_in_place() {
        let s = ProfileStore::new(Arc::new(MemoryStore::new()));
        s.save(profile("home", "alice"));
        s.save(profile("work", "bob"));
        s.save(profile("home", "carol"));
        let all = s.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].profile_name, "home");
        assert_eq!(all[0].user_name, "carol");
    }

    #[test]
    fn test_get_and_delete() {
        let s = ProfileStore::new(Arc::new(MemoryStore::new()));
        s.save(profile("home", "alice"));
        assert_eq!(s.get("home").map(|p| p.user_name), Some("alice".into()));
        assert!(s.delete("home"));
        assert!(!s.delete("home"));
        assert!(s.get("home").is_none());
    }
}
