//! Profile search with debounce and supersession
//!
//! Each viewer owns one `ProfileSearch`. Every call bumps a generation
//! counter; a call whose generation is no longer the latest gives up,
//! whether it is still waiting out the debounce or already querying.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::{Profile, Route};
use crate::error::Result;
use crate::repository::SocialStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileHit {
    pub id: Uuid,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub route: Route,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Replaces whatever result set was shown before
    Results(Vec<ProfileHit>),
    /// A newer input arrived; this result must not be shown
    Superseded,
}

pub struct ProfileSearch {
    viewer: Uuid,
    debounce: Duration,
    limit: usize,
    latest: watch::Sender<u64>,
}

impl ProfileSearch {
    pub fn new(viewer: Uuid, debounce: Duration, limit: usize) -> Self {
        let (latest, _) = watch::channel(0);
        Self {
            viewer,
            debounce,
            limit,
            latest,
        }
    }

    pub async fn search(&self, store: &dyn SocialStore, input: &str) -> Result<SearchOutcome> {
        let mut generation = 0;
        self.latest.send_modify(|g| {
            *g += 1;
            generation = *g;
        });

        let needle = input.trim();
        if needle.is_empty() {
            return Ok(SearchOutcome::Results(Vec::new()));
        }

        let mut rx = self.latest.subscribe();
        if *rx.borrow() != generation {
            return Ok(SearchOutcome::Superseded);
        }

        let query = async {
            tokio::time::sleep(self.debounce).await;
            store.search_profiles(needle, self.limit).await
        };

        let profiles = tokio::select! {
            _ = rx.changed() => {
                debug!(viewer = %self.viewer, needle, "search superseded");
                return Ok(SearchOutcome::Superseded);
            }
            res = query => res.map_err(|e| {
                error!(viewer = %self.viewer, error = %e, "Error searching profiles");
                e
            })?,
        };

        if *self.latest.borrow() != generation {
            return Ok(SearchOutcome::Superseded);
        }

        Ok(SearchOutcome::Results(
            profiles.into_iter().map(|p| self.hit(p)).collect(),
        ))
    }

    fn hit(&self, profile: Profile) -> ProfileHit {
        ProfileHit {
            route: Route::for_profile(self.viewer, profile.id),
            id: profile.id,
            username: profile.username,
            full_name: profile.full_name,
        }
    }
}

/// One `ProfileSearch` per viewer with a search in flight
pub struct SearchRegistry {
    debounce: Duration,
    limit: usize,
    searches: DashMap<Uuid, Arc<ProfileSearch>>,
}

impl SearchRegistry {
    pub fn new(debounce: Duration, limit: usize) -> Self {
        Self {
            debounce,
            limit,
            searches: DashMap::new(),
        }
    }

    pub fn for_viewer(&self, viewer: Uuid) -> Arc<ProfileSearch> {
        self.searches
            .entry(viewer)
            .or_insert_with(|| Arc::new(ProfileSearch::new(viewer, self.debounce, self.limit)))
            .clone()
    }

    /// Run a search on the viewer's shared state. The entry is evicted
    /// once no other call for the same viewer is still holding it.
    pub async fn search(
        &self,
        viewer: Uuid,
        store: &dyn SocialStore,
        input: &str,
    ) -> Result<SearchOutcome> {
        let search = self.for_viewer(viewer);
        let outcome = search.search(store, input).await;
        drop(search);

        self.searches
            .remove_if(&viewer, |_, search| Arc::strong_count(search) == 1);
        outcome
    }

    /// Drop a viewer's search state, e.g. on sign-out
    pub fn remove(&self, viewer: Uuid) {
        self.searches.remove(&viewer);
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::repository::MockSocialStore;

    fn profile(username: &str) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            username: Some(username.to_string()),
            full_name: None,
            bio: None,
            website: None,
        }
    }

    #[tokio::test]
    async fn test_empty_input_sends_nothing() {
        let mut store = MockSocialStore::new();
        store.expect_search_profiles().times(0);

        let search = ProfileSearch::new(Uuid::new_v4(), Duration::from_millis(1), 5);
        assert_eq!(
            search.search(&store, "   ").await.unwrap(),
            SearchOutcome::Results(Vec::new())
        );
    }

    #[tokio::test]
    async fn test_results_link_to_profiles() {
        let viewer = Uuid::new_v4();
        let mut store = MockSocialStore::new();
        store
            .expect_search_profiles()
            .withf(|needle, limit| needle == "an" && *limit == 5)
            .times(1)
            .returning(|_, _| Ok(vec![profile("ann"), profile("DANA")]));

        let search = ProfileSearch::new(viewer, Duration::from_millis(1), 5);
        let SearchOutcome::Results(hits) = search.search(&store, " an ").await.unwrap() else {
            panic!("search should not be superseded");
        };

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].username.as_deref(), Some("ann"));
        assert_eq!(hits[1].route, Route::ProfileViewer(hits[1].id));
    }

    #[tokio::test]
    async fn test_newer_input_supersedes_pending_search() {
        let mut store = MockSocialStore::new();
        store
            .expect_search_profiles()
            .withf(|needle, _| needle == "ann")
            .times(1)
            .returning(|_, _| Ok(vec![profile("ann")]));

        let search = ProfileSearch::new(Uuid::new_v4(), Duration::from_millis(100), 5);

        let (first, second) = tokio::join!(search.search(&store, "an"), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            search.search(&store, "ann").await
        });

        assert_eq!(first.unwrap(), SearchOutcome::Superseded);
        assert!(matches!(second.unwrap(), SearchOutcome::Results(hits) if hits.len() == 1));
    }

    #[test]
    fn test_registry_reuses_viewer_state() {
        let registry = SearchRegistry::new(Duration::from_millis(250), 5);
        let viewer = Uuid::new_v4();

        let a = registry.for_viewer(viewer);
        let b = registry.for_viewer(viewer);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &registry.for_viewer(Uuid::new_v4())));

        registry.remove(viewer);
        assert!(!Arc::ptr_eq(&a, &registry.for_viewer(viewer)));
    }

    #[tokio::test]
    async fn test_finished_search_leaves_registry_empty() {
        let mut store = MockSocialStore::new();
        store
            .expect_search_profiles()
            .times(1)
            .returning(|_, _| Ok(vec![profile("ann")]));

        let registry = SearchRegistry::new(Duration::from_millis(1), 5);
        let outcome = registry.search(Uuid::new_v4(), &store, "an").await.unwrap();

        assert!(matches!(outcome, SearchOutcome::Results(hits) if hits.len() == 1));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_failed_search_leaves_registry_empty() {
        let mut store = MockSocialStore::new();
        store
            .expect_search_profiles()
            .returning(|_, _| Err(AppError::Internal("boom".into())));

        let registry = SearchRegistry::new(Duration::from_millis(1), 5);
        assert!(registry.search(Uuid::new_v4(), &store, "an").await.is_err());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_registry_keeps_state_while_a_search_is_pending() {
        let mut store = MockSocialStore::new();
        store
            .expect_search_profiles()
            .withf(|needle, _| needle == "ann")
            .times(1)
            .returning(|_, _| Ok(vec![profile("ann")]));

        let registry = SearchRegistry::new(Duration::from_millis(100), 5);
        let viewer = Uuid::new_v4();

        let (first, second) = tokio::join!(registry.search(viewer, &store, "an"), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            registry.search(viewer, &store, "ann").await
        });

        assert_eq!(first.unwrap(), SearchOutcome::Superseded);
        assert!(matches!(second.unwrap(), SearchOutcome::Results(hits) if hits.len() == 1));
        assert!(registry.is_empty());
    }
}
