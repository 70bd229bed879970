//! Cached Basecamp directories and free-text name resolution.
//!
//! The people and project directories are fetched lazily and memoized.
//! Each cell is single-flight: concurrent cold-start requests perform one
//! upstream fetch. The refresh policy is injectable; `None` caches for the
//! process lifetime, `Some(ttl)` expires snapshots after that duration.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::basecamp::{BasecampClient, BasecampError, Person, Project};

struct Snapshot<T> {
    values: Arc<Vec<T>>,
    fetched_at: Instant,
}

struct CacheCell<T> {
    slot: RwLock<Option<Snapshot<T>>>,
    fetch: tokio::sync::Mutex<()>,
}

impl<T> CacheCell<T> {
    fn new() -> Self {
        Self {
            slot: RwLock::new(None),
            fetch: tokio::sync::Mutex::new(()),
        }
    }

    fn fresh(&self, ttl: Option<Duration>) -> Option<Arc<Vec<T>>> {
        let slot = self.slot.read().unwrap();
        let snapshot = slot.as_ref()?;
        if let Some(ttl) = ttl {
            if snapshot.fetched_at.elapsed() >= ttl {
                return None;
            }
        }
        Some(snapshot.values.clone())
    }

    fn store(&self, values: Vec<T>) -> Arc<Vec<T>> {
        let values = Arc::new(values);
        let mut slot = self.slot.write().unwrap();
        *slot = Some(Snapshot {
            values: values.clone(),
            fetched_at: Instant::now(),
        });
        values
    }

    fn clear(&self) {
        let mut slot = self.slot.write().unwrap();
        *slot = None;
    }
}

/// Lazily populated, process-local view of the Basecamp directory.
pub struct DirectoryCache {
    client: BasecampClient,
    ttl: Option<Duration>,
    people: CacheCell<Person>,
    projects: CacheCell<Project>,
}

impl DirectoryCache {
    pub fn new(client: BasecampClient, ttl: Option<Duration>) -> Self {
        Self {
            client,
            ttl,
            people: CacheCell::new(),
            projects: CacheCell::new(),
        }
    }

    /// The people directory, fetching it at most once per TTL window.
    pub async fn people(&self) -> Result<Arc<Vec<Person>>, BasecampError> {
        if let Some(values) = self.people.fresh(self.ttl) {
            return Ok(values);
        }
        let _guard = self.people.fetch.lock().await;
        // another request may have populated the cell while we waited
        if let Some(values) = self.people.fresh(self.ttl) {
            return Ok(values);
        }
        let fetched = self.client.list_people().await?;
        info!("loaded {} basecamp people", fetched.len());
        Ok(self.people.store(fetched))
    }

    /// The project directory, fetching it at most once per TTL window.
    pub async fn projects(&self) -> Result<Arc<Vec<Project>>, BasecampError> {
        if let Some(values) = self.projects.fresh(self.ttl) {
            return Ok(values);
        }
        let _guard = self.projects.fetch.lock().await;
        if let Some(values) = self.projects.fresh(self.ttl) {
            return Ok(values);
        }
        let fetched = self.client.list_projects().await?;
        info!("loaded {} basecamp projects", fetched.len());
        Ok(self.projects.store(fetched))
    }

    /// Drop both snapshots; the next reads refetch.
    pub fn invalidate(&self) {
        self.people.clear();
        self.projects.clear();
    }
}

/// Resolve a raw comma-separated assignee list against the people directory.
///
/// Each fragment matches the first person whose lowercased name contains it
/// as a substring or has a whitespace-delimited token exactly equal to it.
/// Unmatched fragments are logged and skipped, never an error. Result order
/// follows input order and may be shorter than the fragment list.
pub fn resolve_assignees(raw_names: &str, people: &[Person]) -> Vec<u64> {
    let mut assignee_ids = Vec::new();
    for fragment in raw_names.split(',') {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }
        let needle = fragment.to_lowercase();
        let matched = people.iter().find(|person| {
            let name = person.name.to_lowercase();
            name.contains(&needle) || name.split_whitespace().any(|token| token == needle)
        });
        match matched {
            Some(person) => {
                info!(
                    "matched assignee \"{}\" -> {} ({})",
                    fragment, person.name, person.id
                );
                assignee_ids.push(person.id);
            }
            None => warn!("no matching assignee for \"{}\"", fragment),
        }
    }
    assignee_ids
}

/// First project whose lowercased name contains the fragment.
pub fn resolve_project<'a>(fragment: &str, projects: &'a [Project]) -> Option<&'a Project> {
    let needle = fragment.to_lowercase();
    projects
        .iter()
        .find(|project| project.name.to_lowercase().contains(&needle))
}
