//! Cached access to the external exercise provider.
//!
//! Results are cached per normalized query for the lifetime of the value, so
//! equivalent queries (e.g. "Squats!" and "squat") are answered without a
//! request. Starting a search aborts the previous search if it is still in
//! flight, and the same applies to browsing. An aborted request resolves to
//! `SearchError::Aborted`.

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
};

use log::{debug, error};
use musclemap_domain as domain;
use web_sys::{AbortController, AbortSignal};

use super::rest::{GlooNetSendRequest, REST, SendRequest};

pub const CACHE_CAPACITY: usize = 100;

/// Results keyed by query. When the capacity is exceeded, the entry inserted
/// first is evicted.
#[derive(Debug, Clone)]
pub struct SearchCache<T> {
    entries: HashMap<String, T>,
    order: VecDeque<String>,
    capacity: usize,
}

impl<T> Default for SearchCache<T> {
    fn default() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }
}

impl<T> SearchCache<T> {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }
}

impl<T: Clone> SearchCache<T> {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<T> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: String, value: T) {
        if self.entries.insert(key.clone(), value).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Cache key of a page of exercises targeting `muscle`.
#[must_use]
pub fn browse_key(muscle: Option<domain::MuscleTag>, limit: u32, offset: u32) -> String {
    format!(
        "{}|{limit}|{offset}",
        muscle.map_or("all", domain::MuscleTag::slug)
    )
}

pub struct ExerciseSearch<S: SendRequest> {
    pub rest: REST<S>,
    searches: RefCell<SearchCache<Vec<domain::ExternalExercise>>>,
    pages: RefCell<SearchCache<Vec<domain::ExternalExercise>>>,
    search_controller: RefCell<Option<AbortController>>,
    browse_controller: RefCell<Option<AbortController>>,
}

impl ExerciseSearch<GlooNetSendRequest> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rest(REST::new())
    }
}

impl Default for ExerciseSearch<GlooNetSendRequest> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SendRequest> ExerciseSearch<S> {
    #[must_use]
    pub fn with_rest(rest: REST<S>) -> Self {
        Self {
            rest,
            searches: RefCell::new(SearchCache::default()),
            pages: RefCell::new(SearchCache::default()),
            search_controller: RefCell::new(None),
            browse_controller: RefCell::new(None),
        }
    }

    pub fn clear(&self) {
        self.searches.borrow_mut().clear();
        self.pages.borrow_mut().clear();
    }
}

/// Abort the request of the current controller, if any, and install a new
/// controller.
fn replace_controller(current: &RefCell<Option<AbortController>>) -> Option<AbortSignal> {
    let controller = AbortController::new()
        .inspect_err(|err| error!("failed to create abort controller: {err:?}"))
        .ok();
    let signal = controller.as_ref().map(AbortController::signal);
    if let Some(previous) = current.replace(controller) {
        previous.abort();
    }
    signal
}

fn matching(
    exercises: Vec<domain::ExternalExercise>,
    query: &str,
) -> Vec<domain::ExternalExercise> {
    exercises
        .into_iter()
        .filter(|exercise| domain::matches_all_tokens(&exercise.name, query))
        .collect()
}

impl<S: SendRequest> domain::ExternalExerciseRepository for ExerciseSearch<S> {
    async fn search_exercises(
        &self,
        query: &str,
    ) -> Result<Vec<domain::ExternalExercise>, domain::SearchError> {
        let key = domain::query_key(query);

        if key.is_empty() {
            return Ok(vec![]);
        }

        if let Some(exercises) = self.searches.borrow().get(&key) {
            debug!("search cache hit for \"{key}\"");
            return Ok(matching(exercises, query));
        }

        let signal = replace_controller(&self.search_controller);
        let result = self
            .rest
            .search_external_exercises(query, signal.as_ref())
            .await;

        if signal.as_ref().is_some_and(AbortSignal::aborted) {
            return Err(domain::SearchError::Aborted);
        }

        let exercises = result?;
        self.searches.borrow_mut().insert(key, exercises.clone());
        Ok(matching(exercises, query))
    }

    async fn browse_exercises(
        &self,
        muscle: Option<domain::MuscleTag>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<domain::ExternalExercise>, domain::SearchError> {
        let key = browse_key(muscle, limit, offset);

        if let Some(exercises) = self.pages.borrow().get(&key) {
            return Ok(exercises);
        }

        let signal = replace_controller(&self.browse_controller);
        let result = self
            .rest
            .browse_external_exercises(muscle, limit, offset, signal.as_ref())
            .await;

        if signal.as_ref().is_some_and(AbortSignal::aborted) {
            return Err(domain::SearchError::Aborted);
        }

        let exercises = result?;
        self.pages.borrow_mut().insert(key, exercises.clone());
        Ok(exercises)
    }
}
