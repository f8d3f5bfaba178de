use std::collections::BTreeMap;

use gloo_net::http::{Request, RequestBuilder, Response};
use log::warn;
use musclemap_domain as domain;
use serde::{Deserialize, Serialize};
use web_sys::AbortSignal;

const CATALOG_LIMIT: u32 = 200;
const SEARCH_LIMIT: u32 = 20;

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error>;
}

#[derive(Clone, Copy, Default)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
        request.send().await
    }
}

#[derive(Clone)]
pub struct REST<S: SendRequest> {
    pub sender: S,
}

impl REST<GlooNetSendRequest> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sender: GlooNetSendRequest,
        }
    }
}

impl Default for REST<GlooNetSendRequest> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SendRequest> REST<S> {
    /// Search the external provider, cancelling the request when `signal` is
    /// aborted.
    pub async fn search_external_exercises(
        &self,
        query: &str,
        signal: Option<&AbortSignal>,
    ) -> Result<Vec<domain::ExternalExercise>, domain::ReadError> {
        let limit = SEARCH_LIMIT.to_string();
        let exercises: Vec<ExternalExercise> = self
            .fetch(
                Request::get("api/external/exercises")
                    .query([("q", query), ("limit", limit.as_str())])
                    .abort_signal(signal),
            )
            .await?;
        Ok(exercises.into_iter().map(Into::into).collect())
    }

    pub async fn browse_external_exercises(
        &self,
        muscle: Option<domain::MuscleTag>,
        limit: u32,
        offset: u32,
        signal: Option<&AbortSignal>,
    ) -> Result<Vec<domain::ExternalExercise>, domain::ReadError> {
        let limit = limit.to_string();
        let offset = offset.to_string();
        let mut params = vec![("limit", limit.as_str()), ("offset", offset.as_str())];
        if let Some(muscle) = muscle {
            params.insert(0, ("muscle", muscle.slug()));
        }
        let page: ExternalExercisePage = self
            .fetch(
                Request::get("api/external/exercises/browse")
                    .query(params)
                    .abort_signal(signal),
            )
            .await?;
        Ok(page.items.into_iter().map(Into::into).collect())
    }

    async fn fetch<T>(&self, request: RequestBuilder) -> Result<T, domain::ReadError>
    where
        T: 'static + for<'de> Deserialize<'de>,
    {
        let request = request
            .build()
            .map_err(|err| domain::StorageError::Other(err.into()))?;
        let response = self
            .sender
            .send_request(request)
            .await
            .map_err(|_| domain::StorageError::NoConnection)?;

        if response.status() == 401 {
            return Err(domain::StorageError::NoSession.into());
        }

        if !response.ok() {
            return Err(domain::StorageError::Other(
                format!("{} {}", response.status(), response.status_text()).into(),
            )
            .into());
        }

        match response.json::<T>().await {
            Ok(data) => Ok(data),
            Err(err) => Err(domain::StorageError::Other(
                format!("deserialization failed: {err}").into(),
            )
            .into()),
        }
    }
}

impl<S: SendRequest> domain::ExerciseRepository for REST<S> {
    async fn read_exercises(&self) -> Result<Vec<domain::ExerciseRef>, domain::ReadError> {
        let exercises: Vec<Exercise> = self
            .fetch(Request::get(&format!("api/exercises?limit={CATALOG_LIMIT}")))
            .await?;
        Ok(exercises.into_iter().map(Into::into).collect())
    }
}

impl<S: SendRequest> domain::WorkoutRepository for REST<S> {
    async fn read_workout_entries(
        &self,
        id: domain::WorkoutID,
    ) -> Result<Vec<domain::SessionEntry>, domain::ReadError> {
        let items: Vec<Item> = self
            .fetch(Request::get(&format!("api/workouts/{id}/items")))
            .await?;
        Ok(entries(items))
    }

    async fn read_workout_muscles(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::EngagementSummary, domain::ReadError> {
        let summary: MuscleSummary = self
            .fetch(Request::get(&format!("api/workouts/{id}/muscles")))
            .await?;
        Ok(summary.into())
    }
}

impl<S: SendRequest> domain::TrainingSessionRepository for REST<S> {
    async fn read_training_session(
        &self,
        id: domain::TrainingSessionID,
    ) -> Result<domain::TrainingSession, domain::ReadError> {
        let session: TrainingSession = self
            .fetch(Request::get(&format!("api/sessions/{id}")))
            .await?;
        Ok(session.into())
    }

    async fn read_training_session_entries(
        &self,
        id: domain::TrainingSessionID,
    ) -> Result<Vec<domain::SessionEntry>, domain::ReadError> {
        let items: Vec<Item> = self
            .fetch(Request::get(&format!("api/sessions/{id}/items")))
            .await?;
        Ok(entries(items))
    }
}

impl<S: SendRequest> domain::ExternalExerciseRepository for REST<S> {
    async fn search_exercises(
        &self,
        query: &str,
    ) -> Result<Vec<domain::ExternalExercise>, domain::SearchError> {
        Ok(self.search_external_exercises(query, None).await?)
    }

    async fn browse_exercises(
        &self,
        muscle: Option<domain::MuscleTag>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<domain::ExternalExercise>, domain::SearchError> {
        Ok(self
            .browse_external_exercises(muscle, limit, offset, None)
            .await?)
    }
}

fn entries(items: Vec<Item>) -> Vec<domain::SessionEntry> {
    let mut entries = items.into_iter().map(Into::into).collect::<Vec<_>>();
    domain::sort_entries(&mut entries);
    entries
}

fn muscle_tags(slugs: Vec<String>) -> Vec<domain::MuscleTag> {
    slugs
        .into_iter()
        .filter_map(|slug| match domain::MuscleTag::from_slug(&slug) {
            Ok(muscle) => Some(muscle),
            Err(err) => {
                warn!("{err}");
                None
            }
        })
        .collect()
}

fn muscle_counts(counts: BTreeMap<String, u32>) -> BTreeMap<domain::MuscleTag, u32> {
    counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .filter_map(|(slug, count)| match domain::MuscleTag::from_slug(&slug) {
            Ok(muscle) => Some((muscle, count)),
            Err(err) => {
                warn!("{err}");
                None
            }
        })
        .collect()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub default_unit: Option<String>,
}

impl From<Exercise> for domain::ExerciseRef {
    fn from(value: Exercise) -> Self {
        let category = value.category.and_then(|category| {
            category
                .parse::<domain::Category>()
                .inspect_err(|_| warn!("unknown category \"{category}\" of exercise {}", value.id))
                .ok()
        });
        Self {
            id: value.id.into(),
            name: value.name,
            category,
        }
    }
}

impl From<domain::ExerciseRef> for Exercise {
    fn from(value: domain::ExerciseRef) -> Self {
        Self {
            id: *value.id,
            name: value.name,
            category: value.category.map(|category| category.slug().to_string()),
            default_unit: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Item {
    #[serde(default)]
    pub id: Option<u32>,
    pub exercise_id: u32,
    #[serde(default)]
    pub order_index: Option<u32>,
}

impl From<Item> for domain::SessionEntry {
    fn from(value: Item) -> Self {
        Self {
            id: value.id.map(Into::into),
            exercise_id: value.exercise_id.into(),
            order_index: value.order_index,
        }
    }
}

impl From<domain::SessionEntry> for Item {
    fn from(value: domain::SessionEntry) -> Self {
        Self {
            id: value.id.map(|id| *id),
            exercise_id: *value.exercise_id,
            order_index: value.order_index,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TrainingSession {
    pub id: u32,
    #[serde(default)]
    pub workout_template_id: Option<u32>,
}

impl From<TrainingSession> for domain::TrainingSession {
    fn from(value: TrainingSession) -> Self {
        Self {
            id: value.id.into(),
            workout_id: value.workout_template_id.map(Into::into),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MuscleSummary {
    #[serde(default)]
    pub template_id: Option<u32>,
    #[serde(default)]
    pub primary: BTreeMap<String, u32>,
    #[serde(default)]
    pub secondary: BTreeMap<String, u32>,
}

impl From<MuscleSummary> for domain::EngagementSummary {
    fn from(value: MuscleSummary) -> Self {
        Self {
            primary: muscle_counts(value.primary),
            secondary: muscle_counts(value.secondary),
        }
    }
}

impl From<domain::EngagementSummary> for MuscleSummary {
    fn from(value: domain::EngagementSummary) -> Self {
        let slugs = |counts: BTreeMap<domain::MuscleTag, u32>| {
            counts
                .into_iter()
                .map(|(muscle, count)| (muscle.slug().to_string(), count))
                .collect()
        };
        Self {
            template_id: None,
            primary: slugs(value.primary),
            secondary: slugs(value.secondary),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ExternalExercise {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub muscles: Option<ExternalMuscles>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ExternalMuscles {
    #[serde(default)]
    pub primary: Vec<String>,
    #[serde(default)]
    pub secondary: Vec<String>,
}

impl From<ExternalExercise> for domain::ExternalExercise {
    fn from(value: ExternalExercise) -> Self {
        let muscles = value
            .muscles
            .map(|muscles| domain::MuscleGuess {
                primary: muscle_tags(muscles.primary),
                secondary: muscle_tags(muscles.secondary),
            })
            .filter(|muscles| !muscles.is_empty())
            .unwrap_or_else(|| domain::classify(&value.name));
        Self {
            name: value.name,
            category: value.category,
            muscles,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ExternalExercisePage {
    #[serde(default)]
    pub items: Vec<ExternalExercise>,
}
