use derive_more::{Deref, Display, From};

use crate::{EngagementSummary, ExerciseID, ReadError};

#[allow(async_fn_in_trait)]
pub trait WorkoutRepository {
    async fn read_workout_entries(&self, id: WorkoutID) -> Result<Vec<SessionEntry>, ReadError>;
    async fn read_workout_muscles(&self, id: WorkoutID) -> Result<EngagementSummary, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait TrainingSessionRepository {
    async fn read_training_session(&self, id: TrainingSessionID)
    -> Result<TrainingSession, ReadError>;
    async fn read_training_session_entries(
        &self,
        id: TrainingSessionID,
    ) -> Result<Vec<SessionEntry>, ReadError>;
}

/// Logged training session, optionally based on a workout template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSession {
    pub id: TrainingSessionID,
    pub workout_id: Option<WorkoutID>,
}

/// Occurrence of an exercise in a workout template or a logged training
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub id: Option<EntryID>,
    pub exercise_id: ExerciseID,
    pub order_index: Option<u32>,
}

#[derive(
    Deref, Display, From, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct EntryID(u32);

/// Identifier of a workout template.
#[derive(
    Deref, Display, From, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct WorkoutID(u32);

#[derive(
    Deref, Display, From, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct TrainingSessionID(u32);

/// Sort entries by their position, keeping entries without a position last.
pub fn sort_entries(entries: &mut [SessionEntry]) {
    entries.sort_by_key(|e| (e.order_index.is_none(), e.order_index, e.id));
}
