//! Heat levels and anchor positions for the front and back body views.

use std::{collections::BTreeMap, slice::Iter, sync::LazyLock};

use derive_more::Deref;
use log::{debug, warn};

use crate::{
    EngagementSummary, ExerciseRef, MuscleTag, Property, ReadError, Role, SessionEntry,
    StorageError, TrainingSessionID, TrainingSessionRepository, WorkoutID, WorkoutRepository,
    aggregate, merge,
};

/// Discrete intensity from 1 (lowest) to 4 (highest).
#[derive(Deref, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(4);
}

impl From<Level> for u8 {
    fn from(value: Level) -> Self {
        value.0
    }
}

/// Map a count to a level relative to the highest count of its role.
///
/// A ratio of at least 0.9, 0.6 or 0.3 yields level 4, 3 or 2, anything below
/// yields level 1. Without data (`max` of zero) the level is 1.
#[must_use]
pub fn level(count: u32, max: u32) -> Level {
    if max == 0 {
        return Level::MIN;
    }

    let count = u64::from(count) * 10;
    let max = u64::from(max);

    if count >= 9 * max {
        Level(4)
    } else if count >= 6 * max {
        Level(3)
    } else if count >= 3 * max {
        Level(2)
    } else {
        Level(1)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum View {
    Front,
    Back,
}

impl Property for View {
    fn iter() -> Iter<'static, View> {
        static VIEWS: [View; 2] = [View::Front, View::Back];
        VIEWS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            View::Front => "front",
            View::Back => "back",
        }
    }
}

/// Anchor of a heat spot in percent of the image width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f32,
    pub y: f32,
    pub scale: Option<f32>,
}

impl PlotPoint {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, scale: None }
    }

    #[must_use]
    pub const fn scaled(x: f32, y: f32, scale: f32) -> Self {
        Self {
            x,
            y,
            scale: Some(scale),
        }
    }
}

pub type Positions = BTreeMap<MuscleTag, Vec<PlotPoint>>;

pub static FRONT_POSITIONS: LazyLock<Positions> = LazyLock::new(|| {
    BTreeMap::from([
        (MuscleTag::Chest, vec![PlotPoint::new(50., 21.)]),
        (
            MuscleTag::FrontDelts,
            vec![PlotPoint::new(31., 19.), PlotPoint::new(69., 19.)],
        ),
        (
            MuscleTag::SideDelts,
            vec![PlotPoint::new(24., 20.), PlotPoint::new(76., 20.)],
        ),
        (
            MuscleTag::Biceps,
            vec![PlotPoint::scaled(23., 31., 0.95), PlotPoint::scaled(77., 31., 0.95)],
        ),
        (
            MuscleTag::Triceps,
            vec![PlotPoint::scaled(23., 31., 0.95), PlotPoint::scaled(77., 31., 0.95)],
        ),
        (MuscleTag::Abs, vec![PlotPoint::scaled(50., 35., 0.95)]),
        (
            MuscleTag::Quads,
            vec![PlotPoint::scaled(41., 63., 1.18), PlotPoint::scaled(59., 63., 1.18)],
        ),
        (
            MuscleTag::Calves,
            vec![PlotPoint::scaled(39., 80., 0.95), PlotPoint::scaled(61., 80., 0.95)],
        ),
    ])
});

pub static BACK_POSITIONS: LazyLock<Positions> = LazyLock::new(|| {
    BTreeMap::from([
        (
            MuscleTag::Traps,
            vec![PlotPoint::new(35., 16.), PlotPoint::new(50., 16.)],
        ),
        (
            MuscleTag::Lats,
            vec![PlotPoint::scaled(35., 28., 1.1), PlotPoint::scaled(55., 28., 1.1)],
        ),
        (MuscleTag::LowerBack, vec![PlotPoint::new(44., 40.)]),
        (MuscleTag::Glutes, vec![PlotPoint::scaled(44., 48., 1.15)]),
        (
            MuscleTag::Hams,
            vec![PlotPoint::scaled(39., 57., 1.1), PlotPoint::scaled(51., 57., 1.1)],
        ),
        (
            MuscleTag::Calves,
            vec![PlotPoint::scaled(33., 80., 0.95), PlotPoint::scaled(58., 80., 0.95)],
        ),
    ])
});

/// A single heat spot to be painted.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawInstruction {
    pub muscle: MuscleTag,
    pub view: View,
    pub x: f32,
    pub y: f32,
    pub role: Role,
    pub level: Level,
    pub scale: f32,
}

/// Resolve the heat spots for a summary.
///
/// All primary muscles are emitted before the secondary muscles. Within a
/// role, muscles are ordered by tag and front anchors precede back anchors.
/// Secondary muscles which are also primary are skipped, even if the summary
/// has not been merged.
#[must_use]
pub fn plot(
    summary: &EngagementSummary,
    front_positions: &Positions,
    back_positions: &Positions,
) -> Vec<DrawInstruction> {
    let mut instructions = vec![];

    for role in Role::iter() {
        let max = summary.max(*role);
        for (muscle, count) in summary.counts(*role) {
            if *role == Role::Secondary && summary.primary.contains_key(muscle) {
                continue;
            }
            let muscle_level = level(*count, max);
            for (view, positions) in [(View::Front, front_positions), (View::Back, back_positions)]
            {
                for point in positions.get(muscle).into_iter().flatten() {
                    instructions.push(DrawInstruction {
                        muscle: *muscle,
                        view,
                        x: point.x,
                        y: point.y,
                        role: *role,
                        level: muscle_level,
                        scale: point.scale.unwrap_or(1.),
                    });
                }
            }
        }
    }

    instructions
}

/// Muscle engagement of a workout template or training session, ready for
/// display.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Heatmap {
    pub summary: EngagementSummary,
}

impl Heatmap {
    /// Derive the summary from the exercise names of the entries and give
    /// precedence to the counts reported by the server, if any.
    #[must_use]
    pub fn new(
        entries: &[SessionEntry],
        catalog: &[ExerciseRef],
        server: Option<&EngagementSummary>,
    ) -> Self {
        let fallback = aggregate(entries, catalog);
        Self {
            summary: merge(server.unwrap_or(&EngagementSummary::default()), &fallback),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }

    #[must_use]
    pub fn instructions(&self) -> Vec<DrawInstruction> {
        plot(&self.summary, &FRONT_POSITIONS, &BACK_POSITIONS)
    }
}

#[allow(async_fn_in_trait)]
pub trait HeatmapService {
    async fn read_workout_heatmap(
        &self,
        id: WorkoutID,
        catalog: &[ExerciseRef],
    ) -> Result<Heatmap, ReadError>;

    /// The summary of the session's workout template, if any, takes precedence
    /// over the names of the logged exercises.
    async fn read_training_session_heatmap(
        &self,
        id: TrainingSessionID,
        catalog: &[ExerciseRef],
    ) -> Result<Heatmap, ReadError>;
}

impl<R> HeatmapService for R
where
    R: WorkoutRepository + TrainingSessionRepository,
{
    async fn read_workout_heatmap(
        &self,
        id: WorkoutID,
        catalog: &[ExerciseRef],
    ) -> Result<Heatmap, ReadError> {
        let entries = self.read_workout_entries(id).await?;
        let server = read_template_summary(self, id).await;
        Ok(Heatmap::new(&entries, catalog, server.as_ref()))
    }

    async fn read_training_session_heatmap(
        &self,
        id: TrainingSessionID,
        catalog: &[ExerciseRef],
    ) -> Result<Heatmap, ReadError> {
        let session = self.read_training_session(id).await?;
        let entries = self.read_training_session_entries(id).await?;
        let server = match session.workout_id {
            Some(workout_id) => read_template_summary(self, workout_id).await,
            None => None,
        };
        Ok(Heatmap::new(&entries, catalog, server.as_ref()))
    }
}

/// A summary that cannot be read is replaced by the fallback derived from the
/// exercise names.
async fn read_template_summary<R: WorkoutRepository>(
    repository: &R,
    id: WorkoutID,
) -> Option<EngagementSummary> {
    match repository.read_workout_muscles(id).await {
        Ok(summary) => Some(summary),
        Err(ReadError::Storage(StorageError::NoConnection)) => {
            debug!("failed to read muscles of workout {id}: no connection");
            None
        }
        Err(err) => {
            warn!("failed to read muscles of workout {id}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::MuscleTag::{Abs, Calves, Chest, FrontDelts, Glutes, Hams, Quads, Triceps};

    #[rstest]
    #[case(10, 10, 4)]
    #[case(9, 10, 4)]
    #[case(8, 10, 3)]
    #[case(6, 10, 3)]
    #[case(5, 10, 2)]
    #[case(3, 10, 2)]
    #[case(2, 10, 1)]
    #[case(0, 10, 1)]
    #[case(1, 1, 4)]
    #[case(1, 2, 2)]
    #[case(2, 3, 3)]
    #[case(0, 0, 1)]
    #[case(7, 0, 1)]
    #[case(u32::MAX, u32::MAX, 4)]
    fn test_level(#[case] count: u32, #[case] max: u32, #[case] expected: u8) {
        assert_eq!(u8::from(level(count, max)), expected);
    }

    fn summary(primary: &[(MuscleTag, u32)], secondary: &[(MuscleTag, u32)]) -> EngagementSummary {
        EngagementSummary {
            primary: primary.iter().copied().collect(),
            secondary: secondary.iter().copied().collect(),
        }
    }

    fn instruction(
        muscle: MuscleTag,
        view: View,
        (x, y, scale): (f32, f32, f32),
        role: Role,
        level: u8,
    ) -> DrawInstruction {
        DrawInstruction {
            muscle,
            view,
            x,
            y,
            role,
            level: Level(level),
            scale,
        }
    }

    #[test]
    fn test_plot_bench_press_and_leg_press() {
        let catalog = [
            ExerciseRef {
                id: 1.into(),
                name: "Barbell Bench Press".to_string(),
                category: None,
            },
            ExerciseRef {
                id: 2.into(),
                name: "Leg Press".to_string(),
                category: None,
            },
        ];
        let entries = [1_u32, 2].map(|id| SessionEntry {
            id: None,
            exercise_id: id.into(),
            order_index: None,
        });

        let summary = aggregate(&entries, &catalog);

        assert_eq!(
            plot(&summary, &FRONT_POSITIONS, &BACK_POSITIONS),
            vec![
                instruction(Chest, View::Front, (50., 21., 1.), Role::Primary, 4),
                instruction(Glutes, View::Back, (44., 48., 1.15), Role::Primary, 4),
                instruction(Quads, View::Front, (41., 63., 1.18), Role::Primary, 4),
                instruction(Quads, View::Front, (59., 63., 1.18), Role::Primary, 4),
                instruction(FrontDelts, View::Front, (31., 19., 1.), Role::Secondary, 2),
                instruction(FrontDelts, View::Front, (69., 19., 1.), Role::Secondary, 2),
                instruction(Triceps, View::Front, (23., 31., 0.95), Role::Secondary, 2),
                instruction(Triceps, View::Front, (77., 31., 0.95), Role::Secondary, 2),
                instruction(Abs, View::Front, (50., 35., 0.95), Role::Secondary, 4),
                instruction(Hams, View::Back, (39., 57., 1.1), Role::Secondary, 2),
                instruction(Hams, View::Back, (51., 57., 1.1), Role::Secondary, 2),
                instruction(Calves, View::Front, (39., 80., 0.95), Role::Secondary, 2),
                instruction(Calves, View::Front, (61., 80., 0.95), Role::Secondary, 2),
                instruction(Calves, View::Back, (33., 80., 0.95), Role::Secondary, 2),
                instruction(Calves, View::Back, (58., 80., 0.95), Role::Secondary, 2),
            ]
        );
    }

    #[test]
    fn test_plot_skips_secondary_also_primary() {
        let instructions = plot(
            &summary(&[(Chest, 1)], &[(Chest, 5), (Abs, 1)]),
            &FRONT_POSITIONS,
            &BACK_POSITIONS,
        );

        assert_eq!(
            instructions,
            vec![
                instruction(Chest, View::Front, (50., 21., 1.), Role::Primary, 4),
                instruction(Abs, View::Front, (50., 35., 0.95), Role::Secondary, 1),
            ]
        );
    }

    #[test]
    fn test_plot_muscle_without_anchor() {
        let positions = Positions::from([(Chest, vec![PlotPoint::new(10., 10.)])]);

        assert_eq!(
            plot(&summary(&[(Quads, 1)], &[]), &positions, &Positions::new()),
            vec![]
        );
        assert_eq!(
            plot(&summary(&[(Chest, 1)], &[]), &Positions::new(), &positions),
            vec![instruction(Chest, View::Back, (10., 10., 1.), Role::Primary, 4)]
        );
    }

    #[test]
    fn test_plot_levels_per_role() {
        let instructions = plot(
            &summary(&[(Chest, 10), (Abs, 1)], &[(Triceps, 1)]),
            &FRONT_POSITIONS,
            &BACK_POSITIONS,
        );

        assert_eq!(
            instructions
                .iter()
                .map(|i| (i.muscle, i.role, u8::from(i.level)))
                .collect::<Vec<_>>(),
            vec![
                (Chest, Role::Primary, 4),
                (Abs, Role::Primary, 1),
                (Triceps, Role::Secondary, 4),
                (Triceps, Role::Secondary, 4),
            ]
        );
    }

    #[test]
    fn test_plot_empty() {
        assert_eq!(
            plot(&EngagementSummary::default(), &FRONT_POSITIONS, &BACK_POSITIONS),
            vec![]
        );
    }

    #[test]
    fn test_plot_repeatable() {
        let summary = summary(&[(Quads, 3), (Glutes, 2)], &[(Hams, 1), (Calves, 4)]);

        assert_eq!(
            plot(&summary, &FRONT_POSITIONS, &BACK_POSITIONS),
            plot(&summary, &FRONT_POSITIONS, &BACK_POSITIONS)
        );
    }

    #[test]
    fn test_positions_have_no_back_chest() {
        assert!(FRONT_POSITIONS.contains_key(&Chest));
        assert!(!BACK_POSITIONS.contains_key(&Chest));
        assert!(
            FRONT_POSITIONS
                .values()
                .chain(BACK_POSITIONS.values())
                .flatten()
                .all(|p| (0. ..=100.).contains(&p.x) && (0. ..=100.).contains(&p.y))
        );
    }

    #[test]
    fn test_heatmap() {
        let catalog = [
            ExerciseRef {
                id: 1.into(),
                name: "Leg Press".to_string(),
                category: None,
            },
            ExerciseRef {
                id: 2.into(),
                name: "Custom Move".to_string(),
                category: None,
            },
        ];
        let entries = [1_u32, 2].map(|id| SessionEntry {
            id: None,
            exercise_id: id.into(),
            order_index: None,
        });
        let server = summary(&[(Hams, 2)], &[]);

        assert_eq!(
            Heatmap::new(&entries, &catalog, None).summary,
            summary(&[(Quads, 1), (Glutes, 1)], &[(Hams, 1), (Calves, 1), (Abs, 1)])
        );
        assert_eq!(
            Heatmap::new(&entries, &catalog, Some(&server)).summary,
            summary(&[(Quads, 1), (Glutes, 1), (Hams, 2)], &[(Calves, 1), (Abs, 1)])
        );
        assert!(Heatmap::new(&[], &catalog, None).is_empty());
        assert_eq!(Heatmap::default().instructions(), vec![]);
    }
}
