use std::collections::BTreeMap;

use log::debug;

use crate::{ExerciseID, ExerciseRef, MuscleTag, Role, SessionEntry, classifier};

/// Number of entries engaging each muscle, split by role.
///
/// A muscle missing from a map has a count of zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EngagementSummary {
    pub primary: BTreeMap<MuscleTag, u32>,
    pub secondary: BTreeMap<MuscleTag, u32>,
}

impl EngagementSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }

    #[must_use]
    pub fn counts(&self, role: Role) -> &BTreeMap<MuscleTag, u32> {
        match role {
            Role::Primary => &self.primary,
            Role::Secondary => &self.secondary,
        }
    }

    #[must_use]
    pub fn count(&self, muscle: MuscleTag, role: Role) -> u32 {
        self.counts(role).get(&muscle).copied().unwrap_or(0)
    }

    /// Highest count within a role, zero if the role is empty.
    #[must_use]
    pub fn max(&self, role: Role) -> u32 {
        self.counts(role).values().copied().max().unwrap_or(0)
    }

    /// Muscles counted as secondary which are not also counted as primary.
    pub fn secondary_only(&self) -> impl Iterator<Item = (&MuscleTag, &u32)> {
        self.secondary
            .iter()
            .filter(|(muscle, _)| !self.primary.contains_key(muscle))
    }

    #[must_use]
    pub fn is_disjoint(&self) -> bool {
        self.secondary.keys().all(|m| !self.primary.contains_key(m))
    }

    fn remove_dominated(&mut self) {
        let primary = &self.primary;
        self.secondary.retain(|muscle, _| !primary.contains_key(muscle));
    }
}

/// Count the muscles engaged by the entries based on the names of their
/// exercises.
///
/// Entries referring to exercises missing from the catalog are ignored.
#[must_use]
pub fn aggregate(entries: &[SessionEntry], catalog: &[ExerciseRef]) -> EngagementSummary {
    let exercises = catalog
        .iter()
        .map(|e| (e.id, e))
        .collect::<BTreeMap<ExerciseID, &ExerciseRef>>();
    let mut summary = EngagementSummary::default();

    for entry in entries {
        let Some(exercise) = exercises.get(&entry.exercise_id) else {
            debug!("skipping entry of unknown exercise {}", entry.exercise_id);
            continue;
        };
        let guess = classifier::classify(&exercise.name);
        for muscle in &guess.primary {
            *summary.primary.entry(*muscle).or_insert(0) += 1;
        }
        for muscle in &guess.secondary {
            *summary.secondary.entry(*muscle).or_insert(0) += 1;
        }
    }

    summary
}

/// Combine a summary reported by the server with a summary derived from
/// exercise names.
///
/// Counts of the server replace the fallback counts of the same muscle and
/// role. Muscles counted as primary are removed from the secondary counts.
#[must_use]
pub fn merge(server: &EngagementSummary, fallback: &EngagementSummary) -> EngagementSummary {
    let mut merged = fallback.clone();

    merged.primary.extend(&server.primary);
    merged.secondary.extend(&server.secondary);
    merged.remove_dominated();

    merged
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::MuscleTag::{
        Abs, Biceps, Calves, Chest, FrontDelts, Glutes, Hams, Lats, Quads, Traps, Triceps,
    };

    fn summary(primary: &[(MuscleTag, u32)], secondary: &[(MuscleTag, u32)]) -> EngagementSummary {
        EngagementSummary {
            primary: primary.iter().copied().collect(),
            secondary: secondary.iter().copied().collect(),
        }
    }

    fn entry(exercise_id: u32) -> SessionEntry {
        SessionEntry {
            id: None,
            exercise_id: exercise_id.into(),
            order_index: None,
        }
    }

    static CATALOG: std::sync::LazyLock<Vec<ExerciseRef>> = std::sync::LazyLock::new(|| {
        vec![
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
            ExerciseRef {
                id: 3.into(),
                name: "Lat Pulldown".to_string(),
                category: None,
            },
            ExerciseRef {
                id: 4.into(),
                name: "Treadmill".to_string(),
                category: None,
            },
        ]
    });

    #[test]
    fn test_aggregate() {
        assert_eq!(
            aggregate(&[entry(1), entry(2)], &CATALOG),
            summary(
                &[(Chest, 1), (Quads, 1), (Glutes, 1)],
                &[
                    (FrontDelts, 1),
                    (Triceps, 1),
                    (Abs, 2),
                    (Hams, 1),
                    (Calves, 1)
                ]
            )
        );
    }

    #[test]
    fn test_aggregate_repeated_entries() {
        assert_eq!(
            aggregate(&[entry(1), entry(3), entry(1)], &CATALOG),
            summary(
                &[(Chest, 2), (Lats, 1)],
                &[
                    (FrontDelts, 2),
                    (Triceps, 2),
                    (Abs, 2),
                    (Biceps, 1),
                    (Traps, 1)
                ]
            )
        );
    }

    #[test]
    fn test_aggregate_order_independent() {
        let entries = [entry(1), entry(2), entry(3), entry(2)];
        let mut reversed = entries.to_vec();
        reversed.reverse();
        let mut rotated = entries.to_vec();
        rotated.rotate_left(1);

        assert_eq!(
            aggregate(&entries, &CATALOG),
            aggregate(&reversed, &CATALOG)
        );
        assert_eq!(aggregate(&entries, &CATALOG), aggregate(&rotated, &CATALOG));
    }

    #[rstest]
    #[case::unknown_exercise(&[entry(99)], &CATALOG)]
    #[case::unclassified_exercise(&[entry(4)], &CATALOG)]
    #[case::no_entries(&[], &CATALOG)]
    #[case::no_catalog(&[entry(1)], &[])]
    fn test_aggregate_empty(#[case] entries: &[SessionEntry], #[case] catalog: &[ExerciseRef]) {
        assert_eq!(aggregate(entries, catalog), EngagementSummary::default());
    }

    #[test]
    fn test_aggregate_ignores_unknown_exercise() {
        assert_eq!(
            aggregate(&[entry(1), entry(99)], &CATALOG),
            aggregate(&[entry(1)], &CATALOG)
        );
    }

    #[test]
    fn test_merge_server_replaces_fallback() {
        assert_eq!(
            merge(
                &summary(&[(Quads, 5)], &[(Calves, 2)]),
                &summary(&[(Quads, 1), (Glutes, 1)], &[(Calves, 1), (Abs, 1)])
            ),
            summary(&[(Quads, 5), (Glutes, 1)], &[(Calves, 2), (Abs, 1)])
        );
    }

    #[test]
    fn test_merge_primary_dominates_secondary() {
        assert_eq!(
            merge(
                &summary(&[(Abs, 1)], &[]),
                &summary(&[(Chest, 1)], &[(Abs, 3), (Triceps, 1)])
            ),
            summary(&[(Abs, 1), (Chest, 1)], &[(Triceps, 1)])
        );
        assert_eq!(
            merge(
                &summary(&[], &[(Chest, 2)]),
                &summary(&[(Chest, 1)], &[])
            ),
            summary(&[(Chest, 1)], &[])
        );
    }

    #[rstest]
    #[case::empty(summary(&[], &[]))]
    #[case::primary_only(summary(&[(Chest, 1), (Quads, 3)], &[]))]
    #[case::disjoint(summary(&[(Chest, 1)], &[(Triceps, 2), (Abs, 1)]))]
    fn test_merge_with_itself(#[case] summary: EngagementSummary) {
        assert!(summary.is_disjoint());
        assert_eq!(merge(&summary, &summary), summary);
    }

    #[test]
    fn test_merge_empty() {
        let fallback = summary(&[(Chest, 1)], &[(Chest, 1), (Triceps, 1)]);
        let server = summary(&[(Lats, 2)], &[(Biceps, 1)]);

        assert_eq!(
            merge(&EngagementSummary::default(), &fallback),
            summary(&[(Chest, 1)], &[(Triceps, 1)])
        );
        assert_eq!(merge(&server, &EngagementSummary::default()), server);
        assert_eq!(
            merge(&EngagementSummary::default(), &EngagementSummary::default()),
            EngagementSummary::default()
        );
    }

    #[test]
    fn test_summary_accessors() {
        let s = summary(&[(Chest, 3), (Quads, 1)], &[(Chest, 1), (Abs, 2)]);

        assert_eq!(s.max(Role::Primary), 3);
        assert_eq!(s.max(Role::Secondary), 2);
        assert_eq!(s.count(Quads, Role::Primary), 1);
        assert_eq!(s.count(Lats, Role::Primary), 0);
        assert_eq!(
            s.secondary_only().collect::<Vec<_>>(),
            vec![(&Abs, &2)]
        );
        assert!(!s.is_disjoint());
        assert!(!s.is_empty());
        assert_eq!(EngagementSummary::default().max(Role::Primary), 0);
        assert!(EngagementSummary::default().is_empty());
    }
}
