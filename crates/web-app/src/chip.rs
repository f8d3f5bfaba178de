use musclemap_domain::{EngagementSummary, MuscleTag, Role};

pub const EMPTY_NOTE: &str = "Add items to see muscles.";

/// Textual label of an engaged muscle, e.g. "lower back ×2".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub muscle: MuscleTag,
    pub role: Role,
    pub count: u32,
    pub text: String,
}

impl Chip {
    fn new(muscle: MuscleTag, role: Role, count: u32) -> Self {
        Self {
            muscle,
            role,
            count,
            text: format!("{} ×{count}", muscle.pretty()),
        }
    }
}

/// Create the chips for the primary and the secondary muscles.
///
/// Secondary muscles which are also primary get no chip.
#[must_use]
pub fn chips(summary: &EngagementSummary) -> (Vec<Chip>, Vec<Chip>) {
    (
        summary
            .primary
            .iter()
            .map(|(muscle, count)| Chip::new(*muscle, Role::Primary, *count))
            .collect(),
        summary
            .secondary_only()
            .map(|(muscle, count)| Chip::new(*muscle, Role::Secondary, *count))
            .collect(),
    )
}
