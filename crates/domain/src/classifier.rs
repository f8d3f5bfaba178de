//! Name-based muscle heuristics.
//!
//! Used as a fallback for exercises that have no muscle links on the server.
//! The rules are evaluated in order and the first matching rule determines
//! the result, so that specific movements (e.g. "leg curl") take precedence
//! over generic ones (e.g. "curl").

use std::sync::LazyLock;

use regex::RegexSet;

use crate::MuscleTag::{
    Abs, Biceps, Calves, Chest, FrontDelts, Glutes, Hams, Lats, LowerBack, Quads, SideDelts,
    Traps, Triceps,
};
use crate::{MuscleTag, Role};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MuscleGuess {
    pub primary: Vec<MuscleTag>,
    pub secondary: Vec<MuscleTag>,
}

impl MuscleGuess {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }

    #[must_use]
    pub fn muscles(&self, role: Role) -> &[MuscleTag] {
        match role {
            Role::Primary => &self.primary,
            Role::Secondary => &self.secondary,
        }
    }
}

pub struct Rule {
    pub pattern: &'static str,
    pub primary: &'static [MuscleTag],
    pub secondary: &'static [MuscleTag],
}

impl Rule {
    fn guess(&self) -> MuscleGuess {
        MuscleGuess {
            primary: self.primary.to_vec(),
            secondary: self.secondary.to_vec(),
        }
    }
}

pub static RULES: &[Rule] = &[
    // Legs
    Rule {
        pattern: r"(^|[^a-z])leg\s*press|hack\s*squat|smith\s*squat|front\s*squat|back\s*squat|goblet\s*squat|split\s*squat",
        primary: &[Quads, Glutes],
        secondary: &[Hams, Calves, Abs],
    },
    Rule {
        pattern: r"leg\s*extension",
        primary: &[Quads],
        secondary: &[Abs],
    },
    Rule {
        pattern: r"leg\s*curl|hamstring\s*curl",
        primary: &[Hams],
        secondary: &[Glutes, Calves],
    },
    Rule {
        pattern: r"calf\s*(raise|press)",
        primary: &[Calves],
        secondary: &[Hams],
    },
    Rule {
        pattern: r"hyperextension|back\s*extension",
        primary: &[LowerBack],
        secondary: &[Glutes, Hams],
    },
    // Chest, shoulders and arms
    Rule {
        pattern: r"bench|chest\s*press|push[- ]?up",
        primary: &[Chest],
        secondary: &[FrontDelts, Triceps, Abs],
    },
    Rule {
        pattern: r"overhead\s*press|shoulder\s*press|military\s*press",
        primary: &[FrontDelts, SideDelts],
        secondary: &[Triceps, Traps],
    },
    Rule {
        pattern: r"lateral\s*raise",
        primary: &[SideDelts],
        secondary: &[],
    },
    Rule {
        pattern: r"\bbiceps?\b.*curl|(^|[^a-z])curl\b",
        primary: &[Biceps],
        secondary: &[],
    },
    Rule {
        pattern: r"triceps?.*(extension|pushdown)|skull\s*crusher",
        primary: &[Triceps],
        secondary: &[],
    },
    // Back
    Rule {
        pattern: r"row|pulldown|pull[- ]?up|chin[- ]?up",
        primary: &[Lats],
        secondary: &[Biceps, Traps],
    },
    Rule {
        pattern: r"deadlift",
        primary: &[Hams, Glutes, LowerBack],
        secondary: &[Traps, Lats],
    },
    // Core
    Rule {
        pattern: r"\babs?\b|crunch|sit[- ]?up|plank",
        primary: &[Abs],
        secondary: &[],
    },
];

static RULE_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(RULES.iter().map(|r| r.pattern)).expect("valid rule patterns")
});

/// Guess the muscles trained by an exercise from its name.
#[must_use]
pub fn classify(exercise_name: &str) -> MuscleGuess {
    let name = exercise_name.to_lowercase();

    if name.trim().is_empty() {
        return MuscleGuess::default();
    }

    RULE_SET
        .matches(&name)
        .iter()
        .next()
        .map_or_else(MuscleGuess::default, |idx| RULES[idx].guess())
}
