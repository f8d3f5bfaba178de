use std::{fmt, slice::Iter};

use strum::{EnumString, IntoStaticStr};

use crate::Property;

/// Muscle groups known to the heatmap.
///
/// The slugs are shared with the server, which reports muscle summaries keyed
/// by the same identifiers.
#[derive(EnumString, IntoStaticStr, Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[strum(serialize_all = "snake_case")]
pub enum MuscleTag {
    // Chest
    Chest,
    // Shoulders
    FrontDelts,
    SideDelts,
    // Upper arms
    Biceps,
    Triceps,
    // Back
    Traps,
    Lats,
    LowerBack,
    // Waist
    Abs,
    // Hips
    Glutes,
    // Thighs
    Quads,
    Hams,
    // Calves
    Calves,
}

impl Property for MuscleTag {
    fn iter() -> Iter<'static, MuscleTag> {
        static MUSCLES: [MuscleTag; 13] = [
            MuscleTag::Chest,
            MuscleTag::FrontDelts,
            MuscleTag::SideDelts,
            MuscleTag::Biceps,
            MuscleTag::Triceps,
            MuscleTag::Traps,
            MuscleTag::Lats,
            MuscleTag::LowerBack,
            MuscleTag::Abs,
            MuscleTag::Glutes,
            MuscleTag::Quads,
            MuscleTag::Hams,
            MuscleTag::Calves,
        ];
        MUSCLES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            MuscleTag::Chest => "Chest",
            MuscleTag::FrontDelts => "Front Delts",
            MuscleTag::SideDelts => "Side Delts",
            MuscleTag::Biceps => "Biceps",
            MuscleTag::Triceps => "Triceps",
            MuscleTag::Traps => "Trapezius",
            MuscleTag::Lats => "Lats / Back",
            MuscleTag::LowerBack => "Lower Back",
            MuscleTag::Abs => "Abs / Core",
            MuscleTag::Glutes => "Glutes",
            MuscleTag::Quads => "Quads",
            MuscleTag::Hams => "Hamstrings",
            MuscleTag::Calves => "Calves",
        }
    }
}

impl MuscleTag {
    #[must_use]
    pub fn slug(self) -> &'static str {
        self.into()
    }

    /// Slug with underscores replaced by spaces, as shown on chips.
    #[must_use]
    pub fn pretty(self) -> String {
        self.slug().replace('_', " ")
    }

    pub fn from_slug(slug: &str) -> Result<Self, MuscleTagError> {
        slug.parse()
            .map_err(|_| MuscleTagError::Unknown(slug.to_string()))
    }
}

impl fmt::Display for MuscleTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MuscleTagError {
    #[error("Unknown muscle \"{0}\"")]
    Unknown(String),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Role {
    Primary,
    Secondary,
}

impl Property for Role {
    fn iter() -> Iter<'static, Role> {
        static ROLES: [Role; 2] = [Role::Primary, Role::Secondary];
        ROLES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::Secondary => "secondary",
        }
    }
}
