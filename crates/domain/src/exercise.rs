use std::{collections::HashSet, slice::Iter};

use derive_more::{Deref, Display, From};
use strum::{EnumString, IntoStaticStr};

use crate::{ReadError, search};

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self) -> Result<Vec<ExerciseRef>, ReadError>;
}

/// Catalog entry of an exercise.
///
/// The name is free text entered by the user or imported from an external
/// provider. It may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseRef {
    pub id: ExerciseID,
    pub name: String,
    pub category: Option<Category>,
}

#[derive(
    Deref, Display, From, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct ExerciseID(u32);

#[derive(EnumString, IntoStaticStr, Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Strength,
    Cardio,
    Mobility,
}

impl Property for Category {
    fn iter() -> Iter<'static, Category> {
        static CATEGORY: [Category; 3] = [Category::Strength, Category::Cardio, Category::Mobility];
        CATEGORY.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Category::Strength => "Strength",
            Category::Cardio => "Cardio",
            Category::Mobility => "Mobility",
        }
    }
}

impl Category {
    #[must_use]
    pub fn slug(self) -> &'static str {
        self.into()
    }
}

/// Filter over the local exercise catalog.
///
/// Every token of `name` must occur in the normalized exercise name. An empty
/// category set accepts all exercises, including those without a category.
#[derive(Default, PartialEq)]
pub struct ExerciseFilter {
    pub name: String,
    pub categories: HashSet<Category>,
}

impl ExerciseFilter {
    #[must_use]
    pub fn exercises<'a>(
        &self,
        exercises: impl Iterator<Item = &'a ExerciseRef>,
    ) -> Vec<&'a ExerciseRef> {
        exercises
            .filter(|e| {
                search::matches_all_tokens(&e.name, &self.name)
                    && (self.categories.is_empty()
                        || e.category.is_some_and(|c| self.categories.contains(&c)))
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() && self.categories.is_empty()
    }

    #[must_use]
    pub fn category_list(&self) -> Vec<(Category, bool)> {
        Category::iter()
            .map(|c| (*c, self.categories.contains(c)))
            .collect()
    }

    pub fn toggle_category(&mut self, category: Category) {
        if self.categories.contains(&category) {
            self.categories.remove(&category);
        } else {
            self.categories.insert(category);
        }
    }
}

pub trait Property: Clone + Copy + Sized {
    fn iter() -> Iter<'static, Self>;
    fn name(self) -> &'static str;
}
