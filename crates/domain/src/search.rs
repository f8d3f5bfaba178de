use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::{MuscleGuess, MuscleTag, SearchError};

#[allow(async_fn_in_trait)]
pub trait ExternalExerciseRepository {
    async fn search_exercises(&self, query: &str) -> Result<Vec<ExternalExercise>, SearchError>;
    async fn browse_exercises(
        &self,
        muscle: Option<MuscleTag>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ExternalExercise>, SearchError>;
}

/// Exercise offered by an external provider, not yet imported into the
/// local catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalExercise {
    pub name: String,
    pub category: Option<String>,
    pub muscles: MuscleGuess,
}

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]+").expect("valid pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid pattern"));

/// Fold accents, lower-case the text, replace punctuation by spaces and
/// collapse whitespace.
#[must_use]
pub fn normalize(text: &str) -> String {
    let lower = text
        .nfkd()
        .filter(|c| !is_combining_diacritic(*c))
        .collect::<String>()
        .to_lowercase();
    let without_punctuation = NON_WORD.replace_all(&lower, " ");
    WHITESPACE
        .replace_all(&without_punctuation, " ")
        .trim()
        .to_string()
}

/// Split normalized text into naively singularized tokens.
#[must_use]
pub fn tokens(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(singular)
        .collect()
}

/// Key under which results for equivalent queries are cached.
#[must_use]
pub fn query_key(query: &str) -> String {
    tokens(query).join(" ")
}

/// Check that every token of the query occurs in the name.
#[must_use]
pub fn matches_all_tokens(name: &str, query: &str) -> bool {
    let name = normalize(name);
    tokens(query).iter().all(|t| name.contains(t.as_str()))
}

fn is_combining_diacritic(c: char) -> bool {
    ('\u{300}'..='\u{36f}').contains(&c)
}

fn singular(token: &str) -> String {
    let len = token.chars().count();
    if len > 3 && token.ends_with("es") {
        let stem = &token[..token.len() - 2];
        if stem
            .chars()
            .last()
            .is_some_and(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
        {
            return stem.to_string();
        }
    }
    if len > 3 && token.ends_with('s') {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}
