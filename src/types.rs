//! Shared input types for the social image generator.
//!
//! Words come from the dataset directory (see [`crate::words`]); pages come
//! from the `[[pages]]` tables in `social.toml`.

use serde::{Deserialize, Serialize};

/// One word of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// The word as stored in the dataset.
    pub word: String,
    /// Compact `YYYYMMDD` date the word was featured.
    pub date: String,
    /// Keep the headline's original casing (proper nouns, acronyms).
    #[serde(default)]
    pub preserve_case: bool,
}

/// A generic site page that gets a social card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageEntry {
    /// Site path, e.g. `stats` or `words/browse`. Empty for the home page.
    pub path: String,
    /// Headline text.
    pub title: String,
    /// Optional line under the site title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}
