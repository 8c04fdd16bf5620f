//! Search criteria for film queries and the field whitelist that guards them.
//!
//! Criteria arrive as loosely typed `name -> value` string pairs (query
//! string, GraphQL-style input, ...). Only names listed in
//! [`SearchField::ALL`] are accepted.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// A searchable property of a film, addressed by its public name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchField {
    Id,
    Version,
    Title,
    Rating,
    Price,
    Discount,
    ReleaseDate,
    ImdbUrl,
    CreatedAt,
    UpdatedAt,
    Provider,
    /// Comma-separated list compared with the whole stored list.
    Genres,
    /// The studio relation; matched by case-insensitive substring on its name.
    Studio,
    /// The producer relation. Accepted, but no film ever matches on it.
    Producers,
}

impl SearchField {
    pub const ALL: [SearchField; 14] = [
        SearchField::Id,
        SearchField::Version,
        SearchField::Title,
        SearchField::Rating,
        SearchField::Price,
        SearchField::Discount,
        SearchField::ReleaseDate,
        SearchField::ImdbUrl,
        SearchField::CreatedAt,
        SearchField::UpdatedAt,
        SearchField::Provider,
        SearchField::Genres,
        SearchField::Studio,
        SearchField::Producers,
    ];

    /// Public name used in criteria maps and JSON.
    pub fn name(self) -> &'static str {
        match self {
            SearchField::Id => "id",
            SearchField::Version => "version",
            SearchField::Title => "titel",
            SearchField::Rating => "bewertung",
            SearchField::Price => "preis",
            SearchField::Discount => "rabatt",
            SearchField::ReleaseDate => "veroeffentlichungsdatum",
            SearchField::ImdbUrl => "imdbEintrag",
            SearchField::CreatedAt => "erzeugt",
            SearchField::UpdatedAt => "aktualisiert",
            SearchField::Provider => "anbieter",
            SearchField::Genres => "genres",
            SearchField::Studio => "produktionsstudio",
            SearchField::Producers => "produzenten",
        }
    }

    /// Look up a field by its public name.
    pub fn from_name(name: &str) -> Option<Self> {
        WHITELIST.get(name).copied()
    }

    /// Whether this field is matched by substring instead of equality.
    pub fn is_substring_match(self) -> bool {
        self == SearchField::Studio
    }
}

impl std::fmt::Display for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Name -> field table, built once on first use.
static WHITELIST: LazyLock<HashMap<&'static str, SearchField>> =
    LazyLock::new(|| SearchField::ALL.iter().map(|f| (f.name(), *f)).collect());

/// Raw search criteria: public field name -> unparsed value.
///
/// Keys are kept sorted so the equality clauses built from them come out in
/// a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchCriteria(BTreeMap<String, String>);

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and programmatic callers.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First key that is not a searchable field, if any.
    pub fn first_unknown_key(&self) -> Option<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .find(|key| SearchField::from_name(key).is_none())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchCriteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl std::fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| std::fmt::Error)?;
        f.write_str(&json)
    }
}

/// Check that every key of `criteria` names a searchable field.
///
/// An empty map is valid and means "no filter".
pub fn validate_criteria(criteria: &SearchCriteria) -> bool {
    match criteria.first_unknown_key() {
        Some(key) => {
            tracing::debug!(key, "Unknown search criterion");
            false
        }
        None => true,
    }
}
