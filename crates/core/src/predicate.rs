//! Typed filter predicates for film queries.
//!
//! [`build_predicate`] compiles [`SearchCriteria`] into a small tree of
//! equality, substring, never-true and AND nodes. Storage adapters render that tree into
//! their own query syntax; [`Predicate::matches`] evaluates it in memory with
//! the same semantics.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::film::{Film, StreamingProvider};
use crate::search::{SearchCriteria, SearchField};
use crate::types::{DbId, Timestamp, Version};

/// A typed comparison value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    BigInt(i64),
    Int(i32),
    Float(f64),
    Text(String),
    /// Whole-list value, compared element by element in order.
    TextList(Vec<String>),
    Date(NaiveDate),
    Timestamp(Timestamp),
}

/// A boolean condition over film fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field = value`
    Eq { field: SearchField, value: Value },
    /// Case-insensitive containment of `needle` in `field`.
    Contains { field: SearchField, needle: String },
    /// A criterion on `field` that no film can satisfy.
    Never { field: SearchField },
    /// All conditions hold. Never nested; see [`Predicate::and`].
    And(Vec<Predicate>),
}

impl Predicate {
    /// Conjoin two predicates, keeping `self`'s conditions first.
    pub fn and(self, other: Predicate) -> Predicate {
        let mut conditions = self.into_conditions();
        conditions.extend(other.into_conditions());
        Predicate::And(conditions)
    }

    /// The leaf conditions in evaluation order.
    pub fn conditions(&self) -> Vec<&Predicate> {
        match self {
            Predicate::And(parts) => parts.iter().flat_map(Predicate::conditions).collect(),
            leaf => vec![leaf],
        }
    }

    fn into_conditions(self) -> Vec<Predicate> {
        match self {
            Predicate::And(parts) => parts
                .into_iter()
                .flat_map(Predicate::into_conditions)
                .collect(),
            leaf => vec![leaf],
        }
    }

    /// Evaluate against an in-memory film.
    pub fn matches(&self, film: &Film) -> bool {
        match self {
            Predicate::And(parts) => parts.iter().all(|p| p.matches(film)),
            Predicate::Contains { field, needle } => match text_of(*field, film) {
                Some(haystack) => haystack.to_lowercase().contains(&needle.to_lowercase()),
                None => false,
            },
            Predicate::Eq { field, value } => field_value(*field, film).as_ref() == Some(value),
            Predicate::Never { .. } => false,
        }
    }
}

fn text_of(field: SearchField, film: &Film) -> Option<String> {
    match field_value(field, film)? {
        Value::Text(text) => Some(text),
        _ => None,
    }
}

/// The current value of `field` on `film`, in the same shape the builder parses.
fn field_value(field: SearchField, film: &Film) -> Option<Value> {
    match field {
        SearchField::Id => Some(Value::BigInt(film.id)),
        SearchField::Version => Some(Value::Int(film.version)),
        SearchField::Title => Some(Value::Text(film.title.clone())),
        SearchField::Rating => film.rating.map(Value::Int),
        SearchField::Price => Some(Value::Float(film.price)),
        SearchField::Discount => film.discount.map(Value::Float),
        SearchField::ReleaseDate => film.release_date.map(Value::Date),
        SearchField::ImdbUrl => film.imdb_url.clone().map(Value::Text),
        SearchField::CreatedAt => Some(Value::Timestamp(film.created_at)),
        SearchField::UpdatedAt => Some(Value::Timestamp(film.updated_at)),
        SearchField::Provider => film.provider.map(|p| Value::Text(p.as_str().to_string())),
        SearchField::Genres => film.genres.clone().map(Value::TextList),
        SearchField::Studio => film.studio.as_ref().map(|s| Value::Text(s.name.clone())),
        SearchField::Producers => None,
    }
}

/// Parse a raw criterion value into the type of `field`.
fn parse_value(field: SearchField, raw: &str) -> Result<Value, CoreError> {
    let invalid = || CoreError::InvalidCriteria {
        field: field.name().to_string(),
    };
    let value = match field {
        SearchField::Id => Value::BigInt(raw.parse::<DbId>().map_err(|_| invalid())?),
        SearchField::Version => Value::Int(raw.parse::<Version>().map_err(|_| invalid())?),
        SearchField::Rating => Value::Int(raw.parse::<i32>().map_err(|_| invalid())?),
        SearchField::Price | SearchField::Discount => {
            let number = raw.parse::<f64>().map_err(|_| invalid())?;
            if !number.is_finite() {
                return Err(invalid());
            }
            Value::Float(number)
        }
        SearchField::ReleaseDate => Value::Date(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?,
        ),
        SearchField::CreatedAt | SearchField::UpdatedAt => Value::Timestamp(
            chrono::DateTime::parse_from_rfc3339(raw)
                .map_err(|_| invalid())?
                .with_timezone(&chrono::Utc),
        ),
        SearchField::Provider => {
            let provider = raw.parse::<StreamingProvider>().map_err(|_| invalid())?;
            Value::Text(provider.as_str().to_string())
        }
        SearchField::Genres => Value::TextList(parse_list(raw)),
        SearchField::Title
        | SearchField::ImdbUrl
        | SearchField::Studio
        | SearchField::Producers => Value::Text(raw.to_string()),
    };
    Ok(value)
}

/// Split a comma-separated list. An empty string is the empty list.
fn parse_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|item| item.trim().to_string()).collect()
}

/// Compile criteria into a predicate.
///
/// Returns `Ok(None)` for empty criteria. The studio substring condition, if
/// present, comes first; equality conditions follow in key order. A
/// `produzenten` criterion has nothing to compare against and becomes
/// [`Predicate::Never`]. Unknown keys and values that do not parse for their
/// field fail with [`CoreError::InvalidCriteria`].
pub fn build_predicate(criteria: &SearchCriteria) -> Result<Option<Predicate>, CoreError> {
    let mut substring = None;
    let mut equalities = Vec::new();

    for (name, raw) in criteria.iter() {
        let field = SearchField::from_name(name).ok_or_else(|| CoreError::InvalidCriteria {
            field: name.to_string(),
        })?;
        if field.is_substring_match() {
            substring = Some(Predicate::Contains {
                field,
                needle: raw.to_string(),
            });
        } else if field == SearchField::Producers {
            equalities.push(Predicate::Never { field });
        } else {
            equalities.push(Predicate::Eq {
                field,
                value: parse_value(field, raw)?,
            });
        }
    }

    let predicate = substring
        .into_iter()
        .chain(equalities)
        .reduce(Predicate::and);
    tracing::debug!(?predicate, "Built film predicate");
    Ok(predicate)
}
