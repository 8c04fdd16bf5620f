//! Rendering of film predicates into SQL `WHERE` clauses.
//!
//! The first condition opens the clause with `WHERE`, every further one is
//! joined with `AND`. Values are never spliced into the SQL text; they are
//! returned as bind parameters in placeholder order.

use std::fmt::Write;

use filmdb_core::predicate::{Predicate, Value};
use filmdb_core::search::SearchField;

/// SQL flavour to render for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    Postgres,
    Sqlite,
}

impl SqlDialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            SqlDialect::Postgres => format!("${index}"),
            SqlDialect::Sqlite => "?".to_string(),
        }
    }

    /// Case-insensitive pattern match. SQLite's `LIKE` already folds ASCII case.
    fn contains_operator(self) -> &'static str {
        match self {
            SqlDialect::Postgres => "ILIKE",
            SqlDialect::Sqlite => "LIKE",
        }
    }
}

/// A rendered `WHERE` clause (empty when unfiltered) and its bind values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFilter {
    pub clause: String,
    pub binds: Vec<Value>,
}

/// Qualified column for a search field. `f` is `film`, `s` is `studio`.
///
/// Producers live in their own table and have no column to compare.
pub fn column(field: SearchField) -> Option<&'static str> {
    let column = match field {
        SearchField::Id => "f.id",
        SearchField::Version => "f.version",
        SearchField::Title => "f.title",
        SearchField::Rating => "f.rating",
        SearchField::Price => "f.price",
        SearchField::Discount => "f.discount",
        SearchField::ReleaseDate => "f.release_date",
        SearchField::ImdbUrl => "f.imdb_url",
        SearchField::CreatedAt => "f.created_at",
        SearchField::UpdatedAt => "f.updated_at",
        SearchField::Provider => "f.provider",
        SearchField::Genres => "f.genres",
        SearchField::Studio => "s.name",
        SearchField::Producers => return None,
    };
    Some(column)
}

/// Turn a substring into a `LIKE` pattern that matches it literally.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Condition no row satisfies.
const NEVER: &str = "1 = 0";

/// Render `predicate` for `dialect`. `None` renders an empty clause.
pub fn render_filter(predicate: Option<&Predicate>, dialect: SqlDialect) -> SqlFilter {
    let mut filter = SqlFilter::default();
    let Some(predicate) = predicate else {
        return filter;
    };

    for (index, condition) in predicate.conditions().into_iter().enumerate() {
        filter
            .clause
            .push_str(if index == 0 { " WHERE " } else { " AND " });
        render_leaf(&mut filter, condition, dialect);
    }
    filter
}

fn render_leaf(filter: &mut SqlFilter, condition: &Predicate, dialect: SqlDialect) {
    match condition {
        Predicate::Eq { field, value } => match column(*field) {
            Some(column) => {
                filter.binds.push(value.clone());
                let _ = write!(
                    filter.clause,
                    "{column} = {}",
                    dialect.placeholder(filter.binds.len())
                );
            }
            None => filter.clause.push_str(NEVER),
        },
        Predicate::Contains { field, needle } => match column(*field) {
            Some(column) => {
                filter.binds.push(Value::Text(contains_pattern(needle)));
                let _ = write!(
                    filter.clause,
                    "{column} {} {} ESCAPE '\\'",
                    dialect.contains_operator(),
                    dialect.placeholder(filter.binds.len())
                );
            }
            None => filter.clause.push_str(NEVER),
        },
        Predicate::Never { .. } => filter.clause.push_str(NEVER),
        Predicate::And(_) => unreachable!("Predicate::conditions yields only leaves"),
    }
}

#[cfg(test)]
mod tests {
    use filmdb_core::predicate::build_predicate;
    use filmdb_core::search::SearchCriteria;

    use super::*;

    fn render(criteria: SearchCriteria, dialect: SqlDialect) -> SqlFilter {
        let predicate = build_predicate(&criteria).unwrap();
        render_filter(predicate.as_ref(), dialect)
    }

    #[test]
    fn no_predicate_renders_nothing() {
        assert_eq!(render_filter(None, SqlDialect::Postgres), SqlFilter::default());
    }

    #[test]
    fn first_equality_opens_where() {
        let filter = render(
            SearchCriteria::new()
                .with("bewertung", "3")
                .with("titel", "Arrival"),
            SqlDialect::Postgres,
        );
        assert_eq!(filter.clause, " WHERE f.rating = $1 AND f.title = $2");
        assert_eq!(
            filter.binds,
            vec![Value::Int(3), Value::Text("Arrival".to_string())]
        );
    }

    #[test]
    fn studio_substring_comes_first_with_ilike() {
        let filter = render(
            SearchCriteria::new()
                .with("bewertung", "5")
                .with("produktionsstudio", "Bros"),
            SqlDialect::Postgres,
        );
        assert_eq!(
            filter.clause,
            " WHERE s.name ILIKE $1 ESCAPE '\\' AND f.rating = $2"
        );
        assert_eq!(filter.binds[0], Value::Text("%Bros%".to_string()));
    }

    #[test]
    fn sqlite_uses_like_and_positional_placeholders() {
        let filter = render(
            SearchCriteria::new()
                .with("produktionsstudio", "bros")
                .with("anbieter", "AMAZON"),
            SqlDialect::Sqlite,
        );
        assert_eq!(
            filter.clause,
            " WHERE s.name LIKE ? ESCAPE '\\' AND f.provider = ?"
        );
        assert_eq!(
            filter.binds,
            vec![
                Value::Text("%bros%".to_string()),
                Value::Text("AMAZON".to_string())
            ]
        );
    }

    #[test]
    fn wildcards_in_needle_match_literally() {
        assert_eq!(contains_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }

    #[test]
    fn every_field_but_producers_has_a_column() {
        for field in SearchField::ALL {
            match column(field) {
                Some(col) => assert!(col.starts_with("f.") || col.starts_with("s."), "{col}"),
                None => assert_eq!(field, SearchField::Producers),
            }
        }
    }

    #[test]
    fn genres_compare_against_the_whole_array() {
        let filter = render(
            SearchCriteria::new().with("genres", "SCIFI,DRAMA"),
            SqlDialect::Postgres,
        );
        assert_eq!(filter.clause, " WHERE f.genres = $1");
        assert_eq!(
            filter.binds,
            vec![Value::TextList(vec!["SCIFI".to_string(), "DRAMA".to_string()])]
        );
    }

    #[test]
    fn producer_criterion_renders_a_false_condition() {
        let filter = render(
            SearchCriteria::new()
                .with("bewertung", "5")
                .with("produzenten", "Levy"),
            SqlDialect::Postgres,
        );
        assert_eq!(filter.clause, " WHERE f.rating = $1 AND 1 = 0");
        assert_eq!(filter.binds, vec![Value::Int(5)]);

        let alone = render(SearchCriteria::new().with("produzenten", "Levy"), SqlDialect::Sqlite);
        assert_eq!(alone.clause, " WHERE 1 = 0");
        assert!(alone.binds.is_empty());
    }

    #[test]
    #[should_panic(expected = "only leaves")]
    fn nested_conjunctions_are_never_rendered_directly() {
        let nested = Predicate::And(vec![]);
        let mut filter = SqlFilter::default();
        render_leaf(&mut filter, &nested, SqlDialect::Postgres);
    }
}
