use crate::types::{DbId, Version};

/// Boxed source error coming from a storage backend.
pub type StorageSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Entity not found: no {entity} id given")]
    MissingId { entity: &'static str },

    #[error("Invalid search criterion: {field}")]
    InvalidCriteria { field: String },

    #[error("No {entity} matches the search criteria {criteria}")]
    NoMatch {
        entity: &'static str,
        criteria: String,
    },

    #[error("Invalid version token: {0}")]
    VersionInvalid(String),

    #[error("Version {attempted} is outdated")]
    VersionOutdated { attempted: Version },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[source] StorageSource),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap a backend error without losing its source chain.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }

    /// True for every variant a caller should treat as "not found".
    ///
    /// Search failures (unknown field, unparsable value, empty result) are
    /// reported as not-found so the read path has a single failure kind.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::MissingId { .. }
                | Self::InvalidCriteria { .. }
                | Self::NoMatch { .. }
        )
    }
}
