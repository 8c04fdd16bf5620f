pub mod film;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /films                 list/search, create
/// /films/{id}            get, update (If-Match), delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/films", film::router())
}
