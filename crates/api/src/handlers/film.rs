//! Handlers for the `/films` resource.
//!
//! Reads carry the film version as an `ETag`; updates must send it back in
//! `If-Match`.

use axum::extract::{Path, Query, State};
use axum::http::header::{ETAG, IF_MATCH, IF_NONE_MATCH, LOCATION};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use filmdb_core::error::CoreError;
use filmdb_core::film::{Film, FilmUpdate, NewFilm};
use filmdb_core::search::SearchCriteria;
use filmdb_core::types::DbId;
use filmdb_core::versioning::etag;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for a single-film lookup.
#[derive(Debug, Default, Deserialize)]
pub struct FilmByIdQuery {
    /// Also load the producers.
    #[serde(default)]
    pub produzenten: bool,
}

/// GET /api/v1/films/{id}
///
/// Answers `304 Not Modified` if `If-None-Match` carries the current ETag.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(query): Query<FilmByIdQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let film = state.films.find_by_id(id, query.produzenten).await?;
    let tag = etag(film.version);

    let unchanged = headers
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == tag);
    if unchanged {
        return Ok((StatusCode::NOT_MODIFIED, [(ETAG, tag)]).into_response());
    }

    Ok(([(ETAG, tag)], Json(DataResponse { data: film })).into_response())
}

/// GET /api/v1/films
///
/// Every query parameter is a search criterion. A request without a query
/// string lists all films.
pub async fn list(
    State(state): State<AppState>,
    uri: Uri,
) -> AppResult<Json<DataResponse<Vec<Film>>>> {
    let criteria = match uri.query() {
        None => None,
        Some(_) => {
            let Query(criteria) = Query::<SearchCriteria>::try_from_uri(&uri)
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Some(criteria)
        }
    };
    let films = state.films.find(criteria.as_ref()).await?;
    Ok(Json(DataResponse { data: films }))
}

/// POST /api/v1/films
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewFilm>,
) -> AppResult<impl IntoResponse> {
    let id = state.film_writer.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/api/v1/films/{id}"))],
    ))
}

/// PUT /api/v1/films/{id}
///
/// Requires `If-Match` with the version last read. Responds `204` with the
/// new ETag.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    headers: HeaderMap,
    Json(changes): Json<FilmUpdate>,
) -> AppResult<impl IntoResponse> {
    let token = headers
        .get(IF_MATCH)
        .ok_or_else(|| AppError::PreconditionRequired("If-Match header missing".to_string()))?
        .to_str()
        .map_err(|_| CoreError::VersionInvalid("<non-ascii>".to_string()))?;

    let version = state.film_writer.update(Some(id), token, changes).await?;
    Ok((StatusCode::NO_CONTENT, [(ETAG, etag(version))]))
}

/// DELETE /api/v1/films/{id}
///
/// Succeeds whether or not the film existed.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.film_writer.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
