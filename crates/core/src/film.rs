//! Film aggregate: a film, its studio and its producers.
//!
//! These are plain records. Storage backends map their rows into them and the
//! services in [`crate::finder`] and [`crate::writer`] operate on them. Serde
//! names follow the public JSON representation (`titel`, `bewertung`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp, Version};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Entity name used in error messages.
pub const FILM_ENTITY: &str = "Film";

/// Highest allowed rating.
pub const MAX_RATING: i32 = 5;

/// Maximum length of a film title in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length of studio and producer names in characters.
pub const MAX_NAME_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Streaming provider
// ---------------------------------------------------------------------------

/// Streaming service a film is offered on. Stored as its uppercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StreamingProvider {
    Netflix,
    Amazon,
    Paramount,
    Disney,
}

impl StreamingProvider {
    pub const ALL: [StreamingProvider; 4] = [
        StreamingProvider::Netflix,
        StreamingProvider::Amazon,
        StreamingProvider::Paramount,
        StreamingProvider::Disney,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StreamingProvider::Netflix => "NETFLIX",
            StreamingProvider::Amazon => "AMAZON",
            StreamingProvider::Paramount => "PARAMOUNT",
            StreamingProvider::Disney => "DISNEY",
        }
    }
}

impl std::fmt::Display for StreamingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StreamingProvider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown streaming provider: {s}")))
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The studio that produced a film. Owned by exactly one film.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Studio {
    pub id: DbId,
    pub name: String,
    #[serde(skip)]
    pub film_id: DbId,
}

/// A producer credited on a film. Owned by exactly one film.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Producer {
    pub id: DbId,
    #[serde(rename = "vorname")]
    pub first_name: String,
    #[serde(rename = "nachname")]
    pub last_name: String,
    #[serde(skip)]
    pub film_id: DbId,
}

/// A persisted film.
///
/// `studio` is always `Some` for films read through a store. `producers` is
/// `Some` only when they were requested. `genres` can come back `None` from
/// storage; readers call [`Film::normalize_genres`] before handing it out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Film {
    pub id: DbId,
    pub version: Version,
    #[serde(rename = "titel")]
    pub title: String,
    #[serde(rename = "bewertung")]
    pub rating: Option<i32>,
    #[serde(rename = "preis")]
    pub price: f64,
    #[serde(rename = "rabatt")]
    pub discount: Option<f64>,
    #[serde(rename = "veroeffentlichungsdatum")]
    pub release_date: Option<NaiveDate>,
    #[serde(rename = "imdbEintrag")]
    pub imdb_url: Option<String>,
    #[serde(rename = "erzeugt")]
    pub created_at: Timestamp,
    #[serde(rename = "aktualisiert")]
    pub updated_at: Timestamp,
    pub genres: Option<Vec<String>>,
    #[serde(rename = "anbieter")]
    pub provider: Option<StreamingProvider>,
    #[serde(rename = "produktionsstudio")]
    pub studio: Option<Studio>,
    #[serde(rename = "produzenten", skip_serializing_if = "Option::is_none")]
    pub producers: Option<Vec<Producer>>,
}

impl Film {
    /// Replace a missing genre list with an empty one.
    pub fn normalize_genres(&mut self) {
        self.genres.get_or_insert_with(Vec::new);
    }

    /// Apply the present fields of `changes` onto this record.
    ///
    /// Identity, version, timestamps, studio and producers are never touched.
    pub fn merge(&mut self, changes: FilmUpdate) {
        let FilmUpdate {
            title,
            rating,
            price,
            discount,
            release_date,
            imdb_url,
            genres,
            provider,
        } = changes;

        if let Some(title) = title {
            self.title = title;
        }
        if rating.is_some() {
            self.rating = rating;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if discount.is_some() {
            self.discount = discount;
        }
        if release_date.is_some() {
            self.release_date = release_date;
        }
        if imdb_url.is_some() {
            self.imdb_url = imdb_url;
        }
        if genres.is_some() {
            self.genres = genres;
        }
        if provider.is_some() {
            self.provider = provider;
        }
    }
}

// ---------------------------------------------------------------------------
// Write DTOs
// ---------------------------------------------------------------------------

/// Studio data supplied when creating a film.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudio {
    pub name: String,
}

/// Producer data supplied when creating a film.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProducer {
    #[serde(rename = "vorname")]
    pub first_name: String,
    #[serde(rename = "nachname")]
    pub last_name: String,
}

/// A film to be created together with its studio and producers.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFilm {
    #[serde(rename = "titel")]
    pub title: String,
    #[serde(rename = "bewertung")]
    pub rating: Option<i32>,
    #[serde(rename = "preis")]
    pub price: f64,
    #[serde(rename = "rabatt")]
    pub discount: Option<f64>,
    #[serde(rename = "veroeffentlichungsdatum")]
    pub release_date: Option<NaiveDate>,
    #[serde(rename = "imdbEintrag")]
    pub imdb_url: Option<String>,
    pub genres: Option<Vec<String>>,
    #[serde(rename = "anbieter")]
    pub provider: Option<StreamingProvider>,
    #[serde(rename = "produktionsstudio")]
    pub studio: NewStudio,
    #[serde(rename = "produzenten", default)]
    pub producers: Vec<NewProducer>,
}

/// Scalar changes for an existing film. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilmUpdate {
    #[serde(rename = "titel")]
    pub title: Option<String>,
    #[serde(rename = "bewertung")]
    pub rating: Option<i32>,
    #[serde(rename = "preis")]
    pub price: Option<f64>,
    #[serde(rename = "rabatt")]
    pub discount: Option<f64>,
    #[serde(rename = "veroeffentlichungsdatum")]
    pub release_date: Option<NaiveDate>,
    #[serde(rename = "imdbEintrag")]
    pub imdb_url: Option<String>,
    pub genres: Option<Vec<String>>,
    #[serde(rename = "anbieter")]
    pub provider: Option<StreamingProvider>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a title: non-empty and within the length limit.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a rating: between 0 and [`MAX_RATING`] inclusive.
pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if !(0..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between 0 and {MAX_RATING} (got {rating})"
        )));
    }
    Ok(())
}

/// Validate a price: finite and strictly positive.
pub fn validate_price(price: f64) -> Result<(), CoreError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Price must be positive (got {price})"
        )));
    }
    Ok(())
}

/// Validate a discount: a fraction in `[0, 1)`.
pub fn validate_discount(discount: f64) -> Result<(), CoreError> {
    if !(0.0..1.0).contains(&discount) {
        return Err(CoreError::Validation(format!(
            "Discount must be at least 0 and below 1 (got {discount})"
        )));
    }
    Ok(())
}

/// Validate an IMDb reference: an http(s) URL.
pub fn validate_imdb_url(url: &str) -> Result<(), CoreError> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(CoreError::Validation(format!(
            "IMDb reference must be an http(s) URL (got {url})"
        )));
    }
    Ok(())
}

fn validate_name(label: &str, name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!("{label} must not be empty")));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{label} exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a complete film before it is created.
pub fn validate_new_film(film: &NewFilm) -> Result<(), CoreError> {
    validate_title(&film.title)?;
    if let Some(rating) = film.rating {
        validate_rating(rating)?;
    }
    validate_price(film.price)?;
    if let Some(discount) = film.discount {
        validate_discount(discount)?;
    }
    if let Some(url) = &film.imdb_url {
        validate_imdb_url(url)?;
    }
    validate_name("Studio name", &film.studio.name)?;
    for producer in &film.producers {
        validate_name("Producer first name", &producer.first_name)?;
        validate_name("Producer last name", &producer.last_name)?;
    }
    Ok(())
}

/// Validate the fields present in an update.
pub fn validate_update(changes: &FilmUpdate) -> Result<(), CoreError> {
    if let Some(title) = &changes.title {
        validate_title(title)?;
    }
    if let Some(rating) = changes.rating {
        validate_rating(rating)?;
    }
    if let Some(price) = changes.price {
        validate_price(price)?;
    }
    if let Some(discount) = changes.discount {
        validate_discount(discount)?;
    }
    if let Some(url) = &changes.imdb_url {
        validate_imdb_url(url)?;
    }
    Ok(())
}
