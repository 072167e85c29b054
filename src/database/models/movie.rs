use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

/// Fields a client may never set; `id` is assigned by the store
const SYSTEM_FIELDS: &[&str] = &["id"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: i32,
    pub name: String,
    pub genre: String,
    pub rating: f64,
    pub explicit: bool,
}

/// A fully specified movie without its id, ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub name: String,
    pub genre: String,
    pub rating: f64,
    pub explicit: bool,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviePatch {
    pub name: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub explicit: Option<bool>,
}

/// Errors raised while turning client JSON into movie input
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MovieError {
    #[error("Expected a JSON object")]
    NotAnObject,
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("Invalid value for field '{field}': expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("Field '{0}' is assigned by the server and cannot be set")]
    SystemFieldNotAllowed(&'static str),
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

impl Movie {
    pub fn from_new(id: i32, new: NewMovie) -> Self {
        Self {
            id,
            name: new.name,
            genre: new.genre,
            rating: new.rating,
            explicit: new.explicit,
        }
    }

    /// Apply a partial update in place, leaving unspecified fields untouched
    pub fn apply(&mut self, patch: &MoviePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(genre) = &patch.genre {
            self.genre = genre.clone();
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(explicit) = patch.explicit {
            self.explicit = explicit;
        }
    }
}

impl NewMovie {
    pub fn new(name: impl Into<String>, genre: impl Into<String>, rating: f64, explicit: bool) -> Self {
        Self {
            name: name.into(),
            genre: genre.into(),
            rating,
            explicit,
        }
    }

    /// Build from a creation payload. Every field must be present and non-null.
    pub fn from_json(json: Value) -> Result<Self, MovieError> {
        let map = into_checked_object(json)?;
        let patch = MoviePatch::from_fields(&map, Presence::Required)?;

        Ok(Self {
            name: patch.name.ok_or(MovieError::MissingRequiredField("name"))?,
            genre: patch.genre.ok_or(MovieError::MissingRequiredField("genre"))?,
            rating: patch.rating.ok_or(MovieError::MissingRequiredField("rating"))?,
            explicit: patch.explicit.ok_or(MovieError::MissingRequiredField("explicit"))?,
        })
    }
}

impl MoviePatch {
    /// Build from an update payload. Any subset of fields is accepted; null is not.
    pub fn from_json(json: Value) -> Result<Self, MovieError> {
        let map = into_checked_object(json)?;
        Self::from_fields(&map, Presence::Optional)
    }

    fn from_fields(map: &Map<String, Value>, presence: Presence) -> Result<Self, MovieError> {
        Ok(Self {
            name: string_field(map, "name", presence)?,
            genre: string_field(map, "genre", presence)?,
            rating: field(map, "rating", "a number", presence, Value::as_f64)?,
            explicit: field(map, "explicit", "a boolean", presence, Value::as_bool)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
}

const MOVIE_FIELDS: &[&str] = &["name", "genre", "rating", "explicit"];

fn into_checked_object(json: Value) -> Result<Map<String, Value>, MovieError> {
    let Value::Object(map) = json else {
        return Err(MovieError::NotAnObject);
    };

    for key in map.keys() {
        if let Some(field) = SYSTEM_FIELDS.iter().find(|&&f| f == key.as_str()) {
            return Err(MovieError::SystemFieldNotAllowed(*field));
        }
        if !MOVIE_FIELDS.contains(&key.as_str()) {
            return Err(MovieError::UnknownField(key.clone()));
        }
    }

    Ok(map)
}

fn string_field(
    map: &Map<String, Value>,
    name: &'static str,
    presence: Presence,
) -> Result<Option<String>, MovieError> {
    let value = field(map, name, "a string", presence, |v| v.as_str().map(str::to_string))?;

    // TEXT columns cannot store NUL
    if value.as_deref().is_some_and(|s| s.contains('\0')) {
        return Err(MovieError::InvalidField {
            field: name,
            expected: "a string without NUL characters",
        });
    }
    Ok(value)
}

fn field<T>(
    map: &Map<String, Value>,
    name: &'static str,
    expected: &'static str,
    presence: Presence,
    extract: impl Fn(&Value) -> Option<T>,
) -> Result<Option<T>, MovieError> {
    match map.get(name) {
        // Null counts as missing on create; on update it would null a NOT NULL column
        None | Some(Value::Null) if presence == Presence::Required => {
            Err(MovieError::MissingRequiredField(name))
        }
        None => Ok(None),
        Some(value) => extract(value)
            .map(Some)
            .ok_or(MovieError::InvalidField { field: name, expected }),
    }
}

/// Identifier taken from a request path.
///
/// Parsing keeps the leading integer of the input (`"12abc"` is 12) and
/// rejects anything without leading digits or outside the column's range,
/// so malformed ids never reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovieId(pub i32);

impl MovieId {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let (negative, rest) = match trimmed.bytes().next() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 {
            return None;
        }

        let magnitude: i64 = rest[..digits_len].parse().ok()?;
        let value = if negative { -magnitude } else { magnitude };
        i32::try_from(value).ok().map(MovieId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_movie_from_complete_payload() {
        let movie = NewMovie::from_json(json!({
            "name": "Titanic",
            "genre": "Drama",
            "rating": 8,
            "explicit": true
        }))
        .unwrap();

        assert_eq!(movie, NewMovie::new("Titanic", "Drama", 8.0, true));
    }

    #[test]
    fn new_movie_reports_first_missing_field() {
        let err = NewMovie::from_json(json!({ "name": "Titanic" })).unwrap_err();
        assert_eq!(err, MovieError::MissingRequiredField("genre"));
        assert_eq!(err.to_string(), "Missing required field: genre");
    }

    #[test]
    fn new_movie_treats_null_as_missing() {
        let err = NewMovie::from_json(json!({
            "name": "Titanic",
            "genre": "Drama",
            "rating": null,
            "explicit": true
        }))
        .unwrap_err();
        assert_eq!(err, MovieError::MissingRequiredField("rating"));
    }

    #[test]
    fn new_movie_rejects_wrong_types() {
        let err = NewMovie::from_json(json!({
            "name": "Titanic",
            "genre": "Drama",
            "rating": "eight",
            "explicit": true
        }))
        .unwrap_err();
        assert_eq!(
            err,
            MovieError::InvalidField { field: "rating", expected: "a number" }
        );
    }

    #[test]
    fn client_cannot_set_id() {
        let err = NewMovie::from_json(json!({
            "id": 4,
            "name": "Titanic",
            "genre": "Drama",
            "rating": 8,
            "explicit": true
        }))
        .unwrap_err();
        assert_eq!(err, MovieError::SystemFieldNotAllowed("id"));

        let err = MoviePatch::from_json(json!({ "id": 5 })).unwrap_err();
        assert_eq!(err, MovieError::SystemFieldNotAllowed("id"));
    }

    #[test]
    fn rejects_unknown_fields_and_non_objects() {
        assert_eq!(
            MoviePatch::from_json(json!({ "director": "Cameron" })).unwrap_err(),
            MovieError::UnknownField("director".to_string())
        );
        assert_eq!(NewMovie::from_json(json!([1, 2])).unwrap_err(), MovieError::NotAnObject);
    }

    #[test]
    fn patch_accepts_any_subset() {
        let patch = MoviePatch::from_json(json!({ "rating": 9 })).unwrap();
        assert_eq!(patch.rating, Some(9.0));
        assert!(patch.name.is_none());

        let empty = MoviePatch::from_json(json!({})).unwrap();
        assert_eq!(empty, MoviePatch::default());
    }

    #[test]
    fn patch_rejects_null() {
        let err = MoviePatch::from_json(json!({ "name": null })).unwrap_err();
        assert_eq!(err, MovieError::InvalidField { field: "name", expected: "a string" });
    }

    #[test]
    fn strings_with_nul_are_rejected() {
        let expected = MovieError::InvalidField {
            field: "genre",
            expected: "a string without NUL characters",
        };
        let err = NewMovie::from_json(json!({
            "name": "Titanic",
            "genre": "Dra\u{0}ma",
            "rating": 8,
            "explicit": true
        }))
        .unwrap_err();
        assert_eq!(err, expected);

        let err = MoviePatch::from_json(json!({ "genre": "\u{0}" })).unwrap_err();
        assert_eq!(err, expected);
    }

    #[test]
    fn apply_only_touches_supplied_fields() {
        let mut movie = Movie::from_new(5, NewMovie::new("Jurassic Park", "Science Fiction", 9.0, true));
        movie.apply(&MoviePatch { rating: Some(7.5), ..Default::default() });

        assert_eq!(movie.rating, 7.5);
        assert_eq!(movie.name, "Jurassic Park");
        assert_eq!(movie.genre, "Science Fiction");
        assert!(movie.explicit);
    }

    #[test]
    fn movie_id_parses_leading_integer() {
        assert_eq!(MovieId::parse("42"), Some(MovieId(42)));
        assert_eq!(MovieId::parse(" 7 "), Some(MovieId(7)));
        assert_eq!(MovieId::parse("12abc"), Some(MovieId(12)));
        assert_eq!(MovieId::parse("-3"), Some(MovieId(-3)));
    }

    #[test]
    fn movie_id_rejects_garbage_and_overflow() {
        assert_eq!(MovieId::parse("abc"), None);
        assert_eq!(MovieId::parse(""), None);
        assert_eq!(MovieId::parse("-"), None);
        assert_eq!(MovieId::parse("99999999999"), None);
    }
}
