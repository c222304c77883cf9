use crate::cover::CoverUpload;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_YEAR: i32 = 2025;

/// A row of the catalog table, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub title: String,
    pub genre: String,
    /// Display size, e.g. "1.2 GB".
    pub size: String,
    pub rating: f64,
    /// Display string, written once as "0".
    pub downloads: String,
    pub year: i32,
    pub cover_url: Option<String>,
    pub tag: String,
    pub is_new: bool,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A validated game ready to be inserted. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGame {
    pub title: String,
    pub genre: String,
    pub size: String,
    pub rating: f64,
    pub year: i32,
    pub tag: String,
    pub is_new: bool,
    pub description: String,
    pub cover_url: Option<String>,
    pub downloads: String,
}

impl NewGame {
    pub const INITIAL_DOWNLOADS: &'static str = "0";

    /// Materializes the row a store would hold after inserting this game.
    pub fn into_game(self, id: i64, created_at: DateTime<Utc>) -> Game {
        Game {
            id,
            title: self.title,
            genre: self.genre,
            size: self.size,
            rating: self.rating,
            downloads: self.downloads,
            year: self.year,
            cover_url: self.cover_url,
            tag: self.tag,
            is_new: self.is_new,
            description: self.description,
            created_at,
        }
    }
}

/// The raw body of a create request.
///
/// Every field is optional and kept as loose JSON so that type mistakes turn
/// into [`ValidationError`]s instead of deserializer rejections.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CreateGameRequest {
    pub title: Option<Value>,
    pub genre: Option<Value>,
    pub size: Option<Value>,
    pub rating: Option<Value>,
    pub year: Option<Value>,
    pub tag: Option<Value>,
    pub is_new: Option<Value>,
    pub description: Option<Value>,
    pub cover_base64: Option<Value>,
    pub cover_ext: Option<Value>,
}

/// Output of [`CreateGameRequest::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCreate {
    /// `cover_url` is unset until the cover has been uploaded.
    pub game: NewGame,
    pub cover: Option<CoverUpload>,
}

impl CreateGameRequest {
    /// Parses a request body. An empty body counts as `{}`.
    pub fn from_body(body: &[u8]) -> Result<Self, ValidationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ValidationError::InvalidBody(e.to_string()))?;
        if !value.is_object() {
            return Err(ValidationError::InvalidBody(
                "expected a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| ValidationError::InvalidBody(e.to_string()))
    }

    pub fn validate(self) -> Result<ValidatedCreate, ValidationError> {
        let title = text_field("title", self.title)?;
        let genre = text_field("genre", self.genre)?;
        if title.is_empty() || genre.is_empty() {
            return Err(ValidationError::MissingTitleOrGenre);
        }

        let game = NewGame {
            title,
            genre,
            size: text_field("size", self.size)?,
            rating: rating(self.rating)?,
            year: year(self.year)?,
            tag: text_field("tag", self.tag)?,
            is_new: is_new(self.is_new)?,
            description: text_field("description", self.description)?,
            cover_url: None,
            downloads: NewGame::INITIAL_DOWNLOADS.to_string(),
        };

        let encoded = text_field("cover_base64", self.cover_base64)?;
        let ext = text_field("cover_ext", self.cover_ext)?;
        let cover = (!encoded.is_empty())
            .then(|| CoverUpload::from_base64(&encoded, Some(ext.as_str())))
            .transpose()?;

        Ok(ValidatedCreate { game, cover })
    }
}

/// Parses the `id` query parameter of a delete request.
pub fn parse_game_id(raw: Option<&str>) -> Result<i64, ValidationError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ValidationError::MissingId);
    }
    raw.parse().map_err(|_| ValidationError::InvalidId)
}

fn text_field(name: &'static str, value: Option<Value>) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ValidationError::NotAString(name)),
    }
}

fn rating(value: Option<Value>) -> Result<f64, ValidationError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    parsed
        .filter(|r| r.is_finite())
        .ok_or(ValidationError::InvalidRating)
}

fn year(value: Option<Value>) -> Result<i32, ValidationError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(DEFAULT_YEAR),
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    parsed
        .and_then(|y| i32::try_from(y).ok())
        .ok_or(ValidationError::InvalidYear)
}

fn is_new(value: Option<Value>) -> Result<bool, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(true),
        Some(Value::Bool(b)) => Ok(b),
        Some(_) => Err(ValidationError::InvalidIsNew),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> CreateGameRequest {
        CreateGameRequest::from_body(body.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn minimal_request_gets_defaults() {
        let validated = request(json!({"title": " Game A ", "genre": "Action"}))
            .validate()
            .unwrap();

        assert_eq!(validated.cover, None);
        assert_eq!(
            validated.game,
            NewGame {
                title: "Game A".into(),
                genre: "Action".into(),
                size: String::new(),
                rating: 0.0,
                year: 2025,
                tag: String::new(),
                is_new: true,
                description: String::new(),
                cover_url: None,
                downloads: "0".into(),
            }
        );
    }

    #[test]
    fn full_request_is_kept() {
        let validated = request(json!({
            "title": "Neon Dynasty",
            "genre": "RPG",
            "size": " 78 GB ",
            "rating": 9.5,
            "year": 2024,
            "tag": "Top",
            "is_new": false,
            "description": "Open world",
            "cover_base64": "aGVsbG8=",
            "cover_ext": "png",
        }))
        .validate()
        .unwrap();

        let game = validated.game;
        assert_eq!(game.size, "78 GB");
        assert_eq!(game.rating, 9.5);
        assert_eq!(game.year, 2024);
        assert_eq!(game.tag, "Top");
        assert!(!game.is_new);
        assert_eq!(game.description, "Open world");

        let cover = validated.cover.unwrap();
        assert_eq!(cover.ext, "png");
        assert_eq!(&cover.data[..], b"hello");
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let game = request(json!({"title": "A", "genre": "B", "rating": "8.8", "year": "2023"}))
            .validate()
            .unwrap()
            .game;
        assert_eq!(game.rating, 8.8);
        assert_eq!(game.year, 2023);
    }

    #[test]
    fn nulls_fall_back_to_defaults() {
        let game = request(json!({
            "title": "A", "genre": "B", "rating": null, "year": null, "is_new": null, "tag": null
        }))
        .validate()
        .unwrap()
        .game;
        assert_eq!(game.rating, 0.0);
        assert_eq!(game.year, 2025);
        assert!(game.is_new);
        assert_eq!(game.tag, "");
    }

    #[test]
    fn blank_title_or_genre_is_rejected() {
        for body in [
            json!({"title": "", "genre": "Action"}),
            json!({"title": "Game", "genre": "   "}),
            json!({"genre": "Action"}),
            json!({}),
        ] {
            assert_eq!(
                request(body).validate(),
                Err(ValidationError::MissingTitleOrGenre)
            );
        }
        assert_eq!(
            ValidationError::MissingTitleOrGenre.to_string(),
            "title и genre обязательны"
        );
    }

    #[test]
    fn malformed_numbers_are_validation_errors() {
        let base = |extra: Value| {
            let mut body = json!({"title": "A", "genre": "B"});
            body.as_object_mut()
                .unwrap()
                .extend(extra.as_object().unwrap().clone());
            request(body).validate()
        };

        assert_eq!(base(json!({"rating": "great"})), Err(ValidationError::InvalidRating));
        assert_eq!(base(json!({"rating": true})), Err(ValidationError::InvalidRating));
        assert_eq!(base(json!({"year": "soon"})), Err(ValidationError::InvalidYear));
        assert_eq!(base(json!({"year": 2024.5})), Err(ValidationError::InvalidYear));
        assert_eq!(base(json!({"year": 1e12})), Err(ValidationError::InvalidYear));
        assert_eq!(base(json!({"is_new": "yes"})), Err(ValidationError::InvalidIsNew));
        assert_eq!(base(json!({"tag": 5})), Err(ValidationError::NotAString("tag")));
        assert_eq!(
            base(json!({"cover_base64": "%%%"})),
            Err(ValidationError::InvalidCover)
        );
    }

    #[test]
    fn empty_cover_means_no_cover() {
        let validated = request(json!({"title": "A", "genre": "B", "cover_base64": ""}))
            .validate()
            .unwrap();
        assert_eq!(validated.cover, None);
    }

    #[test]
    fn body_parsing() {
        assert!(CreateGameRequest::from_body(b"").is_ok());
        assert!(CreateGameRequest::from_body(b"  \n").is_ok());
        assert!(matches!(
            CreateGameRequest::from_body(b"{not json"),
            Err(ValidationError::InvalidBody(_))
        ));
        assert!(matches!(
            CreateGameRequest::from_body(b"[1, 2]"),
            Err(ValidationError::InvalidBody(_))
        ));
    }

    #[test]
    fn game_ids() {
        assert_eq!(parse_game_id(Some("42")), Ok(42));
        assert_eq!(parse_game_id(Some(" 7 ")), Ok(7));
        assert_eq!(parse_game_id(None), Err(ValidationError::MissingId));
        assert_eq!(parse_game_id(Some("")), Err(ValidationError::MissingId));
        assert_eq!(parse_game_id(Some("abc")), Err(ValidationError::InvalidId));
        assert_eq!(ValidationError::MissingId.to_string(), "id обязателен");
    }
}
