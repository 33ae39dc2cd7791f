use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use super::color::{ColorParseError, Rgb};

/// Wall-clock format of `selfDestructionDate`, no zone offset.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const UID: &str = "uid";
const TITLE: &str = "title";
const CONTENT: &str = "content";
const IMPORTANCE: &str = "importance";
const COLOR: &str = "color";
const SELF_DESTRUCTION_DATE: &str = "selfDestructionDate";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteParseError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),
    #[error("importance must be -1, 0 or 1, got {0}")]
    InvalidImportance(i64),
    #[error("invalid color: {0}")]
    InvalidColor(#[from] ColorParseError),
    #[error("invalid self-destruction date `{0}`")]
    InvalidDate(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Importance {
    Low = -1,
    #[default]
    Normal = 0,
    High = 1,
}

impl Importance {
    /// The integer stored in the `importance` field.
    pub fn value(&self) -> i64 {
        *self as i64
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl TryFrom<i64> for Importance {
    type Error = NoteParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Low),
            0 => Ok(Self::Normal),
            1 => Ok(Self::High),
            other => Err(NoteParseError::InvalidImportance(other)),
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown importance level: {}", s)),
        }
    }
}

/// A single note.
///
/// Notes are values: the `with_*` methods consume the note and hand back a
/// changed copy, nothing mutates a note in place. Within a
/// [`Notebook`](crate::Notebook) a note is identified by its `uid` alone,
/// while `==` compares every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    uid: String,
    title: String,
    content: String,
    importance: Importance,
    color: Rgb,
    self_destruction_date: Option<NaiveDateTime>,
}

impl Note {
    /// Create a note with a freshly generated uid and default attributes.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_uid(Uuid::new_v4().to_string(), title, content)
    }

    /// Create a note with a caller-supplied uid and default attributes.
    pub fn with_uid(
        uid: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            title: title.into(),
            content: content.into(),
            importance: Importance::default(),
            color: Rgb::default(),
            self_destruction_date: None,
        }
    }

    pub fn with_importance(self, importance: Importance) -> Self {
        Self { importance, ..self }
    }

    pub fn with_color(self, color: Rgb) -> Self {
        Self { color, ..self }
    }

    pub fn with_self_destruction_date(self, date: Option<NaiveDateTime>) -> Self {
        Self {
            self_destruction_date: date,
            ..self
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn importance(&self) -> Importance {
        self.importance
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn self_destruction_date(&self) -> Option<NaiveDateTime> {
        self.self_destruction_date
    }

    /// Whether both values denote the same note, regardless of contents.
    pub fn is_same_note(&self, other: &Note) -> bool {
        self.uid == other.uid
    }

    /// Parse a note from its JSON object form, logging and discarding
    /// malformed records.
    pub fn parse(json: &Map<String, Value>) -> Option<Note> {
        match Self::try_parse(json) {
            Ok(note) => Some(note),
            Err(err) => {
                tracing::debug!(error = %err, "Discarding malformed note record");
                None
            }
        }
    }

    /// Parse a note from its JSON object form.
    ///
    /// `importance` and `color` may be omitted, but `selfDestructionDate`
    /// must always be present (an empty string means "no date").
    pub fn try_parse(json: &Map<String, Value>) -> Result<Note, NoteParseError> {
        let uid = required_str(json, UID)?;
        let title = required_str(json, TITLE)?;
        let content = required_str(json, CONTENT)?;

        let importance = match json.get(IMPORTANCE) {
            None => Importance::Normal,
            Some(value) => {
                let raw = value.as_i64().ok_or(NoteParseError::WrongType(IMPORTANCE))?;
                Importance::try_from(raw)?
            }
        };

        let color = match json.get(COLOR) {
            None => Rgb::WHITE,
            Some(value) => value
                .as_str()
                .ok_or(NoteParseError::WrongType(COLOR))?
                .parse::<Rgb>()?,
        };

        let date = required_str(json, SELF_DESTRUCTION_DATE)?;
        let self_destruction_date = if date.is_empty() {
            None
        } else {
            let parsed = NaiveDateTime::parse_from_str(date, DATE_FORMAT)
                .map_err(|_| NoteParseError::InvalidDate(date.to_string()))?;
            Some(parsed)
        };

        Ok(Note {
            uid: uid.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            importance,
            color,
            self_destruction_date,
        })
    }

    /// Encode the note as a JSON object, leaving out default importance and
    /// color.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert(UID.into(), Value::from(self.uid.as_str()));
        json.insert(TITLE.into(), Value::from(self.title.as_str()));
        json.insert(CONTENT.into(), Value::from(self.content.as_str()));

        if self.importance != Importance::Normal {
            json.insert(IMPORTANCE.into(), Value::from(self.importance.value()));
        }

        if !self.color.is_white() {
            json.insert(COLOR.into(), Value::from(self.color.to_hex()));
        }

        let date = self
            .self_destruction_date
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        json.insert(SELF_DESTRUCTION_DATE.into(), Value::from(date));

        json
    }
}

fn required_str<'a>(
    json: &'a Map<String, Value>,
    key: &'static str,
) -> Result<&'a str, NoteParseError> {
    json.get(key)
        .ok_or(NoteParseError::MissingField(key))?
        .as_str()
        .ok_or(NoteParseError::WrongType(key))
}

impl Serialize for Note {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Map::<String, Value>::deserialize(deserializer)?;
        Note::try_parse(&json).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    fn date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 7, 15)
            .unwrap()
            .and_hms_opt(18, 30, 5)
            .unwrap()
    }

    #[test]
    fn new_generates_distinct_uids() {
        let a = Note::new("Title", "Content");
        let b = Note::new("Title", "Content");
        assert_ne!(a.uid(), b.uid());
        assert!(Uuid::parse_str(a.uid()).is_ok());
    }

    #[test]
    fn new_uses_defaults() {
        let note = Note::with_uid("y7834equwghdjknsa", "Test Title", "Test Content");
        assert_eq!(note.uid(), "y7834equwghdjknsa");
        assert_eq!(note.title(), "Test Title");
        assert_eq!(note.content(), "Test Content");
        assert_eq!(note.importance(), Importance::Normal);
        assert_eq!(note.color(), Rgb::WHITE);
        assert_eq!(note.self_destruction_date(), None);
    }

    #[test]
    fn builders_return_changed_copies() {
        let note = Note::with_uid("n1", "Title", "Content")
            .with_importance(Importance::Low)
            .with_color(Rgb::new(255, 0, 0))
            .with_self_destruction_date(Some(date()));

        assert_eq!(note.uid(), "n1");
        assert_eq!(note.importance(), Importance::Low);
        assert_eq!(note.color(), Rgb::new(255, 0, 0));
        assert_eq!(note.self_destruction_date(), Some(date()));
    }

    #[test]
    fn identity_is_by_uid_equality_is_structural() {
        let a = Note::with_uid("same", "A", "first");
        let b = Note::with_uid("same", "B", "second");
        assert!(a.is_same_note(&b));
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn importance_values() {
        assert_eq!(Importance::Low.value(), -1);
        assert_eq!(Importance::Normal.value(), 0);
        assert_eq!(Importance::High.value(), 1);
        assert_eq!(Importance::try_from(1i64), Ok(Importance::High));
        assert_eq!(
            Importance::try_from(2i64),
            Err(NoteParseError::InvalidImportance(2))
        );
        assert_eq!("HIGH".parse::<Importance>(), Ok(Importance::High));
        assert!("urgent".parse::<Importance>().is_err());
    }

    #[test]
    fn encode_minimal_note() {
        let json = Note::with_uid("n1", "Title", "Content").to_json();
        assert_eq!(
            Value::Object(json),
            json!({
                "uid": "n1",
                "title": "Title",
                "content": "Content",
                "selfDestructionDate": "",
            })
        );
    }

    #[test]
    fn encode_full_note() {
        let json = Note::with_uid("n1", "Title", "Content")
            .with_importance(Importance::High)
            .with_color(Rgb::new(0, 255, 0))
            .with_self_destruction_date(Some(date()))
            .to_json();
        assert_eq!(
            Value::Object(json),
            json!({
                "uid": "n1",
                "title": "Title",
                "content": "Content",
                "importance": 1,
                "color": "#00FF00",
                "selfDestructionDate": "2019-07-15T18:30:05",
            })
        );
    }

    #[test]
    fn encode_low_importance() {
        let json = Note::new("t", "c").with_importance(Importance::Low).to_json();
        assert_eq!(json.get("importance"), Some(&json!(-1)));
    }

    #[test]
    fn parse_empty_object_fails() {
        assert_eq!(
            Note::try_parse(&Map::new()),
            Err(NoteParseError::MissingField("uid"))
        );
        assert!(Note::parse(&Map::new()).is_none());
    }

    #[test]
    fn parse_requires_self_destruction_date_key() {
        let json = object(json!({"uid": "n1", "title": "t", "content": "c"}));
        assert_eq!(
            Note::try_parse(&json),
            Err(NoteParseError::MissingField("selfDestructionDate"))
        );
    }

    #[test]
    fn parse_applies_defaults() {
        let json = object(json!({
            "uid": "n1",
            "title": "t",
            "content": "c",
            "selfDestructionDate": "",
        }));
        let note = Note::parse(&json).unwrap();
        assert_eq!(note.importance(), Importance::Normal);
        assert_eq!(note.color(), Rgb::WHITE);
        assert_eq!(note.self_destruction_date(), None);
    }

    #[test]
    fn parse_rejects_non_string_required_fields() {
        let json = object(json!({
            "uid": 42,
            "title": "t",
            "content": "c",
            "selfDestructionDate": "",
        }));
        assert_eq!(Note::try_parse(&json), Err(NoteParseError::WrongType("uid")));

        let json = object(json!({
            "uid": "n1",
            "title": "t",
            "content": "c",
            "selfDestructionDate": null,
        }));
        assert_eq!(
            Note::try_parse(&json),
            Err(NoteParseError::WrongType("selfDestructionDate"))
        );
    }

    #[test]
    fn parse_rejects_bad_importance() {
        let base = json!({"uid": "n1", "title": "t", "content": "c", "selfDestructionDate": ""});

        for (value, expected) in [
            (json!(5), NoteParseError::InvalidImportance(5)),
            (json!("1"), NoteParseError::WrongType("importance")),
            (json!(1.5), NoteParseError::WrongType("importance")),
            (json!(null), NoteParseError::WrongType("importance")),
        ] {
            let mut json = object(base.clone());
            json.insert("importance".into(), value);
            assert_eq!(Note::try_parse(&json), Err(expected));
        }
    }

    #[test]
    fn parse_rejects_bad_color() {
        let mut json = object(json!({
            "uid": "n1",
            "title": "t",
            "content": "c",
            "color": "green",
            "selfDestructionDate": "",
        }));
        assert_eq!(
            Note::try_parse(&json),
            Err(NoteParseError::InvalidColor(ColorParseError::MissingHash))
        );

        json.insert("color".into(), json!(0x00FF00));
        assert_eq!(Note::try_parse(&json), Err(NoteParseError::WrongType("color")));
    }

    #[test]
    fn parse_accepts_lowercase_color() {
        let json = object(json!({
            "uid": "n1",
            "title": "t",
            "content": "c",
            "color": "#00ff7f",
            "selfDestructionDate": "",
        }));
        assert_eq!(Note::parse(&json).unwrap().color(), Rgb::new(0, 255, 127));
    }

    #[test]
    fn parse_rejects_bad_date() {
        for raw in ["tomorrow", "2019-07-15", "2019-07-15 18:30:05", "2019-07-15T18:30:05Z"] {
            let json = object(json!({
                "uid": "n1",
                "title": "t",
                "content": "c",
                "selfDestructionDate": raw,
            }));
            assert_eq!(
                Note::try_parse(&json),
                Err(NoteParseError::InvalidDate(raw.to_string())),
                "{raw}"
            );
        }
    }

    #[test]
    fn round_trip_full_note() {
        let note = Note::new("Title", "Content\n\nMore content")
            .with_importance(Importance::High)
            .with_color(Rgb::new(0, 255, 0))
            .with_self_destruction_date(Some(date()));

        assert_eq!(Note::parse(&note.to_json()), Some(note));
    }

    #[test]
    fn round_trip_truncates_sub_second_precision() {
        let precise = date() + chrono::Duration::milliseconds(250);
        let note = Note::new("t", "c").with_self_destruction_date(Some(precise));

        let parsed = Note::parse(&note.to_json()).unwrap();
        assert_eq!(
            parsed.self_destruction_date().map(|d| d.format(DATE_FORMAT).to_string()),
            note.self_destruction_date().map(|d| d.format(DATE_FORMAT).to_string()),
        );
        assert_eq!(parsed.self_destruction_date(), Some(date()));
    }

    #[test]
    fn serde_uses_the_same_rules() {
        let note = Note::with_uid("n1", "t", "c").with_importance(Importance::Low);
        let text = serde_json::to_string(&note).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["importance"], json!(-1));
        assert!(value.get("color").is_none());

        let decoded: Note = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, note);

        let err = serde_json::from_str::<Note>(r#"{"uid": "n1"}"#).unwrap_err();
        assert!(err.to_string().contains("title"));
    }
}
