use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{json, Map, Value};

use crate::class_hint::{Native, Payload, Slot};

/// Something that has been read, and when.
///
/// `id` is assigned by the server and stays `None` until a reading has been
/// persisted. `when` is always a valid timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reading {
    pub id: Option<String>,
    pub title: String,
    pub link: String,
    pub when: DateTime<Utc>,
}

impl Reading {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Reading {
            id: None,
            title: title.into(),
            link: link.into(),
            when: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_when(mut self, when: DateTime<Utc>) -> Self {
        self.when = when;
        self
    }

    /// Builds a reading from a plain JSON object. Anything that is not an
    /// object yields an empty reading stamped with the current time.
    pub fn from_json(value: &Value) -> Self {
        match value.as_object() {
            Some(object) => Self::from_payload(&Payload::from(object.clone())),
            None => Self::from_payload(&Payload::from(Map::new())),
        }
    }

    /// Builds a reading from a payload that may already hold revived values.
    ///
    /// A `when` that is missing or cannot be understood leaves the reading
    /// stamped with the time of construction.
    pub fn from_payload(payload: &Payload<Native>) -> Self {
        let mut reading = Reading::new(
            payload.json("title").map(text).unwrap_or_default(),
            payload.json("link").map(text).unwrap_or_default(),
        );
        reading.id = match payload.get("id") {
            Some(Slot::Native(Native::ObjectId(id))) => Some(id.clone()),
            Some(Slot::Json(Value::Null)) | None => None,
            Some(Slot::Json(other)) => Some(text(other)),
            Some(Slot::Native(Native::Date(_))) => None,
        };

        match payload.get("when") {
            Some(Slot::Native(Native::Date(when))) => reading.when = *when,
            Some(Slot::Json(value)) => {
                if let Some(when) = parse_when(value) {
                    reading.when = when;
                }
            }
            _ => {}
        }

        reading
    }

    /// The JSON body sent to the server: title, link and an ISO-8601 `when`.
    pub fn to_json(&self) -> Value {
        json!({
            "title": self.title,
            "link": self.link,
            "when": iso8601(&self.when),
        })
    }

    /// `Wed Feb 29 2012`
    pub fn when_text(&self) -> String {
        self.when.format("%a %b %d %Y").to_string()
    }
}

/// Millisecond precision with a `Z` suffix, the way browsers serialize dates.
pub fn iso8601(when: &DateTime<Utc>) -> String {
    when.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_when(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|when| when.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|ms| ms as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
