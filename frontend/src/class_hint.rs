//! JSON-RPC class hinting.
//!
//! A class hinted value is an object holding a single `__jsonclass__` array:
//! the constructor name followed by the arguments for it.
//!
//! ```json
//! { "then": { "__jsonclass__": ["Date", 1335298365827] } }
//! ```
//!
//! [`unwrap_class_hints`] revives the hinted properties of an object using a
//! [`ClassHints`] table that maps constructor names to typed factories.
//! Names missing from the table are left alone.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::reading::parse_when;

pub const CLASS_HINT_KEY: &str = "__jsonclass__";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassHintError {
    #[error("{type_name} hint on `{property}` has {count} constructor arguments, at most one is allowed")]
    ConstructorArgumentsTooLong {
        property: String,
        type_name: String,
        count: usize,
    },
    #[error("cannot construct {type_name}: {reason}")]
    InvalidArgument { type_name: String, reason: String },
}

/// A property value, either still JSON or revived into `T`.
#[derive(Clone, Debug, PartialEq)]
pub enum Slot<T> {
    Json(Value),
    Native(T),
}

/// An insertion ordered JSON object whose properties can be revived in place.
#[derive(Clone, Debug, PartialEq)]
pub struct Payload<T> {
    fields: Vec<(String, Slot<T>)>,
}

impl<T> Payload<T> {
    pub fn get(&self, name: &str) -> Option<&Slot<T>> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, slot)| slot)
    }

    pub fn json(&self, name: &str) -> Option<&Value> {
        match self.get(name) {
            Some(Slot::Json(value)) => Some(value),
            _ => None,
        }
    }

    pub fn native(&self, name: &str) -> Option<&T> {
        match self.get(name) {
            Some(Slot::Native(value)) => Some(value),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot<T>)> {
        self.fields.iter().map(|(name, slot)| (name.as_str(), slot))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> From<Map<String, Value>> for Payload<T> {
    fn from(object: Map<String, Value>) -> Self {
        Payload {
            fields: object
                .into_iter()
                .map(|(name, value)| (name, Slot::Json(value)))
                .collect(),
        }
    }
}

type Factory<T> = Box<dyn Fn(Option<&Value>) -> Result<T, ClassHintError>>;

/// The closed set of constructors that hints may name.
pub struct ClassHints<T> {
    factories: HashMap<String, Factory<T>>,
}

impl<T> ClassHints<T> {
    pub fn new() -> Self {
        ClassHints {
            factories: HashMap::new(),
        }
    }

    /// Registers `factory` under `type_name`. The factory receives `None` for
    /// a bare hint and `Some(argument)` when one argument was given.
    pub fn register<F>(mut self, type_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<T, ClassHintError> + 'static,
    {
        self.factories.insert(type_name.into(), Box::new(factory));
        self
    }

    pub fn knows(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }
}

impl<T> Default for ClassHints<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ClassHints<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("ClassHints").field("types", &names).finish()
    }
}

/// Values the standard hint table knows how to build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Native {
    Date(DateTime<Utc>),
    ObjectId(String),
}

impl ClassHints<Native> {
    /// `Date` and `ObjectId`, the hints the reading list server emits.
    pub fn standard() -> Self {
        ClassHints::new()
            .register("Date", |argument| date(argument).map(Native::Date))
            .register("ObjectId", |argument| match argument {
                Some(Value::String(id)) => Ok(Native::ObjectId(id.clone())),
                Some(other) => Ok(Native::ObjectId(other.to_string())),
                None => Err(ClassHintError::InvalidArgument {
                    type_name: "ObjectId".into(),
                    reason: "an id value is required".into(),
                }),
            })
    }
}

fn date(argument: Option<&Value>) -> Result<DateTime<Utc>, ClassHintError> {
    let invalid = |reason: String| ClassHintError::InvalidArgument {
        type_name: "Date".into(),
        reason,
    };

    match argument {
        None => Ok(Utc::now()),
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| invalid(format!("{} is out of range", ms))),
            Err(_) => parse_when(&Value::String(s.clone()))
                .ok_or_else(|| invalid(format!("{:?} is not a timestamp", s))),
        },
        Some(other) => parse_when(other).ok_or_else(|| invalid(format!("{} is not a timestamp", other))),
    }
}

fn class_hint(value: &Value) -> Option<(&str, &[Value])> {
    let encoded = value.as_object()?.get(CLASS_HINT_KEY)?.as_array()?;
    let (type_name, arguments) = encoded.split_first()?;
    Some((type_name.as_str()?, arguments))
}

/// Revives the class hinted properties of `payload` in place.
///
/// Only direct properties are looked at, in insertion order. A hint with more
/// than one constructor argument stops the scan with
/// [`ClassHintError::ConstructorArgumentsTooLong`]; properties revived before
/// it stay revived.
pub fn unwrap_class_hints<T>(
    payload: &mut Payload<T>,
    hints: &ClassHints<T>,
) -> Result<(), ClassHintError> {
    for (property, slot) in payload.fields.iter_mut() {
        let Slot::Json(value) = slot else { continue };
        let Some((type_name, arguments)) = class_hint(value) else {
            continue;
        };
        let Some(factory) = hints.factories.get(type_name) else {
            continue;
        };

        let revived = match arguments {
            [] => factory(None)?,
            [argument] => factory(Some(argument))?,
            _ => {
                return Err(ClassHintError::ConstructorArgumentsTooLong {
                    property: property.clone(),
                    type_name: type_name.to_owned(),
                    count: arguments.len(),
                })
            }
        };
        *slot = Slot::Native(revived);
    }

    Ok(())
}
