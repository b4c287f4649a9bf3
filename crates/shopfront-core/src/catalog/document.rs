//! Raw documents and the [`Document`] trait.
//!
//! A [`RawDocument`] is what a data source hands back: an id and a JSON
//! object. [`Document::decode`] turns it into a typed item. The object shape
//! is checked strictly; individual fields are coerced to safe defaults so one
//! bad field never takes down a whole page.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{DecodeError, ValidationError};
use crate::types::{FieldSelector, FieldValue, ItemId, Sort};

/// A document as stored: an identifier and a JSON object body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    id: String,
    data: Map<String, Value>,
}

impl RawDocument {
    /// Create a raw document, checking that the body is a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotAnObject`] for arrays, scalars and null.
    pub fn new(id: impl Into<String>, data: Value) -> Result<Self, DecodeError> {
        let id = id.into();
        match data {
            Value::Object(data) => Ok(Self { id, data }),
            _ => Err(DecodeError::NotAnObject { id }),
        }
    }

    /// Parse a raw document from stored JSON text.
    pub fn from_json(id: impl Into<String>, json: &str) -> Result<Self, DecodeError> {
        let id = id.into();
        let value: Value = serde_json::from_str(json).map_err(|e| DecodeError::Json {
            id: id.clone(),
            reason: e.to_string(),
        })?;
        Self::new(id, value)
    }

    /// Returns the raw id string.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the document body.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Consume and return the body as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }

    /// The validated document id.
    pub fn item_id(&self) -> Result<ItemId, DecodeError> {
        ItemId::new(self.id.as_str()).map_err(|e| DecodeError::InvalidId {
            reason: e.to_string(),
        })
    }

    /// A text field. Numbers and booleans are stringified; anything else,
    /// including a missing field, is the empty string.
    pub fn text(&self, key: &str) -> String {
        match self.data.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// A floating point field. Numeric strings are parsed; anything else,
    /// including non-finite results, is zero.
    pub fn number(&self, key: &str) -> f64 {
        let n = match self.data.get(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };
        if n.is_finite() { n } else { 0.0 }
    }

    /// An integer field. Fractional values are truncated.
    pub fn integer(&self, key: &str) -> i64 {
        match self.data.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .unwrap_or_else(|| self.number(key).trunc() as i64),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .unwrap_or_else(|_| self.number(key).trunc() as i64),
            _ => 0,
        }
    }

    /// A boolean field. Missing or non-boolean values are `default`.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.data.get(key) {
            Some(Value::Bool(b)) => *b,
            _ => default,
        }
    }

    /// A timestamp field.
    ///
    /// Accepts RFC 3339 strings, integer milliseconds since the epoch, and
    /// `{ "seconds", "nanoseconds" }` objects (with or without a leading
    /// underscore). Anything else is the Unix epoch.
    pub fn time(&self, key: &str) -> DateTime<Utc> {
        self.data
            .get(key)
            .and_then(parse_time)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

fn parse_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::Object(obj) => {
            let seconds = obj
                .get("seconds")
                .or_else(|| obj.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            Utc.timestamp_opt(seconds, u32::try_from(nanos).ok()?).single()
        }
        _ => None,
    }
}

/// A kind of item that can be listed, filtered, sorted and paged.
pub trait Document: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    /// The closed set of fields this kind can be sorted or filtered by.
    type Field: FieldSelector;

    /// Collection the documents live in.
    const COLLECTION: &'static str;

    /// Singular noun used in messages.
    const KIND: &'static str;

    /// Field matched by a category (or status) filter.
    const CATEGORY_FIELD: Self::Field;

    /// Numeric field matched by a range filter, if the kind has one.
    const RANGE_FIELD: Option<Self::Field>;

    /// The two text fields a search term is matched against.
    const SEARCH_FIELDS: [Self::Field; 2];

    /// Order used when no sort has been chosen.
    fn default_sort() -> Sort<Self::Field>;

    /// Returns the document id.
    fn id(&self) -> &ItemId;

    /// Returns the value of one field.
    fn value(&self, field: Self::Field) -> FieldValue<'_>;

    /// Decode a raw document into a typed item.
    fn decode(raw: &RawDocument) -> Result<Self, DecodeError>;

    /// Look up a field by its wire name.
    fn parse_field(name: &str) -> Result<Self::Field, ValidationError> {
        Self::Field::from_name(name).ok_or_else(|| ValidationError::UnknownField {
            collection: Self::COLLECTION,
            value: name.to_string(),
        })
    }
}
