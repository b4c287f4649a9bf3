//! Field selectors, field values and sort orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::ValidationError;

/// A closed set of fields a document kind can be sorted or filtered by.
///
/// Implemented by a plain enum per document kind, so a sort on a field the
/// item does not have cannot be expressed.
pub trait FieldSelector: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every selectable field.
    fn all() -> &'static [Self];

    /// The field's wire name, as stored in documents.
    fn name(self) -> &'static str;

    /// Look a field up by wire name (case-insensitive).
    fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

/// A borrowed field value, as seen by comparators and filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Time(DateTime<Utc>),
}

impl FieldValue<'_> {
    /// Compare two values of the same kind.
    ///
    /// Times compare by instant, numbers numerically (NaN compares equal to
    /// everything), text with [`collate`]. Values of different kinds compare
    /// equal.
    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Time(a), FieldValue::Time(b)) => {
                a.timestamp_millis().cmp(&b.timestamp_millis())
            }
            (FieldValue::Number(a), FieldValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Text(a), FieldValue::Text(b)) => collate(a, b),
            _ => Ordering::Equal,
        }
    }

    /// Returns the number, if this is a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Copy into an owned [`SortValue`].
    pub fn to_owned_value(&self) -> SortValue {
        match self {
            FieldValue::Text(s) => SortValue::Text((*s).to_string()),
            FieldValue::Number(n) => SortValue::Number(*n),
            FieldValue::Time(t) => SortValue::Time(*t),
        }
    }
}

/// An owned field value, used where a value must outlive its document
/// (for example inside a cursor token).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SortValue {
    Text(String),
    Number(f64),
    Time(DateTime<Utc>),
}

impl SortValue {
    /// Borrow as a [`FieldValue`].
    pub fn as_field(&self) -> FieldValue<'_> {
        match self {
            SortValue::Text(s) => FieldValue::Text(s),
            SortValue::Number(n) => FieldValue::Number(*n),
            SortValue::Time(t) => FieldValue::Time(*t),
        }
    }
}

/// Locale-style string collation.
///
/// Strings are compared case-insensitively first; only strings that are equal
/// ignoring case are ordered by case, lowercase first.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded.then_with(|| {
        a.chars()
            .map(char::is_uppercase)
            .cmp(b.chars().map(char::is_uppercase))
    })
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// `+1` for ascending, `-1` for descending.
    pub fn multiplier(self) -> i32 {
        match self {
            Direction::Asc => 1,
            Direction::Desc => -1,
        }
    }

    /// Apply the direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        (ordering as i32 * self.multiplier()).cmp(&0)
    }

    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Asc),
            "desc" | "descending" => Ok(Direction::Desc),
            _ => Err(ValidationError::Direction {
                value: s.to_string(),
            }),
        }
    }
}

/// A sort order: one field and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sort<F> {
    pub field: F,
    pub direction: Direction,
}

impl<F: FieldSelector> Sort<F> {
    pub fn new(field: F, direction: Direction) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: F) -> Self {
        Self::new(field, Direction::Asc)
    }

    pub fn desc(field: F) -> Self {
        Self::new(field, Direction::Desc)
    }

    /// The order a table header click produces: the same field flips its
    /// direction, a different field starts ascending.
    pub fn toggled(self, field: F) -> Self {
        if self.field == field {
            Self::new(field, self.direction.flipped())
        } else {
            Self::asc(field)
        }
    }
}

impl<F: FieldSelector> fmt::Display for Sort<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field.name(), self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn collate_ignores_case_first() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Zebra", "apple"), Ordering::Greater);
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn numbers_compare_numerically() {
        let a = FieldValue::Number(5.0);
        let b = FieldValue::Number(20.0);
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(
            FieldValue::Number(f64::NAN).compare(&b),
            Ordering::Equal
        );
    }

    #[test]
    fn times_compare_by_instant() {
        let early = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(
            FieldValue::Time(early).compare(&FieldValue::Time(late)),
            Ordering::Less
        );
    }

    #[test]
    fn direction_multiplier() {
        assert_eq!(Direction::Asc.multiplier(), 1);
        assert_eq!(Direction::Desc.multiplier(), -1);
        assert_eq!(Direction::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Direction::Desc.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(Direction::Asc.apply(Ordering::Less), Ordering::Less);
    }

    #[test]
    fn direction_parse() {
        assert_eq!("DESC".parse::<Direction>().unwrap(), Direction::Desc);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn sort_value_roundtrips_through_json() {
        let value = SortValue::Number(29.99);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"type":"number","value":29.99}"#);
        let back: SortValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
