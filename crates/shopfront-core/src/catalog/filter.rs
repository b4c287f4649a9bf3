//! Filter configuration.

use crate::error::ValidationError;

use super::document::Document;

/// Category value that means "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Equality and range filters applied to a listing.
///
/// A new configuration always replaces the previous one; there is no
/// partial merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    /// Required value of the category (or status) field.
    pub category: Option<String>,
    /// Inclusive lower bound on the range field.
    pub min: Option<f64>,
    /// Inclusive upper bound on the range field.
    pub max: Option<f64>,
}

impl FilterConfig {
    /// Build a filter from raw form input.
    ///
    /// An empty category or `"all"` means no category filter. Empty bounds
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is not a finite, non-negative number, or
    /// if the minimum is greater than the maximum.
    pub fn parse(
        category: Option<&str>,
        min: Option<&str>,
        max: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
            .map(str::to_string);

        let filter = Self {
            category,
            min: parse_bound("minimum", min)?,
            max: parse_bound("maximum", max)?,
        };
        filter.check_range()?;
        Ok(filter)
    }

    /// Replace the category filter.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replace both range bounds.
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Returns true if nothing is filtered.
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.min.is_none() && self.max.is_none()
    }

    /// Check that this filter can be applied to documents of kind `D`.
    ///
    /// Filters built with [`with_range`](Self::with_range) skip the checks
    /// [`parse`](Self::parse) makes, so the bounds are checked again here.
    pub fn check_for<D: Document>(&self) -> Result<(), ValidationError> {
        if D::RANGE_FIELD.is_none() && (self.min.is_some() || self.max.is_some()) {
            return Err(ValidationError::NoRangeField {
                collection: D::COLLECTION,
            });
        }
        self.check_range()
    }

    fn check_range(&self) -> Result<(), ValidationError> {
        if let Some(min) = self.min {
            check_bound("minimum", min)?;
        }
        if let Some(max) = self.max {
            check_bound("maximum", max)?;
        }
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            return Err(ValidationError::InvertedRange { min, max });
        }
        Ok(())
    }
}

fn parse_bound(bound: &'static str, raw: Option<&str>) -> Result<Option<f64>, ValidationError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let value: f64 = raw.parse().map_err(|_| ValidationError::Bound {
        bound,
        value: raw.to_string(),
        reason: "not a number".to_string(),
    })?;
    Ok(Some(value))
}

fn check_bound(bound: &'static str, value: f64) -> Result<(), ValidationError> {
    let reject = |reason: &str| ValidationError::Bound {
        bound,
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if !value.is_finite() {
        return Err(reject("must be finite"));
    }
    if value < 0.0 {
        return Err(reject("cannot be negative"));
    }
    Ok(())
}
