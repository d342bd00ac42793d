//! Validated geographic identifiers.
//!
//! Census tracts are keyed by an eleven-digit GEOID whose first five digits
//! identify the containing county. Both identifiers are zero-padded ASCII
//! digit strings; constructors reject anything else so joins never silently
//! mismatch on formatting.
#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of digits in a tract GEOID.
const TRACT_GEOID_LEN: usize = 11;
/// Number of digits in a county identifier.
const COUNTY_GEOID_LEN: usize = 5;

/// Errors returned when parsing a geographic identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeoidError {
    /// The identifier had the wrong number of characters.
    #[error("identifier {value:?} has {found} characters, expected {expected}")]
    InvalidLength {
        /// Offending identifier value.
        value: String,
        /// Characters found in the input.
        found: usize,
        /// Characters required for this identifier kind.
        expected: usize,
    },
    /// The identifier contained a non-digit character.
    #[error("identifier {value:?} contains non-digit characters")]
    NonDigit {
        /// Offending identifier value.
        value: String,
    },
}

fn validate_digits(value: &str, expected: usize) -> Result<(), GeoidError> {
    if value.len() != expected {
        return Err(GeoidError::InvalidLength {
            value: value.to_owned(),
            found: value.len(),
            expected,
        });
    }
    if !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(GeoidError::NonDigit {
            value: value.to_owned(),
        });
    }
    Ok(())
}

/// Eleven-digit Census tract identifier.
///
/// # Examples
///
/// ```
/// use fibersight_core::Geoid;
///
/// # fn main() -> Result<(), fibersight_core::GeoidError> {
/// let geoid = Geoid::new("48453001100")?;
/// assert_eq!(geoid.county().as_str(), "48453");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geoid(String);

impl Geoid {
    /// Validate and construct a tract GEOID.
    ///
    /// # Errors
    /// Returns [`GeoidError`] when the input is not exactly eleven ASCII
    /// digits.
    pub fn new(value: impl Into<String>) -> Result<Self, GeoidError> {
        let value = value.into();
        validate_digits(&value, TRACT_GEOID_LEN)?;
        Ok(Self(value))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the identifier of the containing county (first five digits).
    #[must_use]
    pub fn county(&self) -> CountyId {
        let prefix = self
            .0
            .get(..COUNTY_GEOID_LEN)
            .unwrap_or_default()
            .to_owned();
        // Validated at construction, so the prefix is five ASCII digits.
        CountyId(prefix)
    }
}

impl fmt::Display for Geoid {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Five-digit county identifier (state FIPS + county FIPS).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountyId(String);

impl CountyId {
    /// Validate and construct a county identifier.
    ///
    /// Inputs shorter than five characters are zero-padded on the left
    /// before validation; the upstream rurality table stores FIPS codes as
    /// integers and drops leading zeroes.
    ///
    /// # Errors
    /// Returns [`GeoidError`] when the padded input is not exactly five
    /// ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, GeoidError> {
        let raw = value.into();
        let width = COUNTY_GEOID_LEN;
        let padded = if raw.len() < width {
            format!("{raw:0>width$}")
        } else {
            raw
        };
        validate_digits(&padded, COUNTY_GEOID_LEN)?;
        Ok(Self(padded))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountyId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
