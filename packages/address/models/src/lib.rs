#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for the street address parser.
//!
//! This crate contains only data types and simple accessors. It has no
//! regex or I/O dependencies, so geocoding layers can depend on it without
//! pulling in the parser itself.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// One component of a parsed US street address.
///
/// Variants are declared in canonical address order, which is also the
/// order the combination generator lays fields out in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AddressField {
    /// House number (`"1972"`, `"123-02"`).
    Number,
    /// Directional before the street name (`"N"`).
    PreDir,
    /// Street name, possibly several words (`"MARTIN LUTHER KING"`).
    Street,
    /// Street type (`"AVE"`).
    Suffix,
    /// Directional after the street type (`"NW"`).
    PostDir,
    /// City name, possibly several words.
    City,
    /// State name or abbreviation, possibly several words.
    State,
    /// Five-digit ZIP or ZIP+4.
    Zip,
}

impl AddressField {
    /// All fields in canonical order.
    pub const ALL: [Self; 8] = [
        Self::Number,
        Self::PreDir,
        Self::Street,
        Self::Suffix,
        Self::PostDir,
        Self::City,
        Self::State,
        Self::Zip,
    ];

    /// Whether consecutive tokens of this type are joined into one value.
    #[must_use]
    pub const fn is_repeatable(self) -> bool {
        matches!(self, Self::Street | Self::City | Self::State)
    }
}

/// Error returned when a field is addressed by a name outside the fixed
/// set of eight location keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown location field {name:?}")]
pub struct UnknownFieldError {
    /// The rejected key.
    pub name: String,
}

impl AddressField {
    /// Looks a field up by its snake-case key.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] if `name` is not one of the eight
    /// location keys.
    pub fn from_name(name: &str) -> Result<Self, UnknownFieldError> {
        name.parse().map_err(|_| UnknownFieldError {
            name: name.to_string(),
        })
    }
}

/// One structured interpretation of a free-text address.
///
/// All eight keys are always present; unset components are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub number: Option<String>,
    pub pre_dir: Option<String>,
    pub street: Option<String>,
    pub suffix: Option<String>,
    pub post_dir: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl Location {
    /// Creates a location with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `field`, if set.
    #[must_use]
    pub fn get(&self, field: AddressField) -> Option<&str> {
        self.slot(field).map(String::as_str)
    }

    /// Sets (or clears) the value of `field`.
    pub fn set(&mut self, field: AddressField, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    /// Assigns `token` to `field`. Repeatable fields (street, city, state)
    /// that already hold a value get the token appended after a single
    /// space; any other field is overwritten.
    pub fn push_token(&mut self, field: AddressField, token: &str) {
        match self.slot_mut(field) {
            Some(existing) if field.is_repeatable() => {
                existing.push(' ');
                existing.push_str(token);
            }
            slot => *slot = Some(token.to_string()),
        }
    }

    /// Returns the value stored under the snake-case key `name`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] for keys outside the fixed set.
    pub fn get_by_name(&self, name: &str) -> Result<Option<&str>, UnknownFieldError> {
        Ok(self.get(AddressField::from_name(name)?))
    }

    /// Sets the value stored under the snake-case key `name`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownFieldError`] for keys outside the fixed set; the
    /// location is left untouched in that case.
    pub fn set_by_name(
        &mut self,
        name: &str,
        value: Option<String>,
    ) -> Result<(), UnknownFieldError> {
        self.set(AddressField::from_name(name)?, value);
        Ok(())
    }

    /// Iterates over `(field, value)` pairs in canonical order.
    #[must_use]
    pub fn fields(&self) -> impl Iterator<Item = (AddressField, Option<&str>)> {
        AddressField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().all(|(_, value)| value.is_none())
    }

    const fn slot(&self, field: AddressField) -> Option<&String> {
        match field {
            AddressField::Number => self.number.as_ref(),
            AddressField::PreDir => self.pre_dir.as_ref(),
            AddressField::Street => self.street.as_ref(),
            AddressField::Suffix => self.suffix.as_ref(),
            AddressField::PostDir => self.post_dir.as_ref(),
            AddressField::City => self.city.as_ref(),
            AddressField::State => self.state.as_ref(),
            AddressField::Zip => self.zip.as_ref(),
        }
    }

    const fn slot_mut(&mut self, field: AddressField) -> &mut Option<String> {
        match field {
            AddressField::Number => &mut self.number,
            AddressField::PreDir => &mut self.pre_dir,
            AddressField::Street => &mut self.street,
            AddressField::Suffix => &mut self.suffix,
            AddressField::PostDir => &mut self.post_dir,
            AddressField::City => &mut self.city,
            AddressField::State => &mut self.state,
            AddressField::Zip => &mut self.zip,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (field, value)) in self.fields().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Some(v) => write!(f, "{field}: {v:?}")?,
                None => write!(f, "{field}: None")?,
            }
        }
        f.write_str("}")
    }
}

/// A reference-data block record as loaded from street centerline data.
///
/// Standardizing these with the same tables as parsed addresses keeps the
/// geocoder's lookups symmetric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFields {
    /// Highway prefix (`"US HIGHWAY"`), if the street is a route.
    pub prefix: Option<String>,
    pub pre_dir: Option<String>,
    pub street: Option<String>,
    pub suffix: Option<String>,
    pub post_dir: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub left_from_num: Option<String>,
    pub left_to_num: Option<String>,
    pub right_from_num: Option<String>,
    pub right_to_num: Option<String>,
}

/// Outcome of parsing one row of a batch input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// 1-based data row number (header excluded).
    pub row: u64,
    /// The raw address text as read.
    pub address: String,
    /// Every candidate interpretation; empty when parsing failed.
    pub candidates: Vec<Location>,
    /// Parse failure message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedRecord {
    /// Whether at least one interpretation was found.
    #[must_use]
    pub const fn is_parsed(&self) -> bool {
        !self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn new_location_has_every_field_unset() {
        let location = Location::new();
        assert_eq!(location.fields().count(), 8);
        assert!(location.fields().all(|(_, v)| v.is_none()));
        assert!(location.is_empty());
    }

    #[test]
    fn push_token_joins_with_single_space() {
        let mut location = Location::new();
        location.push_token(AddressField::City, "LOS");
        location.push_token(AddressField::City, "ANGELES");
        assert_eq!(location.city.as_deref(), Some("LOS ANGELES"));
    }

    #[test]
    fn push_token_overwrites_single_token_fields() {
        let mut location = Location::new();
        location.push_token(AddressField::Number, "10");
        location.push_token(AddressField::Number, "12");
        location.push_token(AddressField::Street, "MARTIN");
        location.push_token(AddressField::Street, "LUTHER");
        location.push_token(AddressField::Street, "KING");
        assert_eq!(location.number.as_deref(), Some("12"));
        assert_eq!(location.street.as_deref(), Some("MARTIN LUTHER KING"));
    }

    #[test]
    fn unknown_field_error_message() {
        let err = AddressField::from_name("apartment").unwrap_err();
        assert_eq!(err.to_string(), "unknown location field \"apartment\"");
    }

    #[test]
    fn rejects_unknown_keys() {
        let mut location = Location::new();
        let err = location
            .set_by_name("apartment", Some("4B".to_string()))
            .unwrap_err();
        assert_eq!(err.name, "apartment");
        assert!(location.is_empty());
        assert!(location.get_by_name("county").is_err());
    }

    #[test]
    fn accesses_fields_by_name() {
        let mut location = Location::new();
        location
            .set_by_name("pre_dir", Some("N".to_string()))
            .unwrap();
        assert_eq!(location.get_by_name("pre_dir").unwrap(), Some("N"));
        assert_eq!(location.pre_dir.as_deref(), Some("N"));
    }

    #[test]
    fn field_names_are_snake_case() {
        let names: Vec<String> = AddressField::iter().map(|f| f.to_string()).collect();
        assert_eq!(
            names,
            [
                "number", "pre_dir", "street", "suffix", "post_dir", "city", "state", "zip"
            ]
        );
        assert_eq!(AddressField::iter().collect::<Vec<_>>(), AddressField::ALL);
    }

    #[test]
    fn only_street_city_state_repeat() {
        let repeatable: Vec<AddressField> = AddressField::ALL
            .into_iter()
            .filter(|f| f.is_repeatable())
            .collect();
        assert_eq!(
            repeatable,
            [
                AddressField::Street,
                AddressField::City,
                AddressField::State
            ]
        );
    }

    #[test]
    fn serializes_all_eight_keys() {
        let location = Location {
            number: Some("1972".to_string()),
            ..Location::default()
        };
        let value = serde_json::to_value(&location).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 8);
        assert_eq!(object["number"], "1972");
        assert!(object["zip"].is_null());
    }

    #[test]
    fn displays_in_canonical_order() {
        let location = Location {
            number: Some("10".to_string()),
            street: Some("MAIN".to_string()),
            ..Location::default()
        };
        assert_eq!(
            location.to_string(),
            "{number: \"10\", pre_dir: None, street: \"MAIN\", suffix: None, \
             post_dir: None, city: None, state: None, zip: None}"
        );
    }
}
