//! The address parser: every grammatical reading of a free-text address.
//!
//! Parsing does not pick a winner. An input like `"220 WABASH"` yields
//! several [`Location`] candidates, one per shape whose token classes all
//! match, and disambiguation is left to the geocoder that resolves them
//! against real street data.

use std::sync::LazyLock;

use openblock_address_models::{AddressField, Location};

use crate::classify::TokenClassifier;
use crate::combinations::{Shape, ShapeIndex};
use crate::normalize::{normalize, strip_unit};
use crate::standardize::Standardizers;
use crate::tables::{AddressTables, TablesError};

/// No shape accepted the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to parse location {location:?}")]
pub struct ParsingError {
    location: String,
}

impl ParsingError {
    /// The original, unnormalized input.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

static BUILTIN_PARSER: LazyLock<AddressParser> = LazyLock::new(|| {
    AddressParser::new(AddressTables::builtin())
        .unwrap_or_else(|e| panic!("Failed to build built-in address parser: {e}"))
});

/// Normalizes `location`, strips any unit designation, and splits the
/// result on whitespace. Dashes and ampersands stay attached to their
/// token (`"100-102"`, `"&"`).
#[must_use]
pub fn tokenize(location: &str) -> Vec<String> {
    strip_unit(&normalize(location))
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Parser built from one set of lookup tables. Immutable once built and
/// safe to share across threads.
#[derive(Debug, Clone)]
pub struct AddressParser {
    classifier: TokenClassifier,
    standardizers: Standardizers,
    shapes: ShapeIndex,
}

impl AddressParser {
    /// Builds a parser from `tables`.
    ///
    /// # Errors
    ///
    /// Returns [`TablesError::Pattern`] if the suffix or directional table
    /// cannot be compiled into a token pattern.
    pub fn new(tables: &AddressTables) -> Result<Self, TablesError> {
        Ok(Self {
            classifier: TokenClassifier::new(tables)?,
            standardizers: Standardizers::new(tables),
            shapes: ShapeIndex::new(),
        })
    }

    /// The process-wide parser built from the embedded tables.
    ///
    /// # Panics
    ///
    /// Panics on first use if the embedded tables are malformed, which
    /// the crate's own tests rule out.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN_PARSER
    }

    #[must_use]
    pub const fn classifier(&self) -> &TokenClassifier {
        &self.classifier
    }

    #[must_use]
    pub const fn standardizers(&self) -> &Standardizers {
        &self.standardizers
    }

    #[must_use]
    pub const fn shapes(&self) -> &ShapeIndex {
        &self.shapes
    }

    /// Same as the free [`tokenize`]; the tables do not affect tokenizing.
    #[must_use]
    pub fn tokenize(&self, location: &str) -> Vec<String> {
        tokenize(location)
    }

    /// Returns every interpretation of `location`, in shape generation
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`ParsingError`] if no shape matches, including when the
    /// input is empty after normalization.
    pub fn parse(&self, location: &str) -> Result<Vec<Location>, ParsingError> {
        let tokens = self.tokenize(location);
        log::debug!("parse: normalized and stripped {location:?} to {tokens:?}");

        let results: Vec<Location> = self
            .shapes
            .with_len(tokens.len())
            .iter()
            .filter(|shape| self.shape_matches(shape, &tokens))
            .map(|shape| self.build_location(shape, &tokens))
            .collect();

        if results.is_empty() {
            return Err(ParsingError {
                location: location.to_string(),
            });
        }
        Ok(results)
    }

    fn shape_matches(&self, shape: &Shape, tokens: &[String]) -> bool {
        shape
            .fields()
            .iter()
            .zip(tokens)
            .all(|(field, token)| self.classifier.matches(*field, token))
    }

    fn build_location(&self, shape: &Shape, tokens: &[String]) -> Location {
        let mut location = Location::new();
        for (field, token) in shape.fields().iter().zip(tokens) {
            location.push_token(*field, token);
        }
        self.standardizers.standardize_location(&mut location);
        log::debug!("parse: {tokens:?} gave possible result address {location}");
        location
    }

    /// Splits a street name whose last word is really its suffix, as left
    /// behind by reference data that folded the type into the name
    /// (`"WILSON PARK"` → `("WILSON", "PARK")`).
    ///
    /// Returns `None` for single-word names and when the last word is not
    /// a recognized suffix. The suffix comes back standardized.
    #[must_use]
    pub fn split_embedded_suffix(&self, street: &str) -> Option<(String, String)> {
        let upper = street.to_uppercase();
        let mut words: Vec<&str> = upper.split_whitespace().collect();
        if words.len() < 2 {
            return None;
        }
        let last = words.pop()?;
        if !self.classifier.matches(AddressField::Suffix, last) {
            return None;
        }
        let suffix = self.standardizers.apply(AddressField::Suffix, last);
        Some((words.join(" "), suffix))
    }
}

/// Parses `location` with the built-in tables.
///
/// # Errors
///
/// Returns [`ParsingError`] if no interpretation is found.
pub fn parse(location: &str) -> Result<Vec<Location>, ParsingError> {
    AddressParser::builtin().parse(location)
}
