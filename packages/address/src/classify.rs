//! Token classification: which address fields a single token may fill.
//!
//! Every field has one regular expression. A token belongs to a field's
//! class when the pattern matches at the start of the token; patterns that
//! must consume the whole token end in `$`. Multi-word streets, cities and
//! states are not recognized here: each word is classified on its own and
//! the combination generator decides how many words a field spans.

use std::sync::LazyLock;

use openblock_address_models::AddressField;
use regex::Regex;

use crate::tables::{AbbreviationTable, AddressTables, TablesError};

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+[A-Z]?(?:-[0-9]+[A-Z]?)?$").expect("valid regex"));

/// Ordinal (`"31ST"`), a word of up to 25 letters, or a bare 1-3 digit
/// number (`"42"`). Only the bare number is anchored at the end.
static STREET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]{1,3}(?:ST|ND|RD|TH)|[A-Z]{1,25}|[0-9]{1,3}$)").expect("valid regex")
});

/// City words have 3 to 25 letters.
static CITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3,25}$").expect("valid regex"));

/// State words have 2 to 13 letters (`MASSACHUSETTS` is the longest).
static STATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2,13}$").expect("valid regex"));

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}(?:-[0-9]{4})?$").expect("valid regex"));

/// Builds a pattern matching any canonical form or variant in `table`.
///
/// With `matches_entirely` the pattern is anchored at both ends; with
/// `case_insensitive` it carries an inline `(?i)` flag.
#[must_use]
pub fn abbreviation_pattern(
    table: &AbbreviationTable,
    case_insensitive: bool,
    matches_entirely: bool,
) -> String {
    let alternatives: Vec<String> = table.spellings().map(regex::escape).collect();
    let mut pattern = format!("(?:{})", alternatives.join("|"));
    if matches_entirely {
        pattern = format!("^{pattern}$");
    }
    if case_insensitive {
        pattern = format!("(?i){pattern}");
    }
    pattern
}

/// One compiled pattern per address field.
#[derive(Debug, Clone)]
pub struct TokenClassifier {
    directional: Regex,
    suffix: Regex,
}

impl TokenClassifier {
    /// Compiles the table-driven patterns (directionals and suffixes).
    ///
    /// # Errors
    ///
    /// Returns [`TablesError::Pattern`] if a table is too large to compile
    /// into a single pattern.
    pub fn new(tables: &AddressTables) -> Result<Self, TablesError> {
        Ok(Self {
            directional: Regex::new(&abbreviation_pattern(&tables.directionals, true, true))?,
            suffix: Regex::new(&abbreviation_pattern(&tables.suffixes, true, true))?,
        })
    }

    /// Whether `token` may fill `field`.
    #[must_use]
    pub fn matches(&self, field: AddressField, token: &str) -> bool {
        let re = match field {
            AddressField::Number => &*NUMBER_RE,
            AddressField::PreDir | AddressField::PostDir => &self.directional,
            AddressField::Street => &*STREET_RE,
            AddressField::Suffix => &self.suffix,
            AddressField::City => &*CITY_RE,
            AddressField::State => &*STATE_RE,
            AddressField::Zip => &*ZIP_RE,
        };
        re.is_match(token)
    }

    /// Every field `token` may fill, in canonical order.
    #[must_use]
    pub fn classify(&self, token: &str) -> Vec<AddressField> {
        AddressField::ALL
            .into_iter()
            .filter(|field| self.matches(*field, token))
            .collect()
    }
}
