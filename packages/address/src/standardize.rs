//! Standardization of address components to their preferred forms.
//!
//! A [`Standardizer`] is built from an [`AbbreviationTable`] and maps any
//! known spelling (`"avenu"`, `"Avenue"`) to its canonical form (`"AVE"`).
//! Unknown tokens pass through untouched: standardization is best-effort
//! normalization, never validation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use openblock_address_models::{AddressField, BlockFields, Location};
use regex::Regex;

use crate::tables::{AbbreviationTable, AddressTables};

/// A house number, optionally lettered, optionally hyphenated
/// (`"123"`, `"12A"`, `"123-02"`, `"12A-12B"`).
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)[A-Z]?(?:-[0-9]+[A-Z]?)?$").expect("valid regex"));

/// Maps one raw address component to its standard form.
pub trait Standardize: Send + Sync {
    /// Returns the standard form of `token`, or `token` itself if it is
    /// not recognized.
    fn standardize(&self, token: &str) -> String;
}

/// Table-driven standardizer: variant → canonical, matched
/// case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct Standardizer {
    replacements: BTreeMap<String, String>,
}

impl Standardizer {
    /// Builds a standardizer from a canonical → variants table.
    ///
    /// Every canonical form also maps to itself, so already-standard input
    /// round-trips. When two canonical forms claim the same spelling, the
    /// one registered last wins.
    #[must_use]
    pub fn new(table: &AbbreviationTable) -> Self {
        let mut standardizer = Self::default();
        standardizer.register(table);
        standardizer
    }

    /// Returns this standardizer with `table` registered on top, so its
    /// entries take precedence over existing ones.
    #[must_use]
    pub fn with_overrides(mut self, table: &AbbreviationTable) -> Self {
        self.register(table);
        self
    }

    fn register(&mut self, table: &AbbreviationTable) {
        for (canonical, variants) in table.iter() {
            let canonical = canonical.to_uppercase();
            for variant in variants {
                self.replacements
                    .insert(variant.to_uppercase(), canonical.clone());
            }
            self.replacements.insert(canonical.clone(), canonical);
        }
    }

    /// Whether `token` is a known spelling (variant or canonical form).
    #[must_use]
    pub fn is_known(&self, token: &str) -> bool {
        self.replacements.contains_key(&token.to_uppercase())
    }

    /// Number of recognized spellings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

impl Standardize for Standardizer {
    fn standardize(&self, token: &str) -> String {
        self.replacements
            .get(&token.to_uppercase())
            .map_or_else(|| token.to_string(), Clone::clone)
    }
}

/// Reduces a house number to its first digit group, dropping any letter
/// and any second hyphenated number (`"123-02"` → `"123"`, as used in
/// Queens addresses; also collapses ranges like `"100-200"`).
///
/// Input outside the house-number grammar is returned unchanged.
#[must_use]
pub fn number_standardizer(token: &str) -> String {
    NUMBER_RE
        .captures(token)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| token.to_string(), |m| m.as_str().to_string())
}

/// [`number_standardizer`] as a [`Standardize`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberStandardizer;

impl Standardize for NumberStandardizer {
    fn standardize(&self, token: &str) -> String {
        number_standardizer(token)
    }
}

/// The standardizer for every address field, plus highway prefixes.
#[derive(Debug, Clone)]
pub struct Standardizers {
    number: NumberStandardizer,
    directional: Standardizer,
    street: Standardizer,
    suffix: Standardizer,
    city: Standardizer,
    state: Standardizer,
    prefix: Standardizer,
}

impl Standardizers {
    /// Builds all standardizers from `tables`.
    #[must_use]
    pub fn new(tables: &AddressTables) -> Self {
        Self {
            number: NumberStandardizer,
            directional: Standardizer::new(&tables.directionals),
            street: Standardizer::new(&tables.numbered_streets),
            suffix: Standardizer::new(&tables.suffixes),
            city: Standardizer::new(&tables.cities),
            state: Standardizer::new(&tables.states),
            prefix: Standardizer::new(&tables.state_highway_prefixes())
                .with_overrides(&tables.prefixes),
        }
    }

    /// Returns the standardizer registered for `field`. ZIP codes have
    /// none and are passed through verbatim.
    #[must_use]
    pub fn for_field(&self, field: AddressField) -> Option<&dyn Standardize> {
        match field {
            AddressField::Number => Some(&self.number),
            AddressField::PreDir | AddressField::PostDir => Some(&self.directional),
            AddressField::Street => Some(&self.street),
            AddressField::Suffix => Some(&self.suffix),
            AddressField::City => Some(&self.city),
            AddressField::State => Some(&self.state),
            AddressField::Zip => None,
        }
    }

    /// Standardizes one raw value for `field`.
    #[must_use]
    pub fn apply(&self, field: AddressField, value: &str) -> String {
        self.for_field(field)
            .map_or_else(|| value.to_string(), |s| s.standardize(value))
    }

    /// Standardizes every field that is set.
    pub fn standardize_location(&self, location: &mut Location) {
        for field in AddressField::ALL {
            let Some(standardizer) = self.for_field(field) else {
                continue;
            };
            if let Some(value) = location.get(field) {
                let standardized = standardizer.standardize(value);
                log::debug!("parse: standardized {value:?} to {standardized:?}");
                location.set(field, Some(standardized));
            }
        }
    }

    /// Standardizes a highway prefix (`"US HWY"` → `"US HIGHWAY"`,
    /// `"KENTUCKY"` → `"KY HIGHWAY"`).
    #[must_use]
    pub fn standardize_prefix(&self, value: &str) -> String {
        self.prefix.standardize(value)
    }

    /// Standardizes a reference block record with the same tables used for
    /// parsed addresses, so the geocoder compares like with like.
    ///
    /// The street name is left alone when the block has a highway prefix
    /// (`"US HIGHWAY 101"` must not become `"101ST"`). Address-range
    /// numbers are reduced with [`number_standardizer`]; numbers that end
    /// up empty become `None`.
    pub fn standardize_block(&self, block: &mut BlockFields) {
        let has_prefix = block
            .prefix
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());

        let standardize = |value: &mut Option<String>, standardizer: &Standardizer| {
            if let Some(v) = value.as_mut() {
                *v = standardizer.standardize(v);
            }
        };

        standardize(&mut block.prefix, &self.prefix);
        standardize(&mut block.pre_dir, &self.directional);
        if !has_prefix {
            standardize(&mut block.street, &self.street);
        }
        standardize(&mut block.suffix, &self.suffix);
        standardize(&mut block.post_dir, &self.directional);
        standardize(&mut block.city, &self.city);
        standardize(&mut block.state, &self.state);

        for num in [
            &mut block.left_from_num,
            &mut block.left_to_num,
            &mut block.right_from_num,
            &mut block.right_to_num,
        ] {
            *num = num
                .take()
                .map(|n| number_standardizer(n.trim()))
                .filter(|n| !n.is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffix_table() -> AbbreviationTable {
        [
            ("AVE", vec!["AVENUE", "AVENU"]),
            ("ST", vec!["STREET", "STR"]),
            ("RD", vec!["ROAD"]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn standardizes_variants_case_insensitively() {
        let standardizer = Standardizer::new(&suffix_table());
        assert_eq!(standardizer.standardize("avenu"), "AVE");
        assert_eq!(standardizer.standardize("Avenue"), "AVE");
        assert_eq!(standardizer.standardize("ROAD"), "RD");
    }

    #[test]
    fn canonical_forms_round_trip() {
        let table = suffix_table();
        let standardizer = Standardizer::new(&table);
        for (canonical, _) in table.iter() {
            assert_eq!(standardizer.standardize(canonical), canonical);
        }
    }

    #[test]
    fn builtin_canonical_forms_round_trip() {
        let tables = AddressTables::builtin();
        for table in [
            &tables.suffixes,
            &tables.directionals,
            &tables.states,
            &tables.cities,
            &tables.numbered_streets,
        ] {
            let standardizer = Standardizer::new(table);
            for (canonical, _) in table.iter() {
                assert_eq!(standardizer.standardize(canonical), canonical);
            }
        }
    }

    #[test]
    fn unknown_tokens_pass_through_unchanged() {
        let standardizer = Standardizer::new(&suffix_table());
        assert_eq!(standardizer.standardize("wabash"), "wabash");
        assert_eq!(standardizer.standardize("MAIN"), "MAIN");
        assert!(!standardizer.is_known("wabash"));
        assert!(standardizer.is_known("str"));
    }

    #[test]
    fn accepts_single_string_variants() {
        let table: AbbreviationTable = toml::de::from_str("N = \"NORTH\"\n").unwrap();
        let standardizer = Standardizer::new(&table);
        assert_eq!(standardizer.standardize("north"), "N");
        assert_eq!(standardizer.standardize("n"), "N");
        assert_eq!(standardizer.len(), 2);
    }

    #[test]
    fn overrides_take_precedence() {
        let base: AbbreviationTable = [("FM HIGHWAY", ["FM"])].into_iter().collect();
        let explicit: AbbreviationTable = [("FM", ["FARM TO MARKET"])].into_iter().collect();
        let standardizer = Standardizer::new(&base).with_overrides(&explicit);
        assert_eq!(standardizer.standardize("FM"), "FM");
        assert_eq!(standardizer.standardize("farm to market"), "FM");
    }

    #[test]
    fn number_keeps_first_group() {
        assert_eq!(number_standardizer("1-2"), "1");
        assert_eq!(number_standardizer("100-200"), "100");
        assert_eq!(number_standardizer("12A-12B"), "12");
        assert_eq!(number_standardizer("1972"), "1972");
    }

    #[test]
    fn number_ignores_non_ascii_digits() {
        assert_eq!(number_standardizer("\u{661}\u{662}-3"), "\u{661}\u{662}-3");
    }

    #[test]
    fn number_passes_through_unmatched_input() {
        assert_eq!(number_standardizer("x"), "x");
        assert_eq!(number_standardizer(""), "");
        assert_eq!(number_standardizer("12-"), "12-");
    }

    #[test]
    fn builtin_field_standardizers() {
        let standardizers = Standardizers::new(AddressTables::builtin());
        for (field, raw, expected) in [
            (AddressField::PreDir, "north", "N"),
            (AddressField::PostDir, "SOUTHWEST", "SW"),
            (AddressField::Suffix, "BOULEVARD", "BLVD"),
            (AddressField::Street, "FIRST", "1ST"),
            (AddressField::Street, "TWENTY FIRST", "21ST"),
            (AddressField::State, "ILLINOIS", "IL"),
            (AddressField::State, "NEW YORK", "NY"),
            (AddressField::City, "CHGO", "CHICAGO"),
            (AddressField::Number, "123-02", "123"),
            (AddressField::Zip, "60601", "60601"),
        ] {
            assert_eq!(standardizers.apply(field, raw), expected, "{field} {raw}");
        }
        assert!(standardizers.for_field(AddressField::Zip).is_none());
    }

    #[test]
    fn standardizes_every_set_location_field() {
        let standardizers = Standardizers::new(AddressTables::builtin());
        let mut location = Location {
            number: Some("12A".to_string()),
            pre_dir: Some("NORTH".to_string()),
            street: Some("DAWSON".to_string()),
            suffix: Some("AVENUE".to_string()),
            zip: Some("60601".to_string()),
            ..Location::default()
        };
        standardizers.standardize_location(&mut location);
        assert_eq!(location.number.as_deref(), Some("12"));
        assert_eq!(location.pre_dir.as_deref(), Some("N"));
        assert_eq!(location.street.as_deref(), Some("DAWSON"));
        assert_eq!(location.suffix.as_deref(), Some("AVE"));
        assert_eq!(location.zip.as_deref(), Some("60601"));
        assert!(location.city.is_none());
    }

    #[test]
    fn standardizes_highway_prefixes() {
        let standardizers = Standardizers::new(AddressTables::builtin());
        assert_eq!(standardizers.standardize_prefix("US HWY"), "US HIGHWAY");
        assert_eq!(standardizers.standardize_prefix("hwy"), "HIGHWAY");
        assert_eq!(standardizers.standardize_prefix("KENTUCKY"), "KY HIGHWAY");
        assert_eq!(
            standardizers.standardize_prefix("CALIFORNIA COUNTY ROAD"),
            "CA COUNTY ROAD"
        );
        // The explicit farm-to-market prefix wins over the derived
        // Micronesia highway.
        assert_eq!(standardizers.standardize_prefix("FM"), "FM");
    }

    #[test]
    fn standardizes_block_records() {
        let standardizers = Standardizers::new(AddressTables::builtin());
        let mut block = BlockFields {
            pre_dir: Some("NORTH".to_string()),
            street: Some("FIRST".to_string()),
            suffix: Some("STREET".to_string()),
            state: Some("ILLINOIS".to_string()),
            left_from_num: Some(" 19-47 ".to_string()),
            left_to_num: Some("247B".to_string()),
            right_from_num: Some("  ".to_string()),
            right_to_num: None,
            ..BlockFields::default()
        };
        standardizers.standardize_block(&mut block);
        assert_eq!(block.pre_dir.as_deref(), Some("N"));
        assert_eq!(block.street.as_deref(), Some("1ST"));
        assert_eq!(block.suffix.as_deref(), Some("ST"));
        assert_eq!(block.state.as_deref(), Some("IL"));
        assert_eq!(block.left_from_num.as_deref(), Some("19"));
        assert_eq!(block.left_to_num.as_deref(), Some("247"));
        assert!(block.right_from_num.is_none());
        assert!(block.right_to_num.is_none());
    }

    #[test]
    fn block_street_untouched_under_highway_prefix() {
        let standardizers = Standardizers::new(AddressTables::builtin());
        let mut block = BlockFields {
            prefix: Some("US HWY".to_string()),
            street: Some("FIRST".to_string()),
            ..BlockFields::default()
        };
        standardizers.standardize_block(&mut block);
        assert_eq!(block.prefix.as_deref(), Some("US HIGHWAY"));
        assert_eq!(block.street.as_deref(), Some("FIRST"));
    }
}
