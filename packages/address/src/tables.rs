//! Lookup tables for address standardization.
//!
//! Each table maps a canonical form to the spellings that should be
//! standardized to it. The built-in tables are TOML files under `tables/`,
//! embedded at compile time via [`include_str!`]. Deployments can replace
//! any of them with a tables file loaded through
//! [`AddressTables::from_path`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Deserializer};

/// Errors from loading a tables file.
#[derive(Debug, thiserror::Error)]
pub enum TablesError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid tables document.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A table could not be compiled into a token pattern.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Variants for one canonical form, written in TOML either as a single
/// string or as an array of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Variants {
    One(String),
    Many(Vec<String>),
}

impl Variants {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(v) => vec![v],
            Self::Many(vs) => vs,
        }
    }
}

/// Canonical form → accepted variants, ordered by canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbbreviationTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl<'de> Deserialize<'de> for AbbreviationTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Variants>::deserialize(deserializer)?;
        Ok(Self {
            entries: raw.into_iter().map(|(k, v)| (k, v.into_vec())).collect(),
        })
    }
}

impl<K, V, I> FromIterator<(K, I)> for AbbreviationTable
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = V>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut table = Self::default();
        for (canonical, variants) in iter {
            table.insert(canonical, variants);
        }
        table
    }
}

impl AbbreviationTable {
    /// Adds variants for `canonical`, appending to any already present.
    pub fn insert<V: Into<String>>(
        &mut self,
        canonical: impl Into<String>,
        variants: impl IntoIterator<Item = V>,
    ) {
        self.entries
            .entry(canonical.into())
            .or_default()
            .extend(variants.into_iter().map(Into::into));
    }

    /// Iterates over `(canonical, variants)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Iterates over every canonical form and every variant.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| std::iter::once(k.as_str()).chain(vs.iter().map(String::as_str)))
    }

    /// Number of canonical forms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains_canonical(&self, canonical: &str) -> bool {
        self.entries.contains_key(canonical)
    }
}

/// The full set of lookup tables the parser is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTables {
    /// Street suffixes (`AVE` ← `AVENUE`).
    pub suffixes: AbbreviationTable,
    /// Compass directionals (`N` ← `NORTH`).
    pub directionals: AbbreviationTable,
    /// States and territories (`IL` ← `ILLINOIS`).
    pub states: AbbreviationTable,
    /// Cities (`CHICAGO` ← `CHGO`).
    pub cities: AbbreviationTable,
    /// Numbered street names (`1ST` ← `FIRST`).
    pub numbered_streets: AbbreviationTable,
    /// Highway prefixes (`US HIGHWAY` ← `US HWY`).
    pub prefixes: AbbreviationTable,
}

/// Sections of a user tables file. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TablesFile {
    suffixes: Option<AbbreviationTable>,
    directionals: Option<AbbreviationTable>,
    states: Option<AbbreviationTable>,
    cities: Option<AbbreviationTable>,
    numbered_streets: Option<AbbreviationTable>,
    prefixes: Option<AbbreviationTable>,
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SUFFIXES_TOML: &str = include_str!("../tables/suffixes.toml");
const DIRECTIONALS_TOML: &str = include_str!("../tables/directionals.toml");
const STATES_TOML: &str = include_str!("../tables/states.toml");
const CITIES_TOML: &str = include_str!("../tables/cities.toml");
const NUMBERED_STREETS_TOML: &str = include_str!("../tables/numbered_streets.toml");
const PREFIXES_TOML: &str = include_str!("../tables/prefixes.toml");

static BUILTIN: LazyLock<AddressTables> = LazyLock::new(|| AddressTables {
    suffixes: parse_builtin("suffixes", SUFFIXES_TOML),
    directionals: parse_builtin("directionals", DIRECTIONALS_TOML),
    states: parse_builtin("states", STATES_TOML),
    cities: parse_builtin("cities", CITIES_TOML),
    numbered_streets: parse_builtin("numbered_streets", NUMBERED_STREETS_TOML),
    prefixes: parse_builtin("prefixes", PREFIXES_TOML),
});

/// # Panics
///
/// Panics if an embedded table is malformed (a compile-time guarantee
/// since the files ship with the crate).
fn parse_builtin(name: &str, toml_str: &str) -> AbbreviationTable {
    toml::de::from_str(toml_str)
        .unwrap_or_else(|e| panic!("Failed to parse built-in table '{name}': {e}"))
}

impl AddressTables {
    /// Returns the tables embedded in the crate.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Parses a tables document. Each section present (`[suffixes]`,
    /// `[directionals]`, `[states]`, `[cities]`, `[numbered_streets]`,
    /// `[prefixes]`) replaces the corresponding built-in table.
    ///
    /// # Errors
    ///
    /// Returns [`TablesError::Toml`] if the document is not valid TOML or
    /// contains an unknown section.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, TablesError> {
        let file: TablesFile = toml::de::from_str(toml_str)?;
        let builtin = Self::builtin();
        let tables = Self {
            suffixes: file.suffixes.unwrap_or_else(|| builtin.suffixes.clone()),
            directionals: file
                .directionals
                .unwrap_or_else(|| builtin.directionals.clone()),
            states: file.states.unwrap_or_else(|| builtin.states.clone()),
            cities: file.cities.unwrap_or_else(|| builtin.cities.clone()),
            numbered_streets: file
                .numbered_streets
                .unwrap_or_else(|| builtin.numbered_streets.clone()),
            prefixes: file.prefixes.unwrap_or_else(|| builtin.prefixes.clone()),
        };
        log::debug!(
            "Loaded tables: {} suffixes, {} states, {} cities",
            tables.suffixes.len(),
            tables.states.len(),
            tables.cities.len()
        );
        Ok(tables)
    }

    /// Reads and parses a tables file.
    ///
    /// # Errors
    ///
    /// Returns [`TablesError::Io`] if the file cannot be read, or
    /// [`TablesError::Toml`] if it cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TablesError> {
        let path = path.as_ref();
        log::info!("Loading address tables from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Highway prefixes derived from the states table: for Kentucky,
    /// `KY HIGHWAY` ← `KY`, `KENTUCKY`, `KENTUCKY HIGHWAY`, `KY HWY`, plus
    /// `KY STATE HIGHWAY` and `KY COUNTY ROAD` with their spellings.
    #[must_use]
    pub fn state_highway_prefixes(&self) -> AbbreviationTable {
        let mut table = AbbreviationTable::default();
        for (abbr, names) in self.states.iter() {
            let highway = format!("{abbr} HIGHWAY");
            table.insert(
                highway.clone(),
                [highway, abbr.to_string(), format!("{abbr} HWY")],
            );
            let state_highway = format!("{abbr} STATE HIGHWAY");
            table.insert(
                state_highway.clone(),
                [state_highway, format!("{abbr} ST HWY")],
            );
            let county_road = format!("{abbr} COUNTY ROAD");
            table.insert(
                county_road.clone(),
                [county_road, format!("{abbr} COUNTY RD")],
            );
            for name in names {
                table.insert(
                    format!("{abbr} HIGHWAY"),
                    [name.clone(), format!("{name} HIGHWAY")],
                );
                table.insert(
                    format!("{abbr} STATE HIGHWAY"),
                    [format!("{name} STATE HIGHWAY")],
                );
                table.insert(
                    format!("{abbr} COUNTY ROAD"),
                    [format!("{name} COUNTY ROAD")],
                );
            }
        }
        table
    }
}

impl Default for AddressTables {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
