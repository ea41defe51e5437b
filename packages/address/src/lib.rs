#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Free-text US street address parsing.
//!
//! Turns strings like `"1972 n. dawson ave., chicago il"` into structured
//! [`Location`] candidates (number, directionals, street, suffix, city,
//! state, ZIP) for a geocoder to resolve against reference street data.
//!
//! # Architecture
//!
//! - **Normalize**: uppercase, strip punctuation (keeping `-` and `&`),
//!   collapse whitespace, drop half-address markers and units.
//! - **Classify**: each token is tested against one pattern per field.
//! - **Enumerate**: every shape of field labels with as many positions as
//!   there are tokens is tried; shapes whose tokens all classify become
//!   candidates.
//! - **Standardize**: each field is mapped to its preferred spelling
//!   using the lookup tables (`AVENUE` → `AVE`, `ILLINOIS` → `IL`).
//!
//! All tables, patterns and shapes are built once and are read-only, so a
//! parser can be shared freely between threads.
//!
//! # Usage
//!
//! ```rust
//! let candidates = openblock_address::parse("1972 N Dawson Ave, Chicago IL")?;
//! assert!(candidates.iter().any(|l| l.suffix.as_deref() == Some("AVE")));
//! # Ok::<(), openblock_address::ParsingError>(())
//! ```

pub mod batch;
pub mod classify;
pub mod combinations;
pub mod normalize;
pub mod parser;
pub mod progress;
pub mod standardize;
pub mod tables;

pub use openblock_address_models::{
    AddressField, BlockFields, Location, ParsedRecord, UnknownFieldError,
};

pub use normalize::{normalize, strip_unit};
pub use parser::{AddressParser, ParsingError, parse, tokenize};
pub use standardize::{Standardize, Standardizer, Standardizers, number_standardizer};
pub use tables::{AbbreviationTable, AddressTables, TablesError};
