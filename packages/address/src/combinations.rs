//! Enumeration of address shapes.
//!
//! A shape is the sequence of field labels a tokenized address could
//! follow, for example `[Number, PreDir, Street, Suffix]`. The grammar is
//! fixed: fields always appear in canonical order, street/city/state may
//! span several tokens, and a state is only allowed after a city.

use std::collections::BTreeMap;
use std::fmt;

use openblock_address_models::AddressField;

/// How many times each field may repeat. State counts are further
/// restricted to zero when no city is present.
const NUMBER_TIMES: &[usize] = &[0, 1];
const PRE_DIR_TIMES: &[usize] = &[0, 1];
const STREET_TIMES: &[usize] = &[1, 2, 3, 4, 5];
const SUFFIX_TIMES: &[usize] = &[0, 1];
const POST_DIR_TIMES: &[usize] = &[0, 1];
const CITY_TIMES: &[usize] = &[0, 1, 2, 3, 4];
const STATE_TIMES: &[usize] = &[0, 1, 2];
const ZIP_TIMES: &[usize] = &[0, 1];

/// One candidate assignment of field labels to token positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<AddressField>);

impl Shape {
    fn from_counts(counts: &[usize]) -> Self {
        let labels = AddressField::ALL
            .into_iter()
            .zip(counts)
            .flat_map(|(field, &times)| std::iter::repeat_n(field, times))
            .collect();
        Self(labels)
    }

    /// Number of tokens this shape consumes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> &[AddressField] {
        &self.0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

/// Repeat counts per field, in canonical order.
const FIELD_TIMES: [&[usize]; 8] = [
    NUMBER_TIMES,
    PRE_DIR_TIMES,
    STREET_TIMES,
    SUFFIX_TIMES,
    POST_DIR_TIMES,
    CITY_TIMES,
    STATE_TIMES,
    ZIP_TIMES,
];

/// Lazily yields every shape, in nested-loop order: number outermost,
/// then pre-directional, street, suffix, post-directional, city, state,
/// and ZIP innermost.
pub fn address_combinations() -> impl Iterator<Item = Shape> {
    let start: Box<dyn Iterator<Item = Vec<usize>>> = Box::new(std::iter::once(Vec::new()));
    FIELD_TIMES
        .into_iter()
        .fold(start, |counts, times| {
            Box::new(counts.flat_map(move |prefix| {
                times.iter().map(move |&n| {
                    let mut next = prefix.clone();
                    next.push(n);
                    next
                })
            }))
        })
        .filter(|counts| state_has_city(counts))
        .map(|counts| Shape::from_counts(&counts))
}

/// A state is only allowed after a city.
fn state_has_city(counts: &[usize]) -> bool {
    let city = counts[AddressField::City as usize];
    let state = counts[AddressField::State as usize];
    city > 0 || state == 0
}

/// Every shape, materialized once and bucketed by length. Within a
/// bucket, shapes keep their generation order.
#[derive(Debug, Clone)]
pub struct ShapeIndex {
    by_len: BTreeMap<usize, Vec<Shape>>,
    total: usize,
}

impl ShapeIndex {
    #[must_use]
    pub fn new() -> Self {
        let mut by_len: BTreeMap<usize, Vec<Shape>> = BTreeMap::new();
        let mut total = 0;
        for shape in address_combinations() {
            by_len.entry(shape.len()).or_default().push(shape);
            total += 1;
        }
        Self { by_len, total }
    }

    /// Shapes consuming exactly `len` tokens. Empty beyond the longest
    /// shape, so over-long input costs no regex work at all.
    #[must_use]
    pub fn with_len(&self, len: usize) -> &[Shape] {
        self.by_len.get(&len).map_or(&[], Vec::as_slice)
    }

    /// Total number of shapes.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Length of the longest shape.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.by_len.keys().next_back().copied().unwrap_or(0)
    }
}

impl Default for ShapeIndex {
    fn default() -> Self {
        Self::new()
    }
}
