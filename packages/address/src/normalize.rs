//! Address string normalization and unit stripping.
//!
//! Free-text addresses arrive in many shapes:
//! - Mixed case and stray punctuation: `"1972 n. dawson ave., chicago il"`
//! - Half addresses: `"123 1/2 MAIN ST"`
//! - Spaced ranges: `"100 - 102 BROADWAY"`
//! - ZIP+4 codes: `"60601-1234"`
//! - Apartment and suite designations: `"45 carlton ave #12"`
//!
//! [`normalize`] reduces these to an uppercased, single-spaced form and
//! [`strip_unit`] removes a trailing unit designation. Both are total.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Half-address marker (`"1/2"`, `"I/2"`). Only removed when flanked by
/// whitespace on both sides, which is checked against the haystack.
static HALF_ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[I1]/2").expect("valid regex"));

/// A run of dashes with optional surrounding whitespace. Collapsed to a
/// single dash only when a digit sits on both sides.
static MULTI_DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-+\s*").expect("valid regex"));

/// ASCII punctuation except dash (hyphenated house numbers) and ampersand
/// (intersections).
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"[!"#$%'()*+,./:;<=>?@\[\\\]^_`{|}~]"##).expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// A ZIP+4 making up the whole string; the `+4` part is dropped.
static ZIP_PLUS_4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{5})-[0-9]{4}$").expect("valid regex"));

/// Trailing apartment, suite, space, or unit designation.
static UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\s*,)?\s*(?:space\s+|suite\s+|ste\.?\s+|unit:?\s+|apt\.?\s+|#\s*)[-#0-9a-z]*$",
    )
    .expect("valid regex")
});

/// Replaces every match of `re` whose neighbouring characters satisfy
/// `flanked`. Other matches are left as-is.
fn replace_flanked(
    re: &Regex,
    haystack: &str,
    replacement: &str,
    flanked: impl Fn(Option<char>, Option<char>) -> bool,
) -> String {
    re.replace_all(haystack, |caps: &Captures<'_>| {
        let m = caps.get(0).map_or(0..0, |m| m.range());
        let before = haystack[..m.start].chars().next_back();
        let after = haystack[m.end..].chars().next();
        if flanked(before, after) {
            replacement.to_string()
        } else {
            caps[0].to_string()
        }
    })
    .into_owned()
}

fn is_space(c: Option<char>) -> bool {
    c.is_some_and(char::is_whitespace)
}

fn is_digit(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_ascii_digit())
}

/// Normalizes an address string for parsing and comparison.
///
/// The pipeline:
/// 1. Uppercase
/// 2. Drop whitespace-delimited `1/2` half-address markers
/// 3. Collapse dash runs between digits (`"100 -- 102"` → `"100-102"`)
/// 4. Strip punctuation other than `-` and `&`
/// 5. Collapse whitespace and trim
/// 6. Drop the `+4` of a bare ZIP+4
///
/// The pipeline is rerun until its output is stable, so
/// `normalize(normalize(s)) == normalize(s)` for every input (stripping
/// punctuation can expose a new dash run, as in `"1 -/- 2"`).
#[must_use]
pub fn normalize(location: &str) -> String {
    let mut normalized = normalize_once(location);
    loop {
        let again = normalize_once(&normalized);
        if again == normalized {
            break;
        }
        normalized = again;
    }
    log::debug!("normalized: {location:?} to {normalized:?}");
    normalized
}

fn normalize_once(location: &str) -> String {
    let upper = location.to_uppercase();
    let no_half = replace_flanked(&HALF_ADDRESS_RE, &upper, "", |b, a| {
        is_space(b) && is_space(a)
    });
    let dashes = replace_flanked(&MULTI_DASH_RE, &no_half, "-", |b, a| {
        is_digit(b) && is_digit(a)
    });
    let no_punct = PUNCTUATION_RE.replace_all(&dashes, "");
    let spaced = WHITESPACE_RE.replace_all(no_punct.trim(), " ");
    ZIP_PLUS_4_RE.replace(&spaced, "$1").into_owned()
}

/// Strips a trailing apartment, suite, space, or unit number.
///
/// Matching is case-insensitive, so this works on raw and normalized input
/// alike. Input without a unit designation is returned unchanged.
#[must_use]
pub fn strip_unit(location: &str) -> String {
    UNIT_RE.replace(location, "").into_owned()
}
