//! XML name utilities
//!
//! Element names handed to the encoder come from mapping keys and field
//! names, so they are not guaranteed to be legal XML. This module provides
//! the checks and the normalisation applied before a name is emitted.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix given to purely numeric element names
pub const NUMERIC_NAME_PREFIX: &str = "__numeric_";

/// Element name used when none was supplied
pub const DEFAULT_ELEMENT_NAME: &str = "noname";

// Decimal and exponent notation, surrounding whitespace allowed
static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?\s*$").unwrap()
});

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\-\.0-9]*$")
        .unwrap()
});

/// Check if a string reads as a number
pub fn is_numeric(name: &str) -> bool {
    NUMERIC.is_match(name)
}

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Check if a string is a valid QName (qualified name)
pub fn is_valid_qname(name: &str) -> bool {
    if let Some((prefix, local)) = name.split_once(':') {
        is_valid_ncname(prefix) && is_valid_ncname(local)
    } else {
        is_valid_ncname(name)
    }
}

/// Validate a QName and return an error if invalid
pub fn validate_qname(name: &str) -> Result<()> {
    if is_valid_qname(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid QName: '{}'", name)))
    }
}

/// Turn an optional caller-supplied name into something usable as an
/// element name: numeric names get [`NUMERIC_NAME_PREFIX`], missing or
/// empty names become [`DEFAULT_ELEMENT_NAME`].
pub fn element_name(name: Option<&str>) -> String {
    match name {
        Some(n) if is_numeric(n) => format!("{}{}", NUMERIC_NAME_PREFIX, n),
        Some(n) if !n.is_empty() => n.to_string(),
        _ => DEFAULT_ELEMENT_NAME.to_string(),
    }
}

/// Local part of a prefixed string (after the last colon), or the whole
/// string when there is no colon
pub fn local_part(name: &str) -> &str {
    match name.rfind(':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Prefix part of a prefixed string (before the last colon).
///
/// A leading colon does not count as a prefix separator.
pub fn prefix_of(name: &str) -> Option<&str> {
    match name.rfind(':') {
        Some(pos) if pos > 0 => Some(&name[..pos]),
        _ => None,
    }
}
