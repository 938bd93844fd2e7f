//! NAF code normalization
//!
//! Raw codes show up as `01`, `01.1`, `01.11Z` or `0111ZA` depending on the
//! source. The canonical shape drops the period and surrounding whitespace and
//! keeps 2 to 6 characters: up to four digits, then up to two letters.
//!
//! | Length | Level    | Example  |
//! |--------|----------|----------|
//! | 2      | division | `01`     |
//! | 3      | group    | `011`    |
//! | 5      | class    | `0111Z`  |
//! | 6      | variant  | `0111ZA` |

use std::fmt;

/// Shortest raw or canonical code
pub const MIN_CODE_LEN: usize = 2;

/// Longest raw or canonical code
pub const MAX_CODE_LEN: usize = 6;

/// Leading positions that must be digits
const DIGIT_POSITIONS: usize = 4;

/// Characters identifying a class; a 6th character is a variant suffix
pub const CLASS_PREFIX_LEN: usize = 5;

/// A canonical classification code
///
/// Only built through [`normalize_code`], so the inner string is always ASCII,
/// 2 to 6 characters long, digits first then letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassCode(String);

impl ClassCode {
    /// Normalize a raw code, see [`normalize_code`]
    pub fn parse(raw: &str) -> Option<Self> {
        normalize_code(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a normalized code
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Division code (first 2 characters)
    pub fn division(&self) -> &str {
        &self.0[..MIN_CODE_LEN]
    }

    /// Group code (first 3 characters), if the code is that long
    pub fn group(&self) -> Option<&str> {
        self.0.get(..3)
    }

    /// Class identity (first 5 characters), if the code is that long
    pub fn class_prefix(&self) -> Option<&str> {
        self.0.get(..CLASS_PREFIX_LEN)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ClassCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClassCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalize a raw code or return `None` if it is not a classification code
///
/// The length check applies to the raw input, before the period is removed
/// and before trimming. A result shorter than [`MIN_CODE_LEN`] is rejected as
/// well, so normalizing a canonical code always returns it unchanged.
pub fn normalize_code(raw: &str) -> Option<ClassCode> {
    if !(MIN_CODE_LEN..=MAX_CODE_LEN).contains(&raw.len()) {
        return None;
    }

    let without_period = raw.replacen('.', "", 1);
    let code = without_period.trim();

    if code.len() < MIN_CODE_LEN {
        return None;
    }

    let well_formed = code.chars().enumerate().all(|(i, c)| {
        if i < DIGIT_POSITIONS {
            c.is_ascii_digit()
        } else {
            c.is_ascii_alphabetic()
        }
    });

    well_formed.then(|| ClassCode(code.to_string()))
}

/// Whether two codes designate the same class
///
/// Compares only the first [`CLASS_PREFIX_LEN`] characters, so `0111Z` and
/// `0111ZA` collide. Codes shorter than a class never match.
pub fn same_class(a: &str, b: &str) -> bool {
    match (a.get(..CLASS_PREFIX_LEN), b.get(..CLASS_PREFIX_LEN)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}
