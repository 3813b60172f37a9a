//! The record value type, its field bounds, and the name normalization
//! policy shared by the store and the persistence codec.

use serde::Serialize;

use crate::error::{InvalidRecord, StoreError};

// ==============================================================================
// Field Bounds
// ==============================================================================

pub const KEY_MIN: u32 = 1;
pub const KEY_MAX: u32 = 99_999;
pub const SCORE_MAX: u8 = 100;
pub const PASS_THRESHOLD: u8 = 40;

/// Names longer than this many characters (not bytes) are truncated.
pub const MAX_NAME_CHARS: usize = 100;

/// Stored in place of an empty name.
pub const DEFAULT_NAME: &str = "Unnamed";

// ==============================================================================
// Record
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// A single roll entry: roll number, display name and score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub key: u32,
    pub name: String,
    pub score: u8,
}

impl Record {
    /// Build a record, taking a normalized owned copy of `name`.
    ///
    /// Bounds are not checked here; see [`Record::validate`].
    pub fn new(key: u32, name: &str, score: u8) -> Result<Self, StoreError> {
        Ok(Self {
            key,
            name: normalize_name(name)?,
            score,
        })
    }

    pub fn passed(&self) -> bool {
        self.score >= PASS_THRESHOLD
    }

    pub fn status(&self) -> Status {
        if self.passed() {
            Status::Pass
        } else {
            Status::Fail
        }
    }

    pub fn validate(&self) -> Result<(), InvalidRecord> {
        check_bounds(i64::from(self.key), i64::from(self.score)).map(|_| ())
    }
}

/// Check raw key and score values against the record bounds, narrowing them
/// to their stored widths on success.
pub fn check_bounds(key: i64, score: i64) -> Result<(u32, u8), InvalidRecord> {
    let key = u32::try_from(key)
        .ok()
        .filter(|k| (KEY_MIN..=KEY_MAX).contains(k))
        .ok_or(InvalidRecord::Key(key))?;
    let score = u8::try_from(score)
        .ok()
        .filter(|s| *s <= SCORE_MAX)
        .ok_or(InvalidRecord::Score(score))?;
    Ok((key, score))
}

/// Apply the name policy: surrounding whitespace is trimmed, input longer
/// than [`MAX_NAME_CHARS`] characters is cut on a char boundary, a name left
/// empty becomes [`DEFAULT_NAME`], and line terminators are replaced with
/// spaces so a name always fits on one line.
///
/// The result is a fixed point of the codec: writing it out and reading it
/// back yields the same name.
pub fn normalize_name(raw: &str) -> Result<String, StoreError> {
    let raw = raw.trim();
    let end = raw
        .char_indices()
        .nth(MAX_NAME_CHARS)
        .map_or(raw.len(), |(idx, _)| idx);
    let kept = raw[..end].trim_end();
    let kept = if kept.is_empty() { DEFAULT_NAME } else { kept };

    let mut name = String::new();
    name.try_reserve_exact(kept.len())?;
    name.extend(
        kept.chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c }),
    );
    Ok(name)
}
