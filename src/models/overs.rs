//! Overs bowled in "overs.balls" notation.
//!
//! `4.3` means four complete overs plus three balls of the fifth, not
//! 4.3 decimal overs. The digit after the point counts balls (0-5) and
//! six balls roll over into the whole part.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Balls in a complete over.
pub const BALLS_PER_OVER: u32 = 6;

/// Largest whole-overs part whose ball count still fits in a `u32`.
pub const MAX_OVERS: u32 = (u32::MAX - (BALLS_PER_OVER - 1)) / BALLS_PER_OVER;

/// Errors from the strict overs grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OversError {
    #[error("Overs value is empty")]
    Empty,

    #[error("Invalid overs value '{0}': expected <overs>[.<balls 0-5>]")]
    Malformed(String),

    #[error("Overs value '{0}' is too large")]
    OutOfRange(String),
}

fn overs_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+(\.[0-5])?$").expect("static overs pattern"))
}

/// An overs-bowled value exactly as it was recorded.
///
/// The raw text is kept so that out-of-contract values already in the
/// store survive a round trip; [`Overs::balls`] interprets it leniently
/// and [`Overs::parse`] enforces the grammar for new input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Overs(String);

impl Overs {
    /// Zero overs.
    pub fn zero() -> Self {
        Self("0".to_string())
    }

    /// Parse a value, accepting only `<int>` or `<int>.<0-5>`.
    pub fn parse(s: &str) -> Result<Self, OversError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(OversError::Empty);
        }
        if !overs_pattern().is_match(s) {
            return Err(OversError::Malformed(s.to_string()));
        }
        let whole = s.split('.').next().unwrap_or(s);
        match whole.parse::<u32>() {
            Ok(overs) if overs <= MAX_OVERS => Ok(Self(s.to_string())),
            _ => Err(OversError::OutOfRange(s.to_string())),
        }
    }

    /// Wrap a value without validating it.
    pub fn raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Build the display value for a number of legal balls.
    pub fn from_balls(balls: u64) -> Self {
        let per_over = u64::from(BALLS_PER_OVER);
        Self(format!("{}.{}", balls / per_over, balls % per_over))
    }

    /// Legal balls this value represents.
    ///
    /// Lenient: an unparseable whole part counts as zero overs and a
    /// fractional part that is not a single 0-5 digit (after dropping
    /// trailing zeros, so `"4.30"` reads as `"4.3"`) counts as zero
    /// balls. One bad record must not blank out a player's figures.
    pub fn balls(&self) -> u32 {
        let s = self.0.trim();
        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        let overs: u32 = whole.parse().unwrap_or(0);
        let fraction = fraction.trim_end_matches('0');
        let balls = match fraction.parse::<u32>() {
            Ok(b) if fraction.len() == 1 && b < BALLS_PER_OVER => b,
            _ => 0,
        };

        overs.saturating_mul(BALLS_PER_OVER).saturating_add(balls)
    }

    /// The value as recorded.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Overs {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Overs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Total legal balls across a sequence of overs values.
///
/// Accumulates in integer balls; summing the decimal values instead would
/// turn `0.5 + 0.5` into `1.0` rather than `1.4`.
pub fn total_balls<'a, I>(values: I) -> u64
where
    I: IntoIterator<Item = &'a Overs>,
{
    values.into_iter().map(|o| u64::from(o.balls())).sum()
}

impl Serialize for Overs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Stored values come back as strings; clients may send plain numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum OversRepr {
    Text(String),
    Int(u64),
    Float(f64),
}

impl<'de> Deserialize<'de> for Overs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match OversRepr::deserialize(deserializer)? {
            OversRepr::Text(s) => Overs(s),
            OversRepr::Int(n) => Overs(n.to_string()),
            OversRepr::Float(x) => Overs(x.to_string()),
        })
    }
}
