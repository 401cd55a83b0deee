
use crate::parse::range::StringRange;

use thiserror::Error;

/// The fatal failure modes of unit parsing and conversion.
///
/// Unrecognized unit tokens are NOT an error: they are substituted with
/// a memoized unknown-unit placeholder during parsing, so that partially
/// unknown expressions remain comparable. Every variant here carries
/// enough context to produce a diagnostic without re-parsing the
/// offending input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnitError {
  /// Two matched substrings overlap without either containing the
  /// other, so there is no policy that picks a winner.
  #[error("ambiguous unit expression: '{first}' at {first_range} overlaps '{second}' at {second_range}")]
  AmbiguousOverlap {
    first: String,
    first_range: StringRange,
    second: String,
    second_range: StringRange,
  },
  /// The two operands reduce to different base-unit signatures.
  #[error("cannot convert '{origin}' to '{target}': base unit '{base_unit}' differs ('{origin}' reduces to '{origin_signature}', '{target}' reduces to '{target_signature}')")]
  DimensionMismatch {
    origin: String,
    target: String,
    origin_signature: String,
    target_signature: String,
    /// The first base unit (in signature order) whose exponents differ.
    base_unit: String,
  },
  /// A scalar conversion factor was requested, but at least one operand
  /// requires a value shift and has no such factor.
  #[error("no single conversion factor between '{origin}' and '{target}': a value shift is required")]
  NonMultiplicative {
    origin: String,
    target: String,
  },
  /// The text following `^` in a token is not a signed integer.
  #[error("malformed exponent '{text}' in unit token '{token}'")]
  MalformedExponent {
    token: String,
    text: String,
  },
}
