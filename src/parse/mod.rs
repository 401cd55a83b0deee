
//! Facilities for parsing unit expressions.
//!
//! The grammar is whitespace-separated tokens, each an optional prefix
//! symbol followed by a unit symbol, optionally followed by `^` and a
//! signed integer exponent. Notations beyond that (multi-word spans,
//! parenthesized sub-grammars) enter through per-unit specialized
//! parsers, whose matches are reconciled with the generic tokens by the
//! overlap resolver.

pub mod matcher;
pub mod overlap;
pub mod range;
pub mod token;

pub use matcher::match_token;
pub use range::StringRange;
pub use token::DecodedToken;

use crate::convert::reduce;
use crate::error::UnitError;
use crate::prefix::UnitPrefix;
use crate::registry::UnitRegistry;
use crate::unit::{Conversion, Unit};

use std::collections::BTreeMap;
use std::fmt::Debug;

/// A parser a unit can carry to claim substrings the generic tokenizer
/// cannot, e.g. a logarithmic-level notation spanning several
/// whitespace tokens. The factory runs it over the whole input and
/// merges its matches with everyone else's through the overlap
/// resolver, so a multi-word match supersedes the word-by-word decodes
/// inside its range.
pub trait SpecializedParser: Debug + Send + Sync {
  fn parse_tokens(
    &self,
    input: &str,
    registry: &UnitRegistry,
  ) -> Result<BTreeMap<StringRange, DecodedToken>, UnitError>;
}

/// Tokenizes `input` against the candidate set and resolves overlaps,
/// yielding decoded tokens in ascending range order. Tokens no
/// candidate matches decode to the registry's memoized unknown unit
/// for their literal text.
pub(crate) fn parse_tokens_impl(
  registry: &UnitRegistry,
  input: &str,
  extra: &[&[Unit]],
) -> Result<Vec<(StringRange, DecodedToken)>, UnitError> {
  let candidates = candidate_units(registry, extra);
  let mut matches = BTreeMap::new();
  for unit in &candidates {
    if let Some(parser) = unit.specialized_parser() {
      for (range, decoded) in parser.parse_tokens(input, registry)? {
        overlap::insert_match(&mut matches, range, decoded)?;
      }
    }
  }
  for raw in token::scan_raw_tokens(input)? {
    let decoded = match matcher::match_token(raw.body, &candidates) {
      Some((prefix, unit, symbol)) => DecodedToken {
        prefix,
        unit,
        symbol,
        exponent: raw.exponent,
      },
      None => DecodedToken {
        prefix: UnitPrefix::identity(),
        unit: registry.unknown_unit(raw.body),
        symbol: raw.body.to_owned(),
        exponent: raw.exponent,
      },
    };
    overlap::insert_match(&mut matches, raw.range, decoded)?;
  }
  overlap::resolve_overlaps(matches)
}

/// Parses `input` into a unit value.
///
/// Empty input is the dimensionless unit. A single unprefixed
/// exponent-one token returns the matched unit itself, so catalog
/// units come back pointer-identical. Everything else synthesizes a
/// unit from the reduced token sequence, memoized by the trimmed input
/// and the extra-unit context so repeated parses share one value.
pub(crate) fn parse_impl(
  registry: &UnitRegistry,
  input: &str,
  extra: &[&[Unit]],
) -> Result<Unit, UnitError> {
  let trimmed = input.trim();
  let resolved = parse_tokens_impl(registry, input, extra)?;
  if resolved.is_empty() {
    return Ok(registry.dimensionless().clone());
  }
  if resolved.len() == 1 {
    let (_, decoded) = &resolved[0];
    if decoded.prefix.is_identity() && decoded.exponent == 1 {
      return Ok(decoded.unit.clone());
    }
  }
  let tokens: Vec<DecodedToken> = resolved.into_iter().map(|(_, decoded)| decoded).collect();
  Ok(registry.cached_synthesized(trimmed, extra, || synthesize(trimmed, tokens)))
}

/// The candidate units for a parse: the registry catalog by default,
/// or the flattened extra sets plus the implicit dimensionless unit.
fn candidate_units(registry: &UnitRegistry, extra: &[&[Unit]]) -> Vec<Unit> {
  if extra.is_empty() {
    registry.units().to_vec()
  } else {
    extra.iter()
      .flat_map(|set| set.iter().cloned())
      .chain(std::iter::once(registry.dimensionless().clone()))
      .collect()
  }
}

fn synthesize(symbol: &str, tokens: Vec<DecodedToken>) -> Unit {
  let info = reduce(&tokens);
  let conversion = if info.can_use_factor {
    Conversion::Linear
  } else {
    Conversion::Composite(tokens)
  };
  Unit::synthesized(symbol, info.factor, info.map, conversion)
}
