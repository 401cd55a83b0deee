
//! Reduction of token sequences to base units and the conversion
//! algebra built on top of it.

use crate::error::UnitError;
use crate::parse::token::DecodedToken;
use crate::unit::{BaseUnitMap, Unit};

use approx::relative_eq;

/// The reduced form of a token sequence: an aggregate multiplicative
/// factor, the summed base-unit signature, and whether the factor alone
/// fully describes the sequence's conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseConversionInfo {
  pub factor: f64,
  pub map: BaseUnitMap,
  /// False as soon as any token's unit is not purely multiplicative.
  /// The factor is still accumulated for affine composition.
  pub can_use_factor: bool,
}

/// Folds a decoded token sequence into its canonical base-unit form.
///
/// Each token contributes `base_exponent * token_exponent` per base
/// unit of its signature, and `(prefix * symbol factor)^exponent` to
/// the aggregate factor. Base units whose exponents sum to zero cancel
/// out of the result, so e.g. "A^-2 A^2" reduces to the empty
/// signature. This is the single normalization point the compatibility
/// and conversion logic depends on, and it is idempotent.
pub fn reduce(tokens: &[DecodedToken]) -> BaseConversionInfo {
  let mut contributions: Vec<(Unit, i64)> = Vec::new();
  let mut factor = 1.0;
  let mut can_use_factor = true;
  for token in tokens {
    for (base_unit, base_exponent) in token.unit.base_units().iter() {
      contributions.push((base_unit.clone(), base_exponent * token.exponent));
    }
    factor *= token.conversion_factor().powi(token.exponent as i32);
    if !token.is_linear() {
      can_use_factor = false;
    }
  }
  BaseConversionInfo {
    factor,
    map: BaseUnitMap::new(contributions),
    can_use_factor,
  }
}

/// Reduces a unit by reducing the token sequence it converts through.
pub fn reduce_unit(unit: &Unit) -> BaseConversionInfo {
  reduce(&unit.tokens())
}

/// True if the two units reduce to the same base-unit signature,
/// ignoring factors and linearity.
pub fn convertible(origin: &Unit, target: &Unit) -> bool {
  reduce_unit(origin).map == reduce_unit(target).map
}

/// The scalar `k` such that a value `v` in `origin` equals `k * v` in
/// `target`.
///
/// Fails with a dimensional mismatch when the signatures differ, and
/// with the distinct non-multiplicative error when either side
/// requires a value shift; the dimension check runs first, so
/// incompatible shift units still report the mismatch.
pub fn factor(origin: &Unit, target: &Unit) -> Result<f64, UnitError> {
  let origin_info = reduce_unit(origin);
  let target_info = reduce_unit(target);
  ensure_same_signature(origin, target, &origin_info, &target_info)?;
  if !origin_info.can_use_factor || !target_info.can_use_factor {
    return Err(UnitError::NonMultiplicative {
      origin: origin.to_string(),
      target: target.to_string(),
    });
  }
  Ok(origin_info.factor / target_info.factor)
}

/// Converts a value from `origin` to `target`.
///
/// When both sides are purely multiplicative this is a single factor
/// application. Otherwise the value walks `origin`'s tokens through
/// `to_base` and `target`'s tokens through `from_base`, which handles
/// one-token shift units (Celsius and friends) at exponent ±1. A shift
/// unit at any other exponent gets its conversion applied |exponent|
/// times; that repeated-application behavior is deliberate and covered
/// by a regression test below.
pub fn convert(value: f64, origin: &Unit, target: &Unit) -> Result<f64, UnitError> {
  let origin_info = reduce_unit(origin);
  let target_info = reduce_unit(target);
  ensure_same_signature(origin, target, &origin_info, &target_info)?;
  if origin_info.can_use_factor && target_info.can_use_factor {
    return Ok(value * origin_info.factor / target_info.factor);
  }
  let base_value = tokens_to_base(&origin.tokens(), value);
  Ok(tokens_from_base(&target.tokens(), base_value))
}

/// True if the two units are convertible AND converting `value`
/// between them returns `value` unchanged (within floating-point
/// tolerance). Used to test that a candidate rewriting of a unit
/// behaves identically at a probe value, not merely dimensionally.
pub fn equivalent(value: f64, origin: &Unit, target: &Unit) -> bool {
  match convert(value, origin, target) {
    Ok(result) => relative_eq!(result, value, max_relative = 1e-12),
    Err(_) => false,
  }
}

/// True if both units are purely multiplicative and share a base-unit
/// signature.
pub fn proportional(a: &Unit, b: &Unit) -> bool {
  let a_info = reduce_unit(a);
  let b_info = reduce_unit(b);
  a_info.can_use_factor && b_info.can_use_factor && a_info.map == b_info.map
}

/// Applies each token's to-base conversion in sequence.
pub(crate) fn tokens_to_base(tokens: &[DecodedToken], value: f64) -> f64 {
  tokens.iter().fold(value, |v, token| token_to_base(token, v))
}

/// Applies each token's from-base conversion in sequence.
pub(crate) fn tokens_from_base(tokens: &[DecodedToken], value: f64) -> f64 {
  tokens.iter().fold(value, |v, token| token_from_base(token, v))
}

fn token_to_base(token: &DecodedToken, value: f64) -> f64 {
  if token.is_linear() {
    return value * token.conversion_factor().powi(token.exponent as i32);
  }
  let mut value = value * token.prefix.factor().powi(token.exponent as i32);
  for _ in 0..token.exponent.unsigned_abs() {
    value = if token.exponent > 0 {
      token.unit.to_base(value)
    } else {
      token.unit.from_base(value)
    };
  }
  value
}

fn token_from_base(token: &DecodedToken, value: f64) -> f64 {
  if token.is_linear() {
    return value / token.conversion_factor().powi(token.exponent as i32);
  }
  let mut value = value;
  for _ in 0..token.exponent.unsigned_abs() {
    value = if token.exponent > 0 {
      token.unit.from_base(value)
    } else {
      token.unit.to_base(value)
    };
  }
  value / token.prefix.factor().powi(token.exponent as i32)
}

fn ensure_same_signature(
  origin: &Unit,
  target: &Unit,
  origin_info: &BaseConversionInfo,
  target_info: &BaseConversionInfo,
) -> Result<(), UnitError> {
  if origin_info.map == target_info.map {
    return Ok(());
  }
  let differing = origin_info.map.differing_units(&target_info.map);
  Err(UnitError::DimensionMismatch {
    origin: origin.to_string(),
    target: target.to_string(),
    origin_signature: origin_info.map.to_string(),
    target_signature: target_info.map.to_string(),
    base_unit: differing.first()
      .map(|unit| unit.canonical_symbol().to_owned())
      .unwrap_or_default(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prefix::UnitPrefix;
  use crate::unit::Conversion;
  use crate::unit::test_utils::{amperes, celsius, grams, kelvin, meters, minutes, newtons, seconds};

  use approx::assert_relative_eq;

  fn token(unit: Unit, exponent: i64) -> DecodedToken {
    let symbol = unit.canonical_symbol().to_owned();
    DecodedToken { prefix: UnitPrefix::identity(), unit, symbol, exponent }
  }

  fn prefixed_token(prefix_symbol: &str, unit: Unit, exponent: i64) -> DecodedToken {
    let prefix = UnitPrefix::si_prefixes().into_iter()
      .find(|p| p.matches(prefix_symbol))
      .unwrap();
    let symbol = unit.canonical_symbol().to_owned();
    DecodedToken { prefix, unit, symbol, exponent }
  }

  /// Builds the unit the factory would synthesize for the given tokens.
  fn composite(symbol: &str, tokens: Vec<DecodedToken>) -> Unit {
    let info = reduce(&tokens);
    let conversion = if info.can_use_factor {
      Conversion::Linear
    } else {
      Conversion::Composite(tokens)
    };
    Unit::synthesized(symbol, info.factor, info.map, conversion)
  }

  #[test]
  fn test_reduce_accumulates_exponents_and_factors() {
    let info = reduce(&[prefixed_token("k", grams(), 1), token(meters(), 1), token(seconds(), -2)]);
    assert_eq!(info.factor, 1000.0);
    assert!(info.can_use_factor);
    assert_eq!(info.map, BaseUnitMap::new([(grams(), 1), (meters(), 1), (seconds(), -2)]));
  }

  #[test]
  fn test_reduce_expands_derived_units() {
    let info = reduce(&[token(newtons(), 2)]);
    assert_eq!(info.factor, 1_000_000.0);
    assert_eq!(info.map, BaseUnitMap::new([(grams(), 2), (meters(), 2), (seconds(), -4)]));
  }

  #[test]
  fn test_reduce_cancels_opposed_exponents() {
    let info = reduce(&[token(amperes(), 2), token(amperes(), -2)]);
    assert!(info.map.is_empty());
    assert_eq!(info.factor, 1.0);
  }

  #[test]
  fn test_reduce_flags_shift_units() {
    let info = reduce(&[token(celsius(), 1)]);
    assert!(!info.can_use_factor);
    assert_eq!(info.factor, 1.0);
    assert_eq!(info.map, BaseUnitMap::singleton(kelvin(), 1));
  }

  #[test]
  fn test_reduce_is_idempotent() {
    let tokens = vec![prefixed_token("k", grams(), 1), token(meters(), 1), token(seconds(), -2)];
    let unit = composite("kg m s^-2", tokens);
    let once = reduce_unit(&unit);
    let twice = reduce(&[token(unit, 1)]);
    assert_eq!(once.map, twice.map);
    assert_eq!(once.factor, twice.factor);
  }

  #[test]
  fn test_factor_between_linear_units() {
    let kilonewton = composite("kN", vec![prefixed_token("k", newtons(), 1)]);
    assert_eq!(factor(&kilonewton, &newtons()).unwrap(), 1000.0);
    assert_eq!(factor(&minutes(), &seconds()).unwrap(), 60.0);
  }

  #[test]
  fn test_factor_dimension_mismatch_names_offender() {
    let err = factor(&meters(), &seconds()).unwrap_err();
    assert_eq!(err, UnitError::DimensionMismatch {
      origin: "m".to_owned(),
      target: "s".to_owned(),
      origin_signature: "m".to_owned(),
      target_signature: "s".to_owned(),
      base_unit: "m".to_owned(),
    });
  }

  #[test]
  fn test_factor_shift_unit_is_non_multiplicative() {
    let err = factor(&celsius(), &kelvin()).unwrap_err();
    assert_eq!(err, UnitError::NonMultiplicative {
      origin: "°C".to_owned(),
      target: "K".to_owned(),
    });
  }

  #[test]
  fn test_factor_mismatch_wins_over_non_multiplicative() {
    // Even with a shift unit involved, differing signatures must
    // surface as a dimension mismatch, never the factor error.
    let err = factor(&celsius(), &meters()).unwrap_err();
    assert!(matches!(err, UnitError::DimensionMismatch { .. }));
  }

  #[test]
  fn test_convert_linear_fast_path() {
    assert_eq!(convert(3.0, &minutes(), &seconds()).unwrap(), 180.0);
    let km = composite("km", vec![prefixed_token("k", meters(), 1)]);
    assert_eq!(convert(2.5, &km, &meters()).unwrap(), 2500.0);
  }

  #[test]
  fn test_convert_celsius_to_kelvin() {
    assert_eq!(convert(0.0, &celsius(), &kelvin()).unwrap(), 273.15);
    assert_eq!(convert(274.15, &kelvin(), &celsius()).unwrap(), 1.0);
  }

  #[test]
  fn test_convert_celsius_round_trip() {
    let value = convert(25.0, &celsius(), &kelvin()).unwrap();
    assert_relative_eq!(convert(value, &kelvin(), &celsius()).unwrap(), 25.0);
  }

  #[test]
  fn test_convert_rejects_mismatched_dimensions() {
    assert!(matches!(
      convert(1.0, &meters(), &seconds()),
      Err(UnitError::DimensionMismatch { .. }),
    ));
  }

  #[test]
  fn squared_shift_unit_keeps_repeated_application() {
    // A shift-bearing unit at an exponent other than ±1 has no single
    // correct conversion; the engine applies the shift once per power,
    // and that behavior is load-bearing for compatibility.
    let celsius_squared = composite("°C^2", vec![token(celsius(), 2)]);
    let kelvin_squared = composite("K^2", vec![token(kelvin(), 2)]);
    assert_relative_eq!(
      convert(0.0, &celsius_squared, &kelvin_squared).unwrap(),
      546.30,
    );
  }

  #[test]
  fn test_equivalent_probes_the_value() {
    let kg_m_s2 = composite(
      "kg m s^-2",
      vec![prefixed_token("k", grams(), 1), token(meters(), 1), token(seconds(), -2)],
    );
    assert!(equivalent(1.0, &kg_m_s2, &newtons()));
    // Same dimension, different scale: convertible but not equivalent.
    assert!(convertible(&minutes(), &seconds()));
    assert!(!equivalent(1.0, &minutes(), &seconds()));
  }

  #[test]
  fn test_proportional_requires_linearity() {
    assert!(proportional(&minutes(), &seconds()));
    assert!(!proportional(&celsius(), &kelvin()));
    assert!(!proportional(&meters(), &seconds()));
  }
}
