
use crate::convert;
use crate::error::UnitError;
use crate::parse::{self, DecodedToken, StringRange};
use crate::simplify;
use crate::unit::catalog;
use crate::unit::Unit;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// The context object all parsing runs against: the candidate unit
/// catalog in stable insertion order, plus the shared memoization
/// caches.
///
/// All operations take `&self` and may be called concurrently. The
/// caches compute missing entries while holding their lock, so two
/// threads racing to parse the same novel string observe a single
/// `Unit` identity and the construction runs once.
pub struct UnitRegistry {
  units: Vec<Unit>,
  dimensionless: Unit,
  unknown_units: Mutex<HashMap<String, Unit>>,
  synthesized_units: Mutex<HashMap<(String, String), Unit>>,
  simplifications: Mutex<HashMap<String, String>>,
}

/// Entry cap of the simplification cache. On overflow the cache is
/// cleared wholesale; a deliberately simple policy that bounds memory
/// under long-running varied input.
pub(crate) const SIMPLIFY_CACHE_CAP: usize = 100;

impl UnitRegistry {
  /// A registry over the default SI catalog.
  pub fn new() -> Self {
    Self::with_units(catalog::default_units())
  }

  /// A registry over a custom catalog. Iteration during matching
  /// follows the order of `units`, so parses are reproducible.
  pub fn with_units(units: Vec<Unit>) -> Self {
    Self {
      units,
      dimensionless: Unit::dimensionless(),
      unknown_units: Mutex::new(HashMap::new()),
      synthesized_units: Mutex::new(HashMap::new()),
      simplifications: Mutex::new(HashMap::new()),
    }
  }

  pub fn units(&self) -> &[Unit] {
    &self.units
  }

  pub fn dimensionless(&self) -> &Unit {
    &self.dimensionless
  }

  /// Parses a unit expression against the default catalog.
  pub fn parse(&self, input: &str) -> Result<Unit, UnitError> {
    parse::parse_impl(self, input, &[])
  }

  /// Parses a unit expression against the given candidate sets instead
  /// of the default catalog (plus the implicit dimensionless unit).
  pub fn parse_with(&self, input: &str, extra: &[&[Unit]]) -> Result<Unit, UnitError> {
    parse::parse_impl(self, input, extra)
  }

  /// Tokenizes a unit expression, yielding each decoded token with the
  /// character range it occupied, in ascending range order. This is the
  /// entry point specialized parsers call back into for the remainder
  /// of their input.
  pub fn parse_tokens(
    &self,
    input: &str,
    extra: &[&[Unit]],
  ) -> Result<Vec<(StringRange, DecodedToken)>, UnitError> {
    parse::parse_tokens_impl(self, input, extra)
  }

  /// The memoized unknown-unit placeholder for a literal token.
  /// Repeated requests return the same value, so expressions sharing
  /// an unknown token stay structurally comparable.
  pub fn unknown_unit(&self, literal: &str) -> Unit {
    let mut cache = lock(&self.unknown_units);
    cache.entry(literal.to_owned())
      .or_insert_with(|| Unit::unknown(literal))
      .clone()
  }

  /// Whether `literal` has previously been materialized as an unknown
  /// unit by some parse.
  pub fn known_unknown_unit(&self, literal: &str) -> bool {
    lock(&self.unknown_units).contains_key(literal)
  }

  /// Converts a value between two unit expressions.
  pub fn convert(&self, value: f64, origin: &str, target: &str) -> Result<f64, UnitError> {
    convert::convert(value, &self.parse(origin)?, &self.parse(target)?)
  }

  /// The scalar conversion factor between two unit expressions.
  pub fn factor(&self, origin: &str, target: &str) -> Result<f64, UnitError> {
    convert::factor(&self.parse(origin)?, &self.parse(target)?)
  }

  /// Whether two unit expressions share a base-unit signature.
  pub fn convertible(&self, origin: &str, target: &str) -> Result<bool, UnitError> {
    Ok(convert::convertible(&self.parse(origin)?, &self.parse(target)?))
  }

  /// Whether converting `value` between the two expressions returns it
  /// unchanged.
  pub fn equivalent(&self, value: f64, origin: &str, target: &str) -> Result<bool, UnitError> {
    Ok(convert::equivalent(value, &self.parse(origin)?, &self.parse(target)?))
  }

  /// Whether the two expressions differ by a pure scalar factor.
  pub fn proportional(&self, a: &str, b: &str) -> Result<bool, UnitError> {
    Ok(convert::proportional(&self.parse(a)?, &self.parse(b)?))
  }

  /// Finds the simplest known spelling of a unit expression, or echoes
  /// the input when no equivalent simpler spelling exists.
  pub fn simplify(&self, input: &str) -> Result<String, UnitError> {
    let key = input.trim().to_owned();
    if let Some(result) = lock(&self.simplifications).get(&key) {
      return Ok(result.clone());
    }
    let result = simplify::search(self, &key)?;
    let mut cache = lock(&self.simplifications);
    if cache.len() >= SIMPLIFY_CACHE_CAP {
      cache.clear();
    }
    cache.insert(key, result.clone());
    Ok(result)
  }

  /// Looks up or builds the synthesized unit for a canonical string in
  /// a given extra-unit context. The build runs under the cache lock,
  /// so there is exactly one winner per key.
  pub(crate) fn cached_synthesized(
    &self,
    key: &str,
    extra: &[&[Unit]],
    build: impl FnOnce() -> Unit,
  ) -> Unit {
    let full_key = (key.to_owned(), context_key(extra));
    let mut cache = lock(&self.synthesized_units);
    cache.entry(full_key).or_insert_with(build).clone()
  }
}

impl Default for UnitRegistry {
  fn default() -> Self {
    Self::new()
  }
}

/// Identifies an extra-unit context by its units' canonical symbols.
fn context_key(extra: &[&[Unit]]) -> String {
  let mut key = String::new();
  for unit in extra.iter().flat_map(|set| set.iter()) {
    key.push_str(unit.canonical_symbol());
    key.push('\u{1f}');
  }
  key
}

/// Locks a cache, recovering the guard if a previous holder panicked;
/// the caches hold plain maps which cannot be left inconsistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
