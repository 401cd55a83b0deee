
//! Search for a simpler spelling of a composite unit.
//!
//! The search is a bounded brute force: every unordered pair of
//! reference units (the dimensionless unit included, which is how
//! single-unit and empty answers arise), raised to a fixed set of
//! small exponents. A cheap integer signature check prunes candidates
//! before any string is built or parsed; survivors must behave
//! identically to the original at a probe value, not merely share a
//! dimension.

use crate::convert::{self, reduce_unit};
use crate::error::UnitError;
use crate::registry::UnitRegistry;
use crate::unit::{BaseUnitMap, Unit};

use num::pow::Pow;

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};

const CANDIDATE_EXPONENTS: [i64; 6] = [1, 2, -1, -2, 3, -3];
const IDENTITY_EXPONENT: [i64; 1] = [1];

/// Finds the best-scoring equivalent spelling of `input`, or echoes
/// `input` when nothing equivalent is found. Called through
/// [`UnitRegistry::simplify`], which memoizes results.
pub(crate) fn search(registry: &UnitRegistry, input: &str) -> Result<String, UnitError> {
  let original = registry.parse(input)?;
  Ok(search_unit(registry, &original, input))
}

/// The search proper, over an already-parsed unit. The original input
/// text is consulted twice: echoed when no candidate survives, and
/// used to break score ties in favor of units spelled verbatim in it.
fn search_unit(registry: &UnitRegistry, original: &Unit, input: &str) -> String {
  let target = reduce_unit(original).map;
  let pool = reference_pool(registry, original);
  let signatures: Vec<BaseUnitMap> = pool.iter().map(|unit| reduce_unit(unit).map).collect();

  let mut buckets: BTreeMap<i64, BTreeSet<(usize, String)>> = BTreeMap::new();
  for i in 0..pool.len() {
    for j in i..pool.len() {
      if i == j && !pool[i].is_dimensionless() {
        continue;
      }
      for &p in exponents_for(&pool[i]) {
        for &q in exponents_for(&pool[j]) {
          if signatures[i].clone().pow(p) * signatures[j].clone().pow(q) != target {
            continue;
          }
          let components = ordered_components(&pool[i], p, &pool[j], q);
          let text = render(&components);
          let pair = [pool[i].clone(), pool[j].clone()];
          let Ok(candidate) = registry.parse_with(&text, &[&pair]) else {
            continue;
          };
          if !convert::equivalent(1.0, original, &candidate) {
            continue;
          }
          let foreign = components.iter()
            .filter(|(unit, _)| !input.contains(unit.canonical_symbol()))
            .count();
          buckets.entry(score(&components)).or_default().insert((foreign, text));
        }
      }
    }
  }

  if let Some((_, tied)) = buckets.into_iter().next() {
    if let Some((_, text)) = tied.into_iter().next() {
      return text;
    }
  }
  input.to_owned()
}

/// The reference units considered by the search: the dimensionless
/// unit, the registry catalog, and the original unit's compatible set,
/// deduplicated by canonical symbol.
fn reference_pool(registry: &UnitRegistry, original: &Unit) -> Vec<Unit> {
  let mut seen: HashSet<String> = HashSet::new();
  let mut pool = vec![registry.dimensionless().clone()];
  seen.insert(String::new());
  let candidates = registry.units().iter().chain(original.compatible_units());
  for unit in candidates {
    if seen.insert(unit.canonical_symbol().to_owned()) {
      pool.push(unit.clone());
    }
  }
  pool
}

fn exponents_for(unit: &Unit) -> &'static [i64] {
  if unit.is_dimensionless() {
    &IDENTITY_EXPONENT
  } else {
    &CANDIDATE_EXPONENTS
  }
}

/// The non-dimensionless components of a candidate, in output order:
/// a unit containing an uppercase letter sorts first, then the shorter
/// symbol, then lexicographic.
fn ordered_components(a: &Unit, p: i64, b: &Unit, q: i64) -> Vec<(Unit, i64)> {
  let mut components: Vec<(Unit, i64)> = [(a.clone(), p), (b.clone(), q)]
    .into_iter()
    .filter(|(unit, _)| !unit.is_dimensionless())
    .collect();
  components.sort_by(|(a, _), (b, _)| symbol_order(a.canonical_symbol(), b.canonical_symbol()));
  components
}

fn symbol_order(a: &str, b: &str) -> Ordering {
  let a_upper = a.chars().any(char::is_uppercase);
  let b_upper = b.chars().any(char::is_uppercase);
  match (a_upper, b_upper) {
    (true, false) => Ordering::Less,
    (false, true) => Ordering::Greater,
    _ => a.chars().count().cmp(&b.chars().count()).then_with(|| a.cmp(b)),
  }
}

fn render(components: &[(Unit, i64)]) -> String {
  let rendered: Vec<String> = components.iter()
    .map(|(unit, exponent)| {
      if *exponent == 1 {
        unit.canonical_symbol().to_owned()
      } else {
        format!("{}^{}", unit.canonical_symbol(), exponent)
      }
    })
    .collect();
  rendered.join(" ")
}

/// Lower is simpler. A second non-empty unit costs a flat penalty;
/// each component costs proportionally to |exponent|, with negative
/// exponents slightly worse than positive ones of the same magnitude.
fn score(components: &[(Unit, i64)]) -> i64 {
  let mut total = if components.len() > 1 { 10 } else { 0 };
  for (_, exponent) in components {
    total += 10 * exponent.abs() + i64::from(*exponent < 0);
  }
  total
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prefix::UnitPrefix;

  #[test]
  fn test_simplifies_to_named_units() {
    let registry = UnitRegistry::new();
    assert_eq!(registry.simplify("kg m s^-2").unwrap(), "N");
    assert_eq!(registry.simplify("kg m^2 s^-2").unwrap(), "J");
    assert_eq!(registry.simplify("kg m^2 s^-3").unwrap(), "W");
  }

  #[test]
  fn test_cancellation_yields_empty_spelling() {
    let registry = UnitRegistry::new();
    assert_eq!(registry.simplify("A^-2 A^2").unwrap(), "");
    assert_eq!(registry.simplify("t t^-1").unwrap(), "");
  }

  #[test]
  fn test_echoes_input_when_nothing_matches() {
    let registry = UnitRegistry::new();
    // Factor 1e-9 relative to the meter axis; nothing in the catalog
    // reproduces it.
    assert_eq!(registry.simplify("nm").unwrap(), "nm");
    assert_eq!(registry.simplify("NoKnownUnit").unwrap(), "NoKnownUnit");
  }

  #[test]
  fn test_leftover_factor_blocks_the_empty_answer() {
    let registry = UnitRegistry::new();
    // Dimensionless but scaled by 60: not equivalent to "", so the
    // best the search can do is respell the pair in canonical order.
    assert_eq!(registry.simplify("min s^-1").unwrap(), "s^-1 min");
  }

  #[test]
  fn test_two_unit_candidates_follow_the_ordering_rule() {
    let registry = UnitRegistry::new();
    // No single catalog unit covers g·m·s^-1; the best pair is N
    // times s, and the uppercase unit renders first.
    assert_eq!(registry.simplify("kg m s^-1").unwrap(), "N s");
  }

  #[test]
  fn test_ties_prefer_units_spelled_in_the_input() {
    let registry = UnitRegistry::new();
    // Gy and Sv share signature and factor; bare input breaks the tie
    // lexicographically, a verbatim occurrence overrides it.
    assert_eq!(registry.simplify("m^2 s^-2").unwrap(), "Gy");
    assert_eq!(registry.simplify("Sv m m^-1").unwrap(), "Sv");
  }

  #[test]
  fn test_single_unit_beats_pairs() {
    let registry = UnitRegistry::new();
    // Pa m^2 is equivalent to N but costs two units.
    assert_eq!(registry.simplify("Pa m^2").unwrap(), "N");
  }

  #[test]
  fn test_compatible_units_join_the_pool() {
    // A sparse catalog with no named force unit; the only route to a
    // single-unit answer is the compatible set of the parsed unit.
    let meters = Unit::base(&["m"], UnitPrefix::si_prefixes());
    let seconds = Unit::base(&["s"], UnitPrefix::si_prefixes());
    let grams = Unit::base(&["g"], UnitPrefix::si_prefixes());
    let registry = UnitRegistry::with_units(vec![meters, seconds, grams]);

    let parsed = registry.parse("kg m s^-2").unwrap();
    let force = Unit::derived(&["Frc"], 1000.0, reduce_unit(&parsed).map, Vec::new());
    let tagged = parsed.clone().with_compatible([force]);

    assert_eq!(search_unit(&registry, &parsed, "kg m s^-2"), "kg m s^-2");
    assert_eq!(search_unit(&registry, &tagged, "kg m s^-2"), "Frc");
  }

  #[test]
  fn test_results_are_memoized_and_stable() {
    let registry = UnitRegistry::new();
    assert_eq!(registry.simplify("kg m s^-2").unwrap(), "N");
    assert_eq!(registry.simplify("kg m s^-2").unwrap(), "N");
    // Push the cache past its cap; lookups still behave afterwards.
    for i in 0..120 {
      let _ = registry.simplify(&format!("Unknown{i}")).unwrap();
    }
    assert_eq!(registry.simplify("kg m s^-2").unwrap(), "N");
  }
}
