
use crate::prefix::UnitPrefix;
use crate::unit::Unit;

/// Matches one token body (exponent suffix already removed) against a
/// candidate unit set.
///
/// A direct symbol match anywhere in the candidate set is preferred
/// over a prefixed match, so that e.g. "min" parses as minutes rather
/// than milli-inches regardless of catalog order. Within each pass the
/// candidates are consulted in their given order and the first hit
/// wins, so results are reproducible as long as the catalog order is.
///
/// In the prefixed pass, the remainder in front of the matched symbol
/// must equal one of the unit's prefix symbols character for character
/// (no partial prefix matching), and the matched symbol itself must
/// permit prefixes.
///
/// Returns the matched prefix, unit, and symbol, or `None`. Callers
/// wanting a permissive decode substitute an unknown unit themselves.
pub fn match_token(body: &str, candidates: &[Unit]) -> Option<(UnitPrefix, Unit, String)> {
  for unit in candidates {
    for symbol in unit.symbols() {
      if !symbol.is_empty() && body == symbol {
        return Some((UnitPrefix::identity(), unit.clone(), symbol.clone()));
      }
    }
  }
  for unit in candidates {
    for symbol in unit.symbols() {
      if symbol.is_empty() || !body.ends_with(symbol.as_str()) || body.len() == symbol.len() {
        continue;
      }
      if !unit.is_prefix_allowed(symbol) {
        continue;
      }
      let remainder = &body[..body.len() - symbol.len()];
      if let Some(prefix) = unit.prefixes().iter().find(|p| p.matches(remainder)) {
        return Some((prefix.clone(), unit.clone(), symbol.clone()));
      }
    }
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prefix::UnitPrefix;
  use crate::unit::test_utils::{grams, meters, minutes, seconds};

  fn candidates() -> Vec<Unit> {
    vec![meters(), seconds(), grams(), minutes()]
  }

  #[test]
  fn test_direct_match() {
    let (prefix, unit, symbol) = match_token("m", &candidates()).unwrap();
    assert!(prefix.is_identity());
    assert_eq!(unit, meters());
    assert_eq!(symbol, "m");
  }

  #[test]
  fn test_prefixed_match() {
    let (prefix, unit, _) = match_token("km", &candidates()).unwrap();
    assert_eq!(prefix.factor(), 1000.0);
    assert_eq!(unit, meters());
    let (prefix, unit, _) = match_token("kg", &candidates()).unwrap();
    assert_eq!(prefix.factor(), 1000.0);
    assert_eq!(unit, grams());
  }

  #[test]
  fn test_direct_match_beats_prefixed_match() {
    // "min" could be milli-inches in a catalog containing "in"; with
    // minutes present, the named unit must win.
    let inches = Unit::base(&["in"], UnitPrefix::si_prefixes());
    let with_inches = vec![inches, minutes()];
    let (prefix, unit, _) = match_token("min", &with_inches).unwrap();
    assert!(prefix.is_identity());
    assert_eq!(unit, minutes());
  }

  #[test]
  fn test_no_partial_prefix_match() {
    assert!(match_token("kkm", &candidates()).is_none());
    assert!(match_token("xm", &candidates()).is_none());
    assert!(match_token("", &candidates()).is_none());
  }

  #[test]
  fn test_prefix_rejected_when_symbol_forbids_it() {
    let strict = vec![meters().without_prefix_on("m")];
    assert!(match_token("km", &strict).is_none());
    assert!(match_token("m", &strict).is_some());
  }

  #[test]
  fn test_prefix_rejected_when_unit_has_no_prefixes() {
    // Minutes carry no prefix set at all.
    assert!(match_token("kmin", &candidates()).is_none());
  }

  #[test]
  fn test_multibyte_prefix_symbol() {
    let (prefix, unit, _) = match_token("µm", &candidates()).unwrap();
    assert_eq!(prefix.factor(), 1e-6);
    assert_eq!(unit, meters());
    let (prefix, _, _) = match_token("um", &candidates()).unwrap();
    assert_eq!(prefix.factor(), 1e-6);
  }

  #[test]
  fn test_catalog_order_decides_within_a_pass() {
    let a = Unit::base(&["q"], Vec::new());
    let b = Unit::base(&["q"], UnitPrefix::si_prefixes());
    let (_, unit, _) = match_token("q", &[a.clone(), b.clone()]).unwrap();
    assert_eq!(unit, a);
    let (_, unit, _) = match_token("q", &[b.clone(), a]).unwrap();
    assert_eq!(unit, b);
  }
}
