
use std::fmt::{self, Formatter, Display};
use std::hash::{Hash, Hasher};

/// A metric prefix: one or more accepted symbols and a single
/// multiplicative factor. The first symbol is canonical.
///
/// The identity prefix has an empty symbol and factor one; it is what a
/// decoded token carries when no prefix text was matched.
#[derive(Debug, Clone)]
pub struct UnitPrefix {
  symbols: Vec<String>,
  factor: f64,
}

impl UnitPrefix {
  pub fn new(symbols: &[&str], factor: f64) -> Self {
    assert!(!symbols.is_empty(), "A prefix requires at least one symbol");
    Self {
      symbols: symbols.iter().map(|s| (*s).to_owned()).collect(),
      factor,
    }
  }

  /// The prefix used when no prefix text was matched.
  pub fn identity() -> Self {
    Self { symbols: vec![String::new()], factor: 1.0 }
  }

  pub fn symbols(&self) -> &[String] {
    &self.symbols
  }

  pub fn canonical_symbol(&self) -> &str {
    &self.symbols[0]
  }

  pub fn factor(&self) -> f64 {
    self.factor
  }

  pub fn is_identity(&self) -> bool {
    self.factor == 1.0 && self.symbols[0].is_empty()
  }

  /// True if `text` is exactly one of this prefix's symbols. Partial
  /// matches do not count.
  pub fn matches(&self, text: &str) -> bool {
    self.symbols.iter().any(|s| s == text)
  }

  /// The standard SI prefixes, largest to smallest. Both "u" and "µ"
  /// are accepted for micro.
  pub fn si_prefixes() -> Vec<UnitPrefix> {
    vec![
      UnitPrefix::new(&["Q"], 1e30),
      UnitPrefix::new(&["R"], 1e27),
      UnitPrefix::new(&["Y"], 1e24),
      UnitPrefix::new(&["Z"], 1e21),
      UnitPrefix::new(&["E"], 1e18),
      UnitPrefix::new(&["P"], 1e15),
      UnitPrefix::new(&["T"], 1e12),
      UnitPrefix::new(&["G"], 1e9),
      UnitPrefix::new(&["M"], 1e6),
      UnitPrefix::new(&["k"], 1e3),
      UnitPrefix::new(&["h"], 1e2),
      UnitPrefix::new(&["da"], 1e1),
      UnitPrefix::new(&["d"], 1e-1),
      UnitPrefix::new(&["c"], 1e-2),
      UnitPrefix::new(&["m"], 1e-3),
      UnitPrefix::new(&["µ", "u"], 1e-6),
      UnitPrefix::new(&["n"], 1e-9),
      UnitPrefix::new(&["p"], 1e-12),
      UnitPrefix::new(&["f"], 1e-15),
      UnitPrefix::new(&["a"], 1e-18),
      UnitPrefix::new(&["z"], 1e-21),
      UnitPrefix::new(&["y"], 1e-24),
      UnitPrefix::new(&["r"], 1e-27),
      UnitPrefix::new(&["q"], 1e-30),
    ]
  }
}

impl Display for UnitPrefix {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.canonical_symbol())
  }
}

impl PartialEq for UnitPrefix {
  fn eq(&self, other: &Self) -> bool {
    self.symbols == other.symbols && self.factor == other.factor
  }
}

impl Eq for UnitPrefix {}

impl Hash for UnitPrefix {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.symbols.hash(state);
    self.factor.to_bits().hash(state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_identity_prefix() {
    let identity = UnitPrefix::identity();
    assert!(identity.is_identity());
    assert_eq!(identity.factor(), 1.0);
    assert_eq!(identity.canonical_symbol(), "");
  }

  #[test]
  fn test_si_prefixes_match_exactly() {
    let prefixes = UnitPrefix::si_prefixes();
    let kilo = prefixes.iter().find(|p| p.matches("k")).unwrap();
    assert_eq!(kilo.factor(), 1000.0);
    let micro = prefixes.iter().find(|p| p.matches("µ")).unwrap();
    assert!(micro.matches("u"));
    assert_eq!(micro.factor(), 1e-6);
    assert!(!prefixes.iter().any(|p| p.matches("kk")));
  }

  #[test]
  fn test_prefix_equality_is_structural() {
    assert_eq!(UnitPrefix::new(&["k"], 1e3), UnitPrefix::new(&["k"], 1e3));
    assert_ne!(UnitPrefix::new(&["k"], 1e3), UnitPrefix::new(&["h"], 1e2));
  }
}
