
use super::Unit;

use itertools::Itertools;
use num::One;
use num::pow::Pow;

use std::fmt::{self, Formatter, Display};
use std::hash::{Hash, Hasher};
use std::ops::{Mul, Div};

/// A dimensional signature: a formal product of base units raised to
/// integer exponents.
///
/// Internally stored as a vector sorted by canonical symbol. A given
/// base unit appears at most once, and every stored exponent is
/// non-zero, so two signatures are dimensionally equal exactly when
/// they compare equal. Iteration order is symbol-sorted and therefore
/// deterministic, which error messages and conversion ledgers rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUnitMap {
  elements: Vec<(Unit, i64)>,
}

/// Helper newtype which implements `Eq`, `Ord` and `Hash` to compare
/// units by canonical symbol alone.
#[derive(Debug)]
struct UnitBySymbol(Unit);

impl BaseUnitMap {
  /// Builds a signature from the given contributions. Repeated base
  /// units have their exponents summed; zero exponents are dropped.
  pub fn new(inputs: impl IntoIterator<Item = (Unit, i64)>) -> Self {
    let mut elements: Vec<_> = inputs.into_iter()
      .map(|(unit, exponent)| (UnitBySymbol(unit), exponent))
      .into_grouping_map()
      .sum()
      .into_iter()
      .map(|(unit_by_symbol, exponent)| (unit_by_symbol.0, exponent))
      .filter(|(_, exponent)| *exponent != 0)
      .collect();
    elements.sort_by(|a, b| a.0.canonical_symbol().cmp(b.0.canonical_symbol()));
    Self { elements }
  }

  /// The empty signature: the dimension of a pure number.
  pub fn empty() -> Self {
    Self::new([])
  }

  pub fn singleton(unit: Unit, exponent: i64) -> Self {
    Self::new([(unit, exponent)])
  }

  pub fn is_empty(&self) -> bool {
    self.elements.is_empty()
  }

  pub fn len(&self) -> usize {
    self.elements.len()
  }

  /// The exponent of the given base unit, zero if absent.
  pub fn exponent_of(&self, unit: &Unit) -> i64 {
    self.elements.iter()
      .find(|(u, _)| u.canonical_symbol() == unit.canonical_symbol())
      .map(|(_, exponent)| *exponent)
      .unwrap_or(0)
  }

  /// An iterator over (base unit, exponent) pairs in symbol order. All
  /// yielded exponents are non-zero.
  pub fn iter(&self) -> impl Iterator<Item = &(Unit, i64)> {
    self.elements.iter()
  }

  pub fn into_inner(self) -> Vec<(Unit, i64)> {
    self.elements
  }

  /// The reciprocal of `self`.
  pub fn recip(mut self) -> Self {
    for elem in &mut self.elements {
      elem.1 = - elem.1;
    }
    self
  }

  /// The base units present in exactly one of the two signatures, or
  /// present in both with differing exponents, in symbol order. Empty
  /// exactly when the signatures are equal.
  pub fn differing_units<'a>(&'a self, other: &'a Self) -> Vec<&'a Unit> {
    let mut result: Vec<&'a Unit> = Vec::new();
    for (unit, exponent) in &self.elements {
      if other.exponent_of(unit) != *exponent {
        result.push(unit);
      }
    }
    for (unit, _) in &other.elements {
      if self.exponent_of(unit) == 0 && !result.iter().any(|u| u.canonical_symbol() == unit.canonical_symbol()) {
        result.push(unit);
      }
    }
    result.sort_by(|a, b| a.canonical_symbol().cmp(b.canonical_symbol()));
    result
  }
}

impl Display for BaseUnitMap {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let rendered = self.elements.iter()
      .map(|(unit, exponent)| {
        if *exponent == 1 {
          unit.canonical_symbol().to_owned()
        } else {
          format!("{}^{}", unit.canonical_symbol(), exponent)
        }
      })
      .join(" ");
    write!(f, "{}", rendered)
  }
}

impl PartialEq for UnitBySymbol {
  fn eq(&self, other: &Self) -> bool {
    self.0.canonical_symbol() == other.0.canonical_symbol()
  }
}

impl Eq for UnitBySymbol {}

impl PartialOrd for UnitBySymbol {
  fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for UnitBySymbol {
  fn cmp(&self, other: &Self) -> std::cmp::Ordering {
    self.0.canonical_symbol().cmp(other.0.canonical_symbol())
  }
}

impl Hash for UnitBySymbol {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.0.canonical_symbol().hash(state);
  }
}

impl Mul for BaseUnitMap {
  type Output = BaseUnitMap;

  fn mul(self, rhs: Self) -> Self::Output {
    let mut elements = self.elements;
    elements.extend(rhs.elements);
    Self::new(elements)
  }
}

impl Div for BaseUnitMap {
  type Output = BaseUnitMap;

  #[allow(clippy::suspicious_arithmetic_impl)] // Multiply by reciprocal is correct
  fn div(self, rhs: Self) -> Self::Output {
    self * rhs.recip()
  }
}

impl Pow<i64> for BaseUnitMap {
  type Output = BaseUnitMap;

  fn pow(self, rhs: i64) -> Self::Output {
    Self::new(self.elements.into_iter().map(|(unit, exponent)| (unit, exponent * rhs)))
  }
}

impl Pow<i64> for &BaseUnitMap {
  type Output = BaseUnitMap;

  fn pow(self, rhs: i64) -> Self::Output {
    self.clone().pow(rhs)
  }
}

impl One for BaseUnitMap {
  fn one() -> Self {
    BaseUnitMap::empty()
  }

  fn is_one(&self) -> bool {
    self.elements.is_empty()
  }
}
