
//! The unit value type and its conversion behavior.

pub mod base_map;
pub mod catalog;
#[cfg(test)]
pub(crate) mod test_utils;

pub use base_map::BaseUnitMap;

use crate::convert;
use crate::parse::SpecializedParser;
use crate::parse::token::DecodedToken;
use crate::prefix::UnitPrefix;

use std::fmt::{self, Formatter, Display};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A named quantity which can be reduced to base units and converted
/// through them.
///
/// A unit is identified by an ordered, non-empty list of accepted
/// symbols (the first is canonical) and carries everything needed to
/// participate in parsing and conversion: its admissible prefixes, a
/// per-symbol prefix predicate, its conversion behavior, its dimensional
/// signature, and an optional set of compatible units consulted during
/// simplification.
///
/// Units are immutable once constructed and cheap to clone. Equality and
/// hashing are structural over all fields (except the specialized-parser
/// hook), so two independently constructed units with identical
/// definitions compare equal; units deduplicated through a registry
/// cache additionally share one allocation, making structural and
/// pointer identity coincide.
#[derive(Debug, Clone)]
pub struct Unit {
  data: Arc<UnitData>,
}

#[derive(Debug, Clone)]
struct UnitData {
  symbols: Vec<String>,
  prefixes: Vec<UnitPrefix>,
  /// Symbols of this unit on which prefixes are never accepted, even
  /// when `prefixes` is non-empty.
  unprefixable_symbols: Vec<String>,
  /// Per-symbol overrides of `factor`.
  symbol_factors: Vec<(String, f64)>,
  factor: f64,
  basic: bool,
  conversion: Conversion,
  /// `None` for basic units, whose signature is themselves to the
  /// first power and is computed on demand to avoid a self-referential
  /// value.
  base: Option<BaseUnitMap>,
  compatible: Vec<Unit>,
  parser: Option<Arc<dyn SpecializedParser>>,
}

/// How a unit maps values to and from its base-unit representation.
#[derive(Debug, Clone)]
pub enum Conversion {
  /// `to_base(v) = factor * v`.
  Linear,
  /// `to_base(v) = factor * v + offset`, as for temperature scales.
  Affine { offset: f64 },
  /// Conversion walks the decoded tokens the unit was parsed from;
  /// used for synthesized units containing a non-multiplicative step.
  Composite(Vec<DecodedToken>),
}

impl Unit {
  /// An irreducible unit: one of the coordinate axes of the dimensional
  /// signature. Its factor is one and its signature is itself to the
  /// first power.
  pub fn base(symbols: &[&str], prefixes: Vec<UnitPrefix>) -> Self {
    Self::from_data(UnitData {
      symbols: owned(symbols),
      prefixes,
      unprefixable_symbols: Vec::new(),
      symbol_factors: Vec::new(),
      factor: 1.0,
      basic: true,
      conversion: Conversion::Linear,
      base: None,
      compatible: Vec::new(),
      parser: None,
    })
  }

  /// A purely multiplicative unit defined over existing base units.
  pub fn derived(symbols: &[&str], factor: f64, base: BaseUnitMap, prefixes: Vec<UnitPrefix>) -> Self {
    Self::from_data(UnitData {
      symbols: owned(symbols),
      prefixes,
      unprefixable_symbols: Vec::new(),
      symbol_factors: Vec::new(),
      factor,
      basic: false,
      conversion: Conversion::Linear,
      base: Some(base),
      compatible: Vec::new(),
      parser: None,
    })
  }

  /// A shift-bearing unit over a single base unit:
  /// `to_base(v) = factor * v + offset`.
  pub fn affine(symbols: &[&str], factor: f64, offset: f64, base_unit: Unit) -> Self {
    Self::from_data(UnitData {
      symbols: owned(symbols),
      prefixes: Vec::new(),
      unprefixable_symbols: Vec::new(),
      symbol_factors: Vec::new(),
      factor,
      basic: false,
      conversion: Conversion::Affine { offset },
      base: Some(BaseUnitMap::singleton(base_unit, 1)),
      compatible: Vec::new(),
      parser: None,
    })
  }

  /// The unit of pure numbers. Its canonical symbol is the empty
  /// string and its signature is empty.
  pub fn dimensionless() -> Self {
    Self::from_data(UnitData {
      symbols: vec![String::new()],
      prefixes: Vec::new(),
      unprefixable_symbols: Vec::new(),
      symbol_factors: Vec::new(),
      factor: 1.0,
      basic: false,
      conversion: Conversion::Linear,
      base: Some(BaseUnitMap::empty()),
      compatible: Vec::new(),
      parser: None,
    })
  }

  /// A placeholder for a token no candidate unit matched. Unknown
  /// units are basic: each distinct literal is its own dimension, so
  /// two expressions sharing the same unknown literal stay comparable.
  pub(crate) fn unknown(literal: &str) -> Self {
    Self::from_data(UnitData {
      symbols: vec![literal.to_owned()],
      prefixes: Vec::new(),
      unprefixable_symbols: Vec::new(),
      symbol_factors: Vec::new(),
      factor: 1.0,
      basic: true,
      conversion: Conversion::Linear,
      base: None,
      compatible: Vec::new(),
      parser: None,
    })
  }

  /// A unit built by the factory from a parsed token sequence. Its
  /// symbol is the canonical string it was parsed from.
  pub(crate) fn synthesized(symbol: &str, factor: f64, base: BaseUnitMap, conversion: Conversion) -> Self {
    Self::from_data(UnitData {
      symbols: vec![symbol.to_owned()],
      prefixes: Vec::new(),
      unprefixable_symbols: Vec::new(),
      symbol_factors: Vec::new(),
      factor,
      basic: false,
      conversion,
      base: Some(base),
      compatible: Vec::new(),
      parser: None,
    })
  }

  fn from_data(data: UnitData) -> Self {
    assert!(!data.symbols.is_empty(), "A unit requires at least one symbol");
    Self { data: Arc::new(data) }
  }

  /// Returns a copy of this unit accepting the given prefixes. Used by
  /// catalogs for units whose constructor takes no prefix set.
  pub fn with_prefixes(self, prefixes: Vec<UnitPrefix>) -> Self {
    let mut data = (*self.data).clone();
    data.prefixes = prefixes;
    Self { data: Arc::new(data) }
  }

  /// Returns a copy of this unit whose compatible-unit set is extended
  /// by `units`. The set is consulted during simplification.
  pub fn with_compatible(self, units: impl IntoIterator<Item = Unit>) -> Self {
    let mut data = (*self.data).clone();
    data.compatible.extend(units);
    Self { data: Arc::new(data) }
  }

  /// Returns a copy of this unit which refuses prefixes on the given
  /// symbol, even though other symbols may accept them.
  pub fn without_prefix_on(self, symbol: &str) -> Self {
    let mut data = (*self.data).clone();
    data.unprefixable_symbols.push(symbol.to_owned());
    Self { data: Arc::new(data) }
  }

  /// Returns a copy of this unit with a factor override for one of its
  /// symbols.
  pub fn with_symbol_factor(self, symbol: &str, factor: f64) -> Self {
    let mut data = (*self.data).clone();
    data.symbol_factors.push((symbol.to_owned(), factor));
    Self { data: Arc::new(data) }
  }

  /// Returns a copy of this unit carrying a specialized parser, which
  /// the factory runs over the whole input ahead of the generic
  /// tokenizer. Parser identity does not participate in unit equality.
  pub fn with_parser(self, parser: Arc<dyn SpecializedParser>) -> Self {
    let mut data = (*self.data).clone();
    data.parser = Some(parser);
    Self { data: Arc::new(data) }
  }

  pub fn symbols(&self) -> &[String] {
    &self.data.symbols
  }

  pub fn canonical_symbol(&self) -> &str {
    &self.data.symbols[0]
  }

  pub fn prefixes(&self) -> &[UnitPrefix] {
    &self.data.prefixes
  }

  /// Whether a prefix may precede this specific symbol of the unit.
  pub fn is_prefix_allowed(&self, symbol: &str) -> bool {
    !self.data.prefixes.is_empty()
      && !self.data.unprefixable_symbols.iter().any(|s| s == symbol)
  }

  /// True only for irreducible units (including unknown-unit
  /// placeholders).
  pub fn is_basic(&self) -> bool {
    self.data.basic
  }

  /// True if `to_base(v) = factor * v` fully describes the conversion.
  pub fn is_conversion_linear(&self) -> bool {
    matches!(self.data.conversion, Conversion::Linear)
  }

  pub fn is_dimensionless(&self) -> bool {
    self.canonical_symbol().is_empty()
  }

  /// The conversion factor associated with the given symbol of this
  /// unit. Symbols without an override share the unit's default factor.
  pub fn factor(&self, symbol: &str) -> f64 {
    self.data.symbol_factors.iter()
      .find(|(s, _)| s == symbol)
      .map(|(_, f)| *f)
      .unwrap_or(self.data.factor)
  }

  pub fn default_factor(&self) -> f64 {
    self.data.factor
  }

  /// Converts a value in this unit into the base-unit representation.
  pub fn to_base(&self, value: f64) -> f64 {
    match &self.data.conversion {
      Conversion::Linear => self.data.factor * value,
      Conversion::Affine { offset } => self.data.factor * value + offset,
      Conversion::Composite(tokens) => convert::tokens_to_base(tokens, value),
    }
  }

  /// Converts a value in the base-unit representation into this unit.
  /// Inverse of [`Unit::to_base`] for all finite values, within
  /// floating-point tolerance.
  pub fn from_base(&self, value: f64) -> f64 {
    match &self.data.conversion {
      Conversion::Linear => value / self.data.factor,
      Conversion::Affine { offset } => (value - offset) / self.data.factor,
      Conversion::Composite(tokens) => convert::tokens_from_base(tokens, value),
    }
  }

  /// The dimensional signature of this unit. A basic unit maps to
  /// itself with exponent one; the self-reference is computed here
  /// rather than stored, so no unit value contains itself.
  pub fn base_units(&self) -> BaseUnitMap {
    match &self.data.base {
      Some(map) => map.clone(),
      None => BaseUnitMap::singleton(self.clone(), 1),
    }
  }

  /// Units this one should additionally be checked against during
  /// simplification. A convenience closure, not correctness-critical.
  pub fn compatible_units(&self) -> &[Unit] {
    &self.data.compatible
  }

  pub(crate) fn specialized_parser(&self) -> Option<&Arc<dyn SpecializedParser>> {
    self.data.parser.as_ref()
  }

  /// True if the two handles share one allocation. Implies equality;
  /// holds for values deduplicated through a registry cache.
  pub fn shares_identity(&self, other: &Unit) -> bool {
    Arc::ptr_eq(&self.data, &other.data)
  }

  /// This unit as a decoded token: identity prefix, canonical symbol,
  /// exponent one.
  pub fn as_token(&self) -> DecodedToken {
    DecodedToken {
      prefix: UnitPrefix::identity(),
      unit: self.clone(),
      symbol: self.canonical_symbol().to_owned(),
      exponent: 1,
    }
  }

  /// The token sequence conversion walks for this unit: the stored
  /// sequence for synthesized composite units, otherwise the unit
  /// itself as a single token.
  pub fn tokens(&self) -> Vec<DecodedToken> {
    match &self.data.conversion {
      Conversion::Composite(tokens) => tokens.clone(),
      _ => vec![self.as_token()],
    }
  }
}

fn owned(symbols: &[&str]) -> Vec<String> {
  symbols.iter().map(|s| (*s).to_owned()).collect()
}

impl Display for Unit {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.canonical_symbol())
  }
}

impl PartialEq for Unit {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.data, &other.data) || *self.data == *other.data
  }
}

impl Eq for Unit {}

impl Hash for Unit {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.data.hash(state);
  }
}

impl PartialEq for UnitData {
  fn eq(&self, other: &Self) -> bool {
    self.symbols == other.symbols
      && self.prefixes == other.prefixes
      && self.unprefixable_symbols == other.unprefixable_symbols
      && self.symbol_factors == other.symbol_factors
      && self.factor == other.factor
      && self.basic == other.basic
      && self.conversion == other.conversion
      && self.base == other.base
      && self.compatible == other.compatible
    // The parser hook is deliberately not part of unit identity.
  }
}

impl Eq for UnitData {}

impl Hash for UnitData {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.symbols.hash(state);
    self.prefixes.hash(state);
    self.unprefixable_symbols.hash(state);
    for (symbol, factor) in &self.symbol_factors {
      symbol.hash(state);
      factor.to_bits().hash(state);
    }
    self.factor.to_bits().hash(state);
    self.basic.hash(state);
    self.conversion.hash(state);
    self.base.hash(state);
    self.compatible.hash(state);
  }
}

impl PartialEq for Conversion {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Conversion::Linear, Conversion::Linear) => true,
      (Conversion::Affine { offset: a }, Conversion::Affine { offset: b }) => a == b,
      (Conversion::Composite(a), Conversion::Composite(b)) => a == b,
      _ => false,
    }
  }
}

impl Eq for Conversion {}

impl Hash for Conversion {
  fn hash<H: Hasher>(&self, state: &mut H) {
    match self {
      Conversion::Linear => 0u8.hash(state),
      Conversion::Affine { offset } => {
        1u8.hash(state);
        offset.to_bits().hash(state);
      }
      Conversion::Composite(tokens) => {
        2u8.hash(state);
        tokens.hash(state);
      }
    }
  }
}
