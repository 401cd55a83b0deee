
//! The default unit catalog: SI base units, the common derived units,
//! and the affine temperature scales.
//!
//! The base of the mass dimension is the gram rather than the
//! kilogram, so that prefixes behave uniformly across all base units;
//! derived units carry the compensating factor (one newton is 1000
//! g·m/s²). The vector order below is the matcher's iteration order
//! and must stay stable: parses are defined to be reproducible across
//! runs.

use super::{BaseUnitMap, Unit};
use crate::prefix::UnitPrefix;

pub fn default_units() -> Vec<Unit> {
  let si = UnitPrefix::si_prefixes;
  let m = Unit::base(&["m"], si());
  let s = Unit::base(&["s"], si());
  let g = Unit::base(&["g"], si());
  let ampere = Unit::base(&["A"], si());
  let kelvin = Unit::base(&["K"], si());
  let candela = Unit::base(&["cd"], si());
  let mole = Unit::base(&["mol"], si());

  let sig = |entries: &[(&Unit, i64)]| {
    BaseUnitMap::new(entries.iter().map(|(unit, exponent)| ((*unit).clone(), *exponent)))
  };

  vec![
    // Base units
    m.clone(),
    s.clone(),
    g.clone(),
    ampere.clone(),
    kelvin.clone(),
    candela.clone(),
    mole.clone(),
    // Time units beyond the second; conventionally unprefixed
    Unit::derived(&["min"], 60.0, sig(&[(&s, 1)]), Vec::new()),
    Unit::derived(&["h"], 3600.0, sig(&[(&s, 1)]), Vec::new()),
    Unit::derived(&["day"], 86400.0, sig(&[(&s, 1)]), Vec::new()),
    // Frequency and radioactivity
    Unit::derived(&["Hz"], 1.0, sig(&[(&s, -1)]), si()),
    Unit::derived(&["Bq"], 1.0, sig(&[(&s, -1)]), si()),
    // Mechanics
    Unit::derived(&["N"], 1000.0, sig(&[(&g, 1), (&m, 1), (&s, -2)]), si()),
    Unit::derived(&["Pa"], 1000.0, sig(&[(&g, 1), (&m, -1), (&s, -2)]), si()),
    Unit::derived(&["bar"], 1e8, sig(&[(&g, 1), (&m, -1), (&s, -2)]), si()),
    Unit::derived(&["J"], 1000.0, sig(&[(&g, 1), (&m, 2), (&s, -2)]), si()),
    Unit::derived(&["eV"], 1.602176634e-16, sig(&[(&g, 1), (&m, 2), (&s, -2)]), si()),
    Unit::derived(&["W"], 1000.0, sig(&[(&g, 1), (&m, 2), (&s, -3)]), si()),
    Unit::derived(&["Gy"], 1.0, sig(&[(&m, 2), (&s, -2)]), si()),
    Unit::derived(&["Sv"], 1.0, sig(&[(&m, 2), (&s, -2)]), si()),
    // Standard gravity, as an acceleration
    Unit::derived(&["gn"], 9.80665, sig(&[(&m, 1), (&s, -2)]), Vec::new()),
    // Electromagnetism
    Unit::derived(&["C"], 1.0, sig(&[(&ampere, 1), (&s, 1)]), si()),
    Unit::derived(&["V"], 1000.0, sig(&[(&g, 1), (&m, 2), (&s, -3), (&ampere, -1)]), si()),
    Unit::derived(&["Ω", "Ohm"], 1000.0, sig(&[(&g, 1), (&m, 2), (&s, -3), (&ampere, -2)]), si()),
    Unit::derived(&["S"], 1e-3, sig(&[(&g, -1), (&m, -2), (&s, 3), (&ampere, 2)]), si()),
    Unit::derived(&["F"], 1e-3, sig(&[(&g, -1), (&m, -2), (&s, 4), (&ampere, 2)]), si()),
    Unit::derived(&["Wb"], 1000.0, sig(&[(&g, 1), (&m, 2), (&s, -2), (&ampere, -1)]), si()),
    Unit::derived(&["T"], 1000.0, sig(&[(&g, 1), (&s, -2), (&ampere, -1)]), si()),
    Unit::derived(&["H"], 1000.0, sig(&[(&g, 1), (&m, 2), (&s, -2), (&ampere, -2)]), si()),
    // Photometry
    Unit::derived(&["lm"], 1.0, sig(&[(&candela, 1)]), si()),
    Unit::derived(&["lx"], 1.0, sig(&[(&candela, 1), (&m, -2)]), si()),
    // Angles, dimensionless by signature
    Unit::derived(&["rad"], 1.0, BaseUnitMap::empty(), si()),
    Unit::derived(&["sr"], 1.0, BaseUnitMap::empty(), si()),
    // Volume and mass conveniences
    Unit::derived(&["L", "l"], 1e-3, sig(&[(&m, 3)]), si()),
    Unit::derived(&["t"], 1e6, sig(&[(&g, 1)]), si()),
    // Affine temperature scales. The "deg" spellings never take a
    // prefix; the symbol spellings do.
    Unit::affine(&["°C", "degC"], 1.0, 273.15, kelvin.clone())
      .with_prefixes(si())
      .without_prefix_on("degC"),
    Unit::affine(&["°F", "degF"], 5.0 / 9.0, 459.67 * 5.0 / 9.0, kelvin.clone())
      .with_prefixes(si())
      .without_prefix_on("degF"),
  ]
}
