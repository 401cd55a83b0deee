
//! Sample units shared by the unit tests in this crate. These mirror a
//! handful of catalog entries but are constructed directly, so tests of
//! the lower layers do not depend on the default catalog.

use super::{BaseUnitMap, Unit};
use crate::prefix::UnitPrefix;

pub(crate) fn meters() -> Unit {
  Unit::base(&["m"], UnitPrefix::si_prefixes())
}

pub(crate) fn seconds() -> Unit {
  Unit::base(&["s"], UnitPrefix::si_prefixes())
}

pub(crate) fn grams() -> Unit {
  Unit::base(&["g"], UnitPrefix::si_prefixes())
}

pub(crate) fn amperes() -> Unit {
  Unit::base(&["A"], UnitPrefix::si_prefixes())
}

pub(crate) fn kelvin() -> Unit {
  Unit::base(&["K"], UnitPrefix::si_prefixes())
}

pub(crate) fn minutes() -> Unit {
  Unit::derived(&["min"], 60.0, BaseUnitMap::singleton(seconds(), 1), Vec::new())
}

pub(crate) fn celsius() -> Unit {
  Unit::affine(&["°C", "degC"], 1.0, 273.15, kelvin())
}

pub(crate) fn newtons() -> Unit {
  let signature = BaseUnitMap::new([(grams(), 1), (meters(), 1), (seconds(), -2)]);
  Unit::derived(&["N"], 1000.0, signature, UnitPrefix::si_prefixes())
}
