
//! Resolution of human-written unit expressions ("kg m^2 s^-1", "°C",
//! "km^2") into a canonical, dimensionally-comparable representation,
//! plus value conversion, compatibility checking, and a search for
//! simpler equivalent spellings of composite units.
//!
//! Everything runs through a [`UnitRegistry`], which owns the candidate
//! unit catalog and the memoization caches:
//!
//! ```no_run
//! use unitcalc::UnitRegistry;
//!
//! let registry = UnitRegistry::new();
//! let kelvin = registry.convert(0.0, "°C", "K").unwrap();
//! assert_eq!(kelvin, 273.15);
//! assert_eq!(registry.simplify("kg m s^-2").unwrap(), "N");
//! ```

pub mod convert;
pub mod error;
pub mod parse;
pub mod prefix;
pub mod registry;
pub mod unit;

mod simplify;

pub use convert::{convert, convertible, equivalent, factor, proportional, BaseConversionInfo};
pub use error::UnitError;
pub use parse::{DecodedToken, SpecializedParser, StringRange};
pub use prefix::UnitPrefix;
pub use registry::UnitRegistry;
pub use unit::{BaseUnitMap, Unit};
