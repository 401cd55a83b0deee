
use super::range::StringRange;
use crate::error::UnitError;
use crate::prefix::UnitPrefix;
use crate::unit::Unit;

use once_cell::sync::Lazy;
use regex::Regex;

use std::fmt::{self, Formatter, Display};

/// The parse result for one piece of input: which unit matched, under
/// which of its symbols, with which prefix, raised to which power.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecodedToken {
  pub prefix: UnitPrefix,
  pub unit: Unit,
  /// The unit symbol that actually matched; relevant for units whose
  /// symbols carry distinct factors or prefix rules.
  pub symbol: String,
  pub exponent: i64,
}

impl DecodedToken {
  /// The multiplicative factor contributed by one occurrence of this
  /// token at exponent one: prefix factor times the matched symbol's
  /// factor.
  pub fn conversion_factor(&self) -> f64 {
    self.prefix.factor() * self.unit.factor(&self.symbol)
  }

  pub fn is_linear(&self) -> bool {
    self.unit.is_conversion_linear()
  }
}

impl Display for DecodedToken {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}{}", self.prefix.canonical_symbol(), self.symbol)?;
    if self.exponent != 1 {
      write!(f, "^{}", self.exponent)?;
    }
    Ok(())
  }
}

/// A whitespace-delimited piece of input, split off its exponent suffix
/// but not yet matched against any unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawToken<'a> {
  pub body: &'a str,
  pub exponent: i64,
  /// Character offsets of the whole piece, exponent suffix included.
  pub range: StringRange,
}

/// Splits the input into whitespace-delimited pieces, recording the
/// inclusive character range each piece occupies and parsing its
/// optional `^<signed integer>` suffix.
pub(crate) fn scan_raw_tokens(input: &str) -> Result<Vec<RawToken<'_>>, UnitError> {
  static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

  let mut tokens = Vec::new();
  let mut byte_cursor = 0;
  let mut char_cursor = 0;
  for m in TOKEN_RE.find_iter(input) {
    char_cursor += input[byte_cursor..m.start()].chars().count();
    let char_len = m.as_str().chars().count();
    let range = StringRange::new(char_cursor, char_cursor + char_len - 1);
    byte_cursor = m.end();
    char_cursor += char_len;

    let (body, exponent) = split_exponent(m.as_str())?;
    tokens.push(RawToken { body, exponent, range });
  }
  Ok(tokens)
}

/// Splits `piece` at a `^` separator and parses the trailing exponent.
/// A missing exponent means one. A leading `^` is not a separator, so
/// pathological pieces like `^2` stay intact and fall through to the
/// unknown-unit path.
fn split_exponent(piece: &str) -> Result<(&str, i64), UnitError> {
  match piece.find('^').filter(|ix| *ix > 0) {
    None => Ok((piece, 1)),
    Some(ix) => {
      let text = &piece[ix + 1..];
      let exponent = text.parse::<i64>().map_err(|_| UnitError::MalformedExponent {
        token: piece.to_owned(),
        text: text.to_owned(),
      })?;
      Ok((&piece[..ix], exponent))
    }
  }
}
