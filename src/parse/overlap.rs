
use super::range::StringRange;
use super::token::DecodedToken;
use crate::error::UnitError;

use std::collections::BTreeMap;

/// Adds a match to the working set, reconciling collisions on the same
/// range: an identical decode from another parser pass is dropped
/// silently, a different decode is an ambiguity.
pub(crate) fn insert_match(
  matches: &mut BTreeMap<StringRange, DecodedToken>,
  range: StringRange,
  token: DecodedToken,
) -> Result<(), UnitError> {
  match matches.get(&range) {
    None => {
      matches.insert(range, token);
      Ok(())
    }
    Some(existing) if *existing == token => Ok(()),
    Some(existing) => Err(ambiguity(&range, existing, &range, &token)),
  }
}

/// Reconciles matches collected from multiple parser passes over the
/// same source string.
///
/// Any range strictly contained in a larger match is discarded: a
/// multi-word match supersedes the word-by-word matches inside it.
/// If two surviving ranges still share characters, the parse is
/// genuinely ambiguous and fails. Survivors are returned in ascending
/// range order, which downstream consumers rely on because exponent
/// and prefix context is range-local.
pub(crate) fn resolve_overlaps(
  matches: BTreeMap<StringRange, DecodedToken>,
) -> Result<Vec<(StringRange, DecodedToken)>, UnitError> {
  let ranges: Vec<StringRange> = matches.keys().copied().collect();
  let surviving: Vec<(StringRange, DecodedToken)> = matches.into_iter()
    .filter(|(range, _)| !ranges.iter().any(|other| other.comprises(range)))
    .collect();

  // With containment pruned away, any remaining intersection shows up
  // between neighbors in range order.
  for pair in surviving.windows(2) {
    let (first_range, first) = &pair[0];
    let (second_range, second) = &pair[1];
    if first_range.intersects(second_range) {
      return Err(ambiguity(first_range, first, second_range, second));
    }
  }
  Ok(surviving)
}

fn ambiguity(
  first_range: &StringRange,
  first: &DecodedToken,
  second_range: &StringRange,
  second: &DecodedToken,
) -> UnitError {
  UnitError::AmbiguousOverlap {
    first: first.to_string(),
    first_range: *first_range,
    second: second.to_string(),
    second_range: *second_range,
  }
}
