
use std::fmt::{self, Formatter, Display};

/// A span of character offsets into a parsed string, both endpoints
/// included. Used to track which part of the original input a matched
/// unit token occupied, so that matches from several parser passes can
/// be reconciled.
///
/// Ranges order by starting offset first and by length second, which is
/// exactly the order the overlap resolver emits surviving tokens in.
///
/// Invariant: `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StringRange {
  pub from: usize,
  pub to: usize,
}

impl StringRange {
  pub fn new(from: usize, to: usize) -> Self {
    assert!(from <= to, "StringRange requires from <= to");
    Self { from, to }
  }

  /// The number of characters covered; at least one.
  pub fn len(&self) -> usize {
    self.to - self.from + 1
  }

  /// True if `self` strictly contains `other`: every character of
  /// `other` is covered by `self`, and the two ranges are not equal.
  pub fn comprises(&self, other: &StringRange) -> bool {
    self.from <= other.from && self.to >= other.to && self != other
  }

  /// True if the two ranges share at least one character.
  pub fn intersects(&self, other: &StringRange) -> bool {
    self.from <= other.to && other.from <= self.to
  }
}

impl Display for StringRange {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}-{}", self.from, self.to)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ordering_is_start_then_length() {
    let mut ranges = vec![
      StringRange::new(4, 6),
      StringRange::new(0, 9),
      StringRange::new(0, 2),
      StringRange::new(4, 4),
    ];
    ranges.sort();
    assert_eq!(ranges, vec![
      StringRange::new(0, 2),
      StringRange::new(0, 9),
      StringRange::new(4, 4),
      StringRange::new(4, 6),
    ]);
  }

  #[test]
  fn test_comprises() {
    let outer = StringRange::new(0, 9);
    let inner = StringRange::new(2, 5);
    assert!(outer.comprises(&inner));
    assert!(!inner.comprises(&outer));
    // A range does not strictly contain itself.
    assert!(!outer.comprises(&outer));
    // Sharing an endpoint still counts as containment.
    assert!(outer.comprises(&StringRange::new(0, 5)));
    assert!(outer.comprises(&StringRange::new(5, 9)));
  }

  #[test]
  fn test_intersects() {
    let a = StringRange::new(0, 4);
    assert!(a.intersects(&StringRange::new(4, 8)));
    assert!(a.intersects(&StringRange::new(2, 3)));
    assert!(a.intersects(&a));
    assert!(!a.intersects(&StringRange::new(5, 8)));
  }

  #[test]
  fn test_len() {
    assert_eq!(StringRange::new(3, 3).len(), 1);
    assert_eq!(StringRange::new(0, 9).len(), 10);
  }
}
