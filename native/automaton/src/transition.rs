//! Interval-labelled transitions.

use crate::state::StateId;
use crate::symbol::{Symbol, write_symbol};
use std::cmp::Ordering;
use std::fmt;

/// An edge leaving a state on every symbol in `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub min: Symbol,
    pub max: Symbol,
    pub to: StateId,
}

impl Transition {
    /// Create a transition on the closed interval `min..=max`.
    ///
    /// Callers must ensure `min <= max`; manual assembly goes through
    /// [`Graph::add_transition`](crate::Graph::add_transition), which checks it.
    pub fn new(min: Symbol, max: Symbol, to: StateId) -> Self {
        debug_assert!(min <= max, "empty interval {min}..={max}");
        Self { min, max, to }
    }

    /// Create a transition on a single symbol.
    pub fn single(symbol: Symbol, to: StateId) -> Self {
        Self::new(symbol, symbol, to)
    }

    /// Check whether `symbol` lies within this transition's interval.
    #[inline]
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.min <= symbol && symbol <= self.max
    }

    /// Order by target, then interval start ascending, then interval end descending.
    pub fn cmp_by_target(&self, other: &Self) -> Ordering {
        self.to
            .cmp(&other.to)
            .then(self.min.cmp(&other.min))
            .then(other.max.cmp(&self.max))
    }

    /// Order by interval start ascending, then interval end descending, then target.
    pub fn cmp_by_interval(&self, other: &Self) -> Ordering {
        self.min
            .cmp(&other.min)
            .then(other.max.cmp(&self.max))
            .then(self.to.cmp(&other.to))
    }

    /// Render the interval label, e.g. `a` or `a-z`.
    pub fn label(&self) -> String {
        let mut out = String::new();
        write_symbol(self.min, &mut out);
        if self.min != self.max {
            out.push('-');
            write_symbol(self.max, &mut out);
        }
        out
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.label(), self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let t = Transition::new(10, 20, 0);
        assert!(t.contains(10));
        assert!(t.contains(20));
        assert!(!t.contains(9));
        assert!(!t.contains(21));
    }

    #[test]
    fn test_orderings() {
        let wide = Transition::new(1, 9, 2);
        let narrow = Transition::new(1, 3, 1);
        // same start: wider interval first
        assert_eq!(wide.cmp_by_interval(&narrow), Ordering::Less);
        assert_eq!(narrow.cmp_by_target(&wide), Ordering::Less);
    }

    #[test]
    fn test_display() {
        let t = Transition::new(u16::from(b'a'), u16::from(b'z'), 3);
        assert_eq!(t.to_string(), "a-z -> 3");
        assert_eq!(Transition::single(u16::from(b'x'), 0).label(), "x");
    }
}
