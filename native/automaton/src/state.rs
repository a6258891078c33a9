//! State types for automata.

use crate::symbol::Symbol;
use crate::transition::Transition;
use fixedbitset::FixedBitSet;
use std::fmt;
use std::hash::Hash;

/// A state identifier: the index of a state inside its [`Graph`](crate::Graph).
pub type StateId = u32;

/// Data attached to accepting states.
///
/// `P::default()` is used for accept states the engine creates on its own
/// (constructions, complement, Kleene star).
pub trait Payload: Clone + Default + Eq + Hash + fmt::Debug {}

impl<T: Clone + Default + Eq + Hash + fmt::Debug> Payload for T {}

/// A node of the automaton graph.
///
/// A state accepts iff it carries a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State<P> {
    pub(crate) transitions: Vec<Transition>,
    pub(crate) accept: Option<P>,
}

impl<P: Payload> State<P> {
    /// Create a new non-accepting state with no transitions.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            accept: None,
        }
    }

    /// Create a new accepting state carrying `payload`.
    pub fn accepting(payload: P) -> Self {
        Self {
            transitions: Vec::new(),
            accept: Some(payload),
        }
    }

    /// Whether this state accepts.
    pub fn is_accept(&self) -> bool {
        self.accept.is_some()
    }

    /// The accept payload, if this state accepts.
    pub fn accept(&self) -> Option<&P> {
        self.accept.as_ref()
    }

    /// Set or clear the accept payload.
    pub fn set_accept(&mut self, accept: Option<P>) {
        self.accept = accept;
    }

    /// Outgoing transitions, in storage order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Add an outgoing transition. No overlap checking is done here.
    pub fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    /// Transitions sorted by target first (`to_first`) or by interval first.
    pub fn sorted_transitions(&self, to_first: bool) -> Vec<Transition> {
        let mut sorted = self.transitions.clone();
        if to_first {
            sorted.sort_by(Transition::cmp_by_target);
        } else {
            sorted.sort_by(Transition::cmp_by_interval);
        }
        sorted
    }

    /// The first transition target on `symbol`, if any.
    ///
    /// For a state of a deterministic automaton this is the unique successor.
    pub fn step(&self, symbol: Symbol) -> Option<StateId> {
        self.transitions
            .iter()
            .find(|t| t.contains(symbol))
            .map(|t| t.to)
    }

    /// Push every transition target on `symbol` into `dest`.
    pub fn step_all(&self, symbol: Symbol, dest: &mut Vec<StateId>) {
        dest.extend(
            self.transitions
                .iter()
                .filter(|t| t.contains(symbol))
                .map(|t| t.to),
        );
    }
}

impl<P: Payload> Default for State<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Membership bits over the state ids of one graph.
///
/// Sized to the graph it was created for; inserting a larger id grows it.
#[derive(Clone, Default)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// `{state}`, sized for a graph of `capacity` states.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    /// Returns true if `state` was not yet a member.
    pub fn insert(&mut self, state: StateId) -> bool {
        let bit = state as usize;
        if bit >= self.bits.len() {
            self.bits.grow(bit + 1);
        }
        !self.bits.put(bit)
    }

    pub fn remove(&mut self, state: StateId) {
        if (state as usize) < self.bits.len() {
            self.bits.set(state as usize, false);
        }
    }

    pub fn contains(&self, state: StateId) -> bool {
        self.bits.contains(state as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Members in increasing id order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|bit| bit as StateId)
    }

    /// Members of both sets.
    pub fn intersection(&self, other: &StateSet) -> StateSet {
        let mut bits = self.bits.clone();
        bits.intersect_with(&other.bits);
        Self { bits }
    }

    /// Members of `self` that are not in `other`.
    pub fn difference(&self, other: &StateSet) -> StateSet {
        let mut bits = self.bits.clone();
        bits.difference_with(&other.bits);
        Self { bits }
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut set = Self::default();
        for state in iter {
            set.insert(state);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_set_basic() {
        let mut set = StateSet::with_capacity(10);
        assert!(set.is_empty());

        assert!(set.insert(3));
        assert!(set.insert(7));
        assert!(!set.insert(7));
        assert_eq!(set.len(), 2);
        assert!(set.contains(3));
        assert!(!set.contains(5));
        assert!(!set.contains(100));
    }

    #[test]
    fn test_state_set_grows() {
        let mut set = StateSet::with_capacity(2);
        set.insert(40);
        assert!(set.contains(40));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![40]);
        set.remove(40);
        assert!(set.is_empty());
    }

    #[test]
    fn test_state_set_intersection_difference() {
        let left: StateSet = [1, 2, 3, 9].into_iter().collect();
        let right: StateSet = [2, 9, 20].into_iter().collect();
        let members = |set: StateSet| set.iter().collect::<Vec<_>>();
        assert_eq!(members(left.intersection(&right)), vec![2, 9]);
        assert_eq!(members(left.difference(&right)), vec![1, 3]);
        assert_eq!(members(right.difference(&left)), vec![20]);
    }

    #[test]
    fn test_step_and_sorting() {
        let mut state: State<()> = State::new();
        state.add_transition(Transition::new(20, 30, 1));
        state.add_transition(Transition::new(0, 10, 2));
        state.add_transition(Transition::new(5, 25, 0));

        assert_eq!(state.step(7), Some(2));
        let mut dest = Vec::new();
        state.step_all(22, &mut dest);
        assert_eq!(dest, vec![1, 0]);

        let by_interval: Vec<_> = state.sorted_transitions(false).iter().map(|t| t.min).collect();
        assert_eq!(by_interval, vec![0, 5, 20]);
        let by_target: Vec<_> = state.sorted_transitions(true).iter().map(|t| t.to).collect();
        assert_eq!(by_target, vec![0, 1, 2]);
    }
}
