//! Arena-backed state graph shared by every automaton algorithm.
//!
//! A [`Graph`] owns its states in a `Vec`, addresses them by [`StateId`] and
//! designates one initial state. The passes defined here maintain the
//! representation invariants every operation relies on:
//!
//! - [`Graph::reduce`]: only reachable states are kept (compaction) and
//!   overlapping or adjacent intervals with the same target are merged.
//! - [`Graph::remove_dead_transitions`]: no edge leads to a state from which
//!   no accept state is reachable.
//!
//! Epsilon edges are never stored. [`Graph::add_epsilon`] splices them in by
//! copying the target's edges and acceptance into the source.

use crate::error::{AutomatonError, Result};
use crate::state::{Payload, State, StateId, StateSet};
use crate::symbol::{MAX_SYMBOL, MIN_SYMBOL, Symbol};
use crate::transition::Transition;
use rangemap::RangeInclusiveSet;
use std::collections::VecDeque;

/// A finite-state graph with interval-labelled edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph<P> {
    pub(crate) states: Vec<State<P>>,
    pub(crate) initial: StateId,
}

impl<P: Payload> Graph<P> {
    /// Create a graph with a single non-accepting initial state.
    pub fn new() -> Self {
        Self {
            states: vec![State::new()],
            initial: 0,
        }
    }

    /// Number of states in the arena, reachable or not.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: a graph has at least its initial state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The initial state.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Make `state` the initial state.
    pub fn set_initial(&mut self, state: StateId) -> Result<()> {
        self.check_state(state)?;
        self.initial = state;
        Ok(())
    }

    /// Get a state by id.
    ///
    /// # Panics
    /// If `id` is not a state of this graph.
    pub fn state(&self, id: StateId) -> &State<P> {
        &self.states[id as usize]
    }

    /// Get a state by id for modification.
    ///
    /// # Panics
    /// If `id` is not a state of this graph.
    pub fn state_mut(&mut self, id: StateId) -> &mut State<P> {
        &mut self.states[id as usize]
    }

    /// Add a new state and return its ID.
    pub fn add_state(&mut self, state: State<P>) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(state);
        id
    }

    /// Add a transition `from --[min..=max]--> to`, validating its endpoints.
    pub fn add_transition(
        &mut self,
        from: StateId,
        min: Symbol,
        max: Symbol,
        to: StateId,
    ) -> Result<()> {
        self.check_state(from)?;
        self.check_state(to)?;
        if min > max {
            return Err(AutomatonError::InvalidInterval { min, max });
        }
        self.push_transition(from, Transition::new(min, max, to));
        Ok(())
    }

    pub(crate) fn push_transition(&mut self, from: StateId, transition: Transition) {
        self.states[from as usize].transitions.push(transition);
    }

    fn check_state(&self, state: StateId) -> Result<()> {
        if (state as usize) < self.states.len() {
            Ok(())
        } else {
            Err(AutomatonError::UnknownState(state))
        }
    }

    /// Splice a zero-width edge from `from` to `to`.
    ///
    /// All of `to`'s current edges are copied into `from`. If `to` accepts and
    /// `from` does not, `from` adopts `to`'s payload; an existing payload on
    /// `from` is kept.
    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        if from == to {
            return;
        }
        let target = &self.states[to as usize];
        let copied = target.transitions.clone();
        let accept = target.accept.clone();

        let source = &mut self.states[from as usize];
        if source.accept.is_none() {
            source.accept = accept;
        }
        source.transitions.extend(copied);
    }

    /// Copy every state of `other` into this arena.
    ///
    /// The copied states are disconnected until the caller links them.
    /// Returns the id `other`'s initial state received here.
    pub fn absorb(&mut self, other: &Graph<P>) -> StateId {
        let offset = self.states.len() as StateId;
        self.states.extend(other.states.iter().map(|state| {
            let mut state = state.clone();
            for t in &mut state.transitions {
                t.to += offset;
            }
            state
        }));
        other.initial + offset
    }

    /// States reachable from the initial state, in breadth-first order.
    pub fn reachable(&self) -> Vec<StateId> {
        let mut visited = StateSet::with_capacity(self.states.len());
        let mut order = Vec::with_capacity(self.states.len());
        let mut queue = VecDeque::new();
        visited.insert(self.initial);
        queue.push_back(self.initial);

        while let Some(state) = queue.pop_front() {
            order.push(state);
            for t in &self.states[state as usize].transitions {
                if visited.insert(t.to) {
                    queue.push_back(t.to);
                }
            }
        }

        order
    }

    /// Reachable accept states, in breadth-first order.
    pub fn accept_states(&self) -> Vec<StateId> {
        self.reachable()
            .into_iter()
            .filter(|&s| self.states[s as usize].is_accept())
            .collect()
    }

    /// Number of edges over all reachable states.
    pub fn number_of_transitions(&self) -> usize {
        self.reachable()
            .iter()
            .map(|&s| self.states[s as usize].transitions.len())
            .sum()
    }

    /// Reachable states from which some accept state is reachable.
    pub fn live_states(&self) -> StateSet {
        let reachable = self.reachable();

        // inverse[target] = predecessors of target
        let mut inverse: Vec<Vec<StateId>> = vec![Vec::new(); self.states.len()];
        for &state in &reachable {
            for t in &self.states[state as usize].transitions {
                inverse[t.to as usize].push(state);
            }
        }

        let mut live = StateSet::with_capacity(self.states.len());
        let mut worklist = VecDeque::new();
        for &state in &reachable {
            if self.states[state as usize].is_accept() {
                live.insert(state);
                worklist.push_back(state);
            }
        }

        while let Some(state) = worklist.pop_front() {
            for &pred in &inverse[state as usize] {
                if live.insert(pred) {
                    worklist.push_back(pred);
                }
            }
        }

        live
    }

    /// Sorted, deduplicated interval boundaries of all reachable edges.
    ///
    /// Contains `MIN_SYMBOL`, every interval start and every interval end + 1.
    /// Symbols between two consecutive points behave identically in every state.
    pub fn start_points(&self) -> Vec<Symbol> {
        let mut points = vec![MIN_SYMBOL];
        for state in self.reachable() {
            for t in &self.states[state as usize].transitions {
                points.push(t.min);
                if t.max < MAX_SYMBOL {
                    points.push(t.max + 1);
                }
            }
        }
        points.sort_unstable();
        points.dedup();
        points
    }

    /// Drop unreachable states and renumber the rest in breadth-first order.
    ///
    /// The initial state becomes state 0.
    pub fn compact(&mut self) {
        let order = self.reachable();
        let already_compact = order.len() == self.states.len()
            && order.iter().enumerate().all(|(i, &s)| i as StateId == s);
        if already_compact {
            return;
        }

        let mut remap = vec![StateId::MAX; self.states.len()];
        for (new_id, &old_id) in order.iter().enumerate() {
            remap[old_id as usize] = new_id as StateId;
        }

        let mut old_states = std::mem::take(&mut self.states);
        self.states = order
            .iter()
            .map(|&old_id| {
                let mut state = std::mem::take(&mut old_states[old_id as usize]);
                for t in &mut state.transitions {
                    t.to = remap[t.to as usize];
                }
                state
            })
            .collect();
        self.initial = 0;
    }

    /// Compact, then merge overlapping or adjacent intervals sharing a target.
    pub fn reduce(&mut self) {
        self.compact();
        for state in &mut self.states {
            let sorted = state.sorted_transitions(true);
            state.transitions.clear();

            let mut current: Option<Transition> = None;
            for t in sorted {
                if let Some(run) = current.as_mut() {
                    if run.to == t.to && u32::from(t.min) <= u32::from(run.max) + 1 {
                        run.max = run.max.max(t.max);
                        continue;
                    }
                    state.transitions.push(*run);
                }
                current = Some(t);
            }
            if let Some(run) = current {
                state.transitions.push(run);
            }
        }
    }

    /// Remove every edge into a dead state, then [`reduce`](Self::reduce).
    pub fn remove_dead_transitions(&mut self) {
        let live = self.live_states();
        for state in self.reachable() {
            self.states[state as usize]
                .transitions
                .retain(|t| live.contains(t.to));
        }
        self.reduce();
    }

    /// Route every symbol a state has no edge for to a fresh non-accepting sink.
    ///
    /// The sink loops to itself on the whole alphabet. Returns its id.
    pub fn totalize(&mut self) -> StateId {
        let states = self.reachable();
        let sink = self.add_state(State::new());
        self.push_transition(sink, Transition::new(MIN_SYMBOL, MAX_SYMBOL, sink));

        for state in states {
            let covered: RangeInclusiveSet<Symbol> = self.states[state as usize]
                .transitions
                .iter()
                .map(|t| t.min..=t.max)
                .collect();
            let gaps: Vec<_> = covered.gaps(&(MIN_SYMBOL..=MAX_SYMBOL)).collect();
            for gap in gaps {
                self.push_transition(state, Transition::new(*gap.start(), *gap.end(), sink));
            }
        }

        sink
    }

    /// Per-state transitions sorted by interval, indexed by state id.
    pub(crate) fn sorted_transition_table(&self) -> Vec<Vec<Transition>> {
        self.states
            .iter()
            .map(|state| state.sorted_transitions(false))
            .collect()
    }

    /// Deterministic step: the successor of `state` on `symbol`, if any.
    /// `None` as well when `state` is not in this graph.
    pub fn step(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        self.states.get(state as usize)?.step(symbol)
    }

    /// Breadth step: every state reachable from `current` on `symbol`.
    /// Ids in `current` beyond this graph are skipped.
    pub fn step_set(&self, current: &StateSet, symbol: Symbol) -> StateSet {
        let mut dest = Vec::new();
        for state in current.iter() {
            if let Some(node) = self.states.get(state as usize) {
                node.step_all(symbol, &mut dest);
            }
        }
        let mut next = StateSet::with_capacity(self.states.len());
        for state in dest {
            next.insert(state);
        }
        next
    }

    /// Accept payloads of the members of `states`, in state order.
    pub fn accept_payloads(&self, states: &StateSet) -> Vec<&P> {
        states
            .iter()
            .filter_map(|s| self.states.get(s as usize)?.accept())
            .collect()
    }
}

impl<P: Payload> Default for Graph<P> {
    fn default() -> Self {
        Self::new()
    }
}
