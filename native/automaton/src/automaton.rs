//! The automaton container.
//!
//! An [`Automaton`] is either an explicit [`Graph`] or, when it is statically
//! known to accept exactly one string, that string alone ("singleton" form).
//! Anything that needs the explicit graph expands the singleton first.
//!
//! Invariants kept by every engine operation:
//! - only states reachable from the initial state are stored;
//! - edges are reduced and never lead to dead states;
//! - `is_deterministic() == true` guarantees no two edges of a state overlap
//!   (`false` means "not known").

use crate::error::Result;
use crate::graph::Graph;
use crate::state::{Payload, State, StateId, StateSet};
use crate::symbol::{MAX_SYMBOL, MIN_SYMBOL, Symbol, to_symbols, write_symbol};
use crate::transition::Transition;
use std::borrow::Cow;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Repr<P> {
    Singleton(Vec<Symbol>),
    Graph(Arc<Graph<P>>),
}

/// A finite-state automaton over 16-bit symbols.
///
/// Cloning is cheap: the explicit graph is shared and copied on write.
#[derive(Debug, Clone)]
pub struct Automaton<P = ()> {
    repr: Repr<P>,
    deterministic: bool,
    /// Cached language hash, cleared whenever the graph changes.
    hash: Cell<Option<u32>>,
}

impl<P: Payload> Automaton<P> {
    /// Wrap a manually assembled graph.
    ///
    /// Call [`restore_invariant`](Self::restore_invariant) before using the
    /// result with any engine operation, and only pass `deterministic = true`
    /// if no state has overlapping edges.
    pub fn from_graph(graph: Graph<P>, deterministic: bool) -> Self {
        Self {
            repr: Repr::Graph(Arc::new(graph)),
            deterministic,
            hash: Cell::new(None),
        }
    }

    /// An automaton in singleton form accepting exactly `symbols`.
    pub fn from_singleton(symbols: Vec<Symbol>) -> Self {
        Self {
            repr: Repr::Singleton(symbols),
            deterministic: true,
            hash: Cell::new(None),
        }
    }

    /// The accepted string if this automaton is in singleton form.
    pub fn singleton(&self) -> Option<&[Symbol]> {
        match &self.repr {
            Repr::Singleton(symbols) => Some(symbols),
            Repr::Graph(_) => None,
        }
    }

    /// Whether this automaton is in singleton form.
    pub fn is_singleton(&self) -> bool {
        matches!(self.repr, Repr::Singleton(_))
    }

    /// The explicit graph, or `None` in singleton form.
    pub fn graph(&self) -> Option<&Graph<P>> {
        match &self.repr {
            Repr::Singleton(_) => None,
            Repr::Graph(graph) => Some(graph),
        }
    }

    /// The explicit graph, building a temporary one for a singleton.
    pub fn explicit_graph(&self) -> Cow<'_, Graph<P>> {
        match &self.repr {
            Repr::Singleton(symbols) => Cow::Owned(singleton_graph(symbols)),
            Repr::Graph(graph) => Cow::Borrowed(graph),
        }
    }

    /// Mutable access to the explicit graph, expanding a singleton first.
    ///
    /// Clears the cached hash. The graph is copied first if its storage is
    /// shared with another automaton.
    pub fn graph_mut(&mut self) -> &mut Graph<P> {
        self.expand_singleton();
        self.hash.set(None);
        match &mut self.repr {
            Repr::Graph(graph) => Arc::make_mut(graph),
            Repr::Singleton(_) => unreachable!("singleton was expanded"),
        }
    }

    /// Take the explicit graph out of this automaton.
    pub fn into_graph(mut self) -> Graph<P> {
        self.expand_singleton();
        match self.repr {
            Repr::Graph(graph) => Arc::unwrap_or_clone(graph),
            Repr::Singleton(_) => unreachable!("singleton was expanded"),
        }
    }

    /// Replace the explicit graph, leaving singleton form.
    pub(crate) fn set_graph(&mut self, graph: Graph<P>) {
        self.repr = Repr::Graph(Arc::new(graph));
        self.hash.set(None);
    }

    /// Expands singleton representation to an explicit chain of states.
    /// Does nothing if not in singleton form.
    pub fn expand_singleton(&mut self) {
        if let Repr::Singleton(symbols) = &self.repr {
            let graph = singleton_graph(symbols);
            self.repr = Repr::Graph(Arc::new(graph));
            self.deterministic = true;
        }
    }

    /// A copy that shares no storage with `self`.
    pub fn deep_clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Singleton(symbols) => Repr::Singleton(symbols.clone()),
            Repr::Graph(graph) => Repr::Graph(Arc::new(Graph::clone(graph))),
        };
        Self {
            repr,
            deterministic: self.deterministic,
            hash: self.hash.clone(),
        }
    }

    /// Whether `self` and `other` are the same instance or share graph storage.
    pub fn shares_storage(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        match (&self.repr, &other.repr) {
            (Repr::Graph(a), Repr::Graph(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Identity of the storage backing this automaton, used for alias checks.
    pub(crate) fn storage_id(&self) -> usize {
        match &self.repr {
            Repr::Graph(graph) => Arc::as_ptr(graph) as usize,
            Repr::Singleton(_) => self as *const Self as usize,
        }
    }

    /// Returns true if the automaton is definitely deterministic.
    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    /// Sets deterministic flag. Only meant for manually assembled automata.
    pub fn set_deterministic(&mut self, deterministic: bool) {
        self.deterministic = deterministic;
    }

    pub(crate) fn cached_hash(&self) -> Option<u32> {
        self.hash.get()
    }

    /// Recompute the language hash from state and transition counts.
    /// The automaton must be minimal when this is called.
    pub(crate) fn recompute_hash(&self) {
        let states = self.number_of_states() as u32;
        let transitions = self.number_of_transitions() as u32;
        let hash = states
            .wrapping_mul(3)
            .wrapping_add(transitions.wrapping_mul(2));
        self.hash.set(Some(hash.max(1)));
    }

    /// Whether every accept state carries the same payload.
    pub(crate) fn has_uniform_payloads(&self) -> bool {
        let Repr::Graph(graph) = &self.repr else {
            return true;
        };
        let mut payloads = graph.states.iter().filter_map(State::accept);
        match payloads.next() {
            Some(first) => payloads.all(|p| p == first),
            None => true,
        }
    }

    /// Replace every accept payload with `P::default()`.
    pub(crate) fn reset_payloads(&mut self) {
        if self.accepts_default() {
            return;
        }
        for state in &mut self.graph_mut().states {
            if state.is_accept() {
                state.set_accept(Some(P::default()));
            }
        }
    }

    fn accepts_default(&self) -> bool {
        match &self.repr {
            Repr::Singleton(_) => true,
            Repr::Graph(graph) => graph
                .states
                .iter()
                .filter_map(State::accept)
                .all(|p| *p == P::default()),
        }
    }

    pub(crate) fn set_cached_hash(&self, hash: u32) {
        self.hash.set(Some(hash));
    }

    pub(crate) fn clear_hash(&self) {
        self.hash.set(None);
    }

    /// The initial state, expanding a singleton first.
    pub fn initial_state(&mut self) -> StateId {
        self.expand_singleton();
        self.graph().map_or(0, Graph::initial)
    }

    /// Returns true if this automaton accepts no strings.
    pub fn is_empty(&self) -> bool {
        match &self.repr {
            Repr::Singleton(_) => false,
            Repr::Graph(graph) => {
                let initial = graph.state(graph.initial());
                !initial.is_accept() && initial.transitions().is_empty()
            }
        }
    }

    /// Returns true if this automaton accepts the empty string and nothing else.
    pub fn is_empty_string(&self) -> bool {
        match &self.repr {
            Repr::Singleton(symbols) => symbols.is_empty(),
            Repr::Graph(graph) => {
                let initial = graph.state(graph.initial());
                initial.is_accept() && initial.transitions().is_empty()
            }
        }
    }

    /// Returns true if this automaton accepts every string.
    pub fn is_total(&self) -> bool {
        let Repr::Graph(graph) = &self.repr else {
            return false;
        };
        let initial = graph.state(graph.initial());
        initial.is_accept()
            && initial.transitions()
                == [Transition::new(MIN_SYMBOL, MAX_SYMBOL, graph.initial())]
    }

    /// Number of reachable states.
    pub fn number_of_states(&self) -> usize {
        match &self.repr {
            Repr::Singleton(symbols) => symbols.len() + 1,
            Repr::Graph(graph) => graph.reachable().len(),
        }
    }

    /// Number of edges, where one edge may carry a whole interval.
    pub fn number_of_transitions(&self) -> usize {
        match &self.repr {
            Repr::Singleton(symbols) => symbols.len(),
            Repr::Graph(graph) => graph.number_of_transitions(),
        }
    }

    /// Reachable states, in breadth-first order.
    pub fn states(&mut self) -> Vec<StateId> {
        self.expand_singleton();
        self.graph().map(Graph::reachable).unwrap_or_default()
    }

    /// Reachable accept states.
    pub fn accept_states(&mut self) -> Vec<StateId> {
        self.expand_singleton();
        self.graph().map(Graph::accept_states).unwrap_or_default()
    }

    /// States from which an accept state is reachable.
    pub fn live_states(&mut self) -> StateSet {
        self.expand_singleton();
        self.graph().map(Graph::live_states).unwrap_or_default()
    }

    /// The canonical alphabet partition points of this automaton.
    pub fn start_points(&self) -> Vec<Symbol> {
        self.explicit_graph().start_points()
    }

    /// Merge overlapping and adjacent edges with the same target.
    pub fn reduce(&mut self) {
        if self.is_singleton() {
            return;
        }
        self.graph_mut().reduce();
    }

    /// Remove edges to dead states and reduce. Clears the cached hash.
    pub fn remove_dead_transitions(&mut self) {
        self.clear_hash();
        if self.is_singleton() {
            return;
        }
        self.graph_mut().remove_dead_transitions();
    }

    /// Restore the representation invariant after manual edits.
    pub fn restore_invariant(&mut self) {
        self.remove_dead_transitions();
    }

    /// Determinize in place using subset construction.
    pub fn determinize(&mut self) {
        if self.deterministic {
            return;
        }
        let determinized = {
            let graph = self.explicit_graph();
            crate::determinize::determinize(&graph, &[graph.initial()])
        };
        self.set_graph(determinized);
        self.deterministic = true;
    }

    /// Run the automaton on `input` and return the accept payload, if accepted.
    ///
    /// For a nondeterministic automaton the payload of the accepting
    /// end state with the highest id wins.
    pub fn run_symbols(&self, input: &[Symbol]) -> Option<P> {
        let graph = match &self.repr {
            Repr::Singleton(symbols) => {
                return (symbols.as_slice() == input).then(P::default);
            }
            Repr::Graph(graph) => graph,
        };

        if self.deterministic {
            let mut state = graph.initial();
            for &symbol in input {
                state = graph.step(state, symbol)?;
            }
            return graph.state(state).accept().cloned();
        }

        let mut current = StateSet::singleton(graph.initial(), graph.len());
        for &symbol in input {
            current = graph.step_set(&current, symbol);
            if current.is_empty() {
                return None;
            }
        }
        graph.accept_payloads(&current).last().map(|&p| p.clone())
    }

    /// Run the automaton on a string; see [`run_symbols`](Self::run_symbols).
    pub fn run(&self, input: &str) -> Option<P> {
        self.run_symbols(&to_symbols(input))
    }

    /// Returns true if `input` is accepted.
    pub fn accepts(&self, input: &str) -> bool {
        self.run(input).is_some()
    }

    /// Returns true if the symbol sequence `input` is accepted.
    pub fn accepts_symbols(&self, input: &[Symbol]) -> bool {
        self.run_symbols(input).is_some()
    }

    /// Deterministic stepping: the unique successor of `state` on `symbol`.
    ///
    /// Expands a singleton first. Only meaningful when
    /// [`is_deterministic`](Self::is_deterministic) holds. `None` if there is
    /// no such edge or `state` is not a state of this automaton.
    pub fn step(&mut self, state: StateId, symbol: Symbol) -> Option<StateId> {
        self.expand_singleton();
        self.graph()?.states.get(state as usize)?.step(symbol)
    }

    /// Breadth stepping: every state reachable from `current` on `symbol`,
    /// together with the accept payloads found among them. Members of
    /// `current` that are not states of this automaton are ignored.
    pub fn step_set(&mut self, current: &StateSet, symbol: Symbol) -> (StateSet, Vec<P>) {
        self.expand_singleton();
        let Some(graph) = self.graph() else {
            return (StateSet::default(), Vec::new());
        };
        let next = graph.step_set(current, symbol);
        let payloads = graph.accept_payloads(&next).into_iter().cloned().collect();
        (next, payloads)
    }

    /// The accept payload of `state`; `None` if it rejects or does not exist.
    pub fn accept_payload(&mut self, state: StateId) -> Option<&P> {
        self.expand_singleton();
        self.graph()?.states.get(state as usize)?.accept()
    }

    /// Add a transition to a manually assembled automaton.
    pub fn add_transition(
        &mut self,
        from: StateId,
        min: Symbol,
        max: Symbol,
        to: StateId,
    ) -> Result<()> {
        self.graph_mut().add_transition(from, min, max, to)
    }

    /// Graphviz dot representation of this automaton.
    pub fn to_dot(&self) -> String {
        let graph = self.explicit_graph();
        let mut out = String::from("digraph Automaton {\n  rankdir = LR;\n");
        for state in graph.reachable() {
            let node = graph.state(state);
            let shape = if node.is_accept() { "doublecircle" } else { "circle" };
            out.push_str(&format!("  {state} [shape={shape},label=\"\"];\n"));
            if state == graph.initial() {
                out.push_str("  initial [shape=plaintext,label=\"\"];\n");
                out.push_str(&format!("  initial -> {state}\n"));
            }
            for t in node.transitions() {
                out.push_str(&format!("  {state} -> {} [label=\"{}\"]\n", t.to, t.label()));
            }
        }
        out.push_str("}\n");
        out
    }
}

impl<P: Payload> Default for Automaton<P> {
    /// The empty language.
    fn default() -> Self {
        Self::from_graph(Graph::new(), true)
    }
}

impl<P: Payload> fmt::Display for Automaton<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Repr::Singleton(symbols) = &self.repr {
            let mut rendered = String::new();
            for &symbol in symbols {
                write_symbol(symbol, &mut rendered);
            }
            return writeln!(f, "singleton: {rendered}");
        }

        let graph = self.explicit_graph();
        writeln!(f, "initial state: {}", graph.initial())?;
        for state in graph.reachable() {
            let node = graph.state(state);
            let kind = if node.is_accept() { "accept" } else { "reject" };
            writeln!(f, "state {state} [{kind}]:")?;
            for t in node.transitions() {
                writeln!(f, "  {t}")?;
            }
        }
        Ok(())
    }
}

/// Build the explicit chain for a singleton string.
fn singleton_graph<P: Payload>(symbols: &[Symbol]) -> Graph<P> {
    let mut graph = Graph::new();
    let mut current = graph.initial();
    for &symbol in symbols {
        let next = graph.add_state(State::new());
        graph.push_transition(current, Transition::single(symbol, next));
        current = next;
    }
    graph.state_mut(current).set_accept(Some(P::default()));
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_queries() {
        let a: Automaton = Automaton::from_singleton(to_symbols("ab"));
        assert!(a.is_singleton());
        assert!(!a.is_empty());
        assert!(!a.is_empty_string());
        assert_eq!(a.number_of_states(), 3);
        assert_eq!(a.number_of_transitions(), 2);
        assert!(a.accepts("ab"));
        assert!(!a.accepts("a"));
    }

    #[test]
    fn test_expand_singleton_is_idempotent() {
        let mut a: Automaton = Automaton::from_singleton(to_symbols("xyz"));
        a.expand_singleton();
        assert!(!a.is_singleton());
        assert!(a.is_deterministic());
        a.expand_singleton();
        assert_eq!(a.number_of_states(), 4);
        assert!(a.accepts("xyz"));
        assert!(!a.accepts("xy"));
    }

    #[test]
    fn test_default_is_empty_language() {
        let a: Automaton = Automaton::default();
        assert!(a.is_empty());
        assert!(!a.accepts(""));
    }

    #[test]
    fn test_empty_string_forms() {
        let singleton: Automaton = Automaton::from_singleton(Vec::new());
        assert!(singleton.is_empty_string());

        let mut graph = Graph::new();
        graph.state_mut(0).set_accept(Some(()));
        let explicit = Automaton::from_graph(graph, true);
        assert!(explicit.is_empty_string());
        assert!(explicit.accepts(""));
    }

    #[test]
    fn test_nondeterministic_run() {
        let mut graph: Graph<&'static str> = Graph::new();
        let a = graph.add_state(State::new());
        let b = graph.add_state(State::accepting("second"));
        graph.add_transition(0, 0x61, 0x61, a).unwrap();
        graph.add_transition(0, 0x61, 0x61, b).unwrap();
        let end = graph.add_state(State::accepting("first"));
        graph.add_transition(a, 0x62, 0x62, end).unwrap();

        let automaton = Automaton::from_graph(graph, false);
        assert_eq!(automaton.run("a"), Some("second"));
        assert_eq!(automaton.run("ab"), Some("first"));
        assert_eq!(automaton.run("b"), None);
    }

    #[test]
    fn test_graph_mut_copies_shared_storage() {
        let mut original: Automaton = Automaton::from_singleton(to_symbols("a"));
        original.expand_singleton();
        let mut copy = original.clone();
        assert!(copy.shares_storage(&original));

        let extra = copy.graph_mut().add_state(State::accepting(()));
        copy.add_transition(0, 0x62, 0x62, extra).unwrap();
        assert!(!copy.shares_storage(&original));
        assert!(copy.accepts("b"));
        assert!(!original.accepts("b"));
        assert_eq!(original.states().len(), 2);
    }

    #[test]
    fn test_is_total() {
        let mut graph: Graph<()> = Graph::new();
        graph.state_mut(0).set_accept(Some(()));
        graph.add_transition(0, MIN_SYMBOL, MAX_SYMBOL, 0).unwrap();
        let a = Automaton::from_graph(graph, true);
        assert!(a.is_total());
        assert!(a.accepts("anything at all"));
    }

    #[test]
    fn test_display_and_dot() {
        let a: Automaton = Automaton::from_singleton(to_symbols("a b"));
        assert_eq!(a.to_string(), "singleton: a\\u0020b\n");

        let mut b = a.clone();
        b.expand_singleton();
        let listing = b.to_string();
        assert!(listing.starts_with("initial state: 0\nstate 0 [reject]:\n  a -> 1\n"));
        assert!(listing.ends_with("state 3 [accept]:\n"));

        let dot = b.to_dot();
        assert!(dot.starts_with("digraph Automaton {"));
        assert!(dot.contains("3 [shape=doublecircle"));
        assert!(dot.contains("initial -> 0"));
    }

    #[test]
    fn test_stepping_primitives() {
        let mut a: Automaton<u8> = Automaton::from_singleton(to_symbols("ab"));
        let initial = a.initial_state();
        let next = a.step(initial, 0x61).unwrap();
        assert_eq!(a.step(next, 0x61), None);
        let last = a.step(next, 0x62).unwrap();
        assert_eq!(a.accept_payload(last), Some(&0));

        let current = StateSet::singleton(next, 3);
        let (states, payloads) = a.step_set(&current, 0x62);
        assert_eq!(states.iter().collect::<Vec<_>>(), vec![last]);
        assert_eq!(payloads, vec![0]);
    }

    #[test]
    fn test_stepping_unknown_states() {
        let mut a: Automaton = Automaton::from_singleton(to_symbols("ab"));
        assert_eq!(a.step(17, 0x61), None);
        assert_eq!(a.accept_payload(17), None);

        let current: StateSet = [0, 17].into_iter().collect();
        let (states, payloads) = a.step_set(&current, 0x61);
        assert_eq!(states.len(), 1);
        assert!(payloads.is_empty());
    }
}
