//! Language operations.
//!
//! Every operation borrows its operands and returns a new automaton; operands
//! are never observably modified. Whether working copies share storage with
//! the operands until first write is decided by
//! [`Config::allow_mutation`](crate::Config::allow_mutation). Operands that
//! share storage with each other are always copied independently.
//!
//! Concatenation, union and the repeat family splice epsilon edges by copying
//! edges (see [`Graph::add_epsilon`]) and therefore clear the deterministic
//! flag. Complement, intersection and difference keep automata free of dead
//! transitions.

use crate::automaton::Automaton;
use crate::config::Engine;
use crate::error::{AutomatonError, Result};
use crate::graph::Graph;
use crate::minimize::{Minimization, minimize as minimize_graph};
use crate::state::{Payload, State, StateId};
use crate::symbol::Symbol;
use crate::transition::Transition;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet, VecDeque};

impl Engine {
    /// The concatenation of the languages of `a` and `b`.
    pub fn concatenate<P: Payload>(&self, a: &Automaton<P>, b: &Automaton<P>) -> Automaton<P> {
        self.concatenate_owned(a.clone(), b)
    }

    /// [`concatenate`](Self::concatenate) consuming its left operand.
    pub fn concatenate_owned<P: Payload>(&self, a: Automaton<P>, b: &Automaton<P>) -> Automaton<P> {
        if let (Some(x), Some(y)) = (a.singleton(), b.singleton()) {
            log::trace!("concatenate: both operands are singletons");
            return self.finish(Automaton::from_singleton([x, y].concat()));
        }
        if a.is_empty() || b.is_empty() {
            return self.finish(Automaton::empty());
        }

        let deterministic = a.is_singleton() && b.is_deterministic();
        let mut left = self.take_input(a);
        let right = b.explicit_graph();
        let graph = left.graph_mut();
        let accepts = graph.accept_states();
        let start = graph.absorb(&right);
        for state in accepts {
            graph.state_mut(state).set_accept(None);
            graph.add_epsilon(state, start);
        }
        graph.reduce();
        left.set_deterministic(deterministic);
        self.finish(left)
    }

    /// The concatenation of the languages of all `automata`, in order.
    ///
    /// An empty list yields the empty-string language.
    pub fn concatenate_all<P: Payload>(&self, automata: &[&Automaton<P>]) -> Automaton<P> {
        let Some((first, rest)) = automata.split_first() else {
            return self.finish(Automaton::empty_string());
        };
        if automata.iter().all(|a| a.is_singleton()) {
            log::trace!("concatenate_all: {} singletons", automata.len());
            let symbols = automata
                .iter()
                .filter_map(|a| a.singleton())
                .flatten()
                .copied()
                .collect();
            return self.finish(Automaton::from_singleton(symbols));
        }
        if automata.iter().any(|a| a.is_empty()) {
            return self.finish(Automaton::empty());
        }

        let ids: HashSet<usize> = automata.iter().map(|a| a.storage_id()).collect();
        let has_aliases = ids.len() != automata.len();
        let first = if has_aliases {
            first.deep_clone()
        } else {
            self.working_copy(first)
        };

        let mut graph = first.into_graph();
        let mut accepts = graph.accept_states();
        for a in rest {
            if a.is_empty_string() {
                continue;
            }
            let next = a.explicit_graph();
            let offset = graph.len() as StateId;
            let start = graph.absorb(&next);
            let mut next_accepts: Vec<StateId> = next
                .accept_states()
                .into_iter()
                .map(|s| s + offset)
                .collect();
            for state in accepts {
                graph.state_mut(state).set_accept(None);
                graph.add_epsilon(state, start);
                if graph.state(state).is_accept() {
                    next_accepts.push(state);
                }
            }
            accepts = next_accepts;
        }
        graph.reduce();
        self.finish(Automaton::from_graph(graph, false))
    }

    /// The union of the languages of `a` and `b`.
    pub fn union<P: Payload>(&self, a: &Automaton<P>, b: &Automaton<P>) -> Automaton<P> {
        self.union_owned(a.clone(), b)
    }

    /// [`union`](Self::union) consuming its left operand.
    pub fn union_owned<P: Payload>(&self, a: Automaton<P>, b: &Automaton<P>) -> Automaton<P> {
        let same_singleton = matches!((a.singleton(), b.singleton()), (Some(x), Some(y)) if x == y);
        if same_singleton || a.shares_storage(b) {
            log::trace!("union: operands denote the same language");
            return self.finish(self.take_input(a));
        }
        if b.is_empty() {
            return self.finish(self.take_input(a));
        }
        if a.is_empty() {
            return self.finish(self.working_copy(b));
        }

        let mut left = self.take_input(a);
        let right = b.explicit_graph();
        let graph = left.graph_mut();
        let start = graph.add_state(State::new());
        graph.add_epsilon(start, graph.initial());
        let other = graph.absorb(&right);
        graph.add_epsilon(start, other);
        graph.initial = start;
        graph.reduce();
        left.set_deterministic(false);
        self.finish(left)
    }

    /// The union of the languages of all `automata`.
    ///
    /// An empty list yields the empty language.
    pub fn union_all<P: Payload>(&self, automata: &[&Automaton<P>]) -> Automaton<P> {
        let mut graph = Graph::new();
        for a in automata {
            if a.is_empty() {
                continue;
            }
            let start = graph.absorb(&a.explicit_graph());
            graph.add_epsilon(graph.initial(), start);
        }
        graph.reduce();
        self.finish(Automaton::from_graph(graph, false))
    }

    /// The language of `a` plus the empty string.
    pub fn optional<P: Payload>(&self, a: &Automaton<P>) -> Automaton<P> {
        self.optional_owned(a.clone())
    }

    /// [`optional`](Self::optional) consuming its operand.
    pub fn optional_owned<P: Payload>(&self, a: Automaton<P>) -> Automaton<P> {
        let mut a = self.take_input(a);
        let graph = a.graph_mut();
        let start = graph.add_state(State::new());
        graph.add_epsilon(start, graph.initial());
        if !graph.state(start).is_accept() {
            graph.state_mut(start).set_accept(Some(P::default()));
        }
        graph.initial = start;
        graph.reduce();
        a.set_deterministic(false);
        self.finish(a)
    }

    /// Kleene star: zero or more concatenated repetitions of `a`.
    pub fn repeat<P: Payload>(&self, a: &Automaton<P>) -> Automaton<P> {
        self.repeat_owned(a.clone())
    }

    /// [`repeat`](Self::repeat) consuming its operand.
    pub fn repeat_owned<P: Payload>(&self, a: Automaton<P>) -> Automaton<P> {
        let mut a = self.take_input(a);
        let graph = a.graph_mut();
        let accepts = graph.accept_states();
        let start = graph.add_state(State::accepting(P::default()));
        graph.add_epsilon(start, graph.initial());
        for state in accepts {
            graph.add_epsilon(state, start);
        }
        graph.initial = start;
        graph.reduce();
        a.set_deterministic(false);
        self.finish(a)
    }

    /// `min` or more concatenated repetitions of `a`.
    pub fn repeat_min<P: Payload>(&self, a: &Automaton<P>, min: usize) -> Automaton<P> {
        if min == 0 {
            return self.repeat(a);
        }
        let star = self.repeat(a);
        let mut parts: Vec<&Automaton<P>> = vec![a; min];
        parts.push(&star);
        self.concatenate_all(&parts)
    }

    /// Between `min` and `max` (inclusive) concatenated repetitions of `a`.
    ///
    /// `min > max` yields the empty language.
    pub fn repeat_range<P: Payload>(&self, a: &Automaton<P>, min: usize, max: usize) -> Automaton<P> {
        if min > max {
            return self.finish(Automaton::empty());
        }
        let optional_count = max - min;
        let head = match min {
            0 => Automaton::empty_string(),
            1 => self.working_copy(a),
            _ => self.concatenate_all(&vec![a; min]),
        };
        if optional_count == 0 {
            return self.finish(head);
        }

        // optional tail: (a(a(a)?)?)? with optional_count levels
        let operand = a.explicit_graph();
        let mut tail = operand.clone().into_owned();
        for _ in 1..optional_count {
            let mut level = operand.clone().into_owned();
            let accepts = level.accept_states();
            let start = level.absorb(&tail);
            for state in accepts {
                level.add_epsilon(state, start);
            }
            tail = level;
        }

        let mut graph = head.into_graph();
        let accepts = graph.accept_states();
        let start = graph.absorb(&tail);
        for state in accepts {
            graph.add_epsilon(state, start);
        }
        graph.reduce();
        self.finish(Automaton::from_graph(graph, false))
    }

    /// The complement of the language of `a`. The result is deterministic.
    pub fn complement<P: Payload>(&self, a: &Automaton<P>) -> Automaton<P> {
        self.complement_owned(a.clone())
    }

    /// [`complement`](Self::complement) consuming its operand.
    pub fn complement_owned<P: Payload>(&self, a: Automaton<P>) -> Automaton<P> {
        let mut a = self.take_input(a);
        a.determinize();
        let graph = a.graph_mut();
        graph.totalize();
        for state in &mut graph.states {
            let flipped = match state.accept() {
                Some(_) => None,
                None => Some(P::default()),
            };
            state.set_accept(flipped);
        }
        graph.remove_dead_transitions();
        a.set_deterministic(true);
        self.finish(a)
    }

    /// The intersection of the languages of `a` and `b`.
    ///
    /// A product state carries the payload of its left component.
    pub fn intersection<P: Payload>(&self, a: &Automaton<P>, b: &Automaton<P>) -> Automaton<P> {
        if let Some(symbols) = a.singleton() {
            log::trace!("intersection: left operand is a singleton");
            let result = match b.run_symbols(symbols) {
                Some(_) => self.working_copy(a),
                None => Automaton::empty(),
            };
            return self.finish(result);
        }
        if let Some(symbols) = b.singleton() {
            log::trace!("intersection: right operand is a singleton");
            let result = match a.run_symbols(symbols) {
                Some(payload) => singleton_with_payload(symbols, payload),
                None => Automaton::empty(),
            };
            return self.finish(result);
        }
        if a.shares_storage(b) {
            return self.finish(self.working_copy(a));
        }

        let left = a.explicit_graph();
        let right = b.explicit_graph();
        let left_edges = left.sorted_transition_table();
        let right_edges = right.sorted_transition_table();

        let mut product = Graph::new();
        let mut pairs: IndexMap<(StateId, StateId), StateId> = IndexMap::new();
        pairs.insert((left.initial(), right.initial()), 0);

        let mut next = 0;
        while let Some((&(s1, s2), _)) = pairs.get_index(next) {
            let current = next as StateId;
            next += 1;

            if right.state(s2).is_accept() {
                product
                    .state_mut(current)
                    .set_accept(left.state(s1).accept().cloned());
            }

            let e1 = &left_edges[s1 as usize];
            let e2 = &right_edges[s2 as usize];
            let mut b2 = 0;
            for x in e1 {
                while b2 < e2.len() && e2[b2].max < x.min {
                    b2 += 1;
                }
                for y in e2[b2..].iter().take_while(|y| x.max >= y.min) {
                    if y.max < x.min {
                        continue;
                    }
                    let to = match pairs.get(&(x.to, y.to)) {
                        Some(&existing) => existing,
                        None => {
                            let id = product.add_state(State::new());
                            pairs.insert((x.to, y.to), id);
                            id
                        }
                    };
                    let edge = Transition::new(x.min.max(y.min), x.max.min(y.max), to);
                    product.push_transition(current, edge);
                }
            }
        }

        log::debug!("intersection product has {} states", product.len());
        product.remove_dead_transitions();
        let deterministic = a.is_deterministic() && b.is_deterministic();
        self.finish(Automaton::from_graph(product, deterministic))
    }

    /// The strings of `a` that `b` rejects.
    pub fn minus<P: Payload>(&self, a: &Automaton<P>, b: &Automaton<P>) -> Automaton<P> {
        if a.is_empty() || a.shares_storage(b) {
            return self.finish(Automaton::empty());
        }
        if b.is_empty() {
            return self.finish(self.working_copy(a));
        }
        if let Some(symbols) = a.singleton() {
            let result = if b.accepts_symbols(symbols) {
                Automaton::empty()
            } else {
                self.working_copy(a)
            };
            return self.finish(result);
        }
        self.intersection(a, &self.complement(b))
    }

    /// Whether every string `a` accepts is accepted by `b`.
    pub fn subset_of<P: Payload>(&self, a: &Automaton<P>, b: &Automaton<P>) -> bool {
        if a.shares_storage(b) {
            return true;
        }
        if let Some(symbols) = a.singleton() {
            return match b.singleton() {
                Some(other) => symbols == other,
                None => b.accepts_symbols(symbols),
            };
        }

        let mut right = self.working_copy(b);
        right.determinize();
        let left = a.explicit_graph();
        let right = right.explicit_graph();
        let left_edges = left.sorted_transition_table();
        let right_edges = right.sorted_transition_table();

        let mut visited = HashSet::new();
        let mut worklist = VecDeque::new();
        visited.insert((left.initial(), right.initial()));
        worklist.push_back((left.initial(), right.initial()));

        while let Some((s1, s2)) = worklist.pop_front() {
            if left.state(s1).is_accept() && !right.state(s2).is_accept() {
                return false;
            }
            let e1 = &left_edges[s1 as usize];
            let e2 = &right_edges[s2 as usize];
            let mut b2 = 0;
            for x in e1 {
                while b2 < e2.len() && e2[b2].max < x.min {
                    b2 += 1;
                }
                // [uncovered, x.max] is the part of x not yet matched on the right
                let mut uncovered = u32::from(x.min);
                for y in e2[b2..].iter().take_while(|y| x.max >= y.min) {
                    if u32::from(y.min) > uncovered {
                        return false;
                    }
                    uncovered = u32::from(y.max) + 1;
                    if visited.insert((x.to, y.to)) {
                        worklist.push_back((x.to, y.to));
                    }
                }
                if uncovered <= u32::from(x.max) {
                    return false;
                }
            }
        }
        true
    }

    /// Whether `a` and `b` accept the same language.
    pub fn equivalent<P: Payload>(&self, a: &Automaton<P>, b: &Automaton<P>) -> bool {
        if let (Some(x), Some(y)) = (a.singleton(), b.singleton()) {
            return x == y;
        }
        self.language_hash(a) == self.language_hash(b)
            && self.subset_of(a, b)
            && self.subset_of(b, a)
    }

    /// A hash derived from the minimal automaton of the accepted language:
    /// three times its state count plus twice its edge count, never zero.
    ///
    /// Payloads are ignored, so equivalent automata hash alike under every
    /// minimization strategy. Cached on `a` until `a` is next modified.
    pub fn language_hash<P: Payload>(&self, a: &Automaton<P>) -> u32 {
        if let Some(hash) = a.cached_hash() {
            return hash;
        }
        let mut plain = a.deep_clone();
        plain.reset_payloads();
        self.minimize(&mut plain);
        let hash = plain.cached_hash().unwrap_or(1);
        a.set_cached_hash(hash);
        hash
    }

    /// The least string, ordered by length and then by symbols, that `a`
    /// accepts (`accepted`) or rejects (`!accepted`). `None` if there is none.
    pub fn shortest_example<P: Payload>(
        &self,
        a: &Automaton<P>,
        accepted: bool,
    ) -> Option<Vec<Symbol>> {
        if let Some(symbols) = a.singleton() {
            return Some(match (accepted, symbols.is_empty()) {
                (true, _) => symbols.to_vec(),
                (false, false) => Vec::new(),
                (false, true) => vec![0],
            });
        }

        if accepted {
            return least_string(&a.explicit_graph(), true);
        }
        let mut total = a.deep_clone();
        total.determinize();
        let mut graph = total.into_graph();
        graph.totalize();
        least_string(&graph, false)
    }

    /// Add the epsilon edges `pairs` (source, target) to `a`.
    ///
    /// The pairs are closed transitively first, then spliced in. State ids
    /// refer to `a`'s explicit graph; `a` is renumbered afterwards.
    pub fn add_epsilons<P: Payload>(
        &self,
        a: &mut Automaton<P>,
        pairs: &[(StateId, StateId)],
    ) -> Result<()> {
        a.expand_singleton();
        let size = a.explicit_graph().len() as StateId;
        if let Some(&(from, to)) = pairs.iter().find(|(f, t)| *f >= size || *t >= size) {
            return Err(AutomatonError::UnknownState(if from >= size { from } else { to }));
        }

        let mut closure: IndexSet<(StateId, StateId)> = pairs.iter().copied().collect();
        let mut forward: HashMap<StateId, HashSet<StateId>> = HashMap::new();
        let mut back: HashMap<StateId, HashSet<StateId>> = HashMap::new();
        for &(from, to) in &closure {
            forward.entry(from).or_default().insert(to);
            back.entry(to).or_default().insert(from);
        }

        let mut worklist: VecDeque<(StateId, StateId)> = closure.iter().copied().collect();
        let mut workset: HashSet<(StateId, StateId)> = closure.iter().copied().collect();
        while let Some((from, via)) = worklist.pop_front() {
            workset.remove(&(from, via));
            let targets: Vec<StateId> = forward
                .get(&via)
                .map(|t| t.iter().copied().collect())
                .unwrap_or_default();
            let sources: Vec<StateId> = back
                .get(&from)
                .map(|s| s.iter().copied().collect())
                .unwrap_or_default();
            for to in targets {
                if !closure.insert((from, to)) {
                    continue;
                }
                forward.entry(from).or_default().insert(to);
                back.entry(to).or_default().insert(from);
                worklist.push_back((from, to));
                workset.insert((from, to));
                for &source in &sources {
                    if workset.insert((source, from)) {
                        worklist.push_back((source, from));
                    }
                }
            }
        }

        log::trace!("add_epsilons: {} pairs after closure", closure.len());
        let graph = a.graph_mut();
        for &(from, to) in &closure {
            graph.add_epsilon(from, to);
        }
        graph.reduce();
        a.set_deterministic(false);
        if self.config().minimize_always {
            self.minimize(a);
        }
        Ok(())
    }

    /// Minimize `a` in place with the configured strategy.
    ///
    /// The language hash is refreshed when all accept payloads are equal.
    /// Otherwise states with different payloads stay apart and the hash is
    /// left to [`language_hash`](Self::language_hash).
    pub fn minimize<P: Payload>(&self, a: &mut Automaton<P>) {
        if a.is_singleton() {
            a.recompute_hash();
            return;
        }
        let strategy = self.config().minimization;
        if strategy != Minimization::Brzozowski {
            a.determinize();
        }
        let minimized = minimize_graph(&a.explicit_graph(), strategy);
        a.set_graph(minimized);
        a.set_deterministic(true);
        if a.has_uniform_payloads() {
            a.recompute_hash();
        }
    }

    /// A minimized copy of `a`.
    pub fn minimized<P: Payload>(&self, a: &Automaton<P>) -> Automaton<P> {
        let mut copy = a.deep_clone();
        self.minimize(&mut copy);
        copy
    }
}

/// `symbols` as an automaton whose accept state carries `payload`.
fn singleton_with_payload<P: Payload>(symbols: &[Symbol], payload: P) -> Automaton<P> {
    if payload == P::default() {
        return Automaton::symbols(symbols);
    }
    let mut graph = Automaton::<P>::symbols(symbols).into_graph();
    for state in graph.accept_states() {
        graph.state_mut(state).set_accept(Some(payload.clone()));
    }
    Automaton::from_graph(graph, true)
}

/// Least string leading from the initial state to a state whose acceptance
/// equals `accepting`. Level-synchronous breadth-first search keeping, per
/// state, the least path of the current length.
fn least_string<P: Payload>(graph: &Graph<P>, accepting: bool) -> Option<Vec<Symbol>> {
    let mut visited = HashSet::new();
    let mut frontier: IndexMap<StateId, Vec<Symbol>> = IndexMap::new();
    visited.insert(graph.initial());
    frontier.insert(graph.initial(), Vec::new());

    while !frontier.is_empty() {
        let found = frontier
            .iter()
            .filter(|(state, _)| graph.state(**state).is_accept() == accepting)
            .map(|(_, path)| path)
            .min();
        if let Some(path) = found {
            return Some(path.clone());
        }

        let mut next: IndexMap<StateId, Vec<Symbol>> = IndexMap::new();
        for (&state, path) in &frontier {
            for t in graph.state(state).transitions() {
                if visited.contains(&t.to) {
                    continue;
                }
                let mut candidate = path.clone();
                candidate.push(t.min);
                match next.get_mut(&t.to) {
                    Some(existing) if *existing <= candidate => {}
                    Some(existing) => *existing = candidate,
                    None => {
                        next.insert(t.to, candidate);
                    }
                }
            }
        }
        visited.extend(next.keys().copied());
        frontier = next;
    }
    None
}
