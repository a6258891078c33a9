//! Minimal acyclic automata from sorted string lists.
//!
//! [`StringUnionBuilder`] takes strings in non-decreasing order of their
//! UTF-16 code units and maintains a trie whose finished parts are
//! hash-consed into a registry, so the completed automaton is minimal
//! without a separate minimization pass.

use crate::automaton::Automaton;
use crate::error::{AutomatonError, Result};
use crate::graph::Graph;
use crate::state::{Payload, State, StateId};
use crate::symbol::{Symbol, from_symbols, to_symbols};
use crate::transition::Transition;
use std::collections::{HashMap, VecDeque};

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
struct Node<P> {
    /// Edge labels, strictly increasing.
    labels: Vec<Symbol>,
    children: Vec<NodeId>,
    payload: Option<P>,
}

impl<P> Node<P> {
    fn new() -> Self {
        Self {
            labels: Vec::new(),
            children: Vec::new(),
            payload: None,
        }
    }
}

/// Structural identity of a finished node: acceptance, labels and the
/// identities of its (already registered) children.
type RegistryKey<P> = (Option<P>, Vec<Symbol>, Vec<NodeId>);

/// Incremental builder of a minimal deterministic acyclic automaton.
#[derive(Debug, Clone)]
pub struct StringUnionBuilder<P> {
    nodes: Vec<Node<P>>,
    registry: HashMap<RegistryKey<P>, NodeId>,
    previous: Option<Vec<Symbol>>,
    finished: bool,
}

impl<P: Payload> StringUnionBuilder<P> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            registry: HashMap::new(),
            previous: None,
            finished: false,
        }
    }

    /// Add `s` with its accept payload.
    ///
    /// Strings must arrive in non-decreasing order; adding the same string
    /// again replaces its payload.
    pub fn add(&mut self, s: &str, payload: P) -> Result<()> {
        self.add_symbols(&to_symbols(s), payload)
    }

    /// Add a symbol sequence with its accept payload; see [`add`](Self::add).
    pub fn add_symbols(&mut self, current: &[Symbol], payload: P) -> Result<()> {
        if self.finished {
            return Err(AutomatonError::BuilderFinished);
        }
        if let Some(previous) = &self.previous {
            if previous.as_slice() > current {
                return Err(AutomatonError::UnsortedInput {
                    previous: from_symbols(previous),
                    current: from_symbols(current),
                });
            }
        }
        self.previous = Some(current.to_vec());
        self.insert(current, payload);
        Ok(())
    }

    /// Add every string of `strings`, in order, with the same payload.
    pub fn add_all<'a, I>(&mut self, strings: I, payload: P) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for s in strings {
            self.add(s, payload.clone())?;
        }
        Ok(())
    }

    /// Finish the automaton. The builder accepts nothing afterwards.
    pub fn complete(&mut self) -> Result<Automaton<P>> {
        if self.finished {
            return Err(AutomatonError::BuilderFinished);
        }
        self.finished = true;
        Ok(Automaton::from_graph(self.register_all(), true))
    }

    fn insert(&mut self, current: &[Symbol], payload: P) {
        // descend along the longest prefix already present
        let mut node = ROOT;
        let mut pos = 0;
        while let Some(next) = current.get(pos).and_then(|&s| self.last_child(node, s)) {
            node = next;
            pos += 1;
        }

        if !self.nodes[node].children.is_empty() {
            self.replace_or_register(node);
        }
        self.add_suffix(node, &current[pos..], payload);
    }

    /// Register the remaining spine and convert the trie into a graph.
    fn register_all(&mut self) -> Graph<P> {
        if !self.nodes[ROOT].children.is_empty() {
            self.replace_or_register(ROOT);
        }
        log::debug!(
            "string union: {} trie nodes, {} registered",
            self.nodes.len(),
            self.registry.len()
        );
        self.registry.clear();
        self.to_graph()
    }

    fn last_child(&self, node: NodeId, label: Symbol) -> Option<NodeId> {
        let node = &self.nodes[node];
        match node.labels.last() {
            Some(&last) if last == label => node.children.last().copied(),
            _ => None,
        }
    }

    /// Replace the last child of `node` with its registered twin, or register it.
    fn replace_or_register(&mut self, node: NodeId) {
        let Some(&child) = self.nodes[node].children.last() else {
            return;
        };
        if !self.nodes[child].children.is_empty() {
            self.replace_or_register(child);
        }

        let key = {
            let c = &self.nodes[child];
            (c.payload.clone(), c.labels.clone(), c.children.clone())
        };
        match self.registry.get(&key) {
            Some(&registered) => {
                if let Some(last) = self.nodes[node].children.last_mut() {
                    *last = registered;
                }
            }
            None => {
                self.registry.insert(key, child);
            }
        }
    }

    fn add_suffix(&mut self, mut node: NodeId, suffix: &[Symbol], payload: P) {
        for &symbol in suffix {
            let next = self.nodes.len();
            self.nodes.push(Node::new());
            let parent = &mut self.nodes[node];
            parent.labels.push(symbol);
            parent.children.push(next);
            node = next;
        }
        self.nodes[node].payload = Some(payload);
    }

    /// Convert the registered trie into a graph, numbering nodes breadth-first.
    fn to_graph(&self) -> Graph<P> {
        let mut ids: HashMap<NodeId, StateId> = HashMap::new();
        let mut graph = Graph::new();
        graph.state_mut(0).set_accept(self.nodes[ROOT].payload.clone());
        ids.insert(ROOT, 0);

        let mut queue = VecDeque::from([ROOT]);
        while let Some(node) = queue.pop_front() {
            let from = ids[&node];
            let n = &self.nodes[node];
            for (&label, &child) in n.labels.iter().zip(&n.children) {
                let to = match ids.get(&child) {
                    Some(&id) => id,
                    None => {
                        let mut state = State::new();
                        state.set_accept(self.nodes[child].payload.clone());
                        let id = graph.add_state(state);
                        ids.insert(child, id);
                        queue.push_back(child);
                        id
                    }
                };
                graph.push_transition(from, Transition::single(label, to));
            }
        }
        graph.reduce();
        graph
    }
}

impl<P: Payload> Default for StringUnionBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> Automaton<P> {
    /// The minimal deterministic automaton accepting exactly `strings`.
    ///
    /// The input need not be sorted; duplicates are ignored.
    pub fn string_union(strings: &[&str]) -> Self {
        let mut sorted: Vec<Vec<Symbol>> = strings.iter().map(|s| to_symbols(s)).collect();
        sorted.sort_unstable();
        sorted.dedup();

        let mut builder = StringUnionBuilder::new();
        for symbols in &sorted {
            builder.insert(symbols, P::default());
        }
        Self::from_graph(builder.register_all(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_suffixes() {
        let mut builder = StringUnionBuilder::new();
        for s in ["ab", "abc", "b"] {
            builder.add(s, ()).unwrap();
        }
        let a = builder.complete().unwrap();
        assert!(a.is_deterministic());
        // the end of "abc" and the end of "b" are one state
        assert_eq!(a.number_of_states(), 4);
        for s in ["ab", "abc", "b"] {
            assert!(a.accepts(s));
        }
        for s in ["", "a", "bc", "abcd", "c"] {
            assert!(!a.accepts(s));
        }
    }

    #[test]
    fn test_add_all() {
        let mut builder = StringUnionBuilder::new();
        builder.add_all(["ab", "abc"], 1).unwrap();
        builder.add_all(["b", "bc"], 2).unwrap();
        let a = builder.complete().unwrap();
        assert_eq!(a.run("abc"), Some(1));
        assert_eq!(a.run("bc"), Some(2));
        assert_eq!(a.run("c"), None);

        let mut unsorted = StringUnionBuilder::new();
        assert!(matches!(
            unsorted.add_all(["b", "a"], ()),
            Err(AutomatonError::UnsortedInput { .. })
        ));
    }

    #[test]
    fn test_distinct_payloads_are_kept_apart() {
        let mut builder = StringUnionBuilder::new();
        builder.add("ab", 1).unwrap();
        builder.add("abc", 2).unwrap();
        builder.add("b", 3).unwrap();
        let a = builder.complete().unwrap();
        assert_eq!(a.number_of_states(), 5);
        assert_eq!(a.run("ab"), Some(1));
        assert_eq!(a.run("abc"), Some(2));
        assert_eq!(a.run("b"), Some(3));
        assert_eq!(a.run("a"), None);
    }

    #[test]
    fn test_equal_subtrees_are_registered_once() {
        let mut builder = StringUnionBuilder::new();
        for s in ["aax", "aay", "bax", "bay"] {
            builder.add(s, ()).unwrap();
        }
        let a = builder.complete().unwrap();
        // root, {a,b} -> shared, a -> shared, [x-y] -> end
        assert_eq!(a.number_of_states(), 4);
    }

    #[test]
    fn test_empty_string_and_duplicates() {
        let mut builder = StringUnionBuilder::new();
        builder.add("", 'r').unwrap();
        builder.add("x", 'a').unwrap();
        builder.add("x", 'b').unwrap();
        let a = builder.complete().unwrap();
        assert_eq!(a.run(""), Some('r'));
        assert_eq!(a.run("x"), Some('b'));
    }

    #[test]
    fn test_unsorted_input_is_rejected() {
        let mut builder = StringUnionBuilder::new();
        builder.add("b", ()).unwrap();
        assert_eq!(
            builder.add("a", ()),
            Err(AutomatonError::UnsortedInput {
                previous: "b".into(),
                current: "a".into(),
            })
        );
    }

    #[test]
    fn test_builder_finished() {
        let mut builder: StringUnionBuilder<()> = StringUnionBuilder::new();
        builder.add("a", ()).unwrap();
        assert!(builder.complete().is_ok());
        assert_eq!(builder.add("b", ()), Err(AutomatonError::BuilderFinished));
        assert_eq!(builder.complete().err(), Some(AutomatonError::BuilderFinished));
    }

    #[test]
    fn test_string_union_sorts_input() {
        let a: Automaton = Automaton::string_union(&["zeta", "alpha", "beta", "alpha"]);
        assert!(a.accepts("alpha"));
        assert!(a.accepts("zeta"));
        assert!(!a.accepts("gamma"));

        let none: Automaton = Automaton::string_union(&[]);
        assert!(none.is_empty());
    }
}
