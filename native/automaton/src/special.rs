//! Less common operations: reversal, finiteness, string enumeration and
//! symbol rewriting.

use crate::automaton::Automaton;
use crate::config::Engine;
use crate::graph::Graph;
use crate::state::{Payload, State, StateId, StateSet};
use crate::determinize::determinize;
use crate::symbol::{MAX_SYMBOL, Symbol};
use crate::transition::Transition;
use std::collections::{BTreeMap, BTreeSet};

/// Reverse every edge of `graph`.
///
/// The initial state of `graph` becomes the only accept state (with payload
/// `P::default()`); the accept states of `graph` become the initial state set,
/// returned alongside. Determinize from that set to get a usable automaton.
pub fn reverse<P: Payload>(graph: &Graph<P>) -> (Graph<P>, Vec<StateId>) {
    let initials = graph.accept_states();
    let mut reversed = Graph {
        states: vec![State::new(); graph.len()],
        initial: initials.first().copied().unwrap_or(graph.initial()),
    };
    for state in graph.reachable() {
        for t in graph.state(state).transitions() {
            reversed.push_transition(t.to, Transition::new(t.min, t.max, state));
        }
    }
    reversed
        .state_mut(graph.initial())
        .set_accept(Some(P::default()));
    (reversed, initials)
}

/// Whether `a` accepts finitely many strings.
pub fn is_finite<P: Payload>(a: &Automaton<P>) -> bool {
    if a.is_singleton() {
        return true;
    }
    let graph = a.explicit_graph();
    let live = graph.live_states();

    // iterative depth-first search; a back edge between live states is a loop
    let mut on_path = StateSet::with_capacity(graph.len());
    let mut done = StateSet::with_capacity(graph.len());
    let mut stack: Vec<(StateId, usize)> = vec![(graph.initial(), 0)];
    on_path.insert(graph.initial());

    while let Some((state, edge)) = stack.pop() {
        let transitions = graph.state(state).transitions();
        let Some(t) = transitions.get(edge) else {
            on_path.remove(state);
            done.insert(state);
            continue;
        };
        stack.push((state, edge + 1));
        if !live.contains(t.to) || done.contains(t.to) {
            continue;
        }
        if on_path.contains(t.to) {
            return false;
        }
        on_path.insert(t.to);
        stack.push((t.to, 0));
    }
    true
}

/// Every string `a` accepts, in lexicographic order.
///
/// `None` if the language is infinite or, with `limit = Some(n)`, has more
/// than `n` strings.
pub fn finite_strings<P: Payload>(
    a: &Automaton<P>,
    limit: Option<usize>,
) -> Option<Vec<Vec<Symbol>>> {
    if let Some(symbols) = a.singleton() {
        return match limit {
            Some(0) => None,
            _ => Some(vec![symbols.to_vec()]),
        };
    }
    if !is_finite(a) {
        return None;
    }

    let mut graph = a.explicit_graph().into_owned();
    graph.remove_dead_transitions();
    let mut strings = BTreeSet::new();
    if graph.state(graph.initial()).is_accept() {
        strings.insert(Vec::new());
    }
    let mut prefix = Vec::new();
    let limit = limit.unwrap_or(usize::MAX);
    if strings.len() > limit || !enumerate(&graph, graph.initial(), &mut prefix, &mut strings, limit) {
        return None;
    }
    Some(strings.into_iter().collect())
}

/// Depth-first enumeration over an acyclic graph. Returns false as soon as
/// more than `limit` strings are found.
fn enumerate<P: Payload>(
    graph: &Graph<P>,
    state: StateId,
    prefix: &mut Vec<Symbol>,
    strings: &mut BTreeSet<Vec<Symbol>>,
    limit: usize,
) -> bool {
    for t in graph.state(state).transitions() {
        for symbol in t.min..=t.max {
            prefix.push(symbol);
            if graph.state(t.to).is_accept() {
                strings.insert(prefix.clone());
                if strings.len() > limit {
                    return false;
                }
            }
            let complete = enumerate(graph, t.to, prefix, strings, limit);
            prefix.pop();
            if !complete {
                return false;
            }
        }
    }
    true
}

/// Every accepted string of exactly `length` symbols, in lexicographic order.
pub fn strings_of_length<P: Payload>(a: &Automaton<P>, length: usize) -> Vec<Vec<Symbol>> {
    if let Some(symbols) = a.singleton() {
        return if symbols.len() == length {
            vec![symbols.to_vec()]
        } else {
            Vec::new()
        };
    }

    let graph = a.explicit_graph();
    let mut strings = BTreeSet::new();
    let mut prefix = Vec::with_capacity(length);
    collect_of_length(&graph, graph.initial(), length, &mut prefix, &mut strings);
    strings.into_iter().collect()
}

fn collect_of_length<P: Payload>(
    graph: &Graph<P>,
    state: StateId,
    remaining: usize,
    prefix: &mut Vec<Symbol>,
    strings: &mut BTreeSet<Vec<Symbol>>,
) {
    if remaining == 0 {
        if graph.state(state).is_accept() {
            strings.insert(prefix.clone());
        }
        return;
    }
    for t in graph.state(state).transitions() {
        for symbol in t.min..=t.max {
            prefix.push(symbol);
            collect_of_length(graph, t.to, remaining - 1, prefix, strings);
            prefix.pop();
        }
    }
}

/// The longest string that is a prefix of every accepted string.
pub fn common_prefix<P: Payload>(a: &Automaton<P>) -> Vec<Symbol> {
    if let Some(symbols) = a.singleton() {
        return symbols.to_vec();
    }
    let graph = a.explicit_graph();
    let mut prefix = Vec::new();
    let mut visited = StateSet::with_capacity(graph.len());
    let mut state = graph.initial();
    loop {
        visited.insert(state);
        let node = graph.state(state);
        match node.transitions() {
            [t] if !node.is_accept() && t.min == t.max && !visited.contains(t.to) => {
                prefix.push(t.min);
                state = t.to;
            }
            _ => return prefix,
        }
    }
}

impl Engine {
    /// The language of all prefixes of strings `a` accepts.
    ///
    /// Every state becomes accepting; existing payloads are kept.
    pub fn prefix_close<P: Payload>(&self, a: &Automaton<P>) -> Automaton<P> {
        let mut closed = self.working_copy(a);
        let graph = closed.graph_mut();
        for state in graph.reachable() {
            let node = graph.state_mut(state);
            if !node.is_accept() {
                node.set_accept(Some(P::default()));
            }
        }
        self.finish(closed)
    }

    /// Replace every occurrence of `symbol` by the string `replacement`.
    ///
    /// An empty replacement deletes `symbol`.
    pub fn subst<P: Payload>(
        &self,
        a: &Automaton<P>,
        symbol: Symbol,
        replacement: &[Symbol],
    ) -> Automaton<P> {
        let mut result = self.working_copy(a);
        let mut epsilons = Vec::new();
        let graph = result.graph_mut();
        for state in graph.reachable() {
            let transitions = std::mem::take(&mut graph.state_mut(state).transitions);
            for t in transitions {
                if !t.contains(symbol) {
                    graph.push_transition(state, t);
                    continue;
                }
                if t.min < symbol {
                    graph.push_transition(state, Transition::new(t.min, symbol - 1, t.to));
                }
                if t.max > symbol {
                    graph.push_transition(state, Transition::new(symbol + 1, t.max, t.to));
                }
                let Some((&last, init)) = replacement.split_last() else {
                    epsilons.push((state, t.to));
                    continue;
                };
                let mut from = state;
                for &s in init {
                    let next = graph.add_state(State::new());
                    graph.push_transition(from, Transition::single(s, next));
                    from = next;
                }
                graph.push_transition(from, Transition::single(last, t.to));
            }
        }
        self.rewired(result, &epsilons)
    }

    /// Replace every symbol that is a key of `map` by any one of its values.
    ///
    /// A key mapped to no values removes its edges. Other symbols are kept.
    pub fn subst_map<P: Payload>(
        &self,
        a: &Automaton<P>,
        map: &BTreeMap<Symbol, Vec<Symbol>>,
    ) -> Automaton<P> {
        let mut result = self.working_copy(a);
        if map.is_empty() {
            return self.finish(result);
        }
        let graph = result.graph_mut();
        for state in graph.reachable() {
            let transitions = std::mem::take(&mut graph.state_mut(state).transitions);
            for t in transitions {
                let mut next = u32::from(t.min);
                for (&key, values) in map.range(t.min..=t.max) {
                    if next < u32::from(key) {
                        graph.push_transition(state, Transition::new(next as Symbol, key - 1, t.to));
                    }
                    for &value in values {
                        graph.push_transition(state, Transition::single(value, t.to));
                    }
                    next = u32::from(key) + 1;
                }
                if next <= u32::from(t.max) {
                    graph.push_transition(state, Transition::new(next as Symbol, t.max, t.to));
                }
            }
        }
        self.rewired(result, &[])
    }

    /// Map symbol intervals through a piecewise shift.
    ///
    /// `mapping` holds `(source, dest)` pairs sorted by `source`: symbols
    /// from one `source` up to the next are shifted to start at `dest`.
    /// Symbols below the first `source` are kept, and symbols shifted past
    /// [`MAX_SYMBOL`] are dropped.
    pub fn homomorph<P: Payload>(
        &self,
        a: &Automaton<P>,
        mapping: &[(Symbol, Symbol)],
    ) -> Automaton<P> {
        let mut result = self.working_copy(a);
        let mut mapping = mapping.to_vec();
        mapping.sort_by_key(|&(source, _)| source);
        mapping.dedup_by_key(|&mut (source, _)| source);
        let Some(&(first, _)) = mapping.first() else {
            return self.finish(result);
        };
        let graph = result.graph_mut();
        for state in graph.reachable() {
            let transitions = std::mem::take(&mut graph.state_mut(state).transitions);
            for t in transitions {
                let mut min = u32::from(t.min);
                while min <= u32::from(t.max) {
                    let piece = mapping.partition_point(|&(source, _)| u32::from(source) <= min);
                    let (end, shifted) = match piece.checked_sub(1) {
                        Some(n) => {
                            let (source, dest) = mapping[n];
                            let end = mapping
                                .get(n + 1)
                                .map_or(u32::from(MAX_SYMBOL), |&(next, _)| u32::from(next) - 1);
                            (end, u32::from(dest) + (min - u32::from(source)))
                        }
                        None => (u32::from(first) - 1, min),
                    };
                    let end = end.min(u32::from(t.max));
                    let last = shifted + (end - min);
                    if shifted <= u32::from(MAX_SYMBOL) {
                        let last = last.min(u32::from(MAX_SYMBOL));
                        graph.push_transition(state, Transition::new(shifted as Symbol, last as Symbol, t.to));
                    }
                    min = end + 1;
                }
            }
        }
        self.rewired(result, &[])
    }

    /// Keep only the symbols in `symbols`; every other symbol is erased as
    /// if it were never read.
    pub fn project<P: Payload>(&self, a: &Automaton<P>, symbols: &[Symbol]) -> Automaton<P> {
        let kept: BTreeSet<Symbol> = symbols.iter().copied().collect();
        let mut result = self.working_copy(a);
        let mut epsilons = Vec::new();
        let graph = result.graph_mut();
        for state in graph.reachable() {
            let transitions = std::mem::take(&mut graph.state_mut(state).transitions);
            for t in transitions {
                let inside = kept.range(t.min..=t.max).count();
                for &symbol in kept.range(t.min..=t.max) {
                    graph.push_transition(state, Transition::single(symbol, t.to));
                }
                if inside < usize::from(t.max - t.min) + 1 {
                    epsilons.push((state, t.to));
                }
            }
        }
        self.rewired(result, &epsilons)
    }

    /// Like [`compress`](Self::compress), and additionally allow any run of
    /// `set` symbols before and after the string.
    pub fn trim<P: Payload>(
        &self,
        a: &Automaton<P>,
        set: &[Symbol],
        symbol: Symbol,
    ) -> Automaton<P> {
        let mut result = self.working_copy(a);
        let mut epsilons = compress_edges(&mut result, set, symbol);
        let graph = result.graph_mut();

        let tail = graph.add_state(State::accepting(P::default()));
        add_set_transitions(graph, tail, set, tail);
        for state in graph.accept_states() {
            epsilons.push((state, tail));
        }

        let head = graph.add_state(State::new());
        add_set_transitions(graph, head, set, head);
        epsilons.push((head, graph.initial()));
        graph.initial = head;
        self.rewired(result, &epsilons)
    }

    /// Wherever `symbol` may be read, also allow one or more symbols of `set`.
    pub fn compress<P: Payload>(
        &self,
        a: &Automaton<P>,
        set: &[Symbol],
        symbol: Symbol,
    ) -> Automaton<P> {
        let mut result = self.working_copy(a);
        let epsilons = compress_edges(&mut result, set, symbol);
        self.rewired(result, &epsilons)
    }

    /// Strings of length one made of any symbol that occurs in `a`.
    ///
    /// The result is deterministic.
    pub fn single_chars<P: Payload>(&self, a: &Automaton<P>) -> Automaton<P> {
        let source = a.explicit_graph();
        let mut graph = Graph::new();
        let end = graph.add_state(State::accepting(P::default()));
        for state in source.reachable() {
            for t in source.state(state).transitions() {
                graph.push_transition(0, Transition::new(t.min, t.max, end));
            }
        }
        graph.remove_dead_transitions();
        self.finish(Automaton::from_graph(graph, true))
    }

    /// Nonempty strings `w` such that some `u` accepted by `a` is followed
    /// by `w` to form another string of `a`, and `w` followed by some `v`
    /// accepted by `b` forms another string of `b`.
    pub fn overlap<P: Payload>(&self, a: &Automaton<P>, b: &Automaton<P>) -> Automaton<P> {
        let mut left = a.deep_clone();
        left.determinize();
        let left = Automaton::from_graph(accept_to_accept(left.into_graph()), false);

        let right = b.explicit_graph();
        let (reversed, initials) = reverse(&right);
        let suffixes = accept_to_accept(determinize(&reversed, &initials));
        let (reversed, initials) = reverse(&suffixes);
        let right = Automaton::from_graph(determinize(&reversed, &initials), true);

        let both = self.intersection(&left, &right);
        self.minus(&both, &Automaton::empty_string())
    }

    /// `[ \t\n\r]* a [ \t\n\r]*` with the hex letters `a-f` matched in
    /// either case.
    pub fn hex_cases<P: Payload>(&self, a: &Automaton<P>) -> Automaton<P> {
        let mut map = BTreeMap::new();
        for (lower, upper) in (b'a'..=b'f').zip(b'A'..=b'F') {
            let both = vec![Symbol::from(lower), Symbol::from(upper)];
            map.insert(Symbol::from(lower), both.clone());
            map.insert(Symbol::from(upper), both);
        }
        self.padded(&self.subst_map(a, &map))
    }

    /// `[ \t\n\r]* a [ \t\n\r]*` where each whitespace symbol of `a`
    /// matches any whitespace symbol.
    pub fn replace_whitespace<P: Payload>(&self, a: &Automaton<P>) -> Automaton<P> {
        let spaces: Vec<Symbol> = WHITESPACE.iter().map(|&b| Symbol::from(b)).collect();
        let map: BTreeMap<Symbol, Vec<Symbol>> = spaces.iter().map(|&s| (s, spaces.clone())).collect();
        self.padded(&self.subst_map(a, &map))
    }

    fn padded<P: Payload>(&self, a: &Automaton<P>) -> Automaton<P> {
        let ws = Automaton::whitespace();
        self.concatenate_all(&[&ws, a, &ws])
    }

    /// Close `epsilons` into `a`, drop dead edges and finish.
    fn rewired<P: Payload>(
        &self,
        mut a: Automaton<P>,
        epsilons: &[(StateId, StateId)],
    ) -> Automaton<P> {
        if !epsilons.is_empty() {
            log::trace!("rewiring {} epsilon edges", epsilons.len());
            if let Err(err) = self.add_epsilons(&mut a, epsilons) {
                log::warn!("dropping epsilon edges: {err}");
            }
        }
        a.set_deterministic(false);
        a.graph_mut().remove_dead_transitions();
        self.finish(a)
    }
}

/// Symbols of the whitespace class used by the padded rewrites and the
/// numeric constructors.
pub(crate) const WHITESPACE: &[u8] = b" \t\n\r";

fn add_set_transitions<P: Payload>(
    graph: &mut Graph<P>,
    from: StateId,
    set: &[Symbol],
    to: StateId,
) {
    for &symbol in set {
        graph.push_transition(from, Transition::single(symbol, to));
    }
}

/// Add a `set`-looping state beside every edge on `symbol`; returns the
/// epsilon edges that rejoin the original targets.
fn compress_edges<P: Payload>(
    a: &mut Automaton<P>,
    set: &[Symbol],
    symbol: Symbol,
) -> Vec<(StateId, StateId)> {
    let graph = a.graph_mut();
    let mut epsilons = Vec::new();
    for state in graph.reachable() {
        let Some(target) = graph.state(state).step(symbol) else {
            continue;
        };
        let inner = graph.add_state(State::new());
        add_set_transitions(graph, inner, set, inner);
        add_set_transitions(graph, state, set, inner);
        epsilons.push((inner, target));
    }
    epsilons
}

/// A new initial state with an epsilon edge to every accept state of `graph`.
fn accept_to_accept<P: Payload>(mut graph: Graph<P>) -> Graph<P> {
    let accepts = graph.accept_states();
    let start = graph.add_state(State::new());
    for state in accepts {
        graph.add_epsilon(start, state);
    }
    graph.initial = start;
    graph.reduce();
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::to_symbols;

    fn s(text: &str) -> Automaton {
        Automaton::string(text)
    }

    fn strings(list: &[&str]) -> Vec<Vec<Symbol>> {
        list.iter().map(|s| to_symbols(s)).collect()
    }

    #[test]
    fn test_reverse() {
        let e = Engine::default();
        let u = e.union(&s("ab"), &s("cd"));
        let (reversed, initials) = reverse(&u.explicit_graph());
        assert_eq!(initials.len(), 2);
        let dfa = Automaton::from_graph(determinize(&reversed, &initials), true);
        assert!(dfa.accepts("ba"));
        assert!(dfa.accepts("dc"));
        assert!(!dfa.accepts("ab"));
    }

    #[test]
    fn test_is_finite() {
        let e = Engine::default();
        assert!(is_finite(&s("abc")));
        assert!(is_finite(&e.union(&s("a"), &s("bcd"))));
        assert!(!is_finite(&e.repeat(&s("a"))));
        assert!(!is_finite(&Automaton::<()>::any_string()));
        assert!(is_finite(&Automaton::<()>::empty()));
        // a diamond is not a loop
        let diamond = e.concatenate(&e.union(&s("a"), &s("b")), &s("c"));
        assert!(is_finite(&diamond));
    }

    #[test]
    fn test_finite_strings() {
        let e = Engine::default();
        let u = e.union_all(&[&s("b"), &s("a"), &s("ab"), &s("")]);
        assert_eq!(finite_strings(&u, None), Some(strings(&["", "a", "ab", "b"])));
        assert_eq!(finite_strings(&u, Some(4)).map(|v| v.len()), Some(4));
        assert_eq!(finite_strings(&u, Some(3)), None);
        assert_eq!(finite_strings(&e.repeat(&s("x")), None), None);
        assert_eq!(finite_strings(&s("q"), Some(1)), Some(strings(&["q"])));
    }

    #[test]
    fn test_strings_of_length() {
        let e = Engine::default();
        let star = e.repeat(&Automaton::<()>::char_set("ab"));
        assert_eq!(strings_of_length(&star, 2), strings(&["aa", "ab", "ba", "bb"]));
        assert_eq!(strings_of_length(&star, 0), strings(&[""]));
        assert_eq!(strings_of_length(&s("xyz"), 2), Vec::<Vec<Symbol>>::new());
    }

    #[test]
    fn test_common_prefix() {
        let e = Engine::default();
        let u = e.concatenate(&s("pre"), &Automaton::char_set("xy"));
        assert_eq!(common_prefix(&u), to_symbols("pre"));
        assert_eq!(common_prefix(&s("whole")), to_symbols("whole"));
        let looped = e.repeat(&s("a"));
        assert_eq!(common_prefix(&looped), Vec::<Symbol>::new());
    }

    #[test]
    fn test_prefix_close() {
        let e = Engine::default();
        let closed = e.prefix_close(&s("abc"));
        for prefix in ["", "a", "ab", "abc"] {
            assert!(closed.accepts(prefix), "{prefix:?}");
        }
        assert!(!closed.accepts("b"));
    }

    fn sym(c: u8) -> Symbol {
        Symbol::from(c)
    }

    #[test]
    fn test_subst() {
        let e = Engine::default();
        let a = e.subst(&s("hello * world"), sym(b'*'), &to_symbols("new"));
        assert!(!a.accepts("hello * world"));
        assert!(a.accepts("hello new world"));
        assert!(!a.accepts("hello NEW world"));
        assert!(!a.is_singleton());

        let deleted = e.subst(&Automaton::<()>::char_range('a', 'e'), sym(b'c'), &[]);
        assert!(deleted.accepts(""));
        assert!(deleted.accepts("b"));
        assert!(deleted.accepts("d"));
        assert!(!deleted.accepts("c"));
    }

    #[test]
    fn test_subst_map() {
        let e = Engine::default();
        let mut map = BTreeMap::new();
        map.insert(sym(b'b'), vec![sym(b'x'), sym(b'y')]);
        map.insert(sym(b'd'), Vec::new());
        let a = e.subst_map(&Automaton::<()>::char_range('a', 'e'), &map);
        for text in ["a", "c", "e", "x", "y"] {
            assert!(a.accepts(text), "{text}");
        }
        assert!(!a.accepts("b"));
        assert!(!a.accepts("d"));
    }

    #[test]
    fn test_homomorph() {
        let e = Engine::default();
        let lower: Automaton = Automaton::char_range('a', 'z');
        let shifted = e.homomorph(&lower, &[(sym(b'a'), sym(b'A')), (sym(b'n'), sym(b'n'))]);
        assert!(shifted.accepts("A"));
        assert!(shifted.accepts("M"));
        assert!(shifted.accepts("n"));
        assert!(!shifted.accepts("a"));
        assert!(!shifted.accepts("N"));

        // below the first source symbols stay put
        let digits: Automaton = Automaton::char_range('0', '9');
        let same = e.homomorph(&digits, &[(sym(b'a'), sym(b'A'))]);
        assert!(e.equivalent(&same, &digits));

        let overflow = e.homomorph(&Automaton::<()>::symbol_range(0xfff0, 0xffff), &[(0xfff0, 0xfffe)]);
        assert!(overflow.accepts_symbols(&[0xffff]));
        assert!(!overflow.accepts_symbols(&[0xfff0]));
    }

    #[test]
    fn test_project() {
        let e = Engine::default();
        let kept = e.project(&s("a-b-c"), &to_symbols("abc"));
        assert!(kept.accepts("abc"));
        assert!(!kept.accepts("a-b-c"));

        let ranged = e.project(&Automaton::<()>::char_range('a', 'z'), &to_symbols("q"));
        assert!(ranged.accepts("q"));
        assert!(ranged.accepts(""));
        assert!(!ranged.accepts("r"));
    }

    #[test]
    fn test_trim() {
        let e = Engine::default();
        let a = e.trim(&s("to_be"), &to_symbols("- "), sym(b'_'));
        assert!(a.accepts("to be"));
        assert!(a.accepts("  to-be  "));
        assert!(a.accepts("to_be"));
        assert!(!a.accepts("two be"));
        assert!(!a.is_singleton());
        assert!(!is_finite(&a));
    }

    #[test]
    fn test_compress() {
        let e = Engine::default();
        let a = e.compress(&s("hello * world"), &to_symbols("new"), sym(b'*'));
        assert!(a.accepts("hello * world"));
        assert!(a.accepts("hello new world"));
        assert!(a.accepts("hello wwn world"));
        assert!(!a.accepts("hello NEW world"));
        assert!(!a.accepts(" hello * world"));
    }

    #[test]
    fn test_single_chars() {
        let e = Engine::default();
        let a = e.single_chars(&s("bad dream"));
        assert!(a.is_deterministic());
        assert!(a.accepts("b"));
        assert!(a.accepts(" "));
        assert!(!a.accepts("aa"));
        assert!(!a.accepts("x"));
        assert!(!a.is_singleton());
    }

    #[test]
    fn test_overlap() {
        let e = Engine::default();
        let left = e.union(&s("a"), &s("ab"));
        let right = e.union(&s("b"), &s("bb"));
        let both = e.overlap(&left, &right);
        assert!(both.accepts("b"));
        assert!(!both.accepts(""));
        assert!(!both.accepts("a"));
        assert!(!both.accepts("bb"));

        assert!(e.overlap(&s("a"), &s("b")).is_empty());
    }

    #[test]
    fn test_hex_cases() {
        let e = Engine::default();
        let a = e.hex_cases(&s("hello * world"));
        assert!(a.accepts("hello * world"));
        assert!(a.accepts("hEllo * worlD"));
        assert!(a.accepts("\thello * world "));
        assert!(!a.accepts("hellO * worlD"));
    }

    #[test]
    fn test_replace_whitespace() {
        let e = Engine::default();
        let a = e.replace_whitespace(&e.hex_cases(&s("hello * world")));
        assert!(a.accepts("hello\n*\tworld"));
        assert!(a.accepts("hEllo * worlD"));
        assert!(!a.accepts("hellO * worlD"));
        assert!(!a.accepts("hello*world"));
    }
}
