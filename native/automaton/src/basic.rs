//! Construction primitives.
//!
//! Accept states created here carry `P::default()`.

use crate::automaton::Automaton;
use crate::error::{AutomatonError, Result};
use crate::graph::Graph;
use crate::special::WHITESPACE;
use crate::state::{Payload, State, StateId};
use crate::symbol::{MAX_SYMBOL, MIN_SYMBOL, Symbol, to_symbols};
use crate::transition::Transition;
use rangemap::RangeInclusiveSet;

impl<P: Payload> Automaton<P> {
    /// The empty language.
    pub fn empty() -> Self {
        Self::from_graph(Graph::new(), true)
    }

    /// The language containing only the empty string.
    pub fn empty_string() -> Self {
        Self::from_singleton(Vec::new())
    }

    /// Any single symbol.
    pub fn any_char() -> Self {
        Self::symbol_range(MIN_SYMBOL, MAX_SYMBOL)
    }

    /// Every string, the empty one included.
    pub fn any_string() -> Self {
        let mut graph = Graph::new();
        graph.state_mut(0).set_accept(Some(P::default()));
        graph.push_transition(0, Transition::new(MIN_SYMBOL, MAX_SYMBOL, 0));
        Self::from_graph(graph, true)
    }

    /// Exactly the one-symbol string `symbol`.
    pub fn symbol(symbol: Symbol) -> Self {
        Self::from_singleton(vec![symbol])
    }

    /// Exactly the string consisting of `c`, one or two symbols long.
    pub fn char(c: char) -> Self {
        let mut buf = [0; 2];
        Self::from_singleton(c.encode_utf16(&mut buf).to_vec())
    }

    /// Any single symbol in `min..=max`; the empty language if `min > max`.
    pub fn symbol_range(min: Symbol, max: Symbol) -> Self {
        if min == max {
            return Self::symbol(min);
        }
        let mut graph = Graph::new();
        if min < max {
            let end = graph.add_state(State::accepting(P::default()));
            graph.push_transition(0, Transition::new(min, max, end));
        }
        Self::from_graph(graph, true)
    }

    /// Any single character in `min..=max`.
    ///
    /// A bound outside the Basic Multilingual Plane has no single-symbol
    /// encoding, so the result is then the empty language. Build ranges of
    /// surrogate units with [`symbol_range`](Self::symbol_range) instead.
    pub fn char_range(min: char, max: char) -> Self {
        match (u16::try_from(u32::from(min)), u16::try_from(u32::from(max))) {
            (Ok(min), Ok(max)) => Self::symbol_range(min, max),
            _ => Self::empty(),
        }
    }

    /// Any one symbol from `symbols`.
    pub fn symbol_set(symbols: &[Symbol]) -> Self {
        if let [single] = symbols {
            return Self::symbol(*single);
        }
        let mut graph = Graph::new();
        if !symbols.is_empty() {
            let end = graph.add_state(State::accepting(P::default()));
            for &symbol in symbols {
                graph.push_transition(0, Transition::single(symbol, end));
            }
            graph.reduce();
        }
        Self::from_graph(graph, true)
    }

    /// Any one symbol of the UTF-16 encoding of `chars`.
    pub fn char_set(chars: &str) -> Self {
        Self::symbol_set(&to_symbols(chars))
    }

    /// Exactly the string `s`, kept in singleton form.
    pub fn string(s: &str) -> Self {
        Self::from_singleton(to_symbols(s))
    }

    /// Exactly the symbol sequence `symbols`, kept in singleton form.
    pub fn symbols(symbols: &[Symbol]) -> Self {
        Self::from_singleton(symbols.to_vec())
    }

    /// Any run of space, tab, newline or carriage return, including none.
    pub fn whitespace() -> Self {
        let mut graph = Graph {
            states: vec![State::accepting(P::default())],
            initial: 0,
        };
        for &b in WHITESPACE {
            graph.push_transition(0, Transition::single(Symbol::from(b), 0));
        }
        graph.reduce();
        Self::from_graph(graph, true)
    }

    /// Every string that contains `pattern`. Deterministic, with one state per
    /// prefix of `pattern`.
    pub fn string_matcher(pattern: &str) -> Self {
        let pattern = to_symbols(pattern);
        if pattern.is_empty() {
            return Self::any_string();
        }

        // border[i]: length of the longest proper border of pattern[..=i]
        let mut border = vec![0usize; pattern.len()];
        for i in 1..pattern.len() {
            let mut k = border[i - 1];
            while k > 0 && pattern[i] != pattern[k] {
                k = border[k - 1];
            }
            if pattern[i] == pattern[k] {
                k += 1;
            }
            border[i] = k;
        }
        let advance = |mut matched: usize, symbol: Symbol| loop {
            if pattern[matched] == symbol {
                return matched + 1;
            }
            if matched == 0 {
                return 0;
            }
            matched = border[matched - 1];
        };

        let mut alphabet = pattern.clone();
        alphabet.sort_unstable();
        alphabet.dedup();

        let last = pattern.len();
        let mut graph = Graph {
            states: vec![State::new(); last + 1],
            initial: 0,
        };
        let found = last as StateId;
        graph.push_transition(found, Transition::new(MIN_SYMBOL, MAX_SYMBOL, found));
        graph.state_mut(found).set_accept(Some(P::default()));
        for matched in 0..last {
            let from = matched as StateId;
            let mut covered = RangeInclusiveSet::new();
            for &symbol in &alphabet {
                let next = advance(matched, symbol);
                if next > 0 {
                    covered.insert(symbol..=symbol);
                    graph.push_transition(from, Transition::single(symbol, next as StateId));
                }
            }
            let gaps: Vec<_> = covered.gaps(&(MIN_SYMBOL..=MAX_SYMBOL)).collect();
            for gap in gaps {
                graph.push_transition(from, Transition::new(*gap.start(), *gap.end(), 0));
            }
        }
        graph.reduce();
        Self::from_graph(graph, true)
    }

    /// Decimal numerals for the integers in `min..=max`.
    ///
    /// With `digits > 0` every numeral has exactly that many digits, padded
    /// with leading zeros. With `digits == 0` any number of leading zeros is
    /// allowed.
    pub fn interval(min: u32, max: u32, digits: usize) -> Result<Self> {
        let low = min.to_string();
        let high = max.to_string();
        if min > max || (digits > 0 && high.len() > digits) {
            return Err(AutomatonError::InvalidDigitRange { min, max, digits });
        }
        let width = if digits > 0 { digits } else { high.len() };
        let low = format!("{low:0>width$}").into_bytes();
        let high = format!("{high:0>width$}").into_bytes();

        let mut range = DigitRange {
            graph: Graph::new(),
            low: &low,
            high: &high,
            zero_prefixed: Vec::new(),
        };
        let start = range.between(0, digits == 0);
        let zero_prefixed = std::mem::take(&mut range.zero_prefixed);
        let mut graph = range.graph;
        graph.initial = start;
        if digits > 0 {
            graph.reduce();
            return Ok(Self::from_graph(graph, true));
        }

        for state in zero_prefixed {
            graph.add_epsilon(start, state);
        }
        graph.push_transition(start, Transition::single(Symbol::from(b'0'), start));
        graph.reduce();
        Ok(Self::from_graph(graph, false))
    }
}

/// Fixed-width digit strings between `low` and `high`, which have equal
/// length. Built one state per position and bound kind.
pub(crate) struct DigitRange<'a, P> {
    pub(crate) graph: Graph<P>,
    pub(crate) low: &'a [u8],
    pub(crate) high: &'a [u8],
    /// States reached by reading only zeros, when collecting them.
    pub(crate) zero_prefixed: Vec<StateId>,
}

impl<P: Payload> DigitRange<'_, P> {
    fn digit_edge(&mut self, from: StateId, min: u8, max: u8, to: StateId) {
        self.graph
            .push_transition(from, Transition::new(Symbol::from(min), Symbol::from(max), to));
    }

    /// A fresh state for position `n`, and whether every digit has been read
    /// there (the state then accepts).
    fn position(&mut self, n: usize) -> (StateId, bool) {
        let done = n == self.low.len();
        let state = if done {
            State::accepting(P::default())
        } else {
            State::new()
        };
        (self.graph.add_state(state), done)
    }

    /// Strings bounded by both `low` and `high` from position `n` on.
    pub(crate) fn between(&mut self, n: usize, zeros: bool) -> StateId {
        let (state, done) = self.position(n);
        if done {
            return state;
        }
        if zeros {
            self.zero_prefixed.push(state);
        }
        let (lo, hi) = (self.low[n], self.high[n]);
        if lo == hi {
            let next = self.between(n + 1, zeros && lo == b'0');
            self.digit_edge(state, lo, lo, next);
            return state;
        }
        let next = self.at_least(n + 1, zeros && lo == b'0');
        self.digit_edge(state, lo, lo, next);
        let next = self.at_most(n + 1);
        self.digit_edge(state, hi, hi, next);
        if lo + 1 < hi {
            let next = self.any(n + 1);
            self.digit_edge(state, lo + 1, hi - 1, next);
        }
        state
    }

    /// Strings not below `low` from position `n` on.
    pub(crate) fn at_least(&mut self, n: usize, zeros: bool) -> StateId {
        let (state, done) = self.position(n);
        if done {
            return state;
        }
        if zeros {
            self.zero_prefixed.push(state);
        }
        let lo = self.low[n];
        let next = self.at_least(n + 1, zeros && lo == b'0');
        self.digit_edge(state, lo, lo, next);
        if lo < b'9' {
            let next = self.any(n + 1);
            self.digit_edge(state, lo + 1, b'9', next);
        }
        state
    }

    /// Strings not above `high` from position `n` on.
    pub(crate) fn at_most(&mut self, n: usize) -> StateId {
        let (state, done) = self.position(n);
        if done {
            return state;
        }
        let hi = self.high[n];
        let next = self.at_most(n + 1);
        self.digit_edge(state, hi, hi, next);
        if hi > b'0' {
            let next = self.any(n + 1);
            self.digit_edge(state, b'0', hi - 1, next);
        }
        state
    }

    fn any(&mut self, n: usize) -> StateId {
        let (state, done) = self.position(n);
        if done {
            return state;
        }
        let next = self.any(n + 1);
        self.digit_edge(state, b'0', b'9', next);
        state
    }
}
