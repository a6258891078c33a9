//! Finite-state automata over 16-bit symbols with interval-labelled edges.
//!
//! This crate provides:
//! - Construction primitives (strings, symbol ranges, sets, any string)
//! - Language operations (concatenation, union, Kleene star, bounded repeat,
//!   complement, intersection, difference, subset and equivalence tests)
//! - Subset construction and Hopcroft, table-filling and Brzozowski minimization
//! - Minimal acyclic automata from sorted string lists
//! - Symbol rewriting and numeral languages (integer bounds, digit counts,
//!   fixed values)
//! - Deterministic and breadth stepping primitives for downstream matchers
//!
//! Accept states carry a payload `P` (defaulting to `()`), which lets callers
//! tell which input produced a match.
//!
//! ```
//! use interval_automaton::{Automaton, Engine};
//!
//! let engine = Engine::default();
//! let digits: Automaton = Automaton::char_range('0', '9');
//! let number = engine.repeat_min(&digits, 1);
//! assert!(number.accepts("2024"));
//! assert!(!engine.complement(&number).accepts("7"));
//! ```

mod automaton;
mod basic;
mod config;
mod determinize;
mod error;
mod graph;
mod minimize;
mod numeric;
mod operations;
mod special;
mod state;
mod string_union;
mod symbol;
mod transition;

pub use automaton::Automaton;
pub use config::{Config, Engine};
pub use determinize::determinize;
pub use error::{AutomatonError, Result};
pub use graph::Graph;
pub use minimize::{Minimization, brzozowski, hopcroft, huffman, minimize};
pub use special::{common_prefix, finite_strings, is_finite, reverse, strings_of_length};
pub use state::{Payload, State, StateId, StateSet};
pub use string_union::StringUnionBuilder;
pub use symbol::{MAX_SYMBOL, MIN_SYMBOL, Symbol, from_symbols, to_symbols, write_symbol};
pub use transition::Transition;
