//! End-to-end scenarios over the public API.

use interval_automaton::{
    Automaton, AutomatonError, Config, Engine, Graph, Minimization, State, StateSet,
    StringUnionBuilder, to_symbols,
};

fn s(text: &str) -> Automaton {
    Automaton::string(text)
}

#[test]
fn test_char_range_and_complement() {
    let engine = Engine::default();
    let range: Automaton = Automaton::char_range('b', 'd');
    assert!(range.accepts("c"));
    assert!(!range.accepts("a"));

    let complement = engine.complement(&range);
    assert!(complement.accepts("a"));
    assert!(!complement.accepts("c"));
}

#[test]
fn test_bounded_repeat() {
    let engine = Engine::default();
    let r = engine.repeat_range(&s("ab"), 2, 3);
    assert!(r.accepts("abab"));
    assert!(r.accepts("ababab"));
    assert!(!r.accepts("ab"));
    assert!(!r.accepts("abababab"));
}

#[test]
fn test_degenerate_repeat_ranges() {
    let engine = Engine::default();
    assert!(engine.repeat_range(&s("ab"), 5, 1).is_empty());
    assert!(engine.repeat_range(&s("ab"), 0, 0).is_empty_string());
    assert!(engine.repeat_range(&Automaton::<()>::empty(), 0, 3).accepts(""));
}

#[test]
fn test_shortest_example_is_least() {
    let engine = Engine::default();
    let a = engine.union_all(&[&s("bb"), &s("ab"), &s("a")]);
    assert_eq!(engine.shortest_example(&a, true), Some(to_symbols("a")));
}

#[test]
fn test_concatenated_strings() {
    let engine = Engine::default();
    let c = engine.concatenate(&s("foo"), &s("bar"));
    assert!(c.accepts("foobar"));
    assert!(!c.accepts("foo"));
    assert!(!c.accepts("bar"));
    assert!(!c.accepts("foobarx"));
}

#[test]
fn test_string_union_builder() {
    let mut builder = StringUnionBuilder::new();
    builder.add("ab", "first").unwrap();
    builder.add("abc", "second").unwrap();
    builder.add("b", "third").unwrap();
    let a = builder.complete().unwrap();

    assert_eq!(a.run("ab"), Some("first"));
    assert_eq!(a.run("abc"), Some("second"));
    assert_eq!(a.run("b"), Some("third"));
    for rejected in ["", "a", "abcd", "bc", "c"] {
        assert_eq!(a.run(rejected), None, "{rejected:?}");
    }
    assert_eq!(
        builder.complete().err(),
        Some(AutomatonError::BuilderFinished)
    );
}

#[test]
fn test_string_union_shares_suffixes() {
    let words = ["cats", "dogs", "hats", "logs"];
    let a: Automaton = Automaton::string_union(&words);
    let engine = Engine::default();
    let minimal = engine.minimized(&a);
    assert_eq!(a.number_of_states(), minimal.number_of_states());
    assert_eq!(a.number_of_transitions(), minimal.number_of_transitions());
}

#[test]
fn test_minimize_with_every_strategy() {
    let base = Engine::default();
    let words = base.union_all(&[&s("tap"), &s("top"), &s("tip"), &s("tops")]);
    for strategy in [
        Minimization::Hopcroft,
        Minimization::Huffman,
        Minimization::Brzozowski,
    ] {
        let engine = Engine::new(Config::new().with_minimization(strategy));
        let minimal = engine.minimized(&words);
        assert!(engine.equivalent(&minimal, &words));
        assert!(minimal.accepts("tops"));
        assert!(!minimal.accepts("taps"));
    }
}

#[test]
fn test_payload_tagged_tokens() {
    // a tiny tokenizer table: which keyword matched
    let engine = Engine::default();
    let tag = |word: &str, kind: u8| {
        let mut graph = Automaton::<u8>::string(word).into_graph();
        for state in graph.accept_states() {
            graph.state_mut(state).set_accept(Some(kind));
        }
        Automaton::from_graph(graph, true)
    };
    let (if_kw, in_kw, int_kw) = (tag("if", 1), tag("in", 2), tag("int", 3));
    let table = engine.union_all(&[&if_kw, &in_kw, &int_kw]);
    let minimal = engine.minimized(&table);

    assert_eq!(minimal.run("if"), Some(1));
    assert_eq!(minimal.run("in"), Some(2));
    assert_eq!(minimal.run("int"), Some(3));
    assert_eq!(minimal.run("i"), None);
}

#[test]
fn test_breadth_stepping() {
    let engine = Engine::default();
    let mut a = engine.union(&s("ax"), &s("ay"));
    let start = StateSet::singleton(a.initial_state(), a.number_of_states());
    let (after_a, payloads) = a.step_set(&start, u16::from(b'a'));
    assert_eq!(after_a.len(), 2);
    assert!(payloads.is_empty());
    let (after_x, payloads) = a.step_set(&after_a, u16::from(b'x'));
    assert_eq!(after_x.len(), 1);
    assert_eq!(payloads, vec![()]);
}

#[test]
fn test_manual_assembly() {
    let mut graph: Graph<()> = Graph::new();
    let end = graph.add_state(State::accepting(()));
    let dead = graph.add_state(State::new());
    graph.add_transition(0, 0x30, 0x39, end).unwrap();
    graph.add_transition(0, 0x41, 0x5a, dead).unwrap();
    assert_eq!(
        graph.add_transition(0, 9, 3, end),
        Err(AutomatonError::InvalidInterval { min: 9, max: 3 })
    );

    let mut a = Automaton::from_graph(graph, true);
    a.restore_invariant();
    assert_eq!(a.number_of_states(), 2);
    assert!(a.accepts("5"));
    assert!(!a.accepts("Q"));
}

#[test]
fn test_operations_leave_inputs_alone() {
    let engine = Engine::new(Config::new().with_allow_mutation(true));
    let a = engine.union(&s("left"), &s("right"));
    let before = a.to_string();
    let _ = engine.concatenate_all(&[&a, &a, &a]);
    let _ = engine.union_all(&[&a, &a]);
    let _ = engine.intersection(&a, &a);
    let _ = engine.minus(&a, &s("left"));
    let _ = engine.repeat(&a);
    assert_eq!(a.to_string(), before);
}

#[test]
fn test_dot_output() {
    let a: Automaton = Automaton::char_range('a', 'c');
    let dot = a.to_dot();
    assert!(dot.starts_with("digraph Automaton {\n  rankdir = LR;\n"));
    assert!(dot.contains("0 -> 1 [label=\"a-c\"]"));
    assert!(dot.trim_end().ends_with('}'));
}
