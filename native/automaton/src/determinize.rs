//! Subset construction over interval-labelled graphs.

use crate::graph::Graph;
use crate::state::{Payload, State, StateId};
use crate::symbol::{MAX_SYMBOL, MIN_SYMBOL, Symbol};
use crate::transition::Transition;
use indexmap::IndexMap;

/// Convert a graph to an equivalent deterministic one, starting from the set
/// `initial` instead of the graph's own initial state.
///
/// Every deterministic state corresponds to a sorted set of NFA states;
/// the map from sets to new ids is an `IndexMap`, so a set's index is its id.
/// A new state accepts iff a member accepts, and takes the payload of its
/// lowest-numbered accepting member.
pub fn determinize<P: Payload>(nfa: &Graph<P>, initial: &[StateId]) -> Graph<P> {
    let table = nfa.sorted_transition_table();
    let points = alphabet_partition(&table);

    let mut initial_set = initial.to_vec();
    initial_set.sort_unstable();
    initial_set.dedup();

    let mut dfa = Graph::new();
    dfa.state_mut(0).set_accept(first_payload(nfa, &initial_set));
    let mut state_mapping: IndexMap<Vec<StateId>, StateId> = IndexMap::new();
    state_mapping.insert(initial_set, 0);

    let mut target = Vec::new();
    let mut next = 0;
    while next < state_mapping.len() {
        let current = next as StateId;
        let members = match state_mapping.get_index(next) {
            Some((members, _)) => members.clone(),
            None => break,
        };
        next += 1;

        for (n, &point) in points.iter().enumerate() {
            target.clear();
            for &member in &members {
                for t in &table[member as usize] {
                    if t.min > point {
                        break;
                    }
                    if point <= t.max {
                        target.push(t.to);
                    }
                }
            }
            if target.is_empty() {
                continue;
            }
            target.sort_unstable();
            target.dedup();

            let to = match state_mapping.get(&target) {
                Some(&existing) => existing,
                None => {
                    let mut state = State::new();
                    state.set_accept(first_payload(nfa, &target));
                    let id = dfa.add_state(state);
                    state_mapping.insert(target.clone(), id);
                    id
                }
            };

            let max = points.get(n + 1).map_or(MAX_SYMBOL, |&p| p - 1);
            dfa.push_transition(current, Transition::new(point, max, to));
        }
    }

    log::debug!(
        "determinized {} states into {} subset states",
        nfa.len(),
        dfa.len()
    );
    dfa.remove_dead_transitions();
    dfa
}

/// Start points over every state of the arena, not just the reachable ones:
/// the initial set may name states the graph's own initial state cannot reach.
fn alphabet_partition(table: &[Vec<Transition>]) -> Vec<Symbol> {
    let mut points = vec![MIN_SYMBOL];
    for t in table.iter().flatten() {
        points.push(t.min);
        if t.max < MAX_SYMBOL {
            points.push(t.max + 1);
        }
    }
    points.sort_unstable();
    points.dedup();
    points
}

fn first_payload<P: Payload>(nfa: &Graph<P>, members: &[StateId]) -> Option<P> {
    members
        .iter()
        .find_map(|&member| nfa.state(member).accept().cloned())
}
