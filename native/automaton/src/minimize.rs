//! Minimization strategies for deterministic graphs.
//!
//! [`hopcroft`] and [`huffman`] expect a deterministic graph and work on a
//! dense transition table over the alphabet partition, completed by a sink
//! state. Both start from one block per distinct accept payload, so payloads
//! survive minimization. [`brzozowski`] accepts any graph but resets payloads
//! to the default value.

use crate::determinize::determinize;
use crate::graph::Graph;
use crate::special::reverse;
use crate::state::{Payload, State, StateId, StateSet};
use crate::symbol::{MAX_SYMBOL, Symbol};
use crate::transition::Transition;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Minimization algorithm used by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Minimization {
    /// Hopcroft's partition refinement.
    #[default]
    Hopcroft,
    /// Table-filling over state pairs with backward propagation.
    Huffman,
    /// Double reversal and determinization.
    Brzozowski,
}

/// Minimize `graph` with the chosen strategy.
///
/// The graph must be deterministic unless `strategy` is
/// [`Minimization::Brzozowski`].
pub fn minimize<P: Payload>(graph: &Graph<P>, strategy: Minimization) -> Graph<P> {
    let minimized = match strategy {
        Minimization::Hopcroft => hopcroft(graph),
        Minimization::Huffman => huffman(graph),
        Minimization::Brzozowski => brzozowski(graph),
    };
    log::debug!(
        "{strategy:?} minimization: {} states -> {}",
        graph.len(),
        minimized.len()
    );
    minimized
}

/// A deterministic graph completed with a sink, as a dense table.
struct DeltaTable<P> {
    dfa: Graph<P>,
    points: Vec<Symbol>,
    /// `delta[state][class]` is the successor of `state` on alphabet class `class`.
    delta: Vec<Vec<StateId>>,
}

impl<P: Payload> DeltaTable<P> {
    fn new(graph: &Graph<P>) -> Self {
        let mut dfa = graph.clone();
        dfa.compact();
        let sink = dfa.totalize();
        let points = dfa.start_points();
        let delta = (0..dfa.len() as StateId)
            .map(|state| {
                points
                    .iter()
                    .map(|&p| dfa.step(state, p).unwrap_or(sink))
                    .collect()
            })
            .collect();
        Self { dfa, points, delta }
    }

    fn len(&self) -> usize {
        self.delta.len()
    }

    fn classes(&self) -> usize {
        self.points.len()
    }

    /// Initial partition: one block per distinct payload, the non-accepting block included.
    fn payload_blocks(&self) -> Vec<StateSet> {
        let mut blocks: IndexMap<Option<&P>, StateSet> = IndexMap::new();
        for state in 0..self.len() as StateId {
            blocks
                .entry(self.dfa.state(state).accept())
                .or_insert_with(|| StateSet::with_capacity(self.len()))
                .insert(state);
        }
        blocks.into_values().collect()
    }

    /// Build the quotient graph: one state per block, edges from a block
    /// representative, then prune the sink block and merge adjacent classes.
    fn quotient(&self, block_of: &[StateId], block_count: usize) -> Graph<P> {
        let mut representative: Vec<Option<StateId>> = vec![None; block_count];
        for (state, &block) in block_of.iter().enumerate() {
            representative[block as usize].get_or_insert(state as StateId);
        }

        let mut minimized = Graph {
            states: vec![State::new(); block_count],
            initial: block_of[self.dfa.initial() as usize],
        };
        for (block, rep) in representative.into_iter().enumerate() {
            let Some(rep) = rep else { continue };
            let state = &mut minimized.states[block];
            state.set_accept(self.dfa.state(rep).accept().cloned());
            for (class, &point) in self.points.iter().enumerate() {
                let max = self.points.get(class + 1).map_or(MAX_SYMBOL, |&p| p - 1);
                let to = block_of[self.delta[rep as usize][class] as usize];
                state.add_transition(Transition::new(point, max, to));
            }
        }
        minimized.remove_dead_transitions();
        minimized
    }
}

/// Hopcroft's partition refinement.
pub fn hopcroft<P: Payload>(graph: &Graph<P>) -> Graph<P> {
    let table = DeltaTable::new(graph);
    let n = table.len();
    let classes = table.classes();

    // reverse[target][class] = states stepping into target on class
    let mut reverse: Vec<Vec<Vec<StateId>>> = vec![vec![Vec::new(); classes]; n];
    for (state, row) in table.delta.iter().enumerate() {
        for (class, &target) in row.iter().enumerate() {
            reverse[target as usize][class].push(state as StateId);
        }
    }

    let mut partitions = table.payload_blocks();

    // Worklist of (partition_index, class) pairs to process
    let mut worklist: VecDeque<(usize, usize)> = VecDeque::new();
    for idx in 0..partitions.len() {
        for class in 0..classes {
            worklist.push_back((idx, class));
        }
    }

    while let Some((splitter_idx, class)) = worklist.pop_front() {
        let mut predecessors = StateSet::with_capacity(n);
        for target in partitions[splitter_idx].iter() {
            for &source in &reverse[target as usize][class] {
                predecessors.insert(source);
            }
        }
        if predecessors.is_empty() {
            continue;
        }

        let mut splits = Vec::new();
        for (part_idx, partition) in partitions.iter().enumerate() {
            let inside = partition.intersection(&predecessors);
            if inside.is_empty() {
                continue;
            }
            let outside = partition.difference(&predecessors);
            if outside.is_empty() {
                continue;
            }
            // keep the larger half in place, queue the smaller one
            if inside.len() <= outside.len() {
                splits.push((part_idx, outside, inside));
            } else {
                splits.push((part_idx, inside, outside));
            }
        }

        for (part_idx, keep, add) in splits {
            let new_idx = partitions.len();
            partitions[part_idx] = keep;
            partitions.push(add);
            for class in 0..classes {
                worklist.push_back((new_idx, class));
            }
        }
    }

    let mut block_of = vec![0; n];
    for (block, partition) in partitions.iter().enumerate() {
        for state in partition.iter() {
            block_of[state as usize] = block as StateId;
        }
    }
    table.quotient(&block_of, partitions.len())
}

/// Table-filling minimization: mark distinguishable state pairs, propagating
/// each new mark backwards through the pairs that depend on it.
pub fn huffman<P: Payload>(graph: &Graph<P>) -> Graph<P> {
    let table = DeltaTable::new(graph);
    let n = table.len();

    let mut payload_block = vec![0usize; n];
    for (block, states) in table.payload_blocks().iter().enumerate() {
        for state in states.iter() {
            payload_block[state as usize] = block;
        }
    }

    let index = |i: usize, j: usize| if i < j { i * n + j } else { j * n + i };
    let mut marked = vec![false; n * n];
    for i in 0..n {
        for j in i + 1..n {
            if payload_block[i] != payload_block[j] {
                marked[index(i, j)] = true;
            }
        }
    }

    let mut dependents: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..n {
        for j in i + 1..n {
            if marked[index(i, j)] {
                continue;
            }
            let mut distinguished = false;
            let mut successors = Vec::new();
            for class in 0..table.classes() {
                let p = table.delta[i][class] as usize;
                let q = table.delta[j][class] as usize;
                if p == q {
                    continue;
                }
                if marked[index(p, q)] {
                    distinguished = true;
                    break;
                }
                successors.push(index(p, q));
            }

            if distinguished {
                let mut stack = vec![index(i, j)];
                marked[index(i, j)] = true;
                while let Some(pair) = stack.pop() {
                    for dependent in dependents.remove(&pair).unwrap_or_default() {
                        if !marked[dependent] {
                            marked[dependent] = true;
                            stack.push(dependent);
                        }
                    }
                }
            } else {
                for pair in successors {
                    dependents.entry(pair).or_default().push(index(i, j));
                }
            }
        }
    }

    // unmarked pairs form an equivalence relation
    let mut block_of: Vec<Option<StateId>> = vec![None; n];
    let mut block_count = 0;
    for i in 0..n {
        if block_of[i].is_some() {
            continue;
        }
        let block = block_count as StateId;
        block_count += 1;
        block_of[i] = Some(block);
        for j in i + 1..n {
            if !marked[index(i, j)] {
                block_of[j] = Some(block);
            }
        }
    }
    let block_of: Vec<StateId> = block_of.into_iter().map(|b| b.unwrap_or(0)).collect();
    table.quotient(&block_of, block_count)
}

/// Brzozowski's algorithm: determinize the reversal twice.
///
/// Works on nondeterministic input. Every payload becomes `P::default()`.
pub fn brzozowski<P: Payload>(graph: &Graph<P>) -> Graph<P> {
    let (reversed, initials) = reverse(graph);
    let dfa = determinize(&reversed, &initials);
    let (reversed, initials) = reverse(&dfa);
    determinize(&reversed, &initials)
}
