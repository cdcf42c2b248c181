use std::collections::VecDeque;

use tracing::trace;

use crate::{
    math::{Map, OrderedMap, OrderedSet, Partition},
    prelude::*,
};

/// For every symbol (in the order of the alphabet) the index of the block that the successor of
/// `state` belongs to, or `None` if there is no successor. `None` is a value of its own and is
/// never identified with any block.
fn signature<Q: State, S: Symbol>(
    dfa: &Dfa<Q, S>,
    state: &Q,
    block_of: &Map<&Q, usize>,
) -> Vec<Option<usize>> {
    dfa.alphabet()
        .iter()
        .map(|a| {
            dfa.successor(state, a)
                .and_then(|p| block_of.get(p).copied())
        })
        .collect()
}

/// Performs a single round of refinement, splitting every block into the groups of states with
/// the same signature. Groups are ordered by their signature, which makes the outcome
/// independent of any hashing.
fn refine<Q: State, S: Symbol>(dfa: &Dfa<Q, S>, partition: &Partition<Q>) -> Vec<OrderedSet<Q>> {
    let block_of = partition.block_index();
    let mut blocks = Vec::with_capacity(partition.size());
    for block in partition {
        let mut groups: OrderedMap<Vec<Option<usize>>, OrderedSet<Q>> = OrderedMap::new();
        for q in block {
            groups
                .entry(signature(dfa, q, &block_of))
                .or_default()
                .insert(q.clone());
        }
        blocks.extend(groups.into_values());
    }
    blocks
}

/// Moore's algorithm. Starting from the split into accepting and rejecting states among
/// `reachable`, blocks are refined until a round does not split any block. As blocks can only be
/// split, the number of blocks stays the same exactly when the fixed point is reached.
pub(crate) fn moore_partition_refinement<Q: State, S: Symbol>(
    dfa: &Dfa<Q, S>,
    reachable: &OrderedSet<Q>,
) -> Partition<Q> {
    let (accepting, rejecting): (Vec<Q>, Vec<Q>) = reachable
        .iter()
        .cloned()
        .partition(|q| dfa.is_accepting(q));
    let mut partition = Partition::new([accepting, rejecting]);

    let mut round = 0;
    loop {
        round += 1;
        let refined = refine(dfa, &partition);
        trace!(
            "round {round}: {} blocks refined into {}",
            partition.size(),
            refined.len()
        );
        if refined.len() == partition.size() {
            return partition;
        }
        partition = Partition::from(refined);
    }
}

/// The result of turning a partition into an automaton. Blocks are numbered in breadth-first
/// order starting from the block of the start state, exploring symbols in the order of the
/// alphabet.
pub(crate) struct Quotient<Q: State, S: Symbol> {
    pub(crate) dfa: Dfa<usize, S>,
    pub(crate) classes: OrderedMap<Q, usize>,
}

pub(crate) fn quotient<Q: State, S: Symbol>(
    dfa: &Dfa<Q, S>,
    partition: &Partition<Q>,
) -> Quotient<Q, S> {
    let block_of = partition.block_index();
    let representative = |block: usize| partition.get(block).and_then(|b| b.first());

    let mut names: Vec<Option<usize>> = vec![None; partition.size()];
    let mut order: Vec<usize> = Vec::with_capacity(partition.size());
    let mut queue = VecDeque::new();
    if let Some(&initial) = block_of.get(dfa.start()) {
        names[initial] = Some(0);
        order.push(initial);
        queue.push_back(initial);
    }
    while let Some(block) = queue.pop_front() {
        let Some(q) = representative(block) else {
            continue;
        };
        for (_, p) in dfa.edges_from(q) {
            if let Some(&next) = block_of.get(p) {
                if names[next].is_none() {
                    names[next] = Some(order.len());
                    order.push(next);
                    queue.push_back(next);
                }
            }
        }
    }

    let mut transitions = vec![];
    let mut accepting = vec![];
    for (name, &block) in order.iter().enumerate() {
        let Some(q) = representative(block) else {
            continue;
        };
        if dfa.is_accepting(q) {
            accepting.push(name);
        }
        // all members of a block agree on their successor blocks
        for (a, p) in dfa.edges_from(q) {
            if let Some(target) = block_of.get(p).and_then(|&b| names[b]) {
                transitions.push((name, a.clone(), target));
            }
        }
    }

    let classes = block_of
        .iter()
        .filter_map(|(q, &block)| names[block].map(|name| ((*q).clone(), name)))
        .collect();

    Quotient {
        dfa: Dfa::from_parts(
            0..order.len(),
            dfa.alphabet().iter().cloned(),
            transitions,
            0,
            accepting,
        ),
        classes,
    }
}

#[cfg(test)]
mod tests {
    use super::moore_partition_refinement;
    use crate::{math::Partition, tests::wiki_dfa};

    #[test]
    fn refines_wiki_automaton() {
        let dfa = wiki_dfa();
        let partition = moore_partition_refinement(&dfa, &dfa.reachable_states());
        assert_eq!(
            partition,
            Partition::new([vec![0, 1], vec![2, 3, 4], vec![5]])
        );
    }
}
