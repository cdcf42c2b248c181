use std::collections::VecDeque;

use bit_set::BitSet;
use tracing::{debug, trace};

use crate::{
    math::{Bijection, Map, OrderedSet},
    prelude::*,
};

mod subset;
pub use subset::Subset;

/// The result of [`determinize_with_summary`], a deterministic automaton together with
/// information for reporting purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Determinization<Q: State, S: Symbol> {
    /// The determinized automaton.
    pub dfa: Dfa<Subset<Q>, S>,
    /// How the number of states changed.
    pub summary: TransformSummary,
    /// Whether the input had empty transitions which had to be eliminated.
    pub had_epsilon: bool,
}

impl<Q: State, S: Symbol> Nfa<Q, S> {
    /// Converts `self` into a [`Dfa`] that accepts the same language, using the subset
    /// construction. Only subsets that are reachable from the epsilon-closure of the start state
    /// are constructed. If a subset has no successor on some symbol, the transition is left
    /// undefined instead of leading into an explicit sink state, so the result may be incomplete.
    ///
    /// Fails if `self` has no states, has an empty alphabet or if its start state is not one of
    /// its states. Transitions leading to unknown states are ignored, use [`Validate`] to catch
    /// these beforehand.
    ///
    /// # Example
    /// ```
    /// use automata_minimizer::prelude::*;
    ///
    /// let nfa = AutomatonBuilder::new()
    ///     .with_transitions([("q0", 'a', "q0"), ("q0", 'a', "q1"), ("q0", 'b', "q0"), ("q1", 'b', "q2")])
    ///     .with_accepting(["q2"])
    ///     .into_nfa("q0")
    ///     .unwrap();
    /// let dfa = nfa.determinize().unwrap();
    /// assert_eq!(dfa.size(), 3);
    /// assert_eq!(dfa.start().show(), "{q0}");
    /// assert!(dfa.accepts("aab".chars()));
    /// ```
    pub fn determinize(&self) -> Result<Dfa<Subset<Q>, S>, InvalidAutomaton> {
        subset_construction(self)
    }
}

/// Converts `nfa` into an equivalent [`Dfa`], see [`Nfa::determinize`].
pub fn determinize<Q: State, S: Symbol>(
    nfa: &Nfa<Q, S>,
) -> Result<Dfa<Subset<Q>, S>, InvalidAutomaton> {
    subset_construction(nfa)
}

/// Works like [`determinize`] but additionally produces a [`TransformSummary`].
pub fn determinize_with_summary<Q: State, S: Symbol>(
    nfa: &Nfa<Q, S>,
) -> Result<Determinization<Q, S>, InvalidAutomaton> {
    let dfa = subset_construction(nfa)?;
    let summary = TransformSummary::new(Operation::Determinize, nfa.size(), dfa.size());
    debug!("{summary}");
    Ok(Determinization {
        dfa,
        summary,
        had_epsilon: nfa.has_epsilon_transitions(),
    })
}

fn check_preconditions<Q: State, S: Symbol>(nfa: &Nfa<Q, S>) -> Result<(), InvalidAutomaton> {
    if nfa.states().is_empty() {
        return Err(InvalidAutomaton::NoStates);
    }
    if nfa.alphabet().is_empty() {
        return Err(InvalidAutomaton::EmptyAlphabet);
    }
    if !nfa.states().contains(nfa.start()) {
        return Err(InvalidAutomaton::UnknownStart(nfa.start().show()));
    }
    Ok(())
}

/// Computes the epsilon-closure of `set`, where `epsilon[i]` contains the indices of all
/// destinations of empty transitions leaving state `i`.
fn close(mut set: BitSet, epsilon: &[BitSet]) -> BitSet {
    let mut queue: Vec<usize> = set.iter().collect();
    while let Some(i) = queue.pop() {
        for j in &epsilon[i] {
            if set.insert(j) {
                queue.push(j);
            }
        }
    }
    set
}

/// The subset construction. States of `nfa` are identified with their position in the sorted
/// set of states, so that sets of states become [`BitSet`]s. Every newly discovered set is
/// assigned the next free integer, and the arena maps back and forth between both.
fn subset_construction<Q: State, S: Symbol>(
    nfa: &Nfa<Q, S>,
) -> Result<Dfa<Subset<Q>, S>, InvalidAutomaton> {
    check_preconditions(nfa)?;

    let states: Vec<&Q> = nfa.states().iter().collect();
    let position: Map<&Q, usize> = states.iter().enumerate().map(|(i, q)| (*q, i)).collect();
    let symbols: Vec<&S> = nfa.alphabet().iter().collect();
    let to_bits = |targets: Option<&OrderedSet<Q>>| -> BitSet {
        targets
            .into_iter()
            .flatten()
            .filter_map(|p| position.get(p).copied())
            .collect()
    };

    // moves[i][k] contains the successors of state i on the k-th symbol
    let moves: Vec<Vec<BitSet>> = states
        .iter()
        .map(|q| {
            symbols
                .iter()
                .map(|a| to_bits(nfa.symbol_successors(q, a)))
                .collect()
        })
        .collect();
    let epsilon: Vec<BitSet> = states
        .iter()
        .map(|q| to_bits(nfa.successors(q, &Label::Epsilon)))
        .collect();

    let start = position
        .get(nfa.start())
        .copied()
        .ok_or_else(|| InvalidAutomaton::UnknownStart(nfa.start().show()))?;
    let initial = close(BitSet::from_iter([start]), &epsilon);

    let mut arena: Bijection<usize, BitSet> = Bijection::from_iter([(0, initial)]);
    let mut queue = VecDeque::from([0usize]);
    let mut edges: Vec<(usize, usize, usize)> = Vec::new();

    while let Some(id) = queue.pop_front() {
        let Some(current) = arena.get_by_left(&id).cloned() else {
            continue;
        };
        for (k, sym) in symbols.iter().enumerate() {
            let mut moved = BitSet::with_capacity(states.len());
            for i in &current {
                moved.union_with(&moves[i][k]);
            }
            let target = close(moved, &epsilon);
            if target.is_empty() {
                continue;
            }
            let target_id = match arena.get_by_right(&target) {
                Some(&known) => known,
                None => {
                    let fresh = arena.len();
                    trace!("discovered subset {fresh} on {} from {id}", sym.show());
                    arena.insert(fresh, target);
                    queue.push_back(fresh);
                    fresh
                }
            };
            edges.push((id, k, target_id));
        }
    }

    let subsets: Vec<Subset<Q>> = arena
        .iter()
        .map(|(_, bits)| bits.iter().map(|i| states[i].clone()).collect())
        .collect();
    let accepting: Vec<Subset<Q>> = subsets
        .iter()
        .filter(|subset| subset.iter().any(|q| nfa.is_accepting(q)))
        .cloned()
        .collect();
    let transitions: Vec<(Subset<Q>, S, Subset<Q>)> = edges
        .into_iter()
        .map(|(from, k, to)| (subsets[from].clone(), symbols[k].clone(), subsets[to].clone()))
        .collect();
    debug!(
        "subset construction turned {} states into {}",
        nfa.size(),
        subsets.len()
    );

    Ok(Dfa::from_parts(
        subsets.iter().cloned(),
        symbols.into_iter().cloned(),
        transitions,
        subsets[0].clone(),
        accepting,
    ))
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::{a_then_bs, ends_with_ab, words_up_to};

    #[test]
    fn determinizes_words_ending_in_ab() {
        let nfa = ends_with_ab();
        let dfa = nfa.determinize().unwrap();
        for (word, expected) in [("ab", true), ("aab", true), ("abb", false), ("", false)] {
            assert_eq!(dfa.accepts(word.chars()), expected, "on {word:?}");
        }
        assert_eq!(
            dfa.states().iter().map(|q| q.show()).collect::<Vec<_>>(),
            vec!["{q0}", "{q0,q1}", "{q0,q2}"]
        );
        assert_eq!(dfa.start().show(), "{q0}");
        assert_eq!(dfa.accepting().len(), 1);
        assert!(dfa.is_complete());
        assert!(dfa.validate().is_ok());
    }

    #[test_log::test]
    fn eliminates_epsilon_transitions() {
        let nfa = a_then_bs();
        let result = determinize_with_summary(&nfa).unwrap();
        assert!(result.had_epsilon);
        assert_eq!(result.summary.states_before, 3);
        assert_eq!(result.summary.states_after, 2);

        let dfa = result.dfa;
        assert_eq!(dfa.start().show(), "{q0,q1}");
        // the empty subset never becomes a state
        assert!(!dfa.is_complete());
        assert_eq!(dfa.transition_count(), 2);
        for word in words_up_to(&['a', 'b'], 5) {
            assert_eq!(nfa.accepts(&word), dfa.accepts(&word), "on {word:?}");
        }
    }

    #[test]
    fn accepting_start_closure() {
        let nfa = AutomatonBuilder::<u32, char>::new()
            .with_epsilon_transitions([(0, 1)])
            .with_transitions([(1, 'a', 0)])
            .with_accepting([1])
            .into_nfa(0)
            .unwrap();
        let dfa = determinize(&nfa).unwrap();
        assert_eq!(dfa.size(), 1);
        assert!(dfa.accepts("".chars()));
        assert!(dfa.accepts("aaa".chars()));
    }

    #[test]
    fn conversion_is_reproducible() {
        let nfa = ends_with_ab();
        let first = nfa.determinize().unwrap();
        let second = nfa.clone().determinize().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.transition_table(), second.transition_table());
    }

    #[test]
    fn preconditions() {
        let empty: Nfa<u32, char> = Nfa::from_parts([], ['a'], [], 0, []);
        assert_eq!(empty.determinize(), Err(InvalidAutomaton::NoStates));

        let no_symbols: Nfa<u32, char> = Nfa::from_parts([0], [], [], 0, [0]);
        assert_eq!(no_symbols.determinize(), Err(InvalidAutomaton::EmptyAlphabet));

        let bad_start: Nfa<u32, char> = Nfa::from_parts([0], ['a'], [], 3, [0]);
        assert_eq!(
            bad_start.determinize(),
            Err(InvalidAutomaton::UnknownStart("3".into()))
        );
    }

    #[cfg(feature = "random")]
    #[test]
    fn random_automata_keep_their_language() {
        for seed in 0..20 {
            let nfa = crate::random::random_nfa(5, 2, 0.3, 0.1, seed);
            let dfa = nfa.determinize().unwrap();
            for word in words_up_to(&['a', 'b'], 6) {
                assert_eq!(
                    nfa.accepts(&word),
                    dfa.accepts(&word),
                    "seed {seed} on {word:?}"
                );
            }
        }
    }
}
