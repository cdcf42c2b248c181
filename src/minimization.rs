pub(crate) mod partition_refinement;

use tracing::debug;

use crate::{
    math::{OrderedMap, Partition},
    prelude::*,
};

/// The result of [`minimize_with_summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minimization<Q: State, S: Symbol> {
    /// The minimal automaton.
    pub dfa: Dfa<usize, S>,
    /// How the number of states changed.
    pub summary: TransformSummary,
    /// Sends every state of the input that is reachable from its start state to the state of the
    /// minimal automaton which it was merged into.
    pub classes: OrderedMap<Q, usize>,
}

/// The result of [`Automaton::reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction<S: Symbol> {
    /// The minimal deterministic automaton.
    pub dfa: Dfa<usize, S>,
    /// Present if the input was nondeterministic and had to be determinized first.
    pub determinization: Option<TransformSummary>,
    /// Summary of the minimization step.
    pub minimization: TransformSummary,
}

impl<Q: State, S: Symbol> Dfa<Q, S> {
    /// Computes the unique minimal [`Dfa`] that accepts the same language as `self`. First, all
    /// states that are not reachable from the start state are removed. Then the remaining
    /// states are merged through partition refinement (Moore's algorithm), where a missing
    /// transition is distinguished from every existing one. No sink state is introduced, so the
    /// result is complete if and only if the trimmed input is.
    ///
    /// The states of the result are numbered from `0`, which is the start state, in the order in
    /// which a breadth-first search over the alphabet discovers them. Consequently, two minimized
    /// automata over the same alphabet accept the same language if and only if they are equal.
    ///
    /// Fails if `self` has no states or if its start state is not one of its states.
    ///
    /// # Example
    /// ```
    /// use automata_minimizer::prelude::*;
    ///
    /// let dfa = AutomatonBuilder::new()
    ///     .with_transitions([(0, 'a', 1), (1, 'a', 2), (2, 'a', 1)])
    ///     .with_accepting([1])
    ///     .into_dfa(0)
    ///     .unwrap();
    /// let minimal = dfa.minimize().unwrap();
    /// // states 0 and 2 are merged
    /// assert_eq!(minimal.size(), 2);
    /// assert!(minimal.accepts("aaa".chars()));
    /// ```
    pub fn minimize(&self) -> Result<Dfa<usize, S>, InvalidAutomaton> {
        minimize_with_summary(self).map(|minimization| minimization.dfa)
    }
}

/// Computes the minimal automaton for `dfa`, see [`Dfa::minimize`].
pub fn minimize<Q: State, S: Symbol>(dfa: &Dfa<Q, S>) -> Result<Dfa<usize, S>, InvalidAutomaton> {
    dfa.minimize()
}

/// Works like [`minimize`] but additionally returns a [`TransformSummary`] and the table that
/// assigns every reachable state to its equivalence class.
pub fn minimize_with_summary<Q: State, S: Symbol>(
    dfa: &Dfa<Q, S>,
) -> Result<Minimization<Q, S>, InvalidAutomaton> {
    if dfa.states().is_empty() {
        return Err(InvalidAutomaton::NoStates);
    }
    if !dfa.states().contains(dfa.start()) {
        return Err(InvalidAutomaton::UnknownStart(dfa.start().show()));
    }

    let reachable = dfa.reachable_states();
    if reachable.len() < dfa.size() {
        debug!(
            "pruning {} unreachable states",
            dfa.size() - reachable.len()
        );
    }
    let partition = partition_refinement::moore_partition_refinement(dfa, &reachable);
    let quotient = partition_refinement::quotient(dfa, &partition);

    let summary = TransformSummary::new(Operation::Minimize, dfa.size(), quotient.dfa.size());
    debug!("{summary}");
    Ok(Minimization {
        dfa: quotient.dfa,
        summary,
        classes: quotient.classes,
    })
}

/// Decides whether `left` and `right` are equivalent with respect to `partition`, which is the
/// case if on every symbol their successors lie in the same block or both are missing. A
/// partition of the states of `dfa` is stable exactly if all states in the same block are
/// equivalent with respect to it.
pub fn are_equivalent<Q: State, S: Symbol>(
    dfa: &Dfa<Q, S>,
    left: &Q,
    right: &Q,
    partition: &Partition<Q>,
) -> bool {
    dfa.alphabet().iter().all(|a| {
        let l = dfa.successor(left, a).map(|p| partition.block_of(p));
        let r = dfa.successor(right, a).map(|p| partition.block_of(p));
        l == r
    })
}

impl<Q: State, S: Symbol> Automaton<Q, S> {
    /// Produces the minimal deterministic automaton for the accepted language. A
    /// nondeterministic automaton is determinized first.
    pub fn reduce(&self) -> Result<Reduction<S>, InvalidAutomaton> {
        match self {
            Automaton::Deterministic(dfa) => {
                let minimization = minimize_with_summary(dfa)?;
                Ok(Reduction {
                    dfa: minimization.dfa,
                    determinization: None,
                    minimization: minimization.summary,
                })
            }
            Automaton::Nondeterministic(nfa) => {
                let determinization = determinize_with_summary(nfa)?;
                let minimization = minimize_with_summary(&determinization.dfa)?;
                Ok(Reduction {
                    dfa: minimization.dfa,
                    determinization: Some(determinization.summary),
                    minimization: minimization.summary,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::math::Partition;
    use crate::prelude::*;
    use crate::tests::{ends_with_ab, ends_with_b, wiki_dfa, words_up_to};

    /// Four states, where `q3` behaves exactly like the accepting state `q1`.
    fn redundant() -> Dfa<&'static str, char> {
        AutomatonBuilder::new()
            .with_transitions([
                ("q0", 'a', "q1"),
                ("q0", 'b', "q2"),
                ("q1", 'a', "q1"),
                ("q1", 'b', "q2"),
                ("q2", 'a', "q3"),
                ("q3", 'a', "q1"),
                ("q3", 'b', "q2"),
            ])
            .with_accepting(["q1", "q3"])
            .into_dfa("q0")
            .unwrap()
    }

    #[test_log::test]
    fn merges_equivalent_states() {
        let dfa = redundant();
        let result = minimize_with_summary(&dfa).unwrap();
        assert_eq!(result.dfa.size(), 3);
        assert_eq!(result.dfa.start(), &0);
        assert_eq!(result.classes[&"q0"], 0);
        assert_eq!(result.classes[&"q1"], result.classes[&"q3"]);
        assert_ne!(result.classes[&"q0"], result.classes[&"q2"]);
        assert!((result.summary.reduction_percentage() - 25.0).abs() < 1e-9);
        for word in words_up_to(&['a', 'b'], 6) {
            assert_eq!(dfa.accepts(&word), result.dfa.accepts(&word), "on {word:?}");
        }
    }

    #[test]
    fn drops_unreachable_states() {
        let dfa = AutomatonBuilder::new()
            .with_transitions([
                ("q0", 'a', "q0"),
                ("q0", 'b', "q1"),
                ("q1", 'a', "q0"),
                ("q1", 'b', "q1"),
                ("q2", 'a', "q0"),
            ])
            .with_accepting(["q1", "q2"])
            .into_dfa("q0")
            .unwrap();
        let result = minimize_with_summary(&dfa).unwrap();
        assert_eq!(result.dfa.size(), 2);
        assert!(!result.classes.contains_key(&"q2"));
        assert_eq!(result.dfa, ends_with_b().minimize().unwrap());
    }

    #[test]
    fn minimizes_wiki_automaton() {
        let minimal = wiki_dfa().minimize().unwrap();
        let expected = Dfa::from_parts(
            [0, 1, 2],
            ['a', 'b'],
            [
                (0, 'a', 0),
                (0, 'b', 1),
                (1, 'a', 1),
                (1, 'b', 2),
                (2, 'a', 2),
                (2, 'b', 2),
            ],
            0,
            [1],
        );
        assert_eq!(minimal, expected);
        assert!(minimal.equivalent(&wiki_dfa()));
    }

    #[test]
    fn minimization_is_idempotent() {
        for dfa in [wiki_dfa().minimize().unwrap(), redundant().minimize().unwrap()] {
            let again = dfa.minimize().unwrap();
            assert_eq!(again.size(), dfa.size());
            assert_eq!(again, dfa);
        }
    }

    #[test]
    fn minimal_automata_are_canonical() {
        // a larger automaton for words ending in `b` that keeps track of the last two symbols
        let verbose = AutomatonBuilder::new()
            .with_transitions([
                ("aa", 'a', "aa"),
                ("aa", 'b', "ab"),
                ("ab", 'a', "ba"),
                ("ab", 'b', "bb"),
                ("ba", 'a', "aa"),
                ("ba", 'b', "ab"),
                ("bb", 'a', "ba"),
                ("bb", 'b', "bb"),
            ])
            .with_accepting(["ab", "bb"])
            .into_dfa("aa")
            .unwrap();
        let canonical = ends_with_b().minimize().unwrap();
        assert_eq!(verbose.minimize().unwrap(), canonical);
        assert_eq!(
            ends_with_b()
                .map_states(|q| q.to_uppercase())
                .minimize()
                .unwrap(),
            canonical
        );
    }

    #[test]
    fn missing_transitions_are_not_merged_with_blocks() {
        let dfa = AutomatonBuilder::new()
            .with_transitions([(0u32, 'a', 1)])
            .into_dfa(0)
            .unwrap();
        let minimal = dfa.minimize().unwrap();
        assert_eq!(minimal.size(), 2);
        assert_eq!(minimal.transition_count(), 1);
        assert!(!minimal.is_complete());
    }

    #[test]
    fn equivalence_relative_to_a_partition() {
        let dfa = wiki_dfa();
        let coarse = Partition::new([vec![0, 1, 5], vec![2, 3, 4]]);
        assert!(are_equivalent(&dfa, &0, &1, &coarse));
        assert!(!are_equivalent(&dfa, &0, &5, &coarse));
        assert!(are_equivalent(&dfa, &2, &4, &coarse));

        let partial = AutomatonBuilder::new()
            .with_transitions([(0u32, 'a', 0), (1, 'b', 1)])
            .into_dfa(0)
            .unwrap();
        let single = Partition::new([vec![0, 1]]);
        assert!(!are_equivalent(&partial, &0, &1, &single));
        assert!(are_equivalent(&partial, &0, &0, &single));
    }

    #[test]
    fn preconditions() {
        let empty: Dfa<u32, char> = Dfa::from_parts([], ['a'], [], 0, []);
        assert_eq!(empty.minimize(), Err(InvalidAutomaton::NoStates));
        let bad_start: Dfa<u32, char> = Dfa::from_parts([0, 1], ['a'], [], 2, []);
        assert_eq!(
            minimize(&bad_start),
            Err(InvalidAutomaton::UnknownStart("2".into()))
        );
    }

    #[test]
    fn reduces_either_kind() {
        let reduction = Automaton::from(ends_with_ab()).reduce().unwrap();
        let determinization = reduction.determinization.unwrap();
        assert_eq!(determinization.states_before, 3);
        assert_eq!(determinization.states_after, 3);
        assert_eq!(reduction.minimization.states_after, 3);
        assert!(reduction.dfa.accepts("aab".chars()));
        assert!(!reduction.dfa.accepts("aba".chars()));

        let reduction = Automaton::from(wiki_dfa()).reduce().unwrap();
        assert!(reduction.determinization.is_none());
        assert_eq!(reduction.dfa.size(), 3);
    }

    #[test]
    fn minimizes_concurrently() {
        let dfa = wiki_dfa();
        let results = std::thread::scope(|scope| {
            let handles = (0..4)
                .map(|_| scope.spawn(|| dfa.minimize().unwrap()))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect::<Vec<_>>()
        });
        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(results[0].size(), 3);
    }

    #[cfg(feature = "random")]
    #[test]
    fn random_automata_keep_their_language() {
        for seed in 0..20 {
            let dfa = crate::random::random_dfa(8, 2, 0.9, seed);
            let minimal = dfa.minimize().unwrap();
            assert!(minimal.size() <= dfa.size());
            assert!(minimal.equivalent(&dfa), "seed {seed}");
            for word in words_up_to(&['a', 'b'], 6) {
                assert_eq!(dfa.accepts(&word), minimal.accepts(&word), "seed {seed} on {word:?}");
            }
            assert_eq!(minimal.minimize().unwrap(), minimal);
        }
    }
}
