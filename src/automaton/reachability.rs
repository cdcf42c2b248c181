use std::collections::VecDeque;

use tracing::trace;

use crate::{
    math::{OrderedSet, Set},
    prelude::*,
};

/// Iterator over the minimal representatives of the states of a [`Dfa`] that are reachable from
/// its start state. A minimal representative of a state `q` is the length-lexicographically
/// minimal word with which `q` can be reached. States are produced in breadth-first order, so
/// the start state always comes first (with the empty word as its representative).
#[derive(Debug, Clone)]
pub struct MinimalRepresentatives<'a, Q: State, S: Symbol> {
    dfa: &'a Dfa<Q, S>,
    seen: Set<&'a Q>,
    queue: VecDeque<(Vec<S>, &'a Q)>,
}

impl<'a, Q: State, S: Symbol> MinimalRepresentatives<'a, Q, S> {
    /// Starts the search in the start state of `dfa`.
    pub fn new(dfa: &'a Dfa<Q, S>) -> Self {
        let origin = dfa.start();
        Self {
            dfa,
            seen: Set::from_iter([origin]),
            queue: [(vec![], origin)].into_iter().collect(),
        }
    }
}

impl<'a, Q: State, S: Symbol> Iterator for MinimalRepresentatives<'a, Q, S> {
    type Item = (Vec<S>, &'a Q);

    fn next(&mut self) -> Option<Self::Item> {
        let (access, q) = self.queue.pop_front()?;
        for sym in self.dfa.alphabet() {
            if let Some(p) = self.dfa.successor(q, sym) {
                if self.seen.insert(p) {
                    let mut extended = access.clone();
                    extended.push(sym.clone());
                    self.queue.push_back((extended, p));
                }
            }
        }
        Some((access, q))
    }
}

impl<Q: State, S: Symbol> Dfa<Q, S> {
    /// Returns an iterator over the reachable states together with their minimal
    /// representatives, see [`MinimalRepresentatives`].
    pub fn minimal_representatives(&self) -> MinimalRepresentatives<'_, Q, S> {
        MinimalRepresentatives::new(self)
    }

    /// Computes the set of states that are reachable from the start state through a breadth-first
    /// traversal. The start state is always part of the result, and no state outside of it can
    /// influence which words are accepted.
    pub fn reachable_states(&self) -> OrderedSet<Q> {
        self.minimal_representatives()
            .map(|(_, q)| q.clone())
            .collect()
    }

    /// Returns the length-lexicographically minimal accepted word, or `None` if the accepted
    /// language is empty.
    pub fn shortest_accepted_word(&self) -> Option<Vec<S>> {
        self.minimal_representatives()
            .find_map(|(word, q)| self.is_accepting(q).then_some(word))
    }

    /// Returns true if and only if the accepted language is empty.
    pub fn is_empty_language(&self) -> bool {
        self.shortest_accepted_word().is_none()
    }

    /// Attempts to find a word that is accepted by exactly one of `self` and `other`. The search
    /// explores pairs of states breadth-first over the union of both alphabets, where a missing
    /// transition (or a symbol outside of one alphabet) leads into an implicit rejecting sink.
    /// Returns a shortest such word, or `None` if the two automata accept the same language.
    pub fn separating_word<P: State>(&self, other: &Dfa<P, S>) -> Option<Vec<S>> {
        let symbols = self.alphabet().union(other.alphabet());
        let accepting =
            |(l, r): (Option<&Q>, Option<&P>)| -> (bool, bool) {
                (
                    l.is_some_and(|q| self.is_accepting(q)),
                    r.is_some_and(|p| other.is_accepting(p)),
                )
            };

        let origin = (Some(self.start()), Some(other.start()));
        let mut seen: Set<(Option<&Q>, Option<&P>)> = Set::from_iter([origin]);
        let mut queue = VecDeque::from([(Vec::new(), origin)]);

        while let Some((word, pair)) = queue.pop_front() {
            let (left, right) = accepting(pair);
            if left != right {
                trace!("found separating word of length {}", word.len());
                return Some(word);
            }
            for sym in &symbols {
                let next = (
                    pair.0.and_then(|q| self.successor(q, sym)),
                    pair.1.and_then(|p| other.successor(p, sym)),
                );
                if next == (None, None) {
                    continue;
                }
                if seen.insert(next) {
                    let mut extended = word.clone();
                    extended.push(sym.clone());
                    queue.push_back((extended, next));
                }
            }
        }
        None
    }

    /// Checks whether `self` and `other` accept the same language, see
    /// [`Dfa::separating_word`].
    pub fn equivalent<P: State>(&self, other: &Dfa<P, S>) -> bool {
        self.separating_word(other).is_none()
    }
}

impl<Q: State, S: Symbol> Nfa<Q, S> {
    /// Computes the set of states that are reachable from the start state, following transitions
    /// on symbols as well as empty transitions. The result is the union of all sets of states that
    /// the automaton can be in after reading some word, in particular it contains the
    /// epsilon-closure of the start state.
    pub fn reachable_states(&self) -> OrderedSet<Q> {
        let initial = self.epsilon_closure([self.start()]);
        let mut queue: VecDeque<Q> = initial.iter().cloned().collect();
        let mut reachable = initial;
        while let Some(q) = queue.pop_front() {
            let single = OrderedSet::from([q]);
            for sym in self.alphabet() {
                for p in self.step(&single, sym) {
                    if !reachable.contains(&p) {
                        reachable.insert(p.clone());
                        queue.push_back(p);
                    }
                }
            }
        }
        reachable
    }
}

#[cfg(test)]
mod tests {
    use crate::math::OrderedSet;
    use crate::prelude::*;
    use crate::tests::{a_then_bs, ends_with_b, wiki_dfa};

    #[test]
    fn reachable_states() {
        let dfa = AutomatonBuilder::new()
            .with_transitions([(0u32, 'a', 1), (1, 'b', 2), (3, 'a', 0), (4, 'a', 4)])
            .into_dfa(0)
            .unwrap();
        assert_eq!(dfa.reachable_states(), OrderedSet::from([0, 1, 2]));

        let lonely: Dfa<u32, char> = Dfa::from_parts([0, 1], ['a'], [], 0, [1]);
        assert_eq!(lonely.reachable_states(), OrderedSet::from([0]));
    }

    #[test]
    fn every_reachable_state_has_an_access_word() {
        let dfa = wiki_dfa();
        let reachable = dfa.reachable_states();
        for (word, q) in dfa.minimal_representatives() {
            assert_eq!(dfa.reached_state(&word), Some(q));
            assert!(reachable.contains(q));
        }
        // exhaustively check that nothing outside is reachable
        for word in crate::tests::words_up_to(&['a', 'b'], dfa.size()) {
            if let Some(q) = dfa.reached_state(&word) {
                assert!(reachable.contains(q));
            }
        }
    }

    #[test]
    fn minimal_representatives_are_minimal() {
        let reps = wiki_dfa()
            .minimal_representatives()
            .map(|(word, q)| (word.into_iter().collect::<String>(), *q))
            .collect::<Vec<_>>();
        assert_eq!(
            reps,
            vec![
                ("".to_string(), 0),
                ("a".to_string(), 1),
                ("b".to_string(), 2),
                ("ab".to_string(), 3),
                ("ba".to_string(), 4),
                ("bb".to_string(), 5),
            ]
        );
    }

    #[test]
    fn nondeterministic_reachability() {
        let nfa = AutomatonBuilder::<u32, char>::new()
            .with_epsilon_transitions([(0, 1)])
            .with_transitions([(1, 'a', 2), (3, 'a', 0), (2, 'b', 4)])
            .with_epsilon_transitions([(4, 5)])
            .into_nfa(0)
            .unwrap();
        assert_eq!(nfa.reachable_states(), OrderedSet::from([0, 1, 2, 4, 5]));
        assert_eq!(a_then_bs().reachable_states().len(), 3);
    }

    #[test]
    fn shortest_words_and_emptiness() {
        let dfa = ends_with_b();
        assert_eq!(dfa.shortest_accepted_word(), Some(vec!['b']));
        assert!(!dfa.is_empty_language());

        let empty = AutomatonBuilder::new()
            .with_transitions([("q0", 'a', "q0")])
            .with_states(["q0", "q1"])
            .with_accepting(["q1"])
            .into_dfa("q0")
            .unwrap();
        assert!(empty.is_empty_language());
    }

    #[test]
    fn separating_words() {
        let dfa = ends_with_b();
        assert!(dfa.equivalent(&dfa));
        assert!(dfa.equivalent(&dfa.map_states(|q| q.to_uppercase())));

        // accepts words ending with `a` instead
        let other = AutomatonBuilder::new()
            .with_transitions([(0u32, 'a', 1), (0, 'b', 0), (1, 'a', 1), (1, 'b', 0)])
            .with_accepting([1])
            .into_dfa(0)
            .unwrap();
        let word = dfa.separating_word(&other).unwrap();
        assert_eq!(word.len(), 1);
        assert_ne!(dfa.accepts(&word), other.accepts(&word));

        // a partial automaton for the same language as the complete one
        let partial = AutomatonBuilder::new()
            .with_transitions([(0u32, 'a', 0), (0, 'b', 1), (1, 'b', 1), (1, 'a', 0)])
            .with_accepting([1])
            .into_dfa(0)
            .unwrap();
        assert!(dfa.equivalent(&partial));

        let only_a = AutomatonBuilder::new()
            .with_transitions([(0u32, 'a', 0)])
            .with_accepting([0])
            .into_dfa(0)
            .unwrap();
        assert_eq!(dfa.separating_word(&only_a), Some(vec![]));
    }
}
