use std::{borrow::Borrow, collections::VecDeque};

use itertools::Itertools;
use owo_colors::OwoColorize;
use tracing::trace;

use crate::{
    math::{OrderedMap, OrderedSet},
    prelude::*,
};

/// A nondeterministic finite automaton. In contrast to a [`Dfa`], a pair of state and symbol may
/// have any number of successors, and states may additionally have empty transitions (labelled
/// with [`Label::Epsilon`]) which can be taken without consuming input.
///
/// A word is accepted if there is at least one way of reading it from the start state which ends
/// in an accepting state. This is simulated by keeping track of the set of all states the automaton
/// may currently be in.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Nfa<Q: State, S: Symbol> {
    states: OrderedSet<Q>,
    alphabet: Alphabet<S>,
    transitions: OrderedMap<Q, OrderedMap<S, OrderedSet<Q>>>,
    epsilon: OrderedMap<Q, OrderedSet<Q>>,
    start: Q,
    accepting: OrderedSet<Q>,
}

impl<Q: State, S: Symbol> Nfa<Q, S> {
    /// Instantiates a new [`AutomatonBuilder`].
    pub fn builder() -> AutomatonBuilder<Q, S> {
        AutomatonBuilder::default()
    }

    /// Creates a new automaton from its constituent parts **without** checking it. Use
    /// [`Nfa::try_from_parts`] or [`Validate::validate`] to make sure the result is well-formed.
    pub fn from_parts(
        states: impl IntoIterator<Item = Q>,
        alphabet: impl IntoIterator<Item = S>,
        transitions: impl IntoIterator<Item = (Q, Label<S>, Q)>,
        start: Q,
        accepting: impl IntoIterator<Item = Q>,
    ) -> Self {
        let mut symbol_moves: OrderedMap<Q, OrderedMap<S, OrderedSet<Q>>> = OrderedMap::new();
        let mut epsilon: OrderedMap<Q, OrderedSet<Q>> = OrderedMap::new();
        for (q, label, p) in transitions {
            match label {
                Label::Symbol(a) => {
                    symbol_moves
                        .entry(q)
                        .or_default()
                        .entry(a)
                        .or_default()
                        .insert(p);
                }
                Label::Epsilon => {
                    epsilon.entry(q).or_default().insert(p);
                }
            }
        }
        Self {
            states: states.into_iter().collect(),
            alphabet: Alphabet::new(alphabet),
            transitions: symbol_moves,
            epsilon,
            start,
            accepting: accepting.into_iter().collect(),
        }
    }

    /// Creates a new automaton from its constituent parts and validates it, see [`Validate`].
    pub fn try_from_parts(
        states: impl IntoIterator<Item = Q>,
        alphabet: impl IntoIterator<Item = S>,
        transitions: impl IntoIterator<Item = (Q, Label<S>, Q)>,
        start: Q,
        accepting: impl IntoIterator<Item = Q>,
    ) -> Result<Self, InvalidAutomaton> {
        let nfa = Self::from_parts(states, alphabet, transitions, start, accepting);
        nfa.validate()?;
        Ok(nfa)
    }

    /// Returns the states in ascending order.
    pub fn states(&self) -> &OrderedSet<Q> {
        &self.states
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns a reference to the alphabet, which never contains the empty word.
    pub fn alphabet(&self) -> &Alphabet<S> {
        &self.alphabet
    }

    /// Returns the start state.
    pub fn start(&self) -> &Q {
        &self.start
    }

    /// Returns the accepting states.
    pub fn accepting(&self) -> &OrderedSet<Q> {
        &self.accepting
    }

    /// Returns true if `state` is accepting.
    pub fn is_accepting(&self, state: &Q) -> bool {
        self.accepting.contains(state)
    }

    /// Returns the successors of `state` under the given label, if there are any.
    pub fn successors(&self, state: &Q, label: &Label<S>) -> Option<&OrderedSet<Q>> {
        match label {
            Label::Symbol(a) => self.symbol_successors(state, a),
            Label::Epsilon => self.epsilon.get(state),
        }
    }

    /// Returns the successors of `state` on `symbol`, if there are any.
    pub fn symbol_successors(&self, state: &Q, symbol: &S) -> Option<&OrderedSet<Q>> {
        self.transitions.get(state)?.get(symbol)
    }

    /// Iterates over all transitions as triples `(origin, label, destination)`, one triple
    /// per destination. Empty transitions come after the transitions on symbols.
    pub fn transitions(&self) -> impl Iterator<Item = (&Q, Label<&S>, &Q)> + '_ {
        let symbols = self.transitions.iter().flat_map(|(q, row)| {
            row.iter()
                .flat_map(move |(a, targets)| targets.iter().map(move |p| (q, Label::Symbol(a), p)))
        });
        let empty = self
            .epsilon
            .iter()
            .flat_map(|(q, targets)| targets.iter().map(move |p| (q, Label::Epsilon, p)));
        symbols.chain(empty)
    }

    /// Returns the number of transitions, counting one for every destination.
    pub fn transition_count(&self) -> usize {
        self.transitions().count()
    }

    /// Returns true if there is at least one empty transition.
    pub fn has_epsilon_transitions(&self) -> bool {
        self.epsilon.values().any(|targets| !targets.is_empty())
    }

    /// Computes the epsilon-closure of the given states, that is the smallest superset which
    /// contains all destinations of empty transitions leaving one of its states. Every state
    /// is enqueued at most once.
    pub fn epsilon_closure<'a, I>(&'a self, states: I) -> OrderedSet<Q>
    where
        I: IntoIterator<Item = &'a Q>,
    {
        let mut closure: OrderedSet<Q> = OrderedSet::new();
        let mut queue: VecDeque<&Q> = VecDeque::new();
        for q in states {
            if closure.insert(q.clone()) {
                queue.push_back(q);
            }
        }
        while let Some(q) = queue.pop_front() {
            for p in self.epsilon.get(q).into_iter().flatten() {
                if closure.insert(p.clone()) {
                    queue.push_back(p);
                }
            }
        }
        closure
    }

    /// Collects the destinations of all transitions on `symbol` leaving one of the `current`
    /// states, without taking the epsilon-closure.
    pub fn move_on(&self, current: &OrderedSet<Q>, symbol: &S) -> OrderedSet<Q> {
        current
            .iter()
            .filter_map(|q| self.symbol_successors(q, symbol))
            .flatten()
            .cloned()
            .collect()
    }

    /// Computes the set of states that the automaton can be in after reading `symbol` from any
    /// of the `current` states, i.e. the epsilon-closure of [`Nfa::move_on`].
    pub fn step(&self, current: &OrderedSet<Q>, symbol: &S) -> OrderedSet<Q> {
        let moved = self.move_on(current, symbol);
        self.epsilon_closure(&moved)
    }

    /// Returns the set of states that the automaton can be in after reading `word`. The set is
    /// empty if a symbol is not in the alphabet or if no run can continue, in which case the
    /// rest of the input is not looked at.
    pub fn reached_states<W>(&self, word: W) -> OrderedSet<Q>
    where
        W: IntoIterator,
        W::Item: Borrow<S>,
    {
        let mut current = self.epsilon_closure([&self.start]);
        for sym in word {
            let sym = sym.borrow();
            if !self.alphabet.contains(sym) {
                trace!("symbol {} is not in the alphabet, rejecting", sym.show());
                return OrderedSet::new();
            }
            current = self.step(&current, sym);
            if current.is_empty() {
                trace!("no run can continue on {}, rejecting", sym.show());
                return current;
            }
        }
        current
    }

    /// Returns whether the automaton accepts the given finite word.
    ///
    /// # Example
    /// ```
    /// use automata_minimizer::prelude::*;
    ///
    /// let nfa = AutomatonBuilder::new()
    ///     .with_transitions([(0, 'a', 0), (0, 'a', 1), (0, 'b', 0), (1, 'b', 2)])
    ///     .with_accepting([2])
    ///     .into_nfa(0)
    ///     .unwrap();
    /// assert!(nfa.accepts("aab".chars()));
    /// assert!(!nfa.accepts("abb".chars()));
    /// ```
    pub fn accepts<W>(&self, word: W) -> bool
    where
        W: IntoIterator,
        W::Item: Borrow<S>,
    {
        self.reached_states(word)
            .iter()
            .any(|q| self.is_accepting(q))
    }

    /// Returns true if every pair of state and symbol has at least one successor.
    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|q| {
            self.alphabet
                .iter()
                .all(|a| self.symbol_successors(q, a).is_some_and(|t| !t.is_empty()))
        })
    }

    /// Returns true if `self` has no empty transitions and at most one successor for every
    /// pair of state and symbol.
    pub fn is_deterministic(&self) -> bool {
        !self.has_epsilon_transitions()
            && self
                .transitions
                .values()
                .all(|row| row.values().all(|targets| targets.len() <= 1))
    }

    /// Returns an equivalent [`Dfa`] with the same states if `self` is deterministic
    /// (see [`Nfa::is_deterministic`]), otherwise `None`.
    pub fn as_deterministic(&self) -> Option<Dfa<Q, S>> {
        if !self.is_deterministic() {
            return None;
        }
        Some(Dfa::from_parts(
            self.states.iter().cloned(),
            self.alphabet.iter().cloned(),
            self.transitions()
                .filter_map(|(q, label, p)| {
                    label.symbol().map(|a| (q.clone(), (*a).clone(), p.clone()))
                })
                .collect::<Vec<_>>(),
            self.start.clone(),
            self.accepting.iter().cloned(),
        ))
    }

    /// Returns a string representation of the transition table, with one column per symbol and
    /// a final column for empty transitions. The start state is marked with `->`, accepting
    /// states are marked with `*`.
    pub fn transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string())
                .chain(self.alphabet.iter().map(|a| a.show()))
                .chain(std::iter::once(EPSILON.to_string())),
        );
        let show_targets = |targets: Option<&OrderedSet<Q>>| match targets {
            Some(targets) if !targets.is_empty() => {
                format!("{{{}}}", targets.iter().map(|p| p.show()).join(","))
            }
            _ => "-".to_string(),
        };
        for q in &self.states {
            let mut name = q.show();
            if self.is_accepting(q) {
                name = format!("*{}", name.bold());
            }
            if q == &self.start {
                name = format!("->{name}");
            }
            let mut row = vec![name];
            for a in &self.alphabet {
                row.push(show_targets(self.symbol_successors(q, a)));
            }
            row.push(show_targets(self.epsilon.get(q)));
            builder.push_record(row);
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl<Q: State, S: Symbol> std::fmt::Display for Nfa<Q, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.transition_table())
    }
}

#[cfg(test)]
mod tests {
    use crate::math::OrderedSet;
    use crate::prelude::*;
    use crate::tests::{a_then_bs, ends_with_ab};

    #[test]
    fn accepts_words_ending_in_ab() {
        let nfa = ends_with_ab();
        for (word, expected) in [
            ("", false),
            ("a", false),
            ("b", false),
            ("ab", true),
            ("aab", true),
            ("abb", false),
            ("abab", true),
            ("baba", false),
        ] {
            assert_eq!(nfa.accepts(word.chars()), expected, "on {word:?}");
        }
    }

    #[test]
    fn epsilon_transitions_are_followed() {
        let nfa = a_then_bs();
        assert!(nfa.has_epsilon_transitions());
        for (word, expected) in [
            ("", false),
            ("a", true),
            ("ab", true),
            ("abb", true),
            ("b", false),
            ("ba", false),
            ("aa", false),
        ] {
            assert_eq!(nfa.accepts(word.chars()), expected, "on {word:?}");
        }
    }

    #[test_log::test]
    fn epsilon_closure_is_transitive() {
        let nfa = AutomatonBuilder::<u32, char>::new()
            .with_epsilon_transitions([(0, 1), (1, 2), (2, 0), (3, 4)])
            .with_transitions([(2, 'a', 3)])
            .into_nfa(0)
            .unwrap();
        assert_eq!(nfa.epsilon_closure([&0]), OrderedSet::from([0, 1, 2]));
        assert_eq!(nfa.epsilon_closure([&3]), OrderedSet::from([3, 4]));
        assert_eq!(nfa.epsilon_closure(Vec::<&u32>::new()), OrderedSet::new());
        assert_eq!(nfa.step(&OrderedSet::from([1]), &'a'), OrderedSet::new());
        assert_eq!(nfa.step(&OrderedSet::from([2]), &'a'), OrderedSet::from([3, 4]));
        assert_eq!(nfa.reached_states("a".chars()), OrderedSet::from([3, 4]));
        assert!(nfa.reached_states("aa".chars()).is_empty());
    }

    #[test]
    fn rejects_unknown_symbols() {
        let nfa = ends_with_ab();
        assert!(!nfa.accepts("acab".chars()));
        assert!(nfa.reached_states("c".chars()).is_empty());
    }

    #[test]
    fn determinism_detection() {
        let nfa = ends_with_ab();
        assert!(!nfa.is_deterministic());
        assert!(nfa.as_deterministic().is_none());
        assert!(!a_then_bs().is_deterministic());

        let det = AutomatonBuilder::new()
            .with_transitions([("p", 'a', "q"), ("q", 'a', "p")])
            .with_accepting(["q"])
            .into_nfa("p")
            .unwrap();
        assert!(det.is_deterministic());
        assert!(det.is_complete());
        let dfa = det.as_deterministic().unwrap();
        assert_eq!(dfa.size(), 2);
        assert!(dfa.accepts("aaa".chars()));
        assert!(!dfa.accepts("aa".chars()));
    }

    #[test]
    fn lists_transitions_per_destination() {
        let nfa = a_then_bs();
        assert_eq!(nfa.transition_count(), 3);
        assert_eq!(ends_with_ab().transition_count(), 4);
        let labels = nfa
            .transitions()
            .map(|(q, label, p)| (*q, label.show(), *p))
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec![
                ("q1", "a".to_string(), "q2"),
                ("q2", "b".to_string(), "q2"),
                ("q0", "lambda".to_string(), "q1"),
            ]
        );
        assert!(nfa.transition_table().contains("{q1}"));
    }
}
