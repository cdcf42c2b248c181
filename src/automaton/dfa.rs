use std::borrow::Borrow;

use owo_colors::OwoColorize;
use tracing::trace;

use crate::{
    math::{OrderedMap, OrderedSet, Set},
    prelude::*,
};

/// A deterministic finite automaton. It consists of a set of states, an [`Alphabet`], a partial
/// transition function, a start state and a set of accepting states. A word is accepted if reading
/// it from the start state never hits a missing transition and ends in an accepting state.
///
/// Instances are never mutated by any of the operations in this crate, determinization and
/// minimization return new automata.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Dfa<Q: State, S: Symbol> {
    states: OrderedSet<Q>,
    alphabet: Alphabet<S>,
    transitions: OrderedMap<Q, OrderedMap<S, Q>>,
    start: Q,
    accepting: OrderedSet<Q>,
}

impl<Q: State, S: Symbol> Dfa<Q, S> {
    /// Instantiates a new [`AutomatonBuilder`].
    pub fn builder() -> AutomatonBuilder<Q, S> {
        AutomatonBuilder::default()
    }

    /// Creates a new automaton from its constituent parts **without** checking it. If two
    /// transitions leave the same state on the same symbol, the latter one wins. Use
    /// [`Dfa::try_from_parts`] or [`Validate::validate`] to make sure the result is well-formed.
    pub fn from_parts(
        states: impl IntoIterator<Item = Q>,
        alphabet: impl IntoIterator<Item = S>,
        transitions: impl IntoIterator<Item = (Q, S, Q)>,
        start: Q,
        accepting: impl IntoIterator<Item = Q>,
    ) -> Self {
        let mut map: OrderedMap<Q, OrderedMap<S, Q>> = OrderedMap::new();
        for (q, a, p) in transitions {
            map.entry(q).or_default().insert(a, p);
        }
        Self {
            states: states.into_iter().collect(),
            alphabet: Alphabet::new(alphabet),
            transitions: map,
            start,
            accepting: accepting.into_iter().collect(),
        }
    }

    /// Creates a new automaton from its constituent parts and validates it. Fails if two
    /// transitions leave the same state on the same symbol towards different states, or if
    /// the result violates one of the checks of [`Validate`].
    pub fn try_from_parts(
        states: impl IntoIterator<Item = Q>,
        alphabet: impl IntoIterator<Item = S>,
        transitions: impl IntoIterator<Item = (Q, S, Q)>,
        start: Q,
        accepting: impl IntoIterator<Item = Q>,
    ) -> Result<Self, InvalidAutomaton> {
        let mut map: OrderedMap<Q, OrderedMap<S, Q>> = OrderedMap::new();
        for (q, a, p) in transitions {
            let row = map.entry(q.clone()).or_default();
            match row.get(&a) {
                Some(existing) if existing != &p => {
                    return Err(InvalidAutomaton::Nondeterministic {
                        state: q.show(),
                        symbol: a.show(),
                        first: existing.show(),
                        second: p.show(),
                    })
                }
                Some(_) => {}
                None => {
                    row.insert(a, p);
                }
            }
        }
        let dfa = Self {
            states: states.into_iter().collect(),
            alphabet: Alphabet::new(alphabet),
            transitions: map,
            start,
            accepting: accepting.into_iter().collect(),
        };
        dfa.validate()?;
        Ok(dfa)
    }

    /// Returns the states in ascending order.
    pub fn states(&self) -> &OrderedSet<Q> {
        &self.states
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns a reference to the alphabet.
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

    /// Returns the successor of `state` on `symbol`, if the transition is defined.
    pub fn successor(&self, state: &Q, symbol: &S) -> Option<&Q> {
        self.transitions.get(state)?.get(symbol)
    }

    /// Iterates over the transitions leaving `state`, ordered by symbol.
    pub fn edges_from<'a>(&'a self, state: &Q) -> impl Iterator<Item = (&'a S, &'a Q)> + 'a {
        self.transitions
            .get(state)
            .into_iter()
            .flat_map(|row| row.iter())
    }

    /// Iterates over all transitions as triples `(origin, symbol, destination)`.
    pub fn transitions(&self) -> impl Iterator<Item = (&Q, &S, &Q)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(q, row)| row.iter().map(move |(a, p)| (q, a, p)))
    }

    /// Returns the number of defined transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(|row| row.len()).sum()
    }

    /// Reads `word` starting in the start state and returns the state that is reached. If a
    /// symbol does not belong to the alphabet or a transition is missing, `None` is returned.
    pub fn reached_state<W>(&self, word: W) -> Option<&Q>
    where
        W: IntoIterator,
        W::Item: Borrow<S>,
    {
        let mut current = &self.start;
        for sym in word {
            let sym = sym.borrow();
            if !self.alphabet.contains(sym) {
                trace!("symbol {} is not in the alphabet, rejecting", sym.show());
                return None;
            }
            current = self.successor(current, sym)?;
        }
        Some(current)
    }

    /// Returns whether the automaton accepts the given finite word. A missing transition or a
    /// symbol that is not part of the alphabet leads to rejection.
    ///
    /// # Example
    /// ```
    /// use automata_minimizer::prelude::*;
    ///
    /// let dfa = AutomatonBuilder::new()
    ///     .with_transitions([(0, 'a', 1), (1, 'b', 0)])
    ///     .with_accepting([1])
    ///     .into_dfa(0)
    ///     .unwrap();
    /// assert!(dfa.accepts("aba".chars()));
    /// assert!(!dfa.accepts("aa".chars()));
    /// assert!(!dfa.accepts("ac".chars()));
    /// ```
    pub fn accepts<W>(&self, word: W) -> bool
    where
        W: IntoIterator,
        W::Item: Borrow<S>,
    {
        self.reached_state(word)
            .map(|q| self.is_accepting(q))
            .unwrap_or(false)
    }

    /// Returns true if the transition function is defined for every pair of state and symbol.
    /// An automaton without states is vacuously complete.
    pub fn is_complete(&self) -> bool {
        self.states
            .iter()
            .all(|q| self.alphabet.iter().all(|a| self.successor(q, a).is_some()))
    }

    /// Returns the pairs of state and symbol for which no transition is defined.
    pub fn missing_transitions(&self) -> Vec<(&Q, &S)> {
        self.states
            .iter()
            .flat_map(|q| self.alphabet.iter().map(move |a| (q, a)))
            .filter(|(q, a)| self.successor(q, a).is_none())
            .collect()
    }

    /// Renames every state through `f`. The function has to be injective on the states
    /// of `self`, otherwise transitions may be lost.
    pub fn map_states<R: State, F: FnMut(&Q) -> R>(&self, mut f: F) -> Dfa<R, S> {
        let renamed: OrderedMap<&Q, R> = self.states.iter().map(|q| (q, f(q))).collect();
        let mut rename = |q: &Q| renamed.get(q).cloned().unwrap_or_else(|| f(q));
        Dfa::from_parts(
            self.states.iter().map(&mut rename).collect::<Vec<_>>(),
            self.alphabet.iter().cloned(),
            self.transitions()
                .map(|(q, a, p)| (rename(q), a.clone(), rename(p)))
                .collect::<Vec<_>>(),
            rename(&self.start),
            self.accepting.iter().map(&mut rename).collect::<Vec<_>>(),
        )
    }

    /// Returns a new automaton that only contains the states which are reachable from the start
    /// state, together with the transitions between them.
    pub fn trim(&self) -> Self {
        let reachable: Set<&Q> = self.minimal_representatives().map(|(_, q)| q).collect();
        Self::from_parts(
            self.states
                .iter()
                .filter(|q| reachable.contains(q))
                .cloned()
                .collect::<Vec<_>>(),
            self.alphabet.iter().cloned(),
            self.transitions()
                .filter(|(q, _, p)| reachable.contains(q) && reachable.contains(p))
                .map(|(q, a, p)| (q.clone(), a.clone(), p.clone()))
                .collect::<Vec<_>>(),
            self.start.clone(),
            self.accepting
                .iter()
                .filter(|q| reachable.contains(q))
                .cloned()
                .collect::<Vec<_>>(),
        )
    }

    /// Views `self` as a nondeterministic automaton, which has the same language.
    pub fn into_nfa(self) -> Nfa<Q, S> {
        let transitions = self
            .transitions()
            .map(|(q, a, p)| (q.clone(), Label::Symbol(a.clone()), p.clone()))
            .collect::<Vec<_>>();
        Nfa::from_parts(
            self.states,
            self.alphabet.iter().cloned().collect::<Vec<_>>(),
            transitions,
            self.start,
            self.accepting,
        )
    }

    /// Returns a string representation of the transition table. The start state is marked
    /// with `->`, accepting states are marked with `*` and missing transitions are shown as `-`.
    pub fn transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(self.alphabet.iter().map(|a| a.show())),
        );
        for q in &self.states {
            let mut row = vec![self.decorate_state(q)];
            for a in &self.alphabet {
                row.push(self.successor(q, a).show());
            }
            builder.push_record(row);
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }

    fn decorate_state(&self, q: &Q) -> String {
        let mut name = q.show();
        if self.is_accepting(q) {
            name = format!("*{}", name.bold());
        }
        if q == &self.start {
            name = format!("->{name}");
        }
        name
    }
}

impl<Q: State, S: Symbol> std::fmt::Display for Dfa<Q, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.transition_table())
    }
}
