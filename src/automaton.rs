use std::borrow::Borrow;

use crate::{alphabet::Alphabet, math::OrderedSet, prelude::*};

mod builder;
pub use builder::AutomatonBuilder;

mod dfa;
pub use dfa::Dfa;

mod nfa;
pub use nfa::Nfa;

mod reachability;
pub use reachability::MinimalRepresentatives;

mod statistics;
pub use statistics::{AutomatonKind, Operation, Statistics, TransformSummary};

/// Either a deterministic or a nondeterministic automaton. This is what collaborators get
/// when they load an automaton without knowing its kind in advance, for example from an
/// [`AutomatonRecord`]. All queries are forwarded to the wrapped automaton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Automaton<Q: State, S: Symbol> {
    /// A deterministic automaton.
    Deterministic(Dfa<Q, S>),
    /// A nondeterministic automaton, possibly with empty transitions.
    Nondeterministic(Nfa<Q, S>),
}

impl<Q: State, S: Symbol> Automaton<Q, S> {
    /// Returns the kind of the wrapped automaton.
    pub fn kind(&self) -> AutomatonKind {
        match self {
            Automaton::Deterministic(_) => AutomatonKind::Deterministic,
            Automaton::Nondeterministic(_) => AutomatonKind::Nondeterministic,
        }
    }

    /// Returns the states of the automaton.
    pub fn states(&self) -> &OrderedSet<Q> {
        match self {
            Automaton::Deterministic(dfa) => dfa.states(),
            Automaton::Nondeterministic(nfa) => nfa.states(),
        }
    }

    /// Returns the alphabet of the automaton.
    pub fn alphabet(&self) -> &Alphabet<S> {
        match self {
            Automaton::Deterministic(dfa) => dfa.alphabet(),
            Automaton::Nondeterministic(nfa) => nfa.alphabet(),
        }
    }

    /// Returns the start state of the automaton.
    pub fn start(&self) -> &Q {
        match self {
            Automaton::Deterministic(dfa) => dfa.start(),
            Automaton::Nondeterministic(nfa) => nfa.start(),
        }
    }

    /// Returns whether the automaton accepts the given finite word.
    pub fn accepts<W>(&self, word: W) -> bool
    where
        W: IntoIterator,
        W::Item: Borrow<S>,
    {
        match self {
            Automaton::Deterministic(dfa) => dfa.accepts(word),
            Automaton::Nondeterministic(nfa) => nfa.accepts(word),
        }
    }

    /// Returns the set of states that can be reached from the start state.
    pub fn reachable_states(&self) -> OrderedSet<Q> {
        match self {
            Automaton::Deterministic(dfa) => dfa.reachable_states(),
            Automaton::Nondeterministic(nfa) => nfa.reachable_states(),
        }
    }

    /// Computes [`Statistics`] for the wrapped automaton.
    pub fn statistics(&self) -> Statistics {
        match self {
            Automaton::Deterministic(dfa) => dfa.statistics(),
            Automaton::Nondeterministic(nfa) => nfa.statistics(),
        }
    }

    /// Returns the wrapped automaton if it is deterministic.
    pub fn as_dfa(&self) -> Option<&Dfa<Q, S>> {
        match self {
            Automaton::Deterministic(dfa) => Some(dfa),
            Automaton::Nondeterministic(_) => None,
        }
    }

    /// Returns the wrapped automaton if it is nondeterministic.
    pub fn as_nfa(&self) -> Option<&Nfa<Q, S>> {
        match self {
            Automaton::Deterministic(_) => None,
            Automaton::Nondeterministic(nfa) => Some(nfa),
        }
    }
}

impl<Q: State, S: Symbol> From<Dfa<Q, S>> for Automaton<Q, S> {
    fn from(value: Dfa<Q, S>) -> Self {
        Automaton::Deterministic(value)
    }
}

impl<Q: State, S: Symbol> From<Nfa<Q, S>> for Automaton<Q, S> {
    fn from(value: Nfa<Q, S>) -> Self {
        Automaton::Nondeterministic(value)
    }
}

impl<Q: State, S: Symbol> std::fmt::Display for Automaton<Q, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Automaton::Deterministic(dfa) => write!(f, "{dfa}"),
            Automaton::Nondeterministic(nfa) => write!(f, "{nfa}"),
        }
    }
}
