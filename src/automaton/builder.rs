use crate::{math::OrderedSet, prelude::*};

/// Helper struct for the construction of automata. It collects states, symbols, transitions and
/// accepting states and can then be turned into a [`Dfa`] or an [`Nfa`], both of which are
/// validated on construction.
///
/// If the states are given explicitly through [`AutomatonBuilder::with_states`], they are taken as
/// is and every reference to a state that is not among them is reported as an error. Otherwise,
/// the set of states consists of all states that appear on a transition, the start state and the
/// accepting states. Similarly, the alphabet contains all symbols that are given explicitly
/// together with those that appear on at least one transition.
///
/// # Example
///
/// We want to create a DFA with two states `q0` and `q1` over the alphabet `['a', 'b']`, which
/// accepts all words that end with `b`.
/// ```
/// use automata_minimizer::prelude::*;
///
/// let dfa = AutomatonBuilder::new()
///     .with_transitions([("q0", 'a', "q0"), ("q0", 'b', "q1"), ("q1", 'a', "q0"), ("q1", 'b', "q1")])
///     .with_accepting(["q1"])
///     .into_dfa("q0")
///     .unwrap();
/// assert!(dfa.accepts("ab".chars()));
/// assert!(!dfa.accepts("ba".chars()));
/// ```
#[derive(Clone, Debug)]
pub struct AutomatonBuilder<Q, S> {
    states: Option<Vec<Q>>,
    symbols: Vec<S>,
    edges: Vec<(Q, Label<S>, Q)>,
    accepting: Vec<Q>,
}

impl<Q, S> Default for AutomatonBuilder<Q, S> {
    fn default() -> Self {
        Self {
            states: None,
            symbols: vec![],
            edges: vec![],
            accepting: vec![],
        }
    }
}

impl<Q: State, S: Symbol> AutomatonBuilder<Q, S> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the set of states. Can be called multiple times, the states accumulate.
    pub fn with_states<I: IntoIterator<Item = Q>>(mut self, states: I) -> Self {
        self.states.get_or_insert_with(Vec::new).extend(states);
        self
    }

    /// By default, the only alphabet symbols in the automaton that is built are the ones that
    /// appear on at least one transition. This method can be used to force additional alphabet
    /// symbols to appear.
    pub fn with_alphabet_symbols<I: IntoIterator<Item = S>>(mut self, symbols: I) -> Self {
        self.symbols.extend(symbols);
        self
    }

    /// Adds a list of transitions given as triples `(origin, symbol, destination)`.
    pub fn with_transitions<I: IntoIterator<Item = (Q, S, Q)>>(mut self, transitions: I) -> Self {
        self.edges
            .extend(transitions.into_iter().map(|(q, a, p)| (q, Label::Symbol(a), p)));
        self
    }

    /// Adds a list of empty transitions given as pairs `(origin, destination)`. These are only
    /// allowed when building an [`Nfa`].
    pub fn with_epsilon_transitions<I: IntoIterator<Item = (Q, Q)>>(mut self, transitions: I) -> Self {
        self.edges
            .extend(transitions.into_iter().map(|(q, p)| (q, Label::Epsilon, p)));
        self
    }

    /// Adds a list of labelled transitions, where the label may be a symbol or [`Label::Epsilon`].
    pub fn with_edges<I: IntoIterator<Item = (Q, Label<S>, Q)>>(mut self, edges: I) -> Self {
        self.edges.extend(edges);
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I: IntoIterator<Item = Q>>(mut self, accepting: I) -> Self {
        self.accepting.extend(accepting);
        self
    }

    fn collect_states(&self, start: &Q) -> OrderedSet<Q> {
        match &self.states {
            Some(states) => states.iter().cloned().collect(),
            None => self
                .edges
                .iter()
                .flat_map(|(q, _, p)| [q, p])
                .chain(self.accepting.iter())
                .chain(std::iter::once(start))
                .cloned()
                .collect(),
        }
    }

    fn collect_alphabet(&self) -> Alphabet<S> {
        self.symbols
            .iter()
            .chain(self.edges.iter().filter_map(|(_, a, _)| a.symbol()))
            .cloned()
            .collect()
    }

    /// Builds a [`Dfa`] with the given start state. Fails if an empty transition was added, if
    /// two transitions leave the same state on the same symbol towards different states or if
    /// the result is not well-formed (see [`Validate`]).
    pub fn into_dfa(self, start: Q) -> Result<Dfa<Q, S>, InvalidAutomaton> {
        let states = self.collect_states(&start);
        let alphabet = self.collect_alphabet();
        let transitions = self
            .edges
            .into_iter()
            .map(|(q, label, p)| match label {
                Label::Symbol(a) => Ok((q, a, p)),
                Label::Epsilon => Err(InvalidAutomaton::EpsilonInDeterministic(q.show())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Dfa::try_from_parts(states, alphabet, transitions, start, self.accepting)
    }

    /// Builds an [`Nfa`] with the given start state. Fails if the result is not well-formed
    /// (see [`Validate`]).
    pub fn into_nfa(self, start: Q) -> Result<Nfa<Q, S>, InvalidAutomaton> {
        let states = self.collect_states(&start);
        let alphabet = self.collect_alphabet();
        Nfa::try_from_parts(states, alphabet, self.edges, start, self.accepting)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn infers_states_and_symbols() {
        let dfa = AutomatonBuilder::new()
            .with_transitions([(0u32, 'a', 1)])
            .with_alphabet_symbols(['c'])
            .with_accepting([2])
            .into_dfa(0)
            .unwrap();
        assert_eq!(dfa.states().len(), 3);
        assert_eq!(dfa.alphabet().iter().copied().collect::<String>(), "ac");
        assert!(!dfa.is_complete());
    }

    #[test]
    fn explicit_states_are_checked() {
        let res = AutomatonBuilder::new()
            .with_states(["q0"])
            .with_transitions([("q0", 'a', "q1")])
            .into_dfa("q0");
        assert!(matches!(res, Err(InvalidAutomaton::UnknownState { state, .. }) if state == "q1"));

        let res = AutomatonBuilder::<_, char>::new()
            .with_states(["q0"])
            .into_nfa("q7");
        assert_eq!(res, Err(InvalidAutomaton::UnknownStart("q7".into())));
    }

    #[test]
    fn deterministic_restrictions() {
        let res = AutomatonBuilder::<_, char>::new()
            .with_epsilon_transitions([("q0", "q1")])
            .into_dfa("q0");
        assert_eq!(res, Err(InvalidAutomaton::EpsilonInDeterministic("q0".into())));

        let res = AutomatonBuilder::new()
            .with_transitions([("q0", 'a', "q0"), ("q0", 'a', "q1")])
            .into_dfa("q0");
        assert!(matches!(res, Err(InvalidAutomaton::Nondeterministic { .. })));

        // the same transition twice is not a conflict
        let res = AutomatonBuilder::new()
            .with_transitions([("q0", 'a', "q0"), ("q0", 'a', "q0")])
            .into_dfa("q0");
        assert!(res.is_ok());
    }
}
