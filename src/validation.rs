use tracing::debug;

use crate::{alphabet::is_epsilon_token, math::OrderedSet, prelude::*};

/// Something that is legal but usually unintended in an automaton. Warnings never prevent
/// an automaton from being used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The state cannot be reached from the start state.
    Unreachable(String),
    /// The transition function is partial, `missing` pairs of state and symbol have no
    /// successor.
    Incomplete {
        /// Number of pairs of state and symbol without successor.
        missing: usize,
    },
    /// No state is accepting, hence the language is empty.
    NoAcceptingStates,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::Unreachable(q) => write!(f, "state `{q}` is unreachable from the start state"),
            Warning::Incomplete { missing } => {
                write!(f, "transition function is partial, {missing} transitions are missing")
            }
            Warning::NoAcceptingStates => write!(f, "automaton has no accepting states"),
        }
    }
}

/// Collects every violation and every warning that was found in an automaton, together with
/// the structural properties that are of interest to a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// All structural violations in the order in which they were found.
    pub errors: Vec<InvalidAutomaton>,
    /// All warnings.
    pub warnings: Vec<Warning>,
    /// Whether every pair of state and symbol has a successor.
    pub complete: bool,
    /// Whether the automaton is deterministic. Always true for a [`Dfa`].
    pub deterministic: bool,
}

impl ValidationReport {
    /// Returns true if no violation was found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} errors, {} warnings (complete: {}, deterministic: {})",
            self.errors.len(),
            self.warnings.len(),
            self.complete,
            self.deterministic
        )?;
        for error in &self.errors {
            writeln!(f, "error: {error}")?;
        }
        for warning in &self.warnings {
            writeln!(f, "warning: {warning}")?;
        }
        Ok(())
    }
}

/// Structural well-formedness checks. An automaton is well-formed if
/// - it has at least one state,
/// - its start state and all of its accepting states are states,
/// - every transition leaves from and leads to a state,
/// - every transition is labelled with an alphabet symbol (or is an empty transition of an [`Nfa`]),
/// - no symbol is shown as one of the tokens reserved for empty transitions
///   (see [`EPSILON_TOKENS`](crate::alphabet::EPSILON_TOKENS)).
///
/// All operations of this crate assume well-formed input. The validated constructors such as
/// [`Dfa::try_from_parts`] and the builder already perform these checks.
pub trait Validate {
    /// Returns all violations, in the order in which the checks are listed above.
    fn violations(&self) -> Vec<InvalidAutomaton>;

    /// Produces a full [`ValidationReport`].
    fn report(&self) -> ValidationReport;

    /// Returns the first violation if there is one.
    fn validate(&self) -> Result<(), InvalidAutomaton> {
        match self.violations().into_iter().next() {
            Some(violation) => {
                debug!("validation failed: {violation}");
                Err(violation)
            }
            None => Ok(()),
        }
    }
}

/// Runs the checks that are shared between both kinds of automata. Empty transitions are
/// always allowed here.
fn structural_violations<'a, Q, S, I>(
    states: &OrderedSet<Q>,
    alphabet: &Alphabet<S>,
    start: &Q,
    accepting: &OrderedSet<Q>,
    transitions: I,
) -> Vec<InvalidAutomaton>
where
    Q: State + 'a,
    S: Symbol + 'a,
    I: IntoIterator<Item = (&'a Q, Label<&'a S>, &'a Q)>,
{
    let mut out = vec![];
    if states.is_empty() {
        out.push(InvalidAutomaton::NoStates);
    }
    if !states.contains(start) {
        out.push(InvalidAutomaton::UnknownStart(start.show()));
    }
    out.extend(
        accepting
            .iter()
            .filter(|q| !states.contains(*q))
            .map(|q| InvalidAutomaton::UnknownAccepting(q.show())),
    );
    let mut symbol_violations = vec![];
    for (q, label, p) in transitions {
        for state in [q, p] {
            if !states.contains(state) {
                out.push(InvalidAutomaton::UnknownState {
                    origin: q.show(),
                    symbol: label.show(),
                    destination: p.show(),
                    state: state.show(),
                });
                // a self loop on an unknown state is reported once
                if q == p {
                    break;
                }
            }
        }
        if let Label::Symbol(a) = label {
            if !alphabet.contains(a) {
                symbol_violations.push(InvalidAutomaton::UnknownSymbol {
                    origin: q.show(),
                    symbol: a.show(),
                });
            }
        }
    }
    out.extend(symbol_violations);
    // such symbols would be read back as empty transitions from a record
    out.extend(
        alphabet
            .iter()
            .map(|a| a.show())
            .filter(|name| is_epsilon_token(name))
            .map(InvalidAutomaton::ReservedSymbol),
    );
    out
}

fn unreachable_warnings<Q: State>(states: &OrderedSet<Q>, reachable: &OrderedSet<Q>) -> Vec<Warning> {
    states
        .difference(reachable)
        .map(|q| Warning::Unreachable(q.show()))
        .collect()
}

impl<Q: State, S: Symbol> Validate for Dfa<Q, S> {
    fn violations(&self) -> Vec<InvalidAutomaton> {
        structural_violations(
            self.states(),
            self.alphabet(),
            self.start(),
            self.accepting(),
            self.transitions().map(|(q, a, p)| (q, Label::Symbol(a), p)),
        )
    }

    fn report(&self) -> ValidationReport {
        let errors = self.violations();
        let mut warnings = vec![];
        // reachability is only meaningful if the start state exists
        if self.states().contains(self.start()) {
            warnings.extend(unreachable_warnings(self.states(), &self.reachable_states()));
        }
        let missing = self.missing_transitions().len();
        if missing > 0 {
            warnings.push(Warning::Incomplete { missing });
        }
        if self.accepting().is_empty() {
            warnings.push(Warning::NoAcceptingStates);
        }
        ValidationReport {
            errors,
            warnings,
            complete: missing == 0,
            deterministic: true,
        }
    }
}

impl<Q: State, S: Symbol> Validate for Nfa<Q, S> {
    fn violations(&self) -> Vec<InvalidAutomaton> {
        structural_violations(
            self.states(),
            self.alphabet(),
            self.start(),
            self.accepting(),
            self.transitions(),
        )
    }

    fn report(&self) -> ValidationReport {
        let errors = self.violations();
        let mut warnings = vec![];
        if self.states().contains(self.start()) {
            warnings.extend(unreachable_warnings(self.states(), &self.reachable_states()));
        }
        let missing = self
            .states()
            .iter()
            .flat_map(|q| self.alphabet().iter().map(move |a| (q, a)))
            .filter(|(q, a)| self.symbol_successors(q, a).map_or(true, |t| t.is_empty()))
            .count();
        if missing > 0 {
            warnings.push(Warning::Incomplete { missing });
        }
        if self.accepting().is_empty() {
            warnings.push(Warning::NoAcceptingStates);
        }
        ValidationReport {
            errors,
            warnings,
            complete: missing == 0,
            deterministic: self.is_deterministic(),
        }
    }
}

impl<Q: State, S: Symbol> Validate for Automaton<Q, S> {
    fn violations(&self) -> Vec<InvalidAutomaton> {
        match self {
            Automaton::Deterministic(dfa) => dfa.violations(),
            Automaton::Nondeterministic(nfa) => nfa.violations(),
        }
    }

    fn report(&self) -> ValidationReport {
        match self {
            Automaton::Deterministic(dfa) => dfa.report(),
            Automaton::Nondeterministic(nfa) => nfa.report(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::{a_then_bs, ends_with_ab, ends_with_b};

    #[test]
    fn well_formed_automata_pass() {
        let report = ends_with_b().report();
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
        assert!(report.complete);
        assert!(report.deterministic);

        let report = ends_with_ab().report();
        assert!(report.is_valid());
        assert!(!report.deterministic);
        assert!(!report.complete);
        assert!(matches!(
            report.warnings.as_slice(),
            [Warning::Incomplete { missing: 3 }]
        ));
        assert!(a_then_bs().validate().is_ok());
    }

    #[test_log::test]
    fn every_violation_is_reported_in_order() {
        let dfa: Dfa<&str, char> = Dfa::from_parts(
            ["q0", "q1"],
            ['a'],
            [("q0", 'a', "q2"), ("q1", 'b', "q0")],
            "q9",
            ["q1", "q3"],
        );
        assert_eq!(
            dfa.violations(),
            vec![
                InvalidAutomaton::UnknownStart("q9".into()),
                InvalidAutomaton::UnknownAccepting("q3".into()),
                InvalidAutomaton::UnknownState {
                    origin: "q0".into(),
                    symbol: "a".into(),
                    destination: "q2".into(),
                    state: "q2".into(),
                },
                InvalidAutomaton::UnknownSymbol {
                    origin: "q1".into(),
                    symbol: "b".into(),
                },
            ]
        );
        assert_eq!(dfa.validate(), Err(InvalidAutomaton::UnknownStart("q9".into())));
        // no reachability warnings without a valid start state
        assert!(!dfa
            .report()
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::Unreachable(_))));
    }

    #[test]
    fn empty_automaton_is_invalid() {
        let nfa: Nfa<u32, char> = Nfa::from_parts([], ['a'], [], 0, []);
        let report = nfa.report();
        assert_eq!(
            report.errors,
            vec![InvalidAutomaton::NoStates, InvalidAutomaton::UnknownStart("0".into())]
        );
        assert!(report.warnings.contains(&Warning::NoAcceptingStates));
    }

    #[test]
    fn epsilon_destinations_are_checked() {
        let nfa: Nfa<&str, char> = Nfa::from_parts(
            ["q0"],
            ['a'],
            [("q0", Label::Epsilon, "q1")],
            "q0",
            ["q0"],
        );
        assert!(matches!(
            nfa.validate(),
            Err(InvalidAutomaton::UnknownState { symbol, state, .. }) if symbol == EPSILON && state == "q1"
        ));
    }

    #[test]
    fn reserved_symbols_are_rejected() {
        let nfa: Nfa<&str, String> = Nfa::from_parts(
            ["q0"],
            ["a".to_string(), "lambda".to_string()],
            [("q0", Label::Symbol("lambda".to_string()), "q0")],
            "q0",
            ["q0"],
        );
        assert_eq!(
            nfa.validate(),
            Err(InvalidAutomaton::ReservedSymbol("lambda".into()))
        );

        let dfa: Dfa<u32, char> = Dfa::from_parts([0], ['a', 'λ'], [(0, 'a', 0)], 0, [0]);
        assert_eq!(
            dfa.violations(),
            vec![InvalidAutomaton::ReservedSymbol("λ".into())]
        );

        let built = AutomatonBuilder::new()
            .with_transitions([("q0", String::new(), "q0")])
            .into_dfa("q0");
        assert_eq!(built, Err(InvalidAutomaton::ReservedSymbol(String::new())));
    }

    #[test]
    fn unreachable_states_are_warned_about() {
        let dfa = AutomatonBuilder::new()
            .with_transitions([(0u32, 'a', 1), (2, 'a', 0)])
            .into_dfa(0)
            .unwrap();
        let report = dfa.report();
        assert!(report.is_valid());
        assert!(report.warnings.contains(&Warning::Unreachable("2".into())));
        assert!(report.warnings.contains(&Warning::Incomplete { missing: 1 }));
        assert!(report.warnings.contains(&Warning::NoAcceptingStates));
        assert!(report.to_string().contains("state `2` is unreachable"));

        let automaton = Automaton::from(dfa);
        assert_eq!(automaton.report().warnings.len(), 3);
    }
}
