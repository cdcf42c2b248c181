use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Distinguishes deterministic from nondeterministic automata. In records, the two kinds are
/// written as `"DA"` and `"NA"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AutomatonKind {
    /// A deterministic automaton, see [`Dfa`].
    #[default]
    #[serde(rename = "DA")]
    Deterministic,
    /// A nondeterministic automaton, see [`Nfa`].
    #[serde(rename = "NA")]
    Nondeterministic,
}

impl AutomatonKind {
    /// The short name that is used in records.
    pub fn as_str(&self) -> &'static str {
        match self {
            AutomatonKind::Deterministic => "DA",
            AutomatonKind::Nondeterministic => "NA",
        }
    }
}

impl std::fmt::Display for AutomatonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structural statistics of an automaton. For a nondeterministic automaton, every destination of
/// a transition is counted separately (this is the number of transition records it exports to).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// The kind of the automaton.
    pub kind: AutomatonKind,
    /// Number of states.
    pub states: usize,
    /// Number of alphabet symbols.
    pub symbols: usize,
    /// Number of transitions.
    pub transitions: usize,
    /// Number of accepting states.
    pub accepting: usize,
    /// Ratio of transitions to pairs of state and symbol, zero if there are no such pairs.
    pub density: f64,
    /// Whether every pair of state and symbol has a successor.
    pub complete: bool,
}

impl Statistics {
    fn new(
        kind: AutomatonKind,
        states: usize,
        symbols: usize,
        transitions: usize,
        accepting: usize,
        complete: bool,
    ) -> Self {
        let pairs = states * symbols;
        let density = if pairs == 0 {
            0.0
        } else {
            transitions as f64 / pairs as f64
        };
        Self {
            kind,
            states,
            symbols,
            transitions,
            accepting,
            density,
            complete,
        }
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(["kind".to_string(), self.kind.to_string()]);
        builder.push_record(["states".to_string(), self.states.to_string()]);
        builder.push_record(["symbols".to_string(), self.symbols.to_string()]);
        builder.push_record(["transitions".to_string(), self.transitions.to_string()]);
        builder.push_record(["accepting".to_string(), self.accepting.to_string()]);
        builder.push_record(["density".to_string(), format!("{:.3}", self.density)]);
        builder.push_record(["complete".to_string(), self.complete.to_string()]);
        write!(
            f,
            "{}",
            builder.build().with(tabled::settings::Style::ascii())
        )
    }
}

impl<Q: State, S: Symbol> Dfa<Q, S> {
    /// Computes the [`Statistics`] of `self`.
    pub fn statistics(&self) -> Statistics {
        Statistics::new(
            AutomatonKind::Deterministic,
            self.size(),
            self.alphabet().len(),
            self.transition_count(),
            self.accepting().len(),
            self.is_complete(),
        )
    }
}

impl<Q: State, S: Symbol> Nfa<Q, S> {
    /// Computes the [`Statistics`] of `self`.
    pub fn statistics(&self) -> Statistics {
        Statistics::new(
            AutomatonKind::Nondeterministic,
            self.size(),
            self.alphabet().len(),
            self.transition_count(),
            self.accepting().len(),
            self.is_complete(),
        )
    }
}

/// The transformations that produce a [`TransformSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    /// Conversion of a nondeterministic automaton into a deterministic one.
    Determinize,
    /// Minimization of a deterministic automaton.
    Minimize,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Determinize => write!(f, "determinize"),
            Operation::Minimize => write!(f, "minimize"),
        }
    }
}

/// Summarizes how a transformation changed the number of states, for reporting purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TransformSummary {
    /// The transformation that was applied.
    pub operation: Operation,
    /// Number of states of the input.
    pub states_before: usize,
    /// Number of states of the output.
    pub states_after: usize,
}

impl TransformSummary {
    /// Creates a new summary.
    pub fn new(operation: Operation, states_before: usize, states_after: usize) -> Self {
        Self {
            operation,
            states_before,
            states_after,
        }
    }

    /// The ratio of states after to states before, which is the expansion factor of a
    /// determinization. Zero if the input had no states.
    pub fn factor(&self) -> f64 {
        if self.states_before == 0 {
            0.0
        } else {
            self.states_after as f64 / self.states_before as f64
        }
    }

    /// The percentage of states that were removed, which is the reduction achieved by a
    /// minimization. Negative if states were added. Zero if the input had no states.
    pub fn reduction_percentage(&self) -> f64 {
        if self.states_before == 0 {
            0.0
        } else {
            (self.states_before as f64 - self.states_after as f64) / self.states_before as f64
                * 100.0
        }
    }
}

impl std::fmt::Display for TransformSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} -> {} states (factor {:.2})",
            self.operation,
            self.states_before,
            self.states_after,
            self.factor()
        )
    }
}
