use thiserror::Error;

/// A structural violation that makes an automaton unusable. These are raised by the
/// [`crate::Validate`] trait, by the validated constructors and by the preconditions of
/// determinization and minimization. States and symbols are stored in their shown form
/// (see [`crate::Show`]) so that the error does not depend on the types of the automaton.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[allow(missing_docs)]
pub enum InvalidAutomaton {
    /// The set of states is empty.
    #[error("automaton has no states")]
    NoStates,
    /// The alphabet is empty, which is not allowed as input for the subset construction.
    #[error("automaton has an empty alphabet")]
    EmptyAlphabet,
    /// The start state is not a state of the automaton.
    #[error("start state `{0}` is not a state of the automaton")]
    UnknownStart(String),
    /// An accepting state is not a state of the automaton.
    #[error("accepting state `{0}` is not a state of the automaton")]
    UnknownAccepting(String),
    /// A transition leaves from or leads to a state that does not exist.
    #[error("transition `{origin}` --{symbol}--> `{destination}` references unknown state `{state}`")]
    UnknownState {
        origin: String,
        symbol: String,
        destination: String,
        state: String,
    },
    /// A transition uses a symbol that does not belong to the alphabet.
    #[error("transition from `{origin}` uses symbol `{symbol}` which is not in the alphabet")]
    UnknownSymbol { origin: String, symbol: String },
    /// The alphabet contains a token that is reserved for empty transitions.
    #[error("alphabet contains the reserved empty-transition token `{0}`")]
    ReservedSymbol(String),
    /// A deterministic automaton contains an empty transition.
    #[error("deterministic automaton has an empty transition leaving `{0}`")]
    EpsilonInDeterministic(String),
    /// A deterministic automaton has two different successors for the same state and symbol.
    #[error("deterministic automaton has conflicting transitions on (`{state}`, `{symbol}`): `{first}` and `{second}`")]
    Nondeterministic {
        state: String,
        symbol: String,
        first: String,
        second: String,
    },
}

/// Abstracts the types of errors that can occur when reading an [`crate::AutomatonRecord`]
/// from a value or string. Field names are given as paths, e.g. `transitions[2].symbol`.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[allow(missing_docs)]
pub enum MalformedRecord {
    /// A required field is missing.
    #[error("missing required field `{0}`")]
    MissingField(String),
    /// A field is present but does not have the expected type.
    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
    /// The `kind` field names an automaton type we do not know.
    #[error("unknown automaton kind `{0}`, expected `DA` or `NA`")]
    UnknownKind(String),
    /// The input is not valid JSON.
    #[error("could not parse record: {0}")]
    Json(String),
}

/// Errors of operations that cross the record boundary, i.e. reading a record and then
/// building an automaton from it.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Error {
    /// The automaton described by the record is structurally invalid.
    #[error(transparent)]
    InvalidAutomaton(#[from] InvalidAutomaton),
    /// The record itself is malformed.
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecord),
}
