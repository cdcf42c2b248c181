use serde::{Deserialize, Serialize};
use serde_json::{json, Map as JsonMap, Value};
use tracing::warn;

use crate::{
    alphabet::is_epsilon_token,
    math::{OrderedMap, OrderedSet},
    prelude::*,
};

/// A single transition of an [`AutomatonRecord`]. Empty transitions of a nondeterministic
/// automaton use [`EPSILON`] (or one of the other reserved tokens `"λ"` and `""`) as symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state the transition leaves from.
    pub origin: String,
    /// The symbol the transition is labelled with.
    pub symbol: String,
    /// The state the transition leads to.
    pub destination: String,
}

impl TransitionRecord {
    /// Creates a new transition record.
    pub fn new(origin: impl Into<String>, symbol: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            symbol: symbol.into(),
            destination: destination.into(),
        }
    }

    /// Returns true if the record describes an empty transition.
    pub fn is_epsilon(&self) -> bool {
        is_epsilon_token(&self.symbol)
    }
}

/// A plain structural description of an automaton, where states and symbols are represented by
/// their names. This is the format in which automata are handed to and received from anything
/// that stores or displays them. A nondeterministic automaton has one [`TransitionRecord`] per
/// destination.
///
/// Records are exchanged as JSON objects of the form
/// ```json
/// {
///   "kind": "NA",
///   "states": ["q0", "q1"],
///   "alphabet": ["a"],
///   "transitions": [{"origin": "q0", "symbol": "lambda", "destination": "q1"}],
///   "start": "q0",
///   "accepting": ["q1"]
/// }
/// ```
/// where `kind` may be omitted, in which case the automaton is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonRecord {
    /// Whether the described automaton is deterministic.
    #[serde(default)]
    pub kind: AutomatonKind,
    /// The names of all states.
    pub states: Vec<String>,
    /// The alphabet symbols.
    pub alphabet: Vec<String>,
    /// All transitions.
    pub transitions: Vec<TransitionRecord>,
    /// The name of the start state.
    pub start: String,
    /// The names of the accepting states.
    pub accepting: Vec<String>,
}

const REQUIRED_FIELDS: [&str; 5] = ["states", "alphabet", "transitions", "start", "accepting"];
const TRANSITION_FIELDS: [&str; 3] = ["origin", "symbol", "destination"];

fn expect_str(value: &Value, field: String) -> Result<String, MalformedRecord> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(MalformedRecord::WrongType {
            field,
            expected: "a string",
        })
}

fn expect_str_list(value: &Value, field: &str) -> Result<Vec<String>, MalformedRecord> {
    let items = value.as_array().ok_or_else(|| MalformedRecord::WrongType {
        field: field.to_string(),
        expected: "a list of strings",
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| expect_str(item, format!("{field}[{i}]")))
        .collect()
}

fn expect_transition(value: &Value, i: usize) -> Result<TransitionRecord, MalformedRecord> {
    let object = value.as_object().ok_or_else(|| MalformedRecord::WrongType {
        field: format!("transitions[{i}]"),
        expected: "an object",
    })?;
    let field = |name: &str| -> Result<String, MalformedRecord> {
        let path = format!("transitions[{i}].{name}");
        match object.get(name) {
            Some(value) => expect_str(value, path),
            None => Err(MalformedRecord::MissingField(path)),
        }
    };
    Ok(TransitionRecord {
        origin: field(TRANSITION_FIELDS[0])?,
        symbol: field(TRANSITION_FIELDS[1])?,
        destination: field(TRANSITION_FIELDS[2])?,
    })
}

fn lookup<'a>(object: &'a JsonMap<String, Value>, name: &str) -> Result<&'a Value, MalformedRecord> {
    object
        .get(name)
        .ok_or_else(|| MalformedRecord::MissingField(name.to_string()))
}

impl AutomatonRecord {
    /// Reads a record from a JSON value. Every required field is checked for presence first and
    /// for its type afterwards, and nothing is constructed before all checks have passed. Errors
    /// name the offending field precisely, e.g. `transitions[2].symbol`.
    pub fn from_value(value: &Value) -> Result<Self, MalformedRecord> {
        let object = value.as_object().ok_or(MalformedRecord::WrongType {
            field: "record".to_string(),
            expected: "an object",
        })?;
        for name in REQUIRED_FIELDS {
            lookup(object, name)?;
        }

        let kind = match object.get("kind") {
            None | Some(Value::Null) => AutomatonKind::default(),
            Some(value) => match expect_str(value, "kind".to_string())?.as_str() {
                "DA" => AutomatonKind::Deterministic,
                "NA" => AutomatonKind::Nondeterministic,
                other => return Err(MalformedRecord::UnknownKind(other.to_string())),
            },
        };
        let states = expect_str_list(lookup(object, "states")?, "states")?;
        let alphabet = expect_str_list(lookup(object, "alphabet")?, "alphabet")?;
        let transitions = lookup(object, "transitions")?
            .as_array()
            .ok_or(MalformedRecord::WrongType {
                field: "transitions".to_string(),
                expected: "a list of transitions",
            })?
            .iter()
            .enumerate()
            .map(|(i, transition)| expect_transition(transition, i))
            .collect::<Result<Vec<_>, _>>()?;
        let start = expect_str(lookup(object, "start")?, "start".to_string())?;
        let accepting = expect_str_list(lookup(object, "accepting")?, "accepting")?;

        Ok(Self {
            kind,
            states,
            alphabet,
            transitions,
            start,
            accepting,
        })
    }

    /// Parses a record from a JSON string, see [`AutomatonRecord::from_value`].
    pub fn from_json_str(json: &str) -> Result<Self, MalformedRecord> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| MalformedRecord::Json(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Converts the record into a JSON value.
    pub fn to_value(&self) -> Value {
        let transitions = self
            .transitions
            .iter()
            .map(|t| {
                json!({
                    "destination": t.destination,
                    "origin": t.origin,
                    "symbol": t.symbol
                })
            })
            .collect::<Vec<_>>();
        json!({
            "accepting": self.accepting,
            "alphabet": self.alphabet,
            "kind": self.kind.as_str(),
            "start": self.start,
            "states": self.states,
            "transitions": transitions
        })
    }

    /// Serializes the record to JSON, either compact or indented. Keys are always written
    /// in the same order.
    pub fn to_json_string(&self, pretty: bool) -> String {
        let value = self.to_value();
        if pretty {
            format!("{value:#}")
        } else {
            value.to_string()
        }
    }

    fn check_alphabet(&self) -> Result<(), InvalidAutomaton> {
        match self.alphabet.iter().find(|symbol| is_epsilon_token(symbol)) {
            Some(reserved) => Err(InvalidAutomaton::ReservedSymbol(reserved.clone())),
            None => Ok(()),
        }
    }

    /// Builds a [`Dfa`] from the record, regardless of its `kind`. Fails if the record contains an
    /// empty transition, two different destinations for the same state and symbol or if the
    /// result is not well-formed. Repeated identical transitions are tolerated.
    pub fn into_dfa(self) -> Result<Dfa<String, String>, InvalidAutomaton> {
        self.check_alphabet()?;
        let mut seen: OrderedMap<(String, String), String> = OrderedMap::new();
        let mut transitions = Vec::with_capacity(self.transitions.len());
        for record in self.transitions {
            if record.is_epsilon() {
                return Err(InvalidAutomaton::EpsilonInDeterministic(record.origin));
            }
            let key = (record.origin.clone(), record.symbol.clone());
            match seen.get(&key) {
                Some(existing) if existing == &record.destination => {
                    warn!(
                        "ignoring repeated transition {} --{}--> {}",
                        record.origin, record.symbol, record.destination
                    );
                    continue;
                }
                Some(existing) => {
                    return Err(InvalidAutomaton::Nondeterministic {
                        state: record.origin,
                        symbol: record.symbol,
                        first: existing.clone(),
                        second: record.destination,
                    })
                }
                None => {
                    seen.insert(key, record.destination.clone());
                }
            }
            transitions.push((record.origin, record.symbol, record.destination));
        }
        warn_on_duplicate_states(&self.states);
        Dfa::try_from_parts(
            self.states,
            self.alphabet,
            transitions,
            self.start,
            self.accepting,
        )
    }

    /// Builds an [`Nfa`] from the record, regardless of its `kind`. Every reserved token is read
    /// as an empty transition.
    pub fn into_nfa(self) -> Result<Nfa<String, String>, InvalidAutomaton> {
        self.check_alphabet()?;
        warn_on_repeated_transitions(&self.transitions);
        warn_on_duplicate_states(&self.states);
        let transitions = self
            .transitions
            .into_iter()
            .map(|t| (t.origin, Label::parse(&t.symbol), t.destination))
            .collect::<Vec<_>>();
        Nfa::try_from_parts(
            self.states,
            self.alphabet,
            transitions,
            self.start,
            self.accepting,
        )
    }

    /// Builds a [`Dfa`] or an [`Nfa`], depending on the `kind` of the record.
    pub fn into_automaton(self) -> Result<Automaton<String, String>, InvalidAutomaton> {
        match self.kind {
            AutomatonKind::Deterministic => self.into_dfa().map(Automaton::from),
            AutomatonKind::Nondeterministic => self.into_nfa().map(Automaton::from),
        }
    }
}

fn warn_on_repeated_transitions(transitions: &[TransitionRecord]) {
    let mut seen = OrderedSet::new();
    for record in transitions {
        if !seen.insert(record) {
            warn!(
                "ignoring repeated transition {} --{}--> {}",
                record.origin, record.symbol, record.destination
            );
        }
    }
}

fn warn_on_duplicate_states(states: &[String]) {
    let mut seen = OrderedSet::new();
    for state in states {
        if !seen.insert(state) {
            warn!("state {state} is listed more than once");
        }
    }
}

/// Parses a JSON record and builds the automaton it describes.
///
/// # Example
/// ```
/// use automata_minimizer::record::load_json;
///
/// let automaton = load_json(r#"{
///     "states": ["q0", "q1"],
///     "alphabet": ["a", "b"],
///     "transitions": [
///         {"origin": "q0", "symbol": "a", "destination": "q0"},
///         {"origin": "q0", "symbol": "b", "destination": "q1"}
///     ],
///     "start": "q0",
///     "accepting": ["q1"]
/// }"#).unwrap();
/// assert!(automaton.accepts(["a", "b"].map(String::from)));
/// ```
pub fn load_json(json: &str) -> Result<Automaton<String, String>, Error> {
    Ok(AutomatonRecord::from_json_str(json)?.into_automaton()?)
}

fn sorted_names<'a, T: Show + 'a>(items: impl IntoIterator<Item = &'a T>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.show())
        .collect::<OrderedSet<_>>()
        .into_iter()
        .collect()
}

impl<Q: State, S: Symbol> Dfa<Q, S> {
    /// Exports `self` to an [`AutomatonRecord`]. States and symbols are named through [`Show`]
    /// and all lists are sorted, so the export is reproducible.
    pub fn to_record(&self) -> AutomatonRecord {
        AutomatonRecord {
            kind: AutomatonKind::Deterministic,
            states: sorted_names(self.states()),
            alphabet: sorted_names(self.alphabet()),
            transitions: self
                .transitions()
                .map(|(q, a, p)| TransitionRecord::new(q.show(), a.show(), p.show()))
                .collect::<OrderedSet<_>>()
                .into_iter()
                .collect(),
            start: self.start().show(),
            accepting: sorted_names(self.accepting()),
        }
    }
}

impl<Q: State, S: Symbol> Nfa<Q, S> {
    /// Exports `self` to an [`AutomatonRecord`] with one transition record per destination.
    /// Empty transitions are labelled with [`EPSILON`].
    pub fn to_record(&self) -> AutomatonRecord {
        AutomatonRecord {
            kind: AutomatonKind::Nondeterministic,
            states: sorted_names(self.states()),
            alphabet: sorted_names(self.alphabet()),
            transitions: self
                .transitions()
                .map(|(q, label, p)| TransitionRecord::new(q.show(), label.show(), p.show()))
                .collect::<OrderedSet<_>>()
                .into_iter()
                .collect(),
            start: self.start().show(),
            accepting: sorted_names(self.accepting()),
        }
    }
}

impl<Q: State, S: Symbol> Automaton<Q, S> {
    /// Exports the wrapped automaton to an [`AutomatonRecord`].
    pub fn to_record(&self) -> AutomatonRecord {
        match self {
            Automaton::Deterministic(dfa) => dfa.to_record(),
            Automaton::Nondeterministic(nfa) => nfa.to_record(),
        }
    }
}
