//! Library for working with finite automata on finite words in Rust.
//!
//! An automaton consists of a finite set of states, an alphabet, a transition relation, a designated
//! start state and a set of accepting states. We distinguish between a deterministic automaton
//! [`Dfa`], where every pair of state and symbol has at most one successor, and a nondeterministic
//! automaton [`Nfa`], which may have arbitrarily many successors per pair and additionally supports
//! empty transitions (see [`Label::Epsilon`]). Transition functions are allowed to be partial, a
//! missing transition simply means that the input is rejected.
//!
//! Both kinds of automata are generic over the type of their states and symbols. Anything that is
//! [`Clone`], totally ordered, hashable and can be shown (see [`Show`]) can be used, so states can for
//! example be `&'static str`, [`String`] or integers and symbols are typically [`char`] or [`String`].
//!
//! The crate provides two classical transformations, each of which produces a new, independent
//! automaton and never touches its input:
//! - [`Nfa::determinize`] performs the subset construction and yields a [`Dfa`] whose states are
//!   [`Subset`]s of the states of the input.
//! - `Dfa::minimize` (behind the `minimize` feature) prunes unreachable states and merges
//!   indistinguishable states through partition refinement, yielding the unique minimal automaton
//!   whose states are numbered canonically starting from `0` for the start state.
//!
//! Automata can be constructed programmatically through [`AutomatonBuilder`] or imported from a
//! plain [`AutomatonRecord`], which is also the format they can be exported to. Well-formedness is
//! checked by the [`Validate`] trait.
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_minimizer::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "minimize")]
    pub use super::minimization::{
        are_equivalent, minimize, minimize_with_summary, Minimization, Reduction,
    };
    pub use super::{
        alphabet::{Alphabet, Label, EPSILON},
        automaton::{
            Automaton, AutomatonBuilder, AutomatonKind, Dfa, Nfa, Operation, Statistics,
            TransformSummary,
        },
        determinization::{determinize, determinize_with_summary, Determinization, Subset},
        error::{Error, InvalidAutomaton, MalformedRecord},
        math,
        record::{AutomatonRecord, TransitionRecord},
        validation::{Validate, ValidationReport, Warning},
        Show, State, Symbol,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

mod show;
pub use show::Show;

/// Module that contains definitions for dealing with alphabets and transition labels.
pub mod alphabet;
pub use alphabet::{Alphabet, Label};

/// Errors that are raised when an automaton or a record is malformed.
pub mod error;
pub use error::{Error, InvalidAutomaton, MalformedRecord};

/// Defines deterministic and nondeterministic automata, their construction and the queries
/// that can be answered on them.
pub mod automaton;
pub use automaton::{Automaton, AutomatonBuilder, Dfa, Nfa};

/// Structural well-formedness checks for automata.
pub mod validation;
pub use validation::Validate;

/// Conversion of nondeterministic automata into deterministic ones through the subset construction.
pub mod determinization;
pub use determinization::Subset;

/// Contains the minimization of deterministic automata through partition refinement.
/// This is feature gated behind the `minimize` feature.
#[cfg(feature = "minimize")]
pub mod minimization;

/// Import and export of automata from and to plain structural records.
pub mod record;
pub use record::AutomatonRecord;

/// Implements the generation of random automata.
#[cfg(feature = "random")]
pub mod random;

use std::{fmt::Debug, hash::Hash};

/// A state is simply an opaque identifier, it carries no meaning beyond its identity. We
/// additionally demand a total order so that every traversal of a collection of states
/// happens in a reproducible order.
pub trait State: Clone + Eq + Ord + Hash + Debug + Show {}

impl<T: Clone + Eq + Ord + Hash + Debug + Show> State for T {}

/// A symbol is an element of the input alphabet of an automaton. The bounds are the same as
/// for [`State`], the order of symbols determines the order in which alphabets are traversed.
pub trait Symbol: Clone + Eq + Ord + Hash + Debug + Show {}

impl<T: Clone + Eq + Ord + Hash + Debug + Show> Symbol for T {}
