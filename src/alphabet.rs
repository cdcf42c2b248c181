use std::borrow::Borrow;

use itertools::Itertools;

use crate::{math::OrderedSet, Show, Symbol};

/// The token that designates an empty transition when an automaton is exported to a record.
pub const EPSILON: &str = "lambda";

/// All tokens that are read as an empty transition when importing a record.
pub const EPSILON_TOKENS: [&str; 3] = [EPSILON, "λ", ""];

/// Returns true if `token` is reserved for empty transitions and can thus not be used
/// as an alphabet symbol.
pub fn is_epsilon_token(token: &str) -> bool {
    EPSILON_TOKENS.contains(&token)
}

/// The label of a transition in a nondeterministic automaton. It is either a symbol from
/// the alphabet or the empty word, which the automaton may follow without consuming input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label<S> {
    /// A transition on the given alphabet symbol.
    Symbol(S),
    /// An empty transition.
    Epsilon,
}

impl<S> Label<S> {
    /// Returns the symbol if `self` is not an empty transition.
    pub fn symbol(&self) -> Option<&S> {
        match self {
            Label::Symbol(sym) => Some(sym),
            Label::Epsilon => None,
        }
    }

    /// Returns true if `self` is an empty transition.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// Converts from `&Label<S>` to `Label<&S>`.
    pub fn as_ref(&self) -> Label<&S> {
        match self {
            Label::Symbol(sym) => Label::Symbol(sym),
            Label::Epsilon => Label::Epsilon,
        }
    }
}

impl Label<String> {
    /// Reads a label from its textual form, where the tokens in [`EPSILON_TOKENS`] denote an
    /// empty transition and everything else is taken as a symbol.
    pub fn parse(token: &str) -> Self {
        if is_epsilon_token(token) {
            Label::Epsilon
        } else {
            Label::Symbol(token.to_string())
        }
    }
}

impl<S> From<S> for Label<S> {
    fn from(value: S) -> Self {
        Label::Symbol(value)
    }
}

impl<S: Show> Show for Label<S> {
    fn show(&self) -> String {
        match self {
            Label::Symbol(sym) => sym.show(),
            Label::Epsilon => EPSILON.to_string(),
        }
    }
}

/// A finite alphabet, which is a set of symbols. Symbols are always traversed in the order
/// that is given by their [`Ord`] implementation, which makes every algorithm that iterates
/// over an alphabet reproducible.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Alphabet<S: Symbol>(OrderedSet<S>);

impl<S: Symbol> Default for Alphabet<S> {
    fn default() -> Self {
        Self(OrderedSet::new())
    }
}

impl<S: Symbol> Alphabet<S> {
    /// Creates a new alphabet from the given symbols, duplicates are ignored.
    pub fn new<I: IntoIterator<Item = S>>(symbols: I) -> Self {
        Self(symbols.into_iter().collect())
    }

    /// Returns true if `symbol` is part of the alphabet.
    pub fn contains<B>(&self, symbol: &B) -> bool
    where
        S: Borrow<B>,
        B: Ord + ?Sized,
    {
        self.0.contains(symbol)
    }

    /// Adds a symbol to the alphabet, returns false if it was already present.
    pub fn insert(&mut self, symbol: S) -> bool {
        self.0.insert(symbol)
    }

    /// Iterates over the symbols in ascending order.
    pub fn iter(&self) -> std::collections::btree_set::Iter<'_, S> {
        self.0.iter()
    }

    /// The number of symbols.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the position of `symbol` in the order in which the alphabet is traversed.
    pub fn position(&self, symbol: &S) -> Option<usize> {
        self.0.iter().position(|s| s == symbol)
    }

    /// Returns the union of `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }
}

impl<S: Symbol> FromIterator<S> for Alphabet<S> {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'a, S: Symbol> IntoIterator for &'a Alphabet<S> {
    type Item = &'a S;
    type IntoIter = std::collections::btree_set::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: Symbol> IntoIterator for Alphabet<S> {
    type Item = S;
    type IntoIter = std::collections::btree_set::IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<S: Symbol> Show for Alphabet<S> {
    fn show(&self) -> String {
        format!("{{{}}}", self.0.iter().map(|s| s.show()).join(", "))
    }
}
