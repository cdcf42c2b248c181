use crate::{math::OrderedSet, prelude::*};

/// A state of a determinized automaton, which is a set of states of the nondeterministic
/// automaton it was constructed from. Two subsets are the same state if and only if they
/// contain the same states, and as the states are kept sorted, the shown name of a subset
/// (e.g. `{q0,q1}`) is reproducible.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Subset<Q: Ord>(OrderedSet<Q>);

impl<Q: State> Subset<Q> {
    /// Creates a new subset containing the given states.
    pub fn new<I: IntoIterator<Item = Q>>(states: I) -> Self {
        Self(states.into_iter().collect())
    }

    /// Returns true if `state` is an element of the subset.
    pub fn contains(&self, state: &Q) -> bool {
        self.0.contains(state)
    }

    /// Iterates over the elements in ascending order.
    pub fn iter(&self) -> std::collections::btree_set::Iter<'_, Q> {
        self.0.iter()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the subset has no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a reference to the underlying set.
    pub fn as_set(&self) -> &OrderedSet<Q> {
        &self.0
    }

    /// Consumes `self` and returns the underlying set.
    pub fn into_inner(self) -> OrderedSet<Q> {
        self.0
    }
}

impl<Q: State> FromIterator<Q> for Subset<Q> {
    fn from_iter<T: IntoIterator<Item = Q>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'a, Q: State> IntoIterator for &'a Subset<Q> {
    type Item = &'a Q;
    type IntoIter = std::collections::btree_set::Iter<'a, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<Q: State> Show for Subset<Q> {
    fn show(&self) -> String {
        self.0.show()
    }
}

impl<Q: State> std::fmt::Debug for Subset<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}

impl<Q: State> std::fmt::Display for Subset<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}

#[cfg(test)]
mod tests {
    use super::Subset;
    use crate::Show;

    #[test]
    fn subsets_are_sorted_sets() {
        let subset = Subset::new(["q2", "q0", "q2"]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.show(), "{q0,q2}");
        assert_eq!(format!("{subset:?}"), "{q0,q2}");
        assert_eq!(subset, ["q0", "q2"].into_iter().collect::<Subset<_>>());
        assert!(Subset::new(["q0"]) < subset);
        assert!(Subset::<u32>::default().is_empty());
    }
}
