use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hash;

use crate::Show;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Type alias for sets whose iteration order is given by the order on the elements.
pub type OrderedSet<S> = BTreeSet<S>;
/// Type alias for maps whose iteration order is given by the order on the keys.
pub type OrderedMap<K, V> = BTreeMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A partition is a different view on an equivalence relation, by grouping elements of
/// type `I` into their respective classes (which we call blocks) under the relation.
#[derive(Debug, Clone)]
pub struct Partition<I: Hash + Eq>(Vec<BTreeSet<I>>);

impl<I: Hash + Eq> std::ops::Deref for Partition<I> {
    type Target = Vec<BTreeSet<I>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, I: Hash + Eq> IntoIterator for &'a Partition<I> {
    type Item = &'a BTreeSet<I>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Hash + Eq> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}
impl<I: Hash + Eq> Eq for Partition<I> {}

impl<I: Hash + Eq + Ord> Partition<I> {
    /// Returns the size of the partition, i.e. the number of blocks.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators
    /// which yield elements of type `I`. Empty blocks are dropped.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect::<BTreeSet<_>>())
                .filter(|block| !block.is_empty())
                .collect(),
        )
    }

    /// Returns the index of the block that contains `element`, or `None` if no
    /// block contains it.
    pub fn block_of(&self, element: &I) -> Option<usize> {
        self.0.iter().position(|block| block.contains(element))
    }

    /// Builds a lookup table that sends every element to the index of its block.
    pub fn block_index(&self) -> Map<&I, usize> {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(i, block)| block.iter().map(move |element| (element, i)))
            .collect()
    }

    /// Consumes the partition and returns its blocks.
    pub fn into_blocks(self) -> Vec<BTreeSet<I>> {
        self.0
    }
}

impl<I: Hash + Eq + Ord> From<Vec<BTreeSet<I>>> for Partition<I> {
    fn from(value: Vec<BTreeSet<I>>) -> Self {
        Self(value)
    }
}

impl<I: Hash + Eq + Show> Show for Partition<I> {
    fn show(&self) -> String {
        format!(
            "[{}]",
            itertools::Itertools::join(&mut self.iter().map(|block| block.show()), ", ")
        )
    }
}
