use std::collections::BTreeSet;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// Sets whose iteration order is observable (table rows, target cells, state sequences)
/// are kept ordered.
pub type OrderedSet<S> = BTreeSet<S>;

/// Assigns every element of `iter` a dense index, in iteration order. Used to address
/// states by position in bit-based data structures.
pub fn dense_indices<'a, T, I>(iter: I) -> Bijection<T, usize>
where
    T: Ord + Clone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    iter.into_iter()
        .cloned()
        .enumerate()
        .map(|(i, x)| (x, i))
        .collect()
}
