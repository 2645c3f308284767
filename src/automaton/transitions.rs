use std::collections::BTreeMap;

use crate::{
    alphabet::Label,
    state::{State, StateSet},
    Show,
};

use super::Target;

/// The transition function of an automaton: for every state a map from [`Label`]s to
/// targets. Both levels are ordered, which makes every iteration over the transition
/// function independent of the order in which transitions were inserted.
///
/// The container owns all of its data, so [`Clone`] produces a deep copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionMap<T>(BTreeMap<State, BTreeMap<Label, T>>);

impl<T> Default for TransitionMap<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> TransitionMap<T> {
    /// Returns the entry of `state` for `label`.
    pub fn get(&self, state: &State, label: Label) -> Option<&T> {
        self.0.get(state).and_then(|row| row.get(&label))
    }

    /// Returns all entries of `state`.
    pub fn row(&self, state: &State) -> Option<&BTreeMap<Label, T>> {
        self.0.get(state)
    }

    /// Iterates over all states that have a (possibly empty) row, together with the row.
    pub fn rows(&self) -> impl Iterator<Item = (&State, &BTreeMap<Label, T>)> {
        self.0.iter()
    }

    /// Iterates over all states that have a row.
    pub fn sources(&self) -> impl Iterator<Item = &State> {
        self.0.keys()
    }

    /// Iterates over all labels used anywhere, possibly with repetitions.
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.0.values().flat_map(|row| row.keys().copied())
    }

    /// Ensures that `state` has a row, which may stay empty.
    pub fn add_row(&mut self, state: State) {
        self.0.entry(state).or_default();
    }

    /// Sets the entry of `state` for `label`, replacing whatever was there before.
    pub fn insert(&mut self, state: State, label: Label, target: T) {
        self.0.entry(state).or_default().insert(label, target);
    }

    /// Removes and returns the entry of `state` for `label`.
    pub fn remove(&mut self, state: &State, label: Label) -> Option<T> {
        self.0.get_mut(state).and_then(|row| row.remove(&label))
    }

    /// Gives mutable access to an entry, creating it from `T::default` if necessary.
    pub fn entry_mut(&mut self, state: State, label: Label) -> &mut T
    where
        T: Default,
    {
        self.0.entry(state).or_default().entry(label).or_default()
    }
}

impl<T: Target> TransitionMap<T> {
    /// Returns `true` if any state has a lambda entry with at least one target.
    pub fn has_lambda(&self) -> bool {
        self.0
            .values()
            .any(|row| row.get(&Label::Lambda).is_some_and(|t| t.count() > 0))
    }

    /// Flattens `self` into one [`TransitionPair`] per target state.
    pub fn pairs(&self) -> Vec<TransitionPair> {
        self.0
            .iter()
            .flat_map(|(source, row)| {
                row.iter().flat_map(move |(label, target)| {
                    target.targets().map(move |q| TransitionPair {
                        source: source.clone(),
                        target: q.clone(),
                        label: *label,
                    })
                })
            })
            .collect()
    }
}

impl TransitionMap<StateSet> {
    /// Adds `target` to the set stored for `state` and `label`.
    pub fn add_target(&mut self, state: State, label: Label, target: State) {
        self.entry_mut(state, label).insert(target);
    }
}

impl<T> FromIterator<(State, Label, T)> for TransitionMap<T> {
    fn from_iter<I: IntoIterator<Item = (State, Label, T)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (state, label, target) in iter {
            map.insert(state, label, target);
        }
        map
    }
}

/// A single edge of the transition graph, as handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionPair {
    /// Origin of the edge.
    pub source: State,
    /// Destination of the edge.
    pub target: State,
    /// What the edge reads, lambda renders as `λ`.
    pub label: Label,
}

impl Show for TransitionPair {
    fn show(&self) -> String {
        format!("({}, {}, {})", self.source, self.target, self.label)
    }
}
