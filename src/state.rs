use std::{cmp::Ordering, fmt::Display};

use itertools::Itertools;

use crate::{math::OrderedSet, Show};

/// The glyph standing in for the destination of a step that has no successor.
pub const DEAD_MARKER: &str = "∅";

/// An opaque state name.
///
/// States are ordered lexicographically by their name with all braces removed, so a
/// merged state like `{q0,q2}` sorts next to `q0`. Names that only differ in braces
/// fall back to comparing the raw text, which keeps the ordering consistent with
/// equality.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct State(String);

/// A set of states, ordered by the [`State`] ordering.
pub type StateSet = OrderedSet<State>;

impl State {
    /// Creates a state with the given name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    /// The name of the state.
    pub fn name(&self) -> &str {
        &self.0
    }

    fn sort_key(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars().filter(|c| !matches!(c, '{' | '}'))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(other.sort_key())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for State {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for State {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&State> for State {
    fn from(value: &State) -> Self {
        value.clone()
    }
}

impl Show for State {
    fn show(&self) -> String {
        self.0.clone()
    }

    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
        I::IntoIter: DoubleEndedIterator,
    {
        format!("{{{}}}", iter.into_iter().map(|q| q.show()).join(","))
    }
}

impl Show for StateSet {
    fn show(&self) -> String {
        State::show_collection(self.iter())
    }
}

/// Where a step of a run starts or ends: a real state or the dead marker, which
/// stands for "no successor" and is never a member of an automaton's states.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    /// A state of the automaton.
    State(State),
    /// No successor exists.
    Dead,
}

impl Position {
    /// Returns the state if this is not the dead marker.
    pub fn state(&self) -> Option<&State> {
        match self {
            Position::State(q) => Some(q),
            Position::Dead => None,
        }
    }

    /// Returns `true` for the dead marker.
    pub fn is_dead(&self) -> bool {
        matches!(self, Position::Dead)
    }
}

impl From<State> for Position {
    fn from(value: State) -> Self {
        Position::State(value)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::State(q) => write!(f, "{q}"),
            Position::Dead => write!(f, "{DEAD_MARKER}"),
        }
    }
}

impl Show for Position {
    fn show(&self) -> String {
        self.to_string()
    }
}

/// Builds a [`StateSet`] from anything that converts into states.
pub fn state_set<I, S>(iter: I) -> StateSet
where
    I: IntoIterator<Item = S>,
    S: Into<State>,
{
    iter.into_iter().map(Into::into).collect()
}
