use std::fmt::{Debug, Display};

use tracing::trace;

use crate::{
    alphabet::{Label, Symbol},
    error::ValidationError,
    math::OrderedSet,
    state::{State, StateSet},
    table::{canonical_table, Decorations, TransitionTable},
    Show,
};

mod builder;
pub use builder::AutomatonBuilder;

mod transitions;
pub use transitions::{TransitionMap, TransitionPair};

/// This module provides the operations that define what an automaton does with its
/// input: lambda closures, successor configurations and acceptance. The witness and
/// lambda elimination engines are built on top of these.
pub mod semantics;

mod minimize;
pub use minimize::Minimizer;

/// Seals the [`Target`] trait, it is implemented for [`State`] and [`StateSet`] only.
mod sealed {
    pub trait Sealed {}
    impl Sealed for crate::state::State {}
    impl Sealed for crate::state::StateSet {}
}

/// The value a transition entry maps to. A deterministic automaton has exactly one
/// [`State`] per entry, a nondeterministic one has a (possibly empty) [`StateSet`].
pub trait Target: Clone + Eq + Debug + Show + sealed::Sealed {
    /// `true` if every transition entry leads to precisely one state.
    const DETERMINISTIC: bool;

    /// Iterates over the states this entry leads to, in [`State`] order.
    fn targets(&self) -> impl Iterator<Item = &State>;

    /// The number of states this entry leads to.
    fn count(&self) -> usize;
}

impl Target for State {
    const DETERMINISTIC: bool = true;

    fn targets(&self) -> impl Iterator<Item = &State> {
        std::iter::once(self)
    }

    fn count(&self) -> usize {
        1
    }
}

impl Target for StateSet {
    const DETERMINISTIC: bool = false;

    fn targets(&self) -> impl Iterator<Item = &State> {
        self.iter()
    }

    fn count(&self) -> usize {
        self.len()
    }
}

/// A finite automaton consists of a set of states, an input alphabet, a transition
/// function, one initial state and a set of final (accepting) states.
///
/// The type parameter `T` determines how many states a transition leads to, see
/// [`Target`]. The two instantiations are [`Dfa`] and [`Nfa`]; they share every
/// operation that does not depend on the arity of transitions.
///
/// An automaton is never modified after it has been built. Every transformation
/// ([`Nfa::eliminate_lambda`], [`Dfa::minify`], conversions) returns a new value that
/// owns its own containers, so cloning is always a deep copy.
#[derive(Clone, PartialEq, Eq)]
pub struct Automaton<T: Target> {
    states: StateSet,
    alphabet: OrderedSet<Symbol>,
    transitions: TransitionMap<T>,
    initial: State,
    finals: StateSet,
}

/// A deterministic finite automaton, every transition leads to exactly one state and
/// there are no lambda transitions.
pub type Dfa = Automaton<State>;

/// A nondeterministic finite automaton, transitions lead to sets of states and may be
/// labeled with lambda.
pub type Nfa = Automaton<StateSet>;

/// The constituent parts of an [`Automaton`], without any guarantees about their
/// consistency. This is the representation used to exchange automata with code that
/// does not know about [`Automaton`], see for example [`Minimizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonParts<T> {
    /// All states.
    pub states: StateSet,
    /// The input alphabet, never containing lambda.
    pub alphabet: OrderedSet<Symbol>,
    /// The transition function.
    pub transitions: TransitionMap<T>,
    /// The initial state.
    pub initial: State,
    /// The final states.
    pub finals: StateSet,
}

impl<T: Target> Automaton<T> {
    /// Instantiates a new [`AutomatonBuilder`] for this kind of automaton.
    pub fn builder() -> AutomatonBuilder<T> {
        AutomatonBuilder::default()
    }

    /// Creates an automaton from its parts after verifying that they are consistent.
    /// Deterministic automata must be total.
    pub fn from_parts(parts: AutomatonParts<T>) -> Result<Self, ValidationError> {
        Self::from_parts_checked(parts, false)
    }

    pub(crate) fn from_parts_checked(
        parts: AutomatonParts<T>,
        allow_partial: bool,
    ) -> Result<Self, ValidationError> {
        let AutomatonParts {
            states,
            alphabet,
            transitions,
            initial,
            finals,
        } = parts;
        let automaton = Self {
            states,
            alphabet,
            transitions,
            initial,
            finals,
        };
        automaton.validate(allow_partial)?;
        trace!(
            "built {} automaton with {} states over {{{}}}",
            if T::DETERMINISTIC { "deterministic" } else { "nondeterministic" },
            automaton.size(),
            itertools::Itertools::join(&mut automaton.alphabet.iter(), ",")
        );
        Ok(automaton)
    }

    /// Assembles an automaton from parts that are known to be consistent, for example
    /// because they were derived from a validated automaton.
    pub(crate) fn from_parts_unchecked(parts: AutomatonParts<T>) -> Self {
        let automaton = Self {
            states: parts.states,
            alphabet: parts.alphabet,
            transitions: parts.transitions,
            initial: parts.initial,
            finals: parts.finals,
        };
        debug_assert_eq!(automaton.validate(true), Ok(()));
        automaton
    }

    /// Decomposes the automaton into its parts.
    pub fn into_parts(self) -> AutomatonParts<T> {
        AutomatonParts {
            states: self.states,
            alphabet: self.alphabet,
            transitions: self.transitions,
            initial: self.initial,
            finals: self.finals,
        }
    }

    /// Returns a copy of the parts of `self`.
    pub fn to_parts(&self) -> AutomatonParts<T> {
        self.clone().into_parts()
    }

    fn validate(&self, allow_partial: bool) -> Result<(), ValidationError> {
        if self.states.is_empty() {
            return Err(ValidationError::NoStates);
        }
        if !self.states.contains(&self.initial) {
            return Err(ValidationError::UndeclaredInitialState(
                self.initial.clone(),
            ));
        }
        if let Some(q) = self.finals.iter().find(|q| !self.states.contains(*q)) {
            return Err(ValidationError::UndeclaredFinalState(q.clone()));
        }

        for (source, row) in self.transitions.rows() {
            if !self.states.contains(source) {
                return Err(ValidationError::UndeclaredSource(source.clone()));
            }
            for (label, target) in row {
                match label {
                    Label::Lambda if T::DETERMINISTIC => {
                        return Err(ValidationError::LambdaInDeterministic(source.clone()))
                    }
                    Label::Symbol(symbol) if !self.alphabet.contains(symbol) => {
                        return Err(ValidationError::SymbolNotInAlphabet {
                            state: source.clone(),
                            symbol: *symbol,
                        })
                    }
                    _ => {}
                }
                if let Some(q) = target.targets().find(|q| !self.states.contains(*q)) {
                    return Err(ValidationError::UndeclaredTarget {
                        from: source.clone(),
                        label: *label,
                        to: q.clone(),
                    });
                }
            }
        }

        if T::DETERMINISTIC && !allow_partial {
            for q in &self.states {
                for &symbol in &self.alphabet {
                    if self.transitions.get(q, Label::Symbol(symbol)).is_none() {
                        return Err(ValidationError::NotTotal {
                            state: q.clone(),
                            symbol,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// All states of the automaton.
    pub fn states(&self) -> &StateSet {
        &self.states
    }

    /// The input alphabet. Lambda is never part of it.
    pub fn alphabet(&self) -> &OrderedSet<Symbol> {
        &self.alphabet
    }

    /// The transition function.
    pub fn transitions(&self) -> &TransitionMap<T> {
        &self.transitions
    }

    /// The initial state.
    pub fn initial(&self) -> &State {
        &self.initial
    }

    /// The final states.
    pub fn finals(&self) -> &StateSet {
        &self.finals
    }

    /// Returns `true` if `state` is final.
    pub fn is_final(&self, state: &State) -> bool {
        self.finals.contains(state)
    }

    /// Returns `true` if `state` is the initial state.
    pub fn is_initial(&self, state: &State) -> bool {
        &self.initial == state
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if at least one state has a lambda entry.
    pub fn has_lambda_transitions(&self) -> bool {
        self.transitions.has_lambda()
    }

    /// The entry of `state` for `label`, if there is one.
    pub fn transition<L: Into<Label>>(&self, state: &State, label: L) -> Option<&T> {
        self.transitions.get(state, label.into())
    }

    /// Flattens the transition function into a list of edges, one per target state.
    /// Empty target sets produce no edge. The list is sorted by source, then label,
    /// then target.
    pub fn transition_pairs(&self) -> Vec<TransitionPair> {
        self.transitions.pairs()
    }

    /// Renders the canonical transition table of `self` with the default decorations.
    pub fn table(&self) -> TransitionTable {
        canonical_table(self, &Decorations::default())
    }

    /// Renders the canonical transition table of `self` with the given decorations.
    pub fn table_with(&self, decorations: &Decorations) -> TransitionTable {
        canonical_table(self, decorations)
    }
}

impl<T: Target> Debug for Automaton<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table())
    }
}

impl<T: Target> Display for Automaton<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table())
    }
}

impl From<&Dfa> for Nfa {
    fn from(dfa: &Dfa) -> Self {
        let transitions = dfa
            .transitions
            .rows()
            .flat_map(|(q, row)| {
                row.iter()
                    .map(move |(label, p)| (q.clone(), *label, StateSet::from([p.clone()])))
            })
            .collect();
        Self {
            states: dfa.states.clone(),
            alphabet: dfa.alphabet.clone(),
            transitions,
            initial: dfa.initial.clone(),
            finals: dfa.finals.clone(),
        }
    }
}

impl From<Dfa> for Nfa {
    fn from(dfa: Dfa) -> Self {
        Nfa::from(&dfa)
    }
}

impl TryFrom<&Nfa> for Dfa {
    type Error = ValidationError;

    fn try_from(nfa: &Nfa) -> Result<Self, Self::Error> {
        let mut transitions = TransitionMap::default();
        for (q, row) in nfa.transitions.rows() {
            for (label, targets) in row {
                if label.is_lambda() {
                    return Err(ValidationError::LambdaInDeterministic(q.clone()));
                }
                let mut it = targets.iter();
                match (it.next(), it.next()) {
                    (Some(p), None) => transitions.insert(q.clone(), *label, p.clone()),
                    _ => {
                        return Err(ValidationError::NotDeterministic {
                            state: q.clone(),
                            label: *label,
                            count: targets.len(),
                        })
                    }
                }
            }
        }
        Dfa::from_parts(AutomatonParts {
            states: nfa.states.clone(),
            alphabet: nfa.alphabet.clone(),
            transitions,
            initial: nfa.initial.clone(),
            finals: nfa.finals.clone(),
        })
    }
}

impl TryFrom<Nfa> for Dfa {
    type Error = ValidationError;

    fn try_from(nfa: Nfa) -> Result<Self, Self::Error> {
        Dfa::try_from(&nfa)
    }
}
