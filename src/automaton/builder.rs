use tracing::debug;

use crate::{
    alphabet::{Label, Symbol},
    error::ValidationError,
    math::OrderedSet,
    state::{State, StateSet},
};

use super::{Automaton, AutomatonParts, Dfa, Nfa, Target, TransitionMap};

/// Helper struct for the construction of automata. It collects states, alphabet,
/// transitions, the initial state and the final states and verifies them when
/// [`AutomatonBuilder::build`] is called.
///
/// States and alphabet are optional. If no states are given, the states are exactly the
/// states that have a row in the transition function. If no alphabet is given, it
/// consists of every symbol that labels some transition (lambda is never included).
///
/// # Example
///
/// A DFA over `['a', 'b']` with states `q0` and `q1` that accepts all words with an
/// odd number of `b`s:
/// ```
/// use automata_witness::prelude::*;
///
/// let dfa = Dfa::builder()
///     .with_transitions([
///         ("q0", 'a', "q0"),
///         ("q0", 'b', "q1"),
///         ("q1", 'a', "q1"),
///         ("q1", 'b', "q0"),
///     ])
///     .initial("q0")
///     .with_finals(["q1"])
///     .build()
///     .unwrap();
/// assert!(dfa.accepts("abab").is_ok_and(|accepted| !accepted));
/// ```
#[derive(Debug, Clone)]
pub struct AutomatonBuilder<T> {
    states: Option<StateSet>,
    alphabet: Option<OrderedSet<Symbol>>,
    transitions: TransitionMap<T>,
    initial: Option<State>,
    finals: StateSet,
    allow_partial: bool,
    error: Option<ValidationError>,
}

impl<T> Default for AutomatonBuilder<T> {
    fn default() -> Self {
        Self {
            states: None,
            alphabet: None,
            transitions: TransitionMap::default(),
            initial: None,
            finals: StateSet::new(),
            allow_partial: false,
            error: None,
        }
    }
}

impl<T: Target> AutomatonBuilder<T> {
    /// Declares the states explicitly instead of inferring them from the transitions.
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        self.states
            .get_or_insert_with(StateSet::new)
            .extend(states.into_iter().map(Into::into));
        self
    }

    /// Declares the alphabet explicitly instead of inferring it from the transitions.
    pub fn with_alphabet<I: IntoIterator<Item = Symbol>>(mut self, symbols: I) -> Self {
        self.alphabet
            .get_or_insert_with(OrderedSet::new)
            .extend(symbols);
        self
    }

    /// Sets the initial state.
    pub fn initial<S: Into<State>>(mut self, state: S) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Adds final states.
    pub fn with_finals<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        self.finals.extend(states.into_iter().map(Into::into));
        self
    }

    /// Gives `state` a row in the transition function even if it has no transitions,
    /// which makes it a state when the states are inferred.
    pub fn with_row<S: Into<State>>(mut self, state: S) -> Self {
        self.transitions.add_row(state.into());
        self
    }

    /// Skips the totality check for deterministic automata. Running such an automaton
    /// on a word that needs a missing transition yields a
    /// [`crate::error::MissingTransitionError`].
    pub fn allow_partial(mut self) -> Self {
        self.allow_partial = true;
        self
    }

    /// Verifies the collected parts and builds the automaton.
    pub fn build(self) -> Result<Automaton<T>, ValidationError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let Some(initial) = self.initial else {
            return Err(ValidationError::MissingInitialState);
        };

        let states = self.states.unwrap_or_else(|| {
            let inferred = self.transitions.sources().cloned().collect::<StateSet>();
            debug!("inferred {} states from transitions", inferred.len());
            inferred
        });
        let alphabet = self.alphabet.unwrap_or_else(|| {
            self.transitions
                .labels()
                .filter_map(|label| label.symbol())
                .collect()
        });

        Automaton::from_parts_checked(
            AutomatonParts {
                states,
                alphabet,
                transitions: self.transitions,
                initial,
                finals: self.finals,
            },
            self.allow_partial,
        )
    }
}

impl AutomatonBuilder<State> {
    /// Adds transitions `(source, symbol, target)`. A later transition for the same
    /// source and symbol replaces an earlier one.
    pub fn with_transitions<I, S, P>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (S, Symbol, P)>,
        S: Into<State>,
        P: Into<State>,
    {
        for (source, symbol, target) in transitions {
            self.transitions
                .insert(source.into(), Label::Symbol(symbol), target.into());
        }
        self
    }
}

impl AutomatonBuilder<StateSet> {
    /// Adds edges `(source, label, target)`. Edges with the same source and label are
    /// collected into one target set. Labels can be symbols or [`Label::Lambda`].
    pub fn with_edges<I, S, L, P>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (S, L, P)>,
        S: Into<State>,
        L: Into<Label>,
        P: Into<State>,
    {
        for (source, label, target) in edges {
            self.transitions
                .add_target(source.into(), label.into(), target.into());
        }
        self
    }

    /// Adds a lambda edge from `source` to `target`.
    pub fn with_lambda<S: Into<State>, P: Into<State>>(mut self, source: S, target: P) -> Self {
        self.transitions
            .add_target(source.into(), Label::Lambda, target.into());
        self
    }

    /// Sets the complete target set of `source` on `label`, which may be empty.
    pub fn with_targets<S, L, I, P>(mut self, source: S, label: L, targets: I) -> Self
    where
        S: Into<State>,
        L: Into<Label>,
        I: IntoIterator<Item = P>,
        P: Into<State>,
    {
        self.transitions.insert(
            source.into(),
            label.into(),
            targets.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Adds edges given with textual labels, where the empty token stands for lambda.
    /// An invalid token makes [`AutomatonBuilder::build`] fail.
    pub fn with_token_edges<'a, I, S, P>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (S, &'a str, P)>,
        S: Into<State>,
        P: Into<State>,
    {
        for (source, token, target) in edges {
            match Label::from_token(token) {
                Ok(label) => self
                    .transitions
                    .add_target(source.into(), label, target.into()),
                Err(e) => {
                    self.error.get_or_insert(e);
                }
            }
        }
        self
    }
}

impl Dfa {
    /// Shorthand for building a deterministic automaton from its transitions.
    pub fn from_transitions<I, S, P, F, R>(
        transitions: I,
        initial: R,
        finals: F,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (S, Symbol, P)>,
        S: Into<State>,
        P: Into<State>,
        F: IntoIterator<Item = R>,
        R: Into<State>,
    {
        Self::builder()
            .with_transitions(transitions)
            .initial(initial)
            .with_finals(finals)
            .build()
    }
}

impl Nfa {
    /// Shorthand for building a nondeterministic automaton from its edges.
    pub fn from_edges<I, S, L, P, F, R>(
        edges: I,
        initial: R,
        finals: F,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (S, L, P)>,
        S: Into<State>,
        L: Into<Label>,
        P: Into<State>,
        F: IntoIterator<Item = R>,
        R: Into<State>,
    {
        Self::builder()
            .with_edges(edges)
            .initial(initial)
            .with_finals(finals)
            .build()
    }
}
