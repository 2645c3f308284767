//! Errors raised while building or running automata.

use thiserror::Error;

use crate::{alphabet::Label, state::State};

/// A malformed automaton or a malformed input. Raised at construction or at the point
/// of use and always handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The state set is empty and could not be inferred.
    #[error("an automaton needs at least one state")]
    NoStates,

    /// The builder was never told which state is initial.
    #[error("no initial state was given")]
    MissingInitialState,

    /// The initial state is not one of the states.
    #[error("initial state {0} is not a declared state")]
    UndeclaredInitialState(State),

    /// A final state is not one of the states.
    #[error("final state {0} is not a declared state")]
    UndeclaredFinalState(State),

    /// A transition row belongs to a state that was not declared.
    #[error("transition source {0} is not a declared state")]
    UndeclaredSource(State),

    /// A transition leads to a state that was not declared.
    #[error("transition {from} --{label}--> {to} leads to an undeclared state")]
    UndeclaredTarget {
        /// Origin of the transition.
        from: State,
        /// Label of the transition.
        label: Label,
        /// The undeclared target.
        to: State,
    },

    /// A transition reads a symbol that the declared alphabet does not contain.
    #[error("symbol {symbol} used by state {state} is not in the alphabet")]
    SymbolNotInAlphabet {
        /// Origin of the transition.
        state: State,
        /// The offending symbol.
        symbol: char,
    },

    /// A textual transition token could not be parsed into a [`Label`].
    #[error("token {0:?} is neither empty (lambda) nor a single symbol")]
    InvalidToken(String),

    /// Deterministic automata do not have lambda transitions.
    #[error("deterministic automaton has a lambda transition in state {0}")]
    LambdaInDeterministic(State),

    /// A deterministic automaton lacks a transition and was not built as partial.
    #[error("state {state} has no transition on {symbol}")]
    NotTotal {
        /// State lacking the transition.
        state: State,
        /// Symbol without transition.
        symbol: char,
    },

    /// A nondeterministic target set cannot be turned into a single target.
    #[error("state {state} has {count} targets on {label}, a deterministic automaton needs exactly one")]
    NotDeterministic {
        /// Origin of the transition.
        state: State,
        /// Label of the transition.
        label: Label,
        /// Number of targets found.
        count: usize,
    },

    /// An input string contains a symbol outside the alphabet.
    #[error("input symbol {0} is not in the alphabet")]
    UnknownInputSymbol(char),
}

/// A deterministic automaton reached a state that has no transition for the symbol
/// being read. Well-formed (total) automata never produce this.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no transition from {state} on {symbol}")]
pub struct MissingTransitionError {
    /// The state that was reached.
    pub state: State,
    /// The symbol that could not be read.
    pub symbol: char,
}

/// Any error the crate produces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// See [`ValidationError`].
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// See [`MissingTransitionError`].
    #[error(transparent)]
    MissingTransition(#[from] MissingTransitionError),
}
