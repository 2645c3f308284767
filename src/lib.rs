//! Library for inspecting finite automata on words.
//!
//! An automaton consists of a finite set of named states, an input alphabet of
//! characters, a transition function, one initial state and a set of final states. The
//! crate provides a single [`automaton::Automaton`] type which is generic over what a
//! transition leads to: [`automaton::Dfa`] maps every pair of state and symbol to
//! precisely one state, [`automaton::Nfa`] maps pairs of state and label to sets of
//! states, where a label is either a symbol or lambda (the empty word).
//!
//! On top of this, the crate implements three engines:
//! - the canonical transition table ([`table::canonical_table`]), a sorted, decorated
//!   grid that is independent of how the automaton was assembled,
//! - lambda elimination ([`automaton::Nfa::eliminate_lambda`]), which removes all lambda
//!   transitions while preserving the language of nonempty words,
//! - witness traces ([`witness::Witnessing`]), which exhibit a concrete run explaining
//!   why a word is accepted or rejected. For nondeterministic automata the run is
//!   found by a bounded randomized search and may not exist, in which case the
//!   [`witness::Witness::NoPathFound`] sentinel is returned.
//!
//! Automata are immutable once built; every transformation returns a new automaton.
//! The crate logs through [`tracing`] and leaves installing a subscriber to the caller.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_witness::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{Label, Symbol, LAMBDA_GLYPH},
        automaton::{
            Automaton, AutomatonBuilder, AutomatonParts, Dfa, Minimizer, Nfa, Target,
            TransitionMap, TransitionPair,
        },
        error::{Error, MissingTransitionError, ValidationError},
        math,
        state::{Position, State, StateSet, DEAD_MARKER},
        table::{canonical_table, Decorations, TransitionTable},
        witness::{
            SearchConfig, Verdict, Witness, WitnessStep, WitnessTrace, Witnessing,
            DEFAULT_INNER_BOUND, DEFAULT_OUTER_BOUND,
        },
        Show,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout
/// the crate and do not really fit to the top level.
pub mod math;

/// Input symbols and transition labels.
pub mod alphabet;

/// State names, sets of states and the dead marker.
pub mod state;

/// The errors reported when assembling automata or reading input.
pub mod error;

/// Defines automata, their construction and their semantics.
pub mod automaton;

pub mod table;

mod lambda;

pub mod witness;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;

/// Helper trait which can be used to display states, transitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state that is simply its
    /// name and for a transition `(q0, q1, a)` it is `(q0, q1, a)`.
    fn show(&self) -> String;

    /// Show a collection of the thing. By default this is a comma separated list in
    /// brackets, states override it to print sets like `{q0,q1}`.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
        I::IntoIter: DoubleEndedIterator,
    {
        format!(
            "[{}]",
            itertools::Itertools::join(&mut iter.into_iter().map(|x| x.show()), ", ")
        )
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn show_collections() {
        let pairs = vec![TransitionPair {
            source: State::from("q0"),
            target: State::from("q1"),
            label: Label::Lambda,
        }];
        assert_eq!(pairs.show(), "[(q0, q1, λ)]");
        assert_eq!(vec!['a', 'b'].show(), "[a, b]");
    }
}
