use tracing::debug;

use crate::{
    alphabet::{Label, Symbol},
    automaton::{AutomatonParts, Dfa, Nfa, TransitionMap},
    math::OrderedSet,
    state::{State, StateSet},
};

/// The first `symbols` lowercase latin letters, continuing into the following unicode
/// scalar values for larger alphabets.
pub fn alphabet_of_size(symbols: usize) -> OrderedSet<Symbol> {
    ('a'..).take(symbols).collect()
}

fn state_names(size: usize) -> Vec<State> {
    (0..size.max(1)).map(|i| State::new(format!("q{i}"))).collect()
}

fn random_finals(states: &[State]) -> StateSet {
    states.iter().filter(|_| fastrand::bool()).cloned().collect()
}

/// Generates a random nondeterministic automaton with `size` states (at least one)
/// named `q0, q1, ...` over [`alphabet_of_size`]`(symbols)`. The initial state is `q0`.
///
/// For every pair of states, an edge labeled with a given symbol is inserted with
/// probability `density` and a lambda edge is inserted with probability
/// `lambda_probability`. Each state is final with probability one half.
pub fn generate_random_nfa(
    symbols: usize,
    size: usize,
    density: f64,
    lambda_probability: f64,
) -> Nfa {
    let alphabet = alphabet_of_size(symbols);
    let states = state_names(size);

    let mut transitions = TransitionMap::default();
    for source in &states {
        transitions.add_row(source.clone());
        for target in &states {
            for &sym in &alphabet {
                if fastrand::f64() < density {
                    transitions.add_target(source.clone(), Label::Symbol(sym), target.clone());
                }
            }
            if fastrand::f64() < lambda_probability {
                transitions.add_target(source.clone(), Label::Lambda, target.clone());
            }
        }
    }

    let finals = random_finals(&states);
    debug!(
        "generated random nfa with {} states and {} edges",
        states.len(),
        transitions.pairs().len()
    );
    Nfa::from_parts_unchecked(AutomatonParts {
        initial: states[0].clone(),
        states: states.into_iter().collect(),
        alphabet,
        transitions,
        finals,
    })
}

/// Generates a random total deterministic automaton of `size` states (at least one) by
/// drawing the target of every transition uniformly. Depending on the draw, some
/// states may be unreachable from the initial state `q0`.
pub fn generate_random_dfa(symbols: usize, size: usize) -> Dfa {
    let alphabet = alphabet_of_size(symbols);
    let states = state_names(size);

    let mut transitions = TransitionMap::default();
    for source in &states {
        transitions.add_row(source.clone());
        for &sym in &alphabet {
            let target = states[fastrand::usize(..states.len())].clone();
            transitions.insert(source.clone(), Label::Symbol(sym), target);
        }
    }

    let finals = random_finals(&states);
    Dfa::from_parts_unchecked(AutomatonParts {
        initial: states[0].clone(),
        states: states.into_iter().collect(),
        alphabet,
        transitions,
        finals,
    })
}

/// Generates a random word over `alphabet` whose length is drawn uniformly from
/// `min_len..=max_len`. An empty alphabet only yields the empty word.
pub fn generate_random_word(
    alphabet: &OrderedSet<Symbol>,
    min_len: usize,
    max_len: usize,
) -> String {
    let charset = alphabet.iter().copied().collect::<Vec<_>>();
    if charset.is_empty() {
        return String::new();
    }

    let length = fastrand::usize(min_len..=max_len.max(min_len));
    (0..length)
        .map(|_| charset[fastrand::usize(..charset.len())])
        .collect()
}
