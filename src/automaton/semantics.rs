use std::collections::VecDeque;

use tracing::trace;

use crate::{
    alphabet::{Label, Symbol},
    error::{Error, MissingTransitionError, ValidationError},
    math::Set,
    state::{State, StateSet},
};

use super::{Automaton, Dfa, Nfa, Target};

impl<T: Target> Automaton<T> {
    /// Splits `input` into symbols, verifying that each of them belongs to the alphabet.
    pub fn symbols_of(&self, input: &str) -> Result<Vec<Symbol>, ValidationError> {
        input
            .chars()
            .map(|sym| {
                if self.alphabet().contains(&sym) {
                    Ok(sym)
                } else {
                    Err(ValidationError::UnknownInputSymbol(sym))
                }
            })
            .collect()
    }
}

impl Nfa {
    /// Computes the lambda closure of `state`, that is the smallest set that contains
    /// `state` and is closed under following lambda transitions. Cycles of lambda
    /// transitions are fine, every state is expanded at most once.
    pub fn lambda_closure(&self, state: &State) -> StateSet {
        let mut closure = StateSet::from([state.clone()]);
        let mut queue = VecDeque::from([state]);

        while let Some(q) = queue.pop_front() {
            let Some(targets) = self.transition(q, Label::Lambda) else {
                continue;
            };
            for p in targets {
                if closure.insert(p.clone()) {
                    queue.push_back(p);
                }
            }
        }
        closure
    }

    /// Computes the lambda closure of every state in `states` and returns their union.
    pub fn lambda_closure_of<'a, I>(&self, states: I) -> StateSet
    where
        I: IntoIterator<Item = &'a State>,
    {
        let mut seen = Set::default();
        let mut out = StateSet::new();
        for q in states {
            if seen.insert(q) {
                out.extend(self.lambda_closure(q));
            }
        }
        out
    }

    /// Returns the configuration reached from `current` by reading `symbol`: the union of
    /// the lambda closures of every state that some state of `current` transitions to on
    /// `symbol`. The lambda closure of `current` itself is not taken.
    pub fn step_closure(&self, current: &StateSet, symbol: Symbol) -> StateSet {
        self.lambda_closure_of(
            current
                .iter()
                .filter_map(|q| self.transition(q, Label::Symbol(symbol)))
                .flatten(),
        )
    }

    /// Returns the sequence of configurations the automaton passes through while reading
    /// `input`. The first configuration is the lambda closure of the initial state, the
    /// last is the one reached after the whole input.
    pub fn read_input_stepwise(&self, input: &str) -> Result<Vec<StateSet>, ValidationError> {
        let symbols = self.symbols_of(input)?;
        let mut configurations = Vec::with_capacity(symbols.len() + 1);
        let mut current = self.lambda_closure(self.initial());
        for sym in symbols {
            let next = self.step_closure(&current, sym);
            configurations.push(std::mem::replace(&mut current, next));
        }
        configurations.push(current);
        Ok(configurations)
    }

    /// Returns the configuration reached after reading `input`.
    pub fn read_input(&self, input: &str) -> Result<StateSet, ValidationError> {
        Ok(self
            .read_input_stepwise(input)?
            .pop()
            .unwrap_or_default())
    }

    /// Returns whether `input` is accepted, i.e. whether the configuration reached after
    /// reading it contains a final state.
    pub fn accepts(&self, input: &str) -> Result<bool, Error> {
        let reached = self.read_input(input)?;
        let accepted = reached.iter().any(|q| self.is_final(q));
        trace!("nfa {} {input:?}", if accepted { "accepts" } else { "rejects" });
        Ok(accepted)
    }
}

impl Dfa {
    /// Returns the state reached from `state` on `symbol`.
    pub fn successor(
        &self,
        state: &State,
        symbol: Symbol,
    ) -> Result<&State, MissingTransitionError> {
        self.transition(state, symbol)
            .ok_or_else(|| MissingTransitionError {
                state: state.clone(),
                symbol,
            })
    }

    /// Returns the sequence of states visited while reading `input`, starting with the
    /// initial state.
    pub fn run(&self, input: &str) -> Result<Vec<State>, Error> {
        let symbols = self.symbols_of(input)?;
        let mut states = Vec::with_capacity(symbols.len() + 1);
        let mut current = self.initial();
        states.push(current.clone());
        for sym in symbols {
            current = self.successor(current, sym)?;
            states.push(current.clone());
        }
        Ok(states)
    }

    /// Returns whether `input` leads from the initial state to a final state.
    pub fn accepts(&self, input: &str) -> Result<bool, Error> {
        let states = self.run(input)?;
        Ok(states.last().is_some_and(|q| self.is_final(q)))
    }
}
