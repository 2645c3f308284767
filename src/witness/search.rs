use bit_set::BitSet;
use tracing::{debug, trace, warn};

use crate::{
    alphabet::Symbol,
    automaton::Nfa,
    math::{dense_indices, Bijection, Map},
    state::{State, StateSet},
};

use super::Verdict;

/// Default number of walks a single search attempt may make.
pub const DEFAULT_INNER_BOUND: usize = 20_000;
/// Default number of attempts before the search gives up.
pub const DEFAULT_OUTER_BOUND: usize = 50;

/// Bounds and randomness of the witness search in nondeterministic automata.
///
/// The search makes at most `outer_bound` attempts, each of which may make at most
/// `inner_bound` walks. A walk descends from the root or from the last backtracking
/// point until it reaches the end of the input or gets stuck, so a single walk may
/// cover the whole input. Without a seed, every search draws fresh randomness and may
/// produce a different witness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Walks per attempt.
    pub inner_bound: usize,
    /// Number of attempts.
    pub outer_bound: usize,
    /// Seed for reproducible searches.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            inner_bound: DEFAULT_INNER_BOUND,
            outer_bound: DEFAULT_OUTER_BOUND,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Makes the search reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets both retry bounds.
    pub fn with_bounds(mut self, inner_bound: usize, outer_bound: usize) -> Self {
        self.inner_bound = inner_bound;
        self.outer_bound = outer_bound;
        self
    }
}

/// A run found by the search. If `dead_end` is set, the last state has no successor for
/// the next symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FoundPath {
    pub(crate) states: Vec<State>,
    pub(crate) dead_end: bool,
}

enum Attempt {
    Found(Vec<usize>, bool),
    Exhausted,
    Impossible,
}

/// Randomized depth first search for a run of an [`Nfa`] on a fixed word that ends
/// with the requested verdict.
///
/// Each attempt walks from the initial state and picks a successor uniformly at random
/// among those not known to be dead. A configuration `(state, position)` is dead if no
/// run continuing from it can produce the requested verdict; dead configurations are
/// remembered across attempts, so later attempts never re-explore them.
pub(crate) struct PathSearch<'a> {
    nfa: &'a Nfa,
    symbols: &'a [Symbol],
    goal: Verdict,
    indices: Bijection<State, usize>,
    dead: BitSet,
    successors: Map<(usize, Symbol), Vec<usize>>,
    rng: fastrand::Rng,
}

impl<'a> PathSearch<'a> {
    pub(crate) fn new(
        nfa: &'a Nfa,
        symbols: &'a [Symbol],
        goal: Verdict,
        seed: Option<u64>,
    ) -> Self {
        let indices = dense_indices(nfa.states());
        let dead = BitSet::with_capacity(indices.len() * (symbols.len() + 1));
        Self {
            nfa,
            symbols,
            goal,
            indices,
            dead,
            successors: Map::default(),
            rng: seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed),
        }
    }

    /// Runs up to `config.outer_bound` attempts and returns the first path found.
    pub(crate) fn run(mut self, config: &SearchConfig) -> Option<FoundPath> {
        for attempt in 1..=config.outer_bound {
            match self.attempt(config.inner_bound) {
                Attempt::Found(path, dead_end) => {
                    trace!("found {} path in attempt {attempt}", self.goal);
                    return Some(FoundPath {
                        states: path.into_iter().map(|i| self.state(i).clone()).collect(),
                        dead_end,
                    });
                }
                Attempt::Exhausted => {
                    trace!("attempt {attempt} ran out of budget");
                }
                Attempt::Impossible => {
                    debug!("no {} path exists", self.goal);
                    return None;
                }
            }
        }
        warn!(
            "giving up the search for a {} path after {} attempts",
            self.goal, config.outer_bound
        );
        None
    }

    /// Walks from the root until a path is found or `budget` walks have ended without
    /// one. A walk ends where its descent stops; the backtracking that follows is free.
    fn attempt(&mut self, budget: usize) -> Attempt {
        let root = self.index(self.nfa.initial());
        if self.is_dead(0, root) {
            return Attempt::Impossible;
        }
        if budget == 0 {
            return Attempt::Exhausted;
        }

        let mut path = vec![root];
        let mut walks = 0;
        let mut descending = true;
        while let Some(&state) = path.last() {
            let position = path.len() - 1;
            if position == self.symbols.len() {
                if self.completes(state) {
                    return Attempt::Found(path, false);
                }
            } else {
                let successors = self.successors(state, self.symbols[position]);
                if successors.is_empty() && self.goal == Verdict::Rejected {
                    return Attempt::Found(path, true);
                }
                let alive = successors
                    .into_iter()
                    .filter(|&next| !self.is_dead(position + 1, next))
                    .collect::<Vec<_>>();
                if !alive.is_empty() {
                    path.push(alive[self.rng.usize(..alive.len())]);
                    descending = true;
                    continue;
                }
            }

            if descending {
                walks += 1;
                descending = false;
            }
            self.backtrack(&mut path);
            if walks >= budget && !path.is_empty() {
                return Attempt::Exhausted;
            }
        }
        Attempt::Impossible
    }

    /// Whether a run that consumed the whole input and ended in `state` has the
    /// requested verdict.
    fn completes(&self, state: usize) -> bool {
        let accepting = self.nfa.is_final(self.state(state));
        match self.goal {
            Verdict::Accepted => accepting,
            Verdict::Rejected => !accepting,
        }
    }

    fn backtrack(&mut self, path: &mut Vec<usize>) {
        if let Some(state) = path.pop() {
            let position = path.len();
            self.dead.insert(self.slot(position, state));
        }
    }

    fn successors(&mut self, state: usize, symbol: Symbol) -> Vec<usize> {
        if let Some(cached) = self.successors.get(&(state, symbol)) {
            return cached.clone();
        }
        let current = StateSet::from([self.state(state).clone()]);
        let next = self
            .nfa
            .step_closure(&current, symbol)
            .iter()
            .map(|q| self.index(q))
            .collect::<Vec<_>>();
        self.successors.insert((state, symbol), next.clone());
        next
    }

    fn is_dead(&self, position: usize, state: usize) -> bool {
        self.dead.contains(self.slot(position, state))
    }

    fn slot(&self, position: usize, state: usize) -> usize {
        position * self.indices.len() + state
    }

    fn index(&self, state: &State) -> usize {
        *self
            .indices
            .get_by_left(state)
            .expect("every state of the automaton is indexed")
    }

    fn state(&self, index: usize) -> &State {
        self.indices
            .get_by_right(&index)
            .expect("indices are only created for states of the automaton")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::tests::lambda_nfa;

    #[test_log::test]
    fn finds_accepting_path() {
        let nfa = lambda_nfa();
        let symbols = ['a', 'b', 'a'];
        let path = PathSearch::new(&nfa, &symbols, Verdict::Accepted, Some(7))
            .run(&SearchConfig::default())
            .unwrap();
        assert!(!path.dead_end);
        assert_eq!(path.states.len(), 4);
        assert!(nfa.is_final(path.states.last().unwrap()));
    }

    #[test]
    fn dead_end_counts_as_rejection() {
        let nfa = lambda_nfa();
        let symbols = ['b'];
        let path = PathSearch::new(&nfa, &symbols, Verdict::Rejected, Some(1))
            .run(&SearchConfig::default())
            .unwrap();
        assert!(path.dead_end);
        assert_eq!(path.states, vec![State::from("q0")]);
    }

    #[test]
    fn impossible_goal_is_detected() {
        let nfa = lambda_nfa();
        let symbols = ['a', 'b', 'b', 'a'];
        let path = PathSearch::new(&nfa, &symbols, Verdict::Accepted, None)
            .run(&SearchConfig::default());
        assert_eq!(path, None);
    }

    /// Two non-final states that can reach each other on `a`, so proving that no
    /// accepting run exists takes about one walk per configuration.
    fn rejecting_cycle() -> Nfa {
        Nfa::builder()
            .with_targets("p", 'a', ["p", "r"])
            .with_targets("r", 'a', ["p", "r"])
            .initial("p")
            .build()
            .unwrap()
    }

    #[test]
    fn tiny_budget_gives_up() {
        let nfa = rejecting_cycle();
        let symbols = ['a'; 12];
        let path = PathSearch::new(&nfa, &symbols, Verdict::Accepted, Some(3))
            .run(&SearchConfig::default().with_bounds(2, 3));
        assert_eq!(path, None);
    }

    #[test]
    fn zero_budget_never_walks() {
        let nfa = lambda_nfa();
        let symbols = ['a'];
        let path = PathSearch::new(&nfa, &symbols, Verdict::Accepted, Some(3))
            .run(&SearchConfig::default().with_bounds(0, 5));
        assert_eq!(path, None);
    }

    #[test]
    fn enough_walks_prove_impossibility() {
        let nfa = rejecting_cycle();
        let symbols = ['a'; 12];
        let mut search = PathSearch::new(&nfa, &symbols, Verdict::Accepted, Some(3));
        assert!(matches!(search.attempt(usize::MAX), Attempt::Impossible));
        assert!(search.is_dead(0, search.index(nfa.initial())));
    }

    #[test_log::test]
    fn one_walk_covers_inputs_longer_than_the_budget() {
        let nfa = Nfa::builder()
            .with_targets("q0", 'a', ["q0"])
            .initial("q0")
            .with_finals(["q0"])
            .build()
            .unwrap();
        let symbols = vec!['a'; DEFAULT_INNER_BOUND + 5_000];
        let path = PathSearch::new(&nfa, &symbols, Verdict::Accepted, None)
            .run(&SearchConfig::default().with_bounds(1, 1))
            .unwrap();
        assert!(!path.dead_end);
        assert_eq!(path.states.len(), symbols.len() + 1);
    }
}
