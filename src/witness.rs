//! Witness traces explain why an automaton accepts or rejects a word by exhibiting one
//! concrete run on it.
//!
//! For a [`Dfa`] the run is unique and simply followed. For an [`Nfa`] a run with the
//! requested [`Verdict`] is searched for with a bounded, randomized backtracking
//! search (see [`SearchConfig`]). If no such run is found within the bounds, the
//! result is [`Witness::NoPathFound`], which is a regular value and not an error.

use std::fmt::Display;

use itertools::Itertools;
use owo_colors::OwoColorize;
use tracing::debug;

use crate::{
    alphabet::{Label, Symbol},
    automaton::{Automaton, Dfa, Nfa, Target, TransitionPair},
    error::Error,
    state::{Position, State, DEAD_MARKER},
    table::Decorations,
};

mod search;
pub use search::{SearchConfig, DEFAULT_INNER_BOUND, DEFAULT_OUTER_BOUND};
use search::PathSearch;

/// Whether a word is accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The word is in the language.
    Accepted,
    /// The word is not in the language.
    Rejected,
}

impl Verdict {
    /// The header used when rendering a trace, `[Accepted]` or `[Rejected]`.
    pub fn header(&self) -> String {
        format!("[{self}]")
    }

    /// Returns `true` for [`Verdict::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

impl From<bool> for Verdict {
    fn from(accepted: bool) -> Self {
        if accepted {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "Accepted"),
            Verdict::Rejected => write!(f, "Rejected"),
        }
    }
}

/// One step of a trace: reading `symbol` in `source` leads to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WitnessStep {
    /// Where the step starts.
    pub source: Position,
    /// The consumed symbol.
    pub symbol: Symbol,
    /// Where the step ends.
    pub target: Position,
}

impl WitnessStep {
    fn new<S: Into<Position>, T: Into<Position>>(source: S, symbol: Symbol, target: T) -> Self {
        Self {
            source: source.into(),
            symbol,
            target: target.into(),
        }
    }
}

/// A run of an automaton on a word, one step per input symbol, together with the
/// verdict it demonstrates.
///
/// If the run gets stuck because some state has no successor, the step that consumes
/// the offending symbol ends in [`Position::Dead`] and every following symbol is
/// recorded as a step from dead to dead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessTrace {
    input: String,
    start: State,
    verdict: Verdict,
    steps: Vec<WitnessStep>,
}

impl WitnessTrace {
    /// Assembles a trace from the visited states. If `dead_end` is set, the run got
    /// stuck in the last of `states` and the remaining input is padded with dead steps.
    fn from_states(
        input: &str,
        symbols: &[Symbol],
        states: Vec<State>,
        dead_end: bool,
        verdict: Verdict,
    ) -> Self {
        let mut steps = states
            .iter()
            .tuple_windows()
            .zip(symbols)
            .map(|((source, target), &symbol)| {
                WitnessStep::new(source.clone(), symbol, target.clone())
            })
            .collect_vec();

        if dead_end {
            let consumed = steps.len();
            if let (Some(last), Some(&symbol)) = (states.last(), symbols.get(consumed)) {
                steps.push(WitnessStep::new(last.clone(), symbol, Position::Dead));
            }
            steps.extend(
                symbols
                    .iter()
                    .skip(consumed + 1)
                    .map(|&symbol| WitnessStep::new(Position::Dead, symbol, Position::Dead)),
            );
        }

        let start = states.into_iter().next().unwrap_or_else(|| State::new(""));
        Self {
            input: input.to_string(),
            start,
            verdict,
            steps,
        }
    }

    /// The word this trace reads.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The verdict demonstrated by this trace.
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// The steps, one per input symbol.
    pub fn steps(&self) -> &[WitnessStep] {
        &self.steps
    }

    /// The number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the trace reads the empty word.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The positions visited by the run, starting with the initial state. This has one
    /// element more than there are steps.
    pub fn state_sequence(&self) -> Vec<Position> {
        std::iter::once(Position::State(self.start.clone()))
            .chain(self.steps.iter().map(|step| step.target.clone()))
            .collect()
    }

    /// The transitions traversed by the run, in order and with repetitions. Steps into
    /// or out of the dead marker are no transitions and are skipped.
    pub fn taken_pairs(&self) -> Vec<TransitionPair> {
        self.steps
            .iter()
            .filter_map(|step| match (&step.source, &step.target) {
                (Position::State(source), Position::State(target)) => Some(TransitionPair {
                    source: source.clone(),
                    target: target.clone(),
                    label: Label::Symbol(step.symbol),
                }),
                _ => None,
            })
            .collect()
    }

    fn grid<T: Target>(&self, automaton: &Automaton<T>, header: String) -> String {
        let decorations = Decorations::default();
        let render = |position: &Position| match position {
            Position::State(q) => decorations.label(automaton, q),
            Position::Dead => DEAD_MARKER.to_string(),
        };

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(["Step", "Current state", "Input symbol", "New state"]);
        for (i, step) in self.steps.iter().enumerate() {
            builder.push_record([
                (i + 1).to_string(),
                render(&step.source),
                step.symbol.to_string(),
                render(&step.target),
            ]);
        }
        builder
            .build()
            .with(tabled::settings::Panel::header(header))
            .with(tabled::settings::Style::rounded())
            .to_string()
    }

    /// Renders the steps of the trace as a table headed by the verdict. States are
    /// decorated like in the transition table of `automaton`.
    pub fn steps_table<T: Target>(&self, automaton: &Automaton<T>) -> String {
        self.grid(automaton, self.verdict.header())
    }

    /// Like [`Self::steps_table`], with the verdict header printed in green or red.
    pub fn show_colored<T: Target>(&self, automaton: &Automaton<T>) -> String {
        let header = match self.verdict {
            Verdict::Accepted => self.verdict.header().green().bold().to_string(),
            Verdict::Rejected => self.verdict.header().red().bold().to_string(),
        };
        self.grid(automaton, header)
    }
}

impl Display for WitnessTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.start)?;
        for step in &self.steps {
            write!(f, " -{}-> {}", step.symbol, step.target)?;
        }
        write!(f, " {}", self.verdict.header())
    }
}

/// The outcome of a witness search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Witness {
    /// A run with the requested verdict.
    Trace(WitnessTrace),
    /// No run with the requested verdict was found within the search bounds.
    NoPathFound,
}

impl Witness {
    /// The trace, if one was found.
    pub fn trace(&self) -> Option<&WitnessTrace> {
        match self {
            Witness::Trace(trace) => Some(trace),
            Witness::NoPathFound => None,
        }
    }

    /// Consumes `self` and returns the trace, if one was found.
    pub fn into_trace(self) -> Option<WitnessTrace> {
        match self {
            Witness::Trace(trace) => Some(trace),
            Witness::NoPathFound => None,
        }
    }

    /// Returns `true` if a trace was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Witness::Trace(_))
    }
}

impl Display for Witness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Witness::Trace(trace) => write!(f, "{trace}"),
            Witness::NoPathFound => write!(
                f,
                "[NO VALID PATH FOUND]\nTry to eliminate lambda transitions and try again."
            ),
        }
    }
}

/// Implemented by automata that can produce witness traces for their verdicts.
pub trait Witnessing {
    /// Looks for a run on `input` that ends with `verdict`.
    ///
    /// Symbols of `input` that are not in the alphabet are reported as a
    /// [`crate::error::ValidationError`]. Deterministic automata ignore `verdict` and
    /// return their unique run.
    fn witness_trace(
        &self,
        input: &str,
        verdict: Verdict,
        config: &SearchConfig,
    ) -> Result<Witness, Error>;

    /// Decides whether `input` is accepted.
    fn accepts_input(&self, input: &str) -> Result<bool, Error>;

    /// Decides whether `input` is accepted and produces a trace demonstrating it.
    fn input_check(&self, input: &str, config: &SearchConfig) -> Result<Witness, Error> {
        let verdict = Verdict::from(self.accepts_input(input)?);
        debug!("input {input:?} is {verdict}");
        self.witness_trace(input, verdict, config)
    }
}

impl Dfa {
    /// Follows the unique run on `input`. A state without transition for the next
    /// symbol is reported as a [`crate::error::MissingTransitionError`].
    pub fn trace(&self, input: &str) -> Result<WitnessTrace, Error> {
        let symbols = self.symbols_of(input)?;
        let states = self.run(input)?;
        let verdict = Verdict::from(states.last().is_some_and(|q| self.is_final(q)));
        Ok(WitnessTrace::from_states(input, &symbols, states, false, verdict))
    }
}

impl Witnessing for Dfa {
    fn witness_trace(
        &self,
        input: &str,
        _verdict: Verdict,
        _config: &SearchConfig,
    ) -> Result<Witness, Error> {
        self.trace(input).map(Witness::Trace)
    }

    fn accepts_input(&self, input: &str) -> Result<bool, Error> {
        self.accepts(input)
    }
}

impl Witnessing for Nfa {
    fn witness_trace(
        &self,
        input: &str,
        verdict: Verdict,
        config: &SearchConfig,
    ) -> Result<Witness, Error> {
        let symbols = self.symbols_of(input)?;
        let found = PathSearch::new(self, &symbols, verdict, config.seed).run(config);
        Ok(match found {
            Some(path) => Witness::Trace(WitnessTrace::from_states(
                input,
                &symbols,
                path.states,
                path.dead_end,
                verdict,
            )),
            None => Witness::NoPathFound,
        })
    }

    fn accepts_input(&self, input: &str) -> Result<bool, Error> {
        self.accepts(input)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::automaton::tests::{ending_dfa, lambda_nfa};
    use crate::prelude::*;

    fn positions(names: &[&str]) -> Vec<Position> {
        names.iter().map(|&q| Position::State(State::from(q))).collect()
    }

    #[test_log::test]
    fn dfa_rejecting_trace() {
        let trace = ending_dfa().trace("1001").unwrap();
        assert_eq!(trace.verdict(), Verdict::Rejected);
        assert_eq!(trace.len(), 4);
        assert_eq!(
            trace.state_sequence(),
            positions(&["q0", "q1", "q3", "q4", "q1"])
        );
        assert_eq!(trace.to_string(), "q0 -1-> q1 -0-> q3 -0-> q4 -1-> q1 [Rejected]");
    }

    #[test]
    fn dfa_accepting_trace() {
        let dfa = ending_dfa();
        let witness = dfa
            .witness_trace("10011", Verdict::Rejected, &SearchConfig::default())
            .unwrap();
        let trace = witness.trace().unwrap();
        assert_eq!(trace.verdict(), Verdict::Accepted);
        assert_eq!(
            trace.state_sequence(),
            positions(&["q0", "q1", "q3", "q4", "q1", "q2"])
        );
        let pairs = trace.taken_pairs().iter().map(|p| p.show()).collect::<Vec<_>>();
        assert_eq!(pairs[0], "(q0, q1, 1)");
        assert_eq!(pairs[4], "(q1, q2, 1)");
    }

    #[test]
    fn dfa_steps_table() {
        let dfa = ending_dfa();
        let table = dfa.trace("10011").unwrap().steps_table(&dfa);
        assert!(table.contains("[Accepted]"));
        assert!(table.contains("Current state"));
        assert!(table.contains("→q0"));
        assert!(table.contains("*q2"));

        let colored = dfa.trace("1001").unwrap().show_colored(&dfa);
        assert!(colored.contains("Rejected"));
        assert!(colored.contains("*q4"));
    }

    #[test]
    fn dfa_empty_input() {
        let trace = ending_dfa().trace("").unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.verdict(), Verdict::Rejected);
        assert_eq!(trace.state_sequence(), positions(&["q0"]));
    }

    #[test]
    fn unknown_symbols_are_reported() {
        assert_eq!(
            ending_dfa().trace("102"),
            Err(Error::from(ValidationError::UnknownInputSymbol('2')))
        );
        assert_eq!(
            lambda_nfa().witness_trace("a2", Verdict::Accepted, &SearchConfig::default()),
            Err(Error::from(ValidationError::UnknownInputSymbol('2')))
        );
    }

    #[test]
    fn partial_dfa_reports_missing_transition() {
        let dfa = Dfa::builder()
            .with_transitions([("q0", 'a', "q1")])
            .with_row("q1")
            .initial("q0")
            .allow_partial()
            .build()
            .unwrap();
        assert_eq!(
            dfa.input_check("aa", &SearchConfig::default()),
            Err(Error::from(MissingTransitionError {
                state: State::from("q1"),
                symbol: 'a'
            }))
        );
    }

    #[test_log::test]
    fn nfa_accepting_witness() {
        let nfa = lambda_nfa();
        let config = SearchConfig::default().with_seed(42);
        let witness = nfa.witness_trace("aaba", Verdict::Accepted, &config).unwrap();
        let trace = witness.into_trace().unwrap();
        assert_eq!(trace.len(), 4);
        assert_eq!(trace.verdict(), Verdict::Accepted);

        // every step follows a closed successor and the run ends in a final state
        for step in trace.steps() {
            let source = step.source.state().unwrap();
            let target = step.target.state().unwrap();
            let next = nfa.step_closure(&StateSet::from([source.clone()]), step.symbol);
            assert!(next.contains(target), "{source} -{}-> {target}", step.symbol);
        }
        let last = trace.state_sequence().pop().unwrap();
        assert!(nfa.is_final(last.state().unwrap()));
    }

    #[test]
    fn nfa_rejecting_witness_ends_outside_finals() {
        let nfa = lambda_nfa();
        let config = SearchConfig::default().with_seed(3);
        let trace = nfa
            .witness_trace("aa", Verdict::Rejected, &config)
            .unwrap()
            .into_trace()
            .unwrap();
        assert_eq!(trace.verdict(), Verdict::Rejected);
        assert_eq!(trace.len(), 2);
        let last = trace.state_sequence().pop().unwrap();
        assert!(last.state().map_or(true, |q| !nfa.is_final(q)));
    }

    #[test]
    fn dead_end_is_padded() {
        let nfa = lambda_nfa();
        let trace = nfa
            .witness_trace("bab", Verdict::Rejected, &SearchConfig::default())
            .unwrap()
            .into_trace()
            .unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(
            trace.steps()[0],
            WitnessStep {
                source: Position::State(State::from("q0")),
                symbol: 'b',
                target: Position::Dead,
            }
        );
        assert!(trace.steps()[1..]
            .iter()
            .all(|step| step.source.is_dead() && step.target.is_dead()));
        assert!(trace.taken_pairs().is_empty());
        assert_eq!(trace.to_string(), "q0 -b-> ∅ -a-> ∅ -b-> ∅ [Rejected]");
    }

    #[test]
    fn dead_positions_share_one_marker() {
        let nfa = lambda_nfa();
        let trace = nfa
            .witness_trace("bab", Verdict::Rejected, &SearchConfig::default())
            .unwrap()
            .into_trace()
            .unwrap();
        let table = trace.steps_table(&nfa);
        let dead_rows = table
            .lines()
            .filter(|line| line.contains(DEAD_MARKER))
            .count();
        assert_eq!(dead_rows, 3);
        // one dead target in the first row, dead source and target in the others
        assert_eq!(table.matches(DEAD_MARKER).count(), 5);
        assert_eq!(trace.to_string().matches(DEAD_MARKER).count(), 3);
    }

    #[test]
    fn impossible_verdict_is_sentinel() {
        let nfa = lambda_nfa();
        let start = Instant::now();
        let witness = nfa
            .witness_trace("abba", Verdict::Accepted, &SearchConfig::default())
            .unwrap();
        assert_eq!(witness, Witness::NoPathFound);
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(witness.to_string().starts_with("[NO VALID PATH FOUND]"));
    }

    #[test]
    fn exhausted_search_is_sentinel() {
        // a chain to the only final state, with an exit at every link into a
        // rejecting cycle that takes many walks to rule out
        let mut builder = Nfa::builder();
        for i in 0..30 {
            builder = builder.with_targets(
                format!("q{i}"),
                'a',
                [format!("q{}", i + 1), "t".to_string()],
            );
        }
        let nfa = builder
            .with_targets("t", 'a', ["t", "u"])
            .with_targets("u", 'a', ["t", "u"])
            .with_row("q30")
            .initial("q0")
            .with_finals(["q30"])
            .build()
            .unwrap();
        let input = "a".repeat(30);
        assert!(nfa.accepts(&input).unwrap());

        let start = Instant::now();
        let config = SearchConfig::default().with_seed(11).with_bounds(3, 2);
        let witness = nfa
            .witness_trace(&input, Verdict::Accepted, &config)
            .unwrap();
        assert_eq!(witness, Witness::NoPathFound);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test_log::test]
    fn inputs_longer_than_the_walk_budget() {
        let nfa = Nfa::builder()
            .with_targets("q0", 'a', ["q0"])
            .initial("q0")
            .with_finals(["q0"])
            .build()
            .unwrap();
        let input = "a".repeat(DEFAULT_INNER_BOUND + 5_000);
        let trace = nfa
            .input_check(&input, &SearchConfig::default())
            .unwrap()
            .into_trace()
            .unwrap();
        assert_eq!(trace.verdict(), Verdict::Accepted);
        assert_eq!(trace.len(), input.len());
        let dfa = Dfa::try_from(&nfa).unwrap();
        assert_eq!(trace, dfa.trace(&input).unwrap());
    }

    #[test]
    fn seeded_searches_agree() {
        let nfa = lambda_nfa();
        let config = SearchConfig::default().with_seed(1234);
        let first = nfa.witness_trace("aaaba", Verdict::Accepted, &config).unwrap();
        let second = nfa.witness_trace("aaaba", Verdict::Accepted, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn input_check_uses_oracle() {
        let nfa = lambda_nfa();
        let config = SearchConfig::default().with_seed(9);
        let accepted = nfa.input_check("aba", &config).unwrap();
        assert_eq!(accepted.trace().map(|t| t.verdict()), Some(Verdict::Accepted));

        let rejected = nfa.input_check("ab", &config).unwrap();
        assert_eq!(rejected.trace().map(|t| t.verdict()), Some(Verdict::Rejected));
    }
}
