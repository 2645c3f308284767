use tracing::debug;

use crate::{error::ValidationError, state::State};

use super::{AutomatonParts, Dfa};

/// A minimization procedure for deterministic automata, for example Hopcroft's
/// partition refinement. The crate does not ship one; implementations live with
/// whatever automata library the caller uses and exchange data through
/// [`AutomatonParts`].
pub trait Minimizer {
    /// Returns a deterministic automaton that accepts the same language as `parts`
    /// with as few states as possible.
    fn minimize(&self, parts: AutomatonParts<State>) -> AutomatonParts<State>;
}

impl<F> Minimizer for F
where
    F: Fn(AutomatonParts<State>) -> AutomatonParts<State>,
{
    fn minimize(&self, parts: AutomatonParts<State>) -> AutomatonParts<State> {
        self(parts)
    }
}

impl Dfa {
    /// Minimizes `self` with the given [`Minimizer`]. The result is validated like any
    /// other automaton, so a minimizer producing inconsistent parts is reported as a
    /// [`ValidationError`].
    pub fn minify<M: Minimizer>(&self, minimizer: &M) -> Result<Dfa, ValidationError> {
        let minimized = Dfa::from_parts(minimizer.minimize(self.to_parts()))?;
        debug!(
            "minimized dfa from {} to {} states",
            self.size(),
            minimized.size()
        );
        Ok(minimized)
    }
}
