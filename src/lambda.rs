use tracing::{debug, trace};

use crate::{alphabet::Label, automaton::Nfa};

impl Nfa {
    /// Eliminates all lambda transitions, producing a new automaton without lambda
    /// transitions that accepts the same nonempty words.
    ///
    /// Every state `s` is treated independently, using closures and successors computed
    /// in `self` (never in the partially transformed copy), so the order in which
    /// states are processed does not matter:
    /// 1. compute the lambda closure `E(s)`,
    /// 2. if `s` is initial and the states of `E(s)` other than `s` are all final (and
    ///    there is at least one), `s` becomes final,
    /// 3. for every symbol `a`, the `a`-entry of `s` becomes the configuration reached
    ///    from `E(s)` on `a`, unless that configuration is empty,
    /// 4. the lambda entry of `s` is removed.
    ///
    /// If `self` has no lambda transitions, a copy without its empty lambda entries is
    /// returned, which makes the operation idempotent.
    pub fn eliminate_lambda(&self) -> Nfa {
        let mut parts = self.to_parts();
        if !self.has_lambda_transitions() {
            trace!("no lambda transitions to eliminate");
            for state in self.states() {
                parts.transitions.remove(state, Label::Lambda);
            }
            return Nfa::from_parts_unchecked(parts);
        }

        for state in self.states() {
            let closure = self.lambda_closure(state);

            if self.is_initial(state) {
                let mut others = closure.iter().filter(|q| *q != state).peekable();
                if others.peek().is_some() && others.all(|q| self.is_final(q)) {
                    trace!("initial state {state} becomes final through its closure");
                    parts.finals.insert(state.clone());
                }
            }

            for &symbol in self.alphabet() {
                let next = self.step_closure(&closure, symbol);
                if !next.is_empty() {
                    parts
                        .transitions
                        .insert(state.clone(), Label::Symbol(symbol), next);
                }
            }

            parts.transitions.remove(state, Label::Lambda);
        }

        debug!(
            "eliminated lambda transitions of {} states",
            self.transitions()
                .rows()
                .filter(|(_, row)| row.get(&Label::Lambda).is_some_and(|t| !t.is_empty()))
                .count()
        );
        // states, alphabet and initial state are unchanged and every new target lies in
        // the closure of an existing target
        Nfa::from_parts_unchecked(parts)
    }
}

#[cfg(test)]
mod tests {
    use crate::automaton::tests::lambda_nfa;
    use crate::prelude::*;
    use crate::state::state_set;

    #[test_log::test]
    fn eliminates_lambda() {
        let eliminated = lambda_nfa().eliminate_lambda();
        assert!(!eliminated.has_lambda_transitions());

        let table = eliminated.table_with(&Decorations::final_only_in_cells());
        assert_eq!(table.columns(), &[Label::Symbol('a'), Label::Symbol('b')]);
        assert_eq!(
            table.column('a'),
            vec![("→q0", "{*q1,q2}"), ("*q1", "{*q1,q2}"), ("q2", "∅")]
        );
        assert_eq!(
            table.column('b'),
            vec![("→q0", "∅"), ("*q1", "q0"), ("q2", "q0")]
        );
    }

    #[test]
    fn without_lambda_is_unchanged() {
        let nfa = Nfa::builder()
            .with_edges([
                ("q0", 'a', "q1"),
                ("q1", 'a', "q1"),
                ("q1", 'b', "q2"),
                ("q2", 'b', "q0"),
            ])
            .initial("q0")
            .with_finals(["q1"])
            .build()
            .unwrap();
        let eliminated = nfa.eliminate_lambda();
        assert_eq!(eliminated, nfa);
        assert_eq!(
            eliminated.table().column('b'),
            vec![("→q0", "∅"), ("*q1", "q2"), ("q2", "→q0")]
        );
    }

    #[test]
    fn empty_lambda_entry_is_no_transition() {
        let nfa = Nfa::builder()
            .with_edges([("q0", 'a', "q1"), ("q1", 'a', "q0")])
            .with_targets("q0", Label::Lambda, Vec::<State>::new())
            .initial("q0")
            .with_finals(["q1"])
            .build()
            .unwrap();
        let q0 = State::from("q0");
        assert!(nfa.transition(&q0, Label::Lambda).is_some());
        assert!(!nfa.has_lambda_transitions());
        assert_eq!(nfa.table().columns(), &[Label::Symbol('a')]);

        let eliminated = nfa.eliminate_lambda();
        assert_eq!(eliminated.transition(&q0, Label::Lambda), None);
        assert_eq!(eliminated.transition_pairs(), nfa.transition_pairs());
        assert_eq!(eliminated.finals(), nfa.finals());
        assert!(Dfa::try_from(&eliminated).is_ok());
        assert_eq!(eliminated.eliminate_lambda(), eliminated);
    }

    #[test]
    fn initial_final_stays_final() {
        let mut parts = lambda_nfa().to_parts();
        parts.finals = state_set(["q0", "q1"]);
        let nfa = Nfa::from_parts(parts).unwrap();

        let table = nfa
            .eliminate_lambda()
            .table_with(&Decorations::final_only_in_cells());
        assert_eq!(
            table.column('a'),
            vec![("→*q0", "{*q1,q2}"), ("*q1", "{*q1,q2}"), ("q2", "∅")]
        );
        assert_eq!(
            table.column('b'),
            vec![("→*q0", "∅"), ("*q1", "*q0"), ("q2", "*q0")]
        );
    }

    #[test]
    fn initial_promoted_when_closure_is_final() {
        let nfa = Nfa::builder()
            .with_edges([("s", Label::Lambda, "f"), ("f", Label::Symbol('a'), "f")])
            .initial("s")
            .with_finals(["f"])
            .build()
            .unwrap();
        assert_eq!(nfa.accepts(""), Ok(true));

        let eliminated = nfa.eliminate_lambda();
        assert!(eliminated.is_final(&State::from("s")));
        for word in ["", "a", "aa"] {
            assert_eq!(eliminated.accepts(word), nfa.accepts(word));
        }
    }

    #[test]
    fn initial_not_promoted_when_closure_is_mixed() {
        // the closure of s contains the final f and the non-final g, so s stays
        // non-final and the empty word is no longer accepted
        let nfa = Nfa::builder()
            .with_edges([
                ("s", Label::Lambda, "f"),
                ("s", Label::Lambda, "g"),
                ("f", Label::Symbol('a'), "g"),
                ("g", Label::Symbol('a'), "f"),
            ])
            .initial("s")
            .with_finals(["f"])
            .build()
            .unwrap();
        let eliminated = nfa.eliminate_lambda();
        assert!(!eliminated.is_final(&State::from("s")));
        assert_eq!(nfa.accepts(""), Ok(true));
        assert_eq!(eliminated.accepts(""), Ok(false));
        for word in ["a", "aa", "aaa"] {
            assert_eq!(eliminated.accepts(word), nfa.accepts(word));
        }
    }

    #[test]
    fn lambda_self_loop() {
        let nfa = Nfa::builder()
            .with_edges([
                ("s", Label::Lambda, "s"),
                ("s", Label::Symbol('a'), "t"),
            ])
            .with_row("t")
            .initial("s")
            .with_finals(["t"])
            .build()
            .unwrap();
        let eliminated = nfa.eliminate_lambda();
        assert!(!eliminated.is_final(&State::from("s")));
        assert_eq!(
            eliminated.transition(&State::from("s"), 'a'),
            Some(&state_set(["t"]))
        );
    }

    #[test]
    fn idempotent() {
        let once = lambda_nfa().eliminate_lambda();
        assert_eq!(once.eliminate_lambda(), once);
    }

    #[test]
    fn input_is_untouched() {
        let nfa = lambda_nfa();
        let before = nfa.clone();
        let _ = nfa.eliminate_lambda();
        assert_eq!(nfa, before);
        assert!(nfa.has_lambda_transitions());
    }
}
