//! Canonical transition tables.
//!
//! A [`TransitionTable`] is the sorted, decorated grid view of a transition function:
//! one row per state in [`State`] order, one column per alphabet symbol in ascending
//! order and a trailing `λ` column if the automaton has lambda transitions. State
//! names are decorated with `→` if they are initial and `*` if they are final, both in
//! the row labels and inside the cells.

use std::fmt::Display;

use itertools::Itertools;

use crate::{
    alphabet::Label,
    automaton::{Automaton, Target},
    state::State,
};

/// Controls how states and empty cells are rendered in a [`TransitionTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decorations {
    /// Prefix of the initial state.
    pub initial_marker: String,
    /// Prefix of final states, placed after the initial marker.
    pub final_marker: String,
    /// Content of a cell without targets.
    pub empty_cell: String,
    /// Whether states inside cells carry the initial marker. Row labels always do.
    pub mark_initial_in_cells: bool,
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            initial_marker: "→".to_string(),
            final_marker: "*".to_string(),
            empty_cell: "∅".to_string(),
            mark_initial_in_cells: true,
        }
    }
}

impl Decorations {
    /// Only marks final states inside cells, row labels keep both markers.
    pub fn final_only_in_cells() -> Self {
        Self {
            mark_initial_in_cells: false,
            ..Default::default()
        }
    }

    /// Decorates `state` as a row label of `automaton`.
    pub fn label<T: Target>(&self, automaton: &Automaton<T>, state: &State) -> String {
        self.decorate(automaton, state, true)
    }

    /// Decorates `state` as it appears inside a cell of `automaton`.
    pub fn cell<T: Target>(&self, automaton: &Automaton<T>, state: &State) -> String {
        self.decorate(automaton, state, self.mark_initial_in_cells)
    }

    fn decorate<T: Target>(
        &self,
        automaton: &Automaton<T>,
        state: &State,
        with_initial: bool,
    ) -> String {
        let mut out = String::new();
        if with_initial && automaton.is_initial(state) {
            out.push_str(&self.initial_marker);
        }
        if automaton.is_final(state) {
            out.push_str(&self.final_marker);
        }
        out.push_str(state.name());
        out
    }
}

/// One row of a [`TransitionTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// The decorated state.
    pub label: String,
    /// One entry per column of the table.
    pub cells: Vec<String>,
}

/// The canonical grid of a transition function, see the [module documentation](self).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    columns: Vec<Label>,
    rows: Vec<TableRow>,
}

impl TransitionTable {
    /// The column labels, symbols in ascending order followed by lambda if present.
    pub fn columns(&self) -> &[Label] {
        &self.columns
    }

    /// The rendered column headers, e.g. `["a", "b", "λ"]`.
    pub fn header(&self) -> Vec<String> {
        self.columns.iter().map(ToString::to_string).collect()
    }

    /// The rows in state order.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Returns the row whose (decorated) label is `label`.
    pub fn row(&self, label: &str) -> Option<&TableRow> {
        self.rows.iter().find(|row| row.label == label)
    }

    /// Looks up the cell in the row labeled `row` and the column of `column`.
    pub fn cell<L: Into<Label>>(&self, row: &str, column: L) -> Option<&str> {
        let column = column.into();
        let position = self.columns.iter().position(|c| *c == column)?;
        self.row(row).map(|r| r.cells[position].as_str())
    }

    /// Collects one column as `(row label, cell)` pairs, in row order.
    pub fn column<L: Into<Label>>(&self, column: L) -> Vec<(&str, &str)> {
        let column = column.into();
        let Some(position) = self.columns.iter().position(|c| *c == column) else {
            return vec![];
        };
        self.rows
            .iter()
            .map(|r| (r.label.as_str(), r.cells[position].as_str()))
            .collect()
    }
}

impl Display for TransitionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once(String::new()).chain(self.columns.iter().map(|c| c.to_string())),
        );
        for row in &self.rows {
            builder.push_record(
                std::iter::once(row.label.clone()).chain(row.cells.iter().cloned()),
            );
        }
        let table = builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string();
        write!(f, "{table}")
    }
}

/// Renders the canonical transition table of `automaton`.
///
/// A cell holds the decorated target if there is exactly one, the empty marker if
/// there is none (or the entry is missing) and otherwise the sorted, comma separated
/// decorated targets in braces, e.g. `{*q1,q2}`.
pub fn canonical_table<T: Target>(
    automaton: &Automaton<T>,
    decorations: &Decorations,
) -> TransitionTable {
    let columns = automaton
        .alphabet()
        .iter()
        .map(|&sym| Label::Symbol(sym))
        .chain(automaton.has_lambda_transitions().then_some(Label::Lambda))
        .collect_vec();

    let rows = automaton
        .states()
        .iter()
        .map(|q| TableRow {
            label: decorations.label(automaton, q),
            cells: columns
                .iter()
                .map(|&label| match automaton.transition(q, label) {
                    Some(target) => render_cell(automaton, target, decorations),
                    None => decorations.empty_cell.clone(),
                })
                .collect(),
        })
        .collect();

    TransitionTable { columns, rows }
}

fn render_cell<T: Target>(
    automaton: &Automaton<T>,
    target: &T,
    decorations: &Decorations,
) -> String {
    let mut targets = target.targets().map(|q| decorations.cell(automaton, q));
    match target.count() {
        0 => decorations.empty_cell.clone(),
        1 => targets.next().unwrap_or_default(),
        _ => format!("{{{}}}", targets.join(",")),
    }
}

#[cfg(test)]
mod tests {
    use crate::automaton::tests::{ending_dfa, lambda_nfa};
    use crate::prelude::*;

    #[test_log::test]
    fn nfa_table() {
        let table = lambda_nfa().table();
        assert_eq!(
            table.columns(),
            &[Label::Symbol('a'), Label::Symbol('b'), Label::Lambda]
        );
        assert_eq!(
            table.column('a'),
            vec![("→q0", "*q1"), ("*q1", "*q1"), ("q2", "∅")]
        );
        assert_eq!(
            table.column('b'),
            vec![("→q0", "∅"), ("*q1", "∅"), ("q2", "→q0")]
        );
        assert_eq!(
            table.column(Label::Lambda),
            vec![("→q0", "∅"), ("*q1", "q2"), ("q2", "∅")]
        );
    }

    #[test]
    fn cells_without_initial_marker() {
        let table = lambda_nfa().table_with(&Decorations::final_only_in_cells());
        assert_eq!(table.cell("q2", 'b'), Some("q0"));
        assert_eq!(table.cell("→q0", 'a'), Some("*q1"));
    }

    #[test]
    fn dfa_table() {
        let table = ending_dfa().table();
        assert_eq!(table.columns(), &[Label::Symbol('0'), Label::Symbol('1')]);
        let labels = table.rows().iter().map(|r| r.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["→q0", "q1", "*q2", "q3", "*q4"]);
        assert_eq!(table.cell("q1", '1'), Some("*q2"));
        assert_eq!(table.cell("*q4", '1'), Some("q1"));
        assert_eq!(table.cell("q3", '0'), Some("*q4"));
    }

    #[test]
    fn initial_and_final_combine() {
        let dfa = Dfa::from_transitions([("p", 'a', "p")], "p", ["p"]).unwrap();
        let table = dfa.table();
        assert_eq!(table.cell("→*p", 'a'), Some("→*p"));
    }

    #[test]
    fn sets_and_empty_entries() {
        let nfa = Nfa::builder()
            .with_edges([("q0", 'a', "q2"), ("q0", 'a', "q1"), ("q0", 'a', "{q0,q1}")])
            .with_targets("q1", 'a', Vec::<State>::new())
            .with_row("q2")
            .with_row("{q0,q1}")
            .initial("q0")
            .with_finals(["q1"])
            .build()
            .unwrap();
        let table = nfa.table();
        assert_eq!(table.cell("→q0", 'a'), Some("{{q0,q1},*q1,q2}"));
        assert_eq!(table.cell("*q1", 'a'), Some("∅"));
        let labels = table.rows().iter().map(|r| r.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["→q0", "{q0,q1}", "*q1", "q2"]);
    }

    #[test]
    fn rendering_is_reproducible() {
        let first = lambda_nfa().table().to_string();
        let second = lambda_nfa().table().to_string();
        assert_eq!(first, second);
        assert!(first.contains("λ"));
        assert_eq!(lambda_nfa().table().header(), ["a", "b", "λ"]);
        assert!(first.contains("→q0"));
    }
}
