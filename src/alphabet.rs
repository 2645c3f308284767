use std::fmt::Display;

use crate::{error::ValidationError, Show};

/// The glyph used whenever a lambda (empty-string) transition is displayed.
pub const LAMBDA_GLYPH: &str = "λ";

/// Symbols of the input alphabet. Input strings are read one `char` at a time,
/// so every symbol is a single `char`.
pub type Symbol = char;

/// The key of a transition entry: either an ordinary alphabet [`Symbol`] or the
/// reserved [`Label::Lambda`], which is consumed without reading input.
///
/// Every symbol is ordered before [`Label::Lambda`], which places the lambda
/// column last in a [`crate::table::TransitionTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// Reads the given symbol.
    Symbol(Symbol),
    /// Moves without reading input.
    Lambda,
}

impl Label {
    /// Parses a transition token. The empty token denotes lambda, a token made up of a
    /// single `char` denotes that symbol, anything else is rejected.
    pub fn from_token(token: &str) -> Result<Self, ValidationError> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Label::Lambda),
            (Some(sym), None) => Ok(Label::Symbol(sym)),
            _ => Err(ValidationError::InvalidToken(token.to_string())),
        }
    }

    /// Returns the symbol read by this label, `None` for lambda.
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Label::Symbol(sym) => Some(*sym),
            Label::Lambda => None,
        }
    }

    /// Returns `true` if this is the lambda label.
    pub fn is_lambda(&self) -> bool {
        matches!(self, Label::Lambda)
    }
}

impl From<Symbol> for Label {
    fn from(value: Symbol) -> Self {
        Label::Symbol(value)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Symbol(sym) => write!(f, "{sym}"),
            Label::Lambda => write!(f, "{LAMBDA_GLYPH}"),
        }
    }
}

impl Show for Label {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}
