use serde::{Deserialize, Serialize};
use std::fmt;

/// The value an item currently holds.
///
/// `Undef` is the sentinel for "no meaningful value": freshly created items,
/// and aggregations with no contributing members, report it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum State {
    #[default]
    Undef,
    Switch(bool),
    Number(f64),
    Text(String),
}

impl State {
    /// Numeric view of the state, if it has one.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_undef(&self) -> bool {
        matches!(self, Self::Undef)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undef => f.write_str("UNDEF"),
            Self::Switch(true) => f.write_str("ON"),
            Self::Switch(false) => f.write_str("OFF"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// An instruction sent towards an item, carried as a target state.
///
/// Groups route commands to their members, possibly rewritten by the group's
/// aggregation function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(pub State);

impl Command {
    #[must_use]
    pub const fn state(&self) -> &State {
        &self.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<State> for Command {
    fn from(state: State) -> Self {
        Self(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_textual_convention() {
        assert_eq!(State::Undef.to_string(), "UNDEF");
        assert_eq!(State::Switch(true).to_string(), "ON");
        assert_eq!(State::Switch(false).to_string(), "OFF");
        assert_eq!(State::Number(21.5).to_string(), "21.5");
        assert_eq!(State::Text("open".into()).to_string(), "open");
    }

    #[test]
    fn numeric_view() {
        assert_eq!(State::Number(3.0).as_number(), Some(3.0));
        assert_eq!(State::Switch(true).as_number(), None);
        assert_eq!(State::Undef.as_number(), None);
    }
}
