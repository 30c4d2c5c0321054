//! Tie-break weights for equal-length matches

use serde::{Deserialize, Serialize};

/// Priority of a registered pattern; higher wins at equal length.
///
/// Blank-run patterns sit strictly between `FUNCTION` and `DELIM`, ordered by
/// their minimum blank count.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Priority(pub u8);

impl Priority {
    pub const DATA: Priority = Priority(0);
    pub const DATA_DELIM: Priority = Priority(1);
    pub const FUNCTION: Priority = Priority(2);
    pub const DELIM: Priority = Priority(255);

    /// Priority of a blank-run pattern requiring at least `min_blanks` blanks
    pub fn blank(min_blanks: usize) -> Priority {
        let ceiling = usize::from(Self::DELIM.0 - 1);
        let value = (usize::from(Self::FUNCTION.0) + 1 + min_blanks).min(ceiling);
        Priority(value as u8)
    }

    /// Whether this priority came from a blank-run pattern
    pub fn is_blank(self) -> bool {
        Self::FUNCTION < self && self < Self::DELIM
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::DATA => write!(f, "data"),
            Self::DATA_DELIM => write!(f, "data-delim"),
            Self::FUNCTION => write!(f, "function"),
            Self::DELIM => write!(f, "delim"),
            Priority(n) => write!(f, "blank({})", n - Self::FUNCTION.0 - 1),
        }
    }
}
