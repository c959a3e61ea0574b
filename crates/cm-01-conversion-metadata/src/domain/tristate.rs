//! # Tri-State Flag
//!
//! Pipeline outcomes start out unknown and settle on success or failure.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Outcome of a pipeline stage that may not have run yet.
///
/// Serialized as `null`, `true` or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriState {
    /// Outcome not yet determined.
    #[default]
    Unknown,
    /// Stage succeeded.
    True,
    /// Stage failed.
    False,
}

impl TriState {
    /// Whether the outcome has been determined.
    pub const fn is_known(self) -> bool {
        !matches!(self, TriState::Unknown)
    }

    /// The determined outcome, if any.
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            TriState::Unknown => None,
            TriState::True => Some(true),
            TriState::False => Some(false),
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(TriState::Unknown, TriState::from)
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        value.as_bool()
    }
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_bool().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(TriState::from)
    }
}
