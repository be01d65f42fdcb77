use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingMode {
    #[default]
    Fixed,
    DiscreteMap,
    ContinuousRange,
    Toggle,
    Increment,
    Ignore,
}

impl BindingMode {
    pub const ALL: [BindingMode; 6] = [
        BindingMode::Fixed,
        BindingMode::DiscreteMap,
        BindingMode::ContinuousRange,
        BindingMode::Toggle,
        BindingMode::Increment,
        BindingMode::Ignore,
    ];

    /// Modes that borrow a tester slot when resolving.
    pub fn uses_reference(self) -> bool {
        matches!(self, BindingMode::DiscreteMap | BindingMode::ContinuousRange)
    }

    /// Modes that do arithmetic on the value and need a numeric domain.
    pub fn is_numeric_only(self) -> bool {
        matches!(self, BindingMode::ContinuousRange | BindingMode::Increment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BindingMode::Fixed => "fixed",
            BindingMode::DiscreteMap => "discrete_map",
            BindingMode::ContinuousRange => "continuous_range",
            BindingMode::Toggle => "toggle",
            BindingMode::Increment => "increment",
            BindingMode::Ignore => "ignore",
        }
    }
}

impl Display for BindingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
