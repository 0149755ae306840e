use serde::{Deserialize, Serialize};
use std::fmt;

/// Position directive for a single period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    /// Hold the asset: equity compounds with the period return
    Long,
    /// Bet against the asset: equity is divided by the period return
    Short,
}

impl Signal {
    /// Whether holding this position over a period with `period_return` made money.
    /// A flat period (return exactly 1.0) counts as a miss for both sides.
    pub fn was_profitable(&self, period_return: f64) -> bool {
        match self {
            Signal::Long => period_return > 1.0,
            Signal::Short => period_return < 1.0,
        }
    }

    /// Apply one period's gross return to an equity value
    pub fn apply(&self, equity: f64, period_return: f64) -> f64 {
        match self {
            Signal::Long => equity * period_return,
            Signal::Short => equity / period_return,
        }
    }

    /// The opposite directive
    pub fn flip(&self) -> Signal {
        match self {
            Signal::Long => Signal::Short,
            Signal::Short => Signal::Long,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Long => write!(f, "LONG"),
            Signal::Short => write!(f, "SHORT"),
        }
    }
}
