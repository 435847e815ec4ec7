//! History budgets

use serde::{Deserialize, Serialize};

/// Ceiling on how much conversation history is forwarded to the model
///
/// Serialized as `{"kind": "count", "exchanges": N}` or
/// `{"kind": "tokens", "max_tokens": N}`. A budget of zero is valid and
/// keeps only the system directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Budget {
    /// Keep the most recent N exchanges (user message plus its reply)
    #[serde(rename = "count")]
    Exchanges { exchanges: usize },
    /// Keep as many recent messages as fit in an approximate token ceiling
    Tokens { max_tokens: usize },
}

impl Default for Budget {
    fn default() -> Self {
        Self::Exchanges { exchanges: 2 }
    }
}

impl Budget {
    pub fn exchanges(exchanges: usize) -> Self {
        Self::Exchanges { exchanges }
    }

    pub fn tokens(max_tokens: usize) -> Self {
        Self::Tokens { max_tokens }
    }

    /// Count budget from a signed value; zero and negatives keep the directive only
    pub fn exchanges_signed(exchanges: i64) -> Self {
        Self::exchanges(exchanges.max(0) as usize)
    }

    /// Token budget from a signed value; zero and negatives keep the directive only
    pub fn tokens_signed(max_tokens: i64) -> Self {
        Self::tokens(max_tokens.max(0) as usize)
    }

    /// True when the budget admits no dialogue at all
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Exchanges { exchanges } => *exchanges == 0,
            Self::Tokens { max_tokens } => *max_tokens == 0,
        }
    }

    /// Short human-readable summary
    pub fn describe(&self) -> String {
        match self {
            Self::Exchanges { exchanges: 1 } => "last 1 exchange".to_string(),
            Self::Exchanges { exchanges } => format!("last {} exchanges", exchanges),
            Self::Tokens { max_tokens } => format!("≤ {} tokens", max_tokens),
        }
    }
}

impl std::fmt::Display for Budget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}
