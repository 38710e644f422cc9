use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Instruments the prediction API serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ticker {
    #[default]
    Aapl,
    Googl,
    Msft,
    Amzn,
    Tsla,
}

impl Ticker {
    pub const ALL: [Ticker; 5] = [
        Ticker::Aapl,
        Ticker::Googl,
        Ticker::Msft,
        Ticker::Amzn,
        Ticker::Tsla,
    ];

    /// Parse a ticker case-insensitively, ignoring surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTicker);
        }

        let normalized = trimmed.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|ticker| ticker.as_str() == normalized)
            .ok_or(ValidationError::UnsupportedTicker {
                value: input.to_owned(),
            })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aapl => "AAPL",
            Self::Googl => "GOOGL",
            Self::Msft => "MSFT",
            Self::Amzn => "AMZN",
            Self::Tsla => "TSLA",
        }
    }

    pub const fn company(self) -> &'static str {
        match self {
            Self::Aapl => "Apple",
            Self::Googl => "Google",
            Self::Msft => "Microsoft",
            Self::Amzn => "Amazon",
            Self::Tsla => "Tesla",
        }
    }

    /// Menu label, e.g. `Apple (AAPL)`.
    pub fn label(self) -> String {
        format!("{} ({})", self.company(), self.as_str())
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|ticker| *ticker == self)
            .unwrap_or_default()
    }

    /// Next ticker in menu order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Ticker {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Ticker {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.as_str().to_owned()
    }
}
