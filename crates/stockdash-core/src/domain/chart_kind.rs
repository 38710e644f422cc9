use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Display mode of the dashboard chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Candlestick,
    Line,
    Bar,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Candlestick,
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Scatter,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Candlestick => "candlestick",
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Scatter => "scatter",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Candlestick => "Candlestick",
            Self::Line => "Line",
            Self::Bar => "Bar",
            Self::Scatter => "Scatter",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or(ValidationError::InvalidChartKind {
                value: value.to_owned(),
            })
    }
}
