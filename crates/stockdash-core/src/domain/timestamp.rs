use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::ValidationError;

/// Timestamp normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Parse the datetime shapes the candlestick endpoint emits.
    ///
    /// Accepts RFC3339, the space-separated pandas form with or without an
    /// offset, and a bare `YYYY-MM-DD`. Values without an offset are UTC.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let invalid = || ValidationError::InvalidDatetime {
            value: input.to_owned(),
        };

        if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Ok(Self::from_offset_datetime(parsed));
        }

        let t_separated = trimmed.replacen(' ', "T", 1);
        if let Ok(parsed) = OffsetDateTime::parse(&t_separated, &Rfc3339) {
            return Ok(Self::from_offset_datetime(parsed));
        }

        let naive = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
        if let Ok(parsed) = PrimitiveDateTime::parse(&t_separated, naive) {
            return Ok(Self(parsed.assume_utc()));
        }

        let date_only = format_description!("[year]-[month]-[day]");
        let date = Date::parse(trimmed, date_only).map_err(|_| invalid())?;
        Ok(Self(date.midnight().assume_utc()))
    }

    pub fn from_offset_datetime(value: OffsetDateTime) -> Self {
        Self(value.to_offset(UtcOffset::UTC))
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.unix_timestamp().to_string())
    }

    /// Compact axis label, `MM-DD HH:MM`.
    pub fn short_label(self) -> String {
        let value = self.0;
        format!(
            "{:02}-{:02} {:02}:{:02}",
            u8::from(value.month()),
            value.day(),
            value.hour(),
            value.minute()
        )
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
