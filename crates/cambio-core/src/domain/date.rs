use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::ValidationError;

/// Parse a calendar day in `YYYY-MM-DD` form.
pub fn parse_day(input: &str) -> Result<Date, ValidationError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(input.trim(), format).map_err(|_| ValidationError::InvalidDate {
        value: input.to_owned(),
    })
}

/// Format a calendar day as `YYYY-MM-DD`.
pub fn format_day(day: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    day.format(format)
        .unwrap_or_else(|_| String::from("<unformattable>"))
}

/// Serde adapter for `time::Date` fields using the `YYYY-MM-DD` day form.
pub mod day_format {
    use super::{format_day, parse_day};
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S>(day: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_day(*day))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        parse_day(&value).map_err(D::Error::custom)
    }
}

/// Requested rate date: the source's freshest data, or one calendar day.
///
/// `Latest` is mapped to "today" by the resolver using its injected clock;
/// the distinction is what classifies a conversion as realtime or historical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDate {
    Latest,
    Day(Date),
}

impl RateDate {
    pub fn from_optional_day(day: Option<Date>) -> Self {
        match day {
            Some(day) => Self::Day(day),
            None => Self::Latest,
        }
    }
}

/// RFC3339 timestamp guaranteed to be UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcTimestamp(OffsetDateTime);

impl UtcTimestamp {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let parsed = OffsetDateTime::parse(input, &Rfc3339).map_err(|_| {
            ValidationError::TimestampNotUtc {
                value: input.to_owned(),
            }
        })?;

        Self::from_offset_datetime(parsed).map_err(|_| ValidationError::TimestampNotUtc {
            value: input.to_owned(),
        })
    }

    pub fn from_offset_datetime(value: OffsetDateTime) -> Result<Self, ValidationError> {
        if value.offset() != UtcOffset::UTC {
            return Err(ValidationError::TimestampNotUtc {
                value: value
                    .format(&Rfc3339)
                    .unwrap_or_else(|_| String::from("<unformattable>")),
            });
        }

        Ok(Self(value))
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    /// Calendar day of this instant, UTC.
    pub fn day(self) -> Date {
        self.0.date()
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .expect("UtcTimestamp must be RFC3339 formattable")
    }
}

impl Display for UtcTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
