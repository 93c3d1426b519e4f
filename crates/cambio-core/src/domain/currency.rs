use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const CODE_LEN: usize = 3;

/// Currency codes shown by the `rates` board and the `currencies` command.
///
/// This is a display roster, not a whitelist: any syntactically valid code is
/// accepted by [`CurrencyCode::parse`] and left for the upstream source to
/// recognize or reject.
pub const COMMON_CURRENCIES: [&str; 24] = [
    "USD", "EUR", "GBP", "JPY", "CAD", "AUD", "CHF", "CNY", "INR", "SGD", "NZD", "MXN", "BRL",
    "RUB", "ZAR", "KRW", "TRY", "AED", "SAR", "HKD", "SEK", "NOK", "DKK", "PLN",
];

/// Normalized 3-letter currency code.
///
/// Parsing uppercases once at the boundary; every layer below takes this
/// newtype and never a raw string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; CODE_LEN]);

impl CurrencyCode {
    /// Parse and normalize a currency code to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyCurrency);
        }

        if trimmed.chars().count() != CODE_LEN {
            return Err(ValidationError::CurrencyLength {
                value: trimmed.to_owned(),
            });
        }

        let mut code = [0u8; CODE_LEN];
        for (index, ch) in trimmed.chars().enumerate() {
            if !ch.is_ascii_alphabetic() {
                return Err(ValidationError::CurrencyInvalidChar { ch, index });
            }
            code[index] = ch.to_ascii_uppercase() as u8;
        }

        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        // Invariant: parse only stores ASCII uppercase letters.
        std::str::from_utf8(&self.0).expect("currency code must be ASCII")
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.as_str().to_owned()
    }
}
