use crate::error::PosError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A positive monetary amount to charge.
///
/// Wraps `rust_decimal::Decimal` so that the scale typed by the operator
/// survives the trip to the gateway (`"150.50"` stays `"150.50"`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PosError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PosError::InvalidAmount(format!(
                "amount must be positive, got {value}"
            )))
        }
    }

    /// Parses operator input. Empty, non-numeric and non-positive input is rejected
    /// here, before anything is sent to the gateway.
    pub fn parse(input: &str) -> Result<Self, PosError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PosError::InvalidAmount("amount is required".to_string()));
        }
        // `Decimal::from_str` skips `_` digit separators.
        if trimmed.contains('_') {
            return Err(PosError::InvalidAmount(format!("'{trimmed}' is not a number")));
        }
        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PosError::InvalidAmount(format!("'{trimmed}' is not a number")))?;
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PosError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Amount {
    type Err = PosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Gateway-assigned tracking reference of an order (`external_reference`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRef(String);

impl OrderRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Successful reply of the gateway's order-creation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderReceipt {
    #[serde(default)]
    pub external_reference: Option<OrderRef>,
    #[serde(default)]
    pub message: Option<String>,
}

impl OrderReceipt {
    /// The tracking reference, if the gateway handed out a usable one.
    pub fn reference(&self) -> Option<&OrderRef> {
        self.external_reference
            .as_ref()
            .filter(|reference| !reference.as_str().is_empty())
    }
}

/// Outcome of a successful order submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedOrder {
    pub amount: Amount,
    /// `None` when the gateway accepted the order without a tracking reference.
    /// Such an order cannot be polled.
    pub reference: Option<OrderRef>,
    pub message: Option<String>,
}

impl CreatedOrder {
    pub fn is_trackable(&self) -> bool {
        self.reference.is_some()
    }
}

/// Static context for the fixed QR printed at the till.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrInfo {
    pub qr_image: String,
    pub external_pos_id: String,
}
