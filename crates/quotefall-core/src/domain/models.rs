use serde::{Deserialize, Serialize};

use crate::domain::Symbol;
use crate::error::ValidationError;
use crate::source::ProviderId;

/// Canonical normalized price record for a symbol.
///
/// `price` is always present and finite. Partial OHLC is permitted: a
/// source that reports only a last price leaves `open`/`high`/`low`
/// absent, except the spot feed, which publishes the documented
/// convention via [`Quote::spot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    pub source: ProviderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    pub currency: String,
}

impl Quote {
    pub fn new(symbol: Symbol, price: f64, source: ProviderId) -> Result<Self, ValidationError> {
        validate_finite("price", price)?;
        validate_non_negative("price", price)?;

        Ok(Self {
            symbol,
            price,
            open: None,
            high: None,
            low: None,
            volume: None,
            source,
            timestamp: None,
            currency: String::from("USD"),
        })
    }

    /// Spot-price convention: a feed that reports only a last price
    /// publishes `open = high = low = price` with zero volume.
    pub fn spot(symbol: Symbol, price: f64, source: ProviderId) -> Result<Self, ValidationError> {
        Ok(Self::new(symbol, price, source)?
            .with_ohlc(price, price, price)?
            .with_volume(0))
    }

    pub fn with_ohlc(mut self, open: f64, high: f64, low: f64) -> Result<Self, ValidationError> {
        validate_finite("open", open)?;
        validate_finite("high", high)?;
        validate_finite("low", low)?;

        self.open = Some(open);
        self.high = Some(high);
        self.low = Some(low);
        Ok(self)
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

/// Descriptive (non-price) metadata about a symbol.
///
/// Every field is optional; `commodity` and `currency_pair` are populated
/// only for non-equity instruments. An InfoRecord has no identity of its
/// own; it is cached only as part of the merged [`TickerInfo`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commodity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_pair: Option<String>,
}

impl InfoRecord {
    /// Fixed descriptive record for the gold spot instrument. Built
    /// locally, never fetched.
    pub fn gold_spot() -> Self {
        Self {
            long_name: Some(String::from("Gold Spot Price (XAU/USD)")),
            industry: Some(String::from("Precious Metals")),
            sector: Some(String::from("Commodities")),
            market_cap: None,
            employees: None,
            city: Some(String::from("Global")),
            state: Some(String::from("Global")),
            country: Some(String::from("Global")),
            website: Some(String::from("https://www.coinbase.com")),
            commodity: Some(String::from("gold")),
            currency_pair: Some(String::from("XAU/USD")),
        }
    }

    /// Fallback record when no descriptive source has data: only a
    /// display name derived from the symbol.
    pub fn minimal(symbol: &Symbol) -> Self {
        Self {
            long_name: Some(format!("{symbol} Stock")),
            ..Self::default()
        }
    }
}

/// Merged full-info response: one Quote plus its descriptive metadata.
///
/// Built only by [`TickerInfo::merge`]. Field precedence:
///
/// | field | taken from |
/// |---|---|
/// | `symbol`, `price`, `open`, `high`, `low`, `volume`, `source`, `timestamp`, `currency` | Quote |
/// | `current_price` | always `Quote::price` |
/// | descriptive fields | InfoRecord |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerInfo {
    pub symbol: Symbol,
    pub price: f64,
    pub current_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    pub source: ProviderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    pub currency: String,
    #[serde(flatten)]
    pub info: InfoRecord,
}

impl TickerInfo {
    pub fn merge(quote: Quote, info: InfoRecord) -> Self {
        Self {
            symbol: quote.symbol,
            price: quote.price,
            current_price: quote.price,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            volume: quote.volume,
            source: quote.source,
            timestamp: quote.timestamp,
            currency: quote.currency,
            info,
        }
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
