//! Binance WebSocket message types
//!
//! Message structures for the raw `/ws` endpoint with `@ticker` streams
//! subscribed at connect time.

use crate::domain::PriceTick;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

/// Event type carried by 24h ticker payloads.
pub const TICKER_EVENT: &str = "24hrTicker";

// =============================================================================
// BinanceAsset - Supported ticker symbols
// =============================================================================

/// Ticker symbols the board follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinanceAsset {
    BTC,
    ETH,
    SOL,
    BNB,
    XRP,
    ADA,
    DOGE,
    DOT,
}

impl BinanceAsset {
    /// Stream name used in the SUBSCRIBE request (e.g., "btcusdt@ticker")
    pub fn stream_name(&self) -> &'static str {
        match self {
            BinanceAsset::BTC => "btcusdt@ticker",
            BinanceAsset::ETH => "ethusdt@ticker",
            BinanceAsset::SOL => "solusdt@ticker",
            BinanceAsset::BNB => "bnbusdt@ticker",
            BinanceAsset::XRP => "xrpusdt@ticker",
            BinanceAsset::ADA => "adausdt@ticker",
            BinanceAsset::DOGE => "dogeusdt@ticker",
            BinanceAsset::DOT => "dotusdt@ticker",
        }
    }

    /// Exact, case-sensitive match on the exchange symbol (e.g., "BTCUSDT")
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "BTCUSDT" => Some(BinanceAsset::BTC),
            "ETHUSDT" => Some(BinanceAsset::ETH),
            "SOLUSDT" => Some(BinanceAsset::SOL),
            "BNBUSDT" => Some(BinanceAsset::BNB),
            "XRPUSDT" => Some(BinanceAsset::XRP),
            "ADAUSDT" => Some(BinanceAsset::ADA),
            "DOGEUSDT" => Some(BinanceAsset::DOGE),
            "DOTUSDT" => Some(BinanceAsset::DOT),
            _ => None,
        }
    }

    /// Token id this symbol updates
    pub fn token_id(&self) -> &'static str {
        match self {
            BinanceAsset::BTC => "bitcoin",
            BinanceAsset::ETH => "ethereum",
            BinanceAsset::SOL => "solana",
            BinanceAsset::BNB => "binancecoin",
            BinanceAsset::XRP => "ripple",
            BinanceAsset::ADA => "cardano",
            BinanceAsset::DOGE => "dogecoin",
            BinanceAsset::DOT => "polkadot",
        }
    }

    pub fn from_token_id(token_id: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|asset| asset.token_id() == token_id)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinanceAsset::BTC => "BTCUSDT",
            BinanceAsset::ETH => "ETHUSDT",
            BinanceAsset::SOL => "SOLUSDT",
            BinanceAsset::BNB => "BNBUSDT",
            BinanceAsset::XRP => "XRPUSDT",
            BinanceAsset::ADA => "ADAUSDT",
            BinanceAsset::DOGE => "DOGEUSDT",
            BinanceAsset::DOT => "DOTUSDT",
        }
    }

    /// All supported assets, in subscription order
    pub fn all() -> &'static [BinanceAsset] {
        &[
            BinanceAsset::BTC,
            BinanceAsset::ETH,
            BinanceAsset::SOL,
            BinanceAsset::BNB,
            BinanceAsset::XRP,
            BinanceAsset::ADA,
            BinanceAsset::DOGE,
            BinanceAsset::DOT,
        ]
    }
}

impl std::fmt::Display for BinanceAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// `{"method":"SUBSCRIBE","params":[...],"id":1}` for every asset.
pub fn subscribe_message() -> String {
    let params: Vec<&str> = BinanceAsset::all()
        .iter()
        .map(|asset| asset.stream_name())
        .collect();

    json!({
        "method": "SUBSCRIBE",
        "params": params,
        "id": 1,
    })
    .to_string()
}

// =============================================================================
// BinanceTickerEvent - Raw 24h ticker payload
// =============================================================================

/// 24h rolling ticker from a `<symbol>@ticker` stream.
///
/// Example JSON (trimmed):
/// ```json
/// {
///     "e": "24hrTicker",
///     "E": 1718000000000,
///     "s": "BTCUSDT",
///     "c": "65000.00000000",
///     "P": "2.345",
///     "q": "36000000000.00"
/// }
/// ```
///
/// Numbers normally arrive as decimal strings; bare JSON numbers are kept
/// as their literal text. Both are parsed lazily.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceTickerEvent {
    /// Event type ("24hrTicker")
    #[serde(rename = "e")]
    pub event_type: String,

    /// Event time (ms since epoch)
    #[serde(rename = "E", default)]
    pub event_time: Option<u64>,

    /// Symbol (e.g., "BTCUSDT")
    #[serde(rename = "s")]
    pub symbol: String,

    /// Last price
    #[serde(rename = "c", deserialize_with = "decimal_text")]
    pub last_price: String,

    /// Price change percent over 24h
    #[serde(rename = "P", deserialize_with = "decimal_text")]
    pub change_percent: String,

    /// Quote asset volume over 24h (USD for USDT pairs)
    #[serde(rename = "q", deserialize_with = "decimal_text")]
    pub quote_volume: String,
}

/// Accept `"65000.1"` or `65000.1`, keeping the literal text.
fn decimal_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(D::Error::custom(format!("expected decimal, got {}", other))),
    }
}

/// Parse the longest leading decimal (`"12.5abc"` is 12.5). Input with no
/// leading digits becomes NaN so the book rejects the tick.
fn parse_decimal(raw: &str) -> f64 {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let whole = digits_from(end);
    end += whole;

    let mut mantissa = whole;
    if bytes.get(end) == Some(&b'.') {
        let fraction = digits_from(end + 1);
        if whole + fraction > 0 {
            mantissa += fraction;
            end += 1 + fraction;
        }
    }
    if mantissa == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

impl BinanceTickerEvent {
    pub fn price_f64(&self) -> f64 {
        parse_decimal(&self.last_price)
    }

    pub fn change_percent_f64(&self) -> f64 {
        parse_decimal(&self.change_percent)
    }

    pub fn quote_volume_f64(&self) -> f64 {
        parse_decimal(&self.quote_volume)
    }

    /// Map to a [`PriceTick`]; `None` for symbols outside [`BinanceAsset`].
    pub fn to_price_tick(&self) -> Option<PriceTick> {
        let asset = BinanceAsset::from_symbol(&self.symbol)?;
        Some(PriceTick {
            token_id: asset.token_id().to_string(),
            price: self.price_f64(),
            change_24h: self.change_percent_f64(),
            volume_24h: self.quote_volume_f64(),
        })
    }
}

/// Parsed Binance frame
#[derive(Debug, Clone)]
pub enum BinanceMessage {
    Ticker(BinanceTickerEvent),
    /// Subscribe acks and anything else that is not a ticker event
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_mapping_is_exact() {
        assert_eq!(BinanceAsset::from_symbol("DOGEUSDT"), Some(BinanceAsset::DOGE));
        assert_eq!(BinanceAsset::from_symbol("btcusdt"), None);
        assert_eq!(BinanceAsset::from_symbol("LTCUSDT"), None);

        for asset in BinanceAsset::all() {
            assert_eq!(BinanceAsset::from_symbol(asset.symbol()), Some(*asset));
            assert_eq!(BinanceAsset::from_token_id(asset.token_id()), Some(*asset));
        }
        assert_eq!(BinanceAsset::BNB.token_id(), "binancecoin");
        assert_eq!(BinanceAsset::XRP.token_id(), "ripple");
    }

    #[test]
    fn test_subscribe_message_shape() {
        let value: serde_json::Value = serde_json::from_str(&subscribe_message()).unwrap();
        assert_eq!(value["method"], "SUBSCRIBE");
        assert_eq!(value["id"], 1);

        let params = value["params"].as_array().unwrap();
        assert_eq!(params.len(), 8);
        assert_eq!(params[0], "btcusdt@ticker");
        assert_eq!(params[7], "dotusdt@ticker");
    }

    #[test]
    fn test_ticker_to_price_tick() {
        let raw = r#"{"e":"24hrTicker","E":1,"s":"ETHUSDT","c":"3500.10","P":"-1.25","q":"1500000.5","x":"ignored"}"#;
        let event: BinanceTickerEvent = serde_json::from_str(raw).unwrap();
        let tick = event.to_price_tick().unwrap();

        assert_eq!(tick.token_id, "ethereum");
        assert_eq!(tick.price, 3500.10);
        assert_eq!(tick.change_24h, -1.25);
        assert_eq!(tick.volume_24h, 1_500_000.5);
    }

    #[test]
    fn test_unparseable_number_becomes_nan() {
        let raw = r#"{"e":"24hrTicker","s":"BTCUSDT","c":"abc","P":"1","q":"2"}"#;
        let event: BinanceTickerEvent = serde_json::from_str(raw).unwrap();
        assert!(event.to_price_tick().unwrap().price.is_nan());
    }

    #[test]
    fn test_leading_decimal_prefix_is_used() {
        assert_eq!(parse_decimal("123abc"), 123.0);
        assert_eq!(parse_decimal("  -1.5%"), -1.5);
        assert_eq!(parse_decimal(".5"), 0.5);
        assert_eq!(parse_decimal("2e3x"), 2000.0);
        assert_eq!(parse_decimal("7e"), 7.0);
        assert!(parse_decimal("").is_nan());
        assert!(parse_decimal("-.").is_nan());
        assert!(parse_decimal("NaN").is_nan());
    }

    #[test]
    fn test_ticker_accepts_json_numbers() {
        let raw = r#"{"e":"24hrTicker","s":"SOLUSDT","c":150.25,"P":-2,"q":"900000"}"#;
        let event: BinanceTickerEvent = serde_json::from_str(raw).unwrap();
        let tick = event.to_price_tick().unwrap();

        assert_eq!(tick.price, 150.25);
        assert_eq!(tick.change_24h, -2.0);
        assert_eq!(tick.volume_24h, 900_000.0);
    }

    #[test]
    fn test_ticker_rejects_non_scalar_price() {
        let raw = r#"{"e":"24hrTicker","s":"SOLUSDT","c":[1],"P":"1","q":"1"}"#;
        assert!(serde_json::from_str::<BinanceTickerEvent>(raw).is_err());
    }
}
