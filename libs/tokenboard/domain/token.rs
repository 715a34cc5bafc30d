//! Token records and the tick-folding state machine

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// A tracked token. Numeric fields are USD except `change_24h` (percent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Stable primary key (e.g. "bitcoin")
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change_24h: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Token {
    /// All numeric fields finite.
    pub fn is_finite(&self) -> bool {
        [self.price, self.change_24h, self.volume_24h, self.market_cap]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// One validated-or-not update for a single token, already mapped from the
/// exchange symbol to a token id. Unparseable numbers arrive as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub token_id: String,
    pub price: f64,
    pub change_24h: f64,
    pub volume_24h: f64,
}

/// Result of folding one tick into a [`TokenBook`].
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Price, change, volume and market cap replaced
    Applied { token_id: String, market_cap: f64 },
    /// No token with this id in the book
    UnknownToken(String),
    /// Price, change or volume was NaN or infinite
    NonFinite { token_id: String },
    /// `old_cap * new_price / old_price` was not finite (e.g. old price 0)
    InvalidMarketCap { token_id: String },
}

impl TickOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TickOutcome::Applied { .. })
    }
}

/// Scale the market cap by the price ratio. `None` if the result is not finite.
pub fn estimate_market_cap(old_cap: f64, old_price: f64, new_price: f64) -> Option<f64> {
    let cap = old_cap * (new_price / old_price);
    cap.is_finite().then_some(cap)
}

/// The active token collection, in seed order.
///
/// Tokens are shared as `Arc`s: an accepted tick swaps in a new `Arc` for
/// the one token it touches, so snapshots taken earlier and every other
/// token stay untouched.
#[derive(Debug, Clone, Default)]
pub struct TokenBook {
    tokens: Vec<Arc<Token>>,
    revision: u64,
}

impl TokenBook {
    /// Build from seeds, skipping any with non-finite numbers or a repeated id.
    pub fn new(seeds: impl IntoIterator<Item = Token>) -> Self {
        let mut seen = HashSet::new();
        let mut tokens = Vec::new();

        for token in seeds {
            if !token.is_finite() {
                warn!("Skipping seed token {} with non-finite values", token.id);
                continue;
            }
            if !seen.insert(token.id.clone()) {
                warn!("Skipping duplicate seed token {}", token.id);
                continue;
            }
            tokens.push(Arc::new(token));
        }

        Self {
            tokens,
            revision: 0,
        }
    }

    pub fn tokens(&self) -> &[Arc<Token>] {
        &self.tokens
    }

    /// Cheap copy of the current collection.
    pub fn snapshot(&self) -> Vec<Arc<Token>> {
        self.tokens.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Token>> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Bumped once per applied tick.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Fold one tick. Anything other than `Applied` leaves the book unchanged.
    pub fn apply_tick(&mut self, tick: &PriceTick) -> TickOutcome {
        let Some(index) = self.tokens.iter().position(|t| t.id == tick.token_id) else {
            return TickOutcome::UnknownToken(tick.token_id.clone());
        };

        if !(tick.price.is_finite() && tick.change_24h.is_finite() && tick.volume_24h.is_finite()) {
            return TickOutcome::NonFinite {
                token_id: tick.token_id.clone(),
            };
        }

        let current = &self.tokens[index];
        let Some(market_cap) = estimate_market_cap(current.market_cap, current.price, tick.price)
        else {
            return TickOutcome::InvalidMarketCap {
                token_id: tick.token_id.clone(),
            };
        };

        let updated = Token {
            price: tick.price,
            change_24h: tick.change_24h,
            volume_24h: tick.volume_24h,
            market_cap,
            ..Token::clone(current)
        };
        self.tokens[index] = Arc::new(updated);
        self.revision += 1;

        TickOutcome::Applied {
            token_id: tick.token_id.clone(),
            market_cap,
        }
    }
}

fn logo(slug: &str) -> Option<String> {
    Some(format!("https://cryptologos.cc/logos/{}-logo.png", slug))
}

/// Seed list shown before the first tick arrives.
pub fn default_tokens() -> Vec<Token> {
    vec![
        Token {
            id: "bitcoin".into(),
            name: "Bitcoin".into(),
            symbol: "BTC".into(),
            price: 64_000.0,
            change_24h: 2.5,
            volume_24h: 35e9,
            market_cap: 1.2e12,
            logo_url: logo("bitcoin-btc"),
        },
        Token {
            id: "ethereum".into(),
            name: "Ethereum".into(),
            symbol: "ETH".into(),
            price: 3_400.0,
            change_24h: 1.2,
            volume_24h: 15e9,
            market_cap: 400e9,
            logo_url: logo("ethereum-eth"),
        },
        Token {
            id: "solana".into(),
            name: "Solana".into(),
            symbol: "SOL".into(),
            price: 145.0,
            change_24h: 5.8,
            volume_24h: 4e9,
            market_cap: 65e9,
            logo_url: logo("solana-sol"),
        },
        Token {
            id: "binancecoin".into(),
            name: "BNB".into(),
            symbol: "BNB".into(),
            price: 590.0,
            change_24h: 0.5,
            volume_24h: 1.2e9,
            market_cap: 87e9,
            logo_url: logo("bnb-bnb"),
        },
        Token {
            id: "ripple".into(),
            name: "XRP".into(),
            symbol: "XRP".into(),
            price: 0.62,
            change_24h: -1.5,
            volume_24h: 1.5e9,
            market_cap: 34e9,
            logo_url: logo("xrp-xrp"),
        },
        Token {
            id: "cardano".into(),
            name: "Cardano".into(),
            symbol: "ADA".into(),
            price: 0.45,
            change_24h: -0.8,
            volume_24h: 400e6,
            market_cap: 16e9,
            logo_url: logo("cardano-ada"),
        },
        Token {
            id: "dogecoin".into(),
            name: "Dogecoin".into(),
            symbol: "DOGE".into(),
            price: 0.16,
            change_24h: 8.4,
            volume_24h: 2.5e9,
            market_cap: 23e9,
            logo_url: logo("dogecoin-doge"),
        },
        Token {
            id: "polkadot".into(),
            name: "Polkadot".into(),
            symbol: "DOT".into(),
            price: 7.2,
            change_24h: 1.1,
            volume_24h: 200e6,
            market_cap: 10e9,
            logo_url: logo("polkadot-new-dot"),
        },
    ]
}
