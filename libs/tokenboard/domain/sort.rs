//! Client-side sort engine

use super::token::Token;
use icu_collator::{Collator, CollatorOptions, Strength};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Price,
    Change24h,
    Volume24h,
    MarketCap,
}

impl SortKey {
    /// Column order in the table.
    pub const ALL: [SortKey; 5] = [
        SortKey::Name,
        SortKey::Price,
        SortKey::Change24h,
        SortKey::Volume24h,
        SortKey::MarketCap,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Price => "Price",
            SortKey::Change24h => "24h Change",
            SortKey::Volume24h => "24h Volume",
            SortKey::MarketCap => "Market Cap",
        }
    }

    fn compare(&self, a: &Token, b: &Token, collator: Option<&Collator>) -> Ordering {
        match self {
            SortKey::Name => compare_text(collator, &a.name, &b.name),
            SortKey::Price => compare_numbers(a.price, b.price),
            SortKey::Change24h => compare_numbers(a.change_24h, b.change_24h),
            SortKey::Volume24h => compare_numbers(a.volume_24h, b.volume_24h),
            SortKey::MarketCap => compare_numbers(a.market_cap, b.market_cap),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Next config after the user picks `key`: the active key flips from
    /// ascending to descending, anything else starts ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self { key, direction }
    }
}

impl Default for SortConfig {
    /// Largest market cap first.
    fn default() -> Self {
        Self::new(SortKey::MarketCap, SortDirection::Desc)
    }
}

/// Root-locale collator that ignores case but not accents.
fn name_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);

    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!("[Sort] Collator unavailable, falling back to code point order: {}", e);
            None
        }
    }
}

/// Collated, case-insensitive text order.
fn compare_text(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    match collator {
        Some(collator) => collator.compare(a, b),
        None => a
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase)),
    }
}

/// NaN counts as zero.
fn compare_numbers(a: f64, b: f64) -> Ordering {
    let a = if a.is_nan() { 0.0 } else { a };
    let b = if b.is_nan() { 0.0 } else { b };
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Return a new, sorted sequence. Stable: ties keep their input order in
/// both directions.
pub fn sort_tokens(tokens: &[Arc<Token>], config: SortConfig) -> Vec<Arc<Token>> {
    let collator = match config.key {
        SortKey::Name => name_collator(),
        _ => None,
    };

    let mut sorted = tokens.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = config.key.compare(a, b, collator.as_ref());
        match config.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}
