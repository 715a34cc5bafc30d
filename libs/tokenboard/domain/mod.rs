//! Domain Layer
//!
//! Token records and the pure logic over them: folding ticks, sorting and
//! price-flash detection. No I/O and no clocks; callers pass `Instant`s in.

pub mod flash;
pub mod sort;
pub mod token;

pub use flash::{FlashDirection, FlashTracker, PriceFlash, FLASH_DURATION};
pub use sort::{sort_tokens, SortConfig, SortDirection, SortKey};
pub use token::{default_tokens, PriceTick, TickOutcome, Token, TokenBook};
