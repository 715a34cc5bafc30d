//! Display helpers

mod format;

pub use format::{
    format_billions, format_currency, format_millions, format_number, format_percentage,
    format_price, format_signed_percent, DEFAULT_DECIMALS,
};
