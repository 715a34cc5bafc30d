//! View-local table state
//!
//! Everything the user can change (sort, cursor, open modal) lives here and
//! never flows back into the feed. Time is passed in by the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::{sort_tokens, FlashDirection, FlashTracker, SortConfig, SortKey, Token};
use crate::utils::{
    format_billions, format_currency, format_millions, format_percentage, format_price,
    format_signed_percent, DEFAULT_DECIMALS,
};

/// Skeleton display time before the first real rows are shown.
pub const INITIAL_LOAD_DELAY: Duration = Duration::from_millis(2000);

/// Placeholder rows drawn while loading.
pub const SKELETON_ROWS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Loaded,
}

/// One formatted table row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: String,
    pub change: String,
    /// Change is zero or positive
    pub gaining: bool,
    pub volume: String,
    pub market_cap: String,
    pub flash: FlashDirection,
    pub highlighted: bool,
}

/// Contents of the detail modal.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub name: String,
    pub symbol: String,
    pub price: String,
    pub change: String,
    pub gaining: bool,
    pub market_cap: String,
    pub volume: String,
    pub logo_url: Option<String>,
}

/// Sortable, selectable token table
#[derive(Debug)]
pub struct TableView {
    loaded_at: Instant,
    sort: SortConfig,
    /// Latest feed tokens in feed order
    source: Vec<Arc<Token>>,
    /// `source` ordered by `sort`
    rows: Vec<Arc<Token>>,
    cursor: usize,
    /// Token id shown in the modal
    detail: Option<String>,
    flashes: FlashTracker,
    last_revision: Option<u64>,
}

impl TableView {
    pub fn new(now: Instant) -> Self {
        Self::with_load_delay(now, INITIAL_LOAD_DELAY)
    }

    pub fn with_load_delay(now: Instant, delay: Duration) -> Self {
        Self {
            loaded_at: now + delay,
            sort: SortConfig::default(),
            source: Vec::new(),
            rows: Vec::new(),
            cursor: 0,
            detail: None,
            flashes: FlashTracker::new(),
            last_revision: None,
        }
    }

    pub fn phase(&self, now: Instant) -> LoadPhase {
        if now < self.loaded_at {
            LoadPhase::Loading
        } else {
            LoadPhase::Loaded
        }
    }

    pub fn sort_config(&self) -> SortConfig {
        self.sort
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted tokens as currently displayed.
    pub fn sorted(&self) -> &[Arc<Token>] {
        &self.rows
    }

    /// Take a new feed snapshot. Unchanged revisions are skipped so flashes
    /// only react to real updates.
    pub fn refresh(&mut self, tokens: Vec<Arc<Token>>, revision: u64, now: Instant) {
        if self.last_revision == Some(revision) {
            return;
        }
        self.last_revision = Some(revision);

        self.flashes.observe(&tokens, now);
        self.source = tokens;
        self.resort();
    }

    /// Sort by `key`, toggling direction when it is already active. The
    /// cursor follows the token it was on.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = self.sort.toggled(key);
        self.resort();
    }

    fn resort(&mut self) {
        let current = self.rows.get(self.cursor).map(|t| t.id.clone());
        self.rows = sort_tokens(&self.source, self.sort);

        self.cursor = current
            .and_then(|id| self.rows.iter().position(|t| t.id == id))
            .unwrap_or(0);
    }

    pub fn next_row(&mut self) {
        if !self.rows.is_empty() {
            self.cursor = (self.cursor + 1) % self.rows.len();
        }
    }

    pub fn prev_row(&mut self) {
        if !self.rows.is_empty() {
            self.cursor = if self.cursor == 0 {
                self.rows.len() - 1
            } else {
                self.cursor - 1
            };
        }
    }

    /// Open the modal for the row under the cursor. Ignored while loading.
    pub fn open_detail(&mut self, now: Instant) {
        if self.phase(now) == LoadPhase::Loading {
            return;
        }
        self.detail = self.rows.get(self.cursor).map(|t| t.id.clone());
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn is_detail_open(&self) -> bool {
        self.detail.is_some()
    }

    /// Token shown in the modal, at its latest price.
    pub fn detail_token(&self) -> Option<&Arc<Token>> {
        let id = self.detail.as_deref()?;
        self.rows.iter().find(|t| t.id == id)
    }

    pub fn flash(&self, token_id: &str, now: Instant) -> FlashDirection {
        self.flashes.direction(token_id, now)
    }

    pub fn rows(&self, now: Instant) -> Vec<RowView> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, token)| RowView {
                id: token.id.clone(),
                name: token.name.clone(),
                symbol: token.symbol.clone(),
                price: format_price(token.price),
                change: format_percentage(token.change_24h, 1),
                gaining: token.change_24h >= 0.0,
                volume: format_currency(token.volume_24h, DEFAULT_DECIMALS),
                market_cap: format_currency(token.market_cap, DEFAULT_DECIMALS),
                flash: self.flash(&token.id, now),
                highlighted: i == self.cursor,
            })
            .collect()
    }

    pub fn detail(&self) -> Option<DetailView> {
        self.detail_token().map(|token| DetailView {
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            price: format_price(token.price),
            change: format_signed_percent(token.change_24h),
            gaining: token.change_24h >= 0.0,
            market_cap: format_billions(token.market_cap),
            volume: format_millions(token.volume_24h),
            logo_url: token.logo_url.clone(),
        })
    }
}
