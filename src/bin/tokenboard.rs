//! Token Board - Terminal UI for live token prices
//!
//! Streams Binance 24h tickers into a sortable table with price flashes.
//! Logs go to a file so they do not corrupt the alternate screen.

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use tokenboard_app::bin_common::{load_board_config, parse_args};
use tokenboard_app::tokenboard::application::board::{ui, App};
use tokenboard_app::tokenboard::{init_tracing_to_file, SortKey};

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = load_board_config(&parse_args())?;
    init_tracing_to_file(&config.log_level, &config.log_file)?;
    config.log();

    // Create tokio runtime
    let runtime = tokio::runtime::Runtime::new()?;

    // Start the feed
    let mut app = runtime.block_on(async {
        App::initialize(runtime.handle().clone(), &config).await
    })?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Shutdown app
    app.shutdown();

    if let Err(e) = result {
        error!("UI loop failed: {}", e);
        eprintln!("Error: {}", e);
    }

    info!("Token board closed");
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.refresh(Instant::now());

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Handle input with a short timeout so flashes and ticks stay live
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => app.should_quit = true,
                        KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                        KeyCode::Char('k') | KeyCode::Up => app.prev_row(),
                        KeyCode::Enter => app.open_detail(),
                        KeyCode::Esc => app.close_detail(),
                        KeyCode::Char('1') => app.sort_by(SortKey::Name),
                        KeyCode::Char('2') => app.sort_by(SortKey::Price),
                        KeyCode::Char('3') => app.sort_by(SortKey::Change24h),
                        KeyCode::Char('4') => app.sort_by(SortKey::Volume24h),
                        KeyCode::Char('5') => app.sort_by(SortKey::MarketCap),
                        _ => {}
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
