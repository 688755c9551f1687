use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use buzzwatch::data::duration::parse_duration;
use buzzwatch::logging::{self, LogMode};
use buzzwatch::{events, select_source, ui, App, Settings, Theme};

/// Event poll timeout while the source has nothing new.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Sleep between polls in headless mode while the source is idle.
const HEADLESS_IDLE_SLEEP: Duration = Duration::from_millis(10);

#[derive(Parser, Debug)]
#[command(name = "buzzwatch")]
#[command(about = "Live histogram of message lengths from Kafka or a JSON-lines file")]
struct Args {
    /// Replay file used in file mode (overrides DATA_FILE)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Delay between records in file mode (e.g., "1s", "250ms", "0")
    #[arg(short, long, default_value = "1s")]
    pace: String,

    /// Do not try the broker; read the replay file directly
    #[arg(long)]
    no_broker: bool,

    /// Replay the file without the TUI, write the histogram as JSON, and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    log_dir: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let pace = parse_duration(&args.pace)
        .with_context(|| format!("Invalid --pace value: {}", args.pace))?;

    let mode = if args.export.is_some() {
        LogMode::Headless
    } else {
        LogMode::Tui
    };
    let _log_guard = logging::init_logging(mode, &args.log_dir)?;

    let mut settings = Settings::from_env()?;
    if let Some(file) = args.file {
        settings.data_file = file;
    }

    info!("START consumer...");

    // Handle export mode (non-interactive, file only)
    if let Some(export_path) = args.export {
        return export_to_file(&settings, pace, &export_path);
    }

    let theme = Theme::auto_detect();
    let app = match select_source(&settings, pace, !args.no_broker) {
        Ok(source) => App::with_theme(source, theme),
        Err(e) => App::unavailable(&e, theme),
    };

    run_tui(app)
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(
        "Stopped after {} messages across {} lengths",
        app.histogram.total(),
        app.histogram.distinct()
    );
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        // One message at most per frame, so every message gets its own redraw
        let processed = app.tick();

        terminal.draw(|frame| ui::draw(frame, app))?;

        let timeout = if processed { Duration::ZERO } else { IDLE_POLL };
        if let Some(Event::Key(key)) = events::poll_event(timeout)? {
            events::handle_key_event(app, key);
        }
    }

    Ok(())
}

/// Replay the data file headlessly and write the histogram to a JSON file
fn export_to_file(settings: &Settings, pace: Duration, export_path: &Path) -> Result<()> {
    let mut app = match select_source(settings, pace, false) {
        Ok(source) => App::with_theme(source, Theme::dark()),
        Err(e) => {
            warn!("Exporting an empty histogram: {}", e);
            App::unavailable(&e, Theme::dark())
        }
    };

    while app.is_consuming() {
        if !app.tick() {
            std::thread::sleep(HEADLESS_IDLE_SLEEP);
        }
    }

    app.export_state(export_path)?;
    println!("Exported histogram to: {}", export_path.display());
    Ok(())
}
