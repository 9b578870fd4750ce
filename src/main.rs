use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use textsplash::config::{self, Config};
use textsplash::frame::FrameDriver;
use textsplash::keys::KeySet;
use textsplash::render::{to_plain_text, GridView};

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct App {
    driver: FrameDriver<StdRng>,
    quit_keys: KeySet,
    ripple_keys: KeySet,
    restart_keys: KeySet,
    frame_interval: Duration,
    should_quit: bool,
}

impl App {
    fn new(config: &Config, width: u16, height: u16) -> Result<Self> {
        let driver = FrameDriver::new(
            config,
            usize::from(width),
            usize::from(height),
            StdRng::from_entropy(),
        )
        .context("Failed to create animation grid")?;
        Ok(Self {
            driver,
            quit_keys: KeySet::parse(&config.keys.quit),
            ripple_keys: KeySet::parse(&config.keys.ripple),
            restart_keys: KeySet::parse(&config.keys.restart),
            frame_interval: Duration::from_secs_f64(1.0 / f64::from(config.general.fps)),
            should_quit: false,
        })
    }

    fn handle_event(&mut self, event: Event, now: f64) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if self.quit_keys.matches(&key) {
                    self.should_quit = true;
                } else if self.ripple_keys.matches(&key) {
                    let grid = self.driver.grid();
                    let (x, y) = (grid.width() / 2, grid.height() / 2);
                    self.driver.click(x as i32, y as i32, now);
                } else if self.restart_keys.matches(&key) {
                    self.driver.restart(now);
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                self.driver
                    .click(i32::from(mouse.column), i32::from(mouse.row), now);
            }
            Event::Resize(width, height) => {
                if let Err(e) = self.driver.resize(usize::from(width), usize::from(height)) {
                    tracing::warn!("ignoring resize: {e}");
                }
            }
            _ => {}
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

#[derive(Parser)]
#[command(name = "textsplash")]
#[command(author = "Ninso112")]
#[command(version)]
#[command(about = "An animated text-mode splash screen for the terminal", long_about = None)]
struct Cli {
    /// Generate default configuration file
    #[arg(short, long)]
    init: bool,

    /// Specify custom config file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for the banner reveal order (and the colours in snapshot mode)
    #[arg(long)]
    seed: Option<u64>,

    /// Frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log level used with --log-file
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: tracing::Level,

    /// Print the frame at this many seconds as plain text and exit
    #[arg(long, value_name = "SECS")]
    snapshot: Option<f64>,

    /// Grid size for --snapshot
    #[arg(long, value_name = "WxH", default_value = "80x24", value_parser = parse_size)]
    size: (u16, u16),
}

fn parse_size(value: &str) -> Result<(u16, u16), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u16>()
            .map_err(|e| format!("invalid dimension '{part}': {e}"))
    };
    Ok((parse(width)?, parse(height)?))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path, cli.log_level)?;
    }

    // Handle --init flag
    if cli.init {
        let config_path = config::generate_config_file()?;
        println!(
            "Default configuration file created at: {}",
            config_path.display()
        );
        println!("Edit this file to customize textsplash's animation and key bindings.");
        return Ok(());
    }

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        config::load_config_from_path(config_path)?
    } else {
        config::load_config()
    };
    if let Some(seed) = cli.seed {
        config.general.seed = seed;
    }
    if let Some(fps) = cli.fps {
        config.general.fps = fps;
    }
    config.validate()?;

    if let Some(secs) = cli.snapshot {
        return print_snapshot(&config, cli.size, secs);
    }

    let (width, height) = crossterm::terminal::size().context("Failed to query terminal size")?;
    let mut app = App::new(&config, width, height)?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    if let Err(err) = res {
        tracing::error!("animation loop failed: {err:#}");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn init_logging(path: &Path, level: tracing::Level) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialise logging")
}

fn print_snapshot(config: &Config, (width, height): (u16, u16), secs: f64) -> Result<()> {
    if !secs.is_finite() {
        bail!("--snapshot needs a finite number of seconds");
    }
    let rng = StdRng::seed_from_u64(config.general.seed);
    let mut driver = FrameDriver::new(config, usize::from(width), usize::from(height), rng)
        .context("Invalid --size")?;
    driver.tick(secs);
    println!("{}", to_plain_text(driver.grid(), false));
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let clock = Instant::now();
    loop {
        let frame_start = Instant::now();
        let now = clock.elapsed().as_secs_f64();

        app.driver.tick(now);
        terminal.draw(|f| f.render_widget(GridView::new(app.driver.grid()), f.area()))?;

        if app.should_quit {
            break;
        }

        let mut remaining = app.frame_interval.saturating_sub(frame_start.elapsed());
        while event::poll(remaining)? {
            app.handle_event(event::read()?, now);
            if app.should_quit {
                return Ok(());
            }
            remaining = app.frame_interval.saturating_sub(frame_start.elapsed());
        }
    }
    Ok(())
}
