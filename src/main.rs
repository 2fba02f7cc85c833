//! couchtv - lean-back IPTV browser for the terminal
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! couchtv
//!
//! # CLI mode (for automation)
//! couchtv login home --url http://tv.example:8080 -u alice -P secret
//! couchtv search movies "blade runner"
//! couchtv history --json
//! ```

use std::fs::OpenOptions;
use std::io::{stdout, Stdout};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use couchtv::api::{CatalogRequest, CatalogResponse, XtreamClient};
use couchtv::app::{App, EngineFactory, Fetch};
use couchtv::cli::{Cli, Command, ExitCode, Output};
use couchtv::commands::{self, Context};
use couchtv::config::Config;
use couchtv::playback::SystemClock;
use couchtv::ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

const LOG_FILE: &str = "couchtv.log";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        init_cli_tracing(cli.quiet);
        let exit_code = run_cli(cli, config).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: stderr belongs to the screen, so logs go to a file
        init_tui_tracing(&config);
        run_tui(cli, config).await
    }
}

// =============================================================================
// Logging
// =============================================================================

fn init_cli_tracing(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_tui_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let dir = config.data_dir();
    let file = std::fs::create_dir_all(&dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
    });
    // Without a log file the TUI runs silent
    if let Ok(file) = file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
}

// =============================================================================
// CLI Mode
// =============================================================================

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: Config) -> ExitCode {
    let output = Output::new(&cli);
    let mut ctx = Context::new(&cli, config);

    match cli.command {
        Some(Command::Login(cmd)) => commands::login_cmd(cmd, &mut ctx, &output).await,
        Some(Command::Profiles(cmd)) => commands::profiles_cmd(cmd, &ctx, &output).await,
        Some(Command::Categories(cmd)) => commands::categories_cmd(cmd, &ctx, &output).await,
        Some(Command::Streams(cmd)) => commands::streams_cmd(cmd, &ctx, &output).await,
        Some(Command::Info(cmd)) => commands::info_cmd(cmd, &ctx, &output).await,
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &ctx, &output).await,
        Some(Command::History(cmd)) => commands::history_cmd(cmd, &ctx, &output).await,
        Some(Command::Favorites(cmd)) => commands::favorites_cmd(cmd, &ctx, &output).await,
        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(unix)]
fn engine_factory(config: &Config) -> EngineFactory {
    use couchtv::playback::MpvEngine;
    let player = config.player.clone();
    Box::new(move || Box::new(MpvEngine::new(player.clone())))
}

#[cfg(not(unix))]
fn engine_factory(_config: &Config) -> EngineFactory {
    use couchtv::playback::UnavailableEngine;
    Box::new(|| Box::new(UnavailableEngine))
}

/// Run interactive TUI
async fn run_tui(cli: Cli, config: Config) -> Result<()> {
    let ctx = Context::new(&cli, config);
    let mut app = App::new(
        ctx.store(),
        &ctx.config,
        engine_factory(&ctx.config),
        Arc::new(SystemClock),
    );
    info!(data_dir = %ctx.config.data_dir().display(), "starting");

    if let Some(name) = ctx.profile_name() {
        app.login(&name);
    }

    let mut terminal = init_terminal()?;

    // Run the main event loop
    let result = run_event_loop(&mut terminal, &mut app).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - runs fetches, applies responses, renders, handles input
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let (tx, mut rx) = mpsc::unbounded_channel::<CatalogResponse>();
    let mut client: Option<Arc<XtreamClient>> = None;

    while app.running {
        dispatch_fetches(app, &mut client, &tx);
        while let Ok(response) = rx.try_recv() {
            app.apply_response(response);
        }
        app.tick();

        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}

/// Spawn a task per queued catalog call; a login swaps in a new client
fn dispatch_fetches(
    app: &mut App,
    client: &mut Option<Arc<XtreamClient>>,
    tx: &mpsc::UnboundedSender<CatalogResponse>,
) {
    for Fetch { ticket, request } in app.take_fetches() {
        if let CatalogRequest::Login(profile) = &request {
            *client = Some(Arc::new(XtreamClient::from_profile(profile)));
        }
        let Some(api) = client.clone() else {
            warn!(scope = %ticket.scope, "catalog request without a signed-in profile");
            app.set_error("Not signed in");
            continue;
        };

        let tx = tx.clone();
        let task_ticket = ticket.clone();
        let handle = tokio::spawn(async move {
            let payload = request.execute(&api).await;
            // Receiver gone means the app is shutting down
            let _ = tx.send(CatalogResponse {
                ticket: task_ticket,
                payload,
            });
        });
        app.attach_task(&ticket, handle.abort_handle());
    }
}
