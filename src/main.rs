use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event;

use cfrec::app::App;
use cfrec::config;
use cfrec::recommender::{RecommendClient, spawn_worker};

/// How long to wait for input before checking for worker responses
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Get Codeforces problem recommendations based on your handle
#[derive(Parser, Debug)]
#[command(name = "cfrec", version, about)]
struct Args {
    /// Recommendation API endpoint (overrides the config file)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Pre-fill the handle field
    #[arg(long)]
    handle: Option<String>,

    /// Submit the pre-filled handle on startup
    #[arg(long, requires = "handle")]
    submit: bool,
}

fn main() -> Result<()> {
    // Install color-eyre panic hook for better error messages
    color_eyre::install()?;

    let args = Args::parse();

    #[cfg(debug_assertions)]
    init_logger();

    let loaded = config::load_config(args.config.as_deref());
    let mut config = loaded.config;
    if let Some(endpoint) = args.endpoint {
        config.api.endpoint = endpoint;
    }

    // Fail before touching the terminal if the endpoint is unusable
    let client = RecommendClient::new(&config.api.endpoint, config.api.timeout())?;
    log::debug!("Using endpoint {}", client.endpoint());

    let (request_tx, request_rx) = tokio::sync::mpsc::unbounded_channel();
    let (response_tx, response_rx) = mpsc::channel();
    spawn_worker(client, request_rx, response_tx)?;

    let mut app = App::new(&config);
    app.status_message = loaded.warning;
    app.recommender.set_channels(request_tx, response_rx);

    if let Some(handle) = &args.handle {
        app.input.set_handle(handle);
        if args.submit {
            app.submit();
        }
    }

    // Initialize terminal (handles raw mode, alternate screen, etc.)
    let terminal = ratatui::init();

    let result = run(terminal, app);

    // Restore terminal (automatic cleanup)
    ratatui::restore();

    result
}

fn run(mut terminal: DefaultTerminal, mut app: App) -> Result<()> {
    loop {
        app.poll_responses();

        terminal.draw(|frame| app.render(frame))?;

        if event::poll(POLL_INTERVAL)? {
            app.handle_event(event::read()?);
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// Send debug logs to a file so they don't corrupt the TUI
#[cfg(debug_assertions)]
fn init_logger() {
    let Some(dir) = dirs::cache_dir().map(|dir| dir.join("cfrec")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    if let Ok(file) = std::fs::File::create(dir.join("debug.log")) {
        let env = env_logger::Env::default().default_filter_or("cfrec=debug");
        let _ = env_logger::Builder::from_env(env)
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init();
    }
}
