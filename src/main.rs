use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use typesprint::{
    app::{App, Flow},
    config::{Config, ConfigStore, FileConfigStore},
    controller::SessionController,
    logging,
    runtime::{self, CrosstermEventSource, FixedTicker, Runner},
    timer::Countdown,
    word_source::{QuoteWordSource, StaticWordSource, WordSource},
};

/// timed typing test scored word by word against a fetched quote
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// number of seconds to run the test
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    secs: Option<u32>,

    /// custom prompt to type instead of fetching a quote
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// quote endpoint returning JSON with a `content` field
    #[clap(long)]
    endpoint: Option<String>,

    /// keep at most this many words of the quote
    #[clap(short = 'w', long)]
    max_words: Option<usize>,

    /// write logs to this file instead of the default data directory
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// save the effective settings as the new defaults
    #[clap(long)]
    write_config: bool,
}

impl Cli {
    /// Overlay command line flags on the stored configuration
    fn merge(&self, mut config: Config) -> Config {
        if let Some(secs) = self.secs {
            config.duration_secs = secs;
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(max_words) = self.max_words {
            config.max_words = max_words;
        }
        config
    }

    fn word_source(&self, config: &Config) -> Box<dyn WordSource> {
        match &self.prompt {
            Some(prompt) => {
                Box::new(StaticWordSource::new(prompt.clone()).with_max_words(config.max_words))
            }
            None => Box::new(
                QuoteWordSource::new(config.endpoint.clone())
                    .with_max_words(config.max_words)
                    .with_timeout(Duration::from_secs(config.fetch_timeout_secs)),
            ),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_file.clone().or_else(logging::default_log_path) {
        // logging is best effort; the test still runs without it
        if let Err(e) = logging::init(&path) {
            eprintln!("typesprint: logging disabled, cannot open {}: {e}", path.display());
        }
    }

    let store = FileConfigStore::new();
    let config = cli.merge(store.load());
    if cli.write_config {
        match store.save(&config) {
            Ok(()) => info!("saved config to {}", store.path().display()),
            Err(e) => warn!("failed to save config: {e}"),
        }
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &cli, &config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    cli: &Cli,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    runtime::spawn_word_fetch(cli.word_source(config), runner.sender());

    let controller = SessionController::new(Countdown::default());
    let mut app = App::new(controller, config.duration_secs);

    terminal.draw(|f| f.render_widget(&app, f.area()))?;

    loop {
        let event = runner.step();
        if app.on_event(event, Instant::now()) == Flow::Quit {
            break;
        }
        if app.take_changes() {
            terminal.draw(|f| f.render_widget(&app, f.area()))?;
        }
    }

    Ok(())
}
