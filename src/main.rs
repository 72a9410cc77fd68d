mod ui;

use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{error, info, LevelFilter};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use quien::{
    app_dirs::AppDirs,
    catalog::Catalog,
    config::{remember_player, Config, ConfigStore, FileConfigStore},
    game::{Game, GameCommand},
    ledger::{self, FileLedgerStore, LedgerStore},
    runtime::{CrosstermEventSource, GameEvent, Runner},
};

use crate::ui::GameView;

const POLL_INTERVAL_MS: u64 = 250;

/// guess-who trivia in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Ask yes/no questions about a secret character, then guess who it is. Every question costs points; the best three scores are kept."
)]
pub struct Cli {
    /// player name (remembered for next time)
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// JSON catalog of characters and questions to play with
    #[clap(short = 'c', long)]
    catalog: Option<PathBuf>,

    /// file holding the top scores
    #[clap(long)]
    scores_file: Option<PathBuf>,

    /// print the top scores and exit
    #[clap(long)]
    show_scores: bool,

    /// where to write the log
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// more log output (-v info, -vv debug, -vvv trace)
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(path: &Path, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });
    builder.parse_default_env();

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("cannot create log directory {}: {e}", parent.display());
        }
    }
    // stderr would draw over the game, so logs only go to stderr when the file is unusable
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder.format(|fmt, record| {
                let ts = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%z");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
        Err(e) => eprintln!("cannot open log file {}: {e}; logging to stderr", path.display()),
    }
    if let Err(e) = builder.try_init() {
        eprintln!("logging disabled: {e}");
    }
}

fn save_player_name(store: &dyn ConfigStore, config: &mut Config, player: &str) {
    match remember_player(store, config, player) {
        Ok(true) => info!("remembering player {player}"),
        Ok(false) => {}
        Err(e) => error!("could not remember player name: {e}"),
    }
}

fn print_scores(store: &dyn LedgerStore) -> Result<(), Box<dyn Error>> {
    let entries = ledger::load(store)?;
    if entries.is_empty() {
        println!("No scores yet.");
    }
    for (i, entry) in entries.iter().enumerate() {
        println!("{}", ledger::format_line(i + 1, entry));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();

    let log_path = cli
        .log_file
        .clone()
        .or_else(|| config.log_path.clone())
        .unwrap_or_else(AppDirs::log_path);
    init_logging(&log_path, cli.verbose);

    let scores_store = FileLedgerStore::with_path(
        cli.scores_file
            .clone()
            .or_else(|| config.scores_path.clone())
            .unwrap_or_else(AppDirs::scores_path),
    );

    if cli.show_scores {
        return print_scores(&scores_store);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let catalog = match cli.catalog.as_ref().or(config.catalog_path.as_ref()) {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };

    if let Some(name) = cli.name.as_deref() {
        save_player_name(&config_store, &mut config, name);
    }

    let mut game = Game::new(catalog, config.player_name.clone())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = run_game(&mut terminal, &mut game);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // covers a name typed on the name screen, whichever way the player quit
    save_player_name(&config_store, &mut config, game.player());

    if outcome? {
        let score = game.round().score();
        info!("recording {} points for {}", score, game.player());
        let entries = ledger::record(&scores_store, game.player(), score)?;
        println!("Thanks for playing!");
        for (i, entry) in entries.iter().enumerate() {
            println!("{}", ledger::format_line(i + 1, entry));
        }
    }

    Ok(())
}

/// Drives the game until the player quits. Returns whether the score should be recorded.
fn run_game<B: Backend>(terminal: &mut Terminal<B>, game: &mut Game) -> Result<bool, Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource,
        Duration::from_millis(POLL_INTERVAL_MS),
    );

    terminal.draw(|f| f.render_widget(GameView(&*game), f.area()))?;
    loop {
        match runner.step()? {
            GameEvent::Tick => continue,
            GameEvent::Resize => {}
            GameEvent::Key(key) => {
                if let GameCommand::Quit { record } = game.on_key(key) {
                    return Ok(record);
                }
            }
        }
        terminal.draw(|f| f.render_widget(GameView(&*game), f.area()))?;
    }
}
