use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use sorcerer_config::{Config, OnCorrupt};
use sorcerer_engine::{CorruptSnapshotPolicy, Editor, FileStorage, Key, KeyInput};
use std::{
    env, fs,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

mod view;

use view::Status;

struct App {
    editor: Editor<FileStorage>,
    status: Status,
    scroll: u16,
}

/// What the run loop should do after a key press
enum Action {
    Continue,
    Quit,
}

impl App {
    fn new(config: &Config) -> Result<Self> {
        let policy = match config.on_corrupt {
            OnCorrupt::StartEmpty => CorruptSnapshotPolicy::StartEmpty,
            OnCorrupt::Fail => CorruptSnapshotPolicy::Fail,
        };
        let storage = FileStorage::new(&config.storage_dir);
        let editor = Editor::open(storage, config.storage_key.as_str(), policy)
            .context("Failed to open the stored document")?;

        Ok(Self {
            editor,
            status: Status::Idle,
            scroll: 0,
        })
    }

    fn handle_key_event(&mut self, event: KeyEvent) -> Action {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        match event.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('q') if ctrl => return Action::Quit,
            KeyCode::Char('s') if ctrl => {
                self.status = match self.editor.save() {
                    Ok(ack) => Status::Info(ack.to_string()),
                    Err(e) => Status::Error(format!("Save failed: {e}")),
                };
                return Action::Continue;
            }
            _ => {}
        }

        let Some(input) = key_input(&event) else {
            return Action::Continue;
        };
        match self.editor.handle_key(input) {
            Ok(_) => {
                if matches!(self.status, Status::Info(_)) {
                    self.status = Status::Idle;
                }
            }
            Err(e) => {
                log::error!("failed to persist document: {e}");
                self.status = Status::Error(format!("Write failed: {e}"));
            }
        }
        Action::Continue
    }
}

/// Translate a crossterm key event into the editor's key model
fn key_input(event: &KeyEvent) -> Option<KeyInput> {
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Escape,
        _ => return None,
    };
    Some(KeyInput {
        key,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
        alt: event.modifiers.contains(KeyModifiers::ALT),
    })
}

/// Route log output to a file next to the document
fn init_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.storage_dir).with_context(|| {
        format!(
            "Failed to create storage directory '{}'",
            config.storage_dir.display()
        )
    })?;
    let log_file = fs::File::create(config.storage_dir.join("sorcerer.log"))
        .context("Failed to create log file")?;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    // Storage directory from CLI args overrides the config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let mut config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Fix or remove the config file at {}", config_path.display());
            process::exit(1);
        }
    };

    match args.len() {
        1 => {}
        2 => config.storage_dir = PathBuf::from(&args[1]),
        _ => {
            eprintln!("Usage: {} [storage-dir]", args[0]);
            process::exit(1);
        }
    }

    init_logging(&config)?;
    log::info!(
        "starting with storage '{}' key '{}'",
        config.storage_dir.display(),
        config.storage_key
    );

    // Open before touching the terminal so startup errors print normally
    let mut app = match App::new(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| view::draw(f, app.editor.state(), &app.status, &mut app.scroll))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Action::Quit = app.handle_key_event(key)
        {
            return Ok(());
        }
    }
}
