//! swifty - a minimal terminal editor that runs what you write
//!
//! Edits one Swift or Scala file with syntax highlighting and runs it
//! through the language's interpreter, streaming the output into a
//! console pane.

mod buffer;
mod command;
mod config;
mod console;
mod display;
mod editor;
mod error;
mod input;
mod line;
mod run;
mod syntax;
mod terminal;
mod window;

use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use console::AnsiWriter;
use editor::Editor;
use error::{EditorError, Result};
use run::{RunCoordinator, RunEvent, RunPanel};
use syntax::{StyledLine, SyntaxManager};
use terminal::Terminal;

/// Environment variable holding the log filter
const LOG_ENV: &str = "SWIFTY_LOG";

/// What the command line asked for
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Help,
    Version,
    Edit(Option<PathBuf>),
    Highlight(PathBuf),
    Run(PathBuf),
}

#[derive(Debug, PartialEq, Eq)]
struct Options {
    action: Action,
    config: Option<PathBuf>,
}

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let options = parse_args(env::args().skip(1))?;

    match options.action {
        Action::Help => {
            print_usage();
            Ok(0)
        }
        Action::Version => {
            print_version();
            Ok(0)
        }
        Action::Highlight(path) => {
            init_logging(false);
            let config = load_config(options.config.as_deref())?;
            highlight_file(&config, &path)?;
            Ok(0)
        }
        Action::Run(path) => {
            init_logging(false);
            let config = load_config(options.config.as_deref())?;
            run_headless(&config, &path)
        }
        Action::Edit(path) => {
            init_logging(true);
            let config = load_config(options.config.as_deref())?;
            edit(config, path)?;
            Ok(0)
        }
    }
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Options> {
    let mut args = args.into_iter();
    let mut action = None;
    let mut file = None;
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => action = Some(Action::Help),
            "--version" | "-V" => action = Some(Action::Version),
            "--highlight" => action = Some(Action::Highlight(required(&mut args, &arg)?)),
            "--run" => action = Some(Action::Run(required(&mut args, &arg)?)),
            "--config" => config = Some(required(&mut args, &arg)?),
            flag if flag.starts_with('-') => {
                return Err(EditorError::Message(format!("Unknown option: {}", flag)));
            }
            _ if file.is_none() => file = Some(PathBuf::from(&arg)),
            _ => return Err(EditorError::Message("Only one file can be edited".to_string())),
        }
        if matches!(action, Some(Action::Help) | Some(Action::Version)) {
            break;
        }
    }

    Ok(Options {
        action: action.unwrap_or(Action::Edit(file)),
        config,
    })
}

/// The value following `flag`
fn required(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<PathBuf> {
    args.next()
        .map(PathBuf::from)
        .ok_or_else(|| EditorError::Message(format!("{} needs a file argument", flag)))
}

/// Log to stderr, or to a file in the temp dir while the terminal is in raw mode
fn init_logging(interactive: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    if interactive {
        let log_path = env::temp_dir().join("swifty.log");
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
            info!(path = ?log_path, "logging initialized");
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Open the interactive editor
fn edit(config: Config, path: Option<PathBuf>) -> Result<()> {
    let mut terminal = Terminal::new()?;
    let mut editor = Editor::new(config, terminal.rows())?;
    if let Some(path) = path {
        editor.open_file(&path)?;
    }
    editor.run(&mut terminal)
}

/// Print a file with ANSI colors
fn highlight_file(config: &Config, path: &Path) -> Result<()> {
    highlight_to(config, path, &mut io::stdout().lock())
}

fn highlight_to<W: Write>(config: &Config, path: &Path, out: &mut W) -> Result<()> {
    let syntax = SyntaxManager::new(config.language_specs()?, &config.theme()?)?;
    let content = fs::read_to_string(path)?;

    let table = syntax
        .detect_language(path)
        .and_then(|name| syntax.table(name));
    if table.is_none() {
        warn!(
            path = %path.display(),
            known = ?syntax.list_languages(),
            "no language for file, printing plain"
        );
    }

    let mut writer = AnsiWriter::new(out);
    for line in content.lines() {
        let styled = match table {
            Some(table) => table.styled_line(line),
            None => StyledLine::new(line),
        };
        writer.write_line(&styled)?;
    }
    writer.finish()?;
    Ok(())
}

/// Run a file without the editor, streaming the console to stdout.
///
/// Returns the child's exit code.
fn run_headless(config: &Config, path: &Path) -> Result<i32> {
    let syntax = SyntaxManager::new(config.language_specs()?, &config.theme()?)?;
    let interpreter = syntax
        .interpreter_for(path)
        .map(<[String]>::to_vec)
        .or_else(|| config.default_interpreter())
        .ok_or_else(|| EditorError::NoInterpreter(path.to_path_buf()))?;

    let mut coordinator = RunCoordinator::new();
    let mut panel = RunPanel::new(AnsiWriter::new(io::stdout()));
    coordinator.start(&interpreter, path)?;

    let code = loop {
        match coordinator.next_event(Duration::from_millis(100)) {
            Some(RunEvent::Finished(code)) => {
                panel.handle(RunEvent::Finished(code));
                break code;
            }
            Some(event) => panel.handle(event),
            None => {}
        }
    };

    panel.into_sink().finish()?;
    Ok(code)
}

fn print_usage() {
    println!("swifty {} - a minimal editor with a run console", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: swifty [OPTIONS] [FILE]");
    println!();
    println!("Options:");
    println!("  -h, --help          Show this help message");
    println!("  -V, --version       Show version information");
    println!("  --highlight FILE    Print FILE with syntax colors and exit");
    println!("  --run FILE          Run FILE and stream its output");
    println!("  --config PATH       Read settings from PATH instead of ~/.swifty.toml");
    println!();
    println!("Key bindings:");
    println!("  F5, C-r        Run the file");
    println!("  C-s            Save");
    println!("  C-w            Save as");
    println!("  C-o            Open a file");
    println!("  C-l            Clear the console");
    println!("  C-q            Quit");
    println!();
    println!("Press F1 in editor for complete key binding list");
    println!("Set {}=debug to log to {}", LOG_ENV, env::temp_dir().join("swifty.log").display());
}

fn print_version() {
    println!("swifty {}", env!("CARGO_PKG_VERSION"));
}
