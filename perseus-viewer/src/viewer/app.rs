//! Application shell: terminal setup, the event loop and key routing.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::{CrosstermBackend, Terminal};

use perseus_core::RendererOptions;

use super::model::Model;
use super::ui;

pub struct App {
    pub model: Model,
}

impl App {
    pub fn new(model: Model) -> Self {
        App { model }
    }

    /// Routes a key to the model. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') if !self.model.focused_takes_text() => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Tab => self.model.focus_next(),
            KeyCode::BackTab => self.model.focus_previous(),
            KeyCode::Esc => self.model.blur(),
            KeyCode::Enter => self.model.grade(),
            KeyCode::Backspace => self.model.backspace(),
            KeyCode::Char(c) => {
                // While a text input holds focus every printable character
                // is input, digits included; otherwise digits pick choices.
                if self.model.focused_takes_text() {
                    self.model.type_char(c);
                } else if let Some(digit) = c.to_digit(10) {
                    if digit >= 1 {
                        self.model.toggle_choice((digit - 1) as usize);
                    }
                }
            }
            _ => {}
        }
        false
    }
}

/// Run the viewer for the given exercise file
pub fn run_viewer(file_path: PathBuf, config_path: Option<PathBuf>) -> io::Result<()> {
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let loader = match &config_path {
        Some(path) => perseus_config::Loader::new().with_file(path),
        None => perseus_config::Loader::new(),
    };
    let config = loader
        .build()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("config error: {e}")))?;

    let options = load_exercise(&file_path, &config)?;
    let model = Model::new(options, &config);
    let mut app = App::new(model);

    enable_raw_mode()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app, &file_name);

    disable_raw_mode()?;
    terminal.clear()?;
    terminal.show_cursor()?;

    result
}

fn load_exercise(
    path: &PathBuf,
    config: &perseus_config::PerseusConfig,
) -> io::Result<RendererOptions> {
    let raw = fs::read_to_string(path)?;
    let mut value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid JSON: {e}")))?;
    if let Some(question) = value.get_mut("question") {
        value = question.take();
    }
    let mut options: RendererOptions = serde_json::from_value(value).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("not a perseus exercise: {e}"),
        )
    })?;
    options.always_update = config.renderer.always_update;
    options.linter_context.highlight_lint = config.renderer.highlight_lint;
    options.api_options = config.api.to_api_options();
    Ok(options)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    file_name: &str,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| {
            ui::render(frame, &app.model, file_name);
        })?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if app.handle_key(key) {
                        return Ok(());
                    }
                }
                // On terminal resize the next loop iteration re-renders
                // with the new dimensions.
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }
}
