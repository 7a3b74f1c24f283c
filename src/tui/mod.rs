//! Ratatui-based terminal window.
//!
//! Lists the CSV files found under the working directory; the user selects one
//! and triggers a run. The run blocks the UI until it finishes, then the status
//! line shows the processed count or the error.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::{BatchReport, run_batch_file};
use crate::classify::RiskClassifier;
use crate::cli::picker::{discover_csv_files, pretty_path};
use crate::error::AppError;

/// Start the TUI.
pub fn run(classifier: &RiskClassifier, output: PathBuf) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(classifier, discover_csv_files(), output);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Loaded,
    Success,
    Error,
}

impl StatusKind {
    fn color(self) -> Color {
        match self {
            StatusKind::Info => Color::Blue,
            StatusKind::Loaded | StatusKind::Success => Color::Green,
            StatusKind::Error => Color::Red,
        }
    }
}

struct App<'a> {
    classifier: &'a RiskClassifier,
    files: Vec<PathBuf>,
    highlighted: usize,
    input: Option<PathBuf>,
    output: PathBuf,
    status: String,
    status_kind: StatusKind,
    last_report: Option<BatchReport>,
}

impl<'a> App<'a> {
    fn new(classifier: &'a RiskClassifier, files: Vec<PathBuf>, output: PathBuf) -> Self {
        let status = if files.is_empty() {
            "No .csv files found under the current directory.".to_string()
        } else {
            "Select an input CSV with Enter.".to_string()
        };
        Self {
            classifier,
            files,
            highlighted: 0,
            input: None,
            output,
            status,
            status_kind: StatusKind::Info,
            last_report: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if key.code == KeyCode::Char('g') && self.input.is_some() {
                        // Show the processing indicator before the blocking run.
                        self.set_status(StatusKind::Info, "Processing...");
                        terminal
                            .draw(|f| self.draw(f))
                            .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.highlighted = self.highlighted.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.highlighted + 1 < self.files.len() {
                    self.highlighted += 1;
                }
            }
            KeyCode::Enter => self.select_highlighted(),
            KeyCode::Char('g') => self.generate(),
            KeyCode::Char('r') => self.rescan(discover_csv_files()),
            _ => {}
        }
        false
    }

    fn select_highlighted(&mut self) {
        let Some(path) = self.files.get(self.highlighted).cloned() else {
            self.set_status(StatusKind::Error, "No file to select.");
            return;
        };
        self.set_status(StatusKind::Loaded, format!("File loaded: {}", file_label(&path)));
        self.input = Some(path);
    }

    fn generate(&mut self) {
        let Some(input) = self.input.clone() else {
            self.set_status(StatusKind::Error, "Please select a valid CSV file first!");
            return;
        };

        match run_batch_file(self.classifier, &input, &self.output) {
            Ok(report) => {
                self.set_status(
                    StatusKind::Success,
                    format!(
                        "Success! Processed {} customers. Output saved to {}",
                        report.count,
                        report.output.display()
                    ),
                );
                self.last_report = Some(report);
            }
            Err(err) => {
                self.set_status(StatusKind::Error, format!("Error processing file: {err}"));
            }
        }
    }

    fn rescan(&mut self, files: Vec<PathBuf>) {
        self.files = files;
        self.highlighted = self.highlighted.min(self.files.len().saturating_sub(1));
        self.set_status(StatusKind::Info, format!("Found {} CSV file(s).", self.files.len()));
    }

    fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status_kind = kind;
        self.status = message.into();
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_files(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled(
                "Risk Profile Generator",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - customer portfolio classification"),
        ]));

        let input = self
            .input
            .as_deref()
            .map(file_label)
            .unwrap_or_else(|| "No file selected".to_string());
        lines.push(Line::from(Span::styled(
            format!("input: {input} | output: {}", self.output.display()),
            Style::default().fg(Color::Gray),
        )));

        if let Some(report) = &self.last_report {
            lines.push(Line::from(Span::styled(
                format!("last run: {} rows, {} unclassified", report.count, report.unclassified),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_files(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .files
            .iter()
            .map(|path| {
                let marker = if self.input.as_deref() == Some(path.as_path()) { "* " } else { "  " };
                ListItem::new(format!("{marker}{}", pretty_path(path)))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Input CSV files").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if !self.files.is_empty() {
            state.select(Some(self.highlighted));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ browse  Enter select  g generate  r rescan  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(self.status_kind.color())),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| pretty_path(path))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ratatui::backend::TestBackend;

    use super::*;

    #[test]
    fn generate_requires_a_selection() {
        let classifier = RiskClassifier::default();
        let mut app = App::new(&classifier, vec![PathBuf::from("a.csv")], PathBuf::from("out.csv"));
        app.handle_key(KeyCode::Char('g'));
        assert_eq!(app.status_kind, StatusKind::Error);
        assert!(app.last_report.is_none());
    }

    #[test]
    fn browse_select_and_generate() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        fs::write(&first, "Name,Username,Contact No,Total score\n").unwrap();
        fs::write(
            &second,
            "Name,Username,Contact No,Total score\nAlice,alice@x.com,555,27 pts\n",
        )
        .unwrap();
        let output = dir.path().join("out.csv");

        let classifier = RiskClassifier::default();
        let mut app = App::new(&classifier, vec![first, second.clone()], output.clone());

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.input.as_ref(), Some(&second));
        assert!(app.status.starts_with("File loaded: second.csv"));

        app.handle_key(KeyCode::Char('g'));
        assert_eq!(app.status_kind, StatusKind::Success, "{}", app.status);
        assert_eq!(app.last_report.as_ref().map(|r| r.count), Some(1));
        assert!(output.exists());
    }

    #[test]
    fn failed_run_shows_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.csv");
        fs::write(&bad, "Name,Username\nA,a\n").unwrap();

        let classifier = RiskClassifier::default();
        let mut app = App::new(&classifier, vec![bad], dir.path().join("out.csv"));
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('g'));

        assert_eq!(app.status_kind, StatusKind::Error);
        assert!(app.status.contains("Missing required column"));
    }

    #[test]
    fn quit_keys_exit() {
        let classifier = RiskClassifier::default();
        let mut app = App::new(&classifier, Vec::new(), PathBuf::from("out.csv"));
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
        assert!(!app.handle_key(KeyCode::Enter));
    }

    #[test]
    fn renders_without_panicking() {
        let classifier = RiskClassifier::default();
        let app = App::new(&classifier, vec![PathBuf::from("./customers.csv")], PathBuf::from("out.csv"));
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let rendered: String = terminal.backend().buffer().content.iter().map(|c| c.symbol()).collect();
        assert!(rendered.contains("customers.csv"));
        assert!(rendered.contains("Risk Profile Generator"));
    }
}
