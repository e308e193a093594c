use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas as CanvasWidget, Circle, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::interpreter::Interpreter;
use crate::surface::canvas::Canvas;
use crate::surface::{FileDialog, Host};

const MAX_MESSAGES: usize = 200;
const QUIT_QUESTION: &str = "You have unsaved changes. Quit anyway?";

/// Host backed by the terminal. Prompts run their own small key loop until Enter or Esc.
pub struct TuiHost {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    messages: Vec<String>,
}

impl TuiHost {
    pub fn new() -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self {
            terminal,
            messages: Vec::new(),
        })
    }

    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        let mut answer = String::new();
        loop {
            let messages = &self.messages;
            self.terminal
                .draw(|frame| prompt_ui(frame, question, &answer, messages))?;

            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                match key.code {
                    KeyCode::Enter => return Ok(Some(answer)),
                    KeyCode::Esc => return Ok(None),
                    KeyCode::Backspace => {
                        answer.pop();
                    }
                    KeyCode::Char(c) => answer.push(c),
                    _ => {}
                }
            }
        }
    }
}

impl Host for TuiHost {
    fn report(&mut self, message: &str) {
        tracing::info!(text = message, "report");
        self.messages.push(message.to_string());
        if self.messages.len() > MAX_MESSAGES {
            self.messages.drain(..self.messages.len() - MAX_MESSAGES);
        }
    }

    fn confirm(&mut self, question: &str) -> bool {
        match self.prompt(&format!("{question} (y/n)")) {
            Ok(answer) => answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("y")),
            Err(e) => {
                tracing::error!("confirmation prompt failed: {e}");
                false
            }
        }
    }

    fn pick_file(&mut self, dialog: &FileDialog) -> Option<PathBuf> {
        match self.prompt(&format!("{} (path, Esc to cancel)", dialog.title)) {
            Ok(answer) => answer
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .map(PathBuf::from),
            Err(e) => {
                tracing::error!("file prompt failed: {e}");
                None
            }
        }
    }
}

pub struct App {
    interpreter: Interpreter<Canvas, TuiHost>,
    input: String,
    history: Vec<String>,
    history_cursor: Option<usize>,
    should_quit: bool,
}

impl App {
    pub fn new(interpreter: Interpreter<Canvas, TuiHost>) -> Self {
        Self {
            interpreter,
            input: String::new(),
            history: Vec::new(),
            history_cursor: None,
            should_quit: false,
        }
    }

    fn submit(&mut self) {
        let line = std::mem::take(&mut self.input);
        self.history_cursor = None;
        if line.trim().is_empty() {
            return;
        }
        self.history.push(line.clone());
        self.interpreter.process_line(&line);
    }

    fn recall(&mut self, older: bool) {
        if self.history.is_empty() {
            return;
        }
        let last = self.history.len() - 1;
        let cursor = match (self.history_cursor, older) {
            (None, true) => Some(last),
            (None, false) => None,
            (Some(i), true) => Some(i.saturating_sub(1)),
            (Some(i), false) if i < last => Some(i + 1),
            (Some(_), false) => None,
        };
        self.history_cursor = cursor;
        self.input = cursor.map(|i| self.history[i].clone()).unwrap_or_default();
    }

    fn request_quit(&mut self) {
        if !self.interpreter.is_dirty() || self.interpreter.host_mut().confirm(QUIT_QUESTION) {
            self.should_quit = true;
        }
    }

    fn status_line(&self) -> String {
        let pen = self.interpreter.state();
        let log = self.interpreter.log();
        format!(
            "  Turtle Graphics   pen {} │ width {} │ {}   log {} │ redo {}{}",
            pen.color,
            pen.width,
            if pen.pen_down { "down" } else { "up" },
            log.len(),
            log.redo_entries().len(),
            if self.interpreter.is_dirty() { "   ●" } else { "" },
        )
    }
}

pub fn run_tui(app: &mut App) -> Result<()> {
    // Install panic hook that restores terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;

    while !app.should_quit {
        let status = app.status_line();
        let input = &app.input;
        let (canvas, host) = app.interpreter.parts_mut();
        let TuiHost { terminal, messages } = host;
        terminal.draw(|frame| ui(frame, canvas, messages, input, &status))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Esc => app.request_quit(),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.request_quit();
                }
                KeyCode::Enter => app.submit(),
                KeyCode::Up => app.recall(true),
                KeyCode::Down => app.recall(false),
                KeyCode::Backspace => {
                    app.input.pop();
                }
                KeyCode::Char(c) => app.input.push(c),
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}

/// Arrow pointing along the turtle's heading, snapped to the nearest quarter turn.
fn turtle_glyph(heading: f64) -> &'static str {
    match ((heading + 45.0).rem_euclid(360.0) / 90.0) as u8 {
        0 => "▲",
        1 => "▶",
        2 => "▼",
        _ => "◀",
    }
}

/// The last `rows` lines of the message history, multi-line messages expanded.
fn message_tail(messages: &[String], rows: usize) -> Vec<&str> {
    let lines: Vec<&str> = messages.iter().flat_map(|m| m.lines()).collect();
    let skip = lines.len().saturating_sub(rows);
    lines[skip..].to_vec()
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

fn ui(frame: &mut Frame, canvas: &Canvas, messages: &[String], input: &str, status: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status
            Constraint::Min(8),    // canvas
            Constraint::Length(8), // messages
            Constraint::Length(3), // input
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    let title = Paragraph::new(status).style(Style::default().fg(Color::White).bold());
    frame.render_widget(title, chunks[0]);

    let (width, height) = canvas.size();
    let half_w = f64::from(width) / 2.0;
    let half_h = f64::from(height) / 2.0;
    let scene = canvas.scene();
    let (x, y) = canvas.position();
    let glyph = turtle_glyph(canvas.heading());

    let drawing = CanvasWidget::default()
        .block(
            Block::default()
                .title(" CANVAS ")
                .title_style(Style::default().fg(Color::Yellow))
                .borders(Borders::ALL),
        )
        .background_color(Color::White)
        .marker(Marker::Braille)
        .x_bounds([-half_w, half_w])
        .y_bounds([-half_h, half_h])
        .paint(move |ctx| {
            for stroke in &scene.strokes {
                ctx.draw(&CanvasLine::new(
                    stroke.from.0,
                    stroke.from.1,
                    stroke.to.0,
                    stroke.to.1,
                    rgb(stroke.color),
                ));
            }
            for ring in &scene.rings {
                ctx.draw(&Circle {
                    x: ring.center.0,
                    y: ring.center.1,
                    radius: ring.radius,
                    color: rgb(ring.color),
                });
            }
            ctx.layer();
            ctx.print(x, y, glyph.fg(Color::Red));
        });
    frame.render_widget(drawing, chunks[1]);

    let rows = usize::from(chunks[2].height.saturating_sub(2));
    let tail = message_tail(messages, rows).join("\n");
    let message_pane = Paragraph::new(tail)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .title(" MESSAGES ")
                .title_style(Style::default().fg(Color::Yellow))
                .borders(Borders::ALL),
        );
    frame.render_widget(message_pane, chunks[2]);

    let prompt = Paragraph::new(format!("> {input}"))
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(prompt, chunks[3]);
    let cursor_x = chunks[3].x + 3 + u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
    frame.set_cursor_position((cursor_x.min(chunks[3].right().saturating_sub(2)), chunks[3].y + 1));

    let footer_text = "  Enter = run  │  ↑/↓ = history  │  help = commands  │  Esc = quit";
    let footer = Paragraph::new(footer_text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[4]);
}

fn prompt_ui(frame: &mut Frame, question: &str, answer: &str, messages: &[String]) {
    let area = frame.area();
    let rows = usize::from(area.height.saturating_sub(2));
    let background = Paragraph::new(message_tail(messages, rows).join("\n"))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(background, area);

    let popup = Rect {
        x: area.width / 6,
        y: area.height / 3,
        width: area.width * 2 / 3,
        height: 3.min(area.height),
    };
    let input = Paragraph::new(format!("{answer}_"))
        .style(Style::default().fg(Color::White).bold())
        .block(
            Block::default()
                .title(format!(" {question} "))
                .title_style(Style::default().fg(Color::Yellow))
                .borders(Borders::ALL),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(input, popup);
}
