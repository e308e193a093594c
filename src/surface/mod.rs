pub mod canvas;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::state::TurtleState;

/// The rendering collaborator. It owns turtle position and heading; pen attributes arrive
/// with each drawing call.
pub trait DrawingSurface {
    /// Move along the current heading. Negative distances move backwards.
    fn forward(&mut self, distance: i32, pen: &TurtleState);
    /// Rotate clockwise by `degrees`. Negative values turn left.
    fn turn(&mut self, degrees: f64);
    fn circle(&mut self, radius: i32, pen: &TurtleState);
    /// Wipe everything drawn. Turtle position is untouched.
    fn clear(&mut self);
    /// Send the turtle home, facing up.
    fn reset(&mut self);
    fn save_image(&self, path: &Path) -> Result<()>;
    /// Composite a previously saved image onto the canvas at the origin.
    fn load_image(&mut self, path: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Open,
    Save,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileDialog {
    pub title: &'static str,
    pub mode: FileMode,
}

/// The user-facing collaborator: message sink, confirmations and file choice.
pub trait Host {
    fn report(&mut self, message: &str);
    fn confirm(&mut self, question: &str) -> bool;
    /// `None` when the user cancels.
    fn pick_file(&mut self, dialog: &FileDialog) -> Option<PathBuf>;
}

/// Line-based host for headless runs: messages go to `output`, answers come from `input`.
pub struct ConsoleHost<R, W> {
    input: R,
    output: W,
}

impl ConsoleHost<io::StdinLock<'static>, io::Stderr> {
    /// Answers from stdin, messages on stderr so stdout stays free for output data.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsoleHost<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        if let Err(e) = write!(self.output, "{prompt} ").and_then(|()| self.output.flush()) {
            tracing::warn!("prompt write failed: {e}");
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(answer.trim().to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Host for ConsoleHost<R, W> {
    fn report(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{message}") {
            tracing::warn!("report write failed: {e}");
        }
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.ask(&format!("{question} [y/N]"))
            .is_some_and(|a| matches!(a.to_lowercase().as_str(), "y" | "yes"))
    }

    fn pick_file(&mut self, dialog: &FileDialog) -> Option<PathBuf> {
        self.ask(&format!("{}:", dialog.title))
            .filter(|a| !a.is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(input: &str) -> ConsoleHost<&[u8], Vec<u8>> {
        ConsoleHost::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn test_console_report() {
        let mut h = host("");
        h.report("Invalid command: fly");
        assert_eq!(
            String::from_utf8(h.into_output()).unwrap(),
            "Invalid command: fly\n"
        );
    }

    #[test]
    fn test_console_confirm() {
        assert!(host("y\n").confirm("Discard?"));
        assert!(host("YES\n").confirm("Discard?"));
        assert!(!host("n\n").confirm("Discard?"));
        assert!(!host("").confirm("Discard?"));
    }

    #[test]
    fn test_console_pick_file() {
        let dialog = FileDialog {
            title: "Save Command File",
            mode: FileMode::Save,
        };
        assert_eq!(
            host("  out.txt \n").pick_file(&dialog),
            Some(PathBuf::from("out.txt"))
        );
        assert_eq!(host("\n").pick_file(&dialog), None);
        assert_eq!(host("").pick_file(&dialog), None);
    }
}
