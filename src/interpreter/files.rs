use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{Interpreter, Origin, Outcome};
use crate::parser::lexer::LineError;
use crate::parser::parse_script;
use crate::parser::types::Primitive;
use crate::surface::{DrawingSurface, FileDialog, FileMode, Host};

pub const SAVE_COMMANDS: FileDialog = FileDialog {
    title: "Save Command File",
    mode: FileMode::Save,
};
pub const LOAD_COMMANDS: FileDialog = FileDialog {
    title: "Load Command File",
    mode: FileMode::Open,
};
pub const SAVE_IMAGE: FileDialog = FileDialog {
    title: "Save Image",
    mode: FileMode::Save,
};
pub const LOAD_IMAGE: FileDialog = FileDialog {
    title: "Load Image",
    mode: FileMode::Open,
};

/// Canvas images are JSON scenes, not bitmaps, and are named accordingly.
pub const IMAGE_SUFFIX: &str = ".scene.json";

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn write_log(path: &Path, entries: &[Primitive]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for primitive in entries {
        writeln!(out, "{primitive}")?;
    }
    out.flush()?;
    Ok(())
}

/// Append `.scene.json` unless the name already ends with it (any case).
pub fn with_image_extension(path: PathBuf) -> PathBuf {
    let has_suffix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(IMAGE_SUFFIX));
    if has_suffix {
        return path;
    }
    let mut raw = path.into_os_string();
    raw.push(IMAGE_SUFFIX);
    PathBuf::from(raw)
}

impl<S: DrawingSurface, H: Host> Interpreter<S, H> {
    /// Run a command file's contents through the interpreter, line by line. A bad line is
    /// reported and skipped; every failure is also returned.
    /// `loadcmd` inside the script is rejected like any other bad line.
    pub fn run_script(&mut self, content: &str) -> Vec<LineError> {
        let was_loading = std::mem::replace(&mut self.loading, true);
        let mut errors = Vec::new();
        for line in parse_script(content) {
            for statement in &line.statements {
                let origin = Origin::File {
                    line_number: line.line_number,
                };
                if let Outcome::Rejected(e) = self.process_statement(statement, origin) {
                    errors.push(LineError {
                        line_number: line.line_number,
                        line_content: line.content.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        self.loading = was_loading;
        errors
    }

    pub(super) fn save_commands(&mut self) -> Outcome {
        let Some(path) = self.host.pick_file(&SAVE_COMMANDS) else {
            return Outcome::Cancelled;
        };

        match write_log(&path, self.log.entries()) {
            Ok(()) => {
                tracing::info!(path = %path.display(), entries = self.log.len(), "saved commands");
                self.dirty = false;
                self.host
                    .report(&format!("Commands saved to {}", display_name(&path)));
                Outcome::FileDone
            }
            Err(e) => self.io_failure("Error saving file", &e),
        }
    }

    pub(super) fn load_commands(&mut self) -> Outcome {
        let Some(path) = self.host.pick_file(&LOAD_COMMANDS) else {
            return Outcome::Cancelled;
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => return self.io_failure("Error loading file", &anyhow::Error::from(e)),
        };

        let errors = self.run_script(&content);
        tracing::info!(path = %path.display(), failed_lines = errors.len(), "loaded commands");
        self.host
            .report(&format!("Commands loaded from {}", display_name(&path)));
        Outcome::FileDone
    }

    pub(super) fn save_image(&mut self) -> Outcome {
        let Some(path) = self.host.pick_file(&SAVE_IMAGE) else {
            return Outcome::Cancelled;
        };
        let path = with_image_extension(path);

        match self.surface.save_image(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "saved image");
                self.host
                    .report(&format!("Image saved as {}", path.display()));
                Outcome::FileDone
            }
            Err(e) => self.io_failure("Error saving image", &e),
        }
    }

    pub(super) fn load_image(&mut self) -> Outcome {
        let Some(path) = self.host.pick_file(&LOAD_IMAGE) else {
            return Outcome::Cancelled;
        };

        match self.surface.load_image(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "loaded image");
                self.dirty = true;
                self.host
                    .report(&format!("Image loaded from {}", path.display()));
                Outcome::FileDone
            }
            Err(e) => self.io_failure("Error loading image", &e),
        }
    }

    fn io_failure(&mut self, what: &str, error: &anyhow::Error) -> Outcome {
        let message = format!("{what}: {error:#}");
        tracing::warn!("{message}");
        self.host.report(&message);
        Outcome::IoFailed(message)
    }
}
