//! Command interpreter and replay-based undo/redo.
//!
//! Every drawing statement is validated, expanded into primitives, and each primitive is
//! applied to the surface and appended to the [`CommandLog`] in one step. Undo pops the last
//! primitive, wipes the surface and replays the rest of the log from a blank canvas, so each
//! undo costs one surface call per logged primitive. In exchange no inverse operations or
//! canvas snapshots are ever kept.

mod files;

pub use files::{
    IMAGE_SUFFIX, LOAD_COMMANDS, LOAD_IMAGE, SAVE_COMMANDS, SAVE_IMAGE, with_image_extension,
};

use crate::history::CommandLog;
use crate::parser::lexer::split_statements;
use crate::parser::types::{Primitive, Statement};
use crate::shapes;
use crate::state::TurtleState;
use crate::surface::{DrawingSurface, Host};
use crate::validator::{self, Command, CommandError, SessionCommand};

const CLEAR_QUESTION: &str = "You have unsaved changes. Clear anyway?";

/// Where a statement came from. File lines apply canonical primitive text as-is, so a
/// saved log reloads without re-expanding `circle` into a second pen snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    File { line_number: usize },
}

/// What a single statement did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Number of primitives applied and logged.
    Drawn(usize),
    Undone,
    Redone,
    Cleared,
    /// Undo/redo with nothing to act on.
    NoOp,
    /// A message was shown and nothing else changed.
    Informed,
    FileDone,
    /// The user declined a confirmation or closed a file dialog.
    Cancelled,
    Rejected(CommandError),
    IoFailed(String),
}

pub struct Interpreter<S, H> {
    surface: S,
    host: H,
    state: TurtleState,
    defaults: TurtleState,
    log: CommandLog,
    dirty: bool,
    /// Set while a command file runs; nested `loadcmd` is refused.
    loading: bool,
}

impl<S: DrawingSurface, H: Host> Interpreter<S, H> {
    pub fn new(surface: S, host: H) -> Self {
        Self::with_defaults(surface, host, TurtleState::default())
    }

    /// `defaults` is the pen the session starts with and returns to on clear and replay.
    pub fn with_defaults(surface: S, host: H, defaults: TurtleState) -> Self {
        Self {
            surface,
            host,
            state: defaults,
            defaults,
            log: CommandLog::new(),
            dirty: false,
            loading: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Borrow the surface for reading while the host is used mutably (e.g. to draw a frame).
    pub fn parts_mut(&mut self) -> (&S, &mut H) {
        (&self.surface, &mut self.host)
    }

    pub fn state(&self) -> &TurtleState {
        &self.state
    }

    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Run one line of user input. Each `;` segment succeeds or fails on its own.
    pub fn process_line(&mut self, input: &str) -> Vec<Outcome> {
        split_statements(input)
            .iter()
            .map(|statement| self.process_statement(statement, Origin::User))
            .collect()
    }

    pub fn process_statement(&mut self, statement: &Statement, origin: Origin) -> Outcome {
        let command = match validator::validate(statement).and_then(|c| self.admit(c)) {
            Ok(command) => command,
            Err(e) => {
                let message = match origin {
                    Origin::User => e.to_string(),
                    Origin::File { line_number } => format!("Line {line_number}: {e}"),
                };
                tracing::warn!(verb = %statement.verb, kind = ?e.kind(), "{message}");
                self.host.report(&message);
                return Outcome::Rejected(e);
            }
        };

        if let Origin::File { .. } = origin
            && let Some(primitive) = command.canonical_primitive()
        {
            self.run_primitive(primitive);
            self.dirty = true;
            return Outcome::Drawn(1);
        }

        match command {
            Command::Primitive(primitive) => {
                self.run_primitive(primitive);
                self.dirty = true;
                Outcome::Drawn(1)
            }
            Command::Shape(shape) => {
                let primitives = shapes::expand(&shape, &self.state);
                for primitive in &primitives {
                    self.run_primitive(*primitive);
                }
                self.dirty = true;
                Outcome::Drawn(primitives.len())
            }
            Command::Session(session) => self.run_session(session),
        }
    }

    fn admit(&self, command: Command) -> Result<Command, CommandError> {
        match command {
            Command::Session(SessionCommand::LoadCommands) if self.loading => {
                Err(CommandError::NestedLoad)
            }
            _ => Ok(command),
        }
    }

    fn run_session(&mut self, command: SessionCommand) -> Outcome {
        match command {
            SessionCommand::About => {
                self.host.report(&format!(
                    "Turtle Graphics {}",
                    env!("CARGO_PKG_VERSION")
                ));
                Outcome::Informed
            }
            SessionCommand::Help => {
                self.host.report(&validator::help_text());
                Outcome::Informed
            }
            SessionCommand::Clear => self.clear(),
            SessionCommand::Undo => self.undo(),
            SessionCommand::Redo => self.redo(),
            SessionCommand::SaveCommands => self.save_commands(),
            SessionCommand::LoadCommands => self.load_commands(),
            SessionCommand::SaveImage => self.save_image(),
            SessionCommand::LoadImage => self.load_image(),
        }
    }

    /// The single execution path for primitives: update the pen, draw, log.
    fn run_primitive(&mut self, primitive: Primitive) {
        self.state.apply(&primitive);
        match primitive {
            Primitive::Move(distance) => self.surface.forward(distance, &self.state),
            Primitive::Reverse(distance) => self.surface.forward(-distance, &self.state),
            Primitive::Left(degrees) => self.surface.turn(-f64::from(degrees)),
            Primitive::Right(degrees) => self.surface.turn(f64::from(degrees)),
            Primitive::Circle(radius) => self.surface.circle(radius, &self.state),
            Primitive::Reset => self.surface.reset(),
            Primitive::PenUp
            | Primitive::PenDown
            | Primitive::Color(_)
            | Primitive::Pen(_)
            | Primitive::PenWidth(_) => {}
        }
        self.log.push(primitive);
        tracing::debug!(%primitive, replaying = self.log.is_replaying(), "applied");
    }

    /// Blank canvas, turtle home, session pen.
    fn restart_canvas(&mut self) {
        self.surface.clear();
        self.surface.reset();
        self.state = self.defaults;
    }

    pub fn undo(&mut self) -> Outcome {
        let Some(remaining) = self.log.begin_undo() else {
            return Outcome::NoOp;
        };
        tracing::info!(replayed = remaining.len(), "undo");

        self.restart_canvas();
        for primitive in remaining {
            self.run_primitive(primitive);
        }
        self.log.end_replay();
        self.dirty = true;
        Outcome::Undone
    }

    pub fn redo(&mut self) -> Outcome {
        let Some(primitive) = self.log.begin_redo() else {
            return Outcome::NoOp;
        };
        tracing::info!(%primitive, "redo");

        self.run_primitive(primitive);
        self.log.end_replay();
        self.dirty = true;
        Outcome::Redone
    }

    pub fn clear(&mut self) -> Outcome {
        if self.dirty && !self.host.confirm(CLEAR_QUESTION) {
            return Outcome::Cancelled;
        }
        tracing::info!(discarded = self.log.len(), "clear");

        self.restart_canvas();
        self.log.clear();
        self.dirty = false;
        Outcome::Cleared
    }
}
