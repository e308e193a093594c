use std::ops::RangeInclusive;

use crate::parser::lexer::LineError;
use crate::parser::types::{NamedColor, ParsedLine, Primitive, Rgb, Statement};
use crate::shapes::Shape;

pub const DISTANCE_RANGE: RangeInclusive<i32> = 1..=200;
pub const PEN_WIDTH_RANGE: RangeInclusive<i32> = 1..=10;
pub const POLYGON_SIDES_RANGE: RangeInclusive<i32> = 3..=12;
pub const DEFAULT_TURN: i32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong count, type or range of arguments.
    Parameter,
    /// Verb-specific semantic violation.
    Validation,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Missing parameter for '{verb}'.")]
    MissingParameter { verb: String },
    #[error("Invalid parameter for '{verb}': '{value}' is not a whole number.")]
    InvalidParameter { verb: String, value: String },
    #[error("Distance must be between 1 and 200.")]
    DistanceOutOfRange(i32),
    #[error("Pen width must be between 1 and 10.")]
    PenWidthOutOfRange(i32),
    #[error("Polygon sides must be between 3 and 12.")]
    PolygonSidesOutOfRange(i32),
    #[error("Invalid triangle parameters: expected 1 or 3 side lengths, got {0}.")]
    TriangleArity(usize),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("loadcmd cannot be used inside a command file.")]
    NestedLoad,
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::TriangleArity(_)
            | CommandError::InvalidCommand(_)
            | CommandError::NestedLoad => ErrorKind::Validation,
            _ => ErrorKind::Parameter,
        }
    }
}

/// Commands that act on the session rather than on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    About,
    Help,
    Clear,
    Undo,
    Redo,
    SaveCommands,
    LoadCommands,
    SaveImage,
    LoadImage,
}

/// A statement that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Primitive(Primitive),
    Shape(Shape),
    Session(SessionCommand),
}

impl Command {
    /// The primitive this command is logged as, when the command text is already canonical.
    pub fn canonical_primitive(&self) -> Option<Primitive> {
        match self {
            Command::Primitive(p) => Some(*p),
            Command::Shape(Shape::Circle(radius)) => Some(Primitive::Circle(*radius)),
            _ => None,
        }
    }
}

struct Args<'a> {
    verb: &'a str,
    values: &'a [String],
}

impl Args<'_> {
    fn int(&self, idx: usize) -> Result<i32, CommandError> {
        let raw = self
            .values
            .get(idx)
            .ok_or_else(|| CommandError::MissingParameter {
                verb: self.verb.to_string(),
            })?;
        raw.parse().map_err(|_| CommandError::InvalidParameter {
            verb: self.verb.to_string(),
            value: raw.clone(),
        })
    }

    fn int_or(&self, idx: usize, default: i32) -> Result<i32, CommandError> {
        if idx < self.values.len() {
            self.int(idx)
        } else {
            Ok(default)
        }
    }

    fn distance(&self, idx: usize) -> Result<i32, CommandError> {
        let value = self.int(idx)?;
        if DISTANCE_RANGE.contains(&value) {
            Ok(value)
        } else {
            Err(CommandError::DistanceOutOfRange(value))
        }
    }
}

/// Descriptor for one verb: how many arguments it needs and how to validate them.
pub struct VerbSpec {
    pub name: &'static str,
    pub min_args: usize,
    pub usage: &'static str,
    pub summary: &'static str,
    build: fn(&Args) -> Result<Command, CommandError>,
}

macro_rules! session {
    ($name:literal, $cmd:ident, $summary:literal) => {
        VerbSpec {
            name: $name,
            min_args: 0,
            usage: $name,
            summary: $summary,
            build: |_| Ok(Command::Session(SessionCommand::$cmd)),
        }
    };
}

macro_rules! color {
    ($name:literal, $color:ident) => {
        VerbSpec {
            name: $name,
            min_args: 0,
            usage: $name,
            summary: "set a named pen color",
            build: |_| Ok(Command::Primitive(Primitive::Color(NamedColor::$color))),
        }
    };
}

static VERBS: &[VerbSpec] = &[
    VerbSpec {
        name: "move",
        min_args: 1,
        usage: "move <distance>",
        summary: "move forward (1-200)",
        build: |a| Ok(Command::Primitive(Primitive::Move(a.distance(0)?))),
    },
    VerbSpec {
        name: "reverse",
        min_args: 1,
        usage: "reverse <distance>",
        summary: "move backward (1-200)",
        build: |a| Ok(Command::Primitive(Primitive::Reverse(a.distance(0)?))),
    },
    VerbSpec {
        name: "left",
        min_args: 0,
        usage: "left [degrees]",
        summary: "turn left (default 90)",
        build: |a| Ok(Command::Primitive(Primitive::Left(a.int_or(0, DEFAULT_TURN)?))),
    },
    VerbSpec {
        name: "right",
        min_args: 0,
        usage: "right [degrees]",
        summary: "turn right (default 90)",
        build: |a| Ok(Command::Primitive(Primitive::Right(a.int_or(0, DEFAULT_TURN)?))),
    },
    VerbSpec {
        name: "penup",
        min_args: 0,
        usage: "penup",
        summary: "lift the pen",
        build: |_| Ok(Command::Primitive(Primitive::PenUp)),
    },
    VerbSpec {
        name: "pendown",
        min_args: 0,
        usage: "pendown",
        summary: "lower the pen",
        build: |_| Ok(Command::Primitive(Primitive::PenDown)),
    },
    color!("red", Red),
    color!("green", Green),
    color!("pink", Pink),
    color!("black", Black),
    VerbSpec {
        name: "pen",
        min_args: 3,
        usage: "pen <r> <g> <b>",
        summary: "set an RGB pen color",
        build: |a| {
            let rgb = Rgb::new(a.int(0)?, a.int(1)?, a.int(2)?);
            Ok(Command::Primitive(Primitive::Pen(rgb)))
        },
    },
    VerbSpec {
        name: "penwidth",
        min_args: 1,
        usage: "penwidth <width>",
        summary: "set the stroke width (1-10)",
        build: |a| {
            let width = a.int(0)?;
            let width = u8::try_from(width)
                .ok()
                .filter(|_| PEN_WIDTH_RANGE.contains(&width))
                .ok_or(CommandError::PenWidthOutOfRange(width))?;
            Ok(Command::Primitive(Primitive::PenWidth(width)))
        },
    },
    VerbSpec {
        name: "reset",
        min_args: 0,
        usage: "reset",
        summary: "move the turtle home",
        build: |_| Ok(Command::Primitive(Primitive::Reset)),
    },
    VerbSpec {
        name: "square",
        min_args: 1,
        usage: "square <length>",
        summary: "draw a square (1-200)",
        build: |a| Ok(Command::Shape(Shape::Square(a.distance(0)?))),
    },
    VerbSpec {
        name: "triangle",
        min_args: 1,
        usage: "triangle <size> | <a> <b> <c>",
        summary: "draw a triangle (sides 1-200)",
        build: |a| match a.values.len() {
            1 => Ok(Command::Shape(Shape::Triangle(a.distance(0)?))),
            3 => Ok(Command::Shape(Shape::TriangleSides(
                a.distance(0)?,
                a.distance(1)?,
                a.distance(2)?,
            ))),
            n => Err(CommandError::TriangleArity(n)),
        },
    },
    VerbSpec {
        name: "circle",
        min_args: 1,
        usage: "circle <radius>",
        summary: "draw a circle (1-200)",
        build: |a| Ok(Command::Shape(Shape::Circle(a.distance(0)?))),
    },
    VerbSpec {
        name: "polygon",
        min_args: 2,
        usage: "polygon <sides> <length>",
        summary: "draw a polygon (3-12 sides, 1-200 length)",
        build: |a| {
            let sides = a.int(0)?;
            let length = a.int(1)?;
            if !POLYGON_SIDES_RANGE.contains(&sides) {
                return Err(CommandError::PolygonSidesOutOfRange(sides));
            }
            if !DISTANCE_RANGE.contains(&length) {
                return Err(CommandError::DistanceOutOfRange(length));
            }
            Ok(Command::Shape(Shape::Polygon { sides, length }))
        },
    },
    session!("undo", Undo, "undo the last drawing step"),
    session!("redo", Redo, "redo the last undone step"),
    session!("clear", Clear, "wipe the canvas and history"),
    session!("savecmd", SaveCommands, "save the command log to a file"),
    session!("loadcmd", LoadCommands, "replay a command file"),
    session!("save_ig", SaveImage, "save the canvas as a .scene.json vector image"),
    session!("load_ig", LoadImage, "draw a .scene.json image onto the canvas"),
    session!("about", About, "about this program"),
    session!("help", Help, "show this help"),
];

pub fn lookup(verb: &str) -> Option<&'static VerbSpec> {
    VERBS.iter().find(|spec| spec.name == verb)
}

pub fn verbs() -> &'static [VerbSpec] {
    VERBS
}

/// Validate one statement against the verb table.
pub fn validate(statement: &Statement) -> Result<Command, CommandError> {
    let spec = lookup(&statement.verb)
        .ok_or_else(|| CommandError::InvalidCommand(statement.verb.clone()))?;

    if statement.args.len() < spec.min_args {
        return Err(CommandError::MissingParameter {
            verb: spec.name.to_string(),
        });
    }

    (spec.build)(&Args {
        verb: spec.name,
        values: &statement.args,
    })
}

/// Validate every statement of a parsed command file without executing anything.
pub fn check_script(lines: &[ParsedLine]) -> Vec<LineError> {
    lines
        .iter()
        .flat_map(|line| {
            line.statements.iter().filter_map(move |statement| {
                validate(statement)
                    .and_then(|command| match command {
                        Command::Session(SessionCommand::LoadCommands) => {
                            Err(CommandError::NestedLoad)
                        }
                        command => Ok(command),
                    })
                    .err()
                    .map(|e| LineError {
                    line_number: line.line_number,
                    line_content: line.content.clone(),
                    message: e.to_string(),
                })
            })
        })
        .collect()
}

/// Multi-line command summary built from the verb table.
pub fn help_text() -> String {
    let mut lines: Vec<String> = VERBS
        .iter()
        .filter(|spec| NamedColor::from_verb(spec.name).is_none())
        .map(|spec| format!("- {:<30}: {}", spec.usage, spec.summary))
        .collect();
    lines.push(format!("- {:<30}: {}", "red | green | pink | black", "set a named pen color"));
    lines.push("- separate multiple commands using ;".to_string());
    lines.join("\n")
}
