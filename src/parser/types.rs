use serde::{Deserialize, Serialize};
use std::fmt;

/// One `;`-separated segment of user input, split into a lower-cased verb and raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub verb: String,
    pub args: Vec<String>,
}

/// Pen color components. Values are forwarded to the surface without range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl Rgb {
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    /// Saturating conversion for surfaces that need displayable channel values.
    pub fn to_u8s(self) -> (u8, u8, u8) {
        let clamp = |c: i32| c.clamp(0, 255) as u8;
        (clamp(self.r), clamp(self.g), clamp(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedColor {
    Red,
    Green,
    Pink,
    Black,
}

impl NamedColor {
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "red" => Some(NamedColor::Red),
            "green" => Some(NamedColor::Green),
            "pink" => Some(NamedColor::Pink),
            "black" => Some(NamedColor::Black),
            _ => None,
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            NamedColor::Red => Rgb::new(255, 0, 0),
            NamedColor::Green => Rgb::new(0, 255, 0),
            NamedColor::Pink => Rgb::new(255, 175, 175),
            NamedColor::Black => Rgb::new(0, 0, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NamedColor::Red => "red",
            NamedColor::Green => "green",
            NamedColor::Pink => "pink",
            NamedColor::Black => "black",
        }
    }
}

/// A single indivisible, already-validated drawing operation. Its `Display` form is the
/// canonical text written to the command log and to command files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    Move(i32),
    Reverse(i32),
    Left(i32),
    Right(i32),
    PenUp,
    PenDown,
    Color(NamedColor),
    Pen(Rgb),
    PenWidth(u8),
    Circle(i32),
    Reset,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Move(d) => write!(f, "move {d}"),
            Primitive::Reverse(d) => write!(f, "reverse {d}"),
            Primitive::Left(deg) => write!(f, "left {deg}"),
            Primitive::Right(deg) => write!(f, "right {deg}"),
            Primitive::PenUp => write!(f, "penup"),
            Primitive::PenDown => write!(f, "pendown"),
            Primitive::Color(color) => write!(f, "{}", color.name()),
            Primitive::Pen(rgb) => write!(f, "pen {rgb}"),
            Primitive::PenWidth(w) => write!(f, "penwidth {w}"),
            Primitive::Circle(r) => write!(f, "circle {r}"),
            Primitive::Reset => write!(f, "reset"),
        }
    }
}

/// A line of a command file together with its 1-based position.
#[derive(Debug, Clone)]
pub struct ParsedLine {
    pub line_number: usize,
    pub content: String,
    pub statements: Vec<Statement>,
}
