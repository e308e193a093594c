use crate::parser::types::{Primitive, Rgb};

/// Pen attributes mirrored by the interpreter and handed to the surface with every primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurtleState {
    pub pen_down: bool,
    pub color: Rgb,
    pub width: u8,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            pen_down: true,
            color: Rgb::BLUE,
            width: 1,
        }
    }
}

impl TurtleState {
    pub fn set_pen(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: u8) {
        self.width = width;
    }

    pub fn set_pen_state(&mut self, down: bool) {
        self.pen_down = down;
    }

    /// The current attributes as primitives, so a replay that starts inside a shape still
    /// draws it with the right pen.
    pub fn snapshot(&self) -> [Primitive; 3] {
        [
            Primitive::Pen(self.color),
            Primitive::PenWidth(self.width),
            if self.pen_down {
                Primitive::PenDown
            } else {
                Primitive::PenUp
            },
        ]
    }

    /// Fold a primitive's effect on pen attributes into the state. Motion primitives leave it alone.
    pub fn apply(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::PenUp => self.set_pen_state(false),
            Primitive::PenDown => self.set_pen_state(true),
            Primitive::Color(named) => self.set_pen(named.rgb()),
            Primitive::Pen(rgb) => self.set_pen(*rgb),
            Primitive::PenWidth(w) => self.set_width(*w),
            Primitive::Move(_)
            | Primitive::Reverse(_)
            | Primitive::Left(_)
            | Primitive::Right(_)
            | Primitive::Circle(_)
            | Primitive::Reset => {}
        }
    }
}
