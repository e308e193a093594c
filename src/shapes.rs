use crate::parser::types::Primitive;
use crate::state::TurtleState;

const SQUARE_TURN: i32 = 90;
const TRIANGLE_TURN: i32 = 120;

/// Composite commands, already validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Square(i32),
    Triangle(i32),
    TriangleSides(i32, i32, i32),
    Circle(i32),
    Polygon { sides: i32, length: i32 },
}

/// Exterior angle of a regular polygon, truncated to whole degrees.
pub fn exterior_angle(sides: i32) -> i32 {
    360 / sides
}

/// Expand a shape into the primitives that are drawn and logged for it, in order.
/// Every expansion starts with a snapshot of the pen attributes.
pub fn expand(shape: &Shape, state: &TurtleState) -> Vec<Primitive> {
    let mut out: Vec<Primitive> = state.snapshot().to_vec();

    match *shape {
        Shape::Square(length) => push_sides(&mut out, &[length; 4], SQUARE_TURN, true),
        Shape::Triangle(size) => push_sides(&mut out, &[size; 3], TRIANGLE_TURN, true),
        Shape::TriangleSides(a, b, c) => push_sides(&mut out, &[a, b, c], TRIANGLE_TURN, false),
        Shape::Circle(radius) => out.push(Primitive::Circle(radius)),
        Shape::Polygon { sides, length } => {
            let count = usize::try_from(sides).unwrap_or_default();
            push_sides(&mut out, &vec![length; count], exterior_angle(sides), true);
        }
    }

    out
}

fn push_sides(out: &mut Vec<Primitive>, lengths: &[i32], turn: i32, closing_turn: bool) {
    for (idx, length) in lengths.iter().enumerate() {
        out.push(Primitive::Move(*length));
        if closing_turn || idx + 1 < lengths.len() {
            out.push(Primitive::Right(turn));
        }
    }
}
