use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::DrawingSurface;
use crate::state::TurtleState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub color: (u8, u8, u8),
    pub width: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub center: (f64, f64),
    pub radius: f64,
    pub color: (u8, u8, u8),
    pub width: u8,
}

/// Everything drawn so far. This is also the on-disk image format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub strokes: Vec<Stroke>,
    pub rings: Vec<Ring>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.rings.is_empty()
    }
}

/// In-memory vector canvas. Home is the center, y grows upwards, heading 0 points up and
/// positive turns are clockwise.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u16,
    height: u16,
    x: f64,
    y: f64,
    heading: f64,
    scene: Scene,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            scene: Scene::default(),
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

impl DrawingSurface for Canvas {
    fn forward(&mut self, distance: i32, pen: &TurtleState) {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        let to = (
            self.x + f64::from(distance) * sin,
            self.y + f64::from(distance) * cos,
        );
        if pen.pen_down {
            self.scene.strokes.push(Stroke {
                from: (self.x, self.y),
                to,
                color: pen.color.to_u8s(),
                width: pen.width,
            });
        }
        (self.x, self.y) = to;
    }

    fn turn(&mut self, degrees: f64) {
        self.heading = (self.heading + degrees).rem_euclid(360.0);
    }

    fn circle(&mut self, radius: i32, pen: &TurtleState) {
        if pen.pen_down {
            self.scene.rings.push(Ring {
                center: (self.x, self.y),
                radius: f64::from(radius),
                color: pen.color.to_u8s(),
                width: pen.width,
            });
        }
    }

    fn clear(&mut self) {
        self.scene = Scene::default();
    }

    fn reset(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.heading = 0.0;
    }

    fn save_image(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, &self.scene)?;
        out.flush()?;
        Ok(())
    }

    fn load_image(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        let loaded: Scene = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("{} is not a canvas image", path.display()))?;
        self.scene.strokes.extend(loaded.strokes);
        self.scene.rings.extend(loaded.rings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_forward_draws_upwards_from_home() {
        let mut canvas = Canvas::new(800, 600);
        canvas.forward(50, &TurtleState::default());
        assert!(close(canvas.position(), (0.0, 50.0)));
        assert_eq!(canvas.scene().strokes.len(), 1);
        assert_eq!(canvas.scene().strokes[0].color, (0, 0, 255));
    }

    #[test]
    fn test_right_turn_is_clockwise() {
        let mut canvas = Canvas::new(800, 600);
        canvas.turn(90.0);
        canvas.forward(10, &TurtleState::default());
        assert!(close(canvas.position(), (10.0, 0.0)));
        canvas.turn(-180.0);
        assert_eq!(canvas.heading(), 270.0);
    }

    #[test]
    fn test_pen_up_moves_without_drawing() {
        let mut canvas = Canvas::new(800, 600);
        let pen = TurtleState {
            pen_down: false,
            ..TurtleState::default()
        };
        canvas.forward(-20, &pen);
        canvas.circle(5, &pen);
        assert!(close(canvas.position(), (0.0, -20.0)));
        assert!(canvas.scene().is_empty());
    }

    #[test]
    fn test_clear_keeps_position_reset_goes_home() {
        let mut canvas = Canvas::new(800, 600);
        canvas.forward(30, &TurtleState::default());
        canvas.clear();
        assert!(canvas.scene().is_empty());
        assert!(close(canvas.position(), (0.0, 30.0)));
        canvas.turn(45.0);
        canvas.reset();
        assert_eq!(canvas.position(), (0.0, 0.0));
        assert_eq!(canvas.heading(), 0.0);
    }

    #[test]
    fn test_image_roundtrip_composites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canvas.scene.json");

        let mut source = Canvas::new(800, 600);
        source.forward(40, &TurtleState::default());
        source.circle(15, &TurtleState::default());
        source.save_image(&path).unwrap();

        let mut target = Canvas::new(800, 600);
        target.turn(90.0);
        target.forward(10, &TurtleState::default());
        target.load_image(&path).unwrap();
        assert_eq!(target.scene().strokes.len(), 2);
        assert_eq!(target.scene().rings, source.scene().rings);
    }

    #[test]
    fn test_load_image_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.scene.json");
        std::fs::write(&path, b"\x89PNG not json").unwrap();
        let mut canvas = Canvas::new(800, 600);
        assert!(canvas.load_image(&path).is_err());
        assert!(canvas.scene().is_empty());
    }
}
