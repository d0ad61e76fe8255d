//! Glyph outlines in layout coordinates.

use leaftext_traits::OutlineSink;
use serde::Serialize;

/// One drawing command. Coordinates are absolute pixels, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    QuadTo { x1: f32, y1: f32, x: f32, y: f32 },
    CurveTo { x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32 },
    Close,
}

/// Collects font-unit outline callbacks as scaled, flipped [`PathCommand`]s.
///
/// Font units grow upward from the baseline, so `y` is negated around the
/// origin.
#[derive(Debug)]
pub(crate) struct PathBuilder {
    origin_x: f32,
    origin_y: f32,
    ratio: f32,
    commands: Vec<PathCommand>,
}

impl PathBuilder {
    pub(crate) fn new(origin_x: f32, origin_y: f32, ratio: f32) -> Self {
        Self {
            origin_x,
            origin_y,
            ratio,
            commands: Vec::new(),
        }
    }

    fn x(&self, x: f32) -> f32 {
        self.origin_x + x * self.ratio
    }

    fn y(&self, y: f32) -> f32 {
        self.origin_y - y * self.ratio
    }

    pub(crate) fn finish(self) -> Vec<PathCommand> {
        self.commands
    }
}

impl OutlineSink for PathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let command = PathCommand::MoveTo {
            x: self.x(x),
            y: self.y(y),
        };
        self.commands.push(command);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let command = PathCommand::LineTo {
            x: self.x(x),
            y: self.y(y),
        };
        self.commands.push(command);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let command = PathCommand::QuadTo {
            x1: self.x(x1),
            y1: self.y(y1),
            x: self.x(x),
            y: self.y(y),
        };
        self.commands.push(command);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let command = PathCommand::CurveTo {
            x1: self.x(x1),
            y1: self.y(y1),
            x2: self.x(x2),
            y2: self.y(y2),
            x: self.x(x),
            y: self.y(y),
        };
        self.commands.push(command);
    }

    fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_scales_and_flips() {
        let mut builder = PathBuilder::new(10.0, 20.0, 0.5);
        builder.move_to(0.0, 0.0);
        builder.line_to(100.0, 40.0);
        builder.quad_to(2.0, 4.0, 6.0, -8.0);
        builder.close();

        assert_eq!(
            builder.finish(),
            vec![
                PathCommand::MoveTo { x: 10.0, y: 20.0 },
                PathCommand::LineTo { x: 60.0, y: 0.0 },
                PathCommand::QuadTo {
                    x1: 11.0,
                    y1: 18.0,
                    x: 13.0,
                    y: 24.0
                },
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_serializes_with_op_tag() {
        let json = serde_json::to_value(PathCommand::LineTo { x: 1.0, y: 2.0 }).unwrap();
        assert_eq!(json["op"], "lineTo");
        assert_eq!(json["x"], 1.0);
    }
}
